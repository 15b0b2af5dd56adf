//! Canonical operators illustrating the core contract.
//!
//! This is intentionally not an operator catalog. Each module here
//! demonstrates one pattern every external operator library builds from:
//! subscriber wrapping (`map`, `filter`, `take`), concurrent upstream
//! subscription (`merge`), sequential upstream subscription (`concat`), and
//! scheduler-mediated time shifting (`delay`). `ref_count` holds the
//! subscriber-counted sharing policy for connectable observables.

pub mod concat;
pub mod delay;
pub mod filter;
pub mod map;
pub mod merge;
pub mod ref_count;
pub mod take;
