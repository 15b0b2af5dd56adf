//! # rxcore: a push-based reactive-stream core
//!
//! The subscription/lifecycle engine of a Reactive Extensions
//! implementation: lazily-evaluated, cancellable, composable streams with
//! deterministic teardown, plus the two support systems everything else
//! leans on, a virtual-time [`Scheduler`] for reproducing timing-dependent
//! behavior without real delays, and the [`Subject`] multicast family.
//!
//! ## Quick start
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use rxcore::prelude::*;
//!
//! let evens = Rc::new(RefCell::new(Vec::new()));
//! let sink = evens.clone();
//! from_iter(0..10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 2)
//!   .subscribe(move |v| sink.borrow_mut().push(v));
//! assert_eq!(*evens.borrow(), vec![0, 4, 8, 12, 16]);
//! ```
//!
//! ## Key concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | A reusable recipe producing values to a subscriber |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` notifications |
//! | [`Subscriber`] | An Observer fused with a Subscription; enforces the stopped state machine |
//! | [`Subscription`] | Cancellable handle with idempotent, ordered teardown |
//! | [`Scheduler`] | Deferred, cancellable work; virtual time for tests |
//! | [`Subject`] | An Observable that is also an Observer: multicast |
//!
//! Everything runs on one logical thread, cooperatively: values flow
//! downstream on the caller's stack or through a scheduler's queue, and
//! cancellation flows upstream synchronously. Operators multiplexing several
//! sources serialize delivery themselves; the core adds no locking.
//!
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`Subscriber`]: subscriber::Subscriber
//! [`Subscription`]: subscription::Subscription
//! [`Scheduler`]: scheduler::Scheduler
//! [`Subject`]: subject::Subject

pub mod config;
pub mod error;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod scheduler;
pub mod subject;
pub mod subscriber;
pub mod subscription;

pub use prelude::*;

pub use crate::scheduler::{Duration, Instant};
