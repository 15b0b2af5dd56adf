//! A wall-clock scheduler over a `futures` single-threaded executor.
//!
//! Work is spawned onto a [`LocalPool`]; delays sleep through `futures-time`
//! (the `timer` feature). The pool runs when the host drives it with
//! [`run`](LocalPoolScheduler::run); scheduling alone never blocks.

use std::{
  cell::RefCell,
  rc::Rc,
  time::{Duration, Instant},
};

use futures::{
  executor::{LocalPool, LocalSpawner},
  task::LocalSpawnExt,
};

use crate::{scheduler::Scheduler, subscription::Subscription};

#[derive(Clone)]
pub struct LocalPoolScheduler {
  pool: Rc<RefCell<LocalPool>>,
  spawner: LocalSpawner,
}

impl Default for LocalPoolScheduler {
  fn default() -> Self { Self::new() }
}

impl LocalPoolScheduler {
  pub fn new() -> Self {
    let pool = LocalPool::new();
    let spawner = pool.spawner();
    LocalPoolScheduler { pool: Rc::new(RefCell::new(pool)), spawner }
  }

  /// Drives the pool until every spawned task (delays included) finished.
  pub fn run(&self) { self.pool.borrow_mut().run(); }

  /// Drives the pool until no task can make immediate progress.
  pub fn run_until_stalled(&self) { self.pool.borrow_mut().run_until_stalled(); }
}

impl Scheduler for LocalPoolScheduler {
  fn now(&self) -> Instant { Instant::now() }

  fn schedule<T: 'static>(
    &self,
    work: impl FnOnce(T) + 'static,
    delay: Duration,
    state: T,
  ) -> Subscription {
    let handle = Subscription::new();
    let gate = handle.clone();
    #[cfg(not(feature = "timer"))]
    if !delay.is_zero() {
      tracing::warn!("`timer` feature disabled; scheduled work runs without its delay");
    }
    let spawned = self.spawner.spawn_local(async move {
      #[cfg(feature = "timer")]
      if !delay.is_zero() {
        futures_time::task::sleep(delay.into()).await;
      }
      if !gate.is_closed() {
        work(state);
      }
      // one-shot action is done; close its handle
      gate.unsubscribe();
    });
    if let Err(err) = spawned {
      tracing::warn!(error = %err, "failed to spawn scheduled work");
    }
    handle
  }
}
