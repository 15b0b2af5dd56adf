//! Schedulers: "run this later" with a cancellable handle.
//!
//! A [`Scheduler`] pairs a clock with a way to queue work. The engine ships
//! two: the deterministic [`VirtualTimeScheduler`] that drives all
//! timing-dependent tests, and (behind the `futures-scheduler` feature) a
//! wall-clock [`LocalPoolScheduler`] for production use. Hosts can supply
//! their own by implementing the trait.

pub use std::time::{Duration, Instant};

#[cfg(feature = "futures-scheduler")]
pub mod local_pool;
pub mod virtual_time;

#[cfg(feature = "futures-scheduler")]
pub use local_pool::LocalPoolScheduler;
pub use virtual_time::VirtualTimeScheduler;

use crate::subscription::Subscription;

/// An abstraction for scheduling deferred, cancellable work.
///
/// Implementations are cheap handles (`Clone` shares the underlying queue).
/// The returned [`Subscription`] is the action's lifecycle: unsubscribe it to
/// cancel pending work; it closes by itself once one-shot work has run.
pub trait Scheduler: Clone {
  /// The scheduler's notion of now. Virtual schedulers advance this only
  /// from their own queue.
  fn now(&self) -> Instant;

  /// Queues `work(state)` to run after `delay`.
  fn schedule<T: 'static>(
    &self,
    work: impl FnOnce(T) + 'static,
    delay: Duration,
    state: T,
  ) -> Subscription;

  /// Queues `task` to run every `period`, passing the run index. The chain
  /// reschedules itself and is governed by the single returned handle.
  fn schedule_repeating(
    &self,
    task: impl FnMut(usize) + 'static,
    period: Duration,
  ) -> Subscription
  where
    Self: 'static,
  {
    let handle = Subscription::new();
    tick(self.clone(), task, period, 0, handle.clone());
    handle
  }
}

fn tick<S, F>(scheduler: S, task: F, period: Duration, n: usize, handle: Subscription)
where
  S: Scheduler + 'static,
  F: FnMut(usize) + 'static,
{
  let gate = handle.clone();
  let chain = scheduler.clone();
  scheduler.schedule(
    move |(mut task, n): (F, usize)| {
      if gate.is_closed() {
        return;
      }
      task(n);
      if !gate.is_closed() {
        tick(chain, task, period, n + 1, gate.clone());
      }
    },
    period,
    (task, n),
  );
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use super::*;

  #[test]
  fn repeating_chain_is_cancelled_by_its_handle() {
    let scheduler = VirtualTimeScheduler::new();
    let runs = Rc::new(RefCell::new(Vec::new()));
    let c_runs = runs.clone();

    let handle =
      scheduler.schedule_repeating(move |n| c_runs.borrow_mut().push(n), Duration::from_secs(1));

    scheduler.advance_by(Duration::from_secs(3));
    assert_eq!(*runs.borrow(), vec![0, 1, 2]);

    handle.unsubscribe();
    scheduler.advance_by(Duration::from_secs(10));
    assert_eq!(*runs.borrow(), vec![0, 1, 2]);
  }

  #[test]
  fn repeating_task_can_cancel_itself() {
    let scheduler = VirtualTimeScheduler::new();
    let runs = Rc::new(RefCell::new(Vec::new()));
    let c_runs = runs.clone();

    let handle = Rc::new(RefCell::new(None::<Subscription>));
    let c_handle = handle.clone();
    let sub = scheduler.schedule_repeating(
      move |n| {
        c_runs.borrow_mut().push(n);
        if n == 2 {
          if let Some(h) = c_handle.borrow().as_ref() {
            h.unsubscribe();
          }
        }
      },
      Duration::from_secs(1),
    );
    *handle.borrow_mut() = Some(sub);

    scheduler.flush();
    assert_eq!(*runs.borrow(), vec![0, 1, 2]);
  }
}
