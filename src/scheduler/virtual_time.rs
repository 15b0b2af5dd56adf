//! A deterministic scheduler over simulated time.
//!
//! Pending actions live in a priority queue keyed by `(time, index)`: the
//! absolute virtual instant and an insertion sequence number breaking ties in
//! schedule order. Flushing extracts the minimum, moves the virtual clock to
//! its time, and executes. The queue is never iterated while user work can
//! mutate it, so work is free to schedule (including at the current instant),
//! cancel other actions, or cancel itself. Work scheduled during a flush pass
//! runs in that same pass once its time is due.

use std::{
  cell::RefCell,
  cmp::{Ordering, Reverse},
  collections::BinaryHeap,
  rc::Rc,
  time::{Duration, Instant},
};

use crate::{scheduler::Scheduler, subscription::Subscription};

/// Executed-action bound for a single flush pass, a safety net against
/// runaway self-scheduling loops.
const DEFAULT_MAX_FRAMES: usize = 10_000;

struct VirtualAction {
  time: Duration,
  index: u64,
  work: Box<dyn FnOnce()>,
  handle: Subscription,
}

impl PartialEq for VirtualAction {
  fn eq(&self, other: &Self) -> bool { self.time == other.time && self.index == other.index }
}

impl Eq for VirtualAction {}

impl PartialOrd for VirtualAction {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for VirtualAction {
  fn cmp(&self, other: &Self) -> Ordering {
    self.time.cmp(&other.time).then(self.index.cmp(&other.index))
  }
}

struct VirtualCore {
  elapsed: Duration,
  queue: BinaryHeap<Reverse<VirtualAction>>,
  next_index: u64,
  max_frames: usize,
}

/// A [`Scheduler`] whose clock only moves when its queue is drained.
///
/// `now()` is an `Instant` anchored at construction time plus the virtual
/// elapsed duration, so durations measured against it behave like wall-clock
/// arithmetic without any waiting. A panic in scheduled work propagates out
/// of the driving `flush`/`advance_*` call, leaving the remaining actions
/// pending.
#[derive(Clone)]
pub struct VirtualTimeScheduler {
  core: Rc<RefCell<VirtualCore>>,
  epoch: Instant,
}

impl Default for VirtualTimeScheduler {
  fn default() -> Self { Self::new() }
}

impl VirtualTimeScheduler {
  pub fn new() -> Self { Self::with_max_frames(DEFAULT_MAX_FRAMES) }

  /// A scheduler aborting any flush pass that executes more than
  /// `max_frames` actions.
  pub fn with_max_frames(max_frames: usize) -> Self {
    VirtualTimeScheduler {
      core: Rc::new(RefCell::new(VirtualCore {
        elapsed: Duration::ZERO,
        queue: BinaryHeap::new(),
        next_index: 0,
        max_frames,
      })),
      epoch: Instant::now(),
    }
  }

  /// Virtual time elapsed since construction.
  pub fn elapsed(&self) -> Duration { self.core.borrow().elapsed }

  pub fn pending_actions(&self) -> usize { self.core.borrow().queue.len() }

  /// Executes every pending action in `(time, index)` order, following the
  /// virtual clock wherever the queue leads.
  pub fn flush(&self) { self.drain(None); }

  /// Advances the clock by `delta`, executing everything due on the way.
  pub fn advance_by(&self, delta: Duration) { self.advance_to(self.elapsed() + delta); }

  /// Advances the clock to absolute virtual time `until`, executing
  /// everything due on the way. Moves backwards never.
  pub fn advance_to(&self, until: Duration) {
    self.drain(Some(until));
    let mut core = self.core.borrow_mut();
    if core.elapsed < until {
      core.elapsed = until;
    }
  }

  fn drain(&self, until: Option<Duration>) {
    let mut frames = 0usize;
    loop {
      // Extract before executing: the queue must never be borrowed while
      // user work runs, since that work may schedule or cancel re-entrantly.
      let action = {
        let mut core = self.core.borrow_mut();
        match core.queue.peek() {
          Some(Reverse(action)) if until.map_or(true, |limit| action.time <= limit) => {}
          _ => break,
        }
        let Reverse(action) = core.queue.pop().expect("peeked above");
        core.elapsed = action.time;
        action
      };
      if action.handle.is_closed() {
        // cancelled while pending
        continue;
      }
      frames += 1;
      if frames > self.core.borrow().max_frames {
        tracing::warn!(
          max_frames = self.core.borrow().max_frames,
          "virtual scheduler aborted flush; runaway re-entrant scheduling?"
        );
        break;
      }
      (action.work)();
      // one-shot action is done; close its handle
      action.handle.unsubscribe();
    }
  }
}

impl Scheduler for VirtualTimeScheduler {
  fn now(&self) -> Instant { self.epoch + self.elapsed() }

  fn schedule<T: 'static>(
    &self,
    work: impl FnOnce(T) + 'static,
    delay: Duration,
    state: T,
  ) -> Subscription {
    let handle = Subscription::new();
    let mut core = self.core.borrow_mut();
    let action = VirtualAction {
      time: core.elapsed + delay,
      index: core.next_index,
      work: Box::new(move || work(state)),
      handle: handle.clone(),
    };
    core.next_index += 1;
    core.queue.push(Reverse(action));
    handle
  }
}
