//! Disposable handles with idempotent teardown.
//!
//! A [`Subscription`] owns an ordered collection of teardown items: nested
//! subscriptions and finalizer callables. Unsubscribing is idempotent, runs
//! every item exactly once in registration order, and keeps running the
//! remaining items when one of them fails, surfacing the failures as one
//! aggregate afterwards.

use std::{cell::RefCell, fmt, rc::Rc};

use smallvec::SmallVec;

use crate::error::{self, BoxError, UnsubscribeError};

/// A single teardown item owned by a [`Subscription`].
pub enum Teardown {
  /// Nothing to do. Lets subscribe-recipes without resources return a value.
  None,
  /// A nested subscription, unsubscribed when the owner unsubscribes.
  Subscription(Subscription),
  /// A finalizer callable, run once when the owner unsubscribes.
  Finalizer(Box<dyn FnOnce() -> Result<(), BoxError>>),
}

impl Teardown {
  #[inline]
  pub fn none() -> Self { Teardown::None }

  /// Wraps an infallible cleanup closure.
  pub fn finalize(f: impl FnOnce() + 'static) -> Self {
    Teardown::Finalizer(Box::new(move || {
      f();
      Ok(())
    }))
  }

  /// Wraps a cleanup closure whose failure participates in teardown-error
  /// aggregation.
  pub fn try_finalize(f: impl FnOnce() -> Result<(), BoxError> + 'static) -> Self {
    Teardown::Finalizer(Box::new(f))
  }

  /// Whether this item is already spent and can be pruned without running.
  fn is_done(&self) -> bool {
    match self {
      Teardown::None => true,
      Teardown::Subscription(s) => s.is_closed(),
      Teardown::Finalizer(_) => false,
    }
  }

  fn run(self) -> Result<(), BoxError> {
    match self {
      Teardown::None => Ok(()),
      Teardown::Subscription(s) => s.try_unsubscribe().map_err(|e| Box::new(e) as BoxError),
      Teardown::Finalizer(f) => f(),
    }
  }
}

impl From<Subscription> for Teardown {
  fn from(s: Subscription) -> Self { Teardown::Subscription(s) }
}

struct Inner {
  closed: bool,
  teardown: SmallVec<[Teardown; 1]>,
}

/// A cancellable handle returned from `subscribe` and `schedule`.
///
/// Clones share state: closing any clone closes them all. Children never keep
/// a parent alive; ownership only flows downward.
#[derive(Clone, Default)]
pub struct Subscription(Rc<RefCell<Inner>>);

impl Default for Inner {
  fn default() -> Self { Inner { closed: false, teardown: SmallVec::new() } }
}

impl Subscription {
  pub fn new() -> Self { Self::default() }

  #[inline]
  pub fn is_closed(&self) -> bool { self.0.borrow().closed }

  /// Registers a teardown item, to be run on unsubscribe.
  ///
  /// If this subscription is already closed the item runs immediately instead
  /// of being stored; a late registration must not leak its resource. Adding
  /// a subscription to itself is a no-op.
  pub fn add(&self, teardown: impl Into<Teardown>) {
    let teardown = teardown.into();
    if let Teardown::Subscription(s) = &teardown {
      if Rc::ptr_eq(&self.0, &s.0) {
        return;
      }
    }
    {
      let mut inner = self.0.borrow_mut();
      if !inner.closed {
        inner.teardown.retain(|t| !t.is_done());
        inner.teardown.push(teardown);
        return;
      }
    }
    if let Err(err) = teardown.run() {
      error::report_unhandled(&err);
    }
  }

  /// Detaches a previously added child subscription without running it.
  pub fn remove(&self, child: &Subscription) {
    self
      .0
      .borrow_mut()
      .teardown
      .retain(|t| !matches!(t, Teardown::Subscription(s) if Rc::ptr_eq(&s.0, &child.0)));
  }

  /// Idempotent teardown. Failures are surfaced through the unhandled-error
  /// channel; use [`try_unsubscribe`](Self::try_unsubscribe) to receive them.
  pub fn unsubscribe(&self) {
    if let Err(err) = self.try_unsubscribe() {
      error::report_unhandled(&err);
    }
  }

  /// Idempotent teardown returning the aggregate of teardown failures.
  ///
  /// All items run in registration order even when earlier ones fail; a
  /// second call is a no-op returning `Ok`.
  pub fn try_unsubscribe(&self) -> Result<(), UnsubscribeError> {
    let items = {
      let mut inner = self.0.borrow_mut();
      if inner.closed {
        return Ok(());
      }
      inner.closed = true;
      std::mem::take(&mut inner.teardown)
    };
    let mut errors = Vec::new();
    for item in items {
      if let Err(err) = item.run() {
        errors.push(err);
      }
    }
    if errors.is_empty() { Ok(()) } else { Err(UnsubscribeError { errors }) }
  }

  /// Activates RAII behavior: `unsubscribe()` runs when the guard drops.
  pub fn unsubscribe_when_dropped(self) -> SubscriptionGuard { SubscriptionGuard(self) }

  #[cfg(test)]
  pub(crate) fn teardown_len(&self) -> usize { self.0.borrow().teardown.len() }
}

impl fmt::Debug for Subscription {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let inner = self.0.borrow();
    f.debug_struct("Subscription")
      .field("closed", &inner.closed)
      .field("teardown_count", &inner.teardown.len())
      .finish()
  }
}

/// An RAII wrapper over a [`Subscription`]: unsubscribes when dropped.
///
/// If you do not assign the guard to a variable it drops immediately and the
/// subscription ends on the spot, which is probably not what you want.
#[derive(Debug)]
#[must_use]
pub struct SubscriptionGuard(pub(crate) Subscription);

impl SubscriptionGuard {
  pub fn new(subscription: Subscription) -> Self { SubscriptionGuard(subscription) }

  /// Consumes the guard and returns the subscription without unsubscribing.
  pub fn into_inner(self) -> Subscription {
    let this = std::mem::ManuallyDrop::new(self);
    this.0.clone()
  }
}

impl Drop for SubscriptionGuard {
  #[inline]
  fn drop(&mut self) { self.0.unsubscribe() }
}

#[cfg(test)]
mod tests {
  use std::cell::Cell;

  use super::*;

  #[test]
  fn teardown_runs_once_in_order() {
    let order = Rc::new(RefCell::new(Vec::new()));
    let sub = Subscription::new();
    for i in 0..3 {
      let order = order.clone();
      sub.add(Teardown::finalize(move || order.borrow_mut().push(i)));
    }

    sub.unsubscribe();
    sub.unsubscribe();
    sub.unsubscribe();

    assert_eq!(*order.borrow(), vec![0, 1, 2]);
    assert!(sub.is_closed());
  }

  #[test]
  fn late_add_executes_immediately() {
    let ran = Rc::new(Cell::new(false));
    let sub = Subscription::new();
    sub.unsubscribe();

    let c_ran = ran.clone();
    sub.add(Teardown::finalize(move || c_ran.set(true)));
    assert!(ran.get());
  }

  #[test]
  fn nested_subscription_closed_with_parent() {
    let parent = Subscription::new();
    let child = Subscription::new();
    parent.add(child.clone());

    parent.unsubscribe();
    assert!(child.is_closed());
  }

  #[test]
  fn remove_detaches_without_running() {
    let ran = Rc::new(Cell::new(false));
    let parent = Subscription::new();
    let child = Subscription::new();
    let c_ran = ran.clone();
    child.add(Teardown::finalize(move || c_ran.set(true)));

    parent.add(child.clone());
    parent.remove(&child);
    parent.unsubscribe();

    assert!(!ran.get());
    assert!(!child.is_closed());
  }

  #[test]
  fn failing_teardown_does_not_stop_siblings() {
    let ran = Rc::new(Cell::new(0));
    let sub = Subscription::new();
    sub.add(Teardown::try_finalize(|| Err("boom1".into())));
    let c_ran = ran.clone();
    sub.add(Teardown::finalize(move || c_ran.set(c_ran.get() + 1)));
    sub.add(Teardown::try_finalize(|| Err("boom2".into())));

    let err = sub.try_unsubscribe().unwrap_err();
    assert_eq!(err.errors.len(), 2);
    assert_eq!(err.errors[0].to_string(), "boom1");
    assert_eq!(err.errors[1].to_string(), "boom2");
    assert_eq!(ran.get(), 1);
  }

  #[test]
  fn add_self_is_noop() {
    let sub = Subscription::new();
    sub.add(sub.clone());
    assert_eq!(sub.teardown_len(), 0);
    sub.unsubscribe();
  }

  #[test]
  fn closed_children_pruned_on_add() {
    let sub = Subscription::new();
    let c1 = Subscription::new();
    sub.add(c1.clone());
    c1.unsubscribe();
    sub.add(Subscription::new());
    assert_eq!(sub.teardown_len(), 1);
  }

  #[test]
  fn guard_unsubscribes_on_drop() {
    let sub = Subscription::new();
    {
      let _guard = sub.clone().unsubscribe_when_dropped();
    }
    assert!(sub.is_closed());
  }
}
