//! Subscriber: an Observer fused with a Subscription.
//!
//! Every observer handed to `subscribe` is wrapped in a [`Subscriber`], which
//! enforces the delivery state machine: after a terminal notification or an
//! unsubscribe, nothing is forwarded again. "Stopped" (no more delivery) is
//! tracked separately from "closed" (teardown has run): the observer slot
//! empties the instant a terminal notification is taken, then teardown runs,
//! so in-flight synchronous delivery finishes without re-entering itself.

use std::{cell::RefCell, rc::Rc};

use crate::{
  config::{self, StoppedNotification},
  observer::Observer,
  subscription::Subscription,
};

/// An [`Observer`] bound to a [`Subscription`].
///
/// Clones share both the observer slot and the subscription, so an operator
/// can hold one clone as its downstream destination while the subscription
/// handle lives with the caller.
pub struct Subscriber<O> {
  observer: Rc<RefCell<Option<O>>>,
  subscription: Subscription,
}

/// A type-erased subscriber, the canonical shape at dynamic boundaries
/// (subjects and `create` recipes).
pub type DynSubscriber<Item, Err> = Subscriber<Box<dyn Observer<Item = Item, Err = Err>>>;

impl<O> Clone for Subscriber<O> {
  fn clone(&self) -> Self {
    Subscriber {
      observer: self.observer.clone(),
      subscription: self.subscription.clone(),
    }
  }
}

impl<O: Observer> Subscriber<O> {
  /// Wraps `observer` with a fresh subscription.
  pub fn new(observer: O) -> Self { Self::attach(observer, Subscription::new()) }

  /// Wraps `observer` sharing an existing subscription. This is the chaining
  /// primitive operators use: the new subscriber and its destination tear
  /// down together.
  pub fn attach(observer: O, subscription: Subscription) -> Self {
    Subscriber {
      observer: Rc::new(RefCell::new(Some(observer))),
      subscription,
    }
  }

  pub fn subscription(&self) -> &Subscription { &self.subscription }

  /// Moves the observer behind a vtable, keeping the shared subscription.
  ///
  /// Intended for the subscribe boundary, before any clone of `self` exists.
  pub fn into_dyn(self) -> DynSubscriber<O::Item, O::Err>
  where
    O: 'static,
  {
    let observer = self.observer.borrow_mut().take();
    Subscriber {
      observer: Rc::new(RefCell::new(
        observer.map(|o| Box::new(o) as Box<dyn Observer<Item = O::Item, Err = O::Err>>),
      )),
      subscription: self.subscription.clone(),
    }
  }
}

impl<O: Observer> Observer for Subscriber<O> {
  type Item = O::Item;
  type Err = O::Err;

  fn next(&mut self, value: Self::Item) -> Result<(), Self::Err> {
    if self.is_stopped() {
      return Ok(());
    }
    let result = {
      let mut slot = self
        .observer
        .try_borrow_mut()
        .expect("re-entrant delivery on the same subscriber");
      match slot.as_mut() {
        Some(observer) => observer.next(value),
        None => return Ok(()),
      }
    };
    // A consumer failure becomes this stream's error notification, once.
    if let Err(err) = result {
      self.error(err);
    }
    Ok(())
  }

  fn error(&mut self, err: Self::Err) {
    if self.is_stopped() {
      config::notify_stopped(StoppedNotification::Error);
      return;
    }
    let observer = self.observer.borrow_mut().take();
    if let Some(mut observer) = observer {
      observer.error(err);
    }
    self.subscription.unsubscribe();
  }

  fn complete(&mut self) {
    if self.is_stopped() {
      config::notify_stopped(StoppedNotification::Complete);
      return;
    }
    let observer = self.observer.borrow_mut().take();
    if let Some(mut observer) = observer {
      observer.complete();
    }
    self.subscription.unsubscribe();
  }

  fn is_stopped(&self) -> bool {
    if self.subscription.is_closed() {
      return true;
    }
    match self.observer.try_borrow() {
      Ok(slot) => match slot.as_ref() {
        Some(observer) => observer.is_stopped(),
        None => true,
      },
      // The slot is borrowed by an in-flight `next` on this subscriber.
      Err(_) => false,
    }
  }
}
