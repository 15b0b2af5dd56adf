//! Subscriber-counted sharing over a ConnectableObservable.
//!
//! The first downstream subscriber triggers `connect()`; the unsubscribe
//! that brings the active count back to zero disconnects the source. The
//! count increments before delivery starts and decrements as part of the
//! subscriber's own teardown, so synchronous subscribe-then-unsubscribe
//! sequences stay balanced.

use std::{cell::Cell, rc::Rc};

use crate::{
  observable::{ConnectableObservable, Observable},
  observer::Observer,
  subscriber::Subscriber,
  subscription::Teardown,
};

/// The Observable returned by
/// [`ConnectableObservable::ref_count`](crate::observable::ConnectableObservable::ref_count).
pub struct RefCountObservable<S: Observable> {
  connectable: ConnectableObservable<S>,
  count: Rc<Cell<usize>>,
}

impl<S: Observable> Clone for RefCountObservable<S> {
  fn clone(&self) -> Self {
    RefCountObservable { connectable: self.connectable.clone(), count: self.count.clone() }
  }
}

impl<S: Observable> RefCountObservable<S> {
  pub(crate) fn new(connectable: ConnectableObservable<S>) -> Self {
    RefCountObservable { connectable, count: Rc::new(Cell::new(0)) }
  }

  /// Active downstream subscribers.
  pub fn subscriber_count(&self) -> usize { self.count.get() }
}

impl<S> Observable for RefCountObservable<S>
where
  S: Observable + Clone + 'static,
  S::Item: Clone,
  S::Err: Clone,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<Item = S::Item, Err = S::Err> + 'static,
  {
    let count = self.count.clone();
    count.set(count.get() + 1);

    let connectable = self.connectable.clone();
    subscriber.subscription().add(Teardown::finalize({
      let count = count.clone();
      let connectable = connectable.clone();
      move || {
        count.set(count.get().saturating_sub(1));
        if count.get() == 0 {
          connectable.disconnect();
        }
      }
    }));

    self.connectable.fork().actual_subscribe(subscriber);

    // connect after attaching, unless the subscriber already tore down
    // synchronously and took the count back to zero
    if count.get() > 0 {
      let _ = connectable.connect();
    }
  }
}

#[cfg(test)]
mod tests {
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  use super::*;
  use crate::prelude::*;

  /// A source that counts its subscriptions and teardowns.
  fn probed_source(
    subscribes: Rc<Cell<usize>>,
    teardowns: Rc<Cell<usize>>,
  ) -> impl Observable<Item = i32, Err = ()> + Clone {
    create(move |s: DynSubscriber<i32, ()>| {
      subscribes.set(subscribes.get() + 1);
      let teardowns = teardowns.clone();
      let _ = s;
      Ok(Teardown::finalize(move || {
        teardowns.set(teardowns.get() + 1)
      }))
    })
  }

  #[test]
  fn first_subscriber_connects_last_disconnects() {
    let subscribes = Rc::new(Cell::new(0));
    let teardowns = Rc::new(Cell::new(0));
    let shared = probed_source(subscribes.clone(), teardowns.clone())
      .publish()
      .ref_count();

    let s1 = shared.clone().subscribe_err(|_| {}, |_| {});
    assert_eq!(subscribes.get(), 1);
    let s2 = shared.clone().subscribe_err(|_| {}, |_| {});
    assert_eq!(subscribes.get(), 1);
    assert_eq!(shared.subscriber_count(), 2);

    s1.unsubscribe();
    assert_eq!(teardowns.get(), 0);
    s2.unsubscribe();
    assert_eq!(teardowns.get(), 1);
    assert_eq!(shared.subscriber_count(), 0);
  }

  #[test]
  fn resubscription_reconnects_once() {
    let subscribes = Rc::new(Cell::new(0));
    let teardowns = Rc::new(Cell::new(0));
    let shared = probed_source(subscribes.clone(), teardowns.clone())
      .publish()
      .ref_count();

    let s1 = shared.clone().subscribe_err(|_| {}, |_| {});
    s1.unsubscribe();
    assert_eq!((subscribes.get(), teardowns.get()), (1, 1));

    let s2 = shared.clone().subscribe_err(|_| {}, |_| {});
    assert_eq!((subscribes.get(), teardowns.get()), (2, 1));
    s2.unsubscribe();
    assert_eq!((subscribes.get(), teardowns.get()), (2, 2));
  }

  #[test]
  fn shared_values_reach_all_active_subscribers() {
    let upstream = Subject::<i32, ()>::new();
    let shared = upstream.clone().publish().ref_count();

    let (a, b) = (Rc::new(RefCell::new(Vec::new())), Rc::new(RefCell::new(Vec::new())));
    let c_a = a.clone();
    let s1 = shared.clone().subscribe_err(move |v| c_a.borrow_mut().push(v), |_| {});
    let c_b = b.clone();
    let _s2 = shared.clone().subscribe_err(move |v| c_b.borrow_mut().push(v), |_| {});

    assert_eq!(upstream.subscriber_count(), 1);

    let mut producer = upstream.clone();
    producer.next(1).unwrap();
    s1.unsubscribe();
    producer.next(2).unwrap();

    assert_eq!(*a.borrow(), vec![1]);
    assert_eq!(*b.borrow(), vec![1, 2]);
    // one subscriber still active: upstream stays connected
    assert_eq!(upstream.subscriber_count(), 1);
  }
}
