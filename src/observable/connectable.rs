//! `ConnectableObservable`: multicasting with an explicit connection.
//!
//! Bridges a source Observable and a connector [`Subject`]. Downstream
//! subscribers attach to the connector; [`connect`](ConnectableObservable::connect)
//! subscribes the source into it, exactly once per connection. `ref_count`
//! automates connect/disconnect from the active-subscriber count.

use std::{
  cell::RefCell,
  rc::{Rc, Weak},
};

use crate::{
  observable::Observable,
  observer::Observer,
  ops::ref_count::RefCountObservable,
  subject::Subject,
  subscriber::Subscriber,
  subscription::{Subscription, Teardown},
};

struct ConnectableInner<S: Observable> {
  source: S,
  subject: Subject<S::Item, S::Err>,
  connection: Option<Subscription>,
  reset_on_disconnect: bool,
}

/// An Observable whose upstream subscription starts on `connect()` rather
/// than per-subscriber.
pub struct ConnectableObservable<S: Observable> {
  inner: Rc<RefCell<ConnectableInner<S>>>,
}

impl<S: Observable> Clone for ConnectableObservable<S> {
  fn clone(&self) -> Self { ConnectableObservable { inner: self.inner.clone() } }
}

impl<S: Observable> ConnectableObservable<S> {
  pub fn new(source: S) -> Self {
    ConnectableObservable {
      inner: Rc::new(RefCell::new(ConnectableInner {
        source,
        subject: Subject::new(),
        connection: None,
        reset_on_disconnect: true,
      })),
    }
  }

  /// Controls whether disconnecting discards the connector subject, so a
  /// later `connect()` restarts the source into a fresh one. On by default.
  pub fn reset_on_disconnect(self, reset: bool) -> Self {
    self.inner.borrow_mut().reset_on_disconnect = reset;
    self
  }

  /// The connector subject, usable as an Observable per subscriber.
  pub fn fork(&self) -> Subject<S::Item, S::Err> { self.inner.borrow().subject.clone() }

  pub fn is_connected(&self) -> bool {
    self.inner.borrow().connection.as_ref().map_or(false, |c| !c.is_closed())
  }

  pub(crate) fn disconnect(&self) {
    let connection = self.inner.borrow_mut().connection.take();
    if let Some(connection) = connection {
      connection.unsubscribe();
    }
  }
}

impl<S> ConnectableObservable<S>
where
  S: Observable + Clone + 'static,
  S::Item: Clone,
  S::Err: Clone,
{
  /// Subscribes the source into the connector subject.
  ///
  /// Idempotent while connected: returns the live connection unchanged.
  /// When the connection tears down, from either side, the stored
  /// connection is cleared so a later `connect()` starts a new one.
  pub fn connect(&self) -> Subscription {
    let (source, subject, connection) = {
      let mut inner = self.inner.borrow_mut();
      if let Some(connection) = &inner.connection {
        if !connection.is_closed() {
          return connection.clone();
        }
      }
      let connection = Subscription::new();
      inner.connection = Some(connection.clone());

      let weak: Weak<RefCell<ConnectableInner<S>>> = Rc::downgrade(&self.inner);
      connection.add(Teardown::finalize(move || {
        if let Some(inner) = weak.upgrade() {
          let mut inner = inner.borrow_mut();
          inner.connection = None;
          if inner.reset_on_disconnect {
            inner.subject = Subject::new();
          }
        }
      }));
      (inner.source.clone(), inner.subject.clone(), connection)
    };
    // Subscribe outside the borrow: a synchronous source emits (and may
    // terminate) during this call.
    source.actual_subscribe(Subscriber::attach(subject, connection.clone()));
    connection
  }

  /// Wraps this into an Observable that connects when its first subscriber
  /// arrives and disconnects when its last subscriber leaves.
  pub fn ref_count(self) -> RefCountObservable<S> { RefCountObservable::new(self) }
}

impl<S> Observable for ConnectableObservable<S>
where
  S: Observable,
  S::Item: Clone,
  S::Err: Clone,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<Item = S::Item, Err = S::Err> + 'static,
  {
    self.fork().actual_subscribe(subscriber)
  }
}
