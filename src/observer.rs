//! Observer trait and closure adapters.
//!
//! An [`Observer`] consumes `next`, `error`, and `complete` notifications.
//! `next` is fallible: a handler that cannot accept a value returns its error,
//! and the enclosing [`Subscriber`](crate::subscriber::Subscriber) routes it
//! to the `error` path exactly once. Every shape of consumer callers can
//! supply (a bare closure, a fallible closure, a partial set of handlers) is
//! normalized into one of the adapters below at the subscribe boundary.

use std::{fmt::Debug, marker::PhantomData};

use crate::error;

/// The consumer side of a stream.
pub trait Observer {
  type Item: 'static;
  type Err: 'static;

  /// Receives the next value. An `Err` return is a consumer failure the
  /// enclosing subscriber converts into an `error` notification.
  fn next(&mut self, value: Self::Item) -> Result<(), Self::Err>;

  /// Receives the stream's failure notification.
  fn error(&mut self, err: Self::Err);

  /// Receives the stream's completion notification.
  fn complete(&mut self);

  /// `true` once this observer will not accept further values. Sources use
  /// it to stop emitting early during a synchronous burst.
  fn is_stopped(&self) -> bool { false }
}

impl<Item: 'static, Err: 'static> Observer for Box<dyn Observer<Item = Item, Err = Err>> {
  type Item = Item;
  type Err = Err;

  #[inline]
  fn next(&mut self, value: Item) -> Result<(), Err> { (**self).next(value) }

  #[inline]
  fn error(&mut self, err: Err) { (**self).error(err) }

  #[inline]
  fn complete(&mut self) { (**self).complete() }

  #[inline]
  fn is_stopped(&self) -> bool { (**self).is_stopped() }
}

/// Observer from a bare `next` closure. Errors have no handler and are
/// surfaced through the unhandled-error channel.
pub struct FnObserver<N, Item, Err> {
  next: N,
  _hint: PhantomData<(Item, Err)>,
}

impl<N, Item, Err> FnObserver<N, Item, Err> {
  pub fn new(next: N) -> Self { FnObserver { next, _hint: PhantomData } }
}

impl<N, Item, Err> Observer for FnObserver<N, Item, Err>
where
  N: FnMut(Item),
  Item: 'static,
  Err: Debug + 'static,
{
  type Item = Item;
  type Err = Err;

  #[inline]
  fn next(&mut self, value: Item) -> Result<(), Err> {
    (self.next)(value);
    Ok(())
  }

  fn error(&mut self, err: Err) { error::report_unhandled(&err); }

  fn complete(&mut self) {}
}

/// Observer from a fallible `next` closure; the closure's `Err` becomes the
/// stream's error notification.
pub struct TryFnObserver<N, Item, Err> {
  next: N,
  _hint: PhantomData<(Item, Err)>,
}

impl<N, Item, Err> TryFnObserver<N, Item, Err> {
  pub fn new(next: N) -> Self { TryFnObserver { next, _hint: PhantomData } }
}

impl<N, Item, Err> Observer for TryFnObserver<N, Item, Err>
where
  N: FnMut(Item) -> Result<(), Err>,
  Item: 'static,
  Err: Debug + 'static,
{
  type Item = Item;
  type Err = Err;

  #[inline]
  fn next(&mut self, value: Item) -> Result<(), Err> { (self.next)(value) }

  fn error(&mut self, err: Err) { error::report_unhandled(&err); }

  fn complete(&mut self) {}
}

/// Observer assembled from up to three handlers. Construct through the
/// `subscribe_*` methods rather than directly.
pub struct AllObserver<N, E, C, Item, Err> {
  pub next: N,
  pub error: E,
  pub complete: C,
  _hint: PhantomData<(Item, Err)>,
}

impl<N, E, C, Item, Err> AllObserver<N, E, C, Item, Err> {
  pub fn new(next: N, error: E, complete: C) -> Self {
    AllObserver { next, error, complete, _hint: PhantomData }
  }
}

impl<N, E, C, Item, Err> Observer for AllObserver<N, E, C, Item, Err>
where
  N: FnMut(Item),
  E: FnMut(Err),
  C: FnMut(),
  Item: 'static,
  Err: 'static,
{
  type Item = Item;
  type Err = Err;

  #[inline]
  fn next(&mut self, value: Item) -> Result<(), Err> {
    (self.next)(value);
    Ok(())
  }

  #[inline]
  fn error(&mut self, err: Err) { (self.error)(err) }

  #[inline]
  fn complete(&mut self) { (self.complete)() }
}
