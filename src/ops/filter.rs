//! Keep only the values matching a predicate.

use crate::{
  observable::{Observable, Operator},
  observer::Observer,
  subscriber::Subscriber,
};

#[derive(Clone)]
pub struct FilterOp<F> {
  predicate: F,
}

impl<F> FilterOp<F> {
  pub(crate) fn new(predicate: F) -> Self { FilterOp { predicate } }
}

impl<S, F> Operator<S> for FilterOp<F>
where
  S: Observable,
  F: FnMut(&S::Item) -> bool + 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  fn call<O>(self, source: S, subscriber: Subscriber<O>)
  where
    O: Observer<Item = S::Item, Err = S::Err> + 'static,
  {
    let subscription = subscriber.subscription().clone();
    source.actual_subscribe(Subscriber::attach(
      FilterObserver { dest: subscriber, predicate: self.predicate },
      subscription,
    ));
  }
}

pub struct FilterObserver<D, F> {
  dest: D,
  predicate: F,
}

impl<D, F> Observer for FilterObserver<D, F>
where
  D: Observer,
  F: FnMut(&D::Item) -> bool,
{
  type Item = D::Item;
  type Err = D::Err;

  fn next(&mut self, value: Self::Item) -> Result<(), Self::Err> {
    if (self.predicate)(&value) { self.dest.next(value) } else { Ok(()) }
  }

  #[inline]
  fn error(&mut self, err: Self::Err) { self.dest.error(err) }

  #[inline]
  fn complete(&mut self) { self.dest.complete() }

  #[inline]
  fn is_stopped(&self) -> bool { self.dest.is_stopped() }
}
