//! Transform every value with a closure.

use std::marker::PhantomData;

use crate::{
  observable::{Observable, Operator},
  observer::Observer,
  subscriber::Subscriber,
};

pub struct MapOp<F, B> {
  func: F,
  _hint: PhantomData<B>,
}

impl<F: Clone, B> Clone for MapOp<F, B> {
  fn clone(&self) -> Self { MapOp { func: self.func.clone(), _hint: PhantomData } }
}

impl<F, B> MapOp<F, B> {
  pub(crate) fn new(func: F) -> Self { MapOp { func, _hint: PhantomData } }
}

impl<S, F, B> Operator<S> for MapOp<F, B>
where
  S: Observable,
  F: FnMut(S::Item) -> B + 'static,
  B: 'static,
{
  type Item = B;
  type Err = S::Err;

  fn call<O>(self, source: S, subscriber: Subscriber<O>)
  where
    O: Observer<Item = B, Err = S::Err> + 'static,
  {
    let subscription = subscriber.subscription().clone();
    source.actual_subscribe(Subscriber::attach(
      MapObserver { dest: subscriber, func: self.func, _hint: PhantomData },
      subscription,
    ));
  }
}

pub struct MapObserver<D, F, Item> {
  dest: D,
  func: F,
  _hint: PhantomData<Item>,
}

impl<D, F, Item> Observer for MapObserver<D, F, Item>
where
  D: Observer,
  F: FnMut(Item) -> D::Item,
  Item: 'static,
{
  type Item = Item;
  type Err = D::Err;

  #[inline]
  fn next(&mut self, value: Item) -> Result<(), Self::Err> { self.dest.next((self.func)(value)) }

  #[inline]
  fn error(&mut self, err: Self::Err) { self.dest.error(err) }

  #[inline]
  fn complete(&mut self) { self.dest.complete() }

  #[inline]
  fn is_stopped(&self) -> bool { self.dest.is_stopped() }
}
