//! Concurrent subscription: interleave two sources into one stream.
//!
//! Each upstream gets its own child subscription under the downstream's, so
//! one branch finishing never tears the other down; the merged stream
//! completes when both branches have completed, and the first error stops
//! everything. Delivery is serialized trivially here: both branches emit on
//! the single logical thread straight into the shared destination.

use std::{cell::Cell, rc::Rc};

use crate::{
  observable::{Observable, Operator},
  observer::Observer,
  subscriber::Subscriber,
  subscription::Subscription,
};

#[derive(Clone)]
pub struct MergeOp<S2> {
  other: S2,
}

impl<S2> MergeOp<S2> {
  pub(crate) fn new(other: S2) -> Self { MergeOp { other } }
}

impl<S, S2> Operator<S> for MergeOp<S2>
where
  S: Observable,
  S2: Observable<Item = S::Item, Err = S::Err> + 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  fn call<O>(self, source: S, subscriber: Subscriber<O>)
  where
    O: Observer<Item = S::Item, Err = S::Err> + 'static,
  {
    let root = subscriber.subscription().clone();
    let active = Rc::new(Cell::new(2usize));

    let sub_a = Subscription::new();
    root.add(sub_a.clone());
    let sub_b = Subscription::new();
    root.add(sub_b.clone());

    let branch_a = MergeObserver { dest: subscriber.clone(), active: active.clone() };
    let branch_b = MergeObserver { dest: subscriber, active };

    source.actual_subscribe(Subscriber::attach(branch_a, sub_a));
    self.other.actual_subscribe(Subscriber::attach(branch_b, sub_b));
  }
}

pub struct MergeObserver<D> {
  dest: D,
  active: Rc<Cell<usize>>,
}

impl<D: Observer> Observer for MergeObserver<D> {
  type Item = D::Item;
  type Err = D::Err;

  #[inline]
  fn next(&mut self, value: Self::Item) -> Result<(), Self::Err> { self.dest.next(value) }

  fn error(&mut self, err: Self::Err) { self.dest.error(err) }

  fn complete(&mut self) {
    self.active.set(self.active.get() - 1);
    if self.active.get() == 0 {
      self.dest.complete();
    }
  }

  fn is_stopped(&self) -> bool { self.dest.is_stopped() }
}
