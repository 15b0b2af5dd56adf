//! Sequential subscription: run the second source after the first completes.

use crate::{
  observable::{Observable, Operator},
  observer::Observer,
  subscriber::Subscriber,
  subscription::Subscription,
};

#[derive(Clone)]
pub struct ConcatOp<S2> {
  other: S2,
}

impl<S2> ConcatOp<S2> {
  pub(crate) fn new(other: S2) -> Self { ConcatOp { other } }
}

impl<S, S2> Operator<S> for ConcatOp<S2>
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
    let first = Subscription::new();
    root.add(first.clone());
    source.actual_subscribe(Subscriber::attach(
      ConcatObserver { dest: subscriber, other: Some(self.other), root },
      first,
    ));
  }
}

pub struct ConcatObserver<D, S2> {
  dest: D,
  other: Option<S2>,
  root: Subscription,
}

impl<D, S2> Observer for ConcatObserver<D, S2>
where
  D: Observer + Clone + 'static,
  S2: Observable<Item = D::Item, Err = D::Err> + 'static,
{
  type Item = D::Item;
  type Err = D::Err;

  #[inline]
  fn next(&mut self, value: Self::Item) -> Result<(), Self::Err> { self.dest.next(value) }

  fn error(&mut self, err: Self::Err) { self.dest.error(err) }

  fn complete(&mut self) {
    // the first source is done; hand the destination to the second
    if let Some(second) = self.other.take() {
      let next_sub = Subscription::new();
      self.root.add(next_sub.clone());
      second.actual_subscribe(Subscriber::attach(self.dest.clone(), next_sub));
    }
  }

  fn is_stopped(&self) -> bool { self.dest.is_stopped() }
}
