//! Emit the first N values, then complete and cancel upstream.
//!
//! The interesting part of `take` is cancellation from inside a synchronous
//! emission burst: completing the destination closes the shared subscription,
//! which the upstream source observes through `is_stopped` and stops
//! emitting, without re-entering teardown.

use crate::{
  observable::{Observable, Operator},
  observer::Observer,
  subscriber::Subscriber,
};

#[derive(Clone)]
pub struct TakeOp {
  count: usize,
}

impl TakeOp {
  pub(crate) fn new(count: usize) -> Self { TakeOp { count } }
}

impl<S> Operator<S> for TakeOp
where
  S: Observable,
{
  type Item = S::Item;
  type Err = S::Err;

  fn call<O>(self, source: S, mut subscriber: Subscriber<O>)
  where
    O: Observer<Item = S::Item, Err = S::Err> + 'static,
  {
    if self.count == 0 {
      subscriber.complete();
      return;
    }
    let subscription = subscriber.subscription().clone();
    source.actual_subscribe(Subscriber::attach(
      TakeObserver { dest: subscriber, remaining: self.count },
      subscription,
    ));
  }
}

pub struct TakeObserver<D> {
  dest: D,
  remaining: usize,
}

impl<D: Observer> Observer for TakeObserver<D> {
  type Item = D::Item;
  type Err = D::Err;

  fn next(&mut self, value: Self::Item) -> Result<(), Self::Err> {
    if self.remaining == 0 {
      return Ok(());
    }
    self.remaining -= 1;
    let result = self.dest.next(value);
    if self.remaining == 0 {
      self.dest.complete();
    }
    result
  }

  #[inline]
  fn error(&mut self, err: Self::Err) { self.dest.error(err) }

  #[inline]
  fn complete(&mut self) { self.dest.complete() }

  fn is_stopped(&self) -> bool { self.remaining == 0 || self.dest.is_stopped() }
}

#[cfg(test)]
mod tests {
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  use crate::prelude::*;

  #[test]
  fn takes_then_completes() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let completed = Rc::new(RefCell::new(false));
    let (c_seen, c_completed) = (seen.clone(), completed.clone());
    from_iter(0..100).take(5).subscribe_all(
      move |v| c_seen.borrow_mut().push(v),
      |_| {},
      move || *c_completed.borrow_mut() = true,
    );
    assert_eq!(*seen.borrow(), vec![0, 1, 2, 3, 4]);
    assert!(*completed.borrow());
  }

  #[test]
  fn upstream_stops_mid_burst() {
    let emitted = Rc::new(Cell::new(0));
    let c_emitted = emitted.clone();
    create(move |mut s: DynSubscriber<i32, ()>| {
      for v in 0.. {
        if s.is_stopped() {
          break;
        }
        c_emitted.set(c_emitted.get() + 1);
        s.next(v)?;
      }
      Ok(Teardown::none())
    })
    .take(3)
    .subscribe_err(|_| {}, |_| {});

    // the source observed the stop right after the third value
    assert_eq!(emitted.get(), 3);
  }

  #[test]
  fn take_zero_completes_without_subscribing_upstream() {
    let subscribed = Rc::new(Cell::new(false));
    let c_subscribed = subscribed.clone();
    let completed = Rc::new(Cell::new(false));
    let c_completed = completed.clone();
    create(move |_s: DynSubscriber<i32, ()>| {
      c_subscribed.set(true);
      Ok(Teardown::none())
    })
    .take(0)
    .subscribe_all(|_| {}, |_| {}, move || c_completed.set(true));

    assert!(!subscribed.get());
    assert!(completed.get());
  }
}
