//! `defer`: build the source lazily, once per subscriber.

use crate::{observable::Observable, observer::Observer, subscriber::Subscriber};

/// Creates an Observable that calls `factory` for every subscriber and
/// subscribes to the Observable it returns.
///
/// ```
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxcore::prelude::*;
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = seen.clone();
/// defer(|| of(5)).subscribe(move |v| sink.borrow_mut().push(v));
/// # assert_eq!(*seen.borrow(), vec![5]);
/// ```
pub fn defer<F, S>(factory: F) -> Defer<F>
where
  F: FnOnce() -> S,
  S: Observable,
{
  Defer(factory)
}

#[derive(Clone)]
pub struct Defer<F>(F);

impl<F, S> Observable for Defer<F>
where
  F: FnOnce() -> S,
  S: Observable,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<Item = S::Item, Err = S::Err> + 'static,
  {
    (self.0)().actual_subscribe(subscriber)
  }
}
