//! Observables over in-memory values.

use std::convert::Infallible;

use crate::{observable::Observable, observer::Observer, subscriber::Subscriber};

/// Creates an Observable emitting every value of an iterator, then
/// completing. Never errors.
///
/// Emission stops early if the subscriber stops mid-burst (a downstream
/// `take`, an unsubscribe from inside a handler).
///
/// ```
/// use std::{cell::Cell, rc::Rc};
///
/// use rxcore::prelude::*;
///
/// let sum = Rc::new(Cell::new(0));
/// let sink = sum.clone();
/// from_iter(0..10).subscribe(move |v| sink.set(sink.get() + v));
/// # assert_eq!(sum.get(), 45);
/// ```
pub fn from_iter<I>(iter: I) -> FromIter<I>
where
  I: IntoIterator,
{
  FromIter(iter)
}

#[derive(Clone)]
pub struct FromIter<I>(I);

impl<I> Observable for FromIter<I>
where
  I: IntoIterator,
  I::Item: 'static,
{
  type Item = I::Item;
  type Err = Infallible;

  fn actual_subscribe<O>(self, mut subscriber: Subscriber<O>)
  where
    O: Observer<Item = I::Item, Err = Infallible> + 'static,
  {
    for value in self.0 {
      if subscriber.is_stopped() {
        return;
      }
      let _ = subscriber.next(value);
    }
    if !subscriber.is_stopped() {
      subscriber.complete();
    }
  }
}

/// Creates an Observable emitting a single value, then completing.
pub fn of<Item>(value: Item) -> OfObservable<Item> { OfObservable(value) }

#[derive(Clone)]
pub struct OfObservable<Item>(Item);

impl<Item: 'static> Observable for OfObservable<Item> {
  type Item = Item;
  type Err = Infallible;

  fn actual_subscribe<O>(self, mut subscriber: Subscriber<O>)
  where
    O: Observer<Item = Item, Err = Infallible> + 'static,
  {
    let _ = subscriber.next(self.0);
    if !subscriber.is_stopped() {
      subscriber.complete();
    }
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use super::*;
  use crate::prelude::*;

  #[test]
  fn emits_all_then_completes() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let completed = Rc::new(RefCell::new(false));
    let (c_seen, c_completed) = (seen.clone(), completed.clone());
    from_iter(vec!['a', 'b', 'c']).subscribe_all(
      move |v| c_seen.borrow_mut().push(v),
      |_| {},
      move || *c_completed.borrow_mut() = true,
    );
    assert_eq!(*seen.borrow(), vec!['a', 'b', 'c']);
    assert!(*completed.borrow());
  }

  #[test]
  fn of_emits_single_value() {
    let got = Rc::new(RefCell::new(None));
    let c_got = got.clone();
    of(42).subscribe(move |v| *c_got.borrow_mut() = Some(v));
    assert_eq!(*got.borrow(), Some(42));
  }

  #[test]
  fn stops_mid_burst_when_unsubscribed_from_inside_next() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let c_seen = seen.clone();
    let handle = Subscription::new();
    let c_handle = handle.clone();
    let subscriber = Subscriber::attach(
      crate::observer::FnObserver::<_, i32, Infallible>::new(move |v| {
        c_seen.borrow_mut().push(v);
        if v == 2 {
          c_handle.unsubscribe();
        }
      }),
      handle,
    );
    from_iter(0..100).actual_subscribe(subscriber);
    assert_eq!(*seen.borrow(), vec![0, 1, 2]);
  }
}
