//! `BehaviorSubject`: a subject with a current value.

use std::{cell::RefCell, rc::Rc};

use crate::{
  observable::Observable,
  observer::Observer,
  subject::{Subject, Terminal},
  subscriber::Subscriber,
};

/// A [`Subject`] that stores the most recent value and hands it to every new
/// subscriber synchronously, before any live values.
pub struct BehaviorSubject<Item, Err> {
  subject: Subject<Item, Err>,
  value: Rc<RefCell<Item>>,
}

impl<Item, Err> Clone for BehaviorSubject<Item, Err> {
  fn clone(&self) -> Self {
    BehaviorSubject { subject: self.subject.clone(), value: self.value.clone() }
  }
}

impl<Item, Err> BehaviorSubject<Item, Err> {
  pub fn new(initial: Item) -> Self {
    BehaviorSubject {
      subject: Subject::new(),
      value: Rc::new(RefCell::new(initial)),
    }
  }

  pub fn subscriber_count(&self) -> usize { self.subject.subscriber_count() }

  /// The current value.
  ///
  /// After the subject terminated with an error, the stored value is stale
  /// and the terminal error is returned instead. After `complete`, the last
  /// value remains accessible.
  pub fn value(&self) -> Result<Item, Err>
  where
    Item: Clone,
    Err: Clone,
  {
    match self.subject.terminal() {
      Some(Terminal::Error(err)) => Err(err),
      _ => Ok(self.value.borrow().clone()),
    }
  }
}

impl<Item, Err> Observer for BehaviorSubject<Item, Err>
where
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  type Item = Item;
  type Err = Err;

  fn next(&mut self, value: Item) -> Result<(), Err> {
    if self.subject.is_terminated() {
      return Ok(());
    }
    *self.value.borrow_mut() = value.clone();
    self.subject.next(value)
  }

  fn error(&mut self, err: Err) { self.subject.error(err) }

  fn complete(&mut self) { self.subject.complete() }

  fn is_stopped(&self) -> bool { self.subject.is_stopped() }
}

impl<Item, Err> Observable for BehaviorSubject<Item, Err>
where
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  type Item = Item;
  type Err = Err;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<Item = Item, Err = Err> + 'static,
  {
    let mut subscriber = subscriber.into_dyn();
    match self.subject.terminal() {
      Some(Terminal::Error(err)) => subscriber.error(err),
      Some(Terminal::Complete) => subscriber.complete(),
      None => {
        self.subject.attach(subscriber.clone());
        let current = self.value.borrow().clone();
        let _ = subscriber.next(current);
      }
    }
  }
}
