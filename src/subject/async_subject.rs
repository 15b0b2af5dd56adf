//! `AsyncSubject`: emits only its final value, on completion.

use std::{cell::RefCell, rc::Rc};

use crate::{
  observable::Observable,
  observer::Observer,
  subject::{Subject, Terminal},
  subscriber::Subscriber,
};

/// A [`Subject`] that remembers only the most recent value and emits it,
/// followed by completion, when `complete` is called. An error discards the
/// buffered value.
pub struct AsyncSubject<Item, Err> {
  subject: Subject<Item, Err>,
  last: Rc<RefCell<Option<Item>>>,
}

impl<Item, Err> Clone for AsyncSubject<Item, Err> {
  fn clone(&self) -> Self {
    AsyncSubject { subject: self.subject.clone(), last: self.last.clone() }
  }
}

impl<Item, Err> Default for AsyncSubject<Item, Err> {
  fn default() -> Self {
    AsyncSubject { subject: Subject::new(), last: Rc::new(RefCell::new(None)) }
  }
}

impl<Item, Err> AsyncSubject<Item, Err> {
  pub fn new() -> Self { Self::default() }

  pub fn subscriber_count(&self) -> usize { self.subject.subscriber_count() }
}

impl<Item, Err> Observer for AsyncSubject<Item, Err>
where
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  type Item = Item;
  type Err = Err;

  fn next(&mut self, value: Item) -> Result<(), Err> {
    if !self.subject.is_terminated() {
      *self.last.borrow_mut() = Some(value);
    }
    Ok(())
  }

  fn error(&mut self, err: Err) {
    // the buffered value is suppressed
    *self.last.borrow_mut() = None;
    self.subject.error(err);
  }

  fn complete(&mut self) {
    if self.subject.is_terminated() {
      return;
    }
    let last = self.last.borrow().clone();
    if let Some(value) = last {
      let _ = self.subject.next(value);
    }
    self.subject.complete();
  }

  fn is_stopped(&self) -> bool { self.subject.is_stopped() }
}

impl<Item, Err> Observable for AsyncSubject<Item, Err>
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
      Some(Terminal::Complete) => {
        let last = self.last.borrow().clone();
        if let Some(value) = last {
          let _ = subscriber.next(value);
        }
        subscriber.complete();
      }
      None => self.subject.attach(subscriber),
    }
  }
}
