//! `ReplaySubject`: a subject with a bounded replay buffer.

use std::{
  cell::RefCell,
  collections::VecDeque,
  rc::Rc,
  time::{Duration, Instant},
};

use crate::{
  observable::Observable,
  observer::Observer,
  scheduler::Scheduler,
  subject::{Subject, Terminal},
  subscriber::Subscriber,
};

/// A [`Subject`] that buffers past values, bounded by count and optionally
/// by age, and replays the buffer, oldest first, to every new subscriber
/// before live values.
///
/// The buffer is trimmed on every `next` (and on subscribe when a time window
/// is configured), so `ReplaySubject::new(3)` holds at most three values. Age
/// is measured against the clock of the scheduler passed to
/// [`with_window`](ReplaySubject::with_window); wall-clock by default.
pub struct ReplaySubject<Item, Err> {
  subject: Subject<Item, Err>,
  buffer: Rc<RefCell<VecDeque<(Instant, Item)>>>,
  max_len: usize,
  window: Option<Duration>,
  clock: Rc<dyn Fn() -> Instant>,
}

impl<Item, Err> Clone for ReplaySubject<Item, Err> {
  fn clone(&self) -> Self {
    ReplaySubject {
      subject: self.subject.clone(),
      buffer: self.buffer.clone(),
      max_len: self.max_len,
      window: self.window,
      clock: self.clock.clone(),
    }
  }
}

impl<Item, Err> ReplaySubject<Item, Err> {
  /// A replay buffer bounded by count only.
  pub fn new(max_len: usize) -> Self {
    ReplaySubject {
      subject: Subject::new(),
      buffer: Rc::new(RefCell::new(VecDeque::new())),
      max_len,
      window: None,
      clock: Rc::new(Instant::now),
    }
  }

  /// An unbounded replay buffer.
  pub fn unbounded() -> Self { Self::new(usize::MAX) }

  /// A replay buffer bounded by count and by age, timed on `scheduler`.
  pub fn with_window<S>(max_len: usize, window: Duration, scheduler: S) -> Self
  where
    S: Scheduler + 'static,
  {
    let mut subject = Self::new(max_len);
    subject.window = Some(window);
    subject.clock = Rc::new(move || scheduler.now());
    subject
  }

  pub fn subscriber_count(&self) -> usize { self.subject.subscriber_count() }

  fn trim(&self) {
    let mut buffer = self.buffer.borrow_mut();
    while buffer.len() > self.max_len {
      buffer.pop_front();
    }
    if let Some(window) = self.window {
      let now = (self.clock)();
      while buffer.front().map_or(false, |(at, _)| now.duration_since(*at) > window) {
        buffer.pop_front();
      }
    }
  }
}

impl<Item, Err> Observer for ReplaySubject<Item, Err>
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
    self.buffer.borrow_mut().push_back(((self.clock)(), value.clone()));
    self.trim();
    self.subject.next(value)
  }

  fn error(&mut self, err: Err) { self.subject.error(err) }

  fn complete(&mut self) { self.subject.complete() }

  fn is_stopped(&self) -> bool { self.subject.is_stopped() }
}

impl<Item, Err> Observable for ReplaySubject<Item, Err>
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
    self.trim();
    let replay: Vec<Item> = self.buffer.borrow().iter().map(|(_, v)| v.clone()).collect();
    let terminal = self.subject.terminal();
    if terminal.is_none() {
      self.subject.attach(subscriber.clone());
    }
    for value in replay {
      let _ = subscriber.next(value);
    }
    match terminal {
      Some(Terminal::Error(err)) => subscriber.error(err),
      Some(Terminal::Complete) => subscriber.complete(),
      None => {}
    }
  }
}
