//! Subjects: Observables that are also Observers.
//!
//! A [`Subject`] multicasts one upstream execution to many downstream
//! subscribers. Fan-out works over a snapshot of the observer set taken at
//! call time, so subscribing or unsubscribing from inside a callback is safe:
//! a subscriber added during fan-out misses the in-flight value, one removed
//! during fan-out receives nothing further from the same pass.

use std::{cell::RefCell, rc::Rc};

pub mod async_subject;
pub mod behavior;
pub mod replay;

pub use async_subject::AsyncSubject;
pub use behavior::BehaviorSubject;
pub use replay::ReplaySubject;

use crate::{
  observable::Observable,
  observer::Observer,
  subscriber::{DynSubscriber, Subscriber},
  subscription::Teardown,
};

/// A recorded terminal notification, replayed to late subscribers.
#[derive(Clone)]
pub(crate) enum Terminal<Err> {
  Error(Err),
  Complete,
}

struct SubjectCore<Item, Err> {
  observers: Vec<(usize, DynSubscriber<Item, Err>)>,
  next_id: usize,
  terminal: Option<Terminal<Err>>,
}

impl<Item, Err> Default for SubjectCore<Item, Err> {
  fn default() -> Self { SubjectCore { observers: Vec::new(), next_id: 0, terminal: None } }
}

/// A plain multicast subject with no replay behavior.
///
/// Clones share state; clone freely to split the producer and consumer sides.
pub struct Subject<Item, Err> {
  core: Rc<RefCell<SubjectCore<Item, Err>>>,
}

impl<Item, Err> Clone for Subject<Item, Err> {
  fn clone(&self) -> Self { Subject { core: self.core.clone() } }
}

impl<Item, Err> Default for Subject<Item, Err> {
  fn default() -> Self { Subject { core: Rc::new(RefCell::new(SubjectCore::default())) } }
}

impl<Item, Err> Subject<Item, Err> {
  pub fn new() -> Self { Self::default() }

  /// Number of currently attached subscribers.
  pub fn subscriber_count(&self) -> usize { self.core.borrow().observers.len() }

  pub fn is_empty(&self) -> bool { self.subscriber_count() == 0 }

  /// `true` once `error` or `complete` has been recorded.
  pub fn is_terminated(&self) -> bool { self.core.borrow().terminal.is_some() }

  pub(crate) fn terminal(&self) -> Option<Terminal<Err>>
  where
    Err: Clone,
  {
    self.core.borrow().terminal.clone()
  }

  /// Snapshot of the observer set, taken under a short borrow so delivery
  /// happens with the set unlocked.
  fn snapshot(&self) -> Vec<DynSubscriber<Item, Err>> {
    self.core.borrow().observers.iter().map(|(_, s)| s.clone()).collect()
  }

  /// Attaches an already-erased subscriber and arranges its removal on
  /// unsubscribe. Callers have checked the terminal state.
  pub(crate) fn attach(&self, subscriber: DynSubscriber<Item, Err>)
  where
    Item: 'static,
    Err: 'static,
  {
    let id = {
      let mut core = self.core.borrow_mut();
      let id = core.next_id;
      core.next_id += 1;
      core.observers.push((id, subscriber.clone()));
      id
    };
    let core = Rc::downgrade(&self.core);
    subscriber.subscription().add(Teardown::finalize(move || {
      if let Some(core) = core.upgrade() {
        core.borrow_mut().observers.retain(|(i, _)| *i != id);
      }
    }));
  }
}

impl<Item, Err> Observer for Subject<Item, Err>
where
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  type Item = Item;
  type Err = Err;

  fn next(&mut self, value: Item) -> Result<(), Err> {
    if self.is_terminated() {
      return Ok(());
    }
    let mut iter = self.snapshot().into_iter().peekable();
    while let Some(mut observer) = iter.next() {
      if iter.peek().is_some() {
        let _ = observer.next(value.clone());
      } else {
        // last observer takes the moved value
        let _ = observer.next(value);
        break;
      }
    }
    Ok(())
  }

  fn error(&mut self, err: Err) {
    let drained = {
      let mut core = self.core.borrow_mut();
      if core.terminal.is_some() {
        return;
      }
      core.terminal = Some(Terminal::Error(err.clone()));
      std::mem::take(&mut core.observers)
    };
    for (_, mut observer) in drained {
      observer.error(err.clone());
    }
  }

  fn complete(&mut self) {
    let drained = {
      let mut core = self.core.borrow_mut();
      if core.terminal.is_some() {
        return;
      }
      core.terminal = Some(Terminal::Complete);
      std::mem::take(&mut core.observers)
    };
    for (_, mut observer) in drained {
      observer.complete();
    }
  }

  fn is_stopped(&self) -> bool { self.is_terminated() }
}

impl<Item, Err> Observable for Subject<Item, Err>
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
    match self.terminal() {
      Some(Terminal::Error(err)) => subscriber.error(err),
      Some(Terminal::Complete) => subscriber.complete(),
      None => self.attach(subscriber),
    }
  }
}
