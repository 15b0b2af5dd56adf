//! Time-shift values and completion through a scheduler.
//!
//! Each pending delivery is an ordinary scheduled action racing the
//! subscription: the action handle is registered as child teardown, so
//! unsubscribing the stream cancels everything still in flight. Errors are
//! not delayed.

use std::time::Duration;

use crate::{
  observable::{Observable, Operator},
  observer::Observer,
  scheduler::Scheduler,
  subscriber::Subscriber,
  subscription::Subscription,
};

#[derive(Clone)]
pub struct DelayOp<Sch> {
  delay: Duration,
  scheduler: Sch,
}

impl<Sch> DelayOp<Sch> {
  pub(crate) fn new(delay: Duration, scheduler: Sch) -> Self { DelayOp { delay, scheduler } }
}

impl<S, Sch> Operator<S> for DelayOp<Sch>
where
  S: Observable,
  Sch: Scheduler + 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  fn call<O>(self, source: S, subscriber: Subscriber<O>)
  where
    O: Observer<Item = S::Item, Err = S::Err> + 'static,
  {
    let subscription = subscriber.subscription().clone();
    source.actual_subscribe(Subscriber::attach(
      DelayObserver {
        dest: subscriber,
        delay: self.delay,
        scheduler: self.scheduler,
        subscription: subscription.clone(),
      },
      subscription,
    ));
  }
}

pub struct DelayObserver<D, Sch> {
  dest: D,
  delay: Duration,
  scheduler: Sch,
  subscription: Subscription,
}

impl<D, Sch> Observer for DelayObserver<D, Sch>
where
  D: Observer + Clone + 'static,
  Sch: Scheduler + 'static,
{
  type Item = D::Item;
  type Err = D::Err;

  fn next(&mut self, value: Self::Item) -> Result<(), Self::Err> {
    let mut dest = self.dest.clone();
    let handle = self
      .scheduler
      .schedule(move |value| {
        let _ = dest.next(value);
      }, self.delay, value);
    self.subscription.add(handle);
    Ok(())
  }

  fn error(&mut self, err: Self::Err) { self.dest.error(err) }

  fn complete(&mut self) {
    let mut dest = self.dest.clone();
    let handle = self
      .scheduler
      .schedule(move |()| dest.complete(), self.delay, ());
    self.subscription.add(handle);
  }

  fn is_stopped(&self) -> bool { self.dest.is_stopped() }
}
