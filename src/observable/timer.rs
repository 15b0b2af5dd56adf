//! Scheduler-driven time sources: `timer` and `interval`.

use std::{convert::Infallible, time::Duration};

use crate::{
  observable::Observable, observer::Observer, scheduler::Scheduler, subscriber::Subscriber,
};

/// Creates an Observable emitting `0` after `delay` on `scheduler`, then
/// completing.
pub fn timer<S: Scheduler>(delay: Duration, scheduler: S) -> TimerObservable<S> {
  TimerObservable { delay, scheduler }
}

#[derive(Clone)]
pub struct TimerObservable<S> {
  delay: Duration,
  scheduler: S,
}

impl<S: Scheduler + 'static> Observable for TimerObservable<S> {
  type Item = usize;
  type Err = Infallible;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<Item = usize, Err = Infallible> + 'static,
  {
    let handle = self.scheduler.schedule(
      |mut subscriber: Subscriber<O>| {
        let _ = subscriber.next(0);
        subscriber.complete();
      },
      self.delay,
      subscriber.clone(),
    );
    // Unsubscribing the stream cancels the pending tick.
    subscriber.subscription().add(handle);
  }
}

/// Creates an Observable emitting `0, 1, 2, …` every `period` on `scheduler`.
/// Never completes on its own; unsubscribe (or `take`) ends it.
pub fn interval<S: Scheduler>(period: Duration, scheduler: S) -> IntervalObservable<S> {
  IntervalObservable { period, scheduler }
}

#[derive(Clone)]
pub struct IntervalObservable<S> {
  period: Duration,
  scheduler: S,
}

impl<S: Scheduler + 'static> Observable for IntervalObservable<S> {
  type Item = usize;
  type Err = Infallible;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<Item = usize, Err = Infallible> + 'static,
  {
    let mut sink = subscriber.clone();
    let handle = self
      .scheduler
      .schedule_repeating(move |n| {
        let _ = sink.next(n);
      }, self.period);
    subscriber.subscription().add(handle);
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use super::*;
  use crate::{prelude::*, scheduler::VirtualTimeScheduler};

  #[test]
  fn timer_fires_once_at_virtual_time() {
    let scheduler = VirtualTimeScheduler::new();
    let events = Rc::new(RefCell::new(Vec::new()));
    let (c1, c2) = (events.clone(), events.clone());

    timer(Duration::from_secs(3), scheduler.clone()).subscribe_all(
      move |v| c1.borrow_mut().push(format!("next {v}")),
      |_| {},
      move || c2.borrow_mut().push("complete".into()),
    );

    scheduler.advance_by(Duration::from_secs(2));
    assert!(events.borrow().is_empty());
    scheduler.advance_by(Duration::from_secs(1));
    assert_eq!(*events.borrow(), vec!["next 0", "complete"]);
  }

  #[test]
  fn interval_ticks_until_unsubscribed() {
    let scheduler = VirtualTimeScheduler::new();
    let ticks = Rc::new(RefCell::new(Vec::new()));
    let c_ticks = ticks.clone();

    let handle = interval(Duration::from_millis(10), scheduler.clone())
      .subscribe(move |n| c_ticks.borrow_mut().push(n));

    scheduler.advance_by(Duration::from_millis(35));
    assert_eq!(*ticks.borrow(), vec![0, 1, 2]);

    handle.unsubscribe();
    scheduler.advance_by(Duration::from_millis(100));
    assert_eq!(*ticks.borrow(), vec![0, 1, 2]);
  }

  #[test]
  fn take_completes_an_interval() {
    let scheduler = VirtualTimeScheduler::new();
    let ticks = Rc::new(RefCell::new(Vec::new()));
    let completed = Rc::new(RefCell::new(false));
    let (c_ticks, c_completed) = (ticks.clone(), completed.clone());

    interval(Duration::from_millis(5), scheduler.clone())
      .take(3)
      .subscribe_all(
        move |n| c_ticks.borrow_mut().push(n),
        |_| {},
        move || *c_completed.borrow_mut() = true,
      );

    scheduler.flush();
    assert_eq!(*ticks.borrow(), vec![0, 1, 2]);
    assert!(*completed.borrow());
  }
}
