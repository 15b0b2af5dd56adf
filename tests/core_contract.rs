//! End-to-end contract tests for the subscription/lifecycle engine.

use std::{
  cell::{Cell, RefCell},
  rc::Rc,
  time::Duration,
};

use rxcore::prelude::*;

#[test]
fn unsubscribe_is_idempotent() {
  let runs = Rc::new(Cell::new(0));
  let sub = Subscription::new();
  for _ in 0..3 {
    let runs = runs.clone();
    sub.add(Teardown::finalize(move || runs.set(runs.get() + 1)));
  }

  for _ in 0..5 {
    sub.unsubscribe();
  }
  assert_eq!(runs.get(), 3);
}

#[test]
fn aggregate_teardown_failure_references_every_error() {
  let first_ran = Rc::new(Cell::new(false));
  let second_ran = Rc::new(Cell::new(false));

  let sub = Subscription::new();
  let c_first = first_ran.clone();
  sub.add(Teardown::try_finalize(move || {
    c_first.set(true);
    Err("boom1".into())
  }));
  let c_second = second_ran.clone();
  sub.add(Teardown::try_finalize(move || {
    c_second.set(true);
    Err("boom2".into())
  }));

  let err = sub.try_unsubscribe().unwrap_err();
  let messages: Vec<String> = err.errors.iter().map(|e| e.to_string()).collect();
  assert_eq!(messages, vec!["boom1", "boom2"]);
  assert!(first_ran.get() && second_ran.get());
}

#[test]
fn stopped_after_terminal_drops_everything() {
  let counts = Rc::new(RefCell::new((0, 0, 0)));
  let (c1, c2, c3) = (counts.clone(), counts.clone(), counts.clone());

  let subject = Subject::<i32, ()>::new();
  subject.clone().subscribe_all(
    move |_| c1.borrow_mut().0 += 1,
    move |_| c2.borrow_mut().1 += 1,
    move || c3.borrow_mut().2 += 1,
  );

  let mut producer = subject;
  producer.next(1).unwrap();
  producer.complete();
  producer.next(2).unwrap();
  producer.complete();
  producer.error(());

  assert_eq!(*counts.borrow(), (1, 0, 1));
}

#[test]
fn error_after_unsubscribe_is_dropped() {
  let scheduler = VirtualTimeScheduler::new();

  let delivered = Rc::new(Cell::new(false));
  let c_delivered = delivered.clone();
  let c_scheduler = scheduler.clone();
  let handle = create(move |s: DynSubscriber<i32, &'static str>| {
    // the producer fails later, asynchronously
    let mut s = s.clone();
    c_scheduler.schedule(
      move |_| s.error("stale failure"),
      Duration::from_secs(1),
      (),
    );
    Ok(Teardown::none())
  })
  .subscribe_err(|_| {}, move |_| c_delivered.set(true));

  handle.unsubscribe();
  scheduler.flush();
  assert!(!delivered.get());
}

#[test]
fn replay_subject_buffer_bound_scenario() {
  let subject = ReplaySubject::<i32, ()>::new(3);
  let mut producer = subject.clone();
  for v in 1..=10 {
    producer.next(v).unwrap();
  }

  let seen = Rc::new(RefCell::new(Vec::new()));
  let c_seen = seen.clone();
  subject.subscribe_err(move |v| c_seen.borrow_mut().push(v), |_| {});
  assert_eq!(*seen.borrow(), vec![8, 9, 10]);
}

#[test]
fn behavior_subject_replay_scenario() {
  let subject = BehaviorSubject::<i32, ()>::new(0);
  let mut producer = subject.clone();
  producer.next(1).unwrap();
  producer.next(2).unwrap();

  let seen = Rc::new(RefCell::new(Vec::new()));
  let c_seen = seen.clone();
  subject.clone().subscribe_err(move |v| c_seen.borrow_mut().push(v), |_| {});
  assert_eq!(*seen.borrow(), vec![2]);

  producer.next(3).unwrap();
  assert_eq!(*seen.borrow(), vec![2, 3]);
}

#[test]
fn ref_count_scenario_connects_and_disconnects_exactly_once() {
  let connects = Rc::new(Cell::new(0));
  let disconnects = Rc::new(Cell::new(0));

  let c_connects = connects.clone();
  let c_disconnects = disconnects.clone();
  let source = create(move |_s: DynSubscriber<i32, ()>| {
    c_connects.set(c_connects.get() + 1);
    let d = c_disconnects.clone();
    Ok(Teardown::finalize(move || d.set(d.get() + 1)))
  });

  let shared = source.publish().ref_count();

  let s1 = shared.clone().subscribe_err(|_| {}, |_| {});
  let s2 = shared.clone().subscribe_err(|_| {}, |_| {});
  assert_eq!((connects.get(), disconnects.get()), (1, 0));

  s1.unsubscribe();
  assert_eq!((connects.get(), disconnects.get()), (1, 0));
  s2.unsubscribe();
  assert_eq!((connects.get(), disconnects.get()), (1, 1));

  let s3 = shared.clone().subscribe_err(|_| {}, |_| {});
  assert_eq!((connects.get(), disconnects.get()), (2, 1));
  s3.unsubscribe();
  assert_eq!((connects.get(), disconnects.get()), (2, 2));
}

#[test]
fn timeout_race_cancels_with_the_primary() {
  // a timeout modeled as an ordinary scheduled action racing the stream
  let scheduler = VirtualTimeScheduler::new();
  let timed_out = Rc::new(Cell::new(false));

  let subject = Subject::<i32, ()>::new();
  let seen = Rc::new(RefCell::new(Vec::new()));
  let c_seen = seen.clone();
  let handle = subject.clone().subscribe_err(move |v| c_seen.borrow_mut().push(v), |_| {});

  let c_timed_out = timed_out.clone();
  let timeout = scheduler.schedule(
    move |_| c_timed_out.set(true),
    Duration::from_secs(5),
    (),
  );
  handle.add(timeout);

  let mut producer = subject;
  producer.next(1).unwrap();
  // the value arrived; cancelling the subscription also cancels the timeout
  handle.unsubscribe();
  scheduler.flush();

  assert_eq!(*seen.borrow(), vec![1]);
  assert!(!timed_out.get());
}

#[test]
fn late_subscriber_to_completed_subject_gets_terminal_only() {
  let subject = Subject::<i32, ()>::new();
  let mut producer = subject.clone();
  producer.next(1).unwrap();
  producer.complete();

  let events = Rc::new(RefCell::new(Vec::new()));
  let (c1, c2) = (events.clone(), events.clone());
  subject.subscribe_all(
    move |v| c1.borrow_mut().push(format!("next {v}")),
    |_| {},
    move || c2.borrow_mut().push("complete".into()),
  );
  assert_eq!(*events.borrow(), vec!["complete"]);
}

#[test]
fn scheduler_delivery_order_is_deterministic_across_operators() {
  let scheduler = VirtualTimeScheduler::new();
  let seen = Rc::new(RefCell::new(Vec::new()));
  let c_seen = seen.clone();

  let fast = interval(Duration::from_millis(7), scheduler.clone()).map(|n| (n, "fast")).take(4);
  let slow = interval(Duration::from_millis(11), scheduler.clone()).map(|n| (n, "slow")).take(3);

  fast.merge(slow).subscribe(move |v| c_seen.borrow_mut().push(v));
  scheduler.flush();

  // fast at 7/14/21/28, slow at 11/22/33
  assert_eq!(
    *seen.borrow(),
    vec![
      (0, "fast"),
      (0, "slow"),
      (1, "fast"),
      (2, "fast"),
      (1, "slow"),
      (3, "fast"),
      (2, "slow"),
    ]
  );
}
