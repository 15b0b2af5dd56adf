//! Property test: virtual-time execution order is exactly `(time, index)`.

use std::{cell::RefCell, rc::Rc, time::Duration};

use proptest::prelude::*;
use rxcore::prelude::*;

proptest! {
  #[test]
  fn flush_runs_work_in_delay_then_insertion_order(delays in prop::collection::vec(0u64..50, 1..40)) {
    let scheduler = VirtualTimeScheduler::new();
    let executed: Rc<RefCell<Vec<(u64, usize)>>> = Rc::new(RefCell::new(Vec::new()));

    for (call_order, delay) in delays.iter().copied().enumerate() {
      let executed = executed.clone();
      scheduler.schedule(
        move |_| executed.borrow_mut().push((delay, call_order)),
        Duration::from_millis(delay),
        (),
      );
    }

    scheduler.flush();

    let executed = executed.borrow();
    // every action ran exactly once
    prop_assert_eq!(executed.len(), delays.len());
    // non-decreasing delay, and call order breaks ties
    for pair in executed.windows(2) {
      prop_assert!(pair[0].0 < pair[1].0 || (pair[0].0 == pair[1].0 && pair[0].1 < pair[1].1));
    }
  }

  #[test]
  fn advancing_in_chunks_matches_a_single_flush(
    delays in prop::collection::vec(0u64..100, 1..30),
    step in 1u64..40,
  ) {
    let run = |chunked: bool| -> Vec<usize> {
      let scheduler = VirtualTimeScheduler::new();
      let executed: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
      for (call_order, delay) in delays.iter().copied().enumerate() {
        let executed = executed.clone();
        scheduler.schedule(
          move |_| executed.borrow_mut().push(call_order),
          Duration::from_millis(delay),
          (),
        );
      }
      if chunked {
        for _ in 0..=(100 / step) {
          scheduler.advance_by(Duration::from_millis(step));
        }
      } else {
        scheduler.flush();
      }
      let result = executed.borrow().clone();
      result
    };

    prop_assert_eq!(run(true), run(false));
  }
}
