//! Convenient re-exports of the crate's public surface.

pub use crate::{
  config::{self, StoppedNotification},
  error::{BoxError, UnsubscribeError},
  observable::{
    create, defer, empty, from_iter, interval, never, of, throw, timer, ConnectableObservable,
    Lifted, Observable, Operator,
  },
  observer::{AllObserver, FnObserver, Observer, TryFnObserver},
  ops::ref_count::RefCountObservable,
  scheduler::{Duration, Instant, Scheduler, VirtualTimeScheduler},
  subject::{AsyncSubject, BehaviorSubject, ReplaySubject, Subject},
  subscriber::{DynSubscriber, Subscriber},
  subscription::{Subscription, SubscriptionGuard, Teardown},
};

#[cfg(feature = "futures-scheduler")]
pub use crate::scheduler::LocalPoolScheduler;
