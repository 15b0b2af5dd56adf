//! The Observable core: a reusable, lazily-evaluated subscribe recipe.
//!
//! An Observable does nothing until subscribed; subscribing twice runs the
//! recipe twice (sharing is an explicit multicast concern, see
//! [`connectable`]). Values flow downstream through a chain of
//! [`Subscriber`]s, cancellation flows upstream through the shared
//! [`Subscription`](crate::subscription::Subscription).

use std::{fmt::Debug, time::Duration};

pub mod connectable;
pub mod create;
pub mod defer;
pub mod from_iter;
pub mod lift;
pub mod timer;
pub mod trivial;

pub use connectable::ConnectableObservable;
pub use create::{create, ObservableFromFn};
pub use defer::{defer, Defer};
pub use from_iter::{from_iter, of, FromIter, OfObservable};
pub use lift::{Lifted, Operator};
pub use timer::{interval, timer, IntervalObservable, TimerObservable};
pub use trivial::{empty, never, throw, Empty, Never, Throw};

use crate::{
  error,
  observer::{AllObserver, FnObserver, Observer, TryFnObserver},
  ops::{
    concat::ConcatOp, delay::DelayOp, filter::FilterOp, map::MapOp, merge::MergeOp, take::TakeOp,
  },
  scheduler::Scheduler,
  subscriber::Subscriber,
  subscription::Subscription,
};

/// A push-based stream of `Item` values terminated by completion or an `Err`.
///
/// Implementors provide [`actual_subscribe`](Observable::actual_subscribe),
/// the recipe that attaches a [`Subscriber`] to the source. Everything else
/// (operator composition via [`lift`](Observable::lift) and the `subscribe_*`
/// entry points) is provided. An Observable is consumed by subscription;
/// clone it to subscribe repeatedly.
pub trait Observable: Sized {
  type Item: 'static;
  type Err: 'static;

  /// Runs the subscribe recipe, attaching `subscriber` to this source.
  ///
  /// Teardown is registered on the subscriber's subscription; a recipe that
  /// signals a terminal notification synchronously leaves the subscription
  /// closed, and anything registered afterwards runs immediately.
  fn actual_subscribe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<Item = Self::Item, Err = Self::Err> + 'static;

  // ---- composition ------------------------------------------------------

  /// Wraps this source so that subscribing to the wrapper lets `operator`
  /// decide how the subscriber attaches to the source.
  ///
  /// The result carries `Self` as a type parameter, so a chain built over a
  /// custom source keeps its concrete type (and every provided method)
  /// through arbitrarily many lifts.
  fn lift<Op>(self, operator: Op) -> Lifted<Self, Op>
  where
    Op: Operator<Self>,
  {
    Lifted::new(self, operator)
  }

  /// Threads this Observable through a composition function.
  ///
  /// `pipe(identity)` returns `self` unchanged; chains compose as
  /// `source.pipe(f).pipe(g)`.
  #[inline]
  fn pipe<F, R>(self, op: F) -> R
  where
    F: FnOnce(Self) -> R,
  {
    op(self)
  }

  // ---- canonical operators ----------------------------------------------

  /// Transforms every value with `f`.
  fn map<B, F>(self, f: F) -> Lifted<Self, MapOp<F, B>>
  where
    F: FnMut(Self::Item) -> B + 'static,
    B: 'static,
  {
    self.lift(MapOp::new(f))
  }

  /// Keeps only the values satisfying `predicate`.
  fn filter<F>(self, predicate: F) -> Lifted<Self, FilterOp<F>>
  where
    F: FnMut(&Self::Item) -> bool + 'static,
  {
    self.lift(FilterOp::new(predicate))
  }

  /// Emits the first `count` values, then completes and cancels upstream.
  fn take(self, count: usize) -> Lifted<Self, TakeOp> { self.lift(TakeOp::new(count)) }

  /// Subscribes `self` and `other` concurrently, interleaving their values
  /// into one stream. Completes when both complete; the first error wins.
  fn merge<S>(self, other: S) -> Lifted<Self, MergeOp<S>>
  where
    S: Observable<Item = Self::Item, Err = Self::Err> + 'static,
  {
    self.lift(MergeOp::new(other))
  }

  /// Subscribes `other` only after `self` completes, concatenating the two
  /// streams in order.
  fn concat<S>(self, other: S) -> Lifted<Self, ConcatOp<S>>
  where
    S: Observable<Item = Self::Item, Err = Self::Err> + 'static,
  {
    self.lift(ConcatOp::new(other))
  }

  /// Shifts every value and the completion by `delay` on `scheduler`. Errors
  /// are not delayed. Pending deliveries are cancelled with the subscription.
  fn delay<S>(self, delay: Duration, scheduler: S) -> Lifted<Self, DelayOp<S>>
  where
    S: Scheduler + 'static,
  {
    self.lift(DelayOp::new(delay, scheduler))
  }

  /// Multicasts this source through a fresh subject, connected explicitly.
  fn publish(self) -> ConnectableObservable<Self> { ConnectableObservable::new(self) }

  // ---- subscribe entry points -------------------------------------------

  /// Subscribes with a `next` handler; errors are reported through the
  /// unhandled-error channel.
  fn subscribe<N>(self, next: N) -> Subscription
  where
    N: FnMut(Self::Item) + 'static,
    Self::Err: Debug,
  {
    self.subscribe_with(FnObserver::new(next))
  }

  /// Subscribes with a fallible `next` handler; an `Err` return is routed to
  /// the stream's error path exactly once.
  fn try_subscribe<N>(self, next: N) -> Subscription
  where
    N: FnMut(Self::Item) -> Result<(), Self::Err> + 'static,
    Self::Err: Debug,
  {
    self.subscribe_with(TryFnObserver::new(next))
  }

  /// Subscribes with `next` and `error` handlers.
  fn subscribe_err<N, E>(self, next: N, error: E) -> Subscription
  where
    N: FnMut(Self::Item) + 'static,
    E: FnMut(Self::Err) + 'static,
  {
    self.subscribe_with(AllObserver::new(next, error, || {}))
  }

  /// Subscribes with the full set of handlers.
  fn subscribe_all<N, E, C>(self, next: N, error: E, complete: C) -> Subscription
  where
    N: FnMut(Self::Item) + 'static,
    E: FnMut(Self::Err) + 'static,
    C: FnMut() + 'static,
  {
    self.subscribe_with(AllObserver::new(next, error, complete))
  }

  /// Subscribes a custom observer. All other entry points funnel here.
  fn subscribe_with<O>(self, observer: O) -> Subscription
  where
    O: Observer<Item = Self::Item, Err = Self::Err> + 'static,
  {
    let frame = error::SubscribeFrame::enter();
    let subscriber = Subscriber::new(observer);
    let handle = subscriber.subscription().clone();
    self.actual_subscribe(subscriber);
    drop(frame);
    // Deprecated synchronous mode only: an unhandled error captured during
    // this call panics here, after teardown has already run.
    error::rethrow_deferred();
    handle
  }
}
