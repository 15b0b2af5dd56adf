//! `create`: an Observable from a raw subscribe recipe.

use std::marker::PhantomData;

use crate::{
  observable::Observable,
  observer::Observer,
  subscriber::{DynSubscriber, Subscriber},
  subscription::Teardown,
};

/// Creates an Observable from the function run on every subscribe.
///
/// The recipe receives a type-erased [`DynSubscriber`] it can drive (and
/// clone into deferred work), and returns either teardown logic or a producer
/// error. A returned `Err` is delivered to the subscriber's `error` path, not
/// to the caller of `subscribe`. If the recipe terminates the stream before
/// returning, the returned teardown still runs immediately, since the
/// subscription is already closed.
///
/// ```
/// use std::{cell::Cell, rc::Rc};
///
/// use rxcore::prelude::*;
///
/// let sum = Rc::new(Cell::new(0));
/// let sink = sum.clone();
/// create(|mut s: DynSubscriber<i32, ()>| {
///   s.next(1)?;
///   s.next(2)?;
///   s.complete();
///   Ok(Teardown::none())
/// })
/// .subscribe_err(move |v| sink.set(sink.get() + v), |_| {});
/// # assert_eq!(sum.get(), 3);
/// ```
pub fn create<F, Item, Err>(subscribe: F) -> ObservableFromFn<F, Item, Err>
where
  F: FnOnce(DynSubscriber<Item, Err>) -> Result<Teardown, Err>,
  Item: 'static,
  Err: 'static,
{
  ObservableFromFn { subscribe, _hint: PhantomData }
}

/// The Observable returned by [`create`].
pub struct ObservableFromFn<F, Item, Err> {
  subscribe: F,
  _hint: PhantomData<(Item, Err)>,
}

impl<F: Clone, Item, Err> Clone for ObservableFromFn<F, Item, Err> {
  fn clone(&self) -> Self {
    ObservableFromFn { subscribe: self.subscribe.clone(), _hint: PhantomData }
  }
}

impl<F, Item, Err> Observable for ObservableFromFn<F, Item, Err>
where
  F: FnOnce(DynSubscriber<Item, Err>) -> Result<Teardown, Err>,
  Item: 'static,
  Err: 'static,
{
  type Item = Item;
  type Err = Err;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<Item = Item, Err = Err> + 'static,
  {
    let mut subscriber = subscriber.into_dyn();
    match (self.subscribe)(subscriber.clone()) {
      // Registering on a closed subscription runs at once, which covers
      // recipes that terminate synchronously before returning teardown.
      Ok(teardown) => subscriber.subscription().add(teardown),
      Err(err) => subscriber.error(err),
    }
  }
}
