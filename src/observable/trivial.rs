//! Degenerate sources: `empty`, `never`, and `throw`.

use std::{convert::Infallible, marker::PhantomData};

use crate::{observable::Observable, observer::Observer, subscriber::Subscriber};

/// An Observable that completes immediately without emitting.
pub fn empty<Item>() -> Empty<Item> { Empty(PhantomData) }

pub struct Empty<Item>(PhantomData<Item>);

impl<Item> Clone for Empty<Item> {
  fn clone(&self) -> Self { Empty(PhantomData) }
}

impl<Item: 'static> Observable for Empty<Item> {
  type Item = Item;
  type Err = Infallible;

  fn actual_subscribe<O>(self, mut subscriber: Subscriber<O>)
  where
    O: Observer<Item = Item, Err = Infallible> + 'static,
  {
    subscriber.complete();
  }
}

/// An Observable that never notifies; it stays dormant, holding nothing.
pub fn never<Item, Err>() -> Never<Item, Err> { Never(PhantomData) }

pub struct Never<Item, Err>(PhantomData<(Item, Err)>);

impl<Item, Err> Clone for Never<Item, Err> {
  fn clone(&self) -> Self { Never(PhantomData) }
}

impl<Item: 'static, Err: 'static> Observable for Never<Item, Err> {
  type Item = Item;
  type Err = Err;

  fn actual_subscribe<O>(self, _subscriber: Subscriber<O>)
  where
    O: Observer<Item = Item, Err = Err> + 'static,
  {
  }
}

/// An Observable that errors immediately with the given value.
pub fn throw<Err, Item>(err: Err) -> Throw<Err, Item> { Throw(err, PhantomData) }

pub struct Throw<Err, Item>(Err, PhantomData<Item>);

impl<Err: Clone, Item> Clone for Throw<Err, Item> {
  fn clone(&self) -> Self { Throw(self.0.clone(), PhantomData) }
}

impl<Err: 'static, Item: 'static> Observable for Throw<Err, Item> {
  type Item = Item;
  type Err = Err;

  fn actual_subscribe<O>(self, mut subscriber: Subscriber<O>)
  where
    O: Observer<Item = Item, Err = Err> + 'static,
  {
    subscriber.error(self.0);
  }
}
