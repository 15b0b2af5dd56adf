//! The operator-composition mechanism.
//!
//! An [`Operator`] decides how a downstream subscriber attaches to an
//! upstream source, usually by wrapping the subscriber's observer and
//! re-attaching it over the shared subscription. [`Lifted`] is the Observable
//! produced by [`Observable::lift`]; it stores the source and the operator
//! and defers everything to [`Operator::call`] at subscribe time.

use crate::{observable::Observable, observer::Observer, subscriber::Subscriber};

/// A transformation attached to a source by `lift`.
pub trait Operator<S: Observable> {
  type Item: 'static;
  type Err: 'static;

  /// Attaches `subscriber` (possibly wrapped) to `source`.
  fn call<O>(self, source: S, subscriber: Subscriber<O>)
  where
    O: Observer<Item = Self::Item, Err = Self::Err> + 'static;
}

/// An Observable built from a source and an operator.
///
/// The source's concrete type is a parameter, so operator chains keep the
/// type (and the full provided-method surface) of whatever they started from.
/// Two chains built from the same source value are independent; nothing is
/// cached between subscriptions.
pub struct Lifted<S, Op> {
  source: S,
  operator: Op,
}

impl<S, Op> Lifted<S, Op> {
  pub(crate) fn new(source: S, operator: Op) -> Self { Lifted { source, operator } }
}

impl<S: Clone, Op: Clone> Clone for Lifted<S, Op> {
  fn clone(&self) -> Self {
    Lifted {
      source: self.source.clone(),
      operator: self.operator.clone(),
    }
  }
}

impl<S, Op> Observable for Lifted<S, Op>
where
  S: Observable,
  Op: Operator<S>,
{
  type Item = Op::Item;
  type Err = Op::Err;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>)
  where
    O: Observer<Item = Self::Item, Err = Self::Err> + 'static,
  {
    self.operator.call(self.source, subscriber)
  }
}
