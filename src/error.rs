//! Error types and the process-wide unhandled-error channel.
//!
//! A stream's only in-band failure channel is the `error` notification. What
//! lands here is everything that has nowhere else to go: errors delivered to a
//! subscriber without an error handler, and teardown failures raised from an
//! infallible `unsubscribe()` call.

use std::{
  cell::{Cell, RefCell},
  fmt::Debug,
  rc::Rc,
};

use thiserror::Error;

use crate::config;

/// Boxed error type used by fallible teardown handlers.
pub type BoxError = Box<dyn std::error::Error>;

/// Aggregate error raised when one or more teardown handlers fail during
/// `unsubscribe`.
///
/// Every registered teardown item runs before this is returned; the failures
/// are collected in registration order. A nested subscription that itself
/// fails to unsubscribe contributes its own `UnsubscribeError` as one entry.
#[derive(Debug, Error)]
#[error("{} teardown handler(s) failed during unsubscribe", .errors.len())]
pub struct UnsubscribeError {
  pub errors: Vec<BoxError>,
}

thread_local! {
  static UNHANDLED_HOOK: RefCell<Option<Rc<dyn Fn(&str)>>> = RefCell::new(None);
  static SUBSCRIBE_DEPTH: Cell<usize> = Cell::new(0);
  static DEFERRED_RETHROW: RefCell<Option<String>> = RefCell::new(None);
}

/// Installs a hook receiving every unhandled stream error, formatted.
///
/// Passing `None` restores the default behavior (a `tracing::error!` record).
/// The hook is thread-local, like the rest of the engine.
pub fn set_unhandled_error_hook(hook: Option<Rc<dyn Fn(&str)>>) {
  UNHANDLED_HOOK.with(|h| *h.borrow_mut() = hook);
}

/// Surfaces an error that reached a subscriber without an error handler.
///
/// Never panics in the default configuration. Under the deprecated
/// synchronous error-handling mode, an error surfaced inside a synchronous
/// `subscribe` call is instead recorded and rethrown to the outermost caller
/// once the subscribe call (teardown included) has finished.
pub(crate) fn report_unhandled(err: &dyn Debug) {
  let message = format!("{err:?}");
  if config::synchronous_error_handling() && SUBSCRIBE_DEPTH.with(Cell::get) > 0 {
    DEFERRED_RETHROW.with(|slot| {
      let mut slot = slot.borrow_mut();
      if slot.is_none() {
        *slot = Some(message);
      }
    });
    return;
  }
  tracing::error!(error = %message, "unhandled stream error");
  UNHANDLED_HOOK.with(|h| {
    if let Some(hook) = h.borrow().as_ref() {
      hook(&message);
    }
  });
}

/// Marks a synchronous `subscribe` call in progress on this thread.
///
/// Only the depth is tracked; nested (re-entrant) subscribe calls defer to the
/// outermost frame for the legacy rethrow.
pub(crate) struct SubscribeFrame;

impl SubscribeFrame {
  pub(crate) fn enter() -> Self {
    SUBSCRIBE_DEPTH.with(|d| d.set(d.get() + 1));
    SubscribeFrame
  }
}

impl Drop for SubscribeFrame {
  fn drop(&mut self) { SUBSCRIBE_DEPTH.with(|d| d.set(d.get() - 1)); }
}

/// Rethrows an error captured under the deprecated synchronous mode, once the
/// outermost subscribe frame has been left. No-op otherwise.
pub(crate) fn rethrow_deferred() {
  if SUBSCRIBE_DEPTH.with(Cell::get) > 0 {
    return;
  }
  if let Some(message) = DEFERRED_RETHROW.with(|slot| slot.borrow_mut().take()) {
    panic!("{message}");
  }
}
