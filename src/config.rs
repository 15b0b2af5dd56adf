//! Process-wide configuration switches.
//!
//! The engine is single-threaded, so "process-wide" state lives in
//! thread-locals with explicit, test-scoped mutation. Mutate through the
//! setters and restore defaults with [`reset`]; there is no ambient state
//! accessed by name anywhere else in the crate.

use std::{cell::RefCell, rc::Rc};

/// A terminal notification that arrived after its subscriber had already
/// stopped, and was therefore dropped.
///
/// Dropped `next` values are not reported; they are an ordinary consequence of
/// cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoppedNotification {
  Error,
  Complete,
}

#[derive(Default)]
struct Config {
  /// Deprecated compatibility mode: rethrow unhandled errors to the caller of
  /// a synchronous `subscribe` after teardown, instead of only reporting them.
  synchronous_error_handling: bool,
  /// Diagnostic hook observing dropped terminal notifications. Purely
  /// observational; never throws into delivery code.
  on_stopped_notification: Option<Rc<dyn Fn(StoppedNotification)>>,
}

thread_local! {
  static CONFIG: RefCell<Config> = RefCell::new(Config::default());
}

/// Enables or disables the deprecated synchronous error-handling mode.
///
/// Off by default. When on, an error that reaches a subscriber without an
/// error handler during a synchronous `subscribe` call panics in the
/// outermost subscribing caller once teardown has finished, mirroring
/// historical rethrow-on-subscribe semantics. New code should leave this off
/// and install an error handler (or the unhandled-error hook) instead.
pub fn set_synchronous_error_handling(enabled: bool) {
  CONFIG.with(|c| c.borrow_mut().synchronous_error_handling = enabled);
}

pub(crate) fn synchronous_error_handling() -> bool {
  CONFIG.with(|c| c.borrow().synchronous_error_handling)
}

/// Installs a diagnostic hook invoked whenever a terminal notification is
/// dropped because its subscriber had already stopped.
pub fn set_on_stopped_notification(hook: Option<Rc<dyn Fn(StoppedNotification)>>) {
  CONFIG.with(|c| c.borrow_mut().on_stopped_notification = hook);
}

pub(crate) fn notify_stopped(kind: StoppedNotification) {
  tracing::debug!(?kind, "terminal notification dropped after stop");
  let hook = CONFIG.with(|c| c.borrow().on_stopped_notification.clone());
  if let Some(hook) = hook {
    hook(kind);
  }
}

/// Restores every switch to its default. Intended for test isolation.
pub fn reset() { CONFIG.with(|c| *c.borrow_mut() = Config::default()); }
