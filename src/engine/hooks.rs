//! engine::hooks
//!
//! Listener bus around registration and execution.
//!
//! # Points
//!
//! Every registration step and every command execution is bracketed by a
//! "pre" and a "post" [`HookPoint`]. Listeners on a pre point may cancel the
//! operation; listeners on a post point only observe it.
//!
//! # Ordering
//!
//! Listeners for a point run in registration order. A cancelled event is
//! still delivered to the remaining listeners so they can observe the
//! cancellation.
//!
//! # Example
//!
//! ```
//! use armada::engine::hooks::{HookBus, HookEvent, HookPoint};
//!
//! let mut bus = HookBus::new();
//! bus.on(HookPoint::CommandPreExecute, |event| {
//!     if event.subject() == "shutdown" {
//!         event.cancel();
//!     }
//! });
//!
//! let mut event = HookEvent::new(HookPoint::CommandPreExecute, "shutdown");
//! assert!(!bus.fire(&mut event));
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// Points where listeners can intercept the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HookPoint {
    /// Before a gear and its commands are registered.
    GearPreAdd,
    /// After a gear has been registered.
    GearPostAdd,
    /// Before a single command is attached to a gear.
    CommandPreAdd,
    /// After a single command has been attached.
    CommandPostAdd,
    /// Before a transformer is registered.
    TransformerPreAdd,
    /// After a transformer has been registered.
    TransformerPostAdd,
    /// Before validators for a constraint are registered.
    ValidatorPreAdd,
    /// After validators have been registered.
    ValidatorPostAdd,
    /// Before a selected command is invoked.
    CommandPreExecute,
    /// After a command returned a result.
    CommandPostExecute,
}

impl HookPoint {
    /// Returns `true` for points whose listeners may cancel the operation.
    #[must_use]
    pub fn is_pre(&self) -> bool {
        matches!(
            self,
            Self::GearPreAdd
                | Self::CommandPreAdd
                | Self::TransformerPreAdd
                | Self::ValidatorPreAdd
                | Self::CommandPreExecute
        )
    }

    /// Returns `true` for observe-only points.
    #[must_use]
    pub fn is_post(&self) -> bool {
        !self.is_pre()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GearPreAdd => "gear.pre_add",
            Self::GearPostAdd => "gear.post_add",
            Self::CommandPreAdd => "command.pre_add",
            Self::CommandPostAdd => "command.post_add",
            Self::TransformerPreAdd => "transformer.pre_add",
            Self::TransformerPostAdd => "transformer.post_add",
            Self::ValidatorPreAdd => "validator.pre_add",
            Self::ValidatorPostAdd => "validator.post_add",
            Self::CommandPreExecute => "command.pre_execute",
            Self::CommandPostExecute => "command.post_execute",
        }
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event delivered to listeners.
///
/// `subject` names what the event is about: a gear, a command or a kind.
pub struct HookEvent<'a> {
    point: HookPoint,
    subject: &'a str,
    args: Option<&'a str>,
    result: Option<&'a dyn Any>,
    cancelled: bool,
}

impl<'a> HookEvent<'a> {
    pub fn new(point: HookPoint, subject: &'a str) -> Self {
        Self {
            point,
            subject,
            args: None,
            result: None,
            cancelled: false,
        }
    }

    /// Attach the argument tail of an execution.
    pub fn with_args(mut self, args: &'a str) -> Self {
        self.args = Some(args);
        self
    }

    /// Attach the result of an execution.
    pub fn with_result(mut self, result: &'a dyn Any) -> Self {
        self.result = Some(result);
        self
    }

    pub fn point(&self) -> HookPoint {
        self.point
    }

    pub fn subject(&self) -> &str {
        self.subject
    }

    pub fn args(&self) -> Option<&str> {
        self.args
    }

    /// The execution result, if it has type `T`.
    pub fn result<T: Any>(&self) -> Option<&T> {
        self.result.and_then(|r| r.downcast_ref::<T>())
    }

    /// Request cancellation. Ignored on post points.
    pub fn cancel(&mut self) {
        if self.point.is_pre() {
            self.cancelled = true;
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl fmt::Debug for HookEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookEvent")
            .field("point", &self.point)
            .field("subject", &self.subject)
            .field("args", &self.args)
            .field("has_result", &self.result.is_some())
            .field("cancelled", &self.cancelled)
            .finish()
    }
}

type Listener = Box<dyn Fn(&mut HookEvent<'_>) + Send + Sync>;

/// Listeners grouped by point.
#[derive(Default)]
pub struct HookBus {
    listeners: HashMap<HookPoint, Vec<Listener>>,
}

impl HookBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `point`.
    pub fn on<F>(&mut self, point: HookPoint, listener: F)
    where
        F: Fn(&mut HookEvent<'_>) + Send + Sync + 'static,
    {
        self.listeners
            .entry(point)
            .or_default()
            .push(Box::new(listener));
    }

    /// Deliver `event` to every listener of its point.
    ///
    /// Returns `true` if the operation may proceed.
    pub fn fire(&self, event: &mut HookEvent<'_>) -> bool {
        if let Some(listeners) = self.listeners.get(&event.point) {
            for listener in listeners {
                listener(event);
            }
        }
        if event.cancelled {
            tracing::warn!(point = %event.point, subject = event.subject, "operation cancelled by hook");
        }
        !event.cancelled
    }

    /// Number of listeners registered for `point`.
    pub fn count(&self, point: HookPoint) -> usize {
        self.listeners.get(&point).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.values().all(Vec::is_empty)
    }
}

impl fmt::Debug for HookBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<_, _> = self
            .listeners
            .iter()
            .map(|(point, listeners)| (point.as_str(), listeners.len()))
            .collect();
        f.debug_struct("HookBus").field("listeners", &counts).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[test]
    fn pre_and_post_partition_points() {
        assert!(HookPoint::GearPreAdd.is_pre());
        assert!(HookPoint::CommandPostExecute.is_post());
        assert!(!HookPoint::CommandPreExecute.is_post());
    }

    #[test]
    fn fire_without_listeners_proceeds() {
        let bus = HookBus::new();
        let mut event = HookEvent::new(HookPoint::GearPreAdd, "math");
        assert!(bus.fire(&mut event));
        assert!(bus.is_empty());
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut bus = HookBus::new();
        for tag in ["a", "b", "c"] {
            let seen = Arc::clone(&seen);
            bus.on(HookPoint::CommandPreAdd, move |_| {
                seen.lock().unwrap().push(tag)
            });
        }

        let mut event = HookEvent::new(HookPoint::CommandPreAdd, "greet");
        assert!(bus.fire(&mut event));
        assert_eq!(*seen.lock().unwrap(), vec!["a", "b", "c"]);
        assert_eq!(bus.count(HookPoint::CommandPreAdd), 3);
    }

    #[test]
    fn cancelled_event_still_reaches_later_listeners() {
        let later = Arc::new(AtomicUsize::new(0));
        let mut bus = HookBus::new();
        bus.on(HookPoint::GearPreAdd, |event| event.cancel());
        let counter = Arc::clone(&later);
        bus.on(HookPoint::GearPreAdd, move |event| {
            assert!(event.is_cancelled());
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let mut event = HookEvent::new(HookPoint::GearPreAdd, "math");
        assert!(!bus.fire(&mut event));
        assert_eq!(later.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn post_events_cannot_be_cancelled() {
        let mut bus = HookBus::new();
        bus.on(HookPoint::CommandPostExecute, |event| event.cancel());

        let result = String::from("done");
        let mut event =
            HookEvent::new(HookPoint::CommandPostExecute, "echo").with_result(&result);
        assert!(bus.fire(&mut event));
        assert_eq!(event.result::<String>().map(String::as_str), Some("done"));
        assert_eq!(event.result::<i32>(), None);
    }
}
