//! Configuration change notification.
//!
//! The machine configuration publishes [`ConfigurationEvent`]s through a
//! [`ChangeNotifier`]; interested components implement
//! [`ConfigurationObserver`] and subscribe. Dispatch is synchronous: every
//! observer has run by the time [`ChangeNotifier::notify`] returns.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// Unique identifier for a subscription.
pub type ObserverId = u64;

/// Something about the active configuration changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationEvent {
    /// The active printer, or the nozzle/material/enabled state of one of its
    /// extruders, changed.
    ActiveStackChanged,
    /// An intent or quality profile was assigned to the extruder at `position`.
    SelectionChanged { position: usize },
}

impl ConfigurationEvent {
    /// Event name used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigurationEvent::ActiveStackChanged => "active_stack_changed",
            ConfigurationEvent::SelectionChanged { .. } => "selection_changed",
        }
    }
}

/// Receiver of configuration events.
pub trait ConfigurationObserver: Send + Sync {
    fn on_event(&self, event: &ConfigurationEvent);
}

/// Fan-out of configuration events to subscribed observers.
///
/// Observers are held weakly: the owner of an observer keeps it alive, and a
/// dropped observer is pruned on the next notification.
#[derive(Default)]
pub struct ChangeNotifier {
    /// Next ID to assign to a subscription.
    next_id: Mutex<ObserverId>,
    /// Live subscriptions in subscription order.
    observers: Mutex<Vec<(ObserverId, Weak<dyn ConfigurationObserver>)>>,
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("observers", &self.observers.lock().len())
            .finish_non_exhaustive()
    }
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer; returns the id to unsubscribe with.
    pub fn subscribe(&self, observer: &Arc<dyn ConfigurationObserver>) -> ObserverId {
        let id = {
            let mut next = self.next_id.lock();
            *next += 1;
            *next
        };
        self.observers.lock().push((id, Arc::downgrade(observer)));
        log::debug!("Observer {} subscribed to configuration events", id);
        id
    }

    /// Remove a subscription. Returns false if the id was unknown.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.lock();
        let before = observers.len();
        observers.retain(|(oid, _)| *oid != id);
        observers.len() != before
    }

    /// Number of live subscriptions.
    pub fn observer_count(&self) -> usize {
        self.observers
            .lock()
            .iter()
            .filter(|(_, o)| o.strong_count() > 0)
            .count()
    }

    /// Deliver `event` to every live observer, in subscription order.
    ///
    /// The subscriber list is snapshotted first and no lock is held while
    /// observers run, so an observer may itself cause further notifications.
    pub fn notify(&self, event: &ConfigurationEvent) {
        let live: Vec<(ObserverId, Arc<dyn ConfigurationObserver>)> = {
            let mut observers = self.observers.lock();
            observers.retain(|(_, o)| o.strong_count() > 0);
            observers
                .iter()
                .filter_map(|(id, o)| o.upgrade().map(|o| (*id, o)))
                .collect()
        };

        for (id, observer) in live {
            log::trace!("Dispatching {} to observer {}", event.kind(), id);
            observer.on_event(event);
        }
    }
}
