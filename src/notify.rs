//! Observer registries for model change notification.
//!
//! Each model instance owns its registries; there is no process-wide
//! listener state. Registration is idempotent by observer identity and
//! delivery walks a snapshot of the registry, so a callback may register or
//! unregister observers without affecting the pass that is delivering to it.

use std::cell::RefCell;
use std::rc::Rc;

pub type Observer = Rc<dyn Fn()>;

/// An ordered, identity-deduplicated set of observers.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: RefCell<Vec<Observer>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `observer` unless the same `Rc` is already registered.
    pub fn register(&self, observer: Observer) {
        let mut observers = self.observers.borrow_mut();
        if !observers.iter().any(|o| Rc::ptr_eq(o, &observer)) {
            observers.push(observer);
        }
    }

    /// Removes `observer`; absent observers are ignored.
    pub fn unregister(&self, observer: &Observer) {
        self.observers
            .borrow_mut()
            .retain(|o| !Rc::ptr_eq(o, observer));
    }

    /// Invokes the currently registered observers in registration order.
    pub fn notify(&self) {
        let snapshot: Vec<Observer> = self.observers.borrow().clone();
        for observer in snapshot {
            observer();
        }
    }

    pub fn len(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.borrow().is_empty()
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("len", &self.len())
            .finish()
    }
}

/// The model's two notification channels: state changes and value
/// invalidation.
#[derive(Debug, Default)]
pub struct ChangeNotifier {
    changed: ObserverRegistry,
    invalidated: ObserverRegistry,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn changed(&self) -> &ObserverRegistry {
        &self.changed
    }

    pub fn invalidated(&self) -> &ObserverRegistry {
        &self.invalidated
    }

    pub fn notify_change(&self) {
        self.changed.notify();
    }

    pub fn notify_invalidated(&self) {
        self.invalidated.notify();
    }
}
