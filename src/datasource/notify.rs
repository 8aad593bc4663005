//! Invalidation listeners.
//!
//! A [`Publisher`] owns the registry of listener callbacks. Subscribing hands
//! back a [`Subscription`] handle; dropping the handle unregisters the
//! listener, so subscribers never leave dangling callbacks behind.

use std::sync::{Arc, Mutex, Weak};

/// Callback invoked when a source's data changes. Carries no payload.
pub type Listener = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Registry of invalidation listeners owned by a sample source.
#[derive(Clone, Default)]
pub struct Publisher {
    registry: Arc<Mutex<Registry>>,
}

impl Publisher {
    /// Create an empty publisher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It stays registered while the handle lives.
    #[must_use = "dropping the subscription unregisters the listener"]
    pub fn subscribe(&self, listener: Listener) -> Subscription {
        let mut registry = self.registry.lock().expect("listener registry lock");
        registry.next_id = registry.next_id.wrapping_add(1);
        let id = registry.next_id;
        registry.listeners.push((id, listener));
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Invoke every registered listener.
    ///
    /// The registry is not locked while listeners run, so a listener may
    /// subscribe, unsubscribe, or notify further sources.
    pub fn notify(&self) {
        let listeners: Vec<Listener> = {
            let registry = self.registry.lock().expect("listener registry lock");
            registry
                .listeners
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect()
        };
        for listener in listeners {
            listener();
        }
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.registry
            .lock()
            .expect("listener registry lock")
            .listeners
            .len()
    }

    /// Check whether nobody is listening.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("listeners", &self.len())
            .finish()
    }
}

/// Handle tying a listener's registration to the subscriber's lifetime.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Unregister the listener now.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        if let Ok(mut registry) = registry.lock() {
            registry.listeners.retain(|(id, _)| *id != self.id);
        }
    }
}
