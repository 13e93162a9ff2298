//! Event dispatcher implementation

use crate::completion::CompletionBarrier;
use crate::event::Event;
use crate::handler::{HandlerError, HandlerRef, same_handler};
use dashmap::DashMap;
use std::env;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Environment variable toggling dispatcher logging
pub const ENV_LOGGING: &str = "COURIER_EVENTS_LOGGING";

/// Environment variable toggling continue-on-error for ordered dispatch
pub const ENV_CONTINUE_ON_ERROR: &str = "COURIER_EVENTS_CONTINUE_ON_ERROR";

/// Registry binding event names to ordered handler sequences
///
/// Cloning the dispatcher is cheap and the clones share one registry.
#[derive(Clone)]
pub struct EventDispatcher {
    /// Handlers registered for each event name, in registration order
    handlers: Arc<DashMap<String, Vec<HandlerRef>>>,

    /// Configuration
    config: Arc<DispatcherConfig>,
}

/// Event dispatcher configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Enable dispatcher logging
    pub enable_logging: bool,

    /// Keep delivering to the remaining handlers after an ordered-dispatch failure
    pub continue_on_error: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            enable_logging: true,
            continue_on_error: false,
        }
    }
}

impl DispatcherConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create config from an arbitrary variable source.
    ///
    /// Unset or unparsable values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            enable_logging: lookup(ENV_LOGGING)
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.enable_logging),
            continue_on_error: lookup(ENV_CONTINUE_ON_ERROR)
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.continue_on_error),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

impl EventDispatcher {
    /// Create new event dispatcher
    pub fn new() -> Self {
        Self::with_config(DispatcherConfig::default())
    }

    /// Create event dispatcher with custom config
    pub fn with_config(config: DispatcherConfig) -> Self {
        Self {
            handlers: Arc::new(DashMap::new()),
            config: Arc::new(config),
        }
    }

    /// Start building a dispatcher
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Get the active configuration
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Register a handler for an event name
    ///
    /// Fails with [`DispatcherError::DuplicateHandler`] if this exact handler
    /// instance is already bound to `event_name`; the sequence is left as is.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let dispatcher = EventDispatcher::new();
    /// dispatcher.register("order.created", Arc::new(MailHandler))?;
    /// ```
    pub fn register(
        &self,
        event_name: impl Into<String>,
        handler: HandlerRef,
    ) -> Result<(), DispatcherError> {
        let event_name = event_name.into();
        let mut handlers = self.handlers.entry(event_name.clone()).or_default();

        if handlers.iter().any(|h| same_handler(h, &handler)) {
            if self.config.enable_logging {
                warn!(event = %event_name, "Handler already registered");
            }
            return Err(DispatcherError::DuplicateHandler { event: event_name });
        }

        handlers.push(handler);

        if self.config.enable_logging {
            debug!(
                event = %event_name,
                handlers = handlers.len(),
                "Registered handler"
            );
        }

        Ok(())
    }

    /// Check whether a handler is registered for an event name
    pub fn has(&self, event_name: &str, handler: &HandlerRef) -> bool {
        self.handlers
            .get(event_name)
            .is_some_and(|handlers| handlers.iter().any(|h| same_handler(h, handler)))
    }

    /// Remove a handler from an event name
    ///
    /// Removing a handler that is not registered is a no-op. Returns whether a
    /// handler was actually removed.
    pub fn remove(&self, event_name: &str, handler: &HandlerRef) -> bool {
        let removed = match self.handlers.get_mut(event_name) {
            Some(mut handlers) => {
                let position = handlers.iter().position(|h| same_handler(h, handler));
                match position {
                    Some(index) => {
                        handlers.remove(index);
                        true
                    }
                    None => false,
                }
            }
            None => false,
        };

        if removed {
            self.handlers
                .remove_if(event_name, |_, handlers| handlers.is_empty());

            if self.config.enable_logging {
                debug!(event = %event_name, "Removed handler");
            }
        }

        removed
    }

    /// Remove every handler bound to an event name
    ///
    /// Returns the number of handlers that were removed.
    pub fn remove_all(&self, event_name: &str) -> usize {
        let removed = self
            .handlers
            .remove(event_name)
            .map(|(_, handlers)| handlers.len())
            .unwrap_or(0);

        if self.config.enable_logging && removed > 0 {
            debug!(event = %event_name, removed, "Removed all handlers");
        }

        removed
    }

    /// Clear all handlers
    pub fn clear(&self) {
        self.handlers.clear();
        if self.config.enable_logging {
            info!("Cleared all event handlers");
        }
    }

    /// Get handler count for an event name
    pub fn handler_count(&self, event_name: &str) -> usize {
        self.handlers.get(event_name).map(|h| h.len()).unwrap_or(0)
    }

    /// Snapshot of the handlers bound to an event name, in registration order
    pub fn handlers(&self, event_name: &str) -> Vec<HandlerRef> {
        self.handlers
            .get(event_name)
            .map(|h| h.value().clone())
            .unwrap_or_default()
    }

    /// Names of all events with at least one handler
    pub fn event_names(&self) -> Vec<String> {
        self.handlers
            .iter()
            .filter(|entry| !entry.value().is_empty())
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Check whether no handler is registered at all
    pub fn is_empty(&self) -> bool {
        self.handlers.iter().all(|entry| entry.value().is_empty())
    }

    /// Dispatch an event to its handlers one at a time, in registration order
    ///
    /// Runs on the calling thread and returns once the last handler returned.
    /// The first handler error stops delivery and is returned, unless the
    /// dispatcher was configured with `continue_on_error`. Panics are not
    /// caught.
    pub fn dispatch_sync(&self, event: &dyn Event) -> Result<(), DispatcherError> {
        let Some(handlers) = self.snapshot(event) else {
            return Ok(());
        };

        if self.config.enable_logging {
            info!(
                event = event.event_name(),
                id = %event.event_id(),
                handlers = handlers.len(),
                "Dispatching event"
            );
        }

        for handler in &handlers {
            if let Err(e) = handler.handle(event) {
                if self.config.enable_logging {
                    error!(event = event.event_name(), error = %e, "Handler failed");
                }
                if !self.config.continue_on_error {
                    return Err(DispatcherError::HandlerFailed {
                        event: event.event_name().to_string(),
                        source: e,
                    });
                }
            }
        }

        Ok(())
    }

    /// Dispatch an event to all of its handlers concurrently
    ///
    /// One task is spawned per handler, in registration order. The returned
    /// future resolves once every handler has signalled completion; there is
    /// no timeout.
    pub async fn dispatch_async<E: Event>(&self, event: E) -> Result<(), DispatcherError> {
        self.dispatch_async_arc(Arc::new(event)).await
    }

    /// Same as [`dispatch_async`](Self::dispatch_async) for an already shared event
    pub async fn dispatch_async_arc(&self, event: Arc<dyn Event>) -> Result<(), DispatcherError> {
        let Some(handlers) = self.snapshot(event.as_ref()) else {
            return Ok(());
        };

        if self.config.enable_logging {
            info!(
                event = event.event_name(),
                id = %event.event_id(),
                handlers = handlers.len(),
                "Dispatching event concurrently"
            );
        }

        let barrier = CompletionBarrier::new();

        for handler in handlers {
            let event = Arc::clone(&event);
            let done = barrier.completion();
            tokio::spawn(async move { handler.handle_async(event, done).await });
        }

        barrier.wait().await;

        if self.config.enable_logging {
            debug!(event = event.event_name(), "All handlers completed");
        }

        Ok(())
    }

    /// Copy the handler sequence so no registry lock is held while handlers run
    fn snapshot(&self, event: &dyn Event) -> Option<Vec<HandlerRef>> {
        let handlers = self
            .handlers
            .get(event.event_name())
            .map(|h| h.value().clone())
            .filter(|h| !h.is_empty());

        if handlers.is_none() && self.config.enable_logging {
            warn!("No handlers registered for event: {}", event.event_name());
        }

        handlers
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("events", &self.handlers.len())
            .field("config", &self.config)
            .finish()
    }
}

/// Event dispatcher errors
#[derive(Debug, thiserror::Error)]
pub enum DispatcherError {
    #[error("Handler already registered for event: {event}")]
    DuplicateHandler { event: String },

    #[error("Handler failed for event {event}: {source}")]
    HandlerFailed {
        event: String,
        #[source]
        source: HandlerError,
    },
}

/// Event dispatcher builder
pub struct DispatcherBuilder {
    config: DispatcherConfig,
}

impl DispatcherBuilder {
    /// Create new event dispatcher builder
    pub fn new() -> Self {
        Self {
            config: DispatcherConfig::default(),
        }
    }

    /// Start from configuration read from the environment
    pub fn from_env() -> Self {
        Self {
            config: DispatcherConfig::from_env(),
        }
    }

    /// Enable/disable logging
    pub fn enable_logging(mut self, enabled: bool) -> Self {
        self.config.enable_logging = enabled;
        self
    }

    /// Enable/disable continue on error
    pub fn continue_on_error(mut self, enabled: bool) -> Self {
        self.config.continue_on_error = enabled;
        self
    }

    /// Build the event dispatcher
    pub fn build(self) -> EventDispatcher {
        EventDispatcher::with_config(self.config)
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
