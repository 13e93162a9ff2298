//! Event handler traits

use crate::completion::Completion;
use crate::event::Event;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Event handler trait
///
/// `handle` is used by ordered dispatch, `handle_async` by concurrent dispatch.
/// Implementations overriding `handle_async` must let `done` fire on every
/// path, otherwise the dispatch that launched them never returns.
#[async_trait]
pub trait EventHandler: Send + Sync + 'static {
    /// Handle the event on the calling thread
    fn handle(&self, event: &dyn Event) -> Result<(), HandlerError>;

    /// Handle the event concurrently and signal `done` when finished
    async fn handle_async(&self, event: Arc<dyn Event>, done: Completion) {
        if let Err(e) = self.handle(event.as_ref()) {
            warn!(event = event.event_name(), error = %e, "Async handler failed");
        }
        done.signal();
    }
}

/// Shared, identity-comparable handler reference
pub type HandlerRef = Arc<dyn EventHandler>;

/// Check whether two references denote the same handler instance
///
/// Only allocation identity counts. Two handlers with equal state are still
/// different handlers.
#[inline]
pub fn same_handler(a: &HandlerRef, b: &HandlerRef) -> bool {
    Arc::ptr_eq(a, b)
}

/// Event handler error
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("Handler failed: {0}")]
    Failed(String),

    #[error("Event processing error: {0}")]
    Processing(String),
}

/// Handler backed by a closure
pub struct FnHandler<F> {
    f: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&dyn Event) -> Result<(), HandlerError> + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F> EventHandler for FnHandler<F>
where
    F: Fn(&dyn Event) -> Result<(), HandlerError> + Send + Sync + 'static,
{
    fn handle(&self, event: &dyn Event) -> Result<(), HandlerError> {
        (self.f)(event)
    }
}

/// Wrap a closure into a [`HandlerRef`]
pub fn handler_fn<F>(f: F) -> HandlerRef
where
    F: Fn(&dyn Event) -> Result<(), HandlerError> + Send + Sync + 'static,
{
    Arc::new(FnHandler::new(f))
}
