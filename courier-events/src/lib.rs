//! In-process event dispatching for Courier
//!
//! This crate binds event names to ordered handler lists and delivers events
//! to them, either one after another or concurrently.
//!
//! ## Features
//!
//! - **Ordered dispatch** - Handlers run on the calling thread in registration order
//! - **Concurrent dispatch** - One task per handler, joined on a completion barrier
//! - **Identity-based registration** - The same handler instance cannot be bound twice
//! - **Thread-safe registry** - Register and remove while other threads dispatch
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use courier_events::*;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! struct EmailHandler;
//!
//! impl EventHandler for EmailHandler {
//!     fn handle(&self, event: &dyn Event) -> Result<(), HandlerError> {
//!         println!("Sending mail for order {}", event.payload()["id"]);
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), DispatcherError> {
//!     let dispatcher = EventDispatcher::new();
//!     dispatcher.register("order.created", Arc::new(EmailHandler))?;
//!
//!     let event = JsonEvent::new("order.created", json!({"id": 42}));
//!     dispatcher.dispatch_sync(&event)?;
//!     dispatcher.dispatch_async(event).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Concurrent Handlers
//!
//! `dispatch_async` hands every handler a [`Completion`]. The dispatch returns
//! once all of them have fired. A completion fires when signalled or dropped,
//! so work can be handed off to another task:
//!
//! ```rust,ignore
//! #[async_trait]
//! impl EventHandler for AuditHandler {
//!     fn handle(&self, event: &dyn Event) -> Result<(), HandlerError> {
//!         self.write(event)
//!     }
//!
//!     async fn handle_async(&self, event: Arc<dyn Event>, done: Completion) {
//!         let sink = self.sink.clone();
//!         tokio::spawn(async move {
//!             sink.write(event.as_ref()).await;
//!             done.signal();
//!         });
//!     }
//! }
//! ```
//!
//! ## Configuration
//!
//! ```rust,ignore
//! let dispatcher = EventDispatcher::builder()
//!     .enable_logging(true)       // Log registrations and dispatches
//!     .continue_on_error(false)   // Stop ordered dispatch at the first failure
//!     .build();
//!
//! // Or read COURIER_EVENTS_LOGGING / COURIER_EVENTS_CONTINUE_ON_ERROR
//! let dispatcher = DispatcherBuilder::from_env().build();
//! ```

pub mod completion;
pub mod dispatcher;
pub mod event;
pub mod handler;

pub use completion::{Completion, CompletionBarrier};
pub use dispatcher::{
    DispatcherBuilder, DispatcherConfig, DispatcherError, ENV_CONTINUE_ON_ERROR, ENV_LOGGING,
    EventDispatcher,
};
pub use event::{Event, EventMetadata, JsonEvent};
pub use handler::{EventHandler, FnHandler, HandlerError, HandlerRef, handler_fn, same_handler};
