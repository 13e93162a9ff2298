// Courier - in-process publish/subscribe event dispatching
//
// Binds event names to ordered handler lists and delivers events either
// sequentially on the calling thread or concurrently with a completion barrier.

// Re-export the dispatcher core
pub use courier_events::*;

// Re-export the events crate itself for path-qualified use
pub use courier_events;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Completion, DispatcherBuilder, DispatcherConfig, DispatcherError, Event, EventDispatcher,
        EventHandler, EventMetadata, HandlerError, HandlerRef, JsonEvent, handler_fn,
    };
    pub use async_trait::async_trait;
    pub use std::sync::Arc;
}
