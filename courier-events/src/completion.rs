//! Completion signalling for concurrent dispatch
//!
//! Every handler launched by [`EventDispatcher::dispatch_async`] receives a
//! [`Completion`]. The dispatcher joins on a [`CompletionBarrier`] that resolves
//! once every completion it handed out has fired.
//!
//! A completion fires when it is signalled or dropped, whichever comes first.
//! Early returns, `?` and panics inside a handler therefore release the
//! barrier as well.
//!
//! [`EventDispatcher::dispatch_async`]: crate::EventDispatcher::dispatch_async

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;

/// One-shot completion signal handed to an asynchronous handler
#[derive(Debug)]
pub struct Completion {
    // Never sent on; the barrier observes the sender being dropped.
    _tx: mpsc::Sender<()>,
    pending: Arc<AtomicUsize>,
}

impl Completion {
    /// Signal that the handler has finished
    pub fn signal(self) {}
}

impl Drop for Completion {
    fn drop(&mut self) {
        self.pending.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Counting barrier over a set of [`Completion`]s
#[derive(Debug)]
pub struct CompletionBarrier {
    tx: mpsc::Sender<()>,
    rx: mpsc::Receiver<()>,
    pending: Arc<AtomicUsize>,
}

impl CompletionBarrier {
    /// Create a barrier with no outstanding completions
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(1);
        Self {
            tx,
            rx,
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Hand out a new completion the barrier will wait for
    pub fn completion(&self) -> Completion {
        self.pending.fetch_add(1, Ordering::SeqCst);
        Completion {
            _tx: self.tx.clone(),
            pending: Arc::clone(&self.pending),
        }
    }

    /// Number of completions that have not fired yet
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Wait until every handed-out completion has fired
    pub async fn wait(self) {
        let Self { tx, mut rx, .. } = self;
        drop(tx);

        // Resolves with `None` once the last completion is gone.
        while rx.recv().await.is_some() {}
    }
}

impl Default for CompletionBarrier {
    fn default() -> Self {
        Self::new()
    }
}
