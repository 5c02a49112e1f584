//! Polling until a long-running server operation finishes.
//!
//! There is no internal timeout: a wait ends on a terminal status, a fetch
//! error, or cancellation through a [`CancelSignal`].

use crate::error::{ClientError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;

/// A status that may be final.
pub trait Terminal {
    fn is_terminal(&self) -> bool;
}

/// Cancels every [`CancelSignal`] created with it.
#[derive(Debug)]
pub struct CancelHandle(watch::Sender<bool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }
}

#[derive(Debug, Clone)]
pub struct CancelSignal(watch::Receiver<bool>);

impl CancelSignal {
    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow()
    }

    /// Resolves once cancelled. Never resolves if the handle is dropped
    /// without cancelling.
    async fn cancelled(&mut self) {
        loop {
            if *self.0.borrow_and_update() {
                return;
            }
            if self.0.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

pub fn cancellation() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle(tx), CancelSignal(rx))
}

/// Call `fetch` every `interval` until it returns a terminal status.
pub async fn wait_for_completion<T, F, Fut>(
    mut fetch: F,
    interval: Duration,
    mut cancel: Option<CancelSignal>,
) -> Result<T>
where
    T: Terminal,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut polls = 0u32;
    loop {
        if cancel.as_ref().is_some_and(CancelSignal::is_cancelled) {
            tracing::warn!("Wait cancelled after {} polls", polls);
            return Err(ClientError::Cancelled);
        }
        let status = fetch().await?;
        polls += 1;
        if status.is_terminal() {
            tracing::debug!("Operation finished after {} polls", polls);
            return Ok(status);
        }
        match cancel.as_mut() {
            Some(signal) => {
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = signal.cancelled() => {
                        tracing::warn!("Wait cancelled after {} polls", polls);
                        return Err(ClientError::Cancelled);
                    }
                }
            }
            None => tokio::time::sleep(interval).await,
        }
    }
}
