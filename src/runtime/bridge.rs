//! Hand-off channel between workflow agents and blocked API callers.
//!
//! Agents finish work at their own pace while an HTTP handler waits for the
//! outcome. The bridge is a bounded queue: agents `put` without awaiting,
//! the handler `get`s with a deadline.

use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::Mutex;
use tracing::warn;

pub const DEFAULT_CAPACITY: usize = 8;

/// Outcome of waiting on the bridge. A missed deadline is an expected
/// outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeReply {
    Delivered(Value),
    TimedOut,
}

/// Producer half, held by agents. Cloneable so several workflow stages can
/// report through the same bridge.
#[derive(Clone)]
pub struct ResponseWriter {
    tx: mpsc::Sender<Value>,
}

impl ResponseWriter {
    /// Queues `value` for the waiting caller without blocking. If the queue
    /// is full or the reader is gone the value is logged and dropped; the
    /// caller observes its deadline instead.
    pub fn put(&self, value: Value) {
        match self.tx.try_send(value) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!("Response bridge full, dropping value");
            }
            Err(TrySendError::Closed(_)) => {
                warn!("Response bridge closed, dropping value");
            }
        }
    }
}

/// Consumer half, held by the API layer. One value per call, FIFO.
pub struct ResponseReader {
    rx: Mutex<mpsc::Receiver<Value>>,
}

impl ResponseReader {
    /// Waits up to `timeout` for the next value. Returns `TimedOut` when the
    /// deadline passes or when every writer has been dropped.
    pub async fn get(&self, timeout: Duration) -> BridgeReply {
        let mut rx = self.rx.lock().await;
        match tokio::time::timeout(timeout, rx.recv()).await {
            Ok(Some(value)) => BridgeReply::Delivered(value),
            Ok(None) => BridgeReply::TimedOut,
            Err(_) => BridgeReply::TimedOut,
        }
    }
}

/// Creates a connected writer/reader pair with room for `capacity` undrained
/// values.
pub fn channel(capacity: usize) -> (ResponseWriter, ResponseReader) {
    let (tx, rx) = mpsc::channel(capacity);
    (ResponseWriter { tx }, ResponseReader { rx: Mutex::new(rx) })
}
