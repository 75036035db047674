//! Single-shot delivery of a serialized snapshot.
//!
//! Strategies receive a [`DeliverySink`] and may complete synchronously, from
//! another thread, or from a tokio task. The verifier waits once, bounded by
//! a timeout, and resolves to exactly one [`Delivery`] state.

use std::time::Duration;
use tokio::sync::mpsc;

/// How a wait for a snapshot ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Exactly one value arrived in time
    Delivered(String),
    /// Nothing arrived before the timeout
    TimedOut,
    /// Delivered twice, cancelled, or every sink dropped without delivering
    Violated,
}

#[derive(Debug)]
enum Signal {
    Value(String),
    Cancelled,
}

/// Handle a strategy uses to hand over its snapshot.
#[derive(Clone, Debug)]
pub struct DeliverySink {
    sender: mpsc::UnboundedSender<Signal>,
}

impl DeliverySink {
    pub fn deliver(&self, snapshot: impl Into<String>) {
        self.send(Signal::Value(snapshot.into()));
    }

    /// Give up without a value; the assertion fails as undeliverable.
    pub fn cancel(&self) {
        self.send(Signal::Cancelled);
    }

    fn send(&self, signal: Signal) {
        if self.sender.send(signal).is_err() {
            // The verifier stopped waiting (timeout) before this arrived
            log::debug!(target: "kakikomi::verify", "Dropped late snapshot delivery");
        }
    }
}

/// Receiving half, consumed by a single [`DeliveryReceiver::wait`].
#[derive(Debug)]
pub struct DeliveryReceiver {
    receiver: mpsc::UnboundedReceiver<Signal>,
}

pub fn channel() -> (DeliverySink, DeliveryReceiver) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (DeliverySink { sender }, DeliveryReceiver { receiver })
}

impl DeliveryReceiver {
    /// Wait up to `timeout` for the first signal.
    ///
    /// A second value already queued behind the first counts as a violation.
    /// The receiver is gone once this returns, so a second value sent later
    /// is dropped (logged at debug) and the first one stands. The producing
    /// side is never cancelled on timeout.
    pub async fn wait(mut self, timeout: Duration) -> Delivery {
        match tokio::time::timeout(timeout, self.receiver.recv()).await {
            Err(_) => Delivery::TimedOut,
            Ok(None) | Ok(Some(Signal::Cancelled)) => Delivery::Violated,
            Ok(Some(Signal::Value(snapshot))) => match self.receiver.try_recv() {
                Ok(_) => Delivery::Violated,
                Err(_) => Delivery::Delivered(snapshot),
            },
        }
    }
}
