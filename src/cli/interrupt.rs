//! Ctrl+C handling.
//!
//! A background task counts Ctrl+C presses into a watch channel. Loops
//! and prompts wait on [`Interrupts::recv`], which resolves once per
//! press not yet seen. A press during a swap is therefore seen at the
//! next prompt or loop delay instead of killing the process.

use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Interrupts {
    rx: watch::Receiver<u64>,
}

/// Fires interrupts by hand. Used in tests and for non-signal shutdown.
#[derive(Debug)]
pub struct InterruptTrigger {
    tx: watch::Sender<u64>,
}

impl InterruptTrigger {
    pub fn fire(&self) {
        self.tx.send_modify(|n| *n += 1);
    }
}

impl Interrupts {
    /// Start listening for Ctrl+C. Must be called inside a tokio runtime.
    pub fn listen() -> Self {
        let (tx, rx) = watch::channel(0u64);
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                debug!("Ctrl+C received");
                tx.send_modify(|n| *n += 1);
            }
        });
        Self { rx }
    }

    /// An interrupt source driven only by the returned trigger.
    pub fn manual() -> (InterruptTrigger, Self) {
        let (tx, rx) = watch::channel(0u64);
        (InterruptTrigger { tx }, Self { rx })
    }

    /// Forget presses that happened before now.
    pub fn reset(&mut self) {
        self.rx.borrow_and_update();
    }

    /// Wait for the next unseen press. Never resolves once the sender is gone.
    pub async fn recv(&mut self) {
        if self.rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
