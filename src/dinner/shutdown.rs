// ABOUTME: Shutdown signal shared by every philosopher at the table.
// ABOUTME: Triggering it interrupts whoever is blocked in the coordinator.

use tokio::sync::watch;

/// Sending half of a shutdown signal.
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl ShutdownTrigger {
    /// Ask every philosopher to stop.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

/// Receiving half of a shutdown signal. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: Option<watch::Receiver<bool>>,
}

impl Shutdown {
    /// Create a linked trigger and signal.
    pub fn channel() -> (ShutdownTrigger, Shutdown) {
        let (tx, rx) = watch::channel(false);
        (ShutdownTrigger { tx }, Shutdown { rx: Some(rx) })
    }

    /// A signal that never fires.
    pub fn never() -> Self {
        Self { rx: None }
    }

    /// Whether shutdown has been requested.
    pub fn is_triggered(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Completes once shutdown is requested.
    ///
    /// Never completes if the trigger is dropped without firing.
    pub async fn triggered(self) {
        if let Some(mut rx) = self.rx {
            let fired = rx.wait_for(|stop| *stop).await.is_ok();
            if fired {
                return;
            }
        }
        std::future::pending::<()>().await;
    }
}
