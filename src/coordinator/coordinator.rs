// ABOUTME: Table coordinator - the monitor philosophers call to eat and to talk.
// ABOUTME: One lock over the seating, broadcast wake-ups, and cancel-safe waits.

use parking_lot::Mutex;
use tokio::sync::Notify;
use tracing::{debug, trace};

use super::seating::{PhilosopherId, Request, Seating, TableSnapshot};
use crate::error::MonitorError;

/// Monitor arbitrating the utensils and the speaking token.
///
/// Every operation runs inside a single critical section. Blocking
/// operations release it while they wait and re-check their own
/// eligibility each time another philosopher releases something.
///
/// # Guarantees
///
/// - **Utensils:** two neighbours are never both eating.
/// - **Token:** at most one philosopher holds the speaking token.
/// - **Fairness:** a philosopher at the head of the meal queue can only be
///   overtaken by philosophers that are not its neighbours; the talk queue
///   is strict FIFO.
///
/// # Cancel safety
///
/// The blocking operations are cancel safe. Dropping a pending
/// `acquire_resources` or `request_token` future withdraws the request, so
/// an abandoned queue entry never holds back anyone else.
///
/// # Contract
///
/// Ids must be in `[0, philosophers)`. An out-of-range id, a second request
/// from a philosopher whose first request is still queued, or a meal request
/// from a philosopher that is already eating, panics.
pub struct Coordinator {
    seating: Mutex<Seating>,
    released: Notify,
}

impl Coordinator {
    /// Seat `philosophers` philosophers, all thinking.
    ///
    /// # Panics
    ///
    /// Panics if `philosophers` is zero.
    pub fn new(philosophers: usize) -> Self {
        Self {
            seating: Mutex::new(Seating::new(philosophers)),
            released: Notify::new(),
        }
    }

    /// Number of seats at the table.
    pub fn philosophers(&self) -> usize {
        self.seating.lock().len()
    }

    /// Wait until `id` may use both adjacent utensils, then mark it eating.
    pub async fn acquire_resources(&self, id: PhilosopherId) {
        self.seating.lock().join_meal_queue(id);
        trace!(id, "waiting for utensils");

        let pending = PendingRequest::new(self, id, Request::Meal);
        self.wait_until(|seating| seating.try_start_eating(id)).await;
        pending.complete();

        debug!(id, "utensils granted");
    }

    /// Like [`acquire_resources`](Self::acquire_resources), but gives up when
    /// `cancel` completes first.
    ///
    /// Returns `Err(MonitorError::Interrupted)` if cancelled. The request is
    /// withdrawn and the philosopher is back to thinking.
    pub async fn acquire_resources_with_cancel<F>(
        &self,
        id: PhilosopherId,
        cancel: F,
    ) -> Result<(), MonitorError>
    where
        F: std::future::Future<Output = ()>,
    {
        tokio::pin!(cancel);

        tokio::select! {
            biased;
            () = &mut cancel => Err(MonitorError::Interrupted { id, request: Request::Meal }),
            () = self.acquire_resources(id) => Ok(()),
        }
    }

    /// Put `id`'s utensils down and wake everyone waiting.
    ///
    /// A no-op if `id` is not eating.
    pub fn release_resources(&self, id: PhilosopherId) {
        let released = self.seating.lock().finish_eating(id);
        if !released {
            debug!(id, "release_resources ignored: not eating");
            return;
        }

        debug!(id, "utensils released");
        self.released.notify_waiters();
    }

    /// Wait until `id` may speak, then hand it the speaking token.
    pub async fn request_token(&self, id: PhilosopherId) {
        self.seating.lock().join_talk_queue(id);
        trace!(id, "waiting for the speaking token");

        let pending = PendingRequest::new(self, id, Request::Token);
        self.wait_until(|seating| seating.try_start_talking(id)).await;
        pending.complete();

        debug!(id, "speaking token granted");
    }

    /// Like [`request_token`](Self::request_token), but gives up when
    /// `cancel` completes first.
    pub async fn request_token_with_cancel<F>(
        &self,
        id: PhilosopherId,
        cancel: F,
    ) -> Result<(), MonitorError>
    where
        F: std::future::Future<Output = ()>,
    {
        tokio::pin!(cancel);

        tokio::select! {
            biased;
            () = &mut cancel => Err(MonitorError::Interrupted { id, request: Request::Token }),
            () = self.request_token(id) => Ok(()),
        }
    }

    /// Take the speaking token back and wake everyone waiting.
    ///
    /// A no-op if nobody holds the token.
    pub fn release_token(&self) {
        let Some(speaker) = self.seating.lock().finish_talking() else {
            debug!("release_token ignored: nobody is speaking");
            return;
        };

        debug!(id = speaker, "speaking token released");
        self.released.notify_waiters();
    }

    /// A consistent copy of every philosopher's state and both queues.
    pub fn snapshot(&self) -> TableSnapshot {
        self.seating.lock().snapshot()
    }

    /// Suspend until `grant` succeeds under the lock.
    ///
    /// The wake-up is registered before the lock is released, so a release
    /// landing between the failed check and the suspension is never missed.
    async fn wait_until<F>(&self, mut grant: F)
    where
        F: FnMut(&mut Seating) -> bool,
    {
        loop {
            let notified = self.released.notified();
            tokio::pin!(notified);

            {
                let mut seating = self.seating.lock();
                if grant(&mut seating) {
                    return;
                }
                notified.as_mut().enable();
            }

            notified.await;
        }
    }

    /// Remove an ungranted request and let the others re-check.
    fn withdraw(&self, id: PhilosopherId, request: Request) {
        let withdrawn = {
            let mut seating = self.seating.lock();
            match request {
                Request::Meal => seating.leave_meal_queue(id),
                Request::Token => seating.leave_talk_queue(id),
            }
        };

        if withdrawn {
            debug!(id, %request, "request withdrawn");
            self.released.notify_waiters();
        }
    }
}

/// Withdraws a queued request unless it was granted.
///
/// Lives across the wait inside the blocking operations, so dropping their
/// future at any await point leaves the queues clean.
struct PendingRequest<'a> {
    coordinator: &'a Coordinator,
    id: PhilosopherId,
    request: Request,
    granted: bool,
}

impl<'a> PendingRequest<'a> {
    fn new(coordinator: &'a Coordinator, id: PhilosopherId, request: Request) -> Self {
        Self {
            coordinator,
            id,
            request,
            granted: false,
        }
    }

    fn complete(mut self) {
        self.granted = true;
    }
}

impl Drop for PendingRequest<'_> {
    fn drop(&mut self) {
        if !self.granted {
            self.coordinator.withdraw(self.id, self.request);
        }
    }
}
