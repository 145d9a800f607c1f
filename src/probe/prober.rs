//! Debounced availability prober
//!
//! Every keystroke takes a new ticket. Only the task holding the latest
//! ticket may publish a status, so a lookup that resolves after the field
//! changed again is discarded. Tickets are handed out and checked while
//! holding the status channel's write lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::directory::UsernameDirectory;
use crate::gateway::{PresentationGateway, Severity};
use crate::state::AvailabilityStatus;

/// Warning shown when a probe reports the identifier as taken
pub const TAKEN_MESSAGE: &str = "Username already taken. Try adding numbers or symbols.";

/// Identifies one qualifying keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProbeTicket(pub u64);

struct ProbeShared {
    directory: Arc<dyn UsernameDirectory>,
    gateway: Arc<dyn PresentationGateway>,
    status: watch::Sender<AvailabilityStatus>,
    latest: AtomicU64,
}

impl ProbeShared {
    /// Invalidate every outstanding ticket, optionally forgetting the status
    fn supersede(&self, reset: bool) -> ProbeTicket {
        let mut ticket = ProbeTicket(0);
        self.status.send_if_modified(|status| {
            ticket = ProbeTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1);
            if reset && *status != AvailabilityStatus::Unknown {
                *status = AvailabilityStatus::Unknown;
                return true;
            }
            false
        });
        ticket
    }

    /// Store `status` if `ticket` is still the latest; false if it was not
    fn publish(&self, ticket: ProbeTicket, status: AvailabilityStatus) -> bool {
        self.status.send_if_modified(|current| {
            if self.latest.load(Ordering::SeqCst) != ticket.0 {
                return false;
            }
            *current = status;
            true
        })
    }

    async fn run(&self, ticket: ProbeTicket, identifier: String) {
        if !self.publish(ticket, AvailabilityStatus::Checking) {
            return;
        }
        tracing::debug!(%identifier, ticket = ticket.0, "Checking availability");

        let available = self.directory.is_available(&identifier).await;
        let status = if available {
            AvailabilityStatus::Available
        } else {
            AvailabilityStatus::Taken
        };
        if !self.publish(ticket, status) {
            tracing::debug!(%identifier, ticket = ticket.0, "Discarding superseded probe");
            return;
        }
        tracing::info!(%identifier, status = status.label(), "Availability resolved");

        if status == AvailabilityStatus::Taken {
            self.gateway.notify(TAKEN_MESSAGE, Severity::Warning);
        }
    }
}

/// Debounced availability check for one identifier field
pub struct AvailabilityProber {
    shared: Arc<ProbeShared>,
    debounce: Duration,
    min_len: usize,
    pending: Option<JoinHandle<()>>,
}

impl AvailabilityProber {
    pub fn new(
        directory: Arc<dyn UsernameDirectory>,
        gateway: Arc<dyn PresentationGateway>,
        debounce: Duration,
        min_len: usize,
    ) -> Self {
        let (status, _) = watch::channel(AvailabilityStatus::Unknown);
        Self {
            shared: Arc::new(ProbeShared {
                directory,
                gateway,
                status,
                latest: AtomicU64::new(0),
            }),
            debounce,
            min_len,
            pending: None,
        }
    }

    /// Current status of the field
    pub fn status(&self) -> AvailabilityStatus {
        *self.shared.status.borrow()
    }

    /// Watch status changes
    pub fn subscribe(&self) -> watch::Receiver<AvailabilityStatus> {
        self.shared.status.subscribe()
    }

    /// Supersede whatever is pending and hand out a fresh ticket
    fn take_ticket(&mut self, reset: bool) -> ProbeTicket {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.shared.supersede(reset)
    }

    /// Normalized identifier, or `None` if it is too short to probe
    fn qualifying(&self, identifier: &str) -> Option<String> {
        let trimmed = identifier.trim();
        (trimmed.chars().count() >= self.min_len).then(|| trimmed.to_string())
    }

    /// Feed a keystroke; the lookup starts once the field has been quiet
    /// for the debounce period
    pub fn input(&mut self, identifier: &str) -> ProbeTicket {
        let qualifying = self.qualifying(identifier);
        let ticket = self.take_ticket(qualifying.is_none());
        let Some(identifier) = qualifying else {
            return ticket;
        };

        let shared = Arc::clone(&self.shared);
        let debounce = self.debounce;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            shared.run(ticket, identifier).await;
        }));
        ticket
    }

    /// Check right away, bypassing the debounce timer
    pub async fn probe(&mut self, identifier: &str) -> AvailabilityStatus {
        let qualifying = self.qualifying(identifier);
        let ticket = self.take_ticket(qualifying.is_none());
        if let Some(identifier) = qualifying {
            self.shared.run(ticket, identifier).await;
        }
        self.status()
    }

    /// Drop any pending probe and forget the last result
    pub fn reset(&mut self) {
        self.take_ticket(true);
    }
}

impl Drop for AvailabilityProber {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
