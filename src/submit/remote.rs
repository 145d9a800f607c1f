//! Simulated remote authority
//!
//! Stands in for the server a real login/signup would talk to. The
//! simulated implementation answers from a fixed demo account list after a
//! configurable delay and can have failures injected for tests.

use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::config::DemoAccount;

/// What gets sent to the authority
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRequest {
    Login {
        email: String,
        password: String,
    },
    Signup {
        first_name: String,
        last_name: String,
        username: String,
        email: String,
        password: String,
    },
}

/// Identity confirmed by the authority
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Granted {
    pub display_name: String,
}

/// Failure reported by the authority
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteFailure {
    /// The request was understood and refused
    #[error("{0}")]
    Rejected(String),

    /// The authority could not be reached; worth retrying
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl RemoteFailure {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Trait for remote authority operations, enabling mocking in tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteAuthority: Send + Sync {
    async fn authenticate(&self, request: &SubmitRequest) -> Result<Granted, RemoteFailure>;
}

pub const INVALID_CREDENTIALS: &str = "Invalid credentials. Access denied.";
pub const ALREADY_REGISTERED: &str = "Identity already registered.";

/// Authority backed by the configured demo accounts
#[derive(Debug)]
pub struct SimulatedAuthority {
    accounts: Vec<DemoAccount>,
    latency: Duration,
    /// Emails registered during this process
    registered: Mutex<HashSet<String>>,
    /// Failures returned, in order, before any real answer
    faults: Mutex<VecDeque<RemoteFailure>>,
}

impl SimulatedAuthority {
    pub fn new(accounts: Vec<DemoAccount>, latency: Duration) -> Self {
        Self {
            accounts,
            latency,
            registered: Mutex::new(HashSet::new()),
            faults: Mutex::new(VecDeque::new()),
        }
    }

    /// Queue failures to return from the next attempts
    pub fn with_faults(self, faults: impl IntoIterator<Item = RemoteFailure>) -> Self {
        Self {
            faults: Mutex::new(faults.into_iter().collect()),
            ..self
        }
    }

    fn normalize(email: &str) -> String {
        email.trim().to_lowercase()
    }

    fn find_account(&self, email: &str) -> Option<&DemoAccount> {
        let wanted = Self::normalize(email);
        self.accounts
            .iter()
            .find(|account| Self::normalize(&account.email) == wanted)
    }
}

#[async_trait]
impl RemoteAuthority for SimulatedAuthority {
    async fn authenticate(&self, request: &SubmitRequest) -> Result<Granted, RemoteFailure> {
        tokio::time::sleep(self.latency).await;

        if let Some(fault) = self.faults.lock().await.pop_front() {
            tracing::debug!("Returning injected fault: {fault}");
            return Err(fault);
        }

        match request {
            SubmitRequest::Login { email, password } => match self.find_account(email) {
                Some(account) if account.password == *password => Ok(Granted {
                    display_name: account.display_name.clone(),
                }),
                _ => Err(RemoteFailure::Rejected(INVALID_CREDENTIALS.to_string())),
            },
            SubmitRequest::Signup {
                first_name, email, ..
            } => {
                let key = Self::normalize(email);
                let mut registered = self.registered.lock().await;
                if self.find_account(email).is_some() || registered.contains(&key) {
                    return Err(RemoteFailure::Rejected(ALREADY_REGISTERED.to_string()));
                }
                registered.insert(key);
                Ok(Granted {
                    display_name: first_name.trim().to_string(),
                })
            }
        }
    }
}
