//! Identifier directory: the thing an availability probe asks

use async_trait::async_trait;
use std::time::Duration;

/// Lookup of whether an identifier is still free
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsernameDirectory: Send + Sync {
    /// True if nobody holds `identifier` yet
    async fn is_available(&self, identifier: &str) -> bool;
}

/// Directory that answers from a fixed reserved list after a delay
#[derive(Debug, Clone)]
pub struct SimulatedDirectory {
    reserved: Vec<String>,
    latency: Duration,
}

impl SimulatedDirectory {
    pub fn new(reserved: Vec<String>, latency: Duration) -> Self {
        let reserved = reserved.into_iter().map(|s| s.to_lowercase()).collect();
        Self { reserved, latency }
    }
}

#[async_trait]
impl UsernameDirectory for SimulatedDirectory {
    async fn is_available(&self, identifier: &str) -> bool {
        tokio::time::sleep(self.latency).await;
        let wanted = identifier.to_lowercase();
        !self.reserved.iter().any(|taken| *taken == wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_reserved_names_are_taken() {
        let directory = SimulatedDirectory::new(
            vec!["Admin".to_string(), "neo".to_string()],
            Duration::from_millis(500),
        );
        assert!(!directory.is_available("admin").await);
        assert!(!directory.is_available("NEO").await);
        assert!(directory.is_available("trinity").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_waits_for_latency() {
        let directory = SimulatedDirectory::new(vec![], Duration::from_millis(500));
        let start = tokio::time::Instant::now();
        directory.is_available("anyone").await;
        assert!(start.elapsed() >= Duration::from_millis(500));
    }
}
