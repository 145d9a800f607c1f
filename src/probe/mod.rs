//! Availability probing for identifier fields

mod directory;
mod prober;

pub use directory::{SimulatedDirectory, UsernameDirectory};
pub use prober::{AvailabilityProber, ProbeTicket, TAKEN_MESSAGE};

#[cfg(test)]
pub use directory::MockUsernameDirectory;
