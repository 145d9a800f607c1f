//! Presentation gateway: the port the workflow renders through

mod channel;
mod traits;

pub use channel::{ChannelGateway, PresentationEvent};
pub use traits::{BusyControl, Cue, PresentationGateway, Severity};

#[cfg(test)]
pub use channel::drain;
#[cfg(test)]
pub use traits::MockPresentationGateway;
