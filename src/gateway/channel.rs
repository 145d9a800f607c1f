//! Message-passing presentation adapter
//!
//! Turns every gateway call into a [`PresentationEvent`] on an unbounded
//! channel so a renderer (or a test) can subscribe without the workflow
//! knowing anything about it.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::traits::{BusyControl, Cue, PresentationGateway, Severity};

/// One request to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PresentationEvent {
    Notify { message: String, severity: Severity },
    PlayCue { cue: Cue },
    Redirect { target: String },
    ShowBusy { control: BusyControl },
    ClearBusy { control: BusyControl },
    ReplayEntrance { step: usize },
}

/// Gateway that forwards calls as [`PresentationEvent`]s
#[derive(Debug, Clone)]
pub struct ChannelGateway {
    tx: mpsc::UnboundedSender<PresentationEvent>,
}

impl ChannelGateway {
    /// Create a gateway and the receiving end of its event stream
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PresentationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: PresentationEvent) {
        // A dropped receiver just means nobody is rendering anymore
        if self.tx.send(event).is_err() {
            tracing::debug!("Presentation receiver closed, dropping event");
        }
    }
}

impl PresentationGateway for ChannelGateway {
    fn notify(&self, message: &str, severity: Severity) {
        self.send(PresentationEvent::Notify {
            message: message.to_string(),
            severity,
        });
    }

    fn play_cue(&self, cue: Cue) {
        self.send(PresentationEvent::PlayCue { cue });
    }

    fn redirect(&self, target: &str) {
        self.send(PresentationEvent::Redirect {
            target: target.to_string(),
        });
    }

    fn show_busy(&self, control: BusyControl) {
        self.send(PresentationEvent::ShowBusy { control });
    }

    fn clear_busy(&self, control: BusyControl) {
        self.send(PresentationEvent::ClearBusy { control });
    }

    fn replay_entrance_animation(&self, step: usize) {
        self.send(PresentationEvent::ReplayEntrance { step });
    }
}

/// Drain every event currently buffered in `rx`
#[cfg(test)]
pub fn drain(rx: &mut mpsc::UnboundedReceiver<PresentationEvent>) -> Vec<PresentationEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
