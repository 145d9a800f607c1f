//! Identifier availability status

/// Availability of a proposed identifier such as a username
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AvailabilityStatus {
    /// Too short to check, or not checked yet
    #[default]
    Unknown,
    Checking,
    Available,
    Taken,
}

impl AvailabilityStatus {
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Available | Self::Taken)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Unknown => "",
            Self::Checking => "checking",
            Self::Available => "available",
            Self::Taken => "taken",
        }
    }
}
