// Channel view domain model - what an operator sees for one power line
use serde::Serialize;

/// Shown for fields that do not apply (channel offline, no power flowing).
pub const PLACEHOLDER: &str = "-";
/// Shown for fields whose data could not be fetched.
pub const NOT_AVAILABLE: &str = "N/A";
/// Mains frequency shown for any online channel.
pub const NOMINAL_FREQUENCY: &str = "50.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChannelStatus {
    Nominal,
    Warning,
    Error,
    Offline,
    Overload,
}

impl std::fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            ChannelStatus::Nominal => "NOMINAL",
            ChannelStatus::Warning => "WARNING",
            ChannelStatus::Error => "ERROR",
            ChannelStatus::Offline => "OFFLINE",
            ChannelStatus::Overload => "OVERLOAD",
        };
        f.write_str(tag)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelView {
    pub voltage: String,
    pub current: String,
    pub frequency: String,
    pub power: String,
    pub efficiency: String,
    pub status: ChannelStatus,
}

impl ChannelView {
    pub fn offline() -> Self {
        Self::filled(PLACEHOLDER, ChannelStatus::Offline)
    }

    pub fn unavailable() -> Self {
        Self::filled(NOT_AVAILABLE, ChannelStatus::Error)
    }

    fn filled(marker: &str, status: ChannelStatus) -> Self {
        Self {
            voltage: marker.to_string(),
            current: marker.to_string(),
            frequency: marker.to_string(),
            power: marker.to_string(),
            efficiency: marker.to_string(),
            status,
        }
    }
}

impl Default for ChannelView {
    fn default() -> Self {
        Self::offline()
    }
}
