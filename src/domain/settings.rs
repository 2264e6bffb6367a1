// Operator-controlled system settings
use crate::domain::reading::ChannelId;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::str::FromStr;

pub const VOLTAGE_CALIBRATION_RANGE: RangeInclusive<f64> = -20.0..=20.0;
pub const CURRENT_LIMIT_RANGE: RangeInclusive<f64> = 1.0..=10.0;
pub const DEFAULT_CURRENT_LIMIT: f64 = 7.0;
pub const DEFAULT_MAX_POWER_LIMIT: u32 = 2500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemMode {
    #[serde(rename = "AUTO-PILOT")]
    AutoPilot,
    #[serde(rename = "MANUAL")]
    Manual,
    #[serde(rename = "STANDBY")]
    Standby,
    #[serde(rename = "SHUTDOWN")]
    Shutdown,
}

impl SystemMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemMode::AutoPilot => "AUTO-PILOT",
            SystemMode::Manual => "MANUAL",
            SystemMode::Standby => "STANDBY",
            SystemMode::Shutdown => "SHUTDOWN",
        }
    }
}

impl std::fmt::Display for SystemMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SystemMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AUTO-PILOT" => Ok(SystemMode::AutoPilot),
            "MANUAL" => Ok(SystemMode::Manual),
            "STANDBY" => Ok(SystemMode::Standby),
            "SHUTDOWN" => Ok(SystemMode::Shutdown),
            other => Err(format!("unknown system mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemSettings {
    pub mode: SystemMode,
    pub channel1_enabled: bool,
    pub channel2_enabled: bool,
    pub voltage_calibration: f64,
    pub current_limit: f64,
    pub max_power_limit: u32,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            mode: SystemMode::AutoPilot,
            channel1_enabled: true,
            channel2_enabled: true,
            voltage_calibration: 0.0,
            current_limit: DEFAULT_CURRENT_LIMIT,
            max_power_limit: DEFAULT_MAX_POWER_LIMIT,
        }
    }
}

impl SystemSettings {
    pub fn is_enabled(&self, channel: ChannelId) -> bool {
        match channel {
            ChannelId::One => self.channel1_enabled,
            ChannelId::Two => self.channel2_enabled,
        }
    }

    pub fn set_enabled(&mut self, channel: ChannelId, enabled: bool) {
        match channel {
            ChannelId::One => self.channel1_enabled = enabled,
            ChannelId::Two => self.channel2_enabled = enabled,
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.mode == SystemMode::Shutdown
    }
}

/// Clamp a slider value into its declared range. Non-finite input yields `None`.
pub fn clamp_to_range(value: f64, range: &RangeInclusive<f64>) -> Option<f64> {
    value
        .is_finite()
        .then(|| value.clamp(*range.start(), *range.end()))
}

/// Parse a max power limit from free text.
///
/// Leading whitespace and a sign are accepted and the integer prefix is used,
/// so `"3000W"` and `"12.9"` parse as 3000 and 12. Anything that does not
/// yield a positive integer is rejected.
pub fn parse_power_limit(input: &str) -> Option<u32> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 || negative {
        return None;
    }

    rest[..digits_len].parse::<u32>().ok().filter(|limit| *limit > 0)
}
