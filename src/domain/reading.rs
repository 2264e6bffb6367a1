// Reading domain model - the latest raw measurements for both channels
use serde::{Deserialize, Serialize};
use serde_json::Value;

const FIELDS: [&str; 4] = ["voltage1", "current1", "voltage2", "current2"];

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Reading {
    pub voltage1: f64,
    pub current1: f64,
    pub voltage2: f64,
    pub current2: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReadingValidationError {
    #[error("payload must be a JSON object")]
    NotAnObject,
    #[error("field `{0}` is missing")]
    MissingField(&'static str),
    #[error("field `{0}` must be a number")]
    NotANumber(&'static str),
}

/// Voltage and current of a single channel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChannelSample {
    pub voltage: f64,
    pub current: f64,
}

impl ChannelSample {
    pub fn power(&self) -> f64 {
        self.voltage * self.current
    }
}

impl Reading {
    pub fn new(voltage1: f64, current1: f64, voltage2: f64, current2: f64) -> Self {
        Self {
            voltage1,
            current1,
            voltage2,
            current2,
        }
    }

    /// Validate an untyped ingest payload. All four fields must be JSON numbers.
    pub fn from_payload(payload: &Value) -> Result<Self, ReadingValidationError> {
        let object = payload
            .as_object()
            .ok_or(ReadingValidationError::NotAnObject)?;

        let mut values = [0.0_f64; 4];
        for (slot, field) in values.iter_mut().zip(FIELDS) {
            let value = object
                .get(field)
                .ok_or(ReadingValidationError::MissingField(field))?;
            *slot = value
                .as_f64()
                .ok_or(ReadingValidationError::NotANumber(field))?;
        }

        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }

    pub fn channel(&self, channel: ChannelId) -> ChannelSample {
        match channel {
            ChannelId::One => ChannelSample {
                voltage: self.voltage1,
                current: self.current1,
            },
            ChannelId::Two => ChannelSample {
                voltage: self.voltage2,
                current: self.current2,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelId {
    One,
    Two,
}

impl ChannelId {
    pub const ALL: [ChannelId; 2] = [ChannelId::One, ChannelId::Two];

    pub fn index(self) -> usize {
        match self {
            ChannelId::One => 0,
            ChannelId::Two => 1,
        }
    }

    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(ChannelId::One),
            2 => Some(ChannelId::Two),
            _ => None,
        }
    }
}
