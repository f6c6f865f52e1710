use std::collections::BTreeMap;

use kinematics::{Burst, BurstError};
use time::PrimitiveDateTime;

pub const TIMESTAMP: &str = "timestamp";
pub const ACCEL_X: &str = "compressed_calibrated_accel_x";
pub const ACCEL_Y: &str = "compressed_calibrated_accel_y";
pub const ACCEL_Z: &str = "compressed_calibrated_accel_z";
pub const HEART_RATE: &str = "heart_rate";
pub const POSITION_LAT: &str = "position_lat";
pub const POSITION_LONG: &str = "position_long";
pub const MAG_X: &str = "mag_x";
pub const MAG_Y: &str = "mag_y";
pub const MAG_Z: &str = "mag_z";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MessageError {
    #[error("Accelerometer field `{field}` holds invalid samples")]
    InvalidSamples { field: &'static str },
    #[error(transparent)]
    Burst(#[from] BurstError),
}

/// Decoded value of a single field, already in standard units.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Timestamp(PrimitiveDateTime),
    Number(f64),
    Numbers(Vec<f64>),
    Text(String),
    /// Field is defined in the message but carries no usable value
    Missing,
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Numbers(values) if values.len() == 1 => values.first().copied(),
            _ => None,
        }
    }

    /// Scalars are treated as a single sample.
    pub fn to_samples(&self) -> Vec<f64> {
        match self {
            Self::Number(value) => vec![*value],
            Self::Numbers(values) => values.clone(),
            _ => Vec::new(),
        }
    }

    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// All fields of one decoded message, by name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldMap(BTreeMap<String, FieldValue>);

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.0.insert(name.into(), value);
    }

    pub fn with(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn timestamp(&self) -> Option<PrimitiveDateTime> {
        match self.get(TIMESTAMP) {
            Some(FieldValue::Timestamp(timestamp)) => Some(*timestamp),
            _ => None,
        }
    }

    fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FieldValue::as_number)
    }

    fn samples(&self, name: &str) -> Vec<f64> {
        self.get(name).map(FieldValue::to_samples).unwrap_or_default()
    }

    /// An absent axis has no samples. A present one must be fully valid.
    fn accel_samples(&self, field: &'static str) -> Result<Vec<f64>, MessageError> {
        match self.get(field) {
            None => Ok(Vec::new()),
            Some(value @ (FieldValue::Number(_) | FieldValue::Numbers(_))) => {
                Ok(value.to_samples())
            }
            Some(_) => Err(MessageError::InvalidSamples { field }),
        }
    }
}

impl FromIterator<(String, FieldValue)> for FieldMap {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Magnetometer axes. Each axis may hold one reading or a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct MagReading {
    pub timestamp: PrimitiveDateTime,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    AccelBurst(Burst),
    HeartRate {
        timestamp: PrimitiveDateTime,
        bpm: Option<u8>,
    },
    GpsFix {
        timestamp: PrimitiveDateTime,
        /// Degrees
        lat: Option<f64>,
        /// Degrees
        lon: Option<f64>,
    },
    Unrecognized,
}

/// A message reduced to the shapes the converter understands.
///
/// `payload` holds at most one of burst, heart rate or GPS fix, picked in that
/// priority. A magnetometer reading rides along on any of them.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub payload: Payload,
    pub magnetometer: Option<MagReading>,
}

impl Message {
    pub const fn unrecognized() -> Self {
        Self {
            payload: Payload::Unrecognized,
            magnetometer: None,
        }
    }

    /// # Errors
    /// - [`MessageError::InvalidSamples`] when an accelerometer axis is present but unusable
    /// - [`BurstError::LengthMismatch`] when the accelerometer axes disagree on sample count
    pub fn classify(fields: &FieldMap) -> Result<Self, MessageError> {
        let has_payload = [ACCEL_X, HEART_RATE, POSITION_LAT]
            .iter()
            .any(|name| fields.contains(name));
        let has_magnetometer = fields.get(MAG_X).is_some_and(|this| !this.is_missing());

        if !has_payload && !has_magnetometer {
            return Ok(Self::unrecognized());
        }

        let Some(timestamp) = fields.timestamp() else {
            tracing::warn!("Skipping message without timestamp");
            return Ok(Self::unrecognized());
        };

        let payload = if fields.contains(ACCEL_X) {
            Payload::AccelBurst(Burst::new(
                timestamp,
                fields.accel_samples(ACCEL_X)?,
                fields.accel_samples(ACCEL_Y)?,
                fields.accel_samples(ACCEL_Z)?,
            )?)
        } else if fields.contains(HEART_RATE) {
            Payload::HeartRate {
                timestamp,
                bpm: fields
                    .number(HEART_RATE)
                    .map(|bpm| bpm.round().clamp(0.0, u8::MAX as f64) as u8),
            }
        } else if fields.contains(POSITION_LAT) {
            Payload::GpsFix {
                timestamp,
                lat: fields.number(POSITION_LAT),
                lon: fields.number(POSITION_LONG),
            }
        } else {
            Payload::Unrecognized
        };

        let magnetometer = has_magnetometer.then(|| MagReading {
            timestamp,
            x: fields.samples(MAG_X),
            y: fields.samples(MAG_Y),
            z: fields.samples(MAG_Z),
        });

        Ok(Self {
            payload,
            magnetometer,
        })
    }
}
