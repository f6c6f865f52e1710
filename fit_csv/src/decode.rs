//! FIT decoding boundary.
//!
//! Everything that touches [`fitparser`] types lives here. Records are turned
//! into [`FieldMap`]s with positions in degrees and timestamps in UTC, then
//! reduced to [`Message`]s.

use std::{fs::File, io::BufReader, path::Path};

use fitparser::{FitDataRecord, Value};
use time::{Duration, OffsetDateTime, PrimitiveDateTime, error::ComponentRange};

use crate::{Error, FieldMap, FieldValue, Message};

const SEMICIRCLES: &str = "semicircles";
/// 2^31 semicircles span 180 degrees
const DEGREES_PER_SEMICIRCLE: f64 = 180.0 / 2_147_483_648.0;

/// Decode every data message of a FIT file, in file order.
pub fn read_messages(path: &Path) -> Result<Vec<Message>, Error> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records =
        fitparser::from_reader(&mut BufReader::new(file)).map_err(|source| Error::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    records
        .iter()
        .map(|record| {
            let fields = field_map(record).map_err(|source| Error::InvalidTimestamp {
                path: path.to_path_buf(),
                source,
            })?;

            Message::classify(&fields).map_err(|source| Error::Malformed {
                path: path.to_path_buf(),
                source,
            })
        })
        .collect()
}

pub fn field_map(record: &FitDataRecord) -> Result<FieldMap, ComponentRange> {
    record
        .fields()
        .iter()
        .map(|field| {
            let value = match field.value() {
                Value::Timestamp(timestamp) => FieldValue::Timestamp(utc(
                    timestamp.timestamp(),
                    timestamp.timestamp_subsec_nanos(),
                )?),
                value => field_value(value, field.units()),
            };

            Ok::<_, ComponentRange>((field.name().to_string(), value))
        })
        .collect()
}

/// Convert a non-timestamp value. Positions in semicircles become degrees.
///
/// An array with any invalid element is [`FieldValue::Missing`] as a whole, so
/// sample positions never shift.
pub fn field_value(value: &Value, units: &str) -> FieldValue {
    let scale = match units {
        SEMICIRCLES => DEGREES_PER_SEMICIRCLE,
        _ => 1.0,
    };

    match value {
        Value::Array(values) => values
            .iter()
            .map(|this| number(this).map(|this| this * scale))
            .collect::<Option<Vec<_>>>()
            .map(FieldValue::Numbers)
            .unwrap_or(FieldValue::Missing),
        Value::String(text) => FieldValue::Text(text.clone()),
        value => number(value)
            .map(|this| FieldValue::Number(this * scale))
            .unwrap_or(FieldValue::Missing),
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Float32(v) => Some(*v as f64),
        Value::Float64(v) => Some(*v),
        Value::SInt8(v) => Some(*v as f64),
        Value::UInt8(v) => Some(*v as f64),
        Value::UInt8z(v) => Some(*v as f64),
        Value::SInt16(v) => Some(*v as f64),
        Value::UInt16(v) => Some(*v as f64),
        Value::UInt16z(v) => Some(*v as f64),
        Value::SInt32(v) => Some(*v as f64),
        Value::UInt32(v) => Some(*v as f64),
        Value::UInt32z(v) => Some(*v as f64),
        Value::SInt64(v) => Some(*v as f64),
        Value::UInt64(v) => Some(*v as f64),
        Value::UInt64z(v) => Some(*v as f64),
        Value::Byte(v) | Value::Enum(v) => Some(*v as f64),
        _ => None,
    }
}

/// Unix seconds plus nanoseconds as a naive UTC date-time.
fn utc(seconds: i64, nanos: u32) -> Result<PrimitiveDateTime, ComponentRange> {
    let utc = OffsetDateTime::from_unix_timestamp(seconds)? + Duration::nanoseconds(nanos as i64);

    Ok(PrimitiveDateTime::new(utc.date(), utc.time()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use time::macros::datetime;

    use crate::{ACCEL_X, ACCEL_Y, ACCEL_Z, MessageError, TIMESTAMP};

    #[test]
    fn semicircles_to_degrees() {
        let actual = field_value(&Value::SInt32(536_870_912), SEMICIRCLES);

        assert_eq!(FieldValue::Number(45.0), actual);
    }

    #[test]
    fn negative_semicircles() {
        let actual = field_value(&Value::SInt32(-1_073_741_824), SEMICIRCLES);

        assert_eq!(FieldValue::Number(-90.0), actual);
    }

    #[test]
    fn other_units_are_kept() {
        let actual = field_value(&Value::UInt8(120), "bpm");

        assert_eq!(FieldValue::Number(120.0), actual);
    }

    #[test]
    fn sample_array() {
        let actual = field_value(
            &Value::Array(vec![
                Value::SInt16(-12),
                Value::SInt16(0),
                Value::SInt16(1005),
            ]),
            "mG",
        );

        assert_eq!(FieldValue::Numbers(vec![-12.0, 0.0, 1005.0]), actual);
    }

    #[test]
    fn array_with_invalid_sample() {
        let actual = field_value(
            &Value::Array(vec![Value::SInt16(1), Value::Invalid, Value::SInt16(3)]),
            "mG",
        );

        assert_eq!(FieldValue::Missing, actual);
    }

    #[test]
    fn burst_with_invalid_samples_is_rejected() {
        let axis = |values: [Option<i16>; 3]| {
            field_value(
                &Value::Array(
                    values
                        .into_iter()
                        .map(|this| this.map(Value::SInt16).unwrap_or(Value::Invalid))
                        .collect(),
                ),
                "mG",
            )
        };

        let fields = FieldMap::new()
            .with(TIMESTAMP, FieldValue::Timestamp(datetime!(2024-01-01 00:00:00)))
            .with(ACCEL_X, axis([Some(1), None, Some(3)]))
            .with(ACCEL_Y, axis([None, Some(2), Some(3)]))
            .with(ACCEL_Z, axis([Some(1), Some(2), None]));

        assert_eq!(
            Err(MessageError::InvalidSamples { field: ACCEL_X }),
            Message::classify(&fields)
        );
    }

    #[test]
    fn text() {
        let actual = field_value(&Value::String("running".to_string()), "");

        assert_eq!(FieldValue::Text("running".to_string()), actual);
    }

    #[test]
    fn unix_to_utc() {
        let actual = utc(1_631_065_600, 250_000_000).expect("in range");

        assert_eq!(datetime!(2021-09-08 01:46:40.25), actual);
    }
}
