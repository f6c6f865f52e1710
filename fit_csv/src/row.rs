use std::{fmt, io};

use kinematics::KinematicSample;
use time::{PrimitiveDateTime, macros::format_description};

use crate::MagReading;

/// Column order of every output file.
pub const COLUMNS: [&str; 17] = [
    "timestamp",
    "type",
    "accel_x",
    "accel_y",
    "accel_z",
    "heart_rate",
    "lat",
    "lon",
    "vel_x",
    "vel_y",
    "vel_z",
    "dis_x",
    "dis_y",
    "dis_z",
    "mag_x",
    "mag_y",
    "mag_z",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
pub enum RowKind {
    /// Acceleration with integrated velocity and displacement
    #[serde(rename = "A")]
    Acceleration,
    #[serde(rename = "H")]
    HeartRate,
    #[serde(rename = "G")]
    Gps,
    #[serde(rename = "M")]
    Magnetometer,
}

/// A magnetometer axis. Batches render as space separated values in one cell,
/// each formatted like the other float columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Readings(pub Vec<f64>);

impl fmt::Display for Readings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buffer = ryu::Buffer::new();

        for (index, value) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            f.write_str(buffer.format(*value))?;
        }

        Ok(())
    }
}

impl serde::Serialize for Readings {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One output line. Fields unrelated to `kind` stay `None` and render empty.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Row {
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: PrimitiveDateTime,
    #[serde(rename = "type")]
    pub kind: RowKind,
    pub accel_x: Option<f64>,
    pub accel_y: Option<f64>,
    pub accel_z: Option<f64>,
    pub heart_rate: Option<u8>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub vel_x: Option<f64>,
    pub vel_y: Option<f64>,
    pub vel_z: Option<f64>,
    pub dis_x: Option<f64>,
    pub dis_y: Option<f64>,
    pub dis_z: Option<f64>,
    pub mag_x: Option<Readings>,
    pub mag_y: Option<Readings>,
    pub mag_z: Option<Readings>,
}

impl Row {
    const fn empty(timestamp: PrimitiveDateTime, kind: RowKind) -> Self {
        Self {
            timestamp,
            kind,
            accel_x: None,
            accel_y: None,
            accel_z: None,
            heart_rate: None,
            lat: None,
            lon: None,
            vel_x: None,
            vel_y: None,
            vel_z: None,
            dis_x: None,
            dis_y: None,
            dis_z: None,
            mag_x: None,
            mag_y: None,
            mag_z: None,
        }
    }

    pub fn heart_rate(timestamp: PrimitiveDateTime, bpm: Option<u8>) -> Self {
        Self {
            heart_rate: bpm,
            ..Self::empty(timestamp, RowKind::HeartRate)
        }
    }

    pub fn gps(timestamp: PrimitiveDateTime, lat: Option<f64>, lon: Option<f64>) -> Self {
        Self {
            lat,
            lon,
            ..Self::empty(timestamp, RowKind::Gps)
        }
    }

    pub fn magnetometer(MagReading { timestamp, x, y, z }: &MagReading) -> Self {
        Self {
            mag_x: Some(Readings(x.clone())),
            mag_y: Some(Readings(y.clone())),
            mag_z: Some(Readings(z.clone())),
            ..Self::empty(*timestamp, RowKind::Magnetometer)
        }
    }
}

impl From<KinematicSample> for Row {
    fn from(
        KinematicSample {
            timestamp,
            acceleration,
            velocity,
            displacement,
        }: KinematicSample,
    ) -> Self {
        Self {
            accel_x: Some(acceleration.x),
            accel_y: Some(acceleration.y),
            accel_z: Some(acceleration.z),
            vel_x: Some(velocity.x),
            vel_y: Some(velocity.y),
            vel_z: Some(velocity.z),
            dis_x: Some(displacement.x),
            dis_y: Some(displacement.y),
            dis_z: Some(displacement.z),
            ..Self::empty(timestamp, RowKind::Acceleration)
        }
    }
}

/// `YYYY-MM-DD HH:MM:SS`, with `.ffffff` only when there is a sub-second part.
pub fn format_timestamp(timestamp: PrimitiveDateTime) -> Result<String, time::error::Format> {
    let format = match timestamp.nanosecond() {
        0 => format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        _ => format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:6]"
        ),
    };

    timestamp.format(format)
}

fn serialize_timestamp<S: serde::Serializer>(
    timestamp: &PrimitiveDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let formatted = format_timestamp(*timestamp).map_err(serde::ser::Error::custom)?;

    serializer.serialize_str(&formatted)
}

/// Write the header line and one line per row.
pub fn write_rows(writer: impl io::Write, rows: &[Row]) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    writer.write_record(COLUMNS)?;

    for row in rows {
        writer.serialize(row)?;
    }

    writer.flush()?;

    Ok(())
}
