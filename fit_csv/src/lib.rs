//! # FIT to CSV
//!
//! Flattens FIT recordings into one CSV row per reading.
//!
//! Rows by `type`:
//!
//! - `A` - one per accelerometer sample, with velocity and displacement
//!   integrated over the whole recording (see [`kinematics`])
//! - `H` - heart rate
//! - `G` - GPS position in degrees
//! - `M` - magnetometer, emitted in addition to any of the above
//!
//! Columns are fixed, see [`COLUMNS`].

pub mod batch;
mod decode;
mod dispatch;
mod error;
mod message;
mod row;

pub use self::batch::{BatchOptions, Report, convert_dir, convert_file};
pub use self::decode::*;
pub use self::dispatch::*;
pub use self::error::*;
pub use self::message::*;
pub use self::row::*;
