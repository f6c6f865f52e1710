//! # Kinematics
//!
//! Turns accelerometer bursts into per-sample velocity and displacement.
//!
//! A burst is a batch of `N` samples per axis recorded at [`SAMPLE_RATE_HZ`]
//! and stamped with the time of its last sample. Every axis is integrated
//! independently with forward Euler:
//!
//! ```notrust
//! v[i+1] = a[i] * g / 1000 * dt + v[i]
//! d[i+1] = v[i] * dt + d[i]
//! ```
//!
//! Where:
//!
//! - a - acceleration in milli-g
//! - g - standard gravity
//! - dt - sample period, `1 / 25` s
//!
//! The final state of one burst seeds the next one, so consecutive bursts of a
//! recording form a single trajectory. The caller owns the [`IntegratorState`]
//! and starts every recording from [`IntegratorState::default`].

use time::PrimitiveDateTime;

mod backdate;
mod euler;

pub use self::backdate::*;
pub use self::euler::*;

/// Standard gravity, m/s²
pub const STANDARD_GRAVITY: f64 = 9.80665;
/// Milli-g to m/s²
pub const MILLI_G_TO_MPS2: f64 = STANDARD_GRAVITY / 1000.0;
/// Fixed accelerometer rate. Never derived from timestamps.
pub const SAMPLE_RATE_HZ: u32 = 25;
/// Seconds between two samples
pub const SAMPLE_PERIOD_S: f64 = 1.0 / SAMPLE_RATE_HZ as f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BurstError {
    #[error("Axis sample counts differ: x={x}, y={y}, z={z}")]
    LengthMismatch { x: usize, y: usize, z: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// One accelerometer message: samples in milli-g for each axis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Burst {
    timestamp: PrimitiveDateTime,
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
}

impl Burst {
    /// # Errors
    /// [`BurstError::LengthMismatch`] unless all axes hold the same number of samples.
    pub fn new(
        timestamp: PrimitiveDateTime,
        x: Vec<f64>,
        y: Vec<f64>,
        z: Vec<f64>,
    ) -> Result<Self, BurstError> {
        if x.len() != y.len() || x.len() != z.len() {
            return Err(BurstError::LengthMismatch {
                x: x.len(),
                y: y.len(),
                z: z.len(),
            });
        }

        Ok(Self { timestamp, x, y, z })
    }

    pub const fn timestamp(&self) -> PrimitiveDateTime {
        self.timestamp
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn samples(&self) -> impl Iterator<Item = Vector> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.z)
            .map(|((x, y), z)| Vector {
                x: *x,
                y: *y,
                z: *z,
            })
    }
}

/// Velocity and displacement carried from one burst to the next.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntegratorState {
    pub x: AxisState,
    pub y: AxisState,
    pub z: AxisState,
}

impl IntegratorState {
    pub const fn new() -> Self {
        Self {
            x: AxisState::ZERO,
            y: AxisState::ZERO,
            z: AxisState::ZERO,
        }
    }

    pub const fn velocity(&self) -> Vector {
        Vector {
            x: self.x.velocity,
            y: self.y.velocity,
            z: self.z.velocity,
        }
    }

    pub const fn displacement(&self) -> Vector {
        Vector {
            x: self.x.displacement,
            y: self.y.displacement,
            z: self.z.displacement,
        }
    }

    fn step(self, acceleration: Vector) -> Self {
        Self {
            x: self.x.step(acceleration.x),
            y: self.y.step(acceleration.y),
            z: self.z.step(acceleration.z),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KinematicSample {
    pub timestamp: PrimitiveDateTime,
    /// Raw reading, milli-g
    pub acceleration: Vector,
    /// m/s
    pub velocity: Vector,
    /// m
    pub displacement: Vector,
}

/// Integrate one burst starting from `carry`.
///
/// Returns one sample per reading, in order, and the state to pass into the
/// next burst of the same recording. An empty burst returns `carry` untouched.
pub fn integrate(burst: &Burst, carry: IntegratorState) -> (Vec<KinematicSample>, IntegratorState) {
    let len = burst.len();
    let mut state = carry;

    let samples = burst
        .samples()
        .enumerate()
        .map(|(index, acceleration)| {
            state = state.step(acceleration);

            KinematicSample {
                timestamp: backdate(burst.timestamp(), index, len),
                acceleration,
                velocity: state.velocity(),
                displacement: state.displacement(),
            }
        })
        .collect::<Vec<_>>();

    (samples, state)
}
