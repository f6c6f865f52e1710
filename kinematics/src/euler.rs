use crate::{MILLI_G_TO_MPS2, SAMPLE_PERIOD_S};

/// Velocity (m/s) and displacement (m) along one axis.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisState {
    pub velocity: f64,
    pub displacement: f64,
}

impl AxisState {
    pub const ZERO: Self = Self {
        velocity: 0.0,
        displacement: 0.0,
    };

    /// Advance by one sample period with acceleration `milli_g`.
    ///
    /// Forward Euler: displacement moves with the velocity held *before*
    /// this step's acceleration is applied.
    ///
    /// ```notrust
    /// v[i+1] = a[i] * g / 1000 * dt + v[i]
    /// d[i+1] = v[i] * dt + d[i]
    /// ```
    #[inline]
    pub fn step(self, milli_g: f64) -> Self {
        Self {
            velocity: milli_g * MILLI_G_TO_MPS2 * SAMPLE_PERIOD_S + self.velocity,
            displacement: self.velocity * SAMPLE_PERIOD_S + self.displacement,
        }
    }
}
