use time::{Duration, PrimitiveDateTime};

/// Time covered by one burst. The burst timestamp marks its last sample.
pub const BURST_WINDOW: Duration = Duration::SECOND;

/// How far sample `index` of a `len`-sample burst lies before the burst timestamp.
///
/// Samples are spread evenly over [`BURST_WINDOW`], rounded to whole microseconds.
pub fn sample_offset(index: usize, len: usize) -> Duration {
    if index >= len {
        return Duration::ZERO;
    }

    let steps_back = (len - index - 1) as f64;
    let micros = steps_back * BURST_WINDOW.whole_microseconds() as f64 / len as f64;

    Duration::microseconds(micros.round_ties_even() as i64)
}

/// Timestamp of sample `index` of a `len`-sample burst stamped at `timestamp`.
#[inline]
pub fn backdate(timestamp: PrimitiveDateTime, index: usize, len: usize) -> PrimitiveDateTime {
    timestamp - sample_offset(index, len)
}
