// bd-core/src/units.rs

use uom::si::f64::Time as UomTime;
use uom::si::time::{minute, second};

/// Canonical simulated time quantity (SI, f64).
pub type Time = UomTime;

pub const SECONDS_PER_MINUTE: u64 = 60;

#[inline]
pub fn minutes(v: f64) -> Time {
    Time::new::<minute>(v)
}

/// Whole simulated seconds in `min` minutes.
#[inline]
pub fn minutes_to_seconds(min: u32) -> u64 {
    minutes(f64::from(min)).get::<second>().round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_to_seconds_converts_minutes() {
        assert_eq!(minutes_to_seconds(1), SECONDS_PER_MINUTE);
        assert_eq!(minutes_to_seconds(5), 300);
        assert_eq!(minutes_to_seconds(15), 900);
    }

    #[test]
    fn minutes_quantity_reads_back_in_seconds() {
        assert_eq!(minutes(240.0).get::<second>(), 14_400.0);
    }
}
