use std::ops;

use serde::{Deserialize, Serialize};

/// A moment on the host's animation clock, in fractional seconds since the
/// host started. The engine never reads a real clock; the host passes
/// timestamps in, so tests can drive everything synthetically.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Time(f64);

impl Time {
    pub const START: Time = Time(0.0);

    pub const fn seconds(secs: f64) -> Time {
        Time(secs)
    }

    pub fn inner_seconds(self) -> f64 {
        self.0
    }
}

/// A span of the animation clock, in fractional seconds.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Duration(f64);

impl Duration {
    pub const ZERO: Duration = Duration(0.0);

    pub const fn seconds(secs: f64) -> Duration {
        Duration(secs)
    }

    pub fn inner_seconds(self) -> f64 {
        self.0
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl ops::Sub<Time> for Time {
    type Output = Duration;

    fn sub(self, other: Time) -> Duration {
        Duration(self.0 - other.0)
    }
}

impl ops::Add<Duration> for Time {
    type Output = Time;

    fn add(self, other: Duration) -> Time {
        Time(self.0 + other.0)
    }
}

impl ops::Div<Duration> for Duration {
    type Output = f64;

    fn div(self, other: Duration) -> f64 {
        self.0 / other.0
    }
}
