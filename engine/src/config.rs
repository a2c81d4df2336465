use anyhow::Result;
use serde::Deserialize;

use crate::geo::{Bounds, LonLat};

/// Every tunable in one place, loadable from JSON. The defaults reproduce the
/// production display: a ~26km x 48km box over south London, at most 8
/// aircraft, 30 frames per second.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The visible area. Changing it requires re-creating the engine.
    pub bounds: Bounds,
    /// Reference point for choosing which aircraft to admit when the feed
    /// reports more than `max_entities`.
    pub home: LonLat,
    /// At most this many aircraft animate at once.
    pub max_entities: usize,
    /// Scheduler ticks are throttled to this rate.
    pub target_fps: f64,

    /// Real aircraft speeds would crawl across a short viewport, so journeys
    /// play back this many times faster than reality.
    pub speedup_factor: f64,
    /// Stand-in cruise speed (m/s) when a sample reports zero or no speed.
    /// Kept separate from `speedup_factor` on purpose.
    pub default_speed_mps: f64,

    /// Chance that a new journey gets a curved path instead of a straight one.
    pub curve_probability: f64,
    /// The curve control point sits this fraction of the journey length off
    /// the midpoint, perpendicular to the heading. Sampled uniformly.
    pub curve_offset_min: f64,
    pub curve_offset_max: f64,

    /// No trail is drawn until progress passes this fraction, so fresh
    /// aircraft fade in instead of spawning a full tail.
    pub trail_threshold: f64,
    /// Curved trails are sampled at this many points, regardless of length.
    pub trail_samples: usize,

    /// Round-robin colors for samples that don't carry their own.
    pub palette: Vec<String>,
}

impl Default for Config {
    fn default() -> Config {
        let home = LonLat::new(-0.0541772, 51.4229712);
        Config {
            bounds: Bounds::from_spans(home, 0.34, 0.12).unwrap(),
            home,
            max_entities: 8,
            target_fps: 30.0,

            speedup_factor: 6.0,
            default_speed_mps: 220.0,

            curve_probability: 0.6,
            curve_offset_min: 0.10,
            curve_offset_max: 0.25,

            trail_threshold: 0.6,
            trail_samples: 16,

            palette: vec![
                "#64b5f6".to_string(), // Blue
                "#81c784".to_string(), // Green
                "#ffb74d".to_string(), // Orange
                "#f06292".to_string(), // Pink
                "#ba68c8".to_string(), // Purple
                "#4dd0e1".to_string(), // Cyan
                "#fff176".to_string(), // Yellow
                "#a1887f".to_string(), // Brown
            ],
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        // Bounds::new enforces min < max; re-run it in case this struct was
        // deserialized from a file.
        Bounds::new(
            self.bounds.min_lon,
            self.bounds.max_lon,
            self.bounds.min_lat,
            self.bounds.max_lat,
        )?;
        if self.target_fps <= 0.0 {
            bail!("target_fps must be positive, not {}", self.target_fps);
        }
        if self.speedup_factor <= 0.0 || self.default_speed_mps <= 0.0 {
            bail!("speedup_factor and default_speed_mps must be positive");
        }
        if !(0.0..=1.0).contains(&self.curve_probability) {
            bail!(
                "curve_probability {} isn't a probability",
                self.curve_probability
            );
        }
        if self.curve_offset_min >= self.curve_offset_max || self.curve_offset_min < 0.0 {
            bail!(
                "curve offset range {} to {} is empty",
                self.curve_offset_min,
                self.curve_offset_max
            );
        }
        if !(0.0..1.0).contains(&self.trail_threshold) {
            bail!("trail_threshold {} must be in [0, 1)", self.trail_threshold);
        }
        if self.trail_samples < 2 {
            bail!("trail_samples must be at least 2");
        }
        Ok(())
    }
}
