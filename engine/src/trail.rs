use serde::Serialize;

use crate::config::Config;
use crate::projector::{Projector, ScreenPt};
use crate::trajectory::Trajectory;

// Stroke width in pixels at the aircraft end and at the oldest end.
const HEAD_WIDTH: f64 = 3.0;
const TAIL_WIDTH: f64 = 0.5;

/// A fading stroke along the already-traversed part of a path. Points run
/// from the oldest end to the current position, with alpha and width rising
/// toward the aircraft, so direction and recency read off the gradient
/// without keeping any frame-by-frame history.
#[derive(Clone, Debug, Default, Serialize)]
pub struct TrailStroke {
    pub points: Vec<TrailPoint>,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct TrailPoint {
    pub pos: ScreenPt,
    /// 0 (transparent) at the oldest end, 1 at the aircraft.
    pub alpha: f64,
    pub width: f64,
}

impl TrailStroke {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Build this frame's trail in screen space. Everything is recomputed from
/// the geographic path, so a viewport resize can never leave stale pixels
/// behind.
pub fn build(trajectory: &Trajectory, projector: &Projector, config: &Config) -> TrailStroke {
    let progress = trajectory.progress();
    if progress <= config.trail_threshold {
        return TrailStroke::default();
    }

    // The older end starts at the aircraft when the threshold is crossed and
    // walks back toward the start of the journey, reaching it at completion.
    // That makes fresh aircraft fade in instead of spawning a full tail.
    let grown = (progress - config.trail_threshold) / (1.0 - config.trail_threshold);
    let trail_start = progress * (1.0 - grown);

    // A fixed sample count bounds per-frame cost; a straight segment only
    // needs its endpoints.
    let samples = if trajectory.control().is_some() {
        config.trail_samples.max(2)
    } else {
        2
    };

    let mut points = Vec::with_capacity(samples);
    for i in 0..samples {
        let along = i as f64 / (samples - 1) as f64;
        let at = trail_start + along * (progress - trail_start);
        points.push(TrailPoint {
            pos: projector.to_screen(trajectory.position_at(at)),
            alpha: along,
            width: TAIL_WIDTH + along * (HEAD_WIDTH - TAIL_WIDTH),
        });
    }
    TrailStroke { points }
}
