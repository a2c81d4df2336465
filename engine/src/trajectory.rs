use rand::Rng;

use crate::config::Config;
use crate::geo::{self, Bounds, LonLat};
use crate::time::{Duration, Time};

// Direction components smaller than this are treated as axis-parallel, so we
// never divide by a near-zero heading component.
const PARALLEL_EPSILON: f64 = 1e-9;

// An exit point may overshoot the perpendicular axis by this much and still
// count as on the boundary.
const EDGE_TOLERANCE: f64 = 1e-6;

// A journey starting exactly on the boundary still occupies at least one frame.
const MIN_DURATION: Duration = Duration::seconds(0.1);

/// One entity's planned journey across the visible region: where it entered,
/// where its heading takes it out, optionally a curved deviation, and how long
/// the crossing takes on screen. The geometry and timing are fixed at
/// creation; only `progress` ever changes afterwards, which is what keeps the
/// visible path continuous no matter what later samples claim.
#[derive(Clone, Debug)]
pub struct Trajectory {
    start: LonLat,
    exit: LonLat,
    control: Option<LonLat>,
    start_time: Time,
    duration: Duration,
    progress: f64,
}

impl Trajectory {
    /// Plan the full journey for a newly-seen entity. This never fails: every
    /// degenerate input (zero speed, axis-parallel heading, no forward
    /// boundary hit, NaN anywhere) falls back to a usable straight path.
    pub fn plan<R: Rng>(
        pos: LonLat,
        heading: f64,
        speed_mps: Option<f64>,
        now: Time,
        config: &Config,
        rng: &mut R,
    ) -> Trajectory {
        let dir = geo::heading_components(heading, pos.lat);

        let exit = match exit_point(&config.bounds, pos, dir) {
            Some(exit) => exit,
            None => {
                // Shouldn't happen for a point inside a fully-enclosing
                // rectangle, but a bad sample must not halt the frame loop.
                let corner = farthest_corner(&config.bounds, pos, dir);
                warn!(
                    "No forward boundary intersection from ({}, {}) heading {}; exiting at corner ({}, {})",
                    pos.lat, pos.lon, heading, corner.lat, corner.lon
                );
                corner
            }
        };

        let speed = match speed_mps {
            Some(s) if s.is_finite() && s > 0.0 => s,
            _ => config.default_speed_mps,
        };
        let duration = Duration::seconds(pos.dist_meters(exit) / (speed * config.speedup_factor));

        let control = if rng.gen_bool(config.curve_probability) {
            Some(curve_control_point(pos, exit, heading, config, rng))
        } else {
            None
        };

        let trajectory = Trajectory {
            start: pos,
            exit,
            control,
            start_time: now,
            duration: if duration > MIN_DURATION {
                duration
            } else {
                MIN_DURATION
            },
            progress: 0.0,
        };

        // Catch any non-finite value here, before it can leak into per-frame
        // interpolation math.
        if !trajectory.exit.is_finite()
            || !trajectory.duration.is_finite()
            || trajectory.control.map_or(false, |c| !c.is_finite())
        {
            warn!(
                "Planned journey for ({}, {}) heading {} wasn't finite; using corner fallback",
                pos.lat, pos.lon, heading
            );
            let exit = farthest_corner(&config.bounds, pos, dir);
            return Trajectory {
                start: pos,
                exit,
                control: None,
                start_time: now,
                duration: Duration::seconds(
                    pos.dist_meters(exit) / (config.default_speed_mps * config.speedup_factor),
                ),
                progress: 0.0,
            };
        }
        trajectory
    }

    /// Advance to the given frame timestamp. Progress is clamped to [0, 1]
    /// and never moves backwards, even if the host clock does.
    pub fn advance(&mut self, now: Time) -> f64 {
        let progress = ((now - self.start_time) / self.duration).clamp(0.0, 1.0);
        if progress > self.progress {
            self.progress = progress;
        }
        self.progress
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }

    /// Position along the path: quadratic Bezier when there's a control
    /// point, otherwise linear interpolation.
    pub fn position_at(&self, progress: f64) -> LonLat {
        let t = progress.clamp(0.0, 1.0);
        match self.control {
            Some(control) => {
                let mt = 1.0 - t;
                LonLat::new(
                    mt * mt * self.start.lon + 2.0 * mt * t * control.lon + t * t * self.exit.lon,
                    mt * mt * self.start.lat + 2.0 * mt * t * control.lat + t * t * self.exit.lat,
                )
            }
            None => LonLat::new(
                self.start.lon + t * (self.exit.lon - self.start.lon),
                self.start.lat + t * (self.exit.lat - self.start.lat),
            ),
        }
    }

    /// Compass heading at a point along the path, from a finite-difference
    /// tangent sampled slightly ahead (clamped at the end). On a curve this
    /// makes the icon visually follow the bend instead of holding the heading
    /// the feed reported at entry.
    pub fn heading_at(&self, progress: f64) -> f64 {
        let step = 0.01;
        let (from, to) = if progress + step <= 1.0 {
            (progress, progress + step)
        } else {
            (1.0 - step, 1.0)
        };
        geo::heading_between(self.position_at(from), self.position_at(to))
    }

    pub fn start(&self) -> LonLat {
        self.start
    }

    pub fn exit(&self) -> LonLat {
        self.exit
    }

    pub fn control(&self) -> Option<LonLat> {
        self.control
    }

    pub fn start_time(&self) -> Time {
        self.start_time
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }
}

/// Cast a ray from `origin` along `dir` (degree space) and find the first of
/// the region's four edges it crosses going forward. Edges on an axis whose
/// direction component is ~zero are skipped entirely.
fn exit_point(bounds: &Bounds, origin: LonLat, (dlat, dlon): (f64, f64)) -> Option<LonLat> {
    let mut best: Option<(f64, LonLat)> = None;
    let mut consider = |t: f64, pt: LonLat| {
        if t > PARALLEL_EPSILON && best.map_or(true, |(best_t, _)| t < best_t) {
            best = Some((t, pt));
        }
    };

    if dlat.abs() > PARALLEL_EPSILON {
        for edge_lat in [bounds.min_lat, bounds.max_lat] {
            let t = (edge_lat - origin.lat) / dlat;
            let lon = origin.lon + t * dlon;
            if lon >= bounds.min_lon - EDGE_TOLERANCE && lon <= bounds.max_lon + EDGE_TOLERANCE {
                consider(t, LonLat::new(lon, edge_lat));
            }
        }
    }
    if dlon.abs() > PARALLEL_EPSILON {
        for edge_lon in [bounds.min_lon, bounds.max_lon] {
            let t = (edge_lon - origin.lon) / dlon;
            let lat = origin.lat + t * dlat;
            if lat >= bounds.min_lat - EDGE_TOLERANCE && lat <= bounds.max_lat + EDGE_TOLERANCE {
                consider(t, LonLat::new(edge_lon, lat));
            }
        }
    }

    best.map(|(_, pt)| pt)
}

/// Defensive fallback: the corner most aligned with the heading's general
/// quadrant, judged by projecting each corner onto the direction.
fn farthest_corner(bounds: &Bounds, origin: LonLat, (dlat, dlon): (f64, f64)) -> LonLat {
    let mut best = bounds.corners()[0];
    let mut best_score = f64::NEG_INFINITY;
    for corner in bounds.corners() {
        let score = (corner.lat - origin.lat) * dlat + (corner.lon - origin.lon) * dlon;
        if score > best_score {
            best_score = score;
            best = corner;
        }
    }
    best
}

/// The midpoint of the journey, pushed perpendicular to the heading by a
/// random fraction of the journey's degree-space length, to a random side.
fn curve_control_point<R: Rng>(
    start: LonLat,
    exit: LonLat,
    heading: f64,
    config: &Config,
    rng: &mut R,
) -> LonLat {
    let mid = LonLat::new((start.lon + exit.lon) / 2.0, (start.lat + exit.lat) / 2.0);
    let offset = rng.gen_range(config.curve_offset_min..config.curve_offset_max)
        * start.degree_dist(exit)
        * if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    let rad = heading.to_radians();
    // Unit perpendicular to (north, east) = (cos, sin)
    LonLat::new(mid.lon + rad.cos() * offset, mid.lat - rad.sin() * offset)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::config::testing;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn due_east_exit() {
        let config = testing::config();
        let trajectory = Trajectory::plan(
            LonLat::new(0.0, 51.0),
            90.0,
            Some(200.0),
            Time::START,
            &config,
            &mut rng(),
        );
        assert!((trajectory.exit().lon - 0.5).abs() < 1e-6);
        assert!((trajectory.exit().lat - 51.0).abs() < 1e-6);
        assert!(trajectory.duration() > Duration::ZERO);
    }

    #[test]
    fn exit_is_on_the_boundary_for_any_heading() {
        let config = testing::config();
        let bounds = config.bounds;
        let start = LonLat::new(0.1, 51.2);
        let mut rng = rng();
        for i in 0..72 {
            let heading = i as f64 * 5.0;
            let trajectory =
                Trajectory::plan(start, heading, Some(150.0), Time::START, &config, &mut rng);
            let exit = trajectory.exit();

            let on_edge = (exit.lon - bounds.min_lon).abs() < 1e-6
                || (exit.lon - bounds.max_lon).abs() < 1e-6
                || (exit.lat - bounds.min_lat).abs() < 1e-6
                || (exit.lat - bounds.max_lat).abs() < 1e-6;
            assert!(on_edge, "heading {} exits off-boundary at {:?}", heading, exit);

            // The exit must lie in the heading's quadrant
            let (dlat, dlon) = geo::heading_components(heading, start.lat);
            assert!(
                (exit.lat - start.lat) * dlat >= -1e-9,
                "heading {} went the wrong way in latitude",
                heading
            );
            assert!(
                (exit.lon - start.lon) * dlon >= -1e-9,
                "heading {} went the wrong way in longitude",
                heading
            );
        }
    }

    #[test]
    fn straight_path_midpoint() {
        let config = testing::config();
        let trajectory = Trajectory::plan(
            LonLat::new(0.0, 51.0),
            90.0,
            Some(200.0),
            Time::START,
            &config,
            &mut rng(),
        );
        assert!(trajectory.control().is_none());
        let mid = trajectory.position_at(0.5);
        assert!((mid.lon - 0.25).abs() < 1e-9);
        assert!((mid.lat - 51.0).abs() < 1e-9);
    }

    #[test]
    fn stalled_entity_still_gets_a_journey() {
        let config = testing::config();
        for speed in [None, Some(0.0), Some(f64::NAN)] {
            let trajectory = Trajectory::plan(
                LonLat::new(0.0, 51.0),
                45.0,
                speed,
                Time::START,
                &config,
                &mut rng(),
            );
            assert!(trajectory.duration().is_finite());
            assert!(trajectory.duration() > Duration::ZERO);
        }
    }

    #[test]
    fn progress_is_monotone_and_completes_exactly() {
        let config = testing::config();
        let mut trajectory = Trajectory::plan(
            LonLat::new(0.0, 51.0),
            90.0,
            Some(200.0),
            Time::START,
            &config,
            &mut rng(),
        );
        let duration = trajectory.duration();

        let mut last = 0.0;
        for i in 0..=10 {
            let now = Time::seconds(duration.inner_seconds() * i as f64 / 10.0);
            let progress = trajectory.advance(now);
            assert!(progress >= last);
            last = progress;
        }
        assert_eq!(trajectory.progress(), 1.0);

        // A host clock hiccup can't move progress backwards
        trajectory.advance(Time::seconds(0.0));
        assert_eq!(trajectory.progress(), 1.0);
    }

    #[test]
    fn curved_path_control_point() {
        let mut config = testing::config();
        config.curve_probability = 1.0;
        let mut rng = rng();
        for heading in [0.0, 37.0, 90.0, 210.0] {
            let start = LonLat::new(-0.2, 51.1);
            let trajectory =
                Trajectory::plan(start, heading, Some(180.0), Time::START, &config, &mut rng);
            let control = trajectory.control().unwrap();
            let exit = trajectory.exit();

            let mid = LonLat::new((start.lon + exit.lon) / 2.0, (start.lat + exit.lat) / 2.0);
            let offset_lat = control.lat - mid.lat;
            let offset_lon = control.lon - mid.lon;

            // Perpendicular to the heading...
            let rad = heading.to_radians();
            let along = offset_lat * rad.cos() + offset_lon * rad.sin();
            assert!(along.abs() < 1e-9);

            // ...and within the configured fraction of the journey length
            let frac = offset_lat.hypot(offset_lon) / start.degree_dist(exit);
            assert!(
                frac >= config.curve_offset_min && frac <= config.curve_offset_max,
                "offset fraction {} out of range",
                frac
            );
        }
    }

    #[test]
    fn curved_heading_follows_the_tangent() {
        let mut config = testing::config();
        config.curve_probability = 1.0;
        let trajectory = Trajectory::plan(
            LonLat::new(0.0, 51.0),
            90.0,
            Some(200.0),
            Time::START,
            &config,
            &mut rng(),
        );
        assert!(trajectory.control().is_some());
        // The tangent changes along a curve, and heading_at stays evaluable
        // right up to the end.
        let early = trajectory.heading_at(0.1);
        let late = trajectory.heading_at(1.0);
        assert!((early - late).abs() > 1e-3);
        assert!(early.is_finite() && late.is_finite());
    }

    #[test]
    fn boundary_start_uses_corner_fallback() {
        let config = testing::config();
        // Already sitting on the east edge, flying east: there's no forward
        // edge crossing left, so the planner falls back to a corner but still
        // produces a usable journey.
        let trajectory = Trajectory::plan(
            LonLat::new(0.5, 51.0),
            90.0,
            Some(200.0),
            Time::START,
            &config,
            &mut rng(),
        );
        assert!(config
            .bounds
            .corners()
            .iter()
            .any(|c| c.degree_dist(trajectory.exit()) < 1e-9));
        assert!(trajectory.duration().is_finite());
        assert!(trajectory.duration() > Duration::ZERO);
    }
}
