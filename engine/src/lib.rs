//! The Skylight trajectory and animation engine. An upstream feed delivers
//! sparse position snapshots every several seconds; this crate turns them
//! into smooth per-frame motion by planning each aircraft's whole on-screen
//! journey up front and interpolating along it at display rate. Fetching the
//! data and actually drawing pixels are both someone else's job.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod config;
mod geo;
mod projector;
mod registry;
mod scheduler;
mod time;
mod trail;
mod trajectory;

use std::fmt;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

pub use self::config::Config;
pub use self::geo::{Bounds, LonLat};
pub use self::projector::{Projector, ScreenPt};
pub use self::registry::{Entity, Registry};
pub use self::scheduler::{EntityFrame, Throttle};
pub use self::time::{Duration, Time};
pub use self::trail::{TrailPoint, TrailStroke};
pub use self::trajectory::Trajectory;

/// An opaque aircraft identifier, stable across feed cycles.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub String);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One record of the periodic external feed. Field names match the recorded
/// wire format, which the engine only ever reads.
#[derive(Clone, Debug, Deserialize)]
pub struct Sample {
    pub id: EntityId,
    /// Absent or non-finite means the sample is malformed and gets skipped.
    pub position: Option<LonLat>,
    /// Compass degrees, 0 = north, clockwise positive.
    #[serde(default)]
    pub heading: f64,
    /// Meters per second over ground. Zero or missing means "use the default
    /// cruise speed".
    #[serde(default, alias = "velocity_mps")]
    pub speed: Option<f64>,
    #[serde(default, alias = "callsign")]
    pub label: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl Sample {
    /// The callsign, falling back to the uppercased id when blank.
    pub fn display_label(&self) -> String {
        let trimmed = self.label.trim();
        if trimmed.is_empty() {
            self.id.0.to_uppercase()
        } else {
            trimmed.to_string()
        }
    }
}

/// The engine root: owns the registry, the projector, the tick throttle and
/// the curve generator's RNG. The host owns this instance and drives it with
/// `reconcile` whenever a snapshot arrives and `tick` every display frame;
/// multiple independent instances work fine.
pub struct Engine {
    config: Config,
    projector: Projector,
    registry: Registry,
    throttle: Throttle,
    rng: StdRng,
}

impl Engine {
    /// `seed` pins the curve generator for reproducible runs; None seeds from
    /// the OS.
    pub fn new(config: Config, width: f64, height: f64, seed: Option<u64>) -> Result<Engine> {
        config.validate()?;
        Ok(Engine {
            projector: Projector::new(config.bounds, width, height),
            registry: Registry::new(),
            throttle: Throttle::new(config.target_fps),
            rng: match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            },
            config,
        })
    }

    /// Fold a snapshot in. Safe to call at any point between ticks; existing
    /// journeys are never rerouted by it.
    pub fn reconcile(&mut self, snapshot: &[Sample], now: Time) {
        self.registry
            .reconcile(snapshot, now, &self.config, &mut self.rng);
    }

    /// Advance the animation and hand back what to draw. Returns None when
    /// the call arrives faster than the configured frame rate allows.
    pub fn tick(&mut self, now: Time) -> Option<Vec<EntityFrame>> {
        if !self.throttle.ready(now) {
            return None;
        }
        Some(scheduler::tick(
            &mut self.registry,
            &self.projector,
            &self.config,
            now,
        ))
    }

    /// The viewport changed size. Trajectories are geographic, so they simply
    /// re-project on the next tick.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.projector.resize(width, height);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
