use serde::Serialize;

use crate::config::Config;
use crate::projector::{Projector, ScreenPt};
use crate::registry::Registry;
use crate::time::{Duration, Time};
use crate::trail::{self, TrailStroke};
use crate::EntityId;

/// Everything the presentation layer needs to draw one aircraft this frame.
/// How it's drawn (DOM transforms, canvas, anything else) isn't our concern.
#[derive(Clone, Debug, Serialize)]
pub struct EntityFrame {
    pub id: EntityId,
    pub pos: ScreenPt,
    /// Compass degrees. On a curved path this follows the tangent.
    pub heading: f64,
    pub label: String,
    pub color: String,
    pub trail: TrailStroke,
}

/// Caps how often ticks actually run, so a fast display loop doesn't burn a
/// low-power board's frame budget.
pub struct Throttle {
    interval: Duration,
    last: Option<Time>,
}

impl Throttle {
    pub fn new(target_fps: f64) -> Throttle {
        Throttle {
            interval: Duration::seconds(1.0 / target_fps),
            last: None,
        }
    }

    pub fn ready(&mut self, now: Time) -> bool {
        match self.last {
            Some(last) if now - last < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

/// One animation tick: advance every journey to the same timestamp, hand back
/// the frame, and retire entities that just finished. An entity reaching
/// progress 1 is removed in this very tick; it never lingers for a frame at a
/// frozen exit position.
pub fn tick(
    registry: &mut Registry,
    projector: &Projector,
    config: &Config,
    now: Time,
) -> Vec<EntityFrame> {
    let mut frames = Vec::new();
    for entity in registry.iter_mut() {
        let progress = entity.trajectory.advance(now);
        if entity.trajectory.is_complete() {
            continue;
        }
        frames.push(EntityFrame {
            id: entity.id.clone(),
            pos: projector.to_screen(entity.trajectory.position_at(progress)),
            heading: entity.trajectory.heading_at(progress),
            label: entity.label.clone(),
            color: entity.color.clone(),
            trail: trail::build(&entity.trajectory, projector, config),
        });
    }

    for id in registry.remove_completed() {
        debug!("{} finished its journey", id);
    }
    frames
}
