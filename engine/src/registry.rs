use std::collections::BTreeMap;

use rand::Rng;

use crate::config::Config;
use crate::time::Time;
use crate::trajectory::Trajectory;
use crate::{EntityId, Sample};

/// One tracked aircraft. The trajectory is planned once, when the id first
/// appears; only the display attributes below it ever change afterwards.
pub struct Entity {
    pub id: EntityId,
    pub label: String,
    pub color: String,
    pub trajectory: Trajectory,
}

/// The authoritative id -> journey mapping. Entities leave only by finishing
/// their journey (see the scheduler), never because the feed stopped
/// mentioning them; a single dropped upstream sample must not cause a visible
/// pop.
pub struct Registry {
    entities: BTreeMap<EntityId, Entity>,
    color_index: usize,
}

impl Registry {
    pub fn new() -> Registry {
        Registry {
            entities: BTreeMap::new(),
            color_index: 0,
        }
    }

    /// Fold one snapshot into the current state. Known ids get their label
    /// and color refreshed; genuinely new ids get a full journey planned.
    /// Trajectory geometry and timing of existing entities are deliberately
    /// untouched, so this is safe to run between any two animation ticks.
    pub fn reconcile<R: Rng>(
        &mut self,
        snapshot: &[Sample],
        now: Time,
        config: &Config,
        rng: &mut R,
    ) {
        let mut fresh: Vec<(&Sample, crate::geo::LonLat)> = Vec::new();

        for sample in snapshot {
            let pos = match sample.position {
                Some(pos) if pos.is_finite() => pos,
                _ => {
                    debug!("Skipping sample {} without a position", sample.id);
                    continue;
                }
            };
            if let Some(entity) = self.entities.get_mut(&sample.id) {
                entity.label = sample.display_label();
                if let Some(color) = &sample.color {
                    entity.color = color.clone();
                }
            } else {
                fresh.push((sample, pos));
            }
        }

        // When the feed reports more aircraft than we can show, admit the
        // ones closest to home first. Entities already mid-journey are never
        // evicted early to make room.
        fresh.sort_by(|a, b| {
            config
                .home
                .dist2(a.1)
                .partial_cmp(&config.home.dist2(b.1))
                .unwrap()
        });
        for (sample, pos) in fresh {
            if self.entities.len() >= config.max_entities {
                debug!("At capacity, not admitting {}", sample.id);
                break;
            }
            let trajectory = Trajectory::plan(pos, sample.heading, sample.speed, now, config, rng);
            let color = match &sample.color {
                Some(color) => color.clone(),
                None => {
                    let color = config.palette[self.color_index % config.palette.len()].clone();
                    self.color_index += 1;
                    color
                }
            };
            info!("Tracking {} for a {:?} journey", sample.id, trajectory.duration());
            self.entities.insert(
                sample.id.clone(),
                Entity {
                    id: sample.id.clone(),
                    label: sample.display_label(),
                    color,
                    trajectory,
                },
            );
        }
    }

    /// Drop everything whose journey has finished, returning the ids so the
    /// presentation layer can tear down their elements.
    pub fn remove_completed(&mut self) -> Vec<EntityId> {
        let done: Vec<EntityId> = self
            .entities
            .values()
            .filter(|entity| entity.trajectory.is_complete())
            .map(|entity| entity.id.clone())
            .collect();
        for id in &done {
            self.entities.remove(id);
        }
        done
    }

    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.values_mut()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
