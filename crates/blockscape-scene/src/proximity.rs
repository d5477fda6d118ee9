//! Proximity-driven attachment.
//!
//! Attachment is a relation between modifiables and modifiers derived from
//! geometry. A modifier is attached to a modifiable while their distance is
//! at most the modifier's catchment radius, and while the modifier is still
//! part of the scene. Every pair is checked on each run (N x M, no spatial
//! index); a run only reports pairs whose state actually changed, so running
//! twice without a change in between reports nothing the second time.
//!
//! A run holds the read locks of both collections from start to finish, so
//! no operation can add or remove blocks while it scans.

use blockscape_core::{BlockId, DetachReason, Point, SceneEvent};
use blockscape_operations::{Entity, EntityCollection, EntityRef};

use crate::block::{Block, Modifiable, Modifier};

/// What changed during a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProximityReport {
    /// `(modifiable, modifier)` pairs that became attached.
    pub attached: Vec<(BlockId, BlockId)>,
    /// `(modifiable, modifier, reason)` for pairs that became detached.
    pub detached: Vec<(BlockId, BlockId, DetachReason)>,
}

impl ProximityReport {
    /// True when nothing changed.
    pub fn is_empty(&self) -> bool {
        self.attached.is_empty() && self.detached.is_empty()
    }

    /// Number of transitions.
    pub fn len(&self) -> usize {
        self.attached.len() + self.detached.len()
    }

    /// The transitions as scene events, detachments first.
    pub fn events(&self) -> Vec<SceneEvent> {
        let detached = self
            .detached
            .iter()
            .map(|&(modifiable, modifier, reason)| SceneEvent::Detached {
                modifiable,
                modifier,
                reason,
            });
        let attached = self
            .attached
            .iter()
            .map(|&(modifiable, modifier)| SceneEvent::Attached {
                modifiable,
                modifier,
            });
        detached.chain(attached).collect()
    }

    fn merge(&mut self, other: ProximityReport) {
        self.attached.extend(other.attached);
        self.detached.extend(other.detached);
    }
}

/// Drops, from every modifiable, attached modifiers that are no longer in
/// the scene, regardless of distance.
pub fn validate_blocks(
    modifiables: &EntityCollection<dyn Modifiable>,
    modifiers: &EntityCollection<dyn Modifier>,
) -> ProximityReport {
    let modifiables = modifiables.read();
    let modifiers = modifiers.read();
    validate(&modifiables, &modifiers)
}

/// Attaches pairs that came within range and detaches pairs that left it.
///
/// The catchment radius of each modifier is its catchment area times
/// `reference_width`.
pub fn check_proximity(
    modifiables: &EntityCollection<dyn Modifiable>,
    modifiers: &EntityCollection<dyn Modifier>,
    reference_width: f64,
) -> ProximityReport {
    let modifiables = modifiables.read();
    let modifiers = modifiers.read();
    check(&modifiables, &modifiers, reference_width)
}

/// [`validate_blocks`] followed by [`check_proximity`] over one snapshot.
pub fn invalidate(
    modifiables: &EntityCollection<dyn Modifiable>,
    modifiers: &EntityCollection<dyn Modifier>,
    reference_width: f64,
) -> ProximityReport {
    let modifiables = modifiables.read();
    let modifiers = modifiers.read();
    let mut report = validate(&modifiables, &modifiers);
    report.merge(check(&modifiables, &modifiers, reference_width));
    report
}

fn validate(
    modifiables: &[EntityRef<dyn Modifiable>],
    modifiers: &[EntityRef<dyn Modifier>],
) -> ProximityReport {
    let current: Vec<BlockId> = modifiers.iter().map(|m| m.read().id()).collect();
    let mut report = ProximityReport::default();
    for modifiable in modifiables {
        let mut modifiable = modifiable.write();
        let id = modifiable.id();
        for stale in modifiable.validate_modifiers(&current) {
            tracing::trace!("Detached removed modifier {} from {}", stale, id);
            report
                .detached
                .push((id, stale, DetachReason::ModifierRemoved));
        }
    }
    report
}

struct Catchment {
    id: BlockId,
    position: Point,
    radius: f64,
}

fn check(
    modifiables: &[EntityRef<dyn Modifiable>],
    modifiers: &[EntityRef<dyn Modifier>],
    reference_width: f64,
) -> ProximityReport {
    let catchments: Vec<Catchment> = modifiers
        .iter()
        .map(|m| {
            let m = m.read();
            Catchment {
                id: m.id(),
                position: m.position(),
                radius: m.catchment_radius(reference_width),
            }
        })
        .collect();

    let mut report = ProximityReport::default();
    for modifiable in modifiables {
        // Check-and-set under one write lock so concurrent runs cannot both
        // report the same transition.
        let mut modifiable = modifiable.write();
        let id = modifiable.id();
        for catchment in &catchments {
            if catchment.id == id {
                continue;
            }
            let distance = modifiable.distance_from(catchment.position);
            if distance <= catchment.radius {
                if modifiable.add_modifier(catchment.id) {
                    tracing::trace!(
                        "Attached {} to {} (distance {:.2} <= {:.2})",
                        catchment.id,
                        id,
                        distance,
                        catchment.radius
                    );
                    report.attached.push((id, catchment.id));
                }
            } else if modifiable.remove_modifier(catchment.id) {
                tracing::trace!(
                    "Detached {} from {} (distance {:.2} > {:.2})",
                    catchment.id,
                    id,
                    distance,
                    catchment.radius
                );
                report
                    .detached
                    .push((id, catchment.id, DetachReason::OutOfRange));
            }
        }
    }
    report
}
