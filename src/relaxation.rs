//! Relaxation: every overlapping pair pushes its two spines apart and turns
//! them away from each other by fixed steps until nothing overlaps.
//!
//! There is no escape from a cyclic configuration; a run that keeps
//! oscillating simply uses up its epoch budget.

use std::collections::BTreeMap;
use std::ops::AddAssign;

use log::{debug, warn};
use rand_chacha::ChaCha8Rng;

use crate::contact::{ContactGraph, SpineId};
use crate::error::{Result, SpineError};
use crate::field::Field;
use crate::geometry::{orientation, Intersection, Point, Turn};
use crate::optimizer::{frame_due, EpochRecord, Frame, Optimizer, Outcome, Termination};
use crate::progress::{epoch_progress_bar, report_contacts};
use crate::spine::Spine;

#[derive(Clone, Debug, PartialEq)]
pub struct RelaxationConfig {
    /// Distance a spine moves per epoch.
    pub position_step: f64,
    /// Angle (radians) a spine turns per epoch.
    pub angle_step: f64,
    pub max_epochs: usize,
    /// Record a [`Frame`] every `k` epochs.
    pub frame_interval: Option<usize>,
    pub progress: bool,
}

impl Default for RelaxationConfig {
    fn default() -> Self {
        Self {
            position_step: 0.1,
            angle_step: 0.1,
            max_epochs: 50,
            frame_interval: None,
            progress: false,
        }
    }
}

impl RelaxationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.position_step > 0.0 && self.angle_step > 0.0) {
            return Err(SpineError::InvalidConfig(format!(
                "relaxation steps must be positive, got position {} angle {}",
                self.position_step, self.angle_step
            )));
        }
        if self.max_epochs == 0 {
            return Err(SpineError::InvalidConfig(
                "relaxation needs at least one epoch".to_string(),
            ));
        }
        if self.frame_interval == Some(0) {
            return Err(SpineError::InvalidConfig(
                "frame interval must be at least one epoch".to_string(),
            ));
        }
        Ok(())
    }
}

/// Accumulated push on one spine. Only the direction of `shift` and the
/// sign of `turn` are used when it is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Nudge {
    pub shift: Point,
    pub turn: f64,
}

impl AddAssign for Nudge {
    fn add_assign(&mut self, other: Nudge) {
        self.shift = self.shift + other.shift;
        self.turn += other.turn;
    }
}

/// Nudges for an overlapping pair `(a, b)`.
///
/// Each spine is pushed along the unit vector from the other's center to its
/// own. The turn depends on how the two centers sit around the crossing of
/// the supporting lines: a counter-clockwise arrangement turns `a` clockwise
/// and `b` counter-clockwise, a clockwise one the reverse, and a collinear
/// one not at all. Parallel or identical lines and coincident centers give
/// no nudge.
pub fn pair_nudges(a: &Spine, b: &Spine) -> Option<(Nudge, Nudge)> {
    let crossing = match a.line().intersection(&b.line()) {
        Intersection::At(point) => point,
        Intersection::Parallel | Intersection::Coincident => {
            warn!("needless update: no crossing point between {} and {}", a, b);
            return None;
        }
    };

    let Some(away) = (a.center() - b.center()).normalized() else {
        warn!("needless update: {} and {} share a center", a, b);
        return None;
    };

    let (turn_a, turn_b) = match orientation(a.center(), crossing, b.center()) {
        Turn::CounterClockwise => (-1.0, 1.0),
        Turn::Clockwise => (1.0, -1.0),
        Turn::Between | Turn::Behind | Turn::Beyond => (0.0, 0.0),
    };

    Some((
        Nudge {
            shift: away,
            turn: turn_a,
        },
        Nudge {
            shift: -away,
            turn: turn_b,
        },
    ))
}

/// Signum with an exact zero.
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[derive(Clone, Debug, Default)]
pub struct Relaxation {
    config: RelaxationConfig,
}

impl Relaxation {
    pub fn new(config: RelaxationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Sum the nudges of every contact pair per spine.
    fn collect_nudges(
        &self,
        graph: &ContactGraph,
        contacts: &[(SpineId, SpineId)],
    ) -> Result<BTreeMap<SpineId, Nudge>> {
        let mut nudges: BTreeMap<SpineId, Nudge> = BTreeMap::new();
        for &(a, b) in contacts {
            if let Some((nudge_a, nudge_b)) = pair_nudges(graph.spine(a)?, graph.spine(b)?) {
                *nudges.entry(a).or_default() += nudge_a;
                *nudges.entry(b).or_default() += nudge_b;
            }
        }
        Ok(nudges)
    }

    /// Apply each nudge with fixed step sizes and refresh the moved spines'
    /// edges.
    fn apply_nudges(&self, graph: &mut ContactGraph, nudges: &BTreeMap<SpineId, Nudge>) -> Result<()> {
        for (&id, nudge) in nudges {
            debug!("update {}: {:?}", id, nudge);
            let spine = graph.spine_mut(id)?;
            // A zero resultant leaves the center where it is.
            let center = match nudge.shift.normalized() {
                Some(direction) => spine.center() + direction * self.config.position_step,
                None => spine.center(),
            };
            let theta = spine.theta() + sign(nudge.turn) * self.config.angle_step;
            spine.set_pose(center, theta);
        }
        for &id in nudges.keys() {
            graph.update(id)?;
        }
        Ok(())
    }
}

impl Optimizer for Relaxation {
    fn name(&self) -> &'static str {
        "relaxation"
    }

    fn optimize(
        &self,
        _field: &Field,
        graph: &mut ContactGraph,
        _rng: &mut ChaCha8Rng,
    ) -> Result<Outcome> {
        let max_epochs = self.config.max_epochs;
        let pb = epoch_progress_bar("relax", max_epochs, self.config.progress);

        let mut contacts: Vec<(SpineId, SpineId)> = graph.contact_pairs().collect();
        let mut best_energy = contacts.len();
        let mut history = Vec::new();
        let mut frames = Vec::new();
        let mut epochs = 0;

        if self.config.frame_interval.is_some() {
            frames.push(Frame {
                epoch: 0,
                spines: graph.spines().to_vec(),
            });
        }

        for epoch in 0..max_epochs {
            debug!("relaxation epoch={} contacts={}", epoch, contacts.len());
            if contacts.is_empty() {
                debug!("iteration end");
                break;
            }

            let nudges = self.collect_nudges(graph, &contacts)?;
            self.apply_nudges(graph, &nudges)?;

            contacts = graph.contact_pairs().collect();
            epochs = epoch + 1;
            best_energy = best_energy.min(contacts.len());
            history.push(EpochRecord {
                epoch: epochs,
                energy: contacts.len(),
                best_energy,
            });
            if frame_due(self.config.frame_interval, epochs) {
                frames.push(Frame {
                    epoch: epochs,
                    spines: graph.spines().to_vec(),
                });
            }
            report_contacts(&pb, contacts.len());
            pb.inc(1);
        }
        pb.finish_and_clear();

        let termination = if contacts.is_empty() {
            Termination::Converged
        } else {
            Termination::BudgetExhausted
        };

        Ok(Outcome {
            spines: graph.spines().to_vec(),
            epochs,
            contacts: contacts.len(),
            pairs: graph.index_pairs(),
            termination,
            history,
            frames,
            best: None,
        })
    }
}
