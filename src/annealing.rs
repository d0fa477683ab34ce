//! Simulated annealing over whole-spine replacement moves.
//!
//! The energy of a state is its number of overlapping pairs. Each epoch
//! proposes a fresh random pose for one spine, prices it incrementally
//! against the contact graph and accepts it with the Metropolis rule under an
//! exponentially decaying temperature.

use log::debug;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::contact::ContactGraph;
use crate::error::{Result, SpineError};
use crate::field::{random_spine, Field};
use crate::optimizer::{frame_due, BestState, EpochRecord, Frame, Optimizer, Outcome, Termination};
use crate::progress::{epoch_progress_bar, report_contacts};

#[derive(Clone, Debug, PartialEq)]
pub struct AnnealingConfig {
    pub max_epochs: usize,
    /// Temperature base: `T(progress) = alpha^progress`, in `(0, 1)`.
    pub alpha: f64,
    /// Record a [`Frame`] every `k` epochs.
    pub frame_interval: Option<usize>,
    pub progress: bool,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            max_epochs: 3000,
            alpha: 0.1,
            frame_interval: None,
            progress: false,
        }
    }
}

impl AnnealingConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(SpineError::InvalidConfig(format!(
                "annealing alpha must lie in (0, 1), got {}",
                self.alpha
            )));
        }
        if self.max_epochs == 0 {
            return Err(SpineError::InvalidConfig(
                "annealing needs at least one epoch".to_string(),
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

/// `alpha^progress`: 1 at the start of the run, `alpha` at the end.
pub fn temperature(alpha: f64, progress: f64) -> f64 {
    alpha.powf(progress)
}

/// Metropolis rule on integer energies: downhill and flat moves always
/// pass, uphill moves pass with `exp((energy - next_energy) / temperature)`.
pub fn acceptance_probability(energy: usize, next_energy: usize, temperature: f64) -> f64 {
    if next_energy <= energy {
        1.0
    } else {
        ((energy as f64 - next_energy as f64) / temperature).exp()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Annealing {
    config: AnnealingConfig,
}

impl Annealing {
    pub fn new(config: AnnealingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl Optimizer for Annealing {
    fn name(&self) -> &'static str {
        "annealing"
    }

    /// Returns the final live state. The best state seen is tracked
    /// separately in [`Outcome::best`]; it is copied *before* the improving
    /// move is applied, so its own energy is the pre-move one.
    fn optimize(
        &self,
        field: &Field,
        graph: &mut ContactGraph,
        rng: &mut ChaCha8Rng,
    ) -> Result<Outcome> {
        let max_epochs = self.config.max_epochs;
        let pb = epoch_progress_bar("anneal", max_epochs, self.config.progress);

        let count = graph.len();
        let mut energy = graph.contact_count();
        let mut best = BestState {
            energy,
            spines: graph.spines().to_vec(),
        };
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
            if graph.contact_count() == 0 {
                debug!("iteration end");
                break;
            }

            let index = rng.gen_range(0..count);
            let id = graph.id_at(index).ok_or(SpineError::UnknownSpine(index))?;
            let current = graph.spine(id)?;
            let candidate = random_spine(rng, field, current.length(), current.identifier());

            let removed = graph.overlapping_with(current, Some(id)).len();
            let added = graph.overlapping_with(&candidate, Some(id)).len();
            let next_energy = energy + added - removed;

            if next_energy < best.energy {
                best = BestState {
                    energy: next_energy,
                    spines: graph.spines().to_vec(),
                };
            }

            let t = temperature(self.config.alpha, epoch as f64 / max_epochs as f64);
            let probability = acceptance_probability(energy, next_energy, t);
            let draw: f64 = rng.gen();
            epochs = epoch + 1;

            let accepted = draw <= probability;
            if accepted {
                graph
                    .spine_mut(id)?
                    .set_pose(candidate.center(), candidate.theta());
                energy = next_energy;
                graph.update(id)?;
                debug!(
                    "epoch {}/{}: replaced {} (-{} +{}), e={}",
                    epoch, max_epochs, id, removed, added, energy
                );
            }

            history.push(EpochRecord {
                epoch: epochs,
                energy,
                best_energy: best.energy,
            });
            if frame_due(self.config.frame_interval, epochs) {
                frames.push(Frame {
                    epoch: epochs,
                    spines: graph.spines().to_vec(),
                });
            }
            report_contacts(&pb, energy);
            pb.inc(1);

            if accepted && energy == 0 {
                break;
            }
        }
        pb.finish_and_clear();

        let contacts = graph.contact_count();
        let termination = if contacts == 0 {
            Termination::Converged
        } else {
            Termination::BudgetExhausted
        };

        Ok(Outcome {
            spines: graph.spines().to_vec(),
            epochs,
            contacts,
            pairs: graph.index_pairs(),
            termination,
            history,
            frames,
            best: Some(best),
        })
    }
}
