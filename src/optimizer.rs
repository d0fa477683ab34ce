//! Shared contract of the placement strategies and the run driver.

use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::contact::ContactGraph;
use crate::error::{Result, SpineError};
use crate::field::{random_spines, Field};
use crate::spine::Spine;

/// A strategy that perturbs the spines of a contact graph until no two
/// overlap or its epoch budget runs out.
pub trait Optimizer {
    fn name(&self) -> &'static str;

    /// Drive `graph` towards zero contacts. Running out of budget is a
    /// normal outcome, reported through [`Outcome::termination`].
    fn optimize(
        &self,
        field: &Field,
        graph: &mut ContactGraph,
        rng: &mut ChaCha8Rng,
    ) -> Result<Outcome>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// No overlapping pair remains.
    Converged,
    /// The epoch budget ran out with contacts left.
    BudgetExhausted,
}

/// Energy bookkeeping for one evaluated epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EpochRecord {
    /// Epochs completed when the record was taken, counting from 1.
    pub epoch: usize,
    /// Contact count at the end of the epoch.
    pub energy: usize,
    /// Lowest energy tracked so far.
    pub best_energy: usize,
}

/// Poses at a checkpoint, for the animation collaborator.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Epochs completed, on the same count as [`EpochRecord::epoch`]; 0 is
    /// the initial state.
    pub epoch: usize,
    pub spines: Vec<Spine>,
}

/// Deep copy of the spine array taken when a new best energy was seen.
#[derive(Clone, Debug, PartialEq)]
pub struct BestState {
    pub energy: usize,
    pub spines: Vec<Spine>,
}

#[derive(Clone, Debug)]
pub struct Outcome {
    /// Final live poses in handle order.
    pub spines: Vec<Spine>,
    /// Epochs that ran.
    pub epochs: usize,
    /// Contacts left in the final live state.
    pub contacts: usize,
    /// The graph's final edges as `(i, j)` indices into `spines`, `i < j`.
    pub pairs: Vec<(usize, usize)>,
    pub termination: Termination,
    pub history: Vec<EpochRecord>,
    pub frames: Vec<Frame>,
    pub best: Option<BestState>,
}

impl Outcome {
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }
}

/// Parameters of the generation phase.
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    pub field: Field,
    pub spine_length: f64,
    pub spine_count: usize,
    pub seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            field: Field::default(),
            spine_length: 3.0,
            spine_count: 60,
            seed: 0,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        self.field.validate()?;
        if !(self.spine_length > 0.0) {
            return Err(SpineError::InvalidConfig(format!(
                "spine length must be positive, got {}",
                self.spine_length
            )));
        }
        Ok(())
    }
}

/// Scatter `spine_count` random spines, register them in order and hand the
/// graph to `optimizer`. One RNG seeded from `config.seed` drives the whole run.
pub fn run(config: &RunConfig, optimizer: &dyn Optimizer) -> Result<Outcome> {
    config.validate()?;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let spines = random_spines(&mut rng, &config.field, config.spine_length, config.spine_count);

    let mut graph = ContactGraph::with_capacity(spines.len());
    for spine in spines {
        graph.register(spine);
    }
    info!(
        "{}: {} spines registered, {} initial contacts",
        optimizer.name(),
        graph.len(),
        graph.contact_count()
    );

    let outcome = optimizer.optimize(&config.field, &mut graph, &mut rng)?;
    info!(
        "{}: {:?} after {} epochs, {} contacts left",
        optimizer.name(),
        outcome.termination,
        outcome.epochs,
        outcome.contacts
    );
    Ok(outcome)
}

/// Whether a frame is due at `epoch`.
pub(crate) fn frame_due(interval: Option<usize>, epoch: usize) -> bool {
    matches!(interval, Some(k) if k > 0 && epoch % k == 0)
}
