use clap::{Args, Parser, Subcommand};
use spinefield::{
    annealing::{Annealing, AnnealingConfig},
    field::Field,
    optimizer::{run, Optimizer, Outcome, RunConfig, Termination},
    contact::overlap_scan,
    output::{write_frames_csv, write_poses_csv},
    relaxation::{Relaxation, RelaxationConfig},
};
use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Spinefield: scatter fixed-length segments in a rectangle until none overlap
#[derive(Parser, Debug)]
#[command(
    name = "spinefield",
    about = "Place non-overlapping line segments in a rectangle by relaxation or simulated annealing",
    version,
    propagate_version = true,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Push overlapping spines apart with fixed position and angle steps
    Relax(RelaxArgs),
    /// Replace random spines under a simulated-annealing acceptance rule
    Anneal(AnnealArgs),
}

#[derive(Args, Debug, Clone)]
struct FieldArgs {
    /// Rectangle width
    #[arg(long, default_value_t = 10.0)]
    width: f64,
    /// Rectangle height
    #[arg(long, default_value_t = 10.0)]
    height: f64,
    /// Length of every spine
    #[arg(short, long, default_value_t = 3.0)]
    length: f64,
    /// Number of spines
    #[arg(short = 'n', long, default_value_t = 60)]
    count: usize,
    /// Seed of the random stream
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// CSV file for the final poses
    #[arg(short, long, value_name = "CSV")]
    output: Option<PathBuf>,
    /// CSV file for pose snapshots taken during the run
    #[arg(long, value_name = "CSV")]
    frames: Option<PathBuf>,
    /// Epochs between snapshots written to --frames
    #[arg(long, default_value_t = 10, value_name = "K")]
    frame_interval: usize,
    /// Check the final contact graph against a brute-force scan
    #[arg(long, default_value_t = false)]
    verify: bool,
}

impl FieldArgs {
    fn run_config(&self) -> RunConfig {
        RunConfig {
            field: Field {
                width: self.width,
                height: self.height,
            },
            spine_length: self.length,
            spine_count: self.count,
            seed: self.seed,
        }
    }

    /// Frames are only recorded when there is a file to write them to.
    fn frame_interval(&self) -> Option<usize> {
        self.frames.as_ref().map(|_| self.frame_interval)
    }
}

#[derive(Args, Debug)]
struct RelaxArgs {
    #[command(flatten)]
    field: FieldArgs,
    /// Epoch budget
    #[arg(long, default_value_t = 50)]
    max_epochs: usize,
    /// Distance moved per epoch
    #[arg(long, default_value_t = 0.1)]
    position_step: f64,
    /// Angle (radians) turned per epoch
    #[arg(long, default_value_t = 0.1)]
    angle_step: f64,
}

#[derive(Args, Debug)]
struct AnnealArgs {
    #[command(flatten)]
    field: FieldArgs,
    /// Epoch budget
    #[arg(long, default_value_t = 3000)]
    max_epochs: usize,
    /// Temperature base, T = alpha^(epoch / max_epochs)
    #[arg(long, default_value_t = 0.1)]
    alpha: f64,
    /// CSV file for the best snapshot seen during the run
    #[arg(long, value_name = "CSV")]
    best_output: Option<PathBuf>,
}

fn print_status(outcome: &Outcome) -> std::io::Result<()> {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    let (color, label) = match outcome.termination {
        Termination::Converged => (Color::Green, "converged"),
        Termination::BudgetExhausted => (Color::Yellow, "budget exhausted"),
    };
    stderr.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(stderr, "{}", label)?;
    stderr.reset()?;
    writeln!(
        stderr,
        " after {} epochs, {} contacts left",
        outcome.epochs, outcome.contacts
    )
}

fn verify(outcome: &Outcome) {
    let expected = overlap_scan(&outcome.spines);
    if expected == outcome.pairs {
        eprintln!("[INFO] Verified {} contacts against brute force", expected.len());
    } else {
        let missing = expected.iter().filter(|&p| !outcome.pairs.contains(p)).count();
        let stale = outcome.pairs.iter().filter(|&p| !expected.contains(p)).count();
        eprintln!(
            "[WARN] Contact graph disagrees with brute force: {} pairs missing, {} stale",
            missing, stale
        );
    }
}

fn finish(args: &FieldArgs, outcome: &Outcome) -> Result<(), Box<dyn Error>> {
    print_status(outcome)?;
    if args.verify {
        verify(outcome);
    }
    if let Some(path) = &args.output {
        write_poses_csv(path, &outcome.spines)?;
        eprintln!(
            "[INFO] Wrote {} poses to {}",
            outcome.spines.len(),
            path.display()
        );
    }
    if let Some(path) = &args.frames {
        write_frames_csv(path, &outcome.frames)?;
        eprintln!(
            "[INFO] Wrote {} frames to {}",
            outcome.frames.len(),
            path.display()
        );
    }
    Ok(())
}

fn run_optimizer(args: &FieldArgs, optimizer: &dyn Optimizer) -> Result<Outcome, Box<dyn Error>> {
    let config = args.run_config();
    eprintln!(
        "[INFO] {}: {} spines of length {} in {}x{} (seed {})",
        optimizer.name(),
        config.spine_count,
        config.spine_length,
        config.field.width,
        config.field.height,
        config.seed
    );
    Ok(run(&config, optimizer)?)
}

fn write_best(path: &Path, outcome: &Outcome) -> Result<(), Box<dyn Error>> {
    if let Some(best) = &outcome.best {
        write_poses_csv(path, &best.spines)?;
        eprintln!(
            "[INFO] Wrote best snapshot (energy {}) to {}",
            best.energy,
            path.display()
        );
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Relax(args) => {
            let RelaxArgs {
                field,
                max_epochs,
                position_step,
                angle_step,
            } = args;
            let result = Relaxation::new(RelaxationConfig {
                position_step,
                angle_step,
                max_epochs,
                frame_interval: field.frame_interval(),
                progress: true,
            })
            .map_err(Box::<dyn Error>::from)
            .and_then(|relaxation| run_optimizer(&field, &relaxation))
            .and_then(|outcome| finish(&field, &outcome));
            if let Err(err) = result {
                eprintln!("[relax error] {}", err);
                std::process::exit(1);
            }
        }
        Command::Anneal(args) => {
            let AnnealArgs {
                field,
                max_epochs,
                alpha,
                best_output,
            } = args;
            let result = Annealing::new(AnnealingConfig {
                max_epochs,
                alpha,
                frame_interval: field.frame_interval(),
                progress: true,
            })
            .map_err(Box::<dyn Error>::from)
            .and_then(|annealing| run_optimizer(&field, &annealing))
            .and_then(|outcome| {
                finish(&field, &outcome)?;
                match &best_output {
                    Some(path) => write_best(path, &outcome),
                    None => Ok(()),
                }
            });
            if let Err(err) = result {
                eprintln!("[anneal error] {}", err);
                std::process::exit(1);
            }
        }
    }
}
