use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};

use firefly_opt::core::domain::{Bound, FaParams};
use firefly_opt::engine::benchmarks::Benchmark;
use firefly_opt::interface::report;
use firefly_opt::solvers::fa::FireflyAlgorithm;

// --- CLI Definitions ---

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ObjectiveArg {
    Sphere,
    Rastrigin,
    Rosenbrock,
}

impl From<ObjectiveArg> for Benchmark {
    fn from(arg: ObjectiveArg) -> Self {
        match arg {
            ObjectiveArg::Sphere => Benchmark::Sphere,
            ObjectiveArg::Rastrigin => Benchmark::Rastrigin,
            ObjectiveArg::Rosenbrock => Benchmark::Rosenbrock,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Firefly Algorithm: continuous function optimization", long_about = None)]
struct Args {
    /// Objective function
    #[arg(value_enum)]
    objective: ObjectiveArg,

    /// Problem dimensionality; overrides `d` from --config when given
    d: Option<usize>,

    /// JSON file with run parameters; `d` and the flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Population size
    #[arg(long)]
    n: Option<usize>,

    /// Number of iterations
    #[arg(long)]
    iters: Option<usize>,

    /// Random step scale
    #[arg(long)]
    alpha: Option<f64>,

    /// Factor applied to alpha after each iteration (1.0 = constant)
    #[arg(long)]
    alpha_decay: Option<f64>,

    /// Attractiveness at zero distance
    #[arg(long)]
    beta0: Option<f64>,

    /// Light absorption coefficient
    #[arg(long)]
    gamma: Option<f64>,

    /// Lower bound, applied to every dimension
    #[arg(long, allow_hyphen_values = true)]
    lower: Option<f64>,

    /// Upper bound, applied to every dimension
    #[arg(long, allow_hyphen_values = true)]
    upper: Option<f64>,

    /// Minimize the objective (default)
    #[arg(long, conflicts_with = "maximize")]
    minimize: bool,

    /// Maximize the objective
    #[arg(long)]
    maximize: bool,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Record every population state (d = 2 only)
    #[arg(long)]
    track_positions: bool,

    /// Write the best-value history as CSV
    #[arg(long)]
    history_csv: Option<PathBuf>,

    /// Write the recorded 2D positions as CSV (implies --track-positions)
    #[arg(long)]
    positions_csv: Option<PathBuf>,

    /// Write the full result as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

// --- Initialization Helpers ---

fn load_params(args: &Args) -> Result<FaParams> {
    let mut params = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str::<FaParams>(&text)
                .with_context(|| format!("Failed to parse config {}", path.display()))?
        }
        None => FaParams::default(),
    };

    if let Some(d) = args.d {
        params.d = d;
    }
    if let Some(n) = args.n {
        params.n = n;
    }
    if let Some(iters) = args.iters {
        params.iters = iters;
    }
    if let Some(alpha) = args.alpha {
        params.alpha = alpha;
    }
    if let Some(decay) = args.alpha_decay {
        params.alpha_decay = decay;
    }
    if let Some(beta0) = args.beta0 {
        params.beta0 = beta0;
    }
    if let Some(gamma) = args.gamma {
        params.gamma = gamma;
    }
    if let Some(lower) = args.lower {
        params.lower = Bound::Scalar(lower);
    }
    if let Some(upper) = args.upper {
        params.upper = Bound::Scalar(upper);
    }
    if args.maximize {
        params.maximize = true;
    } else if args.minimize {
        params.maximize = false;
    }
    if args.seed.is_some() {
        params.seed = args.seed;
    }
    if args.track_positions || args.positions_csv.is_some() {
        params.track_positions = true;
    }

    Ok(params)
}

fn format_vector(x: &[f64]) -> String {
    let parts: Vec<String> = x.iter().map(|v| format!("{:.4}", v)).collect();
    format!("[{}]", parts.join(", "))
}

// --- Main ---

fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    pretty_env_logger::init();

    let args = Args::parse();
    let params = load_params(&args)?;
    let objective = Benchmark::from(args.objective);

    if params.track_positions && params.d != 2 {
        warn!("Position tracking is only available when d = 2; ignoring it");
    }

    let solver = FireflyAlgorithm::new(objective, params).context("Invalid configuration")?;
    let result = solver.run().context("Optimization aborted")?;

    println!("best_x: {}", format_vector(result.best_x.as_slice()));
    println!("best_value: {:.6}", result.best_value);

    if let Some(path) = &args.history_csv {
        report::to_file(path, |w| report::write_history_csv(&result, w))?;
        info!("History written to {}", path.display());
    }

    if let Some(path) = &args.positions_csv {
        if result.info.history_positions.is_some() {
            report::to_file(path, |w| report::write_positions_csv(&result, w))?;
            info!("Positions written to {}", path.display());
        } else {
            warn!("No position history available; {} not written", path.display());
        }
    }

    if let Some(path) = &args.json {
        report::to_file(path, |w| report::write_json(&result, w))?;
        info!("Result written to {}", path.display());
    }

    Ok(())
}
