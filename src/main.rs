use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use tracing::{error, info, info_span};
use uuid::Uuid;

mod artifacts;
mod error;
mod inference;
mod input;
mod insights;
mod logging;
mod models;
mod network;
mod pipeline;
mod report;
mod rubric;
mod scaler;

use artifacts::ArtifactPaths;
use inference::Predictor;
use rubric::WeightedRubric;
use scaler::FeatureScaler;

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Parser)]
#[command(name = "student-insights")]
#[command(
    about = "Predict a student's performance score from stdin JSON and list strengths and weaknesses",
    long_about = None
)]
struct Cli {
    /// Model artifact [default: performance_prediction_model.json next to the executable]
    #[arg(long, env = "STUDENT_INSIGHTS_MODEL")]
    model: Option<PathBuf>,
    /// Scaler artifact [default: feature_scaler.json next to the executable]
    #[arg(long, env = "STUDENT_INSIGHTS_SCALER")]
    scaler: Option<PathBuf>,
    /// Prediction backend
    #[arg(long, value_enum, env = "STUDENT_INSIGHTS_BACKEND", default_value_t = Backend::Network)]
    backend: Backend,
    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "STUDENT_INSIGHTS_LOG", default_value = DEFAULT_LOG_FILTER)]
    log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// Trained network plus fitted scaler loaded from disk
    Network,
    /// Weighted heuristic score; needs no artifacts
    Rubric,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        // Callers read stdout as JSON, so argument errors get the envelope too.
        Err(err) => {
            logging::init(DEFAULT_LOG_FILTER);
            return fail(&anyhow::Error::new(err).context("invalid command line arguments"));
        }
    };
    logging::init(&cli.log_level);

    let run_id = Uuid::new_v4();
    let _run = info_span!("run", %run_id).entered();
    info!("student insights v{} starting", env!("CARGO_PKG_VERSION"));

    // Artifacts load before stdin is touched so a broken install fails
    // without needing request data.
    let predictor = match load_predictor(&cli) {
        Ok(predictor) => predictor,
        Err(err) => return fail(&err),
    };

    match handle_request(&predictor) {
        Ok(output) => {
            println!("{output}");
            info!("completed successfully");
            ExitCode::SUCCESS
        }
        Err(err) => fail(&err),
    }
}

fn load_predictor(cli: &Cli) -> anyhow::Result<Predictor> {
    match cli.backend {
        Backend::Rubric => {
            info!("using weighted rubric backend");
            Ok(Predictor::new(
                Box::new(FeatureScaler::Identity),
                Box::new(WeightedRubric),
            ))
        }
        Backend::Network => {
            let paths = ArtifactPaths::resolve(cli.model.clone(), cli.scaler.clone())?;
            info!(
                model = %paths.model.display(),
                scaler = %paths.scaler.display(),
                "loading model and scaler"
            );

            load_network(&paths).map_err(|err| {
                error!(
                    cwd = ?std::env::current_dir().ok(),
                    model = %paths.model.display(),
                    scaler = %paths.scaler.display(),
                    "error loading model or scaler"
                );
                err.context("error loading model or scaler")
            })
        }
    }
}

fn load_network(paths: &ArtifactPaths) -> anyhow::Result<Predictor> {
    let model = artifacts::load_model(&paths.model)?;
    let scaler = artifacts::load_scaler(&paths.scaler)?;
    Ok(Predictor::new(Box::new(scaler), Box::new(model)))
}

fn handle_request(predictor: &Predictor) -> anyhow::Result<String> {
    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .context("failed to read standard input")?;

    let report = pipeline::process(predictor, &raw).context("error processing student data")?;
    Ok(report::render_success(report))
}

fn fail(err: &anyhow::Error) -> ExitCode {
    error!(traceback = ?err, "{err:#}");
    println!("{}", report::render_failure(err));
    ExitCode::FAILURE
}
