mod display;
mod input;
mod run;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use synscore_ai::Scorer;
use synscore_core::ArtifactConfig;
use synscore_core::config::{DEFAULT_LABELS_FILE, DEFAULT_MODEL_FILE, DEFAULT_TOP_K};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "synscore",
    version,
    about = "Top-K image classification with a pre-loaded ONNX model"
)]
struct Cli {
    #[command(flatten)]
    artifacts: ArtifactArgs,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ArtifactArgs {
    /// Directory holding the model and label artifacts.
    #[arg(long, env = "SYNSCORE_MODEL_DIR")]
    model_dir: PathBuf,

    #[arg(long, env = "SYNSCORE_MODEL_FILE", default_value = DEFAULT_MODEL_FILE)]
    model_file: String,

    #[arg(long, env = "SYNSCORE_LABELS_FILE", default_value = DEFAULT_LABELS_FILE)]
    labels_file: String,

    /// Number of ranked results per image.
    #[arg(long, env = "SYNSCORE_TOP_K", default_value_t = DEFAULT_TOP_K)]
    top_k: usize,

    /// Threads ONNX Runtime may use inside one inference call.
    #[arg(long, env = "SYNSCORE_INTRA_THREADS", default_value_t = 1)]
    intra_threads: usize,
}

impl ArtifactArgs {
    fn into_config(self) -> ArtifactConfig {
        ArtifactConfig {
            model_dir: self.model_dir,
            model_file: self.model_file,
            labels_file: self.labels_file,
            top_k: self.top_k,
            intra_threads: self.intra_threads,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Load both artifacts and verify they agree.
    Check,
    /// Score image files (.bgr/.raw 224x224 BGR bytes, or PNG/JPEG/BMP).
    Score {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Worker threads sharing the loaded model.
        #[arg(long, short, default_value_t = 1)]
        jobs: usize,

        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Table,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .context("invalid --log-level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("synscore v{}", env!("CARGO_PKG_VERSION"));

    let config = cli.artifacts.into_config();
    let scorer = Scorer::from_config(&config)
        .with_context(|| format!("loading artifacts from {}", config.model_dir.display()))?;

    match cli.command {
        Command::Check => {
            let dim = scorer
                .session()
                .output_dim()
                .map_or_else(|| "dynamic".to_string(), |d| d.to_string());
            println!("model:      {}", config.model_path().display());
            println!(
                "labels:     {} ({} entries)",
                config.labels_path().display(),
                scorer.labels().len()
            );
            println!("output dim: {dim}");
            println!("top k:      {}", scorer.top_k());
        }
        Command::Score {
            files,
            jobs,
            format,
        } => {
            let outcomes = run::score_files(&scorer, &files, jobs);
            match format {
                Format::Json => {
                    let json = serde_json::to_string_pretty(&display::to_json(&outcomes))?;
                    println!("{json}");
                }
                Format::Table => print!("{}", display::to_table(&outcomes)),
            }

            let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
            if failed > 0 {
                anyhow::bail!("{failed} of {} files failed", outcomes.len());
            }
        }
    }
    Ok(())
}
