use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ci_core::ports::IntakeApiPort;
use consult_intake::bootstrap::{self, JsonLinesEventPort};
use consult_intake::script;
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "consult-intake", about = "Drive the consultation intake wizard against a REST backend")]
struct Cli {
    /// Config file (defaults to $CONSULT_CONFIG, then the platform config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a JSON script of wizard commands; events are written to stdout
    Run {
        /// Path to the script
        #[arg(short, long)]
        script: PathBuf,
    },
    /// Ask the backend whether an email already has an account
    CheckEmail { email: String },
    /// Print the effective configuration as TOML
    ShowConfig,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = bootstrap::init_tracing_subscriber(cli.verbose) {
        eprintln!("Failed to initialize tracing: {err}");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = ?err, "consult-intake failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = bootstrap::resolve_config(cli.config)?;

    match cli.command {
        Commands::Run { script: path } => {
            let commands = script::load_script(&path).await?;
            let runtime = bootstrap::wire_dependencies(&config, Arc::new(JsonLinesEventPort::stdout()))?;
            let state = script::run_script(&runtime.orchestrator, runtime.auth.as_ref(), commands).await?;
            runtime.orchestrator.file_stage().wait_idle().await;
            if !state.completed {
                tracing::info!(step = state.step.index(), "wizard left open");
            }
        }
        Commands::CheckEmail { email } => {
            let runtime = bootstrap::wire_dependencies(&config, Arc::new(JsonLinesEventPort::stdout()))?;
            let exists = runtime
                .client
                .check_email(email.trim())
                .await
                .context("Email check failed")?;
            println!("{}", serde_json::json!({ "email": email.trim(), "exists": exists }));
        }
        Commands::ShowConfig => {
            let rendered = toml::to_string_pretty(&config).context("Failed to render config")?;
            print!("{rendered}");
        }
    }
    Ok(())
}
