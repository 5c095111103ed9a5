mod session;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;
use zpy_engine::{GameConfig, PlayerId};

use crate::session::{replay, Script};

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "zpy-replay")]
#[command(about = "Replay a recorded ZPY message stream and print the server's replies")]
struct Args {
    /// JSON script: `{ "config": {...}, "steps": [{ "from": 1, "msg": {...} }] }`
    script: PathBuf,

    /// Override the script's seed
    #[arg(long)]
    seed: Option<u64>,

    /// Take rule variants and seed from ZPY_* environment variables
    #[arg(long)]
    env_config: bool,

    /// Answer rejected intents with a reject message instead of stopping
    #[arg(long)]
    keep_going: bool,

    /// Print the final state as this player sees it
    #[arg(long)]
    view: Option<PlayerId>,

    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false);
    match format {
        LogFormat::Text => builder.without_time().init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.log_format);

    let mut script = match Script::load(&args.script) {
        Ok(script) => script,
        Err(e) => {
            error!(error = %e, "Cannot load script");
            return ExitCode::from(2);
        }
    };
    if args.env_config {
        match GameConfig::from_env() {
            Ok(config) => script.config = config,
            Err(e) => {
                error!(error = %e, "Invalid environment configuration");
                return ExitCode::from(2);
            }
        }
    }
    if let Some(seed) = args.seed {
        script.config.seed = Some(seed);
    }

    let (session, out) = match replay(&script, args.keep_going).await {
        Ok(done) => done,
        Err(e) => {
            error!(error = %e, "Replay failed");
            return ExitCode::FAILURE;
        }
    };
    for msg in &out {
        match serde_json::to_string(msg) {
            Ok(line) => println!("{line}"),
            Err(e) => {
                error!(error = %e, "Cannot encode reply");
                return ExitCode::FAILURE;
            }
        }
    }

    if let Some(who) = args.view {
        let printed = session
            .view(who)
            .await
            .map_err(|e| e.to_string())
            .and_then(|view| serde_json::to_string_pretty(&view).map_err(|e| e.to_string()));
        match printed {
            Ok(view) => println!("{view}"),
            Err(e) => {
                error!(error = %e, "Cannot print final view");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
