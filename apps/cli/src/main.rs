mod commands;
mod player;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::prelude::*;
use wb_dialogue::SessionStatus;

use crate::commands::Context;

#[derive(Parser)]
#[command(name = "wb", about = "Dialogue workbench playback tools")]
struct Cli {
    /// Backend API base, e.g. http://127.0.0.1:8766/api/tts
    #[arg(long, env = "WORKBENCH_API_BASE", global = true)]
    api_base: Option<String>,

    #[arg(long, env = "WORKBENCH_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the backend is reachable
    Health,
    /// List sessions
    Sessions {
        #[arg(long)]
        status: Option<SessionStatus>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Reconstruct where each line sits in the merged track
    Timeline {
        session_id: String,
        /// Report the line playing at this many seconds (repeatable)
        #[arg(long = "at")]
        at: Vec<f64>,
    },
    /// Play a session against a simulated clock and follow the highlight
    Follow {
        session_id: String,
        /// Play a single line instead of the merged track
        #[arg(long)]
        item: Option<usize>,
        #[arg(long, default_value_t = 1.0)]
        speed: f64,
    },
    /// Download every clip and the merged track
    Export { session_id: String, dir: PathBuf },
    /// Save a voice preview clip
    Preview {
        voice_id: String,
        out: PathBuf,
        #[arg(long)]
        text: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut env = wb_workbench_client::ClientEnv::load()?;
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(api_base) = cli.api_base {
        env.api_base = api_base;
    }
    if let Some(api_key) = cli.api_key.filter(|key| !key.trim().is_empty()) {
        env.api_key = Some(api_key);
    }

    let ctx = Context::new(env)?;

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    match cli.command {
        Commands::Health => commands::health::run(&ctx).await,
        Commands::Sessions { status, limit } => commands::sessions::run(&ctx, status, limit).await,
        Commands::Timeline { session_id, at } => {
            commands::timeline::run(&ctx, &session_id, &at, &cancel).await
        }
        Commands::Follow {
            session_id,
            item,
            speed,
        } => commands::follow::run(&ctx, &session_id, item, speed, &cancel).await,
        Commands::Export { session_id, dir } => {
            commands::export::run(&ctx, &session_id, &dir).await
        }
        Commands::Preview {
            voice_id,
            out,
            text,
        } => commands::preview::run(&ctx, &voice_id, text.as_deref(), &out).await,
    }
}
