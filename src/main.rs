mod cli;
mod job;

use clap::Parser;
use cli::Cli;
use job::ConversionJob;
use pf_av::{probe, tools};
use pf_core::{media, Error, PlanLimits, Result};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise default to progress-level output.
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "pocketforge=info,pf_av=info,pf_core=info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let input = cli.input.as_path();
    if !input.is_file() {
        return Err(Error::InputNotFound {
            path: input.to_path_buf(),
        });
    }

    if cli.output.exists() && !cli.force_overwrite {
        return Err(Error::OutputExists {
            path: cli.output.clone(),
        });
    }

    let mplayer = tools::require_tool("mplayer")?;
    let ffmpeg = tools::require_tool("ffmpeg")?;
    tracing::debug!(
        "using {} and {}",
        mplayer.display(),
        ffmpeg.display()
    );

    // The original is removed up front so the encoder never sees a
    // pre-existing output file.
    if cli.force_overwrite && cli.output.exists() {
        std::fs::remove_file(&cli.output)?;
    }

    let settings = cli.settings();
    for warning in settings.validate() {
        tracing::warn!("{warning}");
    }

    let source = probe::identify(&mplayer, input).await?;
    tracing::info!(
        "source: {}x{}, aspect {}",
        source.width,
        source.height,
        source
            .aspect
            .map(|a| a.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    );

    let target = media::plan(&source, &PlanLimits::default())?;
    tracing::info!("target resolution: {target}");

    let passthrough = cli.passthrough();

    let mut job = ConversionJob::create(&std::env::temp_dir())?;
    let result = tokio::select! {
        res = async {
            job.spawn_decoders(&mplayer, input, target, &passthrough)?;
            job.run_encoder(&ffmpeg, &settings, &cli.output).await
        } => res,
        _ = shutdown_signal() => Err(Error::Interrupted),
    };
    job.cleanup().await;

    if result.is_ok() {
        tracing::info!("wrote {}", cli.output.display());
    }
    result
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
}
