//! `werewolf` — interactive Night/Day phase loop

use clap::Parser;
use tokio_util::sync::CancellationToken;

use werewolf::cli::args::Cli;
use werewolf::cli::commands;
use werewolf::error::ExitCode;
use werewolf::observability::init_logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        init_logging(cli.log_format, cli.verbose, cli.color);
    }

    // First Ctrl+C ends the session like `quit`; a second one forces exit.
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        #[cfg(unix)]
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to register SIGTERM handler");
                    if tokio::signal::ctrl_c().await.is_ok() {
                        signal_cancel.cancel();
                    }
                    return;
                }
            };

        #[cfg(unix)]
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                signal_cancel.cancel();
            }
            _ = sigterm.recv() => std::process::exit(ExitCode::TERMINATED),
        }

        #[cfg(not(unix))]
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_cancel.cancel();
        }

        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(ExitCode::INTERRUPTED);
        }
    });

    let result = commands::dispatch(cli, cancel).await;

    // Exit explicitly: a pending blocking stdin read would otherwise hold
    // the runtime open.
    match result {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
