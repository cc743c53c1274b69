//! handoff - allocate a large buffer and hand it to a background worker
//!
//! Interactive by default (`start`, `toggle`, ...); `--runs N` runs N cycles and exits.

mod cli;
mod commands;
mod config;
mod render;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use handoff_core::ports::SystemClock;
use handoff_core::{AckWorker, Console, RunController};

use crate::cli::Cli;
use crate::commands::{Command, HELP};
use crate::render::Renderer;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = config::load(&cli)?;

    // subscribe before the worker can log "Ready!"
    let console = Console::new();
    let mut renderer = Renderer::new(console.subscribe(), cli.json);
    let controller = RunController::with_parts(config, AckWorker, Arc::new(SystemClock), console)
        .context("failed to start the run controller")?;

    match cli.runs {
        Some(runs) => scripted(&controller, &mut renderer, runs).await?,
        None => interactive(&controller, &mut renderer).await?,
    }

    renderer.flush();
    Ok(())
}

/// Setup logging based on verbosity level.
///
/// Console lines already go to stdout, so the subscriber stays quiet unless asked.
fn setup_logging(verbose: bool) {
    let log_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn scripted(controller: &RunController, renderer: &mut Renderer, runs: u32) -> Result<()> {
    let mut trigger = controller.trigger();

    for _ in 0..runs {
        controller.start()?;
        loop {
            tokio::select! {
                done = trigger.wait_enabled() => {
                    done?;
                    break;
                }
                entry = renderer.recv() => renderer.print(&entry),
            }
        }
        renderer.flush();
    }

    for report in controller.reports() {
        renderer.print_report(&report);
    }
    Ok(())
}

async fn interactive(controller: &RunController, renderer: &mut Renderer) -> Result<()> {
    println!(
        "transfer mode: {} (type `help` for commands)",
        controller.transfer_mode()
    );
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(Command::Start) => {
                        if let Err(e) = controller.start() {
                            println!("{e}");
                        }
                    }
                    Ok(Command::Toggle) => {
                        println!("transfer mode: {}", controller.toggle_transfer());
                    }
                    Ok(Command::Status) => {
                        println!(
                            "state={} transfer mode={} completed runs={}",
                            controller.state(),
                            controller.transfer_mode(),
                            controller.reports().len()
                        );
                        for report in controller.reports() {
                            renderer.print_report(&report);
                        }
                    }
                    Ok(Command::Log) => println!("{}", controller.console().render()),
                    Ok(Command::Help) => println!("{HELP}"),
                    Ok(Command::Quit) => break,
                    Err(e) => println!("{e}"),
                }
            }
            entry = renderer.recv() => renderer.print(&entry),
        }
    }
    Ok(())
}
