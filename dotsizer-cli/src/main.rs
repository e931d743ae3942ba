mod app;
mod commands;
mod output;

use clap::Parser;

use crate::app::{Cli, Command};

fn main() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        eprintln!("\nCancelled.");
        std::process::exit(130);
    })
    .expect("failed to set Ctrl+C handler");

    let cli = Cli::parse();

    // Show dotsizer info+ on stderr unless --json; --verbose enables debug; RUST_LOG overrides
    if !cli.global.json {
        let level = if cli.global.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        env_logger::Builder::new()
            .filter_module("dotsizer", level)
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(false)
            .init();
    }

    match &cli.command {
        Command::Tree {
            path,
            assembly,
            threshold,
            depth,
            units,
            cost_model,
        } => commands::tree::run(
            path,
            &commands::tree::TreeOptions {
                assembly: assembly.as_deref(),
                threshold: *threshold,
                depth: *depth,
                units: *units,
                cost_model: cost_model.as_deref(),
                global: &cli.global,
            },
        ),
        Command::Top {
            path,
            assembly,
            count,
            cost_model,
        } => commands::top::run(
            path,
            assembly.as_deref(),
            *count,
            cost_model.as_deref(),
            &cli.global,
        ),
        Command::Batch { paths, cost_model } => {
            commands::batch::run(paths, cost_model.as_deref(), &cli.global)
        }
    }
}
