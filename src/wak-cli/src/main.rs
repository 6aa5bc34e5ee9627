mod cli;
mod commands;
mod config;
mod paths;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::*;

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "wakman=debug,wak=debug"
    } else {
        "wakman=info,wak=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::List {
            input,
            filter,
            output_format,
        } => {
            commands::list::handle(&input, &filter, output_format)?;
        }

        Commands::Extract {
            input,
            filter,
            output,
            sequential,
        } => {
            commands::extract::handle(&input, &filter, output.as_deref(), sequential)?;
        }

        Commands::Tree {
            input,
            output,
            output_format,
        } => {
            commands::tree::handle(&input, output.as_deref(), output_format)?;
        }

        Commands::Configure {
            wak,
            output,
            format_version,
            show,
        } => {
            commands::configure::handle(wak, output, format_version, show)?;
        }
    }

    Ok(())
}
