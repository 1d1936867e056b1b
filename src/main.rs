mod classifier;
mod cli;
mod error;
mod export;
mod extractor;
mod fmt;
mod models;
mod pipeline;
mod reports;
mod settings;
mod tagger;
mod tui;

use clap::{CommandFactory, Parser};

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        None => Cli::command().print_help().map_err(Into::into),
        Some(Commands::Init { model, vectorizer }) => cli::init::run(model, vectorizer),
        Some(Commands::Analyze {
            file,
            filters,
            list,
            model,
        }) => cli::analyze::run(&file, &filters, list, &model),
        Some(Commands::Export {
            file,
            output,
            filters,
            model,
        }) => cli::export::run(&file, output, &filters, &model),
        Some(Commands::Dashboard { file, model }) => cli::dashboard::run(&file, &model),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
