pub mod analyze;
pub mod dashboard;
pub mod export;
pub mod init;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use crate::classifier::ModelHandle;
use crate::error::Result;
use crate::models::{Transaction, TxnType};
use crate::pipeline::{load_messages, Pipeline, PipelineOutput};
use crate::reports::FilterSelection;
use crate::settings::resolve_model_paths;

#[derive(Parser)]
#[command(
    name = "smsfin",
    version,
    about = "Categorize SMS bank alerts, track spending, and get savings advice."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save the classifier artifact locations to settings.
    Init {
        /// Path to the trained category model (JSON)
        #[arg(long)]
        model: Option<String>,
        /// Path to the paired text vectorizer (JSON)
        #[arg(long)]
        vectorizer: Option<String>,
    },
    /// Analyze an SMS export and print metrics, breakdown and advice.
    Analyze {
        /// CSV file with an 'SMS' column
        file: String,
        #[command(flatten)]
        filters: FilterArgs,
        /// Also print every matching transaction
        #[arg(long)]
        list: bool,
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Write the categorized (and filtered) transactions to CSV.
    Export {
        /// CSV file with an 'SMS' column
        file: String,
        /// Output path (default: ./categorized_transactions.csv)
        #[arg(long)]
        output: Option<String>,
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Open the interactive dashboard.
    Dashboard {
        /// CSV file with an 'SMS' column
        file: String,
        #[command(flatten)]
        model: ModelArgs,
    },
}

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Keep only this transaction type: debit, credit, unknown (repeatable)
    #[arg(long = "type")]
    pub types: Vec<TxnType>,
    /// Keep only this category (repeatable)
    #[arg(long = "category")]
    pub categories: Vec<String>,
}

impl FilterArgs {
    pub fn selection(&self, table: &[Transaction]) -> FilterSelection {
        FilterSelection::from_args(table, &self.types, &self.categories)
    }
}

#[derive(Args, Debug, Default)]
pub struct ModelArgs {
    /// Override the category model path from settings
    #[arg(long)]
    pub model: Option<String>,
    /// Override the vectorizer path from settings
    #[arg(long)]
    pub vectorizer: Option<String>,
}

impl ModelArgs {
    /// Load the classifier artifacts. Failure here is fatal for every command.
    pub fn load(&self) -> Result<ModelHandle> {
        let (model, vectorizer) =
            resolve_model_paths(self.model.as_deref(), self.vectorizer.as_deref());
        ModelHandle::load(&model, &vectorizer)
    }
}

/// Load the model, read the upload and run the pipeline.
pub(crate) fn process_file(file: &str, model: &ModelArgs) -> Result<PipelineOutput> {
    let handle = model.load()?;
    let messages = load_messages(std::path::Path::new(file))?;
    Pipeline::new(&handle).run(&messages)
}

pub(crate) fn print_warnings(output: &PipelineOutput) {
    for w in &output.warnings {
        eprintln!("{} {w}", "Warning:".yellow().bold());
    }
}
