use std::path::Path;

use colored::Colorize;

use crate::classifier::ModelHandle;
use crate::error::Result;
use crate::settings::{load_settings, save_settings, shellexpand_path};

pub fn run(model: Option<String>, vectorizer: Option<String>) -> Result<()> {
    let mut settings = load_settings();
    if let Some(m) = model {
        settings.model_path = shellexpand_path(&m);
    }
    if let Some(v) = vectorizer {
        settings.vectorizer_path = shellexpand_path(&v);
    }
    let path = save_settings(&settings)?;

    println!("{} {}", "Saved settings to".green(), path.display());
    println!("  Model:      {}", settings.model_path);
    println!("  Vectorizer: {}", settings.vectorizer_path);

    // Artifacts may be copied in later, so a failed check is only a warning.
    match ModelHandle::load(
        Path::new(&settings.model_path),
        Path::new(&settings.vectorizer_path),
    ) {
        Ok(handle) => println!(
            "  {} vocabulary terms, categories: {}",
            handle.vocabulary_size(),
            handle.classes().join(", ")
        ),
        Err(e) => eprintln!("{} {e}", "Warning:".yellow().bold()),
    }
    Ok(())
}
