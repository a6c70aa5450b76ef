// Declare modules
pub mod cli;
pub mod config;
pub mod formatter;
pub mod language;
pub mod models;
pub mod patterns;
pub mod scanner;
pub mod sniffer;

use anyhow::Result;
use clap::Parser;

use self::cli::Cli;
use self::config::{merge_vecs, resolve_config};
use self::formatter::OutputGenerator;
use self::patterns::load_ignore_patterns;
use self::scanner::Scanner;

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();

    // 2. Resolve Configuration
    let config = resolve_config(args)?;

    // 3. Ignore patterns, read once for the whole scan
    let file_patterns = load_ignore_patterns(&config.root)?;
    let patterns = merge_vecs(Some(file_patterns), Some(config.extra_ignore.clone()));
    log::debug!("Ignore patterns: {:?}", patterns);

    // 4. Scan Directory
    let scanner = Scanner::new(&config, &patterns)?;
    let structure = scanner.scan()?;

    // 5. Generate Output
    let json = OutputGenerator::render_json(&structure)?;
    let output_path = match &config.output {
        Some(path) => path.clone(),
        None => OutputGenerator::default_output_path(&config.root)?,
    };
    OutputGenerator::write(&output_path, &json)?;

    // 6. Confirm
    println!("✅ Folder structure saved to: {}", output_path.display());

    Ok(())
}
