//! Enhance command implementation.

use anyhow::{bail, Result};
use model_diagram::enhance::{enhance_svg_file, EnhanceOptions, EnhanceOutcome};
use std::path::PathBuf;

/// Run the enhance command
pub fn run(input: PathBuf, output: PathBuf, font_url: Option<String>) -> Result<()> {
    let mut options = EnhanceOptions::default();
    if let Some(url) = font_url {
        options.font_import_url = url;
    }

    match enhance_svg_file(&input, &output, &options) {
        EnhanceOutcome::Written(path) => {
            eprintln!("Interactive SVG written to: {}", path.display());
            Ok(())
        }
        EnhanceOutcome::MissingInput => bail!("input file does not exist: {}", input.display()),
        EnhanceOutcome::Unreadable(e) => bail!("failed to read {}: {}", input.display(), e),
        EnhanceOutcome::ParseError(e) => bail!("error parsing SVG {}: {}", input.display(), e),
        EnhanceOutcome::WriteError(e) => bail!("failed to write {}: {}", output.display(), e),
    }
}
