//! Candidate-domain generation: the cross product of a names file and an
//! extensions file, written one domain per line.

use crate::InputError;
use std::path::{Path, PathBuf};
use tracing::info;

/// File locations for one generation run. The CLI fills these from flags or
/// the `SOURCE_FILE` / `EXTENSIONS_FILE` / `TARGET_FILE` environment.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub names_file: PathBuf,
    pub extensions_file: PathBuf,
    pub target_file: PathBuf,
}

/// Reads a newline-delimited list, trimming entries and skipping blank lines.
pub async fn load_list(path: &Path) -> Result<Vec<String>, InputError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| InputError::unreadable(path, e))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Every `{name}{extension}` concatenation, name-major then extension-minor:
/// all extensions of the first name, then all of the second, and so on.
pub fn combine(names: &[String], extensions: &[String]) -> Vec<String> {
    let mut domains = Vec::with_capacity(names.len() * extensions.len());
    for name in names {
        for extension in extensions {
            domains.push(format!("{name}{extension}"));
        }
    }
    domains
}

/// Generates the combined candidate list and writes it to the target file,
/// returning how many domains were produced.
///
/// A names or extensions file with no usable entries refuses the run before
/// anything is written, so a previously generated target is never clobbered
/// by a bad input.
pub async fn generate(config: &GeneratorConfig) -> Result<usize, InputError> {
    let names = load_list(&config.names_file).await?;
    if names.is_empty() {
        return Err(InputError::empty_list(&config.names_file));
    }
    let extensions = load_list(&config.extensions_file).await?;
    if extensions.is_empty() {
        return Err(InputError::empty_list(&config.extensions_file));
    }
    let domains = combine(&names, &extensions);

    let mut body = domains.join("\n");
    body.push('\n');
    tokio::fs::write(&config.target_file, body)
        .await
        .map_err(|e| InputError::unwritable(&config.target_file, e))?;

    info!(
        "Wrote {} candidate domains to {}",
        domains.len(),
        config.target_file.display()
    );
    Ok(domains.len())
}
