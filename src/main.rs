// src/main.rs
//
// prettyhtml: re-indent an HTML file in place.
//
// CLI:
//   prettyhtml [INPUT] [OUTPUT]
// INPUT defaults to ./catalogo.html; OUTPUT defaults to overwriting INPUT.
// Logging follows RUST_LOG (default: info).

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// CLI flags
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Input file
    #[arg(default_value = "catalogo.html")]
    input: PathBuf,

    /// Output file (default: overwrite input)
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    let src = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    let out = prettyhtml::format(&src);

    let out_path = cli.output.as_ref().unwrap_or(&cli.input);
    fs::write(out_path, out).with_context(|| format!("failed to write {}", out_path.display()))?;

    info!("Formatted: {}", relative_to_cwd(out_path).display());
    Ok(())
}

/// `path` relative to the working directory when it lies beneath it.
fn relative_to_cwd(path: &Path) -> PathBuf {
    env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(&cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
}
