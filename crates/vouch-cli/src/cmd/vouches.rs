use anyhow::Context;
use clap::Subcommand;
use std::path::{Path, PathBuf};
use vouch_core::config::Config;
use vouch_core::{paths, RecordStore, VouchError};

use crate::output::{print_json, print_table};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum VouchesSubcommand {
    /// List stored vouches, oldest first
    List {
        /// Read this file instead of the configured one
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(
    root: &Path,
    config_path: &Path,
    subcmd: VouchesSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    match subcmd {
        VouchesSubcommand::List { file } => {
            let path = match file {
                Some(file) => file,
                None => data_path(root, config_path)?,
            };
            list(&RecordStore::new(path), json)
        }
    }
}

/// Listing only needs `dataFile`, so an incomplete config falls back to the
/// default file instead of failing.
fn data_path(root: &Path, config_path: &Path) -> anyhow::Result<PathBuf> {
    match Config::load(config_path) {
        Ok(config) => Ok(paths::data_path(root, &config.data_file)),
        Err(VouchError::MissingConfig(_)) => {
            Ok(paths::data_path(root, Path::new(paths::DATA_FILE)))
        }
        Err(e) => Err(e).with_context(|| format!("loading config from {}", config_path.display())),
    }
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

fn list(store: &RecordStore, json: bool) -> anyhow::Result<()> {
    let records = store
        .load()
        .with_context(|| format!("reading {}", store.path().display()))?;

    if json {
        return print_json(&records);
    }

    if records.is_empty() {
        println!("No vouches stored.");
        return Ok(());
    }

    let rows = records
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.rating.stars(),
                r.author.clone(),
                r.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                preview(&r.review, 48),
            ]
        })
        .collect();
    print_table(&["ID", "RATING", "AUTHOR", "CREATED", "REVIEW"], rows);
    Ok(())
}

/// First line of `text`, cut to `max` characters.
fn preview(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or("");
    if line.chars().count() > max || text.lines().nth(1).is_some() {
        let cut: String = line.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    } else {
        line.to_string()
    }
}
