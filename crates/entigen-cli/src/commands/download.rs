//! `entigen download`: copy a generated archive out of a working root.

use std::{fs, path::PathBuf};

use serde::Serialize;
use tracing::{debug, instrument};

use entigen_adapters::api::{ARCHIVE_CONTENT_TYPE, Download, resolve_download};

use crate::{
    cli::DownloadArgs,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct Downloaded {
    path: PathBuf,
    bytes: usize,
    content_type: &'static str,
    content_disposition: String,
}

/// Resolve the archive the same way an HTTP handler would, then write it.
#[instrument(skip_all, fields(file = %args.file, root = %args.root.display()))]
pub fn execute(args: DownloadArgs, output: OutputManager) -> CliResult<()> {
    let Download::Found {
        bytes,
        content_disposition,
    } = resolve_download(&args.root, &args.file)?
    else {
        return Err(CliError::NotFound {
            what: format!("archive '{}' in {}", args.file, args.root.display()),
        });
    };

    let destination = args.out.unwrap_or_else(|| PathBuf::from(&args.file));
    if destination.exists() {
        return Err(CliError::OutputExists { path: destination });
    }

    fs::write(&destination, &bytes)
        .with_cli_context(|| format!("Failed to write '{}'", destination.display()))?;
    debug!(bytes = bytes.len(), %content_disposition, "Archive written");

    if output.is_json() {
        output.json(&Downloaded {
            path: destination,
            bytes: bytes.len(),
            content_type: ARCHIVE_CONTENT_TYPE,
            content_disposition,
        })?;
        return Ok(());
    }

    output.success(&format!(
        "Saved {} ({} bytes)",
        destination.display(),
        bytes.len()
    ))?;
    Ok(())
}
