use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;

use crate::cli::output::{OutputFormat, OutputOptions};
use crate::core::poller::{poll_for, PollOutcome, PollSettings};

#[derive(Serialize)]
struct WaitPayload {
    outcome: &'static str,
    file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    matched: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Look at `path` once: `Some` with the first matching line (or the path itself
/// when no pattern is given), `None` when the file is absent or nothing matches.
pub fn probe_file(path: &Path, pattern: Option<&Regex>) -> std::io::Result<Option<String>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    let Some(pattern) = pattern else {
        return Ok(Some(path.display().to_string()));
    };
    Ok(content
        .lines()
        .find(|line| pattern.is_match(line))
        .map(|line| line.to_string()))
}

pub async fn wait_for_file(
    path: &Path,
    pattern: Option<&Regex>,
    settings: PollSettings,
) -> PollOutcome<String> {
    poll_for(|| probe_file(path, pattern), settings).await
}

pub async fn run(
    file: PathBuf,
    pattern: Option<String>,
    settings: PollSettings,
    opts: &OutputOptions,
) -> Result<()> {
    let pattern = pattern
        .as_deref()
        .map(Regex::new)
        .transpose()
        .context("Invalid --pattern")?;

    tracing::debug!(
        file = %file.display(),
        interval_ms = settings.interval.as_millis() as u64,
        timeout_ms = settings.timeout.as_millis() as u64,
        "waiting for file"
    );
    let outcome = wait_for_file(&file, pattern.as_ref(), settings).await;

    let (label, code, matched, error) = match outcome {
        PollOutcome::Ready(matched) => ("ready", 0, Some(matched), None),
        PollOutcome::TimedOut => ("timed_out", 1, None, None),
        PollOutcome::Failed(err) => ("failed", 2, None, Some(err)),
    };

    match opts.format {
        OutputFormat::Text => match (&matched, &error) {
            (Some(line), _) => println!("{}", line),
            (None, Some(err)) => eprintln!("Failed while checking {}: {}", file.display(), err),
            (None, None) => eprintln!(
                "Timed out after {}ms waiting for {}",
                settings.timeout.as_millis(),
                file.display()
            ),
        },
        OutputFormat::Json => {
            let payload = WaitPayload {
                outcome: label,
                file,
                matched,
                error,
            };
            println!("{}", opts.to_json(&payload)?);
        }
    }

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
