//! `scan` command implementation.

use anyhow::{Context, Result};
use contracts::Channel;
use ingestion::{assemble_directory, SkippedFile, TrialFiles};
use serde::Serialize;
use tracing::info;

use super::load_blueprint;
use crate::cli::ScanArgs;

/// Scan result for JSON output
#[derive(Serialize)]
struct ScanReport {
    input: String,
    trials: Vec<TrialInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    skipped: Vec<SkippedInfo>,
}

#[derive(Serialize)]
struct TrialInfo {
    participant: String,
    complete: bool,
    slots: Vec<SlotInfo>,
}

#[derive(Serialize)]
struct SlotInfo {
    channel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<String>,
}

#[derive(Serialize)]
struct SkippedInfo {
    file: String,
    reason: String,
}

/// Execute the `scan` command
pub fn run_scan(args: &ScanArgs) -> Result<()> {
    let blueprint = load_blueprint(args.config.as_deref())?;
    info!(input = %args.input.display(), "Scanning recordings");

    let (trials, skipped) = assemble_directory(&args.input, blueprint.devices.clone())
        .with_context(|| format!("Failed to scan {}", args.input.display()))?;
    let report = build_report(&args.input.display().to_string(), &trials, &skipped);

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize scan")?;
        println!("{}", json);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn build_report(input: &str, trials: &[TrialFiles], skipped: &[SkippedFile]) -> ScanReport {
    ScanReport {
        input: input.to_string(),
        trials: trials
            .iter()
            .map(|trial| TrialInfo {
                participant: trial.participant().to_string(),
                complete: trial.is_complete(),
                slots: Channel::all()
                    .into_iter()
                    .map(|channel| SlotInfo {
                        channel: channel.to_string(),
                        file: trial.get(channel).and_then(|path| {
                            path.file_name().map(|n| n.to_string_lossy().into_owned())
                        }),
                    })
                    .collect(),
            })
            .collect(),
        skipped: skipped
            .iter()
            .map(|s| SkippedInfo {
                file: s.path.display().to_string(),
                reason: s.reason.to_string(),
            })
            .collect(),
    }
}

fn print_report(report: &ScanReport) {
    let complete = report.trials.iter().filter(|t| t.complete).count();
    println!("\n=== Recordings in {} ===\n", report.input);
    println!(
        "Trials: {} ({} complete, {} incomplete)",
        report.trials.len(),
        complete,
        report.trials.len() - complete
    );

    for trial in &report.trials {
        let mark = if trial.complete { "✓" } else { "✗" };
        println!("\n{} {}", mark, trial.participant);
        let last = trial.slots.len().saturating_sub(1);
        for (i, slot) in trial.slots.iter().enumerate() {
            let branch = if i == last { "└─" } else { "├─" };
            println!(
                "   {} {}: {}",
                branch,
                slot.channel,
                slot.file.as_deref().unwrap_or("(missing)")
            );
        }
    }

    if !report.skipped.is_empty() {
        println!("\n⚠ Skipped files:");
        for skipped in &report.skipped {
            println!("  - {}: {}", skipped.file, skipped.reason);
        }
    }

    println!();
}
