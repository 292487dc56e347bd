//! `run` command implementation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use contracts::PipelineBlueprint;
use tracing::{info, warn};

use super::load_blueprint;
use crate::cli::RunArgs;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    let mut blueprint = load_blueprint(args.config.as_deref())?;

    // Apply CLI overrides
    if let Some(ref output) = args.output {
        info!(output = %output.display(), "Overriding output directory from CLI");
        blueprint.output.directory = output.display().to_string();
    }
    if args.write_conditioned {
        blueprint.output.write_conditioned = true;
    }

    info!(
        input = %args.input.display(),
        output = %blueprint.output.directory,
        conditioning = !args.no_conditioning,
        sinks = blueprint.effective_sinks().len(),
        "Configuration loaded"
    );

    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint, args);
        return Ok(());
    }

    let metrics = match args.metrics_file {
        Some(_) => Some(observability::install_recorder()?),
        None => None,
    };

    let pipeline = Pipeline::new(PipelineConfig {
        blueprint,
        input: args.input.clone(),
        conditioning: !args.no_conditioning,
    })?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let signal_task = tokio::spawn(watch_shutdown_signal(shutdown.clone()));

    info!("Starting batch...");
    let batch_flag = shutdown.clone();
    let result = tokio::task::spawn_blocking(move || pipeline.run(&batch_flag))
        .await
        .context("Batch task panicked")?;
    signal_task.abort();

    let stats = result.context("Batch execution failed")?;
    info!(
        trials_ok = stats.trials_ok(),
        trials_failed = stats.trials_failed(),
        duration_secs = stats.duration.as_secs_f64(),
        interrupted = stats.interrupted,
        "Batch completed"
    );
    stats.print_summary();

    if let (Some(handle), Some(path)) = (metrics, args.metrics_file.as_ref()) {
        observability::write_snapshot(&handle, path)?;
    }

    info!("less-seg finished");
    Ok(())
}

/// Raises `flag` on Ctrl+C or SIGTERM; the batch stops between trials.
async fn watch_shutdown_signal(flag: Arc<AtomicBool>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    warn!("Received shutdown signal, finishing the current trial...");
    flag.store(true, Ordering::SeqCst);
}

/// Print configuration summary for dry-run mode
fn print_config_summary(blueprint: &PipelineBlueprint, args: &RunArgs) {
    println!("\n=== Configuration Summary ===\n");
    println!("Input: {}", args.input.display());
    println!("Output: {}", blueprint.output.directory);
    if blueprint.output.write_conditioned {
        println!("  + conditioned streams");
    }

    println!("\nDevices:");
    println!("  Left ankle: {}", blueprint.devices.left_ankle);
    println!("  Right ankle: {}", blueprint.devices.right_ankle);
    println!("  Pelvis: {}", blueprint.devices.pelvis);

    let conditioning = &blueprint.conditioning;
    if args.no_conditioning {
        println!("\nConditioning: disabled");
    } else {
        println!("\nConditioning:");
        println!("  Align: {}", conditioning.align);
        if conditioning.crop.enabled {
            println!(
                "  Crop: impact < {}, window {} samples",
                conditioning.crop.impact_threshold, conditioning.crop.window_samples
            );
        }
        if conditioning.filter.enabled {
            println!(
                "  Filter: order {} low-pass at {} Hz",
                conditioning.filter.order, conditioning.filter.cutoff_hz
            );
        }
    }

    let sinks = blueprint.effective_sinks();
    println!("\nSinks ({}):", sinks.len());
    for sink in &sinks {
        println!("  - {} ({:?})", sink.name, sink.sink_type);
    }

    println!();
}
