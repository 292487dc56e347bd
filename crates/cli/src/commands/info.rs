//! `info` command implementation.

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::PipelineBlueprint;
use tracing::info;

use super::load_blueprint;
use crate::cli::InfoArgs;

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    let blueprint = load_blueprint(args.config.as_deref())?;
    info!("Printing effective configuration");

    if args.json {
        let json = ConfigLoader::to_json(&blueprint).context("Failed to serialize config info")?;
        println!("{}", json);
    } else if args.toml {
        let toml = ConfigLoader::to_toml(&blueprint).context("Failed to serialize config info")?;
        println!("{}", toml);
    } else {
        print_config_info(&blueprint);
    }

    Ok(())
}

fn print_config_info(blueprint: &PipelineBlueprint) {
    println!("\n📋 Configuration ({:?})", blueprint.version);

    println!("\n🦶 Devices");
    println!("   ├─ Left ankle: {}", blueprint.devices.left_ankle);
    println!("   ├─ Right ankle: {}", blueprint.devices.right_ankle);
    println!("   └─ Pelvis: {}", blueprint.devices.pelvis);

    let d = &blueprint.detection;
    println!("\n🔍 Detection");
    println!(
        "   ├─ Initial contact: spike > {}, onset < {}",
        d.contact_sensitivity, d.contact_onset_threshold
    );
    println!(
        "   ├─ Take-off: offset {} samples, deceleration < {}",
        d.take_off_search_offset, d.take_off_deceleration_threshold
    );
    println!(
        "   └─ Knee flexion: margins {}/{} samples, recovery > {}, stall {} samples",
        d.flexion_landing_margin,
        d.flexion_tail_margin,
        d.flexion_recovery_threshold,
        d.flexion_stall_samples
    );

    let c = &blueprint.conditioning;
    println!("\n🎛  Conditioning");
    println!("   ├─ Align: {}", c.align);
    println!(
        "   ├─ Crop: {} (impact < {}, window {} samples)",
        c.crop.enabled, c.crop.impact_threshold, c.crop.window_samples
    );
    println!(
        "   └─ Filter: {} (order {}, cutoff {} Hz, acc {} Hz, gyro {} Hz)",
        c.filter.enabled,
        c.filter.order,
        c.filter.cutoff_hz,
        c.filter.accelerometer_rate_hz,
        c.filter.gyroscope_rate_hz
    );

    println!("\n📦 Output");
    println!("   ├─ Directory: {}", blueprint.output.directory);
    println!("   ├─ Feature table: {}", blueprint.output.feature_list);
    println!("   └─ Conditioned streams: {}", blueprint.output.write_conditioned);

    let sinks = blueprint.effective_sinks();
    println!("\n📤 Sinks ({})", sinks.len());
    let last = sinks.len().saturating_sub(1);
    for (i, sink) in sinks.iter().enumerate() {
        let branch = if i == last { "└─" } else { "├─" };
        println!("   {} {} ({:?})", branch, sink.name, sink.sink_type);
        for (key, value) in &sink.params {
            println!("   │    {} = {}", key, value);
        }
    }

    println!();
}
