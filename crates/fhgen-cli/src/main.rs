//! Fronthaul Stream Generator (Command Line Entry Point)
//!
//! Reads a `key=value` configuration, assembles the capture-window byte
//! stream and writes it as hex text. Configuration and output paths can be
//! given as positional arguments:
//!
//! ```bash
//! fhgen [config] [output]     # defaults: second_milestone.txt packets.txt
//! ```
//!
//! When the configuration carries no `Oran.SCS` but a non-zero
//! `Eth.BurstSize`, the burst-mode assembler runs instead of the O-RAN one.

use std::path::PathBuf;

use fhgen_core::{
    hex_stream, BurstAssembler, Config, FhResult, IqPool, StreamAssembler, StreamPlan,
};

const DEFAULT_CONFIG: &str = "second_milestone.txt";
const DEFAULT_OUTPUT: &str = "packets.txt";

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let mut args = std::env::args().skip(1);
    let config_path = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_CONFIG.to_string()));
    let output_path = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_OUTPUT.to_string()));

    if let Err(err) = run(&config_path, &output_path) {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn run(config_path: &PathBuf, output_path: &PathBuf) -> FhResult<()> {
    tracing::info!("Parsing configuration {}", config_path.display());
    let cfg = Config::from_file(config_path)?;

    let stream = if cfg.is_burst_mode() {
        let assembler = BurstAssembler::new(&cfg)?;
        let plan = assembler.plan();
        tracing::info!(
            "Burst plan: {} bursts of {} frames, {} bytes total",
            plan.total_bursts,
            plan.burst_size,
            plan.total_bytes
        );
        assembler.assemble()?
    } else {
        let plan = StreamPlan::from_config(&cfg)?;
        tracing::info!("Packets/Symbol: {}", plan.packets_per_symbol);
        tracing::info!("Packets/Slot: {}", plan.packets_per_slot);
        tracing::info!("Packets/Subframe: {}", plan.packets_per_subframe);
        tracing::info!("Packets/Frame: {}", plan.packets_per_frame);
        tracing::info!("IQ Samples/Packet: {}", plan.iq_samples_per_packet);
        tracing::info!("Total Bytes: {}", plan.total_bytes);
        tracing::info!("Total Radio Frames: {}", plan.total_frames_radio);
        tracing::info!("Total Packets: {}", plan.total_packets);
        tracing::info!("Total IQ Samples: {}", plan.total_iq_samples());

        let pool = IqPool::for_run(&cfg, &plan, None)?;
        StreamAssembler::new(&cfg, plan, &pool).assemble()?
    };

    tracing::info!("Exporting {} octets to {}", stream.len(), output_path.display());
    hex_stream::write_hex_file(output_path, &stream)?;
    tracing::info!("Done");
    Ok(())
}
