//! Burst Stream Assembler
//!
//! The generator's second, simpler stream shape: one fixed-payload Ethernet
//! frame replicated `burst_size` times at the start of every burst period,
//! with the remainder of each period filled with IFG octets. No eCPRI or
//! O-RAN layering; the payload is a zero-filled block sized so the frame
//! proper (preamble through FCS) is exactly `max_packet_size` octets.
//!
//! The per-frame size cap does not apply here: the frame proper equals
//! `max_packet_size` by construction and the IFG tail extends past it.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::ethernet_frame::{mac_bytes, FrameBuilder, FRAME_OVERHEAD, IFG_OCTET};
use crate::types::{FhError, FhResult};

/// Derived quantities for one burst-mode run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurstPlan {
    /// Octets the line transmits during the capture window.
    pub total_bytes: u64,
    /// Burst periods in the window.
    pub total_bursts: u64,
    /// Octet budget of one burst period.
    pub burst_len_bytes: u64,
    /// Frames at the start of each period.
    pub burst_size: u64,
    /// Payload octets carried by each frame.
    pub payload_len: usize,
}

impl BurstPlan {
    /// Derive the plan from a parsed configuration.
    pub fn from_config(cfg: &Config) -> FhResult<Self> {
        if cfg.burst_size == 0 {
            return Err(FhError::PlanInfeasible(
                "Eth.BurstSize must be non-zero in burst mode".to_string(),
            ));
        }
        if cfg.burst_periodicity_us == 0 {
            return Err(FhError::PlanInfeasible(
                "Eth.BurstPeriodicity_us must be non-zero".to_string(),
            ));
        }
        if (cfg.max_packet_size as usize) <= FRAME_OVERHEAD {
            return Err(FhError::PlanInfeasible(format!(
                "Eth.MaxPacketSize = {} leaves no room for a payload",
                cfg.max_packet_size
            )));
        }

        let total_bytes = cfg.line_rate_gbps as u64 * cfg.capture_size_ms as u64 * 1_000_000 / 8;
        let total_bursts =
            cfg.capture_size_ms as u64 * 1000 / cfg.burst_periodicity_us as u64;
        if total_bursts == 0 {
            return Err(FhError::PlanInfeasible(format!(
                "burst period {} us exceeds the {} ms capture window",
                cfg.burst_periodicity_us, cfg.capture_size_ms
            )));
        }

        Ok(Self {
            total_bytes,
            total_bursts,
            burst_len_bytes: total_bytes / total_bursts,
            burst_size: cfg.burst_size as u64,
            payload_len: cfg.max_packet_size as usize - FRAME_OVERHEAD,
        })
    }
}

/// Assembles a burst-shaped byte stream.
pub struct BurstAssembler {
    plan: BurstPlan,
    frames: FrameBuilder,
}

impl BurstAssembler {
    /// Derive the plan and set up the frame layer.
    pub fn new(cfg: &Config) -> FhResult<Self> {
        let plan = BurstPlan::from_config(cfg)?;
        // Frame proper is max_packet_size by construction; the IFG tail is
        // allowed past it, so the builder runs uncapped.
        let frames = FrameBuilder::new(
            mac_bytes(cfg.dest_mac),
            mac_bytes(cfg.src_mac),
            cfg.min_ifgs_per_packet as usize,
            usize::MAX,
        );
        Ok(Self { plan, frames })
    }

    /// The plan this assembler executes.
    pub fn plan(&self) -> &BurstPlan {
        &self.plan
    }

    /// Build the full stream: `total_bursts` repetitions of `burst_size`
    /// frames followed by the period's IFG fill.
    pub fn assemble(&self) -> FhResult<Vec<u8>> {
        let plan = &self.plan;
        let ether_size = (plan.payload_len as u16).to_be_bytes();
        let payload = vec![0u8; plan.payload_len];
        let frame = self.frames.build(ether_size, &payload)?;

        let frames_len = plan.burst_size * frame.len() as u64;
        if frames_len > plan.burst_len_bytes {
            return Err(FhError::PlanInfeasible(format!(
                "{frames_len} burst frame octets exceed the {} octet burst budget",
                plan.burst_len_bytes
            )));
        }
        let ifg_per_burst = (plan.burst_len_bytes - frames_len) as usize;

        tracing::info!(
            "Generating {} bursts of {} frames ({} octets each, {} IFGs per burst)",
            plan.total_bursts,
            plan.burst_size,
            frame.len(),
            ifg_per_burst
        );

        let mut out = Vec::with_capacity((plan.burst_len_bytes * plan.total_bursts) as usize);
        for _ in 0..plan.total_bursts {
            for _ in 0..plan.burst_size {
                out.extend_from_slice(&frame);
            }
            out.extend(std::iter::repeat(IFG_OCTET).take(ifg_per_burst));
        }
        Ok(out)
    }
}
