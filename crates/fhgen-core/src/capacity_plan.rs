//! Capacity Planner
//!
//! Pure arithmetic from configuration to a generation plan: the line-rate
//! byte budget for the capture window, the packet counts at every level of
//! the 5G NR time hierarchy (symbol, slot, subframe, radio frame), and the
//! IQ sample demand. The assembler consumes the plan verbatim; nothing here
//! touches the filesystem.
//!
//! ## Example
//!
//! ```rust
//! use fhgen_core::capacity_plan::StreamPlan;
//! use fhgen_core::config::Config;
//!
//! let cfg = Config::parse_str(
//!     "Eth.LineRate=10\nEth.CaptureSizeMs=10\nOran.SCS=15\n\
//!      Oran.MaxNrb=273\nOran.NrbPerPacket=273\n",
//! ).unwrap();
//! let plan = StreamPlan::from_config(&cfg).unwrap();
//! assert_eq!(plan.total_bytes, 12_500_000);
//! assert_eq!(plan.total_packets, 140);
//! ```

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::oran_uplane::FULL_BANDWIDTH_NRB;
use crate::types::{FhError, FhResult};

/// Radio frame period in milliseconds.
pub const FRAME_PERIOD_MS: u64 = 10;

/// Base subcarrier spacing in kHz; slots per subframe is SCS divided by this.
pub const SCS_BASE_KHZ: u64 = 15;

/// Subframes per radio frame.
pub const SUBFRAMES_PER_FRAME: u64 = 10;

/// Symbols per slot (normal cyclic prefix).
pub const SYMBOLS_PER_SLOT: u64 = 14;

/// Resource elements per resource block in this emitter's convention.
pub const RES_PER_RB: u64 = 14;

/// Derived quantities for one O-RAN stream run, computed once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamPlan {
    /// Octets the line transmits during the capture window.
    pub total_bytes: u64,
    /// 10 ms radio frames in the window.
    pub total_frames_radio: u64,
    /// Slots per 1 ms subframe.
    pub slots_per_subframe: u64,
    /// Packets needed to cover `max_nrb` PRBs in one symbol.
    pub packets_per_symbol: u64,
    /// Packets per slot.
    pub packets_per_slot: u64,
    /// Packets per subframe.
    pub packets_per_subframe: u64,
    /// Packets per radio frame.
    pub packets_per_frame: u64,
    /// Packets in the whole run.
    pub total_packets: u64,
    /// IQ samples (I and Q counted separately) carried by one packet.
    pub iq_samples_per_packet: u64,
    /// Normalized total resource blocks (0 on input reads as 273).
    pub max_nrb: u16,
    /// Normalized resource blocks per packet (0 on input reads as 273).
    pub nrb_per_packet: u16,
}

impl StreamPlan {
    /// Derive the plan from a parsed configuration.
    pub fn from_config(cfg: &Config) -> FhResult<Self> {
        let scs = cfg.scs_khz as u64;
        if scs == 0 || scs % SCS_BASE_KHZ != 0 {
            return Err(FhError::PlanInfeasible(format!(
                "Oran.SCS = {} is not a positive multiple of {SCS_BASE_KHZ}",
                cfg.scs_khz
            )));
        }
        let capture_ms = cfg.capture_size_ms as u64;
        if capture_ms == 0 || capture_ms % FRAME_PERIOD_MS != 0 {
            return Err(FhError::PlanInfeasible(format!(
                "Eth.CaptureSizeMs = {} is not a positive multiple of {FRAME_PERIOD_MS}",
                cfg.capture_size_ms
            )));
        }

        let max_nrb = normalize_nrb(cfg.max_nrb);
        let nrb_per_packet = normalize_nrb(cfg.nrb_per_packet);
        if nrb_per_packet > max_nrb {
            return Err(FhError::PlanInfeasible(format!(
                "Oran.NrbPerPacket = {nrb_per_packet} exceeds Oran.MaxNrb = {max_nrb}"
            )));
        }

        let total_bytes = cfg.line_rate_gbps as u64 * capture_ms * 1_000_000 / 8;
        let total_frames_radio = capture_ms / FRAME_PERIOD_MS;
        let slots_per_subframe = scs / SCS_BASE_KHZ;
        let packets_per_symbol =
            (max_nrb as u64 + nrb_per_packet as u64 - 1) / nrb_per_packet as u64;
        let packets_per_slot = packets_per_symbol * SYMBOLS_PER_SLOT;
        let packets_per_subframe = packets_per_slot * slots_per_subframe;
        let packets_per_frame = packets_per_subframe * SUBFRAMES_PER_FRAME;
        let total_packets = packets_per_frame * total_frames_radio;
        let iq_samples_per_packet = 2 * RES_PER_RB * nrb_per_packet as u64;

        Ok(Self {
            total_bytes,
            total_frames_radio,
            slots_per_subframe,
            packets_per_symbol,
            packets_per_slot,
            packets_per_subframe,
            packets_per_frame,
            total_packets,
            iq_samples_per_packet,
            max_nrb,
            nrb_per_packet,
        })
    }

    /// IQ samples the whole run consumes.
    pub fn total_iq_samples(&self) -> u64 {
        self.iq_samples_per_packet * self.total_packets
    }
}

/// A resource-block count of 0 means "all 273 PRBs".
fn normalize_nrb(nrb: u16) -> u16 {
    if nrb == 0 {
        FULL_BANDWIDTH_NRB
    } else {
        nrb
    }
}
