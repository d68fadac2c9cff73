//! Run Configuration
//!
//! Reads the generator's `key=value` configuration file. One entry per
//! non-blank line; all whitespace is stripped before parsing, `//` starts a
//! comment, values beginning with `0x` are base-16 and everything else is
//! base-10. Unknown keys are ignored and missing keys read as zero — a
//! deliberate laxness of the format that surfaces later as an infeasible
//! plan rather than a parse failure.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::types::{FhError, FhResult};

/// How the IQ payload pool is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayloadType {
    /// Samples come from the file named by `Oran.Payload`.
    Fixed,
    /// Samples are drawn uniformly at random, pool sized to the full run.
    Random,
}

/// Configuration for one generation run, immutable after parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Nominal line speed in Gbps (`Eth.LineRate`).
    pub line_rate_gbps: u8,
    /// Capture window in milliseconds (`Eth.CaptureSizeMs`).
    pub capture_size_ms: u8,
    /// Minimum IFG octets appended after each frame (`Eth.MinNumOfIFGsPerPacket`).
    pub min_ifgs_per_packet: u8,
    /// Destination MAC, 48 bits (`Eth.DestAddress`).
    pub dest_mac: u64,
    /// Source MAC, 48 bits (`Eth.SourceAddress`).
    pub src_mac: u64,
    /// Upper bound on a finished frame in octets (`Eth.MaxPacketSize`).
    pub max_packet_size: u16,
    /// Subcarrier spacing in kHz (`Oran.SCS`).
    pub scs_khz: u8,
    /// Total resource blocks; 0 reads as 273 (`Oran.MaxNrb`).
    pub max_nrb: u16,
    /// Resource blocks per packet; 0 reads as 273 (`Oran.NrbPerPacket`).
    pub nrb_per_packet: u16,
    /// Raw `Oran.PayloadType` value; validated by [`Config::payload_type`].
    pub payload_type: String,
    /// Path to the IQ sample file, used in fixed mode (`Oran.Payload`).
    pub iq_sample_source: PathBuf,
    /// Frames per burst in burst mode; 0 disables (`Eth.BurstSize`).
    pub burst_size: u8,
    /// Microseconds between burst starts (`Eth.BurstPeriodicity_us`).
    pub burst_periodicity_us: u32,
}

impl Config {
    /// Read and parse a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> FhResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| FhError::ConfigReadFailure {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(&text)
    }

    /// Parse configuration text.
    pub fn parse_str(text: &str) -> FhResult<Self> {
        let entries = raw_entries(text);

        Ok(Self {
            line_rate_gbps: get_int(&entries, "Eth.LineRate")? as u8,
            capture_size_ms: get_int(&entries, "Eth.CaptureSizeMs")? as u8,
            min_ifgs_per_packet: get_int(&entries, "Eth.MinNumOfIFGsPerPacket")? as u8,
            dest_mac: get_int(&entries, "Eth.DestAddress")?,
            src_mac: get_int(&entries, "Eth.SourceAddress")?,
            max_packet_size: get_int(&entries, "Eth.MaxPacketSize")? as u16,
            scs_khz: get_int(&entries, "Oran.SCS")? as u8,
            max_nrb: get_int(&entries, "Oran.MaxNrb")? as u16,
            nrb_per_packet: get_int(&entries, "Oran.NrbPerPacket")? as u16,
            payload_type: entries.get("Oran.PayloadType").cloned().unwrap_or_default(),
            iq_sample_source: PathBuf::from(
                entries.get("Oran.Payload").cloned().unwrap_or_default(),
            ),
            burst_size: get_int(&entries, "Eth.BurstSize")? as u8,
            burst_periodicity_us: get_int(&entries, "Eth.BurstPeriodicity_us")? as u32,
        })
    }

    /// Validated payload mode.
    pub fn payload_type(&self) -> FhResult<PayloadType> {
        match self.payload_type.as_str() {
            "fixed" => Ok(PayloadType::Fixed),
            "random" => Ok(PayloadType::Random),
            other => Err(FhError::InvalidPayloadType(other.to_string())),
        }
    }

    /// True when the configuration describes a burst-mode run: no O-RAN
    /// subcarrier spacing, but a burst shape.
    pub fn is_burst_mode(&self) -> bool {
        self.scs_khz == 0 && self.burst_size != 0
    }
}

/// Split configuration text into raw key/value pairs.
fn raw_entries(text: &str) -> HashMap<String, String> {
    let mut entries = HashMap::new();
    for line in text.lines() {
        let mut line: String = line.chars().filter(|c| !c.is_whitespace()).collect();
        if let Some(comment) = line.find("//") {
            line.truncate(comment);
        }
        if line.is_empty() {
            continue;
        }
        if let Some(eq) = line.find('=') {
            entries.insert(line[..eq].to_string(), line[eq + 1..].to_string());
        }
    }
    entries
}

/// Integer value for `key`; absent keys read as zero, `0x` selects base 16.
fn get_int(entries: &HashMap<String, String>, key: &str) -> FhResult<u64> {
    let Some(value) = entries.get(key) else {
        return Ok(0);
    };
    let parsed = if let Some(hex) = value.strip_prefix("0x") {
        u64::from_str_radix(hex, 16)
    } else {
        value.parse()
    };
    parsed.map_err(|_| FhError::ConfigParseError {
        key: key.to_string(),
        value: value.clone(),
    })
}
