//! eCPRI Packet Builder / Parser
//!
//! Wraps an O-RAN U-Plane packet in the 8-octet eCPRI common header used
//! for IQ data transfer over Ethernet:
//!
//! ```text
//! ┌──────────────┬──────────┬─────────────────┬─────────────┬─────────┐
//! │ ver|res|cat  │ msg type │ payload size    │ RTCid/PCid  │ seq id  │
//! │ (1 octet, 0) │ (0 = IQ) │ (2, big-endian) │ (2, zero)   │ (2, BE) │
//! └──────────────┴──────────┴─────────────────┴─────────────┴─────────┘
//! ```
//!
//! The payload size field counts the payload only, excluding this header.

use crate::types::{FhError, FhResult};

/// Length of the eCPRI common header in octets.
pub const HEADER_LEN: usize = 8;

/// Message type for IQ data.
pub const MESSAGE_TYPE_IQ_DATA: u8 = 0x00;

/// Decoded eCPRI header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcpriHeader {
    /// Payload length in octets, excluding the header.
    pub payload_len: u16,
    /// Message sequence identifier.
    pub seq_id: u16,
}

impl EcpriHeader {
    /// Decode an 8-octet eCPRI header.
    pub fn parse(bytes: &[u8; HEADER_LEN]) -> Self {
        Self {
            payload_len: u16::from_be_bytes([bytes[2], bytes[3]]),
            seq_id: u16::from_be_bytes([bytes[6], bytes[7]]),
        }
    }
}

/// Build a complete eCPRI packet into `out`: header, then payload. `out` is
/// cleared first so callers can reuse one buffer across packets.
///
/// Fails with [`FhError::EcpriPayloadTooLarge`] when the payload does not
/// fit the 16-bit length field.
pub fn build_packet_into(seq_id: u16, payload: &[u8], out: &mut Vec<u8>) -> FhResult<()> {
    if payload.len() > u16::MAX as usize {
        return Err(FhError::EcpriPayloadTooLarge(payload.len()));
    }
    let size = (payload.len() as u16).to_be_bytes();
    let seq = seq_id.to_be_bytes();

    out.clear();
    out.reserve(HEADER_LEN + payload.len());
    out.extend_from_slice(&[
        0x00, // version | reserved | concatenation, all zero
        MESSAGE_TYPE_IQ_DATA,
        size[0],
        size[1],
        0x00, // RTCid/PCid
        0x00,
        seq[0],
        seq[1],
    ]);
    out.extend_from_slice(payload);
    Ok(())
}
