//! Ethernet Frame Builder
//!
//! Emits the line-level frame layout of this generator:
//!
//! ```text
//! ┌──────────────┬──────┬──────┬──────┬─────────┬─────┬──────────────┐
//! │ preamble+SFD │ dest │ src  │ size │ payload │ FCS │ IFG tail     │
//! │ (8 octets)   │ (6)  │ (6)  │ (2)  │         │ (4) │ (min + pad)  │
//! └──────────────┴──────┴──────┴──────┴─────────┴─────┴──────────────┘
//! ```
//!
//! The FCS covers destination MAC through payload; the preamble is excluded.
//! After the FCS the builder appends the configured minimum number of IFG
//! octets (0x07), then more IFG octets until the frame length is a multiple
//! of 4.
//!
//! Two wire properties of this emitter are preserved verbatim and must not
//! be "corrected": the first preamble octet is 0xFB rather than the
//! canonical 0x55, and the FCS is serialized most-significant octet first.

use crate::crc::compute_fcs;
use crate::types::{FhError, FhResult};

/// Preamble (7 octets) plus start frame delimiter. First octet 0xFB is a
/// fixed property of this emitter.
pub const PREAMBLE_SFD: [u8; 8] = [0xFB, 0x55, 0x55, 0x55, 0x55, 0x55, 0x55, 0xD5];

/// Inter-frame gap filler octet.
pub const IFG_OCTET: u8 = 0x07;

/// Fixed per-frame overhead: preamble+SFD (8), MACs (12), size (2), FCS (4).
pub const FRAME_OVERHEAD: usize = 26;

/// Convert a 48-bit MAC address to its wire order, most-significant octet
/// first.
pub fn mac_bytes(addr: u64) -> [u8; 6] {
    let b = addr.to_be_bytes();
    [b[2], b[3], b[4], b[5], b[6], b[7]]
}

/// Frame builder configured once per run.
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    dest: [u8; 6],
    src: [u8; 6],
    min_ifgs: usize,
    max_frame_len: usize,
}

impl FrameBuilder {
    /// Create a builder for the given addressing and sizing parameters.
    ///
    /// `max_frame_len` bounds the finished frame including preamble, FCS and
    /// IFG tail.
    pub fn new(dest: [u8; 6], src: [u8; 6], min_ifgs: usize, max_frame_len: usize) -> Self {
        Self {
            dest,
            src,
            min_ifgs,
            max_frame_len,
        }
    }

    /// Build one frame into `frame` (cleared first, reusable across calls).
    ///
    /// `ether_size` is emitted as provided, in network order.
    pub fn build_into(
        &self,
        ether_size: [u8; 2],
        payload: &[u8],
        frame: &mut Vec<u8>,
    ) -> FhResult<()> {
        frame.clear();
        frame.reserve(FRAME_OVERHEAD + payload.len() + self.min_ifgs + 3);
        frame.extend_from_slice(&PREAMBLE_SFD);

        // FCS coverage starts here
        let body = frame.len();
        frame.extend_from_slice(&self.dest);
        frame.extend_from_slice(&self.src);
        frame.extend_from_slice(&ether_size);
        frame.extend_from_slice(payload);

        let fcs = compute_fcs(&frame[body..])?;
        frame.extend_from_slice(&fcs);

        frame.extend(std::iter::repeat(IFG_OCTET).take(self.min_ifgs));
        while frame.len() % 4 != 0 {
            frame.push(IFG_OCTET);
        }

        if frame.len() > self.max_frame_len {
            return Err(FhError::EthernetFrameTooLarge {
                len: frame.len(),
                max: self.max_frame_len,
            });
        }
        Ok(())
    }

    /// Build one frame into a fresh buffer.
    pub fn build(&self, ether_size: [u8; 2], payload: &[u8]) -> FhResult<Vec<u8>> {
        let mut frame = Vec::new();
        self.build_into(ether_size, payload, &mut frame)?;
        Ok(frame)
    }
}
