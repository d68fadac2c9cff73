//! Ethernet FCS (CRC-32) Engine
//!
//! Table-based CRC-32 over the reflected polynomial 0xEDB88320 with initial
//! register and final XOR of 0xFFFFFFFF, as used for the Ethernet Frame
//! Check Sequence.
//!
//! On the wire this emitter serializes the FCS most-significant octet first
//! (`FCS[0] = crc >> 24`). That ordering differs from the canonical
//! little-endian Ethernet FCS serialization and is a fixed, bit-exact
//! property of the generated stream; see [`fcs_wire_bytes`].
//!
//! ## Example
//!
//! ```rust
//! use fhgen_core::crc::Crc32;
//!
//! // Standard CRC-32 check value.
//! assert_eq!(Crc32::compute(b"123456789"), 0xCBF43926);
//! ```

use crate::types::{FhError, FhResult};

/// CRC-32 over the reflected Ethernet polynomial.
#[derive(Clone)]
pub struct Crc32 {
    table: Box<[u32; 256]>,
    value: u32,
}

impl Crc32 {
    /// Create a new CRC-32 engine.
    pub fn new() -> Self {
        // Reflected polynomial 0xEDB88320 for byte-at-a-time computation
        let poly: u32 = 0xEDB88320;
        let mut table = Box::new([0u32; 256]);
        for i in 0..256u32 {
            let mut crc = i;
            for _ in 0..8 {
                if crc & 1 != 0 {
                    crc = (crc >> 1) ^ poly;
                } else {
                    crc >>= 1;
                }
            }
            table[i as usize] = crc;
        }
        Self {
            table,
            value: 0xFFFFFFFF,
        }
    }

    /// Update the running CRC with additional octets.
    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            let idx = ((self.value ^ (byte as u32)) & 0xFF) as usize;
            self.value = (self.value >> 8) ^ self.table[idx];
        }
    }

    /// Finalize and return the CRC value.
    pub fn finalize(&self) -> u32 {
        self.value ^ 0xFFFFFFFF
    }

    /// Reset the engine to its initial state.
    pub fn reset(&mut self) {
        self.value = 0xFFFFFFFF;
    }

    /// Compute the CRC of an entire buffer in one call.
    pub fn compute(data: &[u8]) -> u32 {
        let mut crc = Self::new();
        crc.update(data);
        crc.finalize()
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize a CRC value in this emitter's wire order: most-significant
/// octet first.
pub fn fcs_wire_bytes(crc: u32) -> [u8; 4] {
    [
        (crc >> 24) as u8,
        (crc >> 16) as u8,
        (crc >> 8) as u8,
        crc as u8,
    ]
}

/// Compute the FCS of `data` ready for emission.
///
/// The assembler never hands an empty span to this function; the guard is
/// kept for callers outside the frame path.
pub fn compute_fcs(data: &[u8]) -> FhResult<[u8; 4]> {
    if data.is_empty() {
        return Err(FhError::CrcInputEmpty);
    }
    Ok(fcs_wire_bytes(Crc32::compute(data)))
}
