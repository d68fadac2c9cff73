//! Core types for the fronthaul stream generator
//!
//! Defines the crate-wide error enum and result alias. Every failure in this
//! crate is fatal: the generator either emits a bit-exact stream or stops at
//! the first inconsistency, so no variant is ever recovered locally.

use std::io;
use std::path::PathBuf;

/// Result type for stream generation operations
pub type FhResult<T> = Result<T, FhError>;

/// Errors that can occur while building a fronthaul stream
#[derive(Debug, thiserror::Error)]
pub enum FhError {
    /// Configuration file could not be opened or read
    #[error("Failed to read configuration {path}: {source}")]
    ConfigReadFailure { path: PathBuf, source: io::Error },

    /// Configuration value is not a valid integer
    #[error("Malformed value for {key}: {value:?}")]
    ConfigParseError { key: String, value: String },

    /// IQ sample file could not be opened, or yielded no samples
    #[error("IQ sample source {path}: {reason}")]
    IqSourceFailure { path: PathBuf, reason: String },

    /// Derived plan cannot be satisfied by the configured line rate
    #[error("Plan infeasible: {0}")]
    PlanInfeasible(String),

    /// O-RAN header field exceeds its bit width
    #[error("O-RAN field out of range: {field} = {value}")]
    OranFieldOverflow { field: &'static str, value: u32 },

    /// eCPRI payload length does not fit the 16-bit length field
    #[error("eCPRI payload too large: {0} bytes")]
    EcpriPayloadTooLarge(usize),

    /// Finished Ethernet frame exceeds the configured maximum
    #[error("Ethernet frame too large: {len} bytes exceeds maximum {max}")]
    EthernetFrameTooLarge { len: usize, max: usize },

    /// `Oran.PayloadType` is not one of the recognized modes
    #[error("Invalid payload type: {0:?}")]
    InvalidPayloadType(String),

    /// FCS requested over an empty octet sequence
    #[error("CRC input is empty")]
    CrcInputEmpty,

    /// Output stream file could not be written
    #[error("Failed to write output {path}: {source}")]
    OutputWrite { path: PathBuf, source: io::Error },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_offending_value() {
        let err = FhError::OranFieldOverflow {
            field: "subframe_id",
            value: 17,
        };
        assert_eq!(err.to_string(), "O-RAN field out of range: subframe_id = 17");

        let err = FhError::EthernetFrameTooLarge { len: 2000, max: 1500 };
        assert!(err.to_string().contains("2000"));
        assert!(err.to_string().contains("1500"));
    }
}
