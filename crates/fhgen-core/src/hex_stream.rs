//! Hex Stream Writer
//!
//! Serializes the finished byte stream as lowercase hexadecimal text, two
//! characters per octet with a newline after every 4 octets — the capture
//! format downstream tooling consumes.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::types::{FhError, FhResult};

/// Write `bytes` in hex-text form to `writer`.
pub fn write_hex<W: Write>(mut writer: W, bytes: &[u8]) -> io::Result<()> {
    for (i, byte) in bytes.iter().enumerate() {
        write!(writer, "{byte:02x}")?;
        if i % 4 == 3 {
            writeln!(writer)?;
        }
    }
    writer.flush()
}

/// Write `bytes` in hex-text form to a file at `path`.
pub fn write_hex_file<P: AsRef<Path>>(path: P, bytes: &[u8]) -> FhResult<()> {
    let path = path.as_ref();
    let wrap = |source| FhError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(wrap)?;
    write_hex(BufWriter::new(file), bytes).map_err(wrap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_octets_per_line() {
        let mut out = Vec::new();
        write_hex(&mut out, &[0xFB, 0x55, 0x55, 0x55, 0x55, 0x55, 0x55, 0xD5]).unwrap();
        assert_eq!(out, b"fb555555\n555555d5\n");
    }

    #[test]
    fn test_partial_final_line_has_no_newline() {
        let mut out = Vec::new();
        write_hex(&mut out, &[0x00, 0x07, 0xAB]).unwrap();
        assert_eq!(out, b"0007ab");
    }

    #[test]
    fn test_empty_stream_writes_nothing() {
        let mut out = Vec::new();
        write_hex(&mut out, &[]).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_write_hex_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("packets.txt");
        write_hex_file(&path, &[0x01, 0x02, 0x03, 0x04]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "01020304\n");

        let err = write_hex_file(dir.path().join("no/such/dir/x.txt"), &[1]).unwrap_err();
        assert!(matches!(err, FhError::OutputWrite { .. }));
    }
}
