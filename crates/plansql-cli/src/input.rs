//! Input file decoding.
//!
//! Management Studio saves `.sqlplan` files as UTF-16 with a BOM, so
//! plan files are sniffed: UTF-16 LE/BE by BOM, otherwise UTF-8
//! (optionally BOM-marked). Script files go through the same path;
//! in practice they are plain UTF-8.

use std::fs;
use std::path::Path;

use plansql_error::{PlanSqlError, Result};

/// Read a text file, decoding by BOM.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    decode(&bytes).map_err(|reason| PlanSqlError::Encoding {
        path: path.display().to_string(),
        reason,
    })
}

fn decode(bytes: &[u8]) -> std::result::Result<String, String> {
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        return utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return utf16(rest, u16::from_be_bytes);
    }
    let rest = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    std::str::from_utf8(rest)
        .map(str::to_owned)
        .map_err(|e| format!("invalid UTF-8: {e}"))
}

fn utf16(bytes: &[u8], combine: fn([u8; 2]) -> u16) -> std::result::Result<String, String> {
    if bytes.len() % 2 != 0 {
        return Err("odd byte length for UTF-16 content".to_string());
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| combine([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|e| format!("invalid UTF-16: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_without_bom() {
        assert_eq!(decode(b"SELECT 1").unwrap(), "SELECT 1");
    }

    #[test]
    fn test_utf8_bom_stripped() {
        assert_eq!(decode(b"\xEF\xBB\xBFSELECT 1").unwrap(), "SELECT 1");
    }

    #[test]
    fn test_utf16_le() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "ab".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode(&bytes).unwrap(), "ab");
    }

    #[test]
    fn test_utf16_be() {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in "ab".encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(decode(&bytes).unwrap(), "ab");
    }

    #[test]
    fn test_odd_length_utf16_rejected() {
        assert!(decode(&[0xFF, 0xFE, 0x41]).is_err());
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        assert!(decode(&[0xC0, 0x80]).is_err());
    }
}
