//! CRC-32 receipts for stored submissions.
//!
//! The checksum is an identity signal for the student, not an integrity
//! guarantee. It uses the IEEE polynomial, so values match zlib's `crc32`.

use std::path::Path;

use tokio::io::AsyncReadExt;

const BUF_SIZE: usize = 64 * 1024;

/// CRC-32 of an in-memory buffer
pub fn crc32(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// CRC-32 of a file on disk, read in chunks to keep memory use bounded.
pub async fn crc32_path(path: &Path) -> std::io::Result<u32> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut hasher = crc32fast::Hasher::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize())
}

/// Renders a checksum as `0x` followed by eight uppercase hex digits.
pub fn format_checksum(checksum: u32) -> String {
    format!("0x{:08X}", checksum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values() {
        assert_eq!(crc32(b"hello"), 0x3610A686);
        assert_eq!(crc32(b""), 0);
        assert_eq!(crc32(b"123456789"), 0xCBF43926);
    }

    #[test]
    fn test_format_checksum() {
        assert_eq!(format_checksum(0x3610A686), "0x3610A686");
        assert_eq!(format_checksum(0), "0x00000000");
        assert_eq!(format_checksum(0xABC), "0x00000ABC");
        assert_eq!(format_checksum(u32::MAX), "0xFFFFFFFF");
    }

    #[test]
    fn test_single_byte_change() {
        assert_ne!(crc32(b"hello world"), crc32(b"hello worle"));
        assert_eq!(crc32(b"hello world"), crc32(b"hello world"));
    }

    #[tokio::test]
    async fn test_crc32_path_matches_buffer() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("data.bin");
        // Larger than one read buffer
        let data: Vec<u8> = (0..BUF_SIZE * 3 + 17).map(|i| (i % 251) as u8).collect();
        tokio::fs::write(&path, &data).await.unwrap();

        assert_eq!(crc32_path(&path).await.unwrap(), crc32(&data));
    }

    #[tokio::test]
    async fn test_crc32_path_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(crc32_path(&dir.path().join("nope")).await.is_err());
    }
}
