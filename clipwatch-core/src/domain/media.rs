//! Media upload rules
//!
//! Checks applied to a video file before it is sent to the processing
//! service, plus the human-readable size formatting used in messages.

use thiserror::Error;

/// Extensions the processing service accepts (compared case-insensitively)
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["mp4", "avi", "mov", "mkv"];

/// Largest upload the service accepts: 500 MiB
pub const MAX_UPLOAD_BYTES: u64 = 500 * 1024 * 1024;

/// Why a file was refused before upload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaRejection {
    #[error("Please select a video file!")]
    NoFileSelected,

    #[error("Invalid file type '{0}'. Allowed: mp4, avi, mov, mkv")]
    UnsupportedType(String),

    #[error("File size exceeds 500MB limit!")]
    TooLarge(u64),
}

/// Validates a candidate upload by name and size
pub fn validate_upload(file_name: &str, size: u64) -> Result<(), MediaRejection> {
    let file_name = file_name.trim();
    if file_name.is_empty() {
        return Err(MediaRejection::NoFileSelected);
    }

    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(MediaRejection::UnsupportedType(extension));
    }

    if size > MAX_UPLOAD_BYTES {
        return Err(MediaRejection::TooLarge(size));
    }

    Ok(())
}

/// Formats a byte count as Bytes/KB/MB/GB (base 1024, two decimals at most)
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_known_extensions() {
        assert!(validate_upload("traffic.mp4", 1024).is_ok());
        assert!(validate_upload("CAM01.MKV", 1024).is_ok());
        assert!(validate_upload("a.b.mov", MAX_UPLOAD_BYTES).is_ok());
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(validate_upload("", 10), Err(MediaRejection::NoFileSelected));
        assert_eq!(
            validate_upload("notes.txt", 10),
            Err(MediaRejection::UnsupportedType("txt".to_string()))
        );
        assert_eq!(
            validate_upload("noextension", 10),
            Err(MediaRejection::UnsupportedType(String::new()))
        );
        assert_eq!(
            validate_upload("big.avi", MAX_UPLOAD_BYTES + 1),
            Err(MediaRejection::TooLarge(MAX_UPLOAD_BYTES + 1))
        );
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(500 * 1024 * 1024), "500 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024 * 1024), "3072 GB");
    }
}
