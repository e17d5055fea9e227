//! Test utilities for Visor
//!
//! This module provides common test utilities for temporary directory
//! management and test file creation.

use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory for testing
///
/// # Returns
///
/// Returns a TempDir that will be cleaned up when dropped
///
/// # Examples
///
/// ```ignore
/// use visor::test_utils::temp_dir;
///
/// let dir = temp_dir();
/// let path = dir.path();
/// // Use the temporary directory
/// ```
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given text content
///
/// # Arguments
///
/// * `dir` - Directory to create the file in
/// * `name` - Name of the file
/// * `content` - Content to write to the file
///
/// # Returns
///
/// Returns the path to the created file
///
/// # Panics
///
/// Panics if file creation or writing fails
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    create_test_bytes(dir, name, content.as_bytes())
}

/// Create a test file with the given raw bytes
///
/// Useful for image payloads and invalid-UTF-8 fixtures where
/// [`create_test_file`] would not do.
pub fn create_test_bytes(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Encode a tiny valid PNG image in memory
///
/// The image is 2x3 pixels, which keeps payloads small while still
/// exercising real decoding in dimension probes.
pub fn tiny_png() -> Vec<u8> {
    let img = image::RgbaImage::new(2, 3);
    let mut buf = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .expect("Failed to encode test image");
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_creation() {
        let dir = temp_dir();
        assert!(dir.path().exists());
    }

    #[test]
    fn test_create_test_file() {
        let dir = temp_dir();
        let path = create_test_file(&dir, "test.txt", "content");
        assert!(path.exists());
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "content");
    }

    #[test]
    fn test_create_test_bytes() {
        let dir = temp_dir();
        let path = create_test_bytes(&dir, "blob.bin", &[0xff, 0x00]);
        assert_eq!(std::fs::read(&path).unwrap(), vec![0xff, 0x00]);
    }

    #[test]
    fn test_tiny_png_decodes() {
        let bytes = tiny_png();
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!(img.width(), 2);
        assert_eq!(img.height(), 3);
    }
}
