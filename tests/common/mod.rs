use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use visor::config::GeminiConfig;
use visor::providers::GeminiProvider;
use wiremock::MockServer;

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

#[allow(dead_code)]
pub fn temp_attachment(name: &str, contents: &[u8]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let path = temp_dir.path().join(name);
    fs::write(&path, contents).expect("failed to write attachment file");
    (temp_dir, path)
}

/// Provider wired to a mock server, using a fixed test key
#[allow(dead_code)]
pub fn mock_gemini_provider(server: &MockServer) -> GeminiProvider {
    let config = GeminiConfig {
        api_key: Some("test-key".to_string()),
        api_base: Some(server.uri()),
        ..Default::default()
    };
    GeminiProvider::new(config).expect("failed to build provider for mock server")
}

/// A 2x3 PNG encoded in memory, small enough to assert on byte-for-byte
#[allow(dead_code)]
pub fn tiny_png() -> Vec<u8> {
    let img = image::RgbaImage::new(2, 3);
    let mut buf = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .expect("failed to encode test image");
    buf
}
