//! Shared helpers for server integration tests.

use std::io::Write;
use std::net::TcpListener;
use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use tempfile::{NamedTempFile, TempDir};
use tokio::time::sleep;

/// Find an available port
pub fn get_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Create a minimal valid config with fixed flags.
/// `llm_enabled` controls the gating flag.
pub fn test_config(port: u16, db_path: &Path, llm_enabled: bool) -> String {
    format!(
        r#"
[analysis]
api_key = "test-key"

[flags]
backend = "fixed"

[flags.fixed]
llm_service_enabled = {llm_enabled}

[server]
host = "127.0.0.1"
port = {port}

[database]
path = "{db_path}"
"#,
        llm_enabled = llm_enabled,
        port = port,
        db_path = db_path.display(),
    )
}

/// Write the config and spawn the server binary, returning the process
/// handle plus the config file guard (the file must outlive the server).
pub async fn spawn_server(config_content: &str) -> (tokio::process::Child, NamedTempFile) {
    let mut config_file = NamedTempFile::new().unwrap();
    config_file.write_all(config_content.as_bytes()).unwrap();
    config_file.flush().unwrap();

    let child = tokio::process::Command::new(env!("CARGO_BIN_EXE_spoor"))
        .env("SPOOR_CONFIG", config_file.path())
        .env("RUST_LOG", "error") // Quiet logs during tests
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn server");

    (child, config_file)
}

/// Wait for the server to answer health checks.
pub async fn wait_for_server(port: u16, max_attempts: u32) -> bool {
    let client = Client::new();
    for _ in 0..max_attempts {
        if client
            .get(format!("http://127.0.0.1:{}/api/v1/health", port))
            .send()
            .await
            .is_ok()
        {
            return true;
        }
        sleep(Duration::from_millis(50)).await;
    }
    false
}

/// Spawn a fully-wired test server on a fresh port and database.
/// Returns (port, server process, guards).
pub async fn start_test_server(
    llm_enabled: bool,
) -> (u16, tokio::process::Child, NamedTempFile, TempDir) {
    let port = get_available_port();
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("spoor-test.db");

    let config = test_config(port, &db_path, llm_enabled);
    let (server, config_file) = spawn_server(&config).await;

    assert!(
        wait_for_server(port, 100).await,
        "Server did not start in time"
    );

    (port, server, config_file, temp_dir)
}
