//! Configuration loading from files and CLI overrides

mod common;

use common::temp_config_file;
use serial_test::serial;
use wayfarer::cli::{Cli, Commands};
use wayfarer::config::Config;

#[test]
#[serial]
fn test_yaml_file_with_cli_overrides() {
    let (_tmp, path) = temp_config_file(
        r#"
provider:
  type: openai
  openai:
    api_base: http://localhost:4000/v1
    model: travel-large
orchestrator:
  timeout_seconds: 60
  max_attempts: 3
session:
  max_recent_messages: 8
  summary_model: travel-small
server:
  port: 9000
"#,
    );

    let cli = Cli {
        config: Some(path.to_string_lossy().to_string()),
        verbose: false,
        storage_path: Some("/tmp/wayfarer-test/sessions.db".to_string()),
        command: Commands::Serve {
            host: Some("127.0.0.1".to_string()),
            port: None,
        },
    };

    let config = Config::load(path.to_str().unwrap(), &cli).unwrap();

    assert_eq!(config.provider.provider_type, "openai");
    assert_eq!(config.provider.openai.model, "travel-large");
    assert_eq!(config.orchestrator.max_attempts, 3);
    assert_eq!(config.session.max_recent_messages, 8);
    assert_eq!(config.session.summary_model.as_deref(), Some("travel-small"));
    assert_eq!(
        config.storage.path.as_deref(),
        Some("/tmp/wayfarer-test/sessions.db")
    );
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 9000);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_too_small_window_fails_validation() {
    let (_tmp, path) = temp_config_file("session:\n  max_recent_messages: 2\n");

    let config = Config::load(path.to_str().unwrap(), &Cli::default()).unwrap();

    assert!(config.validate().is_err());
}
