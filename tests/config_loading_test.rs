//! Configuration loading: file, environment and command-line layers

mod common;

use serial_test::serial;

use common::temp_config_file;
use vitalpath::cli::Cli;
use vitalpath::config::{Config, TokenStoreKind};
use vitalpath::error::VitalPathError;

const ENV_VARS: [&str; 4] = [
    "VITALPATH_API_URL",
    "VITALPATH_TIMEOUT_SECONDS",
    "VITALPATH_SESSION_STORE",
    "VITALPATH_DATA_DIR",
];

fn clear_env() {
    for var in ENV_VARS {
        std::env::remove_var(var);
    }
}

const FILE_CONFIG: &str = r#"
api:
  base_url: https://file.vitalpath.example
  timeout_seconds: 15
session:
  store: memory
  data_dir: /tmp/vitalpath-file
discovery:
  autosave_draft: false
"#;

#[test]
#[serial]
fn test_load_reads_yaml_file() {
    clear_env();
    let (_dir, path) = temp_config_file(FILE_CONFIG);

    let config = Config::load(path.to_str().unwrap(), &Cli::default()).unwrap();

    assert_eq!(config.api.base_url, "https://file.vitalpath.example");
    assert_eq!(config.api.timeout_seconds, 15);
    assert_eq!(config.session.store, TokenStoreKind::Memory);
    assert_eq!(
        config.data_dir().unwrap(),
        std::path::PathBuf::from("/tmp/vitalpath-file")
    );
    assert!(!config.discovery.autosave_draft);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_env_overrides_file_and_cli_overrides_env() {
    clear_env();
    let (_dir, path) = temp_config_file(FILE_CONFIG);
    std::env::set_var("VITALPATH_API_URL", "https://env.vitalpath.example");
    std::env::set_var("VITALPATH_SESSION_STORE", "file");
    std::env::set_var("VITALPATH_DATA_DIR", "/tmp/vitalpath-env");

    let from_env = Config::load(path.to_str().unwrap(), &Cli::default()).unwrap();

    let cli = Cli {
        api_url: Some("https://cli.vitalpath.example".to_string()),
        ..Cli::default()
    };
    let from_cli = Config::load(path.to_str().unwrap(), &cli).unwrap();
    clear_env();

    assert_eq!(from_env.api.base_url, "https://env.vitalpath.example");
    assert_eq!(from_env.session.store, TokenStoreKind::File);
    assert_eq!(
        from_env.data_dir().unwrap(),
        std::path::PathBuf::from("/tmp/vitalpath-env")
    );
    // Untouched by the environment.
    assert_eq!(from_env.api.timeout_seconds, 15);

    assert_eq!(from_cli.api.base_url, "https://cli.vitalpath.example");
}

#[test]
#[serial]
fn test_malformed_file_is_a_config_error() {
    clear_env();
    let (_dir, path) = temp_config_file("api: [not, a, mapping\n");

    let err = Config::load(path.to_str().unwrap(), &Cli::default()).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<VitalPathError>(),
        Some(VitalPathError::Config(_))
    ));
}

#[test]
#[serial]
fn test_loaded_config_with_bad_url_fails_validation() {
    clear_env();
    let (_dir, path) = temp_config_file("api:\n  base_url: ftp://files.example\n");

    let config = Config::load(path.to_str().unwrap(), &Cli::default()).unwrap();
    let err = config.validate().unwrap_err();

    assert!(err.to_string().contains("http or https"));
}
