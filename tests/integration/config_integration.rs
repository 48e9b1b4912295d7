//! Integration tests for configuration layering

use pvelist::config::{global_config_path, ConfigLoader};
use pvelist::error::ApiError;
use std::fs;
use tempfile::TempDir;

use crate::integration::with_xdg_env;

#[test]
fn test_defaults_without_any_config_file() {
    let test_dir = TempDir::new().unwrap();
    with_xdg_env(&test_dir, || {
        let config = ConfigLoader::load().unwrap();
        assert_eq!(config.connection.server, "https://localhost:8006/api2/json");
        assert_eq!(config.connection.username, "root");
        assert_eq!(config.connection.realm, "pam");
        assert_eq!(config.connection.timeout_secs, 10);
        assert_eq!(config.logging.level, "warn");
    });
}

#[test]
fn test_user_config_file_is_picked_up() {
    let test_dir = TempDir::new().unwrap();
    with_xdg_env(&test_dir, || {
        let path = global_config_path().unwrap();
        assert!(path.starts_with(test_dir.path()));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            r#"
[connection]
server = "https://pve1.lab:8006/api2/json"
username = "ops"
realm = "pve"
"#,
        )
        .unwrap();

        let config = ConfigLoader::load().unwrap();
        assert_eq!(config.connection.server, "https://pve1.lab:8006/api2/json");
        assert_eq!(config.connection.username, "ops");
        assert_eq!(config.connection.realm, "pve");
    });
}

#[test]
fn test_explicit_file_overrides_user_file() {
    let test_dir = TempDir::new().unwrap();
    with_xdg_env(&test_dir, || {
        let global = global_config_path().unwrap();
        fs::create_dir_all(global.parent().unwrap()).unwrap();
        fs::write(&global, "[connection]\nrealm = \"pve\"\nusername = \"ops\"\n").unwrap();

        let explicit = test_dir.path().join("lab.toml");
        fs::write(&explicit, "[connection]\nrealm = \"ldap\"\n").unwrap();

        let config = ConfigLoader::load_from_file(&explicit).unwrap();
        assert_eq!(config.connection.realm, "ldap");
        // Untouched keys still come from the lower layer
        assert_eq!(config.connection.username, "ops");
    });
}

#[test]
fn test_environment_overrides_files() {
    let test_dir = TempDir::new().unwrap();
    with_xdg_env(&test_dir, || {
        let explicit = test_dir.path().join("lab.toml");
        fs::write(&explicit, "[connection]\ntimeout_secs = 30\n").unwrap();

        std::env::set_var("PVELIST_CONNECTION__TIMEOUT_SECS", "45");
        std::env::set_var("PVELIST_CONNECTION__SKIP_TLS_VERIFY", "true");
        let result = ConfigLoader::load_from_file(&explicit);
        std::env::remove_var("PVELIST_CONNECTION__TIMEOUT_SECS");
        std::env::remove_var("PVELIST_CONNECTION__SKIP_TLS_VERIFY");

        let config = result.unwrap();
        assert_eq!(config.connection.timeout_secs, 45);
        assert!(config.connection.skip_tls_verify);
    });
}

#[test]
fn test_invalid_values_fail_validation() {
    let test_dir = TempDir::new().unwrap();
    with_xdg_env(&test_dir, || {
        let explicit = test_dir.path().join("bad.toml");
        fs::write(
            &explicit,
            "[connection]\nserver = \"pve.lab:8006\"\ntimeout_secs = 0\n",
        )
        .unwrap();

        match ConfigLoader::load_from_file(&explicit) {
            Err(ApiError::ConfigError(msg)) => {
                assert!(msg.contains("Configuration validation failed"));
                assert!(msg.contains("http:// or https://"));
            }
            other => panic!("expected validation failure, got {:?}", other.map(|_| ())),
        }
    });
}
