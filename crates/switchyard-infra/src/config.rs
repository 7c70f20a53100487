//! Configuration loaders for Switchyard.
//!
//! - `switchyard.toml` deserializes into [`ServiceConfig`]; a missing file
//!   means "use defaults".
//! - The experiments JSON deserializes into [`ExperimentCatalog`]; it is
//!   read once at startup and any failure is fatal.

use std::path::Path;

use switchyard_types::config::ServiceConfig;
use switchyard_types::error::ConfigError;
use switchyard_types::experiment::ExperimentCatalog;

/// Load service configuration from `path`.
///
/// - If the file does not exist, returns [`ServiceConfig::default()`].
/// - If the file exists but cannot be read or parsed, returns an error.
/// - Parsed values are checked for obviously unusable settings.
pub async fn load_service_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return Ok(ServiceConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.display().to_string(),
                source,
            });
        }
    };

    let config = toml::from_str::<ServiceConfig>(&content).map_err(|err| ConfigError::Parse {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;

    validate_service_config(&config)?;
    Ok(config)
}

fn validate_service_config(config: &ServiceConfig) -> Result<(), ConfigError> {
    if config.max_page_size == 0 {
        return Err(ConfigError::Invalid("max_page_size must be at least 1".to_string()));
    }
    if config.booking_timeout_ms == 0 {
        return Err(ConfigError::Invalid(
            "booking_timeout_ms must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Load the experiment catalog from a JSON file.
///
/// Only the file's shape is checked here. Weight totals and variant counts
/// are checked per experiment when a variant is selected.
pub async fn load_experiments(path: &Path) -> Result<ExperimentCatalog, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

    let catalog: ExperimentCatalog =
        serde_json::from_str(&content).map_err(|err| ConfigError::Parse {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;

    tracing::info!(
        path = %path.display(),
        experiments = catalog.len(),
        "loaded experiment catalog"
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_service_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_service_config(&tmp.path().join("switchyard.toml"))
            .await
            .unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.max_page_size, 16);
    }

    #[tokio::test]
    async fn load_service_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("switchyard.toml");
        tokio::fs::write(
            &config_path,
            r#"
port = 9001
experiments_path = "/etc/switchyard/experiments.json"
booking_timeout_ms = 250
"#,
        )
        .await
        .unwrap();

        let config = load_service_config(&config_path).await.unwrap();
        assert_eq!(config.port, 9001);
        assert_eq!(config.experiments_path, "/etc/switchyard/experiments.json");
        assert_eq!(config.booking_timeout_ms, 250);
    }

    #[tokio::test]
    async fn load_service_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("switchyard.toml");
        tokio::fs::write(&config_path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let err = load_service_config(&config_path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[tokio::test]
    async fn load_service_config_rejects_zero_page_size() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("switchyard.toml");
        tokio::fs::write(&config_path, "max_page_size = 0").await.unwrap();

        let err = load_service_config(&config_path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[tokio::test]
    async fn load_experiments_parses_catalog() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("experiments.json");
        tokio::fs::write(
            &path,
            r#"{"new-signup-flow": {"variants": ["control", "new-design"], "weights": [50, 50]}}"#,
        )
        .await
        .unwrap();

        let catalog = load_experiments(&path).await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.get("new-signup-flow").unwrap().weights,
            vec![50, 50]
        );
    }

    #[tokio::test]
    async fn load_experiments_keeps_inconsistent_weights() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("experiments.json");
        tokio::fs::write(
            &path,
            r#"{"lopsided": {"variants": ["A", "B", "C"], "weights": [10, 10]}}"#,
        )
        .await
        .unwrap();

        let catalog = load_experiments(&path).await.unwrap();
        assert!(catalog.get("lopsided").is_some());
    }

    #[tokio::test]
    async fn load_experiments_missing_file_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let err = load_experiments(&tmp.path().join("nope.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[tokio::test]
    async fn load_experiments_malformed_file_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("experiments.json");
        tokio::fs::write(&path, r#"{"x": {"variants": "A"}}"#).await.unwrap();

        let err = load_experiments(&path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[tokio::test]
    async fn bundled_experiments_file_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/experiments.json");
        let catalog = load_experiments(&path).await.unwrap();
        assert!(catalog.get("new-signup-flow").is_some());
        for (_, experiment) in catalog.iter() {
            assert!(experiment.is_balanced());
            assert_eq!(experiment.total_weight(), 100);
        }
    }
}
