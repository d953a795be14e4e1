//! Generator configuration file (`jsoncfg-gen.toml`).

use crate::backend::BackendKind;
use crate::error::ConfigError;
use crate::generator::{GeneratorOptions, DEFAULT_TEXT_CEILING};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub backend: String,
    pub text_ceiling: usize,
    pub emit_header: bool,
    pub banner: Option<String>,
    pub output_dir: PathBuf,
    pub template_dir: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default().as_str().to_string(),
            text_ceiling: DEFAULT_TEXT_CEILING,
            emit_header: false,
            banner: None,
            output_dir: PathBuf::from("."),
            template_dir: None,
        }
    }
}

impl GeneratorConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded generator config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn backend_kind(&self) -> Result<BackendKind, ConfigError> {
        self.backend.parse()
    }

    pub fn options(&self) -> GeneratorOptions {
        GeneratorOptions {
            text_ceiling: self.text_ceiling,
            emit_header: self.emit_header,
            banner: self.banner.clone(),
        }
    }
}
