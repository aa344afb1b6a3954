// ============================================================================
// CONFIG — TOML loading for materials and device profiles
// ============================================================================

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::ConfigError;
use crate::host::DeviceProfile;
use crate::material::GlassMaterial;

/// Read and parse one TOML file.  Missing fields take the type's defaults.
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_material(path: &Path) -> Result<GlassMaterial, ConfigError> {
    load_toml(path)
}

pub fn load_profile(path: &Path) -> Result<DeviceProfile, ConfigError> {
    load_toml(path)
}
