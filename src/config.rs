use crate::catalog::DEFAULT_SYMBOL_PREFIX;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::fs;
use std::path::{Path, PathBuf};

/// Where to find a library exposing the numeric exports, and how its
/// symbols are named.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FfiConfig {
    pub symbol_prefix: String,
    pub library: LibraryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Base name; `ffimath` resolves to `libffimath.so` on Linux.
    pub name: String,
    /// Explicit location. Skips the search when set.
    pub path: Option<PathBuf>,
    pub search_paths: Vec<PathBuf>,
}

impl Default for FfiConfig {
    fn default() -> Self {
        Self {
            symbol_prefix: DEFAULT_SYMBOL_PREFIX.to_string(),
            library: LibraryConfig::default(),
        }
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        let search_paths = [
            "./stdlib/foreign/",
            ".",
            "target/release",
            "target/debug",
            "/usr/local/lib/",
            "/usr/lib/",
        ];

        Self {
            name: "ffimath".to_string(),
            path: None,
            search_paths: search_paths.iter().map(PathBuf::from).collect(),
        }
    }
}

impl FfiConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Platform file name for the configured library.
    pub fn library_file_name(&self) -> String {
        format!("{DLL_PREFIX}{}{DLL_SUFFIX}", self.library.name)
    }

    pub fn with_library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.library.path = Some(path.into());
        self
    }

    pub fn with_symbol_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.symbol_prefix = prefix.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FfiMathError;

    #[test]
    fn test_defaults() {
        let config = FfiConfig::default();
        assert_eq!(config.symbol_prefix, "rust_");
        assert_eq!(config.library.name, "ffimath");
        assert!(config.library.path.is_none());
        assert_eq!(
            config.library.search_paths.first(),
            Some(&PathBuf::from("./stdlib/foreign/"))
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = FfiConfig::from_toml_str(
            r#"
[library]
name = "test_math"
"#,
        )
        .unwrap();

        assert_eq!(config.symbol_prefix, "rust_");
        assert_eq!(config.library.name, "test_math");
        assert_eq!(
            config.library.search_paths,
            LibraryConfig::default().search_paths
        );
    }

    #[test]
    fn test_full_toml() {
        let config = FfiConfig::from_toml_str(
            r#"
symbol_prefix = ""

[library]
name = "cmath"
path = "/opt/lib/libcmath.so"
search_paths = ["/opt/lib"]
"#,
        )
        .unwrap();

        assert_eq!(config.symbol_prefix, "");
        assert_eq!(config.library.path, Some(PathBuf::from("/opt/lib/libcmath.so")));
        assert_eq!(config.library.search_paths, vec![PathBuf::from("/opt/lib")]);
    }

    #[test]
    fn test_invalid_toml() {
        let result = FfiConfig::from_toml_str("symbol_prefix = [");
        assert!(matches!(result, Err(FfiMathError::TomlParse(_))));
    }

    #[test]
    fn test_library_file_name() {
        let config = FfiConfig::default();
        let file_name = config.library_file_name();
        assert!(file_name.contains("ffimath"));
        assert!(file_name.ends_with(DLL_SUFFIX));
    }

    #[test]
    fn test_toml_round_trip_through_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("ffimath.toml");

        let config = FfiConfig::default()
            .with_library_path("/tmp/libffimath.so")
            .with_symbol_prefix("cb_");
        std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();

        assert_eq!(FfiConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let result = FfiConfig::from_file("/nonexistent/ffimath.toml");
        assert!(matches!(result, Err(FfiMathError::Io(_))));
    }
}
