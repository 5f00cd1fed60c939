//! Numeric utility functions exported over the C ABI, plus the host-side
//! pieces for exercising them: an export catalog, a dynamic loader and a
//! check suite.

use thiserror::Error;

pub mod catalog;
pub mod config;
pub mod ffi;
#[cfg(not(target_os = "windows"))]
pub mod loader;
pub mod math;
pub mod verify;

pub use catalog::{Export, Signature, Value, ValueType, DEFAULT_SYMBOL_PREFIX, EXPORTS};
pub use config::{FfiConfig, LibraryConfig};
#[cfg(not(target_os = "windows"))]
pub use loader::{resolve_library_path, LoadedLibrary};
pub use verify::{run_checks, Evaluator, InProcess, Report};

#[derive(Error, Debug)]
pub enum FfiMathError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("{function} expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        function: String,
        expected: usize,
        actual: usize,
    },

    #[error("{function}: argument {position} should be {expected}, got {actual}")]
    TypeMismatch {
        function: String,
        position: usize,
        expected: ValueType,
        actual: ValueType,
    },

    #[error("Unsupported signature for {function}: {signature}")]
    UnsupportedSignature { function: String, signature: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Library not found: {0}")]
    LibraryNotFound(String),

    #[error("Symbol {symbol} resolves to {object}, not the loaded library")]
    ForeignSymbol { symbol: String, object: String },

    #[cfg(not(target_os = "windows"))]
    #[error("Dynamic loading error: {0}")]
    Loading(#[from] libloading::Error),
}

pub type Result<T> = std::result::Result<T, FfiMathError>;
