//! Loading a shared library that exposes the numeric exports and calling
//! them through their C signatures.

use crate::catalog::{self, Value, ValueType, EXPORTS};
use crate::config::FfiConfig;
use crate::{FfiMathError, Result};
use libloading::{Library, Symbol};
use std::ffi::{CStr, OsStr};
use std::fs;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Locate the configured library: the explicit path when one is set,
/// otherwise the first search directory that contains the library file.
pub fn resolve_library_path(config: &FfiConfig) -> Result<PathBuf> {
    if let Some(path) = &config.library.path {
        if path.is_file() {
            return Ok(path.clone());
        }
        warn!(path = %path.display(), "configured library path does not exist");
        return Err(FfiMathError::LibraryNotFound(path.display().to_string()));
    }

    let file_name = config.library_file_name();
    for dir in &config.library.search_paths {
        let candidate = dir.join(&file_name);
        debug!(path = %candidate.display(), "probing for library");
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    let searched: Vec<String> = config
        .library
        .search_paths
        .iter()
        .map(|dir| dir.display().to_string())
        .collect();

    Err(FfiMathError::LibraryNotFound(format!(
        "{file_name} (searched: {})",
        searched.join(", ")
    )))
}

/// File of the loaded object that contains `address`, as reported by `dladdr`.
fn defining_object(address: *const ()) -> Option<PathBuf> {
    // SAFETY: Dl_info is plain pointers; dladdr only reads `address` and
    // fills `info`, whose strings live as long as the object stays loaded.
    unsafe {
        let mut info: libc::Dl_info = std::mem::zeroed();
        if libc::dladdr(address.cast(), &mut info) == 0 || info.dli_fname.is_null() {
            return None;
        }
        let name = CStr::from_ptr(info.dli_fname);
        Some(PathBuf::from(OsStr::from_bytes(name.to_bytes())))
    }
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

pub struct LoadedLibrary {
    library: Library,
    path: PathBuf,
    canonical_path: PathBuf,
    prefix: String,
}

impl LoadedLibrary {
    pub fn open(path: impl AsRef<Path>, prefix: impl Into<String>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        // SAFETY: loading runs the library's initialisers. The caller chose
        // this file and is trusting it to be a plain numeric library.
        let library = unsafe { Library::new(&path) }?;
        debug!(path = %path.display(), "loaded library");

        Ok(Self {
            library,
            canonical_path: canonical(&path),
            path,
            prefix: prefix.into(),
        })
    }

    pub fn load(config: &FfiConfig) -> Result<Self> {
        let path = resolve_library_path(config)?;
        Self::open(path, config.symbol_prefix.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether the library itself exports `name` under this loader's prefix.
    /// Symbols that only resolve through its dependencies do not count.
    pub fn has_symbol(&self, name: &str) -> bool {
        let symbol = format!("{}{}", self.prefix, name);
        self.ensure_defined_here(&symbol).is_ok()
    }

    /// `dlsym` on a library handle also searches its dependencies, so
    /// `sqrt` with an empty prefix can come back from libm.
    fn ensure_defined_here(&self, symbol: &str) -> Result<()> {
        // SAFETY: the symbol is only used as an address, never called.
        let address = unsafe { self.library.get::<*const ()>(symbol.as_bytes()) }.map(|s| *s)?;

        match defining_object(address) {
            Some(object) if canonical(&object) == self.canonical_path => Ok(()),
            other => {
                let object = other
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "an unknown object".to_string());
                debug!(symbol, object = %object, "symbol defined outside the library");
                Err(FfiMathError::ForeignSymbol {
                    symbol: symbol.to_string(),
                    object,
                })
            }
        }
    }

    /// Catalog entries the library does not export.
    pub fn missing_symbols(&self) -> Vec<&'static str> {
        EXPORTS
            .iter()
            .filter(|export| !self.has_symbol(export.name))
            .map(|export| export.name)
            .collect()
    }

    /// Call export `name` through the library.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        use ValueType::{F64, I32, I64};

        let export = catalog::find(name)?;
        export.check_args(args)?;

        let symbol_name = export.symbol(&self.prefix);
        self.ensure_defined_here(&symbol_name)?;
        let symbol = symbol_name.as_bytes();
        debug!(function = name, "calling through library");

        // SAFETY: each function-pointer type below is the C signature the
        // catalog declares for the export; arguments were checked against it.
        let value = unsafe {
            match (export.signature.params, export.signature.ret, args) {
                ([I32, I32], I32, [Value::I32(a), Value::I32(b)]) => {
                    let f: Symbol<unsafe extern "C" fn(i32, i32) -> i32> =
                        self.library.get(symbol)?;
                    Value::I32(f(*a, *b))
                }
                ([F64, F64], F64, [Value::F64(a), Value::F64(b)]) => {
                    let f: Symbol<unsafe extern "C" fn(f64, f64) -> f64> =
                        self.library.get(symbol)?;
                    Value::F64(f(*a, *b))
                }
                ([F64], F64, [Value::F64(x)]) => {
                    let f: Symbol<unsafe extern "C" fn(f64) -> f64> = self.library.get(symbol)?;
                    Value::F64(f(*x))
                }
                ([I32], I64, [Value::I32(n)]) => {
                    let f: Symbol<unsafe extern "C" fn(i32) -> i64> = self.library.get(symbol)?;
                    Value::I64(f(*n))
                }
                ([I32], I32, [Value::I32(n)]) => {
                    let f: Symbol<unsafe extern "C" fn(i32) -> i32> = self.library.get(symbol)?;
                    Value::I32(f(*n))
                }
                _ => {
                    return Err(FfiMathError::UnsupportedSignature {
                        function: export.name.to_string(),
                        signature: export.signature.to_string(),
                    })
                }
            }
        };

        Ok(value)
    }
}

impl std::fmt::Debug for LoadedLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedLibrary")
            .field("path", &self.path)
            .field("prefix", &self.prefix)
            .finish()
    }
}
