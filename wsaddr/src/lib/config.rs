use std::env;
use std::os::unix::ffi::OsStringExt;

/// Explicit workspace name. Its last path component wins over the
/// working directory.
pub const OVERRIDE_VAR: &str = "WORKSPACE_NAME_OVERRIDE";
/// Exactly `"1"` turns redirection off for the lifetime of the process.
pub const DISABLE_VAR: &str = "DISABLE_REDIRECTION";
/// Any non-empty value turns on diagnostics on stderr.
pub const DIAGNOSTICS_VAR: &str = "ENABLE_DIAGNOSTIC_LOG";

/// Defines the interface for reading the process's identity.
///
/// Values are raw bytes: neither environment variables nor paths are
/// guaranteed to be UTF-8, and workspace names are hashed byte by byte.
///
/// Implementors used inside an interposed process must not reach any of
/// the intercepted calls.
pub trait IdentitySource {
    /// The value of `key`, if set. An empty value is `Some(vec![])`.
    fn var(&self, key: &str) -> Option<Vec<u8>>;
    /// The absolute path of the working directory, if it can be read.
    fn current_dir(&self) -> Option<Vec<u8>>;
}

/// Reads through `std::env`. Fine for ordinary binaries; the interposer
/// brings its own libc-backed source.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessEnv;

impl IdentitySource for ProcessEnv {
    fn var(&self, key: &str) -> Option<Vec<u8>> {
        env::var_os(key).map(|v| v.into_vec())
    }

    fn current_dir(&self) -> Option<Vec<u8>> {
        env::current_dir()
            .ok()
            .map(|p| p.into_os_string().into_vec())
    }
}

/// The three knobs, read once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Toggles {
    pub disabled:       bool,
    pub name_override:  Option<Vec<u8>>,
    pub diagnostics:    bool,
}

impl Toggles {
    pub fn read<S: IdentitySource + ?Sized>(source: &S) -> Self {
        Self {
            disabled:       source.var(DISABLE_VAR).as_deref() == Some(b"1".as_slice()),
            name_override:  source.var(OVERRIDE_VAR).filter(|v| !v.is_empty()),
            diagnostics:    source.var(DIAGNOSTICS_VAR).is_some_and(|v| !v.is_empty()),
        }
    }
}
