use std::ffi::CString;

use libc_stdhandle::stderr;

use crate::ffi::*;

const PREFIX: &str = "[workspace-net]";

/// Diagnostic sink. Silent unless `ENABLE_DIAGNOSTIC_LOG` was non-empty
/// at initialization; lines go to the C `stderr` stream.
#[derive(Clone, Copy, Debug)]
pub struct Scribe {
    enabled: bool,
}

impl Scribe {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn note(&self, msg: &str) {
        if !self.enabled {
            return;
        }
        // Interior NULs would cut the line short; drop them.
        let line = format!("{PREFIX} {msg}\n").replace('\0', "");
        if let Ok(c_line) = CString::new(line) {
            unsafe {
                fputs(c_line.as_ptr(), stderr());
            }
        }
    }
}
