use std::ffi::CStr;

use wsaddr::IdentitySource;

use crate::ffi::*;

// Longest variable name we are ever asked for, plus the terminator.
const KEY_BUF_LEN: usize = 64;

/// [`IdentitySource`] backed by raw `getenv`/`getcwd`. Usable from inside
/// the one-time initialization: neither call is interposed.
#[derive(Clone, Copy, Debug, Default)]
pub struct LibcEnv;

impl IdentitySource for LibcEnv {
    fn var(&self, key: &str) -> Option<Vec<u8>> {
        if key.len() >= KEY_BUF_LEN {
            return None;
        }
        let mut c_key = [0 as char; KEY_BUF_LEN];
        cstring_noalloc(&mut c_key, key.as_bytes());

        unsafe {
            let val = getenv(c_key.as_ptr());
            c_bytes(val).map(<[u8]>::to_vec)
        }
    }

    fn current_dir(&self) -> Option<Vec<u8>> {
        let mut buf = [0 as char; PATH_MAX as usize];

        unsafe {
            let cwd = getcwd(buf.as_mut_ptr(), buf.len());
            if cwd.is_null() {
                return None;
            }
            Some(CStr::from_ptr(cwd).to_bytes().to_vec())
        }
    }
}
