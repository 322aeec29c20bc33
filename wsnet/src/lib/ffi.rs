use std::ffi::CStr;

// C-reminiscent types.
pub type int            = libc::c_int;
pub type char           = libc::c_char;
pub type socklen_t      = libc::socklen_t;
pub type sa_family_t    = libc::sa_family_t;
pub type sockaddr       = libc::sockaddr;
pub type sockaddr_in    = libc::sockaddr_in;
pub type addrinfo       = libc::addrinfo;

// Linux utils.
pub use libc::{
    RTLD_NEXT,
    AF_INET,
    EINVAL,
    ENOMEM,
    EAI_MEMORY,
    EAI_SYSTEM,
    PATH_MAX,
    calloc,
    dlsym,
    dlerror,
    fputs,
    getcwd,
    getenv,
};

// Type aliases for the several interposed functions.
pub type CBind          = unsafe extern "C" fn( sockfd:     int,
                                                addr:       *const sockaddr,
                                                addrlen:    socklen_t)          -> int;
pub type CConnect       = unsafe extern "C" fn( sockfd:     int,
                                                addr:       *const sockaddr,
                                                addrlen:    socklen_t)          -> int;
pub type CGetaddrinfo   = unsafe extern "C" fn( node:       *const char,
                                                service:    *const char,
                                                hints:      *const addrinfo,
                                                res:        *mut *mut addrinfo) -> int;

pub const SOCKADDR_IN_LEN: socklen_t = std::mem::size_of::<sockaddr_in>() as socklen_t;

pub fn cstring_noalloc(c_buf: &mut [char], rust_buf: &[u8]) {
    //! Writes a byte string to a pre-allocated `c_char` buffer and
    //! terminates it. The buffer must have room for the terminator.

    let chars_num = rust_buf.len();
    for i in 0..chars_num {
        c_buf[i] = rust_buf[i] as char;
    }
    // C strings are terminated by the "null" character.
    c_buf[chars_num] = 0;
}

#[inline]
pub unsafe fn set_errno(code: int) {
    *libc::__errno_location() = code;
}

pub unsafe fn last_dlerror() -> Option<String> {
    //! Fetches (and thereby clears) the pending `dlerror` message.

    let eptr: *mut char = dlerror();
    if eptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(eptr).to_string_lossy().into_owned())
    }
}

#[inline]
pub unsafe fn c_bytes<'a>(p: *const char) -> Option<&'a [u8]> {
    //! Borrows a C string, NULL being `None`.

    if p.is_null() {
        None
    } else {
        Some(CStr::from_ptr(p).to_bytes())
    }
}

#[macro_export]
macro_rules! make_cstring {
    // Returns a pre-allocated C string.
    ($text:literal) => {
        {
            const RUST_BUF: &str = $text;
            // Extra space for '\0' terminating character.
            let mut c_buf = [0 as libc::c_char; RUST_BUF.len() + 1];
            $crate::ffi::cstring_noalloc(&mut c_buf, RUST_BUF.as_bytes());

            c_buf
        }
    };
}
