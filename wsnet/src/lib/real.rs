use crate::ffi::*;
use crate::logger::Scribe;
use crate::make_cstring;

/// The three original operations, as the entry points see them.
///
/// `None` means the original could not be located. The entry points
/// then fail with their "invalid argument" equivalent instead of
/// calling anything.
pub trait RealCalls {
    fn bind(&self) -> Option<CBind>;
    fn connect(&self) -> Option<CConnect>;
    fn getaddrinfo(&self) -> Option<CGetaddrinfo>;
}

/// Handles to whatever comes after us in the lookup order, usually libc.
/// Resolved once, never retried.
#[derive(Clone, Copy, Debug, Default)]
pub struct RealCallTable {
    bind:           Option<CBind>,
    connect:        Option<CConnect>,
    getaddrinfo:    Option<CGetaddrinfo>,
}

impl RealCallTable {
    pub unsafe fn resolve(scribe: &Scribe) -> Self {
        // `dlsym` is thread-safe, and none of the lookups below lands
        // back in our own exports thanks to RTLD_NEXT.
        // [source: https://man7.org/linux/man-pages/man3/dlsym.3.html#ATTRIBUTES]
        let bind = next_symbol(make_cstring!("bind").as_ptr(), "bind", scribe)
            .map(|address| std::mem::transmute::<*const (), CBind>(address));
        let connect = next_symbol(make_cstring!("connect").as_ptr(), "connect", scribe)
            .map(|address| std::mem::transmute::<*const (), CConnect>(address));
        let getaddrinfo = next_symbol(make_cstring!("getaddrinfo").as_ptr(), "getaddrinfo", scribe)
            .map(|address| std::mem::transmute::<*const (), CGetaddrinfo>(address));

        Self { bind, connect, getaddrinfo }
    }
}

impl RealCalls for RealCallTable {
    fn bind(&self) -> Option<CBind> {
        self.bind
    }

    fn connect(&self) -> Option<CConnect> {
        self.connect
    }

    fn getaddrinfo(&self) -> Option<CGetaddrinfo> {
        self.getaddrinfo
    }
}

unsafe fn next_symbol(symbol: *const char, name: &str, scribe: &Scribe) -> Option<*const ()> {
    // Clear any stale error so that a failure below is ours.
    let _ = last_dlerror();
    let address = dlsym(RTLD_NEXT, symbol);
    if address.is_null() {
        let why = last_dlerror().unwrap_or_else(|| "symbol not found".to_string());
        scribe.note(&format!("cannot locate real `{name}`: {why}"));
        return None;
    }

    Some(address as *const ())
}
