use std::ptr;

use once_cell::sync::Lazy;
use wsaddr::{detect, resolve, rewrite, Call, Resolution, Toggles, WorkspaceContext};

use crate::answer::LocalAnswer;
use crate::env::LibcEnv;
use crate::errors::ShimError;
use crate::ffi::*;
use crate::logger::Scribe;
use crate::real::{RealCallTable, RealCalls};
use crate::sockaddr::{endpoint, read_ipv4, with_endpoint};

/// Process-wide state. The first caller of any entry point runs the
/// initializer; racing callers block until it is done, and from then on
/// it is read-only.
pub static SHIM: Lazy<Shim<RealCallTable>> = Lazy::new(|| unsafe { Shim::from_process() });

/// Everything an entry point needs: where the originals are, and where
/// this workspace lives.
pub struct Shim<R> {
    real:       R,
    context:    WorkspaceContext,
}

impl Shim<RealCallTable> {
    unsafe fn from_process() -> Self {
        // Only `getenv`, `getcwd`, `dlsym` and `fputs` in here: calling
        // one of our own exports now would deadlock on `SHIM`.
        let source = LibcEnv;
        let toggles = Toggles::read(&source);
        let scribe = Scribe::new(toggles.diagnostics);
        let real = RealCallTable::resolve(&scribe);
        let detection = detect(&toggles, &source);
        match detection.context.address() {
            Some(ip)    => scribe.note(&format!("{} ({})", detection.source, ip)),
            None        => scribe.note(&detection.source.to_string()),
        }

        Self::new(real, detection.context)
    }
}

impl<R: RealCalls> Shim<R> {
    pub fn new(real: R, context: WorkspaceContext) -> Self {
        Self { real, context }
    }

    pub unsafe fn bind(&self, sockfd: int, addr: *const sockaddr, addrlen: socklen_t) -> int {
        self.redirect(Call::Bind, self.real.bind(), sockfd, addr, addrlen)
    }

    pub unsafe fn connect(&self, sockfd: int, addr: *const sockaddr, addrlen: socklen_t) -> int {
        self.redirect(Call::Connect, self.real.connect(), sockfd, addr, addrlen)
    }

    pub unsafe fn getaddrinfo(
        &self,
        node:       *const char,
        service:    *const char,
        hints:      *const addrinfo,
        res:        *mut *mut addrinfo,
    ) -> int {
        let Some(real) = self.real.getaddrinfo() else {
            return ShimError::RealSymbolUnavailable("getaddrinfo").as_eai_result();
        };
        if !self.context.is_active() || res.is_null() {
            return real(node, service, hints, res);
        }
        match resolve(&self.context, c_bytes(node), c_bytes(service)) {
            Resolution::Passthrough => real(node, service, hints, res),
            Resolution::Local(ep)   => match LocalAnswer::allocate(ep, hints) {
                Ok(answer)  => {
                    *res = answer;
                    0
                },
                Err(e)      => e.as_eai_result(),
            },
        }
    }

    // `bind` and `connect` share everything but the rewrite rule.
    unsafe fn redirect(
        &self,
        call:       Call,
        real:       Option<CBind>,
        sockfd:     int,
        addr:       *const sockaddr,
        addrlen:    socklen_t,
    ) -> int {
        let Some(real) = real else {
            return ShimError::RealSymbolUnavailable(call.symbol()).as_sock_result();
        };
        if !self.context.is_active() {
            return real(sockfd, addr, addrlen);
        }
        let Some(sin) = read_ipv4(addr, addrlen) else {
            return real(sockfd, addr, addrlen);
        };
        match rewrite(call, &self.context, endpoint(&sin)) {
            Some(ep)    => {
                // The caller's structure is never written to.
                let local = with_endpoint(sin, ep);
                real(sockfd, ptr::addr_of!(local).cast::<sockaddr>(), SOCKADDR_IN_LEN)
            },
            None        => real(sockfd, addr, addrlen),
        }
    }
}
