use std::net::SocketAddrV4;
use std::ptr;

use crate::errors::ShimError;
use crate::ffi::*;
use crate::sockaddr::new_ipv4;

/// A complete `getaddrinfo` result list of exactly one entry, in a single
/// allocation.
///
/// `info` comes first, so the block's address is the address of its
/// `addrinfo`, and `info.ai_addr` points into the same block. Ownership
/// moves to the caller, who releases it with `freeaddrinfo`: glibc frees
/// every node with one `free`, which takes the embedded address along.
#[repr(C)]
pub struct LocalAnswer {
    info: addrinfo,
    addr: sockaddr_in,
}

impl LocalAnswer {
    /// Builds the answer for `ep`. Socket type and protocol echo `hints`
    /// when given, and are left unspecified otherwise.
    pub unsafe fn allocate(ep: SocketAddrV4, hints: *const addrinfo) -> Result<*mut addrinfo, ShimError> {
        // `calloc` so that everything we do not set (flags, canonical
        // name, next) is zero/NULL.
        let block = calloc(1, std::mem::size_of::<LocalAnswer>()).cast::<LocalAnswer>();
        if block.is_null() {
            return Err(ShimError::AllocationFailure);
        }
        let (socktype, protocol) = hints
            .as_ref()
            .map_or((0, 0), |h| (h.ai_socktype, h.ai_protocol));

        (*block).addr = new_ipv4(ep);
        (*block).info.ai_family = AF_INET;
        (*block).info.ai_socktype = socktype;
        (*block).info.ai_protocol = protocol;
        (*block).info.ai_addrlen = SOCKADDR_IN_LEN;
        (*block).info.ai_addr = ptr::addr_of_mut!((*block).addr).cast::<sockaddr>();

        Ok(block.cast::<addrinfo>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sockaddr::{endpoint, read_ipv4};
    use std::net::Ipv4Addr;

    #[test]
    fn single_entry_with_echoed_hints() {
        let mut hints: addrinfo = unsafe { std::mem::zeroed() };
        hints.ai_socktype = libc::SOCK_STREAM;
        hints.ai_protocol = libc::IPPROTO_TCP;
        let ep = SocketAddrV4::new(Ipv4Addr::new(127, 18, 0, 1), 8080);

        unsafe {
            let ai = LocalAnswer::allocate(ep, &hints).unwrap();
            let info = &*ai;
            assert_eq!(info.ai_family, AF_INET);
            assert_eq!(info.ai_socktype, libc::SOCK_STREAM);
            assert_eq!(info.ai_protocol, libc::IPPROTO_TCP);
            assert_eq!(info.ai_flags, 0);
            assert_eq!(info.ai_addrlen, SOCKADDR_IN_LEN);
            assert!(info.ai_next.is_null());
            assert!(info.ai_canonname.is_null());
            let sin = read_ipv4(info.ai_addr, info.ai_addrlen).unwrap();
            assert_eq!(endpoint(&sin), ep);

            libc::freeaddrinfo(ai);
        }
    }

    #[test]
    fn no_hints_means_unspecified() {
        let ep = SocketAddrV4::new(Ipv4Addr::new(127, 18, 1, 44), 0);
        unsafe {
            let ai = LocalAnswer::allocate(ep, ptr::null()).unwrap();
            assert_eq!(((*ai).ai_socktype, (*ai).ai_protocol), (0, 0));
            libc::freeaddrinfo(ai);
        }
    }
}
