use std::net::{Ipv4Addr, SocketAddrV4};
use std::ptr;

use crate::ffi::*;

/// Copies out an IPv4 socket address if, and only if, it is one: non-NULL,
/// at least `sizeof(struct sockaddr_in)` bytes, and `AF_INET`.
///
/// Everything else (other families, short lengths) is `None` and must be
/// passed through by the caller exactly as received.
pub unsafe fn read_ipv4(addr: *const sockaddr, addrlen: socklen_t) -> Option<sockaddr_in> {
    if addr.is_null() || addrlen < SOCKADDR_IN_LEN {
        return None;
    }
    // The caller vouches for `addrlen` bytes, and we never read more
    // than that. Alignment is not guaranteed.
    let sin = ptr::read_unaligned(addr.cast::<sockaddr_in>());

    (int::from(sin.sin_family) == AF_INET).then_some(sin)
}

pub fn endpoint(sin: &sockaddr_in) -> SocketAddrV4 {
    SocketAddrV4::new(
        Ipv4Addr::from(u32::from_be(sin.sin_addr.s_addr)),
        u16::from_be(sin.sin_port),
    )
}

/// `sin` with address and port replaced. Every other byte, `sin_zero`
/// included, is kept.
pub fn with_endpoint(mut sin: sockaddr_in, ep: SocketAddrV4) -> sockaddr_in {
    sin.sin_addr.s_addr = u32::from(*ep.ip()).to_be();
    sin.sin_port = ep.port().to_be();
    sin
}

pub fn new_ipv4(ep: SocketAddrV4) -> sockaddr_in {
    // All-zeroes is a valid `sockaddr_in`.
    let mut sin: sockaddr_in = unsafe { std::mem::zeroed() };
    sin.sin_family = AF_INET as sa_family_t;
    with_endpoint(sin, ep)
}
