use crate::ffi::*;
use crate::shim::SHIM;

#[no_mangle]
/// Function interposition is used to catch every IPv4 `bind`, `connect`
/// and `getaddrinfo` of the host process.
///
/// The first call into any of the three initializes the shared state
/// (real symbols plus workspace identity). From then on each call either
/// goes out untouched, or with "this machine" swapped for the workspace's
/// own loopback address.
///
/// This logic holds across all 3 supported functions.
unsafe extern "C"
fn bind(sockfd: int, addr: *const sockaddr, addrlen: socklen_t) -> int {
    SHIM.bind(sockfd, addr, addrlen)
}

#[no_mangle]
unsafe extern "C"
fn connect(sockfd: int, addr: *const sockaddr, addrlen: socklen_t) -> int {
    SHIM.connect(sockfd, addr, addrlen)
}

#[no_mangle]
unsafe extern "C"
fn getaddrinfo(
    node:       *const char,
    service:    *const char,
    hints:      *const addrinfo,
    res:        *mut *mut addrinfo,
) -> int {
    SHIM.getaddrinfo(node, service, hints, res)
}
