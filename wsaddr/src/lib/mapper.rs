//! The Address Mapper: per-call redirect decisions on typed addresses.
//!
//! Nothing here touches raw memory. Callers validate and convert the
//! C structures first; anything that fails validation never gets here
//! and is passed through by the caller.

use std::net::{Ipv4Addr, SocketAddrV4};

use crate::identity::WorkspaceContext;

/// Host tokens that mean "this machine" to a resolver.
const LOCAL_HOSTS: [&[u8]; 3] = [b"", b"localhost", b"127.0.0.1"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Call {
    Bind,
    Connect,
}

impl Call {
    pub fn symbol(&self) -> &'static str {
        match self {
            Call::Bind      => "bind",
            Call::Connect   => "connect",
        }
    }

    fn redirects(&self, ip: Ipv4Addr) -> bool {
        match self {
            // A server listening "everywhere" or on plain loopback.
            Call::Bind      => ip.is_unspecified() || ip == Ipv4Addr::LOCALHOST,
            // Connecting to the wildcard is meaningless, leave it alone.
            Call::Connect   => ip == Ipv4Addr::LOCALHOST,
        }
    }
}

/// The rewritten endpoint, or `None` if `target` must go out untouched.
/// The port is always preserved.
pub fn rewrite(call: Call, ctx: &WorkspaceContext, target: SocketAddrV4) -> Option<SocketAddrV4> {
    let workspace = ctx.address()?;

    call.redirects(*target.ip())
        .then(|| SocketAddrV4::new(workspace, target.port()))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Ask the real resolver.
    Passthrough,
    /// Answer locally with exactly this one IPv4 endpoint.
    Local(SocketAddrV4),
}

/// Decision for a hostname lookup.
///
/// `host` is `None` when the caller passed a NULL node; that is left to
/// the real resolver, which knows what `AI_PASSIVE` means. The empty
/// string, on the other hand, is treated as "localhost".
pub fn resolve(ctx: &WorkspaceContext, host: Option<&[u8]>, service: Option<&[u8]>) -> Resolution {
    let (Some(workspace), Some(host)) = (ctx.address(), host) else {
        return Resolution::Passthrough;
    };
    if !LOCAL_HOSTS.contains(&host) {
        return Resolution::Passthrough;
    }
    let port = service.and_then(parse_service_port).unwrap_or(0);

    Resolution::Local(SocketAddrV4::new(workspace, port))
}

/// A numeric service in `1..=65535`. Service names such as `"http"`
/// are not looked up. Leading C whitespace and a `+` sign are accepted,
/// trailing bytes are not.
pub fn parse_service_port(service: &[u8]) -> Option<u16> {
    let start = service
        .iter()
        .position(|b| !matches!(b, b' ' | b'\t'..=b'\r'))
        .unwrap_or(service.len());
    let port: u32 = std::str::from_utf8(&service[start..]).ok()?.parse().ok()?;

    u16::try_from(port).ok().filter(|&p| p != 0)
}
