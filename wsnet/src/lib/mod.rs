#[allow(non_camel_case_types)]
/// Crate is targeting Linux user-space processes which bind, connect
/// and resolve hostnames through glibc. We're redirecting those calls via
/// [*function interposition*](https://stackoverflow.com/questions/426230/what-is-the-ld-preload-trick).
/// We thus need the corresponding set of signatures for the
/// functions that are to be interposed.
///
/// This module defines said signatures, along with some assistant
/// type aliases (e.g. `int` instead of `c_int`).
mod ffi;

mod errors;

/// Reads the environment and the working directory straight from libc.
mod env;

mod logger;

/// Locates the original `bind`, `connect` and `getaddrinfo`.
mod real;

/// Validated conversions between raw `sockaddr`s and typed endpoints.
mod sockaddr;

/// Locally synthesized `getaddrinfo` answers.
mod answer;

/// Entry-point logic, generic over where the real calls come from.
mod shim;

/// Contains the exported, ABI-exact replacements.
mod core;
