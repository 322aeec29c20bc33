//! Welcome to `wsaddr`!
//!
//! Many workspaces share one network namespace. Each of them gets its own
//! loopback address, `127.18.B2.B3`, derived deterministically from the
//! workspace's name. This crate holds the pure half of that story:
//!
//! 1. *Who am I?* [`detect`] reads the toggles and the working directory
//!    through an [`IdentitySource`] and yields a [`WorkspaceContext`].
//! 2. *Where should this go?* [`rewrite`] and [`resolve`] decide whether a
//!    `bind`, `connect` or hostname lookup must be redirected to the
//!    workspace address.
//!
//! The raw, `extern "C"` half lives in the `workspace_net` interposer, which
//! consumes everything exported here.

/// Environment toggles and the sources they are read from.
mod config;
mod errors;
/// Workspace name → number → address.
mod identity;
mod mapper;

pub use config::*;
pub use errors::*;
pub use identity::*;
pub use mapper::*;
