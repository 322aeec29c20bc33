use thiserror::Error;

use crate::ffi::*;

/// Failures this layer introduces on its own, always before anything is
/// delegated. Whatever the real calls report is returned untouched and
/// never becomes a `ShimError`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShimError {
    #[error("real `{0}` could not be located")]
    RealSymbolUnavailable(&'static str),
    #[error("out of memory while building a local answer")]
    AllocationFailure,
}

impl ShimError {
    /// Value left in `errno`.
    pub fn errno(&self) -> int {
        match self {
            Self::RealSymbolUnavailable(_)  => EINVAL,
            Self::AllocationFailure         => ENOMEM,
        }
    }

    /// Return code of `getaddrinfo`.
    pub fn eai(&self) -> int {
        match self {
            Self::RealSymbolUnavailable(_)  => EAI_SYSTEM,
            Self::AllocationFailure         => EAI_MEMORY,
        }
    }

    /// Reports through the `bind`/`connect` convention.
    pub unsafe fn as_sock_result(&self) -> int {
        set_errno(self.errno());
        -1
    }

    /// Reports through the `getaddrinfo` convention.
    pub unsafe fn as_eai_result(&self) -> int {
        set_errno(self.errno());
        self.eai()
    }
}
