use std::fmt;
use std::net::Ipv4Addr;

use crate::config::{IdentitySource, Toggles, DISABLE_VAR, OVERRIDE_VAR};
use crate::errors::IdentityError;

/// Every workspace lives in `127.18.0.0/16`.
pub const WORKSPACE_NET: [u8; 2] = [127, 18];
/// A working directory whose last component starts with this is
/// a workspace checkout.
pub const WORKSPACE_PREFIX: &[u8] = b"workspace-";

// FNV-1a, 32-bit flavour.
const FNV_OFFSET: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Process-wide answer to "should we redirect, and where to?".
///
/// Built once and never mutated: everything downstream only ever holds
/// shared references to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkspaceContext {
    active:     bool,
    address:    Ipv4Addr,
}

impl WorkspaceContext {
    pub const INACTIVE: Self = Self {
        active:     false,
        address:    Ipv4Addr::UNSPECIFIED,
    };

    pub fn active(address: Ipv4Addr) -> Self {
        Self { active: true, address }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The workspace address, but only while redirection is on.
    #[inline]
    pub fn address(&self) -> Option<Ipv4Addr> {
        self.active.then_some(self.address)
    }
}

/// Where the verdict came from. Only used for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetectionSource {
    Disabled,
    Override,
    WorkingDirectory,
    EmptyName,
    NotAWorkspace,
}

impl fmt::Display for DetectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled          => write!(f, "disabled via {DISABLE_VAR}"),
            Self::Override          => write!(f, "workspace detected via {OVERRIDE_VAR}"),
            Self::WorkingDirectory  => write!(f, "workspace detected via working directory"),
            Self::EmptyName         => write!(f, "workspace name is empty"),
            Self::NotAWorkspace     => write!(f, "not inside a workspace"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Detection {
    pub context:    WorkspaceContext,
    pub source:     DetectionSource,
}

impl Detection {
    fn inactive(source: DetectionSource) -> Self {
        Self { context: WorkspaceContext::INACTIVE, source }
    }

    fn from_name(name: &[u8], source: DetectionSource) -> Self {
        match address_of(name) {
            Ok(address) => Self { context: WorkspaceContext::active(address), source },
            Err(_)      => Self::inactive(DetectionSource::EmptyName),
        }
    }
}

/// The Identity Resolver.
///
/// Order matters: the disable toggle short-circuits everything, then the
/// explicit override, and only then is the working directory consulted.
/// The working directory is not read at all unless it is needed.
pub fn detect<S: IdentitySource + ?Sized>(toggles: &Toggles, source: &S) -> Detection {
    if toggles.disabled {
        return Detection::inactive(DetectionSource::Disabled);
    }
    if let Some(path) = toggles.name_override.as_deref() {
        return Detection::from_name(last_path_component(path), DetectionSource::Override);
    }
    let Some(cwd) = source.current_dir() else {
        return Detection::inactive(DetectionSource::NotAWorkspace);
    };
    let base = last_path_component(&cwd);
    match base.strip_prefix(WORKSPACE_PREFIX) {
        Some(rest) if !rest.is_empty()  => Detection::from_name(base, DetectionSource::WorkingDirectory),
        Some(_)                         => Detection::inactive(DetectionSource::EmptyName),
        None                            => Detection::inactive(DetectionSource::NotAWorkspace),
    }
}

/// Everything after the final `/`. A trailing slash yields the empty
/// component.
pub fn last_path_component(path: &[u8]) -> &[u8] {
    match path.iter().rposition(|&b| b == b'/') {
        Some(idx)   => &path[idx + 1..],
        None        => path,
    }
}

/// Parses the trailing run of ASCII digits, e.g. `workspace-12` → 12.
///
/// `None` when there are no trailing digits, or when they do not fit
/// in 32 bits.
pub fn parse_trailing_number(name: &[u8]) -> Option<u32> {
    let start = name
        .iter()
        .rposition(|b| !b.is_ascii_digit())
        .map_or(0, |idx| idx + 1);
    let digits = &name[start..];
    if digits.is_empty() {
        return None;
    }
    digits.iter().try_fold(0u32, |acc, d| {
        acc.checked_mul(10)?.checked_add(u32::from(d - b'0'))
    })
}

/// FNV-1a over the ASCII-lowercased bytes, folded down to 16 bits.
pub fn fnv1a16_lower(name: &[u8]) -> u16 {
    let hash = name.iter().fold(FNV_OFFSET, |h, b| {
        (h ^ u32::from(b.to_ascii_lowercase())).wrapping_mul(FNV_PRIME)
    });

    (hash & 0xFFFF) as u16
}

/// Trailing digits if they parse, else the hash of the whole name.
pub fn workspace_number(name: &[u8]) -> u32 {
    parse_trailing_number(name).unwrap_or_else(|| u32::from(fnv1a16_lower(name)))
}

/// `127.18.(n >> 8).(n & 255)`. Bits above the low 16 are dropped.
pub fn address_for_number(n: u32) -> Ipv4Addr {
    let [a, b] = WORKSPACE_NET;
    Ipv4Addr::new(a, b, (n >> 8) as u8, n as u8)
}

/// Address for a bare workspace name. Fails on the empty name.
pub fn address_of(name: &[u8]) -> Result<Ipv4Addr, IdentityError> {
    if name.is_empty() {
        return Err(IdentityError::empty(name));
    }

    Ok(address_for_number(workspace_number(name)))
}

/// Address for a workspace given by name or by path
/// (`/root/workspace-3` and `workspace-3` agree).
pub fn workspace_ip_from_name(name: &[u8]) -> Option<Ipv4Addr> {
    address_of(last_path_component(name)).ok()
}
