use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Appears when a workspace address is requested for something that
/// cannot name a workspace.
pub enum IdentityError {
    #[error("workspace name is empty in `{0}`")]
    EmptyName(String),
}

impl IdentityError {
    pub fn empty(raw: &[u8]) -> Self {
        Self::EmptyName(String::from_utf8_lossy(raw).into_owned())
    }
}
