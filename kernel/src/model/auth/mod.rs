pub mod event;

/// Opaque bearer token as it travels in the Authorization header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(pub String);
