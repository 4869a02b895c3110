/// Where callers are sent when a signed-in user is required.
pub const SIGN_IN_PATH: &str = "/sign-in";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Authentication required, redirecting to {redirect_to}")]
    AuthRequired { redirect_to: &'static str },

    #[error("Playback failed: {0}")]
    Playback(String),

    #[error("Sample unavailable: {0}")]
    UnavailableSample(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for the sign-in redirect raised by unauthenticated submits.
    pub fn auth_required() -> Self {
        CoreError::AuthRequired {
            redirect_to: SIGN_IN_PATH,
        }
    }
}
