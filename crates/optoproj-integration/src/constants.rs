//! Integration identifiers and form error keys.

/// Integration domain, used in device identifiers.
pub const DOMAIN: &str = "optoproj";

/// Title of created config entries.
pub const NAME: &str = "Optoma Projector";

/// Form error keys reported by the config flow.
pub mod form_errors {
    /// Field the errors are attached to.
    pub const BASE: &str = "base";
    pub const LOGIN_FAILED: &str = "login_failed";
    pub const CANNOT_CONNECT: &str = "cannot_connect";
    pub const UNKNOWN: &str = "unknown";
}

/// Abort reasons reported by the config flow.
pub mod abort_reasons {
    pub const ALREADY_CONFIGURED: &str = "already_configured";
}
