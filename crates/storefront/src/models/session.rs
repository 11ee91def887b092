//! Session-related types.

use std::sync::Arc;

use super::user::User;

/// Snapshot of who is signed in.
///
/// The customer identity and the seller flag are tracked independently;
/// a browser can hold both sessions at once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// Authenticated customer, if any.
    pub user: Option<Arc<User>>,
    /// Whether a seller session is active.
    pub is_seller: bool,
}

impl Session {
    /// Whether a customer is signed in.
    #[must_use]
    pub const fn is_customer(&self) -> bool {
        self.user.is_some()
    }

    /// Whether nobody is signed in.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        !self.is_seller && self.user.is_none()
    }
}
