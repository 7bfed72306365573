//! Page router for a browser session.
//!
//! Pages form a small finite-state machine. Every transition is a pure
//! function of the current page, the logged-in flag and the user action, so
//! handlers never mutate a "current page" string directly.

use serde::{Deserialize, Serialize};

use super::Supplier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "page", content = "supplier", rename_all = "snake_case")]
pub enum Page {
    #[default]
    Home,
    Register,
    Login,
    Options,
    Supplier(Supplier),
    History,
}

impl Page {
    /// Pages a logged-out session may stay on.
    #[must_use]
    pub const fn is_public(&self) -> bool {
        matches!(self, Self::Register | Self::Login)
    }

    /// Applies the login gate: a logged-out session can only be on
    /// [`Page::Register`] or [`Page::Login`]; anything else resolves to login.
    #[must_use]
    pub const fn gate(self, logged_in: bool) -> Self {
        if logged_in || self.is_public() {
            self
        } else {
            Self::Login
        }
    }
}

/// User navigation actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "supplier", rename_all = "snake_case")]
pub enum NavAction {
    Home,
    ShowRegister,
    ShowLogin,
    /// Registration succeeded.
    Registered,
    /// Login succeeded.
    LoggedIn,
    Logout,
    OpenSupplier(Supplier),
    OpenHistory,
    BackToOptions,
}

/// Computes the next page. `logged_in` is the flag *after* the action's own
/// side effects (a successful login passes `true`, a logout `false`).
#[must_use]
pub const fn transition(current: Page, logged_in: bool, action: NavAction) -> Page {
    let next = match action {
        NavAction::Home => Page::Home,
        NavAction::ShowRegister if !logged_in => Page::Register,
        NavAction::ShowLogin if !logged_in => Page::Login,
        // Already authenticated: the auth pages are not offered.
        NavAction::ShowRegister | NavAction::ShowLogin => current,
        NavAction::Registered | NavAction::Logout => Page::Login,
        NavAction::LoggedIn | NavAction::BackToOptions => Page::Options,
        NavAction::OpenSupplier(supplier) => Page::Supplier(supplier),
        NavAction::OpenHistory => Page::History,
    };

    next.gate(logged_in)
}
