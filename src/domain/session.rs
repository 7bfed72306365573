use serde::{Deserialize, Serialize};

use super::navigation::{NavAction, Page, transition};

/// Per-browser session state. Created on first request, mutated only by
/// request handlers and never shared between sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub logged_in: bool,
    pub user_email: Option<String>,
    pub current_page: Page,
}

impl SessionState {
    /// Key under which the state is stored in the session store.
    pub const KEY: &'static str = "portal_session";

    /// Page to render for this session, with the login gate applied.
    #[must_use]
    pub const fn page(&self) -> Page {
        self.current_page.gate(self.logged_in)
    }

    pub fn navigate(&mut self, action: NavAction) -> Page {
        self.current_page = transition(self.current_page, self.logged_in, action);
        self.current_page
    }

    pub fn log_in(&mut self, email: impl Into<String>) -> Page {
        self.logged_in = true;
        self.user_email = Some(email.into());
        self.navigate(NavAction::LoggedIn)
    }

    pub fn log_out(&mut self) -> Page {
        self.logged_in = false;
        self.user_email = None;
        self.navigate(NavAction::Logout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Supplier;

    #[test]
    fn fresh_session_renders_login() {
        let session = SessionState::default();
        assert!(!session.logged_in);
        assert_eq!(session.current_page, Page::Home);
        assert_eq!(session.page(), Page::Login);
    }

    #[test]
    fn log_in_then_out() {
        let mut session = SessionState::default();

        assert_eq!(session.log_in("a@b.co"), Page::Options);
        assert_eq!(session.user_email.as_deref(), Some("a@b.co"));

        session.navigate(NavAction::OpenSupplier(Supplier::Rosenberger));
        assert_eq!(session.page(), Page::Supplier(Supplier::Rosenberger));

        assert_eq!(session.log_out(), Page::Login);
        assert!(session.user_email.is_none());
        assert_eq!(session.navigate(NavAction::OpenHistory), Page::Login);
    }
}
