// src/tui/router.rs — Screen routing with auth gating
//
// Two auth states, and every screen except Login is protected: navigating
// anywhere while unauthenticated lands on Login instead, without the
// target ever rendering. An authorization failure bubbled up from any
// fetch forces the transition back.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Screen {
    Login,
    Overview,
    Accounts,
    Content,
    Analytics,
    Funnel,
    Niches,
    Assistant,
}

impl Screen {
    pub const PROTECTED: [Screen; 7] = [
        Screen::Overview,
        Screen::Accounts,
        Screen::Content,
        Screen::Analytics,
        Screen::Funnel,
        Screen::Niches,
        Screen::Assistant,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Screen::Login => "Login",
            Screen::Overview => "Overview",
            Screen::Accounts => "Accounts",
            Screen::Content => "Content",
            Screen::Analytics => "Analytics",
            Screen::Funnel => "Funnel",
            Screen::Niches => "Niches",
            Screen::Assistant => "Assistant",
        }
    }

    pub fn is_protected(&self) -> bool {
        *self != Screen::Login
    }

    pub fn index(&self) -> usize {
        Screen::PROTECTED.iter().position(|s| s == self).unwrap_or(0)
    }

    fn from_index(i: usize) -> Screen {
        *Screen::PROTECTED.get(i).unwrap_or(&Screen::Overview)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
}

pub struct Router {
    auth: AuthState,
    current: Screen,
}

impl Router {
    pub fn new(authenticated: bool) -> Self {
        if authenticated {
            Self {
                auth: AuthState::Authenticated,
                current: Screen::Overview,
            }
        } else {
            Self {
                auth: AuthState::Unauthenticated,
                current: Screen::Login,
            }
        }
    }

    pub fn current(&self) -> Screen {
        self.current
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth == AuthState::Authenticated
    }

    /// Navigate to `target`, gated on auth state. Returns the screen that
    /// actually became current.
    pub fn navigate(&mut self, target: Screen) -> Screen {
        self.current = if target.is_protected() && self.auth == AuthState::Unauthenticated {
            Screen::Login
        } else {
            target
        };
        self.current
    }

    pub fn next_screen(&mut self) -> Screen {
        let idx = self.current.index();
        self.navigate(Screen::from_index((idx + 1) % Screen::PROTECTED.len()))
    }

    pub fn prev_screen(&mut self) -> Screen {
        let idx = self.current.index();
        self.navigate(Screen::from_index(
            (idx + Screen::PROTECTED.len() - 1) % Screen::PROTECTED.len(),
        ))
    }

    /// Unauthenticated -> Authenticated, only ever after a successful login.
    pub fn login_succeeded(&mut self) {
        self.auth = AuthState::Authenticated;
        self.current = Screen::Overview;
    }

    /// Authenticated -> Unauthenticated, on logout or a bubbled
    /// authorization failure. Lands on Login.
    pub fn force_logout(&mut self) {
        self.auth = AuthState::Unauthenticated;
        self.current = Screen::Login;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_login_when_unauthenticated() {
        let router = Router::new(false);
        assert_eq!(router.current(), Screen::Login);
        assert!(!router.is_authenticated());
    }

    #[test]
    fn test_starts_on_overview_when_authenticated() {
        let router = Router::new(true);
        assert_eq!(router.current(), Screen::Overview);
    }

    #[test]
    fn test_protected_navigation_gated() {
        let mut router = Router::new(false);
        for screen in Screen::PROTECTED {
            assert_eq!(router.navigate(screen), Screen::Login);
        }
    }

    #[test]
    fn test_navigation_allowed_after_login() {
        let mut router = Router::new(false);
        router.login_succeeded();
        assert_eq!(router.navigate(Screen::Funnel), Screen::Funnel);
        assert_eq!(router.navigate(Screen::Assistant), Screen::Assistant);
    }

    #[test]
    fn test_force_logout_returns_to_login() {
        let mut router = Router::new(true);
        router.navigate(Screen::Accounts);
        router.force_logout();
        assert_eq!(router.current(), Screen::Login);
        assert_eq!(router.navigate(Screen::Accounts), Screen::Login);
    }

    #[test]
    fn test_next_prev_wrap() {
        let mut router = Router::new(true);
        assert_eq!(router.next_screen(), Screen::Accounts);
        assert_eq!(router.prev_screen(), Screen::Overview);
        assert_eq!(router.prev_screen(), Screen::Assistant);
    }
}
