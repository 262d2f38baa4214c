//! Collapsible navigation menu.

use crate::guard::Route;
use crate::session::SessionStore;

/// What activating a menu entry does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Open(Route),
    Logout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub action: NavAction,
}

const LINKS: &[NavItem] = &[
    NavItem { label: "Home", action: NavAction::Open(Route::Home) },
    NavItem { label: "Label classifier", action: NavAction::Open(Route::Classify) },
    NavItem { label: "Cameras", action: NavAction::Open(Route::Cameras) },
    NavItem { label: "Objects", action: NavAction::Open(Route::Objects) },
    NavItem { label: "Prompts", action: NavAction::Open(Route::Prompts) },
];

#[derive(Debug, Clone, Default)]
pub struct NavMenu {
    open: bool,
}

impl NavMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Links plus a trailing Login or Logout entry depending on the session.
    pub fn items(&self, session: &SessionStore) -> Vec<NavItem> {
        let mut items = LINKS.to_vec();
        items.push(if session.is_authenticated() {
            NavItem { label: "Logout", action: NavAction::Logout }
        } else {
            NavItem { label: "Login", action: NavAction::Open(Route::Login) }
        });
        items
    }

    /// Perform an entry's action. Returns the route to show next.
    pub fn activate(&mut self, item: &NavItem, session: &SessionStore) -> Route {
        self.close();
        match item.action {
            NavAction::Open(route) => route,
            NavAction::Logout => {
                session.logout();
                Route::Home
            }
        }
    }

    pub fn render(&self, session: &SessionStore) -> String {
        if !self.open {
            return "≡ menu\n".to_string();
        }
        let mut output = String::new();
        for (i, item) in self.items(session).iter().enumerate() {
            let target = match item.action {
                NavAction::Open(route) => route.path(),
                NavAction::Logout => "",
            };
            if target.is_empty() {
                output.push_str(&format!("{}. {}\n", i + 1, item.label));
            } else {
                output.push_str(&format!("{}. {} ({})\n", i + 1, item.label, target));
            }
        }
        output
    }
}
