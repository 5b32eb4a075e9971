// ── Protected navigation ──
//
// Dashboard views, their access rules, and the sidebar. Access derives
// only from whether a session exists; role gating is cosmetic.

use strum::{Display, EnumIter, IntoEnumIterator};

use crate::session::Session;

const BASE_TITLE: &str = "CoBox";

/// Whether a session is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Authenticated,
    Unauthenticated,
}

impl AuthState {
    pub fn of(session: Option<&Session>) -> Self {
        if session.is_some() {
            Self::Authenticated
        } else {
            Self::Unauthenticated
        }
    }
}

/// Every page of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum View {
    Login,
    Register,
    Home,
    #[strum(to_string = "Driver")]
    Drivers,
    Vehicles,
    Orders,
    Incidents,
    #[strum(to_string = "Maintenance Orders")]
    Maintenance,
    Routes,
}

impl View {
    /// Public views render without a session.
    pub fn is_protected(self) -> bool {
        !matches!(self, Self::Login | Self::Register)
    }

    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Home => "/dashboard",
            Self::Drivers => "/dashboard/driver",
            Self::Vehicles => "/dashboard/vehicles",
            Self::Orders => "/dashboard/orders",
            Self::Incidents => "/dashboard/incidents",
            Self::Maintenance => "/dashboard/maintenance",
            Self::Routes => "/dashboard/routes",
        }
    }

    /// Resolve a URL-style path. `/` is the dashboard home.
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return Some(Self::Home);
        }
        Self::iter().find(|v| v.path() == trimmed)
    }

    /// Browser-style title, e.g. `"Vehicles | CoBox"`.
    pub fn page_title(self) -> String {
        format!("{self} | {BASE_TITLE}")
    }
}

/// Outcome of routing to a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(View),
    Redirect(View),
}

/// Route `view` under `state`. Every protected view redirects to the
/// single login page while unauthenticated.
pub fn guard(state: AuthState, view: View) -> Navigation {
    match state {
        AuthState::Unauthenticated if view.is_protected() => Navigation::Redirect(View::Login),
        _ => Navigation::Render(view),
    }
}

/// Views listed in the sidebar, in display order. `Routes` is shown to
/// managers only.
pub fn sidebar(session: &Session) -> Vec<View> {
    View::iter()
        .filter(|v| v.is_protected())
        .filter(|v| *v != View::Routes || session.is_manager())
        .collect()
}
