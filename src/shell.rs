//! Routes and the transient layout state of the application shell.

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Route {
    #[default]
    Dashboard,
    Contacts,
    Deals,
    Activities,
}

impl Route {
    /// Sidebar order.
    pub const ALL: [Route; 4] = [
        Route::Dashboard,
        Route::Contacts,
        Route::Deals,
        Route::Activities,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Self::Dashboard => "/",
            Self::Contacts => "/contacts",
            Self::Deals => "/deals",
            Self::Activities => "/activities",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Contacts => "Contacts",
            Self::Deals => "Deals",
            Self::Activities => "Activities",
        }
    }

    /// Symbolic icon name used in the sidebar.
    pub fn icon_name(self) -> &'static str {
        match self {
            Self::Dashboard => "view-grid-symbolic",
            Self::Contacts => "system-users-symbolic",
            Self::Deals => "emblem-documents-symbolic",
            Self::Activities => "x-office-calendar-symbolic",
        }
    }

    /// Stable widget name for stack pages.
    pub fn id(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Contacts => "contacts",
            Self::Deals => "deals",
            Self::Activities => "activities",
        }
    }

    /// Unknown paths fall back to the dashboard. A trailing slash is ignored.
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|route| route.path() == normalized)
            .unwrap_or_default()
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|route| route.id() == id)
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// Sidebar visibility and the active page. The sidebar starts closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShellState {
    sidebar_open: bool,
    route: Route,
}

impl ShellState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Header menu button.
    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_open = !self.sidebar_open;
        self.sidebar_open
    }

    pub fn close_sidebar(&mut self) {
        self.sidebar_open = false;
    }

    /// Switches page and closes the sidebar. Returns whether the route changed.
    pub fn navigate(&mut self, route: Route) -> bool {
        self.close_sidebar();
        let changed = self.route != route;
        self.route = route;
        changed
    }

    pub fn navigate_path(&mut self, path: &str) -> bool {
        self.navigate(Route::from_path(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn routes_are_unique() {
        let paths: HashSet<_> = Route::ALL.iter().map(|r| r.path()).collect();
        let titles: HashSet<_> = Route::ALL.iter().map(|r| r.title()).collect();
        let ids: HashSet<_> = Route::ALL.iter().map(|r| r.id()).collect();
        assert_eq!(paths.len(), Route::ALL.len());
        assert_eq!(titles.len(), Route::ALL.len());
        assert_eq!(ids.len(), Route::ALL.len());
    }

    #[test]
    fn paths_round_trip() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), route);
            assert_eq!(Route::from_id(route.id()), Some(route));
        }
        assert_eq!(Route::from_path("/deals/"), Route::Deals);
        assert_eq!(Route::from_path(""), Route::Dashboard);
    }

    #[test]
    fn unknown_path_is_dashboard() {
        assert_eq!(Route::from_path("/reports"), Route::Dashboard);
        assert_eq!(Route::from_path("contacts"), Route::Dashboard);
        assert_eq!(Route::from_id("reports"), None);
    }

    #[test]
    fn toggle_flips_and_close_always_closes() {
        let mut shell = ShellState::new();
        assert!(!shell.sidebar_open());
        assert!(shell.toggle_sidebar());
        assert!(!shell.toggle_sidebar());
        shell.close_sidebar();
        assert!(!shell.sidebar_open());
        shell.toggle_sidebar();
        shell.close_sidebar();
        assert!(!shell.sidebar_open());
    }

    #[test]
    fn navigating_closes_sidebar() {
        let mut shell = ShellState::new();
        shell.toggle_sidebar();
        assert!(shell.navigate(Route::Deals));
        assert!(!shell.sidebar_open());
        assert_eq!(shell.route(), Route::Deals);
        assert!(!shell.navigate_path("/deals"));
        assert!(shell.navigate_path("/nowhere"));
        assert_eq!(shell.route(), Route::Dashboard);
    }
}
