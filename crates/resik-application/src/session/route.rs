//! Cold-start route selection.

use resik_core::session::SessionRecord;

/// Entry points of the client UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialRoute {
    /// Unauthenticated entry point.
    Login,
    AdminDashboard,
    UserDashboard,
}

impl InitialRoute {
    /// Decides the route for a cold start from the persisted session:
    /// no valid session lands on the login screen, otherwise the dashboard
    /// matching the user's role.
    pub fn for_session(record: Option<&SessionRecord>) -> Self {
        match record {
            None => InitialRoute::Login,
            Some(record) if record.user.role == "admin" => InitialRoute::AdminDashboard,
            Some(_) => InitialRoute::UserDashboard,
        }
    }
}
