//! Session lifecycle services.
//!
//! # Module Structure
//!
//! - `manager`: session state and persistence mediation (`SessionManager`)
//! - `watchdog`: inactivity detection (`InactivityWatchdog`)
//! - `route`: cold-start route selection (`InitialRoute`)

mod manager;
mod route;
mod watchdog;

pub use manager::{LogoutReason, SessionEvent, SessionManager};
pub use route::InitialRoute;
pub use watchdog::{InactivityWatchdog, TimeoutHandler};
