//! Navigation guard and the router hook it is installed through.

pub mod guard;
pub mod router;

pub use guard::{NavigationDecision, NavigationGuard, RouteMeta};
pub use router::{Navigation, Router, StaticRouter};
