pub mod core;
pub mod subscribers;


pub use core::Evaluator;
pub use subscribers::{PermissionObserver, SubscriptionId};
