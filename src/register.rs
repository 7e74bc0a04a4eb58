//! Entry point used by host applications.

use tracing::debug;

use crate::config::AclConfig;
use crate::error::AclError;
use crate::evaluator::Evaluator;
use crate::navigation::{NavigationGuard, Router};

/// Builds the evaluator and, when a router is given, installs the navigation guard into it.
///
/// A router requires `notfound` to be configured. Without a router no guard is installed.
pub fn register(config: AclConfig, router: Option<&mut dyn Router>) -> Result<Evaluator, AclError> {
    if router.is_some() && config.notfound.is_none() {
        return Err(AclError::MissingNotFound);
    }

    let evaluator = Evaluator::new(config);
    if let Some(router) = router {
        router.before_each(NavigationGuard::from_evaluator(evaluator.clone())?);
        debug!(notfound = evaluator.notfound(), "navigation guard installed");
    }
    Ok(evaluator)
}
