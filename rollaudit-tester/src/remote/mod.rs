mod auth;
mod roll;
mod session;
#[cfg(test)]
mod test_server;

pub use auth::CognitoAuthenticator;
pub use roll::GraphqlRollClient;
pub use session::http_client;

use async_trait::async_trait;
use rollaudit_core::{DieSpec, RollOutcome};

/// A single-attempt source of rolls.
///
/// Implementations perform at most one round trip per call and never retry;
/// every failure comes back as a failed outcome rather than an error.
#[async_trait]
pub trait RollService: Send + Sync {
    async fn roll_once(&self, die: &DieSpec) -> RollOutcome;
}
