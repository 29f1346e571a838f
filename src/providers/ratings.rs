//! Third-party ratings brokered provider.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::providers::client::ProviderClient;
use crate::providers::generic::{self, ProviderOutcome};

pub async fn fetch(
    client: &ProviderClient,
    text: &str,
    limit: usize,
    deadline: Duration,
    cancel: &CancellationToken,
) -> ProviderOutcome {
    generic::fetch(client, "ratings", "ratings", text, limit, deadline, cancel).await
}
