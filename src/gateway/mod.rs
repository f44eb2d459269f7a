use crate::core::Community;

/// Access to the routing daemon carrying the side-channel.
///
/// Both directions are single blocking round trips with no retry and no
/// internal timeout; wrap calls in `tokio::time::timeout` to bound them.
/// Errors are opaque transport failures.
#[async_trait::async_trait]
pub trait AdvertisementGateway: Send + Sync {
    /// All communities currently attached to routes matching `prefix`, in
    /// the order the daemon reports them.
    async fn fetch_communities(&mut self, prefix: &str) -> anyhow::Result<Vec<Community>>;

    /// Re-announce our prefix carrying the two protocol communities on
    /// `marker_as`, leaving unrelated communities alone.
    async fn publish(&mut self, marker_as: u16, counter: u16, position: u16) -> anyhow::Result<()>;

    /// Drop the protocol communities and return to the baseline announcement.
    async fn reset(&mut self) -> anyhow::Result<()>;
}

#[cfg(unix)]
pub mod bird;
#[cfg(unix)]
pub mod control;
pub mod in_memory;
pub mod template;
