use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::core::Community;
use crate::gateway::AdvertisementGateway;

#[derive(Debug, Default)]
struct Announcement {
    /// Communities unrelated to the side-channel (or injected by tests).
    base: Vec<Community>,
    /// Communities written by `publish`.
    signal: Vec<Community>,
}

impl Announcement {
    fn communities(&self) -> Vec<Community> {
        self.base.iter().chain(self.signal.iter()).copied().collect()
    }
}

#[derive(Debug)]
struct Route {
    prefix: String,
    announcement: Mutex<Announcement>,
}

/// Gateway standing in for two routers peering with each other.
///
/// Each side announces one prefix; fetching the other side's prefix returns
/// whatever that side last published.
#[derive(Debug, Clone)]
pub struct InMemoryGateway {
    own: Arc<Route>,
    peer: Arc<Route>,
    offline: Arc<AtomicBool>,
}

impl InMemoryGateway {
    /// Two linked gateways announcing `prefix_a` and `prefix_b` respectively.
    pub fn pair(prefix_a: &str, prefix_b: &str) -> (Self, Self) {
        let a = Arc::new(Route {
            prefix: prefix_a.to_string(),
            announcement: Mutex::new(Announcement::default()),
        });
        let b = Arc::new(Route {
            prefix: prefix_b.to_string(),
            announcement: Mutex::new(Announcement::default()),
        });
        (
            Self {
                own: a.clone(),
                peer: b.clone(),
                offline: Arc::new(AtomicBool::new(false)),
            },
            Self {
                own: b,
                peer: a,
                offline: Arc::new(AtomicBool::new(false)),
            },
        )
    }

    /// Adds a community to this side's baseline announcement.
    pub async fn inject(&self, community: Community) {
        self.own.announcement.lock().await.base.push(community);
    }

    /// What this side currently announces.
    pub async fn announced(&self) -> Vec<Community> {
        self.own.announcement.lock().await.communities()
    }

    /// Makes every subsequent call on this handle fail until cleared.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> anyhow::Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("routing daemon unreachable"));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl AdvertisementGateway for InMemoryGateway {
    async fn fetch_communities(&mut self, prefix: &str) -> anyhow::Result<Vec<Community>> {
        self.check_online()?;
        let mut found = Vec::new();
        for route in [&self.own, &self.peer] {
            if route.prefix == prefix {
                found.extend(route.announcement.lock().await.communities());
            }
        }
        Ok(found)
    }

    async fn publish(&mut self, marker_as: u16, counter: u16, position: u16) -> anyhow::Result<()> {
        self.check_online()?;
        let mut announcement = self.own.announcement.lock().await;
        announcement.signal = vec![
            Community::new(marker_as, position),
            Community::new(marker_as, counter),
        ];
        Ok(())
    }

    async fn reset(&mut self) -> anyhow::Result<()> {
        self.check_online()?;
        self.own.announcement.lock().await.signal.clear();
        Ok(())
    }
}
