use std::path::PathBuf;

use anyhow::Context;

use crate::config::SignalConfig;
use crate::core::community::{self, Community};
use crate::gateway::control::{BirdControl, Reply, NETWORK_NOT_FOUND};
use crate::gateway::template;
use crate::gateway::AdvertisementGateway;

/// Gateway backed by a local BIRD daemon.
///
/// Reads go through `show route all`; writes re-render the daemon's
/// configuration from a template and ask BIRD to `configure`. Every call
/// opens its own control connection and closes it before returning.
#[derive(Debug, Clone)]
pub struct BirdGateway {
    socket_path: PathBuf,
    template_path: PathBuf,
    config_path: PathBuf,
}

impl BirdGateway {
    pub fn new(config: &SignalConfig) -> Self {
        Self {
            socket_path: config.socket_path.clone(),
            template_path: config.template_path.clone(),
            config_path: config.config_path.clone(),
        }
    }

    /// Runs a single command on a fresh connection and returns the raw reply.
    async fn round_trip(&self, command: &str) -> anyhow::Result<Reply> {
        let mut control = BirdControl::connect(&self.socket_path).await?;
        let reply = control.request(command).await?;
        control.close().await?;
        Ok(reply)
    }

    async fn checked_round_trip(&self, command: &str) -> anyhow::Result<Reply> {
        let reply = self.round_trip(command).await?;
        if reply.is_error() {
            anyhow::bail!("bird rejected {command:?} with {}: {}", reply.code, reply.text);
        }
        Ok(reply)
    }

    async fn rewrite_and_reload(&self, block: &str) -> anyhow::Result<()> {
        template::render_file(&self.template_path, &self.config_path, block).await?;
        self.checked_round_trip("configure")
            .await
            .context("reloading bird configuration")?;
        Ok(())
    }
}

/// Extracts every standard community from a route dump, skipping tuples
/// that do not fit 16 bits.
pub fn communities_from_dump(dump: &str) -> Vec<Community> {
    community::scan(dump)
        .filter_map(|found| match found {
            Ok(c) => Some(c),
            Err(e) => {
                log::warn!("skipping community in route dump: {e}");
                None
            }
        })
        .collect()
}

#[async_trait::async_trait]
impl AdvertisementGateway for BirdGateway {
    async fn fetch_communities(&mut self, prefix: &str) -> anyhow::Result<Vec<Community>> {
        let command = format!("show route all {prefix}");
        let reply = self
            .round_trip(&command)
            .await
            .with_context(|| format!("fetching routes for {prefix}"))?;
        if reply.code == NETWORK_NOT_FOUND {
            log::debug!("no route for {prefix} yet");
            return Ok(Vec::new());
        }
        if reply.is_error() {
            anyhow::bail!(
                "fetching routes for {prefix}: bird rejected {command:?} with {}: {}",
                reply.code,
                reply.text
            );
        }
        let communities = communities_from_dump(&reply.text);
        log::debug!("{} communities on {prefix}", communities.len());
        Ok(communities)
    }

    async fn publish(&mut self, marker_as: u16, counter: u16, position: u16) -> anyhow::Result<()> {
        let block = template::community_block(marker_as, counter, position);
        self.rewrite_and_reload(&block).await?;
        log::info!(
            "published ({marker_as},{position}) ({marker_as},{counter}) via {}",
            self.config_path.display()
        );
        Ok(())
    }

    async fn reset(&mut self) -> anyhow::Result<()> {
        self.rewrite_and_reload("").await?;
        log::info!("reset announcement via {}", self.config_path.display());
        Ok(())
    }
}
