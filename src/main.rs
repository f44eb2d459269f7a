#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use std::path::PathBuf;

#[cfg(feature = "std")]
use bgp_battleship::{
    init_logging, self_test, AdvertisementGateway, GameState, SignalConfig, SignalNode,
    BOARD_SIZE,
};
#[cfg(feature = "std")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "std")]
use tokio::time::Duration;

#[derive(Parser)]
#[command(author, version, about = "Battleship moves carried in BGP communities", long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(flatten)]
    signal: SignalArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
#[cfg(feature = "std")]
struct SignalArgs {
    /// JSON file with a SignalConfig; flags below override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// The shared community AS used to communicate on.
    #[arg(long = "community-asn", global = true)]
    marker_as: Option<u16>,
    /// The prefix of the other side.
    #[arg(long = "peer-prefix", global = true)]
    prefix: Option<String>,
    /// Where to find the template file.
    #[arg(long = "template-file", global = true)]
    template_path: Option<PathBuf>,
    /// Where to write the config file.
    #[arg(long = "conf-file", global = true)]
    config_path: Option<PathBuf>,
    /// BIRD control socket.
    #[arg(long = "sock-file", global = true)]
    socket_path: Option<PathBuf>,
}

#[cfg(feature = "std")]
impl SignalArgs {
    fn resolve(self) -> anyhow::Result<SignalConfig> {
        let mut config = match &self.config {
            Some(path) => SignalConfig::from_file(path)?,
            None => SignalConfig::default(),
        };
        if let Some(marker_as) = self.marker_as {
            config.marker_as = marker_as;
        }
        if let Some(prefix) = self.prefix {
            config.prefix = prefix;
        }
        if let Some(path) = self.template_path {
            config.template_path = path;
        }
        if let Some(path) = self.config_path {
            config.config_path = path;
        }
        if let Some(path) = self.socket_path {
            config.socket_path = path;
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
#[cfg(feature = "std")]
enum Commands {
    /// Print the opponent's current state as JSON.
    Read,
    /// Announce a move.
    Announce {
        #[arg(long)]
        counter: u16,
        #[arg(long)]
        x: u8,
        #[arg(long)]
        y: u8,
        #[arg(long, default_value_t = 0)]
        outcome: u8,
        /// Wrap out-of-range values into their bit width instead of refusing them.
        #[arg(long)]
        truncate: bool,
    },
    /// Remove our protocol communities from the announcement.
    Reset,
    /// Block until the opponent announces a new move, then print it as JSON.
    Wait {
        /// Move counter already seen; omitted means any complete state counts.
        #[arg(long)]
        last: Option<u16>,
        #[arg(long, default_value_t = 1000)]
        poll_ms: u64,
    },
    /// Check the position codec against every square of the board.
    SelfTest {
        #[arg(long, default_value_t = BOARD_SIZE)]
        board_size: u8,
    },
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::SelfTest { board_size } => run_self_test(board_size),
        command => {
            let config = cli.signal.resolve()?;
            let node = SignalNode::new(gateway(&config)?, config);
            run_node(node, command).await
        }
    }
}

#[cfg(feature = "std")]
fn run_self_test(board_size: u8) -> anyhow::Result<()> {
    let mismatches = self_test(board_size)?;
    for m in &mismatches {
        eprintln!(
            "Logic error: sent ({}, {}) got ({}, {})",
            m.sent.0, m.sent.1, m.got.0, m.got.1
        );
    }
    if !mismatches.is_empty() {
        anyhow::bail!("{} squares failed to round-trip", mismatches.len());
    }
    println!("codec ok for {board_size}x{board_size} board");
    Ok(())
}

#[cfg(feature = "std")]
async fn run_node(mut node: SignalNode, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Read => {
            let state = node.read_opponent().await?;
            println!("{}", serde_json::to_string(&state)?);
        }
        Commands::Announce {
            counter,
            x,
            y,
            outcome,
            truncate,
        } => {
            let state = GameState::new(counter, x, y, outcome);
            if truncate {
                node.announce(&state).await?;
            } else {
                node.announce_checked(&state).await?;
            }
        }
        Commands::Reset => node.reset().await?,
        Commands::Wait { last, poll_ms } => {
            let state = node
                .wait_for_move(last, Duration::from_millis(poll_ms))
                .await?;
            println!("{}", serde_json::to_string(&state)?);
        }
        Commands::SelfTest { board_size } => run_self_test(board_size)?,
    }
    Ok(())
}

#[cfg(all(feature = "std", unix))]
fn gateway(config: &SignalConfig) -> anyhow::Result<Box<dyn AdvertisementGateway>> {
    Ok(Box::new(bgp_battleship::BirdGateway::new(config)))
}

#[cfg(all(feature = "std", not(unix)))]
fn gateway(_config: &SignalConfig) -> anyhow::Result<Box<dyn AdvertisementGateway>> {
    anyhow::bail!("the BIRD gateway needs a Unix control socket")
}
