use clap::Parser;
use clap_derive::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use stopwait::config::ReceiverConfig;
use stopwait::output::write_artifact;
use stopwait::session::ReceiveSession;
use tokio::net::UdpSocket;
use tracing::{info, Level};

/// Receives a file over the stop-and-wait UDP protocol and writes it to disk
///  once the sender falls silent.
#[derive(Parser)]
struct Args {
    /// where the received stream is written
    output: PathBuf,

    #[clap(long, default_value = "127.0.0.1:2121")]
    bind_address: String,

    #[clap(long, default_value = "127.0.0.1:4242")]
    peer_address: String,

    /// idle seconds after which the transfer counts as complete
    #[clap(long)]
    timeout_secs: Option<u64>,

    #[clap(short, long, default_value_t = false)]
    verbose: bool,

    #[clap(long, default_value_t = false)]
    very_verbose: bool,
}

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match (args.verbose, args.very_verbose) {
        (_, true) => Level::TRACE,
        (true, _) => Level::DEBUG,
        (false, false) => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .try_init()
        .ok();

    let mut config = ReceiverConfig::default_localhost(args.output);
    config.bind_addr = args.bind_address.parse()?;
    config.peer_addr = args.peer_address.parse()?;
    if let Some(secs) = args.timeout_secs {
        config.idle_timeout = Duration::from_secs(secs);
    }
    config.validate()?;

    let socket = Arc::new(UdpSocket::bind(config.bind_addr).await?);
    info!("bound receive socket to {:?}", socket.local_addr()?);

    let output_path = config.output_path.clone();
    let outcome = ReceiveSession::new(config, Arc::new(socket)).run().await?;

    info!("transfer complete: {} datagrams accepted, {} rejected", outcome.packets_ok, outcome.packets_wrong);

    write_artifact(&output_path, &outcome.assembled).await?;
    Ok(())
}
