//! Palaver CLI entry point.

use clap::Parser;
use palaver_client::{Endpoint, SessionIdentity};

use crate::runtime::Runtime;

mod runtime;

/// Line-oriented terminal client for the Palaver chat service
#[derive(Parser, Debug)]
#[command(name = "palaver")]
#[command(about = "Terminal client for the Palaver chat service")]
#[command(version)]
struct Args {
    /// Server host (and port) to connect to
    #[arg(short, long, default_value = "localhost:8000")]
    server: String,

    /// Username to chat as
    #[arg(short, long)]
    user: String,

    /// Group room to join on startup
    #[arg(short, long, conflicts_with = "dm")]
    room: Option<String>,

    /// Peer username to open a direct conversation with instead
    #[arg(short, long)]
    dm: Option<String>,

    /// Connect with wss instead of ws
    #[arg(long)]
    secure: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let identity = match (&args.room, &args.dm) {
        (_, Some(peer)) => SessionIdentity::direct(peer, &args.user),
        (Some(room), None) => SessionIdentity::group(room, &args.user),
        (None, None) => SessionIdentity::group("general", &args.user),
    };

    let endpoint = Endpoint { host: args.server, secure: args.secure };

    Ok(Runtime::new(endpoint, args.user, identity).run().await?)
}
