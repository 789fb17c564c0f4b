use clap::Parser;
use log::info;
use server::game::generate_world;
use server::network::{Server, ServerConfig};
use std::time::Duration;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = shared::DEFAULT_PORT)]
    port: u16,

    /// Number of random world cubes generated at startup
    #[arg(short, long, default_value = "30")]
    cubes: usize,

    /// Maximum concurrent players
    #[arg(short, long, default_value = "32")]
    max_clients: usize,

    /// Seconds a silent connection is kept before being dropped
    #[arg(long, default_value = "30")]
    idle_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let world = generate_world(args.cubes, &mut rand::thread_rng());
    info!("Generated {} world cubes", world.len());

    let config = ServerConfig {
        max_clients: args.max_clients,
        idle_timeout: Duration::from_secs(args.idle_timeout),
    };
    let address = format!("{}:{}", args.host, args.port);
    let server = Server::bind(&address, world, config).await?;

    tokio::select! {
        result = server.run() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
