//! Server network layer: listener, per-connection sessions and framed TCP I/O.

use crate::game::{random_player_color, PlayerRegistry};
use log::{debug, info, warn};
use shared::protocol::{check_frame_len, decode_packet, encode_frame};
use shared::{CubeDef, Packet, WorldSnapshot, PROTOCOL_VERSION};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::RwLock;
use tokio::time::timeout;

/// Tunables for the accept loop and connection handlers.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Connections beyond this many registered players are refused.
    pub max_clients: usize,
    /// A connection that stays silent longer than this is dropped, so a
    /// stalled client cannot pin its task forever.
    pub idle_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            max_clients: 32,
            idle_timeout: Duration::from_secs(30),
        }
    }
}

/// Listening server.
///
/// The world cube list is generated before binding and shared read-only;
/// the player registry is the only mutable state shared between connection
/// tasks.
pub struct Server {
    listener: TcpListener,
    registry: Arc<RwLock<PlayerRegistry>>,
    world: Arc<Vec<CubeDef>>,
    config: ServerConfig,
}

impl Server {
    pub async fn bind(addr: &str, world: Vec<CubeDef>, config: ServerConfig) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on {}", listener.local_addr()?);
        Ok(Server {
            listener,
            registry: Arc::new(RwLock::new(PlayerRegistry::new())),
            world: Arc::new(world),
            config,
        })
    }

    /// Address actually bound, for callers that asked for port 0.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept loop: spawns one task per connection and runs until the
    /// process exits.
    pub async fn run(self) -> io::Result<()> {
        loop {
            let (stream, addr) = self.listener.accept().await?;
            debug!("New connection from {}", addr);

            let registry = Arc::clone(&self.registry);
            let world = Arc::clone(&self.world);
            let config = self.config.clone();
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, addr, registry, world, config).await {
                    debug!("Connection {} closed: {}", addr, e);
                }
            });
        }
    }
}

/// One client session, from handshake to cleanup.
async fn handle_connection(
    mut stream: TcpStream,
    addr: SocketAddr,
    registry: Arc<RwLock<PlayerRegistry>>,
    world: Arc<Vec<CubeDef>>,
    config: ServerConfig,
) -> io::Result<()> {
    stream.set_nodelay(true)?;

    let player_id = {
        let mut registry = registry.write().await;
        if registry.len() >= config.max_clients {
            drop(registry);
            warn!("Rejecting {}: server full", addr);
            write_packet(
                &mut stream,
                &Packet::Reject {
                    reason: "server full".to_string(),
                },
            )
            .await?;
            return Ok(());
        }
        registry.allocate_id()
    };

    write_packet(
        &mut stream,
        &Packet::Welcome {
            protocol_version: PROTOCOL_VERSION,
            player_id,
        },
    )
    .await?;

    // Handshake: the player only enters the roster once a valid name
    // arrives. Anything else closes the connection with no entry to clean up.
    let name = match timeout(config.idle_timeout, read_packet(&mut stream)).await {
        Ok(Ok(Packet::Join { name })) if !name.trim().is_empty() => name,
        Ok(Ok(_)) => {
            warn!("Player {} from {} sent an invalid handshake", player_id, addr);
            return Ok(());
        }
        Ok(Err(e)) => {
            warn!(
                "Player {} from {} failed to send a name: {}",
                player_id, addr, e
            );
            return Ok(());
        }
        Err(_) => {
            warn!("Player {} from {} timed out during handshake", player_id, addr);
            return Ok(());
        }
    };

    {
        let mut registry = registry.write().await;
        registry.register(player_id, name, random_player_color(&mut rand::thread_rng()));
    }

    let result = serve_player(&mut stream, player_id, &registry, &world, &config).await;

    registry.write().await.remove(player_id);
    result
}

/// Update/snapshot loop. Any read, decode or write failure (or idle timeout)
/// is terminal for the session; other connections are unaffected.
async fn serve_player(
    stream: &mut TcpStream,
    player_id: u32,
    registry: &RwLock<PlayerRegistry>,
    world: &[CubeDef],
    config: &ServerConfig,
) -> io::Result<()> {
    loop {
        let packet = match timeout(config.idle_timeout, read_packet(stream)).await {
            Ok(packet) => packet?,
            Err(_) => {
                return Err(io::Error::new(io::ErrorKind::TimedOut, "idle timeout"));
            }
        };

        match packet {
            Packet::PositionUpdate { position } => {
                let players = {
                    let mut registry = registry.write().await;
                    registry.update_position(player_id, position);
                    registry.players()
                };
                let snapshot = WorldSnapshot {
                    players,
                    cubes: world.to_vec(),
                };
                write_packet(stream, &Packet::Snapshot(snapshot)).await?;
            }
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "unexpected packet during session",
                ));
            }
        }
    }
}

/// Writes one framed packet to an async stream.
pub async fn write_packet<W>(writer: &mut W, packet: &Packet) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let frame = encode_frame(packet)?;
    writer.write_all(&frame).await
}

/// Reads one framed packet from an async stream.
pub async fn read_packet<R>(reader: &mut R) -> io::Result<Packet>
where
    R: AsyncRead + Unpin,
{
    let len = reader.read_u32().await?;
    let len = check_frame_len(len)?;
    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await?;
    decode_packet(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::protocol::MAX_FRAME_LEN;
    use shared::Vec3;

    async fn start_test_server(world: Vec<CubeDef>, config: ServerConfig) -> SocketAddr {
        let server = Server::bind("127.0.0.1:0", world, config).await.unwrap();
        let addr = server.local_addr().unwrap();
        tokio::spawn(server.run());
        addr
    }

    #[tokio::test]
    async fn test_framed_packet_roundtrip() {
        let (mut a, mut b) = tokio::io::duplex(1024);
        write_packet(
            &mut a,
            &Packet::Join {
                name: "test".to_string(),
            },
        )
        .await
        .unwrap();

        match read_packet(&mut b).await.unwrap() {
            Packet::Join { name } => assert_eq!(name, "test"),
            other => panic!("Unexpected packet: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_oversized_frame_is_rejected_before_allocation() {
        let (mut a, mut b) = tokio::io::duplex(64);
        a.write_all(&(MAX_FRAME_LEN + 1).to_be_bytes()).await.unwrap();

        let err = read_packet(&mut b).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn test_welcome_carries_sequential_ids() {
        let addr = start_test_server(Vec::new(), ServerConfig::default()).await;

        for expected in 1..=3u32 {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            match read_packet(&mut stream).await.unwrap() {
                Packet::Welcome {
                    protocol_version,
                    player_id,
                } => {
                    assert_eq!(protocol_version, PROTOCOL_VERSION);
                    assert_eq!(player_id, expected);
                }
                other => panic!("Unexpected packet: {:?}", other),
            }
            // Dropping without a Join consumes the id but registers nothing.
        }
    }

    #[tokio::test]
    async fn test_full_server_rejects_connection() {
        let config = ServerConfig {
            max_clients: 0,
            idle_timeout: Duration::from_secs(5),
        };
        let addr = start_test_server(Vec::new(), config).await;

        let mut stream = TcpStream::connect(addr).await.unwrap();
        match read_packet(&mut stream).await.unwrap() {
            Packet::Reject { reason } => assert_eq!(reason, "server full"),
            other => panic!("Unexpected packet: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_session_update_and_snapshot() {
        let world = vec![CubeDef {
            position: Vec3::new(0.0, -2.0, 0.0),
            size: Vec3::new(150.0, 1.0, 150.0),
            color: (124, 252, 0),
        }];
        let addr = start_test_server(world, ServerConfig::default()).await;

        let mut stream = TcpStream::connect(addr).await.unwrap();
        let player_id = match read_packet(&mut stream).await.unwrap() {
            Packet::Welcome { player_id, .. } => player_id,
            other => panic!("Unexpected packet: {:?}", other),
        };
        write_packet(
            &mut stream,
            &Packet::Join {
                name: "dave".to_string(),
            },
        )
        .await
        .unwrap();

        let position = Vec3::new(4.0, 5.0, -2.0);
        write_packet(&mut stream, &Packet::PositionUpdate { position })
            .await
            .unwrap();

        match read_packet(&mut stream).await.unwrap() {
            Packet::Snapshot(snapshot) => {
                assert_eq!(snapshot.cubes.len(), 1);
                let me = &snapshot.players[&player_id];
                assert_eq!(me.position, position);
                assert_eq!(me.name, "dave");
            }
            other => panic!("Unexpected packet: {:?}", other),
        }
    }
}
