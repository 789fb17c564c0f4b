//! Blocking client session: one request/response exchange per tick.

use log::info;
use shared::protocol::{read_packet, write_packet};
use shared::{Packet, Vec3, WorldSnapshot, PROTOCOL_VERSION};
use std::io;
use std::net::{Shutdown, TcpStream};

/// A connected session.
///
/// Every call blocks the frame loop for the full round trip, so the
/// effective tick rate is bounded by network latency. Any transport error is
/// terminal: the caller drops the session and returns to the title screen.
#[derive(Debug)]
pub struct ServerConnection {
    stream: TcpStream,
    player_id: u32,
}

impl ServerConnection {
    /// Connects, receives the server-assigned id and registers `name`.
    pub fn connect(addr: &str, name: &str) -> io::Result<Self> {
        let mut stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;

        let player_id = match read_packet(&mut stream)? {
            Packet::Welcome {
                protocol_version,
                player_id,
            } => {
                if protocol_version != PROTOCOL_VERSION {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!(
                            "server speaks protocol v{}, client speaks v{}",
                            protocol_version, PROTOCOL_VERSION
                        ),
                    ));
                }
                player_id
            }
            Packet::Reject { reason } => {
                return Err(io::Error::new(io::ErrorKind::ConnectionRefused, reason));
            }
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "expected a welcome packet",
                ));
            }
        };

        write_packet(
            &mut stream,
            &Packet::Join {
                name: name.to_string(),
            },
        )?;
        info!("Connected to {} as player {}", addr, player_id);

        Ok(ServerConnection { stream, player_id })
    }

    pub fn player_id(&self) -> u32 {
        self.player_id
    }

    /// Sends the local position and blocks for the full snapshot reply.
    pub fn exchange(&mut self, position: Vec3) -> io::Result<WorldSnapshot> {
        write_packet(&mut self.stream, &Packet::PositionUpdate { position })?;
        match read_packet(&mut self.stream)? {
            Packet::Snapshot(snapshot) => Ok(snapshot),
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "expected a snapshot reply",
            )),
        }
    }

    /// Closes the connection; safe to call on an already-dead stream.
    pub fn shutdown(&self) {
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}
