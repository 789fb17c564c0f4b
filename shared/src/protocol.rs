//! Versioned, length-prefixed wire schema.
//!
//! Every message is a bincode-encoded [`Packet`] behind a u32 big-endian
//! length prefix. Frame lengths above [`MAX_FRAME_LEN`] are rejected before
//! any allocation, and the handshake carries [`PROTOCOL_VERSION`], so a
//! client and server with mismatched message shapes fail loudly instead of
//! desynchronizing.
//!
//! The blocking helpers here serve the client and tests; the server reuses
//! [`encode_frame`]/[`check_frame_len`]/[`decode_packet`] behind its async
//! socket reads.

use crate::math::Vec3;
use crate::world::{CubeDef, PlayerState};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Read, Write};

pub const PROTOCOL_VERSION: u16 = 1;
pub const DEFAULT_PORT: u16 = 5555;
/// Upper bound on a single frame body; caps per-connection allocation.
pub const MAX_FRAME_LEN: u32 = 64 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Packet {
    /// Server to client, immediately after accept.
    Welcome {
        protocol_version: u16,
        player_id: u32,
    },
    /// Server to client instead of `Welcome` when the connection is refused.
    Reject { reason: String },
    /// Client to server, handshake reply carrying the display name.
    Join { name: String },
    /// Client to server, once per tick.
    PositionUpdate { position: Vec3 },
    /// Server to client, reply to every `PositionUpdate`.
    Snapshot(WorldSnapshot),
}

/// Full authoritative state sent back on every tick. The cube list never
/// changes after server start; clients apply it once and ignore repeats.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub players: HashMap<u32, PlayerState>,
    pub cubes: Vec<CubeDef>,
}

/// Encodes a packet into a ready-to-send length-prefixed frame.
pub fn encode_frame(packet: &Packet) -> io::Result<Vec<u8>> {
    let body = bincode::serialize(packet)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    if body.len() as u64 > MAX_FRAME_LEN as u64 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "frame exceeds MAX_FRAME_LEN",
        ));
    }
    let mut frame = Vec::with_capacity(4 + body.len());
    frame.extend_from_slice(&(body.len() as u32).to_be_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

/// Validates a frame length prefix before the body is allocated.
pub fn check_frame_len(len: u32) -> io::Result<usize> {
    if len == 0 || len > MAX_FRAME_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("bad frame length {}", len),
        ));
    }
    Ok(len as usize)
}

/// Decodes a frame body produced by [`encode_frame`].
pub fn decode_packet(body: &[u8]) -> io::Result<Packet> {
    bincode::deserialize(body).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Blocking write of one framed packet.
pub fn write_packet<W: Write>(writer: &mut W, packet: &Packet) -> io::Result<()> {
    let frame = encode_frame(packet)?;
    writer.write_all(&frame)
}

/// Blocking read of one framed packet.
pub fn read_packet<R: Read>(reader: &mut R) -> io::Result<Packet> {
    let mut prefix = [0u8; 4];
    reader.read_exact(&mut prefix)?;
    let len = check_frame_len(u32::from_be_bytes(prefix))?;
    let mut body = vec![0u8; len];
    reader.read_exact(&mut body)?;
    decode_packet(&body)
}
