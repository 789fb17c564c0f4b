//! # Authoritative world server
//!
//! Holds the single source of truth for the shared world: the static cube
//! list generated once at startup and the roster of connected players.
//! Clients only ever report their own position; everything they render comes
//! back from the snapshots built here.
//!
//! ## Architecture
//!
//! One tokio task per accepted connection. All tasks share the player
//! registry behind a single `RwLock`, and each handler only writes its own
//! player's entry, so writers never contend over the same key. The cube list
//! is generated before the listener starts accepting and is read-only from
//! then on, shared via `Arc` with no further synchronization.
//!
//! Connections live until a read fails or stays silent past the idle
//! timeout. There is no retry or reconnect handling: any failure tears the
//! session down, removes the player from the roster, and later snapshots to
//! the remaining clients simply no longer contain them.
//!
//! ## Module Organization
//!
//! - `game`: world generation and the player registry.
//! - `network`: listener, per-connection handshake/update loop, framed I/O.

pub mod game;
pub mod network;
