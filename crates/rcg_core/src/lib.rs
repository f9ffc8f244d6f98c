//! # rcg_core - Soccer Simulation Game Log Serialization
//!
//! Reading and writing of RCG game logs: the recorded stream of cycle
//! snapshots, referee play modes, team state and match parameters a
//! soccer simulation server produces while a match runs.
//!
//! ## Features
//! - All six log versions: binary v1-v3 and text v4-v6
//! - Streaming parser with a callback [`parser::Handler`] and cooperative abort
//! - Version sniffing from the first bytes of a stream
//! - One canonical in-memory representation shared by every version

pub mod codec;
pub mod error;
pub mod formats;
pub mod io;
pub mod param;
pub mod parser;
pub mod serializer;
pub mod types;

// Re-export the everyday surface
pub use error::{RcgError, Result};
pub use formats::LogVersion;
pub use io::{load_rcg, save_collector, save_disp};
pub use parser::{Handler, Parser, RecordCollector};
pub use serializer::{for_version, Serializer};
pub use types::{
    Ball, CommandCount, DispInfo, DrawInfo, PlayMode, Player, PlayerParam, PlayerType,
    ServerParam, Show, Side, Stamina, Team, Vec2, View,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version written when the caller does not ask for one.
pub const DEFAULT_LOG_VERSION: LogVersion = LogVersion::V4;
