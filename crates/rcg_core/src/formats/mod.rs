//! Versioned wire layouts of the RCG log format.
//!
//! Each submodule holds the fixed-layout records of one binary version and
//! the conversions between those records and the canonical types. A version
//! is append-only: once shipped, its structs never change.

pub mod v1;
pub mod v2;
pub mod v3;

use serde::{Deserialize, Serialize};

/// Record mode tags shared by every binary version.
pub const NO_INFO: i16 = 0;
pub const SHOW_MODE: i16 = 1;
pub const MSG_MODE: i16 = 2;
pub const DRAW_MODE: i16 = 3;
pub const BLANK_MODE: i16 = 4;
pub const PM_MODE: i16 = 5;
pub const TEAM_MODE: i16 = 6;
pub const PT_MODE: i16 = 7;
pub const PARAM_MODE: i16 = 8;
pub const PPARAM_MODE: i16 = 9;

/// Message boards for msg records.
pub const MSG_BOARD_LOG: i16 = 1;
pub const MSG_BOARD_INFO: i16 = 2;

/// The closed set of supported log versions.
///
/// v1 is headerless; v2/v3 open with `ULG` plus a raw version byte; v4-v6
/// open with an ASCII header line (`ULG4\n` ... `ULG6\n`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogVersion {
    V1,
    V2,
    V3,
    V4,
    V5,
    V6,
}

impl LogVersion {
    pub fn as_u8(&self) -> u8 {
        match self {
            LogVersion::V1 => 1,
            LogVersion::V2 => 2,
            LogVersion::V3 => 3,
            LogVersion::V4 => 4,
            LogVersion::V5 => 5,
            LogVersion::V6 => 6,
        }
    }

    pub fn from_u8(v: u8) -> Option<LogVersion> {
        match v {
            1 => Some(LogVersion::V1),
            2 => Some(LogVersion::V2),
            3 => Some(LogVersion::V3),
            4 => Some(LogVersion::V4),
            5 => Some(LogVersion::V5),
            6 => Some(LogVersion::V6),
            _ => None,
        }
    }

    /// Bytes a serializer writes before the first record. Empty for v1.
    pub fn header(&self) -> &'static [u8] {
        match self {
            LogVersion::V1 => b"",
            LogVersion::V2 => b"ULG\x02",
            LogVersion::V3 => b"ULG\x03",
            LogVersion::V4 => b"ULG4\n",
            LogVersion::V5 => b"ULG5\n",
            LogVersion::V6 => b"ULG6\n",
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, LogVersion::V1 | LogVersion::V2 | LogVersion::V3)
    }

    /// Detect the version from the first four bytes of a stream.
    ///
    /// Anything that does not start with the `ULG` magic is a headerless v1
    /// log; the sniffed bytes then belong to its first record.
    pub fn sniff(head: &[u8; 4]) -> Option<LogVersion> {
        if &head[0..3] != b"ULG" {
            return Some(LogVersion::V1);
        }
        match head[3] {
            2 => Some(LogVersion::V2),
            3 => Some(LogVersion::V3),
            b'4' => Some(LogVersion::V4),
            b'5' => Some(LogVersion::V5),
            b'6' => Some(LogVersion::V6),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_numbers() {
        for v in [
            LogVersion::V1,
            LogVersion::V2,
            LogVersion::V3,
            LogVersion::V4,
            LogVersion::V5,
            LogVersion::V6,
        ] {
            assert_eq!(LogVersion::from_u8(v.as_u8()), Some(v));
        }
        assert_eq!(LogVersion::from_u8(7), None);
    }

    #[test]
    fn test_sniff_headers() {
        assert_eq!(LogVersion::sniff(b"ULG\x02"), Some(LogVersion::V2));
        assert_eq!(LogVersion::sniff(b"ULG\x03"), Some(LogVersion::V3));
        assert_eq!(LogVersion::sniff(b"ULG4"), Some(LogVersion::V4));
        assert_eq!(LogVersion::sniff(b"ULG6"), Some(LogVersion::V6));
        assert_eq!(LogVersion::sniff(b"ULG9"), None);
        // headerless stream: first bytes are record data
        assert_eq!(LogVersion::sniff(&[0, 1, 0, 3]), Some(LogVersion::V1));
    }
}
