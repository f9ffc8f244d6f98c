//! Version-specific log writers behind one [`Serializer`] trait.
//!
//! A serializer owns the state its version needs between records: the
//! binary v3 and the text versions only emit play mode and team records
//! when the value changed since this instance last wrote one, so two
//! serializers never share de-dup state.

mod text;
mod v1;
mod v2;
mod v3;

pub use text::TextSerializer;
pub use v1::V1Serializer;
pub use v2::V2Serializer;
pub use v3::V3Serializer;

use std::io::Write;

use crate::error::{RcgError, Result};
use crate::formats::LogVersion;
use crate::param::{
    parse_param_message, player_param_from_pairs, player_type_from_pairs, server_param_from_pairs,
};
use crate::types::{DispInfo, DrawInfo, PlayMode, PlayerParam, PlayerType, ServerParam, Team};

/// Writes one log version. All methods append to `w`; nothing seeks.
pub trait Serializer {
    fn version(&self) -> LogVersion;

    /// Magic bytes before the first record. No-op for v1.
    fn serialize_header(&mut self, w: &mut dyn Write) -> Result<()>;

    fn serialize_server_param(&mut self, w: &mut dyn Write, param: &ServerParam) -> Result<()>;

    fn serialize_player_param(&mut self, w: &mut dyn Write, param: &PlayerParam) -> Result<()>;

    fn serialize_player_type(&mut self, w: &mut dyn Write, ptype: &PlayerType) -> Result<()>;

    /// Emit a play-mode change. Versions with de-dup state skip the write
    /// when the mode equals the last one this instance emitted.
    fn serialize_playmode(&mut self, w: &mut dyn Write, time: u32, pmode: PlayMode) -> Result<()>;

    /// Emit team names and scores, de-duplicated like play modes.
    fn serialize_team(&mut self, w: &mut dyn Write, time: u32, teams: &[Team; 2]) -> Result<()>;

    /// Emit one full cycle. Versions whose show record carries no play
    /// mode or teams first emit those as separate records when changed.
    fn serialize_show(&mut self, w: &mut dyn Write, disp: &DispInfo) -> Result<()>;

    fn serialize_msg(&mut self, w: &mut dyn Write, time: u32, board: i16, text: &str)
        -> Result<()>;

    fn serialize_draw(&mut self, w: &mut dyn Write, time: u32, draw: &DrawInfo) -> Result<()>;

    /// Parse a live-protocol parameter message and dispatch it to the
    /// matching typed method. Unknown message names become msg records.
    fn serialize_param_message(&mut self, w: &mut dyn Write, time: u32, text: &str) -> Result<()> {
        let (name, pairs) = parse_param_message(text)?;
        match name.as_str() {
            "server_param" => {
                let param = server_param_from_pairs(&pairs)?;
                self.serialize_server_param(w, &param)
            }
            "player_param" => {
                let param = player_param_from_pairs(&pairs)?;
                self.serialize_player_param(w, &param)
            }
            "player_type" => {
                let ptype = player_type_from_pairs(&pairs)?;
                self.serialize_player_type(w, &ptype)
            }
            other => {
                log::warn!("unknown parameter message '{}', kept as msg record", other);
                self.serialize_msg(w, time, crate::formats::MSG_BOARD_LOG, text)
            }
        }
    }
}

/// Build the serializer for one log version.
///
/// The match is the whole dispatch surface: adding a version means adding
/// an arm here, nothing registers itself anywhere.
pub fn for_version(version: LogVersion) -> Box<dyn Serializer> {
    match version {
        LogVersion::V1 => Box::new(V1Serializer::new()),
        LogVersion::V2 => Box::new(V2Serializer::new()),
        LogVersion::V3 => Box::new(V3Serializer::new()),
        LogVersion::V4 | LogVersion::V5 | LogVersion::V6 => {
            Box::new(TextSerializer::new(version))
        }
    }
}

/// Build a serializer from a raw version number, as read from a header.
pub fn for_version_number(version: u8) -> Result<Box<dyn Serializer>> {
    LogVersion::from_u8(version)
        .map(for_version)
        .ok_or(RcgError::UnsupportedVersion(version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::LogVersion;

    #[test]
    fn test_factory_covers_all_versions() {
        for v in [
            LogVersion::V1,
            LogVersion::V2,
            LogVersion::V3,
            LogVersion::V4,
            LogVersion::V5,
            LogVersion::V6,
        ] {
            assert_eq!(for_version(v).version(), v);
        }
        assert!(for_version_number(9).is_err());
    }

    #[test]
    fn test_headers_written_once_per_version() {
        for v in [LogVersion::V2, LogVersion::V3, LogVersion::V4, LogVersion::V6] {
            let mut out = Vec::new();
            let mut ser = for_version(v);
            ser.serialize_header(&mut out).unwrap();
            assert_eq!(out, v.header());
        }
        let mut out = Vec::new();
        for_version(LogVersion::V1).serialize_header(&mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_param_message_dispatch() {
        use crate::param::{render_message, server_param_entries};
        use crate::types::ServerParam;

        let msg = render_message("server_param", &server_param_entries(&ServerParam::default()));
        let mut ser = for_version(LogVersion::V4);
        let mut out = Vec::new();
        ser.serialize_param_message(&mut out, 0, &msg).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("(server_param "));
        assert!(text.ends_with(")\n"));
    }
}
