//! Streaming log reader.
//!
//! [`Parser`] sniffs the version from the first bytes, then feeds records
//! to a [`Handler`] one at a time; nothing buffers the whole log. Every
//! handler method returns `bool`: `false` stops the parse cooperatively,
//! and no further callbacks (including [`Handler::handle_eof`]) fire.
//!
//! Versions whose show record embeds play mode and teams (v1, v2) are
//! decomposed here: the parser emits `handle_playmode`/`handle_team` only
//! when the embedded value changed, so a handler sees the same callback
//! sequence from every version.

mod binary;
mod text;

use std::io::BufRead;

use crate::error::{RcgError, Result};
use crate::formats::LogVersion;
use crate::types::{
    DispInfo, DrawInfo, PlayMode, PlayerParam, PlayerType, ServerParam, Show, Side, Team,
};

/// Receives decoded records in stream order.
///
/// Every method defaults to "ignore and continue", so a handler only
/// overrides what it consumes.
pub trait Handler {
    fn handle_log_version(&mut self, _version: LogVersion) -> bool {
        true
    }

    fn handle_show(&mut self, _show: Show) -> bool {
        true
    }

    fn handle_playmode(&mut self, _time: u32, _pmode: PlayMode) -> bool {
        true
    }

    fn handle_team(&mut self, _time: u32, _teams: [Team; 2]) -> bool {
        true
    }

    fn handle_msg(&mut self, _time: u32, _board: i16, _text: String) -> bool {
        true
    }

    fn handle_draw(&mut self, _time: u32, _draw: DrawInfo) -> bool {
        true
    }

    fn handle_server_param(&mut self, _param: ServerParam) -> bool {
        true
    }

    fn handle_player_param(&mut self, _param: PlayerParam) -> bool {
        true
    }

    fn handle_player_type(&mut self, _ptype: PlayerType) -> bool {
        true
    }

    /// Team banner tile extracted from a team_graphic message.
    fn handle_team_graphic(&mut self, _side: Side, _x: u16, _y: u16, _xpm: Vec<String>) -> bool {
        true
    }

    /// End of input. A truncated final record still counts as a clean end.
    fn handle_eof(&mut self) -> bool {
        true
    }
}

/// Streaming parser over any buffered reader.
pub struct Parser<R> {
    reader: R,
}

impl<R: BufRead> Parser<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Parse the whole stream, returning the sniffed version.
    ///
    /// Record-scoped errors in text logs are logged and skipped; anything
    /// that desynchronizes a binary stream is fatal.
    pub fn run(&mut self, handler: &mut dyn Handler) -> Result<LogVersion> {
        let mut head = [0u8; 4];
        let got = read_at_most(&mut self.reader, &mut head)?;
        if got == 0 {
            return Err(RcgError::BadHeader("empty input".to_string()));
        }
        if got < 4 {
            return Err(RcgError::BadHeader(format!("{} byte(s), too short for any log", got)));
        }

        let version = LogVersion::sniff(&head)
            .ok_or_else(|| RcgError::BadHeader(format!("unknown magic {:?}", head)))?;
        log::info!("parsing rcg version {}", version.as_u8());

        if !handler.handle_log_version(version) {
            return Ok(version);
        }

        let clean_end = match version {
            LogVersion::V1 => binary::parse_v1(&mut self.reader, handler, &head)?,
            LogVersion::V2 | LogVersion::V3 => {
                binary::parse_tagged(&mut self.reader, handler, version)?
            }
            LogVersion::V4 | LogVersion::V5 | LogVersion::V6 => {
                text::parse(&mut self.reader, handler, version)?
            }
        };
        if clean_end {
            handler.handle_eof();
        }
        Ok(version)
    }
}

/// Read until `buf` is full or the stream ends; returns the bytes read.
fn read_at_most(reader: &mut impl BufRead, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

/// Emits playmode/team callbacks for versions whose show record embeds
/// them, mirroring the serializer's change-only emission.
pub(crate) struct Decomposer {
    last_pmode: Option<PlayMode>,
    last_teams: Option<[Team; 2]>,
}

impl Decomposer {
    pub(crate) fn new() -> Self {
        Self { last_pmode: None, last_teams: None }
    }

    /// Returns `false` when the handler asked to stop.
    pub(crate) fn emit(&mut self, handler: &mut dyn Handler, disp: DispInfo) -> bool {
        let time = disp.show.time;
        if disp.pmode != PlayMode::Null && self.last_pmode != Some(disp.pmode) {
            if !handler.handle_playmode(time, disp.pmode) {
                return false;
            }
            self.last_pmode = Some(disp.pmode);
        }
        if self.last_teams.as_ref() != Some(&disp.teams) {
            if !handler.handle_team(time, disp.teams.clone()) {
                return false;
            }
            self.last_teams = Some(disp.teams.clone());
        }
        handler.handle_show(disp.show)
    }
}

/// A [`Handler`] that keeps everything, re-assembling [`DispInfo`] cycles
/// from the playmode/team/show callback stream.
#[derive(Debug, Default)]
pub struct RecordCollector {
    pub version: Option<LogVersion>,
    pub server_param: Option<ServerParam>,
    pub player_param: Option<PlayerParam>,
    pub player_types: Vec<PlayerType>,
    pub dispinfo: Vec<DispInfo>,
    pub msgs: Vec<(u32, i16, String)>,
    pub draws: Vec<(u32, DrawInfo)>,
    pub reached_eof: bool,
    pmode: PlayMode,
    teams: [Team; 2],
}

impl RecordCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest fully assembled cycle, if any show record arrived.
    pub fn last_disp(&self) -> Option<&DispInfo> {
        self.dispinfo.last()
    }
}

impl Handler for RecordCollector {
    fn handle_log_version(&mut self, version: LogVersion) -> bool {
        self.version = Some(version);
        true
    }

    fn handle_show(&mut self, show: Show) -> bool {
        self.dispinfo.push(DispInfo {
            pmode: self.pmode,
            teams: self.teams.clone(),
            show,
        });
        true
    }

    fn handle_playmode(&mut self, _time: u32, pmode: PlayMode) -> bool {
        self.pmode = pmode;
        true
    }

    fn handle_team(&mut self, _time: u32, teams: [Team; 2]) -> bool {
        self.teams = teams;
        true
    }

    fn handle_msg(&mut self, time: u32, board: i16, text: String) -> bool {
        self.msgs.push((time, board, text));
        true
    }

    fn handle_draw(&mut self, time: u32, draw: DrawInfo) -> bool {
        self.draws.push((time, draw));
        true
    }

    fn handle_server_param(&mut self, param: ServerParam) -> bool {
        self.server_param = Some(param);
        true
    }

    fn handle_player_param(&mut self, param: PlayerParam) -> bool {
        self.player_param = Some(param);
        true
    }

    fn handle_player_type(&mut self, ptype: PlayerType) -> bool {
        self.player_types.push(ptype);
        true
    }

    fn handle_eof(&mut self) -> bool {
        self.reached_eof = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    #[test]
    fn test_empty_and_short_inputs_rejected() {
        let mut collector = RecordCollector::new();
        let err = Parser::new(BufReader::new(&b""[..])).run(&mut collector).unwrap_err();
        assert!(matches!(err, RcgError::BadHeader(_)));
        assert!(!err.is_recoverable());

        let err = Parser::new(BufReader::new(&b"UL"[..])).run(&mut collector).unwrap_err();
        assert!(matches!(err, RcgError::BadHeader(_)));
    }

    #[test]
    fn test_unknown_ulg_version_rejected() {
        let mut collector = RecordCollector::new();
        let err = Parser::new(BufReader::new(&b"ULG9\n"[..])).run(&mut collector).unwrap_err();
        assert!(matches!(err, RcgError::BadHeader(_)));
    }

    #[test]
    fn test_header_only_text_log_is_clean() {
        let mut collector = RecordCollector::new();
        let version =
            Parser::new(BufReader::new(&b"ULG5\n"[..])).run(&mut collector).unwrap();
        assert_eq!(version, LogVersion::V5);
        assert_eq!(collector.version, Some(LogVersion::V5));
        assert!(collector.reached_eof);
        assert!(collector.dispinfo.is_empty());
    }

    struct StopAfterVersion;

    impl Handler for StopAfterVersion {
        fn handle_log_version(&mut self, _version: LogVersion) -> bool {
            false
        }

        fn handle_eof(&mut self) -> bool {
            panic!("eof must not fire after an abort");
        }
    }

    #[test]
    fn test_abort_skips_eof() {
        let mut handler = StopAfterVersion;
        let version = Parser::new(BufReader::new(&b"ULG4\n(playmode 0 play_on)\n"[..]))
            .run(&mut handler)
            .unwrap();
        assert_eq!(version, LogVersion::V4);
    }
}
