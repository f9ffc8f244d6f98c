//! v2 writer: `ULG` + 0x02, mode-tagged records.

use std::io::Write;

use crate::codec::write_i16;
use crate::error::Result;
use crate::formats::v1::DrawInfoT;
use crate::formats::v2::ShowInfoT2;
use crate::formats::{LogVersion, DRAW_MODE, MSG_MODE, SHOW_MODE};
use crate::types::{DispInfo, DrawInfo, PlayMode, PlayerParam, PlayerType, ServerParam, Team};

use super::Serializer;

/// Message body: board, byte length including the terminating NUL, bytes.
pub(super) fn write_msg(w: &mut dyn Write, board: i16, text: &str) -> Result<()> {
    write_i16(w, MSG_MODE)?;
    write_i16(w, board)?;
    let bytes = text.as_bytes();
    write_i16(w, (bytes.len() + 1).min(i16::MAX as usize) as i16)?;
    w.write_all(bytes)?;
    w.write_all(&[0])?;
    Ok(())
}

pub(super) fn write_draw(w: &mut dyn Write, draw: &DrawInfo) -> Result<()> {
    write_i16(w, DRAW_MODE)?;
    DrawInfoT::from_draw(draw).encode(w)?;
    Ok(())
}

/// Like v1, show records carry play mode and teams inline, so standalone
/// playmode/team calls only update state and parameters are dropped.
pub struct V2Serializer {
    pmode: PlayMode,
    teams: [Team; 2],
}

impl V2Serializer {
    pub fn new() -> Self {
        Self { pmode: PlayMode::Null, teams: [Team::default(), Team::default()] }
    }
}

impl Default for V2Serializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Serializer for V2Serializer {
    fn version(&self) -> LogVersion {
        LogVersion::V2
    }

    fn serialize_header(&mut self, w: &mut dyn Write) -> Result<()> {
        w.write_all(LogVersion::V2.header())?;
        Ok(())
    }

    fn serialize_server_param(&mut self, _w: &mut dyn Write, _param: &ServerParam) -> Result<()> {
        log::debug!("v2 log cannot carry server_param, dropped");
        Ok(())
    }

    fn serialize_player_param(&mut self, _w: &mut dyn Write, _param: &PlayerParam) -> Result<()> {
        log::debug!("v2 log cannot carry player_param, dropped");
        Ok(())
    }

    fn serialize_player_type(&mut self, _w: &mut dyn Write, _ptype: &PlayerType) -> Result<()> {
        log::debug!("v2 log cannot carry player_type, dropped");
        Ok(())
    }

    fn serialize_playmode(
        &mut self,
        _w: &mut dyn Write,
        _time: u32,
        pmode: PlayMode,
    ) -> Result<()> {
        self.pmode = pmode;
        Ok(())
    }

    fn serialize_team(&mut self, _w: &mut dyn Write, _time: u32, teams: &[Team; 2]) -> Result<()> {
        self.teams = teams.clone();
        Ok(())
    }

    fn serialize_show(&mut self, w: &mut dyn Write, disp: &DispInfo) -> Result<()> {
        self.pmode = disp.pmode;
        self.teams = disp.teams.clone();
        write_i16(w, SHOW_MODE)?;
        ShowInfoT2::from_disp(disp).encode(w)?;
        Ok(())
    }

    fn serialize_msg(
        &mut self,
        w: &mut dyn Write,
        _time: u32,
        board: i16,
        text: &str,
    ) -> Result<()> {
        write_msg(w, board, text)
    }

    fn serialize_draw(&mut self, w: &mut dyn Write, _time: u32, draw: &DrawInfo) -> Result<()> {
        write_draw(w, draw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::MSG_BOARD_LOG;

    #[test]
    fn test_header_then_show_layout() {
        let mut ser = V2Serializer::new();
        let mut out = Vec::new();
        ser.serialize_header(&mut out).unwrap();
        ser.serialize_show(&mut out, &DispInfo::default()).unwrap();
        assert_eq!(&out[..4], b"ULG\x02");
        // mode tag
        assert_eq!(&out[4..6], &SHOW_MODE.to_be_bytes());
        assert_eq!(out.len(), 4 + 2 + ShowInfoT2::SIZE);
    }

    #[test]
    fn test_msg_length_includes_nul() {
        let mut ser = V2Serializer::new();
        let mut out = Vec::new();
        ser.serialize_msg(&mut out, 0, MSG_BOARD_LOG, "abc").unwrap();
        assert_eq!(&out[0..2], &MSG_MODE.to_be_bytes());
        assert_eq!(&out[2..4], &MSG_BOARD_LOG.to_be_bytes());
        assert_eq!(&out[4..6], &4i16.to_be_bytes());
        assert_eq!(&out[6..], b"abc\0");
    }
}
