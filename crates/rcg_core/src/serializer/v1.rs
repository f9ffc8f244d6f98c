//! v1 writer: headerless, every record padded to [`DISPINFO_SIZE`] bytes.

use std::io::Write;

use crate::codec::write_i16;
use crate::error::Result;
use crate::formats::v1::{DrawInfoT, MsgInfoT, ShowInfoT, BODY_SIZE, DISPINFO_SIZE};
use crate::formats::{LogVersion, DRAW_MODE, MSG_MODE, SHOW_MODE};
use crate::types::{DispInfo, DrawInfo, PlayMode, PlayerParam, PlayerType, ServerParam, Team};

use super::Serializer;

/// The oldest format. Play mode and teams live inside every show record,
/// so the standalone playmode/team calls only update the pending state
/// flushed with the next show; parameters cannot be expressed at all.
pub struct V1Serializer {
    pmode: PlayMode,
    teams: [Team; 2],
}

impl V1Serializer {
    pub fn new() -> Self {
        Self { pmode: PlayMode::Null, teams: [Team::default(), Team::default()] }
    }

    fn write_record(&self, w: &mut dyn Write, mode: i16, body: &[u8]) -> Result<()> {
        debug_assert!(body.len() <= BODY_SIZE);
        write_i16(w, mode)?;
        w.write_all(body)?;
        let padding = [0u8; DISPINFO_SIZE];
        w.write_all(&padding[..BODY_SIZE - body.len()])?;
        Ok(())
    }
}

impl Default for V1Serializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Serializer for V1Serializer {
    fn version(&self) -> LogVersion {
        LogVersion::V1
    }

    fn serialize_header(&mut self, _w: &mut dyn Write) -> Result<()> {
        Ok(())
    }

    fn serialize_server_param(&mut self, _w: &mut dyn Write, _param: &ServerParam) -> Result<()> {
        log::debug!("v1 log cannot carry server_param, dropped");
        Ok(())
    }

    fn serialize_player_param(&mut self, _w: &mut dyn Write, _param: &PlayerParam) -> Result<()> {
        log::debug!("v1 log cannot carry player_param, dropped");
        Ok(())
    }

    fn serialize_player_type(&mut self, _w: &mut dyn Write, _ptype: &PlayerType) -> Result<()> {
        log::debug!("v1 log cannot carry player_type, dropped");
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
        let rec = ShowInfoT::from_disp(disp);
        let mut body = Vec::with_capacity(ShowInfoT::SIZE);
        rec.encode(&mut body)?;
        self.write_record(w, SHOW_MODE, &body)
    }

    fn serialize_msg(
        &mut self,
        w: &mut dyn Write,
        _time: u32,
        board: i16,
        text: &str,
    ) -> Result<()> {
        let rec = MsgInfoT::from_text(board, text);
        let mut body = Vec::with_capacity(MsgInfoT::SIZE);
        rec.encode(&mut body)?;
        self.write_record(w, MSG_MODE, &body)
    }

    fn serialize_draw(&mut self, w: &mut dyn Write, _time: u32, draw: &DrawInfo) -> Result<()> {
        let rec = DrawInfoT::from_draw(draw);
        let mut body = Vec::with_capacity(DrawInfoT::SIZE);
        rec.encode(&mut body)?;
        self.write_record(w, DRAW_MODE, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Ball, Player, Show, Side, Vec2};

    #[test]
    fn test_every_record_is_fixed_size() {
        let disp = DispInfo {
            pmode: PlayMode::PlayOn,
            teams: [Team::new("L", 0), Team::new("R", 0)],
            show: Show {
                time: 10,
                stopped: None,
                ball: Ball { pos: Vec2::new(1.0, 2.0), vel: None },
                players: vec![Player::new(Side::Left, 1)],
            },
        };
        let mut ser = V1Serializer::new();
        let mut out = Vec::new();
        ser.serialize_header(&mut out).unwrap();
        ser.serialize_show(&mut out, &disp).unwrap();
        ser.serialize_msg(&mut out, 10, 1, "hello").unwrap();
        ser.serialize_draw(&mut out, 10, &DrawInfo::Clear).unwrap();
        assert_eq!(out.len(), 3 * DISPINFO_SIZE);
    }

    #[test]
    fn test_params_are_dropped_silently() {
        let mut ser = V1Serializer::new();
        let mut out = Vec::new();
        ser.serialize_server_param(&mut out, &ServerParam::default()).unwrap();
        ser.serialize_player_param(&mut out, &PlayerParam::default()).unwrap();
        ser.serialize_player_type(&mut out, &PlayerType::default()).unwrap();
        assert!(out.is_empty());
    }
}
