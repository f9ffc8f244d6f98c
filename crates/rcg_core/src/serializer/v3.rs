//! v3 writer: `ULG` + 0x03.
//!
//! Show records are [`ShortShowInfoT2`]; play mode and teams travel as
//! their own records, emitted only when the value changed since this
//! serializer last wrote one.

use std::io::Write;

use crate::codec::write_i16;
use crate::error::Result;
use crate::formats::v1::TeamT;
use crate::formats::v3::{PlayerParamsT, PlayerTypeT, ServerParamsT, ShortShowInfoT2};
use crate::formats::{LogVersion, PARAM_MODE, PM_MODE, PPARAM_MODE, PT_MODE, SHOW_MODE, TEAM_MODE};
use crate::param::{
    parse_param_message, player_param_from_pairs, player_type_from_pairs, server_param_from_pairs,
    HARDCODED_CONTROL_RADIUS_WIDTH, HARDCODED_KICKABLE_AREA, HARDCODED_LCM_STEP,
};
use crate::types::{DispInfo, DrawInfo, PlayMode, PlayerParam, PlayerType, ServerParam, Team};

use super::Serializer;

pub struct V3Serializer {
    last_pmode: Option<PlayMode>,
    last_teams: Option<[Team; 2]>,
}

impl V3Serializer {
    pub fn new() -> Self {
        Self { last_pmode: None, last_teams: None }
    }

    fn write_playmode(w: &mut dyn Write, pmode: PlayMode) -> Result<()> {
        write_i16(w, PM_MODE)?;
        w.write_all(&[pmode.as_u8()])?;
        Ok(())
    }

    fn write_team(w: &mut dyn Write, teams: &[Team; 2]) -> Result<()> {
        write_i16(w, TEAM_MODE)?;
        TeamT::from_team(&teams[0]).encode(w)?;
        TeamT::from_team(&teams[1]).encode(w)?;
        Ok(())
    }
}

impl Default for V3Serializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Serializer for V3Serializer {
    fn version(&self) -> LogVersion {
        LogVersion::V3
    }

    fn serialize_header(&mut self, w: &mut dyn Write) -> Result<()> {
        w.write_all(LogVersion::V3.header())?;
        Ok(())
    }

    fn serialize_server_param(&mut self, w: &mut dyn Write, param: &ServerParam) -> Result<()> {
        write_i16(w, PARAM_MODE)?;
        ServerParamsT::from_param(param).encode(w)?;
        Ok(())
    }

    fn serialize_player_param(&mut self, w: &mut dyn Write, param: &PlayerParam) -> Result<()> {
        write_i16(w, PPARAM_MODE)?;
        PlayerParamsT::from_param(param).encode(w)?;
        Ok(())
    }

    fn serialize_player_type(&mut self, w: &mut dyn Write, ptype: &PlayerType) -> Result<()> {
        write_i16(w, PT_MODE)?;
        PlayerTypeT::from_param(ptype).encode(w)?;
        Ok(())
    }

    fn serialize_playmode(
        &mut self,
        w: &mut dyn Write,
        _time: u32,
        pmode: PlayMode,
    ) -> Result<()> {
        if self.last_pmode == Some(pmode) {
            return Ok(());
        }
        Self::write_playmode(w, pmode)?;
        self.last_pmode = Some(pmode);
        Ok(())
    }

    fn serialize_team(&mut self, w: &mut dyn Write, _time: u32, teams: &[Team; 2]) -> Result<()> {
        if self.last_teams.as_ref() == Some(teams) {
            return Ok(());
        }
        Self::write_team(w, teams)?;
        self.last_teams = Some(teams.clone());
        Ok(())
    }

    fn serialize_show(&mut self, w: &mut dyn Write, disp: &DispInfo) -> Result<()> {
        self.serialize_playmode(w, disp.show.time, disp.pmode)?;
        self.serialize_team(w, disp.show.time, &disp.teams)?;
        write_i16(w, SHOW_MODE)?;
        ShortShowInfoT2::from_show(&disp.show).encode(w)?;
        Ok(())
    }

    fn serialize_msg(
        &mut self,
        w: &mut dyn Write,
        _time: u32,
        board: i16,
        text: &str,
    ) -> Result<()> {
        super::v2::write_msg(w, board, text)
    }

    fn serialize_draw(&mut self, w: &mut dyn Write, _time: u32, draw: &DrawInfo) -> Result<()> {
        super::v2::write_draw(w, draw)
    }

    /// The v3 stream predates `control_radius_width`, `kickable_area` and
    /// `lcm_step`: the writer pins them to the carry-over constants
    /// whatever the live message says.
    fn serialize_param_message(&mut self, w: &mut dyn Write, time: u32, text: &str) -> Result<()> {
        let (name, pairs) = parse_param_message(text)?;
        match name.as_str() {
            "server_param" => {
                let mut param = server_param_from_pairs(&pairs)?;
                param.control_radius_width = HARDCODED_CONTROL_RADIUS_WIDTH;
                param.kickable_area = HARDCODED_KICKABLE_AREA;
                param.lcm_step = HARDCODED_LCM_STEP;
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
