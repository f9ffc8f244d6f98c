//! Shared writer for the text versions (v4, v5, v6).
//!
//! One record per line. v5 adds stamina capacity to the show line; v6
//! renders the time token as `time,stopped` when a stopped-clock count is
//! present. Doubles go through [`format_double`] so a rewritten log never
//! accumulates float noise.

use std::fmt::Write as _;
use std::io::Write;

use crate::error::Result;
use crate::formats::LogVersion;
use crate::param::{
    format_double, player_param_entries, player_type_entries, render_message,
    server_param_entries, PARAM_PRECISION,
};
use crate::types::{
    DispInfo, DrawInfo, PlayMode, Player, PlayerParam, PlayerType, ServerParam, Show, Team,
};

use super::Serializer;

/// Position and angle precision on a show line.
fn f4(v: f64) -> String {
    format_double(v, PARAM_PRECISION)
}

/// Stamina block precision.
fn f2(v: f64) -> String {
    format_double(v, 0.01)
}

pub struct TextSerializer {
    version: LogVersion,
    last_pmode: Option<PlayMode>,
    last_teams: Option<[Team; 2]>,
}

impl TextSerializer {
    pub fn new(version: LogVersion) -> Self {
        debug_assert!(!version.is_binary());
        Self { version, last_pmode: None, last_teams: None }
    }

    fn time_token(&self, show: &Show) -> String {
        match (self.version, show.stopped) {
            (LogVersion::V6, Some(stopped)) => format!("{},{}", show.time, stopped),
            _ => show.time.to_string(),
        }
    }

    fn format_player(&self, out: &mut String, p: &Player) {
        let _ = write!(
            out,
            " (({} {}) {} {:#x} {} {}",
            p.side.as_char(),
            p.unum,
            p.type_id,
            p.state,
            f4(p.pos.x),
            f4(p.pos.y)
        );
        let vel = p.vel.unwrap_or_default();
        let _ = write!(out, " {} {}", f4(vel.x), f4(vel.y));
        let _ = write!(out, " {} {}", f4(p.body), f4(p.neck.unwrap_or(0.0)));
        if let Some(pt) = p.point_to {
            let _ = write!(out, " {} {}", f4(pt.x), f4(pt.y));
        }
        if let Some(view) = p.view {
            let quality = if view.quality_high { 'h' } else { 'l' };
            let _ = write!(out, " (v {} {})", quality, f2(view.width));
        }
        if let Some(st) = p.stamina {
            let _ = write!(out, " (s {} {} {}", f2(st.stamina), f2(st.effort), f2(st.recovery));
            if self.version != LogVersion::V4 {
                if let Some(cap) = st.capacity {
                    let _ = write!(out, " {}", f2(cap));
                }
            }
            out.push(')');
        }
        if let Some((side, unum)) = p.focus {
            let _ = write!(out, " (f {} {})", side.as_char(), unum);
        }
        if let Some(c) = p.counts {
            let _ = write!(
                out,
                " (c {} {} {} {} {} {} {} {} {} {} {})",
                c.kick,
                c.dash,
                c.turn,
                c.catch,
                c.move_,
                c.turn_neck,
                c.change_view,
                c.say,
                c.tackle,
                c.point_to,
                c.attention_to
            );
        }
        out.push(')');
    }

    fn show_line(&self, disp: &DispInfo) -> String {
        let show = &disp.show;
        let mut out = String::with_capacity(256 + 128 * show.players.len());
        let _ = write!(&mut out, "(show {}", self.time_token(show));
        let vel = show.ball.vel.unwrap_or_default();
        let _ = write!(
            &mut out,
            " ((b) {} {} {} {})",
            f4(show.ball.pos.x),
            f4(show.ball.pos.y),
            f4(vel.x),
            f4(vel.y)
        );
        for p in &show.players {
            self.format_player(&mut out, p);
        }
        out.push_str(")\n");
        out
    }

    fn team_line(time: u32, teams: &[Team; 2]) -> String {
        let mut out = format!(
            "(team {} {} {} {} {}",
            time,
            teams[0].name_or_null(),
            teams[1].name_or_null(),
            teams[0].score,
            teams[1].score
        );
        if teams[0].has_pen_record() || teams[1].has_pen_record() {
            let _ = write!(
                &mut out,
                " {} {} {} {}",
                teams[0].pen_score, teams[0].pen_miss, teams[1].pen_score, teams[1].pen_miss
            );
        }
        out.push_str(")\n");
        out
    }
}

impl Serializer for TextSerializer {
    fn version(&self) -> LogVersion {
        self.version
    }

    fn serialize_header(&mut self, w: &mut dyn Write) -> Result<()> {
        w.write_all(self.version.header())?;
        Ok(())
    }

    fn serialize_server_param(&mut self, w: &mut dyn Write, param: &ServerParam) -> Result<()> {
        let line = render_message("server_param", &server_param_entries(param));
        writeln!(w, "{}", line)?;
        Ok(())
    }

    fn serialize_player_param(&mut self, w: &mut dyn Write, param: &PlayerParam) -> Result<()> {
        let line = render_message("player_param", &player_param_entries(param));
        writeln!(w, "{}", line)?;
        Ok(())
    }

    fn serialize_player_type(&mut self, w: &mut dyn Write, ptype: &PlayerType) -> Result<()> {
        let line = render_message("player_type", &player_type_entries(ptype));
        writeln!(w, "{}", line)?;
        Ok(())
    }

    fn serialize_playmode(&mut self, w: &mut dyn Write, time: u32, pmode: PlayMode) -> Result<()> {
        if self.last_pmode == Some(pmode) || pmode == PlayMode::Null {
            return Ok(());
        }
        writeln!(w, "(playmode {} {})", time, pmode.as_str())?;
        self.last_pmode = Some(pmode);
        Ok(())
    }

    fn serialize_team(&mut self, w: &mut dyn Write, time: u32, teams: &[Team; 2]) -> Result<()> {
        if self.last_teams.as_ref() == Some(teams) {
            return Ok(());
        }
        w.write_all(Self::team_line(time, teams).as_bytes())?;
        self.last_teams = Some(teams.clone());
        Ok(())
    }

    fn serialize_show(&mut self, w: &mut dyn Write, disp: &DispInfo) -> Result<()> {
        self.serialize_playmode(w, disp.show.time, disp.pmode)?;
        self.serialize_team(w, disp.show.time, &disp.teams)?;
        w.write_all(self.show_line(disp).as_bytes())?;
        Ok(())
    }

    fn serialize_msg(&mut self, w: &mut dyn Write, time: u32, board: i16, text: &str) -> Result<()> {
        writeln!(w, "(msg {} {} \"{}\")", time, board, text)?;
        Ok(())
    }

    fn serialize_draw(&mut self, w: &mut dyn Write, time: u32, draw: &DrawInfo) -> Result<()> {
        let body = match draw {
            DrawInfo::Clear => "(clear)".to_string(),
            DrawInfo::Point { pos, color } => {
                format!("(point {} {} \"{}\")", f4(pos.x), f4(pos.y), color)
            }
            DrawInfo::Circle { center, radius, color } => format!(
                "(circle {} {} {} \"{}\")",
                f4(center.x),
                f4(center.y),
                f4(*radius),
                color
            ),
            DrawInfo::Line { from, to, color } => format!(
                "(line {} {} {} {} \"{}\")",
                f4(from.x),
                f4(from.y),
                f4(to.x),
                f4(to.y),
                color
            ),
        };
        writeln!(w, "(draw {} {})", time, body)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Ball, Side, Stamina, Vec2};

    fn disp(time: u32, pmode: PlayMode) -> DispInfo {
        let mut p = Player::new(Side::Left, 1);
        p.pos = Vec2::new(-20.0, 0.0);
        p.vel = Some(Vec2::default());
        p.stamina = Some(Stamina {
            stamina: 4000.0,
            effort: 1.0,
            recovery: 1.0,
            capacity: Some(130600.0),
        });
        DispInfo {
            pmode,
            teams: [Team::new("HELIOS", 0), Team::new("WrightEagle", 0)],
            show: Show {
                time,
                stopped: None,
                ball: Ball { pos: Vec2::new(10.0, -5.0), vel: Some(Vec2::default()) },
                players: vec![p],
            },
        }
    }

    fn lines(out: &[u8]) -> Vec<String> {
        String::from_utf8(out.to_vec()).unwrap().lines().map(str::to_string).collect()
    }

    #[test]
    fn test_show_emits_playmode_and_team_lines_once() {
        let mut ser = TextSerializer::new(LogVersion::V4);
        let mut out = Vec::new();
        ser.serialize_show(&mut out, &disp(1, PlayMode::KickOffLeft)).unwrap();
        ser.serialize_show(&mut out, &disp(2, PlayMode::KickOffLeft)).unwrap();
        let lines = lines(&out);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "(playmode 1 kick_off_l)");
        assert_eq!(lines[1], "(team 1 HELIOS WrightEagle 0 0)");
        assert!(lines[2].starts_with("(show 1 ((b) 10 -5 0 0)"));
        assert!(lines[3].starts_with("(show 2 "));
    }

    #[test]
    fn test_playmode_change_reemits() {
        let mut ser = TextSerializer::new(LogVersion::V4);
        let mut out = Vec::new();
        ser.serialize_show(&mut out, &disp(1, PlayMode::KickOffLeft)).unwrap();
        ser.serialize_show(&mut out, &disp(2, PlayMode::PlayOn)).unwrap();
        let lines = lines(&out);
        assert!(lines.contains(&"(playmode 2 play_on)".to_string()));
    }

    #[test]
    fn test_v4_drops_capacity_v5_keeps_it() {
        let mut out4 = Vec::new();
        TextSerializer::new(LogVersion::V4).serialize_show(&mut out4, &disp(1, PlayMode::PlayOn))
            .unwrap();
        let text4 = String::from_utf8(out4).unwrap();
        assert!(text4.contains("(s 4000 1 1)"));

        let mut out5 = Vec::new();
        TextSerializer::new(LogVersion::V5).serialize_show(&mut out5, &disp(1, PlayMode::PlayOn))
            .unwrap();
        let text5 = String::from_utf8(out5).unwrap();
        assert!(text5.contains("(s 4000 1 1 130600)"));
    }

    #[test]
    fn test_v6_time_token_carries_stopped_clock() {
        let mut d = disp(100, PlayMode::PlayOn);
        d.show.stopped = Some(3);
        let mut out = Vec::new();
        TextSerializer::new(LogVersion::V6).serialize_show(&mut out, &d).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("(show 100,3 "));

        // v5 never renders the stopped counter
        let mut out = Vec::new();
        TextSerializer::new(LogVersion::V5).serialize_show(&mut out, &d).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("(show 100 "));
    }

    #[test]
    fn test_penalty_scores_extend_team_line() {
        let mut ser = TextSerializer::new(LogVersion::V4);
        let mut out = Vec::new();
        let mut teams = [Team::new("A", 1), Team::new("B", 1)];
        teams[0].pen_score = 3;
        teams[1].pen_score = 2;
        teams[1].pen_miss = 1;
        ser.serialize_team(&mut out, 6000, &teams).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "(team 6000 A B 1 1 3 0 2 1)\n");
    }

    #[test]
    fn test_msg_and_draw_lines() {
        let mut ser = TextSerializer::new(LogVersion::V5);
        let mut out = Vec::new();
        ser.serialize_msg(&mut out, 0, 1, "(change_player_type HELIOS 1 7)").unwrap();
        ser.serialize_draw(
            &mut out,
            10,
            &DrawInfo::Point { pos: Vec2::new(1.5, -2.25), color: "red".to_string() },
        )
        .unwrap();
        let lines = lines(&out);
        assert_eq!(lines[0], "(msg 0 1 \"(change_player_type HELIOS 1 7)\")");
        assert_eq!(lines[1], "(draw 10 (point 1.5 -2.25 \"red\"))");
    }
}
