//! v1 wire layout: headerless fixed-size `dispinfo` records.
//!
//! Every v1 record occupies [`DISPINFO_SIZE`] bytes: a 16-bit mode tag
//! followed by a [`BODY_SIZE`]-byte body (the largest record, msginfo, sets
//! the body size; smaller records are zero-padded). Positions are 16-bit
//! fixed point at x16; angles are whole degrees.

use std::io::{Read, Write};

use crate::codec::{read_i16, write_i16, SHOWINFO_SCALE};
use crate::types::{
    Ball, DispInfo, DrawInfo, Player, PlayMode, Show, Side, Team, Vec2, MAX_PLAYER,
};

/// Zero-padded body length of every v1 record (sized by msginfo).
pub const BODY_SIZE: usize = 2050;

/// Total length of one v1 record including the mode tag.
pub const DISPINFO_SIZE: usize = 2 + BODY_SIZE;

pub const TEAM_NAME_LEN: usize = 16;
pub const MSG_TEXT_LEN: usize = 2048;
pub const COLOR_NAME_LEN: usize = 64;

/// Draw sub-record tags.
pub const DRAW_CLEAR: i16 = 0;
pub const DRAW_POINT: i16 = 1;
pub const DRAW_CIRCLE: i16 = 2;
pub const DRAW_LINE: i16 = 3;

/// Position record of the ball or one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PosT {
    /// State bit flags; 0 disables the slot.
    pub enable: i16,
    pub side: i16,
    pub unum: i16,
    /// Whole degrees.
    pub angle: i16,
    /// x16 fixed point.
    pub x: i16,
    pub y: i16,
}

impl PosT {
    pub const SIZE: usize = 12;

    pub fn encode(&self, w: &mut (impl Write + ?Sized)) -> std::io::Result<()> {
        write_i16(w, self.enable)?;
        write_i16(w, self.side)?;
        write_i16(w, self.unum)?;
        write_i16(w, self.angle)?;
        write_i16(w, self.x)?;
        write_i16(w, self.y)
    }

    pub fn decode(r: &mut (impl Read + ?Sized)) -> std::io::Result<PosT> {
        Ok(PosT {
            enable: read_i16(r)?,
            side: read_i16(r)?,
            unum: read_i16(r)?,
            angle: read_i16(r)?,
            x: read_i16(r)?,
            y: read_i16(r)?,
        })
    }

    pub fn from_player(p: &Player) -> PosT {
        PosT {
            enable: p.state as i16,
            side: p.side.to_wire(),
            unum: i16::from(p.unum),
            angle: p.body.round() as i16,
            x: (p.pos.x * SHOWINFO_SCALE).round() as i16,
            y: (p.pos.y * SHOWINFO_SCALE).round() as i16,
        }
    }

    /// v1 carries no velocity, neck, view, stamina or counters; those stay
    /// absent in the canonical player.
    pub fn to_player(&self) -> Player {
        let mut p = Player::new(Side::from_wire(self.side), self.unum.clamp(0, 255) as u8);
        p.state = self.enable as u16 as u32;
        p.pos = Vec2::new(f64::from(self.x) / SHOWINFO_SCALE, f64::from(self.y) / SHOWINFO_SCALE);
        p.body = f64::from(self.angle);
        p
    }

    pub fn from_ball(b: &Ball) -> PosT {
        PosT {
            x: (b.pos.x * SHOWINFO_SCALE).round() as i16,
            y: (b.pos.y * SHOWINFO_SCALE).round() as i16,
            ..PosT::default()
        }
    }

    pub fn to_ball(&self) -> Ball {
        Ball {
            pos: Vec2::new(f64::from(self.x) / SHOWINFO_SCALE, f64::from(self.y) / SHOWINFO_SCALE),
            vel: None,
        }
    }
}

/// Team record: fixed-width NUL-padded name plus score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamT {
    pub name: [u8; TEAM_NAME_LEN],
    pub score: i16,
}

impl Default for TeamT {
    fn default() -> Self {
        TeamT { name: [0; TEAM_NAME_LEN], score: 0 }
    }
}

impl TeamT {
    pub const SIZE: usize = TEAM_NAME_LEN + 2;

    pub fn encode(&self, w: &mut (impl Write + ?Sized)) -> std::io::Result<()> {
        w.write_all(&self.name)?;
        write_i16(w, self.score)
    }

    pub fn decode(r: &mut (impl Read + ?Sized)) -> std::io::Result<TeamT> {
        let mut name = [0u8; TEAM_NAME_LEN];
        r.read_exact(&mut name)?;
        Ok(TeamT { name, score: read_i16(r)? })
    }

    pub fn from_team(t: &Team) -> TeamT {
        let mut name = [0u8; TEAM_NAME_LEN];
        let bytes = t.name_or_null().as_bytes();
        let n = bytes.len().min(TEAM_NAME_LEN);
        name[..n].copy_from_slice(&bytes[..n]);
        TeamT { name, score: t.score as i16 }
    }

    pub fn to_team(&self) -> Team {
        let end = self.name.iter().position(|&b| b == 0).unwrap_or(TEAM_NAME_LEN);
        let name = String::from_utf8_lossy(&self.name[..end]).into_owned();
        Team::from_wire_name(&name, self.score.max(0) as u16)
    }
}

/// Full snapshot of one cycle, play mode and teams included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowInfoT {
    pub pmode: u8,
    pub teams: [TeamT; 2],
    /// Slot 0 is the ball, then 2 x MAX_PLAYER players.
    pub pos: [PosT; MAX_PLAYER * 2 + 1],
    pub time: i16,
}

impl Default for ShowInfoT {
    fn default() -> Self {
        ShowInfoT {
            pmode: 0,
            teams: [TeamT::default(); 2],
            pos: [PosT::default(); MAX_PLAYER * 2 + 1],
            time: 0,
        }
    }
}

impl ShowInfoT {
    pub const SIZE: usize = 1 + 2 * TeamT::SIZE + (MAX_PLAYER * 2 + 1) * PosT::SIZE + 2;

    pub fn encode(&self, w: &mut (impl Write + ?Sized)) -> std::io::Result<()> {
        w.write_all(&[self.pmode])?;
        for t in &self.teams {
            t.encode(w)?;
        }
        for p in &self.pos {
            p.encode(w)?;
        }
        write_i16(w, self.time)
    }

    pub fn decode(r: &mut (impl Read + ?Sized)) -> std::io::Result<ShowInfoT> {
        let mut pmode = [0u8; 1];
        r.read_exact(&mut pmode)?;
        let teams = [TeamT::decode(r)?, TeamT::decode(r)?];
        let mut pos = [PosT::default(); MAX_PLAYER * 2 + 1];
        for slot in pos.iter_mut() {
            *slot = PosT::decode(r)?;
        }
        Ok(ShowInfoT { pmode: pmode[0], teams, pos, time: read_i16(r)? })
    }

    pub fn from_disp(disp: &DispInfo) -> ShowInfoT {
        let mut rec = ShowInfoT {
            pmode: disp.pmode.as_u8(),
            teams: [TeamT::from_team(&disp.teams[0]), TeamT::from_team(&disp.teams[1])],
            time: disp.show.time.min(i16::MAX as u32) as i16,
            ..ShowInfoT::default()
        };
        rec.pos[0] = PosT::from_ball(&disp.show.ball);
        for (i, p) in disp.show.players.iter().take(MAX_PLAYER * 2).enumerate() {
            rec.pos[i + 1] = PosT::from_player(p);
        }
        rec
    }

    pub fn to_disp(&self) -> DispInfo {
        let players = self.pos[1..].iter().filter(|p| p.enable != 0).map(PosT::to_player).collect();
        DispInfo {
            pmode: PlayMode::from_u8(self.pmode).unwrap_or(PlayMode::Null),
            teams: [self.teams[0].to_team(), self.teams[1].to_team()],
            show: Show {
                time: self.time.max(0) as u32,
                stopped: None,
                ball: self.pos[0].to_ball(),
                players,
            },
        }
    }
}

/// Message record: board id plus NUL-terminated text in a fixed buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgInfoT {
    pub board: i16,
    pub message: [u8; MSG_TEXT_LEN],
}

impl Default for MsgInfoT {
    fn default() -> Self {
        MsgInfoT { board: 0, message: [0; MSG_TEXT_LEN] }
    }
}

impl MsgInfoT {
    pub const SIZE: usize = 2 + MSG_TEXT_LEN;

    pub fn encode(&self, w: &mut (impl Write + ?Sized)) -> std::io::Result<()> {
        write_i16(w, self.board)?;
        w.write_all(&self.message)
    }

    pub fn decode(r: &mut (impl Read + ?Sized)) -> std::io::Result<MsgInfoT> {
        let board = read_i16(r)?;
        let mut message = [0u8; MSG_TEXT_LEN];
        r.read_exact(&mut message)?;
        Ok(MsgInfoT { board, message })
    }

    pub fn from_text(board: i16, text: &str) -> MsgInfoT {
        let mut message = [0u8; MSG_TEXT_LEN];
        let bytes = text.as_bytes();
        // keep one byte for the terminating NUL
        let n = bytes.len().min(MSG_TEXT_LEN - 1);
        message[..n].copy_from_slice(&bytes[..n]);
        MsgInfoT { board, message }
    }

    pub fn text(&self) -> String {
        let end = self.message.iter().position(|&b| b == 0).unwrap_or(MSG_TEXT_LEN);
        String::from_utf8_lossy(&self.message[..end]).into_owned()
    }
}

/// Draw record: a sub-mode tag plus one drawing primitive.
///
/// Coordinates use the same x16 fixed point as the v1 positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawInfoT {
    pub mode: i16,
    pub x1: i16,
    pub y1: i16,
    pub x2: i16,
    pub y2: i16,
    pub r: i16,
    pub color: [u8; COLOR_NAME_LEN],
}

impl Default for DrawInfoT {
    fn default() -> Self {
        DrawInfoT { mode: DRAW_CLEAR, x1: 0, y1: 0, x2: 0, y2: 0, r: 0, color: [0; COLOR_NAME_LEN] }
    }
}

impl DrawInfoT {
    pub const SIZE: usize = 2 + 5 * 2 + COLOR_NAME_LEN;

    pub fn encode(&self, w: &mut (impl Write + ?Sized)) -> std::io::Result<()> {
        write_i16(w, self.mode)?;
        write_i16(w, self.x1)?;
        write_i16(w, self.y1)?;
        write_i16(w, self.x2)?;
        write_i16(w, self.y2)?;
        write_i16(w, self.r)?;
        w.write_all(&self.color)
    }

    pub fn decode(r: &mut (impl Read + ?Sized)) -> std::io::Result<DrawInfoT> {
        let rec = DrawInfoT {
            mode: read_i16(r)?,
            x1: read_i16(r)?,
            y1: read_i16(r)?,
            x2: read_i16(r)?,
            y2: read_i16(r)?,
            r: read_i16(r)?,
            color: {
                let mut c = [0u8; COLOR_NAME_LEN];
                r.read_exact(&mut c)?;
                c
            },
        };
        Ok(rec)
    }

    pub fn from_draw(d: &DrawInfo) -> DrawInfoT {
        fn scale(v: f64) -> i16 {
            (v * SHOWINFO_SCALE).round() as i16
        }
        fn color_buf(c: &str) -> [u8; COLOR_NAME_LEN] {
            let mut buf = [0u8; COLOR_NAME_LEN];
            let bytes = c.as_bytes();
            let n = bytes.len().min(COLOR_NAME_LEN - 1);
            buf[..n].copy_from_slice(&bytes[..n]);
            buf
        }
        match d {
            DrawInfo::Clear => DrawInfoT::default(),
            DrawInfo::Point { pos, color } => DrawInfoT {
                mode: DRAW_POINT,
                x1: scale(pos.x),
                y1: scale(pos.y),
                color: color_buf(color),
                ..DrawInfoT::default()
            },
            DrawInfo::Circle { center, radius, color } => DrawInfoT {
                mode: DRAW_CIRCLE,
                x1: scale(center.x),
                y1: scale(center.y),
                r: scale(*radius),
                color: color_buf(color),
                ..DrawInfoT::default()
            },
            DrawInfo::Line { from, to, color } => DrawInfoT {
                mode: DRAW_LINE,
                x1: scale(from.x),
                y1: scale(from.y),
                x2: scale(to.x),
                y2: scale(to.y),
                color: color_buf(color),
                ..DrawInfoT::default()
            },
        }
    }

    pub fn to_draw(&self) -> DrawInfo {
        fn unscale(v: i16) -> f64 {
            f64::from(v) / SHOWINFO_SCALE
        }
        let end = self.color.iter().position(|&b| b == 0).unwrap_or(COLOR_NAME_LEN);
        let color = String::from_utf8_lossy(&self.color[..end]).into_owned();
        match self.mode {
            DRAW_POINT => {
                DrawInfo::Point { pos: Vec2::new(unscale(self.x1), unscale(self.y1)), color }
            }
            DRAW_CIRCLE => DrawInfo::Circle {
                center: Vec2::new(unscale(self.x1), unscale(self.y1)),
                radius: unscale(self.r),
                color,
            },
            DRAW_LINE => DrawInfo::Line {
                from: Vec2::new(unscale(self.x1), unscale(self.y1)),
                to: Vec2::new(unscale(self.x2), unscale(self.y2)),
                color,
            },
            _ => DrawInfo::Clear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::STATE_STAND;

    #[test]
    fn test_pos_roundtrip_quantized() {
        let mut player = Player::new(Side::Left, 7);
        player.pos = Vec2::new(-20.03, 11.97);
        player.body = -90.4;

        let rec = PosT::from_player(&player);
        let back = rec.to_player();

        assert_eq!(back.side, Side::Left);
        assert_eq!(back.unum, 7);
        assert!((back.pos.x - player.pos.x).abs() <= 0.5 / SHOWINFO_SCALE);
        assert!((back.pos.y - player.pos.y).abs() <= 0.5 / SHOWINFO_SCALE);
        // angles round to whole degrees in v1
        assert!((back.body - player.body).abs() <= 0.5);
        assert!(!back.has_velocity());
        assert!(!back.has_stamina());
    }

    #[test]
    fn test_showinfo_encode_size() {
        let rec = ShowInfoT::default();
        let mut buf = Vec::new();
        rec.encode(&mut buf).unwrap();
        assert_eq!(buf.len(), ShowInfoT::SIZE);
        assert!(ShowInfoT::SIZE <= BODY_SIZE);
    }

    #[test]
    fn test_showinfo_disp_roundtrip() {
        let disp = DispInfo {
            pmode: PlayMode::PlayOn,
            teams: [Team::new("LEFT", 2), Team::default()],
            show: Show {
                time: 150,
                stopped: None,
                ball: Ball { pos: Vec2::new(10.0, -5.0), vel: None },
                players: vec![
                    {
                        let mut p = Player::new(Side::Left, 1);
                        p.pos = Vec2::new(-50.0, 0.0);
                        p.state = STATE_STAND;
                        p
                    },
                    {
                        let mut p = Player::new(Side::Right, 5);
                        p.pos = Vec2::new(30.25, -10.5);
                        p
                    },
                ],
            },
        };

        let rec = ShowInfoT::from_disp(&disp);
        let mut buf = Vec::new();
        rec.encode(&mut buf).unwrap();
        let back = ShowInfoT::decode(&mut buf.as_slice()).unwrap().to_disp();

        assert_eq!(back.pmode, PlayMode::PlayOn);
        assert_eq!(back.teams[0].name_or_null(), "LEFT");
        assert_eq!(back.teams[1].name_or_null(), "null");
        assert_eq!(back.show.time, 150);
        assert_eq!(back.show.players.len(), 2);
        assert_eq!(back.show.ball.pos, Vec2::new(10.0, -5.0));
        assert_eq!(back.show.players[1].pos, Vec2::new(30.25, -10.5));
    }

    #[test]
    fn test_msg_text_roundtrip() {
        let rec = MsgInfoT::from_text(1, "(referee play_on)");
        let mut buf = Vec::new();
        rec.encode(&mut buf).unwrap();
        let back = MsgInfoT::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(back.board, 1);
        assert_eq!(back.text(), "(referee play_on)");
    }

    #[test]
    fn test_draw_roundtrip() {
        let draw = DrawInfo::Circle {
            center: Vec2::new(0.0, 12.5),
            radius: 9.15,
            color: "red".to_string(),
        };
        let rec = DrawInfoT::from_draw(&draw);
        let mut buf = Vec::new();
        rec.encode(&mut buf).unwrap();
        let back = DrawInfoT::decode(&mut buf.as_slice()).unwrap().to_draw();
        match back {
            DrawInfo::Circle { center, radius, color } => {
                assert_eq!(center, Vec2::new(0.0, 12.5));
                assert!((radius - 9.15).abs() <= 0.5 / SHOWINFO_SCALE);
                assert_eq!(color, "red");
            }
            other => panic!("expected circle, got {:?}", other),
        }
    }
}
