//! v2 wire layout (`ULG` + 0x02): mode-tagged records with 32-bit
//! fixed-point fields at x65536. Angles travel in radians on the wire;
//! canonical angles are degrees.

use std::io::{Read, Write};

use crate::codec::{read_i16, read_i32, write_i16, write_i32, SHOWINFO_SCALE2};
use crate::types::{
    Ball, CommandCount, DispInfo, Player, PlayMode, Show, Side, Stamina, Team, Vec2, View,
    MAX_PLAYER,
};

pub use super::v1::TeamT;

fn scale(v: f64) -> i32 {
    (v * SHOWINFO_SCALE2).round() as i32
}

fn unscale(raw: i32) -> f64 {
    f64::from(raw) / SHOWINFO_SCALE2
}

/// Ball record: position and velocity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BallT {
    pub x: i32,
    pub y: i32,
    pub deltax: i32,
    pub deltay: i32,
}

impl BallT {
    pub const SIZE: usize = 16;

    pub fn encode(&self, w: &mut (impl Write + ?Sized)) -> std::io::Result<()> {
        write_i32(w, self.x)?;
        write_i32(w, self.y)?;
        write_i32(w, self.deltax)?;
        write_i32(w, self.deltay)
    }

    pub fn decode(r: &mut (impl Read + ?Sized)) -> std::io::Result<BallT> {
        Ok(BallT {
            x: read_i32(r)?,
            y: read_i32(r)?,
            deltax: read_i32(r)?,
            deltay: read_i32(r)?,
        })
    }

    pub fn from_ball(b: &Ball) -> BallT {
        let vel = b.vel.unwrap_or_default();
        BallT { x: scale(b.pos.x), y: scale(b.pos.y), deltax: scale(vel.x), deltay: scale(vel.y) }
    }

    pub fn to_ball(&self) -> Ball {
        Ball {
            pos: Vec2::new(unscale(self.x), unscale(self.y)),
            vel: Some(Vec2::new(unscale(self.deltax), unscale(self.deltay))),
        }
    }
}

/// Player record with kinematics, view, stamina and command counters.
///
/// The counter block predates tackle/point-to/attention-to; those three
/// canonical counters cannot be expressed here and reset to zero on decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerT {
    /// State bit flags; 0 disables the slot.
    pub mode: i16,
    pub type_id: i16,
    pub x: i32,
    pub y: i32,
    pub deltax: i32,
    pub deltay: i32,
    /// Radians, x65536.
    pub body_angle: i32,
    /// Neck angle relative to body; radians, x65536.
    pub head_angle: i32,
    /// Radians, x65536.
    pub view_width: i32,
    /// 1 = high quality, 0 = low.
    pub view_quality: i16,
    pub stamina: i32,
    pub effort: i32,
    pub recovery: i32,
    pub kick_count: i16,
    pub dash_count: i16,
    pub turn_count: i16,
    pub say_count: i16,
    pub turn_neck_count: i16,
    pub catch_count: i16,
    pub move_count: i16,
    pub change_view_count: i16,
}

impl PlayerT {
    pub const SIZE: usize = 2 + 2 + 7 * 4 + 2 + 3 * 4 + 8 * 2;

    pub fn encode(&self, w: &mut (impl Write + ?Sized)) -> std::io::Result<()> {
        write_i16(w, self.mode)?;
        write_i16(w, self.type_id)?;
        write_i32(w, self.x)?;
        write_i32(w, self.y)?;
        write_i32(w, self.deltax)?;
        write_i32(w, self.deltay)?;
        write_i32(w, self.body_angle)?;
        write_i32(w, self.head_angle)?;
        write_i32(w, self.view_width)?;
        write_i16(w, self.view_quality)?;
        write_i32(w, self.stamina)?;
        write_i32(w, self.effort)?;
        write_i32(w, self.recovery)?;
        write_i16(w, self.kick_count)?;
        write_i16(w, self.dash_count)?;
        write_i16(w, self.turn_count)?;
        write_i16(w, self.say_count)?;
        write_i16(w, self.turn_neck_count)?;
        write_i16(w, self.catch_count)?;
        write_i16(w, self.move_count)?;
        write_i16(w, self.change_view_count)
    }

    pub fn decode(r: &mut (impl Read + ?Sized)) -> std::io::Result<PlayerT> {
        Ok(PlayerT {
            mode: read_i16(r)?,
            type_id: read_i16(r)?,
            x: read_i32(r)?,
            y: read_i32(r)?,
            deltax: read_i32(r)?,
            deltay: read_i32(r)?,
            body_angle: read_i32(r)?,
            head_angle: read_i32(r)?,
            view_width: read_i32(r)?,
            view_quality: read_i16(r)?,
            stamina: read_i32(r)?,
            effort: read_i32(r)?,
            recovery: read_i32(r)?,
            kick_count: read_i16(r)?,
            dash_count: read_i16(r)?,
            turn_count: read_i16(r)?,
            say_count: read_i16(r)?,
            turn_neck_count: read_i16(r)?,
            catch_count: read_i16(r)?,
            move_count: read_i16(r)?,
            change_view_count: read_i16(r)?,
        })
    }

    pub fn from_player(p: &Player) -> PlayerT {
        let vel = p.vel.unwrap_or_default();
        let view = p.view.unwrap_or(View { quality_high: true, width: 90.0 });
        let stamina = p.stamina.unwrap_or(Stamina {
            stamina: 4000.0,
            effort: 1.0,
            recovery: 1.0,
            capacity: None,
        });
        let counts = p.counts.unwrap_or_default();
        PlayerT {
            mode: p.state as i16,
            type_id: p.type_id,
            x: scale(p.pos.x),
            y: scale(p.pos.y),
            deltax: scale(vel.x),
            deltay: scale(vel.y),
            body_angle: scale(p.body.to_radians()),
            head_angle: scale(p.neck.unwrap_or(0.0).to_radians()),
            view_width: scale(view.width.to_radians()),
            view_quality: i16::from(view.quality_high),
            stamina: scale(stamina.stamina),
            effort: scale(stamina.effort),
            recovery: scale(stamina.recovery),
            kick_count: counts.kick as i16,
            dash_count: counts.dash as i16,
            turn_count: counts.turn as i16,
            say_count: counts.say as i16,
            turn_neck_count: counts.turn_neck as i16,
            catch_count: counts.catch as i16,
            move_count: counts.move_ as i16,
            change_view_count: counts.change_view as i16,
        }
    }

    pub fn to_player(&self, side: Side, unum: u8) -> Player {
        Player {
            side,
            unum,
            type_id: self.type_id,
            state: self.mode as u16 as u32,
            pos: Vec2::new(unscale(self.x), unscale(self.y)),
            vel: Some(Vec2::new(unscale(self.deltax), unscale(self.deltay))),
            body: unscale(self.body_angle).to_degrees(),
            neck: Some(unscale(self.head_angle).to_degrees()),
            point_to: None,
            view: Some(View {
                quality_high: self.view_quality != 0,
                width: unscale(self.view_width).to_degrees(),
            }),
            stamina: Some(Stamina {
                stamina: unscale(self.stamina),
                effort: unscale(self.effort),
                recovery: unscale(self.recovery),
                capacity: None,
            }),
            focus: None,
            counts: Some(CommandCount {
                kick: self.kick_count as u16,
                dash: self.dash_count as u16,
                turn: self.turn_count as u16,
                catch: self.catch_count as u16,
                move_: self.move_count as u16,
                turn_neck: self.turn_neck_count as u16,
                change_view: self.change_view_count as u16,
                say: self.say_count as u16,
                tackle: 0,
                point_to: 0,
                attention_to: 0,
            }),
        }
    }
}

/// Full snapshot record of one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowInfoT2 {
    pub pmode: u8,
    pub teams: [TeamT; 2],
    pub ball: BallT,
    pub pos: [PlayerT; MAX_PLAYER * 2],
    pub time: i16,
}

impl Default for ShowInfoT2 {
    fn default() -> Self {
        ShowInfoT2 {
            pmode: 0,
            teams: [TeamT::default(); 2],
            ball: BallT::default(),
            pos: [PlayerT::default(); MAX_PLAYER * 2],
            time: 0,
        }
    }
}

impl ShowInfoT2 {
    pub const SIZE: usize =
        1 + 2 * TeamT::SIZE + BallT::SIZE + MAX_PLAYER * 2 * PlayerT::SIZE + 2;

    pub fn encode(&self, w: &mut (impl Write + ?Sized)) -> std::io::Result<()> {
        w.write_all(&[self.pmode])?;
        for t in &self.teams {
            t.encode(w)?;
        }
        self.ball.encode(w)?;
        for p in &self.pos {
            p.encode(w)?;
        }
        write_i16(w, self.time)
    }

    pub fn decode(r: &mut (impl Read + ?Sized)) -> std::io::Result<ShowInfoT2> {
        let mut pmode = [0u8; 1];
        r.read_exact(&mut pmode)?;
        let teams = [TeamT::decode(r)?, TeamT::decode(r)?];
        let ball = BallT::decode(r)?;
        let mut pos = [PlayerT::default(); MAX_PLAYER * 2];
        for slot in pos.iter_mut() {
            *slot = PlayerT::decode(r)?;
        }
        Ok(ShowInfoT2 { pmode: pmode[0], teams, ball, pos, time: read_i16(r)? })
    }

    pub fn from_disp(disp: &DispInfo) -> ShowInfoT2 {
        let mut rec = ShowInfoT2 {
            pmode: disp.pmode.as_u8(),
            teams: [TeamT::from_team(&disp.teams[0]), TeamT::from_team(&disp.teams[1])],
            ball: BallT::from_ball(&disp.show.ball),
            time: disp.show.time.min(i16::MAX as u32) as i16,
            ..ShowInfoT2::default()
        };
        for p in &disp.show.players {
            if let Some(slot) = player_slot(p.side, p.unum) {
                rec.pos[slot] = PlayerT::from_player(p);
            }
        }
        rec
    }

    pub fn to_disp(&self) -> DispInfo {
        DispInfo {
            pmode: PlayMode::from_u8(self.pmode).unwrap_or(PlayMode::Null),
            teams: [self.teams[0].to_team(), self.teams[1].to_team()],
            show: Show {
                time: self.time.max(0) as u32,
                stopped: None,
                ball: self.ball.to_ball(),
                players: slots_to_players(&self.pos),
            },
        }
    }
}

/// Slot index of a player in the fixed 22-entry block: left 1..11 map to
/// 0..10, right 1..11 to 11..21.
pub fn player_slot(side: Side, unum: u8) -> Option<usize> {
    if unum == 0 || unum as usize > MAX_PLAYER {
        return None;
    }
    match side {
        Side::Left => Some(unum as usize - 1),
        Side::Right => Some(MAX_PLAYER + unum as usize - 1),
        Side::Neutral => None,
    }
}

pub fn slots_to_players(slots: &[PlayerT; MAX_PLAYER * 2]) -> Vec<Player> {
    slots
        .iter()
        .enumerate()
        .filter(|(_, p)| p.mode != 0)
        .map(|(i, p)| {
            let (side, unum) = if i < MAX_PLAYER {
                (Side::Left, i as u8 + 1)
            } else {
                (Side::Right, (i - MAX_PLAYER) as u8 + 1)
            };
            p.to_player(side, unum)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::STATE_STAND;

    fn sample_player() -> Player {
        let mut p = Player::new(Side::Right, 9);
        p.state = STATE_STAND;
        p.type_id = 3;
        p.pos = Vec2::new(-20.1234, 5.5);
        p.vel = Some(Vec2::new(0.4, -0.25));
        p.body = 45.0;
        p.neck = Some(-30.0);
        p.view = Some(View { quality_high: true, width: 60.0 });
        p.stamina = Some(Stamina { stamina: 3500.5, effort: 0.8, recovery: 1.0, capacity: None });
        p.counts = Some(CommandCount { kick: 5, dash: 120, say: 7, ..Default::default() });
        p
    }

    #[test]
    fn test_player_roundtrip_within_scale() {
        let p = sample_player();
        let rec = PlayerT::from_player(&p);
        let mut buf = Vec::new();
        rec.encode(&mut buf).unwrap();
        assert_eq!(buf.len(), PlayerT::SIZE);

        let back = PlayerT::decode(&mut buf.as_slice()).unwrap().to_player(Side::Right, 9);
        let eps = 1.0 / SHOWINFO_SCALE2;
        assert!((back.pos.x - p.pos.x).abs() <= eps);
        assert!((back.pos.y - p.pos.y).abs() <= eps);
        let vel = back.vel.unwrap();
        assert!((vel.x - 0.4).abs() <= eps);
        // radians quantization leaves degree-level error well under 0.001
        assert!((back.body - 45.0).abs() <= 1e-3);
        assert!((back.neck.unwrap() + 30.0).abs() <= 1e-3);
        let st = back.stamina.unwrap();
        assert!((st.stamina - 3500.5).abs() <= eps * 2.0);
        assert_eq!(back.counts.unwrap().dash, 120);
        assert_eq!(back.type_id, 3);
    }

    #[test]
    fn test_showinfo2_disp_roundtrip() {
        let disp = DispInfo {
            pmode: PlayMode::KickOffLeft,
            teams: [Team::new("A", 0), Team::new("B", 1)],
            show: Show {
                time: 1,
                stopped: None,
                ball: Ball { pos: Vec2::new(0.0, 0.0), vel: Some(Vec2::new(1.5, 0.0)) },
                players: vec![sample_player()],
            },
        };
        let rec = ShowInfoT2::from_disp(&disp);
        let mut buf = Vec::new();
        rec.encode(&mut buf).unwrap();
        assert_eq!(buf.len(), ShowInfoT2::SIZE);

        let back = ShowInfoT2::decode(&mut buf.as_slice()).unwrap().to_disp();
        assert_eq!(back.pmode, PlayMode::KickOffLeft);
        assert_eq!(back.show.players.len(), 1);
        assert_eq!(back.show.players[0].side, Side::Right);
        assert_eq!(back.show.players[0].unum, 9);
        assert_eq!(back.show.ball.vel.unwrap().x, 1.5);
    }

    #[test]
    fn test_player_slot_mapping() {
        assert_eq!(player_slot(Side::Left, 1), Some(0));
        assert_eq!(player_slot(Side::Left, 11), Some(10));
        assert_eq!(player_slot(Side::Right, 1), Some(11));
        assert_eq!(player_slot(Side::Right, 11), Some(21));
        assert_eq!(player_slot(Side::Left, 0), None);
        assert_eq!(player_slot(Side::Left, 12), None);
        assert_eq!(player_slot(Side::Neutral, 5), None);
    }
}
