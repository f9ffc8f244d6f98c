//! v3 wire layout (`ULG` + 0x03).
//!
//! Show records shrink to [`ShortShowInfoT2`] (play mode and teams travel
//! as separate PM/TEAM records), and the match parameters gain binary
//! blocks: [`ServerParamsT`], [`PlayerParamsT`], [`PlayerTypeT`]. Parameter
//! doubles are 32-bit fixed point at x65536; counters and switches are
//! 16-bit. Block layout is the declaration order below and is append-only.

use std::io::{Read, Write};

use crate::codec::{read_i16, read_i32, write_i16, write_i32, SHOWINFO_SCALE2};
use crate::types::{PlayerParam, PlayerType, ServerParam, Show, MAX_PLAYER};

pub use super::v2::{player_slot, slots_to_players, BallT, PlayerT, TeamT};

/// Show record without play mode or team state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortShowInfoT2 {
    pub ball: BallT,
    pub pos: [PlayerT; MAX_PLAYER * 2],
    pub time: i16,
}

impl Default for ShortShowInfoT2 {
    fn default() -> Self {
        ShortShowInfoT2 {
            ball: BallT::default(),
            pos: [PlayerT::default(); MAX_PLAYER * 2],
            time: 0,
        }
    }
}

impl ShortShowInfoT2 {
    pub const SIZE: usize = BallT::SIZE + MAX_PLAYER * 2 * PlayerT::SIZE + 2;

    pub fn encode(&self, w: &mut (impl Write + ?Sized)) -> std::io::Result<()> {
        self.ball.encode(w)?;
        for p in &self.pos {
            p.encode(w)?;
        }
        write_i16(w, self.time)
    }

    pub fn decode(r: &mut (impl Read + ?Sized)) -> std::io::Result<ShortShowInfoT2> {
        let ball = BallT::decode(r)?;
        let mut pos = [PlayerT::default(); MAX_PLAYER * 2];
        for slot in pos.iter_mut() {
            *slot = PlayerT::decode(r)?;
        }
        Ok(ShortShowInfoT2 { ball, pos, time: read_i16(r)? })
    }

    pub fn from_show(show: &Show) -> ShortShowInfoT2 {
        let mut rec = ShortShowInfoT2 {
            ball: BallT::from_ball(&show.ball),
            time: show.time.min(i16::MAX as u32) as i16,
            ..ShortShowInfoT2::default()
        };
        for p in &show.players {
            if let Some(slot) = player_slot(p.side, p.unum) {
                rec.pos[slot] = PlayerT::from_player(p);
            }
        }
        rec
    }

    pub fn to_show(&self) -> Show {
        Show {
            time: self.time.max(0) as u32,
            stopped: None,
            ball: self.ball.to_ball(),
            players: slots_to_players(&self.pos),
        }
    }
}

/// Generates one binary parameter block: the wire struct, its byte layout,
/// and total conversions to/from the canonical struct of the same field
/// names. Kinds: `scaled` = f64 as i32 x65536, `short` = i32 as i16,
/// `bool16` = bool as i16, `raw32` = i32 verbatim.
macro_rules! param_block {
    (
        $(#[$meta:meta])*
        $wire:ident, $canon:ident, {
            $( $field:ident : $kind:tt, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $wire {
            $( pub $field: param_block!(@ty $kind), )*
        }

        impl $wire {
            pub const SIZE: usize = 0 $( + param_block!(@size $kind) )*;

            pub fn encode(&self, w: &mut (impl Write + ?Sized)) -> std::io::Result<()> {
                $( param_block!(@write w, self.$field, $kind)?; )*
                Ok(())
            }

            pub fn decode(r: &mut (impl Read + ?Sized)) -> std::io::Result<$wire> {
                Ok($wire {
                    $( $field: param_block!(@read r, $kind)?, )*
                })
            }

            pub fn from_param(p: &$canon) -> $wire {
                $wire {
                    $( $field: param_block!(@from p.$field, $kind), )*
                }
            }

            pub fn to_param(&self) -> $canon {
                $canon {
                    $( $field: param_block!(@to self.$field, $kind), )*
                }
            }
        }
    };

    (@ty scaled) => { i32 };
    (@ty raw32) => { i32 };
    (@ty short) => { i16 };
    (@ty bool16) => { i16 };

    (@size scaled) => { 4 };
    (@size raw32) => { 4 };
    (@size short) => { 2 };
    (@size bool16) => { 2 };

    (@write $w:ident, $v:expr, scaled) => { write_i32($w, $v) };
    (@write $w:ident, $v:expr, raw32) => { write_i32($w, $v) };
    (@write $w:ident, $v:expr, short) => { write_i16($w, $v) };
    (@write $w:ident, $v:expr, bool16) => { write_i16($w, $v) };

    (@read $r:ident, scaled) => { read_i32($r) };
    (@read $r:ident, raw32) => { read_i32($r) };
    (@read $r:ident, short) => { read_i16($r) };
    (@read $r:ident, bool16) => { read_i16($r) };

    (@from $v:expr, scaled) => { ($v * SHOWINFO_SCALE2).round() as i32 };
    (@from $v:expr, raw32) => { $v };
    (@from $v:expr, short) => { $v as i16 };
    (@from $v:expr, bool16) => { i16::from($v) };

    (@to $v:expr, scaled) => { f64::from($v) / SHOWINFO_SCALE2 };
    (@to $v:expr, raw32) => { $v };
    (@to $v:expr, short) => { i32::from($v) };
    (@to $v:expr, bool16) => { $v != 0 };
}

param_block! {
    /// Binary server-parameter block.
    ServerParamsT, ServerParam, {
        goal_width: scaled,
        inertia_moment: scaled,
        player_size: scaled,
        player_decay: scaled,
        player_rand: scaled,
        player_weight: scaled,
        player_speed_max: scaled,
        player_accel_max: scaled,
        stamina_max: scaled,
        stamina_inc_max: scaled,
        recover_init: scaled,
        recover_dec_thr: scaled,
        recover_min: scaled,
        recover_dec: scaled,
        effort_init: scaled,
        effort_dec_thr: scaled,
        effort_min: scaled,
        effort_dec: scaled,
        effort_inc_thr: scaled,
        effort_inc: scaled,
        kick_rand: scaled,
        team_actuator_noise: bool16,
        player_rand_factor_l: scaled,
        player_rand_factor_r: scaled,
        kick_rand_factor_l: scaled,
        kick_rand_factor_r: scaled,
        ball_size: scaled,
        ball_decay: scaled,
        ball_rand: scaled,
        ball_weight: scaled,
        ball_speed_max: scaled,
        ball_accel_max: scaled,
        dash_power_rate: scaled,
        kick_power_rate: scaled,
        kickable_margin: scaled,
        control_radius: scaled,
        control_radius_width: scaled,
        max_power: scaled,
        min_power: scaled,
        max_moment: scaled,
        min_moment: scaled,
        max_neck_moment: scaled,
        min_neck_moment: scaled,
        max_neck_angle: scaled,
        min_neck_angle: scaled,
        visible_angle: scaled,
        visible_distance: scaled,
        wind_dir: scaled,
        wind_force: scaled,
        wind_ang: scaled,
        wind_rand: scaled,
        kickable_area: scaled,
        catchable_area_l: scaled,
        catchable_area_w: scaled,
        catch_probability: scaled,
        goalie_max_moves: short,
        corner_kick_margin: scaled,
        offside_active_area_size: scaled,
        wind_none: bool16,
        wind_random: bool16,
        say_coach_cnt_max: short,
        say_coach_msg_size: short,
        clang_win_size: short,
        clang_define_win: short,
        clang_meta_win: short,
        clang_advice_win: short,
        clang_info_win: short,
        clang_mess_delay: short,
        clang_mess_per_cycle: short,
        half_time: short,
        simulator_step: short,
        send_step: short,
        recv_step: short,
        sense_body_step: short,
        lcm_step: short,
        say_msg_size: short,
        hear_max: short,
        hear_inc: short,
        hear_decay: short,
        catch_ban_cycle: short,
        slow_down_factor: short,
        use_offside: bool16,
        forbid_kick_off_offside: bool16,
        offside_kick_margin: scaled,
        audio_cut_dist: scaled,
        quantize_step: scaled,
        quantize_step_l: scaled,
        start_goal_l: short,
        start_goal_r: short,
        fullstate_l: bool16,
        fullstate_r: bool16,
        drop_ball_time: short,
    }
}

param_block! {
    /// Binary heterogeneous-player tradeoff block.
    PlayerParamsT, PlayerParam, {
        player_types: short,
        subs_max: short,
        pt_max: short,
        player_speed_max_delta_min: scaled,
        player_speed_max_delta_max: scaled,
        stamina_inc_max_delta_factor: scaled,
        player_decay_delta_min: scaled,
        player_decay_delta_max: scaled,
        inertia_moment_delta_factor: scaled,
        dash_power_rate_delta_min: scaled,
        dash_power_rate_delta_max: scaled,
        player_size_delta_factor: scaled,
        kickable_margin_delta_min: scaled,
        kickable_margin_delta_max: scaled,
        kick_rand_delta_factor: scaled,
        extra_stamina_delta_min: scaled,
        extra_stamina_delta_max: scaled,
        effort_max_delta_factor: scaled,
        effort_min_delta_factor: scaled,
        random_seed: raw32,
        new_dash_power_rate_delta_min: scaled,
        new_dash_power_rate_delta_max: scaled,
        new_stamina_inc_max_delta_factor: scaled,
        allow_mult_default_type: bool16,
    }
}

param_block! {
    /// Binary player-type block.
    PlayerTypeT, PlayerType, {
        id: short,
        player_speed_max: scaled,
        stamina_inc_max: scaled,
        player_decay: scaled,
        inertia_moment: scaled,
        dash_power_rate: scaled,
        player_size: scaled,
        kickable_margin: scaled,
        kick_rand: scaled,
        extra_stamina: scaled,
        effort_max: scaled,
        effort_min: scaled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Ball, Player, Side, Vec2};

    #[test]
    fn test_short_show_roundtrip() {
        let mut p = Player::new(Side::Left, 10);
        p.pos = Vec2::new(12.5, -3.25);
        let show = Show {
            time: 2999,
            stopped: None,
            ball: Ball { pos: Vec2::new(-1.0, 1.0), vel: Some(Vec2::new(0.0, -2.5)) },
            players: vec![p],
        };

        let rec = ShortShowInfoT2::from_show(&show);
        let mut buf = Vec::new();
        rec.encode(&mut buf).unwrap();
        assert_eq!(buf.len(), ShortShowInfoT2::SIZE);

        let back = ShortShowInfoT2::decode(&mut buf.as_slice()).unwrap().to_show();
        assert_eq!(back.time, 2999);
        assert_eq!(back.players.len(), 1);
        assert_eq!(back.players[0].unum, 10);
        assert_eq!(back.ball.pos, Vec2::new(-1.0, 1.0));
    }

    #[test]
    fn test_server_params_roundtrip() {
        let param = ServerParam::default();
        let rec = ServerParamsT::from_param(&param);

        let mut buf = Vec::new();
        rec.encode(&mut buf).unwrap();
        assert_eq!(buf.len(), ServerParamsT::SIZE);

        let back = ServerParamsT::decode(&mut buf.as_slice()).unwrap().to_param();
        let eps = 1.0 / SHOWINFO_SCALE2;
        assert!((back.goal_width - param.goal_width).abs() <= eps);
        assert!((back.ball_decay - param.ball_decay).abs() <= eps);
        assert!((back.kickable_margin - param.kickable_margin).abs() <= eps);
        assert_eq!(back.half_time, param.half_time);
        assert_eq!(back.use_offside, param.use_offside);
        assert_eq!(back.goalie_max_moves, param.goalie_max_moves);
        assert_eq!(back.lcm_step, param.lcm_step);
    }

    #[test]
    fn test_player_params_roundtrip() {
        let param = PlayerParam { random_seed: 123456789, ..PlayerParam::default() };
        let rec = PlayerParamsT::from_param(&param);
        let mut buf = Vec::new();
        rec.encode(&mut buf).unwrap();
        assert_eq!(buf.len(), PlayerParamsT::SIZE);

        let back = PlayerParamsT::decode(&mut buf.as_slice()).unwrap().to_param();
        assert_eq!(back.player_types, 18);
        assert_eq!(back.random_seed, 123456789);
        assert!(!back.allow_mult_default_type);
        let eps = 1.0 / SHOWINFO_SCALE2;
        assert!((back.new_stamina_inc_max_delta_factor + 6000.0).abs() <= eps);
    }

    #[test]
    fn test_player_type_roundtrip() {
        let pt = PlayerType { id: 7, player_speed_max: 1.05, ..PlayerType::default() };
        let rec = PlayerTypeT::from_param(&pt);
        let mut buf = Vec::new();
        rec.encode(&mut buf).unwrap();
        assert_eq!(buf.len(), PlayerTypeT::SIZE);

        let back = PlayerTypeT::decode(&mut buf.as_slice()).unwrap().to_param();
        assert_eq!(back.id, 7);
        assert!((back.player_speed_max - 1.05).abs() <= 1.0 / SHOWINFO_SCALE2);
    }
}
