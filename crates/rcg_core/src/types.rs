//! Canonical, version-independent representation of one match log.
//!
//! Every wire version converts to and from these structs. Fields that some
//! versions cannot express are `Option`; presence is never inferred from a
//! sentinel value, so a legitimate zero survives a round trip.

use serde::{Deserialize, Serialize};

/// Players per side.
pub const MAX_PLAYER: usize = 11;

// Player state bit flags (shared by the binary player records and the
// hex state field of the text show records).
pub const STATE_DISABLE: u32 = 0x0000;
pub const STATE_STAND: u32 = 0x0001;
pub const STATE_KICK: u32 = 0x0002;
pub const STATE_KICK_FAULT: u32 = 0x0004;
pub const STATE_GOALIE: u32 = 0x0008;
pub const STATE_CATCH: u32 = 0x0010;
pub const STATE_CATCH_FAULT: u32 = 0x0020;
pub const STATE_BALL_COLLIDE: u32 = 0x0400;
pub const STATE_PLAYER_COLLIDE: u32 = 0x0800;
pub const STATE_TACKLE: u32 = 0x1000;
pub const STATE_TACKLE_FAULT: u32 = 0x2000;

/// Field coordinate or velocity in meters / meters-per-cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Which goal a player defends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
    Neutral,
}

impl Side {
    pub fn as_char(&self) -> char {
        match self {
            Side::Left => 'l',
            Side::Right => 'r',
            Side::Neutral => 'n',
        }
    }

    pub fn from_char(c: char) -> Option<Side> {
        match c {
            'l' => Some(Side::Left),
            'r' => Some(Side::Right),
            'n' => Some(Side::Neutral),
            _ => None,
        }
    }

    /// Wire encoding used by the binary player records (1 = left, -1 = right).
    pub fn to_wire(&self) -> i16 {
        match self {
            Side::Left => 1,
            Side::Right => -1,
            Side::Neutral => 0,
        }
    }

    pub fn from_wire(v: i16) -> Side {
        match v {
            v if v > 0 => Side::Left,
            v if v < 0 => Side::Right,
            _ => Side::Neutral,
        }
    }
}

/// The referee play modes, in wire-ordinal order.
///
/// The ordinal is the byte written by the binary PM records; the string is
/// what the text versions and the live protocol use. The set is closed:
/// a version never renumbers an existing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum PlayMode {
    #[default]
    Null = 0,
    BeforeKickOff,
    TimeOver,
    PlayOn,
    KickOffLeft,
    KickOffRight,
    KickInLeft,
    KickInRight,
    FreeKickLeft,
    FreeKickRight,
    CornerKickLeft,
    CornerKickRight,
    GoalKickLeft,
    GoalKickRight,
    AfterGoalLeft,
    AfterGoalRight,
    DropBall,
    OffsideLeft,
    OffsideRight,
    PenaltyKickLeft,
    PenaltyKickRight,
    FirstHalfOver,
    Pause,
    Human,
    FoulChargeLeft,
    FoulChargeRight,
    FoulPushLeft,
    FoulPushRight,
    FoulMultipleAttackerLeft,
    FoulMultipleAttackerRight,
    FoulBallOutLeft,
    FoulBallOutRight,
    BackPassLeft,
    BackPassRight,
    FreeKickFaultLeft,
    FreeKickFaultRight,
    CatchFaultLeft,
    CatchFaultRight,
    IndFreeKickLeft,
    IndFreeKickRight,
    PenaltySetupLeft,
    PenaltySetupRight,
    PenaltyReadyLeft,
    PenaltyReadyRight,
    PenaltyTakenLeft,
    PenaltyTakenRight,
    PenaltyMissLeft,
    PenaltyMissRight,
    PenaltyScoreLeft,
    PenaltyScoreRight,
}

impl PlayMode {
    pub const MAX: u8 = PlayMode::PenaltyScoreRight as u8;

    const STRINGS: [&'static str; 50] = [
        "",
        "before_kick_off",
        "time_over",
        "play_on",
        "kick_off_l",
        "kick_off_r",
        "kick_in_l",
        "kick_in_r",
        "free_kick_l",
        "free_kick_r",
        "corner_kick_l",
        "corner_kick_r",
        "goal_kick_l",
        "goal_kick_r",
        "goal_l",
        "goal_r",
        "drop_ball",
        "offside_l",
        "offside_r",
        "penalty_kick_l",
        "penalty_kick_r",
        "first_half_over",
        "pause",
        "human_judge",
        "foul_charge_l",
        "foul_charge_r",
        "foul_push_l",
        "foul_push_r",
        "foul_multiple_attack_l",
        "foul_multiple_attack_r",
        "foul_ballout_l",
        "foul_ballout_r",
        "back_pass_l",
        "back_pass_r",
        "free_kick_fault_l",
        "free_kick_fault_r",
        "catch_fault_l",
        "catch_fault_r",
        "indirect_free_kick_l",
        "indirect_free_kick_r",
        "penalty_setup_l",
        "penalty_setup_r",
        "penalty_ready_l",
        "penalty_ready_r",
        "penalty_taken_l",
        "penalty_taken_r",
        "penalty_miss_l",
        "penalty_miss_r",
        "penalty_score_l",
        "penalty_score_r",
    ];

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    pub fn from_u8(v: u8) -> Option<PlayMode> {
        if v > Self::MAX {
            return None;
        }
        Some(match v {
            0 => PlayMode::Null,
            1 => PlayMode::BeforeKickOff,
            2 => PlayMode::TimeOver,
            3 => PlayMode::PlayOn,
            4 => PlayMode::KickOffLeft,
            5 => PlayMode::KickOffRight,
            6 => PlayMode::KickInLeft,
            7 => PlayMode::KickInRight,
            8 => PlayMode::FreeKickLeft,
            9 => PlayMode::FreeKickRight,
            10 => PlayMode::CornerKickLeft,
            11 => PlayMode::CornerKickRight,
            12 => PlayMode::GoalKickLeft,
            13 => PlayMode::GoalKickRight,
            14 => PlayMode::AfterGoalLeft,
            15 => PlayMode::AfterGoalRight,
            16 => PlayMode::DropBall,
            17 => PlayMode::OffsideLeft,
            18 => PlayMode::OffsideRight,
            19 => PlayMode::PenaltyKickLeft,
            20 => PlayMode::PenaltyKickRight,
            21 => PlayMode::FirstHalfOver,
            22 => PlayMode::Pause,
            23 => PlayMode::Human,
            24 => PlayMode::FoulChargeLeft,
            25 => PlayMode::FoulChargeRight,
            26 => PlayMode::FoulPushLeft,
            27 => PlayMode::FoulPushRight,
            28 => PlayMode::FoulMultipleAttackerLeft,
            29 => PlayMode::FoulMultipleAttackerRight,
            30 => PlayMode::FoulBallOutLeft,
            31 => PlayMode::FoulBallOutRight,
            32 => PlayMode::BackPassLeft,
            33 => PlayMode::BackPassRight,
            34 => PlayMode::FreeKickFaultLeft,
            35 => PlayMode::FreeKickFaultRight,
            36 => PlayMode::CatchFaultLeft,
            37 => PlayMode::CatchFaultRight,
            38 => PlayMode::IndFreeKickLeft,
            39 => PlayMode::IndFreeKickRight,
            40 => PlayMode::PenaltySetupLeft,
            41 => PlayMode::PenaltySetupRight,
            42 => PlayMode::PenaltyReadyLeft,
            43 => PlayMode::PenaltyReadyRight,
            44 => PlayMode::PenaltyTakenLeft,
            45 => PlayMode::PenaltyTakenRight,
            46 => PlayMode::PenaltyMissLeft,
            47 => PlayMode::PenaltyMissRight,
            48 => PlayMode::PenaltyScoreLeft,
            49 => PlayMode::PenaltyScoreRight,
            _ => unreachable!(),
        })
    }

    pub fn as_str(&self) -> &'static str {
        Self::STRINGS[*self as usize]
    }

    /// Parse a play mode name as it appears in text logs.
    ///
    /// `goal_l`/`goal_r` may carry the new score as a suffix ("goal_l_2");
    /// the suffix is informational and stripped here.
    pub fn parse(s: &str) -> Option<PlayMode> {
        if let Some(idx) = Self::STRINGS.iter().position(|&m| m == s) {
            return Self::from_u8(idx as u8);
        }
        if s.starts_with("goal_l_") {
            return Some(PlayMode::AfterGoalLeft);
        }
        if s.starts_with("goal_r_") {
            return Some(PlayMode::AfterGoalRight);
        }
        None
    }
}

/// One side's team record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Team {
    /// `None` until the team connects; rendered as the literal "null".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub score: u16,
    /// Penalty shoot-out score.
    #[serde(default)]
    pub pen_score: u16,
    /// Penalty shoot-out misses.
    #[serde(default)]
    pub pen_miss: u16,
}

impl Team {
    pub fn new(name: impl Into<String>, score: u16) -> Self {
        Self { name: Some(name.into()), score, pen_score: 0, pen_miss: 0 }
    }

    /// Name as written on the wire: absent teams are the literal "null".
    pub fn name_or_null(&self) -> &str {
        self.name.as_deref().unwrap_or("null")
    }

    pub fn from_wire_name(name: &str, score: u16) -> Self {
        let name =
            if name.is_empty() || name == "null" { None } else { Some(name.to_string()) };
        Self { name, score, pen_score: 0, pen_miss: 0 }
    }

    pub fn has_pen_record(&self) -> bool {
        self.pen_score > 0 || self.pen_miss > 0
    }
}

/// Ball state for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Absent in wire formats that carry no ball velocity (v1).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vel: Option<Vec2>,
}

impl Ball {
    pub fn has_velocity(&self) -> bool {
        self.vel.is_some()
    }
}

/// View mode of one player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub quality_high: bool,
    /// View width in degrees.
    pub width: f64,
}

/// Stamina model state of one player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stamina {
    pub stamina: f64,
    pub effort: f64,
    pub recovery: f64,
    /// Remaining stamina capacity; only v5+ text logs carry it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<f64>,
}

/// Monotone per-player command counters.
///
/// A counter increasing between two consecutive snapshots is the only way a
/// consumer recovers "this command executed this cycle" from the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommandCount {
    pub kick: u16,
    pub dash: u16,
    pub turn: u16,
    pub catch: u16,
    #[serde(rename = "move")]
    pub move_: u16,
    pub turn_neck: u16,
    pub change_view: u16,
    pub say: u16,
    pub tackle: u16,
    pub point_to: u16,
    pub attention_to: u16,
}

impl CommandCount {
    /// True when every counter of `self` is >= the matching counter of
    /// `prev`; decoded sequences must satisfy this pairwise.
    pub fn is_monotone_after(&self, prev: &CommandCount) -> bool {
        self.kick >= prev.kick
            && self.dash >= prev.dash
            && self.turn >= prev.turn
            && self.catch >= prev.catch
            && self.move_ >= prev.move_
            && self.turn_neck >= prev.turn_neck
            && self.change_view >= prev.change_view
            && self.say >= prev.say
            && self.tackle >= prev.tackle
            && self.point_to >= prev.point_to
            && self.attention_to >= prev.attention_to
    }
}

/// One player's snapshot within a show record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub side: Side,
    pub unum: u8,
    /// Heterogeneous player type id; 0 for formats that predate types.
    pub type_id: i16,
    /// Bit flags (STATE_*); 0 means disabled/not on the pitch.
    pub state: u32,
    pub pos: Vec2,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vel: Option<Vec2>,
    /// Body direction, degrees.
    pub body: f64,
    /// Neck direction relative to body, degrees. Absent in v1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neck: Option<f64>,
    /// Point-to target; only present while the arm is up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_to: Option<Vec2>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<View>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stamina: Option<Stamina>,
    /// Attention focus target (side, unum).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<(Side, u8)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<CommandCount>,
}

impl Player {
    /// A minimal enabled player; optional blocks absent.
    pub fn new(side: Side, unum: u8) -> Self {
        Self {
            side,
            unum,
            type_id: 0,
            state: STATE_STAND,
            pos: Vec2::default(),
            vel: None,
            body: 0.0,
            neck: None,
            point_to: None,
            view: None,
            stamina: None,
            focus: None,
            counts: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.state != STATE_DISABLE
    }

    pub fn is_goalie(&self) -> bool {
        self.state & STATE_GOALIE != 0
    }

    pub fn has_velocity(&self) -> bool {
        self.vel.is_some()
    }

    pub fn has_neck(&self) -> bool {
        self.neck.is_some()
    }

    pub fn has_view(&self) -> bool {
        self.view.is_some()
    }

    pub fn has_stamina(&self) -> bool {
        self.stamina.is_some()
    }

    pub fn is_pointing(&self) -> bool {
        self.point_to.is_some()
    }

    pub fn is_focusing(&self) -> bool {
        self.focus.is_some()
    }
}

/// Full positional state of one simulation cycle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Show {
    /// Game time in cycles; monotone non-negative.
    pub time: u32,
    /// Stopped-clock counter; only v6 text logs carry it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopped: Option<u32>,
    pub ball: Ball,
    /// Up to `2 * MAX_PLAYER` entries, left side first by convention.
    pub players: Vec<Player>,
}

impl Show {
    pub fn find_player(&self, side: Side, unum: u8) -> Option<&Player> {
        self.players.iter().find(|p| p.side == side && p.unum == unum)
    }
}

/// The unit of "current full visible state" a high-level serialize call
/// consumes: play mode, both teams, one show.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DispInfo {
    pub pmode: PlayMode,
    pub teams: [Team; 2],
    pub show: Show,
}

/// Free-form debug drawing attached to a cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawInfo {
    Clear,
    Point { pos: Vec2, color: String },
    Circle { center: Vec2, radius: f64, color: String },
    Line { from: Vec2, to: Vec2, color: String },
}

/// Match tuning parameters announced once near the start of a log.
///
/// Field order is load-bearing: the v3 binary parameter block serializes
/// these in exactly this order. New fields only ever go at the end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerParam {
    pub goal_width: f64,
    pub inertia_moment: f64,
    pub player_size: f64,
    pub player_decay: f64,
    pub player_rand: f64,
    pub player_weight: f64,
    pub player_speed_max: f64,
    pub player_accel_max: f64,
    pub stamina_max: f64,
    pub stamina_inc_max: f64,
    pub recover_init: f64,
    pub recover_dec_thr: f64,
    pub recover_min: f64,
    pub recover_dec: f64,
    pub effort_init: f64,
    pub effort_dec_thr: f64,
    pub effort_min: f64,
    pub effort_dec: f64,
    pub effort_inc_thr: f64,
    pub effort_inc: f64,
    pub kick_rand: f64,
    pub team_actuator_noise: bool,
    pub player_rand_factor_l: f64,
    pub player_rand_factor_r: f64,
    pub kick_rand_factor_l: f64,
    pub kick_rand_factor_r: f64,
    pub ball_size: f64,
    pub ball_decay: f64,
    pub ball_rand: f64,
    pub ball_weight: f64,
    pub ball_speed_max: f64,
    pub ball_accel_max: f64,
    pub dash_power_rate: f64,
    pub kick_power_rate: f64,
    pub kickable_margin: f64,
    pub control_radius: f64,
    pub control_radius_width: f64,
    pub max_power: f64,
    pub min_power: f64,
    pub max_moment: f64,
    pub min_moment: f64,
    pub max_neck_moment: f64,
    pub min_neck_moment: f64,
    pub max_neck_angle: f64,
    pub min_neck_angle: f64,
    pub visible_angle: f64,
    pub visible_distance: f64,
    pub wind_dir: f64,
    pub wind_force: f64,
    pub wind_ang: f64,
    pub wind_rand: f64,
    pub kickable_area: f64,
    pub catchable_area_l: f64,
    pub catchable_area_w: f64,
    pub catch_probability: f64,
    pub goalie_max_moves: i32,
    pub corner_kick_margin: f64,
    pub offside_active_area_size: f64,
    pub wind_none: bool,
    pub wind_random: bool,
    pub say_coach_cnt_max: i32,
    pub say_coach_msg_size: i32,
    pub clang_win_size: i32,
    pub clang_define_win: i32,
    pub clang_meta_win: i32,
    pub clang_advice_win: i32,
    pub clang_info_win: i32,
    pub clang_mess_delay: i32,
    pub clang_mess_per_cycle: i32,
    pub half_time: i32,
    pub simulator_step: i32,
    pub send_step: i32,
    pub recv_step: i32,
    pub sense_body_step: i32,
    pub lcm_step: i32,
    pub say_msg_size: i32,
    pub hear_max: i32,
    pub hear_inc: i32,
    pub hear_decay: i32,
    pub catch_ban_cycle: i32,
    pub slow_down_factor: i32,
    pub use_offside: bool,
    pub forbid_kick_off_offside: bool,
    pub offside_kick_margin: f64,
    pub audio_cut_dist: f64,
    pub quantize_step: f64,
    pub quantize_step_l: f64,
    pub start_goal_l: i32,
    pub start_goal_r: i32,
    pub fullstate_l: bool,
    pub fullstate_r: bool,
    pub drop_ball_time: i32,
}

impl Default for ServerParam {
    fn default() -> Self {
        Self {
            goal_width: 14.02,
            inertia_moment: 5.0,
            player_size: 0.3,
            player_decay: 0.4,
            player_rand: 0.1,
            player_weight: 60.0,
            player_speed_max: 1.2,
            player_accel_max: 1.0,
            stamina_max: 4000.0,
            stamina_inc_max: 45.0,
            recover_init: 1.0,
            recover_dec_thr: 0.3,
            recover_min: 0.5,
            recover_dec: 0.002,
            effort_init: 1.0,
            effort_dec_thr: 0.3,
            effort_min: 0.6,
            effort_dec: 0.005,
            effort_inc_thr: 0.6,
            effort_inc: 0.01,
            kick_rand: 0.0,
            team_actuator_noise: false,
            player_rand_factor_l: 1.0,
            player_rand_factor_r: 1.0,
            kick_rand_factor_l: 1.0,
            kick_rand_factor_r: 1.0,
            ball_size: 0.085,
            ball_decay: 0.94,
            ball_rand: 0.05,
            ball_weight: 0.2,
            ball_speed_max: 2.7,
            ball_accel_max: 2.7,
            dash_power_rate: 0.006,
            kick_power_rate: 0.027,
            kickable_margin: 0.7,
            control_radius: 2.0,
            control_radius_width: 1.7,
            max_power: 100.0,
            min_power: -100.0,
            max_moment: 180.0,
            min_moment: -180.0,
            max_neck_moment: 180.0,
            min_neck_moment: -180.0,
            max_neck_angle: 90.0,
            min_neck_angle: -90.0,
            visible_angle: 90.0,
            visible_distance: 3.0,
            wind_dir: 0.0,
            wind_force: 0.0,
            wind_ang: 0.0,
            wind_rand: 0.0,
            kickable_area: 1.085,
            catchable_area_l: 2.0,
            catchable_area_w: 1.0,
            catch_probability: 1.0,
            goalie_max_moves: 2,
            corner_kick_margin: 1.0,
            offside_active_area_size: 2.5,
            wind_none: false,
            wind_random: false,
            say_coach_cnt_max: 128,
            say_coach_msg_size: 128,
            clang_win_size: 300,
            clang_define_win: 1,
            clang_meta_win: 1,
            clang_advice_win: 1,
            clang_info_win: 1,
            clang_mess_delay: 50,
            clang_mess_per_cycle: 1,
            half_time: 300,
            simulator_step: 100,
            send_step: 150,
            recv_step: 10,
            sense_body_step: 100,
            lcm_step: 300,
            say_msg_size: 10,
            hear_max: 1,
            hear_inc: 1,
            hear_decay: 1,
            catch_ban_cycle: 5,
            slow_down_factor: 1,
            use_offside: true,
            forbid_kick_off_offside: true,
            offside_kick_margin: 9.15,
            audio_cut_dist: 50.0,
            quantize_step: 0.1,
            quantize_step_l: 0.01,
            start_goal_l: 0,
            start_goal_r: 0,
            fullstate_l: false,
            fullstate_r: false,
            drop_ball_time: 200,
        }
    }
}

/// Heterogeneous-player tradeoff parameters, announced once per match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerParam {
    pub player_types: i32,
    pub subs_max: i32,
    pub pt_max: i32,
    pub player_speed_max_delta_min: f64,
    pub player_speed_max_delta_max: f64,
    pub stamina_inc_max_delta_factor: f64,
    pub player_decay_delta_min: f64,
    pub player_decay_delta_max: f64,
    pub inertia_moment_delta_factor: f64,
    pub dash_power_rate_delta_min: f64,
    pub dash_power_rate_delta_max: f64,
    pub player_size_delta_factor: f64,
    pub kickable_margin_delta_min: f64,
    pub kickable_margin_delta_max: f64,
    pub kick_rand_delta_factor: f64,
    pub extra_stamina_delta_min: f64,
    pub extra_stamina_delta_max: f64,
    pub effort_max_delta_factor: f64,
    pub effort_min_delta_factor: f64,
    /// Raw seed; the only non-scaled 32-bit field in the wire block.
    pub random_seed: i32,
    pub new_dash_power_rate_delta_min: f64,
    pub new_dash_power_rate_delta_max: f64,
    pub new_stamina_inc_max_delta_factor: f64,
    pub allow_mult_default_type: bool,
}

impl Default for PlayerParam {
    fn default() -> Self {
        Self {
            player_types: 18,
            subs_max: 3,
            pt_max: 1,
            player_speed_max_delta_min: 0.0,
            player_speed_max_delta_max: 0.0,
            stamina_inc_max_delta_factor: 0.0,
            player_decay_delta_min: -0.05,
            player_decay_delta_max: 0.1,
            inertia_moment_delta_factor: 25.0,
            dash_power_rate_delta_min: 0.0,
            dash_power_rate_delta_max: 0.0,
            player_size_delta_factor: -100.0,
            kickable_margin_delta_min: 0.0,
            kickable_margin_delta_max: 0.1,
            kick_rand_delta_factor: 0.5,
            extra_stamina_delta_min: 0.0,
            extra_stamina_delta_max: 100.0,
            effort_max_delta_factor: -0.002,
            effort_min_delta_factor: -0.002,
            random_seed: -1,
            new_dash_power_rate_delta_min: 0.0,
            new_dash_power_rate_delta_max: 0.002,
            new_stamina_inc_max_delta_factor: -6000.0,
            allow_mult_default_type: false,
        }
    }
}

/// One heterogeneous player type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerType {
    pub id: i32,
    pub player_speed_max: f64,
    pub stamina_inc_max: f64,
    pub player_decay: f64,
    pub inertia_moment: f64,
    pub dash_power_rate: f64,
    pub player_size: f64,
    pub kickable_margin: f64,
    pub kick_rand: f64,
    pub extra_stamina: f64,
    pub effort_max: f64,
    pub effort_min: f64,
}

impl Default for PlayerType {
    fn default() -> Self {
        Self {
            id: 0,
            player_speed_max: 1.2,
            stamina_inc_max: 45.0,
            player_decay: 0.4,
            inertia_moment: 5.0,
            dash_power_rate: 0.006,
            player_size: 0.3,
            kickable_margin: 0.7,
            kick_rand: 0.0,
            extra_stamina: 0.0,
            effort_max: 1.0,
            effort_min: 0.6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playmode_ordinal_roundtrip() {
        for v in 0..=PlayMode::MAX {
            let pm = PlayMode::from_u8(v).unwrap();
            assert_eq!(pm.as_u8(), v);
            if v > 0 {
                assert_eq!(PlayMode::parse(pm.as_str()), Some(pm));
            }
        }
        assert_eq!(PlayMode::from_u8(PlayMode::MAX + 1), None);
    }

    #[test]
    fn test_playmode_goal_score_suffix() {
        assert_eq!(PlayMode::parse("goal_l_3"), Some(PlayMode::AfterGoalLeft));
        assert_eq!(PlayMode::parse("goal_r_1"), Some(PlayMode::AfterGoalRight));
        assert_eq!(PlayMode::parse("no_such_mode"), None);
    }

    #[test]
    fn test_side_wire_mapping() {
        assert_eq!(Side::from_wire(1), Side::Left);
        assert_eq!(Side::from_wire(-1), Side::Right);
        assert_eq!(Side::from_wire(0), Side::Neutral);
        assert_eq!(Side::from_char('r'), Some(Side::Right));
    }

    #[test]
    fn test_team_null_name() {
        let t = Team::from_wire_name("null", 0);
        assert_eq!(t.name, None);
        assert_eq!(t.name_or_null(), "null");
        let t = Team::from_wire_name("HELIOS", 2);
        assert_eq!(t.name_or_null(), "HELIOS");
    }

    #[test]
    fn test_counters_monotone() {
        let a = CommandCount { kick: 3, dash: 10, ..Default::default() };
        let mut b = a;
        b.dash += 1;
        assert!(b.is_monotone_after(&a));
        assert!(!a.is_monotone_after(&b));
    }

    #[test]
    fn test_player_presence_predicates() {
        let mut p = Player::new(Side::Left, 7);
        assert!(p.is_enabled());
        assert!(!p.has_stamina());
        // zero stamina is a real value, not "absent"
        p.stamina = Some(Stamina { stamina: 0.0, effort: 0.0, recovery: 0.0, capacity: None });
        assert!(p.has_stamina());
    }

    #[test]
    fn test_dispinfo_json_roundtrip() {
        let disp = DispInfo {
            pmode: PlayMode::PlayOn,
            teams: [Team::new("LEFT", 1), Team::new("RIGHT", 0)],
            show: Show {
                time: 100,
                stopped: None,
                ball: Ball { pos: Vec2::new(10.0, -5.0), vel: Some(Vec2::default()) },
                players: vec![Player::new(Side::Left, 1)],
            },
        };
        let json = serde_json::to_string(&disp).unwrap();
        let back: DispInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(disp, back);
    }
}
