//! The `(name value)` parameter-message grammar.
//!
//! The live protocol announces match parameters as restricted S-expressions
//! like `(server_param (goal_width 14.02)(half_time 300) ...)`; the text log
//! versions reuse the same grammar verbatim. This module parses a message
//! into ordered key/value pairs, renders the reverse direction through
//! [`quantize`], and converts recognized messages into the canonical
//! parameter structs with every missing required key fatal for that record.

use std::collections::HashMap;
use std::fmt;

use crate::codec::quantize;
use crate::error::{RcgError, Result};
use crate::types::{PlayerParam, PlayerType, ServerParam};

/// Default precision for parameter doubles in text output.
pub const PARAM_PRECISION: f64 = 0.0001;

/// Finer precision for per-cycle rates, which live below 0.01.
pub const RATE_PRECISION: f64 = 0.00001;

// Protocol dialects that predate these three parameters omit their keys;
// conversion falls back to these carry-over constants when a key is absent.
// The v3 writer additionally pins them to the constants whatever the
// message says (see serializer::v3), pending confirmation against an
// authoritative parameter table.
pub const HARDCODED_CONTROL_RADIUS_WIDTH: f64 = 1.7;
pub const HARDCODED_KICKABLE_AREA: f64 = 1.085;
pub const HARDCODED_LCM_STEP: i32 = 300;

/// One rendered parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Double { value: f64, precision: f64 },
    Int(i64),
    Bool(bool),
    Str(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Double { value, precision } => {
                f.write_str(&format_double(*value, *precision))
            }
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Bool(v) => write!(f, "{}", i32::from(*v)),
            ParamValue::Str(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// Quantize and render a double without trailing float noise.
pub fn format_double(value: f64, precision: f64) -> String {
    let q = quantize(value, precision);
    if q == q.trunc() && q.abs() < 1e15 {
        return format!("{}", q as i64);
    }
    let decimals = (-precision.log10()).round().max(1.0) as usize;
    let mut s = format!("{:.*}", decimals, q);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

/// Render a `(name (key value)...)` message from ordered entries.
pub fn render_message(name: &str, entries: &[(&'static str, ParamValue)]) -> String {
    let mut out = String::with_capacity(32 * entries.len());
    out.push('(');
    out.push_str(name);
    out.push(' ');
    for (key, value) in entries {
        out.push('(');
        out.push_str(key);
        out.push(' ');
        out.push_str(&value.to_string());
        out.push(')');
    }
    out.push(')');
    out
}

/// Parse a parameter message into its name and ordered key/value pairs.
///
/// The grammar allows nesting only at the top level: the message is one
/// outer list whose first token is the name, followed by two-element
/// `(key value)` lists where value is a bare token or a double-quoted
/// string. Anything else fails this record only.
pub fn parse_param_message(text: &str) -> Result<(String, Vec<(String, String)>)> {
    let s = text.trim();
    let malformed = |why: &str| RcgError::MalformedRecord(format!("{}: {}", why, s));

    let inner = s
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| malformed("message not parenthesized"))?;

    let mut chars = inner.char_indices().peekable();

    // message name runs to the first whitespace or '('
    let mut name_end = inner.len();
    for (i, c) in inner.char_indices() {
        if c.is_whitespace() || c == '(' {
            name_end = i;
            break;
        }
    }
    let name = inner[..name_end].to_string();
    if name.is_empty() {
        return Err(malformed("empty message name"));
    }
    while let Some(&(i, _)) = chars.peek() {
        if i >= name_end {
            break;
        }
        chars.next();
    }

    let mut pairs = Vec::new();
    while let Some((_, c)) = chars.next() {
        if c.is_whitespace() {
            continue;
        }
        if c != '(' {
            return Err(malformed("expected '('"));
        }

        // key token
        let mut key = String::new();
        for (_, c) in chars.by_ref() {
            if c.is_whitespace() {
                break;
            }
            if c == ')' || c == '(' {
                return Err(malformed("key without value"));
            }
            key.push(c);
        }
        if key.is_empty() {
            return Err(malformed("empty key"));
        }

        // value: quoted string or bare token, then the closing ')'
        let mut value = String::new();
        let mut closed = false;
        match chars.peek() {
            Some(&(_, '"')) => {
                chars.next();
                let mut terminated = false;
                for (_, c) in chars.by_ref() {
                    if c == '"' {
                        terminated = true;
                        break;
                    }
                    value.push(c);
                }
                if !terminated {
                    return Err(malformed("unterminated string"));
                }
                for (_, c) in chars.by_ref() {
                    if c == ')' {
                        closed = true;
                        break;
                    }
                    if !c.is_whitespace() {
                        return Err(malformed("garbage after string value"));
                    }
                }
            }
            _ => {
                for (_, c) in chars.by_ref() {
                    if c == ')' {
                        closed = true;
                        break;
                    }
                    if c == '(' {
                        return Err(malformed("nested list in value"));
                    }
                    if c.is_whitespace() {
                        // bare values are single tokens
                        continue;
                    }
                    value.push(c);
                }
                if value.is_empty() {
                    return Err(malformed("empty value"));
                }
            }
        }
        if !closed {
            return Err(malformed("unbalanced parens"));
        }
        pairs.push((key, value));
    }

    Ok((name, pairs))
}

fn lookup<'a>(
    map: &'a HashMap<&str, &str>,
    message: &'static str,
    key: &'static str,
) -> Result<&'a str> {
    map.get(key).copied().ok_or(RcgError::MissingParam { key, message })
}

fn req_f64(map: &HashMap<&str, &str>, message: &'static str, key: &'static str) -> Result<f64> {
    let raw = lookup(map, message, key)?;
    raw.parse::<f64>()
        .map_err(|_| RcgError::InvalidValue { key: key.to_string(), value: raw.to_string() })
}

fn req_i32(map: &HashMap<&str, &str>, message: &'static str, key: &'static str) -> Result<i32> {
    let raw = lookup(map, message, key)?;
    raw.parse::<i32>()
        .or_else(|_| raw.parse::<f64>().map(|v| v as i32))
        .map_err(|_| RcgError::InvalidValue { key: key.to_string(), value: raw.to_string() })
}

fn req_bool(map: &HashMap<&str, &str>, message: &'static str, key: &'static str) -> Result<bool> {
    let raw = lookup(map, message, key)?;
    match raw {
        "1" | "true" | "on" => Ok(true),
        "0" | "false" | "off" => Ok(false),
        _ => Err(RcgError::InvalidValue { key: key.to_string(), value: raw.to_string() }),
    }
}

fn opt_f64(map: &HashMap<&str, &str>, key: &'static str, default: f64) -> Result<f64> {
    match map.get(key) {
        Some(raw) => raw
            .parse::<f64>()
            .map_err(|_| RcgError::InvalidValue { key: key.to_string(), value: raw.to_string() }),
        None => Ok(default),
    }
}

fn opt_i32(map: &HashMap<&str, &str>, key: &'static str, default: i32) -> Result<i32> {
    match map.get(key) {
        Some(raw) => raw
            .parse::<i32>()
            .map_err(|_| RcgError::InvalidValue { key: key.to_string(), value: raw.to_string() }),
        None => Ok(default),
    }
}

fn to_map<'a>(pairs: &'a [(String, String)]) -> HashMap<&'a str, &'a str> {
    pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
}

/// Build a [`ServerParam`] from parsed `(server_param ...)` pairs.
///
/// Every key is required except the three carry-overs older dialects omit;
/// a missing required key fails the whole record and the caller keeps its
/// previous value.
pub fn server_param_from_pairs(pairs: &[(String, String)]) -> Result<ServerParam> {
    const MSG: &str = "server_param";
    let m = to_map(pairs);
    Ok(ServerParam {
        goal_width: req_f64(&m, MSG, "goal_width")?,
        inertia_moment: req_f64(&m, MSG, "inertia_moment")?,
        player_size: req_f64(&m, MSG, "player_size")?,
        player_decay: req_f64(&m, MSG, "player_decay")?,
        player_rand: req_f64(&m, MSG, "player_rand")?,
        player_weight: req_f64(&m, MSG, "player_weight")?,
        player_speed_max: req_f64(&m, MSG, "player_speed_max")?,
        player_accel_max: req_f64(&m, MSG, "player_accel_max")?,
        stamina_max: req_f64(&m, MSG, "stamina_max")?,
        stamina_inc_max: req_f64(&m, MSG, "stamina_inc_max")?,
        recover_init: req_f64(&m, MSG, "recover_init")?,
        recover_dec_thr: req_f64(&m, MSG, "recover_dec_thr")?,
        recover_min: req_f64(&m, MSG, "recover_min")?,
        recover_dec: req_f64(&m, MSG, "recover_dec")?,
        effort_init: req_f64(&m, MSG, "effort_init")?,
        effort_dec_thr: req_f64(&m, MSG, "effort_dec_thr")?,
        effort_min: req_f64(&m, MSG, "effort_min")?,
        effort_dec: req_f64(&m, MSG, "effort_dec")?,
        effort_inc_thr: req_f64(&m, MSG, "effort_inc_thr")?,
        effort_inc: req_f64(&m, MSG, "effort_inc")?,
        kick_rand: req_f64(&m, MSG, "kick_rand")?,
        team_actuator_noise: req_bool(&m, MSG, "team_actuator_noise")?,
        player_rand_factor_l: req_f64(&m, MSG, "prand_factor_l")?,
        player_rand_factor_r: req_f64(&m, MSG, "prand_factor_r")?,
        kick_rand_factor_l: req_f64(&m, MSG, "kick_rand_factor_l")?,
        kick_rand_factor_r: req_f64(&m, MSG, "kick_rand_factor_r")?,
        ball_size: req_f64(&m, MSG, "ball_size")?,
        ball_decay: req_f64(&m, MSG, "ball_decay")?,
        ball_rand: req_f64(&m, MSG, "ball_rand")?,
        ball_weight: req_f64(&m, MSG, "ball_weight")?,
        ball_speed_max: req_f64(&m, MSG, "ball_speed_max")?,
        ball_accel_max: req_f64(&m, MSG, "ball_accel_max")?,
        dash_power_rate: req_f64(&m, MSG, "dash_power_rate")?,
        kick_power_rate: req_f64(&m, MSG, "kick_power_rate")?,
        kickable_margin: req_f64(&m, MSG, "kickable_margin")?,
        control_radius: req_f64(&m, MSG, "control_radius")?,
        control_radius_width: opt_f64(&m, "control_radius_width", HARDCODED_CONTROL_RADIUS_WIDTH)?,
        max_power: req_f64(&m, MSG, "maxpower")?,
        min_power: req_f64(&m, MSG, "minpower")?,
        max_moment: req_f64(&m, MSG, "maxmoment")?,
        min_moment: req_f64(&m, MSG, "minmoment")?,
        max_neck_moment: req_f64(&m, MSG, "maxneckmoment")?,
        min_neck_moment: req_f64(&m, MSG, "minneckmoment")?,
        max_neck_angle: req_f64(&m, MSG, "maxneckang")?,
        min_neck_angle: req_f64(&m, MSG, "minneckang")?,
        visible_angle: req_f64(&m, MSG, "visible_angle")?,
        visible_distance: req_f64(&m, MSG, "visible_distance")?,
        wind_dir: req_f64(&m, MSG, "wind_dir")?,
        wind_force: req_f64(&m, MSG, "wind_force")?,
        wind_ang: req_f64(&m, MSG, "wind_ang")?,
        wind_rand: req_f64(&m, MSG, "wind_rand")?,
        kickable_area: opt_f64(&m, "kickable_area", HARDCODED_KICKABLE_AREA)?,
        catchable_area_l: req_f64(&m, MSG, "catchable_area_l")?,
        catchable_area_w: req_f64(&m, MSG, "catchable_area_w")?,
        catch_probability: req_f64(&m, MSG, "catch_probability")?,
        goalie_max_moves: req_i32(&m, MSG, "goalie_max_moves")?,
        corner_kick_margin: req_f64(&m, MSG, "ckick_margin")?,
        offside_active_area_size: req_f64(&m, MSG, "offside_active_area_size")?,
        wind_none: req_bool(&m, MSG, "wind_none")?,
        wind_random: req_bool(&m, MSG, "wind_random")?,
        say_coach_cnt_max: req_i32(&m, MSG, "say_coach_cnt_max")?,
        say_coach_msg_size: req_i32(&m, MSG, "say_coach_msg_size")?,
        clang_win_size: req_i32(&m, MSG, "clang_win_size")?,
        clang_define_win: req_i32(&m, MSG, "clang_define_win")?,
        clang_meta_win: req_i32(&m, MSG, "clang_meta_win")?,
        clang_advice_win: req_i32(&m, MSG, "clang_advice_win")?,
        clang_info_win: req_i32(&m, MSG, "clang_info_win")?,
        clang_mess_delay: req_i32(&m, MSG, "clang_mess_delay")?,
        clang_mess_per_cycle: req_i32(&m, MSG, "clang_mess_per_cycle")?,
        half_time: req_i32(&m, MSG, "half_time")?,
        simulator_step: req_i32(&m, MSG, "simulator_step")?,
        send_step: req_i32(&m, MSG, "send_step")?,
        recv_step: req_i32(&m, MSG, "recv_step")?,
        sense_body_step: req_i32(&m, MSG, "sense_body_step")?,
        lcm_step: opt_i32(&m, "lcm_step", HARDCODED_LCM_STEP)?,
        say_msg_size: req_i32(&m, MSG, "say_msg_size")?,
        hear_max: req_i32(&m, MSG, "hear_max")?,
        hear_inc: req_i32(&m, MSG, "hear_inc")?,
        hear_decay: req_i32(&m, MSG, "hear_decay")?,
        catch_ban_cycle: req_i32(&m, MSG, "catch_ban_cycle")?,
        slow_down_factor: req_i32(&m, MSG, "slow_down_factor")?,
        use_offside: req_bool(&m, MSG, "use_offside")?,
        forbid_kick_off_offside: req_bool(&m, MSG, "forbid_kick_off_offside")?,
        offside_kick_margin: req_f64(&m, MSG, "offside_kick_margin")?,
        audio_cut_dist: req_f64(&m, MSG, "audio_cut_dist")?,
        quantize_step: req_f64(&m, MSG, "quantize_step")?,
        quantize_step_l: req_f64(&m, MSG, "quantize_step_l")?,
        start_goal_l: req_i32(&m, MSG, "start_goal_l")?,
        start_goal_r: req_i32(&m, MSG, "start_goal_r")?,
        fullstate_l: req_bool(&m, MSG, "fullstate_l")?,
        fullstate_r: req_bool(&m, MSG, "fullstate_r")?,
        drop_ball_time: req_i32(&m, MSG, "drop_ball_time")?,
    })
}

pub fn player_param_from_pairs(pairs: &[(String, String)]) -> Result<PlayerParam> {
    const MSG: &str = "player_param";
    let m = to_map(pairs);
    Ok(PlayerParam {
        player_types: req_i32(&m, MSG, "player_types")?,
        subs_max: req_i32(&m, MSG, "subs_max")?,
        pt_max: req_i32(&m, MSG, "pt_max")?,
        player_speed_max_delta_min: req_f64(&m, MSG, "player_speed_max_delta_min")?,
        player_speed_max_delta_max: req_f64(&m, MSG, "player_speed_max_delta_max")?,
        stamina_inc_max_delta_factor: req_f64(&m, MSG, "stamina_inc_max_delta_factor")?,
        player_decay_delta_min: req_f64(&m, MSG, "player_decay_delta_min")?,
        player_decay_delta_max: req_f64(&m, MSG, "player_decay_delta_max")?,
        inertia_moment_delta_factor: req_f64(&m, MSG, "inertia_moment_delta_factor")?,
        dash_power_rate_delta_min: req_f64(&m, MSG, "dash_power_rate_delta_min")?,
        dash_power_rate_delta_max: req_f64(&m, MSG, "dash_power_rate_delta_max")?,
        player_size_delta_factor: req_f64(&m, MSG, "player_size_delta_factor")?,
        kickable_margin_delta_min: req_f64(&m, MSG, "kickable_margin_delta_min")?,
        kickable_margin_delta_max: req_f64(&m, MSG, "kickable_margin_delta_max")?,
        kick_rand_delta_factor: req_f64(&m, MSG, "kick_rand_delta_factor")?,
        extra_stamina_delta_min: req_f64(&m, MSG, "extra_stamina_delta_min")?,
        extra_stamina_delta_max: req_f64(&m, MSG, "extra_stamina_delta_max")?,
        effort_max_delta_factor: req_f64(&m, MSG, "effort_max_delta_factor")?,
        effort_min_delta_factor: req_f64(&m, MSG, "effort_min_delta_factor")?,
        random_seed: req_i32(&m, MSG, "random_seed")?,
        new_dash_power_rate_delta_min: req_f64(&m, MSG, "new_dash_power_rate_delta_min")?,
        new_dash_power_rate_delta_max: req_f64(&m, MSG, "new_dash_power_rate_delta_max")?,
        new_stamina_inc_max_delta_factor: req_f64(&m, MSG, "new_stamina_inc_max_delta_factor")?,
        allow_mult_default_type: req_bool(&m, MSG, "allow_mult_default_type")?,
    })
}

pub fn player_type_from_pairs(pairs: &[(String, String)]) -> Result<PlayerType> {
    const MSG: &str = "player_type";
    let m = to_map(pairs);
    Ok(PlayerType {
        id: req_i32(&m, MSG, "id")?,
        player_speed_max: req_f64(&m, MSG, "player_speed_max")?,
        stamina_inc_max: req_f64(&m, MSG, "stamina_inc_max")?,
        player_decay: req_f64(&m, MSG, "player_decay")?,
        inertia_moment: req_f64(&m, MSG, "inertia_moment")?,
        dash_power_rate: req_f64(&m, MSG, "dash_power_rate")?,
        player_size: req_f64(&m, MSG, "player_size")?,
        kickable_margin: req_f64(&m, MSG, "kickable_margin")?,
        kick_rand: req_f64(&m, MSG, "kick_rand")?,
        extra_stamina: req_f64(&m, MSG, "extra_stamina")?,
        effort_max: req_f64(&m, MSG, "effort_max")?,
        effort_min: req_f64(&m, MSG, "effort_min")?,
    })
}

fn dbl(value: f64) -> ParamValue {
    ParamValue::Double { value, precision: PARAM_PRECISION }
}

fn rate(value: f64) -> ParamValue {
    ParamValue::Double { value, precision: RATE_PRECISION }
}

fn int(value: i32) -> ParamValue {
    ParamValue::Int(i64::from(value))
}

/// Ordered key/value view of a [`ServerParam`] for text rendering.
pub fn server_param_entries(p: &ServerParam) -> Vec<(&'static str, ParamValue)> {
    vec![
        ("goal_width", dbl(p.goal_width)),
        ("inertia_moment", dbl(p.inertia_moment)),
        ("player_size", dbl(p.player_size)),
        ("player_decay", dbl(p.player_decay)),
        ("player_rand", dbl(p.player_rand)),
        ("player_weight", dbl(p.player_weight)),
        ("player_speed_max", dbl(p.player_speed_max)),
        ("player_accel_max", dbl(p.player_accel_max)),
        ("stamina_max", dbl(p.stamina_max)),
        ("stamina_inc_max", dbl(p.stamina_inc_max)),
        ("recover_init", dbl(p.recover_init)),
        ("recover_dec_thr", dbl(p.recover_dec_thr)),
        ("recover_min", dbl(p.recover_min)),
        ("recover_dec", rate(p.recover_dec)),
        ("effort_init", dbl(p.effort_init)),
        ("effort_dec_thr", dbl(p.effort_dec_thr)),
        ("effort_min", dbl(p.effort_min)),
        ("effort_dec", rate(p.effort_dec)),
        ("effort_inc_thr", dbl(p.effort_inc_thr)),
        ("effort_inc", rate(p.effort_inc)),
        ("kick_rand", dbl(p.kick_rand)),
        ("team_actuator_noise", ParamValue::Bool(p.team_actuator_noise)),
        ("prand_factor_l", dbl(p.player_rand_factor_l)),
        ("prand_factor_r", dbl(p.player_rand_factor_r)),
        ("kick_rand_factor_l", dbl(p.kick_rand_factor_l)),
        ("kick_rand_factor_r", dbl(p.kick_rand_factor_r)),
        ("ball_size", dbl(p.ball_size)),
        ("ball_decay", dbl(p.ball_decay)),
        ("ball_rand", dbl(p.ball_rand)),
        ("ball_weight", dbl(p.ball_weight)),
        ("ball_speed_max", dbl(p.ball_speed_max)),
        ("ball_accel_max", dbl(p.ball_accel_max)),
        ("dash_power_rate", rate(p.dash_power_rate)),
        ("kick_power_rate", rate(p.kick_power_rate)),
        ("kickable_margin", dbl(p.kickable_margin)),
        ("control_radius", dbl(p.control_radius)),
        ("control_radius_width", dbl(p.control_radius_width)),
        ("maxpower", dbl(p.max_power)),
        ("minpower", dbl(p.min_power)),
        ("maxmoment", dbl(p.max_moment)),
        ("minmoment", dbl(p.min_moment)),
        ("maxneckmoment", dbl(p.max_neck_moment)),
        ("minneckmoment", dbl(p.min_neck_moment)),
        ("maxneckang", dbl(p.max_neck_angle)),
        ("minneckang", dbl(p.min_neck_angle)),
        ("visible_angle", dbl(p.visible_angle)),
        ("visible_distance", dbl(p.visible_distance)),
        ("wind_dir", dbl(p.wind_dir)),
        ("wind_force", dbl(p.wind_force)),
        ("wind_ang", dbl(p.wind_ang)),
        ("wind_rand", dbl(p.wind_rand)),
        ("kickable_area", dbl(p.kickable_area)),
        ("catchable_area_l", dbl(p.catchable_area_l)),
        ("catchable_area_w", dbl(p.catchable_area_w)),
        ("catch_probability", dbl(p.catch_probability)),
        ("goalie_max_moves", int(p.goalie_max_moves)),
        ("ckick_margin", dbl(p.corner_kick_margin)),
        ("offside_active_area_size", dbl(p.offside_active_area_size)),
        ("wind_none", ParamValue::Bool(p.wind_none)),
        ("wind_random", ParamValue::Bool(p.wind_random)),
        ("say_coach_cnt_max", int(p.say_coach_cnt_max)),
        ("say_coach_msg_size", int(p.say_coach_msg_size)),
        ("clang_win_size", int(p.clang_win_size)),
        ("clang_define_win", int(p.clang_define_win)),
        ("clang_meta_win", int(p.clang_meta_win)),
        ("clang_advice_win", int(p.clang_advice_win)),
        ("clang_info_win", int(p.clang_info_win)),
        ("clang_mess_delay", int(p.clang_mess_delay)),
        ("clang_mess_per_cycle", int(p.clang_mess_per_cycle)),
        ("half_time", int(p.half_time)),
        ("simulator_step", int(p.simulator_step)),
        ("send_step", int(p.send_step)),
        ("recv_step", int(p.recv_step)),
        ("sense_body_step", int(p.sense_body_step)),
        ("lcm_step", int(p.lcm_step)),
        ("say_msg_size", int(p.say_msg_size)),
        ("hear_max", int(p.hear_max)),
        ("hear_inc", int(p.hear_inc)),
        ("hear_decay", int(p.hear_decay)),
        ("catch_ban_cycle", int(p.catch_ban_cycle)),
        ("slow_down_factor", int(p.slow_down_factor)),
        ("use_offside", ParamValue::Bool(p.use_offside)),
        ("forbid_kick_off_offside", ParamValue::Bool(p.forbid_kick_off_offside)),
        ("offside_kick_margin", dbl(p.offside_kick_margin)),
        ("audio_cut_dist", dbl(p.audio_cut_dist)),
        ("quantize_step", dbl(p.quantize_step)),
        ("quantize_step_l", dbl(p.quantize_step_l)),
        ("start_goal_l", int(p.start_goal_l)),
        ("start_goal_r", int(p.start_goal_r)),
        ("fullstate_l", ParamValue::Bool(p.fullstate_l)),
        ("fullstate_r", ParamValue::Bool(p.fullstate_r)),
        ("drop_ball_time", int(p.drop_ball_time)),
    ]
}

pub fn player_param_entries(p: &PlayerParam) -> Vec<(&'static str, ParamValue)> {
    vec![
        ("player_types", int(p.player_types)),
        ("subs_max", int(p.subs_max)),
        ("pt_max", int(p.pt_max)),
        ("player_speed_max_delta_min", dbl(p.player_speed_max_delta_min)),
        ("player_speed_max_delta_max", dbl(p.player_speed_max_delta_max)),
        ("stamina_inc_max_delta_factor", dbl(p.stamina_inc_max_delta_factor)),
        ("player_decay_delta_min", dbl(p.player_decay_delta_min)),
        ("player_decay_delta_max", dbl(p.player_decay_delta_max)),
        ("inertia_moment_delta_factor", dbl(p.inertia_moment_delta_factor)),
        ("dash_power_rate_delta_min", rate(p.dash_power_rate_delta_min)),
        ("dash_power_rate_delta_max", rate(p.dash_power_rate_delta_max)),
        ("player_size_delta_factor", dbl(p.player_size_delta_factor)),
        ("kickable_margin_delta_min", dbl(p.kickable_margin_delta_min)),
        ("kickable_margin_delta_max", dbl(p.kickable_margin_delta_max)),
        ("kick_rand_delta_factor", dbl(p.kick_rand_delta_factor)),
        ("extra_stamina_delta_min", dbl(p.extra_stamina_delta_min)),
        ("extra_stamina_delta_max", dbl(p.extra_stamina_delta_max)),
        ("effort_max_delta_factor", rate(p.effort_max_delta_factor)),
        ("effort_min_delta_factor", rate(p.effort_min_delta_factor)),
        ("random_seed", int(p.random_seed)),
        ("new_dash_power_rate_delta_min", rate(p.new_dash_power_rate_delta_min)),
        ("new_dash_power_rate_delta_max", rate(p.new_dash_power_rate_delta_max)),
        ("new_stamina_inc_max_delta_factor", dbl(p.new_stamina_inc_max_delta_factor)),
        ("allow_mult_default_type", ParamValue::Bool(p.allow_mult_default_type)),
    ]
}

pub fn player_type_entries(p: &PlayerType) -> Vec<(&'static str, ParamValue)> {
    vec![
        ("id", int(p.id)),
        ("player_speed_max", dbl(p.player_speed_max)),
        ("stamina_inc_max", dbl(p.stamina_inc_max)),
        ("player_decay", dbl(p.player_decay)),
        ("inertia_moment", dbl(p.inertia_moment)),
        ("dash_power_rate", rate(p.dash_power_rate)),
        ("player_size", dbl(p.player_size)),
        ("kickable_margin", dbl(p.kickable_margin)),
        ("kick_rand", dbl(p.kick_rand)),
        ("extra_stamina", dbl(p.extra_stamina)),
        ("effort_max", dbl(p.effort_max)),
        ("effort_min", dbl(p.effort_min)),
    ]
}
