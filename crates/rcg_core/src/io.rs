//! File-level convenience wrappers around the parser and serializers.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::Context;

use crate::formats::LogVersion;
use crate::parser::{Parser, RecordCollector};
use crate::serializer;
use crate::types::{DispInfo, PlayerParam, PlayerType, ServerParam};

/// Load a whole log file into memory.
pub fn load_rcg(path: impl AsRef<Path>) -> anyhow::Result<RecordCollector> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut collector = RecordCollector::new();
    Parser::new(BufReader::new(file))
        .run(&mut collector)
        .with_context(|| format!("parse {}", path.display()))?;
    log::info!(
        "loaded {}: {} cycles, {} msgs",
        path.display(),
        collector.dispinfo.len(),
        collector.msgs.len()
    );
    Ok(collector)
}

/// Write a log file in the given version: header, parameters, then one
/// show per cycle with play-mode and team records de-duplicated by the
/// serializer.
pub fn save_disp(
    path: impl AsRef<Path>,
    version: LogVersion,
    server_param: Option<&ServerParam>,
    player_param: Option<&PlayerParam>,
    player_types: &[PlayerType],
    cycles: &[DispInfo],
) -> anyhow::Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    let mut ser = serializer::for_version(version);

    ser.serialize_header(&mut w)?;
    if let Some(param) = server_param {
        ser.serialize_server_param(&mut w, param)?;
    }
    if let Some(param) = player_param {
        ser.serialize_player_param(&mut w, param)?;
    }
    for ptype in player_types {
        ser.serialize_player_type(&mut w, ptype)?;
    }
    for disp in cycles {
        ser.serialize_show(&mut w, disp)?;
    }
    w.flush().with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

/// Rewrite a loaded log in another version.
pub fn save_collector(
    path: impl AsRef<Path>,
    version: LogVersion,
    collector: &RecordCollector,
) -> anyhow::Result<()> {
    save_disp(
        path,
        version,
        collector.server_param.as_ref(),
        collector.player_param.as_ref(),
        &collector.player_types,
        &collector.dispinfo,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Ball, PlayMode, Show, Team, Vec2};

    fn cycle(time: u32) -> DispInfo {
        DispInfo {
            pmode: PlayMode::PlayOn,
            teams: [Team::new("A", 0), Team::new("B", 0)],
            show: Show {
                time,
                stopped: None,
                ball: Ball { pos: Vec2::new(1.0, 2.0), vel: Some(Vec2::default()) },
                players: Vec::new(),
            },
        }
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("match.rcg");
        save_disp(
            &path,
            LogVersion::V5,
            Some(&ServerParam::default()),
            Some(&PlayerParam::default()),
            &[PlayerType::default()],
            &[cycle(1), cycle(2)],
        )
        .unwrap();

        let loaded = load_rcg(&path).unwrap();
        assert_eq!(loaded.version, Some(LogVersion::V5));
        assert_eq!(loaded.server_param, Some(ServerParam::default()));
        assert_eq!(loaded.player_types.len(), 1);
        assert_eq!(loaded.dispinfo.len(), 2);
        assert_eq!(loaded.dispinfo[1].show.time, 2);
        assert!(loaded.reached_eof);
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let err = load_rcg("/no/such/dir/match.rcg").unwrap_err();
        assert!(err.to_string().contains("match.rcg"));
    }
}
