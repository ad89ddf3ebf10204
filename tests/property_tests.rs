//! Property-based tests for multisink_logger using proptest

use chrono::{TimeZone, Utc};
use multisink_logger::core::formatter::{format_line, format_position, format_remote_body};
use multisink_logger::prelude::*;
use proptest::prelude::*;
use url::form_urlencoded;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Trace),
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warning),
        Just(LogLevel::Error),
    ]
}

fn any_level_set() -> impl Strategy<Value = LevelSet> {
    prop::collection::vec(any_level(), 0..6).prop_map(|levels| levels.into_iter().collect())
}

fn any_sink() -> impl Strategy<Value = SinkKind> {
    prop_oneof![
        Just(SinkKind::Console),
        Just(SinkKind::Local),
        Just(SinkKind::Remote),
    ]
}

// ============================================================================
// LogLevel / LevelSet
// ============================================================================

proptest! {
    /// Both the tag and the name parse back to the same level
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        prop_assert_eq!(level.tag().parse::<LogLevel>(), Ok(level));
        prop_assert_eq!(level.name().parse::<LogLevel>(), Ok(level));
        prop_assert_eq!(level.to_string(), level.tag());
    }

    /// A set contains exactly the levels inserted into it
    #[test]
    fn test_level_set_membership(levels in prop::collection::vec(any_level(), 0..10)) {
        let set: LevelSet = levels.iter().copied().collect();
        for level in LogLevel::ALL {
            prop_assert_eq!(set.contains(level), levels.contains(&level));
        }
        prop_assert!(set.len() <= 5);
        prop_assert_eq!(set.is_empty(), levels.is_empty());
    }

    /// Serializing a set and reading it back gives the same set
    #[test]
    fn test_level_set_serde(set in any_level_set()) {
        let json = serde_json::to_string(&set).unwrap();
        let parsed: LevelSet = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(parsed, set);
    }
}

// ============================================================================
// Gating
// ============================================================================

proptest! {
    /// A sink accepts a level iff it is enabled and the level is in its set
    #[test]
    fn test_accepts_is_enabled_and_member(
        sink in any_sink(),
        enabled in any::<bool>(),
        levels in any_level_set(),
        level in any_level(),
    ) {
        let mut config = SessionConfig {
            remote_url: "http://collector.local/".to_string(),
            ..SessionConfig::default()
        };
        config.set_enabled(sink, enabled);
        match sink {
            SinkKind::Console => config.console_levels = levels,
            SinkKind::Local => config.local_levels = levels,
            SinkKind::Remote => config.remote_levels = levels,
        }

        prop_assert_eq!(config.accepts(sink, level), enabled && levels.contains(level));
    }

    /// Fields absent from an update are left untouched
    #[test]
    fn test_partial_update_keeps_absent_fields(
        console_levels in proptest::option::of(any_level_set()),
        local_enabled in proptest::option::of(any::<bool>()),
        identifier in proptest::option::of("[a-z0-9-]{0,12}"),
    ) {
        let before = SessionConfig::default();
        let mut update = ConfigUpdate::new();
        if let Some(levels) = console_levels {
            update = update.console_levels(levels);
        }
        if let Some(enabled) = local_enabled {
            update = update.local_enabled(enabled);
        }
        if let Some(id) = identifier.clone() {
            update = update.remote_identifier(id);
        }

        let mut after = before.clone();
        after.apply(&update);

        prop_assert_eq!(after.console_levels, console_levels.unwrap_or(before.console_levels));
        prop_assert_eq!(after.local_enabled, local_enabled.unwrap_or(before.local_enabled));
        prop_assert_eq!(&after.remote_identifier, &identifier.unwrap_or_default());
        prop_assert_eq!(after.console_enabled, before.console_enabled);
        prop_assert_eq!(after.local_levels, before.local_levels);
        prop_assert_eq!(&after.local_filename, &before.local_filename);
        prop_assert_eq!(after.remote_enabled, before.remote_enabled);
        prop_assert_eq!(after.remote_levels, before.remote_levels);
        prop_assert_eq!(&after.remote_url, &before.remote_url);
    }
}

// ============================================================================
// Formatting
// ============================================================================

proptest! {
    /// Position is always `<basename>[<line>]`
    #[test]
    fn test_position_is_basename_and_line(
        dirs in prop::collection::vec("[a-z_]{1,8}", 0..4),
        name in "[a-z_]{1,10}\\.rs",
        line in any::<u32>(),
    ) {
        let mut path = dirs.join("/");
        if !path.is_empty() {
            path.push('/');
        }
        path.push_str(&name);

        let position = format_position(&path, line);
        prop_assert_eq!(&position, &format!("{}[{}]", name, line));
        prop_assert!(!position.contains('/'));
    }

    /// The line layout is fixed and depends only on its inputs
    #[test]
    fn test_format_line_structure(
        secs in 0i64..4_000_000_000,
        millis in 0u32..1000,
        level in any_level(),
        message in "[^\n\r]{0,40}",
    ) {
        let timestamp = Utc.timestamp_opt(secs, millis * 1_000_000).unwrap();
        let line = format_line(&timestamp, level, "app.rs[1]", &message);

        prop_assert_eq!(&line, &format_line(&timestamp, level, "app.rs[1]", &message));
        let expected_prefix = format!(" > {} @ app.rs[1] : ", level.tag());
        prop_assert_eq!(&line[23..23 + expected_prefix.len()], expected_prefix.as_str());
        prop_assert!(line.ends_with(&message));
        prop_assert_eq!(&line[10..11], " ");
        prop_assert_eq!(&line[19..20], ".");
    }

    /// Any message renders onto exactly one line
    #[test]
    fn test_rendered_event_is_single_line(level in any_level(), message in ".*") {
        let message = format!("{}\n{}\r\n", message, message);
        let timestamp = chrono::Local.timestamp_opt(1_700_000_000, 0).unwrap();
        let event = LogEvent::at(timestamp, level, "app.rs[9]", message);

        let line = event.render_line();
        prop_assert!(!line.contains('\n'));
        prop_assert!(!line.contains('\r'));
    }

    /// Decoding the remote body gives back every field in order
    #[test]
    fn test_remote_body_decodes_to_fields(
        level in any_level(),
        message in "\\PC{0,40}",
        identifier in "\\PC{0,16}",
    ) {
        let timestamp = Utc.timestamp_opt(1_736_332_245, 123_000_000).unwrap();
        let body = format_remote_body(&timestamp, level, "pay.rs[7]", &message, &identifier);

        let pairs: Vec<(String, String)> = form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect();
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        prop_assert_eq!(keys, vec!["loglevel", "timestamp", "message", "position", "identifier"]);
        prop_assert_eq!(&pairs[0].1, level.tag());
        prop_assert_eq!(&pairs[1].1, "2025-01-08 10:30:45.123");
        prop_assert_eq!(&pairs[2].1, &message);
        prop_assert_eq!(&pairs[3].1, "pay.rs[7]");
        prop_assert_eq!(&pairs[4].1, &identifier);
    }
}
