//! Configuration system tests
//!
//! Tests for config paths, viewer config, and keymap loading/merging.

use std::time::Duration;

use mdview::config::ViewerConfig;
use mdview::config_paths;
use mdview::keymap::{
    default_bindings, merge_bindings, merge_user_file, Command, KeyCode, Keybinding, Keystroke,
    Modifiers,
};
use mdview::model::ThemeMode;

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_contains_mdview() {
    if let Some(dir) = config_paths::config_dir() {
        assert!(dir.ends_with("mdview"), "got {}", dir.display());
    }
}

#[test]
fn test_files_live_under_config_dir() {
    let Some(config) = config_paths::config_dir() else {
        return;
    };
    assert_eq!(config_paths::config_file(), Some(config.join("config.yaml")));
    assert_eq!(config_paths::keymap_file(), Some(config.join("keymap.yaml")));
    assert!(config_paths::registry_dir().unwrap().starts_with(&config));
    assert!(config_paths::queries_dir().unwrap().starts_with(&config));
    assert!(config_paths::logs_dir().unwrap().starts_with(&config));
}

// ========================================================================
// Viewer Config Tests
// ========================================================================

#[test]
fn test_default_config() {
    let config = ViewerConfig::default();
    assert_eq!(config.settings.theme, ThemeMode::Light);
    assert_eq!(config.host.probe_attempts, 100);
    assert_eq!(config.highlight.fetch_timeout(), Duration::from_secs(5));
}

#[test]
fn test_config_round_trips_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.yaml");

    let mut config = ViewerConfig::default();
    config.settings.theme = ThemeMode::Dark;
    config.settings.font_size = 20;
    config.highlight.preload = vec!["rust".into()];
    config.save_to(&path).unwrap();

    assert_eq!(ViewerConfig::load_from(&path), config);
}

#[test]
fn test_partial_config_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "settings:\n  theme: dark\nhost:\n  probe_attempts: 3\n").unwrap();

    let config = ViewerConfig::load_from(&path);
    assert_eq!(config.settings.theme, ThemeMode::Dark);
    assert_eq!(config.settings.font_size, 16);
    assert_eq!(config.host.probe_attempts, 3);
    assert_eq!(config.host.probe_interval_ms, 100);

    let policy = config.host.retry_policy();
    assert_eq!(policy.max_attempts, 3);
    assert_eq!(policy.total_budget(), Duration::from_millis(200));
}

#[test]
fn test_invalid_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "settings: [not, a, map").unwrap();

    assert_eq!(ViewerConfig::load_from(&path), ViewerConfig::default());
}

#[test]
fn test_missing_config_is_default() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(
        ViewerConfig::load_from(&dir.path().join("absent.yaml")),
        ViewerConfig::default()
    );
}

// ========================================================================
// Default Keymap Tests
// ========================================================================

fn command_for(bindings: &[Keybinding], keystroke: Keystroke) -> Option<Command> {
    bindings
        .iter()
        .find(|b| b.keystrokes == vec![keystroke])
        .map(|b| b.command)
}

#[test]
fn test_default_bindings_cover_every_command() {
    let bindings = default_bindings();
    for command in Command::ALL {
        assert!(
            bindings.iter().any(|b| b.command == command),
            "no binding for {:?}",
            command
        );
    }
}

#[test]
fn test_default_open_and_reload() {
    let bindings = default_bindings();
    assert_eq!(
        command_for(&bindings, Keystroke::new(KeyCode::Char('o'), Modifiers::CTRL)),
        Some(Command::OpenFile)
    );
    assert_eq!(
        command_for(&bindings, Keystroke::key(KeyCode::F(5))),
        Some(Command::ReloadFile)
    );
    assert_eq!(
        command_for(&bindings, Keystroke::char('?')),
        Some(Command::ToggleShortcuts)
    );
}

// ========================================================================
// Keymap Merge Tests
// ========================================================================

#[test]
fn test_merge_empty_user_returns_base() {
    let base = default_bindings();
    let merged = merge_bindings(base.clone(), vec![]);
    assert_eq!(merged, base);
}

#[test]
fn test_merge_overrides_existing() {
    let f5 = Keystroke::key(KeyCode::F(5));
    let merged = merge_bindings(
        default_bindings(),
        vec![Keybinding::new(f5, Command::ShowAbout)],
    );
    assert_eq!(command_for(&merged, f5), Some(Command::ShowAbout));
}

#[test]
fn test_merge_unbound_removes_binding() {
    let quit = Keystroke::new(KeyCode::Char('q'), Modifiers::CTRL);
    let merged = merge_bindings(
        default_bindings(),
        vec![Keybinding::new(quit, Command::Unbound)],
    );
    assert_eq!(command_for(&merged, quit), None);
    assert!(merged.iter().all(|b| b.command != Command::Unbound));
}

#[test]
fn test_merge_adds_new_binding() {
    let base = default_bindings();
    let f2 = Keystroke::key(KeyCode::F(2));
    let merged = merge_bindings(base.clone(), vec![Keybinding::new(f2, Command::OpenFile)]);
    assert_eq!(merged.len(), base.len() + 1);
    assert_eq!(command_for(&merged, f2), Some(Command::OpenFile));
}

#[test]
fn test_user_keymap_file_is_merged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keymap.yaml");
    std::fs::write(
        &path,
        "bindings:\n  - key: \"f5\"\n    command: Unbound\n  - key: \"alt+o\"\n    command: OpenFile\n",
    )
    .unwrap();

    let merged = merge_user_file(default_bindings(), &path);
    assert_eq!(command_for(&merged, Keystroke::key(KeyCode::F(5))), None);
    assert_eq!(
        command_for(&merged, Keystroke::new(KeyCode::Char('o'), Modifiers::ALT)),
        Some(Command::OpenFile)
    );
}

#[test]
fn test_broken_user_keymap_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keymap.yaml");
    std::fs::write(&path, "bindings:\n  - key: \"hyper+x\"\n    command: Quit\n").unwrap();

    assert_eq!(merge_user_file(default_bindings(), &path), default_bindings());
}
