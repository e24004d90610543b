use clap::Parser;
use dupesweep::cli::{Cli, ThemeArg};
use dupesweep::config::{Config, ConfigError, ENV_PREFIX};
use dupesweep::tui::keybindings::{KeyBindings, KeybindingProfile};
use dupesweep::tui::Action;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use figment::providers::Serialized;
use std::collections::HashMap;
use std::fs;
use std::sync::Mutex;
use tempfile::tempdir;

/// Serializes tests that read or write `DUPESWEEP_*` variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn lock_env() -> std::sync::MutexGuard<'static, ()> {
    ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner())
}

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let figment = figment::Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.theme, ThemeArg::Auto);
    assert_eq!(config.keybinding_profile, KeybindingProfile::Universal);
}

#[test]
fn test_config_load_from_toml() {
    let _guard = lock_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let toml_content = r#"
theme = "light"
keybinding_profile = "vim"
accessible = true

[keybindings]
keep_only = ["x"]
quit = ["q", "Ctrl+q"]
"#;
    fs::write(&config_path, toml_content).unwrap();

    let config = Config::load(Some(&config_path)).unwrap();

    assert_eq!(config.theme, ThemeArg::Light);
    assert_eq!(config.keybinding_profile, KeybindingProfile::Vim);
    assert!(config.accessible);
    assert_eq!(
        config.keybindings.get("quit").unwrap(),
        &vec!["q".to_string(), "Ctrl+q".to_string()]
    );
}

#[test]
fn test_config_round_trips_through_toml() {
    let _guard = lock_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let mut keybindings = HashMap::new();
    keybindings.insert("confirm".to_string(), vec!["y".to_string()]);
    let original = Config {
        theme: ThemeArg::Dark,
        keybinding_profile: KeybindingProfile::Standard,
        accessible: false,
        keybindings,
    };
    fs::write(&config_path, toml::to_string(&original).unwrap()).unwrap();

    assert_eq!(Config::load(Some(&config_path)).unwrap(), original);
}

#[test]
fn test_config_partial_file_keeps_defaults() {
    let _guard = lock_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "accessible = true\n").unwrap();

    let config = Config::load(Some(&config_path)).unwrap();
    assert!(config.accessible);
    assert_eq!(config.theme, ThemeArg::Auto);
    assert!(config.keybindings.is_empty());
}

#[test]
fn test_config_missing_explicit_file() {
    let temp_dir = tempdir().unwrap();
    let missing = temp_dir.path().join("nope.toml");

    let err = Config::load(Some(&missing)).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(ref p) if p == &missing));
    assert!(err.to_string().contains("nope.toml"));
}

#[test]
fn test_config_invalid_value() {
    let _guard = lock_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "theme = \"neon\"\n").unwrap();

    let err = Config::load(Some(&config_path)).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_config_env_overrides_file() {
    let _guard = lock_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "theme = \"light\"\n").unwrap();

    let theme_var = format!("{ENV_PREFIX}THEME");
    std::env::set_var(&theme_var, "dark");
    let config = Config::load(Some(&config_path));
    std::env::remove_var(&theme_var);

    assert_eq!(config.unwrap().theme, ThemeArg::Dark);
}

#[test]
fn test_cli_overrides_everything() {
    let _guard = lock_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "theme = \"light\"\nkeybinding_profile = \"vim\"\n").unwrap();

    let mut config = Config::load(Some(&config_path)).unwrap();
    let cli = Cli::parse_from(["dupesweep", "report.txt", "--theme", "dark", "--accessible"]);
    config.apply_cli(&cli);

    assert_eq!(config.theme, ThemeArg::Dark);
    assert_eq!(config.keybinding_profile, KeybindingProfile::Vim);
    assert!(config.accessible);
}

#[test]
fn test_config_keybindings_apply() {
    let _guard = lock_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "keybinding_profile = \"standard\"\n[keybindings]\nkeep_only = [\"Ctrl+k\"]\n",
    )
    .unwrap();

    let config = Config::load(Some(&config_path)).unwrap();
    let bindings =
        KeyBindings::from_profile_with_custom(config.keybinding_profile, &config.keybindings)
            .unwrap();

    let ctrl_k = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL);
    assert_eq!(bindings.resolve(&ctrl_k), Some(Action::KeepOnly));
    assert_eq!(
        bindings.resolve(&KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE)),
        None
    );
}

#[test]
fn test_config_unknown_action_is_rejected() {
    let _guard = lock_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[keybindings]\nconfirn = [\"y\"]\n").unwrap();

    let config = Config::load(Some(&config_path)).unwrap();
    let err = KeyBindings::from_profile_with_custom(config.keybinding_profile, &config.keybindings)
        .unwrap_err();
    assert!(err.to_string().contains("Did you mean 'confirm'?"));
}
