// tests/cli_test.rs
use clap::Parser;
use serial_test::serial;
use std::env;
use tagtastic::cli::{Cli, Command};
use tagtastic::commands::{Settings, VersionInfo};
use tempfile::TempDir;

fn settings_for(cli: &Cli, dir: &TempDir) -> Settings {
    Settings {
        root: dir.path().to_path_buf(),
        config_path: cli.config_path.clone(),
        version: VersionInfo::current(),
    }
}

#[test]
#[serial]
fn test_config_path_from_environment() {
    env::set_var("TAGTASTIC_CONFIG", "/tmp/from-env.toml");
    let cli = Cli::try_parse_from(["tagtastic", "themes"]).unwrap();
    env::remove_var("TAGTASTIC_CONFIG");

    assert_eq!(cli.config_path.as_deref(), Some("/tmp/from-env.toml"));
}

#[test]
#[serial]
fn test_flag_beats_environment() {
    env::set_var("TAGTASTIC_CONFIG", "/tmp/from-env.toml");
    let cli = Cli::try_parse_from(["tagtastic", "--config-path", "/tmp/flag.toml", "themes"])
        .unwrap();
    env::remove_var("TAGTASTIC_CONFIG");

    assert_eq!(cli.config_path.as_deref(), Some("/tmp/flag.toml"));
}

#[test]
#[serial]
fn test_repo_config_is_the_fallback() {
    env::remove_var("TAGTASTIC_CONFIG");
    let dir = TempDir::new().unwrap();
    let cli = Cli::try_parse_from(["tagtastic", "next-codename"]).unwrap();
    assert!(matches!(cli.command, Some(Command::NextCodename)));

    let settings = settings_for(&cli, &dir);
    assert_eq!(
        settings.config_file(None).unwrap(),
        dir.path().join(".tagtastic.toml")
    );
    assert_eq!(
        settings.config_file(Some("/tmp/own.toml")).unwrap(),
        std::path::PathBuf::from("/tmp/own.toml")
    );
}

#[test]
#[serial]
fn test_home_directory_is_expanded() {
    env::remove_var("TAGTASTIC_CONFIG");
    let dir = TempDir::new().unwrap();
    let cli = Cli::try_parse_from(["tagtastic", "--config-path", "~/tagtastic.toml", "themes"])
        .unwrap();

    let resolved = settings_for(&cli, &dir).config_file(None).unwrap();
    assert_eq!(resolved, dirs::home_dir().unwrap().join("tagtastic.toml"));
}

#[test]
fn test_unknown_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["tagtastic", "publish"]).is_err());
}

#[test]
fn test_validate_requires_name() {
    assert!(Cli::try_parse_from(["tagtastic", "validate"]).is_err());
}
