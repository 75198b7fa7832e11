use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::io;
use std::process;

use tagtastic::cli::{Cli, Command};
use tagtastic::commands::{self, Settings, VersionInfo};
use tagtastic::git::Git2Repository;
use tagtastic::themes::EmbeddedThemeRepository;
use tagtastic::{logging, ui, TagtasticError};

fn main() {
    let raw_args: Vec<String> = std::env::args().collect();
    let wants_json = raw_args.iter().any(|a| a == "--json-errors");
    let quiet = raw_args.iter().any(|a| a == "--quiet" || a == "-q");
    let in_ci = std::env::var_os("CI").is_some_and(|v| !v.is_empty());
    let version = VersionInfo::current();

    let cli = match Cli::try_parse_from(&raw_args) {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                if ui::should_show_banner(quiet, in_ci) {
                    print_banner(&version, help_banner_codename());
                }
                let _ = e.print();
                process::exit(0);
            }
            ErrorKind::DisplayVersion => {
                let _ = e.print();
                process::exit(0);
            }
            _ => {
                if wants_json {
                    let rendered = e.to_string();
                    let message = rendered
                        .lines()
                        .next()
                        .unwrap_or_default()
                        .trim_start_matches("error: ");
                    eprintln!("{}", ui::json_error(message, "parse", 2));
                } else {
                    let _ = e.print();
                }
                process::exit(2);
            }
        },
    };

    if let Err(e) = logging::init_logging(cli.verbose) {
        ui::display_hint(&format!("logging disabled: {:#}", e));
    }

    if let Err(e) = run(cli, version, in_ci) {
        let code = e.exit_code();
        if wants_json {
            eprintln!("{}", ui::json_error(&e.to_string(), "runtime", code));
        } else {
            ui::display_error(&e.to_string());
            if code == 2 && !quiet {
                ui::display_hint("Run \"tagtastic --help\" for usage.");
            }
        }
        process::exit(code);
    }
}

fn run(cli: Cli, version: VersionInfo, in_ci: bool) -> Result<(), TagtasticError> {
    let root = std::env::current_dir()?;
    let settings = Settings {
        root: root.clone(),
        config_path: cli.config_path.clone(),
        version,
    };
    let repo = Git2Repository::discover(&root)?;

    let Some(command) = cli.command.as_ref() else {
        if ui::should_show_banner(cli.quiet, in_ci) {
            print_banner(&settings.version, commands::last_release_codename(repo.as_ref(), &settings));
            Cli::command().print_help()?;
            return Ok(());
        }
        return Err(TagtasticError::usage("no command provided"));
    };

    let themes = EmbeddedThemeRepository::new()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Release(cmd) => {
            let outcome = commands::release(cmd, &settings, repo.as_ref(), &themes, &mut out)?;
            if !cmd.dry_run && !cli.quiet {
                if let Some(commit) = &outcome.commit {
                    ui::display_status(&format!("Committed {}", &commit[..commit.len().min(7)]));
                }
                if outcome.config_updated {
                    ui::display_status("Recorded codename in config");
                }
                if outcome.tagged {
                    ui::display_success(&format!("Created tag {}", outcome.plan.tag.name));
                }
            }
            Ok(())
        }
        other => commands::run(other, &settings, repo.as_ref(), &themes, &mut out),
    }
}

/// Last codename for the banner shown with `--help`, looked up from the
/// working directory with the repo-local config
fn help_banner_codename() -> Option<String> {
    let root = std::env::current_dir().ok()?;
    let repo = Git2Repository::discover(&root).ok().flatten();
    let settings = Settings {
        root,
        config_path: None,
        version: VersionInfo::current(),
    };
    commands::last_release_codename(repo.as_ref(), &settings)
}

fn print_banner(version: &VersionInfo, last_codename: Option<String>) {
    println!(
        "{}\n",
        ui::render_banner(&version.version, last_codename.as_deref())
    );
}
