//! Command-line definitions

use crate::release::ReleaseArgs;
use crate::themes::DEFAULT_THEME;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "tagtastic",
    about = "Generate human-readable release codenames",
    disable_version_flag = true
)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Suppress non-essential output")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Emit errors as JSON")]
    pub json_errors: bool,

    #[arg(
        long,
        global = true,
        env = "TAGTASTIC_CONFIG",
        help = "Config file path override"
    )]
    pub config_path: Option<String>,

    #[arg(short, long, global = true, help = "Log workflow details to stderr")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a codename
    Generate(GenerateArgs),

    /// List codenames in a theme
    List(ListArgs),

    /// List available themes
    Themes(ThemesArgs),

    /// Validate a codename
    Validate(ValidateArgs),

    /// Manage local config
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Show version
    Version,

    /// Print the codename the next release would get
    NextCodename,

    /// Prepare a release: changelog, VERSION, config record and tag
    Release(ReleaseCommand),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[arg(short, long, default_value = DEFAULT_THEME, help = "Theme to use")]
    pub theme: String,

    #[arg(short, long, default_value_t = 0, help = "Random seed (0 uses entropy)")]
    pub seed: u64,

    #[arg(
        short,
        long,
        value_delimiter = ',',
        help = "Comma-separated names to exclude"
    )]
    pub exclude: Vec<String>,

    #[arg(short, long, default_value = "text", help = "Output format (text, json, shell)")]
    pub format: String,

    #[arg(long, help = "Record the selected codename in config")]
    pub record: bool,
}

impl GenerateArgs {
    /// Seed for the picker; 0 means unseeded
    pub fn seed(&self) -> Option<u64> {
        (self.seed != 0).then_some(self.seed)
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(short, long, default_value = DEFAULT_THEME, help = "Theme to list")]
    pub theme: String,

    #[arg(short, long, default_value = "text", help = "Output format (text, json)")]
    pub format: String,
}

#[derive(Args, Debug)]
pub struct ThemesArgs {
    #[arg(short, long, default_value = "text", help = "Output format (text, json)")]
    pub format: String,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[arg(help = "Name to validate")]
    pub name: String,

    #[arg(short, long, help = "Theme to search (all themes when omitted)")]
    pub theme: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Initialize local config
    Init {
        #[arg(short, long, help = "Config file path")]
        path: Option<String>,

        #[arg(long, help = "Overwrite existing config")]
        force: bool,

        #[arg(long, help = "Preview changes without writing")]
        dry_run: bool,
    },

    /// Show local config
    Show {
        #[arg(short, long, help = "Config file path")]
        path: Option<String>,
    },

    /// Remove local config
    Reset {
        #[arg(short, long, help = "Config file path")]
        path: Option<String>,

        #[arg(long, help = "Preview changes without deleting")]
        dry_run: bool,
    },
}

#[derive(Args, Debug)]
pub struct ReleaseCommand {
    #[arg(help = "Version to release (omit when using --bump)")]
    pub version: Option<String>,

    #[arg(long, help = "Auto-bump version (major, minor, patch)")]
    pub bump: Option<String>,

    #[arg(long, help = "Prerelease label (alpha, beta, rc)")]
    pub pre: Option<String>,

    #[arg(
        long,
        default_value_t = 0,
        allow_negative_numbers = true,
        help = "Prerelease number (defaults to next available)"
    )]
    pub pre_num: i64,

    #[arg(long, help = "Optional codename override")]
    pub codename: Option<String>,

    #[arg(long, help = "Release date (YYYY-MM-DD), defaults to today")]
    pub date: Option<String>,

    #[arg(long, help = "Commit CHANGELOG.md and VERSION updates")]
    pub commit: bool,

    #[arg(long, help = "Preview changes without writing files or tagging")]
    pub dry_run: bool,

    #[arg(long = "config", help = "Config file path override")]
    pub config: Option<String>,

    #[arg(long, help = "Skip updating repo config")]
    pub no_config_update: bool,

    #[arg(long, help = "Skip creating the annotated tag")]
    pub no_tag: bool,

    #[arg(long, help = "Repository URL used for changelog links")]
    pub repo_url: Option<String>,
}

impl From<&ReleaseCommand> for ReleaseArgs {
    fn from(cmd: &ReleaseCommand) -> Self {
        ReleaseArgs {
            version: cmd.version.clone(),
            bump: cmd.bump.clone(),
            pre: cmd.pre.clone(),
            pre_num: cmd.pre_num,
            codename: cmd.codename.clone(),
            date: cmd.date.clone(),
            commit: cmd.commit,
            dry_run: cmd.dry_run,
            no_config_update: cmd.no_config_update,
            no_tag: cmd.no_tag,
        }
    }
}
