//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name     = "entigen",
    bin_name = "entigen",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Entity-driven application generator",
    long_about = "entigen turns an entity description (class name and typed fields) \
                  into a Spring Boot CRUD application, builds it with Maven and \
                  packages the result as a zip archive.",
    after_help = "EXAMPLES:\n\
        \x20 entigen generate order.json\n\
        \x20 entigen generate order.json --output ./out --timeout 300\n\
        \x20 entigen download Order-generated-app.zip --root ./out/app\n\
        \x20 entigen types",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate, build and package an application from a request file.
    #[command(
        visible_alias = "g",
        about = "Generate an application from an entity request",
        after_help = "EXAMPLES:\n\
            \x20 entigen generate order.json\n\
            \x20 cat order.json | entigen generate -\n\
            \x20 entigen generate order.json --fixed --output ./generated-app\n\
            \x20 entigen generate order.json --build-cmd \"mvn -B package\" --timeout 900\n\
            \x20 entigen generate order.json --dry-run"
    )]
    Generate(GenerateArgs),

    /// Copy a generated archive out of a working root.
    #[command(
        about = "Fetch a generated archive",
        after_help = "EXAMPLES:\n\
            \x20 entigen download Order-generated-app.zip --root ./generated-app/<id>\n\
            \x20 entigen download Order-generated-app.zip --root ./app --out /tmp/order.zip"
    )]
    Download(DownloadArgs),

    /// List the supported field types.
    #[command(
        visible_alias = "ls",
        about = "List supported field types",
        after_help = "EXAMPLES:\n\
            \x20 entigen types\n\
            \x20 entigen types --output-format json"
    )]
    Types,

    /// Initialise an entigen configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 entigen init           # global config\n\
            \x20 entigen init --local   # .entigen.toml in the current directory"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 entigen completions bash > ~/.local/share/bash-completion/completions/entigen\n\
            \x20 entigen completions zsh  > ~/.zfunc/_entigen\n\
            \x20 entigen completions fish > ~/.config/fish/completions/entigen.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the effective configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 entigen config get build.timeout_secs\n\
            \x20 entigen config list\n\
            \x20 entigen config path"
    )]
    Config(ConfigCommands),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `entigen generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Request JSON file, or `-` for stdin.
    #[arg(value_name = "REQUEST", help = "Request JSON file ('-' for stdin)")]
    pub request: PathBuf,

    /// Working directory: the base for per-request roots, or the root
    /// itself with `--fixed`.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory (default: output.root from config)"
    )]
    pub output: Option<PathBuf>,

    /// Reuse one working root for every run instead of `<DIR>/<request-id>`.
    #[arg(long = "fixed", help = "Scaffold directly into the output directory")]
    pub fixed: bool,

    /// Build command line, split on whitespace.
    #[arg(
        long = "build-cmd",
        value_name = "COMMAND",
        help = "Build command (default: mvn clean package -q)"
    )]
    pub build_cmd: Option<String>,

    /// Build timeout in seconds.
    #[arg(long = "timeout", value_name = "SECS", help = "Build timeout in seconds")]
    pub timeout: Option<u64>,

    /// Delete the working root when a run fails (per-request layout only).
    #[arg(long = "clean-on-failure", help = "Remove the working root on failure")]
    pub clean_on_failure: bool,

    /// Maven groupId for the generated project.
    #[arg(long = "group-id", value_name = "GROUP", help = "Maven groupId")]
    pub group_id: Option<String>,

    /// Directory of `<kind>.tpl` template overrides.
    #[arg(long = "templates", value_name = "DIR", help = "Template override directory")]
    pub templates: Option<PathBuf>,

    /// Validate the request and list the files that would be written.
    #[arg(long = "dry-run", help = "Show what would be generated without writing")]
    pub dry_run: bool,
}

// ── download ──────────────────────────────────────────────────────────────────

/// Arguments for `entigen download`.
#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// Archive file name, e.g. `Order-generated-app.zip`.
    #[arg(value_name = "FILE", help = "Archive file name")]
    pub file: String,

    /// Working root the archive was written to.
    #[arg(long = "root", value_name = "DIR", help = "Working root holding the archive")]
    pub root: PathBuf,

    /// Destination path (default: `./<FILE>`).
    #[arg(long = "out", value_name = "PATH", help = "Where to write the archive")]
    pub out: Option<PathBuf>,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `entigen init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write `.entigen.toml` in the current directory instead of the
    /// global location.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `entigen completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `entigen config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `build.timeout_secs`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the global configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
