//! Configuration management

use super::types::{BackupMode, InstallError};
use clap::Parser;
use std::path::{Path, PathBuf};

/// Suffix used for simple backups when nothing else is configured
pub const DEFAULT_BACKUP_SUFFIX: &str = "~";

/// Copy files and create directories, in the manner of GNU install
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "winstall",
    version = crate::VERSION,
    about = "Copy SOURCE to DEST, or multiple SOURCE(s) into an existing DIRECTORY, \
             while setting timestamps and making backups",
    override_usage = "winstall [OPTION]... [-T] SOURCE DEST\n       \
                      winstall [OPTION]... SOURCE... DIRECTORY\n       \
                      winstall [OPTION]... -t DIRECTORY SOURCE...\n       \
                      winstall [OPTION]... -d DIRECTORY..."
)]
pub struct Cli {
    /// Make a backup of each existing destination file
    #[arg(
        long = "backup",
        value_name = "CONTROL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = ""
    )]
    pub backup: Option<String>,

    /// Like --backup but does not accept an argument
    #[arg(short = 'b')]
    pub backup_default: bool,

    /// Treat all arguments as directory names; create all components
    #[arg(short = 'd', long = "directory", conflicts_with = "target_directory")]
    pub directory: bool,

    /// Create all leading components of DEST except the last, or all
    /// components of --target-directory
    #[arg(short = 'D')]
    pub create_leading: bool,

    /// Apply access/modification times of SOURCE files to corresponding
    /// destination files
    #[arg(short = 'p', long = "preserve-timestamps")]
    pub preserve_timestamps: bool,

    /// Override the usual backup suffix
    #[arg(short = 'S', long = "suffix", value_name = "SUFFIX")]
    pub suffix: Option<String>,

    /// Copy all SOURCE arguments into DIRECTORY
    #[arg(
        short = 't',
        long = "target-directory",
        value_name = "DIRECTORY",
        conflicts_with = "no_target_directory"
    )]
    pub target_directory: Option<PathBuf>,

    /// Treat DEST as a normal file
    #[arg(short = 'T', long = "no-target-directory")]
    pub no_target_directory: bool,

    /// Print the name of each created file or directory
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Ignored; accepted for compatibility
    #[arg(short = 'c', hide = true)]
    pub ignored_copy: bool,

    /// Ignored; accepted for compatibility
    #[arg(short = 'C', long = "compare")]
    pub compare: bool,

    /// Ignored; accepted for compatibility
    #[arg(long = "debug")]
    pub debug: bool,

    /// Ignored; accepted for compatibility
    #[arg(short = 'g', long = "group", value_name = "GROUP")]
    pub group: Option<String>,

    /// Ignored; accepted for compatibility
    #[arg(short = 'm', long = "mode", value_name = "MODE")]
    pub mode: Option<String>,

    /// Ignored; accepted for compatibility
    #[arg(short = 'o', long = "owner", value_name = "OWNER")]
    pub owner: Option<String>,

    /// Ignored; accepted for compatibility
    #[arg(long = "preserve-context")]
    pub preserve_context: bool,

    /// Ignored; accepted for compatibility
    #[arg(short = 's', long = "strip")]
    pub strip: bool,

    /// Ignored; accepted for compatibility
    #[arg(long = "strip-program", value_name = "PROGRAM")]
    pub strip_program: Option<String>,

    /// Ignored; accepted for compatibility
    #[arg(
        short = 'Z',
        long = "context",
        value_name = "CTX",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = ""
    )]
    pub context: Option<String>,

    /// Source files, followed by the destination unless -t or -d is used
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

/// Environment variables consulted while resolving options.
///
/// Captured once so resolution can be tested without touching the process
/// environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    /// `VERSION_CONTROL`
    pub version_control: Option<String>,

    /// `SIMPLE_BACKUP_SUFFIX`
    pub simple_backup_suffix: Option<String>,
}

impl Environment {
    /// Read the relevant variables from the process environment
    pub fn from_env() -> Self {
        Self {
            version_control: std::env::var("VERSION_CONTROL").ok(),
            simple_backup_suffix: std::env::var("SIMPLE_BACKUP_SUFFIX").ok(),
        }
    }
}

/// Resolve the backup mode: explicit `--backup=CONTROL`, then
/// `VERSION_CONTROL`, then `Existing`. Backups that were not requested at all
/// resolve to `None`.
pub fn resolve_backup_mode(
    requested: bool,
    explicit: Option<&str>,
    version_control: Option<&str>,
) -> Result<BackupMode, InstallError> {
    if !requested {
        return Ok(BackupMode::None);
    }

    match (
        explicit.filter(|v| !v.is_empty()),
        version_control.filter(|v| !v.is_empty()),
    ) {
        (Some(value), _) => BackupMode::parse(value, "backup type"),
        (None, Some(value)) => BackupMode::parse(value, "$VERSION_CONTROL"),
        (None, None) => Ok(BackupMode::Existing),
    }
}

/// Resolve the simple backup suffix: `-S`, then `SIMPLE_BACKUP_SUFFIX`, then
/// `~`. Empty suffixes and suffixes containing a path separator are ignored.
pub fn resolve_backup_suffix(explicit: Option<&str>, env_suffix: Option<&str>) -> String {
    explicit
        .filter(|s| is_usable_suffix(s))
        .or_else(|| env_suffix.filter(|s| is_usable_suffix(s)))
        .unwrap_or(DEFAULT_BACKUP_SUFFIX)
        .to_string()
}

fn is_usable_suffix(suffix: &str) -> bool {
    !suffix.is_empty() && !suffix.chars().any(std::path::is_separator)
}

/// Fully resolved install options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backup mode; `None` when backups are disabled
    pub backup_mode: BackupMode,

    /// Suffix for simple backups
    pub backup_suffix: String,

    /// Copy access/modification times from the source
    pub preserve_timestamps: bool,

    /// Report each directory created and file installed
    pub verbose: bool,

    /// Operands are directories to create (`-d`)
    pub directory_args: bool,

    /// Create missing leading directories (`-D`)
    pub create_leading: bool,

    /// Explicit target directory (`-t`)
    pub target_directory: Option<PathBuf>,

    /// Treat DEST as a normal file (`-T`)
    pub no_target_directory: bool,

    /// Positional operands in command-line order
    pub operands: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backup_mode: BackupMode::None,
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
            preserve_timestamps: false,
            verbose: false,
            directory_args: false,
            create_leading: false,
            target_directory: None,
            no_target_directory: false,
            operands: Vec::new(),
        }
    }
}

impl Config {
    /// Build a configuration from parsed arguments and a captured environment
    pub fn from_cli(cli: Cli, env: &Environment) -> Result<Self, InstallError> {
        // -S implies backups, as with GNU install
        let requested = cli.backup_default || cli.backup.is_some() || cli.suffix.is_some();

        let config = Self {
            backup_mode: resolve_backup_mode(
                requested,
                cli.backup.as_deref(),
                env.version_control.as_deref(),
            )?,
            backup_suffix: resolve_backup_suffix(
                cli.suffix.as_deref(),
                env.simple_backup_suffix.as_deref(),
            ),
            preserve_timestamps: cli.preserve_timestamps,
            verbose: cli.verbose,
            directory_args: cli.directory,
            create_leading: cli.create_leading,
            target_directory: cli.target_directory,
            no_target_directory: cli.no_target_directory,
            operands: cli.files,
        };

        config.validate()?;
        Ok(config)
    }

    /// Whether existing destinations are backed up
    pub fn make_backups(&self) -> bool {
        self.backup_mode != BackupMode::None
    }

    /// Validate flag combinations
    pub fn validate(&self) -> Result<(), InstallError> {
        if self.target_directory.is_some() && self.no_target_directory {
            return Err(InstallError::Usage(
                "cannot combine --target-directory (-t) and --no-target-directory (-T)"
                    .to_string(),
            ));
        }

        if self.directory_args && self.target_directory.is_some() {
            return Err(InstallError::Usage(
                "target directory not allowed when installing a directory".to_string(),
            ));
        }

        Ok(())
    }

    /// The explicit target directory, if any
    pub fn target(&self) -> Option<&Path> {
        self.target_directory.as_deref()
    }
}

impl TryFrom<Cli> for Config {
    type Error = InstallError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        Config::from_cli(cli, &Environment::from_env())
    }
}
