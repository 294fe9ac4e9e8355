use crate::config::loader::{load_config, load_config_file};
use crate::config::schema::Config;
use crate::error::{ConfigError, SortError, SortResult};
use crate::utility::helper::{executable_dir, is_within, normalize_path, resolve_path};
use clap::{Arg, ArgAction, CommandFactory, FromArgMatches, Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;

pub const DEFAULT_DIST: &str = "./dist";

/// What to do when a file with the same name is already in its bucket.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Replace the existing file
    #[default]
    Overwrite,
    /// Keep the existing file and skip the new one
    Skip,
    /// Copy the new file as name~N.ext
    Rename,
    /// Move the existing file to name~ and copy the new one
    Backup,
    /// Abort the run
    Fail,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "treesort",
    version = env!("CARGO_PKG_VERSION"),
    about = "Sort every file of a directory tree into single-letter folders",
    disable_version_flag = true,
    after_help = "Example: treesort --entry ./path/ --dist ./path --delete"
)]
pub struct CLIArgs {
    #[arg(
        short = 'e',
        long = "entry",
        value_name = "PATH",
        help = "Initial directory path",
        required = true
    )]
    pub entry: PathBuf,

    #[arg(
        short = 'd',
        long = "dist",
        value_name = "PATH",
        help = "Result directory path [default: ./dist]"
    )]
    pub dist: Option<PathBuf>,

    #[arg(
        short = 'D',
        long = "delete",
        help = "Remove initial directory after a successful sort"
    )]
    pub delete: bool,

    #[arg(
        long = "collision",
        value_name = "POLICY",
        help = "what to do when a file name already exists in its bucket [default: overwrite]"
    )]
    pub collision: Option<CollisionPolicy>,

    #[arg(
        long = "base-dir",
        value_name = "DIR",
        help = "Resolve relative paths against DIR instead of the program's directory"
    )]
    pub base_dir: Option<PathBuf>,

    #[arg(long, help = "Log every copied file")]
    pub verbose: bool,

    // Config Options (Placed last as meta)
    #[arg(long, value_name = "PATH", help = "Use custom config file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Ignore all config files")]
    pub no_config: bool,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct SortOptions {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub delete: bool,
    pub collision: CollisionPolicy,
    pub verbose: bool,
}

impl CLIArgs {
    /// clap command with `-v`/`--version` in place of the default `-V`.
    pub fn command_with_version() -> clap::Command {
        <Self as CommandFactory>::command().arg(
            Arg::new("version")
                .short('v')
                .long("version")
                .action(ArgAction::Version)
                .help("Print version"),
        )
    }

    pub fn parse() -> Self {
        Self::parse_from(std::env::args_os())
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(itr).unwrap_or_else(|e| e.exit())
    }

    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut command = Self::command_with_version();
        let matches = command.try_get_matches_from_mut(itr)?;
        <Self as FromArgMatches>::from_arg_matches(&matches).map_err(|e| e.format(&mut command))
    }

    pub fn validate(self) -> SortResult<SortOptions> {
        let config = load_config_if_needed(&self)?;
        let config = config.unwrap_or_default();

        let base_dir = resolve_base_dir(&self, &config)?;

        let dist = self
            .dist
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.sort.dist));
        let collision = match self.collision {
            Some(policy) => policy,
            None => parse_collision_policy(&config.sort.collision)?,
        };

        let options = SortOptions {
            source: resolve_path(&base_dir, &self.entry),
            destination: resolve_path(&base_dir, &dist),
            delete: self.delete || config.sort.delete,
            collision,
            verbose: self.verbose || config.log.verbose,
        };

        validate_paths(&options)?;
        Ok(options)
    }
}

fn load_config_if_needed(args: &CLIArgs) -> SortResult<Option<Config>> {
    if args.no_config {
        return Ok(None);
    }

    if let Some(custom_path) = &args.config {
        return Ok(Some(load_config_file(custom_path)?));
    }

    Ok(Some(load_config()?))
}

fn resolve_base_dir(args: &CLIArgs, config: &Config) -> SortResult<PathBuf> {
    let configured = args.base_dir.clone().or_else(|| {
        let from_config = config.paths.base_dir.trim();
        (!from_config.is_empty()).then(|| PathBuf::from(from_config))
    });

    let base = match configured {
        Some(dir) if dir.is_absolute() => dir,
        Some(dir) => std::env::current_dir()
            .map_err(ConfigError::BaseDir)?
            .join(dir),
        None => executable_dir().map_err(ConfigError::BaseDir)?,
    };
    Ok(normalize_path(&base))
}

pub fn parse_collision_policy(value: &str) -> SortResult<CollisionPolicy> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(CollisionPolicy::default());
    }
    CollisionPolicy::from_str(value, true).map_err(|_| {
        SortError::Validation(format!(
            "unknown collision policy '{}' (expected overwrite, skip, rename, backup or fail)",
            value
        ))
    })
}

fn validate_paths(options: &SortOptions) -> SortResult<()> {
    if options.source == options.destination {
        return Err(SortError::Validation(format!(
            "--entry and --dist must differ (both are '{}')",
            options.source.display()
        )));
    }

    // Buckets would land on top of the files being read.
    if is_within(&options.source, &options.destination) {
        return Err(SortError::Validation(format!(
            "--entry '{}' is inside the result folder '{}'",
            options.source.display(),
            options.destination.display()
        )));
    }

    if options.delete && is_within(&options.destination, &options.source) {
        return Err(SortError::Validation(format!(
            "--delete would remove the result folder '{}' because it is inside '{}'",
            options.destination.display(),
            options.source.display()
        )));
    }

    Ok(())
}
