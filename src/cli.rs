//! Command-line parsing and dispatch for the `bur` executable.
//!
//! Note: the documentation for [`Args`] and related types is used to
//! generate the usage for the command-line program and should be read from
//! that perspective.

use clap::{Parser, Subcommand};
use clap_complete::{generate, shells::Shell};
use std::fmt::Display;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use burrow::hidden::host_home_dir;
use burrow::somehow::{Error, Result};
use burrow::{Burrow, Clean, EnvironmentName, ListFormat, PackageNameSet, Quiet};

/// Manage sandboxed development environments.
#[derive(Debug, Parser)]
#[clap(help_message("Print help information. Use --help for more details"))]
pub struct Args {
    /// Path to configuration file.
    #[clap(
        short,
        long,
        default_value_t = default_config_path(),
        value_hint(clap::ValueHint::FilePath),
    )]
    config: PathWithVarExpansion,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate tab-completions for your shell.
    #[clap(arg_required_else_help(true))]
    Completions {
        #[clap(value_parser)]
        shell: Shell,
    },

    /// Run a shell in an existing environment.
    #[clap(arg_required_else_help(true))]
    Enter {
        /// Environment name.
        name: EnvironmentName,
    },

    /// Run a command in an existing environment.
    #[clap(arg_required_else_help(true))]
    Exec {
        /// Environment name.
        name: EnvironmentName,
        /// Command and arguments to run.
        #[clap(last = true, required(true))]
        command: Vec<String>,
    },

    /// Show existing environments.
    List {
        /// Set output format.
        #[clap(long, value_enum, default_value_t)]
        format: ListFormat,
    },

    /// View available packages.
    #[clap(subcommand)]
    Package(PackageCommands),

    /// Create a new environment.
    #[clap(arg_required_else_help(true))]
    New {
        /// Run a shell in the new environment.
        #[clap(long)]
        enter: bool,
        /// Comma-separated names of packages to inject into the home
        /// directory, or "none".
        #[clap(long, use_value_delimiter(true))]
        packages: Option<Vec<String>>,
        /// New environment name.
        name: EnvironmentName,
    },

    /// Delete environment(s) and their work directories.
    #[clap(arg_required_else_help(true))]
    Purge {
        /// Environment name(s).
        #[clap(required(true))]
        names: Vec<EnvironmentName>,
    },

    /// Recreate an environment (keeping its work directory).
    #[clap(arg_required_else_help(true))]
    Reset {
        /// Remove home directory and do not recreate it.
        #[clap(long)]
        clean: bool,
        /// Comma-separated names of packages to inject into home directory,
        /// or "none".
        #[clap(long, use_value_delimiter(true))]
        packages: Option<Vec<String>>,
        /// Environment name(s).
        #[clap(required(true))]
        names: Vec<EnvironmentName>,
    },

    /// Create and enter a new temporary environment.
    Tmp {
        /// Comma-separated names of packages to inject into home directory,
        /// or "none".
        #[clap(long, use_value_delimiter(true))]
        packages: Option<Vec<String>>,
    },
}

#[derive(Debug, Subcommand)]
enum PackageCommands {
    /// Show available packages.
    List {
        /// Set output format.
        #[clap(long, value_enum, default_value_t)]
        format: ListFormat,
    },
}

/// Parses the command-line arguments given to this executable.
///
/// Exits the process upon errors or upon successfully handling certain flags
/// like `--help`.
pub fn parse() -> Args {
    Args::parse()
}

impl Args {
    /// Returns the path on the host's filesystem to the configuration file.
    pub fn config_path(&self) -> &Path {
        self.config.as_ref()
    }
}

/// This type wrapper stores a normal path but understands "$HOME".
///
/// In particular, it expands the variable "$HOME" when converting from a
/// string and displays the path with "$HOME" when possible, so the user's
/// actual home directory doesn't leak into the usage message.
#[derive(Debug)]
struct PathWithVarExpansion(PathBuf);

impl PathWithVarExpansion {
    fn sub_home_prefix(&self, home: &Path) -> String {
        if let Ok(rest) = self.0.strip_prefix(home) {
            format!("$HOME{}{}", std::path::MAIN_SEPARATOR, rest.display())
        } else {
            format!("{}", self.0.display())
        }
    }

    fn expand_home_prefix(path_str: &str, home: &Path) -> Self {
        let path = if path_str == "$HOME" {
            home.to_owned()
        } else if let Some(rest) =
            path_str.strip_prefix(&format!("$HOME{}", std::path::MAIN_SEPARATOR))
        {
            home.join(rest)
        } else {
            PathBuf::from(path_str)
        };
        Self(path)
    }
}

impl AsRef<Path> for PathWithVarExpansion {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for PathWithVarExpansion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.sub_home_prefix(host_home_dir()).fmt(f)
    }
}

impl FromStr for PathWithVarExpansion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self::expand_home_prefix(s, host_home_dir()))
    }
}

fn default_config_path() -> PathWithVarExpansion {
    let xdg_config_home = if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(path)
    } else {
        host_home_dir().join(".config")
    };
    PathWithVarExpansion(xdg_config_home.join("burrow.toml"))
}

fn write_completions<W: io::Write>(shell: Shell, out: &mut W) -> Result<()> {
    use clap::CommandFactory;
    let cmd = &mut Args::command();
    generate(shell, cmd, "bur", out);
    Ok(())
}

/// Executes the subcommand requested on the command line.
///
/// `purge` and `reset` accept multiple names and process each independently:
/// a failure on one name is reported and does not prevent the remaining
/// names from being processed.
pub fn run(args: Args, program: &Burrow) -> Result<()> {
    use Commands::*;
    match args.command {
        Completions { shell } => write_completions(shell, &mut io::stdout()),
        Enter { name } => program.enter_environment(&name),
        Exec { name, command } => program.exec_environment(&name, &command),
        List { format } => program.list_environments(format),
        New {
            name,
            enter,
            packages,
        } => {
            let packages = resolve_packages(program, packages)?;
            program.new_environment(&name, packages)?;
            if enter {
                program.enter_environment(&name)?;
            }
            Ok(())
        }
        Package(command) => run_package_command(command, program),
        Purge { names } => run_each(names, |name| program.purge_environment(&name, Quiet(false))),
        Reset {
            names,
            clean,
            packages,
        } => {
            let packages = resolve_packages(program, packages)?;
            run_each(names, |name| {
                program.reset_environment(&name, packages.as_ref(), Clean(clean))
            })
        }
        Tmp { packages } => {
            let packages = resolve_packages(program, packages)?;
            program.create_enter_tmp_environment(packages)
        }
    }
}

fn run_package_command(command: PackageCommands, program: &Burrow) -> Result<()> {
    match command {
        PackageCommands::List { format } => program.list_packages(format),
    }
}

/// Resolves an optional `--packages` value (already split on commas by
/// clap) into a validated package set, or `None` to use the callee's
/// default. The literal value `none` yields the empty set outright,
/// bypassing the usual `auto` augmentation entirely; anything else is
/// validated and then augmented with `auto`.
fn resolve_packages(program: &Burrow, packages: Option<Vec<String>>) -> Result<Option<PackageNameSet>> {
    match packages {
        None => Ok(None),
        Some(names) if names.len() == 1 && names[0].trim() == "none" => Ok(Some(PackageNameSet::new())),
        Some(names) => Ok(Some(program.resolve_packages(&names)?)),
    }
}

/// Runs `f` once per name, continuing past individual failures. Returns the
/// first error encountered, if any, after all names have been attempted.
fn run_each<F>(names: Vec<EnvironmentName>, mut f: F) -> Result<()>
where
    F: FnMut(EnvironmentName) -> Result<()>,
{
    let mut first_error = None;
    for name in names {
        if let Err(e) = f(name.clone()) {
            eprintln!("error: {e}");
            if first_error.is_none() {
                first_error = Some(e);
            }
        }
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_home_prefix() {
        let p = PathWithVarExpansion(PathBuf::from("/home/foo/bar"));
        assert_eq!("$HOME/bar", p.sub_home_prefix(Path::new("/home/foo")));
        assert_eq!("$HOME/bar", p.sub_home_prefix(Path::new("/home/foo/")));
        assert_eq!("/home/foo/bar", p.sub_home_prefix(Path::new("/home/fo")));
    }

    #[test]
    fn expand_home_prefix() {
        assert_eq!(
            "/home/foo/bar",
            PathWithVarExpansion::expand_home_prefix("$HOME/bar", Path::new("/home/foo"))
                .to_string()
        );
        assert_eq!(
            "/home/foo",
            PathWithVarExpansion::expand_home_prefix("$HOME", Path::new("/home/foo")).to_string()
        );
        assert_eq!(
            "$HOMER",
            PathWithVarExpansion::expand_home_prefix("$HOMER", Path::new("/home/foo")).to_string()
        );
    }

    #[test]
    fn usage() {
        for cmd in [
            "",
            "completions",
            "enter",
            "exec",
            "list",
            "new",
            "package",
            "package list",
            "purge",
            "reset",
            "tmp",
        ] {
            let split_cmd = shlex::split(&format!("bur {cmd} --help")).unwrap();
            let err = Args::try_parse_from(split_cmd).unwrap_err();
            assert!(err.to_string().contains("Usage") || err.to_string().contains("help"));
        }
    }

    #[test]
    fn write_completions_smoke() {
        for shell in [Shell::Bash, Shell::Zsh] {
            let mut buf: Vec<u8> = Vec::new();
            super::write_completions(shell, &mut buf).unwrap();
            assert!(!buf.is_empty());
        }
    }

    #[test]
    fn run_each_continues_past_failures() {
        let mut seen = Vec::new();
        let names = vec![
            EnvironmentName::new("a").unwrap(),
            EnvironmentName::new("b").unwrap(),
            EnvironmentName::new("c").unwrap(),
        ];
        let result = run_each(names, |name| {
            seen.push(name.to_string());
            if name.as_str() == "b" {
                Err(burrow::somehow::somehow!("boom"))
            } else {
                Ok(())
            }
        });
        assert!(result.is_err());
        assert_eq!(vec!["a", "b", "c"], seen);
    }
}
