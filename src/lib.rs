#![warn(
    clippy::explicit_into_iter_loop,
    clippy::explicit_iter_loop,
    clippy::if_then_some_else_none,
    clippy::implicit_clone,
    clippy::redundant_else,
    clippy::single_match_else,
    clippy::try_err,
    clippy::unreadable_literal
)]

//! Library underneath the `bur` command-line program: a dependency/staleness
//! engine for declarative packages, and a lifecycle manager for sandboxed
//! development environments built from them.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fmt;
use std::iter;
use std::path::Path;
use std::rc::Rc;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use serde::Serialize;

pub mod somehow;
pub use somehow::Result;
use somehow::{somehow as anyhow, Context, Error};

mod paths;
use paths::HostPath;

pub mod cli;

pub mod config;
use config::Config;

mod command_ext;

mod randname;
use randname::RandomNameGenerator;

mod runner;
use runner::{CheckedRunner, EnvFilesSummary, EnvironmentExists, Runner, RunnerCommand, SeedSource};

mod bytes;
use bytes::Bytes;

mod fs_util;

mod du;
use du::DirSummary;

mod os_util;

mod encoding;
use encoding::FilenameEncoder;

mod archive;

mod packages;
pub use packages::PackageName;
use packages::PackageRegistry;

#[cfg(target_os = "linux")]
mod bubblewrap;
#[cfg(target_os = "linux")]
use bubblewrap::Bubblewrap;

/// Convenience alias used throughout for a validated, `auto`-augmented
/// package selection.
pub type PackageNameSet = BTreeSet<PackageName>;

/// The main program functionality: a package registry plus a runner for
/// sandboxed environments built from it.
pub struct Burrow {
    shared: Rc<BurrowShared>,
    runner: CheckedRunner,
}

struct BurrowShared {
    config: Config,
    shell: String,
    program_name: String,
    dev_init_script: HostPath,
    home_dirs: HostPath,
    work_dirs: HostPath,
    registry: PackageRegistry,
    random_name_gen: RandomNameGenerator,
}

/// Named boolean flag for [`Burrow::purge_environment`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Quiet(pub bool);

/// Named boolean flag for [`Burrow::reset_environment`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Clean(pub bool);

impl Burrow {
    /// Creates a new instance, resolving the path layout (cache root, data
    /// root, per-environment directory roots, built-in and user package
    /// collections) and loading the package registry.
    ///
    /// # Errors
    ///
    /// - `$HOME` is unset or not a valid absolute path.
    /// - The package registry fails to load (unreadable package files).
    /// - A runner cannot be constructed (Linux-only Bubblewrap runner used
    ///   on a non-Linux host).
    pub fn new(config: Config) -> Result<Self> {
        let home = HostPath::try_from(std::env::var("HOME").context("invalid $HOME")?)?;
        let shell = std::env::var("SHELL").unwrap_or_else(|_| String::from("/bin/sh"));

        let xdg_cache_home = match std::env::var("XDG_CACHE_HOME") {
            Ok(path) => HostPath::try_from(path)?,
            Err(_) => home.join(".cache"),
        };
        let xdg_data_home = match std::env::var("XDG_DATA_HOME") {
            Ok(path) => HostPath::try_from(path)?,
            Err(_) => home.join(".local").join("share"),
        };

        let exe = std::env::current_exe().context("failed to determine current executable")?;
        let program_name = match exe.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => return Err(anyhow!("could not get executable name from {exe:?}")),
        };
        // The binary is expected to live at `<install>/bin/bur` or similarly
        // two levels under `<install>`; fall back to its immediate parent.
        let install_dir = match exe.ancestors().nth(2) {
            Some(path) => HostPath::try_from(path.to_owned())?,
            None => HostPath::try_from(
                exe.parent()
                    .ok_or_else(|| anyhow!("executable path {exe:?} has no parent"))?
                    .to_owned(),
            )?,
        };

        let home_dirs = xdg_cache_home.join("burrow").join("home");
        let work_dirs = xdg_data_home.join("burrow").join("work");
        let user_packages = xdg_data_home.join("burrow").join("packages");
        let builtin_packages = install_dir.join("packages");
        let dev_init_script = install_dir.join("dev-init.sh");
        let wordlist_cache_dir = xdg_cache_home.join("burrow");
        let default_seccomp = install_dir.join("seccomp.bpf");

        for dir in [&home_dirs, &work_dirs, &user_packages] {
            std::fs::create_dir_all(dir.as_host_raw())
                .with_context(|| format!("failed to create directory: {dir}"))?;
        }

        let registry = PackageRegistry::load(&user_packages, &builtin_packages)
            .context("failed to load package registry")?;
        let random_name_gen = RandomNameGenerator::new(wordlist_cache_dir);

        let shared = Rc::new(BurrowShared {
            config,
            shell,
            program_name,
            dev_init_script,
            home_dirs,
            work_dirs,
            registry,
            random_name_gen,
        });

        // `None` means "use the filter shipped alongside this program";
        // only an explicit `seccomp = "disabled"` in the config file turns
        // the sandbox's seccomp filtering off entirely.
        let seccomp = match &shared.config.bubblewrap.seccomp {
            Some(seccomp) => seccomp.clone(),
            None => config::PathOrDisabled::Path(default_seccomp.as_host_raw().to_owned()),
        };

        #[cfg(target_os = "linux")]
        let runner: Box<dyn Runner> = Box::new(Bubblewrap::new(
            shared.home_dirs.clone(),
            shared.work_dirs.clone(),
            shared.shell.clone(),
            seccomp,
        ));
        #[cfg(not(target_os = "linux"))]
        let runner: Box<dyn Runner> = return Err(anyhow!(
            "the Bubblewrap sandbox runner is only available on Linux"
        ));

        Ok(Burrow {
            shared,
            runner: CheckedRunner::new(runner),
        })
    }

    /// The set of all known package names, for CLI validation and
    /// `package list`.
    pub fn known_package_names(&self) -> BTreeSet<PackageName> {
        packages::known_package_names(&self.shared.registry)
    }

    /// Parses, trims, and validates a list of package name strings against
    /// the loaded registry, then augments the result with `auto`. Empty or
    /// blank entries are dropped.
    pub fn resolve_packages(&self, names: &[String]) -> Result<PackageNameSet> {
        let mut set = BTreeSet::new();
        for name in names {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let name = PackageName::new(name)?;
            if !self.shared.registry.contains(&name) {
                let known = self
                    .known_package_names()
                    .iter()
                    .map(PackageName::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(anyhow!("unknown package {name:?}; known packages: {known}"));
            }
            set.insert(name);
        }
        set.insert(PackageName::auto());
        Ok(set)
    }

    /// The default package selection used by `new`/`tmp` when `--packages`
    /// is omitted: `{default, auto}`.
    pub fn default_packages(&self) -> Result<PackageNameSet> {
        self.resolve_packages(&[String::from("default")])
    }

    /// Corresponds to `bur enter`.
    pub fn enter_environment(&self, name: &EnvironmentName) -> Result<()> {
        use EnvironmentExists::*;
        match self.runner.exists(name)? {
            NoEnvironment => Err(anyhow!("environment {name} does not exist")),
            PartiallyExists => Err(anyhow!(
                "environment {name} is in a broken state (try '{} reset')",
                self.shared.program_name
            )),
            FullyExists => self.run(name, &RunCommand::Interactive),
        }
    }

    /// Corresponds to `bur exec`.
    pub fn exec_environment(&self, name: &EnvironmentName, command: &[String]) -> Result<()> {
        use EnvironmentExists::*;
        match self.runner.exists(name)? {
            NoEnvironment => Err(anyhow!("environment {name} does not exist")),
            PartiallyExists => Err(anyhow!(
                "environment {name} is in a broken state (try '{} reset')",
                self.shared.program_name
            )),
            FullyExists => self.run(name, &RunCommand::Exec(command)),
        }
    }

    /// Corresponds to `bur list`.
    pub fn list_environments(&self, format: ListFormat) -> Result<()> {
        let mut names = self.runner.list()?;
        names.sort_unstable();

        if format == ListFormat::Names {
            for name in names {
                println!("{name}");
            }
            return Ok(());
        }

        #[derive(Debug, Serialize)]
        struct Env {
            home_dir_size: u64,
            #[serde(serialize_with = "time_serialize_opt")]
            home_dir_mtime: Option<SystemTime>,
            work_dir_size: u64,
            #[serde(serialize_with = "time_serialize_opt")]
            work_dir_mtime: Option<SystemTime>,
        }

        let envs: Vec<(EnvironmentName, Env)> = names
            .into_iter()
            .map(|name| {
                let summary = match self.runner.files_summary(&name) {
                    Ok(summary) => summary,
                    Err(e) => {
                        println!("WARNING: failed to summarize disk usage for {name}: {e}");
                        EnvFilesSummary {
                            home_dir_path: None,
                            home_dir: DirSummary::empty(),
                            work_dir_path: None,
                            work_dir: DirSummary::empty(),
                        }
                    }
                };
                let env = Env {
                    home_dir_size: summary.home_dir.total_size,
                    home_dir_mtime: nonzero_time(summary.home_dir.last_modified),
                    work_dir_size: summary.work_dir.total_size,
                    work_dir_mtime: nonzero_time(summary.work_dir.last_modified),
                };
                (name, env)
            })
            .collect();

        match format {
            ListFormat::Names => unreachable!("handled above"),

            ListFormat::Json => {
                let envs: BTreeMap<String, _> = envs
                    .into_iter()
                    .map(|(name, env)| (name.0, env))
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&envs)
                        .context("failed to serialize environment list as JSON")?
                );
            }

            ListFormat::Default => {
                let nw = envs
                    .iter()
                    .map(|(name, _)| name.0.len())
                    .chain(iter::once(10))
                    .max()
                    .unwrap();
                let now = SystemTime::now();
                println!("{:<nw$} | {:^24} | {:^24}", "", "home directory", "work directory");
                println!(
                    "{:<nw$} | {:>10} {:>13} | {:>10} {:>13}",
                    "name", "size", "modified", "size", "modified",
                );
                println!("{0:-<nw$} + {0:-<10} {0:-<13} + {0:-<10} {0:-<13}", "");

                #[allow(clippy::to_string_in_format_args)]
                for (name, env) in envs {
                    println!(
                        "{:<nw$} | {:>10} {:>13} | {:>10} {:>13}",
                        name.0,
                        Bytes(env.home_dir_size).to_string(),
                        match env.home_dir_mtime {
                            Some(mtime) => rel_time(now.duration_since(mtime).ok()),
                            None => String::from("N/A"),
                        },
                        Bytes(env.work_dir_size).to_string(),
                        match env.work_dir_mtime {
                            Some(mtime) => rel_time(now.duration_since(mtime).ok()),
                            None => String::from("N/A"),
                        },
                    );
                }
            }
        }

        Ok(())
    }

    /// Corresponds to `bur package list`.
    pub fn list_packages(&self, format: ListFormat) -> Result<()> {
        let mut names: Vec<&PackageName> = self.shared.registry.names().collect();
        names.sort();

        if format == ListFormat::Names {
            for name in names {
                println!("{name}");
            }
            return Ok(());
        }

        #[derive(Debug, Serialize)]
        struct Pkg {
            origin: String,
            depends: Vec<String>,
            provides: Vec<String>,
            buildable: bool,
        }

        let pkgs: Vec<(&PackageName, Pkg)> = names
            .into_iter()
            .map(|name| {
                let package = self
                    .shared
                    .registry
                    .get(name)
                    .expect("name came from registry.names()");
                (
                    name,
                    Pkg {
                        origin: package.origin.clone(),
                        depends: package.depends.iter().map(PackageName::to_string).collect(),
                        provides: package.provides.clone(),
                        buildable: package.is_buildable(),
                    },
                )
            })
            .collect();

        match format {
            ListFormat::Names => unreachable!("handled above"),
            ListFormat::Json => {
                let pkgs: BTreeMap<String, _> = pkgs
                    .into_iter()
                    .map(|(name, pkg)| (name.to_string(), pkg))
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&pkgs)
                        .context("failed to serialize package list as JSON")?
                );
            }
            ListFormat::Default => {
                let nw = pkgs
                    .iter()
                    .map(|(name, _)| name.as_str().len())
                    .chain(iter::once(4))
                    .max()
                    .unwrap();
                println!("{:<nw$} | {:<10} | buildable", "name", "origin");
                for (name, pkg) in pkgs {
                    println!(
                        "{:<nw$} | {:<10} | {}",
                        name.as_str(),
                        pkg.origin,
                        if pkg.buildable { "yes" } else { "no" },
                    );
                }
            }
        }

        Ok(())
    }

    /// Corresponds to `bur new`.
    pub fn new_environment(
        &self,
        name: &EnvironmentName,
        packages: Option<PackageNameSet>,
    ) -> Result<()> {
        use EnvironmentExists::*;
        match self.runner.exists(name)? {
            NoEnvironment => {}
            PartiallyExists => {
                return Err(anyhow!(
                    "environment {name} is in a broken state (try '{} reset')",
                    self.shared.program_name
                ))
            }
            FullyExists => {
                return Err(anyhow!(
                    "environment {name} already exists (did you mean '{} reset'?)",
                    self.shared.program_name
                ))
            }
        }

        let packages = match packages {
            Some(p) => p,
            None => self.default_packages()?,
        };
        self.update_packages(&packages)?;
        self.write_package_list(name, &packages)?;
        self.run(
            name,
            &RunCommand::Init {
                packages: &packages,
            },
        )
        .with_context(|| format!("failed to initialize new environment {name}"))
    }

    /// Corresponds to `bur tmp`.
    pub fn create_enter_tmp_environment(&self, packages: Option<PackageNameSet>) -> Result<()> {
        let word = self
            .shared
            .random_name_gen
            .random_name(|word| match EnvironmentName::new(&format!("tmp-{word}")) {
                Ok(env) => matches!(self.runner.exists(&env), Ok(EnvironmentExists::NoEnvironment)),
                Err(_) => false,
            })
            .context("failed to generate a unique temporary environment name")?;
        let name = EnvironmentName::new(&format!("tmp-{word}"))
            .expect("tmp-<word> is always a valid environment name");
        self.new_environment(&name, packages)?;
        self.enter_environment(&name)
    }

    /// Corresponds to `bur purge`.
    pub fn purge_environment(&self, name: &EnvironmentName, quiet: Quiet) -> Result<()> {
        if !quiet.0 && self.runner.exists(name)? == EnvironmentExists::NoEnvironment {
            println!("WARNING: environment {name} does not exist (nothing to purge)");
        }
        self.runner.purge(name)
    }

    /// Corresponds to `bur reset`.
    pub fn reset_environment(
        &self,
        name: &EnvironmentName,
        packages: Option<&PackageNameSet>,
        clean: Clean,
    ) -> Result<()> {
        if self.runner.exists(name)? == EnvironmentExists::NoEnvironment {
            return Err(anyhow!(
                "environment {name} does not exist (did you mean '{} new'?)",
                self.shared.program_name,
            ));
        }

        if clean.0 {
            return self.runner.wipe_home(name);
        }

        let mut packages = match packages {
            Some(packages) => packages.clone(),
            None => match self.read_package_list(name)? {
                Some(packages) => packages,
                // Unlike `new`, an unreadable/missing `packages.txt` here
                // falls back to the empty selection (plus `auto`), not
                // `default`: a `reset` with no explicit packages and no
                // prior history shouldn't silently install a baseline the
                // caller never asked for.
                None => self.resolve_packages(&[])?,
            },
        };

        match name.package_build_target() {
            None => {
                self.update_packages(&packages)?;
            }
            Some(key) => {
                let package = self
                    .shared
                    .registry
                    .get(&key)
                    .ok_or_else(|| anyhow!("could not find package source for {key}"))?;
                packages.extend(package.depends.iter().cloned());
                self.update_packages(&packages)?;
                packages::build(
                    &self.shared.registry,
                    &self.runner as &dyn Runner,
                    &key,
                    &self.shared.dev_init_script,
                    &self.shared.home_dirs,
                )
                .with_context(|| format!("failed to force-rebuild package {key}"))?;
            }
        }

        self.write_package_list(name, &packages)?;
        self.runner.reset(
            name,
            &self.runner_command(&RunCommand::Init {
                packages: &packages,
            })?,
        )
    }

    fn update_packages(&self, requested: &PackageNameSet) -> Result<()> {
        packages::update_packages(
            &self.shared.registry,
            &self.runner as &dyn Runner,
            requested,
            &self.shared.dev_init_script,
            &self.shared.home_dirs,
            self.shared.config.bubblewrap.auto_update,
            SystemTime::now(),
        )
    }

    fn write_package_list(&self, name: &EnvironmentName, packages: &PackageNameSet) -> Result<()> {
        let path = self
            .shared
            .work_dirs
            .join(env_dir_name(name))
            .join("packages.txt");
        let mut contents: Vec<&str> = packages.iter().map(PackageName::as_str).collect();
        contents.sort_unstable();
        let mut contents = contents.join("\n");
        contents.push('\n');
        std::fs::write(path.as_host_raw(), contents)
            .with_context(|| format!("failed to write package list: {path}"))
    }

    fn read_package_list(&self, name: &EnvironmentName) -> Result<Option<PackageNameSet>> {
        let path = self
            .shared
            .work_dirs
            .join(env_dir_name(name))
            .join("packages.txt");
        match std::fs::read_to_string(path.as_host_raw()) {
            Ok(contents) => {
                let names: Vec<String> = contents
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_owned)
                    .collect();
                if names.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(self.resolve_packages(&names)?))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("failed to read package list: {path}")),
        }
    }

    fn run(&self, name: &EnvironmentName, command: &RunCommand) -> Result<()> {
        let runner_command = self.runner_command(command)?;
        match &runner_command {
            RunnerCommand::Interactive | RunnerCommand::Exec(_) => self.runner.run(name, &runner_command),
            RunnerCommand::Init { .. } => match self.runner.exists(name)? {
                EnvironmentExists::NoEnvironment => self.runner.create(name, &runner_command),
                _ => self.runner.run(name, &runner_command),
            },
        }
    }

    fn runner_command<'a>(&self, command: &RunCommand<'a>) -> Result<RunnerCommand<'a>> {
        Ok(match command {
            RunCommand::Interactive => RunnerCommand::Interactive,
            RunCommand::Exec(words) => RunnerCommand::Exec(words),
            RunCommand::Init { packages } => {
                let closure = self.shared.registry.transitive_depends(packages)?;
                let seeds: Vec<SeedSource> =
                    packages::packages_to_seeds(&self.shared.registry, &self.shared.home_dirs, &closure);
                RunnerCommand::Init {
                    packages,
                    seeds,
                    extra_seed: None,
                    script: self.shared.dev_init_script.clone(),
                }
            }
        })
    }
}

enum RunCommand<'a> {
    Interactive,
    Init { packages: &'a PackageNameSet },
    Exec(&'a [String]),
}

/// The name of a potential sandboxed environment.
///
/// Other than `-` and `_`, values of this type may not contain whitespace or
/// special characters, matching the restrictions needed to turn a name into
/// a single, safe filesystem path component (see `encoding::FilenameEncoder`).
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct EnvironmentName(String);

impl EnvironmentName {
    /// Validates and wraps a candidate environment name.
    pub fn new(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow!("environment name cannot be empty"));
        }

        if s.contains(|c: char| {
            (c.is_ascii() && !c.is_ascii_alphanumeric() && !matches!(c, '-' | '_'))
                || c.is_control()
                || c.is_whitespace()
        }) {
            return Err(anyhow!("environment name cannot contain special characters"));
        }

        let path = Path::new(s);
        let mut components = path.components();
        let first = components.next();
        if components.next().is_some() {
            return Err(anyhow!("environment name cannot have slashes"));
        }
        if !matches!(first, Some(std::path::Component::Normal(_))) {
            return Err(anyhow!("environment name cannot manipulate path"));
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// If this name is a built-package environment (`package-<P>`), returns
    /// the package name `P`.
    fn package_build_target(&self) -> Option<PackageName> {
        self.0
            .strip_prefix("package-")
            .and_then(|s| PackageName::new(s).ok())
    }
}

impl FromStr for EnvironmentName {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for EnvironmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::convert::AsRef<str> for EnvironmentName {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

impl std::convert::AsRef<OsStr> for EnvironmentName {
    fn as_ref(&self) -> &OsStr {
        self.0.as_ref()
    }
}

/// Allowed formats for [`Burrow::list_environments`] and
/// [`Burrow::list_packages`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum ListFormat {
    /// Human-formatted table.
    #[default]
    Default,
    /// Detailed JSON output for machine consumption.
    Json,
    /// Newline-delimited list of names only.
    Names,
}

fn time_serialize_opt<S>(time: &Option<SystemTime>, ser: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match time {
        Some(time) => {
            let time = time.duration_since(UNIX_EPOCH).unwrap().as_secs_f64();
            ser.serialize_some(&time)
        }
        None => ser.serialize_none(),
    }
}

fn rel_time(duration: Option<Duration>) -> String {
    let mut duration = match duration {
        Some(duration) => duration.as_secs_f64(),
        None => return String::from("N/A"),
    };
    duration /= 60.0;
    if duration < 59.5 {
        return format!("{duration:.0} minutes");
    }
    duration /= 60.0;
    if duration < 23.5 {
        return format!("{duration:.0} hours");
    }
    duration /= 24.0;
    format!("{duration:.0} days")
}

fn nonzero_time(t: SystemTime) -> Option<SystemTime> {
    if t == UNIX_EPOCH {
        None
    } else {
        Some(t)
    }
}

/// The single-path-component, filesystem-safe directory name for an
/// environment, matching what the runner uses on disk.
fn env_dir_name(name: &EnvironmentName) -> String {
    FilenameEncoder::new().push(name.as_str()).encode()
}

#[doc(hidden)]
pub mod hidden {
    pub use crate::os_util::host_home_dir;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_name_rejects_bad_input() {
        assert!(EnvironmentName::new("").is_err());
        assert!(EnvironmentName::new("a/b").is_err());
        assert!(EnvironmentName::new("a b").is_err());
        assert!(EnvironmentName::new("..").is_err());
        assert!(EnvironmentName::new("valid-name_1").is_ok());
    }

    #[test]
    fn package_build_target_roundtrip() {
        let name = EnvironmentName::new("package-rust").unwrap();
        assert_eq!(Some(PackageName::new("rust").unwrap()), name.package_build_target());
        let name = EnvironmentName::new("tmp-foo").unwrap();
        assert_eq!(None, name.package_build_target());
    }

    #[test]
    fn rel_time_buckets() {
        assert_eq!("N/A", rel_time(None));
        assert_eq!("5 minutes", rel_time(Some(Duration::from_secs(300))));
        assert_eq!("2 hours", rel_time(Some(Duration::from_secs(2 * 3600 + 60))));
        assert_eq!("3 days", rel_time(Some(Duration::from_secs(3 * 24 * 3600))));
    }
}
