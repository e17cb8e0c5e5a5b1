use std::collections::BTreeSet;

use crate::du::DirSummary;
use crate::paths::HostPath;
use crate::packages::PackageName;
use crate::somehow::Result;
use crate::EnvironmentName;

/// Launches and manages isolated, sandboxed environments.
///
/// There is a single production implementation, [`crate::bubblewrap::Bubblewrap`],
/// but the seam is kept as a trait (as in the original tool, which supported
/// several runners) because it costs nothing and documents clearly what an
/// environment launcher must provide.
pub trait Runner {
    /// Returns a list of existing environments, including ones that only
    /// partially exist (e.g. only a work directory).
    fn list(&self) -> Result<Vec<EnvironmentName>>;

    /// Creates a new environment with the given name and runs `command` in
    /// it once its home/work directories are ready.
    ///
    /// Fails if an environment already (partially or fully) exists with that
    /// name.
    fn create(&self, name: &EnvironmentName, command: &RunnerCommand) -> Result<()>;

    /// Returns whether the environment fully exists, partially exists (in a
    /// likely broken state), or does not exist at all.
    fn exists(&self, name: &EnvironmentName) -> Result<EnvironmentExists>;

    /// Calculates and returns information about the filesystem paths used
    /// for the environment.
    fn files_summary(&self, name: &EnvironmentName) -> Result<EnvFilesSummary>;

    /// Deletes the environment's home directory (not its work directory),
    /// then runs `command` to rebuild it.
    fn reset(&self, name: &EnvironmentName, command: &RunnerCommand) -> Result<()>;

    /// Deletes the environment's home directory (not its work directory) and
    /// leaves it deleted, running nothing. Used by `reset --clean`, which
    /// stops here rather than rebuilding a home; the environment is left
    /// only partially existing until a later `new`/`reset` reseeds it.
    fn wipe_home(&self, name: &EnvironmentName) -> Result<()>;

    /// Deletes the environment completely, including its home directory and
    /// work directory. Tolerates a partially- or non-existent environment.
    fn purge(&self, name: &EnvironmentName) -> Result<()>;

    /// Runs a command or interactive shell in an already-existing
    /// environment.
    fn run(&self, name: &EnvironmentName, command: &RunnerCommand) -> Result<()>;
}

#[derive(Debug, PartialEq, Eq)]
pub enum EnvironmentExists {
    NoEnvironment,
    PartiallyExists,
    FullyExists,
}

pub struct EnvFilesSummary {
    pub home_dir_path: Option<HostPath>,
    pub home_dir: DirSummary,
    pub work_dir_path: Option<HostPath>,
    pub work_dir: DirSummary,
}

/// One seed source: a package's built home directory plus the subset of its
/// `provides` paths to stream in.
pub struct SeedSource {
    pub dir: HostPath,
    pub files: Vec<String>,
}

/// What to do once an environment's filesystem view is ready.
pub enum RunnerCommand<'a> {
    Interactive,
    Init {
        packages: &'a BTreeSet<PackageName>,
        seeds: Vec<SeedSource>,
        extra_seed: Option<(HostPath, String)>,
        script: HostPath,
    },
    Exec(&'a [String]),
}

/// Wraps a [`Runner`] and asserts its documented pre/postconditions around
/// every call, so a bug in the one production implementation shows up
/// immediately as a panic rather than quietly corrupting state.
pub struct CheckedRunner(Box<dyn Runner>);

impl CheckedRunner {
    pub fn new(runner: Box<dyn Runner>) -> Self {
        Self(runner)
    }
}

impl Runner for CheckedRunner {
    fn list(&self) -> Result<Vec<EnvironmentName>> {
        self.0.list()
    }

    fn create(&self, name: &EnvironmentName, command: &RunnerCommand) -> Result<()> {
        assert_eq!(
            self.exists(name)?,
            EnvironmentExists::NoEnvironment,
            "environment should not exist before create"
        );
        self.0.create(name, command)?;
        assert_eq!(
            self.exists(name)?,
            EnvironmentExists::FullyExists,
            "environment should fully exist after create"
        );
        Ok(())
    }

    fn exists(&self, name: &EnvironmentName) -> Result<EnvironmentExists> {
        self.0.exists(name)
    }

    fn files_summary(&self, name: &EnvironmentName) -> Result<EnvFilesSummary> {
        assert_ne!(
            self.exists(name)?,
            EnvironmentExists::NoEnvironment,
            "environment should partially or fully exist before files_summary"
        );
        self.0.files_summary(name)
    }

    fn reset(&self, name: &EnvironmentName, command: &RunnerCommand) -> Result<()> {
        assert_ne!(
            self.exists(name)?,
            EnvironmentExists::NoEnvironment,
            "environment should partially or fully exist before reset"
        );
        self.0.reset(name, command)?;
        assert_eq!(
            self.exists(name)?,
            EnvironmentExists::FullyExists,
            "environment should fully exist after reset"
        );
        Ok(())
    }

    fn purge(&self, name: &EnvironmentName) -> Result<()> {
        self.0.purge(name)?;
        assert_eq!(
            self.exists(name)?,
            EnvironmentExists::NoEnvironment,
            "environment should not exist after purge"
        );
        Ok(())
    }

    fn wipe_home(&self, name: &EnvironmentName) -> Result<()> {
        assert_ne!(
            self.exists(name)?,
            EnvironmentExists::NoEnvironment,
            "environment should partially or fully exist before wipe_home"
        );
        self.0.wipe_home(name)?;
        assert_ne!(
            self.exists(name)?,
            EnvironmentExists::FullyExists,
            "environment should not fully exist after wipe_home"
        );
        Ok(())
    }

    fn run(&self, name: &EnvironmentName, command: &RunnerCommand) -> Result<()> {
        assert_eq!(
            self.exists(name)?,
            EnvironmentExists::FullyExists,
            "environment should fully exist before run"
        );
        self.0.run(name, command)?;
        assert_eq!(
            self.exists(name)?,
            EnvironmentExists::FullyExists,
            "environment should fully exist after run"
        );
        Ok(())
    }
}
