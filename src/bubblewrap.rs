//! The one production [`Runner`]: launches environments inside a `bwrap`
//! (Bubblewrap) sandbox.
//!
//! Grounded in the fixed filesystem view described for the Environment
//! Runner: namespace isolation, a read-only `/usr` with `/bin`, `/sbin`,
//! `/lib`, `/lib64` symlinked onto it, a read-write home and work bind, an
//! optional init script bind, an optional streamed seed archive delivered
//! via an inherited file descriptor, and an optional seccomp filter.

use std::collections::BTreeSet;
use std::io;
use std::os::unix::io::AsRawFd;

use crate::archive::ArchiveProducer;
use crate::command_ext::Command;
use crate::config::PathOrDisabled;
use crate::du::{self, DirSummary};
use crate::encoding::FilenameEncoder;
use crate::fs_util::{rmtree, try_exists, try_iterdir};
use crate::os_util::{get_hostname, host_home_dir};
use crate::paths::{EnvPath, HostPath};
use crate::runner::{EnvFilesSummary, EnvironmentExists, Runner, RunnerCommand};
use crate::somehow::{somehow as anyhow, Context, Result};
use crate::EnvironmentName;

pub struct Bubblewrap {
    home_dirs: HostPath,
    work_dirs: HostPath,
    shell: String,
    seccomp: PathOrDisabled,
}

struct Dirs {
    host_home: HostPath,
    host_work: HostPath,
}

impl Bubblewrap {
    pub fn new(
        home_dirs: HostPath,
        work_dirs: HostPath,
        shell: String,
        seccomp: PathOrDisabled,
    ) -> Self {
        Self {
            home_dirs,
            work_dirs,
            shell,
            seccomp,
        }
    }

    fn dirs(&self, name: &EnvironmentName) -> Dirs {
        let encoded = FilenameEncoder::new().push(name.as_str()).encode();
        Dirs {
            host_home: self.home_dirs.join(&encoded),
            host_work: self.work_dirs.join(&encoded),
        }
    }

    fn run_in_sandbox(
        &self,
        name: &EnvironmentName,
        command: &RunnerCommand,
        seed_pipe: Option<std::process::ChildStdout>,
    ) -> Result<()> {
        let Dirs {
            host_home,
            host_work,
        } = self.dirs(name);

        let seccomp_file: Option<std::fs::File> = match &self.seccomp {
            PathOrDisabled::DangerouslyDisabled => None,
            PathOrDisabled::Path(path) => Some(
                std::fs::File::open(path)
                    .with_context(|| format!("failed to open seccomp filter: {path:?}"))?,
            ),
        };

        let mut bwrap = Command::new("bwrap");

        // The sandbox's $HOME is bound to the same absolute path as the
        // host user's own $HOME, not a synthetic path: bwrap does not
        // expand environment variables in its arguments, and plenty of
        // tools assume their home directory is at the path it actually is
        // on the (real) host.
        let env_home = EnvPath::try_from(host_home_dir().as_host_raw().to_owned())?;

        bwrap.env_clear();
        bwrap.env(
            "PATH",
            match env_home.as_env_raw().to_str() {
                Some(home) => format!("{home}/bin:/bin:/sbin"),
                None => String::from("/bin:/sbin"),
            },
        );
        bwrap.env("SANDBOX", name.as_str().to_owned());
        bwrap.env("TMPDIR", env_home.join("tmp").as_env_raw());
        for key in ["DISPLAY", "HOME", "SHELL", "TERM"] {
            if let Ok(value) = std::env::var(key) {
                bwrap.env(key, value);
            }
        }

        bwrap.arg("--die-with-parent");
        bwrap.arg("--unshare-cgroup");
        bwrap.arg("--unshare-ipc");
        bwrap.arg("--unshare-pid");
        bwrap.arg("--unshare-uts");
        bwrap
            .arg("--hostname")
            .arg(format!("{name}.{}", get_hostname()));

        bwrap.args(ro_bind_try("/etc"));
        bwrap.args(["--dev", "/dev"]);
        bwrap.args(["--proc", "/proc"]);
        bwrap.args(["--tmpfs", "/tmp"]);
        bwrap.args(ro_bind_try("/usr"));
        bwrap.args(["--symlink", "/usr/bin", "/bin"]);
        bwrap.args(["--symlink", "/usr/sbin", "/sbin"]);
        bwrap.args(["--symlink", "/usr/lib", "/lib"]);
        bwrap.args(["--symlink", "/usr/lib64", "/lib64"]);
        bwrap.args(ro_bind_try("/opt"));
        bwrap.args(ro_bind_try("/var/lib/apt/lists"));
        bwrap.args(ro_bind_try("/var/lib/dpkg"));

        bwrap
            .arg("--bind")
            .arg(host_home.as_host_raw())
            .arg(env_home.as_env_raw());
        bwrap
            .arg("--bind")
            .arg(host_work.as_host_raw())
            .arg(env_home.join(name.as_str()).as_env_raw());
        for rel in [".dev-init", "bin", "opt", "tmp"] {
            bwrap.arg("--dir").arg(env_home.join(rel).as_env_raw());
        }

        let init_script_host;
        if let RunnerCommand::Init { script, .. } = command {
            init_script_host = script.clone();
            bwrap
                .arg("--ro-bind")
                .arg(init_script_host.as_host_raw())
                .arg("/dev/shm/init.sh");
        }

        if let Some(pipe) = &seed_pipe {
            let fd = get_fd_for_child(pipe)
                .context("failed to set up seed archive file descriptor to be inherited by bwrap")?;
            bwrap.arg("--file").arg(fd).arg("/dev/shm/seed.tar");
        }

        if let Some(file) = &seccomp_file {
            let fd = get_fd_for_child(file)
                .context("failed to set up seccomp file descriptor to be inherited by bwrap")?;
            bwrap.arg("--seccomp").arg(fd);
        }

        bwrap
            .arg("--chdir")
            .arg(env_home.join(name.as_str()).as_env_raw());
        bwrap.arg("--");
        bwrap.arg(&self.shell);
        bwrap.arg("-l");

        match command {
            RunnerCommand::Interactive => {}
            RunnerCommand::Init { .. } => {
                bwrap.arg("-c").arg("/dev/shm/init.sh");
            }
            RunnerCommand::Exec(words) => {
                bwrap.arg("-c").arg(
                    shlex::try_join(words.iter().map(String::as_str))
                        .context("failed to join exec command for shell -c")?,
                );
            }
        }

        let mut child = bwrap.scoped_spawn()?;
        // bwrap has its own (CLOEXEC-cleared) copy of the seed pipe's fd by
        // now; drop ours so the archive producer sees EOF if the sandbox
        // exits early instead of blocking on a write forever.
        drop(seed_pipe);
        let status = child.wait()?;

        if status.success() {
            Ok(())
        } else {
            Err(anyhow!("bwrap exited with {status}"))
        }
    }

    fn run_command(&self, name: &EnvironmentName, command: &RunnerCommand) -> Result<()> {
        match command {
            RunnerCommand::Init {
                packages: _,
                seeds,
                extra_seed,
                ..
            } if !seeds.is_empty() || extra_seed.is_some() => {
                let (producer, stdout) = ArchiveProducer::spawn(seeds, extra_seed.as_ref())?;
                let result = self.run_in_sandbox(name, command, Some(stdout));
                producer.finish();
                result
            }
            _ => self.run_in_sandbox(name, command, None),
        }
    }
}

fn ro_bind_try(path: &str) -> [&str; 3] {
    ["--ro-bind-try", path, path]
}

fn get_fd_for_child<F>(file: &F) -> io::Result<String>
where
    F: rustix::fd::AsFd + AsRawFd,
{
    let mut flags = rustix::fs::fcntl_getfd(file)?;
    flags.remove(rustix::fs::FdFlags::CLOEXEC);
    rustix::fs::fcntl_setfd(file, flags)?;
    Ok(file.as_raw_fd().to_string())
}

fn dir_summary_or_empty(path: &HostPath, exists: bool) -> Result<DirSummary> {
    if exists {
        du::summarize(path)
    } else {
        Ok(DirSummary::empty())
    }
}

impl Runner for Bubblewrap {
    fn list(&self) -> Result<Vec<EnvironmentName>> {
        let mut names = BTreeSet::new();
        for encoded in try_iterdir(&self.home_dirs)? {
            let decoded = FilenameEncoder::decode(&encoded)
                .with_context(|| format!("invalid environment directory name: {encoded:?}"))?;
            names.insert(EnvironmentName::new(&decoded)?);
        }
        for encoded in try_iterdir(&self.work_dirs)? {
            let decoded = FilenameEncoder::decode(&encoded)
                .with_context(|| format!("invalid environment directory name: {encoded:?}"))?;
            names.insert(EnvironmentName::new(&decoded)?);
        }
        Ok(names.into_iter().collect())
    }

    fn create(&self, name: &EnvironmentName, command: &RunnerCommand) -> Result<()> {
        let Dirs {
            host_home,
            host_work,
        } = self.dirs(name);
        std::fs::create_dir_all(host_home.as_host_raw())
            .with_context(|| format!("failed to create home directory: {host_home}"))?;
        std::fs::create_dir_all(host_work.as_host_raw())
            .with_context(|| format!("failed to create work directory: {host_work}"))?;
        self.run_command(name, command)
    }

    fn exists(&self, name: &EnvironmentName) -> Result<EnvironmentExists> {
        let Dirs {
            host_home,
            host_work,
        } = self.dirs(name);
        let has_home = try_exists(&host_home)?;
        let has_work = try_exists(&host_work)?;
        Ok(if has_home && has_work {
            EnvironmentExists::FullyExists
        } else if has_home || has_work {
            EnvironmentExists::PartiallyExists
        } else {
            EnvironmentExists::NoEnvironment
        })
    }

    fn files_summary(&self, name: &EnvironmentName) -> Result<EnvFilesSummary> {
        let Dirs {
            host_home,
            host_work,
        } = self.dirs(name);
        let home_exists = try_exists(&host_home)?;
        let work_exists = try_exists(&host_work)?;
        Ok(EnvFilesSummary {
            home_dir_path: home_exists.then(|| host_home.clone()),
            home_dir: dir_summary_or_empty(&host_home, home_exists)?,
            work_dir_path: work_exists.then(|| host_work.clone()),
            work_dir: dir_summary_or_empty(&host_work, work_exists)?,
        })
    }

    fn reset(&self, name: &EnvironmentName, command: &RunnerCommand) -> Result<()> {
        let Dirs {
            host_home,
            host_work,
        } = self.dirs(name);
        if try_exists(&host_home)? {
            rmtree(&host_home)?;
        }
        std::fs::create_dir_all(host_home.as_host_raw())
            .with_context(|| format!("failed to recreate home directory: {host_home}"))?;
        std::fs::create_dir_all(host_work.as_host_raw())
            .with_context(|| format!("failed to ensure work directory: {host_work}"))?;
        self.run_command(name, command)
    }

    fn wipe_home(&self, name: &EnvironmentName) -> Result<()> {
        let Dirs { host_home, .. } = self.dirs(name);
        if try_exists(&host_home)? {
            rmtree(&host_home)?;
        }
        Ok(())
    }

    fn purge(&self, name: &EnvironmentName) -> Result<()> {
        let Dirs {
            host_home,
            host_work,
        } = self.dirs(name);
        if try_exists(&host_home)? {
            rmtree(&host_home)?;
        }
        if try_exists(&host_work)? {
            rmtree(&host_work)?;
        }
        Ok(())
    }

    fn run(&self, name: &EnvironmentName, command: &RunnerCommand) -> Result<()> {
        self.run_command(name, command)
    }
}
