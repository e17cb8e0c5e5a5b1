//! Spawns the external `tar` binary (the "archive producer") to stream seed
//! content into a sandbox as a single archive on a pipe.
//!
//! This never reimplements the archive format: `tar`'s own traversal and
//! encoding is trusted. The producer is given one `--directory <dir> <files..>`
//! group per seed source (so each package's outputs land at sandbox-relative
//! paths matching its `provides` entries) plus, optionally, one more group
//! for an "extra seed" — a single directory renamed to a fixed top-level
//! name via `--transform` (used by the Package Builder to hand a package's
//! own source tree to its `update.sh`).

use std::process::Stdio;

use crate::command_ext::{Command, ScopedChild};
use crate::paths::HostPath;
use crate::runner::SeedSource;
use crate::somehow::{Context, Result};

pub struct ArchiveProducer {
    child: ScopedChild,
}

impl ArchiveProducer {
    /// Spawns `tar`, returning the producer (whose stdout the caller should
    /// pipe into the sandbox) and leaving the child running until dropped or
    /// waited on.
    pub fn spawn(
        seeds: &[SeedSource],
        extra_seed: Option<&(HostPath, String)>,
    ) -> Result<(Self, std::process::ChildStdout)> {
        let mut command = Command::new("tar");
        command.args(["--create", "--file", "-"]);

        for seed in seeds {
            if seed.files.is_empty() {
                continue;
            }
            command.arg("--directory").arg(seed.dir.as_host_raw());
            command.args(&seed.files);
        }

        if let Some((dir, rename_to)) = extra_seed {
            command.arg("--transform").arg(format!("s,^\\.,{rename_to},"));
            command.arg("--directory").arg(dir.as_host_raw());
            command.arg(".");
        }

        command.stdout(Stdio::piped());
        let mut child = command
            .scoped_spawn()
            .context("failed to spawn seed archive producer (`tar`)")?;
        let stdout = child
            .stdout()
            .take()
            .expect("tar stdout was requested as piped");
        Ok((Self { child }, stdout))
    }

    /// Waits for the producer to exit. A nonzero exit is only a warning: by
    /// the time we check, the sandbox has already consumed (or given up on)
    /// the stream.
    pub fn finish(mut self) {
        match self.child.wait() {
            Ok(status) if status.success() => {}
            Ok(status) => println!("WARNING: seed archive producer (`tar`) exited with {status}"),
            Err(e) => println!("WARNING: failed to wait on seed archive producer: {e:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_with_no_seeds_produces_empty_archive() {
        let (producer, mut stdout) = ArchiveProducer::spawn(&[], None).unwrap();
        let mut buf = Vec::new();
        std::io::Read::read_to_end(&mut stdout, &mut buf).unwrap();
        drop(stdout);
        producer.finish();
        // An empty/near-empty tar stream (two 512-byte zero blocks) is still
        // produced even with nothing to archive.
        assert!(buf.len() % 512 == 0);
    }
}
