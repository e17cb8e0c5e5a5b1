//! Wraps the external `du` binary, used both to summarize environment
//! directories for `list`/`package list` output and to find a package's
//! maximum source mtime for the Freshness Oracle.
//!
//! This is deliberately a thin wrapper: `du`'s own traversal and size
//! accounting is trusted rather than reimplemented.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::command_ext::Command;
use crate::paths::HostPath;
use crate::somehow::{somehow as anyhow, Context, Result};

/// Aggregate size and most recent modification time for a directory tree.
#[derive(Debug, Clone, Copy)]
pub struct DirSummary {
    pub total_size: u64,
    pub last_modified: SystemTime,
}

impl DirSummary {
    pub fn empty() -> Self {
        Self {
            total_size: 0,
            last_modified: UNIX_EPOCH,
        }
    }
}

/// Runs `du -cs --block-size=1 --time --time-style=+%s <path>` and parses
/// its grand-total line.
///
/// `du` emits (at least) one line per argument plus a "total" line when
/// given multiple paths; with a single path and `-s`, the one data line
/// doubles as the total. The line has the form
/// `<bytes>\t<unix-mtime>\t<path-or-"total">`.
pub fn summarize(path: &HostPath) -> Result<DirSummary> {
    let output = Command::new("du")
        .args(["-cs", "--block-size=1", "--time", "--time-style=+%s"])
        .arg(path.as_host_raw())
        .output()
        .with_context(|| format!("failed to run `du` on {path}"))?;

    if !output.status.success() {
        return Err(anyhow!(
            "`du` on {path} exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr),
        ));
    }

    let stdout = String::from_utf8(output.stdout)
        .with_context(|| format!("`du` on {path} produced non-UTF-8 output"))?;
    parse_du_output(&stdout)
        .with_context(|| format!("failed to parse `du` output for {path}: {stdout:?}"))
}

fn parse_du_output(stdout: &str) -> Result<DirSummary> {
    let last_line = stdout
        .lines()
        .last()
        .ok_or_else(|| anyhow!("`du` produced no output"))?;
    let mut fields = last_line.split('\t');
    let size: u64 = fields
        .next()
        .ok_or_else(|| anyhow!("missing size field"))?
        .parse()
        .with_context(|| "invalid size field".to_string())?;
    let mtime: u64 = fields
        .next()
        .ok_or_else(|| anyhow!("missing mtime field"))?
        .parse()
        .with_context(|| "invalid mtime field".to_string())?;
    Ok(DirSummary {
        total_size: size,
        last_modified: UNIX_EPOCH + Duration::from_secs(mtime),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_two_field_line() {
        let summary = parse_du_output("1048576\t1700000000\ttotal\n").unwrap();
        assert_eq!(1_048_576, summary.total_size);
        assert_eq!(UNIX_EPOCH + Duration::from_secs(1_700_000_000), summary.last_modified);
    }

    #[test]
    fn parse_uses_last_line() {
        let summary = parse_du_output("512\t1600000000\t/a/b\n1024\t1700000000\ttotal\n").unwrap();
        assert_eq!(1024, summary.total_size);
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(parse_du_output("").is_err());
    }

    #[test]
    fn summarize_real_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("f"), b"hello").unwrap();
        let host = HostPath::try_from(dir.path().to_path_buf()).unwrap();
        let summary = summarize(&host).unwrap();
        assert!(summary.total_size > 0);
    }
}
