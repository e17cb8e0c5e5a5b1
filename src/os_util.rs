use lazy_static::lazy_static;

use crate::paths::HostPath;
use crate::somehow::{somehow as anyhow, Context};

fn get_home_dir() -> HostPath {
    let result = match std::env::var_os("HOME") {
        Some(home) => HostPath::try_from(home),
        None => Err(anyhow!("environment variable $HOME not set")),
    }
    .context("failed to locate home directory on host");
    match result {
        Ok(dir) => dir,
        Err(e) => panic!("{e:?}"),
    }
}

lazy_static! {
    static ref HOME_DIR: HostPath = get_home_dir();
}

/// The current user's home directory on the host, cached for the process
/// lifetime. Panics at first use if `$HOME` is unset or not absolute;
/// this is treated as an unrecoverable environment misconfiguration rather
/// than a per-call error, matching how pervasively this value is needed.
pub fn host_home_dir() -> &'static HostPath {
    &HOME_DIR
}

/// Returns the host's hostname, used to derive each sandbox's hostname
/// (`<env-name>.<host hostname>`).
pub fn get_hostname() -> String {
    let uname = rustix::system::uname();
    uname.nodename().to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_hostname_nonempty() {
        assert!(!get_hostname().is_empty());
    }
}
