use std::ffi::OsString;
use std::io;
use std::ops::Deref;
use std::path::PathBuf;

use crate::paths::HostPath;
use crate::somehow::{Context, Result};

/// Removes a directory tree, tolerating read-only files/directories left
/// behind by package managers (notably Go's module cache, see
/// <https://github.com/golang/go/issues/27161>) and symlinks that would
/// otherwise let removal escape the given directory.
pub fn rmtree(path: &HostPath) -> Result<()> {
    let dir = cap_std::fs::Dir::open_ambient_dir(path.as_host_raw(), cap_std::ambient_authority())
        .with_context(|| format!("failed to open directory for removal: {path}"))?;
    match dir.remove_open_dir_all() {
        Ok(()) => return Ok(()),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            // continue below: try to loosen permissions and retry once
        }
        Err(e) => return Err(e).with_context(|| format!("failed to remove directory: {path}")),
    }

    fn rm_contents(dir: &cap_std::fs::Dir) -> io::Result<()> {
        for entry in dir.entries()? {
            let entry = entry?;
            let file_name = entry.file_name();
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                let metadata = entry.metadata()?;
                let mut permissions = metadata.permissions();
                if permissions.readonly() {
                    permissions.set_readonly(false);
                    // May fail for directories owned by another user; continue anyway.
                    let _ = dir.set_permissions(&file_name, permissions);
                }
                let child_dir = entry.open_dir()?;
                rm_contents(&child_dir)?;
                dir.remove_dir(&file_name)?;
            } else {
                dir.remove_file(&file_name)?;
            }
        }
        Ok(())
    }

    let dir = cap_std::fs::Dir::open_ambient_dir(path.as_host_raw(), cap_std::ambient_authority())
        .with_context(|| format!("failed to reopen directory for removal: {path}"))?;
    let _ = rm_contents(&dir); // best-effort; real error surfaces below
    dir.remove_open_dir_all()
        .with_context(|| format!("failed to remove directory after loosening permissions: {path}"))
}

/// Returns whether a path exists, without following a dangling symlink into
/// an error.
pub fn try_exists(path: &HostPath) -> Result<bool> {
    match std::fs::symlink_metadata(path.as_host_raw()) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("failed to stat path: {path}")),
    }
}

/// Lists the names of entries directly within `path`, sorted. Returns an
/// empty list (rather than an error) if `path` does not exist.
pub fn try_iterdir(path: &HostPath) -> Result<Vec<OsString>> {
    let readdir = std::fs::read_dir(path.as_host_raw());
    if matches!(&readdir, Err(e) if e.kind() == io::ErrorKind::NotFound) {
        return Ok(Vec::new());
    }
    let mut names = readdir
        .with_context(|| format!("failed to list directory: {path}"))?
        .map(|entry| entry.map(|entry| entry.file_name()))
        .collect::<io::Result<Vec<_>>>()
        .with_context(|| format!("failed to list directory: {path}"))?;
    names.sort_unstable();
    Ok(names)
}

/// Like [`try_iterdir`] but only the names of immediate subdirectories,
/// skipping plain files. Used to enumerate package origins and packages
/// within an origin.
pub fn try_iterdir_dirs(path: &HostPath) -> Result<Vec<OsString>> {
    let readdir = std::fs::read_dir(path.as_host_raw());
    if matches!(&readdir, Err(e) if e.kind() == io::ErrorKind::NotFound) {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in readdir.with_context(|| format!("failed to list directory: {path}"))? {
        let entry = entry.with_context(|| format!("failed to list directory: {path}"))?;
        let file_type = entry
            .file_type()
            .with_context(|| format!("failed to stat entry in directory: {path}"))?;
        if file_type.is_dir() {
            names.push(entry.file_name());
        }
    }
    names.sort_unstable();
    Ok(names)
}

/// A file path that is removed when dropped, best-effort.
pub struct MaybeTempFile(pub PathBuf);

impl Deref for MaybeTempFile {
    type Target = PathBuf;
    fn deref(&self) -> &PathBuf {
        &self.0
    }
}

impl Drop for MaybeTempFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    #[test]
    fn try_iterdir_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = HostPath::try_from(dir.path().join("does-not-exist")).unwrap();
        assert_eq!(Vec::<OsString>::new(), try_iterdir(&missing).unwrap());
    }

    #[test]
    fn try_iterdir_dirs_skips_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("a")).unwrap();
        std::fs::create_dir(dir.path().join("b")).unwrap();
        std::fs::write(dir.path().join("c.txt"), b"x").unwrap();
        let host = HostPath::try_from(dir.path().to_path_buf()).unwrap();
        let names = try_iterdir_dirs(&host).unwrap();
        assert_eq!(vec![OsString::from("a"), OsString::from("b")], names);
    }

    #[test]
    fn try_exists_false_for_missing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = HostPath::try_from(dir.path().join("nope")).unwrap();
        assert!(!try_exists(&missing).unwrap());
    }

    #[test]
    fn rmtree_removes_readonly_subdir() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("ro");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("f"), b"x").unwrap();
        let mut perms = std::fs::metadata(&sub).unwrap().permissions();
        perms.set_mode(0o500);
        std::fs::set_permissions(&sub, perms).unwrap();

        let host = HostPath::try_from(dir.path().to_path_buf()).unwrap();
        rmtree(&host).unwrap();
        assert!(!dir.path().exists());
    }
}
