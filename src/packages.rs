//! Package Registry, Freshness Oracle, Package Builder, and Dependency
//! Scheduler.
//!
//! A package is a named, declarative unit of environment content: a source
//! directory with optional `depends.txt`, `provides.txt`, and `update.sh`.
//! Packages with an `update.sh` are *buildable*; the rest are *static* and
//! are never passed to the Builder.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::du;
use crate::fs_util::try_iterdir_dirs;
use crate::paths::HostPath;
use crate::runner::{EnvironmentExists, Runner, RunnerCommand, SeedSource};
use crate::somehow::{somehow as anyhow, Context, Result};
use crate::EnvironmentName;

/// The synthetic package every other package implicitly depends on.
pub const AUTO: &str = "auto";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackageName(String);

impl PackageName {
    pub fn new(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(anyhow!("package name must not be empty"));
        }
        if s == "." || s == ".." {
            return Err(anyhow!("invalid package name: {s:?}"));
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        {
            return Err(anyhow!(
                "package name {s:?} must contain only ASCII letters, digits, '-', '_', or '.'"
            ));
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn auto() -> Self {
        Self(AUTO.to_owned())
    }

    /// The reserved environment name for this package's built home.
    pub fn env_name(&self) -> EnvironmentName {
        EnvironmentName::new(&format!("package-{}", self.0))
            .expect("package-<name> is always a valid environment name")
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single registry entry.
#[derive(Debug, Clone)]
pub struct Package {
    pub name: PackageName,
    pub origin: String,
    pub source_dir: HostPath,
    pub depends: BTreeSet<PackageName>,
    pub provides: Vec<String>,
    pub update_script: Option<HostPath>,
}

impl Package {
    pub fn is_buildable(&self) -> bool {
        self.update_script.is_some()
    }
}

/// All known packages, loaded once at startup from the user's package
/// collections (highest precedence, first loaded wins) and the built-in
/// collection shipped with the program.
pub struct PackageRegistry {
    packages: BTreeMap<PackageName, Package>,
}

impl PackageRegistry {
    /// Loads packages from `user_packages/<origin>/<name>/` directories
    /// (each immediate subdirectory of `user_packages` is a distinct
    /// origin), then from `builtin_packages/<name>/` with origin
    /// `"built-in"`. A name already claimed by an earlier origin is skipped.
    pub fn load(user_packages: &HostPath, builtin_packages: &HostPath) -> Result<Self> {
        let mut packages = BTreeMap::new();

        for origin in try_iterdir_dirs(user_packages)? {
            let origin = origin.to_string_lossy().into_owned();
            let origin_dir = user_packages.join(&origin);
            for name in try_iterdir_dirs(&origin_dir)? {
                let name = name.to_string_lossy().into_owned();
                let dir = origin_dir.join(&name);
                add_package(&mut packages, &name, &origin, &dir)
                    .with_context(|| format!("failed to load package {name:?} from {dir}"))?;
            }
        }

        for name in try_iterdir_dirs(builtin_packages)? {
            let name = name.to_string_lossy().into_owned();
            let dir = builtin_packages.join(&name);
            add_package(&mut packages, &name, "built-in", &dir)
                .with_context(|| format!("failed to load built-in package {name:?} from {dir}"))?;
        }

        elide_auto(&mut packages)?;

        Ok(Self { packages })
    }

    pub fn get(&self, name: &PackageName) -> Option<&Package> {
        self.packages.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &PackageName> {
        self.packages.keys()
    }

    pub fn contains(&self, name: &PackageName) -> bool {
        self.packages.contains_key(name)
    }

    /// The transitive closure of `start` under `depends`, including `start`
    /// itself. Cycle-safe: any package already visited is not revisited.
    pub fn transitive_depends(
        &self,
        start: &BTreeSet<PackageName>,
    ) -> Result<BTreeSet<PackageName>> {
        let mut visited = BTreeSet::new();
        let mut stack: Vec<PackageName> = start.iter().cloned().collect();
        while let Some(name) = stack.pop() {
            if visited.contains(&name) {
                continue;
            }
            let package = self
                .get(&name)
                .ok_or_else(|| anyhow!("unknown package: {name}"))?;
            visited.insert(name);
            for dep in &package.depends {
                if !visited.contains(dep) {
                    stack.push(dep.clone());
                }
            }
        }
        Ok(visited)
    }
}

fn add_package(
    packages: &mut BTreeMap<PackageName, Package>,
    name: &str,
    origin: &str,
    dir: &HostPath,
) -> Result<()> {
    let name = PackageName::new(name)?;
    if packages.contains_key(&name) {
        // First-loaded origin wins.
        return Ok(());
    }

    let mut depends: BTreeSet<PackageName> = match read_lines(&dir.join("depends.txt"))? {
        Some(lines) => lines
            .into_iter()
            .map(|s| PackageName::new(&s))
            .collect::<Result<_>>()?,
        None => BTreeSet::new(),
    };
    depends.insert(PackageName::auto());

    let provides = match read_lines(&dir.join("provides.txt"))? {
        Some(lines) => {
            for line in &lines {
                validate_provides_path(line)
                    .with_context(|| format!("invalid entry in provides.txt: {line:?}"))?;
            }
            lines
        }
        None => Vec::new(),
    };

    let update_script = dir.join("update.sh");
    let update_script = match std::fs::metadata(update_script.as_host_raw()) {
        Ok(_) => Some(update_script),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(e).with_context(|| format!("failed to stat {update_script}")),
    };

    packages.insert(
        name.clone(),
        Package {
            name,
            origin: origin.to_owned(),
            source_dir: dir.clone(),
            depends,
            provides,
            update_script,
        },
    );
    Ok(())
}

/// Removes the synthetic `auto` dependency from every package transitively
/// reachable from `auto`, so that `auto`'s own baseline packages don't end up
/// depending on themselves through `auto`.
fn elide_auto(packages: &mut BTreeMap<PackageName, Package>) -> Result<()> {
    let auto = PackageName::auto();
    if !packages.contains_key(&auto) {
        return Ok(());
    }

    let mut closure = BTreeSet::new();
    let mut stack = vec![auto.clone()];
    while let Some(name) = stack.pop() {
        if closure.contains(&name) {
            continue;
        }
        let depends = match packages.get(&name) {
            Some(p) => p.depends.clone(),
            None => return Err(anyhow!("unknown package referenced via 'auto': {name}")),
        };
        closure.insert(name);
        for dep in depends {
            if !closure.contains(&dep) {
                stack.push(dep);
            }
        }
    }

    for name in &closure {
        if let Some(package) = packages.get_mut(name) {
            package.depends.remove(&auto);
        }
    }
    Ok(())
}

fn read_lines(path: &HostPath) -> Result<Option<Vec<String>>> {
    match std::fs::read_to_string(path.as_host_raw()) {
        Ok(contents) => Ok(Some(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_owned)
                .collect(),
        )),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("failed to read {path}")),
    }
}

/// Rejects `provides.txt` entries that aren't safe, sandbox-relative paths:
/// no leading `/`, no leading `~/`, and no `..` path component.
fn validate_provides_path(s: &str) -> Result<()> {
    if s.starts_with('/') {
        return Err(anyhow!("provides path must not be absolute: {s:?}"));
    }
    if s.starts_with("~/") || s == "~" {
        return Err(anyhow!("provides path must not be home-relative: {s:?}"));
    }
    if std::path::Path::new(s)
        .components()
        .any(|c| matches!(c, std::path::Component::ParentDir))
    {
        return Err(anyhow!("provides path must not contain '..': {s:?}"));
    }
    Ok(())
}

/// Freshness Oracle: the mtime of a built package's `.UPDATED` sentinel, or
/// `UNIX_EPOCH` if the package has never been built.
pub fn last_built(home_dirs: &HostPath, name: &PackageName) -> Result<SystemTime> {
    let sentinel = home_dirs.join(format!("package-{name}")).join(".UPDATED");
    match std::fs::metadata(sentinel.as_host_raw()) {
        Ok(metadata) => metadata
            .modified()
            .with_context(|| format!("failed to read mtime of {sentinel}")),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(UNIX_EPOCH),
        Err(e) => Err(e).with_context(|| format!("failed to stat {sentinel}")),
    }
}

/// Whether package `name` must be rebuilt before use.
///
/// The periodic-refresh window is anchored to the package's own
/// `last_built` time, not to its source mtime: a package rebuilt recently is
/// not rebuilt again just because its source predates the refresh window.
pub fn is_stale(
    registry: &PackageRegistry,
    home_dirs: &HostPath,
    name: &PackageName,
    auto_update: Duration,
    now: SystemTime,
) -> Result<bool> {
    let package = registry
        .get(name)
        .ok_or_else(|| anyhow!("unknown package: {name}"))?;
    if !package.is_buildable() {
        return Ok(false);
    }

    let built = last_built(home_dirs, name)?;
    if built == UNIX_EPOCH {
        return Ok(true);
    }

    let source_mtime = du::summarize(&package.source_dir)
        .with_context(|| format!("failed to compute source mtime for package {name}"))?
        .last_modified;
    if source_mtime >= built {
        return Ok(true);
    }

    if now.duration_since(built).unwrap_or_default() >= auto_update {
        return Ok(true);
    }

    for dep in registry.transitive_depends(&package.depends)? {
        let dep_built = last_built(home_dirs, &dep)?;
        if dep_built >= built {
            return Ok(true);
        }
    }

    Ok(false)
}

/// Package Builder: (re)builds a single package's home directory by running
/// the shared init script with a seed composed of the package's resolved
/// dependencies plus its own source tree.
pub fn build(
    registry: &PackageRegistry,
    runner: &dyn Runner,
    name: &PackageName,
    dev_init_script: &HostPath,
    home_dirs: &HostPath,
) -> Result<()> {
    let package = registry
        .get(name)
        .ok_or_else(|| anyhow!("unknown package: {name}"))?;
    let env_name = name.env_name();

    let closure = registry.transitive_depends(&package.depends)?;
    let seeds = packages_to_seeds(registry, home_dirs, &closure);
    let extra_seed = Some((package.source_dir.clone(), env_name.as_str().to_owned()));
    let command = RunnerCommand::Init {
        packages: &package.depends,
        seeds,
        extra_seed,
        script: dev_init_script.clone(),
    };

    match runner.exists(&env_name)? {
        EnvironmentExists::NoEnvironment => runner.create(&env_name, &command),
        _ => runner.reset(&env_name, &command),
    }
}

/// Computes the seed sources for a set of (already-transitively-resolved)
/// packages: one entry per package with non-empty `provides`, in sorted
/// order.
pub fn packages_to_seeds(
    registry: &PackageRegistry,
    home_dirs: &HostPath,
    packages: &BTreeSet<PackageName>,
) -> Vec<SeedSource> {
    packages
        .iter()
        .filter_map(|name| {
            let package = registry.get(name)?;
            if package.provides.is_empty() {
                return None;
            }
            Some(SeedSource {
                dir: home_dirs.join(format!("package-{name}")),
                files: package.provides.clone(),
            })
        })
        .collect()
}

/// Dependency Scheduler: builds every stale, buildable package in `requested`
/// and its transitive dependencies, in topological order.
pub fn update_packages(
    registry: &PackageRegistry,
    runner: &dyn Runner,
    requested: &BTreeSet<PackageName>,
    dev_init_script: &HostPath,
    home_dirs: &HostPath,
    auto_update: Duration,
    now: SystemTime,
) -> Result<()> {
    let closure = registry.transitive_depends(requested)?;
    let mut todo: Vec<PackageName> = closure.into_iter().collect();
    todo.sort();

    let mut done: BTreeSet<PackageName> = BTreeSet::new();
    while !todo.is_empty() {
        let mut later = Vec::new();
        let mut made_progress = false;
        for name in todo {
            let package = registry
                .get(&name)
                .ok_or_else(|| anyhow!("unknown package: {name}"))?;
            if package.depends.iter().all(|d| done.contains(d)) {
                if package.is_buildable()
                    && is_stale(registry, home_dirs, &name, auto_update, now)?
                {
                    build(registry, runner, &name, dev_init_script, home_dirs)
                        .with_context(|| format!("failed to build package {name}"))?;
                }
                done.insert(name);
                made_progress = true;
            } else {
                later.push(name);
            }
        }
        if !made_progress {
            let names = later
                .iter()
                .map(PackageName::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(anyhow!("unsatisfiable package dependencies among: {names}"));
        }
        todo = later;
    }
    Ok(())
}

/// Lists the names of all loaded packages, for `package list` and
/// `--packages` validation.
pub fn known_package_names(registry: &PackageRegistry) -> BTreeSet<PackageName> {
    registry.names().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn name(s: &str) -> PackageName {
        PackageName::new(s).unwrap()
    }

    fn touch_built(home_dirs: &std::path::Path, name: &str, mtime: SystemTime) {
        let dir = home_dirs.join(format!("package-{name}"));
        std::fs::create_dir_all(&dir).unwrap();
        let sentinel = dir.join(".UPDATED");
        std::fs::write(&sentinel, "").unwrap();
        std::fs::File::options()
            .write(true)
            .open(&sentinel)
            .unwrap()
            .set_modified(mtime)
            .unwrap();
    }

    fn write_package(dir: &std::path::Path, depends: &[&str], provides: &[&str], buildable: bool) {
        std::fs::create_dir_all(dir).unwrap();
        if !depends.is_empty() {
            std::fs::write(dir.join("depends.txt"), depends.join("\n")).unwrap();
        }
        if !provides.is_empty() {
            std::fs::write(dir.join("provides.txt"), provides.join("\n")).unwrap();
        }
        if buildable {
            std::fs::write(dir.join("update.sh"), "#!/bin/sh\n").unwrap();
        }
    }

    #[test]
    fn package_name_rejects_bad_chars() {
        assert!(PackageName::new("").is_err());
        assert!(PackageName::new("..").is_err());
        assert!(PackageName::new("a/b").is_err());
        assert!(PackageName::new("a b").is_err());
        assert!(PackageName::new("valid-name_1.2").is_ok());
    }

    #[test]
    fn validate_provides_path_rejects_unsafe() {
        assert!(validate_provides_path("/x").is_err());
        assert!(validate_provides_path("~/x").is_err());
        assert!(validate_provides_path("a/../b").is_err());
        assert!(validate_provides_path("bin/tool").is_ok());
    }

    #[test]
    fn registry_precedence_user_over_builtin() {
        let root = tempfile::tempdir().unwrap();
        let user_root = root.path().join("user");
        let builtin_root = root.path().join("builtin");
        write_package(&user_root.join("origin1").join("rust"), &[], &["bin"], true);
        write_package(&builtin_root.join("rust"), &[], &[], false);

        let user = HostPath::try_from(user_root).unwrap();
        let builtin = HostPath::try_from(builtin_root).unwrap();
        let registry = PackageRegistry::load(&user, &builtin).unwrap();

        let rust = registry.get(&name("rust")).unwrap();
        assert_eq!("origin1", rust.origin);
        assert!(rust.is_buildable());
    }

    #[test]
    fn transitive_closure_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let builtin_root = root.path().join("builtin");
        write_package(&builtin_root.join("a"), &["b", "c"], &[], false);
        write_package(&builtin_root.join("b"), &["c"], &[], false);
        write_package(&builtin_root.join("c"), &[], &[], false);
        write_package(&builtin_root.join("auto"), &[], &[], false);

        let user = HostPath::try_from(root.path().join("user")).unwrap();
        let builtin = HostPath::try_from(builtin_root).unwrap();
        let registry = PackageRegistry::load(&user, &builtin).unwrap();

        let mut start = BTreeSet::new();
        start.insert(name("a"));
        let once = registry.transitive_depends(&start).unwrap();
        let twice = registry.transitive_depends(&once).unwrap();
        assert_eq!(once, twice);
        assert!(once.contains(&name("b")));
        assert!(once.contains(&name("c")));
    }

    #[test]
    fn auto_elided_from_its_own_closure() {
        let root = tempfile::tempdir().unwrap();
        let builtin_root = root.path().join("builtin");
        write_package(&builtin_root.join("auto"), &["base"], &[], false);
        write_package(&builtin_root.join("base"), &[], &[], false);

        let user = HostPath::try_from(root.path().join("user")).unwrap();
        let builtin = HostPath::try_from(builtin_root).unwrap();
        let registry = PackageRegistry::load(&user, &builtin).unwrap();

        assert!(!registry
            .get(&name("auto"))
            .unwrap()
            .depends
            .contains(&name("auto")));
        assert!(!registry
            .get(&name("base"))
            .unwrap()
            .depends
            .contains(&name("auto")));
    }

    #[test]
    fn unknown_dependency_is_unsatisfiable() {
        let root = tempfile::tempdir().unwrap();
        let builtin_root = root.path().join("builtin");
        write_package(&builtin_root.join("a"), &["missing"], &[], false);
        write_package(&builtin_root.join("auto"), &[], &[], false);

        let user = HostPath::try_from(root.path().join("user")).unwrap();
        let builtin = HostPath::try_from(builtin_root).unwrap();
        let registry = PackageRegistry::load(&user, &builtin).unwrap();

        let mut start = BTreeSet::new();
        start.insert(name("a"));
        assert!(registry.transitive_depends(&start).is_err());
    }

    #[test]
    fn static_package_never_stale() {
        let root = tempfile::tempdir().unwrap();
        let builtin_root = root.path().join("builtin");
        write_package(&builtin_root.join("static-pkg"), &[], &[], false);
        write_package(&builtin_root.join("auto"), &[], &[], false);

        let user = HostPath::try_from(root.path().join("user")).unwrap();
        let builtin = HostPath::try_from(builtin_root).unwrap();
        let registry = PackageRegistry::load(&user, &builtin).unwrap();
        let home_dirs = HostPath::try_from(root.path().join("home")).unwrap();

        assert!(!is_stale(
            &registry,
            &home_dirs,
            &name("static-pkg"),
            Duration::from_secs(3600),
            SystemTime::now()
        )
        .unwrap());
    }

    #[test]
    fn stale_via_transitive_dependency() {
        // p (buildable) -> d (static) -> q (buildable). d is never built
        // (stays at the epoch), so a scan of p's direct deps alone would
        // never see q rebuilt after p; the transitive closure must.
        let root = tempfile::tempdir().unwrap();
        let builtin_root = root.path().join("builtin");
        write_package(&builtin_root.join("p"), &["d"], &[], true);
        write_package(&builtin_root.join("d"), &["q"], &[], false);
        write_package(&builtin_root.join("q"), &[], &[], true);
        write_package(&builtin_root.join("auto"), &[], &[], false);

        let user = HostPath::try_from(root.path().join("user")).unwrap();
        let builtin = HostPath::try_from(builtin_root).unwrap();
        let registry = PackageRegistry::load(&user, &builtin).unwrap();
        let home_dirs_path = root.path().join("home");
        let home_dirs = HostPath::try_from(home_dirs_path.clone()).unwrap();

        // p's build sentinel must postdate its own source tree (otherwise
        // the "source newer than build" rule alone would explain staleness);
        // q's build sentinel postdates p's, so only the transitive scan
        // through d catches it.
        let p_built = SystemTime::now();
        let q_built = p_built + Duration::from_secs(1);
        touch_built(&home_dirs_path, "p", p_built);
        touch_built(&home_dirs_path, "q", q_built);

        assert!(is_stale(
            &registry,
            &home_dirs,
            &name("p"),
            Duration::from_secs(12 * 3600),
            p_built,
        )
        .unwrap());
    }

    #[test]
    fn build_seeds_include_transitive_provides() {
        // p -> d (provides nothing) -> q (provides "bin/tool"); seeding p's
        // build must include q's outputs even though q isn't a direct
        // dependency of p.
        let root = tempfile::tempdir().unwrap();
        let builtin_root = root.path().join("builtin");
        write_package(&builtin_root.join("p"), &["d"], &[], true);
        write_package(&builtin_root.join("d"), &["q"], &[], false);
        write_package(&builtin_root.join("q"), &[], &["bin/tool"], true);
        write_package(&builtin_root.join("auto"), &[], &[], false);

        let user = HostPath::try_from(root.path().join("user")).unwrap();
        let builtin = HostPath::try_from(builtin_root).unwrap();
        let registry = PackageRegistry::load(&user, &builtin).unwrap();
        let home_dirs = HostPath::try_from(root.path().join("home")).unwrap();

        let p = registry.get(&name("p")).unwrap();
        let closure = registry.transitive_depends(&p.depends).unwrap();
        let seeds = packages_to_seeds(&registry, &home_dirs, &closure);

        assert!(seeds
            .iter()
            .any(|seed| seed.files == vec![String::from("bin/tool")]));
    }
}
