//! Config file discovery.
//!
//! Given an application name, candidate files are built from a fixed list of
//! directories and file names, checked in order, first existing file wins:
//!
//! | Directory | Present when |
//! |-----------|--------------|
//! | `.` (working directory) | always |
//! | `$HOME`, `~/.config`, `~/.config/{app}` | a home directory is known |
//! | `$XDG_CONFIG_HOME`, `$XDG_CONFIG_HOME/{app}` | the variable is set |
//! | each `$XDG_CONFIG_DIRS` entry `d`, then `d/{app}` | the variable is set |
//! | `/etc/{app}`, `/etc` | always |
//!
//! Each directory is tried with `{app}.cfg`, `{app}.config` and `{app}.conf`.
//!
//! The process environment is captured once in a [`DiscoveryEnv`]; tests build
//! one by hand instead of touching real environment variables.

use std::path::{Path, PathBuf};

use crate::error::DoconfError;

/// File name suffixes tried in every candidate directory, in order.
pub const FILE_SUFFIXES: [&str; 3] = ["cfg", "config", "conf"];

/// The parts of the process environment that discovery depends on.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiscoveryEnv {
    pub cwd: PathBuf,
    pub home: Option<PathBuf>,
    pub xdg_config_home: Option<PathBuf>,
    pub xdg_config_dirs: Vec<PathBuf>,
    pub etc: PathBuf,
}

impl DiscoveryEnv {
    /// Capture `$HOME`, `$XDG_CONFIG_HOME` and `$XDG_CONFIG_DIRS`.
    ///
    /// The home directory comes from `directories` (which honours `$HOME`).
    pub fn from_process() -> Self {
        let home = directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
        let xdg_config_home = std::env::var_os("XDG_CONFIG_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let xdg_config_dirs = std::env::var("XDG_CONFIG_DIRS")
            .map(|v| split_dirs(&v))
            .unwrap_or_default();
        Self {
            cwd: PathBuf::from("."),
            home,
            xdg_config_home,
            xdg_config_dirs,
            etc: PathBuf::from("/etc"),
        }
    }
}

fn split_dirs(value: &str) -> Vec<PathBuf> {
    value
        .split(':')
        .filter(|d| !d.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Candidate directories, in search order.
pub fn candidate_dirs(app_name: &str, env: &DiscoveryEnv) -> Vec<PathBuf> {
    let mut dirs = vec![env.cwd.clone()];
    if let Some(home) = &env.home {
        dirs.push(home.clone());
        dirs.push(home.join(".config"));
        dirs.push(home.join(".config").join(app_name));
    }
    if let Some(xdg) = &env.xdg_config_home {
        dirs.push(xdg.clone());
        dirs.push(xdg.join(app_name));
    }
    for dir in &env.xdg_config_dirs {
        dirs.push(dir.clone());
        dirs.push(dir.join(app_name));
    }
    dirs.push(env.etc.join(app_name));
    dirs.push(env.etc.clone());
    dirs
}

/// Every candidate file path, in search order.
pub fn possible_paths(app_name: &str, env: &DiscoveryEnv) -> Vec<PathBuf> {
    candidate_dirs(app_name, env)
        .into_iter()
        .flat_map(|dir| {
            FILE_SUFFIXES
                .iter()
                .map(move |suffix| dir.join(format!("{app_name}.{suffix}")))
        })
        .collect()
}

/// The first candidate that exists as a file.
pub fn discover(app_name: &str, env: &DiscoveryEnv) -> Result<PathBuf, DoconfError> {
    let candidates = possible_paths(app_name, env);
    match candidates.iter().find(|p| p.is_file()) {
        Some(found) => {
            tracing::debug!(path = %found.display(), "discovered config file");
            Ok(found.clone())
        }
        None => {
            tracing::debug!(app_name, checked = candidates.len(), "no config file discovered");
            Err(DoconfError::SourceNotDiscovered {
                app_name: app_name.to_string(),
                candidates,
            })
        }
    }
}

/// Use `explicit` if given (it must exist), otherwise discover.
pub fn resolve_source_path(
    explicit: Option<&Path>,
    app_name: &str,
    env: &DiscoveryEnv,
) -> Result<PathBuf, DoconfError> {
    match explicit {
        Some(path) if path.is_file() => Ok(path.to_path_buf()),
        Some(path) => Err(DoconfError::SourceMissing {
            path: path.to_path_buf(),
        }),
        None => discover(app_name, env),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn isolated(cwd: &Path) -> DiscoveryEnv {
        DiscoveryEnv {
            cwd: cwd.to_path_buf(),
            etc: cwd.join("etc"),
            ..DiscoveryEnv::default()
        }
    }

    fn bare() -> DiscoveryEnv {
        DiscoveryEnv {
            cwd: ".".into(),
            etc: "/etc".into(),
            ..DiscoveryEnv::default()
        }
    }

    #[test]
    fn bare_env_searches_cwd_then_etc() {
        let dirs = candidate_dirs("myapp", &bare());
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("."),
                PathBuf::from("/etc/myapp"),
                PathBuf::from("/etc"),
            ]
        );
    }

    #[test]
    fn full_env_directory_order() {
        let env = DiscoveryEnv {
            cwd: ".".into(),
            home: Some("/home/u".into()),
            xdg_config_home: Some("/xdg".into()),
            xdg_config_dirs: vec!["/a".into(), "/b".into()],
            etc: "/etc".into(),
        };
        let dirs = candidate_dirs("myapp", &env);
        let expected: Vec<PathBuf> = [
            ".",
            "/home/u",
            "/home/u/.config",
            "/home/u/.config/myapp",
            "/xdg",
            "/xdg/myapp",
            "/a",
            "/a/myapp",
            "/b",
            "/b/myapp",
            "/etc/myapp",
            "/etc",
        ]
        .iter()
        .map(PathBuf::from)
        .collect();
        assert_eq!(dirs, expected);
    }

    #[test]
    fn every_directory_gets_every_suffix() {
        let paths = possible_paths("myapp", &bare());
        assert_eq!(paths.len(), 9);
        assert_eq!(paths[0], PathBuf::from("./myapp.cfg"));
        assert_eq!(paths[1], PathBuf::from("./myapp.config"));
        assert_eq!(paths[2], PathBuf::from("./myapp.conf"));
        assert_eq!(paths[8], PathBuf::from("/etc/myapp.conf"));
    }

    #[test]
    fn split_dirs_skips_empty_entries() {
        assert_eq!(
            split_dirs("/a::/b:"),
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );
    }

    #[test]
    fn discover_prefers_earlier_directory() {
        let cwd = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        fs::write(cwd.path().join("myapp.conf"), "[a]\n").unwrap();
        fs::write(home.path().join("myapp.cfg"), "[a]\n").unwrap();

        let env = DiscoveryEnv {
            home: Some(home.path().to_path_buf()),
            ..isolated(cwd.path())
        };
        assert_eq!(discover("myapp", &env).unwrap(), cwd.path().join("myapp.conf"));
    }

    #[test]
    fn discover_prefers_earlier_suffix() {
        let cwd = TempDir::new().unwrap();
        fs::write(cwd.path().join("myapp.conf"), "").unwrap();
        fs::write(cwd.path().join("myapp.config"), "").unwrap();
        let found = discover("myapp", &isolated(cwd.path())).unwrap();
        assert_eq!(found, cwd.path().join("myapp.config"));
    }

    #[test]
    fn discover_in_app_subdirectory_of_xdg_home() {
        let cwd = TempDir::new().unwrap();
        let xdg = TempDir::new().unwrap();
        fs::create_dir(xdg.path().join("myapp")).unwrap();
        fs::write(xdg.path().join("myapp").join("myapp.cfg"), "").unwrap();
        let env = DiscoveryEnv {
            xdg_config_home: Some(xdg.path().to_path_buf()),
            ..isolated(cwd.path())
        };
        assert_eq!(
            discover("myapp", &env).unwrap(),
            xdg.path().join("myapp").join("myapp.cfg")
        );
    }

    #[test]
    fn directories_named_like_config_files_are_skipped() {
        let cwd = TempDir::new().unwrap();
        fs::create_dir(cwd.path().join("myapp.cfg")).unwrap();
        fs::write(cwd.path().join("myapp.conf"), "").unwrap();
        assert_eq!(
            discover("myapp", &isolated(cwd.path())).unwrap(),
            cwd.path().join("myapp.conf")
        );
    }

    #[test]
    fn nothing_found_lists_candidates() {
        let cwd = TempDir::new().unwrap();
        let err = discover("myapp", &isolated(cwd.path())).unwrap_err();
        match err {
            DoconfError::SourceNotDiscovered {
                app_name,
                candidates,
            } => {
                assert_eq!(app_name, "myapp");
                assert_eq!(candidates.len(), 9);
            }
            other => panic!("Expected SourceNotDiscovered, got: {other:?}"),
        }
    }

    #[test]
    fn explicit_path_must_exist() {
        let cwd = TempDir::new().unwrap();
        let missing = cwd.path().join("missing.cfg");
        let err = resolve_source_path(Some(&missing), "myapp", &isolated(cwd.path())).unwrap_err();
        assert!(matches!(err, DoconfError::SourceMissing { path } if path == missing));
    }

    #[test]
    fn explicit_path_skips_discovery() {
        let cwd = TempDir::new().unwrap();
        let explicit = cwd.path().join("custom.ini");
        fs::write(&explicit, "").unwrap();
        fs::write(cwd.path().join("myapp.cfg"), "").unwrap();
        let path = resolve_source_path(Some(&explicit), "myapp", &isolated(cwd.path())).unwrap();
        assert_eq!(path, explicit);
    }
}
