use crate::cli::Args;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) enable_color: bool,
    pub(crate) start_paused: bool,
    pub(crate) only_inner: bool,
    pub(crate) show_help: bool,
    pub(crate) log_level: String,
    /// Absent means "now".
    pub(crate) start_time: Option<DateTime<Utc>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable_color: true,
            start_paused: false,
            only_inner: false,
            show_help: true,
            log_level: "info".to_string(),
            start_time: None,
        }
    }
}

impl Settings {
    pub(crate) fn apply_cli_overrides(&mut self, args: &Args) {
        if args.paused {
            self.start_paused = true;
        }
        if args.inner {
            self.only_inner = true;
        }
        if args.mono {
            self.enable_color = false;
        }
        if let Some(start) = args.start {
            self.start_time = Some(start);
        }
        if let Some(ref level) = args.log_level {
            self.log_level = level.clone();
        }
    }
}

pub(crate) struct Paths {
    pub(crate) settings_path: PathBuf,
    pub(crate) log_path: PathBuf,
}

pub(crate) fn project_paths(config_dir: Option<&Path>) -> Result<Paths> {
    let dir = match config_dir {
        Some(dir) => dir.to_path_buf(),
        None => ProjectDirs::from("com", "heliorama", "Heliorama")
            .context("could not resolve project directories")?
            .data_local_dir()
            .to_path_buf(),
    };
    fs::create_dir_all(&dir).ok();
    Ok(Paths {
        settings_path: dir.join("settings.json"),
        log_path: dir.join("heliorama.log"),
    })
}

/// Reads settings, writing defaults when the file does not exist yet.
/// A corrupt file falls back to defaults and is left alone.
pub(crate) fn load_or_create(path: &Path) -> Result<Settings> {
    match fs::read_to_string(path) {
        Ok(s) => match serde_json::from_str::<Settings>(&s) {
            Ok(v) => {
                info!(path = %path.display(), "loaded settings");
                Ok(v)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable settings, using defaults");
                Ok(Settings::default())
            }
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let s = Settings::default();
            save_settings_atomic(path, &s)
                .with_context(|| format!("writing default settings to {}", path.display()))?;
            info!(path = %path.display(), "created default settings");
            Ok(s)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable settings, using defaults");
            Ok(Settings::default())
        }
    }
}

pub(crate) fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(s)?;
    fs::write(&tmp, data)?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    // rename() does not replace an existing file on Windows.
    if cfg!(windows) && to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let s = load_or_create(&path).unwrap();
        assert_eq!(s, Settings::default());
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn saved_settings_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let s = Settings {
            enable_color: false,
            only_inner: true,
            start_time: Some(Utc.with_ymd_and_hms(2031, 5, 6, 7, 8, 9).unwrap()),
            ..Settings::default()
        };
        save_settings_atomic(&path, &s).unwrap();
        save_settings_atomic(&path, &s).unwrap();
        assert_eq!(load_or_create(&path).unwrap(), s);
    }

    #[test]
    fn corrupt_file_falls_back_without_overwriting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(load_or_create(&path).unwrap(), Settings::default());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{not json");
    }

    #[test]
    fn non_utf8_file_falls_back_without_overwriting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let bytes = [0xff, 0xfe, b'{'];
        fs::write(&path, bytes).unwrap();
        assert_eq!(load_or_create(&path).unwrap(), Settings::default());
        assert_eq!(fs::read(&path).unwrap(), bytes);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "show_help": false }"#).unwrap();
        let s = load_or_create(&path).unwrap();
        assert!(!s.show_help);
        assert!(s.enable_color);
        assert_eq!(s.log_level, "info");
    }

    #[test]
    fn cli_overrides_win() {
        let mut s = Settings::default();
        let args = Args {
            paused: true,
            mono: true,
            log_level: Some("trace".into()),
            ..Args::default()
        };
        s.apply_cli_overrides(&args);
        assert!(s.start_paused);
        assert!(!s.enable_color);
        assert!(!s.only_inner);
        assert_eq!(s.log_level, "trace");
    }

    #[test]
    fn explicit_config_dir_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let paths = project_paths(Some(dir.path())).unwrap();
        assert_eq!(paths.settings_path, dir.path().join("settings.json"));
        assert_eq!(paths.log_path, dir.path().join("heliorama.log"));
    }
}
