use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::camera::DEFAULT_SCALE;
use crate::units::DAY_SECONDS;

/// Terminal orbital simulator.
#[derive(Debug, Default, Parser)]
#[command(name = "orbiter", version, about)]
pub(crate) struct Args {
    /// JSON body catalog to load instead of the built-in solar system
    #[arg(long, value_name = "FILE")]
    pub(crate) catalog: Option<PathBuf>,

    /// frame rate cap
    #[arg(long)]
    pub(crate) fps: Option<u32>,

    /// initial zoom, in km per cell
    #[arg(long)]
    pub(crate) scale: Option<i64>,

    /// initial time step, in seconds
    #[arg(long)]
    pub(crate) step: Option<i64>,

    /// start with time advancing automatically
    #[arg(long)]
    pub(crate) auto: bool,

    /// body to focus on at startup
    #[arg(long, value_name = "NAME")]
    pub(crate) focus: Option<String>,

    /// log file (defaults to orbiter.log in the data directory)
    #[arg(long, value_name = "FILE")]
    pub(crate) log: Option<PathBuf>,

    /// do not write settings or keybinds on exit
    #[arg(long)]
    pub(crate) no_save: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) fps_cap: u32,
    pub(crate) scale: i64,
    pub(crate) step: i64,
    pub(crate) auto: bool,
    pub(crate) enable_color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps_cap: 60,
            scale: DEFAULT_SCALE,
            step: DAY_SECONDS,
            auto: false,
            enable_color: true,
        }
    }
}

impl Settings {
    /// Command-line values win over stored ones.
    pub(crate) fn apply_args(&mut self, args: &Args) {
        if let Some(fps) = args.fps {
            self.fps_cap = fps;
        }
        if let Some(scale) = args.scale {
            self.scale = scale.max(1);
        }
        if let Some(step) = args.step {
            self.step = step.max(1);
        }
        if args.auto {
            self.auto = true;
        }
    }

    pub(crate) fn fps(&self) -> u32 {
        self.fps_cap.clamp(10, 240)
    }
}

pub(crate) struct Paths {
    pub(crate) settings_path: PathBuf,
    pub(crate) keybinds_path: PathBuf,
    pub(crate) log_path: PathBuf,
}

pub(crate) fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "orbiter", "Orbiter")
        .context("could not resolve project directories")?;
    let dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir).ok();
    Ok(Paths {
        settings_path: dir.join("settings.json"),
        keybinds_path: dir.join("keybinds.json"),
        log_path: dir.join("orbiter.log"),
    })
}

pub(crate) fn load_settings(path: &Path) -> Settings {
    if let Ok(s) = fs::read_to_string(path) {
        match serde_json::from_str::<Settings>(&s) {
            Ok(v) => return v,
            Err(e) => log::warn!("ignoring unreadable settings {}: {e}", path.display()),
        }
    }
    Settings::default()
}

pub(crate) fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    save_json_atomic(path, s)
}

pub(crate) fn save_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(value)?;
    fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
    atomic_rename(&tmp, path)?;
    log::debug!("saved {}", path.display());
    Ok(())
}

pub(crate) fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    // rename replaces the target in one step on the same filesystem (POSIX);
    // Windows refuses to rename over an existing file
    if cfg!(windows) && to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to).with_context(|| format!("renaming {} to {}", from.display(), to.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("orbiter-test-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn settings_round_trip_through_disk() {
        let dir = scratch("settings");
        let path = dir.join("settings.json");
        let s = Settings {
            fps_cap: 30,
            auto: true,
            ..Settings::default()
        };
        save_settings_atomic(&path, &s).unwrap();
        assert_eq!(load_settings(&path), s);
        assert!(!path.with_extension("json.tmp").exists());
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn corrupt_or_partial_settings_fall_back() {
        let dir = scratch("corrupt");
        let path = dir.join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_settings(&path), Settings::default());

        fs::write(&path, r#"{ "fps_cap": 24 }"#).unwrap();
        let s = load_settings(&path);
        assert_eq!(s.fps_cap, 24);
        assert_eq!(s.scale, DEFAULT_SCALE);
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn args_override_settings() {
        let args = Args::parse_from(["orbiter", "--fps", "500", "--scale", "0", "--auto", "--focus", "Mars"]);
        let mut s = Settings::default();
        s.apply_args(&args);
        assert_eq!(s.fps(), 240);
        assert_eq!(s.scale, 1);
        assert!(s.auto);
        assert_eq!(args.focus.as_deref(), Some("Mars"));
        assert!(!args.no_save);
    }
}
