//! Ambient configuration (not part of the core interpreter/optimizer).
//!
//! Loaded from an optional `stepc.toml` in the current directory, then
//! overridden by CLI flags.

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory input filenames are resolved relative to.
    pub input_dir: PathBuf,
    /// Where `optimize` writes its combined result.
    pub output_path: PathBuf,
    /// Safety bound on `next`'s line count, to keep a runaway loop from
    /// hanging an interactive session.
    pub max_steps: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("inputs"),
            output_path: PathBuf::from("output.c"),
            max_steps: 1_000_000,
        }
    }
}

impl Config {
    /// Loads `stepc.toml` from `dir` if present, falling back to defaults.
    pub fn load(dir: &Path) -> Self {
        let path = dir.join("stepc.toml");
        match std::fs::read_to_string(&path) {
            Ok(text) => toml::from_str(&text).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config file");
                Config::default()
            }),
            Err(_) => Config::default(),
        }
    }

    pub fn resolve_input(&self, filename: &str) -> PathBuf {
        let candidate = Path::new(filename);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.input_dir.join(candidate)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_resolves_relative_to_inputs() {
        let cfg = Config::default();
        assert_eq!(cfg.resolve_input("foo.c"), PathBuf::from("inputs/foo.c"));
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let cfg = Config::load(Path::new("/nonexistent-stepc-dir"));
        assert_eq!(cfg.max_steps, 1_000_000);
    }
}
