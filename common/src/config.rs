//! Command-line and file configuration shared by every lab binary

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::de::DeserializeOwned;

/// Flags every lab accepts
#[derive(Parser, Debug, Clone)]
#[command(about = "Interactive science lab", long_about = None)]
pub struct LabArgs {
    /// Initial window width
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Initial window height
    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// glTF asset to load instead of the built-in scene
    #[arg(long)]
    pub asset: Option<PathBuf>,

    /// JSON file overriding lab tuning values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Hide the lesson panel
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,
}

impl LabArgs {
    /// Load the lab's tuning from `--config`, or its defaults
    pub fn tuning<T: DeserializeOwned + Default>(&self) -> Result<T> {
        load_or_default(self.config.as_deref())
    }
}

impl Default for LabArgs {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            asset: None,
            config: None,
            no_ui: false,
        }
    }
}

/// Read a JSON config file. Missing fields take their defaults when the
/// type is annotated with `#[serde(default)]`.
pub fn load_or_default<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    let Some(path) = path else {
        return Ok(T::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read config file: {:?}", path))?;
    let value = parse_config(&text).with_context(|| format!("Failed to parse config file: {:?}", path))?;
    log::info!("Loaded config from {:?}", path);
    Ok(value)
}

pub fn parse_config<T: DeserializeOwned>(text: &str) -> Result<T> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(default)]
    struct Tuning {
        sensitivity: f32,
        steps: u32,
    }

    impl Default for Tuning {
        fn default() -> Self {
            Self {
                sensitivity: 120.0,
                steps: 7,
            }
        }
    }

    #[test]
    fn test_no_path_gives_defaults() {
        let tuning: Tuning = load_or_default(None).unwrap();
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let tuning: Tuning = parse_config(r#"{ "sensitivity": 80.0 }"#).unwrap();
        assert_eq!(tuning.sensitivity, 80.0);
        assert_eq!(tuning.steps, 7);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result: Result<Tuning> = load_or_default(Some(Path::new("nowhere/lab.json")));
        assert!(result.is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = LabArgs::parse_from(["lab", "--width", "800", "--no-ui", "--asset", "candle.glb"]);
        assert_eq!(args.width, 800);
        assert_eq!(args.height, 720);
        assert!(args.no_ui);
        assert_eq!(args.asset, Some(PathBuf::from("candle.glb")));
    }
}
