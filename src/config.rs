use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Optional config at `<config dir>/taskdeck/config.toml`. Environment
/// variables (loaded through dotenv in main) override the file:
/// `INSTANCE_URL` and `TASKDECK_DATA_DIR`.
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct Config {
    /// When set, collections are fetched from this instance instead of the
    /// local mirror.
    pub instance_url: Option<String>,
    pub data_dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Config {
        let mut config = config_path()
            .and_then(|path| fs::read_to_string(path).ok())
            .and_then(|raw| match toml::from_str::<Config>(&raw) {
                Ok(config) => Some(config),
                Err(err) => {
                    eprintln!("Ignoring invalid config file: {}", err);
                    None
                }
            })
            .unwrap_or_default();

        if let Ok(url) = env::var("INSTANCE_URL") {
            if !url.trim().is_empty() {
                config.instance_url = Some(url);
            }
        }
        if let Ok(dir) = env::var("TASKDECK_DATA_DIR") {
            if !dir.trim().is_empty() {
                config.data_dir = Some(PathBuf::from(dir));
            }
        }

        config
    }

    /// Where the JSON mirror lives; falls back to the platform data dir.
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join("taskdeck")))
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("taskdeck").join("config.toml"))
}
