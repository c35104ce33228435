use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::scrabble::error::ConfigError;
use crate::scrabble::rack::RACK_CAPACITY;
use crate::scrabble::search::SearchConfig;

pub fn load_json<T: DeserializeOwned, TPath: AsRef<Path>>(path: TPath) -> Result<T, ConfigError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Word list, one word per line. Only the first comma separated field
    /// of a line is read.
    pub path: PathBuf,
    pub min_word_len: usize,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("tagalog_dict.csv"),
            min_word_len: 1,
        }
    }
}

/// Settings for one game. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub human_name: String,
    pub agent_name: String,
    pub rack_capacity: usize,
    /// Consecutive passes that end the game
    pub max_passes: usize,
    /// Seed for the bag shuffle. Random when absent.
    pub seed: Option<u64>,
    /// Premium square layout as a 15x15 JSON array of codes. The built-in
    /// layout is used when absent.
    pub layout: Option<PathBuf>,
    pub word_multipliers: bool,
    pub search: SearchConfig,
    pub dictionary: DictionaryConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            human_name: "Player".to_string(),
            agent_name: "AI".to_string(),
            rack_capacity: RACK_CAPACITY,
            max_passes: 6,
            seed: None,
            layout: None,
            word_multipliers: false,
            search: SearchConfig::default(),
            dictionary: DictionaryConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config: Self = load_json(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rack_capacity == 0 || self.rack_capacity > RACK_CAPACITY {
            return Err(ConfigError::RackCapacity {
                capacity: self.rack_capacity,
                max: RACK_CAPACITY,
            });
        }
        Ok(())
    }
}
