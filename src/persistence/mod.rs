use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use serde::{
    Deserialize,
    Serialize,
};
use tracing::debug;

use crate::{
    core::{
        pipeline::CardOrder,
        Book2AnkiError,
    },
    dictionary::token_dictionary::DictType,
    segmentation::pos::PosFilter,
};

const APP_NAME: &str = "book2anki";
const SETTINGS_FILE: &str = "settings.json";

pub fn get_app_data_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        data_dir.join(APP_NAME)
    } else {
        PathBuf::from(".")
    }
}

pub fn get_data_file_path(filename: &str) -> PathBuf {
    get_app_data_dir().join(filename)
}

pub fn default_settings_path() -> PathBuf {
    get_data_file_path(SETTINGS_FILE)
}

/// Values read from the settings file. Command line flags take precedence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub frequency_dict: Option<PathBuf>,
    pub system_dic: Option<PathBuf>,
    pub dict_type: Option<DictType>,
    pub pos_filter: Option<PosFilter>,
    pub min_rank: Option<u32>,
    pub max_rank: Option<u32>,
    pub min_sentences: Option<u32>,
    pub order: Option<CardOrder>,
    pub reverse: Option<bool>,
    pub deck_name: Option<String>,
}

impl Settings {
    /// Missing file means defaults; an unreadable or malformed one is an error.
    pub fn load(path: &Path) -> Result<Self, Book2AnkiError> {
        if !path.exists() {
            debug!("No settings file at {}", path.display());
            return Ok(Settings::default());
        }

        let json = fs::read_to_string(path).map_err(|e| Book2AnkiError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let settings: Settings = serde_json::from_str(&json).map_err(|e| {
            Book2AnkiError::Config { path: path.to_path_buf(), message: e.to_string() }
        })?;

        debug!("Settings loaded from: {}", path.display());
        Ok(settings)
    }
}
