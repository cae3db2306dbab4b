use std::{
    fs::File,
    io::BufReader,
    path::{
        Path,
        PathBuf,
    },
    str::FromStr,
};

use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    debug,
    info,
};
use vibrato::Dictionary;

use crate::{
    core::Book2AnkiError,
    persistence::get_app_data_dir,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DictType {
    #[default]
    Unidic,
    Ipadic,
}

impl DictType {
    pub fn folder_name(&self) -> &str {
        match self {
            DictType::Unidic => "bccwj-suw+unidic-cwj-3_1_1",
            DictType::Ipadic => "ipadic-mecab-2_7_0",
        }
    }

    pub fn base_form_index(&self) -> usize {
        match self {
            DictType::Unidic => 10, // orth_base
            DictType::Ipadic => 6,
        }
    }

    /// Feature columns holding the reading of the base form, most preferred first.
    pub fn base_reading_indices(&self) -> &'static [usize] {
        match self {
            // kana_base keeps long vowels as kana, pron_base writes them as ー
            DictType::Unidic => &[21, 11],
            // IPADIC only has the reading of the surface
            DictType::Ipadic => &[7],
        }
    }

    /// Whether the reading columns describe the surface rather than the base form.
    pub fn reading_follows_surface(&self) -> bool {
        matches!(self, DictType::Ipadic)
    }

    /// Where the analyzer dictionary lives when no path is configured.
    pub fn default_path(&self) -> PathBuf {
        get_app_data_dir().join("dictionaries").join(self.folder_name()).join("system.dic")
    }
}

impl FromStr for DictType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unidic" => Ok(DictType::Unidic),
            "ipadic" => Ok(DictType::Ipadic),
            other => Err(format!("unknown dictionary type '{}', expected unidic or ipadic", other)),
        }
    }
}

/// Reads a compiled vibrato dictionary, decompressing `.zst` files on the fly.
pub fn load_dictionary(path: &Path) -> Result<Dictionary, Book2AnkiError> {
    if !path.is_file() {
        return Err(Book2AnkiError::data(format!(
            "analyzer dictionary not found at {}",
            path.display()
        )));
    }

    let file = File::open(path).map_err(|e| {
        Book2AnkiError::data_with(format!("failed to open {}", path.display()), e)
    })?;
    let reader = BufReader::new(file);

    let is_zstd = path.extension().and_then(|e| e.to_str()) == Some("zst");
    let dict = if is_zstd {
        debug!("Decompressing Zstandard analyzer dictionary {:?}", path);
        let decoder = zstd::Decoder::new(reader).map_err(|e| {
            Book2AnkiError::data_with(format!("failed to decompress {}", path.display()), e)
        })?;
        Dictionary::read(decoder)?
    } else {
        Dictionary::read(reader)?
    };

    info!("Loaded analyzer dictionary from {:?}", path);
    Ok(dict)
}

pub fn init_vibrato(path: &Path) -> Result<vibrato::Tokenizer, Book2AnkiError> {
    let dict = load_dictionary(path)?;
    Ok(vibrato::Tokenizer::new(dict))
}
