use std::{
    cell::OnceCell,
    collections::BTreeMap,
    fs::{
        self,
        File,
    },
    io::{
        BufReader,
        Read,
    },
    path::{
        Path,
        PathBuf,
    },
    time::Instant,
};

use regex::Regex;
use tracing::{
    debug,
    info,
    warn,
};
use zip::ZipArchive;

use super::{
    frequency_dict::FrequencyTable,
    DictionaryIndex,
    TermMetaBankV3,
};
use crate::{
    core::Book2AnkiError,
    persistence::get_app_data_dir,
};

pub fn get_frequency_dict_dir() -> PathBuf {
    get_app_data_dir().join("dictionaries").join("frequency")
}

/// Loads the frequency table on first use and hands out the cached copy afterwards.
#[derive(Debug)]
pub struct FrequencyDictionaryLoader {
    path: PathBuf,
    table: OnceCell<FrequencyTable>,
}

impl FrequencyDictionaryLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FrequencyDictionaryLoader { path: path.into(), table: OnceCell::new() }
    }

    pub fn load(&self) -> Result<&FrequencyTable, Book2AnkiError> {
        if let Some(table) = self.table.get() {
            return Ok(table);
        }

        let start = Instant::now();
        let table = read_frequency_dictionary(&self.path)?;
        info!(
            "Loaded frequency dictionary '{}' ({} terms) in {:.2}s",
            table.title,
            table.len(),
            start.elapsed().as_secs_f32()
        );
        Ok(self.table.get_or_init(|| table))
    }
}

/// Reads a Yomitan zip, an extracted Yomitan folder, a folder of zips or a flattened JSON map.
pub fn read_frequency_dictionary(path: &Path) -> Result<FrequencyTable, Book2AnkiError> {
    let table = if path.is_dir() {
        if path.join("index.json").is_file() {
            read_extracted_dictionary(path)?
        } else {
            let zip_path = first_zip_in(path)?;
            read_zip_dictionary(&zip_path)?
        }
    } else if path.is_file() {
        match path.extension().and_then(|ext| ext.to_str()).map(|ext| ext.to_lowercase()) {
            Some(ext) if ext == "zip" => read_zip_dictionary(path)?,
            Some(ext) if ext == "json" => read_flat_dictionary(path)?,
            _ => {
                return Err(Book2AnkiError::data(format!(
                    "unrecognized frequency dictionary format: {}",
                    path.display()
                )))
            }
        }
    } else {
        return Err(Book2AnkiError::data(format!(
            "frequency dictionary not found at {}",
            path.display()
        )));
    };

    if table.is_empty() {
        return Err(Book2AnkiError::data(format!(
            "frequency dictionary {} contains no frequency entries",
            path.display()
        )));
    }
    Ok(table)
}

fn first_zip_in(dir: &Path) -> Result<PathBuf, Book2AnkiError> {
    let mut zips: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| Book2AnkiError::data_with(format!("failed to read {}", dir.display()), e))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("zip")
        })
        .collect();
    zips.sort();

    zips.into_iter().next().ok_or_else(|| {
        Book2AnkiError::data(format!("no frequency dictionary (.zip) found in {}", dir.display()))
    })
}

fn parse_index_json(data: &str, origin: &str) -> Result<DictionaryIndex, Book2AnkiError> {
    let index: DictionaryIndex = serde_json::from_str(data)
        .map_err(|e| Book2AnkiError::data_with(format!("invalid index.json in {}", origin), e))?;

    let version = index.format.or(index.version).ok_or_else(|| {
        Book2AnkiError::data(format!(
            "index.json in {} must have either 'format' or 'version'",
            origin
        ))
    })?;

    if version != 3 {
        return Err(Book2AnkiError::data(format!(
            "unsupported dictionary format version {} in {}",
            version, origin
        )));
    }
    Ok(index)
}

fn parse_term_meta_bank(data: &str, origin: &str) -> Vec<TermMetaBankV3> {
    let rows = match serde_json::from_str::<Vec<serde_json::Value>>(data) {
        Ok(rows) => rows,
        Err(e) => {
            warn!("Skipping unparseable term meta bank {}: {}", origin, e);
            return Vec::new();
        }
    };

    rows.into_iter()
        .filter_map(|raw_entry| serde_json::from_value::<TermMetaBankV3>(raw_entry).ok())
        .filter(|meta| meta.data_type == "freq")
        .collect()
}

/// Bank file number, if `name` is a `term_meta_bank_N.json` file.
fn bank_number(re: &Regex, name: &str) -> Option<u32> {
    let file_name = Path::new(name).file_name()?.to_str()?;
    re.captures(file_name)?.get(1)?.as_str().parse().ok()
}

fn bank_regex() -> Result<Regex, Book2AnkiError> {
    Regex::new(r"^term_meta_bank_(\d+)\.json$")
        .map_err(|e| Book2AnkiError::data_with("invalid term bank pattern", e))
}

fn read_zip_dictionary(zip_path: &Path) -> Result<FrequencyTable, Book2AnkiError> {
    let origin = zip_path.display().to_string();
    let file = File::open(zip_path)
        .map_err(|e| Book2AnkiError::data_with(format!("failed to open {}", origin), e))?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;

    let names: Vec<String> = archive.file_names().map(|name| name.to_string()).collect();
    let index_name = names
        .iter()
        .filter(|name| Path::new(name.as_str()).file_name().and_then(|n| n.to_str()) == Some("index.json"))
        .min_by_key(|name| name.len())
        .ok_or_else(|| Book2AnkiError::data(format!("{} has no index.json", origin)))?
        .clone();

    let index_data = read_zip_entry(&mut archive, &index_name, &origin)?;
    let index = parse_index_json(&index_data, &origin)?;

    let re = bank_regex()?;
    let mut banks: Vec<(u32, String)> =
        names.iter().filter_map(|name| bank_number(&re, name).map(|n| (n, name.clone()))).collect();
    banks.sort();

    let mut term_meta_list = Vec::new();
    for (_, name) in &banks {
        let data = read_zip_entry(&mut archive, name, &origin)?;
        term_meta_list.extend(parse_term_meta_bank(&data, name));
    }
    debug!("Parsed {} entries from {} term meta bank files", term_meta_list.len(), banks.len());

    Ok(FrequencyTable::new(index.title, index.revision, term_meta_list))
}

fn read_zip_entry<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
    origin: &str,
) -> Result<String, Book2AnkiError> {
    let mut entry = archive.by_name(name)?;
    let mut data = String::new();
    entry.read_to_string(&mut data).map_err(|e| {
        Book2AnkiError::data_with(format!("failed to read {} from {}", name, origin), e)
    })?;
    Ok(data)
}

fn read_extracted_dictionary(folder_path: &Path) -> Result<FrequencyTable, Book2AnkiError> {
    let origin = folder_path.display().to_string();
    let index_data = fs::read_to_string(folder_path.join("index.json"))
        .map_err(|e| Book2AnkiError::data_with(format!("failed to read index.json in {}", origin), e))?;
    let index = parse_index_json(&index_data, &origin)?;

    let re = bank_regex()?;
    let mut banks: Vec<(u32, PathBuf)> = fs::read_dir(folder_path)
        .map_err(|e| Book2AnkiError::data_with(format!("failed to read {}", origin), e))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter_map(|path| {
            let number = bank_number(&re, path.to_str()?)?;
            Some((number, path))
        })
        .collect();
    banks.sort();

    let mut term_meta_list = Vec::new();
    for (_, path) in &banks {
        let data = fs::read_to_string(path).map_err(|e| {
            Book2AnkiError::data_with(format!("failed to read {}", path.display()), e)
        })?;
        term_meta_list.extend(parse_term_meta_bank(&data, &path.display().to_string()));
    }

    Ok(FrequencyTable::new(index.title, index.revision, term_meta_list))
}

fn read_flat_dictionary(path: &Path) -> Result<FrequencyTable, Book2AnkiError> {
    let data = fs::read_to_string(path)
        .map_err(|e| Book2AnkiError::data_with(format!("failed to read {}", path.display()), e))?;
    let flat: BTreeMap<String, BTreeMap<String, u32>> = serde_json::from_str(&data)
        .map_err(|e| Book2AnkiError::data_with(format!("invalid frequency map {}", path.display()), e))?;

    let title = path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
    Ok(FrequencyTable::from_flat(title, String::new(), flat))
}
