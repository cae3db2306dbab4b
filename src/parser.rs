use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use tracing::{
    debug,
    warn,
};

use crate::core::{
    Book2AnkiError,
    InputType,
    Sentence,
    SourceFile,
};

const SENTENCE_TERMINATORS: [char; 5] = ['。', '！', '？', '!', '?'];

fn input_type_of(path: &Path) -> Option<InputType> {
    match path.extension().and_then(|ext| ext.to_str()).map(|ext| ext.to_lowercase()).as_deref() {
        Some("txt") => Some(InputType::Text),
        Some("srt") => Some(InputType::Srt),
        _ => None,
    }
}

/// Expands the command line inputs into source files, reading directories non-recursively in name order.
pub fn collect_source_files(inputs: &[PathBuf]) -> Result<Vec<SourceFile>, Book2AnkiError> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut entries: Vec<PathBuf> = fs::read_dir(input)
                .map_err(|e| Book2AnkiError::input(input, e.to_string()))?
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.is_file() && input_type_of(path).is_some())
                .collect();
            entries.sort();

            if entries.is_empty() {
                return Err(Book2AnkiError::input(input, "directory contains no .txt or .srt files"));
            }
            files.extend(entries);
        } else if input.is_file() {
            if input_type_of(input).is_none() {
                return Err(Book2AnkiError::input(
                    input,
                    "unsupported file type, expected .txt or .srt",
                ));
            }
            files.push(input.clone());
        } else {
            return Err(Book2AnkiError::input(input, "no such file or directory"));
        }
    }

    Ok(files
        .into_iter()
        .enumerate()
        .filter_map(|(id, path)| {
            let input_type = input_type_of(&path)?;
            Some(SourceFile { id: id as u32, path, input_type })
        })
        .collect())
}

pub fn read(source_file: &SourceFile) -> Result<Vec<Sentence>, Book2AnkiError> {
    let content = fs::read_to_string(&source_file.path)
        .map_err(|e| Book2AnkiError::input(&source_file.path, e.to_string()))?;

    let sentences = match source_file.input_type {
        InputType::Text => read_txt(&content, source_file.id),
        InputType::Srt => read_srt(&content, source_file.id),
    };
    debug!("Parsed {} sentences from {:?}", sentences.len(), source_file.path);
    Ok(sentences)
}

/// Splits text after sentence terminators and at line breaks, keeping the terminators.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.lines()
        .flat_map(|line| line.split_inclusive(SENTENCE_TERMINATORS))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn read_txt(content: &str, source_id: u32) -> Vec<Sentence> {
    split_sentences(content.trim_start_matches('\u{feff}'))
        .into_iter()
        .enumerate()
        .map(|(id, s)| Sentence {
            id: id as u32,
            source_id,
            text: s.to_string(),
            timestamp: None, // Text files don’t have timestamps
        })
        .collect()
}

pub fn read_srt(content: &str, source_id: u32) -> Vec<Sentence> {
    let normalized = content.trim_start_matches('\u{feff}').replace("\r\n", "\n");
    let mut sentences = Vec::new();

    for (block_idx, block) in normalized.split("\n\n").map(str::trim).filter(|b| !b.is_empty()).enumerate() {
        let lines: Vec<&str> = block.lines().collect();
        let Some(timestamp_idx) = lines.iter().position(|line| line.contains("-->")) else {
            warn!("Skipping subtitle block {} without a timestamp", block_idx + 1);
            continue;
        };

        let timestamp = lines[timestamp_idx].trim().to_string();
        for line in &lines[timestamp_idx + 1..] {
            for text in split_sentences(line) {
                sentences.push(Sentence {
                    id: sentences.len() as u32,
                    source_id,
                    text: text.to_string(),
                    timestamp: Some(timestamp.clone()),
                });
            }
        }
    }

    sentences
}
