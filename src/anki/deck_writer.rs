use std::{
    io::Write,
    path::Path,
    str::FromStr,
};

use serde::{
    Deserialize,
    Serialize,
};
use tempfile::NamedTempFile;
use tracing::info;

use crate::core::{
    Book2AnkiError,
    Card,
    Deck,
};

pub const COLUMNS: [&str; 5] = ["Word", "Readings", "Context", "Frequency", "Part of speech"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeckFormat {
    /// Anki's plain text import format (tab separated with `#` headers).
    Anki,
    Json,
}

impl DeckFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DeckFormat::Json,
            _ => DeckFormat::Anki,
        }
    }
}

impl FromStr for DeckFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "anki" | "tsv" | "txt" => Ok(DeckFormat::Anki),
            "json" => Ok(DeckFormat::Json),
            other => Err(format!("unknown deck format '{}', expected anki or json", other)),
        }
    }
}

/// Escapes the context and wraps the first occurrence of the surface form in `<strong>`.
pub fn highlight(context: &str, surface: &str) -> String {
    let escaped_context = html_escape::encode_text(context);
    if surface.is_empty() {
        return escaped_context.into_owned();
    }

    let escaped_surface = html_escape::encode_text(surface);
    match escaped_context.find(escaped_surface.as_ref()) {
        Some(idx) => {
            let end = idx + escaped_surface.len();
            format!(
                "{}<strong>{}</strong>{}",
                &escaped_context[..idx],
                &escaped_context[idx..end],
                &escaped_context[end..]
            )
        }
        None => escaped_context.into_owned(),
    }
}

fn card_row(card: &Card) -> [String; 5] {
    [
        html_escape::encode_text(&card.base_form).into_owned(),
        html_escape::encode_text(&card.readings.join("、")).into_owned(),
        highlight(&card.context, &card.surface_form),
        card.frequency.to_string(),
        card.part_of_speech.to_string(),
    ]
}

pub fn render_anki(deck: &Deck) -> Result<Vec<u8>, Book2AnkiError> {
    let mut out: Vec<u8> = Vec::new();
    // Newlines would end the header line early
    let deck_name = deck.name.replace(['\n', '\r'], " ");
    let header = format!(
        "#separator:tab\n#html:true\n#deck:{}\n#columns:{}\n",
        deck_name,
        COLUMNS.join("\t")
    );
    out.extend_from_slice(header.as_bytes());

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);
    for card in &deck.cards {
        writer.write_record(card_row(card))?;
    }
    writer.into_inner().map_err(|e| Book2AnkiError::Serialize(e.to_string()))
}

pub fn render_json(deck: &Deck) -> Result<Vec<u8>, Book2AnkiError> {
    let mut out =
        serde_json::to_vec_pretty(deck).map_err(|e| Book2AnkiError::Serialize(e.to_string()))?;
    out.push(b'\n');
    Ok(out)
}

pub fn render(deck: &Deck, format: DeckFormat) -> Result<Vec<u8>, Book2AnkiError> {
    match format {
        DeckFormat::Anki => render_anki(deck),
        DeckFormat::Json => render_json(deck),
    }
}

/// Writes the deck next to `path` and renames it into place, so a failed write never leaves a partial file.
pub fn write_deck(deck: &Deck, path: &Path, format: DeckFormat) -> Result<(), Book2AnkiError> {
    let bytes = render(deck, format)?;

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(parent).map_err(|e| Book2AnkiError::io(path, e))?;
    temp.write_all(&bytes).map_err(|e| Book2AnkiError::io(path, e))?;
    temp.as_file().sync_all().map_err(|e| Book2AnkiError::io(path, e))?;
    temp.persist(path).map_err(|e| Book2AnkiError::io(path, e.error))?;

    info!("Wrote {} cards to {}", deck.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::{
        core::Frequency,
        segmentation::pos::PartOfSpeech,
    };

    fn deck() -> Deck {
        let mut deck = Deck::new("Reading");
        deck.push(Card {
            base_form: "歩く".to_string(),
            readings: vec!["あるく".to_string()],
            frequency: Frequency::Ranked(700),
            part_of_speech: PartOfSpeech::Verb,
            surface_form: "歩い".to_string(),
            context: "犬が歩いた。".to_string(),
            sentence_count: 3,
        });
        deck.push(Card {
            base_form: "猫".to_string(),
            readings: Vec::new(),
            frequency: Frequency::Unranked,
            part_of_speech: PartOfSpeech::Noun,
            surface_form: "猫".to_string(),
            context: "<猫>\t& 犬".to_string(),
            sentence_count: 1,
        });
        deck
    }

    #[test]
    fn test_highlight_first_occurrence() {
        assert_eq!(highlight("猫と猫", "猫"), "<strong>猫</strong>と猫");
        assert_eq!(highlight("a < b", "b"), "a &lt; <strong>b</strong>");
        assert_eq!(highlight("犬", "猫"), "犬");
    }

    #[test]
    fn test_anki_text_layout() {
        let text = String::from_utf8(render_anki(&deck()).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "#separator:tab");
        assert_eq!(lines[1], "#html:true");
        assert_eq!(lines[2], "#deck:Reading");
        assert_eq!(lines[3], "#columns:Word\tReadings\tContext\tFrequency\tPart of speech");
        assert_eq!(lines[4], "歩く\tあるく\t犬が<strong>歩い</strong>た。\t700\tVerb");
        // Tabs inside a field force quoting
        assert_eq!(lines[5], "猫\t\t\"&lt;<strong>猫</strong>&gt;\t&amp; 犬\"\tunranked\tNoun");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn test_json_deck() {
        let bytes = render_json(&deck()).unwrap();
        let parsed: Deck = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed, deck());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DeckFormat::from_path(Path::new("deck.JSON")), DeckFormat::Json);
        assert_eq!(DeckFormat::from_path(Path::new("deck.txt")), DeckFormat::Anki);
        assert_eq!(DeckFormat::from_path(Path::new("deck")), DeckFormat::Anki);
    }

    #[test]
    fn test_write_replaces_existing_deck() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.txt");
        fs::write(&path, "old").unwrap();

        write_deck(&deck(), &path, DeckFormat::Anki).unwrap();
        let written = fs::read(&path).unwrap();
        assert_eq!(written, render_anki(&deck()).unwrap());

        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn test_missing_parent_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("deck.txt");

        let err = write_deck(&deck(), &path, DeckFormat::Anki).unwrap_err();
        assert!(matches!(err, Book2AnkiError::Io { .. }));
        assert!(!path.exists());
        assert!(!dir.path().join("no_such_dir").exists());
    }
}
