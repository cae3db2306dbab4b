use std::{
    fmt,
    path::PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::segmentation::pos::PartOfSpeech;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputType {
    Text,
    Srt,
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub id: u32,
    pub path: PathBuf,
    pub input_type: InputType,
}

#[derive(Debug, Clone)]
pub struct Sentence {
    pub id: u32,                   // Ordinal within the source file
    pub source_id: u32,            // Reference to a SourceFile
    pub text: String,
    pub timestamp: Option<String>, // Only for SRT files
}

/// One analyzer token after feature mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub surface: String,
    pub base_form: String,
    pub reading: String,
    pub part_of_speech: PartOfSpeech,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    Ranked(u32),
    Unranked,
}

impl Frequency {
    pub fn rank(&self) -> Option<u32> {
        match self {
            Frequency::Ranked(rank) => Some(*rank),
            Frequency::Unranked => None,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Ranked(rank) => write!(f, "{}", rank),
            Frequency::Unranked => write!(f, "unranked"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub base_form: String,
    pub readings: Vec<String>,
    pub frequency: Frequency,
    pub part_of_speech: PartOfSpeech,
    pub surface_form: String, // First surface seen, used for highlighting
    pub context: String,      // Sentence of the first occurrence
    pub sentence_count: u32,  // Distinct sentences the word appears in
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub name: String,
    pub cards: Vec<Card>,
}

impl Deck {
    pub fn new(name: impl Into<String>) -> Self {
        Deck { name: name.into(), cards: Vec::new() }
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
