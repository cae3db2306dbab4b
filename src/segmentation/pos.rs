use std::{
    collections::BTreeSet,
    fmt,
    str::FromStr,
};

use serde::{
    Deserialize,
    Serialize,
};

#[derive(PartialEq, Clone, Copy, Debug, Hash, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PartOfSpeech {
    Noun,
    Pronoun,
    Verb,
    Adjective,
    AdjectivalNoun,
    Adverb,
    Adnominal, // あの, この, etc
    Conjunction,
    Interjection,
    Particle,
    AuxiliaryVerb,
    Prefix,
    Suffix,
    Symbol,
    Whitespace,
    Other,
}

impl PartOfSpeech {
    pub const ALL: [PartOfSpeech; 16] = [
        PartOfSpeech::Noun,
        PartOfSpeech::Pronoun,
        PartOfSpeech::Verb,
        PartOfSpeech::Adjective,
        PartOfSpeech::AdjectivalNoun,
        PartOfSpeech::Adverb,
        PartOfSpeech::Adnominal,
        PartOfSpeech::Conjunction,
        PartOfSpeech::Interjection,
        PartOfSpeech::Particle,
        PartOfSpeech::AuxiliaryVerb,
        PartOfSpeech::Prefix,
        PartOfSpeech::Suffix,
        PartOfSpeech::Symbol,
        PartOfSpeech::Whitespace,
        PartOfSpeech::Other,
    ];

    /// Maps the first two POS columns of UniDic or IPADIC features.
    pub fn from_columns(pos1: &str, pos2: &str) -> Self {
        match pos1 {
            "名詞" if pos2 == "形容動詞語幹" => PartOfSpeech::AdjectivalNoun, // ipadic
            "名詞" if pos2 == "代名詞" => PartOfSpeech::Pronoun,              // ipadic
            "名詞" => PartOfSpeech::Noun,
            "代名詞" => PartOfSpeech::Pronoun,
            "動詞" => PartOfSpeech::Verb,
            "形容詞" => PartOfSpeech::Adjective,
            "形状詞" => PartOfSpeech::AdjectivalNoun,
            "副詞" => PartOfSpeech::Adverb,
            "連体詞" => PartOfSpeech::Adnominal,
            "接続詞" => PartOfSpeech::Conjunction,
            "感動詞" => PartOfSpeech::Interjection,
            "助詞" => PartOfSpeech::Particle,
            "助動詞" => PartOfSpeech::AuxiliaryVerb,
            "接頭辞" | "接頭詞" => PartOfSpeech::Prefix,
            "接尾辞" => PartOfSpeech::Suffix,
            "記号" | "補助記号" => PartOfSpeech::Symbol,
            "空白" => PartOfSpeech::Whitespace,
            _ => PartOfSpeech::Other,
        }
    }

    /// Symbols and whitespace never produce cards.
    pub fn is_word(&self) -> bool {
        !matches!(self, PartOfSpeech::Symbol | PartOfSpeech::Whitespace)
    }

    pub fn key(&self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Pronoun => "pronoun",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::Adjective => "adjective",
            PartOfSpeech::AdjectivalNoun => "adjectival-noun",
            PartOfSpeech::Adverb => "adverb",
            PartOfSpeech::Adnominal => "adnominal",
            PartOfSpeech::Conjunction => "conjunction",
            PartOfSpeech::Interjection => "interjection",
            PartOfSpeech::Particle => "particle",
            PartOfSpeech::AuxiliaryVerb => "auxiliary-verb",
            PartOfSpeech::Prefix => "prefix",
            PartOfSpeech::Suffix => "suffix",
            PartOfSpeech::Symbol => "symbol",
            PartOfSpeech::Whitespace => "whitespace",
            PartOfSpeech::Other => "other",
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let readable = match self {
            PartOfSpeech::Noun => "Noun",
            PartOfSpeech::Pronoun => "Pronoun",
            PartOfSpeech::Verb => "Verb",
            PartOfSpeech::Adjective => "Adjective",
            PartOfSpeech::AdjectivalNoun => "Adjectival Noun",
            PartOfSpeech::Adverb => "Adverb",
            PartOfSpeech::Adnominal => "Adnominal",
            PartOfSpeech::Conjunction => "Conjunction",
            PartOfSpeech::Interjection => "Interjection",
            PartOfSpeech::Particle => "Particle",
            PartOfSpeech::AuxiliaryVerb => "Auxiliary Verb",
            PartOfSpeech::Prefix => "Prefix",
            PartOfSpeech::Suffix => "Suffix",
            PartOfSpeech::Symbol => "Symbol",
            PartOfSpeech::Whitespace => "Whitespace",
            PartOfSpeech::Other => "Other",
        };
        write!(f, "{}", readable)
    }
}

impl FromStr for PartOfSpeech {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        PartOfSpeech::ALL.iter().copied().find(|pos| pos.key() == wanted).ok_or_else(|| {
            let known: Vec<&str> = PartOfSpeech::ALL.iter().map(|pos| pos.key()).collect();
            format!("unknown part of speech '{}', expected one of: {}", s, known.join(", "))
        })
    }
}

/// Categories allowed to produce cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PosFilter {
    allowed: BTreeSet<PartOfSpeech>,
}

impl PosFilter {
    pub fn new(allowed: impl IntoIterator<Item = PartOfSpeech>) -> Self {
        PosFilter { allowed: allowed.into_iter().collect() }
    }

    pub fn allows(&self, pos: PartOfSpeech) -> bool {
        pos.is_word() && self.allowed.contains(&pos)
    }
}

impl Default for PosFilter {
    fn default() -> Self {
        PosFilter::new([
            PartOfSpeech::Noun,
            PartOfSpeech::Verb,
            PartOfSpeech::Adjective,
            PartOfSpeech::AdjectivalNoun,
            PartOfSpeech::Adverb,
        ])
    }
}
