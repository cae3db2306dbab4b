use std::{
    collections::HashSet,
    fmt,
    path::PathBuf,
    time::Instant,
};

use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    debug,
    error,
    info,
};

use super::{
    dedup::SeenSet,
    Book2AnkiError,
    Card,
    Deck,
    Token,
};
use crate::{
    anki::{
        card_builder::CardBuilder,
        deck_writer::{
            write_deck,
            DeckFormat,
        },
    },
    dictionary::{
        frequency_dict::FrequencyTable,
        frequency_loader::FrequencyDictionaryLoader,
        token_dictionary::{
            init_vibrato,
            DictType,
        },
    },
    parser,
    segmentation::{
        pos::PosFilter,
        tokenizer::Segmenter,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Loading,
    Tokenizing,
    Building,
    Writing,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Loading => "loading",
            Stage::Tokenizing => "tokenizing",
            Stage::Building => "building",
            Stage::Writing => "writing",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardOrder {
    /// Order of first occurrence in the input.
    Source,
    /// Most common first, unranked words last.
    #[default]
    Frequency,
}

impl std::str::FromStr for CardOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "source" => Ok(CardOrder::Source),
            "frequency" => Ok(CardOrder::Frequency),
            other => Err(format!("unknown order '{}', expected source or frequency", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckShaping {
    pub min_rank: Option<u32>,
    pub max_rank: Option<u32>,
    /// Words found in fewer distinct sentences are dropped.
    pub min_sentences: u32,
    pub order: CardOrder,
    pub reverse: bool,
}

impl Default for DeckShaping {
    fn default() -> Self {
        DeckShaping {
            min_rank: None,
            max_rank: None,
            min_sentences: 1,
            order: CardOrder::default(),
            reverse: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub frequency_dict: PathBuf,
    pub system_dic: PathBuf,
    pub dict_type: DictType,
    pub pos_filter: PosFilter,
    pub deck_name: String,
    pub format: DeckFormat,
    pub shaping: DeckShaping,
}

struct FirstOccurrence {
    token: Token,
    context: String,
    sentence_count: u32,
}

/// Collects one card per distinct base form, keeping the context of the first occurrence
/// and counting the sentences each word shows up in. Cards are created by [`DeckBuilder::finish`].
pub struct DeckBuilder<'a> {
    cards: CardBuilder<'a>,
    seen: SeenSet,
    name: String,
    words: Vec<FirstOccurrence>,
}

impl<'a> DeckBuilder<'a> {
    pub fn new(table: &'a FrequencyTable, name: impl Into<String>) -> Self {
        DeckBuilder {
            cards: CardBuilder::new(table),
            seen: SeenSet::new(),
            name: name.into(),
            words: Vec::new(),
        }
    }

    /// Offers the tokens of one sentence and returns how many new words they contained.
    pub fn offer_sentence(&mut self, tokens: &[Token], context: &str) -> usize {
        let mut in_sentence: HashSet<&str> = HashSet::new();
        let mut new_words = 0;

        for token in tokens {
            // A word repeated within one sentence counts once
            if !in_sentence.insert(token.base_form.as_str()) {
                continue;
            }
            if self.seen.is_new(&token.base_form) {
                self.words.push(FirstOccurrence {
                    token: token.clone(),
                    context: context.to_string(),
                    sentence_count: 1,
                });
                new_words += 1;
            } else if let Some(word) =
                self.seen.ordinal(&token.base_form).and_then(|idx| self.words.get_mut(idx))
            {
                word.sentence_count += 1;
            }
        }
        new_words
    }

    pub fn finish(self) -> Deck {
        let DeckBuilder { cards, name, words, .. } = self;
        let mut deck = Deck::new(name);
        for word in words {
            let card = cards.build(&word.token, &word.context);
            deck.push(Card { sentence_count: word.sentence_count, ..card });
        }
        deck
    }
}

/// Applies the rank and sentence count bounds, then the ordering.
pub fn shape_deck(mut deck: Deck, shaping: &DeckShaping) -> Deck {
    deck.cards.retain(|card| {
        let in_bounds = match card.frequency.rank() {
            Some(rank) => {
                shaping.min_rank.map_or(true, |min| rank >= min)
                    && shaping.max_rank.map_or(true, |max| rank <= max)
            }
            None => true,
        };
        in_bounds && card.sentence_count >= shaping.min_sentences
    });

    if shaping.order == CardOrder::Frequency {
        // Stable sort, ties keep source order
        deck.cards.sort_by_key(|card| card.frequency.rank().unwrap_or(u32::MAX));
    }
    if shaping.reverse {
        deck.cards.reverse();
    }
    deck
}

/// First and last five cards with their rank and sentence count, like the summary printed after a run.
pub fn summary_table(deck: &Deck) -> String {
    let f_header = "Frequency";
    let s_header = "Sentences";
    let f_pad = f_header.len();
    let s_pad = s_header.len();
    let mut out = format!("{:>f_pad$}  {:>s_pad$}  Word\n", f_header, s_header);

    let row = |out: &mut String, idx: usize| {
        let card = &deck.cards[idx];
        out.push_str(&format!(
            "{:>f_pad$}  {:>s_pad$}  {}\n",
            card.frequency.to_string(),
            card.sentence_count,
            card.base_form
        ));
    };

    if deck.len() <= 10 {
        (0..deck.len()).for_each(|idx| row(&mut out, idx));
    } else {
        (0..5).for_each(|idx| row(&mut out, idx));
        for _ in 0..2 {
            out.push_str(&format!("{}...\n", " ".repeat(f_pad + s_pad + 4)));
        }
        (deck.len() - 5..deck.len()).for_each(|idx| row(&mut out, idx));
    }

    out.push_str(&format!("\nTotal cards: {}\n", deck.len()));
    out
}

#[derive(Debug)]
pub struct RunSummary {
    pub deck: Deck,
    pub sentences: usize,
    pub tokens: usize,
}

pub struct Pipeline {
    config: PipelineConfig,
    stage: Stage,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Pipeline { config, stage: Stage::Idle }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn enter(&mut self, stage: Stage) {
        debug!("Pipeline stage {} -> {}", self.stage, stage);
        self.stage = stage;
    }

    /// Runs every stage in order. A failure leaves the pipeline in [`Stage::Failed`] and writes nothing.
    pub fn run(&mut self) -> Result<RunSummary, Book2AnkiError> {
        match self.run_stages() {
            Ok(summary) => {
                self.enter(Stage::Done);
                Ok(summary)
            }
            Err(e) => {
                error!("Pipeline failed while {}: {}", self.stage, e);
                self.enter(Stage::Failed);
                Err(e)
            }
        }
    }

    fn run_stages(&mut self) -> Result<RunSummary, Book2AnkiError> {
        let total_start = Instant::now();
        let source_files = parser::collect_source_files(&self.config.inputs)?;

        self.enter(Stage::Loading);
        let loader = FrequencyDictionaryLoader::new(&self.config.frequency_dict);
        let table = loader.load()?;
        let tokenizer = init_vibrato(&self.config.system_dic)?;
        let mut segmenter =
            Segmenter::new(&tokenizer, self.config.dict_type, self.config.pos_filter.clone());

        let mut builder = DeckBuilder::new(table, self.config.deck_name.as_str());
        let mut sentence_count = 0;
        let mut token_count = 0;

        for source_file in &source_files {
            self.enter(Stage::Tokenizing);
            let sentences = parser::read(source_file)?;
            let tokens: Vec<Vec<Token>> = sentences
                .iter()
                .map(|sentence| segmenter.segment(&sentence.text).collect())
                .collect();
            let file_tokens: usize = tokens.iter().map(Vec::len).sum();

            self.enter(Stage::Building);
            let mut new_cards = 0;
            for (sentence, sentence_tokens) in sentences.iter().zip(&tokens) {
                new_cards += builder.offer_sentence(sentence_tokens, &sentence.text);
            }
            info!(
                "{}: {} sentences, {} tokens, {} new words",
                source_file.path.display(),
                sentences.len(),
                file_tokens,
                new_cards
            );
            sentence_count += sentences.len();
            token_count += file_tokens;
        }

        let deck = shape_deck(builder.finish(), &self.config.shaping);

        self.enter(Stage::Writing);
        write_deck(&deck, &self.config.output, self.config.format)?;

        info!("Processing completed ({:.1}s)", total_start.elapsed().as_secs_f32());
        Ok(RunSummary { deck, sentences: sentence_count, tokens: token_count })
    }
}
