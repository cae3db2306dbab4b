use wana_kana::ConvertJapanese;

use crate::{
    core::{
        Card,
        Frequency,
        Token,
    },
    dictionary::frequency_dict::{
        FrequencyEntry,
        FrequencyTable,
    },
};

pub struct CardBuilder<'a> {
    table: &'a FrequencyTable,
}

impl<'a> CardBuilder<'a> {
    pub fn new(table: &'a FrequencyTable) -> Self {
        CardBuilder { table }
    }

    fn lookup(&self, token: &Token) -> Option<&'a FrequencyEntry> {
        self.table.get(&token.base_form).or_else(|| self.table.get(&token.surface))
    }

    /// Builds the card for a token seen for the first time. Words missing from the table are still carded.
    pub fn build(&self, token: &Token, context: &str) -> Card {
        let (frequency, readings) = match self.lookup(token) {
            Some(entry) => (Frequency::Ranked(entry.rank), readings_by_rank(entry)),
            None => {
                let readings = if token.reading.is_empty() {
                    Vec::new()
                } else {
                    vec![token.reading.to_hiragana()]
                };
                (Frequency::Unranked, readings)
            }
        };

        Card {
            base_form: token.base_form.clone(),
            readings,
            frequency,
            part_of_speech: token.part_of_speech,
            surface_form: token.surface.clone(),
            context: context.to_string(),
            sentence_count: 1,
        }
    }
}

fn readings_by_rank(entry: &FrequencyEntry) -> Vec<String> {
    let mut readings: Vec<(&String, &u32)> = entry.readings.iter().collect();
    readings.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)));
    readings.into_iter().map(|(reading, _)| reading.clone()).collect()
}
