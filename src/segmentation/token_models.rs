// UniDic POS: https://gist.github.com/masayu-a/e3eee0637c07d4019ec9
// IPADIC: pos1,pos2,pos3,pos4,c_type,c_form,base,reading,pron

use super::pos::PartOfSpeech;
use crate::{
    core::Token,
    dictionary::token_dictionary::DictType,
};

pub struct VibratoToken {
    pub surface: String,
    pub features: String,
}

impl From<vibrato::token::Token<'_, '_>> for VibratoToken {
    fn from(value: vibrato::token::Token) -> Self {
        Self { surface: value.surface().into(), features: value.feature().into() }
    }
}

impl VibratoToken {
    /// Maps the comma separated feature string into a [`Token`] using the column layout of `dict_type`.
    pub fn into_token(self, dict_type: DictType) -> Token {
        let fields: Vec<&str> = self.features.split(',').collect();

        // Helper to get field with default value if missing
        let get_field = |idx: usize| fields.get(idx).copied().unwrap_or("*").trim();

        let part_of_speech = PartOfSpeech::from_columns(get_field(0), get_field(1));

        let base_form = match get_field(dict_type.base_form_index()) {
            "*" | "" => self.surface.clone(),
            lemma => lemma.to_string(),
        };

        // An inflected IPADIC surface carries the reading of the inflection, not of the base form
        let reading = if dict_type.reading_follows_surface() && base_form != self.surface {
            String::new()
        } else {
            dict_type
                .base_reading_indices()
                .iter()
                .map(|&idx| get_field(idx))
                .find(|reading| *reading != "*" && !reading.is_empty())
                .unwrap_or_default()
                .to_string()
        };

        Token { surface: self.surface, base_form, reading, part_of_speech }
    }
}
