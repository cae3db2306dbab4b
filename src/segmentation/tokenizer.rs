use vibrato::{
    tokenizer::worker::Worker,
    Tokenizer,
};

use super::{
    pos::PosFilter,
    token_models::VibratoToken,
};
use crate::{
    core::Token,
    dictionary::token_dictionary::DictType,
};

/// Wraps a vibrato worker and yields the word tokens of one sentence at a time.
pub struct Segmenter<'t> {
    worker: Worker<'t>,
    dict_type: DictType,
    pos_filter: PosFilter,
}

impl<'t> Segmenter<'t> {
    pub fn new(tokenizer: &'t Tokenizer, dict_type: DictType, pos_filter: PosFilter) -> Self {
        Segmenter { worker: tokenizer.new_worker(), dict_type, pos_filter }
    }

    /// Tokenizes `text` and returns its allowed tokens in source order.
    ///
    /// Each call resets the worker, so the previous iterator has to be dropped first.
    pub fn segment<'s>(&'s mut self, text: &str) -> Segments<'s, 't> {
        self.worker.reset_sentence(text);
        self.worker.tokenize();
        Segments {
            worker: &self.worker,
            dict_type: self.dict_type,
            pos_filter: &self.pos_filter,
            next: 0,
        }
    }
}

pub struct Segments<'s, 't> {
    worker: &'s Worker<'t>,
    dict_type: DictType,
    pos_filter: &'s PosFilter,
    next: usize,
}

impl Iterator for Segments<'_, '_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        while self.next < self.worker.num_tokens() {
            let raw: VibratoToken = self.worker.token(self.next).into();
            self.next += 1;

            let token = raw.into_token(self.dict_type);
            if !token.surface.trim().is_empty() && self.pos_filter.allows(token.part_of_speech) {
                return Some(token);
            }
        }
        None
    }
}
