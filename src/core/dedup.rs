use std::collections::HashMap;

/// Base forms already turned into cards during this run, with the order they were first seen in.
#[derive(Debug, Default)]
pub struct SeenSet {
    seen: HashMap<String, usize>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `base_form` and returns true the first time it is offered.
    pub fn is_new(&mut self, base_form: &str) -> bool {
        if self.seen.contains_key(base_form) {
            return false;
        }
        let ordinal = self.seen.len();
        self.seen.insert(base_form.to_string(), ordinal);
        true
    }

    /// Position of `base_form` among the first occurrences, if it was seen.
    pub fn ordinal(&self, base_form: &str) -> Option<usize> {
        self.seen.get(base_form).copied()
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
