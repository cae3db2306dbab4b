use std::collections::{
    BTreeMap,
    HashMap,
};

use serde::{
    Deserialize,
    Serialize,
};

use super::TermMetaBankV3;

/// Frequency data for one dictionary term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub term: String,
    pub readings: BTreeMap<String, u32>, // reading -> rank
    pub rank: u32,                       // Minimum over readings
}

impl FrequencyEntry {
    fn new(term: String) -> Self {
        FrequencyEntry { term, readings: BTreeMap::new(), rank: u32::MAX }
    }

    fn keep_lowest(&mut self, reading: &str, rank: u32) {
        self.readings
            .entry(reading.to_string())
            .and_modify(|existing| *existing = (*existing).min(rank))
            .or_insert(rank);
        self.rank = self.rank.min(rank);
    }

    fn keep_first(&mut self, reading: &str, rank: u32) {
        if !self.readings.contains_key(reading) {
            self.readings.insert(reading.to_string(), rank);
            self.rank = self.rank.min(rank);
        }
    }
}

#[derive(Debug, Clone)]
pub struct FrequencyTable {
    pub title: String,
    pub revision: String,
    terms: HashMap<String, FrequencyEntry>,
}

impl FrequencyTable {
    pub fn new(title: String, revision: String, term_meta_list: Vec<TermMetaBankV3>) -> Self {
        let mut terms: HashMap<String, FrequencyEntry> = HashMap::new();

        for term_meta in term_meta_list {
            let Some(data) = term_meta.frequency() else {
                continue;
            };
            let entry = terms
                .entry(term_meta.term.clone())
                .or_insert_with(|| FrequencyEntry::new(term_meta.term.clone()));

            match data.reading() {
                // Kanji compounds carry their reading
                Some(reading) => entry.keep_lowest(reading, data.value()),
                // Kana terms like は can be listed several times, the first one is the most frequent
                None => entry.keep_first(&term_meta.term, data.value()),
            }
        }

        FrequencyTable { title, revision, terms }
    }

    /// Builds a table from a flattened `{ term: { reading: rank } }` map.
    pub fn from_flat(
        title: String,
        revision: String,
        flat: BTreeMap<String, BTreeMap<String, u32>>,
    ) -> Self {
        let terms = flat
            .into_iter()
            .filter(|(_, readings)| !readings.is_empty())
            .map(|(term, readings)| {
                let mut entry = FrequencyEntry::new(term.clone());
                for (reading, rank) in readings {
                    entry.keep_lowest(&reading, rank);
                }
                (term, entry)
            })
            .collect();

        FrequencyTable { title, revision, terms }
    }

    pub fn get(&self, term: &str) -> Option<&FrequencyEntry> {
        self.terms.get(term)
    }

    pub fn rank(&self, term: &str) -> Option<u32> {
        self.get(term).map(|entry| entry.rank)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(json: &str) -> Vec<TermMetaBankV3> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_rank_is_minimum_over_readings() {
        let table = FrequencyTable::new(
            "JPDB".to_string(),
            "1".to_string(),
            rows(
                r#"[
                    ["日", "freq", {"reading": "ひ", "frequency": {"value": 300, "displayValue": "300"}}],
                    ["日", "freq", {"reading": "にち", "frequency": 120}],
                    ["日", "freq", {"reading": "ひ", "frequency": 900}]
                ]"#,
            ),
        );

        let entry = table.get("日").unwrap();
        assert_eq!(entry.rank, 120);
        assert_eq!(entry.readings.get("ひ"), Some(&300));
        assert_eq!(entry.readings.get("にち"), Some(&120));
    }

    #[test]
    fn test_first_kana_entry_wins() {
        let table = FrequencyTable::new(
            "JPDB".to_string(),
            "1".to_string(),
            rows(r#"[["は", "freq", 2], ["は", "freq", {"value": 5000, "displayValue": "5000㋕"}]]"#),
        );
        assert_eq!(table.rank("は"), Some(2));
        assert_eq!(table.get("は").unwrap().readings.keys().collect::<Vec<_>>(), vec!["は"]);
    }

    #[test]
    fn test_non_frequency_rows_are_skipped() {
        let table = FrequencyTable::new(
            "JPDB".to_string(),
            "1".to_string(),
            rows(r#"[["猫", "pitch", {"reading": "ねこ", "pitches": []}], ["犬", "freq", 800]]"#),
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.rank("猫"), None);
        assert_eq!(table.rank("犬"), Some(800));
    }

    #[test]
    fn test_flat_table() {
        let mut flat = BTreeMap::new();
        flat.insert(
            "歩く".to_string(),
            BTreeMap::from([("あるく".to_string(), 700), ("あゆむ".to_string(), 40000)]),
        );
        flat.insert("空".to_string(), BTreeMap::new());

        let table = FrequencyTable::from_flat("flat".to_string(), String::new(), flat);
        assert_eq!(table.rank("歩く"), Some(700));
        assert!(table.get("空").is_none());
    }
}
