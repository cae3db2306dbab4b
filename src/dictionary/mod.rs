pub mod frequency_dict;
pub mod frequency_loader;
pub mod token_dictionary;

// Yomitan schema: https://github.com/yomidevs/yomitan/tree/master/ext/data/schemas

use serde::{
    Deserialize,
    Deserializer,
};

/// Some dictionaries store ranks as `"123"` instead of `123`.
fn deserialize_number_or_numeric_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    let value = match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => n,
        NumberOrString::Text(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom)?,
    };

    if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 {
        return Err(serde::de::Error::custom(format!("frequency out of range: {}", value)));
    }
    Ok(value.round() as u32)
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum JsonFrequency {
    #[serde(deserialize_with = "deserialize_number_or_numeric_string")]
    Number(u32),
    Complex {
        #[serde(deserialize_with = "deserialize_number_or_numeric_string")]
        value: u32,

        #[serde(rename = "displayValue")]
        display_value: Option<String>,
    },
}

impl JsonFrequency {
    pub fn value(&self) -> u32 {
        match self {
            JsonFrequency::Number(num) => *num,
            JsonFrequency::Complex { value, .. } => *value,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum JsonFrequencyData {
    Nested { reading: String, frequency: JsonFrequency },
    Simple(JsonFrequency),
}

impl JsonFrequencyData {
    pub fn value(&self) -> u32 {
        match self {
            JsonFrequencyData::Simple(simple) => simple.value(),
            JsonFrequencyData::Nested { frequency, .. } => frequency.value(),
        }
    }

    pub fn reading(&self) -> Option<&str> {
        match self {
            JsonFrequencyData::Nested { reading, .. } => Some(reading.as_str()),
            JsonFrequencyData::Simple(_) => None,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct DictionaryIndex {
    pub title: String,
    pub revision: String,

    pub format: Option<u8>, //Must have one
    pub version: Option<u8>,
}

/// One `[term, type, data]` row of a `term_meta_bank_*.json` file.
#[derive(Deserialize, Debug)]
pub struct TermMetaBankV3 {
    pub term: String,
    #[serde(rename = "type")]
    pub data_type: String, // "freq", "pitch", or "ipa"
    pub data: Option<serde_json::Value>, // Only parsed further for "freq" rows
}

impl TermMetaBankV3 {
    pub fn frequency(&self) -> Option<JsonFrequencyData> {
        if self.data_type != "freq" {
            return None;
        }
        self.data.clone().and_then(|data| serde_json::from_value(data).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(json: &str) -> TermMetaBankV3 {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_frequency_shapes() {
        let simple = row(r#"["は", "freq", 3]"#).frequency().unwrap();
        assert_eq!(simple.value(), 3);
        assert_eq!(simple.reading(), None);

        let complex = row(r#"["は", "freq", {"value": 7, "displayValue": "7㋕"}]"#).frequency().unwrap();
        assert_eq!(complex.value(), 7);

        let nested =
            row(r#"["猫", "freq", {"reading": "ねこ", "frequency": {"value": 1200, "displayValue": "1200"}}]"#)
                .frequency()
                .unwrap();
        assert_eq!(nested.value(), 1200);
        assert_eq!(nested.reading(), Some("ねこ"));

        let nested_number = row(r#"["犬", "freq", {"reading": "いぬ", "frequency": 900}]"#).frequency().unwrap();
        assert_eq!(nested_number.value(), 900);
    }

    #[test]
    fn test_numeric_strings() {
        let data = row(r#"["猫", "freq", "1500"]"#).frequency().unwrap();
        assert_eq!(data.value(), 1500);
    }

    #[test]
    fn test_non_frequency_rows_are_ignored() {
        let pitch = row(r#"["猫", "pitch", {"reading": "ねこ", "pitches": [{"position": 1}]}]"#);
        assert!(pitch.frequency().is_none());
    }
}
