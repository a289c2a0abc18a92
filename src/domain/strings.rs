//! Locale string tables for relative-time labels.
//!
//! Tables use the jquery-timeago layout: one phrase per bucket, `%d` standing
//! in for the number, and optional prefix/suffix words for past and future.

use serde::Deserialize;

/// Error returned when a string table cannot be loaded.
#[derive(Debug, thiserror::Error)]
pub enum StringTableError {
    /// The JSON document was malformed or had wrongly typed keys
    #[error("invalid string table: {0}")]
    Json(#[from] serde_json::Error),
}

/// A locale's phrases for relative times.
///
/// Every key is optional when deserializing; missing keys fall back to English.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocaleStrings {
    pub prefix_ago: Option<String>,
    pub prefix_from_now: Option<String>,
    pub suffix_ago: Option<String>,
    pub suffix_from_now: Option<String>,
    pub seconds: String,
    pub minute: String,
    pub minutes: String,
    pub hour: String,
    pub hours: String,
    pub day: String,
    pub days: String,
    pub month: String,
    pub months: String,
    pub year: String,
    pub years: String,
    pub word_separator: String,
    /// Replacement numerals indexed by value (e.g. `["zero", "one", ...]`)
    pub numbers: Vec<String>,
}

impl LocaleStrings {
    /// English phrases.
    pub fn english() -> Self {
        Self {
            prefix_ago: None,
            prefix_from_now: None,
            suffix_ago: Some("ago".to_string()),
            suffix_from_now: Some("from now".to_string()),
            seconds: "less than a minute".to_string(),
            minute: "about a minute".to_string(),
            minutes: "%d minutes".to_string(),
            hour: "about an hour".to_string(),
            hours: "about %d hours".to_string(),
            day: "a day".to_string(),
            days: "%d days".to_string(),
            month: "about a month".to_string(),
            months: "%d months".to_string(),
            year: "about a year".to_string(),
            years: "%d years".to_string(),
            word_separator: " ".to_string(),
            numbers: Vec::new(),
        }
    }

    /// Load a table from JSON, filling missing keys with English.
    ///
    /// # Errors
    /// Returns `StringTableError::Json` if the document is not a valid table.
    ///
    /// # Example
    /// ```
    /// use live_timeago::LocaleStrings;
    ///
    /// let table = LocaleStrings::from_json(r#"{"suffixAgo": "geleden", "minutes": "%d minuten"}"#)
    ///     .unwrap();
    /// assert_eq!(table.suffix_ago.as_deref(), Some("geleden"));
    /// assert_eq!(table.hour, "about an hour");
    /// ```
    pub fn from_json(json: &str) -> Result<Self, StringTableError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Substitute `value` into a phrase, using the numerals table when it
    /// covers the value.
    pub fn substitute(&self, phrase: &str, value: u64) -> String {
        let numeral = usize::try_from(value)
            .ok()
            .and_then(|index| self.numbers.get(index))
            .cloned()
            .unwrap_or_else(|| value.to_string());
        phrase.replace("%d", &numeral)
    }
}

impl Default for LocaleStrings {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_english_defaults() {
        let table =
            LocaleStrings::from_json(r#"{"prefixAgo": "il y a", "suffixAgo": null}"#).unwrap();
        assert_eq!(table.prefix_ago.as_deref(), Some("il y a"));
        assert_eq!(table.suffix_ago, None);
        assert_eq!(table.days, "%d days");
        assert_eq!(table.word_separator, " ");
    }

    #[test]
    fn test_malformed_json() {
        let result = LocaleStrings::from_json(r#"{"minutes": 3}"#);
        assert!(matches!(result, Err(StringTableError::Json(_))));
    }

    #[test]
    fn test_substitute_with_numerals() {
        let mut table = LocaleStrings::english();
        assert_eq!(table.substitute("%d days", 3), "3 days");

        table.numbers = vec!["zero".into(), "one".into(), "two".into()];
        assert_eq!(table.substitute("%d days", 2), "two days");
        assert_eq!(table.substitute("%d days", 12), "12 days");
    }
}
