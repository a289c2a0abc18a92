//! Boolean-coercible inputs for the `live` and `suffix` flags.

/// A flag value as the host supplied it.
///
/// Hosts often hand over attribute-like values, so presence counts as `true`
/// unless the value is literally `"false"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagInput {
    /// No value at all
    Absent,
    /// A real boolean
    Bool(bool),
    /// A textual attribute value
    Text(String),
}

impl FlagInput {
    /// Coerce to strict boolean semantics.
    ///
    /// ```
    /// use live_timeago::FlagInput;
    ///
    /// assert!(FlagInput::from("").coerce());
    /// assert!(FlagInput::from("no").coerce());
    /// assert!(!FlagInput::from("false").coerce());
    /// assert!(!FlagInput::Absent.coerce());
    /// ```
    pub fn coerce(&self) -> bool {
        match self {
            FlagInput::Absent => false,
            FlagInput::Bool(value) => *value,
            FlagInput::Text(text) => text != "false",
        }
    }
}

impl From<bool> for FlagInput {
    fn from(value: bool) -> Self {
        FlagInput::Bool(value)
    }
}

impl From<&str> for FlagInput {
    fn from(text: &str) -> Self {
        FlagInput::Text(text.to_string())
    }
}

impl From<String> for FlagInput {
    fn from(text: String) -> Self {
        FlagInput::Text(text)
    }
}

impl<T: Into<FlagInput>> From<Option<T>> for FlagInput {
    fn from(value: Option<T>) -> Self {
        value.map_or(FlagInput::Absent, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coercion() {
        assert!(FlagInput::from(true).coerce());
        assert!(!FlagInput::from(false).coerce());
        assert!(FlagInput::from("true").coerce());
        assert!(FlagInput::from("False").coerce());
        assert!(!FlagInput::from(String::from("false")).coerce());
        assert!(!FlagInput::from(None::<bool>).coerce());
        assert!(FlagInput::from(Some("")).coerce());
    }
}
