//! Answers produced by prompts.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// One prompt's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Answer {
    /// Text, from input, password and select prompts.
    String(String),
    /// Several choices, from multi-select prompts.
    List(Vec<String>),
    /// A yes or no, from confirm prompts.
    Bool(bool),
}

impl Answer {
    /// The text, if this is a text answer.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The choices, if this is a list answer.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// The flag, if this is a boolean answer.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(", ")),
            Self::Bool(true) => f.write_str("Yes"),
            Self::Bool(false) => f.write_str("No"),
        }
    }
}

impl From<String> for Answer {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Answer {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<bool> for Answer {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<String>> for Answer {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl PartialEq<&str> for Answer {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

/// Answers by question name, in the order the questions were asked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answers {
    entries: Vec<(String, Answer)>,
}

impl Answers {
    /// No answers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer, replacing an earlier one with the same name.
    pub fn insert(&mut self, name: impl Into<String>, answer: Answer) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = answer,
            None => self.entries.push((name, answer)),
        }
    }

    /// The answer for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Answer> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, a)| a)
    }

    /// Number of answers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are none.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Answers in asking order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Answer)> {
        self.entries.iter().map(|(n, a)| (n.as_str(), a))
    }
}

impl std::ops::Index<&str> for Answers {
    type Output = Answer;

    /// # Panics
    ///
    /// If there is no answer named `name`.
    fn index(&self, name: &str) -> &Answer {
        self.get(name)
            .unwrap_or_else(|| panic!("no answer named {name:?}"))
    }
}

impl Serialize for Answers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, answer) in &self.entries {
            map.serialize_entry(name, answer)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_ordered_object() {
        let mut answers = Answers::new();
        answers.insert("name", "Johnny".into());
        answers.insert("toppings", vec!["bacon".to_string()].into());
        answers.insert("agree", true.into());

        assert_eq!(
            serde_json::to_string(&answers).unwrap(),
            r#"{"name":"Johnny","toppings":["bacon"],"agree":true}"#
        );
    }

    #[test]
    fn insert_replaces() {
        let mut answers = Answers::new();
        answers.insert("color", "red".into());
        answers.insert("color", "blue".into());
        assert_eq!(answers.len(), 1);
        assert_eq!(answers.get("color"), Some(&Answer::from("blue")));
        assert_eq!(answers["color"], "blue");
    }

    #[test]
    fn display() {
        assert_eq!(Answer::Bool(false).to_string(), "No");
        assert_eq!(
            Answer::List(vec!["a".into(), "b".into()]).to_string(),
            "a, b"
        );
        assert_eq!(Answer::from("blue"), "blue");
    }
}
