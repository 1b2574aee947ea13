//! Record selection strategies

use std::fmt;

use crate::WireRecord;

/// Decides whether a decoded wire record is the one being looked up
pub trait RecordMatcher<R> {
    fn matches(&self, record: &R) -> bool;
}

impl<R, F> RecordMatcher<R> for F
where
    F: Fn(&R) -> bool,
{
    fn matches(&self, record: &R) -> bool {
        self(record)
    }
}

/// Lookup key for a group or user
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Exact, case-sensitive name
    Name(String),
    /// Decimal id, compared as a string: "007" never matches id 7
    Id(String),
}

impl Selector {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Pick a selector from free-form input: numeric strings select by id
    pub fn parse(input: &str) -> Self {
        let digits = input.strip_prefix('-').unwrap_or(input);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            Self::Id(input.to_string())
        } else {
            Self::Name(input.to_string())
        }
    }
}

impl<R: WireRecord> RecordMatcher<R> for Selector {
    fn matches(&self, record: &R) -> bool {
        match self {
            Selector::Name(name) => record.name() == name.as_str(),
            Selector::Id(id) => record.id().to_string() == *id,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Name(name) => write!(f, "name={}", name),
            Selector::Id(id) => write!(f, "id={}", id),
        }
    }
}
