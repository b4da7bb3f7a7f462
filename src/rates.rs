//! Currency rate abstractions and core types.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

use crate::error::CoreError;

/// Ordered currency-code to rate mapping.
///
/// Keys are exactly the requested codes, iterated in request order. The
/// optional `as_of` timestamp is the quote date reported by the source.
#[derive(Clone, PartialEq, Default)]
pub struct QuoteSet {
    entries: Vec<(String, f64)>,
    as_of: Option<DateTime<FixedOffset>>,
}

impl QuoteSet {
    pub fn new() -> Self {
        QuoteSet::default()
    }

    pub fn insert(&mut self, code: String, rate: f64) {
        self.entries.push((code, rate));
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, rate)| *rate)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(code, rate)| (code.as_str(), *rate))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_of(&self) -> Option<DateTime<FixedOffset>> {
        self.as_of
    }

    pub fn set_as_of(&mut self, as_of: Option<DateTime<FixedOffset>>) {
        self.as_of = as_of;
    }
}

// Rendered as a plain map so trace records stay readable.
impl fmt::Debug for QuoteSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(code, rate)| (code, rate)))
            .finish()
    }
}

/// Fetches rates for an ordered list of currency codes.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(&self, codes: &[String]) -> Result<QuoteSet, CoreError>;
}
