//! Instrument Catalog
//!
//! Immutable table from internal key to provider identifier, label and category.
//! Validated once at construction; lookups never fail for a category.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::{NerkhError, Result};
use crate::model::{Category, Instrument};

/// Built-in table: (key, label, category). Keys double as profile slugs.
const BUILTIN: &[(&str, &str, Category)] = &[
    ("geram18", "طلای ۱۸ عیار", Category::Gold),
    ("geram24", "طلای ۲۴ عیار", Category::Gold),
    ("sekee", "سکه امامی", Category::Coin),
    ("seke-azadi", "سکه آزادی", Category::Coin),
    ("seke-nim", "نیم سکه", Category::Coin),
    ("seke-rob", "ربع سکه", Category::Coin),
    ("seke-emami-86", "سکه امامی (۸۶)", Category::LegacyCoin),
    ("seke-nim-86", "نیم سکه (۸۶)", Category::LegacyCoin),
    ("seke-rob-86", "ربع سکه (۸۶)", Category::LegacyCoin),
    ("price_dollar_rl", "دلار آمریکا", Category::Currency),
    ("price_eur", "یورو", Category::Currency),
    ("tether", "تتر (USDT)", Category::Misc),
    ("parsian-100", "پارسیان ۱۰۰ سوت", Category::ParsianCoin),
    ("parsian-150", "پارسیان ۱۵۰ سوت", Category::ParsianCoin),
    ("parsian-200", "پارسیان ۲۰۰ سوت", Category::ParsianCoin),
    ("parsian-250", "پارسیان ۲۵۰ سوت", Category::ParsianCoin),
    ("parsian-300", "پارسیان ۳۰۰ سوت", Category::ParsianCoin),
    ("parsian-400", "پارسیان ۴۰۰ سوت", Category::ParsianCoin),
    ("parsian-500", "پارسیان ۵۰۰ سوت", Category::ParsianCoin),
    ("parsian-1g", "پارسیان ۱ گرم", Category::ParsianCoin),
    ("parsian-1.5g", "پارسیان ۱.۵ گرم", Category::ParsianCoin),
    ("parsian-2g", "پارسیان ۲ گرم", Category::ParsianCoin),
    ("seke-gerami", "سکه گرمی", Category::Gerami),
];

/// Read-only instrument table
#[derive(Clone, Debug)]
pub struct Catalog {
    instruments: Vec<Instrument>,
}

#[derive(Deserialize)]
struct CatalogEntry {
    key: String,
    provider_id: String,
    label: String,
    category: Category,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate keys, blank fields and empty categories
    pub fn new(instruments: Vec<Instrument>) -> Result<Self> {
        let mut seen = HashSet::new();
        for instrument in &instruments {
            if instrument.key.trim().is_empty() {
                return Err(NerkhError::InvalidEntry("blank key".into()));
            }
            if instrument.provider_id.trim().is_empty() {
                return Err(NerkhError::InvalidEntry(format!(
                    "{}: blank provider id",
                    instrument.key
                )));
            }
            if instrument.label.trim().is_empty() {
                return Err(NerkhError::InvalidEntry(format!("{}: blank label", instrument.key)));
            }
            if !seen.insert(instrument.key.as_str()) {
                return Err(NerkhError::DuplicateKey(instrument.key.clone()));
            }
        }

        for category in Category::ALL {
            if !instruments.iter().any(|i| i.category == category) {
                return Err(NerkhError::EmptyCategory(category.to_string()));
            }
        }

        Ok(Self { instruments })
    }

    /// The table the service ships with, keyed by provider profile slugs
    pub fn builtin() -> Result<Self> {
        let instruments = BUILTIN
            .iter()
            .map(|(key, label, category)| Instrument::new(*key, *key, *label, *category))
            .collect();
        Self::new(instruments)
    }

    /// Load `[{key, provider_id, label, category}]` from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)?;
        let instruments = entries
            .into_iter()
            .map(|e| Instrument::new(e.key, e.provider_id, e.label, e.category))
            .collect();
        Self::new(instruments)
    }

    /// Instruments of a category, in declaration order
    pub fn lookup(&self, category: Category) -> Vec<&Instrument> {
        self.instruments
            .iter()
            .filter(|i| i.category == category)
            .collect()
    }

    /// Find an instrument by key
    pub fn resolve(&self, key: &str) -> Result<&Instrument> {
        self.instruments
            .iter()
            .find(|i| i.key == key)
            .ok_or_else(|| NerkhError::InstrumentNotFound(key.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.iter()
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Size of the largest category, the natural bound for fetch concurrency
    pub fn largest_category(&self) -> usize {
        Category::ALL
            .into_iter()
            .map(|c| self.lookup(c).len())
            .max()
            .unwrap_or(0)
    }
}
