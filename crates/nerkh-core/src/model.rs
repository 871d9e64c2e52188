//! Domain Models
//!
//! Instruments, categories and the transient quote/report values built per request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::NerkhError;

/// A named grouping of instruments presented together in one report section
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Gold,
    Coin,
    /// 1386-design coins, shown under their own heading after `Coin`
    LegacyCoin,
    Currency,
    /// Tether and anything else without a natural home
    Misc,
    ParsianCoin,
    /// Gerami coin, appended after the parsian section without a heading
    Gerami,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Gold,
        Category::Coin,
        Category::LegacyCoin,
        Category::Currency,
        Category::Misc,
        Category::ParsianCoin,
        Category::Gerami,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Gold => "gold",
            Category::Coin => "coin",
            Category::LegacyCoin => "legacy_coin",
            Category::Currency => "currency",
            Category::Misc => "misc",
            Category::ParsianCoin => "parsian_coin",
            Category::Gerami => "gerami",
        }
    }

    /// Section heading, if the category has one
    pub fn title(&self) -> Option<&'static str> {
        match self {
            Category::Gold => Some("قیمت طلا"),
            Category::Coin => Some("قیمت سکه"),
            Category::LegacyCoin => Some("سکه طرح قدیم (۱۳۸۶)"),
            Category::Currency => Some("قیمت ارز (بازار آزاد)"),
            Category::Misc => Some("قیمت تتر"),
            Category::ParsianCoin => Some("قیمت سکه پارسیان"),
            Category::Gerami => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = NerkhError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| NerkhError::InvalidEntry(format!("unknown category '{s}'")))
    }
}

/// A single reportable item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Stable internal key
    pub key: String,

    /// Identifier understood by the configured upstream shape
    /// (profile slug, numeric widget id or ticker code)
    pub provider_id: String,

    /// Label printed in the report
    pub label: String,

    /// Report grouping
    pub category: Category,
}

impl Instrument {
    pub fn new(
        key: impl Into<String>,
        provider_id: impl Into<String>,
        label: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            key: key.into(),
            provider_id: provider_id.into(),
            label: label.into(),
            category,
        }
    }
}

/// Raw provider output for one instrument
#[derive(Clone, Debug)]
pub struct RawQuote {
    pub instrument_key: String,

    /// Quote text as extracted from the upstream response
    pub payload: String,

    pub fetched_at: DateTime<Utc>,
}

impl RawQuote {
    pub fn new(instrument_key: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            instrument_key: instrument_key.into(),
            payload: payload.into(),
            fetched_at: Utc::now(),
        }
    }
}

/// Display-ready value for one instrument
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NormalizedQuote {
    pub instrument_key: String,

    /// Grouped number, or a sentinel when retrieval failed
    pub display_value: String,
}

/// One line of a category report
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportLine {
    pub label: String,
    pub display_value: String,
}

/// Ordered, labeled quotes for one category
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryReport {
    pub category: Category,
    pub lines: Vec<ReportLine>,
}

impl CategoryReport {
    /// Render as a report section: optional heading, then one line per instrument
    pub fn render(&self, unit: &str) -> String {
        let mut out = String::new();
        if let Some(title) = self.category.title() {
            out.push_str(&format!("--- **{title}** ---\n"));
        }
        let lines: Vec<String> = self
            .lines
            .iter()
            .map(|line| format!("{}: {} {}", line.label, line.display_value, unit))
            .collect();
        out.push_str(&lines.join("\n"));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_str() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!("platinum".parse::<Category>().is_err());
    }

    #[test]
    fn only_gerami_has_no_heading() {
        let headless: Vec<_> = Category::ALL
            .into_iter()
            .filter(|c| c.title().is_none())
            .collect();
        assert_eq!(headless, vec![Category::Gerami]);
    }

    #[test]
    fn render_section_with_heading() {
        let report = CategoryReport {
            category: Category::Currency,
            lines: vec![
                ReportLine { label: "دلار آمریکا".into(), display_value: "1,000".into() },
                ReportLine { label: "یورو".into(), display_value: "یافت نشد".into() },
            ],
        };
        assert_eq!(
            report.render("تومان"),
            "--- **قیمت ارز (بازار آزاد)** ---\nدلار آمریکا: 1,000 تومان\nیورو: یافت نشد تومان"
        );
    }

    #[test]
    fn render_section_without_heading() {
        let report = CategoryReport {
            category: Category::Gerami,
            lines: vec![ReportLine { label: "سکه گرمی".into(), display_value: "5".into() }],
        };
        assert_eq!(report.render("تومان"), "سکه گرمی: 5 تومان");
    }
}
