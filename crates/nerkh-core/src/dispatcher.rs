//! Report Dispatcher
//!
//! The entry point the chat transport calls: a keyboard selector in, finished
//! report text out.
//!
//! ```text
//! "سکه 🪙" ─▶ Selector::Coin ─▶ [Coin, LegacyCoin] ─▶ header + section + "\n\n" + section
//! ```

use std::sync::Arc;

use serde::Serialize;

use crate::error::{NerkhError, Result};
use crate::header::HeaderSource;
use crate::model::Category;
use crate::reporter::CategoryReporter;

/// Unit appended to every quote line unless configured otherwise
pub const DEFAULT_CURRENCY_UNIT: &str = "تومان";

/// Text the transport shows when the selector is not a keyboard option
pub const GUIDANCE: &str = "لطفاً یکی از گزینه‌های روی کیبورد را انتخاب کنید.";

/// One keyboard option
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    Gold,
    Coin,
    Currency,
    Tether,
    Parsian,
}

impl Selector {
    pub const ALL: [Selector; 5] = [
        Selector::Gold,
        Selector::Coin,
        Selector::Currency,
        Selector::Tether,
        Selector::Parsian,
    ];

    /// Keyboard label, the exact text the transport sends back
    pub fn label(&self) -> &'static str {
        match self {
            Selector::Gold => "طلا 🥇",
            Selector::Coin => "سکه 🪙",
            Selector::Currency => "ارز 💵",
            Selector::Tether => "تتر ₮",
            Selector::Parsian => "سکه پارسیان ⚖️",
        }
    }

    /// ASCII alias accepted alongside the label
    pub fn alias(&self) -> &'static str {
        match self {
            Selector::Gold => "gold",
            Selector::Coin => "coin",
            Selector::Currency => "currency",
            Selector::Tether => "tether",
            Selector::Parsian => "parsian",
        }
    }

    /// Report sections, in print order
    pub fn categories(&self) -> &'static [Category] {
        match self {
            Selector::Gold => &[Category::Gold],
            Selector::Coin => &[Category::Coin, Category::LegacyCoin],
            Selector::Currency => &[Category::Currency],
            Selector::Tether => &[Category::Misc],
            Selector::Parsian => &[Category::ParsianCoin, Category::Gerami],
        }
    }

    /// Match a label or alias, ignoring surrounding whitespace
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.label() == input || s.alias().eq_ignore_ascii_case(input))
    }

    /// Keyboard layout shown by the transport
    pub fn keyboard() -> Vec<Vec<&'static str>> {
        vec![
            vec![Selector::Gold.label(), Selector::Coin.label()],
            vec![Selector::Currency.label(), Selector::Tether.label()],
            vec![Selector::Parsian.label()],
        ]
    }
}

/// Turns selectors into report text
#[derive(Clone)]
pub struct ReportDispatcher {
    reporter: CategoryReporter,
    header: Arc<dyn HeaderSource>,
    currency_unit: String,
}

impl ReportDispatcher {
    pub fn new(
        reporter: CategoryReporter,
        header: Arc<dyn HeaderSource>,
        currency_unit: impl Into<String>,
    ) -> Self {
        Self {
            reporter,
            header,
            currency_unit: currency_unit.into(),
        }
    }

    pub fn reporter(&self) -> &CategoryReporter {
        &self.reporter
    }

    /// Build the report for a selector.
    ///
    /// Returns `NerkhError::UnrecognizedSelector` for anything that is not a
    /// keyboard option; the caller shows [`GUIDANCE`] instead.
    pub async fn handle(&self, selector: &str) -> Result<String> {
        let parsed = Selector::parse(selector)
            .ok_or_else(|| NerkhError::UnrecognizedSelector(selector.to_string()))?;
        Ok(self.render(parsed).await)
    }

    /// Build the report for an already parsed selector
    pub async fn render(&self, selector: Selector) -> String {
        let reports = self.reporter.build_reports(selector.categories()).await;
        let sections: Vec<String> = reports
            .iter()
            .map(|report| report.render(&self.currency_unit))
            .collect();

        let mut text = self.header.current_header();
        text.push_str(&sections.join("\n\n"));
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::error::{CONNECTION_ERROR, FetchError};
    use crate::fetcher::StaticQuoteFetcher;
    use crate::header::FixedHeader;
    use crate::reporter::ReporterConfig;

    fn dispatcher(fetcher: StaticQuoteFetcher) -> ReportDispatcher {
        let reporter = CategoryReporter::new(
            Arc::new(Catalog::builtin().unwrap()),
            Arc::new(fetcher),
            ReporterConfig::default(),
        );
        ReportDispatcher::new(
            reporter,
            Arc::new(FixedHeader("HEADER\n\n".into())),
            DEFAULT_CURRENCY_UNIT,
        )
    }

    #[test]
    fn parses_labels_and_aliases() {
        for selector in Selector::ALL {
            assert_eq!(Selector::parse(selector.label()), Some(selector));
            assert_eq!(Selector::parse(selector.alias()), Some(selector));
        }
        assert_eq!(Selector::parse("  طلا 🥇\n"), Some(Selector::Gold));
        assert_eq!(Selector::parse("GOLD"), Some(Selector::Gold));
        assert_eq!(Selector::parse("طلا"), None);
    }

    #[test]
    fn keyboard_lists_every_selector_once() {
        let labels: Vec<&str> = Selector::keyboard().into_iter().flatten().collect();
        assert_eq!(labels.len(), Selector::ALL.len());
        for selector in Selector::ALL {
            assert!(labels.contains(&selector.label()));
        }
    }

    #[tokio::test]
    async fn unknown_selector_is_unrecognized() {
        let result = dispatcher(StaticQuoteFetcher::answering_all("1"))
            .handle("not-a-real-option")
            .await;
        assert!(matches!(result, Err(NerkhError::UnrecognizedSelector(s)) if s == "not-a-real-option"));
    }

    #[tokio::test]
    async fn gold_report_layout() {
        let fetcher = StaticQuoteFetcher::new()
            .with_quote("geram18", "4512300")
            .with_error("geram24", FetchError::unavailable("timeout"));

        let text = dispatcher(fetcher).handle("طلا 🥇").await.unwrap();
        assert_eq!(
            text,
            format!(
                "HEADER\n\n--- **قیمت طلا** ---\nطلای ۱۸ عیار: 4,512,300 تومان\nطلای ۲۴ عیار: {CONNECTION_ERROR} تومان"
            )
        );
    }

    #[tokio::test]
    async fn coin_report_has_two_sections() {
        let text = dispatcher(StaticQuoteFetcher::answering_all("1"))
            .handle("coin")
            .await
            .unwrap();

        let sections: Vec<&str> = text.trim_start_matches("HEADER\n\n").split("\n\n").collect();
        assert_eq!(sections.len(), 2);
        assert!(sections[0].starts_with("--- **قیمت سکه** ---\n"));
        assert!(sections[1].starts_with("--- **سکه طرح قدیم (۱۳۸۶)** ---\n"));
        assert_eq!(sections[1].lines().count(), 4);
    }

    #[tokio::test]
    async fn parsian_report_appends_gerami_line() {
        let text = dispatcher(StaticQuoteFetcher::answering_all("2500000"))
            .handle("سکه پارسیان ⚖️")
            .await
            .unwrap();

        assert!(text.starts_with("HEADER\n\n--- **قیمت سکه پارسیان** ---\nپارسیان ۱۰۰ سوت: 2,500,000 تومان\n"));
        assert!(text.ends_with("پارسیان ۲ گرم: 2,500,000 تومان\n\nسکه گرمی: 2,500,000 تومان"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn handle_runs_on_spawned_task() {
        let dispatcher = Arc::new(dispatcher(StaticQuoteFetcher::answering_all("4512300")));

        let task = {
            let dispatcher = Arc::clone(&dispatcher);
            tokio::spawn(async move { dispatcher.handle("gold").await })
        };
        let text = task.await.unwrap().unwrap();

        assert!(text.contains("طلای ۱۸ عیار: 4,512,300 تومان"));
    }
}
