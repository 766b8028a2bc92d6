//! HTML scraping of per-resource summary pages
//!
//! A resource page lists its record counts per DwC-A extension:
//!
//! ```html
//! <ul class="no_bullets">
//!   <li><span>Occurrence</span> <span class="grey_bar">4019</span></li>
//!   <li><span>Event</span> <span class="grey_bar">474</span></li>
//! </ul>
//! ```
//!
//! The markup has shifted between IPT releases, so extraction sits behind
//! [`CountExtractor`] and never fails; anything it cannot read is left out.

use crate::resource::Resource;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static SUMMARY_ITEM_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".no_bullets > li").expect("hardcoded selector is valid")
});

static LABEL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span").expect("hardcoded selector is valid"));

// Set by a script on the live page; the static markup may carry another class
static COUNTER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".grey_bar").expect("hardcoded selector is valid"));

/// Counts read from a resource page
///
/// `None` means the page did not yield a usable value for that count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartialCounts {
    pub events: Option<u64>,
    pub measurements: Option<u64>,
    pub occurrences: Option<u64>,
}

impl PartialCounts {
    /// Overwrites the counts found, leaves the rest of the resource untouched
    pub fn apply_to(&self, resource: &mut Resource) {
        if let Some(events) = self.events {
            resource.events = events;
        }
        if let Some(measurements) = self.measurements {
            resource.measurements = measurements;
        }
        if let Some(occurrences) = self.occurrences {
            resource.occurrences = occurrences;
        }
    }

    /// Returns true if no count was found
    pub fn is_empty(&self) -> bool {
        self.events.is_none() && self.measurements.is_none() && self.occurrences.is_none()
    }
}

/// Extracts record counts from a resource page
pub trait CountExtractor: Send + Sync {
    fn extract_counts(&self, html: &str) -> PartialCounts;
}

/// Reads the `.no_bullets` summary list of an IPT resource page
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryListExtractor;

impl CountExtractor for SummaryListExtractor {
    fn extract_counts(&self, html: &str) -> PartialCounts {
        let document = Html::parse_document(html);
        let mut counts = PartialCounts::default();

        for item in document.select(&SUMMARY_ITEM_SELECTOR) {
            let label = collect_text(item, &LABEL_SELECTOR);

            let slot = if label.starts_with("Event") {
                &mut counts.events
            } else if label.starts_with("MeasurementOrFact") {
                &mut counts.measurements
            } else if label.starts_with("Occurrence") {
                &mut counts.occurrences
            } else {
                continue;
            };

            // Unreadable counters are skipped, the field keeps its value
            if let Some(value) = parse_counter(&collect_text(item, &COUNTER_SELECTOR)) {
                *slot = Some(value);
            }
        }

        counts
    }
}

/// Concatenates the text of every descendant matching `selector`
fn collect_text(item: ElementRef<'_>, selector: &Selector) -> String {
    item.select(selector)
        .flat_map(|element| element.text())
        .collect()
}

fn parse_counter(text: &str) -> Option<u64> {
    text.trim().replace(',', "").parse().ok()
}
