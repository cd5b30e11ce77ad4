use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use url::Url;

use crate::models::DetailValue;

/// Parse a selector that is fixed at compile time.
pub(crate) fn css(src: &str) -> Selector {
    Selector::parse(src).expect("invalid css selector")
}

/// First element matching `src` anywhere in the document.
pub(crate) fn first_element<'a>(document: &'a Html, src: &str) -> Option<ElementRef<'a>> {
    document.select(&css(src)).next()
}

/// Whitespace-normalized text content of an element.
pub(crate) fn element_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract the first embedded numeric literal from a price string, after
/// stripping currency markers and thousands separators.
///
/// `"Rs. 1,299.00"` -> `Some(1299.0)`
pub fn clean_price(text: &str) -> Option<f64> {
    let mut cleaned = text.to_string();
    for marker in ["Rs.", "Rs", "PKR", "INR", "₨", "₹", "$", "€", "£"] {
        cleaned = cleaned.replace(marker, "");
    }
    let cleaned = cleaned.replace(',', "");

    let re = Regex::new(r"\d+(?:\.\d+)?").unwrap();
    re.find(&cleaned)?.as_str().parse::<f64>().ok()
}

/// Walk a prioritized selector chain and return the first price found.
///
/// Checks a `data-price-amount` attribute before falling back to the
/// element's text content; a miss on every selector leaves the field null.
pub fn price_from_selectors(document: &Html, selectors: &[&str]) -> Option<f64> {
    for src in selectors {
        if let Some(element) = first_element(document, src) {
            if let Some(amount) = element.value().attr("data-price-amount") {
                if let Some(price) = clean_price(amount) {
                    return Some(price);
                }
            }
            if let Some(price) = clean_price(&element_text(element)) {
                return Some(price);
            }
        }
    }
    None
}

/// Pick the single widest candidate out of a srcset-style descriptor.
///
/// `"a.jpg 200w, b.jpg 800w, c.jpg 400w"` -> `Some("b.jpg")`
pub fn widest_srcset(srcset: &str) -> Option<String> {
    let mut widest: Option<(u32, &str)> = None;
    for entry in srcset.split(',') {
        let entry = entry.trim();
        let Some((url, descriptor)) = entry.rsplit_once(' ') else {
            continue;
        };
        let Ok(width) = descriptor.trim().trim_end_matches('w').parse::<u32>() else {
            continue;
        };
        if widest.map_or(true, |(w, _)| width > w) {
            widest = Some((width, url.trim()));
        }
    }
    widest.map(|(_, url)| url.to_string())
}

/// Resolve a possibly relative or protocol-relative URL against the vendor
/// base.
pub fn absolutize(base: &Url, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Some(rest) = raw.strip_prefix("//") {
        return Some(format!("{}://{}", base.scheme(), rest));
    }
    if raw.starts_with("http://") || raw.starts_with("https://") {
        return Some(raw.to_string());
    }
    base.join(raw).ok().map(|url| url.to_string())
}

/// Parse the body rows of a measurement table: each row's first cell is the
/// size key, remaining cells are keyed by the header labels. The header row
/// itself is skipped.
pub fn measurement_rows(
    table: ElementRef,
    headers: &[String],
) -> BTreeMap<String, BTreeMap<String, String>> {
    let mut rows = BTreeMap::new();
    for row in table.select(&css("tr")).skip(1) {
        let cells: Vec<_> = row.select(&css("td")).collect();
        let Some((size_cell, rest)) = cells.split_first() else {
            continue;
        };
        let size = element_text(*size_cell);
        if size.is_empty() {
            continue;
        }
        let mut measurements = BTreeMap::new();
        for (i, cell) in rest.iter().enumerate() {
            if let Some(header) = headers.get(i + 1) {
                measurements.insert(header.clone(), element_text(*cell));
            }
        }
        rows.insert(size, measurements);
    }
    rows
}

/// Parse a `<li>`-based detail list: "Key: value" items become text entries,
/// bare items become `true` flags.
pub fn detail_items(section: ElementRef) -> BTreeMap<String, DetailValue> {
    let mut details = BTreeMap::new();
    for item in section.select(&css("li")) {
        let text = element_text(item);
        if text.is_empty() {
            continue;
        }
        match text.split_once(':') {
            Some((key, value)) => {
                details.insert(
                    key.trim().to_string(),
                    DetailValue::Text(value.trim().to_string()),
                );
            }
            None => {
                details.insert(text, DetailValue::Flag(true));
            }
        }
    }
    details
}
