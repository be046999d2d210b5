use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use scraper::{ElementRef, Selector};
use std::str::FromStr;

use crate::models::Specification;

static TH_OR_DT: Lazy<Selector> = Lazy::new(|| Selector::parse("th, dt").unwrap());
static TD_OR_DD: Lazy<Selector> = Lazy::new(|| Selector::parse("td, dd").unwrap());

/// Result of a parse-or-default extraction.
///
/// `diagnostic` is set whenever `value` is the fallback rather than
/// something read from the text.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub value: T,
    pub diagnostic: Option<String>,
}

impl<T> Parsed<T> {
    pub fn found(value: T) -> Self {
        Self {
            value,
            diagnostic: None,
        }
    }

    pub fn defaulted(value: T, diagnostic: impl Into<String>) -> Self {
        Self {
            value,
            diagnostic: Some(diagnostic.into()),
        }
    }

    pub fn is_default(&self) -> bool {
        self.diagnostic.is_some()
    }
}

/// Trimmed text of the first match under `node`, or `""`.
pub fn extract_text(node: &ElementRef<'_>, selector: Option<&Selector>) -> String {
    let Some(selector) = selector else {
        return String::new();
    };

    node.select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Attribute of the first match under `node`, or `""`.
pub fn extract_attribute(node: &ElementRef<'_>, selector: Option<&Selector>, attr: &str) -> String {
    let Some(selector) = selector else {
        return String::new();
    };
    if attr.trim().is_empty() {
        return String::new();
    }

    node.select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

/// Strip everything but digits and `.`, then parse. Never fails.
/// "$1,299.99" → 1299.99 | "" → 0
pub fn parse_price(text: &str) -> Decimal {
    let numeric: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if numeric.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(&numeric).unwrap_or(Decimal::ZERO)
}

/// First capture group of `pattern` as an integer, or `default`.
pub fn parse_int(text: &str, pattern: &Regex, default: i32) -> Parsed<i32> {
    match first_capture(text, pattern) {
        Some(raw) => match raw.parse::<i32>() {
            Ok(value) => Parsed::found(value),
            Err(e) => Parsed::defaulted(default, format!("'{}' is not an integer: {}", raw, e)),
        },
        None => Parsed::defaulted(default, format!("no match for /{}/", pattern.as_str())),
    }
}

/// First capture group of `pattern` as a decimal, or `default`.
pub fn parse_decimal(text: &str, pattern: &Regex, default: Decimal) -> Parsed<Decimal> {
    match first_capture(text, pattern) {
        Some(raw) => match Decimal::from_str(raw) {
            Ok(value) => Parsed::found(value),
            Err(e) => Parsed::defaulted(default, format!("'{}' is not a decimal: {}", raw, e)),
        },
        None => Parsed::defaulted(default, format!("no match for /{}/", pattern.as_str())),
    }
}

/// First capture group of `pattern`, trimmed, if it is non-empty.
pub fn capture_text(text: &str, pattern: &Regex) -> Option<String> {
    first_capture(text, pattern)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn first_capture<'t>(text: &'t str, pattern: &Regex) -> Option<&'t str> {
    if text.trim().is_empty() {
        return None;
    }
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(0)))
        .map(|m| m.as_str())
}

/// In stock unless the stock element says otherwise.
pub fn determine_in_stock(node: &ElementRef<'_>, selector: Option<&Selector>) -> bool {
    let Some(selector) = selector else {
        return true;
    };
    let Some(stock) = node.select(selector).next() else {
        return true;
    };

    let text = stock.text().collect::<String>().to_lowercase();
    !text.contains("out of stock") && !text.contains("unavailable")
}

/// Name/value rows from `th/td` or `dt/dd` pairs under each match.
pub fn extract_specifications(node: &ElementRef<'_>, selector: Option<&Selector>) -> Vec<Specification> {
    let Some(selector) = selector else {
        return Vec::new();
    };

    node.select(selector)
        .filter_map(|row| {
            let name = row.select(&TH_OR_DT).next()?.text().collect::<String>();
            let value = row.select(&TD_OR_DD).next()?.text().collect::<String>();
            let (name, value) = (name.trim(), value.trim());
            if name.is_empty() || value.is_empty() {
                return None;
            }
            Some(Specification {
                name: name.to_string(),
                value: value.to_string(),
            })
        })
        .collect()
}
