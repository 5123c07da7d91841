//! Column parsing and row hygiene for the app export.

use std::collections::HashSet;

use tracing::warn;

use super::loader::RawApp;

/// A typed, cleaned app row.
#[derive(Debug, Clone, PartialEq)]
pub struct App {
    pub name: String,
    pub category: String,
    /// Star rating in `[1, 5]`, if the app has one.
    pub rating: Option<f64>,
    pub reviews: Option<u64>,
    /// Download size in megabytes; `None` for "Varies with device".
    pub size_mb: Option<f64>,
    /// Lower bound of the install bracket (`"10,000+"` is `10000`).
    pub installs: f64,
    pub is_free: Option<bool>,
    /// Price in dollars.
    pub price: Option<f64>,
    pub content_rating: String,
    pub genres: Vec<String>,
}

/// Parse an install bracket such as `"1,000,000+"`.
pub fn parse_installs(raw: &str) -> Option<f64> {
    let digits: String = raw
        .trim()
        .trim_end_matches('+')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    digits.parse::<u64>().ok().map(|v| v as f64)
}

/// Parse a price such as `"$4.99"` or `"0"`.
pub fn parse_price(raw: &str) -> Option<f64> {
    let value = raw.trim().trim_start_matches('$').parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Parse a size such as `"19M"` or `"201k"` into megabytes.
pub fn parse_size_mb(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let (number, scale) = if let Some(stripped) = raw.strip_suffix(['M', 'm']) {
        (stripped, 1.0)
    } else if let Some(stripped) = raw.strip_suffix(['k', 'K']) {
        (stripped, 1.0 / 1024.0)
    } else {
        return None;
    };
    let value = number.parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value * scale)
}

/// Parse a review count.
pub fn parse_reviews(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok()
}

/// Parse a star rating, rejecting NaN and values outside `[1, 5]`.
pub fn parse_rating(raw: &str) -> Option<f64> {
    let value = raw.trim().parse::<f64>().ok()?;
    (value.is_finite() && (1.0..=5.0).contains(&value)).then_some(value)
}

fn parse_kind(raw: &str) -> Option<bool> {
    match raw.trim() {
        "Free" => Some(true),
        "Paid" => Some(false),
        _ => None,
    }
}

/// Retype raw rows.
///
/// Rows whose install bracket does not parse are dropped (this also removes
/// rows whose columns are shifted). Repeated app names keep their first row.
pub fn clean_apps(rows: &[RawApp]) -> Vec<App> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(rows.len());
    let mut unparsable = 0usize;
    let mut duplicates = 0usize;
    for row in rows {
        let Some(installs) = parse_installs(&row.installs) else {
            unparsable += 1;
            continue;
        };
        let name = row.app.trim().to_string();
        if !seen.insert(name.clone()) {
            duplicates += 1;
            continue;
        }
        out.push(App {
            name,
            category: row.category.trim().to_string(),
            rating: parse_rating(&row.rating),
            reviews: parse_reviews(&row.reviews),
            size_mb: parse_size_mb(&row.size),
            installs,
            is_free: parse_kind(&row.kind),
            price: parse_price(&row.price),
            content_rating: row.content_rating.trim().to_string(),
            genres: row
                .genres
                .split(';')
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(str::to_string)
                .collect(),
        });
    }
    if unparsable > 0 || duplicates > 0 {
        warn!(
            "Dropped {unparsable} app rows with unparsable installs and {duplicates} duplicate app rows"
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(app: &str, installs: &str) -> RawApp {
        RawApp {
            app: app.to_string(),
            category: "GAME".to_string(),
            rating: "4.5".to_string(),
            reviews: "120".to_string(),
            size: "8.7M".to_string(),
            installs: installs.to_string(),
            kind: "Paid".to_string(),
            price: "$2.99".to_string(),
            content_rating: "Teen".to_string(),
            genres: "Action;Action & Adventure".to_string(),
            ..RawApp::default()
        }
    }

    #[test]
    fn installs_brackets_parse() {
        assert_eq!(parse_installs("10,000+"), Some(10_000.0));
        assert_eq!(parse_installs("1,000,000,000+"), Some(1e9));
        assert_eq!(parse_installs("0"), Some(0.0));
        assert_eq!(parse_installs("Free"), None);
        assert_eq!(parse_installs(""), None);
    }

    #[test]
    fn prices_parse() {
        assert_eq!(parse_price("0"), Some(0.0));
        assert_eq!(parse_price("$4.99"), Some(4.99));
        assert_eq!(parse_price("Everyone"), None);
    }

    #[test]
    fn sizes_parse_to_megabytes() {
        assert_eq!(parse_size_mb("19M"), Some(19.0));
        assert_eq!(parse_size_mb("512k"), Some(0.5));
        assert_eq!(parse_size_mb("Varies with device"), None);
        assert_eq!(parse_size_mb("1,000+"), None);
    }

    #[test]
    fn ratings_outside_range_are_missing() {
        assert_eq!(parse_rating("4.1"), Some(4.1));
        assert_eq!(parse_rating("NaN"), None);
        assert_eq!(parse_rating("19"), None);
        assert_eq!(parse_rating(""), None);
    }

    #[test]
    fn reviews_parse() {
        assert_eq!(parse_reviews("159"), Some(159));
        assert_eq!(parse_reviews("3.0M"), None);
    }

    #[test]
    fn clean_retypes_and_drops_bad_rows() {
        let rows = vec![
            raw("Alpha", "5,000+"),
            raw("Broken", "Free"),
            raw("Alpha", "10+"),
            raw("Beta", "100+"),
        ];
        let apps = clean_apps(&rows);
        assert_eq!(apps.len(), 2);
        let alpha = &apps[0];
        assert_eq!(alpha.name, "Alpha");
        assert_eq!(alpha.installs, 5000.0);
        assert_eq!(alpha.rating, Some(4.5));
        assert_eq!(alpha.reviews, Some(120));
        assert_eq!(alpha.size_mb, Some(8.7));
        assert_eq!(alpha.is_free, Some(false));
        assert_eq!(alpha.price, Some(2.99));
        assert_eq!(alpha.genres, vec!["Action", "Action & Adventure"]);
        assert_eq!(apps[1].name, "Beta");
    }
}
