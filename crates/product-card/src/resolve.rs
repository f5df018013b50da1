//! Display values derived from a product record.

use serde_json::Number;

use crate::record::{number_text, ProductRecord, StockIndicator, VariantSource};

/// Title used when a record carries neither a title nor a name.
pub const PLACEHOLDER_TITLE: &str = "Untitled";

/// Values the card shows, computed from a [`ProductRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedDisplay {
    /// Never empty unless the placeholder itself is.
    pub title: String,
    /// Price exactly as given; zero when absent.
    pub price: Number,
    pub in_stock: bool,
    /// Selectable labels, in record order.
    pub variant_options: Vec<String>,
    /// Field the options were taken from.
    pub variant_source: Option<VariantSource>,
}

impl DerivedDisplay {
    /// Whether `label` is one of the current options.
    pub fn offers(&self, label: &str) -> bool {
        self.variant_options.iter().any(|opt| opt == label)
    }

    /// First option, the initial selection.
    pub fn first_option(&self) -> Option<&str> {
        self.variant_options.first().map(String::as_str)
    }

    /// Price as shown after the currency symbol.
    pub fn price_text(&self) -> String {
        number_text(&self.price)
    }
}

/// Derive display values using the stock placeholder title.
pub fn resolve(product: &ProductRecord) -> DerivedDisplay {
    resolve_with(product, PLACEHOLDER_TITLE)
}

/// Derive display values with a custom placeholder title.
pub fn resolve_with(product: &ProductRecord, placeholder_title: &str) -> DerivedDisplay {
    let (variant_source, variant_options) = resolve_variants(product);

    DerivedDisplay {
        title: resolve_title(product, placeholder_title),
        price: product.price().cloned().unwrap_or_else(|| Number::from(0)),
        in_stock: resolve_in_stock(product),
        variant_options,
        variant_source,
    }
}

fn resolve_title(product: &ProductRecord, placeholder_title: &str) -> String {
    product
        .title()
        .or_else(|| product.name())
        .unwrap_or_else(|| placeholder_title.to_string())
}

fn resolve_in_stock(product: &ProductRecord) -> bool {
    match product.stock_indicator() {
        StockIndicator::Flag(flag) => flag,
        StockIndicator::Count(count) => count > 0.0,
        // Unknown stock is treated as available.
        StockIndicator::Unknown => true,
    }
}

fn resolve_variants(product: &ProductRecord) -> (Option<VariantSource>, Vec<String>) {
    VariantSource::PRECEDENCE
        .into_iter()
        .find_map(|source| match product.variant_list(source) {
            Some(labels) if !labels.is_empty() => Some((Some(source), labels)),
            _ => None,
        })
        .unwrap_or((None, Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> ProductRecord {
        ProductRecord::from_value(value).unwrap()
    }

    #[test]
    fn test_title_fallbacks() {
        assert_eq!(resolve(&record(json!({"title": "Shoe", "name": "x"}))).title, "Shoe");
        assert_eq!(resolve(&record(json!({"name": "Boot"}))).title, "Boot");
        assert_eq!(resolve(&record(json!({"title": "", "name": "Boot"}))).title, "Boot");
        assert_eq!(resolve(&record(json!({}))).title, "Untitled");
        assert_eq!(resolve_with(&record(json!({})), "Unnamed").title, "Unnamed");
        assert_eq!(resolve(&record(json!({"title": 0, "name": 12}))).title, "12");
    }

    #[test]
    fn test_price_defaults_to_zero() {
        assert_eq!(resolve(&record(json!({}))).price, Number::from(0));
        assert_eq!(resolve(&record(json!({"price": 0}))).price, Number::from(0));
        assert_eq!(resolve(&record(json!({"price": 19.99}))).price.to_string(), "19.99");
        assert_eq!(resolve(&record(json!({"price": "49"}))).price, Number::from(0));
    }

    #[test]
    fn test_price_text_drops_integral_fraction() {
        assert_eq!(resolve(&record(json!({"price": 49.0}))).price_text(), "49");
        assert_eq!(resolve(&ProductRecord::new().with_price_f64(49.0)).price_text(), "49");
        assert_eq!(resolve(&record(json!({"price": -0.0}))).price_text(), "0");
        assert_eq!(resolve(&record(json!({"price": 19.99}))).price_text(), "19.99");
        assert_eq!(resolve(&record(json!({}))).price_text(), "0");
    }

    #[test]
    fn test_in_stock_rules() {
        assert!(resolve(&record(json!({}))).in_stock);
        assert!(!resolve(&record(json!({"inStock": false, "stock": 5}))).in_stock);
        assert!(resolve(&record(json!({"inStock": true, "stock": 0}))).in_stock);
        assert!(!resolve(&record(json!({"stock": 0}))).in_stock);
        assert!(resolve(&record(json!({"stock": 1}))).in_stock);
        assert!(!resolve(&record(json!({"stock": -2}))).in_stock);
        assert!(resolve(&record(json!({"inStock": "no"}))).in_stock);
    }

    #[test]
    fn test_variant_precedence() {
        let display = resolve(&record(json!({
            "variants": ["S", "M"],
            "sizes": ["8"],
            "options": ["Red"]
        })));
        assert_eq!(display.variant_options, vec!["S", "M"]);
        assert_eq!(display.variant_source, Some(VariantSource::Variants));

        let display = resolve(&record(json!({"sizes": ["8", "9"], "options": ["Red"]})));
        assert_eq!(display.variant_options, vec!["8", "9"]);
        assert_eq!(display.variant_source, Some(VariantSource::Sizes));

        let display = resolve(&record(json!({"options": ["Red", "Red", "Blue"]})));
        assert_eq!(display.variant_options, vec!["Red", "Red", "Blue"]);
    }

    #[test]
    fn test_empty_or_malformed_sources_are_skipped() {
        let display = resolve(&record(json!({
            "variants": [],
            "sizes": "L",
            "options": ["Red"]
        })));
        assert_eq!(display.variant_options, vec!["Red"]);
        assert_eq!(display.variant_source, Some(VariantSource::Options));

        let display = resolve(&record(json!({"variants": {}})));
        assert!(display.variant_options.is_empty());
        assert_eq!(display.variant_source, None);
        assert_eq!(display.first_option(), None);
    }
}
