//! Product catalog types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product as returned by the listing, search, and lookup endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_discounted_price: Option<String>,
    #[serde(default)]
    pub in_stock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Result of a search-index sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    #[serde(default)]
    pub indexed: u64,
    #[serde(default)]
    pub removed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn camel_case_catalog_fields() {
        let product: ProductSummary = serde_json::from_value(json!({
            "id": "p-1",
            "name": "Linen Shirt",
            "slug": "linen-shirt",
            "price": 1499.00,
            "formattedPrice": "₹1,499.00",
            "formattedDiscountedPrice": "₹1,199.00",
            "inStock": true
        }))
        .unwrap();
        assert!(product.in_stock);
        assert_eq!(product.price, Some(Decimal::new(1499, 0)));
        assert_eq!(product.formatted_discounted_price.as_deref(), Some("₹1,199.00"));

        let value = serde_json::to_value(&product).unwrap();
        assert!(value.get("imageUrl").is_none());
        assert_eq!(value["inStock"], true);
    }
}
