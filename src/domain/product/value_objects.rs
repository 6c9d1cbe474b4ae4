use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::format_timestamp;

// ============================================================================
// Product Value Objects
// ============================================================================

/// An inventory item record as returned by the ledger's item search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub internal_id: String,
    /// Item name/number in NetSuite; used as the storefront SKU.
    pub item_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub base_price: Option<Decimal>,
    pub last_modified: DateTime<Utc>,
}

/// A product in the shape the storefront imports from `product:import`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductMessage {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub available_on: String,
}

impl From<&CatalogItem> for ProductMessage {
    fn from(item: &CatalogItem) -> Self {
        let name = item
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&item.item_id)
            .to_string();

        Self {
            id: item.internal_id.clone(),
            sku: item.item_id.clone(),
            name,
            description: item.description.clone(),
            price: item.base_price.unwrap_or(Decimal::ZERO),
            available_on: format_timestamp(&item.last_modified),
        }
    }
}

/// Products fetched in one sync, oldest modification first.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductBatch {
    pub products: Vec<ProductMessage>,
    /// Latest modification time in the batch; the next sync cursor.
    pub last_modified: DateTime<Utc>,
}

#[derive(Serialize)]
struct ProductImportPayload<'a> {
    products: &'a [ProductMessage],
}

impl ProductBatch {
    /// `None` when nothing changed since the cursor.
    pub fn from_items(mut items: Vec<CatalogItem>) -> Option<Self> {
        items.sort_by_key(|item| item.last_modified);
        let last_modified = items.last()?.last_modified;

        Some(Self {
            products: items.iter().map(ProductMessage::from).collect(),
            last_modified,
        })
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn import_payload(&self) -> impl Serialize + '_ {
        ProductImportPayload {
            products: &self.products,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item(id: &str, day: u32, display_name: Option<&str>) -> CatalogItem {
        CatalogItem {
            internal_id: format!("ns-{}", id),
            item_id: id.to_string(),
            display_name: display_name.map(str::to_string),
            description: None,
            base_price: Some(Decimal::new(1999, 2)),
            last_modified: Utc.with_ymd_and_hms(2014, 2, day, 8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_empty_items_produce_no_batch() {
        assert!(ProductBatch::from_items(Vec::new()).is_none());
    }

    #[test]
    fn test_batch_sorted_and_cursor_is_max() {
        let batch = ProductBatch::from_items(vec![
            item("B", 14, None),
            item("A", 20, Some("Shirt")),
            item("C", 3, None),
        ])
        .unwrap();

        let skus: Vec<_> = batch.products.iter().map(|p| p.sku.as_str()).collect();
        assert_eq!(skus, vec!["C", "B", "A"]);
        assert_eq!(batch.last_modified, Utc.with_ymd_and_hms(2014, 2, 20, 8, 0, 0).unwrap());
        assert_eq!(batch.len(), 3);
    }

    #[test]
    fn test_name_falls_back_to_item_id() {
        let unnamed = ProductMessage::from(&item("SKU-1", 1, Some("  ")));
        assert_eq!(unnamed.name, "SKU-1");

        let named = ProductMessage::from(&item("SKU-2", 1, Some("Mug")));
        assert_eq!(named.name, "Mug");
        assert_eq!(named.id, "ns-SKU-2");
        assert_eq!(named.available_on, "2014-02-01T08:00:00Z");
    }

    #[test]
    fn test_import_payload_shape() {
        let batch = ProductBatch::from_items(vec![item("A", 1, None)]).unwrap();
        let payload = serde_json::to_value(batch.import_payload()).unwrap();

        assert_eq!(payload["products"][0]["sku"], "A");
        assert_eq!(payload["products"][0]["price"], "19.99");
    }
}
