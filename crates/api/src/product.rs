use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque store-assigned identifier, unique and never reused.
pub type ProductId = Uuid;

/// A stored product record: the store-assigned id plus the user fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(flatten)]
    pub spec: ProductSpec,
}

impl Product {
    pub const fn new(id: ProductId, spec: ProductSpec) -> Self {
        Self { id, spec }
    }
}

/// The user fields of a product, with the wire names the collection
/// has always used.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductSpec {
    pub product_code: String,
    pub product_name: String,
    pub product_date: NaiveDate,
    pub product_origin_price: f64,
    pub quantity: i64,
    pub product_store_code: String,
}

/// A typed field subset, used as the only request-body shape: a create
/// requires all fields ([`ProductPatch::build`]), an update replaces the
/// supplied ones ([`ProductPatch::apply`]). Unknown fields are rejected
/// at the boundary.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_origin_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_store_code: Option<String>,
}

impl From<ProductSpec> for ProductPatch {
    fn from(spec: ProductSpec) -> Self {
        let ProductSpec {
            product_code,
            product_name,
            product_date,
            product_origin_price,
            quantity,
            product_store_code,
        } = spec;

        Self {
            product_code: Some(product_code),
            product_name: Some(product_name),
            product_date: Some(product_date),
            product_origin_price: Some(product_origin_price),
            quantity: Some(quantity),
            product_store_code: Some(product_store_code),
        }
    }
}

impl ProductPatch {
    pub fn build(self) -> Result<ProductSpec> {
        Ok(ProductSpec {
            product_code: require(self.product_code, "ProductCode")?,
            product_name: require(self.product_name, "ProductName")?,
            product_date: require(self.product_date, "ProductDate")?,
            product_origin_price: require(self.product_origin_price, "ProductOriginPrice")?,
            quantity: require(self.quantity, "Quantity")?,
            product_store_code: require(self.product_store_code, "ProductStoreCode")?,
        })
    }

    pub fn apply(self, spec: &mut ProductSpec) {
        let Self {
            product_code,
            product_name,
            product_date,
            product_origin_price,
            quantity,
            product_store_code,
        } = self;

        if let Some(product_code) = product_code {
            spec.product_code = product_code;
        }
        if let Some(product_name) = product_name {
            spec.product_name = product_name;
        }
        if let Some(product_date) = product_date {
            spec.product_date = product_date;
        }
        if let Some(product_origin_price) = product_origin_price {
            spec.product_origin_price = product_origin_price;
        }
        if let Some(quantity) = quantity {
            spec.quantity = quantity;
        }
        if let Some(product_store_code) = product_store_code {
            spec.product_store_code = product_store_code;
        }
    }
}

fn require<T>(field: Option<T>, name: &str) -> Result<T> {
    match field {
        Some(field) => Ok(field),
        None => bail!("missing required field: {name}"),
    }
}
