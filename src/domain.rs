use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BffError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Book,
    Food,
    Gadget,
    Other,
}

impl ProductType {
    pub fn parse(raw: &str) -> Option<ProductType> {
        match raw {
            "book" => Some(ProductType::Book),
            "food" => Some(ProductType::Food),
            "gadget" => Some(ProductType::Gadget),
            "other" => Some(ProductType::Other),
            _ => None,
        }
    }
}

/// A product as the backend returns it. Identifiers are assigned by the
/// backend; this layer never mints them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub inventory: i32,
}

/// Validated "create product" payload, ready to forward.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub inventory: i32,
}

/// Validated "create order" payload as received from the client.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrderRequest {
    pub productid: i64,
    pub count: i32,
}

/// The order shape forwarded to the backend. Status is set by this layer,
/// never by the client.
#[derive(Debug, Serialize)]
pub struct NewOrder {
    pub productid: i64,
    pub count: i32,
    pub status: String,
}

impl NewOrder {
    pub fn pending(request: &OrderRequest) -> NewOrder {
        NewOrder {
            productid: request.productid,
            count: request.count,
            status: String::from("pending"),
        }
    }
}

/// Projection of a Product published to the broker topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMessage {
    pub id: i64,
    pub name: String,
    pub inventory: i32,
}

impl From<&Product> for ProductMessage {
    fn from(product: &Product) -> ProductMessage {
        ProductMessage {
            id: product.id,
            name: product.name.clone(),
            inventory: product.inventory,
        }
    }
}

/// Inventory may arrive as a JSON integer or as a string of digits; both
/// must decode to the same integer.
pub fn parse_inventory(raw: &Value) -> Result<i32, String> {
    match raw {
        Value::Number(n) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| format!("invalid inventory value: {}", raw)),
        Value::String(s) => s
            .parse::<i32>()
            .map_err(|_| format!("invalid inventory value: {}", s)),
        other => Err(format!("invalid inventory value: {}", other)),
    }
}

#[derive(Deserialize)]
struct RawNewProduct {
    name: Option<String>,
    #[serde(rename = "type")]
    product_type: Option<String>,
    inventory: Option<Value>,
}

#[derive(Deserialize)]
struct RawOrderRequest {
    productid: Option<i64>,
    count: Option<i32>,
}

impl NewProduct {
    pub fn from_value(payload: &Value) -> Result<NewProduct, BffError> {
        let raw: RawNewProduct = serde_json::from_value(payload.clone())
            .map_err(|e| BffError::Validation(e.to_string()))?;

        let name = match raw.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(BffError::Validation(String::from("name is required"))),
        };

        let product_type = raw
            .product_type
            .as_deref()
            .and_then(ProductType::parse)
            .ok_or_else(|| {
                BffError::Validation(String::from(
                    "type must be one of: book, food, gadget, other",
                ))
            })?;

        let inventory = match raw.inventory {
            Some(value) => parse_inventory(&value).map_err(BffError::Validation)?,
            None => return Err(BffError::Validation(String::from("inventory is required"))),
        };

        if !(1..=101).contains(&inventory) {
            return Err(BffError::Validation(String::from(
                "inventory must be between 1 and 101",
            )));
        }

        Ok(NewProduct {
            name,
            product_type,
            inventory,
        })
    }
}

impl OrderRequest {
    pub fn from_value(payload: &Value) -> Result<OrderRequest, BffError> {
        let raw: RawOrderRequest = serde_json::from_value(payload.clone())
            .map_err(|e| BffError::Validation(e.to_string()))?;

        let productid = match raw.productid {
            Some(id) if id > 0 => id,
            Some(_) => {
                return Err(BffError::Validation(String::from(
                    "productid must be positive",
                )))
            }
            None => return Err(BffError::Validation(String::from("productid is required"))),
        };

        let count = match raw.count {
            Some(count) if count >= 1 => count,
            Some(_) => {
                return Err(BffError::Validation(String::from(
                    "count must be at least 1",
                )))
            }
            None => return Err(BffError::Validation(String::from("count is required"))),
        };

        Ok(OrderRequest { productid, count })
    }
}
