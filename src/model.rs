use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::ApiError;

/// A catalog entry as served by `/products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub certification: String,
    #[serde(default)]
    pub category: String,
}

/// A customer comment attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub product_id: String,
    pub name: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `POST /feedback`. Only constructible through [`FeedbackDraft::new`],
/// so name and message are always trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackDraft {
    product_id: String,
    name: String,
    message: String,
}

impl FeedbackDraft {
    pub fn new(product_id: &str, name: &str, message: &str) -> Result<Self, ApiError> {
        let name = name.trim();
        let message = message.trim();
        if name.is_empty() {
            return Err(ApiError::Validation("Name is required".to_string()));
        }
        if message.is_empty() {
            return Err(ApiError::Validation("Message is required".to_string()));
        }
        Ok(Self {
            product_id: product_id.to_string(),
            name: name.to_string(),
            message: message.to_string(),
        })
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
