use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A widget in the catalogue.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    /// Unique identifier.
    pub id: u64,
    pub display_name: String,
    pub status: Status,
    /// Parts this widget is assembled from.
    pub parts: Vec<Widget>,
    pub owner: Option<Owner>,
    pub labels: HashMap<String, Label>,
    #[serde(skip)]
    pub cache_key: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Draft,
    Active,
    Retired,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
    pub widgets: Vec<Widget>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewWidget {
    pub display_name: String,
    #[serde(default)]
    pub labels: BTreeMap<String, Label>,
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub next: Option<String>,
}
