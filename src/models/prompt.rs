use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A model prompt used by the identifier to produce AI identifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompt {
    pub id: Uuid,
    pub name: String,
    pub model: String,
    pub prompt_text: String,
    #[serde(default)]
    pub max_output_token: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub top_k: Option<u32>,
    #[serde(default)]
    pub top_p: Option<f64>,
    /// Slugs of the objects this prompt asks about, in prompt order.
    #[serde(default)]
    pub objects: Vec<String>,
}
