use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Slug of the informational object that describes a whole image.
///
/// Its identifications are never queued for review, and it is the only
/// object allowed to offer a `"null"` label.
pub const IMAGE_DESCRIPTION: &str = "image_description";

/// Label value meaning "not applicable".
pub const NULL_LABEL: &str = "null";
pub const TRUE_LABEL: &str = "true";
pub const FALSE_LABEL: &str = "false";

/// A classifiable object type and its valid label set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectDefinition {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl ObjectDefinition {
    pub fn is_image_description(&self) -> bool {
        self.slug == IMAGE_DESCRIPTION || self.name == IMAGE_DESCRIPTION
    }
}

/// One selectable answer for an object type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    pub id: Uuid,
    /// Machine-readable label submitted to the API.
    pub value: String,
    /// Human-readable button caption.
    pub text: String,
    #[serde(default)]
    pub criteria: Option<String>,
    #[serde(default)]
    pub identification_guide: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
}

/// A label flattened out of the catalog, annotated with its owning object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelOption {
    pub object_id: Uuid,
    pub object_name: String,
    pub object_slug: String,
    pub label_id: Uuid,
    pub value: String,
    pub text: String,
    pub criteria: Option<String>,
    pub identification_guide: Option<String>,
}

impl LabelOption {
    fn new(object: &ObjectDefinition, label: &Label) -> Self {
        Self {
            object_id: object.id,
            object_name: object.name.clone(),
            object_slug: object.slug.clone(),
            label_id: label.id,
            value: label.value.clone(),
            text: label.text.clone(),
            criteria: label.criteria.clone(),
            identification_guide: label.identification_guide.clone(),
        }
    }
}

/// Flatten every object's labels into selectable options.
///
/// Labels valued `"null"` are dropped unless they belong to the
/// [`IMAGE_DESCRIPTION`] object. Objects keep catalog order; within an object
/// labels are sorted by `order`, and unordered labels follow in catalog order.
pub fn derive_label_options(objects: &[ObjectDefinition]) -> Vec<LabelOption> {
    objects
        .iter()
        .flat_map(|object| {
            let mut labels: Vec<&Label> = object
                .labels
                .iter()
                .filter(|label| label.value != NULL_LABEL || object.is_image_description())
                .collect();
            labels.sort_by_key(|label| label.order.unwrap_or(i32::MAX));
            labels
                .into_iter()
                .map(move |label| LabelOption::new(object, label))
        })
        .collect()
}
