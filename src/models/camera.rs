use serde::{Deserialize, Serialize};

/// A monitored camera, as listed by the admin console.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Slugs of the objects identified on this camera.
    #[serde(default)]
    pub objects: Vec<String>,
}
