use serde::{Deserialize, Serialize};

/// Breed reference data, keyed by the external catalogue id (e.g. `abys`).
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breed {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub temperament: Option<String>,
    pub origin: Option<String>,
    pub life_span: Option<String>,
}

impl Breed {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}
