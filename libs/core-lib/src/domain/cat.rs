use super::breed::Breed;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CatStatus {
    #[default]
    Available,
    /// An approved adoption is waiting to be completed.
    Pending,
    Adopted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
        }
    }
}

/// An adoptable cat. The breed is shared reference data, not owned.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cat {
    pub id: Option<i64>,
    pub name: String,
    pub age: u32,
    pub description: Option<String>,
    pub breed: Option<Arc<Breed>>,
    pub image_url: Option<String>,
    pub gender: Option<Gender>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub status: CatStatus,
    pub tenant_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Cat {
    pub fn new(name: impl Into<String>, breed: Option<Arc<Breed>>) -> Self {
        Self {
            name: name.into(),
            breed,
            ..Self::default()
        }
    }

    pub fn breed_name(&self) -> Option<&str> {
        self.breed.as_deref().map(|b| b.name.as_str())
    }

    pub fn is_available(&self) -> bool {
        self.status == CatStatus::Available
    }

    pub fn on_create(&mut self) {
        let now = Utc::now();
        self.created_at = Some(now);
        self.updated_at = Some(now);
    }

    pub fn on_update(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}
