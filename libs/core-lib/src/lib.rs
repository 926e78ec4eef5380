use async_trait::async_trait;
use std::error::Error as StdError;

// Declare modules
pub mod adapters;
pub mod domain;

use domain::{
    adoption::{Adoption, AdoptionStatus},
    breed::Breed,
    cat::{Cat, CatStatus},
    user::{User, UserRole},
};

// Define a common error type for the core library
#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error("Entity not found: {0}")]
    NotFound(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Entity already exists: {0}")]
    AlreadyExists(String),
    #[error("Infrastructure error: {0}")]
    Infrastructure(#[from] Box<dyn StdError + Send + Sync>),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

// Lets '?' turn lifecycle violations into CoreError in services
impl From<domain::adoption::AdoptionError> for CoreError {
    fn from(err: domain::adoption::AdoptionError) -> Self {
        match err {
            domain::adoption::AdoptionError::InvalidTransition { .. } => {
                CoreError::Validation(err.to_string())
            }
        }
    }
}

impl From<adapters::cat_api::CatApiError> for CoreError {
    fn from(err: adapters::cat_api::CatApiError) -> Self {
        CoreError::Infrastructure(Box::new(err))
    }
}

/// Anything that can be authenticated and carried as a token subject.
pub trait Principal {
    fn username(&self) -> &str;
}

// --- Persistence ports ---
// `save` assigns an id to new entities, runs the entity's create/update hook
// and returns the stored copy.

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn count(&self) -> Result<u64, CoreError>;
    async fn find_all(&self) -> Result<Vec<User>, CoreError>;
    async fn find_by_role(&self, role: UserRole) -> Result<Vec<User>, CoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CoreError>;
    async fn save(&self, user: User) -> Result<User, CoreError>;
}

#[async_trait]
pub trait CatRepository: Send + Sync {
    async fn count(&self) -> Result<u64, CoreError>;
    async fn find_all(&self) -> Result<Vec<Cat>, CoreError>;
    async fn find_by_status(&self, status: CatStatus) -> Result<Vec<Cat>, CoreError>;
    async fn save(&self, cat: Cat) -> Result<Cat, CoreError>;
}

#[async_trait]
pub trait BreedRepository: Send + Sync {
    async fn count(&self) -> Result<u64, CoreError>;
    async fn find_all(&self) -> Result<Vec<Breed>, CoreError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Breed>, CoreError>;
    async fn save(&self, breed: Breed) -> Result<Breed, CoreError>;
}

#[async_trait]
pub trait AdoptionRepository: Send + Sync {
    async fn count(&self) -> Result<u64, CoreError>;
    async fn find_all(&self) -> Result<Vec<Adoption>, CoreError>;
    async fn find_by_status(&self, status: AdoptionStatus) -> Result<Vec<Adoption>, CoreError>;
    async fn save(&self, adoption: Adoption) -> Result<Adoption, CoreError>;
}

// Port for fetching breed reference data from an external catalogue
#[async_trait]
pub trait BreedSource: Send + Sync {
    async fn fetch_breeds(&self) -> Result<Vec<Breed>, CoreError>;
}

// Port for one-way password hashing. The hashing policy belongs to the adapter.
pub trait PasswordEncoder: Send + Sync {
    fn encode(&self, raw_password: &str) -> Result<String, CoreError>;
    fn matches(&self, raw_password: &str, encoded: &str) -> bool;
}
