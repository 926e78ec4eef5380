// Declare modules within the adapters directory
pub mod cat_api;
pub mod in_memory_repository;

pub use cat_api::TheCatApiClient;
pub use in_memory_repository::{
    InMemoryAdoptionRepository, InMemoryBreedRepository, InMemoryCatRepository,
    InMemoryUserRepository,
};
