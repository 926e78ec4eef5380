use crate::{
    AdoptionRepository, BreedRepository, CatRepository, CoreError, UserRepository,
    domain::{
        adoption::{Adoption, AdoptionStatus},
        breed::Breed,
        cat::{Cat, CatStatus},
        user::{User, UserRole},
    },
};
use async_trait::async_trait;
use dashmap::{DashMap, mapref::entry::Entry};
use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

/// Entities stored under a generated numeric id.
trait Stored: Clone + Send + Sync + 'static {
    fn id(&self) -> Option<i64>;
    fn set_id(&mut self, id: i64);
    fn on_create(&mut self);
    fn on_update(&mut self);
}

macro_rules! impl_stored {
    ($($entity:ty),*) => {
        $(impl Stored for $entity {
            fn id(&self) -> Option<i64> {
                self.id
            }
            fn set_id(&mut self, id: i64) {
                self.id = Some(id);
            }
            fn on_create(&mut self) {
                <$entity>::on_create(self)
            }
            fn on_update(&mut self) {
                <$entity>::on_update(self)
            }
        })*
    };
}

impl_stored!(User, Cat, Adoption);

/// Thread-safe table with an id sequence; each save touches a single entry.
#[derive(Debug)]
struct Table<T> {
    rows: Arc<DashMap<i64, T>>,
    sequence: Arc<AtomicI64>,
}

impl<T> Clone for Table<T> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            sequence: Arc::clone(&self.sequence),
        }
    }
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Arc::new(DashMap::new()),
            sequence: Arc::new(AtomicI64::new(0)),
        }
    }
}

impl<T: Stored> Table<T> {
    fn count(&self) -> u64 {
        self.rows.len() as u64
    }

    /// All rows ordered by id.
    fn select(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        let mut rows: Vec<T> = self
            .rows
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by_key(|row| row.id());
        rows
    }

    /// Inserts new entities (assigning an id) or replaces existing ones,
    /// running the matching lifecycle hook first.
    fn upsert(&self, mut entity: T) -> T {
        match entity.id() {
            Some(id) if self.rows.contains_key(&id) => entity.on_update(),
            Some(id) => {
                self.sequence.fetch_max(id, Ordering::SeqCst);
                entity.on_create();
            }
            None => {
                let id = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
                entity.set_id(id);
                entity.on_create();
            }
        }
        if let Some(id) = entity.id() {
            self.rows.insert(id, entity.clone());
        }
        entity
    }
}

// --- Users ---

#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    table: Table<User>,
    // Lower-cased email -> user id; the entry is held while a save runs
    emails: Arc<DashMap<String, i64>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn count(&self) -> Result<u64, CoreError> {
        Ok(self.table.count())
    }

    async fn find_all(&self) -> Result<Vec<User>, CoreError> {
        Ok(self.table.select(|_| true))
    }

    async fn find_by_role(&self, role: UserRole) -> Result<Vec<User>, CoreError> {
        Ok(self.table.select(|user| user.role == role))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CoreError> {
        Ok(self
            .table
            .select(|user| user.email.eq_ignore_ascii_case(email))
            .into_iter()
            .next())
    }

    async fn save(&self, user: User) -> Result<User, CoreError> {
        if user.email.is_empty() {
            return Err(CoreError::Validation("User email cannot be empty".into()));
        }
        let key = user.email.to_ascii_lowercase();
        let previous = user.id.and_then(|id| {
            self.table
                .rows
                .get(&id)
                .map(|row| row.email.to_ascii_lowercase())
        });

        // Email is the login name: claim it and write the row as one step
        let saved = match self.emails.entry(key.clone()) {
            Entry::Occupied(claimed) => {
                if user.id != Some(*claimed.get()) {
                    return Err(CoreError::AlreadyExists(user.email));
                }
                self.table.upsert(user)
            }
            Entry::Vacant(free) => {
                let saved = self.table.upsert(user);
                if let Some(id) = saved.id {
                    free.insert(id);
                }
                saved
            }
        };

        if let Some(old) = previous.filter(|old| *old != key) {
            self.emails.remove_if(&old, |_, id| Some(*id) == saved.id);
        }
        Ok(saved)
    }
}

// --- Cats ---

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatRepository {
    table: Table<Cat>,
}

#[async_trait]
impl CatRepository for InMemoryCatRepository {
    async fn count(&self) -> Result<u64, CoreError> {
        Ok(self.table.count())
    }

    async fn find_all(&self) -> Result<Vec<Cat>, CoreError> {
        Ok(self.table.select(|_| true))
    }

    async fn find_by_status(&self, status: CatStatus) -> Result<Vec<Cat>, CoreError> {
        Ok(self.table.select(|cat| cat.status == status))
    }

    async fn save(&self, cat: Cat) -> Result<Cat, CoreError> {
        Ok(self.table.upsert(cat))
    }
}

// --- Adoptions ---

#[derive(Debug, Clone, Default)]
pub struct InMemoryAdoptionRepository {
    table: Table<Adoption>,
}

#[async_trait]
impl AdoptionRepository for InMemoryAdoptionRepository {
    async fn count(&self) -> Result<u64, CoreError> {
        Ok(self.table.count())
    }

    async fn find_all(&self) -> Result<Vec<Adoption>, CoreError> {
        Ok(self.table.select(|_| true))
    }

    async fn find_by_status(&self, status: AdoptionStatus) -> Result<Vec<Adoption>, CoreError> {
        Ok(self.table.select(|adoption| adoption.status == status))
    }

    async fn save(&self, adoption: Adoption) -> Result<Adoption, CoreError> {
        Ok(self.table.upsert(adoption))
    }
}

// --- Breeds ---

/// Breeds are keyed by their catalogue id rather than a sequence.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBreedRepository {
    rows: Arc<DashMap<String, Breed>>,
}

#[async_trait]
impl BreedRepository for InMemoryBreedRepository {
    async fn count(&self) -> Result<u64, CoreError> {
        Ok(self.rows.len() as u64)
    }

    async fn find_all(&self) -> Result<Vec<Breed>, CoreError> {
        let mut breeds: Vec<Breed> = self.rows.iter().map(|e| e.value().clone()).collect();
        breeds.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(breeds)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Breed>, CoreError> {
        Ok(self.rows.get(id).map(|entry| entry.value().clone()))
    }

    async fn save(&self, breed: Breed) -> Result<Breed, CoreError> {
        if breed.id.is_empty() {
            return Err(CoreError::Validation("Breed ID cannot be empty".into()));
        }
        self.rows.insert(breed.id.clone(), breed.clone());
        Ok(breed)
    }
}
