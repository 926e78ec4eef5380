//! Sample data for a fresh installation.
//!
//! Each table is seeded only while it is empty, so running the initializer on
//! every start is safe. Breeds are never seeded here; they come from the breed
//! import and everything else is skipped until at least one is stored.

use chrono::{DateTime, Duration, Utc};
use core_lib::{
    AdoptionRepository, BreedRepository, CatRepository, CoreError, PasswordEncoder,
    UserRepository,
    domain::{
        adoption::{Adoption, AdoptionStatus},
        breed::Breed,
        cat::{Cat, CatStatus, Gender},
        user::{User, UserRole},
    },
};
use std::sync::Arc;
use tracing::{info, warn};

pub const DEFAULT_TENANT: &str = "main";
pub const SAMPLE_CAT_COUNT: usize = 24;

const ADMIN_EMAIL: &str = "admin@werescuecats.io";
const ADMIN_PASSWORD: &str = "admin123";
const USER_PASSWORD: &str = "password123";

// Dresden city centre
const BASE_LATITUDE: f64 = 51.0504;
const BASE_LONGITUDE: f64 = 13.7373;

struct SampleUser {
    email: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    street: &'static str,
    postal_code: &'static str,
}

const SAMPLE_USERS: [SampleUser; 5] = [
    SampleUser {
        email: "john.doe@example.com",
        first_name: "John",
        last_name: "Doe",
        street: "Prager Straße 12",
        postal_code: "01069",
    },
    SampleUser {
        email: "jane.smith@example.com",
        first_name: "Jane",
        last_name: "Smith",
        street: "Königsbrücker Straße 45",
        postal_code: "01099",
    },
    SampleUser {
        email: "max.mueller@example.com",
        first_name: "Max",
        last_name: "Müller",
        street: "Bautzner Straße 8",
        postal_code: "01099",
    },
    SampleUser {
        email: "anna.schmidt@example.com",
        first_name: "Anna",
        last_name: "Schmidt",
        street: "Hauptstraße 21",
        postal_code: "01097",
    },
    SampleUser {
        email: "lukas.weber@example.com",
        first_name: "Lukas",
        last_name: "Weber",
        street: "Schandauer Straße 64",
        postal_code: "01277",
    },
];

const CAT_NAMES: [&str; SAMPLE_CAT_COUNT] = [
    "Whiskers", "Luna", "Oliver", "Bella", "Max", "Charlie", "Lucy", "Leo", "Milo", "Nala",
    "Simba", "Chloe", "Tiger", "Lily", "Oscar", "Sophie", "Felix", "Cleo", "Jasper", "Mia",
    "Shadow", "Pepper", "Smokey", "Ginger",
];

const CAT_ADDRESSES: [&str; 6] = [
    "Altmarkt 1, 01067 Dresden",
    "Alaunstraße 30, 01099 Dresden",
    "Wallstraße 5, 01067 Dresden",
    "Bischofsweg 60, 01099 Dresden",
    "Tolkewitzer Straße 2, 01277 Dresden",
    "Kesselsdorfer Straße 80, 01159 Dresden",
];

/// One scripted application: which user (by index) applies, how long ago, and
/// how far through the lifecycle it has moved since.
struct AdoptionFixture {
    user_index: usize,
    applied_days_ago: i64,
    outcome: AdoptionStatus,
    notes: &'static str,
    admin_notes: Option<&'static str>,
}

const ADOPTION_FIXTURES: [AdoptionFixture; 6] = [
    AdoptionFixture {
        user_index: 0,
        applied_days_ago: 3,
        outcome: AdoptionStatus::Pending,
        notes: "We have a quiet flat and lots of time at home.",
        admin_notes: None,
    },
    AdoptionFixture {
        user_index: 1,
        applied_days_ago: 12,
        outcome: AdoptionStatus::Approved,
        notes: "Experienced with cats, garden is fenced.",
        admin_notes: Some("Home visit went well."),
    },
    AdoptionFixture {
        user_index: 2,
        applied_days_ago: 40,
        outcome: AdoptionStatus::Completed,
        notes: "Looking for a companion for our older cat.",
        admin_notes: Some("Handover done, follow-up call scheduled."),
    },
    AdoptionFixture {
        user_index: 3,
        applied_days_ago: 20,
        outcome: AdoptionStatus::Rejected,
        notes: "First cat, living in a shared flat.",
        admin_notes: Some("Landlord does not allow pets."),
    },
    AdoptionFixture {
        user_index: 4,
        applied_days_ago: 9,
        outcome: AdoptionStatus::Cancelled,
        notes: "Would love an indoor cat.",
        admin_notes: None,
    },
    AdoptionFixture {
        user_index: 0,
        applied_days_ago: 1,
        outcome: AdoptionStatus::Pending,
        notes: "Second application for a playmate.",
        admin_notes: None,
    },
];

const APPROVAL_DELAY_DAYS: i64 = 2;
const COMPLETION_DELAY_DAYS: i64 = 7;

/// Rows written by one [`DataInitializer::initialize_data`] run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub cats: usize,
    pub adoptions: usize,
}

pub struct DataInitializer {
    users: Arc<dyn UserRepository>,
    cats: Arc<dyn CatRepository>,
    breeds: Arc<dyn BreedRepository>,
    adoptions: Arc<dyn AdoptionRepository>,
    passwords: Arc<dyn PasswordEncoder>,
}

impl DataInitializer {
    pub fn new(
        users: Arc<dyn UserRepository>,
        cats: Arc<dyn CatRepository>,
        breeds: Arc<dyn BreedRepository>,
        adoptions: Arc<dyn AdoptionRepository>,
        passwords: Arc<dyn PasswordEncoder>,
    ) -> Self {
        Self {
            users,
            cats,
            breeds,
            adoptions,
            passwords,
        }
    }

    pub async fn initialize_data(&self) -> Result<SeedReport, CoreError> {
        if self.breeds.count().await? == 0 {
            warn!("No breeds stored yet, skipping sample data initialization");
            return Ok(SeedReport::default());
        }

        let mut report = SeedReport::default();

        if self.users.count().await? == 0 {
            report.users = self.seed_users().await?;
        } else {
            info!("Users already present, skipping sample users");
        }

        if self.cats.count().await? == 0 {
            let breeds = self.breeds.find_all().await?;
            report.cats = self.seed_cats(&breeds).await?;
        } else {
            info!("Cats already present, skipping sample cats");
        }

        if self.adoptions.count().await? == 0 {
            report.adoptions = self.seed_adoptions().await?;
        } else {
            info!("Adoptions already present, skipping sample adoptions");
        }

        info!(
            users = report.users,
            cats = report.cats,
            adoptions = report.adoptions,
            "Sample data initialization finished"
        );
        Ok(report)
    }

    /// One admin followed by the regular sample users.
    pub async fn seed_users(&self) -> Result<usize, CoreError> {
        let mut admin = User::new(ADMIN_EMAIL, "Admin", "User", UserRole::Admin);
        admin.password_hash = self.passwords.encode(ADMIN_PASSWORD)?;
        admin.tenant_id = Some(DEFAULT_TENANT.to_string());
        admin.street_address = Some("Theaterplatz 2".to_string());
        admin.city = Some("Dresden".to_string());
        admin.postal_code = Some("01067".to_string());
        self.users.save(admin).await?;

        for sample in &SAMPLE_USERS {
            let mut user = User::new(
                sample.email,
                sample.first_name,
                sample.last_name,
                UserRole::User,
            );
            user.password_hash = self.passwords.encode(USER_PASSWORD)?;
            user.tenant_id = Some(DEFAULT_TENANT.to_string());
            user.street_address = Some(sample.street.to_string());
            user.city = Some("Dresden".to_string());
            user.postal_code = Some(sample.postal_code.to_string());
            self.users.save(user).await?;
        }

        let created = SAMPLE_USERS.len() + 1;
        info!("Created {} sample users (1 admin)", created);
        Ok(created)
    }

    /// Spreads [`SAMPLE_CAT_COUNT`] cats over `breeds` round-robin. Does nothing
    /// when `breeds` is empty.
    pub async fn seed_cats(&self, breeds: &[Breed]) -> Result<usize, CoreError> {
        if breeds.is_empty() {
            warn!("No breeds available, skipping sample cats");
            return Ok(0);
        }
        let breeds: Vec<Arc<Breed>> = breeds.iter().cloned().map(Arc::new).collect();

        for (i, name) in CAT_NAMES.iter().enumerate() {
            let breed = Arc::clone(&breeds[i % breeds.len()]);
            self.cats.save(sample_cat(i, name, breed)).await?;
        }

        info!("Created {} sample cats", CAT_NAMES.len());
        Ok(CAT_NAMES.len())
    }

    /// Walks each fixture through the lifecycle with back-dated timestamps.
    /// Skips when there are no regular users, no admins or no available cats.
    pub async fn seed_adoptions(&self) -> Result<usize, CoreError> {
        let users = self.users.find_by_role(UserRole::User).await?;
        let admins = self.users.find_by_role(UserRole::Admin).await?;
        let cats = self.cats.find_by_status(CatStatus::Available).await?;

        if users.is_empty() || admins.is_empty() || cats.is_empty() {
            warn!(
                users = users.len(),
                admins = admins.len(),
                available_cats = cats.len(),
                "Not enough data for sample adoptions, skipping"
            );
            return Ok(0);
        }

        let users: Vec<Arc<User>> = users.into_iter().map(Arc::new).collect();
        let admin = Arc::new(admins[0].clone());
        let now = Utc::now();

        let mut created = 0;
        for (fixture, cat) in ADOPTION_FIXTURES.iter().zip(cats) {
            let user = Arc::clone(&users[fixture.user_index % users.len()]);
            let adoption = self
                .run_fixture(fixture, user, cat, Arc::clone(&admin), now)
                .await?;
            self.adoptions.save(adoption).await?;
            created += 1;
        }

        info!("Created {} sample adoptions", created);
        Ok(created)
    }

    async fn run_fixture(
        &self,
        fixture: &AdoptionFixture,
        user: Arc<User>,
        mut cat: Cat,
        admin: Arc<User>,
        now: DateTime<Utc>,
    ) -> Result<Adoption, CoreError> {
        let applied_at = now - Duration::days(fixture.applied_days_ago);
        let decided_at = applied_at + Duration::days(APPROVAL_DELAY_DAYS);
        let completed_at = applied_at + Duration::days(COMPLETION_DELAY_DAYS);
        let admin_notes = fixture.admin_notes.map(str::to_string);

        let mut adoption = Adoption::new(
            user,
            Arc::new(cat.clone()),
            Some(fixture.notes.to_string()),
        );
        adoption.adoption_date = Some(applied_at);
        adoption.tenant_id = Some(DEFAULT_TENANT.to_string());

        match fixture.outcome {
            AdoptionStatus::Pending => {}
            AdoptionStatus::Approved => {
                adoption.approve(admin, admin_notes, decided_at)?;
                cat.status = CatStatus::Pending;
            }
            AdoptionStatus::Completed => {
                adoption.approve(admin, admin_notes, decided_at)?;
                adoption.complete(completed_at)?;
                cat.status = CatStatus::Adopted;
            }
            AdoptionStatus::Rejected => adoption.reject(admin, admin_notes, decided_at)?,
            AdoptionStatus::Cancelled => adoption.cancel(decided_at)?,
        }

        if cat.status != CatStatus::Available {
            let cat = self.cats.save(cat).await?;
            adoption.cat = Some(Arc::new(cat));
        }
        Ok(adoption)
    }
}

fn sample_cat(index: usize, name: &str, breed: Arc<Breed>) -> Cat {
    let age = (index * 3 % 8) as u32 + 1;
    let gender = if index % 2 == 0 {
        Gender::Female
    } else {
        Gender::Male
    };
    // Small deterministic offsets keep every cat inside the Dresden area
    let latitude = BASE_LATITUDE + ((index % 6) as f64 - 2.5) * 0.04;
    let longitude = BASE_LONGITUDE + ((index % 4) as f64 - 1.5) * 0.07;

    let mut cat = Cat::new(name, Some(Arc::clone(&breed)));
    cat.age = age;
    cat.description = Some(format!(
        "{name} is a {age} year old {} looking for a loving home.",
        breed.name
    ));
    cat.image_url = breed.image_url.clone();
    cat.gender = Some(gender);
    cat.latitude = Some(latitude);
    cat.longitude = Some(longitude);
    cat.address = Some(CAT_ADDRESSES[index % CAT_ADDRESSES.len()].to_string());
    cat.status = if index % 5 == 4 {
        CatStatus::Adopted
    } else {
        CatStatus::Available
    };
    cat.tenant_id = Some(DEFAULT_TENANT.to_string());
    cat
}
