use crate::{BreedSource, CoreError, domain::breed::Breed};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://api.thecatapi.com/v1";
const IMAGE_CDN: &str = "https://cdn2.thecatapi.com/images";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(thiserror::Error, Debug)]
pub enum CatApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Cat API returned status {0}")]
    Status(u16),
}

// Subset of TheCatAPI breed payload we keep
#[derive(Debug, Deserialize)]
struct BreedDto {
    id: String,
    name: String,
    description: Option<String>,
    temperament: Option<String>,
    origin: Option<String>,
    life_span: Option<String>,
    reference_image_id: Option<String>,
    image: Option<ImageDto>,
}

#[derive(Debug, Deserialize)]
struct ImageDto {
    url: Option<String>,
}

impl From<BreedDto> for Breed {
    fn from(dto: BreedDto) -> Self {
        let image_url = dto.image.and_then(|image| image.url).or_else(|| {
            dto.reference_image_id
                .map(|image_id| format!("{IMAGE_CDN}/{image_id}.jpg"))
        });
        Breed {
            id: dto.id,
            name: dto.name,
            image_url,
            description: dto.description,
            temperament: dto.temperament,
            origin: dto.origin,
            life_span: dto.life_span,
        }
    }
}

/// HTTP client for TheCatAPI breed catalogue.
#[derive(Debug, Clone)]
pub struct TheCatApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl TheCatApiClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, CatApiError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.is_empty()),
        })
    }

    pub async fn list_breeds(&self) -> Result<Vec<Breed>, CatApiError> {
        let url = format!("{}/breeds", self.base_url);
        debug!("Fetching breeds from {}", url);

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatApiError::Status(status.as_u16()));
        }

        let breeds: Vec<BreedDto> = response.json().await?;
        info!("Fetched {} breeds from Cat API", breeds.len());
        Ok(breeds.into_iter().map(Breed::from).collect())
    }
}

#[async_trait]
impl BreedSource for TheCatApiClient {
    async fn fetch_breeds(&self) -> Result<Vec<Breed>, CoreError> {
        Ok(self.list_breeds().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_list_breeds_maps_payload() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/breeds").header("x-api-key", "test-key");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([
                    {
                        "id": "abys",
                        "name": "Abyssinian",
                        "origin": "Egypt",
                        "life_span": "14 - 15",
                        "image": {"id": "0XYvRd7oD", "url": "https://cdn2.thecatapi.com/images/0XYvRd7oD.jpg"}
                    },
                    {
                        "id": "beng",
                        "name": "Bengal",
                        "temperament": "Alert, Agile",
                        "reference_image_id": "O3btzLlsO"
                    },
                    {"id": "xxxx", "name": "No Picture"}
                ]));
        });

        let client = TheCatApiClient::new(server.base_url(), Some("test-key".into())).unwrap();
        let breeds = client.list_breeds().await.unwrap();

        api_mock.assert();
        assert_eq!(breeds.len(), 3);
        assert_eq!(breeds[0].id, "abys");
        assert_eq!(breeds[0].origin.as_deref(), Some("Egypt"));
        assert_eq!(
            breeds[0].image_url.as_deref(),
            Some("https://cdn2.thecatapi.com/images/0XYvRd7oD.jpg")
        );
        assert_eq!(
            breeds[1].image_url.as_deref(),
            Some("https://cdn2.thecatapi.com/images/O3btzLlsO.jpg")
        );
        assert!(breeds[2].image_url.is_none());
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/breeds");
            then.status(503);
        });

        let client = TheCatApiClient::new(format!("{}/", server.base_url()), None).unwrap();
        let result = client.fetch_breeds().await;

        assert!(matches!(result, Err(CoreError::Infrastructure(_))));
        assert!(matches!(
            client.list_breeds().await,
            Err(CatApiError::Status(503))
        ));
    }
}
