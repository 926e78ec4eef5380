use core_lib::{
    BreedRepository,
    adapters::{InMemoryBreedRepository, TheCatApiClient},
};
use httpmock::prelude::*;
use rescue_api::application::breed_import::BreedImporter;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_import_from_cat_api() {
    let server = MockServer::start();
    let breeds_mock = server.mock(|when, then| {
        when.method(GET).path("/breeds");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!([
                {
                    "id": "abys",
                    "name": "Abyssinian",
                    "image": {"id": "0XYvRd7oD", "url": "https://cdn2.thecatapi.com/images/0XYvRd7oD.jpg"}
                },
                {
                    "id": "beng",
                    "name": "Bengal",
                    "reference_image_id": "O3btzLlsO"
                },
                {
                    "id": "sfol",
                    "name": "Scottish Fold"
                }
            ]));
    });

    let client = TheCatApiClient::new(server.base_url(), None).unwrap();
    let repo = Arc::new(InMemoryBreedRepository::default());
    let importer = BreedImporter::new(Arc::new(client), repo.clone());

    let added = importer.import().await.unwrap();

    breeds_mock.assert();
    assert_eq!(added, 3);
    let bengal = repo.find_by_id("beng").await.unwrap().unwrap();
    assert_eq!(
        bengal.image_url.as_deref(),
        Some("https://cdn2.thecatapi.com/images/O3btzLlsO.jpg")
    );
    let fold = repo.find_by_id("sfol").await.unwrap().unwrap();
    assert!(fold.image_url.is_none());
}

#[tokio::test]
async fn test_import_fails_on_server_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/breeds");
        then.status(503);
    });

    let client = TheCatApiClient::new(server.base_url(), None).unwrap();
    let repo = Arc::new(InMemoryBreedRepository::default());
    let importer = BreedImporter::new(Arc::new(client), repo.clone());

    assert!(importer.import().await.is_err());
    assert_eq!(repo.count().await.unwrap(), 0);
}
