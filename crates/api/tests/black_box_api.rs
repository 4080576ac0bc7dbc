use reqwest::StatusCode;
use serde_json::{Value, json};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build the app (same router as prod), but bind to an ephemeral port.
        let app = refdata_api::app::build_app();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn post_json(client: &reqwest::Client, url: String, body: Value) -> (StatusCode, Value) {
    let res = client.post(url).json(&body).send().await.unwrap();
    let status = res.status();
    (status, res.json().await.unwrap())
}

async fn create_region(client: &reqwest::Client, base: &str) -> String {
    let (status, body) = post_json(
        client,
        format!("{base}/api/regions"),
        json!({ "code": "R05", "name": "Casablanca-Settat" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn create_city(client: &reqwest::Client, base: &str, region_id: &str, code: &str) -> String {
    let (status, body) = post_json(
        client,
        format!("{base}/api/cities"),
        json!({ "region_id": region_id, "code": code, "name": format!("City {code}") }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_endpoint_responds() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn duplicate_bank_code_is_a_conflict() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let base = &server.base_url;

    let (status, _) = post_json(
        &client,
        format!("{base}/api/banks"),
        json!({ "code": "AWB", "name": "Attijariwafa Bank" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_json(
        &client,
        format!("{base}/api/banks"),
        json!({ "code": "AWB", "name": "Another Wannabe Bank" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "duplicate_key");

    let (status, _) = post_json(
        &client,
        format!("{base}/api/banks"),
        json!({ "code": "AWB2", "name": "Attijariwafa Europe" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn city_referenced_by_a_sector_cannot_be_deleted() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let base = &server.base_url;

    let region = create_region(&client, base).await;
    let city = create_city(&client, base, &region, "CAS").await;

    let (status, _) = post_json(
        &client,
        format!("{base}/api/sectors"),
        json!({ "city_id": city, "code": "S01", "name": "Maarif" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let res = client
        .delete(format!("{base}/api/cities/{city}"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "resource_in_use");

    // The city must still be enabled.
    let res = client
        .get(format!("{base}/api/cities/{city}"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["enabled"], true);
}

#[tokio::test]
async fn deleted_city_remains_retrievable_as_disabled() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let base = &server.base_url;

    let region = create_region(&client, base).await;
    let city = create_city(&client, base, &region, "CAS").await;

    let res = client
        .delete(format!("{base}/api/cities/{city}"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{base}/api/cities/{city}"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["enabled"], false);
}

#[tokio::test]
async fn tax_patch_touches_only_the_supplied_field() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let base = &server.base_url;

    let (status, body) = post_json(
        &client,
        format!("{base}/api/taxes"),
        json!({
            "code": "VAT20",
            "code_en": "VAT",
            "code_ar": "ض.ق.م",
            "description": "Standard rate",
            "rate_bps": 2000,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let tax = body["id"].as_str().unwrap().to_string();

    let res = client
        .patch(format!("{base}/api/taxes/{tax}"))
        .json(&json!({ "code": "VAT-STD" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{base}/api/taxes/{tax}"))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "VAT-STD");
    assert_eq!(body["code_en"], "VAT");
    assert_eq!(body["code_ar"], "ض.ق.م");
    assert_eq!(body["description"], "Standard rate");
    assert_eq!(body["rate_bps"], 2000);
}

#[tokio::test]
async fn paged_listing_slices_and_reports_the_total() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let base = &server.base_url;

    let region = create_region(&client, base).await;
    for code in ["CAS", "RBA", "TNG", "FES", "AGA"] {
        create_city(&client, base, &region, code).await;
    }

    let res = client
        .get(format!("{base}/api/cities?page_number=1&page_size=2"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["total_count"], 5);
    assert_eq!(body["page_number"], 1);
    assert_eq!(body["page_size"], 2);
}

#[tokio::test]
async fn bad_paging_is_rejected_up_front() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!(
            "{}/api/cities?page_number=0&page_size=500",
            server.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn validation_reports_every_broken_rule() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) = post_json(
        &client,
        format!("{}/api/banks", server.base_url),
        json!({ "code": "  ", "name": "" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unknown_and_malformed_ids_map_to_the_right_statuses() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let base = &server.base_url;

    let res = client
        .get(format!("{base}/api/banks/not-a-uuid"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let ghost = uuid::Uuid::now_v7();
    let res = client
        .get(format!("{base}/api/banks/{ghost}"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sector_with_a_dead_city_reference_is_rejected() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let ghost = uuid::Uuid::now_v7();
    let (status, body) = post_json(
        &client,
        format!("{}/api/sectors", server.base_url),
        json!({ "city_id": ghost.to_string(), "code": "S01", "name": "Maarif" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "reference_not_found");
}
