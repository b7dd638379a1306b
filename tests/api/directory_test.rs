use axum::http::StatusCode;
use geosme::modules::settings::model::SystemSettings;
use serde_json::Value;

use crate::common::offline_server;

fn ids(body: &Value) -> Vec<u64> {
    body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_u64().unwrap())
        .collect()
}

#[tokio::test]
async fn feed_lists_only_approved_businesses() {
    let (server, _state) = offline_server().await;

    let response = server.get("/api/businesses").add_query_param("limit", 100).await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["total"], 14);
    assert!(body["items"]
        .as_array()
        .unwrap()
        .iter()
        .all(|b| b["status"] == "approved"));
}

#[tokio::test]
async fn feed_ignores_status_filter() {
    let (server, _state) = offline_server().await;

    let body: Value = server
        .get("/api/businesses")
        .add_query_param("status", "pending")
        .await
        .json();

    assert_eq!(body["total"], 14);
}

#[tokio::test]
async fn feed_paginates_with_default_page_size() {
    let (server, _state) = offline_server().await;

    let first: Value = server.get("/api/businesses").await.json();
    assert_eq!(first["items"].as_array().unwrap().len(), 12);
    assert_eq!(first["page"], 1);
    assert_eq!(first["totalPages"], 2);

    let second: Value = server.get("/api/businesses").add_query_param("page", 2).await.json();
    assert_eq!(second["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn feed_filters_by_municipality_and_category() {
    let (server, _state) = offline_server().await;

    let taal: Value = server
        .get("/api/businesses")
        .add_query_param("municipality", "Taal")
        .await
        .json();
    assert_eq!(taal["total"], 2);

    let tourism: Value = server
        .get("/api/businesses")
        .add_query_param("category", "Tourism")
        .await
        .json();
    // San Juan Surf & Stay is rejected
    assert_eq!(ids(&tourism), vec![8]);
}

#[tokio::test]
async fn feed_searches_names() {
    let (server, _state) = offline_server().await;

    let body: Value = server.get("/api/businesses").add_query_param("search", "lomi").await.json();
    assert!(ids(&body).contains(&2));
}

#[tokio::test]
async fn feed_filters_by_payment_method() {
    let (server, _state) = offline_server().await;

    let body: Value = server
        .get("/api/businesses")
        .add_query_param("paymentMethod", "maya")
        .add_query_param("sort", "name")
        .await
        .json();

    assert_eq!(ids(&body), vec![3, 12, 17]);
}

#[tokio::test]
async fn feed_sorts_by_rating_with_minimum() {
    let (server, _state) = offline_server().await;

    let body: Value = server
        .get("/api/businesses")
        .add_query_param("minRating", 4.5)
        .add_query_param("sort", "rating")
        .await
        .json();

    assert_eq!(ids(&body), vec![8, 6, 1, 7, 2]);
}

#[tokio::test]
async fn feed_rejects_bad_filters() {
    let (server, _state) = offline_server().await;

    server
        .get("/api/businesses")
        .add_query_param("minRating", 7)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .get("/api/businesses")
        .add_query_param("sort", "popularity")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn business_detail_hides_unapproved_listings() {
    let (server, _state) = offline_server().await;

    let response = server.get("/api/businesses/2").await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["business"]["name"], "Lomi King Batangas");

    server.get("/api/businesses/5").await.assert_status(StatusCode::NOT_FOUND);
    server.get("/api/businesses/999").await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn business_reviews_show_visible_newest_first() {
    let (server, _state) = offline_server().await;

    let reviews: Value = server.get("/api/businesses/2/reviews").await.json();
    let review_ids: Vec<u64> = reviews
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_u64().unwrap())
        .collect();
    assert_eq!(review_ids, vec![3, 2]);

    // The only review on #4 is flagged
    let flagged: Value = server.get("/api/businesses/4/reviews").await.json();
    assert!(flagged.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn facets_cover_approved_listings_only() {
    let (server, _state) = offline_server().await;

    let body: Value = server.get("/api/directory/facets").await.json();
    let municipalities: Vec<&str> = body["municipalities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m.as_str().unwrap())
        .collect();

    assert!(municipalities.contains(&"Lipa City"));
    assert!(!municipalities.contains(&"Nasugbu"));
    assert!(!municipalities.contains(&"San Juan"));
    assert!(body["categories"].as_array().unwrap().iter().any(|c| c == "Tourism"));
}

#[tokio::test]
async fn maintenance_mode_closes_the_public_directory() {
    let (server, state) = offline_server().await;
    state
        .settings
        .replace(SystemSettings {
            maintenance_mode: true,
            ..SystemSettings::default()
        })
        .await;

    let response = server.get("/api/businesses").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["error"], "Service is under maintenance");

    server.get("/health").await.assert_status(StatusCode::OK);
}
