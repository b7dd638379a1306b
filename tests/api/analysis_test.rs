use axum::http::StatusCode;
use geosme::modules::settings::model::SystemSettings;
use serde_json::Value;

use crate::common::{api_server, user_token};

#[tokio::test]
async fn competitor_analysis_requires_authentication() {
    let (server, _state) = api_server().await;

    server
        .get("/api/analysis/competitors")
        .add_query_param("businessId", 2)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn competitor_analysis_for_lomi_king() {
    let (server, state) = api_server().await;

    let response = server
        .get("/api/analysis/competitors")
        .authorization_bearer(user_token(&state).await)
        .add_query_param("businessId", 2)
        .add_query_param("radiusKm", 2.0)
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();

    // Bulalo Grill, Tapa ni Aling Nena and Port Eatery; the pending bakery is not counted
    assert_eq!(body["competitorCount"], 3);
    assert_eq!(body["saturation"], "Medium");
    assert_eq!(body["nearest"]["business"]["id"], 3);

    let competitors = body["competitors"].as_array().unwrap();
    assert!(competitors.iter().all(|c| c["business"]["id"] != 2));
    let distances: Vec<f64> = competitors
        .iter()
        .map(|c| c["distanceKm"].as_f64().unwrap())
        .collect();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    assert!(!body["recommendations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn competitor_analysis_uses_default_radius_from_settings() {
    let (server, state) = api_server().await;
    state
        .settings
        .replace(SystemSettings {
            default_search_radius_km: 0.5,
            ..SystemSettings::default()
        })
        .await;

    let body: Value = server
        .get("/api/analysis/competitors")
        .authorization_bearer(user_token(&state).await)
        .add_query_param("businessId", 2)
        .await
        .json();

    assert_eq!(body["radiusKm"], 0.5);
    assert_eq!(body["competitorCount"], 1);
    assert_eq!(body["saturation"], "Low");
}

#[tokio::test]
async fn competitor_analysis_rejects_radius_out_of_range() {
    let (server, state) = api_server().await;
    let token = user_token(&state).await;

    for radius in [0.1, 10.5] {
        let response = server
            .get("/api/analysis/competitors")
            .authorization_bearer(&token)
            .add_query_param("businessId", 2)
            .add_query_param("radiusKm", radius)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["details"][0]["field"], "radiusKm");
    }
}

#[tokio::test]
async fn competitor_analysis_without_coordinates_is_unprocessable() {
    let (server, state) = api_server().await;

    // Lipa Tech Repair has no map pin
    server
        .get("/api/analysis/competitors")
        .authorization_bearer(user_token(&state).await)
        .add_query_param("businessId", 15)
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn competitor_analysis_for_unknown_business_is_not_found() {
    let (server, state) = api_server().await;

    server
        .get("/api/analysis/competitors")
        .authorization_bearer(user_token(&state).await)
        .add_query_param("businessId", 404)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn competitor_analysis_records_metrics() {
    let (server, state) = api_server().await;

    server
        .get("/api/analysis/competitors")
        .authorization_bearer(user_token(&state).await)
        .add_query_param("businessId", 2)
        .add_query_param("radiusKm", 2.0)
        .await
        .assert_status(StatusCode::OK);

    let output = state.metrics.export().unwrap();
    assert!(output.contains("geosme_competitor_analyses_total{saturation=\"Medium\"} 1"));
}

#[tokio::test]
async fn market_trends_summarize_the_directory() {
    let (server, state) = api_server().await;

    let response = server
        .get("/api/analysis/trends")
        .authorization_bearer(user_token(&state).await)
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["totalBusinesses"], 18);
    assert_eq!(body["byMunicipality"]["Taal"], 2);
    assert_eq!(body["topRated"][0]["id"], 8);
    assert!(body["topRated"].as_array().unwrap().len() <= 5);
}
