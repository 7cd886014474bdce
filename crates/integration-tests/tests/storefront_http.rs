//! HTTP routes of a running storefront.
//!
//! These tests require:
//! - The storefront running (cargo run -p jm-games-storefront)
//! - A valid `RAWG_API_KEY` in its environment
//!
//! Run with: cargo test -p jm-games-integration-tests -- --ignored

use jm_games_integration_tests::storefront_base_url;
use reqwest::{Client, StatusCode};

fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

#[tokio::test]
#[ignore = "Requires running storefront"]
async fn test_health() {
    let resp = client()
        .get(format!("{}/health", storefront_base_url()))
        .send()
        .await
        .expect("Failed to reach storefront");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("Failed to read body"), "ok");
}

#[tokio::test]
#[ignore = "Requires running storefront and RAWG credentials"]
async fn test_catalog_page_renders() {
    let resp = client()
        .get(storefront_base_url())
        .send()
        .await
        .expect("Failed to get catalog page");

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("content-security-policy"));
    assert!(resp.headers().contains_key("x-request-id"));
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("id=\"results\""));
    assert!(body.contains("id=\"cart-count\""));
}

#[tokio::test]
#[ignore = "Requires running storefront"]
async fn test_add_to_cart_triggers_refresh() {
    let base_url = storefront_base_url();
    let resp = client()
        .post(format!("{base_url}/cart/add"))
        .form(&[("id", "3498"), ("name", "GTA V"), ("price", "148.00")])
        .send()
        .await
        .expect("Failed to add to cart");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("hx-trigger").and_then(|v| v.to_str().ok()),
        Some("cart-updated")
    );

    let _ = client().post(format!("{base_url}/cart/clear")).send().await;
}

#[tokio::test]
#[ignore = "Requires running storefront"]
async fn test_invalid_favorite_keeps_button() {
    let resp = client()
        .post(format!("{}/favorites/toggle", storefront_base_url()))
        .form(&[("id", "3498"), ("name", "GTA V"), ("price", "abc")])
        .send()
        .await
        .expect("Failed to toggle favorite");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("hx-reswap").and_then(|v| v.to_str().ok()),
        Some("none")
    );
}

#[tokio::test]
#[ignore = "Requires running storefront"]
async fn test_detail_without_id_is_bad_request() {
    let resp = client()
        .get(format!("{}/games", storefront_base_url()))
        .send()
        .await
        .expect("Failed to get detail page");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("ID do jogo não especificado."));
}
