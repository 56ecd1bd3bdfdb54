//! Integration tests for the geocoding client and the debounced search
//! controller, against a mock HTTP server.

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skycast_weather::{GeoClient, SearchController, WeatherError};

fn geo_entry(name: &str, state: Option<&str>, country: &str, lat: f64, lon: f64) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "state": state,
        "country": country,
        "lat": lat,
        "lon": lon,
    })
}

#[tokio::test]
async fn search_maps_entries_and_synthesizes_ids() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/direct"))
        .and(query_param("q", "London"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            geo_entry("London", None, "GB", 51.5074, -0.1278),
            geo_entry("London", Some("Ontario"), "CA", 42.9849, -81.2453),
        ])))
        .mount(&mock_server)
        .await;

    let client = GeoClient::with_base_url("test-key", mock_server.uri()).unwrap();
    let suggestions = client.search("London").await.unwrap();

    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0].id, "51.5074_-0.1278");
    assert_eq!(suggestions[0].country, "GB");
    assert!(suggestions[0].state.is_none());
    // Upstream order is preserved
    assert_eq!(suggestions[1].state.as_deref(), Some("Ontario"));
    assert_eq!(suggestions[1].id, "42.9849_-81.2453");
}

#[tokio::test]
async fn short_queries_never_reach_the_network() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = GeoClient::with_base_url("test-key", mock_server.uri()).unwrap();

    assert!(client.search("").await.unwrap().is_empty());
    assert!(client.search("L").await.unwrap().is_empty());
    // Whitespace does not count toward the minimum
    assert!(client.search("  a  ").await.unwrap().is_empty());
}

#[tokio::test]
async fn search_failure_is_an_error_not_a_panic() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/direct"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = GeoClient::with_base_url("test-key", mock_server.uri()).unwrap();
    let result = client.search("London").await;

    assert!(matches!(result, Err(WeatherError::Status(_))));
}

#[tokio::test]
async fn reverse_resolves_coordinates_to_a_named_location() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            geo_entry("Oslo", None, "NO", 59.9139, 10.7522),
        ])))
        .mount(&mock_server)
        .await;

    let client = GeoClient::with_base_url("test-key", mock_server.uri()).unwrap();
    let location = client.reverse(59.9139, 10.7522).await.unwrap();

    assert_eq!(location.id, "59.9139_10.7522");
    assert_eq!(location.name, "Oslo");
    assert_eq!(location.country, "NO");
}

#[tokio::test]
async fn reverse_with_no_match_is_location_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = GeoClient::with_base_url("test-key", mock_server.uri()).unwrap();
    let result = client.reverse(0.0, 0.0).await;

    assert!(matches!(result, Err(WeatherError::LocationNotFound(_))));
}

#[tokio::test]
async fn malformed_location_id_resolves_to_not_found_without_network() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = GeoClient::with_base_url("test-key", mock_server.uri()).unwrap();
    let result = client.resolve_location_id("not_numeric").await;

    assert!(matches!(result, Err(WeatherError::LocationNotFound(_))));
}

#[tokio::test]
async fn controller_debounces_and_publishes_suggestions() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/direct"))
        .and(query_param("q", "Oslo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            geo_entry("Oslo", None, "NO", 59.9139, 10.7522),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Arc::new(GeoClient::with_base_url("test-key", mock_server.uri()).unwrap());
    let controller = SearchController::with_window(client, Duration::from_millis(30));

    // A typing burst: only the final query may produce a request
    controller.set_query("O");
    controller.set_query("Os");
    controller.set_query("Oslo");

    tokio::time::sleep(Duration::from_millis(200)).await;

    let suggestions = controller.suggestions();
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].name, "Oslo");
    assert!(controller.error().is_none());
}

#[tokio::test]
async fn blank_query_clears_without_a_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = Arc::new(GeoClient::with_base_url("test-key", mock_server.uri()).unwrap());
    let controller = SearchController::with_window(client, Duration::from_millis(30));

    // Pending search is superseded by the blank query before the window
    controller.set_query("Oslo");
    controller.set_query("   ");

    tokio::time::sleep(Duration::from_millis(150)).await;

    assert!(controller.suggestions().is_empty());
    assert!(controller.error().is_none());
}

#[tokio::test]
async fn controller_failure_clears_suggestions_and_sets_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/direct"))
        .and(query_param("q", "Oslo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            geo_entry("Oslo", None, "NO", 59.9139, 10.7522),
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/direct"))
        .and(query_param("q", "Bergen"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let client = Arc::new(GeoClient::with_base_url("test-key", mock_server.uri()).unwrap());
    let controller = SearchController::with_window(client, Duration::from_millis(30));

    controller.set_query("Oslo");
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(controller.suggestions().len(), 1);

    controller.set_query("Bergen");
    tokio::time::sleep(Duration::from_millis(150)).await;

    // Stale results are not left behind a failure
    assert!(controller.suggestions().is_empty());
    let message = controller.error().unwrap();
    assert!(message.contains("Failed to search locations"));
}
