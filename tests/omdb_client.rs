use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use movie_explorer::config::OmdbConfig;
use movie_explorer::{MovieApi, MovieCatalog, MovieError, OmdbClient};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Requests = Arc<Mutex<Vec<HashMap<String, String>>>>;

/// Minimal OMDb stand-in: a handful of fixed titles, the same error payloads
/// as the real service, and a log of every query string received.
async fn fake_omdb(
    State(requests): State<Requests>,
    Query(params): Query<HashMap<String, String>>,
) -> axum::response::Response {
    requests.lock().unwrap().push(params.clone());

    if params.get("apikey").map(String::as_str) != Some("test-key") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "Response": "False", "Error": "Invalid API key!" })),
        )
            .into_response();
    }

    if let Some(query) = params.get("s") {
        return match query.as_str() {
            "Star Wars" => Json(json!({
                "Search": [
                    { "Title": "Star Wars: Episode IV - A New Hope", "Year": "1977", "imdbID": "tt0076759", "Type": "movie", "Poster": "https://img/sw4.jpg" },
                    { "Title": "Star Wars: Episode V - The Empire Strikes Back", "Year": "1980", "imdbID": "tt0080684", "Type": "movie", "Poster": "N/A" }
                ],
                "totalResults": "2",
                "Response": "True"
            }))
            .into_response(),
            "silent" => Json(json!({ "Response": "False" })).into_response(),
            "garbage" => (StatusCode::OK, "<html>oops</html>").into_response(),
            "boom" => (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response(),
            "outage" => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("<html><body>{}</body></html>", "x".repeat(5000)),
            )
                .into_response(),
            _ => Json(json!({ "Response": "False", "Error": "Movie not found!" })).into_response(),
        };
    }

    if let Some(id) = params.get("i") {
        if id == "tt0076759" {
            return Json(json!({
                "Title": "Star Wars: Episode IV - A New Hope",
                "Year": "1977",
                "Rated": "PG",
                "Released": "25 May 1977",
                "Runtime": "121 min",
                "Genre": "Action, Adventure, Fantasy",
                "Director": "George Lucas",
                "Writer": "George Lucas",
                "Actors": "Mark Hamill, Harrison Ford, Carrie Fisher",
                "Plot": "Luke Skywalker joins forces with a Jedi Knight.",
                "Poster": "https://img/sw4.jpg",
                "Ratings": [{ "Source": "Internet Movie Database", "Value": "8.6/10" }],
                "imdbRating": "8.6",
                "imdbID": "tt0076759",
                "Type": "movie",
                "Response": "True"
            }))
            .into_response();
        }
        return Json(json!({ "Response": "False", "Error": "Incorrect IMDb ID." })).into_response();
    }

    (StatusCode::BAD_REQUEST, Json(json!({ "Response": "False", "Error": "No search parameter." })))
        .into_response()
}

async fn spawn_fake_omdb() -> (String, Requests) {
    let requests: Requests = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/", get(fake_omdb))
        .with_state(requests.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake omdb");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake omdb server");
    });
    (format!("http://{addr}/"), requests)
}

fn client(base_url: &str, key: &str) -> OmdbClient {
    let mut config = OmdbConfig::new(base_url, key);
    config.timeout = Duration::from_secs(5);
    OmdbClient::new(&config).expect("client builds")
}

#[tokio::test]
async fn search_issues_one_request_with_query_and_first_page() {
    let (base, requests) = spawn_fake_omdb().await;
    let catalog = MovieCatalog::new(Arc::new(client(&base, "test-key")));

    let result = catalog.search("Star Wars").await.expect("search ok");
    assert!(result.success);
    assert_eq!(result.total_results, 2);
    assert_eq!(result.summaries()[0].imdb_id, "tt0076759");
    assert_eq!(result.summaries()[1].poster, "N/A");

    let seen = requests.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].get("s").map(String::as_str), Some("Star Wars"));
    assert_eq!(seen[0].get("page").map(String::as_str), Some("1"));
    assert_eq!(seen[0].get("apikey").map(String::as_str), Some("test-key"));
}

#[tokio::test]
async fn search_forwards_explicit_page() {
    let (base, requests) = spawn_fake_omdb().await;
    let api = client(&base, "test-key");
    api.search("Star Wars", 4).await.expect("search ok");
    let seen = requests.lock().unwrap().clone();
    assert_eq!(seen[0].get("page").map(String::as_str), Some("4"));
}

#[tokio::test]
async fn not_found_surfaces_remote_message() {
    let (base, _) = spawn_fake_omdb().await;
    let err = client(&base, "test-key")
        .search("qwertyuiop", 1)
        .await
        .unwrap_err();
    assert!(matches!(err, MovieError::Remote { .. }));
    assert_eq!(err.to_string(), "Movie not found!");
}

#[tokio::test]
async fn remote_failure_without_message_uses_fallback() {
    let (base, _) = spawn_fake_omdb().await;
    let err = client(&base, "test-key").search("silent", 1).await.unwrap_err();
    assert_eq!(err.to_string(), "API request failed");
}

#[tokio::test]
async fn rejected_key_is_a_remote_error_despite_401() {
    let (base, _) = spawn_fake_omdb().await;
    let err = client(&base, "wrong").search("Star Wars", 1).await.unwrap_err();
    assert!(matches!(err, MovieError::Remote { .. }));
    assert_eq!(err.to_string(), "Invalid API key!");
}

#[tokio::test]
async fn malformed_body_and_server_errors_are_transport_errors() {
    let (base, _) = spawn_fake_omdb().await;
    let api = client(&base, "test-key");
    let err = api.search("garbage", 1).await.unwrap_err();
    assert!(matches!(err, MovieError::Transport { .. }));
    let err = api.search("boom", 1).await.unwrap_err();
    assert!(matches!(err, MovieError::Transport { .. }));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn large_html_error_page_is_cut_to_a_short_message() {
    let (base, _) = spawn_fake_omdb().await;
    let err = client(&base, "test-key").search("outage", 1).await.unwrap_err();
    assert!(matches!(err, MovieError::Transport { .. }));
    let message = err.to_string();
    assert!(message.contains("503"), "{message}");
    assert!(message.len() < 200, "message too long: {} chars", message.len());
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    let err = client(&format!("http://{addr}/"), "test-key")
        .search("Star Wars", 1)
        .await
        .unwrap_err();
    assert!(matches!(err, MovieError::Transport { .. }));
}

#[tokio::test]
async fn details_request_full_plot_and_decode_fields() {
    let (base, requests) = spawn_fake_omdb().await;
    let detail = client(&base, "test-key")
        .details("tt0076759")
        .await
        .expect("detail ok");
    assert_eq!(detail.summary.title, "Star Wars: Episode IV - A New Hope");
    assert_eq!(detail.director(), Some("George Lucas"));
    assert_eq!(detail.runtime_minutes(), Some(121));
    assert_eq!(detail.rating(), Some(8.6));

    let seen = requests.lock().unwrap().clone();
    assert_eq!(seen[0].get("i").map(String::as_str), Some("tt0076759"));
    assert_eq!(seen[0].get("plot").map(String::as_str), Some("full"));
}

#[tokio::test]
async fn unknown_detail_id_is_remote_error() {
    let (base, _) = spawn_fake_omdb().await;
    let err = client(&base, "test-key").details("tt0000000").await.unwrap_err();
    assert_eq!(err.to_string(), "Incorrect IMDb ID.");
}

#[tokio::test]
async fn genre_label_against_service_returns_empty_on_failure() {
    let (base, requests) = spawn_fake_omdb().await;
    let catalog = MovieCatalog::new(Arc::new(client(&base, "test-key")));
    assert!(catalog.by_genre_label("horror").await.is_empty());
    let seen = requests.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].get("s").map(String::as_str), Some("horror"));
}

#[tokio::test]
async fn search_result_envelope_round_trips_wire_names() {
    let (base, _) = spawn_fake_omdb().await;
    let result = client(&base, "test-key")
        .search("Star Wars", 1)
        .await
        .expect("search ok");
    let value: Value = serde_json::to_value(&result).expect("serialize");
    assert_eq!(value["Response"], "True");
    assert_eq!(value["totalResults"], "2");
    assert_eq!(value["Search"][0]["imdbID"], "tt0076759");
}
