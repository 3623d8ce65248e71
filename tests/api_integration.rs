use mockito::Matcher;

use movie_feed::api::TmdbClient;
use movie_feed::config::ApiConfig;
use movie_feed::feed::controller::PageFetcher;
use movie_feed::feed::resolver::QueryDescriptor;

fn client_for(server: &mockito::ServerGuard) -> TmdbClient {
    let config = ApiConfig {
        base_url: server.url(),
        read_access_token: "integration-token".to_string(),
        timeout_secs: 5,
    };
    TmdbClient::new(&config).expect("client should build")
}

#[tokio::test]
async fn test_integration_fetch_movie_list() {
    let mut server = mockito::Server::new_async().await;
    let body = r#"{
        "page": 1,
        "results": [
            {"id": 278, "title": "The Shawshank Redemption", "release_date": "1994-09-23", "vote_average": 8.7},
            {"id": 238, "title": "The Godfather", "release_date": "1972-03-14", "vote_average": 8.7}
        ],
        "total_pages": 500,
        "total_results": 10000
    }"#;
    let mock = server
        .mock("GET", "/3/movie/top_rated")
        .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
        .match_header("authorization", "Bearer integration-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let client = client_for(&server);
    let page = client
        .movie_list("top_rated", 1)
        .await
        .expect("Failed to fetch movie list");

    mock.assert_async().await;
    assert_eq!(page.page, 1);
    assert_eq!(page.total_pages, Some(500));
    assert_eq!(page.results.len(), 2);
    assert_eq!(page.results[0].id, 278);
    assert_eq!(
        page.results[0].title,
        Some("The Shawshank Redemption".to_string())
    );
}

#[tokio::test]
async fn test_integration_search_movies() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/3/search/movie")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), "alien".into()),
            Matcher::UrlEncoded("page".into(), "2".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"page": 2, "results": [{"id": 348, "title": "Alien"}]}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let page = client
        .search_movies("alien", 2)
        .await
        .expect("Failed to search movies");

    mock.assert_async().await;
    assert_eq!(page.page, 2);
    assert_eq!(page.results[0].title, Some("Alien".to_string()));
    // Fields TMDB omitted stay at their defaults
    assert_eq!(page.results[0].vote_average, None);
    assert!(page.results[0].genre_ids.is_empty());
}

#[tokio::test]
async fn test_integration_movie_details_and_credits() {
    let mut server = mockito::Server::new_async().await;
    let details_body = r#"{
        "id": 603,
        "title": "The Matrix",
        "tagline": "Welcome to the Real World.",
        "overview": "A computer hacker learns the truth.",
        "runtime": 136,
        "release_date": "1999-03-30",
        "vote_average": 8.2,
        "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}]
    }"#;
    let credits_body = r#"{
        "id": 603,
        "cast": [
            {"id": 6384, "name": "Keanu Reeves", "character": "Neo"},
            {"id": 2975, "name": "Laurence Fishburne", "character": "Morpheus"}
        ]
    }"#;
    let details_mock = server
        .mock("GET", "/3/movie/603")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(details_body)
        .expect(1)
        .create_async()
        .await;
    let credits_mock = server
        .mock("GET", "/3/movie/603/credits")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(credits_body)
        .create_async()
        .await;

    let client = client_for(&server);
    let details = client
        .movie_details(603)
        .await
        .expect("Failed to fetch details");
    assert_eq!(details.runtime, Some(136));
    assert_eq!(details.genres.len(), 2);
    assert_eq!(details.genres[1].name, "Science Fiction");

    // Second lookup is served from the cache
    let again = client
        .movie_details(603)
        .await
        .expect("Failed to fetch details twice");
    assert_eq!(again, details);
    details_mock.assert_async().await;

    let credits = client
        .movie_credits(603)
        .await
        .expect("Failed to fetch credits");
    credits_mock.assert_async().await;
    assert_eq!(credits.cast.len(), 2);
    assert_eq!(credits.cast[0].character, Some("Neo".to_string()));
}

#[tokio::test]
async fn test_integration_recommendations() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/3/movie/603/recommendations")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"page": 1, "results": [{"id": 604, "title": "The Matrix Reloaded"}]}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let page = client
        .movie_recommendations(603)
        .await
        .expect("Failed to fetch recommendations");

    mock.assert_async().await;
    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].id, 604);
}

#[tokio::test]
async fn test_integration_fetch_page_by_descriptor() {
    let mut server = mockito::Server::new_async().await;
    let list_mock = server
        .mock("GET", "/3/movie/popular")
        .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"page": 1, "results": [{"id": 1}]}"#)
        .create_async()
        .await;
    let genre_mock = server
        .mock("GET", "/3/discover/movie")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("with_genres".into(), "18".into()),
            Matcher::UrlEncoded("page".into(), "4".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"page": 4, "results": [{"id": 2}, {"id": 3}]}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let by_category = client
        .fetch_page(&QueryDescriptor::category("popular"), 1)
        .await
        .expect("Failed to fetch by category");
    let by_genre = client
        .fetch_page(&QueryDescriptor::genre("18"), 4)
        .await
        .expect("Failed to fetch by genre");

    list_mock.assert_async().await;
    genre_mock.assert_async().await;
    assert_eq!(by_category.len(), 1);
    assert_eq!(by_genre.len(), 2);
}

#[tokio::test]
async fn test_integration_error_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/3/movie/unknowable")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"status_message": "The resource you requested could not be found."}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let result = client.movie_list("unknowable", 1).await;

    assert!(result.is_err());
    let err_msg = format!("{:#}", result.unwrap_err());
    assert!(err_msg.contains("404"));
}

#[tokio::test]
async fn test_integration_invalid_json() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/3/movie/popular")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("not json at all")
        .create_async()
        .await;

    let client = client_for(&server);
    let result = client.movie_list("popular", 1).await;

    mock.assert_async().await;
    assert!(result.is_err());
    let err_msg = format!("{:#}", result.unwrap_err());
    assert!(err_msg.contains("parse"));
}

#[tokio::test]
async fn test_integration_no_token_sends_no_auth_header() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/3/genre/movie/list")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"genres": []}"#)
        .create_async()
        .await;

    let config = ApiConfig {
        base_url: server.url(),
        read_access_token: String::new(),
        timeout_secs: 5,
    };
    let client = TmdbClient::new(&config).expect("client should build");
    let genres = client.genres().await.expect("Failed to fetch genres");

    mock.assert_async().await;
    assert!(genres.is_empty());
}
