//! Integration tests for OpenWeatherProvider using wiremock.

use weather_core::{
    CityName, Endpoint, FetchError, Language, WeatherProvider, WeatherQuery, WeatherReport,
    provider::openweather::OpenWeatherProvider,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::new("TEST_KEY".to_string()).with_urls(
        format!("{}/data/2.5/weather", server.uri()),
        format!("{}/data/2.5/forecast", server.uri()),
    )
}

fn query(city: &str, language: Language, endpoint: Endpoint) -> WeatherQuery {
    WeatherQuery {
        city: CityName::try_from(city).unwrap(),
        language,
        endpoint,
    }
}

fn slot(dt: i64, dt_txt: &str, description: &str, temp: f64) -> serde_json::Value {
    serde_json::json!({
        "dt": dt,
        "dt_txt": dt_txt,
        "weather": [{ "description": description }],
        "main": { "temp": temp, "temp_min": temp - 1.0, "temp_max": temp + 1.0, "humidity": 60 }
    })
}

#[tokio::test]
async fn test_current_weather_sends_expected_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Madrid"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .and(query_param("lang", "es"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Madrid",
            "weather": [{ "description": "cielo claro" }],
            "main": { "temp": 21.5, "temp_min": 18.0, "temp_max": 24.2, "humidity": 40 }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = provider_for(&mock_server)
        .fetch(&query("  Madrid ", Language::Spanish, Endpoint::Current))
        .await
        .unwrap();

    let WeatherReport::Current(current) = report else {
        panic!("expected current report");
    };
    assert_eq!(current.city, "Madrid");
    assert_eq!(current.snapshot.description, "cielo claro");
    assert_eq!(current.snapshot.humidity_pct, 40);
}

#[tokio::test]
async fn test_forecast_returns_every_slot() {
    let mock_server = MockServer::start().await;

    let list: Vec<_> = (0..40)
        .map(|i| slot(1_700_006_400 + i * 10_800, &format!("slot {i}"), "clear sky", 10.0))
        .collect();

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("lang", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "city": { "name": "Madrid", "sunrise": 1700000000, "sunset": 1700040000 },
            "list": list
        })))
        .mount(&mock_server)
        .await;

    let report = provider_for(&mock_server)
        .fetch(&query("Madrid", Language::English, Endpoint::Forecast))
        .await
        .unwrap();

    let WeatherReport::Forecast(forecast) = report else {
        panic!("expected forecast report");
    };
    assert_eq!(forecast.slots.len(), 40);
    assert_eq!(forecast.slots[0].label, "slot 0");
    assert_eq!(forecast.slots[39].label, "slot 39");
    assert!(forecast.slots.windows(2).all(|w| w[0].time < w[1].time));
}

#[tokio::test]
async fn test_unknown_city_is_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({ "cod": "404", "message": "city not found" })),
        )
        .mount(&mock_server)
        .await;

    let err = provider_for(&mock_server)
        .fetch(&query("Atlantis", Language::English, Endpoint::Current))
        .await
        .unwrap_err();

    match &err {
        FetchError::Status { status, city, body } => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(city, "Atlantis");
            assert!(body.contains("city not found"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_malformed_payload_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Madrid"
        })))
        .mount(&mock_server)
        .await;

    let err = provider_for(&mock_server)
        .fetch(&query("Madrid", Language::English, Endpoint::Current))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Parse(_)));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Nothing listens on port 1.
    let provider = OpenWeatherProvider::new("TEST_KEY".to_string())
        .with_urls("http://127.0.0.1:1/weather", "http://127.0.0.1:1/forecast");

    let err = provider
        .fetch(&query("Madrid", Language::English, Endpoint::Current))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Transport(_)));
}

#[tokio::test]
async fn test_transport_error_does_not_expose_api_key() {
    let provider = OpenWeatherProvider::new("SECRET_KEY_123".to_string())
        .with_urls("http://127.0.0.1:1/weather", "http://127.0.0.1:1/forecast");

    let err = provider
        .fetch(&query("Madrid", Language::English, Endpoint::Current))
        .await
        .unwrap_err();

    let shown = err.to_string();
    assert!(!shown.contains("SECRET_KEY_123"), "key leaked: {shown}");
    assert!(!shown.contains("appid"));
    assert!(!format!("{err:?}").contains("SECRET_KEY_123"));
}
