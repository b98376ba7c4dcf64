use opensec_api::quandl::{PriceClient, PriceSeries};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[tokio::test]
async fn from_date_parses_a_real_datatable_payload() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("datatable.json");

    Mock::given(method("GET"))
        .and(path("/api/v3/datatables/WIKI/PRICES.json"))
        .and(query_param("ticker", "AAPL"))
        .and(query_param("date.gt", "2017-03-26"))
        .and(query_param("api_key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = PriceClient::with_base_url(&mock_server.uri(), "test-key".to_string()).unwrap();
    let result = client.get_from_date("AAPL", "2017-03-26").await.unwrap();

    let Some(PriceSeries::Many(records)) = result else {
        panic!("expected Many for a 3-row payload");
    };
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].volume, 23_575_094);
    assert_eq!(records[2].adj_volume, 29_189_955);

    // Output shape is an array of 14-key objects.
    let json = serde_json::to_value(&records).unwrap();
    assert_eq!(json[1]["close"], 143.8);
    assert_eq!(json[1]["symbol"], "AAPL");
}

#[tokio::test]
async fn rerunning_the_same_fetch_is_byte_identical() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("datatable.json");

    Mock::given(method("GET"))
        .and(path("/api/v3/datatables/WIKI/PRICES.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = PriceClient::with_base_url(&mock_server.uri(), "test-key".to_string()).unwrap();
    let first = client.get_from_date("AAPL", "2017-03-26").await.unwrap();
    let second = client.get_from_date("AAPL", "2017-03-26").await.unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
