//! SubgraphClient HTTP 통합 테스트.

use leaderboard_data::{
    CompetitionWindow, DataError, SubgraphClient, SubgraphConfig, TradeSource,
};
use mockito::Matcher;
use serde_json::json;

fn client_for(server: &mockito::ServerGuard) -> SubgraphClient {
    SubgraphClient::new(SubgraphConfig::new(format!("{}/subgraphs/name/perps", server.url())))
        .unwrap()
}

#[tokio::test]
async fn test_fetch_trades_sends_window_variables() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/subgraphs/name/perps")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "variables": { "from": "1700000000", "to": "1700086400" }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "data": {
                    "trades": [
                        {
                            "account": "0xAAA0000000000000000000000000000000001111",
                            "sizeUsd": "5000000000000000000000000000000",
                            "pnlUsd": "1000000000000000000000000000000",
                            "marginUsd": "2000000000000000000000000000000"
                        },
                        {
                            "account": "0xaaa0000000000000000000000000000000001111",
                            "sizeUsd": "3000000000000000000000000000000",
                            "pnlUsd": "-1000000000000000000000000000000",
                            "marginUsd": null
                        }
                    ]
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let window = CompetitionWindow::new(1_700_000_000, Some(1_700_086_400)).unwrap();
    let trades = client.fetch_trades(&window).await.unwrap();

    mock.assert_async().await;
    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].size(), Some(5e30));
    assert_eq!(trades[1].margin(), 0.0);
}

#[tokio::test]
async fn test_fetch_trades_sends_query() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/subgraphs/name/perps")
        .match_body(Matcher::Regex("query Trades".to_string()))
        .with_status(200)
        .with_body(r#"{"data":{"trades":[]}}"#)
        .create_async()
        .await;

    let trades = client_for(&server)
        .fetch_trades(&CompetitionWindow::default())
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(trades.is_empty());
}

#[tokio::test]
async fn test_fetch_trades_http_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/subgraphs/name/perps")
        .with_status(503)
        .with_body("service unavailable")
        .create_async()
        .await;

    let err = client_for(&server)
        .fetch_trades(&CompetitionWindow::default())
        .await
        .unwrap_err();

    match err {
        DataError::HttpStatus { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "service unavailable");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_fetch_trades_graphql_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/subgraphs/name/perps")
        .with_status(200)
        .with_body(r#"{"errors":[{"message":"Type `Query` has no field `trades`"}]}"#)
        .create_async()
        .await;

    let err = client_for(&server)
        .fetch_trades(&CompetitionWindow::default())
        .await
        .unwrap_err();

    assert!(matches!(err, DataError::GraphQl(msg) if msg.contains("has no field")));
}

#[tokio::test]
async fn test_fetch_trades_unreachable_endpoint() {
    // 리스닝하지 않는 포트
    let client = SubgraphClient::new(SubgraphConfig::new("http://127.0.0.1:9/graphql")).unwrap();
    let err = client
        .fetch_trades(&CompetitionWindow::default())
        .await
        .unwrap_err();

    assert!(matches!(err, DataError::Network(_)));
}
