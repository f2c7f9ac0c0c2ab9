#[cfg(test)]
mod test {
    use httpmock::prelude::*;
    use serde_json::json;

    use crate::config::sources::SourceConfig;
    use crate::error::FetchError;
    use crate::sources::fetch::{FetchRows, RawRow};
    use crate::sources::sheets::{parse_rows, SheetsFetcher};
    use crate::tests::common::{token_expiring_in, values_body};

    const SHEET_PATH: &str = "/v4/spreadsheets/sheet-id/values/Main!A:B";

    fn fetcher(server: &MockServer) -> SheetsFetcher {
        SheetsFetcher::new(&SourceConfig::new("sheet-id", &server.base_url())).unwrap()
    }

    #[tokio::test]
    async fn fetches_rows_with_bearer_token() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(SHEET_PATH)
                    .header("authorization", "Bearer access-1");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(values_body("Main", &[&["feature", "TRUE"], &["limit", "10"], &["label"]]));
            })
            .await;

        let rows = fetcher(&server)
            .fetch_rows("Main", &token_expiring_in("access-1", 3600))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            rows,
            vec![
                RawRow::new("feature", Some("TRUE")),
                RawRow::new("limit", Some("10")),
                RawRow::new("label", None),
            ]
        );
    }

    #[tokio::test]
    async fn rejected_token_is_an_auth_error() {
        let server = MockServer::start_async().await;
        for status in [401, 403] {
            let mut mock = server
                .mock_async(|when, then| {
                    when.method(GET).path(SHEET_PATH);
                    then.status(status).body("denied");
                })
                .await;

            let err = fetcher(&server)
                .fetch_rows("Main", &token_expiring_in("access-1", 3600))
                .await
                .unwrap_err();

            assert!(matches!(err, FetchError::Auth(_)), "status {} gave {:?}", status, err);
            mock.delete_async().await;
        }
    }

    #[tokio::test]
    async fn server_error_is_a_transport_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(SHEET_PATH);
                then.status(500).body("backend error");
            })
            .await;

        let err = fetcher(&server)
            .fetch_rows("Main", &token_expiring_in("access-1", 3600))
            .await
            .unwrap_err();

        match err {
            FetchError::Transport(message) => assert!(message.contains("500"), "{}", message),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreachable_source_is_a_transport_error() {
        let config = SourceConfig::new("sheet-id", "http://127.0.0.1:1");
        let err = SheetsFetcher::new(&config)
            .unwrap()
            .fetch_rows("Main", &token_expiring_in("access-1", 3600))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Transport(_)), "unexpected error: {:?}", err);
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(SHEET_PATH);
                then.status(200).body("<html>maintenance</html>");
            })
            .await;

        let err = fetcher(&server)
            .fetch_rows("Main", &token_expiring_in("access-1", 3600))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::MalformedResponse(_)), "unexpected error: {:?}", err);
    }

    #[test]
    fn empty_range_has_no_rows() {
        let rows = parse_rows(r#"{"range":"Main!A1:B1","majorDimension":"ROWS"}"#).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn blank_rows_are_skipped() {
        let body = json!({"values": [["a", "1"], [], ["b", "2"]]}).to_string();
        let rows = parse_rows(&body).unwrap();
        assert_eq!(rows, vec![RawRow::new("a", Some("1")), RawRow::new("b", Some("2"))]);
    }

    #[test]
    fn non_string_cells_are_malformed() {
        let key = json!({"values": [[1, "x"]]}).to_string();
        let value = json!({"values": [["a", {"nested": true}]]}).to_string();

        assert!(matches!(parse_rows(&key), Err(FetchError::MalformedResponse(_))));
        assert!(matches!(parse_rows(&value), Err(FetchError::MalformedResponse(_))));
    }
}
