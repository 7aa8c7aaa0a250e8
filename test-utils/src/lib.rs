//! `test-utils` is used for testing in both `batchfetch-lib` and `batchfetch`.
//! This crate does not depend on `batchfetch-lib` or `batchfetch`, else we would get dependency cycles.
//! Macros are used instead, so that the importer is responsible for providing the dependencies.

/// Create a mock web server, which responds with a predefined status when
/// handling a matching request
#[macro_export]
macro_rules! mock_server {
    ($status:expr $(, $func:tt ($($arg:expr),*))*) => {{
        let mock_server = wiremock::MockServer::start().await;
        let response_template = wiremock::ResponseTemplate::new(http::StatusCode::from($status));
        let template = response_template$(.$func($($arg),*))*;
        wiremock::Mock::given(wiremock::matchers::method("GET")).respond_with(template).mount(&mock_server).await;
        mock_server
    }};
}

/// Create a mock data API. Every entry maps the value of the `resource`
/// query parameter to a status, a body and a response delay in milliseconds.
///
/// Requests for resources without an entry are answered with `404`.
#[macro_export]
macro_rules! labelled_mock_server {
    ($( $resource:expr => ($status:expr, $body:expr, $delay_ms:expr) ),* $(,)?) => {{
        let mock_server = wiremock::MockServer::start().await;
        $(
            let template = wiremock::ResponseTemplate::new(http::StatusCode::from($status))
                .set_body_string($body)
                .set_delay(std::time::Duration::from_millis($delay_ms));
            wiremock::Mock::given(wiremock::matchers::method("GET"))
                .and(wiremock::matchers::query_param("resource", $resource))
                .respond_with(template)
                .mount(&mock_server)
                .await;
        )*
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(http::StatusCode::NOT_FOUND))
            .with_priority(u8::MAX)
            .mount(&mock_server)
            .await;
        mock_server
    }};
}

/// Gets the "main" binary name (e.g. `batchfetch`)
#[macro_export]
macro_rules! main_command {
    () => {
        assert_cmd::Command::cargo_bin(env!("CARGO_PKG_NAME"))
            .expect("Couldn't get cargo package name")
    };
}
