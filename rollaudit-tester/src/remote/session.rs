use std::time::Duration;

/// Build the HTTP client shared by authentication and every roll for one run.
pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .user_agent(concat!("rollaudit-tester/", env!("CARGO_PKG_VERSION")))
        .build()
}
