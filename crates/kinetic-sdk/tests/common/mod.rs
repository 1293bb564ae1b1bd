//! Common test utilities and helpers

use kinetic_sdk::{ConnectionConfig, RequestCe};
use std::path::Path;
use wiremock::MockServer;

/// `Authorization` value for the test credentials (admin:secret)
#[allow(dead_code)]
pub const AUTHORIZATION: &str = "Basic YWRtaW46c2VjcmV0";

/// Load a response fixture
#[allow(dead_code)]
pub fn load_response_fixture(name: &str) -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let path = Path::new(manifest_dir)
        .join("tests")
        .join("fixtures")
        .join("responses")
        .join(format!("{}.json", name));

    std::fs::read_to_string(&path).unwrap_or_else(|e| {
        panic!(
            "Failed to load response fixture '{}' from {:?}: {}",
            name, path, e
        )
    })
}

/// Connection settings pointing at a mock server
#[allow(dead_code)]
pub fn connection(server: &MockServer) -> ConnectionConfig {
    ConnectionConfig::new(server.uri(), "admin", "secret")
}

/// Request CE client for space `acme` on a mock server
#[allow(dead_code)]
pub fn request_ce(server: &MockServer) -> RequestCe {
    RequestCe::new(&connection(server).with_space_slug("acme")).expect("Failed to build client")
}

/// URL of a local port with nothing listening on it
#[allow(dead_code)]
pub fn unreachable_url() -> String {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    format!("http://127.0.0.1:{port}")
}
