#![allow(dead_code)]

use std::fs;
use std::io::Read;
use std::path::Path;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use url::Url;

/// Request seen by the local test server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub authorization: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    /// Value of a query parameter, decoded
    pub fn query(&self, name: &str) -> Option<String> {
        let url = Url::parse(&format!("http://localhost{}", self.url)).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// Value of a form field in the request body, decoded
    pub fn form(&self, name: &str) -> Option<String> {
        url::form_urlencoded::parse(self.body.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    pub fn path(&self) -> String {
        self.url.split('?').next().unwrap_or_default().to_string()
    }
}

/// Serve the given `(status, body)` responses in order on a random local port.
///
/// Returns the base URL and a handle yielding the recorded requests once the
/// responses are used up or no request arrives for a few seconds.
pub fn serve(responses: Vec<(u16, String)>) -> (String, JoinHandle<Vec<RecordedRequest>>) {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("bind test server");
    let addr = server
        .server_addr()
        .to_ip()
        .expect("test server listens on TCP");

    let handle = thread::spawn(move || {
        let mut recorded = Vec::new();
        for (status, response_body) in responses {
            let mut request = match server.recv_timeout(Duration::from_secs(5)) {
                Ok(Some(request)) => request,
                _ => break,
            };

            let authorization = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("Authorization"))
                .map(|h| h.value.as_str().to_string());
            let mut request_body = String::new();
            let _ = request.as_reader().read_to_string(&mut request_body);

            recorded.push(RecordedRequest {
                method: request.method().to_string(),
                url: request.url().to_string(),
                authorization,
                body: request_body,
            });

            let response = tiny_http::Response::from_string(response_body).with_status_code(status);
            let _ = request.respond(response);
        }
        recorded
    });

    (format!("http://{}", addr), handle)
}

/// Write an authorized user token file whose cached access token is still valid
pub fn write_valid_token_file(path: &Path, access_token: &str) {
    let expiry = chrono::Utc::now() + chrono::Duration::hours(1);
    let json = serde_json::json!({
        "type": "authorized_user",
        "client_id": "client-id",
        "client_secret": "client-secret",
        "refresh_token": "refresh-token",
        "token": access_token,
        "expiry": expiry.to_rfc3339(),
    });
    fs::write(path, json.to_string()).expect("write token file");
}

/// Write an authorized user token file whose access token expired an hour ago
pub fn write_expired_token_file(path: &Path, token_uri: &str) {
    let expiry = chrono::Utc::now() - chrono::Duration::hours(1);
    let json = serde_json::json!({
        "type": "authorized_user",
        "client_id": "client-id",
        "client_secret": "client-secret",
        "refresh_token": "refresh-token",
        "token": "stale-token",
        "expiry": expiry.to_rfc3339(),
        "token_uri": token_uri,
        "scopes": ["https://www.googleapis.com/auth/calendar.readonly"],
    });
    fs::write(path, json.to_string()).expect("write token file");
}
