use chrono::{Duration, Utc};
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;
use tor_reminder::components::google_calendar::token::{
    AuthorizedUserToken, CALENDAR_READONLY_SCOPE, DEFAULT_TOKEN_URI,
};
use tor_reminder::config::{CREDENTIALS_FILE_VAR, DEFAULT_CREDENTIALS_FILE};
use tor_reminder::error::{env_error, other_error, ReminderResult};
use url::Url;

/// The redirect must name the address we listen on, `localhost` may resolve to `::1`
const CALLBACK_ADDR: &str = "127.0.0.1:8080";
const REDIRECT_URI: &str = "http://127.0.0.1:8080";

/// What a request to the callback server carried
#[derive(Debug, PartialEq, Eq)]
enum Callback {
    Code(String),
    Denied(String),
    StateMismatch,
    /// Anything else the browser asks for, such as `/favicon.ico`
    Unrelated,
}

fn parse_callback(request_url: &str, expected_state: &str) -> ReminderResult<Callback> {
    let callback = Url::parse(&format!("{}{}", REDIRECT_URI, request_url))
        .map_err(|e| other_error(&format!("Invalid callback URL: {}", e)))?;

    let param = |name: &str| {
        callback
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    };

    if let Some(error) = param("error") {
        return Ok(Callback::Denied(error));
    }
    let Some(code) = param("code") else {
        return Ok(Callback::Unrelated);
    };
    if param("state").as_deref() != Some(expected_state) {
        return Ok(Callback::StateMismatch);
    }
    Ok(Callback::Code(code))
}

fn respond_error(request: tiny_http::Request, message: &str) {
    let response = tiny_http::Response::from_string(format!("Authorization failed: {}", message))
        .with_status_code(400);
    let _ = request.respond(response);
}

#[derive(Debug, Deserialize)]
struct CodeExchangeResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

#[tokio::main]
async fn main() -> ReminderResult<()> {
    dotenv().ok();

    let client_id = env::var("GOOGLE_CLIENT_ID").map_err(|_| env_error("GOOGLE_CLIENT_ID"))?;
    let client_secret =
        env::var("GOOGLE_CLIENT_SECRET").map_err(|_| env_error("GOOGLE_CLIENT_SECRET"))?;
    let token_path = PathBuf::from(
        env::var(CREDENTIALS_FILE_VAR).unwrap_or_else(|_| DEFAULT_CREDENTIALS_FILE.to_string()),
    );

    // Generate random state for security
    let state = uuid::Uuid::new_v4().to_string();

    let mut auth_url = Url::parse("https://accounts.google.com/o/oauth2/v2/auth")
        .map_err(|e| other_error(&format!("Failed to parse URL: {}", e)))?;
    auth_url
        .query_pairs_mut()
        .append_pair("client_id", &client_id)
        .append_pair("redirect_uri", REDIRECT_URI)
        .append_pair("response_type", "code")
        .append_pair("access_type", "offline")
        .append_pair("prompt", "consent")
        .append_pair("scope", CALENDAR_READONLY_SCOPE)
        .append_pair("state", &state);

    println!("Opening browser for Google Calendar authorization...");
    println!("If it does not open, visit:\n{}", auth_url);
    webbrowser::open(auth_url.as_str())?;

    // Start local server to receive the callback
    let server = tiny_http::Server::http(CALLBACK_ADDR)
        .map_err(|e| other_error(&format!("Failed to start callback server: {}", e)))?;
    println!("Waiting for authorization callback...");

    // Browsers may ask for other paths (favicon) before the redirect arrives
    let (request, code) = loop {
        let request = server.recv()?;
        match parse_callback(request.url(), &state) {
            Ok(Callback::Code(code)) => break (request, code),
            Ok(Callback::Unrelated) => {
                let _ = request.respond(tiny_http::Response::empty(404));
            }
            Ok(Callback::Denied(error)) => {
                respond_error(request, &error);
                return Err(other_error(&format!("Authorization denied: {}", error)));
            }
            Ok(Callback::StateMismatch) => {
                respond_error(request, "state mismatch");
                return Err(other_error("State mismatch in authorization callback"));
            }
            Err(e) => {
                respond_error(request, "invalid callback URL");
                return Err(e);
            }
        }
    };

    // Exchange code for tokens
    let client = reqwest::Client::new();
    let response = client
        .post(DEFAULT_TOKEN_URI)
        .form(&[
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("code", code.as_str()),
            ("redirect_uri", REDIRECT_URI),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        let error_text = response.text().await?;
        respond_error(request, "token exchange failed");
        return Err(other_error(&format!("Failed to get token: {}", error_text)));
    }

    let token_data: CodeExchangeResponse = response.json().await?;
    let refresh_token = token_data
        .refresh_token
        .ok_or_else(|| other_error("Token response did not include a refresh token"))?;

    let token = AuthorizedUserToken {
        kind: "authorized_user".to_string(),
        client_id,
        client_secret,
        refresh_token,
        token: Some(token_data.access_token),
        expiry: Some(Utc::now() + Duration::seconds(token_data.expires_in.unwrap_or(3600))),
        token_uri: DEFAULT_TOKEN_URI.to_string(),
        extra: Default::default(),
    };
    fs::write(&token_path, serde_json::to_string_pretty(&token)?)?;

    // Send success response to browser
    let response =
        tiny_http::Response::from_string("Authorization successful! You can close this window.");
    request.respond(response)?;

    println!("Token successfully saved to {}!", token_path.display());

    Ok(())
}
