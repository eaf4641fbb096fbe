//! End-to-end: a mocked server error travels through the safety layer into
//! form state.

use std::collections::HashMap;

use client::{Client, RequestMethod, RequestOptions};
use forms::{apply_form_error, ApplyOptions, FormHost};
use serde_json::{json, Value};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingHost {
    errors: Vec<(String, String)>,
    focused: Vec<String>,
    server: Vec<String>,
}

impl FormHost for RecordingHost {
    fn set_error(&mut self, field: &str, message: &str) {
        self.errors.push((field.to_string(), message.to_string()));
    }

    fn set_focus(&mut self, field: &str) {
        self.focused.push(field.to_string());
    }

    fn set_server_error(&mut self, message: &str) {
        self.server.push(message.to_string());
    }
}

async fn client_for(server: &MockServer) -> Client {
    Client::builder()
        .base_url(Url::parse(&server.uri()).unwrap())
        .build()
        .unwrap()
}

#[tokio::test]
async fn signup_conflict_lands_on_the_email_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/signup"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({ "fieldErrors": { "email": "already registered" } })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .fetch_json::<Value>(
            "/users/signup",
            RequestOptions::new()
                .method(RequestMethod::Post)
                .json(json!({ "email": "a@b.c", "password": "hunter22" })),
        )
        .await
        .unwrap_err();

    let mut host = RecordingHost::default();
    apply_form_error(&err, &mut host, &ApplyOptions::default());

    assert_eq!(
        host.errors,
        vec![("email".to_string(), "already registered".to_string())]
    );
    assert_eq!(host.focused, vec!["email"]);
    assert!(host.server.is_empty());
}

#[tokio::test]
async fn login_rejection_routes_through_the_status_map() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .fetch_json::<Value>(
            "/login",
            RequestOptions::new()
                .method(RequestMethod::Post)
                .json(json!({ "email": "a@b.c", "password": "wrong" })),
        )
        .await
        .unwrap_err();

    let mut host = RecordingHost::default();
    let options = ApplyOptions {
        status_field_map: HashMap::from([(401, "password".to_string())]),
        messages: None,
    };
    apply_form_error(&err, &mut host, &options);

    assert_eq!(host.errors.len(), 1);
    assert_eq!(host.errors[0].0, "password");
    assert_eq!(host.focused, vec!["password"]);
    assert!(host.server.is_empty());
}

#[tokio::test]
async fn unreachable_server_lands_in_the_global_slot() {
    let client = Client::new().unwrap();
    let err = client
        .fetch_json::<Value>("http://127.0.0.1:9/login", RequestOptions::new())
        .await
        .unwrap_err();

    let mut host = RecordingHost::default();
    apply_form_error(&err, &mut host, &ApplyOptions::default());

    assert!(host.errors.is_empty());
    assert_eq!(host.server, vec!["Network request failed"]);
}
