//! Integration tests for the `users` workflow against a mock gateway.
//!
//! These tests don't spawn the binary; they drive the same fetch-then-derive
//! path the command uses, with the gateway mocked by wiremock.

use std::time::Duration;

use kong_admin_business::users_api::{USERS_TARGET, list_users};
use kong_admin_business::{
    FailureCause, HttpClient, HttpConfig, SelectAllState, SortDirection, TableAction, TableState,
    UserRow,
};
use serde_json::json;
use ustr::Ustr;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

struct UsersTestContext {
    mock_server: MockServer,
    client: HttpClient,
}

impl UsersTestContext {
    async fn new() -> Self {
        let mock_server = MockServer::start().await;
        let client = HttpClient::new(
            HttpConfig::new(mock_server.uri()).with_timeout(Duration::from_millis(500)),
        );
        Self {
            mock_server,
            client,
        }
    }

    async fn mount_users(&self, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(USERS_TARGET))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&self.mock_server)
            .await;
    }

    async fn fetch(&self) -> Vec<UserRow> {
        list_users(&self.client, USERS_TARGET).await.unwrap()
    }
}

fn gateway_users() -> serde_json::Value {
    json!([
        {"id": 1, "name": "Bob", "company": "Kong", "role": "Admin", "status": "active", "isVerified": true},
        {"id": 2, "name": "Ann", "company": "Acme", "role": "Developer", "status": "banned", "isVerified": false},
        {"id": 3, "name": "Cid", "company": "Kong", "role": "Designer", "status": "active", "isVerified": true},
        {"id": 4, "name": "annie", "company": "Zeta", "role": "Developer", "status": "pending", "isVerified": false},
        {"id": 5, "name": "Dee", "company": "Acme", "role": "Admin", "status": "active", "isVerified": true},
        {"id": 6, "name": "Eve", "company": "Beta", "role": "Support", "status": "active", "isVerified": false}
    ])
}

#[tokio::test]
async fn test_fetched_users_render_first_page_sorted_by_name() {
    let ctx = UsersTestContext::new().await;
    ctx.mount_users(gateway_users()).await;

    let rows = ctx.fetch().await;
    let state = TableState::new();
    let view = state.view(&rows);

    let names: Vec<&str> = view.rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Ann", "Bob", "Cid", "Dee", "Eve"]);
    assert_eq!(view.filtered_count, 6);
    assert_eq!(view.page_count, 2);
    assert_eq!(view.padding_rows, 0);
    assert_eq!(view.display_range(), Some((1, 5)));
}

#[tokio::test]
async fn test_second_page_pads_to_full_height() {
    let ctx = UsersTestContext::new().await;
    ctx.mount_users(gateway_users()).await;

    let rows = ctx.fetch().await;
    let state = TableState::new().reduce(TableAction::Page(1));
    let view = state.view(&rows);

    let names: Vec<&str> = view.rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["annie"]);
    assert_eq!(view.padding_rows, 4);
}

#[tokio::test]
async fn test_filter_and_sort_by_company_descending() {
    let ctx = UsersTestContext::new().await;
    ctx.mount_users(json!({ "users": gateway_users() })).await;

    let rows = ctx.fetch().await;
    let state = TableState::new()
        .reduce(TableAction::Filter("AN".to_owned()))
        .reduce(TableAction::Sort(Ustr::from("company")))
        .reduce(TableAction::Sort(Ustr::from("company")));
    let view = state.view(&rows);

    assert_eq!(view.sort_direction, SortDirection::Descending);
    let names: Vec<&str> = view.rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["annie", "Ann"]);
    assert!(!view.is_empty);
}

#[tokio::test]
async fn test_filter_without_matches_is_empty() {
    let ctx = UsersTestContext::new().await;
    ctx.mount_users(gateway_users()).await;

    let rows = ctx.fetch().await;
    let state = TableState::new().reduce(TableAction::Filter("zed".to_owned()));
    let view = state.view(&rows);

    assert!(view.is_empty);
    assert!(view.rows.is_empty());
    assert_eq!(view.display_range(), None);
}

#[tokio::test]
async fn test_selection_tracks_header_checkbox() {
    let ctx = UsersTestContext::new().await;
    ctx.mount_users(gateway_users()).await;

    let rows = ctx.fetch().await;
    let mut state = TableState::new();
    state.toggle_select_all(true, &rows);
    assert_eq!(state.view(&rows).select_all, SelectAllState::All);

    state.apply(TableAction::ToggleSelect(Ustr::from("2")));
    let view = state.view(&rows);
    assert_eq!(view.select_all, SelectAllState::Indeterminate);
    assert_eq!(view.num_selected, 5);
    assert!(!state.is_selected(Ustr::from("2")));

    state.toggle_select_all(false, &rows);
    assert_eq!(state.view(&rows).select_all, SelectAllState::None);
}

#[tokio::test]
async fn test_gateway_error_reports_status_with_placeholder_message() {
    let ctx = UsersTestContext::new().await;
    Mock::given(method("GET"))
        .and(path(USERS_TARGET))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&ctx.mock_server)
        .await;

    let err = list_users(&ctx.client, USERS_TARGET).await.unwrap_err();
    let envelope = err.envelope().expect("gateway failures carry an envelope");

    assert_eq!(envelope.message, "Error Message");
    assert_eq!(envelope.status(), Some(503));
    assert!(matches!(envelope.cause, FailureCause::HttpStatus { status: 503, .. }));
    assert_eq!(envelope.url, format!("{}/users", ctx.mock_server.uri()));
}

#[tokio::test]
async fn test_slow_gateway_times_out() {
    let ctx = UsersTestContext::new().await;
    Mock::given(method("GET"))
        .and(path(USERS_TARGET))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(gateway_users())
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&ctx.mock_server)
        .await;

    let err = list_users(&ctx.client, USERS_TARGET).await.unwrap_err();

    assert!(err.is_timeout());
}
