use biostrap_client::http_client::ReqwestBiostrapClient;
use biostrap_client::{BiostrapClient, BiostrapError, Granularity};
use chrono::NaiveDate;
use secrecy::SecretString;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn users_listing_body() -> serde_json::Value {
    serde_json::json!({
        "pagination": {"available_pages": 2, "items_per_page": 1, "page": 1, "total_items": 2},
        "users": [{
            "id": "u1",
            "name": "A",
            "email": "a@x.com",
            "birthday": "1990-01-01",
            "gender": "f",
            "height": 1.7,
            "weight": 60,
            "goals": {"steps": 10000, "sleep": 8, "calories": 2000, "workout": 30}
        }]
    })
}

#[tokio::test]
async fn get_users_sends_api_key_and_parses_listing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/organizations/users"))
        .and(query_param("page", "1"))
        .and(query_param("items_per_page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&users_listing_body()))
        .mount(&server)
        .await;

    let client = ReqwestBiostrapClient::new(&server.uri(), SecretString::new("tok".into()), true)
        .expect("client");

    let users = client.get_users(1, 1).await.expect("users");
    assert!(users.data_left);
    assert_eq!(users.users.len(), 1);
    assert_eq!(users.users[0].name, "A");
    assert_eq!(
        users.users[0].birthday,
        NaiveDate::from_ymd_opt(1990, 1, 1).expect("date")
    );

    // Verify the Authorization header carried the APIKey scheme verbatim.
    let received = server.received_requests().await.unwrap();
    assert!(!received.is_empty());
    let auth = received[0].headers.get("authorization").cloned();
    assert!(auth.is_some());
    let auth = auth.unwrap();
    let ok = auth.to_str().map(|s| s == "APIKey tok").unwrap_or(false);
    assert!(ok);
}

#[tokio::test]
async fn get_users_on_last_page_reports_no_data_left() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "pagination": {"available_pages": 2, "items_per_page": 1, "page": 2, "total_items": 2},
        "users": [users_listing_body()["users"][0].clone()]
    });
    Mock::given(method("GET"))
        .and(path("/organizations/users"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = ReqwestBiostrapClient::new(&server.uri(), SecretString::new("tok".into()), true)
        .expect("client");

    let users = client.get_users(2, 1).await.expect("users");
    assert!(!users.data_left);
}

#[tokio::test]
async fn http_failure_message_is_status_and_reason() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = ReqwestBiostrapClient::new(&server.uri(), SecretString::new("tok".into()), true)
        .expect("client");

    let err = client.get_user("nobody").await.unwrap_err();
    assert!(matches!(err, BiostrapError::Http { status: 404, .. }));
    assert_eq!(format!("{}", err), "404: Not Found");

    let err = client
        .get("organizations/job-status", &[])
        .await
        .unwrap_err();
    assert_eq!(format!("{}", err), "404: Not Found");
}

#[tokio::test]
async fn server_error_message_is_status_and_reason() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/scores"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({"error": "x"})))
        .mount(&server)
        .await;

    let client = ReqwestBiostrapClient::new(&server.uri(), SecretString::new("tok".into()), true)
        .expect("client");

    let err = client
        .get_user_scores(NaiveDate::from_ymd_opt(2024, 3, 1).expect("date"), "u1")
        .await
        .unwrap_err();
    assert_eq!(format!("{}", err), "500: Internal Server Error");
}

#[tokio::test]
async fn non_json_body_is_a_decode_failure_whatever_the_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let client = ReqwestBiostrapClient::new(&server.uri(), SecretString::new("tok".into()), true)
        .expect("client");

    let err = client.get("ok", &[]).await.unwrap_err();
    assert!(matches!(err, BiostrapError::Decode(_)));

    let err = client.get("broken", &[]).await.unwrap_err();
    assert!(matches!(err, BiostrapError::Decode(_)));
}

#[tokio::test]
async fn empty_success_body_decodes_to_empty_object() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = ReqwestBiostrapClient::new(&server.uri(), SecretString::new("tok".into()), true)
        .expect("client");

    let resp = client.get("ping", &[]).await.expect("response");
    assert_eq!(resp.status_code, 200);
    assert_eq!(resp.message, "OK");
    assert_eq!(resp.data, serde_json::json!({}));
}

#[tokio::test]
async fn envelope_carries_status_reason_and_decoded_body() {
    let server = MockServer::start().await;

    let body = serde_json::json!({"a": 1, "nested": {"b": [1, 2, 3]}});
    Mock::given(method("GET"))
        .and(path("/ping"))
        .and(query_param("probe", "yes"))
        .respond_with(ResponseTemplate::new(201).set_body_json(&body))
        .mount(&server)
        .await;

    let client = ReqwestBiostrapClient::new(&server.uri(), SecretString::new("tok".into()), true)
        .expect("client");

    let resp = client
        .get("ping", &[("probe", "yes".to_string())])
        .await
        .expect("response");
    assert_eq!(resp.status_code, 201);
    assert_eq!(resp.message, "Created");
    assert_eq!(resp.data, body);
}

#[tokio::test]
async fn base_url_trailing_slash_is_trimmed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&server)
        .await;

    let base = format!("{}/", server.uri());
    let client =
        ReqwestBiostrapClient::new(&base, SecretString::new("tok".into()), true).expect("client");

    let resp = client.get("ping", &[]).await.expect("response");
    assert_eq!(resp.data["ok"], serde_json::json!(true));
}

#[tokio::test]
async fn get_user_unwraps_data_envelope() {
    let server = MockServer::start().await;

    let body = serde_json::json!({"data": users_listing_body()["users"][0].clone()});
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(query_param("user_id", "u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = ReqwestBiostrapClient::new(&server.uri(), SecretString::new("tok".into()), true)
        .expect("client");

    let user = client.get_user("u1").await.expect("user");
    assert_eq!(user.email, "a@x.com");
    assert_eq!(user.goals.workout, 30);
}

#[tokio::test]
async fn get_user_scores_parses_subscores() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "activity": {"avg": 61, "goal": 80, "processing": false, "value": 72},
        "recovery": {
            "avg": 55,
            "message": "Take it easy",
            "processing": false,
            "stage": "recovering",
            "value": 48
        },
        "sleep": {"avg": 77, "duration_secs": 27360, "goal": 28800, "processing": false, "value": 81}
    });
    Mock::given(method("GET"))
        .and(path("/scores"))
        .and(query_param("date", "2024-03-01"))
        .and(query_param("user_id", "u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = ReqwestBiostrapClient::new(&server.uri(), SecretString::new("tok".into()), true)
        .expect("client");

    let scores = client
        .get_user_scores(NaiveDate::from_ymd_opt(2024, 3, 1).expect("date"), "u1")
        .await
        .expect("scores");
    assert_eq!(scores.activity.avg, 61);
    assert_eq!(scores.recovery.message, "Take it easy");
    assert_eq!(scores.sleep.goal, 28800);
}

#[tokio::test]
async fn sleep_and_step_endpoints_return_decoded_payload() {
    let server = MockServer::start().await;

    let sleep_body = serde_json::json!({"sleep_sessions": [{"duration_secs": 27360}]});
    Mock::given(method("GET"))
        .and(path("/sleep"))
        .and(query_param("date", "2024-03-01"))
        .and(query_param("user_id", "u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&sleep_body))
        .mount(&server)
        .await;

    let steps_body = serde_json::json!({"steps": 8400});
    Mock::given(method("GET"))
        .and(path("/step/details"))
        .and(query_param("granularity", "month"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&steps_body))
        .mount(&server)
        .await;

    let client = ReqwestBiostrapClient::new(&server.uri(), SecretString::new("tok".into()), true)
        .expect("client");
    let day = NaiveDate::from_ymd_opt(2024, 3, 1).expect("date");

    let sleep = client.get_user_sleep_stats(day, "u1").await.expect("sleep");
    assert!(sleep.get("sleep_sessions").is_some());

    let steps = client
        .get_user_step_details(day, "u1", Granularity::Month)
        .await
        .expect("steps");
    assert_eq!(steps["steps"], serde_json::json!(8400));
}

#[tokio::test]
async fn malformed_listing_payload_is_a_mapping_failure() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "pagination": {"available_pages": 1, "items_per_page": 1, "page": 1, "total_items": 1},
        "users": [{"id": "u1", "name": "A"}]
    });
    Mock::given(method("GET"))
        .and(path("/organizations/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = ReqwestBiostrapClient::new(&server.uri(), SecretString::new("tok".into()), true)
        .expect("client");

    let err = client.get_users(1, 1).await.unwrap_err();
    assert!(matches!(err, BiostrapError::Payload { .. }));
    let msg = format!("{}", err);
    assert!(msg.contains("Users"), "{msg}");
    assert!(msg.contains("email"), "{msg}");
}
