//! Contract suite run against the mock reqres server.
//!
//! # Design
//! Each test starts the mock server on a random port in a background tokio
//! runtime, then drives `ReqresApi` over real HTTP with the default ureq
//! transport.

use std::io::{Read, Write};
use std::net::SocketAddr;

use chrono::Utc;
use reqres_core::{ApiError, AuthRequest, Outcome, ReqresApi, UserCreateRequest};

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            reqres_mock::run(listener).await
        })
        .unwrap();
    });

    addr
}

/// A bare HTTP/1.1 server that answers one request with the given status
/// line and raw body bytes, then exits.
fn start_raw_server(status_line: &'static str, body: &'static [u8]) -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let head = format!(
            "HTTP/1.1 {status_line}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
            body.len()
        );
        stream.write_all(head.as_bytes()).unwrap();
        stream.write_all(body).unwrap();
    });

    addr
}

fn api() -> ReqresApi {
    let addr = start_server();
    ReqresApi::with_base_url(&format!("http://{addr}/api"))
}

// ---------------------------------------------------------------------------
// GET
// ---------------------------------------------------------------------------

#[test]
fn get_user_returns_janet() {
    let envelope = api().get_user(2, 200).unwrap().success().unwrap();
    assert_eq!(envelope.data.first_name, "Janet");
}

#[test]
fn get_user_detail() {
    let envelope = api().get_user(1, 200).unwrap().success().unwrap();
    assert_eq!(envelope.data.id, 1);
    assert_eq!(envelope.data.first_name, "George");
    assert_eq!(envelope.data.last_name, "Bluth");
    assert!(!envelope.data.email.is_empty());
}

#[test]
fn get_user_is_repeatable() {
    let api = api();
    let first = api.get_user(2, 200).unwrap();
    let second = api.get_user(2, 200).unwrap();
    assert_eq!(first, second);
}

#[test]
fn get_user_not_found_is_error_shape() {
    let outcome = api().get_user(23, 404).unwrap();
    let error = outcome.failure().unwrap();
    assert!(error.message().is_some_and(|m| !m.is_empty()));
}

#[test]
fn wrong_expectation_fails_with_expected_status() {
    let err = api().get_user(2, 404).unwrap_err();
    assert!(matches!(
        err,
        ApiError::UnexpectedStatus {
            expected: 404,
            actual: 200
        }
    ));
}

#[test]
fn failing_endpoint_answers_404() {
    let response = api().get_failing_endpoint().unwrap();
    assert_eq!(response.status, 404);
    assert_eq!(response.header("content-type"), Some("application/json"));
}

#[test]
fn list_users_second_page() {
    let page = api().list_users(2).unwrap();
    assert_eq!(page.page, 2);
    assert_eq!(page.data[2].last_name, "Funke");
}

#[test]
fn list_resources_has_all_fields() {
    let list = api().list_resources().unwrap();
    assert_eq!(list.total, 12);
    assert!(!list.data.is_empty());
    for resource in &list.data {
        assert!(resource.id > 0);
        assert!(!resource.name.is_empty());
        assert!(resource.year >= 2000);
        assert!(resource.color.starts_with('#'));
        assert!(!resource.pantone_value.is_empty());
    }
}

#[test]
fn get_resource_found_and_missing() {
    let api = api();
    let envelope = api.get_resource(2, 200).unwrap().success().unwrap();
    assert_eq!(envelope.data.name, "fuchsia rose");
    assert!(envelope.list.is_none());

    let outcome = api.get_resource(23, 404).unwrap();
    assert!(outcome.is_failure());
}

#[test]
fn delayed_user_list() {
    let page = api().list_users_delayed(1).unwrap();
    assert_eq!(page.data[0].first_name, "George");
}

// ---------------------------------------------------------------------------
// POST
// ---------------------------------------------------------------------------

#[test]
fn create_user() {
    let created = api()
        .create_user(&UserCreateRequest::new("Samsung", "s8"))
        .unwrap();
    assert!(created.id.as_deref().is_some_and(|id| !id.is_empty()));
    assert!(created.created_at.is_some());
    assert_eq!(created.name, "Samsung");
}

#[test]
fn register_successful() {
    let outcome = api()
        .register(&AuthRequest::new("eve.holt@reqres.in", "pistol"), 200)
        .unwrap();
    let auth = outcome.success().unwrap();
    assert_eq!(auth.id, Some(4));
    assert!(!auth.token.is_empty());
}

#[test]
fn register_without_password() {
    let outcome = api()
        .register(&AuthRequest::without_password("eve.holt@reqres.in"), 400)
        .unwrap();
    match outcome {
        Outcome::Failure(error) => assert_eq!(error.message(), Some("Missing password")),
        Outcome::Success(auth) => panic!("expected error shape, got {auth:?}"),
    }
}

#[test]
fn register_with_wrong_expectation_fails() {
    let err = api()
        .register(&AuthRequest::without_password("sydney@fife"), 200)
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::UnexpectedStatus {
            expected: 200,
            actual: 400
        }
    ));
}

#[test]
fn login_successful() {
    let auth = api()
        .login(&AuthRequest::new("eve.holt@reqres.in", "cityslicka"), 200)
        .unwrap()
        .success()
        .unwrap();
    assert_eq!(auth.token, "QpwL5tke4Pnpja7X4");
    assert!(auth.id.is_none());
}

#[test]
fn login_without_password() {
    let error = api()
        .login(&AuthRequest::without_password("eve.holt@reqres.in"), 400)
        .unwrap()
        .failure()
        .unwrap();
    assert_eq!(error.message(), Some("Missing password"));
}

// ---------------------------------------------------------------------------
// PATCH / PUT / DELETE
// ---------------------------------------------------------------------------

#[test]
fn patch_user_sets_fresh_updated_at() {
    let patched = api()
        .patch_user(2, &UserCreateRequest::new("morpheus", "zion resident"))
        .unwrap();
    let updated_at = patched.updated_at.unwrap();
    let age = Utc::now() - updated_at;
    assert!(age.num_milliseconds() < 5000, "updatedAt is {age} old");
    assert_eq!(patched.job, "zion resident");
}

#[test]
fn replace_user_sets_updated_at() {
    let replaced = api()
        .replace_user(2, &UserCreateRequest::new("sth", "sth different"))
        .unwrap();
    assert!(replaced.updated_at.is_some());
    assert!(replaced.created_at.is_none());
}

#[test]
fn delete_user() {
    api().delete_user(2, 204).unwrap();
}

#[test]
fn delete_with_wrong_expectation_fails() {
    let err = api().delete_user(2, 200).unwrap_err();
    assert!(matches!(
        err,
        ApiError::UnexpectedStatus {
            expected: 200,
            actual: 204
        }
    ));
}

#[test]
fn delete_then_fetch_still_serves_user() {
    let api = api();
    let before = api.get_user(2, 200).unwrap().success().unwrap();
    assert_eq!(before.data.id, 2);

    api.delete_user(2, 204).unwrap();

    // The service never persists deletes.
    let after = api.get_user(2, 200).unwrap().success().unwrap();
    assert_eq!(after, before);
}

// ---------------------------------------------------------------------------
// Undecodable bodies
// ---------------------------------------------------------------------------

const NOT_UTF8: &[u8] = &[0xff, 0xfe, 0x00];

#[test]
fn non_utf8_error_body_reports_status_mismatch() {
    let addr = start_raw_server("500 Internal Server Error", NOT_UTF8);
    let api = ReqresApi::with_base_url(&format!("http://{addr}/api"));

    let err = api.get_user(2, 200).unwrap_err();
    assert!(
        matches!(
            err,
            ApiError::UnexpectedStatus {
                expected: 200,
                actual: 500
            }
        ),
        "got {err:?}"
    );
}

#[test]
fn delete_never_reads_non_utf8_body() {
    let addr = start_raw_server("500 Internal Server Error", NOT_UTF8);
    let api = ReqresApi::with_base_url(&format!("http://{addr}/api"));

    let err = api.delete_user(2, 204).unwrap_err();
    assert!(
        matches!(
            err,
            ApiError::UnexpectedStatus {
                expected: 204,
                actual: 500
            }
        ),
        "got {err:?}"
    );
}

#[test]
fn matched_status_with_non_utf8_body_is_deserialization_error() {
    let addr = start_raw_server("500 Internal Server Error", NOT_UTF8);
    let api = ReqresApi::with_base_url(&format!("http://{addr}/api"));

    let err = api.get_user(2, 500).unwrap_err();
    assert!(matches!(err, ApiError::Deserialization(_)), "got {err:?}");
}

#[test]
fn raw_response_keeps_body_bytes() {
    let addr = start_raw_server("404 Not Found", NOT_UTF8);
    let api = ReqresApi::with_base_url(&format!("http://{addr}/api"));

    let response = api.get_failing_endpoint().unwrap();
    assert_eq!(response.status, 404);
    assert_eq!(response.body, NOT_UTF8);
    assert_eq!(response.header("Content-Length"), Some("3"));
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[test]
fn operations_share_one_client_across_threads() {
    let api = api();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (1..=6)
            .map(|id| {
                let api = &api;
                scope.spawn(move || api.get_user(id, 200).unwrap().success().unwrap())
            })
            .collect();
        for (handle, id) in handles.into_iter().zip(1..) {
            assert_eq!(handle.join().unwrap().data.id, id);
        }
    });
}
