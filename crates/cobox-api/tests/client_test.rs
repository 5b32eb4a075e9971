#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cobox_api::models::{
    AssignResponsibleRequest, CompleteOrderRequest, CreateDriverRequest, IncidentEvent,
    SignInRequest,
};
use cobox_api::{ApiClient, Error, FlexId, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = ApiClient::new(&server.uri(), &TransportConfig::default()).unwrap();
    (server, client)
}

fn order_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "clientId": 3,
        "addressLine": "Av. Arequipa 123",
        "city": "Lima",
        "country": "PE",
        "postalCode": "15001",
        "referenceLatitude": null,
        "weightKg": 12.5,
        "orderStatus": "Pending"
    })
}

fn sign_in(email: &str, password: &str) -> SignInRequest {
    SignInRequest {
        email: email.into(),
        password: SecretString::from(password),
    }
}

/// Serves `body` from `route`, reads it through `fetch`, then serves the
/// re-serialized value from the same route and reads it again.
async fn assert_round_trip<T, F, Fut>(route: &str, body: serde_json::Value, fetch: F)
where
    T: serde::Serialize + PartialEq + std::fmt::Debug,
    F: Fn(Arc<ApiClient>) -> Fut,
    Fut: std::future::Future<Output = Result<T, Error>>,
{
    let (server, client) = setup().await;
    let client = Arc::new(client);
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    let first = fetch(Arc::clone(&client)).await.unwrap();
    let reserialized = serde_json::to_value(&first).unwrap();
    assert_eq!(reserialized, body);

    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(&reserialized))
        .mount(&server)
        .await;
    let second = fetch(client).await.unwrap();
    assert_eq!(second, first);
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn sign_in_success_returns_token_and_raw_roles() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/authentication/sign-in"))
        .and(body_json(json!({"email": "a@b.co", "password": "secret1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "email": "a@b.co",
            "token": "T",
            "roles": ["role_manager"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.sign_in(&sign_in("a@b.co", "secret1")).await.unwrap();
    assert_eq!(resp.token, "T");
    assert_eq!(resp.roles, json!(["role_manager"]));
}

#[tokio::test]
async fn sign_in_rejection_carries_status_and_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/authentication/sign-in"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "bad credentials"})))
        .mount(&server)
        .await;

    let err = client
        .sign_in(&sign_in("a@b.co", "wrong-pass"))
        .await
        .unwrap_err();
    let Error::Authentication { message } = err else {
        panic!("expected Authentication error, got: {err:?}");
    };
    assert!(message.contains("401"), "{message}");
    assert!(message.contains("bad credentials"), "{message}");
}

#[tokio::test]
async fn sign_in_with_short_password_never_sends() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client.sign_in(&sign_in("a@b.co", "123")).await.unwrap_err();
    let Error::Validation(report) = err else {
        panic!("expected Validation error, got: {err:?}");
    };
    assert_eq!(
        report.message_for("password"),
        Some("Password must be at least 6 characters long")
    );
}

#[tokio::test]
async fn sign_in_with_unparsable_body_is_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/authentication/sign-in"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = client
        .sign_in(&sign_in("a@b.co", "secret1"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Authentication { .. }));
    assert!(err.to_string().contains("<html>gateway</html>"));
}

// ── Credential ──────────────────────────────────────────────────────

#[tokio::test]
async fn bearer_token_follows_set_token() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/vehicles"))
        .and(header("authorization", "Bearer T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    client.set_token(Some(SecretString::from("T")));
    assert!(client.list_vehicles().await.unwrap().is_empty());

    client.clear_token();
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    Mock::given(method("GET"))
        .and(path("/api/v1/drivers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    client.list_drivers().await.unwrap();
    let requests = server.received_requests().await.unwrap();
    assert!(!requests[1].headers.contains_key("authorization"));
}

// ── HTTP errors ─────────────────────────────────────────────────────

#[tokio::test]
async fn non_success_uses_body_message() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/v1/routes/4/in-progress"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({"message": "Route has no driver"})))
        .mount(&server)
        .await;

    let err = client.mark_route_in_progress(4).await.unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert_eq!(err.to_string(), "HTTP 409: Route has no driver");
}

// ── Orders ──────────────────────────────────────────────────────────

#[tokio::test]
async fn complete_order_sends_exact_body() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/v1/orders/12/completed"))
        .and(body_json(json!({
            "routeId": 4,
            "photoUrl": "https://x/p.jpg",
            "receiverName": "Ana",
            "signatureData": "sig"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_json(12)))
        .expect(1)
        .mount(&server)
        .await;

    let req = CompleteOrderRequest {
        route_id: 4,
        photo_url: "https://x/p.jpg".into(),
        receiver_name: "Ana".into(),
        signature_data: "sig".into(),
    };
    let order = client.complete_order(12, &req).await.unwrap();
    assert_eq!(order.id, 12);
    assert_eq!(order.reference_latitude, Some(None));
    assert_eq!(order.reference_longitude, None);
    assert_eq!(order.notes(), None);
}

#[tokio::test]
async fn mark_order_ready_sends_no_body() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/v1/orders/12/ready-for-dispatch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_json(12)))
        .expect(1)
        .mount(&server)
        .await;

    client.mark_order_ready(12).await.unwrap();
    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn batch_fetch_fails_when_any_order_fails() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/orders/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_json(1)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/orders/2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let ok = client.get_orders_by_ids(&[1, 1]).await.unwrap();
    assert_eq!(ok.len(), 2);

    let err = client.get_orders_by_ids(&[1, 2]).await.unwrap_err();
    assert!(err.is_not_found());
}

// ── Validation ──────────────────────────────────────────────────────

#[tokio::test]
async fn short_licence_is_rejected_before_sending() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/drivers"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = client
        .create_driver(&CreateDriverRequest {
            licence_number: "1234".into(),
        })
        .await
        .unwrap_err();
    let Error::Validation(report) = err else {
        panic!("expected Validation error, got: {err:?}");
    };
    assert_eq!(report.issues()[0].path, "licenceNumber");
}

#[tokio::test]
async fn invalid_list_element_keeps_raw_body() {
    let (server, client) = setup().await;

    let body = r#"[{"id":1,"plateNumber":"AB-1","capacityKg":900,"vehicleStatus":"Active"},{"id":2,"capacityKg":1}]"#;
    Mock::given(method("GET"))
        .and(path("/api/v1/vehicles"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let err = client.list_vehicles().await.unwrap_err();
    let Error::InvalidResponse { report, body: raw } = err else {
        panic!("expected InvalidResponse, got: {err:?}");
    };
    assert_eq!(report.issues()[0].path, "[1].plateNumber");
    assert_eq!(raw, body);
}

// ── Incidents & users ───────────────────────────────────────────────

#[tokio::test]
async fn incident_ids_are_normalized_to_strings() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/incidents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 10, "title": "Flat tyre", "status": "OPEN", "responsibleUserId": 5},
            {"id": "11", "title": "Late", "status": "OPEN", "responsibleUserId": null}
        ])))
        .mount(&server)
        .await;

    let incidents = client.list_incidents().await.unwrap();
    assert_eq!(incidents[0].id.as_str(), "10");
    assert_eq!(incidents[0].responsible(), Some(&FlexId::from("5")));
    assert_eq!(incidents[1].responsible(), None);
}

#[tokio::test]
async fn assign_responsible_sends_string_id() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/incidents/10/assign-responsible"))
        .and(body_json(json!({"newResponsibleUserId": "7"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 10, "title": "Flat tyre", "status": "OPEN", "responsibleUserId": 7,
            "severity": "HIGH"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let detail = client
        .assign_responsible(
            &FlexId::from(10),
            &AssignResponsibleRequest {
                new_responsible_user_id: FlexId::from(7),
            },
        )
        .await
        .unwrap();
    assert_eq!(detail.responsible(), Some(&FlexId::from(7)));
    assert_eq!(detail.extra.get("severity"), Some(&json!("HIGH")));
}

#[tokio::test]
async fn user_search_encodes_query_and_accepts_empty_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("query", "ana maría"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.search_users("ana maría").await.unwrap().is_empty());
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("query=ana+mar%C3%ADa"));
}

#[tokio::test]
async fn incident_event_is_tagged_and_flattened() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/events"))
        .and(body_json(json!({
            "type": "IncidentResponsibleUserAssigned",
            "incidentId": "10",
            "oldResponsibleUserId": "5",
            "newResponsibleUserId": "7",
            "changedBy": "1",
            "reason": "Shift change",
            "timestamp": "2026-01-01T00:00:00Z"
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let event = IncidentEvent {
        incident_id: FlexId::from(10),
        old_responsible_user_id: Some(FlexId::from(5)),
        new_responsible_user_id: FlexId::from(7),
        changed_by: Some(FlexId::from(1)),
        reason: Some("Shift change".into()),
        timestamp: Some("2026-01-01T00:00:00Z".into()),
    };
    client.publish_incident_event(&event).await.unwrap();
}

// ── Round trips ─────────────────────────────────────────────────────

#[tokio::test]
async fn vehicle_survives_a_round_trip() {
    let body = json!({
        "id": 8,
        "plateNumber": "ABC-123",
        "capacityKg": 1500.0,
        "vehicleStatus": "Available"
    });
    assert_round_trip("/api/v1/vehicles/8", body, |c| async move { c.get_vehicle(8).await })
        .await;
}

#[tokio::test]
async fn order_with_null_coordinates_survives_a_round_trip() {
    let mut body = order_json(12);
    body["referenceLongitude"] = json!(null);
    body["notes"] = json!(null);
    assert_round_trip("/api/v1/orders/12", body, |c| async move { c.get_order(12).await }).await;
}

#[tokio::test]
async fn route_keeps_null_and_absent_assignments_apart() {
    let body = json!({
        "id": 4,
        "title": "Centro",
        "vehicleId": null,
        "driverId": 2,
        "ordersIds": [{"orderId": 12}],
        "finishedOrderIds": [],
        "routeStatus": "Planned"
    });
    assert_round_trip("/api/v1/routes/4", body, |c| async move { c.get_route(4).await }).await;

    let mut unassigned = json!({
        "id": 5,
        "title": "Norte",
        "ordersIds": [],
        "finishedOrderIds": [],
        "routeStatus": "Planned"
    });
    assert_round_trip("/api/v1/routes/5", unassigned.clone(), |c| async move {
        c.get_route(5).await
    })
    .await;
    unassigned["vehicleId"] = json!(null);
    let route: cobox_api::models::Route = serde_json::from_value(unassigned).unwrap();
    assert_eq!(route.vehicle_id, Some(None));
    assert_eq!(route.driver_id, None);
    assert_eq!(route.vehicle(), None);
}
