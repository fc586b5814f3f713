//! Axum request handlers for all service endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::{
    protocol::{
        CreateVehicleRequest, ErrorResponse, HealthResponse, UpdateVehicleRequest,
        VehicleResponse, VerifyResponse,
    },
    ServiceError,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::{error::ApiError, state::AppState};
use crate::records::{self, RecordUpdate, VehicleRecord};

/// `POST /api/vehicles`: validate the request, then store a new vehicle record
/// with its identity numbers encrypted.
pub async fn create_vehicle(
    State(state): State<AppState>,
    body: Result<Json<CreateVehicleRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<VehicleResponse>), ApiError> {
    let Json(req) = body?;
    records::validate_create(&req)?;

    let record = records::protect(req, &state.cipher);
    let id = record.id;
    let response = admin_response(&state, &record);
    state.store.insert(record)?;

    info!(vehicle_id = %id, "vehicle record created");
    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /api/vehicles/:id`: admin view of a vehicle with masked identity
/// numbers and its verification link.
pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VehicleResponse>, ApiError> {
    let record = load(&state, &id)?;
    Ok(Json(admin_response(&state, &record)))
}

/// `PUT /api/vehicles/:id`: update a vehicle record. Identity numbers are
/// re-encrypted only when supplied.
pub async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateVehicleRequest>, JsonRejection>,
) -> Result<Json<VehicleResponse>, ApiError> {
    let id = parse_id(&id)?;
    let Json(req) = body?;
    records::validate_update(&req)?;

    let change = records::prepare_update(req, &state.cipher);
    let record = store_update(&state, &id, change)?;

    info!(vehicle_id = %id, "vehicle record updated");
    Ok(Json(admin_response(&state, &record)))
}

/// `DELETE /api/vehicles/:id`: soft delete. The record stays in the store
/// with status `revoked`.
pub async fn revoke_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VehicleResponse>, ApiError> {
    let id = parse_id(&id)?;
    let record = store_update(&state, &id, RecordUpdate::revoke())?;

    info!(vehicle_id = %id, "vehicle record revoked");
    Ok(Json(admin_response(&state, &record)))
}

/// `GET /api/verify/:id`: unauthenticated verification view reached from
/// the vehicle's QR code.
pub async fn verify_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let record = load(&state, &id)?;
    info!(vehicle_id = %record.id, "vehicle verified");
    Ok(Json(VerifyResponse {
        data: records::view(&record, &state.cipher),
    }))
}

/// `GET /health`: liveness and readiness check.
///
/// Returns `200 OK` when the record store answers.
/// Returns `503 Service Unavailable` otherwise.
pub async fn health(State(state): State<AppState>) -> Response {
    let (status_code, status_str, records) = match state.store.count() {
        Ok(n) => (StatusCode::OK, "ok", n),
        Err(e) => {
            warn!(error = %e, "health check: record store unavailable");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", 0)
        }
    };

    let body = HealthResponse {
        status: status_str.into(),
        version: env!("CARGO_PKG_VERSION").into(),
        records,
    };
    (status_code, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ServiceError::BadRequest("invalid vehicle id".into()).into())
}

fn load(state: &AppState, raw_id: &str) -> Result<VehicleRecord, ApiError> {
    let id = parse_id(raw_id)?;
    state
        .store
        .get(&id)?
        .ok_or_else(not_found_error)
}

fn store_update(
    state: &AppState,
    id: &Uuid,
    change: RecordUpdate,
) -> Result<VehicleRecord, ApiError> {
    state.store.update(id, change)?.ok_or_else(not_found_error)
}

fn not_found_error() -> ApiError {
    ServiceError::NotFound("vehicle record not found".into()).into()
}

fn admin_response(state: &AppState, record: &VehicleRecord) -> VehicleResponse {
    VehicleResponse {
        data: records::view(record, &state.cipher),
        verify_url: state.verify_url(&record.id),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::crypto::mask::FULLY_REDACTED;
    use crate::records::{store::MockVehicleStore, MemoryStore, StoreError, VehicleStore};
    use axum::{
        body::{to_bytes, Body},
        http::Request,
        routing::{get, post},
        Router,
    };
    use common::protocol::VehicleStatus;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health))
            .route("/api/vehicles", post(create_vehicle))
            .route(
                "/api/vehicles/:id",
                get(get_vehicle).put(update_vehicle).delete(revoke_vehicle),
            )
            .route("/api/verify/:id", get(verify_vehicle))
            .with_state(state)
    }

    fn memory_state() -> (AppState, MemoryStore) {
        let store = MemoryStore::new();
        (AppState::for_tests(Arc::new(store.clone())), store)
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, String) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn valid_create_body() -> Value {
        json!({
            "registration_number": "ka01ab1234",
            "owner_name": "Asha Rao",
            "owner_aadhaar": "123456789012",
            "driver_name": "Ravi Kumar",
            "driver_aadhaar": "210987654321",
            "driver_mobile": "9123456780"
        })
    }

    fn stored_record(state: &AppState, owner_envelope: Option<String>) -> VehicleRecord {
        let mut record = records::protect(
            serde_json::from_value(valid_create_body()).unwrap(),
            &state.cipher,
        );
        record.owner_aadhaar_encrypted = owner_envelope;
        record
    }

    #[tokio::test]
    async fn health_reports_record_count() {
        let (state, _) = memory_state();
        let (status, body) = send(test_router(state), get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["records"], 0);
    }

    #[tokio::test]
    async fn health_returns_503_when_store_unavailable() {
        let mut store = MockVehicleStore::new();
        store
            .expect_count()
            .returning(|| Err(StoreError::Unavailable("down".into())));
        let app = test_router(AppState::for_tests(Arc::new(store)));
        let (status, _) = send(app, get_request("/health")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn create_stores_envelopes_and_returns_masked_view() {
        let (state, store) = memory_state();
        let app = test_router(state.clone());
        let (status, body) =
            send(app, json_request("POST", "/api/vehicles", valid_create_body())).await;

        assert_eq!(status, StatusCode::CREATED);
        assert!(!body.contains("123456789012"));
        assert!(!body.contains("encrypted"));

        let resp: VehicleResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(resp.data.registration_number, "KA01AB1234");
        assert_eq!(resp.data.owner_aadhaar_masked, "XXXX-XXXX-9012");
        assert_eq!(resp.data.driver_aadhaar_masked, "XXXX-XXXX-4321");
        assert_eq!(resp.data.status, VehicleStatus::Active);
        assert_eq!(
            resp.verify_url,
            format!("http://localhost:5173/verify/{}", resp.data.id)
        );

        let stored = store.get(&resp.data.id).unwrap().unwrap();
        let envelope = stored.owner_aadhaar_encrypted.unwrap();
        assert_eq!(state.cipher.try_decrypt(&envelope).unwrap(), "123456789012");
    }

    #[tokio::test]
    async fn create_rejects_invalid_aadhaar() {
        let (state, store) = memory_state();
        let mut body = valid_create_body();
        body["owner_aadhaar"] = json!("1234");
        let (status, body) =
            send(test_router(state), json_request("POST", "/api/vehicles", body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let err: ErrorResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(err.code, "bad_request");
        assert!(err.message.contains("owner_aadhaar"));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn create_with_unknown_status_is_bad_request() {
        let (state, store) = memory_state();
        let mut body = valid_create_body();
        body["status"] = json!("stolen");
        let (status, body) =
            send(test_router(state), json_request("POST", "/api/vehicles", body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let err: ErrorResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(err.code, "bad_request");
        assert_eq!(store.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn unparseable_body_is_bad_request() {
        let (state, _) = memory_state();
        let req = Request::builder()
            .method("PUT")
            .uri(format!("/api/vehicles/{}", Uuid::new_v4()))
            .header("content-type", "application/json")
            .body(Body::from("{\"status\": "))
            .unwrap();
        let (status, body) = send(test_router(state), req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let err: ErrorResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(err.code, "bad_request");
    }

    #[tokio::test]
    async fn create_rejects_invalid_registration_date() {
        let (state, _) = memory_state();
        let mut body = valid_create_body();
        body["registration_date"] = json!("not-a-date");
        let (status, body) =
            send(test_router(state), json_request("POST", "/api/vehicles", body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("registration_date"));
    }

    #[tokio::test]
    async fn verify_returns_masked_view() {
        let (state, store) = memory_state();
        let record = stored_record(&state, None);
        let id = record.id;
        let owner = state.cipher.encrypt(Some("999988887777"));
        store.insert(VehicleRecord {
            owner_aadhaar_encrypted: owner,
            ..record
        })
        .unwrap();

        let (status, body) =
            send(test_router(state), get_request(&format!("/api/verify/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        let resp: VerifyResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(resp.data.owner_aadhaar_masked, "XXXX-XXXX-7777");
        assert!(!body.contains("999988887777"));
        assert!(!body.contains("verify_url"));
    }

    #[tokio::test]
    async fn verify_redacts_corrupted_envelope() {
        let state = AppState::for_tests(Arc::new(MemoryStore::new()));
        let record = stored_record(&state, Some("00:gg".into()));
        let id = record.id;

        let mut store = MockVehicleStore::new();
        store
            .expect_get()
            .returning(move |_| Ok(Some(record.clone())));
        let state = AppState {
            store: Arc::new(store),
            ..state
        };

        let (status, body) =
            send(test_router(state), get_request(&format!("/api/verify/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        let resp: VerifyResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(resp.data.owner_aadhaar_masked, FULLY_REDACTED);
        assert_eq!(resp.data.driver_aadhaar_masked, "XXXX-XXXX-4321");
    }

    #[tokio::test]
    async fn verify_unknown_id_is_404() {
        let (state, _) = memory_state();
        let uri = format!("/api/verify/{}", Uuid::new_v4());
        let (status, body) = send(test_router(state), get_request(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("not_found"));
    }

    #[tokio::test]
    async fn malformed_id_is_400() {
        let (state, _) = memory_state();
        let (status, body) = send(test_router(state), get_request("/api/verify/not-a-uuid")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("invalid vehicle id"));
    }

    #[tokio::test]
    async fn get_vehicle_store_unavailable_is_503() {
        let mut store = MockVehicleStore::new();
        store
            .expect_get()
            .returning(|_| Err(StoreError::Unavailable("connection reset".into())));
        let app = test_router(AppState::for_tests(Arc::new(store)));
        let uri = format!("/api/vehicles/{}", Uuid::new_v4());
        let (status, body) = send(app, get_request(&uri)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(!body.contains("connection reset"));
    }

    #[tokio::test]
    async fn update_reencrypts_and_changes_status() {
        let (state, store) = memory_state();
        let record = stored_record(&state, state.cipher.encrypt(Some("123456789012")));
        let id = record.id;
        store.insert(record).unwrap();

        let body = json!({ "owner_aadhaar": "444455556666", "status": "revoked" });
        let (status, body) = send(
            test_router(state.clone()),
            json_request("PUT", &format!("/api/vehicles/{id}"), body),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let resp: VehicleResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(resp.data.owner_aadhaar_masked, "XXXX-XXXX-6666");
        assert_eq!(resp.data.status, VehicleStatus::Revoked);
        assert_eq!(store.get(&id).unwrap().unwrap().status, VehicleStatus::Revoked);
    }

    #[tokio::test]
    async fn updates_to_different_fields_are_kept() {
        let (state, store) = memory_state();
        let record = stored_record(&state, state.cipher.encrypt(Some("123456789012")));
        let id = record.id;
        store.insert(record).unwrap();
        let uri = format!("/api/vehicles/{id}");

        let first = json_request("PUT", &uri, json!({ "owner_mobile": "9876543210" }));
        let second = json_request("PUT", &uri, json!({ "status": "expired" }));
        let (a, b) = tokio::join!(
            send(test_router(state.clone()), first),
            send(test_router(state.clone()), second)
        );
        assert_eq!(a.0, StatusCode::OK);
        assert_eq!(b.0, StatusCode::OK);

        let stored = store.get(&id).unwrap().unwrap();
        assert_eq!(stored.owner_mobile.as_deref(), Some("9876543210"));
        assert_eq!(stored.status, VehicleStatus::Expired);
    }

    #[tokio::test]
    async fn update_store_unavailable_is_503() {
        let mut store = MockVehicleStore::new();
        store
            .expect_update()
            .returning(|_, _| Err(StoreError::Unavailable("write failed".into())));
        let app = test_router(AppState::for_tests(Arc::new(store)));
        let uri = format!("/api/vehicles/{}", Uuid::new_v4());
        let (status, _) = send(app, json_request("PUT", &uri, json!({ "status": "expired" }))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn delete_revokes_and_keeps_record() {
        let (state, store) = memory_state();
        let record = stored_record(&state, state.cipher.encrypt(Some("123456789012")));
        let id = record.id;
        store.insert(record).unwrap();

        let req = Request::builder()
            .method("DELETE")
            .uri(format!("/api/vehicles/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(test_router(state), req).await;

        assert_eq!(status, StatusCode::OK);
        let resp: VehicleResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(resp.data.status, VehicleStatus::Revoked);
        assert_eq!(resp.data.owner_aadhaar_masked, "XXXX-XXXX-9012");
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.get(&id).unwrap().unwrap().status, VehicleStatus::Revoked);
    }

    #[tokio::test]
    async fn delete_unknown_id_is_404() {
        let (state, _) = memory_state();
        let req = Request::builder()
            .method("DELETE")
            .uri(format!("/api/vehicles/{}", Uuid::new_v4()))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(test_router(state), req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("not_found"));
    }

    #[tokio::test]
    async fn update_unknown_id_is_404() {
        let (state, _) = memory_state();
        let uri = format!("/api/vehicles/{}", Uuid::new_v4());
        let (status, _) = send(
            test_router(state),
            json_request("PUT", &uri, json!({ "status": "expired" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
