mod common;

use assert_matches::assert_matches;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::models::{AppointmentError, AppointmentStatus, NewAppointment};
use appointment_cell::store::{AppointmentStore, SupabaseAppointmentStore};
use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_models::ViewerRole;

use common::{date, time};

fn store_for(server: &MockServer) -> SupabaseAppointmentStore {
    let config = AppConfig {
        supabase_url: server.uri(),
        supabase_anon_key: "test-anon-key".to_string(),
        poll_interval_secs: 1,
    };
    SupabaseAppointmentStore::new(SupabaseClient::new(&config), Some("test-token".to_string()))
}

fn appointment_row(id: Uuid, status: &str) -> serde_json::Value {
    json!({
        "id": id.to_string(),
        "patientId": "pat-1",
        "patientName": "Ravi Kumar",
        "doctorId": "doc-1",
        "doctorName": "Asha Rao",
        "date": "2024-06-11",
        "time": "09:30:00",
        "reason": "Recurring headaches",
        "status": status,
        "createdAt": "2024-06-01T08:00:00Z"
    })
}

fn new_appointment() -> NewAppointment {
    NewAppointment {
        patient_id: "pat-1".to_string(),
        patient_name: "Ravi Kumar".to_string(),
        doctor_id: "doc-1".to_string(),
        doctor_name: "Asha Rao".to_string(),
        date: date(2024, 6, 11),
        time: time(9, 30),
        reason: "Recurring headaches".to_string(),
    }
}

#[tokio::test]
async fn practitioner_directory_decodes_users_rows() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("role", "eq.doctor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "doc-1", "name": "Asha Rao", "specialization": "General Medicine", "license": "MED-1001"},
            {"id": "doc-2", "name": "Meera Shah", "specialization": "Dermatology", "license": "MED-2044"}
        ])))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let practitioners = store.list_practitioners().await.unwrap();

    assert_eq!(practitioners.len(), 2);
    assert_eq!(practitioners[0].name, "Asha Rao");
    assert_eq!(practitioners[1].license, "MED-2044");
}

#[tokio::test]
async fn viewer_queries_filter_by_role_column() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("doctorId", "eq.doc-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([appointment_row(id, "pending")])),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("patientId", "eq.pat-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = store_for(&server);

    let doctor_view = store
        .list_for_viewer(ViewerRole::Doctor, "doc-1")
        .await
        .unwrap();
    assert_eq!(doctor_view.len(), 1);
    assert_eq!(doctor_view[0].id, id);
    assert_eq!(doctor_view[0].status, AppointmentStatus::Pending);
    assert_eq!(doctor_view[0].time, time(9, 30));

    let patient_view = store
        .list_for_viewer(ViewerRole::Patient, "pat-1")
        .await
        .unwrap();
    assert!(patient_view.is_empty());
}

#[tokio::test]
async fn fetch_of_missing_record_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = store_for(&server);
    assert_matches!(
        store.fetch(Uuid::new_v4()).await,
        Err(AppointmentError::NotFound)
    );
}

#[tokio::test]
async fn insert_returns_the_stored_representation() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!([appointment_row(id, "pending")])),
        )
        .mount(&server)
        .await;

    let store = store_for(&server);
    let appointment = store.insert(new_appointment()).await.unwrap();

    assert_eq!(appointment.id, id);
    assert_eq!(appointment.status, AppointmentStatus::Pending);
}

#[tokio::test]
async fn insert_rejects_missing_required_fields_before_writing() {
    // no mock server routes at all: validation must fail before any request
    let server = MockServer::start().await;
    let store = store_for(&server);

    let mut record = new_appointment();
    record.reason = " ".to_string();

    assert_matches!(
        store.insert(record).await,
        Err(AppointmentError::Validation(_))
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn set_status_maps_zero_rows_to_not_found() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = store_for(&server);
    assert_matches!(
        store.set_status(id, AppointmentStatus::Approved).await,
        Err(AppointmentError::NotFound)
    );
}

#[tokio::test]
async fn set_status_succeeds_when_a_row_is_updated() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", id)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([appointment_row(id, "approved")])),
        )
        .mount(&server)
        .await;

    let store = store_for(&server);
    store
        .set_status(id, AppointmentStatus::Approved)
        .await
        .unwrap();
}

#[tokio::test]
async fn write_failures_surface_as_store_errors() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .mount(&server)
        .await;

    let store = store_for(&server);
    assert_matches!(
        store
            .set_status(Uuid::new_v4(), AppointmentStatus::Cancelled)
            .await,
        Err(AppointmentError::Store(_))
    );
}
