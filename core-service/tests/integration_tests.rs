//! End-to-end tests of the service façade over the in-memory backends.

use bridge_memory::{
    MemoryBlobStore, MemoryDocumentStore, MemoryIdentityBackend, RecordingHttpClient,
};
use bridge_traits::document::DocumentStore;
use bytes::Bytes;
use core_service::{CoreConfig, CoreService, ErrorCode};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

struct Backends {
    identity: Arc<MemoryIdentityBackend>,
    documents: Arc<MemoryDocumentStore>,
    blobs: Arc<MemoryBlobStore>,
    http: Arc<RecordingHttpClient>,
}

fn service() -> (CoreService, Backends) {
    let backends = Backends {
        identity: Arc::new(MemoryIdentityBackend::new()),
        documents: Arc::new(MemoryDocumentStore::new()),
        blobs: Arc::new(MemoryBlobStore::with_base_url("https://cdn.example.com")),
        http: Arc::new(RecordingHttpClient::new()),
    };

    let config = CoreConfig::builder()
        .identity(backends.identity.clone())
        .documents(backends.documents.clone())
        .blobs(backends.blobs.clone())
        .http_client(backends.http.clone())
        .register_user_endpoint("https://api.example.com/users/create")
        .build()
        .expect("config should validate");

    (CoreService::new(config).expect("service should build"), backends)
}

fn sign_up_params(email: &str) -> core_auth::SignUpParams {
    core_auth::SignUpParams {
        email: email.to_string(),
        password: "pw123456".to_string(),
        profile: Some(core_auth::ProfileSeed {
            display_name: Some("Ana".to_string()),
            role: None,
        }),
    }
}

#[tokio::test]
async fn sign_up_then_get_session_round_trip() {
    let (service, _) = service();

    let envelope = service.auth().sign_up(sign_up_params("a@x.com")).await;
    assert!(envelope.error.is_none());
    assert_eq!(envelope.data.unwrap().user.email, "a@x.com");

    let session = service
        .auth()
        .get_session()
        .await
        .into_result()
        .unwrap()
        .session
        .expect("session should be cached");
    assert_eq!(session.user.email, "a@x.com");
}

#[tokio::test]
async fn sign_up_notifies_collaborator_fire_and_forget() {
    let (service, backends) = service();

    service
        .auth()
        .sign_up(sign_up_params("a@x.com"))
        .await
        .into_result()
        .unwrap();

    // The collaborator call is spawned off the sign-up path; poll for it.
    let mut requests = Vec::new();
    for _ in 0..100 {
        requests = backends.http.requests().await;
        if !requests.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, "https://api.example.com/users/create");
}

#[tokio::test]
async fn insert_then_select_round_trip() {
    let (service, _) = service();

    let posts = service.from("posts");
    let inserted = posts
        .insert(json!({ "uid": "u1", "text": "leg day", "location": null }))
        .await
        .into_result()
        .unwrap();
    let id = inserted[0].id.clone();

    let rows = posts.select().await.into_result().unwrap();
    let found = rows.iter().find(|row| row.id == id).expect("row visible");
    assert_eq!(found.str_field("text"), Some("leg day"));
    assert_eq!(found.field("location"), Some(&json!(null)));
}

#[tokio::test]
async fn select_caps_at_fifty_rows_newest_first() {
    let (service, _) = service();
    let stories = service.from("stories");

    for i in 0..60 {
        stories
            .insert(json!({ "n": i }))
            .await
            .into_result()
            .unwrap();
    }

    let rows = stories.select().await.into_result().unwrap();
    assert_eq!(rows.len(), 50);
    assert_eq!(rows[0].field("n"), Some(&json!(59)));
    for pair in rows.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }
}

#[tokio::test]
async fn evidence_post_grants_award_through_the_facade() {
    let (service, backends) = service();

    service
        .from("posts")
        .insert(json!({
            "uid": "u1",
            "text": "done!",
            "isChallengeEvidence": true,
            "challenge_id": "c42"
        }))
        .await
        .into_result()
        .unwrap();

    // The award record is visible through the same fluent surface
    let medals = service.from("medals").select().await.into_result().unwrap();
    assert_eq!(medals.len(), 1);
    assert_eq!(medals[0].str_field("uid"), Some("u1"));
    assert_eq!(medals[0].str_field("challengeId"), Some("c42"));

    let user = backends.documents.get("users", "u1").await.unwrap().unwrap();
    assert_eq!(user.field("medals").unwrap().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn contract_violations_settle_without_writes() {
    let (service, backends) = service();
    let posts = service.from("posts");

    let update = posts.update(json!({ "text": "no target" })).await;
    assert_eq!(update.error.unwrap().message, "id required");

    let delete = posts.delete(json!({ "id": "x" })).await;
    assert_eq!(delete.error.unwrap().message, "unsupported delete");

    assert_eq!(backends.documents.count("posts").await, 0);
}

#[tokio::test]
async fn reset_password_reports_success_for_any_email() {
    let (service, backends) = service();

    let envelope = service.auth().reset_password_for_email("nobody@x.com").await;
    assert!(envelope.is_ok());

    // The provider accepted the request; delivery is out of band
    assert_eq!(
        backends.identity.reset_requests().await,
        vec!["nobody@x.com".to_string()]
    );
}

#[tokio::test]
async fn storage_upload_and_resolve() {
    let (service, backends) = service();

    let uploaded = service
        .storage()
        .from("avatars")
        .upload("u1/pic.png", Bytes::from_static(b"img"), Some("image/png"))
        .await
        .into_result()
        .unwrap();
    assert_eq!(uploaded.public_url, "https://cdn.example.com/avatars/u1/pic.png");

    let blob = backends.blobs.object("avatars", "u1/pic.png").await.unwrap();
    assert_eq!(blob.data, Bytes::from_static(b"img"));

    let resolved = service
        .storage()
        .from("avatars")
        .get_public_url("u1/pic.png")
        .await
        .into_result()
        .unwrap();
    assert_eq!(resolved.public_url, uploaded.public_url);
}

#[tokio::test]
async fn every_failure_settles_to_an_envelope() {
    let (service, _) = service();

    // Identity rejection
    let auth = service
        .auth()
        .sign_in_with_password(core_auth::Credentials {
            email: "nobody@x.com".to_string(),
            password: "pw123456".to_string(),
        })
        .await;
    assert_eq!(auth.error.unwrap().code, ErrorCode::Auth);

    // Backend miss on update
    let data = service
        .from("posts")
        .update(json!({ "id": "ghost", "text": "x" }))
        .await;
    assert_eq!(data.error.unwrap().code, ErrorCode::Backend);

    // Contract violation on delete
    let del = service.from("posts").delete(json!("bad shape")).await;
    assert_eq!(del.error.unwrap().code, ErrorCode::Contract);
}

#[tokio::test]
async fn auth_watcher_lifecycle_through_the_facade() {
    let (service, _) = service();

    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = seen.clone();
    let subscription = service
        .auth()
        .on_auth_state_change(move |kind, _| {
            sink.lock().unwrap().push(kind);
        })
        .await;

    service
        .auth()
        .sign_up(sign_up_params("a@x.com"))
        .await
        .into_result()
        .unwrap();
    service.auth().sign_out().await;

    subscription.unsubscribe();
    service
        .auth()
        .sign_in_with_password(core_auth::Credentials {
            email: "a@x.com".to_string(),
            password: "pw123456".to_string(),
        })
        .await
        .into_result()
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![
            core_auth::AuthChangeKind::InitialSession,
            core_auth::AuthChangeKind::SignedIn,
            core_auth::AuthChangeKind::SignedOut,
        ]
    );
}

#[tokio::test]
async fn update_by_id_is_the_explicit_path() {
    let (service, _) = service();
    let plans = service.from("workout_plans");

    let inserted = plans
        .insert(json!({ "title": "old", "weeks": 4 }))
        .await
        .into_result()
        .unwrap();

    let rows = plans
        .update_by_id(&inserted[0].id, json!({ "title": "new", "weeks": 6 }))
        .await
        .into_result()
        .unwrap();
    assert_eq!(rows[0].str_field("title"), Some("new"));
    assert_eq!(rows[0].field("weeks"), Some(&json!(6)));
}
