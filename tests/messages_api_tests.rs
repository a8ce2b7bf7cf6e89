//! Studio mailbox endpoints exercised through the full router.

use anyhow::Result;
use axum::http::StatusCode;
use casting::models::message::{NewMessage, Party};
use casting::repositories::MessageRepository;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use uuid::Uuid;

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::{TestApp, create_casting_call, create_studio_account, create_talent};

async fn talent_writes_to_studio(
    db: &DatabaseConnection,
    talent_id: Uuid,
    studio_id: Uuid,
    subject: &str,
) -> Result<Uuid> {
    let message = MessageRepository::new(db)
        .create(NewMessage {
            sender: Party::Talent { id: talent_id },
            receiver: Party::Studio { id: studio_id },
            subject: subject.to_string(),
            content: "Hello there".to_string(),
            related_to_project_id: None,
            related_to_casting_call_id: None,
        })
        .await?;
    Ok(message.id)
}

#[tokio::test]
async fn send_message_creates_outbound_message() -> Result<()> {
    let app = TestApp::new().await?;
    let studio = create_studio_account(&app.db, "Northlight Pictures").await?;
    let talent = create_talent(&app.db, "Ana Lima").await?;
    let token = app.token_for(studio.user_id)?;

    let response = app
        .post(
            "/api/studio/messages",
            &token,
            json!({
                "talentId": talent.profile_id(),
                "subject": "Callback",
                "content": "Can you come in on Friday?"
            }),
        )
        .await?;

    assert_eq!(response.status, StatusCode::CREATED);
    let message = &response.body;
    assert_eq!(message["subject"], "Callback");
    assert_eq!(message["sender"]["kind"], "studio");
    assert_eq!(message["sender"]["id"], json!(studio.studio_id()));
    assert_eq!(message["receiver"]["kind"], "talent");
    assert_eq!(message["receiver"]["id"], json!(talent.profile_id()));
    assert_eq!(message["isRead"], false);
    assert_eq!(message["isArchived"], false);

    let outbox = app.get("/api/studio/messages?sent=true", &token).await?;
    assert_eq!(outbox.status, StatusCode::OK);
    let messages = outbox.body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["talentName"], "Ana Lima");
    assert_eq!(messages[0]["studioName"], "Northlight Pictures");

    let inbox = app.get("/api/studio/messages", &token).await?;
    assert_eq!(inbox.body["messages"], Value::Array(vec![]));
    Ok(())
}

#[tokio::test]
async fn send_message_validates_body() -> Result<()> {
    let app = TestApp::new().await?;
    let studio = create_studio_account(&app.db, "Northlight").await?;
    let talent = create_talent(&app.db, "Ana Lima").await?;
    let token = app.token_for(studio.user_id)?;

    let blank = app
        .post(
            "/api/studio/messages",
            &token,
            json!({ "talentId": talent.profile_id(), "subject": "   ", "content": "Hi" }),
        )
        .await?;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
    assert_eq!(blank.body["code"], "VALIDATION_FAILED");
    assert!(blank.body["details"]["subject"].is_array());
    assert_eq!(
        blank.content_type.as_deref(),
        Some("application/problem+json")
    );

    let unknown_field = app
        .post(
            "/api/studio/messages",
            &token,
            json!({ "talentId": talent.profile_id(), "subject": "Hi", "content": "Hi", "priority": 1 }),
        )
        .await?;
    assert_eq!(unknown_field.status, StatusCode::BAD_REQUEST);

    let missing_talent = app
        .post(
            "/api/studio/messages",
            &token,
            json!({ "talentId": Uuid::new_v4(), "subject": "Hi", "content": "Hi" }),
        )
        .await?;
    assert_eq!(missing_talent.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn send_message_rejects_foreign_casting_call() -> Result<()> {
    let app = TestApp::new().await?;
    let studio = create_studio_account(&app.db, "Northlight").await?;
    let rival = create_studio_account(&app.db, "Rival").await?;
    let talent = create_talent(&app.db, "Ana Lima").await?;
    let rival_call = create_casting_call(&app.db, rival.studio_id(), "Rival lead").await?;
    let token = app.token_for(studio.user_id)?;

    let response = app
        .post(
            "/api/studio/messages",
            &token,
            json!({
                "talentId": talent.profile_id(),
                "subject": "Hi",
                "content": "Hi",
                "relatedToCastingCallId": rival_call.id
            }),
        )
        .await?;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn inbox_lists_inbound_messages_with_archive_filter() -> Result<()> {
    let app = TestApp::new().await?;
    let studio = create_studio_account(&app.db, "Northlight").await?;
    let talent = create_talent(&app.db, "Ana Lima").await?;
    let token = app.token_for(studio.user_id)?;

    let first = talent_writes_to_studio(&app.db, talent.profile_id(), studio.studio_id(), "First").await?;
    let second = talent_writes_to_studio(&app.db, talent.profile_id(), studio.studio_id(), "Second").await?;

    let archived = app
        .patch(
            &format!("/api/studio/messages/{first}"),
            &token,
            json!({ "isArchived": true }),
        )
        .await?;
    assert_eq!(archived.status, StatusCode::OK);
    assert_eq!(archived.body["isArchived"], true);

    let inbox = app.get("/api/studio/messages", &token).await?;
    let all = inbox.body["messages"].as_array().unwrap();
    assert_eq!(all.len(), 2);

    let active = app
        .get("/api/studio/messages?archived=false", &token)
        .await?;
    let active = active.body["messages"].as_array().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["id"], json!(second));

    let only_archived = app.get("/api/studio/messages?archived=true", &token).await?;
    let only_archived = only_archived.body["messages"].as_array().unwrap();
    assert_eq!(only_archived.len(), 1);
    assert_eq!(only_archived[0]["id"], json!(first));
    Ok(())
}

#[tokio::test]
async fn reading_inbound_message_marks_it_read_once() -> Result<()> {
    let app = TestApp::new().await?;
    let studio = create_studio_account(&app.db, "Northlight").await?;
    let talent = create_talent(&app.db, "Ana Lima").await?;
    let token = app.token_for(studio.user_id)?;
    let id = talent_writes_to_studio(&app.db, talent.profile_id(), studio.studio_id(), "Hi").await?;

    let first = app.get(&format!("/api/studio/messages/{id}"), &token).await?;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["isRead"], true);

    let second = app.get(&format!("/api/studio/messages/{id}"), &token).await?;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.body["isRead"], true);

    // Already read: further reads do not write again.
    let third = app.get(&format!("/api/studio/messages/{id}"), &token).await?;
    assert_eq!(third.body["isRead"], true);
    assert_eq!(third.body["updatedAt"], second.body["updatedAt"]);
    Ok(())
}

#[tokio::test]
async fn reading_outbound_message_leaves_it_unread() -> Result<()> {
    let app = TestApp::new().await?;
    let studio = create_studio_account(&app.db, "Northlight").await?;
    let talent = create_talent(&app.db, "Ana Lima").await?;
    let token = app.token_for(studio.user_id)?;

    let sent = app
        .post(
            "/api/studio/messages",
            &token,
            json!({ "talentId": talent.profile_id(), "subject": "Hi", "content": "Hi" }),
        )
        .await?;
    let id = sent.body["id"].as_str().unwrap().to_string();

    let fetched = app.get(&format!("/api/studio/messages/{id}"), &token).await?;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["isRead"], false);
    Ok(())
}

#[tokio::test]
async fn other_studio_cannot_touch_message() -> Result<()> {
    let app = TestApp::new().await?;
    let studio = create_studio_account(&app.db, "Northlight").await?;
    let rival = create_studio_account(&app.db, "Rival").await?;
    let talent = create_talent(&app.db, "Ana Lima").await?;
    let id = talent_writes_to_studio(&app.db, talent.profile_id(), studio.studio_id(), "Private").await?;
    let rival_token = app.token_for(rival.user_id)?;
    let uri = format!("/api/studio/messages/{id}");

    let read = app.get(&uri, &rival_token).await?;
    assert_eq!(read.status, StatusCode::FORBIDDEN);
    assert_eq!(read.body["code"], "FORBIDDEN");

    let patch = app.patch(&uri, &rival_token, json!({ "isRead": true })).await?;
    assert_eq!(patch.status, StatusCode::FORBIDDEN);

    let archive = app
        .patch(&uri, &rival_token, json!({ "isArchived": true }))
        .await?;
    assert_eq!(archive.status, StatusCode::FORBIDDEN);

    let delete = app.delete(&uri, &rival_token).await?;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);

    let owner_token = app.token_for(studio.user_id)?;
    let unchanged = app
        .request(axum::http::Method::GET, "/api/studio/messages", Some(&owner_token), None)
        .await?;
    let messages = unchanged.body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["isRead"], false);
    assert_eq!(messages[0]["isArchived"], false);
    Ok(())
}

#[tokio::test]
async fn patch_with_unknown_field_is_rejected() -> Result<()> {
    let app = TestApp::new().await?;
    let studio = create_studio_account(&app.db, "Northlight").await?;
    let talent = create_talent(&app.db, "Ana Lima").await?;
    let token = app.token_for(studio.user_id)?;
    let id = talent_writes_to_studio(&app.db, talent.profile_id(), studio.studio_id(), "Hi").await?;

    let response = app
        .patch(
            &format!("/api/studio/messages/{id}"),
            &token,
            json!({ "subject": "rewritten" }),
        )
        .await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "VALIDATION_FAILED");
    Ok(())
}

#[tokio::test]
async fn delete_removes_message() -> Result<()> {
    let app = TestApp::new().await?;
    let studio = create_studio_account(&app.db, "Northlight").await?;
    let talent = create_talent(&app.db, "Ana Lima").await?;
    let token = app.token_for(studio.user_id)?;
    let id = talent_writes_to_studio(&app.db, talent.profile_id(), studio.studio_id(), "Hi").await?;
    let uri = format!("/api/studio/messages/{id}");

    let deleted = app.delete(&uri, &token).await?;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body, json!({ "success": true }));

    let gone = app.get(&uri, &token).await?;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.body["code"], "NOT_FOUND");

    let again = app.delete(&uri, &token).await?;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn missing_session_is_unauthorized() -> Result<()> {
    let app = TestApp::new().await?;

    let response = app
        .request(axum::http::Method::GET, "/api/studio/messages", None, None)
        .await?;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["code"], "UNAUTHORIZED");
    Ok(())
}
