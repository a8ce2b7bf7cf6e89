//! Casting call invitations through the router: all-or-nothing batches and
//! the response-status join.

use anyhow::Result;
use axum::http::StatusCode;
use casting::config::AppConfig;
use casting::models::MessageRow;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;
use uuid::Uuid;

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::{
    TestApp, create_application, create_casting_call, create_studio_account, create_talent,
};

#[tokio::test]
async fn sending_invitations_writes_one_message_per_talent() -> Result<()> {
    let app = TestApp::new().await?;
    let studio = create_studio_account(&app.db, "Northlight").await?;
    let call = create_casting_call(&app.db, studio.studio_id(), "Lead role").await?;
    let ana = create_talent(&app.db, "Ana Lima").await?;
    let rui = create_talent(&app.db, "Rui Costa").await?;
    let token = app.token_for(studio.user_id)?;

    let response = app
        .post(
            &format!("/api/studio/casting-calls/{}/invitations", call.id),
            &token,
            json!({
                "talentIds": [ana.profile_id(), rui.profile_id()],
                "message": "We loved your reel"
            }),
        )
        .await?;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body, json!({ "success": true, "invitationsSent": 2 }));
    assert_eq!(MessageRow::find().count(&app.db).await?, 2);

    let listed = app
        .get(
            &format!("/api/studio/casting-calls/{}/invitations", call.id),
            &token,
        )
        .await?;
    assert_eq!(listed.status, StatusCode::OK);
    let invitations = listed.body["invitations"].as_array().unwrap();
    assert_eq!(invitations.len(), 2);
    for invitation in invitations {
        assert_eq!(invitation["subject"], "Invitation: Lead role");
        assert_eq!(invitation["content"], "We loved your reel");
        assert_eq!(invitation["relatedToCastingCallId"], json!(call.id));
        assert_eq!(invitation["hasResponded"], false);
        assert!(invitation["responseStatus"].is_null());
    }
    Ok(())
}

#[tokio::test]
async fn duplicate_talent_ids_are_collapsed() -> Result<()> {
    let app = TestApp::new().await?;
    let studio = create_studio_account(&app.db, "Northlight").await?;
    let call = create_casting_call(&app.db, studio.studio_id(), "Lead role").await?;
    let ana = create_talent(&app.db, "Ana Lima").await?;
    let token = app.token_for(studio.user_id)?;

    let response = app
        .post(
            &format!("/api/studio/casting-calls/{}/invitations", call.id),
            &token,
            json!({ "talentIds": [ana.profile_id(), ana.profile_id()] }),
        )
        .await?;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["invitationsSent"], 1);
    Ok(())
}

#[tokio::test]
async fn unknown_talent_id_rolls_back_whole_batch() -> Result<()> {
    let app = TestApp::new().await?;
    let studio = create_studio_account(&app.db, "Northlight").await?;
    let call = create_casting_call(&app.db, studio.studio_id(), "Lead role").await?;
    let ana = create_talent(&app.db, "Ana Lima").await?;
    let token = app.token_for(studio.user_id)?;

    let response = app
        .post(
            &format!("/api/studio/casting-calls/{}/invitations", call.id),
            &token,
            json!({ "talentIds": [ana.profile_id(), Uuid::new_v4()] }),
        )
        .await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "INVALID_TALENT_ID");
    assert_eq!(MessageRow::find().count(&app.db).await?, 0);
    Ok(())
}

#[tokio::test]
async fn empty_talent_list_is_validation_error() -> Result<()> {
    let app = TestApp::new().await?;
    let studio = create_studio_account(&app.db, "Northlight").await?;
    let call = create_casting_call(&app.db, studio.studio_id(), "Lead role").await?;
    let token = app.token_for(studio.user_id)?;

    let response = app
        .post(
            &format!("/api/studio/casting-calls/{}/invitations", call.id),
            &token,
            json!({ "talentIds": [] }),
        )
        .await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "VALIDATION_FAILED");
    assert!(response.body["details"]["talent_ids"].is_array());
    Ok(())
}

#[tokio::test]
async fn batch_above_configured_limit_is_rejected() -> Result<()> {
    let app = TestApp::with_config(AppConfig {
        max_invitations_per_request: 2,
        ..Default::default()
    })
    .await?;
    let studio = create_studio_account(&app.db, "Northlight").await?;
    let call = create_casting_call(&app.db, studio.studio_id(), "Lead role").await?;
    let token = app.token_for(studio.user_id)?;

    let response = app
        .post(
            &format!("/api/studio/casting-calls/{}/invitations", call.id),
            &token,
            json!({ "talentIds": [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()] }),
        )
        .await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "VALIDATION_FAILED");
    assert_eq!(MessageRow::find().count(&app.db).await?, 0);
    Ok(())
}

#[tokio::test]
async fn oversized_batch_still_checks_casting_call_access_first() -> Result<()> {
    let app = TestApp::with_config(AppConfig {
        max_invitations_per_request: 2,
        ..Default::default()
    })
    .await?;
    let owner = create_studio_account(&app.db, "Northlight").await?;
    let rival = create_studio_account(&app.db, "Rival").await?;
    let call = create_casting_call(&app.db, owner.studio_id(), "Lead role").await?;
    let rival_token = app.token_for(rival.user_id)?;
    let oversized = json!({ "talentIds": [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()] });

    let foreign = app
        .post(
            &format!("/api/studio/casting-calls/{}/invitations", call.id),
            &rival_token,
            oversized.clone(),
        )
        .await?;
    assert_eq!(foreign.status, StatusCode::FORBIDDEN);

    let missing = app
        .post(
            &format!("/api/studio/casting-calls/{}/invitations", Uuid::new_v4()),
            &rival_token,
            oversized,
        )
        .await?;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(MessageRow::find().count(&app.db).await?, 0);
    Ok(())
}

#[tokio::test]
async fn other_studio_cannot_invite_for_casting_call() -> Result<()> {
    let app = TestApp::new().await?;
    let owner = create_studio_account(&app.db, "Northlight").await?;
    let rival = create_studio_account(&app.db, "Rival").await?;
    let call = create_casting_call(&app.db, owner.studio_id(), "Lead role").await?;
    let ana = create_talent(&app.db, "Ana Lima").await?;
    let rival_token = app.token_for(rival.user_id)?;
    let uri = format!("/api/studio/casting-calls/{}/invitations", call.id);

    let send = app
        .post(&uri, &rival_token, json!({ "talentIds": [ana.profile_id()] }))
        .await?;
    assert_eq!(send.status, StatusCode::FORBIDDEN);

    let list = app.get(&uri, &rival_token).await?;
    assert_eq!(list.status, StatusCode::FORBIDDEN);

    let missing = app
        .post(
            &format!("/api/studio/casting-calls/{}/invitations", Uuid::new_v4()),
            &rival_token,
            json!({ "talentIds": [ana.profile_id()] }),
        )
        .await?;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn listing_reports_talent_responses() -> Result<()> {
    let app = TestApp::new().await?;
    let studio = create_studio_account(&app.db, "Northlight").await?;
    let call = create_casting_call(&app.db, studio.studio_id(), "Lead role").await?;
    let ana = create_talent(&app.db, "Ana Lima").await?;
    let rui = create_talent(&app.db, "Rui Costa").await?;
    let token = app.token_for(studio.user_id)?;
    let uri = format!("/api/studio/casting-calls/{}/invitations", call.id);

    app.post(
        &uri,
        &token,
        json!({ "talentIds": [ana.profile_id(), rui.profile_id()] }),
    )
    .await?;
    create_application(&app.db, ana.profile_id(), call.id).await?;

    let listed = app.get(&uri, &token).await?;
    let invitations = listed.body["invitations"].as_array().unwrap();
    assert_eq!(invitations.len(), 2);

    let for_ana = invitations
        .iter()
        .find(|invitation| invitation["talentId"] == json!(ana.profile_id()))
        .unwrap();
    assert_eq!(for_ana["talentName"], "Ana Lima");
    assert_eq!(for_ana["hasResponded"], true);
    assert_eq!(for_ana["responseStatus"], "PENDING");
    assert!(for_ana["responseDate"].is_string());
    assert!(for_ana["content"].as_str().unwrap().contains("Lead role"));

    let for_rui = invitations
        .iter()
        .find(|invitation| invitation["talentId"] == json!(rui.profile_id()))
        .unwrap();
    assert_eq!(for_rui["hasResponded"], false);
    Ok(())
}
