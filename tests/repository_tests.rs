//! Repository behaviour against a migrated SQLite database.

use anyhow::Result;
use casting::error::RepositoryError;
use casting::models::application::ApplicationStatus;
use casting::models::casting_call::CastingCallStatus;
use casting::models::message::{NewMessage, Party};
use casting::repositories::invitation::build_invitations;
use casting::repositories::{
    ApplicationRepository, CastingCallChanges, CastingCallRepository, CreateUserRequest,
    InvitationRepository, MessageFilter, MessageFlags, MessageRepository, ProfileRepository,
    StudioRepository, TenantRepository,
};
use casting::models::user::UserRole;
use uuid::Uuid;

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::{
    create_application, create_casting_call, create_studio_account, create_talent, setup_test_db,
};

fn studio_to_talent(studio_id: Uuid, talent_id: Uuid) -> NewMessage {
    NewMessage {
        sender: Party::Studio { id: studio_id },
        receiver: Party::Talent { id: talent_id },
        subject: "Hello".to_string(),
        content: "Body".to_string(),
        related_to_project_id: None,
        related_to_casting_call_id: None,
    }
}

#[tokio::test]
async fn message_rejects_same_kind_parties() -> Result<()> {
    let db = setup_test_db().await?;
    let studio = create_studio_account(&db, "Northlight").await?;

    let err = MessageRepository::new(&db)
        .create(NewMessage {
            receiver: Party::Studio {
                id: studio.studio_id(),
            },
            ..studio_to_talent(studio.studio_id(), Uuid::new_v4())
        })
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::Validation(_)));
    Ok(())
}

#[tokio::test]
async fn message_to_unknown_talent_is_invalid_reference() -> Result<()> {
    let db = setup_test_db().await?;
    let studio = create_studio_account(&db, "Northlight").await?;

    let err = MessageRepository::new(&db)
        .create(studio_to_talent(studio.studio_id(), Uuid::new_v4()))
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::InvalidReference(_)));
    Ok(())
}

#[tokio::test]
async fn mark_read_is_idempotent() -> Result<()> {
    let db = setup_test_db().await?;
    let studio = create_studio_account(&db, "Northlight").await?;
    let talent = create_talent(&db, "Ana Lima").await?;
    let repo = MessageRepository::new(&db);

    let message = repo
        .create(NewMessage {
            sender: Party::Talent {
                id: talent.profile_id(),
            },
            receiver: Party::Studio {
                id: studio.studio_id(),
            },
            ..studio_to_talent(studio.studio_id(), talent.profile_id())
        })
        .await?;

    repo.mark_read(message.id).await?;
    repo.mark_read(message.id).await?;

    let stored = repo.find_by_id(message.id).await?.unwrap();
    assert!(stored.is_read);
    assert!(!stored.is_archived);
    Ok(())
}

#[tokio::test]
async fn update_flags_touches_only_given_flags() -> Result<()> {
    let db = setup_test_db().await?;
    let studio = create_studio_account(&db, "Northlight").await?;
    let talent = create_talent(&db, "Ana Lima").await?;
    let repo = MessageRepository::new(&db);
    let message = repo
        .create(studio_to_talent(studio.studio_id(), talent.profile_id()))
        .await?;

    let archived = repo
        .update_flags(
            message.id,
            MessageFlags {
                is_archived: Some(true),
                ..Default::default()
            },
        )
        .await?;
    assert!(archived.is_archived);
    assert!(!archived.is_read);

    let missing = repo
        .update_flags(
            Uuid::new_v4(),
            MessageFlags {
                is_read: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(missing, RepositoryError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn outbox_and_inbox_are_disjoint() -> Result<()> {
    let db = setup_test_db().await?;
    let studio = create_studio_account(&db, "Northlight").await?;
    let talent = create_talent(&db, "Ana Lima").await?;
    let repo = MessageRepository::new(&db);

    repo.create(studio_to_talent(studio.studio_id(), talent.profile_id()))
        .await?;

    let outbox = repo
        .list_for_studio(
            &studio.studio,
            MessageFilter {
                sent: true,
                archived: None,
            },
        )
        .await?;
    let inbox = repo
        .list_for_studio(&studio.studio, MessageFilter::default())
        .await?;

    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].talent_name.as_deref(), Some("Ana Lima"));
    assert!(inbox.is_empty());
    Ok(())
}

#[tokio::test]
async fn delete_reports_whether_row_existed() -> Result<()> {
    let db = setup_test_db().await?;
    let studio = create_studio_account(&db, "Northlight").await?;
    let talent = create_talent(&db, "Ana Lima").await?;
    let repo = MessageRepository::new(&db);
    let message = repo
        .create(studio_to_talent(studio.studio_id(), talent.profile_id()))
        .await?;

    assert!(repo.delete(message.id).await?);
    assert!(!repo.delete(message.id).await?);
    assert!(repo.find_by_id(message.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn invitation_batch_is_all_or_nothing() -> Result<()> {
    let db = setup_test_db().await?;
    let studio = create_studio_account(&db, "Northlight").await?;
    let talent = create_talent(&db, "Ana Lima").await?;
    let call = create_casting_call(&db, studio.studio_id(), "Lead").await?;
    let invitations = InvitationRepository::new(&db);

    let batch = build_invitations(
        studio.studio_id(),
        &call,
        &[talent.profile_id(), Uuid::new_v4()],
        None,
    );
    let err = invitations.send_batch(batch).await.unwrap_err();
    assert!(matches!(err, RepositoryError::InvalidReference(_)));
    assert!(
        invitations
            .list_for_casting_call(studio.studio_id(), call.id)
            .await?
            .is_empty()
    );

    let batch = build_invitations(studio.studio_id(), &call, &[talent.profile_id()], None);
    assert_eq!(invitations.send_batch(batch).await?, 1);
    assert_eq!(
        invitations
            .list_for_casting_call(studio.studio_id(), call.id)
            .await?
            .len(),
        1
    );
    Ok(())
}

#[tokio::test]
async fn casting_call_update_and_count() -> Result<()> {
    let db = setup_test_db().await?;
    let studio = create_studio_account(&db, "Northlight").await?;
    let talent = create_talent(&db, "Ana Lima").await?;
    let call = create_casting_call(&db, studio.studio_id(), "Lead").await?;
    create_application(&db, talent.profile_id(), call.id).await?;
    let repo = CastingCallRepository::new(&db);

    assert_eq!(repo.count_applications(call.id).await?, 1);

    let updated = repo
        .update(
            call,
            CastingCallChanges {
                status: Some(CastingCallStatus::Closed),
                skills: Some(vec!["singing".to_string()]),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.status, CastingCallStatus::Closed);
    assert_eq!(updated.skill_tags(), vec!["singing".to_string()]);
    assert_eq!(updated.title, "Lead");

    let closed = repo
        .list_for_studio(studio.studio_id(), Some(CastingCallStatus::Closed))
        .await?;
    assert_eq!(closed.len(), 1);
    Ok(())
}

#[tokio::test]
async fn duplicate_application_is_conflict() -> Result<()> {
    let db = setup_test_db().await?;
    let studio = create_studio_account(&db, "Northlight").await?;
    let talent = create_talent(&db, "Ana Lima").await?;
    let call = create_casting_call(&db, studio.studio_id(), "Lead").await?;
    let application = create_application(&db, talent.profile_id(), call.id).await?;

    let err = ApplicationRepository::new(&db)
        .create(talent.profile_id(), call.id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)));

    let shortlisted = ApplicationRepository::new(&db)
        .update_status(application, ApplicationStatus::Shortlisted)
        .await?;
    assert_eq!(shortlisted.status, ApplicationStatus::Shortlisted);
    Ok(())
}

#[tokio::test]
async fn studio_lookup_is_stable() -> Result<()> {
    let db = setup_test_db().await?;
    let account = create_studio_account(&db, "Northlight").await?;
    let tenant = TenantRepository::new(&db)
        .get_tenant_by_id(account.tenant_id)
        .await?
        .unwrap();

    let again = StudioRepository::new(&db)
        .get_or_create_for_tenant(&tenant)
        .await?;
    assert_eq!(again.id, account.studio_id());
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_conflict() -> Result<()> {
    let db = setup_test_db().await?;
    let account = create_studio_account(&db, "Northlight").await?;
    let accounts = TenantRepository::new(&db);
    let request = CreateUserRequest {
        tenant_id: account.tenant_id,
        email: "casting@northlight.example".to_string(),
        name: None,
        role: UserRole::User,
    };

    accounts.create_user(request.clone()).await?;
    let err = accounts.create_user(request).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)));
    Ok(())
}

#[tokio::test]
async fn display_names_skip_unknown_profiles() -> Result<()> {
    let db = setup_test_db().await?;
    let talent = create_talent(&db, "Ana Lima").await?;

    let names = ProfileRepository::new(&db)
        .display_names(vec![talent.profile_id(), Uuid::new_v4()])
        .await?;

    assert_eq!(names.len(), 1);
    assert_eq!(names.get(&talent.profile_id()).map(String::as_str), Some("Ana Lima"));
    Ok(())
}
