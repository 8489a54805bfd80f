use super::*;
use crate::{
    model::{
        api::PaginationParams,
        memo::{CreateDepartmentMemoDto, CreatePersonalMemoDto, MemoFilterDto},
    },
    server::service::memo::MemoService,
};

/// Tests a department memo gives every active member their own copy.
///
/// Expected: one unread copy per recipient, addressed by user id
#[tokio::test]
async fn department_memo_copies_per_recipient() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_messaging_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let department = factory::create_department(db).await?;
    let sender = manager_of(db, department.id, &["memo:send"]).await?;
    let member = factory::user::create_user_in_department(db, department.id).await?;
    let current = login_as(db, session, sender.id).await?;

    let (sent, copies) = MemoService::new(db)
        .create_department(
            &current,
            CreateDepartmentMemoDto {
                title: "Rota".to_string(),
                content: "New rota is up".to_string(),
                priority: Some("high".to_string()),
                department_ids: vec![department.id, department.id],
            },
        )
        .await?;

    let mut user_ids: Vec<i32> = copies.iter().map(|(id, _)| *id).collect();
    user_ids.sort();
    assert_eq!(user_ids, vec![sender.id, member.id]);
    assert!(copies.iter().all(|(_, memo)| !memo.is_read));
    assert_eq!(sent.title, "Rota");

    let current = login_as(db, session, member.id).await?;
    assert_eq!(MemoService::new(db).unread_count(&current).await?, 1);

    Ok(())
}

/// Tests sending department memos needs the memo permission.
///
/// Expected: Err(AppError::AuthErr)
#[tokio::test]
async fn department_memo_requires_permission() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_messaging_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let department = factory::create_department(db).await?;
    let user = factory::user::create_user_in_department(db, department.id).await?;
    let current = login_as(db, session, user.id).await?;

    let result = MemoService::new(db)
        .create_department(
            &current,
            CreateDepartmentMemoDto {
                title: "Rota".to_string(),
                content: "New rota is up".to_string(),
                priority: None,
                department_ids: vec![department.id],
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::AuthErr(_))));

    Ok(())
}

/// Tests personal memos are private to their author.
///
/// Expected: the author sees it, another user gets 404 on delete
#[tokio::test]
async fn personal_memo_is_private() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_messaging_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let author = factory::create_user(db).await?;
    let other = factory::create_user(db).await?;
    let service = MemoService::new(db);

    let current = login_as(db, session, author.id).await?;
    let memo = service
        .create_personal(
            &current,
            CreatePersonalMemoDto {
                title: "Dentist".to_string(),
                content: "Tuesday".to_string(),
                priority: None,
            },
        )
        .await?;
    assert_eq!(memo.memo_type, "personal");
    assert_eq!(memo.priority, "normal");

    let inbox = service
        .received(&current, MemoFilterDto::default(), PaginationParams::default())
        .await?;
    assert_eq!(inbox.total, 1);

    let current = login_as(db, session, other.id).await?;
    let result = service.delete_personal(&current, memo.id).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}

/// Tests an unknown priority is rejected.
///
/// Expected: Err(AppError::BadRequest)
#[tokio::test]
async fn rejects_unknown_priority() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_messaging_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let author = factory::create_user(db).await?;
    let current = login_as(db, session, author.id).await?;

    let result = MemoService::new(db)
        .create_personal(
            &current,
            CreatePersonalMemoDto {
                title: "Dentist".to_string(),
                content: "Tuesday".to_string(),
                priority: Some("urgent".to_string()),
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}
