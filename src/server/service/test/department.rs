use super::*;
use crate::server::service::department::DepartmentService;

/// Tests a department with users or children cannot be deleted.
///
/// Expected: BadRequest while referenced, Ok once empty, NotFound afterwards
#[tokio::test]
async fn delete_requires_empty_department() -> Result<(), AppError> {
    let test = TestBuilder::new().with_org_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let parent = factory::create_department(db).await?;
    let child = factory::department::DepartmentFactory::new(db)
        .parent_id(Some(parent.id))
        .build()
        .await?;
    let staffed = factory::create_department(db).await?;
    factory::user::create_user_in_department(db, staffed.id).await?;

    let service = DepartmentService::new(db);

    let result = service.delete(parent.id).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let result = service.delete(staffed.id).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    service.delete(child.id).await?;
    service.delete(parent.id).await?;

    let result = service.delete(parent.id).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}
