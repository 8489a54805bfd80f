use super::*;

/// Tests creating a child department.
///
/// Verifies the repository stores the parent link, status and sort order exactly
/// as supplied.
///
/// Expected: Ok with department created under its parent
#[tokio::test]
async fn creates_child_department() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_org_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let parent = factory::create_department(db).await?;

    let repo = DepartmentRepository::new(db);
    let department = repo
        .create(CreateDepartmentParams {
            name: "Night Desk".to_string(),
            parent_id: Some(parent.id),
            description: Some("Overnight coverage".to_string()),
            status: "active".to_string(),
            sort_order: 3,
        })
        .await?;

    assert_eq!(department.name, "Night Desk");
    assert_eq!(department.parent_id, Some(parent.id));
    assert_eq!(department.sort_order, 3);
    assert_eq!(repo.count_children(parent.id).await?, 1);
    assert!(repo.find_by_name("Night Desk").await?.is_some());

    Ok(())
}

/// Tests that only existing ids are echoed back.
///
/// Expected: unknown ids are dropped
#[tokio::test]
async fn existing_ids_skips_unknown() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_org_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let department = factory::create_department(db).await?;

    let repo = DepartmentRepository::new(db);
    let ids = repo.existing_ids(&[department.id, 9999]).await?;

    assert_eq!(ids, vec![department.id]);
    assert!(repo.existing_ids(&[]).await?.is_empty());

    Ok(())
}
