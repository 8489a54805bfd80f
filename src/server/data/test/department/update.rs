use super::*;

/// Tests a partial update only touches supplied fields.
///
/// Expected: name changes, sort order and status are kept
#[tokio::test]
async fn updates_supplied_fields() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_org_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let department = factory::department::DepartmentFactory::new(db)
        .sort_order(7)
        .build()
        .await?;

    let repo = DepartmentRepository::new(db);
    let updated = repo
        .update(
            department.id,
            UpdateDepartmentParams {
                name: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await?
        .unwrap();

    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.sort_order, 7);
    assert_eq!(updated.status, department.status);

    Ok(())
}

/// Tests updating a department that does not exist.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_missing_department() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_org_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = DepartmentRepository::new(db);
    let result = repo
        .update(
            4242,
            UpdateDepartmentParams {
                name: Some("Ghost".to_string()),
                ..Default::default()
            },
        )
        .await?;

    assert!(result.is_none());
    assert_eq!(repo.delete(4242).await?, 0);

    Ok(())
}
