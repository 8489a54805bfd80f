use super::*;

/// Tests departments are ordered by sort order before id.
///
/// Expected: lower sort order first regardless of insertion order
#[tokio::test]
async fn orders_by_sort_order() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_org_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let late = factory::department::DepartmentFactory::new(db)
        .sort_order(5)
        .build()
        .await?;
    let early = factory::department::DepartmentFactory::new(db)
        .sort_order(1)
        .build()
        .await?;

    let repo = DepartmentRepository::new(db);
    let ids: Vec<i32> = repo.list(None).await?.into_iter().map(|d| d.id).collect();

    assert_eq!(ids, vec![early.id, late.id]);

    Ok(())
}

/// Tests restricting the listing to a set of ids.
///
/// Verifies an empty restriction yields nothing rather than every department.
///
/// Expected: only requested departments are returned
#[tokio::test]
async fn restricts_to_given_ids() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_org_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let first = factory::create_department(db).await?;
    factory::create_department(db).await?;

    let repo = DepartmentRepository::new(db);
    let listed = repo.list(Some(&[first.id])).await?;

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, first.id);
    assert!(repo.list(Some(&[])).await?.is_empty());

    Ok(())
}

/// Tests inactive departments are left out of the active listing.
///
/// Expected: only the active department is listed
#[tokio::test]
async fn list_active_skips_inactive() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_org_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let active = factory::create_department(db).await?;
    factory::department::DepartmentFactory::new(db)
        .status("inactive")
        .build()
        .await?;

    let repo = DepartmentRepository::new(db);
    let listed = repo.list_active().await?;

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, active.id);

    Ok(())
}
