use super::*;
use crate::{
    model::{
        api::PaginationParams,
        inventory::{
            AuditItemDto, CreateInventoryItemDto, InventoryItemQueryDto, ProcureDto, UseItemDto,
        },
    },
    server::service::inventory::InventoryService,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
}

fn new_item(name: &str) -> CreateInventoryItemDto {
    CreateInventoryItemDto {
        name: name.to_string(),
        category: Some("stationery".to_string()),
        unit: Some("box".to_string()),
        description: None,
    }
}

fn take(item_id: i32, quantity: i32) -> UseItemDto {
    UseItemDto {
        item_id,
        quantity,
        user_id: None,
        purpose: Some("Desk".to_string()),
    }
}

/// Tests procurement and issuing move stock through the ledger.
///
/// Expected: stock 10 then 6, overdrawing rejected, two ledger rows
#[tokio::test]
async fn procure_then_use_tracks_ledger() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_inventory_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let department = factory::create_department(db).await?;
    let keeper = manager_of(db, department.id, &["inventory:manage"]).await?;
    let staff = factory::user::create_user_in_department(db, department.id).await?;
    let service = InventoryService::new(db);

    let current = login_as(db, session, keeper.id).await?;
    let procured = service
        .procure(
            &current,
            ProcureDto {
                item_id: None,
                new_item: Some(new_item("Staples")),
                quantity: 10,
                price_per_unit: "2.50".parse().unwrap(),
                supplier: Some("Paper Co".to_string()),
                purchase_date: None,
            },
            today(),
        )
        .await?;
    let item_id = procured.item.id;
    assert_eq!(procured.item.current_stock, 10);
    assert_eq!((procured.log.stock_before, procured.log.stock_after), (0, 10));

    let purchases = service
        .procurements(&current, Some(item_id), PaginationParams::default())
        .await?;
    assert_eq!(purchases.items[0].total_price, Decimal::new(2500, 2));
    assert_eq!(purchases.items[0].purchase_date, today());

    let current = login_as(db, session, staff.id).await?;
    let used = service.use_items(&current, take(item_id, 4)).await?;
    assert_eq!(used.item.current_stock, 6);
    assert_eq!(used.log.change, -4);

    let overdrawn = service.use_items(&current, take(item_id, 7)).await;
    assert!(matches!(overdrawn, Err(AppError::BadRequest(_))));

    let items = service
        .list_items(InventoryItemQueryDto {
            keyword: Some("stap".to_string()),
            category: None,
        })
        .await?;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].current_stock, 6);

    let current = login_as(db, session, keeper.id).await?;
    let ledger = service
        .stock_logs(&current, Some(item_id), PaginationParams::default())
        .await?;
    assert_eq!(ledger.total, 2);

    Ok(())
}

/// Tests two requests drawing more than the stock at the same time.
///
/// Expected: one succeeds, the other is rejected, stock never negative
#[tokio::test]
async fn concurrent_use_never_oversells() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_inventory_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let user = factory::create_user(db).await?;
    let item = factory::create_inventory_item(db, 5).await?;
    let current = login_as(db, session, user.id).await?;
    let service = InventoryService::new(db);

    let (first, second) = tokio::join!(
        service.use_items(&current, take(item.id, 3)),
        service.use_items(&current, take(item.id, 3)),
    );

    assert_eq!([first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count(), 1);
    let items = service.list_items(InventoryItemQueryDto::default()).await?;
    assert_eq!(items[0].current_stock, 2);

    Ok(())
}

/// Tests a stock count below the recorded stock.
///
/// Expected: audit marked missing with discrepancy -2, stock corrected to 8
#[tokio::test]
async fn audit_corrects_stock() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_inventory_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let department = factory::create_department(db).await?;
    let keeper = manager_of(db, department.id, &["inventory:manage"]).await?;
    let item = factory::create_inventory_item(db, 10).await?;
    let current = login_as(db, session, keeper.id).await?;
    let service = InventoryService::new(db);

    let (audit, change) = service
        .audit(
            &current,
            AuditItemDto {
                item_id: item.id,
                actual_stock: 8,
                notes: None,
            },
        )
        .await?;

    assert_eq!(audit.result_status, "missing");
    assert_eq!(audit.discrepancy, -2);
    assert_eq!(change.item.current_stock, 8);
    assert_eq!((change.log.stock_before, change.log.stock_after), (10, 8));

    let negative = service
        .audit(
            &current,
            AuditItemDto {
                item_id: item.id,
                actual_stock: -1,
                notes: None,
            },
        )
        .await;
    assert!(matches!(negative, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests procurement input checks.
///
/// Expected: ambiguous target and zero quantity rejected, unknown item not found
#[tokio::test]
async fn validates_procurement() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_inventory_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let department = factory::create_department(db).await?;
    let keeper = manager_of(db, department.id, &["inventory:manage"]).await?;
    let item = factory::create_inventory_item(db, 0).await?;
    let current = login_as(db, session, keeper.id).await?;
    let service = InventoryService::new(db);
    let order = |item_id: Option<i32>, new: Option<CreateInventoryItemDto>, quantity: i32| {
        ProcureDto {
            item_id,
            new_item: new,
            quantity,
            price_per_unit: Decimal::ONE,
            supplier: None,
            purchase_date: None,
        }
    };

    let both = service
        .procure(&current, order(Some(item.id), Some(new_item("Pens")), 1), today())
        .await;
    assert!(matches!(both, Err(AppError::BadRequest(_))));

    let zero = service
        .procure(&current, order(Some(item.id), None, 0), today())
        .await;
    assert!(matches!(zero, Err(AppError::BadRequest(_))));

    let unknown = service
        .procure(&current, order(Some(9999), None, 1), today())
        .await;
    assert!(matches!(unknown, Err(AppError::NotFound(_))));

    Ok(())
}

/// Tests managing supplies and issuing to others need `inventory:manage`.
///
/// Expected: Err(AppError::AuthErr) for both
#[tokio::test]
async fn management_requires_permission() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_inventory_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let user = factory::create_user(db).await?;
    let colleague = factory::create_user(db).await?;
    let item = factory::create_inventory_item(db, 5).await?;
    let current = login_as(db, session, user.id).await?;
    let service = InventoryService::new(db);

    let created = service.create_item(&current, new_item("Pens")).await;
    assert!(matches!(created, Err(AppError::AuthErr(_))));

    let for_colleague = service
        .use_items(
            &current,
            UseItemDto {
                user_id: Some(colleague.id),
                ..take(item.id, 1)
            },
        )
        .await;
    assert!(matches!(for_colleague, Err(AppError::AuthErr(_))));

    Ok(())
}
