//! Office supplies: items, procurement, issuing and stock counts.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ApiResponse, ErrorDto, PageDto, PaginationParams},
        inventory::{
            AuditItemDto, AuditOutcomeDto, CreateInventoryItemDto, InventoryAuditDto,
            InventoryHistoryQueryDto, InventoryItemDto, InventoryItemQueryDto, ProcureDto,
            ProcurementDto, StockChangeDto, StockLogDto, UseItemDto, UsageDto,
        },
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        service::inventory::InventoryService,
        state::AppState,
        util::time::today,
    },
};

pub static INVENTORY_TAG: &str = "inventory";

#[utoipa::path(
    get,
    path = "/api/inventory/items",
    tag = INVENTORY_TAG,
    params(InventoryItemQueryDto),
    responses(
        (status = 200, description = "Items with current stock", body = ApiResponse<Vec<InventoryItemDto>>),
        (status = 401, description = "Not logged in", body = ErrorDto)
    ),
)]
pub async fn list_items(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<InventoryItemQueryDto>,
) -> Result<impl IntoResponse, AppError> {
    AuthGuard::new(&state.db, &session).require(&[]).await?;

    let items = InventoryService::new(&state.db).list_items(query).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(items))))
}

#[utoipa::path(
    post,
    path = "/api/inventory/items",
    tag = INVENTORY_TAG,
    request_body = CreateInventoryItemDto,
    responses(
        (status = 201, description = "Item created with zero stock", body = ApiResponse<InventoryItemDto>),
        (status = 403, description = "Missing inventory:manage", body = ErrorDto)
    ),
)]
pub async fn create_item(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateInventoryItemDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::InventoryManage])
        .await?;

    let item = InventoryService::new(&state.db)
        .create_item(&current, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(item))))
}

/// Record a purchase of an existing or new item.
#[utoipa::path(
    post,
    path = "/api/inventory/procure",
    tag = INVENTORY_TAG,
    request_body = ProcureDto,
    responses(
        (status = 201, description = "Stock added", body = ApiResponse<StockChangeDto>),
        (status = 400, description = "Invalid quantity, price or item", body = ErrorDto),
        (status = 403, description = "Missing inventory:manage", body = ErrorDto)
    ),
)]
pub async fn procure(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<ProcureDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::InventoryManage])
        .await?;

    let change = InventoryService::new(&state.db)
        .procure(&current, payload, today(state.utc_offset))
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(change))))
}

/// Take items from stock.
#[utoipa::path(
    post,
    path = "/api/inventory/use",
    tag = INVENTORY_TAG,
    request_body = UseItemDto,
    responses(
        (status = 201, description = "Items issued", body = ApiResponse<StockChangeDto>),
        (status = 400, description = "Insufficient stock", body = ErrorDto),
        (status = 403, description = "Issuing to another user without inventory:manage", body = ErrorDto)
    ),
)]
pub async fn use_items(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<UseItemDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let change = InventoryService::new(&state.db)
        .use_items(&current, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(change))))
}

/// Record a stock count and correct the stock to it.
#[utoipa::path(
    post,
    path = "/api/inventory/audit",
    tag = INVENTORY_TAG,
    request_body = AuditItemDto,
    responses(
        (status = 201, description = "Count recorded", body = ApiResponse<AuditOutcomeDto>),
        (status = 400, description = "Negative count or concurrent change", body = ErrorDto),
        (status = 403, description = "Missing inventory:manage", body = ErrorDto)
    ),
)]
pub async fn audit(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<AuditItemDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::InventoryManage])
        .await?;

    let (audit, change) = InventoryService::new(&state.db)
        .audit(&current, payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(AuditOutcomeDto { audit, change })),
    ))
}

#[utoipa::path(
    get,
    path = "/api/inventory/history/procurements",
    tag = INVENTORY_TAG,
    params(InventoryHistoryQueryDto, PaginationParams),
    responses(
        (status = 200, description = "Page of purchases", body = ApiResponse<PageDto<ProcurementDto>>),
        (status = 403, description = "Missing inventory:manage", body = ErrorDto)
    ),
)]
pub async fn procurement_history(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<InventoryHistoryQueryDto>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::InventoryManage])
        .await?;

    let page = InventoryService::new(&state.db)
        .procurements(&current, query.item_id, pagination)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(page))))
}

#[utoipa::path(
    get,
    path = "/api/inventory/history/usages",
    tag = INVENTORY_TAG,
    params(InventoryHistoryQueryDto, PaginationParams),
    responses(
        (status = 200, description = "Page of issued items", body = ApiResponse<PageDto<UsageDto>>),
        (status = 403, description = "Missing inventory:manage", body = ErrorDto)
    ),
)]
pub async fn usage_history(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<InventoryHistoryQueryDto>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::InventoryManage])
        .await?;

    let page = InventoryService::new(&state.db)
        .usages(&current, query.item_id, pagination)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(page))))
}

#[utoipa::path(
    get,
    path = "/api/inventory/history/audits",
    tag = INVENTORY_TAG,
    params(InventoryHistoryQueryDto, PaginationParams),
    responses(
        (status = 200, description = "Page of stock counts", body = ApiResponse<PageDto<InventoryAuditDto>>),
        (status = 403, description = "Missing inventory:manage", body = ErrorDto)
    ),
)]
pub async fn audit_history(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<InventoryHistoryQueryDto>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::InventoryManage])
        .await?;

    let page = InventoryService::new(&state.db)
        .audits(&current, query.item_id, pagination)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(page))))
}

/// Stock ledger with the stock before and after every change.
#[utoipa::path(
    get,
    path = "/api/inventory/history/stock",
    tag = INVENTORY_TAG,
    params(InventoryHistoryQueryDto, PaginationParams),
    responses(
        (status = 200, description = "Page of stock changes", body = ApiResponse<PageDto<StockLogDto>>),
        (status = 403, description = "Missing inventory:manage", body = ErrorDto)
    ),
)]
pub async fn stock_history(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<InventoryHistoryQueryDto>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::InventoryManage])
        .await?;

    let page = InventoryService::new(&state.db)
        .stock_logs(&current, query.item_id, pagination)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(page))))
}
