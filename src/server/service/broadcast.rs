use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::{
        api::{PageDto, PaginationParams},
        broadcast::{
            BroadcastDto, CreateBroadcastDto, ReceivedBroadcastDto, ReceivedBroadcastFilterDto,
            RecipientDto,
        },
    },
    server::{
        data::{
            broadcast::BroadcastRepository, department::DepartmentRepository,
            role::RoleRepository, user::UserRepository,
        },
        error::{auth::AuthError, AppError},
        middleware::auth::CurrentUser,
        model::broadcast::{CreateBroadcastParams, ReadStats, TargetType, PRIORITIES},
        util::validate::{dedup_ids, required_text},
    },
};

const TITLE_MAX_CHARS: usize = 200;
const CONTENT_MAX_CHARS: usize = 5000;

/// A freshly sent broadcast along with the users it must be pushed to.
pub struct SentBroadcast {
    pub broadcast: BroadcastDto,
    pub received: ReceivedBroadcastDto,
    pub recipient_ids: Vec<i32>,
}

pub struct BroadcastService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> BroadcastService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Resolves the recipients for the target and stores one recipient row per user.
    pub async fn create(
        &self,
        current: &CurrentUser,
        dto: CreateBroadcastDto,
    ) -> Result<SentBroadcast, AppError> {
        let title = required_text("title", &dto.title, TITLE_MAX_CHARS)?;
        let content = required_text("content", &dto.content, CONTENT_MAX_CHARS)?;
        let priority = dto.priority.unwrap_or_else(|| "normal".to_string());
        if !PRIORITIES.contains(&priority.as_str()) {
            return Err(AppError::bad_request(format!(
                "priority must be one of {}",
                PRIORITIES.join(", ")
            )));
        }
        let target_type = TargetType::parse(&dto.target_type).ok_or_else(|| {
            AppError::bad_request("target_type must be all, department, role or individual")
        })?;
        if let Some(expires_at) = dto.expires_at {
            if expires_at <= Utc::now() {
                return Err(AppError::bad_request("expires_at must be in the future"));
            }
        }

        let target_ids = match target_type {
            TargetType::All => Vec::new(),
            _ => dedup_ids(&dto.target_ids),
        };
        let recipient_ids = self.recipients_for(current, target_type, &target_ids).await?;
        if recipient_ids.is_empty() {
            return Err(AppError::bad_request("The broadcast has no recipients"));
        }

        let txn = self.db.begin().await?;
        let broadcast = BroadcastRepository::new(&txn)
            .create(
                CreateBroadcastParams {
                    title,
                    content,
                    priority,
                    target_type,
                    target_ids: target_ids.clone(),
                    expires_at: dto.expires_at,
                    created_by: current.id(),
                },
                &recipient_ids,
            )
            .await?;
        txn.commit().await?;

        tracing::info!(
            "Broadcast {} sent by user {} to {} recipients",
            broadcast.id,
            current.id(),
            recipient_ids.len()
        );

        let received = ReceivedBroadcastDto {
            id: broadcast.id,
            title: broadcast.title.clone(),
            content: broadcast.content.clone(),
            priority: broadcast.priority.clone(),
            sender_id: broadcast.created_by,
            sender_name: Some(current.user.real_name.clone()),
            expires_at: broadcast.expires_at,
            created_at: broadcast.created_at,
            is_read: false,
            read_at: None,
        };
        let stats = ReadStats {
            recipient_count: recipient_ids.len() as u64,
            read_count: 0,
        };

        Ok(SentBroadcast {
            broadcast: broadcast_into_dto(broadcast, target_ids, stats),
            received,
            recipient_ids,
        })
    }

    /// Broadcasts sent by the caller, or every broadcast for a super admin.
    pub async fn sent(
        &self,
        current: &CurrentUser,
        pagination: PaginationParams,
    ) -> Result<PageDto<BroadcastDto>, AppError> {
        let created_by = (!current.is_super_admin).then(|| current.id());
        let per_page = pagination.per_page();

        let repo = BroadcastRepository::new(self.db);
        let (broadcasts, total) = repo
            .get_sent_paginated(created_by, pagination.page, per_page)
            .await?;

        let ids: Vec<i32> = broadcasts.iter().map(|b| b.id).collect();
        let mut targets = repo.target_ids(&ids).await?;
        let stats = repo.read_stats(&ids).await?;

        let items = broadcasts
            .into_iter()
            .map(|b| {
                let target_ids = targets.remove(&b.id).unwrap_or_default();
                let stats = stats.get(&b.id).copied().unwrap_or_default();
                broadcast_into_dto(b, target_ids, stats)
            })
            .collect();

        Ok(PageDto::new(items, total, pagination.page, per_page))
    }

    /// Unexpired broadcasts addressed to the caller.
    pub async fn received(
        &self,
        current: &CurrentUser,
        filter: ReceivedBroadcastFilterDto,
        pagination: PaginationParams,
        now: DateTime<Utc>,
    ) -> Result<PageDto<ReceivedBroadcastDto>, AppError> {
        let per_page = pagination.per_page();
        let (rows, total) = BroadcastRepository::new(self.db)
            .get_received_paginated(current.id(), filter.is_read, now, pagination.page, per_page)
            .await?;

        let sender_ids: Vec<i32> = rows.iter().map(|(_, b)| b.created_by).collect();
        let names = UserRepository::new(self.db).names(&sender_ids).await?;

        let items = rows
            .into_iter()
            .map(|(recipient, broadcast)| ReceivedBroadcastDto {
                id: broadcast.id,
                sender_name: names.get(&broadcast.created_by).cloned(),
                sender_id: broadcast.created_by,
                title: broadcast.title,
                content: broadcast.content,
                priority: broadcast.priority,
                expires_at: broadcast.expires_at,
                created_at: broadcast.created_at,
                is_read: recipient.is_read,
                read_at: recipient.read_at,
            })
            .collect();

        Ok(PageDto::new(items, total, pagination.page, per_page))
    }

    /// Marks the caller's copy read. Reading twice is a no-op.
    pub async fn mark_read(&self, current: &CurrentUser, id: i32) -> Result<(), AppError> {
        let repo = BroadcastRepository::new(self.db);
        if !repo.is_recipient(id, current.id()).await? {
            return Err(AppError::not_found("Broadcast not found"));
        }
        repo.mark_read(id, current.id()).await?;
        Ok(())
    }

    pub async fn delete(&self, current: &CurrentUser, id: i32) -> Result<(), AppError> {
        self.owned(current, id).await?;

        let txn = self.db.begin().await?;
        BroadcastRepository::new(&txn).delete(id).await?;
        txn.commit().await?;
        Ok(())
    }

    /// Recipients with their read state, for the sender or a super admin.
    pub async fn recipients(
        &self,
        current: &CurrentUser,
        id: i32,
    ) -> Result<Vec<RecipientDto>, AppError> {
        self.owned(current, id).await?;

        let recipients = BroadcastRepository::new(self.db).recipients(id).await?;
        let user_ids: Vec<i32> = recipients.iter().map(|r| r.user_id).collect();
        let users = UserRepository::new(self.db).find_by_ids(&user_ids).await?;

        Ok(recipients
            .into_iter()
            .map(|r| {
                let user = users.iter().find(|u| u.id == r.user_id);
                RecipientDto {
                    user_id: r.user_id,
                    real_name: user.map(|u| u.real_name.clone()),
                    department_id: user.and_then(|u| u.department_id),
                    is_read: r.is_read,
                    read_at: r.read_at,
                }
            })
            .collect())
    }

    async fn owned(
        &self,
        current: &CurrentUser,
        id: i32,
    ) -> Result<entity::broadcast::Model, AppError> {
        let broadcast = BroadcastRepository::new(self.db)
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Broadcast not found"))?;

        if broadcast.created_by != current.id() && !current.is_super_admin {
            return Err(AuthError::AccessDenied(
                current.id(),
                format!("broadcast {} belongs to another sender", id),
            )
            .into());
        }
        Ok(broadcast)
    }

    async fn recipients_for(
        &self,
        current: &CurrentUser,
        target_type: TargetType,
        target_ids: &[i32],
    ) -> Result<Vec<i32>, AppError> {
        if target_type != TargetType::All && target_ids.is_empty() {
            return Err(AppError::bad_request("target_ids must not be empty"));
        }

        let user_repo = UserRepository::new(self.db);
        match target_type {
            TargetType::All => Ok(user_repo.active_ids().await?),
            TargetType::Department => {
                let existing = DepartmentRepository::new(self.db)
                    .existing_ids(target_ids)
                    .await?;
                if existing.len() != target_ids.len() {
                    return Err(AppError::bad_request("Unknown department id"));
                }
                if !current.is_super_admin && !current.scope.covers(target_ids) {
                    return Err(AuthError::AccessDenied(
                        current.id(),
                        "broadcast targets a department outside the viewable set".to_string(),
                    )
                    .into());
                }
                Ok(user_repo.active_ids_in_departments(target_ids).await?)
            }
            TargetType::Role => {
                let role_repo = RoleRepository::new(self.db);
                let existing = role_repo.existing_ids(target_ids).await?;
                if existing.len() != target_ids.len() {
                    return Err(AppError::bad_request("Unknown role id"));
                }
                let user_ids = role_repo.user_ids_with_roles(target_ids).await?;
                let active = user_repo.active_ids().await?;
                Ok(user_ids.into_iter().filter(|id| active.contains(id)).collect())
            }
            TargetType::Individual => {
                let existing = user_repo.existing_ids(target_ids).await?;
                if existing.len() != target_ids.len() {
                    return Err(AppError::bad_request("Unknown user id"));
                }
                Ok(target_ids.to_vec())
            }
        }
    }
}

fn broadcast_into_dto(
    broadcast: entity::broadcast::Model,
    target_ids: Vec<i32>,
    stats: ReadStats,
) -> BroadcastDto {
    BroadcastDto {
        id: broadcast.id,
        title: broadcast.title,
        content: broadcast.content,
        priority: broadcast.priority,
        target_type: broadcast.target_type,
        target_ids,
        expires_at: broadcast.expires_at,
        created_by: broadcast.created_by,
        created_at: broadcast.created_at,
        recipient_count: stats.recipient_count,
        read_count: stats.read_count,
    }
}
