use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::{
        api::{PageDto, PaginationParams},
        memo::{
            CreateDepartmentMemoDto, CreatePersonalMemoDto, MemoDto, MemoFilterDto,
            MemoRecipientDto, SentMemoDto, UpdatePersonalMemoDto,
        },
    },
    server::{
        data::{department::DepartmentRepository, memo::MemoRepository, user::UserRepository},
        error::{auth::AuthError, AppError},
        middleware::auth::{CurrentUser, Permission},
        model::memo::{
            memo_into_dto, memo_type, sent_memo_into_dto, CreateMemoParams, PRIORITIES,
        },
        util::validate::{dedup_ids, required_text},
    },
};

const TITLE_MAX_CHARS: usize = 200;
const CONTENT_MAX_CHARS: usize = 5000;

pub struct MemoService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> MemoService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a memo addressed to its author.
    pub async fn create_personal(
        &self,
        current: &CurrentUser,
        dto: CreatePersonalMemoDto,
    ) -> Result<MemoDto, AppError> {
        let params = CreateMemoParams {
            title: required_text("title", &dto.title, TITLE_MAX_CHARS)?,
            content: required_text("content", &dto.content, CONTENT_MAX_CHARS)?,
            memo_type: memo_type::PERSONAL,
            priority: validate_priority(dto.priority)?,
            created_by: current.id(),
        };

        let txn = self.db.begin().await?;
        let repo = MemoRepository::new(&txn);
        let memo = repo.create(params, &[current.id()]).await?;
        let recipient = repo
            .recipient(memo.id, current.id())
            .await?
            .ok_or_else(|| AppError::InternalError("Memo recipient missing".to_string()))?;
        txn.commit().await?;

        Ok(memo_into_dto(memo, &recipient, &self.author_name(current)))
    }

    pub async fn update_personal(
        &self,
        current: &CurrentUser,
        id: i32,
        dto: UpdatePersonalMemoDto,
    ) -> Result<MemoDto, AppError> {
        let memo = self.own_personal(current, id).await?;

        let title = match dto.title {
            Some(title) => Some(required_text("title", &title, TITLE_MAX_CHARS)?),
            None => None,
        };
        let content = match dto.content {
            Some(content) => Some(required_text("content", &content, CONTENT_MAX_CHARS)?),
            None => None,
        };
        let priority = match dto.priority {
            Some(priority) => Some(validate_priority(Some(priority))?),
            None => None,
        };

        let repo = MemoRepository::new(self.db);
        let memo = repo.update(memo, title, content, priority).await?;
        let recipient = repo
            .recipient(memo.id, current.id())
            .await?
            .ok_or_else(|| AppError::not_found("Memo not found"))?;

        Ok(memo_into_dto(memo, &recipient, &self.author_name(current)))
    }

    pub async fn delete_personal(&self, current: &CurrentUser, id: i32) -> Result<(), AppError> {
        let memo = self.own_personal(current, id).await?;
        MemoRepository::new(self.db).soft_delete(memo).await?;
        Ok(())
    }

    /// Memos delivered to the caller, optionally of one type.
    pub async fn received(
        &self,
        current: &CurrentUser,
        filter: MemoFilterDto,
        pagination: PaginationParams,
    ) -> Result<PageDto<MemoDto>, AppError> {
        let kind = filter.memo_type.filter(|t| !t.is_empty());
        if let Some(kind) = &kind {
            if kind != memo_type::PERSONAL && kind != memo_type::DEPARTMENT {
                return Err(AppError::bad_request(
                    "memo_type must be personal or department",
                ));
            }
        }

        let per_page = pagination.per_page();
        let (rows, total) = MemoRepository::new(self.db)
            .get_received_paginated(current.id(), kind.as_deref(), pagination.page, per_page)
            .await?;

        let author_ids: Vec<i32> = rows.iter().map(|(_, m)| m.created_by).collect();
        let names = UserRepository::new(self.db).names(&author_ids).await?;

        let items = rows
            .into_iter()
            .map(|(recipient, memo)| memo_into_dto(memo, &recipient, &names))
            .collect();
        Ok(PageDto::new(items, total, pagination.page, per_page))
    }

    pub async fn unread_count(&self, current: &CurrentUser) -> Result<u64, AppError> {
        Ok(MemoRepository::new(self.db).unread_count(current.id()).await?)
    }

    pub async fn mark_read(&self, current: &CurrentUser, id: i32) -> Result<(), AppError> {
        let repo = MemoRepository::new(self.db);
        repo.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Memo not found"))?;
        if repo.mark_read(id, current.id()).await? == 0 {
            return Err(AppError::not_found("Memo not found"));
        }
        Ok(())
    }

    /// Sends a memo to the active users of the given departments.
    ///
    /// Returns the sender's view plus each recipient's copy for pushing.
    pub async fn create_department(
        &self,
        current: &CurrentUser,
        dto: CreateDepartmentMemoDto,
    ) -> Result<(SentMemoDto, Vec<(i32, MemoDto)>), AppError> {
        current.require(Permission::MemoSend)?;

        let title = required_text("title", &dto.title, TITLE_MAX_CHARS)?;
        let content = required_text("content", &dto.content, CONTENT_MAX_CHARS)?;
        let priority = validate_priority(dto.priority)?;

        let department_ids = dedup_ids(&dto.department_ids);
        if department_ids.is_empty() {
            return Err(AppError::bad_request("department_ids must not be empty"));
        }
        let existing = DepartmentRepository::new(self.db)
            .existing_ids(&department_ids)
            .await?;
        if existing.len() != department_ids.len() {
            return Err(AppError::bad_request("Unknown department id"));
        }
        if !current.scope.covers(&department_ids) {
            return Err(AuthError::AccessDenied(
                current.id(),
                "memo targets a department outside the viewable set".to_string(),
            )
            .into());
        }

        let recipient_ids = UserRepository::new(self.db)
            .active_ids_in_departments(&department_ids)
            .await?;
        if recipient_ids.is_empty() {
            return Err(AppError::bad_request("The memo has no recipients"));
        }

        let txn = self.db.begin().await?;
        let repo = MemoRepository::new(&txn);
        let memo = repo
            .create(
                CreateMemoParams {
                    title,
                    content,
                    memo_type: memo_type::DEPARTMENT,
                    priority,
                    created_by: current.id(),
                },
                &recipient_ids,
            )
            .await?;
        let recipients = repo.recipients(memo.id).await?;
        txn.commit().await?;

        let names = self.author_name(current);
        let copies = recipients
            .iter()
            .map(|r| (r.user_id, memo_into_dto(memo.clone(), r, &names)))
            .collect();

        Ok((
            sent_memo_into_dto(memo, recipient_ids.len() as u64, 0),
            copies,
        ))
    }

    /// Department memos written by the caller with read statistics.
    pub async fn sent(
        &self,
        current: &CurrentUser,
        pagination: PaginationParams,
    ) -> Result<PageDto<SentMemoDto>, AppError> {
        let per_page = pagination.per_page();
        let repo = MemoRepository::new(self.db);
        let (memos, total) = repo
            .get_sent_paginated(current.id(), pagination.page, per_page)
            .await?;

        let ids: Vec<i32> = memos.iter().map(|m| m.id).collect();
        let stats = repo.read_stats(&ids).await?;

        let items = memos
            .into_iter()
            .map(|m| {
                let (recipients, read) = stats.get(&m.id).copied().unwrap_or_default();
                sent_memo_into_dto(m, recipients, read)
            })
            .collect();
        Ok(PageDto::new(items, total, pagination.page, per_page))
    }

    pub async fn recipients(
        &self,
        current: &CurrentUser,
        id: i32,
    ) -> Result<Vec<MemoRecipientDto>, AppError> {
        let repo = MemoRepository::new(self.db);
        let memo = repo
            .find_by_id(id)
            .await?
            .filter(|m| m.memo_type == memo_type::DEPARTMENT)
            .ok_or_else(|| AppError::not_found("Memo not found"))?;
        if memo.created_by != current.id() {
            return Err(AuthError::AccessDenied(
                current.id(),
                format!("memo {} belongs to another author", id),
            )
            .into());
        }

        let recipients = repo.recipients(id).await?;
        let user_ids: Vec<i32> = recipients.iter().map(|r| r.user_id).collect();
        let names = UserRepository::new(self.db).names(&user_ids).await?;

        Ok(recipients
            .into_iter()
            .map(|r| MemoRecipientDto {
                real_name: names.get(&r.user_id).cloned(),
                user_id: r.user_id,
                is_read: r.is_read,
                read_at: r.read_at,
            })
            .collect())
    }

    /// A personal memo of the caller; other users' memos read as missing.
    async fn own_personal(
        &self,
        current: &CurrentUser,
        id: i32,
    ) -> Result<entity::memo::Model, AppError> {
        MemoRepository::new(self.db)
            .find_by_id(id)
            .await?
            .filter(|m| m.memo_type == memo_type::PERSONAL && m.created_by == current.id())
            .ok_or_else(|| AppError::not_found("Memo not found"))
    }

    fn author_name(&self, current: &CurrentUser) -> std::collections::HashMap<i32, String> {
        [(current.id(), current.user.real_name.clone())]
            .into_iter()
            .collect()
    }
}

fn validate_priority(priority: Option<String>) -> Result<String, AppError> {
    let priority = priority.unwrap_or_else(|| "normal".to_string());
    if !PRIORITIES.contains(&priority.as_str()) {
        return Err(AppError::bad_request(format!(
            "priority must be one of {}",
            PRIORITIES.join(", ")
        )));
    }
    Ok(priority)
}

#[cfg(test)]
mod tests {
    use super::validate_priority;

    #[test]
    fn priority_defaults_to_normal() {
        assert_eq!(validate_priority(None).unwrap(), "normal");
        assert_eq!(validate_priority(Some("high".to_string())).unwrap(), "high");
        assert!(validate_priority(Some("urgent".to_string())).is_err());
    }
}
