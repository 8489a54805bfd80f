//! Group chat: membership, history, read positions and muting.

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::chat::{
        ChatGroupDto, ChatHistoryQueryDto, ChatMemberDto, ChatMessageDto, CreateChatGroupDto,
    },
    server::{
        data::{chat::ChatRepository, department::DepartmentRepository, user::UserRepository},
        error::{auth::AuthError, AppError},
        middleware::auth::CurrentUser,
        model::chat::{history_limit, member_role, message_into_dto, MAX_MESSAGE_LENGTH},
        util::validate::{dedup_ids, required_text},
    },
};

const GROUP_NAME_MAX_CHARS: usize = 50;

pub struct ChatService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ChatService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// The caller's groups with unread counts and the latest message.
    pub async fn groups(&self, current: &CurrentUser) -> Result<Vec<ChatGroupDto>, AppError> {
        let repo = ChatRepository::new(self.db);
        let memberships = repo.groups_for_user(current.id()).await?;

        let mut groups = Vec::with_capacity(memberships.len());
        for (group, member) in memberships {
            let last_message = repo.last_message(group.id).await?;
            let names = match &last_message {
                Some(message) => UserRepository::new(self.db)
                    .names(&[message.sender_id])
                    .await?,
                None => Default::default(),
            };

            groups.push(ChatGroupDto {
                member_count: repo.member_count(group.id).await?,
                unread_count: repo.unread_count(&member).await?,
                is_muted: member.is_muted,
                last_message: last_message.map(|m| message_into_dto(m, &names)),
                id: group.id,
                name: group.name,
                department_id: group.department_id,
                created_by: group.created_by,
                created_at: group.created_at,
            });
        }

        Ok(groups)
    }

    /// Creates a group with the caller as its admin.
    pub async fn create_group(
        &self,
        current: &CurrentUser,
        dto: CreateChatGroupDto,
    ) -> Result<ChatGroupDto, AppError> {
        let name = required_text("name", &dto.name, GROUP_NAME_MAX_CHARS)?;
        if let Some(department_id) = dto.department_id {
            DepartmentRepository::new(self.db)
                .find_by_id(department_id)
                .await?
                .ok_or_else(|| AppError::bad_request("Department does not exist"))?;
        }
        let member_ids: Vec<i32> = dedup_ids(&dto.member_ids)
            .into_iter()
            .filter(|id| *id != current.id())
            .collect();
        self.require_users_exist(&member_ids).await?;

        let txn = self.db.begin().await?;
        let group = ChatRepository::new(&txn)
            .create_group(name, dto.department_id, current.id(), &member_ids)
            .await?;
        txn.commit().await?;

        Ok(ChatGroupDto {
            id: group.id,
            name: group.name,
            department_id: group.department_id,
            created_by: group.created_by,
            created_at: group.created_at,
            member_count: member_ids.len() as u64 + 1,
            unread_count: 0,
            is_muted: false,
            last_message: None,
        })
    }

    pub async fn members(
        &self,
        current: &CurrentUser,
        group_id: i32,
    ) -> Result<Vec<ChatMemberDto>, AppError> {
        self.readable_group(current, group_id).await?;

        let members = ChatRepository::new(self.db).members(group_id).await?;
        let user_ids: Vec<i32> = members.iter().map(|m| m.user_id).collect();
        let names = UserRepository::new(self.db).names(&user_ids).await?;

        Ok(members
            .into_iter()
            .map(|m| ChatMemberDto {
                real_name: names.get(&m.user_id).cloned(),
                user_id: m.user_id,
                role: m.role,
                is_muted: m.is_muted,
                joined_at: m.joined_at,
            })
            .collect())
    }

    /// Adds users to a group; existing members are skipped. Group admins only.
    pub async fn add_members(
        &self,
        current: &CurrentUser,
        group_id: i32,
        user_ids: &[i32],
    ) -> Result<Vec<ChatMemberDto>, AppError> {
        self.require_group_admin(current, group_id).await?;
        let user_ids = dedup_ids(user_ids);
        if user_ids.is_empty() {
            return Err(AppError::bad_request("user_ids must not be empty"));
        }
        self.require_users_exist(&user_ids).await?;

        let txn = self.db.begin().await?;
        let repo = ChatRepository::new(&txn);
        for user_id in user_ids {
            if repo.membership(group_id, user_id).await?.is_none() {
                repo.add_member(group_id, user_id, member_role::MEMBER).await?;
            }
        }
        txn.commit().await?;

        self.members(current, group_id).await
    }

    /// Removes a member. Group admins may remove anyone; members may leave.
    pub async fn remove_member(
        &self,
        current: &CurrentUser,
        group_id: i32,
        user_id: i32,
    ) -> Result<(), AppError> {
        self.group(group_id).await?;
        if user_id != current.id() {
            self.require_group_admin(current, group_id).await?;
        }

        let removed = ChatRepository::new(self.db)
            .remove_member(group_id, user_id)
            .await?;
        if removed == 0 {
            return Err(AppError::not_found("Member not found"));
        }
        Ok(())
    }

    /// A page of history, oldest first.
    pub async fn messages(
        &self,
        current: &CurrentUser,
        group_id: i32,
        query: ChatHistoryQueryDto,
    ) -> Result<Vec<ChatMessageDto>, AppError> {
        self.readable_group(current, group_id).await?;

        let messages = ChatRepository::new(self.db)
            .history(group_id, query.before_id, history_limit(query.limit))
            .await?;
        let sender_ids: Vec<i32> = messages.iter().map(|m| m.sender_id).collect();
        let names = UserRepository::new(self.db).names(&sender_ids).await?;

        Ok(messages
            .into_iter()
            .map(|m| message_into_dto(m, &names))
            .collect())
    }

    /// Stores a message and returns it with the other members to push it to.
    pub async fn send(
        &self,
        current: &CurrentUser,
        group_id: i32,
        content: &str,
    ) -> Result<(ChatMessageDto, Vec<i32>), AppError> {
        let member = self.membership(current, group_id).await?;
        let content = required_text("content", content, MAX_MESSAGE_LENGTH)?;

        let repo = ChatRepository::new(self.db);
        let message = repo
            .create_message(group_id, current.id(), content)
            .await?;
        // The sender has read their own message.
        repo.set_last_read(member, message.id).await?;

        let recipients = repo
            .members(group_id)
            .await?
            .into_iter()
            .map(|m| m.user_id)
            .filter(|id| *id != current.id())
            .collect();

        let names = [(current.id(), current.user.real_name.clone())]
            .into_iter()
            .collect();
        Ok((message_into_dto(message, &names), recipients))
    }

    /// Moves the caller's read position to the latest message.
    pub async fn mark_read(&self, current: &CurrentUser, group_id: i32) -> Result<(), AppError> {
        let member = self.membership(current, group_id).await?;

        let repo = ChatRepository::new(self.db);
        if let Some(last) = repo.last_message(group_id).await? {
            if member.last_read_message_id.is_none_or(|id| id < last.id) {
                repo.set_last_read(member, last.id).await?;
            }
        }
        Ok(())
    }

    pub async fn set_muted(
        &self,
        current: &CurrentUser,
        group_id: i32,
        muted: bool,
    ) -> Result<(), AppError> {
        let member = self.membership(current, group_id).await?;
        ChatRepository::new(self.db).set_muted(member, muted).await?;
        Ok(())
    }

    /// Unread messages across the caller's unmuted groups.
    pub async fn unread_count(&self, current: &CurrentUser) -> Result<u64, AppError> {
        let repo = ChatRepository::new(self.db);
        let mut total = 0;
        for (_, member) in repo.groups_for_user(current.id()).await? {
            if !member.is_muted {
                total += repo.unread_count(&member).await?;
            }
        }
        Ok(total)
    }

    async fn group(&self, group_id: i32) -> Result<entity::chat_group::Model, AppError> {
        ChatRepository::new(self.db)
            .find_group(group_id)
            .await?
            .ok_or_else(|| AppError::not_found("Chat group not found"))
    }

    async fn membership(
        &self,
        current: &CurrentUser,
        group_id: i32,
    ) -> Result<entity::chat_group_member::Model, AppError> {
        self.group(group_id).await?;
        ChatRepository::new(self.db)
            .membership(group_id, current.id())
            .await?
            .ok_or_else(|| {
                AuthError::AccessDenied(
                    current.id(),
                    format!("user is not a member of chat group {}", group_id),
                )
                .into()
            })
    }

    /// Members may read a group, as may users whose scope covers its department.
    async fn readable_group(
        &self,
        current: &CurrentUser,
        group_id: i32,
    ) -> Result<entity::chat_group::Model, AppError> {
        let group = self.group(group_id).await?;
        let is_member = ChatRepository::new(self.db)
            .membership(group_id, current.id())
            .await?
            .is_some();

        let covered = group
            .department_id
            .is_some_and(|id| current.scope.contains(Some(id)));
        if !is_member && !covered {
            return Err(AuthError::AccessDenied(
                current.id(),
                format!("chat group {} is not readable", group_id),
            )
            .into());
        }
        Ok(group)
    }

    async fn require_group_admin(
        &self,
        current: &CurrentUser,
        group_id: i32,
    ) -> Result<(), AppError> {
        let member = self.membership(current, group_id).await?;
        if member.role != member_role::ADMIN {
            return Err(AuthError::AccessDenied(
                current.id(),
                format!("user is not an admin of chat group {}", group_id),
            )
            .into());
        }
        Ok(())
    }

    async fn require_users_exist(&self, user_ids: &[i32]) -> Result<(), AppError> {
        let existing = UserRepository::new(self.db).existing_ids(user_ids).await?;
        if existing.len() != user_ids.len() {
            return Err(AppError::bad_request("Unknown user id"));
        }
        Ok(())
    }
}
