use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::employee::CreateUserParams;

pub struct UserRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, params: CreateUserParams) -> Result<entity::user::Model, DbErr> {
        entity::user::ActiveModel {
            username: ActiveValue::Set(params.username),
            password_hash: ActiveValue::Set(params.password_hash),
            real_name: ActiveValue::Set(params.real_name),
            email: ActiveValue::Set(params.email),
            phone: ActiveValue::Set(params.phone),
            department_id: ActiveValue::Set(params.department_id),
            status: ActiveValue::Set("active".to_string()),
            created_at: ActiveValue::Set(Utc::now()),
            last_login_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn find_by_id(&self, user_id: i32) -> Result<Option<entity::user::Model>, DbErr> {
        entity::prelude::User::find_by_id(user_id).one(self.db).await
    }

    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<entity::user::Model>, DbErr> {
        entity::prelude::User::find()
            .filter(entity::user::Column::Username.eq(username))
            .one(self.db)
            .await
    }

    pub async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<entity::user::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::User::find()
            .filter(entity::user::Column::Id.is_in(ids.to_vec()))
            .order_by_asc(entity::user::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn update_password(&self, user_id: i32, password_hash: String) -> Result<(), DbErr> {
        entity::user::ActiveModel {
            id: ActiveValue::Unchanged(user_id),
            password_hash: ActiveValue::Set(password_hash),
            ..Default::default()
        }
        .update(self.db)
        .await?;
        Ok(())
    }

    pub async fn touch_last_login(&self, user_id: i32) -> Result<entity::user::Model, DbErr> {
        entity::user::ActiveModel {
            id: ActiveValue::Unchanged(user_id),
            last_login_at: ActiveValue::Set(Some(Utc::now())),
            ..Default::default()
        }
        .update(self.db)
        .await
    }

    /// Updates the profile columns that are `Some`.
    pub async fn update_profile(
        &self,
        user: entity::user::Model,
        real_name: Option<String>,
        email: Option<String>,
        phone: Option<String>,
        department_id: Option<i32>,
    ) -> Result<entity::user::Model, DbErr> {
        let mut active_model: entity::user::ActiveModel = user.clone().into();
        if let Some(real_name) = real_name {
            active_model.real_name = ActiveValue::Set(real_name);
        }
        if let Some(email) = email {
            active_model.email = ActiveValue::Set(Some(email));
        }
        if let Some(phone) = phone {
            active_model.phone = ActiveValue::Set(Some(phone));
        }
        if let Some(department_id) = department_id {
            active_model.department_id = ActiveValue::Set(Some(department_id));
        }
        if !active_model.is_changed() {
            return Ok(user);
        }
        active_model.update(self.db).await
    }

    pub async fn set_status(&self, user_id: i32, status: &str) -> Result<(), DbErr> {
        entity::user::ActiveModel {
            id: ActiveValue::Unchanged(user_id),
            status: ActiveValue::Set(status.to_string()),
            ..Default::default()
        }
        .update(self.db)
        .await?;
        Ok(())
    }

    pub async fn count_in_department(&self, department_id: i32) -> Result<u64, DbErr> {
        entity::prelude::User::find()
            .filter(entity::user::Column::DepartmentId.eq(department_id))
            .count(self.db)
            .await
    }

    /// Ids of active users in any of the departments.
    pub async fn active_ids_in_departments(
        &self,
        department_ids: &[i32],
    ) -> Result<Vec<i32>, DbErr> {
        if department_ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::User::find()
            .select_only()
            .column(entity::user::Column::Id)
            .filter(entity::user::Column::Status.eq("active"))
            .filter(entity::user::Column::DepartmentId.is_in(department_ids.to_vec()))
            .order_by_asc(entity::user::Column::Id)
            .into_tuple::<i32>()
            .all(self.db)
            .await
    }

    pub async fn active_ids(&self) -> Result<Vec<i32>, DbErr> {
        entity::prelude::User::find()
            .select_only()
            .column(entity::user::Column::Id)
            .filter(entity::user::Column::Status.eq("active"))
            .order_by_asc(entity::user::Column::Id)
            .into_tuple::<i32>()
            .all(self.db)
            .await
    }

    /// Returns which of `ids` exist.
    pub async fn existing_ids(&self, ids: &[i32]) -> Result<Vec<i32>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::User::find()
            .select_only()
            .column(entity::user::Column::Id)
            .filter(entity::user::Column::Id.is_in(ids.to_vec()))
            .into_tuple::<i32>()
            .all(self.db)
            .await
    }

    /// Maps user ids to real names.
    pub async fn names(&self, ids: &[i32]) -> Result<std::collections::HashMap<i32, String>, DbErr> {
        if ids.is_empty() {
            return Ok(std::collections::HashMap::new());
        }

        let rows = entity::prelude::User::find()
            .select_only()
            .column(entity::user::Column::Id)
            .column(entity::user::Column::RealName)
            .filter(entity::user::Column::Id.is_in(ids.to_vec()))
            .into_tuple::<(i32, String)>()
            .all(self.db)
            .await?;

        Ok(rows.into_iter().collect())
    }
}
