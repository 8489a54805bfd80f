use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::department::{CreateDepartmentParams, UpdateDepartmentParams};

pub struct DepartmentRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> DepartmentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        params: CreateDepartmentParams,
    ) -> Result<entity::department::Model, DbErr> {
        entity::department::ActiveModel {
            name: ActiveValue::Set(params.name),
            parent_id: ActiveValue::Set(params.parent_id),
            description: ActiveValue::Set(params.description),
            status: ActiveValue::Set(params.status),
            sort_order: ActiveValue::Set(params.sort_order),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<entity::department::Model>, DbErr> {
        entity::prelude::Department::find_by_id(id).one(self.db).await
    }

    pub async fn find_by_name(
        &self,
        name: &str,
    ) -> Result<Option<entity::department::Model>, DbErr> {
        entity::prelude::Department::find()
            .filter(entity::department::Column::Name.eq(name))
            .one(self.db)
            .await
    }

    /// Lists departments ordered by sort order then id.
    ///
    /// `department_ids` restricts the result; `None` returns every department.
    pub async fn list(
        &self,
        department_ids: Option<&[i32]>,
    ) -> Result<Vec<entity::department::Model>, DbErr> {
        let mut query = entity::prelude::Department::find();
        if let Some(ids) = department_ids {
            query = query.filter(entity::department::Column::Id.is_in(ids.to_vec()));
        }

        query
            .order_by_asc(entity::department::Column::SortOrder)
            .order_by_asc(entity::department::Column::Id)
            .all(self.db)
            .await
    }

    /// Lists active departments ordered by sort order then id.
    pub async fn list_active(&self) -> Result<Vec<entity::department::Model>, DbErr> {
        entity::prelude::Department::find()
            .filter(entity::department::Column::Status.eq("active"))
            .order_by_asc(entity::department::Column::SortOrder)
            .order_by_asc(entity::department::Column::Id)
            .all(self.db)
            .await
    }

    /// Applies the supplied fields. Returns `None` when the department does not exist.
    pub async fn update(
        &self,
        id: i32,
        params: UpdateDepartmentParams,
    ) -> Result<Option<entity::department::Model>, DbErr> {
        let Some(department) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut active_model: entity::department::ActiveModel = department.clone().into();
        if let Some(name) = params.name {
            active_model.name = ActiveValue::Set(name);
        }
        if let Some(parent_id) = params.parent_id {
            active_model.parent_id = ActiveValue::Set(Some(parent_id));
        }
        if let Some(description) = params.description {
            active_model.description = ActiveValue::Set(Some(description));
        }
        if let Some(status) = params.status {
            active_model.status = ActiveValue::Set(status);
        }
        if let Some(sort_order) = params.sort_order {
            active_model.sort_order = ActiveValue::Set(sort_order);
        }

        if !active_model.is_changed() {
            return Ok(Some(department));
        }

        Ok(Some(active_model.update(self.db).await?))
    }

    /// Deletes a department, returning the number of rows removed.
    pub async fn delete(&self, id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::Department::delete_by_id(id)
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn count_children(&self, id: i32) -> Result<u64, DbErr> {
        entity::prelude::Department::find()
            .filter(entity::department::Column::ParentId.eq(id))
            .count(self.db)
            .await
    }

    /// Returns which of `ids` exist.
    pub async fn existing_ids(&self, ids: &[i32]) -> Result<Vec<i32>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::Department::find()
            .select_only()
            .column(entity::department::Column::Id)
            .filter(entity::department::Column::Id.is_in(ids.to_vec()))
            .into_tuple::<i32>()
            .all(self.db)
            .await
    }
}
