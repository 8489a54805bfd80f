use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, SelectTwo,
};

use crate::server::model::employee::{Employee, EmployeeFilter};

pub struct EmployeeRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> EmployeeRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        user_id: i32,
        employee_no: String,
        position: Option<String>,
        hire_date: Option<NaiveDate>,
    ) -> Result<entity::employee::Model, DbErr> {
        entity::employee::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            employee_no: ActiveValue::Set(employee_no),
            position: ActiveValue::Set(position),
            hire_date: ActiveValue::Set(hire_date),
            status: ActiveValue::Set("active".to_string()),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn find_entity_by_id(
        &self,
        id: i32,
    ) -> Result<Option<entity::employee::Model>, DbErr> {
        entity::prelude::Employee::find_by_id(id).one(self.db).await
    }

    /// Gets an employee joined with user and department.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Employee>, DbErr> {
        let result = entity::prelude::Employee::find_by_id(id)
            .find_also_related(entity::prelude::User)
            .one(self.db)
            .await?;

        let Some((employee, Some(user))) = result else {
            return Ok(None);
        };

        let mut employees = self.attach_departments(vec![(employee, user)]).await?;
        Ok(employees.pop())
    }

    pub async fn find_by_user_id(
        &self,
        user_id: i32,
    ) -> Result<Option<entity::employee::Model>, DbErr> {
        entity::prelude::Employee::find()
            .filter(entity::employee::Column::UserId.eq(user_id))
            .one(self.db)
            .await
    }

    pub async fn find_by_employee_no(
        &self,
        employee_no: &str,
    ) -> Result<Option<entity::employee::Model>, DbErr> {
        entity::prelude::Employee::find()
            .filter(entity::employee::Column::EmployeeNo.eq(employee_no))
            .one(self.db)
            .await
    }

    /// Gets a page of employees matching the filter, ordered by employee id.
    pub async fn get_paginated(
        &self,
        filter: &EmployeeFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Employee>, u64), DbErr> {
        let paginator = apply_filter(joined(), filter)
            .order_by_asc(entity::employee::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page).await?;

        let pairs = rows
            .into_iter()
            .filter_map(|(employee, user)| user.map(|u| (employee, u)))
            .collect();

        Ok((self.attach_departments(pairs).await?, total))
    }

    /// All employees matching the filter, ordered by department then employee number.
    pub async fn list(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>, DbErr> {
        let rows = apply_filter(joined(), filter)
            .order_by_asc(entity::user::Column::DepartmentId)
            .order_by_asc(entity::employee::Column::EmployeeNo)
            .all(self.db)
            .await?;

        let pairs = rows
            .into_iter()
            .filter_map(|(employee, user)| user.map(|u| (employee, u)))
            .collect();

        self.attach_departments(pairs).await
    }

    /// Ids of employees whose user belongs to one of the departments.
    pub async fn ids_in_departments(&self, department_ids: &[i32]) -> Result<Vec<i32>, DbErr> {
        if department_ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::Employee::find()
            .inner_join(entity::prelude::User)
            .select_only()
            .column(entity::employee::Column::Id)
            .filter(entity::user::Column::DepartmentId.is_in(department_ids.to_vec()))
            .into_tuple::<i32>()
            .all(self.db)
            .await
    }

    /// Updates the HR columns that are `Some`.
    pub async fn update(
        &self,
        employee: entity::employee::Model,
        position: Option<String>,
        hire_date: Option<NaiveDate>,
        status: Option<String>,
    ) -> Result<entity::employee::Model, DbErr> {
        let mut active_model: entity::employee::ActiveModel = employee.clone().into();
        if let Some(position) = position {
            active_model.position = ActiveValue::Set(Some(position));
        }
        if let Some(hire_date) = hire_date {
            active_model.hire_date = ActiveValue::Set(Some(hire_date));
        }
        if let Some(status) = status {
            active_model.status = ActiveValue::Set(status);
        }
        if !active_model.is_changed() {
            return Ok(employee);
        }
        active_model.update(self.db).await
    }

    /// Returns which of `ids` exist.
    pub async fn existing_ids(&self, ids: &[i32]) -> Result<Vec<i32>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::Employee::find()
            .select_only()
            .column(entity::employee::Column::Id)
            .filter(entity::employee::Column::Id.is_in(ids.to_vec()))
            .into_tuple::<i32>()
            .all(self.db)
            .await
    }

    /// Maps employee ids to (real name, department id) of their user.
    pub async fn directory(
        &self,
        ids: &[i32],
    ) -> Result<HashMap<i32, (String, Option<i32>)>, DbErr> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = entity::prelude::Employee::find()
            .inner_join(entity::prelude::User)
            .select_only()
            .column(entity::employee::Column::Id)
            .column(entity::user::Column::RealName)
            .column(entity::user::Column::DepartmentId)
            .filter(entity::employee::Column::Id.is_in(ids.to_vec()))
            .into_tuple::<(i32, String, Option<i32>)>()
            .all(self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, department_id)| (id, (name, department_id)))
            .collect())
    }

    /// Maps employee ids to their user's real name.
    pub async fn names(&self, ids: &[i32]) -> Result<HashMap<i32, String>, DbErr> {
        Ok(self
            .directory(ids)
            .await?
            .into_iter()
            .map(|(id, (name, _))| (id, name))
            .collect())
    }

    /// Resolves department names for a batch of employee/user pairs in one query.
    async fn attach_departments(
        &self,
        pairs: Vec<(entity::employee::Model, entity::user::Model)>,
    ) -> Result<Vec<Employee>, DbErr> {
        let department_ids: Vec<i32> = pairs
            .iter()
            .filter_map(|(_, user)| user.department_id)
            .collect();

        let departments: HashMap<i32, entity::department::Model> = if department_ids.is_empty() {
            HashMap::new()
        } else {
            entity::prelude::Department::find()
                .filter(entity::department::Column::Id.is_in(department_ids))
                .all(self.db)
                .await?
                .into_iter()
                .map(|d| (d.id, d))
                .collect()
        };

        Ok(pairs
            .into_iter()
            .map(|(employee, user)| {
                let department = user
                    .department_id
                    .and_then(|id| departments.get(&id).cloned());
                Employee::from_entities(employee, user, department)
            })
            .collect())
    }
}

fn joined() -> SelectTwo<entity::employee::Entity, entity::user::Entity> {
    let query: Select<entity::employee::Entity> = entity::prelude::Employee::find();
    query.find_also_related(entity::prelude::User)
}

fn apply_filter(
    mut query: SelectTwo<entity::employee::Entity, entity::user::Entity>,
    filter: &EmployeeFilter,
) -> SelectTwo<entity::employee::Entity, entity::user::Entity> {
    if let Some(ids) = &filter.department_ids {
        query = query.filter(entity::user::Column::DepartmentId.is_in(ids.clone()));
    }
    if let Some(status) = &filter.status {
        query = query.filter(entity::employee::Column::Status.eq(status.as_str()));
    }
    if let Some(keyword) = &filter.keyword {
        let keyword = keyword.trim();
        query = query.filter(
            Condition::any()
                .add(entity::user::Column::RealName.contains(keyword))
                .add(entity::user::Column::Username.contains(keyword))
                .add(entity::employee::Column::EmployeeNo.contains(keyword)),
        );
    }
    query
}
