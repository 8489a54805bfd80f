use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};

use crate::server::model::assessment::{
    CreatePlanParams, ExamParams, ExamStatus, Plan, PlanStatus, ResultStatus, UpdatePlanParams,
};

pub struct ExamRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ExamRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts a draft exam.
    pub async fn create(&self, params: ExamParams, created_by: i32) -> Result<entity::exam::Model, DbErr> {
        let now = Utc::now();
        entity::exam::ActiveModel {
            title: ActiveValue::Set(params.title),
            description: ActiveValue::Set(params.description),
            duration_minutes: ActiveValue::Set(params.duration_minutes),
            total_score: ActiveValue::Set(params.total_score),
            pass_score: ActiveValue::Set(params.pass_score),
            status: ActiveValue::Set(ExamStatus::Draft.as_str().to_string()),
            created_by: ActiveValue::Set(Some(created_by)),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<entity::exam::Model>, DbErr> {
        entity::prelude::Exam::find_by_id(id).one(self.db).await
    }

    pub async fn list(
        &self,
        status: Option<&str>,
        keyword: Option<&str>,
    ) -> Result<Vec<entity::exam::Model>, DbErr> {
        let mut query = entity::prelude::Exam::find();
        if let Some(status) = status {
            query = query.filter(entity::exam::Column::Status.eq(status));
        }
        if let Some(keyword) = keyword {
            query = query.filter(entity::exam::Column::Title.contains(keyword));
        }
        query
            .order_by_desc(entity::exam::Column::CreatedAt)
            .order_by_desc(entity::exam::Column::Id)
            .all(self.db)
            .await
    }

    /// Overwrites the editable fields.
    pub async fn update(
        &self,
        exam: entity::exam::Model,
        params: ExamParams,
    ) -> Result<entity::exam::Model, DbErr> {
        let mut active_model: entity::exam::ActiveModel = exam.clone().into();
        active_model.title = ActiveValue::Set(params.title);
        active_model.description = ActiveValue::Set(params.description);
        active_model.duration_minutes = ActiveValue::Set(params.duration_minutes);
        active_model.total_score = ActiveValue::Set(params.total_score);
        active_model.pass_score = ActiveValue::Set(params.pass_score);
        if !active_model.is_changed() {
            return Ok(exam);
        }
        active_model.updated_at = ActiveValue::Set(Utc::now());
        active_model.update(self.db).await
    }

    pub async fn set_status(
        &self,
        exam: entity::exam::Model,
        status: ExamStatus,
    ) -> Result<entity::exam::Model, DbErr> {
        let mut active_model: entity::exam::ActiveModel = exam.into();
        active_model.status = ActiveValue::Set(status.as_str().to_string());
        active_model.updated_at = ActiveValue::Set(Utc::now());
        active_model.update(self.db).await
    }

    pub async fn delete(&self, id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::Exam::delete_by_id(id).exec(self.db).await?;
        Ok(result.rows_affected)
    }

    /// Plans that are not soft-deleted and use the exam.
    pub async fn count_active_plans(&self, exam_id: i32) -> Result<u64, DbErr> {
        entity::prelude::AssessmentPlan::find()
            .filter(entity::assessment_plan::Column::ExamId.eq(exam_id))
            .filter(entity::assessment_plan::Column::IsDeleted.eq(false))
            .count(self.db)
            .await
    }
}

pub struct PlanRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PlanRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts a plan and its target departments.
    pub async fn create(&self, params: CreatePlanParams) -> Result<entity::assessment_plan::Model, DbErr> {
        let now = Utc::now();
        let plan = entity::assessment_plan::ActiveModel {
            title: ActiveValue::Set(params.title),
            description: ActiveValue::Set(params.description),
            exam_id: ActiveValue::Set(params.exam_id),
            start_time: ActiveValue::Set(params.start_time),
            end_time: ActiveValue::Set(params.end_time),
            max_attempts: ActiveValue::Set(params.max_attempts),
            created_by: ActiveValue::Set(Some(params.created_by)),
            is_deleted: ActiveValue::Set(false),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        self.replace_departments(plan.id, &params.department_ids).await?;

        Ok(plan)
    }

    /// Gets a plan that has not been soft-deleted.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Plan>, DbErr> {
        let plan = entity::prelude::AssessmentPlan::find_by_id(id)
            .filter(entity::assessment_plan::Column::IsDeleted.eq(false))
            .one(self.db)
            .await?;

        match plan {
            Some(plan) => Ok(self.load(vec![plan]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Non-deleted plans filtered by title keyword and status, newest first.
    pub async fn get_paginated(
        &self,
        keyword: Option<&str>,
        status: Option<PlanStatus>,
        now: DateTime<Utc>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Plan>, u64), DbErr> {
        let mut query = active_plans();
        if let Some(keyword) = keyword {
            query = query.filter(entity::assessment_plan::Column::Title.contains(keyword));
        }
        if let Some(status) = status {
            query = filter_status(query, status, now);
        }

        let paginator = query
            .order_by_desc(entity::assessment_plan::Column::StartTime)
            .order_by_desc(entity::assessment_plan::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let plans = paginator.fetch_page(page).await?;
        Ok((self.load(plans).await?, total))
    }

    /// Non-deleted plans targeting the department.
    pub async fn list_for_department(&self, department_id: i32) -> Result<Vec<Plan>, DbErr> {
        let plan_ids: Vec<i32> = entity::prelude::AssessmentPlanDepartment::find()
            .select_only()
            .column(entity::assessment_plan_department::Column::PlanId)
            .filter(entity::assessment_plan_department::Column::DepartmentId.eq(department_id))
            .into_tuple::<i32>()
            .all(self.db)
            .await?;
        if plan_ids.is_empty() {
            return Ok(Vec::new());
        }

        let plans = active_plans()
            .filter(entity::assessment_plan::Column::Id.is_in(plan_ids))
            .order_by_desc(entity::assessment_plan::Column::StartTime)
            .all(self.db)
            .await?;

        self.load(plans).await
    }

    pub async fn update(
        &self,
        plan: entity::assessment_plan::Model,
        params: UpdatePlanParams,
    ) -> Result<entity::assessment_plan::Model, DbErr> {
        let mut active_model: entity::assessment_plan::ActiveModel = plan.clone().into();
        if let Some(title) = params.title {
            active_model.title = ActiveValue::Set(title);
        }
        if let Some(description) = params.description {
            active_model.description = ActiveValue::Set(Some(description));
        }
        if let Some(exam_id) = params.exam_id {
            active_model.exam_id = ActiveValue::Set(exam_id);
        }
        if let Some(start_time) = params.start_time {
            active_model.start_time = ActiveValue::Set(start_time);
        }
        if let Some(end_time) = params.end_time {
            active_model.end_time = ActiveValue::Set(end_time);
        }
        if let Some(max_attempts) = params.max_attempts {
            active_model.max_attempts = ActiveValue::Set(max_attempts);
        }
        if !active_model.is_changed() {
            return Ok(plan);
        }
        active_model.updated_at = ActiveValue::Set(Utc::now());
        active_model.update(self.db).await
    }

    pub async fn soft_delete(&self, plan: entity::assessment_plan::Model) -> Result<(), DbErr> {
        let mut active_model: entity::assessment_plan::ActiveModel = plan.into();
        active_model.is_deleted = ActiveValue::Set(true);
        active_model.updated_at = ActiveValue::Set(Utc::now());
        active_model.update(self.db).await?;
        Ok(())
    }

    pub async fn replace_departments(&self, plan_id: i32, department_ids: &[i32]) -> Result<(), DbErr> {
        entity::prelude::AssessmentPlanDepartment::delete_many()
            .filter(entity::assessment_plan_department::Column::PlanId.eq(plan_id))
            .exec(self.db)
            .await?;

        for department_id in department_ids {
            entity::assessment_plan_department::ActiveModel {
                plan_id: ActiveValue::Set(plan_id),
                department_id: ActiveValue::Set(*department_id),
            }
            .insert(self.db)
            .await?;
        }

        Ok(())
    }

    /// Resolves exam titles and target departments for a batch of plans.
    async fn load(&self, plans: Vec<entity::assessment_plan::Model>) -> Result<Vec<Plan>, DbErr> {
        if plans.is_empty() {
            return Ok(Vec::new());
        }

        let plan_ids: Vec<i32> = plans.iter().map(|p| p.id).collect();
        let exam_ids: Vec<i32> = plans.iter().map(|p| p.exam_id).collect();

        let exam_titles: HashMap<i32, String> = entity::prelude::Exam::find()
            .filter(entity::exam::Column::Id.is_in(exam_ids))
            .all(self.db)
            .await?
            .into_iter()
            .map(|e| (e.id, e.title))
            .collect();

        let mut departments: HashMap<i32, Vec<i32>> = HashMap::new();
        let links = entity::prelude::AssessmentPlanDepartment::find()
            .filter(entity::assessment_plan_department::Column::PlanId.is_in(plan_ids))
            .order_by_asc(entity::assessment_plan_department::Column::DepartmentId)
            .all(self.db)
            .await?;
        for link in links {
            departments.entry(link.plan_id).or_default().push(link.department_id);
        }

        Ok(plans
            .into_iter()
            .map(|plan| Plan {
                exam_title: exam_titles.get(&plan.exam_id).cloned(),
                department_ids: departments.remove(&plan.id).unwrap_or_default(),
                plan,
            })
            .collect())
    }
}

fn active_plans() -> Select<entity::prelude::AssessmentPlan> {
    entity::prelude::AssessmentPlan::find()
        .filter(entity::assessment_plan::Column::IsDeleted.eq(false))
}

fn filter_status(
    query: Select<entity::prelude::AssessmentPlan>,
    status: PlanStatus,
    now: DateTime<Utc>,
) -> Select<entity::prelude::AssessmentPlan> {
    match status {
        PlanStatus::NotStarted => query.filter(entity::assessment_plan::Column::StartTime.gt(now)),
        PlanStatus::Ongoing => query
            .filter(entity::assessment_plan::Column::StartTime.lte(now))
            .filter(entity::assessment_plan::Column::EndTime.gte(now)),
        PlanStatus::Ended => query.filter(entity::assessment_plan::Column::EndTime.lt(now)),
    }
}

pub struct ResultRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ResultRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        plan_id: i32,
        user_id: i32,
        attempt_no: i32,
    ) -> Result<entity::assessment_result::Model, DbErr> {
        entity::assessment_result::ActiveModel {
            plan_id: ActiveValue::Set(plan_id),
            user_id: ActiveValue::Set(user_id),
            attempt_no: ActiveValue::Set(attempt_no),
            status: ActiveValue::Set(ResultStatus::InProgress.as_str().to_string()),
            started_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<entity::assessment_result::Model>, DbErr> {
        entity::prelude::AssessmentResult::find_by_id(id).one(self.db).await
    }

    /// Attempts at a plan grouped by user.
    pub async fn by_user_for_plan(
        &self,
        plan_id: i32,
    ) -> Result<HashMap<i32, Vec<entity::assessment_result::Model>>, DbErr> {
        let results = entity::prelude::AssessmentResult::find()
            .filter(entity::assessment_result::Column::PlanId.eq(plan_id))
            .order_by_asc(entity::assessment_result::Column::AttemptNo)
            .all(self.db)
            .await?;

        let mut grouped: HashMap<i32, Vec<entity::assessment_result::Model>> = HashMap::new();
        for result in results {
            grouped.entry(result.user_id).or_default().push(result);
        }
        Ok(grouped)
    }

    pub async fn list_for_user(
        &self,
        plan_id: i32,
        user_id: i32,
    ) -> Result<Vec<entity::assessment_result::Model>, DbErr> {
        entity::prelude::AssessmentResult::find()
            .filter(entity::assessment_result::Column::PlanId.eq(plan_id))
            .filter(entity::assessment_result::Column::UserId.eq(user_id))
            .order_by_asc(entity::assessment_result::Column::AttemptNo)
            .all(self.db)
            .await
    }

    pub async fn submit(
        &self,
        result: entity::assessment_result::Model,
    ) -> Result<entity::assessment_result::Model, DbErr> {
        let mut active_model: entity::assessment_result::ActiveModel = result.into();
        active_model.status = ActiveValue::Set(ResultStatus::Submitted.as_str().to_string());
        active_model.submitted_at = ActiveValue::Set(Some(Utc::now()));
        active_model.update(self.db).await
    }

    pub async fn grade(
        &self,
        result: entity::assessment_result::Model,
        score: f64,
        passed: bool,
        graded_by: i32,
    ) -> Result<entity::assessment_result::Model, DbErr> {
        let now = Utc::now();
        let submitted_at = result.submitted_at.unwrap_or(now);
        let mut active_model: entity::assessment_result::ActiveModel = result.into();
        active_model.status = ActiveValue::Set(ResultStatus::Graded.as_str().to_string());
        active_model.score = ActiveValue::Set(Some(score));
        active_model.passed = ActiveValue::Set(Some(passed));
        active_model.submitted_at = ActiveValue::Set(Some(submitted_at));
        active_model.graded_at = ActiveValue::Set(Some(now));
        active_model.graded_by = ActiveValue::Set(Some(graded_by));
        active_model.update(self.db).await
    }
}
