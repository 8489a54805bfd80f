//! Exams, assessment plans and the attempts users make at them.

use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, SqlErr, TransactionTrait};

use crate::{
    model::{
        api::{PageDto, PaginationParams},
        assessment::{
            AssessmentResultDto, CreateExamDto, CreatePlanDto, ExamDto, ExamFilterDto, MyPlanDto,
            ParticipantDto, ParticipantsDto, PlanDto, PlanFilterDto, UpdateExamDto, UpdatePlanDto,
        },
        notification::NotificationDto,
    },
    server::{
        data::{
            assessment::{ExamRepository, PlanRepository, ResultRepository},
            department::DepartmentRepository,
            user::UserRepository,
        },
        error::{auth::AuthError, AppError},
        middleware::auth::CurrentUser,
        model::{
            assessment::{
                exam_into_dto, participant_stats, result_into_dto, AttemptSummary,
                CreatePlanParams, ExamParams, ExamStatus, Plan, PlanStatus, ResultStatus,
                UpdatePlanParams,
            },
            notification::{kind, CreateNotificationParams},
        },
        service::notification::notify,
        util::validate::{optional_text, required_text},
    },
};

const TITLE_MAX_CHARS: usize = 200;

pub struct AssessmentService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AssessmentService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_exams(&self, filter: ExamFilterDto) -> Result<Vec<ExamDto>, AppError> {
        if let Some(status) = &filter.status {
            parse_exam_status(status)?;
        }
        let keyword = filter.keyword.filter(|k| !k.trim().is_empty());

        let exams = ExamRepository::new(self.db)
            .list(filter.status.as_deref(), keyword.as_deref())
            .await?;
        Ok(exams.into_iter().map(exam_into_dto).collect())
    }

    pub async fn get_exam(&self, id: i32) -> Result<ExamDto, AppError> {
        Ok(exam_into_dto(self.exam(id).await?))
    }

    /// Creates a draft exam.
    pub async fn create_exam(
        &self,
        current: &CurrentUser,
        dto: CreateExamDto,
    ) -> Result<ExamDto, AppError> {
        let params = validate_exam(ExamParams {
            title: dto.title,
            description: dto.description,
            duration_minutes: dto.duration_minutes,
            total_score: dto.total_score,
            pass_score: dto.pass_score,
        })?;

        let exam = ExamRepository::new(self.db)
            .create(params, current.id())
            .await?;
        Ok(exam_into_dto(exam))
    }

    pub async fn update_exam(&self, id: i32, dto: UpdateExamDto) -> Result<ExamDto, AppError> {
        let exam = self.exam(id).await?;
        let params = validate_exam(ExamParams {
            title: dto.title.unwrap_or_else(|| exam.title.clone()),
            description: dto.description.or_else(|| exam.description.clone()),
            duration_minutes: dto.duration_minutes.unwrap_or(exam.duration_minutes),
            total_score: dto.total_score.unwrap_or(exam.total_score),
            pass_score: dto.pass_score.unwrap_or(exam.pass_score),
        })?;

        let exam = ExamRepository::new(self.db).update(exam, params).await?;
        Ok(exam_into_dto(exam))
    }

    pub async fn set_exam_status(&self, id: i32, status: &str) -> Result<ExamDto, AppError> {
        let status = parse_exam_status(status)?;
        let exam = self.exam(id).await?;

        let exam = ExamRepository::new(self.db).set_status(exam, status).await?;
        Ok(exam_into_dto(exam))
    }

    /// Deletes an exam that no live plan uses.
    pub async fn delete_exam(&self, id: i32) -> Result<(), AppError> {
        self.exam(id).await?;

        let repo = ExamRepository::new(self.db);
        if repo.count_active_plans(id).await? > 0 {
            return Err(AppError::bad_request(
                "Exam is used by an assessment plan and cannot be deleted",
            ));
        }

        repo.delete(id).await?;
        Ok(())
    }

    /// Creates a plan and notifies every active user of the target departments.
    ///
    /// The notifications are returned for pushing after commit.
    pub async fn create_plan(
        &self,
        current: &CurrentUser,
        dto: CreatePlanDto,
        now: DateTime<Utc>,
    ) -> Result<(PlanDto, Vec<NotificationDto>), AppError> {
        let title = required_text("title", &dto.title, TITLE_MAX_CHARS)?;
        let description = optional_text("description", dto.description, 2000)?;
        self.published_exam(dto.exam_id).await?;
        validate_window(dto.start_time, dto.end_time)?;
        let max_attempts = dto.max_attempts.unwrap_or(1);
        validate_max_attempts(max_attempts)?;
        let department_ids = self.target_departments(&dto.department_ids).await?;

        let recipients = UserRepository::new(self.db)
            .active_ids_in_departments(&department_ids)
            .await?;

        let txn = self.db.begin().await?;
        let plan_repo = PlanRepository::new(&txn);
        let plan = plan_repo
            .create(CreatePlanParams {
                title,
                description,
                exam_id: dto.exam_id,
                start_time: dto.start_time,
                end_time: dto.end_time,
                max_attempts,
                department_ids,
                created_by: current.id(),
            })
            .await?;

        let mut notifications = Vec::with_capacity(recipients.len());
        for user_id in recipients {
            notifications.push(
                notify(
                    &txn,
                    CreateNotificationParams {
                        user_id,
                        kind: kind::EXAM_NOTIFICATION.to_string(),
                        title: format!("New assessment: {}", plan.title),
                        content: format!(
                            "The assessment \"{}\" runs from {} to {}.",
                            plan.title,
                            plan.start_time.format("%Y-%m-%d %H:%M"),
                            plan.end_time.format("%Y-%m-%d %H:%M")
                        ),
                        related_type: Some("assessment_plan".to_string()),
                        related_id: Some(plan.id),
                    },
                )
                .await?,
            );
        }

        let plan = plan_repo
            .find_by_id(plan.id)
            .await?
            .ok_or_else(|| AppError::InternalError("Plan vanished after insert".to_string()))?;
        txn.commit().await?;

        tracing::info!(
            "Assessment plan {} created, {} users notified",
            plan.plan.id,
            notifications.len()
        );

        Ok((plan.into_dto(now), notifications))
    }

    pub async fn list_plans(
        &self,
        filter: PlanFilterDto,
        pagination: PaginationParams,
        now: DateTime<Utc>,
    ) -> Result<PageDto<PlanDto>, AppError> {
        let status = match filter.status.as_deref().filter(|s| !s.is_empty()) {
            Some(status) => Some(
                PlanStatus::parse(status)
                    .ok_or_else(|| AppError::bad_request(format!("Unknown status {}", status)))?,
            ),
            None => None,
        };
        let keyword = filter.keyword.filter(|k| !k.trim().is_empty());
        let per_page = pagination.per_page();

        let (plans, total) = PlanRepository::new(self.db)
            .get_paginated(keyword.as_deref(), status, now, pagination.page, per_page)
            .await?;

        Ok(PageDto::new(
            plans.into_iter().map(|p| p.into_dto(now)).collect(),
            total,
            pagination.page,
            per_page,
        ))
    }

    pub async fn get_plan(&self, id: i32, now: DateTime<Utc>) -> Result<PlanDto, AppError> {
        Ok(self.plan(id).await?.into_dto(now))
    }

    /// Updates a plan that has not started yet.
    pub async fn update_plan(
        &self,
        id: i32,
        dto: UpdatePlanDto,
        now: DateTime<Utc>,
    ) -> Result<PlanDto, AppError> {
        let plan = self.plan(id).await?;
        if plan.status(now) != PlanStatus::NotStarted {
            return Err(AppError::bad_request(
                "A plan cannot be changed once it has started",
            ));
        }

        let title = match dto.title {
            Some(title) => Some(required_text("title", &title, TITLE_MAX_CHARS)?),
            None => None,
        };
        if let Some(exam_id) = dto.exam_id {
            self.published_exam(exam_id).await?;
        }
        validate_window(
            dto.start_time.unwrap_or(plan.plan.start_time),
            dto.end_time.unwrap_or(plan.plan.end_time),
        )?;
        if let Some(max_attempts) = dto.max_attempts {
            validate_max_attempts(max_attempts)?;
        }
        let department_ids = match dto.department_ids {
            Some(ids) => Some(self.target_departments(&ids).await?),
            None => None,
        };

        let txn = self.db.begin().await?;
        let repo = PlanRepository::new(&txn);
        repo.update(
            plan.plan,
            UpdatePlanParams {
                title,
                description: dto.description,
                exam_id: dto.exam_id,
                start_time: dto.start_time,
                end_time: dto.end_time,
                max_attempts: dto.max_attempts,
            },
        )
        .await?;
        if let Some(department_ids) = department_ids {
            repo.replace_departments(id, &department_ids).await?;
        }
        let plan = repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Assessment plan not found"))?;
        txn.commit().await?;

        Ok(plan.into_dto(now))
    }

    pub async fn delete_plan(&self, id: i32) -> Result<(), AppError> {
        let plan = self.plan(id).await?;
        PlanRepository::new(self.db).soft_delete(plan.plan).await?;
        Ok(())
    }

    /// Active users of the target departments with their attempt summary.
    ///
    /// `filter` narrows to `completed` or `incomplete` participants; the stats always
    /// cover everyone.
    pub async fn participants(
        &self,
        id: i32,
        filter: Option<&str>,
    ) -> Result<ParticipantsDto, AppError> {
        let completed_filter = match filter.filter(|f| !f.is_empty()) {
            None => None,
            Some("completed") => Some(true),
            Some("incomplete") => Some(false),
            Some(other) => {
                return Err(AppError::bad_request(format!("Unknown filter {}", other)));
            }
        };

        let plan = self.plan(id).await?;
        let user_repo = UserRepository::new(self.db);
        let user_ids = user_repo
            .active_ids_in_departments(&plan.department_ids)
            .await?;
        let users = user_repo.find_by_ids(&user_ids).await?;
        let mut results = ResultRepository::new(self.db)
            .by_user_for_plan(plan.plan.id)
            .await?;

        let participants: Vec<ParticipantDto> = users
            .into_iter()
            .map(|user| {
                let summary = AttemptSummary::from_results(
                    &results.remove(&user.id).unwrap_or_default(),
                );
                ParticipantDto {
                    user_id: user.id,
                    real_name: user.real_name,
                    department_id: user.department_id,
                    attempts: summary.attempts,
                    best_score: summary.best_score,
                    remaining_attempts: summary.remaining(plan.plan.max_attempts),
                    passed: summary.passed,
                }
            })
            .collect();

        let stats = participant_stats(&participants);
        let participants = match completed_filter {
            Some(completed) => participants
                .into_iter()
                .filter(|p| p.best_score.is_some() == completed)
                .collect(),
            None => participants,
        };

        Ok(ParticipantsDto {
            participants,
            stats,
        })
    }

    /// Plans targeting the caller's department with the caller's progress.
    pub async fn my_plans(
        &self,
        current: &CurrentUser,
        now: DateTime<Utc>,
    ) -> Result<Vec<MyPlanDto>, AppError> {
        let Some(department_id) = current.user.department_id else {
            return Ok(Vec::new());
        };

        let plans = PlanRepository::new(self.db)
            .list_for_department(department_id)
            .await?;
        let result_repo = ResultRepository::new(self.db);

        let mut my_plans = Vec::with_capacity(plans.len());
        for plan in plans {
            let results = result_repo.list_for_user(plan.plan.id, current.id()).await?;
            let summary = AttemptSummary::from_results(&results);
            my_plans.push(MyPlanDto {
                remaining_attempts: summary.remaining(plan.plan.max_attempts),
                attempts: summary.attempts,
                best_score: summary.best_score,
                passed: summary.passed,
                plan: plan.into_dto(now),
            });
        }

        Ok(my_plans)
    }

    /// Starts a new attempt for the caller.
    pub async fn start_attempt(
        &self,
        current: &CurrentUser,
        plan_id: i32,
        now: DateTime<Utc>,
    ) -> Result<AssessmentResultDto, AppError> {
        let plan = self.plan(plan_id).await?;
        if plan.status(now) != PlanStatus::Ongoing {
            return Err(AppError::bad_request("The assessment is not open"));
        }

        let targeted = current
            .user
            .department_id
            .is_some_and(|id| plan.department_ids.contains(&id));
        if !targeted {
            return Err(AuthError::AccessDenied(
                current.id(),
                format!("assessment plan {} does not target the user", plan_id),
            )
            .into());
        }

        let txn = self.db.begin().await?;
        let repo = ResultRepository::new(&txn);
        let attempts = repo.list_for_user(plan_id, current.id()).await?;
        if attempts.len() as i64 >= i64::from(plan.plan.max_attempts) {
            return Err(AppError::bad_request("No attempts remaining"));
        }

        let attempt_no = attempts.len() as i32 + 1;
        let result = match repo.create(plan_id, current.id(), attempt_no).await {
            Ok(result) => result,
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                return Err(AppError::bad_request(
                    "Another attempt was started at the same time",
                ));
            }
            Err(e) => return Err(e.into()),
        };
        txn.commit().await?;

        Ok(result_into_dto(result))
    }

    /// Submits one of the caller's in-progress attempts.
    pub async fn submit_attempt(
        &self,
        current: &CurrentUser,
        result_id: i32,
    ) -> Result<AssessmentResultDto, AppError> {
        let repo = ResultRepository::new(self.db);
        let result = repo
            .find_by_id(result_id)
            .await?
            .filter(|r| r.user_id == current.id())
            .ok_or_else(|| AppError::not_found("Assessment result not found"))?;
        if result.status != ResultStatus::InProgress.as_str() {
            return Err(AppError::bad_request("The attempt has already been submitted"));
        }

        Ok(result_into_dto(repo.submit(result).await?))
    }

    /// Grades an attempt; passed when the score reaches the exam's pass score.
    pub async fn grade_attempt(
        &self,
        current: &CurrentUser,
        result_id: i32,
        score: f64,
    ) -> Result<AssessmentResultDto, AppError> {
        let repo = ResultRepository::new(self.db);
        let result = repo
            .find_by_id(result_id)
            .await?
            .ok_or_else(|| AppError::not_found("Assessment result not found"))?;
        if result.status == ResultStatus::InProgress.as_str() {
            return Err(AppError::bad_request("The attempt has not been submitted"));
        }

        let plan = PlanRepository::new(self.db)
            .find_by_id(result.plan_id)
            .await?
            .ok_or_else(|| AppError::not_found("Assessment plan not found"))?;
        let exam = self.exam(plan.plan.exam_id).await?;

        if !score.is_finite() || score < 0.0 || score > exam.total_score {
            return Err(AppError::bad_request(format!(
                "score must be between 0 and {}",
                exam.total_score
            )));
        }
        let passed = score >= exam.pass_score;

        Ok(result_into_dto(
            repo.grade(result, score, passed, current.id()).await?,
        ))
    }

    async fn exam(&self, id: i32) -> Result<entity::exam::Model, AppError> {
        ExamRepository::new(self.db)
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Exam not found"))
    }

    async fn published_exam(&self, id: i32) -> Result<entity::exam::Model, AppError> {
        let exam = ExamRepository::new(self.db)
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::bad_request("Exam does not exist"))?;
        if exam.status != ExamStatus::Published.as_str() {
            return Err(AppError::bad_request("Exam is not published"));
        }
        Ok(exam)
    }

    async fn plan(&self, id: i32) -> Result<Plan, AppError> {
        PlanRepository::new(self.db)
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Assessment plan not found"))
    }

    /// Deduplicates target departments and checks they are positive and exist.
    async fn target_departments(&self, ids: &[i32]) -> Result<Vec<i32>, AppError> {
        if ids.is_empty() {
            return Err(AppError::bad_request("department_ids must not be empty"));
        }
        if ids.iter().any(|id| *id <= 0) {
            return Err(AppError::bad_request("department_ids must be positive"));
        }

        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let existing = DepartmentRepository::new(self.db).existing_ids(&ids).await?;
        if existing.len() != ids.len() {
            return Err(AppError::bad_request("Unknown department id"));
        }
        Ok(ids)
    }
}

fn validate_exam(mut params: ExamParams) -> Result<ExamParams, AppError> {
    params.title = required_text("title", &params.title, TITLE_MAX_CHARS)?;
    params.description = optional_text("description", params.description, 2000)?;
    if params.duration_minutes <= 0 {
        return Err(AppError::bad_request("duration_minutes must be greater than 0"));
    }
    if !params.total_score.is_finite() || params.total_score <= 0.0 {
        return Err(AppError::bad_request("total_score must be greater than 0"));
    }
    if !params.pass_score.is_finite()
        || params.pass_score < 0.0
        || params.pass_score > params.total_score
    {
        return Err(AppError::bad_request(
            "pass_score must be between 0 and total_score",
        ));
    }
    Ok(params)
}

fn parse_exam_status(status: &str) -> Result<ExamStatus, AppError> {
    ExamStatus::parse(status)
        .ok_or_else(|| AppError::bad_request(format!("Unknown exam status {}", status)))
}

fn validate_window(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), AppError> {
    if start >= end {
        return Err(AppError::bad_request("start_time must be before end_time"));
    }
    Ok(())
}

fn validate_max_attempts(max_attempts: i32) -> Result<(), AppError> {
    if max_attempts < 1 {
        return Err(AppError::bad_request("max_attempts must be at least 1"));
    }
    Ok(())
}
