//! Exams, assessment plans and attempts.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use tower_sessions::Session;

use crate::{
    model::{
        api::{ApiResponse, ErrorDto, MessageDto, PageDto, PaginationParams},
        assessment::{
            AssessmentResultDto, CreateExamDto, CreatePlanDto, ExamDto, ExamFilterDto,
            ExamStatusDto, GradeResultDto, MyPlanDto, ParticipantFilterDto, ParticipantsDto,
            PlanDto, PlanFilterDto, UpdateExamDto, UpdatePlanDto,
        },
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        service::assessment::AssessmentService,
        state::AppState,
    },
};

/// Tag for grouping assessment endpoints in OpenAPI documentation
pub static ASSESSMENT_TAG: &str = "assessment";

#[utoipa::path(
    get,
    path = "/api/exams",
    tag = ASSESSMENT_TAG,
    params(ExamFilterDto),
    responses(
        (status = 200, description = "Exams, newest first", body = ApiResponse<Vec<ExamDto>>),
        (status = 400, description = "Unknown status", body = ErrorDto)
    ),
)]
pub async fn list_exams(
    State(state): State<AppState>,
    session: Session,
    Query(filter): Query<ExamFilterDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let exams = AssessmentService::new(&state.db).list_exams(filter).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(exams))))
}

#[utoipa::path(
    get,
    path = "/api/exams/{id}",
    tag = ASSESSMENT_TAG,
    params(("id" = i32, Path, description = "Exam ID")),
    responses(
        (status = 200, description = "The exam", body = ApiResponse<ExamDto>),
        (status = 404, description = "Exam not found", body = ErrorDto)
    ),
)]
pub async fn get_exam(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let exam = AssessmentService::new(&state.db).get_exam(id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(exam))))
}

/// Create an exam in `draft` status.
#[utoipa::path(
    post,
    path = "/api/exams",
    tag = ASSESSMENT_TAG,
    request_body = CreateExamDto,
    responses(
        (status = 201, description = "Exam created", body = ApiResponse<ExamDto>),
        (status = 400, description = "Invalid exam", body = ErrorDto),
        (status = 403, description = "Missing assessment:manage", body = ErrorDto)
    ),
)]
pub async fn create_exam(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateExamDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::AssessmentManage])
        .await?;

    let exam = AssessmentService::new(&state.db)
        .create_exam(&current, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(exam))))
}

#[utoipa::path(
    put,
    path = "/api/exams/{id}",
    tag = ASSESSMENT_TAG,
    params(("id" = i32, Path, description = "Exam ID")),
    request_body = UpdateExamDto,
    responses(
        (status = 200, description = "Exam updated", body = ApiResponse<ExamDto>),
        (status = 400, description = "Invalid exam", body = ErrorDto),
        (status = 404, description = "Exam not found", body = ErrorDto)
    ),
)]
pub async fn update_exam(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateExamDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::AssessmentManage])
        .await?;

    let exam = AssessmentService::new(&state.db)
        .update_exam(id, payload)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(exam))))
}

/// Move an exam to `draft`, `published` or `archived`.
#[utoipa::path(
    put,
    path = "/api/exams/{id}/status",
    tag = ASSESSMENT_TAG,
    params(("id" = i32, Path, description = "Exam ID")),
    request_body = ExamStatusDto,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<ExamDto>),
        (status = 400, description = "Unknown status", body = ErrorDto),
        (status = 404, description = "Exam not found", body = ErrorDto)
    ),
)]
pub async fn set_exam_status(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<ExamStatusDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::AssessmentManage])
        .await?;

    let exam = AssessmentService::new(&state.db)
        .set_exam_status(id, &payload.status)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(exam))))
}

#[utoipa::path(
    delete,
    path = "/api/exams/{id}",
    tag = ASSESSMENT_TAG,
    params(("id" = i32, Path, description = "Exam ID")),
    responses(
        (status = 200, description = "Exam deleted", body = MessageDto),
        (status = 400, description = "Exam used by a plan", body = ErrorDto),
        (status = 404, description = "Exam not found", body = ErrorDto)
    ),
)]
pub async fn delete_exam(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::AssessmentManage])
        .await?;

    AssessmentService::new(&state.db).delete_exam(id).await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Exam deleted"))))
}

/// Create an assessment plan for a published exam.
///
/// Every active user of the target departments receives an `exam_notification`,
/// pushed once the plan is committed.
///
/// # Returns
/// - `201 Created` - The new plan
/// - `400 Bad Request` - Exam missing or unpublished, bad time window, bad departments
/// - `403 Forbidden` - Missing `assessment:manage`
#[utoipa::path(
    post,
    path = "/api/assessment-plans",
    tag = ASSESSMENT_TAG,
    request_body = CreatePlanDto,
    responses(
        (status = 201, description = "Plan created", body = ApiResponse<PlanDto>),
        (status = 400, description = "Invalid plan", body = ErrorDto),
        (status = 403, description = "Missing assessment:manage", body = ErrorDto)
    ),
)]
pub async fn create_plan(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreatePlanDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::AssessmentManage])
        .await?;

    let (plan, notifications) = AssessmentService::new(&state.db)
        .create_plan(&current, payload, Utc::now())
        .await?;
    state.push.notify(notifications);

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(plan))))
}

#[utoipa::path(
    get,
    path = "/api/assessment-plans",
    tag = ASSESSMENT_TAG,
    params(PlanFilterDto, PaginationParams),
    responses(
        (status = 200, description = "Page of plans", body = ApiResponse<PageDto<PlanDto>>),
        (status = 400, description = "Unknown status", body = ErrorDto)
    ),
)]
pub async fn list_plans(
    State(state): State<AppState>,
    session: Session,
    Query(filter): Query<PlanFilterDto>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let page = AssessmentService::new(&state.db)
        .list_plans(filter, pagination, Utc::now())
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(page))))
}

#[utoipa::path(
    get,
    path = "/api/assessment-plans/my",
    tag = ASSESSMENT_TAG,
    responses(
        (status = 200, description = "Plans targeting the caller's department", body = ApiResponse<Vec<MyPlanDto>>),
        (status = 401, description = "Not logged in", body = ErrorDto)
    ),
)]
pub async fn my_plans(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let plans = AssessmentService::new(&state.db)
        .my_plans(&current, Utc::now())
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(plans))))
}

#[utoipa::path(
    get,
    path = "/api/assessment-plans/{id}",
    tag = ASSESSMENT_TAG,
    params(("id" = i32, Path, description = "Plan ID")),
    responses(
        (status = 200, description = "The plan", body = ApiResponse<PlanDto>),
        (status = 404, description = "Plan not found", body = ErrorDto)
    ),
)]
pub async fn get_plan(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let plan = AssessmentService::new(&state.db)
        .get_plan(id, Utc::now())
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(plan))))
}

/// Update a plan that has not started yet.
#[utoipa::path(
    put,
    path = "/api/assessment-plans/{id}",
    tag = ASSESSMENT_TAG,
    params(("id" = i32, Path, description = "Plan ID")),
    request_body = UpdatePlanDto,
    responses(
        (status = 200, description = "Plan updated", body = ApiResponse<PlanDto>),
        (status = 400, description = "Plan already started or invalid data", body = ErrorDto),
        (status = 404, description = "Plan not found", body = ErrorDto)
    ),
)]
pub async fn update_plan(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePlanDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::AssessmentManage])
        .await?;

    let plan = AssessmentService::new(&state.db)
        .update_plan(id, payload, Utc::now())
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(plan))))
}

#[utoipa::path(
    delete,
    path = "/api/assessment-plans/{id}",
    tag = ASSESSMENT_TAG,
    params(("id" = i32, Path, description = "Plan ID")),
    responses(
        (status = 200, description = "Plan deleted", body = MessageDto),
        (status = 404, description = "Plan not found", body = ErrorDto)
    ),
)]
pub async fn delete_plan(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::AssessmentManage])
        .await?;

    AssessmentService::new(&state.db).delete_plan(id).await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Assessment plan deleted"))))
}

#[utoipa::path(
    get,
    path = "/api/assessment-plans/{id}/participants",
    tag = ASSESSMENT_TAG,
    params(("id" = i32, Path, description = "Plan ID"), ParticipantFilterDto),
    responses(
        (status = 200, description = "Participants and completion stats", body = ApiResponse<ParticipantsDto>),
        (status = 400, description = "Unknown filter", body = ErrorDto),
        (status = 404, description = "Plan not found", body = ErrorDto)
    ),
)]
pub async fn plan_participants(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Query(query): Query<ParticipantFilterDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::AssessmentManage])
        .await?;

    let participants = AssessmentService::new(&state.db)
        .participants(id, query.filter.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(participants))))
}

/// Start a new attempt at an ongoing plan targeting the caller's department.
#[utoipa::path(
    post,
    path = "/api/assessment-plans/{id}/start",
    tag = ASSESSMENT_TAG,
    params(("id" = i32, Path, description = "Plan ID")),
    responses(
        (status = 201, description = "Attempt started", body = ApiResponse<AssessmentResultDto>),
        (status = 400, description = "Plan not open or no attempts remaining", body = ErrorDto),
        (status = 403, description = "Plan does not target the caller", body = ErrorDto),
        (status = 404, description = "Plan not found", body = ErrorDto)
    ),
)]
pub async fn start_attempt(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let result = AssessmentService::new(&state.db)
        .start_attempt(&current, id, Utc::now())
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(result))))
}

#[utoipa::path(
    post,
    path = "/api/assessment-results/{id}/submit",
    tag = ASSESSMENT_TAG,
    params(("id" = i32, Path, description = "Result ID")),
    responses(
        (status = 200, description = "Attempt submitted", body = ApiResponse<AssessmentResultDto>),
        (status = 400, description = "Attempt already submitted", body = ErrorDto),
        (status = 404, description = "Result not found", body = ErrorDto)
    ),
)]
pub async fn submit_attempt(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let result = AssessmentService::new(&state.db)
        .submit_attempt(&current, id)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(result))))
}

/// Grade a submitted attempt; it passes when the score reaches the exam's pass score.
#[utoipa::path(
    put,
    path = "/api/assessment-results/{id}/grade",
    tag = ASSESSMENT_TAG,
    params(("id" = i32, Path, description = "Result ID")),
    request_body = GradeResultDto,
    responses(
        (status = 200, description = "Attempt graded", body = ApiResponse<AssessmentResultDto>),
        (status = 400, description = "Score out of range or attempt not submitted", body = ErrorDto),
        (status = 403, description = "Missing assessment:manage", body = ErrorDto),
        (status = 404, description = "Result not found", body = ErrorDto)
    ),
)]
pub async fn grade_attempt(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<GradeResultDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::AssessmentManage])
        .await?;

    let result = AssessmentService::new(&state.db)
        .grade_attempt(&current, id, payload.score)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(result))))
}
