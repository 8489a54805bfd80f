use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct ExamDto {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub total_score: f64,
    pub pass_score: f64,
    /// `draft`, `published` or `archived`.
    pub status: String,
    pub created_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct CreateExamDto {
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub total_score: f64,
    pub pass_score: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, ToSchema)]
pub struct UpdateExamDto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub total_score: Option<f64>,
    pub pass_score: Option<f64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct ExamStatusDto {
    pub status: String,
}

#[derive(Deserialize, IntoParams, Clone, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct ExamFilterDto {
    pub status: Option<String>,
    pub keyword: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct PlanDto {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub exam_id: i32,
    pub exam_title: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_attempts: i32,
    pub department_ids: Vec<i32>,
    /// `not_started`, `ongoing` or `ended`, computed from the current time.
    pub status: String,
    pub created_by: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct CreatePlanDto {
    pub title: String,
    pub description: Option<String>,
    pub exam_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_attempts: Option<i32>,
    pub department_ids: Vec<i32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, ToSchema)]
pub struct UpdatePlanDto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub exam_id: Option<i32>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub max_attempts: Option<i32>,
    pub department_ids: Option<Vec<i32>>,
}

#[derive(Deserialize, IntoParams, Clone, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct PlanFilterDto {
    pub keyword: Option<String>,
    pub status: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct ParticipantDto {
    pub user_id: i32,
    pub real_name: String,
    pub department_id: Option<i32>,
    pub attempts: u64,
    pub best_score: Option<f64>,
    pub remaining_attempts: u64,
    pub passed: bool,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct ParticipantStatsDto {
    pub total: u64,
    pub completed: u64,
    pub passed: u64,
    pub failed: u64,
    pub average_score: Option<f64>,
    /// Percent of completed participants that passed, one decimal.
    pub pass_rate: f64,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct ParticipantsDto {
    pub participants: Vec<ParticipantDto>,
    pub stats: ParticipantStatsDto,
}

#[derive(Deserialize, IntoParams, Clone, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct ParticipantFilterDto {
    /// `completed` or `incomplete`.
    pub filter: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct MyPlanDto {
    pub plan: PlanDto,
    pub attempts: u64,
    pub best_score: Option<f64>,
    pub remaining_attempts: u64,
    pub passed: bool,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct AssessmentResultDto {
    pub id: i32,
    pub plan_id: i32,
    pub user_id: i32,
    pub attempt_no: i32,
    /// `in_progress`, `submitted` or `graded`.
    pub status: String,
    pub score: Option<f64>,
    pub passed: Option<bool>,
    pub started_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub graded_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct GradeResultDto {
    pub score: f64,
}
