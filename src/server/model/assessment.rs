//! Exams, assessment plans and attempts.
//!
//! A plan's status is never stored; it follows from its window and the current time.

use chrono::{DateTime, Utc};

use crate::model::assessment::{
    AssessmentResultDto, ExamDto, ParticipantDto, ParticipantStatsDto, PlanDto,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamStatus {
    Draft,
    Published,
    Archived,
}

impl ExamStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Self::Draft),
            "published" => Some(Self::Published),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStatus {
    NotStarted,
    Ongoing,
    Ended,
}

impl PlanStatus {
    pub fn at(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if now < start {
            Self::NotStarted
        } else if now > end {
            Self::Ended
        } else {
            Self::Ongoing
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Ongoing => "ongoing",
            Self::Ended => "ended",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "not_started" => Some(Self::NotStarted),
            "ongoing" => Some(Self::Ongoing),
            "ended" => Some(Self::Ended),
            _ => None,
        }
    }
}

pub fn exam_into_dto(entity: entity::exam::Model) -> ExamDto {
    ExamDto {
        id: entity.id,
        title: entity.title,
        description: entity.description,
        duration_minutes: entity.duration_minutes,
        total_score: entity.total_score,
        pass_score: entity.pass_score,
        status: entity.status,
        created_by: entity.created_by,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    }
}

#[derive(Debug, Clone)]
pub struct ExamParams {
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub total_score: f64,
    pub pass_score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub plan: entity::assessment_plan::Model,
    pub exam_title: Option<String>,
    pub department_ids: Vec<i32>,
}

impl Plan {
    pub fn status(&self, now: DateTime<Utc>) -> PlanStatus {
        PlanStatus::at(self.plan.start_time, self.plan.end_time, now)
    }

    pub fn into_dto(self, now: DateTime<Utc>) -> PlanDto {
        let status = self.status(now);
        PlanDto {
            id: self.plan.id,
            title: self.plan.title,
            description: self.plan.description,
            exam_id: self.plan.exam_id,
            exam_title: self.exam_title,
            start_time: self.plan.start_time,
            end_time: self.plan.end_time,
            max_attempts: self.plan.max_attempts,
            department_ids: self.department_ids,
            status: status.as_str().to_string(),
            created_by: self.plan.created_by,
            created_at: self.plan.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreatePlanParams {
    pub title: String,
    pub description: Option<String>,
    pub exam_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_attempts: i32,
    pub department_ids: Vec<i32>,
    pub created_by: i32,
}

#[derive(Debug, Clone, Default)]
pub struct UpdatePlanParams {
    pub title: Option<String>,
    pub description: Option<String>,
    pub exam_id: Option<i32>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub max_attempts: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStatus {
    InProgress,
    Submitted,
    Graded,
}

impl ResultStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Submitted => "submitted",
            Self::Graded => "graded",
        }
    }
}

pub fn result_into_dto(entity: entity::assessment_result::Model) -> AssessmentResultDto {
    AssessmentResultDto {
        id: entity.id,
        plan_id: entity.plan_id,
        user_id: entity.user_id,
        attempt_no: entity.attempt_no,
        status: entity.status,
        score: entity.score,
        passed: entity.passed,
        started_at: entity.started_at,
        submitted_at: entity.submitted_at,
        graded_at: entity.graded_at,
    }
}

/// Per-user aggregate of attempts at one plan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttemptSummary {
    pub attempts: u64,
    pub best_score: Option<f64>,
    pub passed: bool,
}

impl AttemptSummary {
    pub fn from_results(results: &[entity::assessment_result::Model]) -> Self {
        let mut summary = Self {
            attempts: results.len() as u64,
            ..Default::default()
        };
        for result in results {
            if let Some(score) = result.score {
                summary.best_score = Some(summary.best_score.map_or(score, |b| b.max(score)));
            }
            if result.passed == Some(true) {
                summary.passed = true;
            }
        }
        summary
    }

    pub fn remaining(&self, max_attempts: i32) -> u64 {
        (max_attempts.max(0) as u64).saturating_sub(self.attempts)
    }

    /// A participant has completed the plan once an attempt has been graded.
    pub fn completed(&self) -> bool {
        self.best_score.is_some()
    }
}

/// Aggregates over participants. Only participants with a graded attempt count as
/// completed; the pass rate is relative to them.
pub fn participant_stats(participants: &[ParticipantDto]) -> ParticipantStatsDto {
    let completed: Vec<&ParticipantDto> = participants
        .iter()
        .filter(|p| p.best_score.is_some())
        .collect();
    let passed = completed.iter().filter(|p| p.passed).count() as u64;
    let completed_count = completed.len() as u64;

    let average_score = if completed.is_empty() {
        None
    } else {
        let sum: f64 = completed.iter().filter_map(|p| p.best_score).sum();
        Some((sum / completed_count as f64 * 100.0).round() / 100.0)
    };
    let pass_rate = if completed_count == 0 {
        0.0
    } else {
        (passed as f64 / completed_count as f64 * 1000.0).round() / 10.0
    };

    ParticipantStatsDto {
        total: participants.len() as u64,
        completed: completed_count,
        passed,
        failed: completed_count - passed,
        average_score,
        pass_rate,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn status_follows_window() {
        let now = Utc::now();
        let hour = Duration::hours(1);
        assert_eq!(PlanStatus::at(now + hour, now + hour * 2, now), PlanStatus::NotStarted);
        assert_eq!(PlanStatus::at(now - hour, now + hour, now), PlanStatus::Ongoing);
        assert_eq!(PlanStatus::at(now - hour * 2, now - hour, now), PlanStatus::Ended);
    }

    fn result(score: Option<f64>, passed: Option<bool>) -> entity::assessment_result::Model {
        entity::assessment_result::Model {
            id: 1,
            plan_id: 1,
            user_id: 1,
            attempt_no: 1,
            status: "graded".to_string(),
            score,
            passed,
            started_at: Utc::now(),
            submitted_at: None,
            graded_at: None,
            graded_by: None,
        }
    }

    #[test]
    fn summary_keeps_best_score() {
        let summary = AttemptSummary::from_results(&[
            result(Some(40.0), Some(false)),
            result(Some(75.0), Some(true)),
            result(None, None),
        ]);

        assert_eq!(summary.attempts, 3);
        assert_eq!(summary.best_score, Some(75.0));
        assert!(summary.passed);
        assert_eq!(summary.remaining(2), 0);
        assert_eq!(summary.remaining(5), 2);
    }

    fn participant(best_score: Option<f64>, passed: bool) -> ParticipantDto {
        ParticipantDto {
            user_id: 1,
            real_name: "Ann".to_string(),
            department_id: Some(1),
            attempts: u64::from(best_score.is_some()),
            best_score,
            remaining_attempts: 0,
            passed,
        }
    }

    #[test]
    fn stats_count_completed_participants_only() {
        let stats = participant_stats(&[
            participant(Some(90.0), true),
            participant(Some(50.0), false),
            participant(Some(70.0), true),
            participant(None, false),
        ]);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 3);
        assert_eq!(stats.passed, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.average_score, Some(70.0));
        assert_eq!(stats.pass_rate, 66.7);
    }

    #[test]
    fn stats_without_completions() {
        let stats = participant_stats(&[participant(None, false)]);

        assert_eq!(stats.average_score, None);
        assert_eq!(stats.pass_rate, 0.0);
    }
}
