//! Exam and assessment plan factories.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test exams.
pub struct ExamFactory<'a> {
    db: &'a DatabaseConnection,
    title: String,
    status: String,
    total_score: f64,
    pass_score: f64,
}

impl<'a> ExamFactory<'a> {
    /// Creates a new ExamFactory with default values.
    ///
    /// Defaults:
    /// - title: `"Exam {id}"`
    /// - status: `"published"`
    /// - total_score: `100.0`, pass_score: `60.0`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            title: format!("Exam {}", next_id()),
            status: "published".to_string(),
            total_score: 100.0,
            pass_score: 60.0,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the exam status (`draft`, `published` or `archived`).
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn scores(mut self, total_score: f64, pass_score: f64) -> Self {
        self.total_score = total_score;
        self.pass_score = pass_score;
        self
    }

    pub async fn build(self) -> Result<entity::exam::Model, DbErr> {
        let now = Utc::now();
        entity::exam::ActiveModel {
            title: ActiveValue::Set(self.title),
            description: ActiveValue::Set(None),
            duration_minutes: ActiveValue::Set(60),
            total_score: ActiveValue::Set(self.total_score),
            pass_score: ActiveValue::Set(self.pass_score),
            status: ActiveValue::Set(self.status),
            created_by: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a published exam scored out of 100 with a pass mark of 60.
pub async fn create_exam(db: &DatabaseConnection) -> Result<entity::exam::Model, DbErr> {
    ExamFactory::new(db).build().await
}

/// Factory for creating test assessment plans.
pub struct AssessmentPlanFactory<'a> {
    db: &'a DatabaseConnection,
    exam_id: i32,
    title: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    max_attempts: i32,
    departments: Vec<i32>,
}

impl<'a> AssessmentPlanFactory<'a> {
    /// Creates a new AssessmentPlanFactory for the exam.
    ///
    /// Defaults:
    /// - title: `"Plan {id}"`
    /// - ongoing: started an hour ago, ends in a day
    /// - max_attempts: `1`
    /// - no target departments
    pub fn new(db: &'a DatabaseConnection, exam_id: i32) -> Self {
        let now = Utc::now();
        Self {
            db,
            exam_id,
            title: format!("Plan {}", next_id()),
            start_time: now - Duration::hours(1),
            end_time: now + Duration::days(1),
            max_attempts: 1,
            departments: Vec::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn window(mut self, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        self.start_time = start_time;
        self.end_time = end_time;
        self
    }

    pub fn max_attempts(mut self, max_attempts: i32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn departments(mut self, department_ids: &[i32]) -> Self {
        self.departments = department_ids.to_vec();
        self
    }

    /// Builds the plan and its target department links.
    pub async fn build(self) -> Result<entity::assessment_plan::Model, DbErr> {
        let now = Utc::now();
        let plan = entity::assessment_plan::ActiveModel {
            title: ActiveValue::Set(self.title),
            description: ActiveValue::Set(None),
            exam_id: ActiveValue::Set(self.exam_id),
            start_time: ActiveValue::Set(self.start_time),
            end_time: ActiveValue::Set(self.end_time),
            max_attempts: ActiveValue::Set(self.max_attempts),
            created_by: ActiveValue::Set(None),
            is_deleted: ActiveValue::Set(false),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        for department_id in self.departments {
            entity::assessment_plan_department::ActiveModel {
                plan_id: ActiveValue::Set(plan.id),
                department_id: ActiveValue::Set(department_id),
            }
            .insert(self.db)
            .await?;
        }

        Ok(plan)
    }
}

/// Creates an ongoing single-attempt plan targeting the given departments.
pub async fn create_plan(
    db: &DatabaseConnection,
    exam_id: i32,
    department_ids: &[i32],
) -> Result<entity::assessment_plan::Model, DbErr> {
    AssessmentPlanFactory::new(db, exam_id)
        .departments(department_ids)
        .build()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;
    use crate::factory::department::create_department;

    #[tokio::test]
    async fn creates_ongoing_plan_for_exam() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_assessment_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let department = create_department(db).await?;
        let exam = create_exam(db).await?;
        let plan = create_plan(db, exam.id, &[department.id]).await?;

        let now = Utc::now();
        assert_eq!(plan.exam_id, exam.id);
        assert!(plan.start_time < now && now < plan.end_time);
        assert_eq!(plan.max_attempts, 1);
        assert!(!plan.is_deleted);

        Ok(())
    }
}
