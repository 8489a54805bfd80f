use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20251001_000001_create_department_table::Department,
    m20251001_000002_create_user_table::User,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Exam::Table)
                    .if_not_exists()
                    .col(pk_auto(Exam::Id))
                    .col(string_len(Exam::Title, 200))
                    .col(text_null(Exam::Description))
                    .col(integer(Exam::DurationMinutes))
                    .col(double(Exam::TotalScore))
                    .col(double(Exam::PassScore))
                    .col(string(Exam::Status).default("draft"))
                    .col(integer_null(Exam::CreatedBy))
                    .col(
                        timestamp_with_time_zone(Exam::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(Exam::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AssessmentPlan::Table)
                    .if_not_exists()
                    .col(pk_auto(AssessmentPlan::Id))
                    .col(string_len(AssessmentPlan::Title, 200))
                    .col(text_null(AssessmentPlan::Description))
                    .col(integer(AssessmentPlan::ExamId))
                    .col(timestamp_with_time_zone(AssessmentPlan::StartTime))
                    .col(timestamp_with_time_zone(AssessmentPlan::EndTime))
                    .col(integer(AssessmentPlan::MaxAttempts).default(1))
                    .col(integer_null(AssessmentPlan::CreatedBy))
                    .col(boolean(AssessmentPlan::IsDeleted).default(false))
                    .col(
                        timestamp_with_time_zone(AssessmentPlan::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(AssessmentPlan::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assessment_plan_exam_id")
                            .from(AssessmentPlan::Table, AssessmentPlan::ExamId)
                            .to(Exam::Table, Exam::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AssessmentPlanDepartment::Table)
                    .if_not_exists()
                    .col(integer(AssessmentPlanDepartment::PlanId))
                    .col(integer(AssessmentPlanDepartment::DepartmentId))
                    .primary_key(
                        Index::create()
                            .col(AssessmentPlanDepartment::PlanId)
                            .col(AssessmentPlanDepartment::DepartmentId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assessment_plan_department_plan_id")
                            .from(
                                AssessmentPlanDepartment::Table,
                                AssessmentPlanDepartment::PlanId,
                            )
                            .to(AssessmentPlan::Table, AssessmentPlan::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assessment_plan_department_department_id")
                            .from(
                                AssessmentPlanDepartment::Table,
                                AssessmentPlanDepartment::DepartmentId,
                            )
                            .to(Department::Table, Department::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AssessmentResult::Table)
                    .if_not_exists()
                    .col(pk_auto(AssessmentResult::Id))
                    .col(integer(AssessmentResult::PlanId))
                    .col(integer(AssessmentResult::UserId))
                    .col(integer(AssessmentResult::AttemptNo))
                    .col(string(AssessmentResult::Status).default("in_progress"))
                    .col(double_null(AssessmentResult::Score))
                    .col(boolean_null(AssessmentResult::Passed))
                    .col(
                        timestamp_with_time_zone(AssessmentResult::StartedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(timestamp_with_time_zone_null(AssessmentResult::SubmittedAt))
                    .col(timestamp_with_time_zone_null(AssessmentResult::GradedAt))
                    .col(integer_null(AssessmentResult::GradedBy))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assessment_result_plan_id")
                            .from(AssessmentResult::Table, AssessmentResult::PlanId)
                            .to(AssessmentPlan::Table, AssessmentPlan::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assessment_result_user_id")
                            .from(AssessmentResult::Table, AssessmentResult::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AssessmentResult::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AssessmentPlanDepartment::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AssessmentPlan::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Exam::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Exam {
    Table,
    Id,
    Title,
    Description,
    DurationMinutes,
    TotalScore,
    PassScore,
    Status,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum AssessmentPlan {
    Table,
    Id,
    Title,
    Description,
    ExamId,
    StartTime,
    EndTime,
    MaxAttempts,
    CreatedBy,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum AssessmentPlanDepartment {
    Table,
    PlanId,
    DepartmentId,
}

#[derive(DeriveIden)]
pub enum AssessmentResult {
    Table,
    Id,
    PlanId,
    UserId,
    AttemptNo,
    Status,
    Score,
    Passed,
    StartedAt,
    SubmittedAt,
    GradedAt,
    GradedBy,
}
