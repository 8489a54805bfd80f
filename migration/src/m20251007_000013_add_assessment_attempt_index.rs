use sea_orm_migration::prelude::*;

use super::m20251004_000008_create_assessment_tables::AssessmentResult;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_assessment_result_attempt")
                    .table(AssessmentResult::Table)
                    .col(AssessmentResult::PlanId)
                    .col(AssessmentResult::UserId)
                    .col(AssessmentResult::AttemptNo)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_assessment_result_attempt")
                    .table(AssessmentResult::Table)
                    .to_owned(),
            )
            .await
    }
}
