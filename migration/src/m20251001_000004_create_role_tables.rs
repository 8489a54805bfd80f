use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20251001_000001_create_department_table::Department,
    m20251001_000002_create_user_table::User,
};

/// Permission catalogue seeded on first migration: (code, name, module).
const PERMISSIONS: &[(&str, &str, &str)] = &[
    ("employee:view", "View employees", "employee"),
    ("employee:manage", "Manage employees", "employee"),
    ("department:manage", "Manage departments", "organization"),
    ("role:manage", "Manage roles and permissions", "organization"),
    ("vacation:manage", "Manage vacation types, holidays and balances", "vacation"),
    ("attendance:approve", "Approve leave and overtime", "attendance"),
    ("schedule:manage", "Manage shifts and schedules", "attendance"),
    ("assessment:manage", "Manage exams and assessment plans", "assessment"),
    ("broadcast:send", "Send broadcasts", "messaging"),
    ("memo:send", "Send department memos", "messaging"),
    ("export:data", "Export spreadsheets", "system"),
    ("system:manage", "System maintenance", "system"),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Role::Table)
                    .if_not_exists()
                    .col(pk_auto(Role::Id))
                    .col(string_uniq(Role::Name))
                    .col(text_null(Role::Description))
                    .col(boolean(Role::IsSuperAdmin).default(false))
                    .col(
                        timestamp_with_time_zone(Role::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Permission::Table)
                    .if_not_exists()
                    .col(pk_auto(Permission::Id))
                    .col(string_uniq(Permission::Code))
                    .col(string(Permission::Name))
                    .col(string(Permission::Module))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RolePermission::Table)
                    .if_not_exists()
                    .col(integer(RolePermission::RoleId))
                    .col(integer(RolePermission::PermissionId))
                    .primary_key(
                        Index::create()
                            .col(RolePermission::RoleId)
                            .col(RolePermission::PermissionId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_permission_role_id")
                            .from(RolePermission::Table, RolePermission::RoleId)
                            .to(Role::Table, Role::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_permission_permission_id")
                            .from(RolePermission::Table, RolePermission::PermissionId)
                            .to(Permission::Table, Permission::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserRole::Table)
                    .if_not_exists()
                    .col(integer(UserRole::UserId))
                    .col(integer(UserRole::RoleId))
                    .primary_key(Index::create().col(UserRole::UserId).col(UserRole::RoleId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_role_user_id")
                            .from(UserRole::Table, UserRole::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_role_role_id")
                            .from(UserRole::Table, UserRole::RoleId)
                            .to(Role::Table, Role::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RoleDepartment::Table)
                    .if_not_exists()
                    .col(integer(RoleDepartment::RoleId))
                    .col(integer(RoleDepartment::DepartmentId))
                    .primary_key(
                        Index::create()
                            .col(RoleDepartment::RoleId)
                            .col(RoleDepartment::DepartmentId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_department_role_id")
                            .from(RoleDepartment::Table, RoleDepartment::RoleId)
                            .to(Role::Table, Role::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_department_department_id")
                            .from(RoleDepartment::Table, RoleDepartment::DepartmentId)
                            .to(Department::Table, Department::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        let mut seed = Query::insert();
        seed.into_table(Permission::Table)
            .columns([Permission::Code, Permission::Name, Permission::Module]);
        for (code, name, module) in PERMISSIONS {
            seed.values([(*code).into(), (*name).into(), (*module).into()])
                .map_err(|e| DbErr::Custom(e.to_string()))?;
        }

        manager.exec_stmt(seed).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RoleDepartment::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserRole::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RolePermission::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Permission::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Role::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Role {
    Table,
    Id,
    Name,
    Description,
    IsSuperAdmin,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum Permission {
    Table,
    Id,
    Code,
    Name,
    Module,
}

#[derive(DeriveIden)]
pub enum RolePermission {
    Table,
    RoleId,
    PermissionId,
}

#[derive(DeriveIden)]
pub enum UserRole {
    Table,
    UserId,
    RoleId,
}

#[derive(DeriveIden)]
pub enum RoleDepartment {
    Table,
    RoleId,
    DepartmentId,
}
