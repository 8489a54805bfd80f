//! Vacation types, statutory holiday entries and overtime conversion rules.

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::vacation::{
        ConversionRuleDto, CreateConversionRuleDto, CreateHolidayDto, CreateVacationTypeDto,
        HolidayDto, HolidayMonthSummaryDto, UpdateConversionRuleDto, UpdateHolidayDto,
        UpdateVacationTypeDto, VacationTypeDto,
    },
    server::{
        data::vacation::{ConversionRuleRepository, HolidayRepository, VacationTypeRepository},
        error::AppError,
        model::vacation::{
            conversion_rule_into_dto, holiday_into_dto, vacation_type_into_dto,
            CreateConversionRuleParams, CreateVacationTypeParams, HolidayParams,
            UpdateConversionRuleParams, UpdateHolidayParams, UpdateVacationTypeParams,
        },
        util::validate::{optional_text, required_text},
    },
};

const HOLIDAY_NAME_MAX_CHARS: usize = 20;
const OVERTIME_SOURCE: &str = "overtime";

pub struct VacationService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> VacationService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_types(&self) -> Result<Vec<VacationTypeDto>, AppError> {
        let types = VacationTypeRepository::new(self.db).list(false).await?;
        Ok(types.into_iter().map(vacation_type_into_dto).collect())
    }

    pub async fn create_type(&self, dto: CreateVacationTypeDto) -> Result<VacationTypeDto, AppError> {
        let mut params = CreateVacationTypeParams::from_dto(dto);
        params.code = required_text("code", &params.code, 50)?;
        params.name = required_text("name", &params.name, 50)?;
        params.description = optional_text("description", params.description, 200)?;

        let repo = VacationTypeRepository::new(self.db);
        if repo.find_by_code(&params.code).await?.is_some() {
            return Err(AppError::bad_request("Vacation type code already exists"));
        }

        let sort_order = match params.sort_order {
            Some(sort_order) => sort_order,
            None => repo.max_sort_order().await?.unwrap_or(0) + 1,
        };

        Ok(vacation_type_into_dto(repo.create(params, sort_order).await?))
    }

    pub async fn update_type(
        &self,
        id: i32,
        dto: UpdateVacationTypeDto,
    ) -> Result<VacationTypeDto, AppError> {
        let repo = VacationTypeRepository::new(self.db);
        let vacation_type = repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Vacation type not found"))?;

        let mut params = UpdateVacationTypeParams::from_dto(dto);
        if let Some(code) = &params.code {
            let code = required_text("code", code, 50)?;
            if let Some(existing) = repo.find_by_code(&code).await? {
                if existing.id != id {
                    return Err(AppError::bad_request("Vacation type code already exists"));
                }
            }
            params.code = Some(code);
        }
        if let Some(name) = &params.name {
            params.name = Some(required_text("name", name, 50)?);
        }

        Ok(vacation_type_into_dto(repo.update(vacation_type, params).await?))
    }

    /// Deletes a vacation type no holiday, balance or leave record uses.
    pub async fn delete_type(&self, id: i32) -> Result<(), AppError> {
        let repo = VacationTypeRepository::new(self.db);
        if repo.find_by_id(id).await?.is_none() {
            return Err(AppError::not_found("Vacation type not found"));
        }
        if repo.count_references(id).await? > 0 {
            return Err(AppError::bad_request(
                "Vacation type is in use and cannot be deleted",
            ));
        }

        repo.delete(id).await?;
        Ok(())
    }

    pub async fn list_holidays(&self, year: i32) -> Result<Vec<HolidayDto>, AppError> {
        let holidays = HolidayRepository::new(self.db).list_by_year(year).await?;
        Ok(holidays
            .into_iter()
            .map(|(holiday, vacation_type)| holiday_into_dto(holiday, vacation_type))
            .collect())
    }

    /// Twelve rows, one per month, including months without entries.
    pub async fn holiday_summary(&self, year: i32) -> Result<Vec<HolidayMonthSummaryDto>, AppError> {
        let totals = HolidayRepository::new(self.db).monthly_totals(year).await?;

        Ok((1..=12)
            .map(|month| {
                let (total_days, count) = totals
                    .iter()
                    .find(|(m, _, _)| *m == month)
                    .map(|(_, days, count)| (days.unwrap_or(0), *count as u64))
                    .unwrap_or((0, 0));
                HolidayMonthSummaryDto {
                    month,
                    total_days,
                    count,
                }
            })
            .collect())
    }

    pub async fn create_holiday(&self, dto: CreateHolidayDto) -> Result<HolidayDto, AppError> {
        let mut params = HolidayParams::from_dto(dto);
        params.name = required_text("name", &params.name, HOLIDAY_NAME_MAX_CHARS)?;
        validate_days(params.days)?;
        validate_month(params.month)?;

        let vacation_type = VacationTypeRepository::new(self.db)
            .find_by_id(params.vacation_type_id)
            .await?
            .ok_or_else(|| AppError::bad_request("Vacation type does not exist"))?;

        let holiday = HolidayRepository::new(self.db).create(params).await?;
        Ok(holiday_into_dto(holiday, Some(vacation_type)))
    }

    pub async fn update_holiday(&self, id: i32, dto: UpdateHolidayDto) -> Result<HolidayDto, AppError> {
        let repo = HolidayRepository::new(self.db);
        let holiday = repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Holiday not found"))?;

        let mut params = UpdateHolidayParams::from_dto(dto);
        if params.is_empty() {
            return Err(AppError::bad_request("No fields to update"));
        }
        if let Some(name) = &params.name {
            params.name = Some(required_text("name", name, HOLIDAY_NAME_MAX_CHARS)?);
        }
        if let Some(days) = params.days {
            validate_days(days)?;
        }
        if let Some(month) = params.month {
            validate_month(month)?;
        }

        let type_repo = VacationTypeRepository::new(self.db);
        let type_id = params.vacation_type_id.unwrap_or(holiday.vacation_type_id);
        let vacation_type = type_repo.find_by_id(type_id).await?;
        if params.vacation_type_id.is_some() && vacation_type.is_none() {
            return Err(AppError::bad_request("Vacation type does not exist"));
        }

        let holiday = repo.update(holiday, params).await?;
        Ok(holiday_into_dto(holiday, vacation_type))
    }

    pub async fn delete_holiday(&self, id: i32) -> Result<(), AppError> {
        if HolidayRepository::new(self.db).delete(id).await? == 0 {
            return Err(AppError::not_found("Holiday not found"));
        }
        Ok(())
    }

    pub async fn list_rules(&self, enabled: Option<bool>) -> Result<Vec<ConversionRuleDto>, AppError> {
        let rules = ConversionRuleRepository::new(self.db).list(enabled).await?;
        Ok(rules.into_iter().map(conversion_rule_into_dto).collect())
    }

    pub async fn get_rule(&self, id: i32) -> Result<ConversionRuleDto, AppError> {
        ConversionRuleRepository::new(self.db)
            .find_by_id(id)
            .await?
            .map(conversion_rule_into_dto)
            .ok_or_else(|| AppError::not_found("Conversion rule not found"))
    }

    /// Creates a rule. An enabled rule disables every other rule in the same transaction.
    pub async fn create_rule(&self, dto: CreateConversionRuleDto) -> Result<ConversionRuleDto, AppError> {
        let mut params = CreateConversionRuleParams::from_dto(dto);
        params.name = required_text("name", &params.name, 100)?;
        if params.source_type != OVERTIME_SOURCE {
            return Err(AppError::bad_request("source_type must be overtime"));
        }
        validate_ratio(params.ratio)?;
        self.require_type_code(&params.target_type).await?;

        let txn = self.db.begin().await?;
        let repo = ConversionRuleRepository::new(&txn);
        let rule = repo.create(params).await?;
        if rule.enabled {
            repo.disable_others(rule.id).await?;
        }
        txn.commit().await?;

        Ok(conversion_rule_into_dto(rule))
    }

    pub async fn update_rule(
        &self,
        id: i32,
        dto: UpdateConversionRuleDto,
    ) -> Result<ConversionRuleDto, AppError> {
        let mut params = UpdateConversionRuleParams::from_dto(dto);
        if let Some(name) = &params.name {
            params.name = Some(required_text("name", name, 100)?);
        }
        if let Some(ratio) = params.ratio {
            validate_ratio(ratio)?;
        }
        if let Some(target_type) = &params.target_type {
            self.require_type_code(target_type).await?;
        }

        let txn = self.db.begin().await?;
        let repo = ConversionRuleRepository::new(&txn);
        let rule = repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Conversion rule not found"))?;
        let rule = repo.update(rule, params).await?;
        if rule.enabled {
            repo.disable_others(rule.id).await?;
        }
        txn.commit().await?;

        Ok(conversion_rule_into_dto(rule))
    }

    pub async fn delete_rule(&self, id: i32) -> Result<(), AppError> {
        if ConversionRuleRepository::new(self.db).delete(id).await? == 0 {
            return Err(AppError::not_found("Conversion rule not found"));
        }
        Ok(())
    }

    async fn require_type_code(&self, code: &str) -> Result<(), AppError> {
        if VacationTypeRepository::new(self.db)
            .find_by_code(code)
            .await?
            .is_none()
        {
            return Err(AppError::bad_request(format!(
                "Vacation type code {} does not exist",
                code
            )));
        }
        Ok(())
    }
}

fn validate_days(days: i32) -> Result<(), AppError> {
    if !(1..=31).contains(&days) {
        return Err(AppError::bad_request("days must be between 1 and 31"));
    }
    Ok(())
}

fn validate_month(month: i32) -> Result<(), AppError> {
    if !(1..=12).contains(&month) {
        return Err(AppError::bad_request("month must be between 1 and 12"));
    }
    Ok(())
}

fn validate_ratio(ratio: f64) -> Result<(), AppError> {
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(AppError::bad_request("ratio must be greater than 0"));
    }
    Ok(())
}
