//! Spreadsheet exports.
//!
//! Each export gathers rows through the same scoped queries as the JSON endpoints and
//! renders a single-sheet workbook held in memory.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use sea_orm::DatabaseConnection;

use crate::{
    model::{
        employee::EmployeeDto,
        export::{EmployeeExportQueryDto, ScheduleExportQueryDto},
        schedule::ScheduleQueryDto,
        vacation::EmployeeBalancesDto,
    },
    server::{
        data::employee::EmployeeRepository,
        error::AppError,
        middleware::auth::CurrentUser,
        model::employee::{Employee, EmployeeFilter},
        service::{
            balance::BalanceService,
            schedule::{validate_range, ScheduleService},
        },
        util::time::dates_between,
    },
};

/// Content type of an `.xlsx` workbook.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const BALANCE_HEADERS: [&str; 9] = [
    "Employee No",
    "Name",
    "Department",
    "Vacation Type",
    "Total",
    "Converted",
    "Adjusted",
    "Used",
    "Remaining",
];

const EMPLOYEE_HEADERS: [&str; 9] = [
    "Employee No",
    "Username",
    "Name",
    "Department",
    "Position",
    "Email",
    "Phone",
    "Hire Date",
    "Status",
];

pub struct ExportService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ExportService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// One row per employee, one column per date holding the shift name.
    pub async fn schedules(
        &self,
        current: &CurrentUser,
        query: ScheduleExportQueryDto,
    ) -> Result<Vec<u8>, AppError> {
        validate_range(query.start_date, query.end_date)?;

        let employees = self.employees(current, query.department_id, true).await?;
        let schedules = ScheduleService::new(self.db)
            .list(
                current,
                ScheduleQueryDto {
                    start_date: query.start_date,
                    end_date: query.end_date,
                    department_id: query.department_id,
                    employee_id: None,
                },
            )
            .await?;

        let shifts: HashMap<(i32, NaiveDate), String> = schedules
            .into_iter()
            .map(|s| {
                let name = s.shift_name.unwrap_or_default();
                ((s.employee_id, s.schedule_date), name)
            })
            .collect();
        let dates = dates_between(query.start_date, query.end_date);

        Ok(render_schedules(&employees, &dates, &shifts)?)
    }

    /// Every vacation balance of the active employees in scope for `year`.
    pub async fn vacation_balances(
        &self,
        current: &CurrentUser,
        department_id: Option<i32>,
        year: i32,
    ) -> Result<Vec<u8>, AppError> {
        let balances = BalanceService::new(self.db)
            .all_in_scope(current, department_id, year)
            .await?;

        Ok(render_balances(&balances)?)
    }

    pub async fn employees_roster(
        &self,
        current: &CurrentUser,
        query: EmployeeExportQueryDto,
    ) -> Result<Vec<u8>, AppError> {
        let employees = self.employees(current, query.department_id, false).await?;
        let rows: Vec<EmployeeDto> = employees.into_iter().map(Employee::into_dto).collect();

        Ok(render_employees(&rows)?)
    }

    async fn employees(
        &self,
        current: &CurrentUser,
        department_id: Option<i32>,
        active_only: bool,
    ) -> Result<Vec<Employee>, AppError> {
        let filter = EmployeeFilter {
            keyword: None,
            department_ids: current.scope.narrow(department_id),
            status: active_only.then(|| "active".to_string()),
        };
        Ok(EmployeeRepository::new(self.db).list(&filter).await?)
    }
}

/// File name offered to the browser, e.g. `schedules_2025-03-01_2025-03-31.xlsx`.
pub fn attachment_name(prefix: &str, suffix: &str) -> String {
    format!("{}_{}.xlsx", prefix, suffix)
}

fn write_header(sheet: &mut Worksheet, headers: &[&str]) -> Result<(), XlsxError> {
    let bold = Format::new().set_bold();
    for (col, header) in (0u16..).zip(headers) {
        sheet.write_string_with_format(0, col, *header, &bold)?;
    }
    sheet.set_freeze_panes(1, 0)?;
    Ok(())
}

fn render_schedules(
    employees: &[Employee],
    dates: &[NaiveDate],
    shifts: &HashMap<(i32, NaiveDate), String>,
) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Schedules")?;

    let date_headers: Vec<String> = dates.iter().map(|d| d.format("%m-%d").to_string()).collect();
    let mut headers = vec!["Employee No", "Name", "Department"];
    headers.extend(date_headers.iter().map(String::as_str));
    write_header(sheet, &headers)?;
    sheet.set_column_width(1, 14)?;
    sheet.set_column_width(2, 16)?;

    for (row, employee) in (1u32..).zip(employees) {
        sheet.write_string(row, 0, &employee.employee_no)?;
        sheet.write_string(row, 1, &employee.real_name)?;
        sheet.write_string(row, 2, employee.department_name.as_deref().unwrap_or(""))?;
        for (col, date) in (3u16..).zip(dates) {
            if let Some(name) = shifts.get(&(employee.id, *date)) {
                sheet.write_string(row, col, name)?;
            }
        }
    }

    workbook.save_to_buffer()
}

fn render_balances(rows: &[EmployeeBalancesDto]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Vacation Balances")?;
    write_header(sheet, &BALANCE_HEADERS)?;
    sheet.set_column_width(2, 16)?;
    sheet.set_column_width(3, 16)?;

    let balances = rows
        .iter()
        .flat_map(|employee| employee.balances.iter().map(move |b| (employee, b)));
    for (row, (employee, balance)) in (1u32..).zip(balances) {
        sheet.write_string(row, 0, &employee.employee_no)?;
        sheet.write_string(row, 1, &employee.real_name)?;
        sheet.write_string(row, 2, employee.department_name.as_deref().unwrap_or(""))?;
        sheet.write_string(row, 3, &balance.vacation_type_name)?;
        sheet.write_number(row, 4, balance.total_days)?;
        sheet.write_number(row, 5, balance.converted_days)?;
        sheet.write_number(row, 6, balance.adjusted_days)?;
        sheet.write_number(row, 7, balance.used_days)?;
        sheet.write_number(row, 8, balance.remaining_days)?;
    }

    workbook.save_to_buffer()
}

fn render_employees(rows: &[EmployeeDto]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Employees")?;
    write_header(sheet, &EMPLOYEE_HEADERS)?;
    sheet.set_column_width(5, 24)?;

    for (row, employee) in (1u32..).zip(rows) {
        let hire_date = employee
            .hire_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        sheet.write_string(row, 0, &employee.employee_no)?;
        sheet.write_string(row, 1, &employee.username)?;
        sheet.write_string(row, 2, &employee.real_name)?;
        sheet.write_string(row, 3, employee.department_name.as_deref().unwrap_or(""))?;
        sheet.write_string(row, 4, employee.position.as_deref().unwrap_or(""))?;
        sheet.write_string(row, 5, employee.email.as_deref().unwrap_or(""))?;
        sheet.write_string(row, 6, employee.phone.as_deref().unwrap_or(""))?;
        sheet.write_string(row, 7, hire_date)?;
        sheet.write_string(row, 8, &employee.status)?;
    }

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn employee(id: i32, no: &str) -> Employee {
        Employee {
            id,
            user_id: id,
            employee_no: no.to_string(),
            username: format!("user{}", id),
            real_name: format!("Employee {}", id),
            email: None,
            phone: None,
            department_id: Some(1),
            department_name: Some("Ops".to_string()),
            position: None,
            hire_date: None,
            status: "active".to_string(),
            created_at: Utc::now(),
        }
    }

    /// An xlsx file is a zip archive.
    fn is_zip(bytes: &[u8]) -> bool {
        bytes.starts_with(b"PK")
    }

    #[test]
    fn renders_schedule_grid() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let dates = dates_between(start, NaiveDate::from_ymd_opt(2025, 3, 7).unwrap());
        let mut shifts = HashMap::new();
        shifts.insert((1, start), "Morning".to_string());

        let bytes = render_schedules(&[employee(1, "E001"), employee(2, "E002")], &dates, &shifts)
            .unwrap();

        assert!(is_zip(&bytes));
    }

    #[test]
    fn renders_empty_roster() {
        let bytes = render_employees(&[]).unwrap();

        assert!(is_zip(&bytes));
    }

    #[test]
    fn names_attachment() {
        assert_eq!(
            attachment_name("vacation_balances", "2025"),
            "vacation_balances_2025.xlsx"
        );
    }
}
