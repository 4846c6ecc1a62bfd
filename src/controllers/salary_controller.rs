//! Controller de nómina
//!
//! El cálculo recorre los empleados activos, suma viajes y adelantos del mes
//! y guarda una fila por empleado en una sola transacción.

use sqlx::PgPool;
use std::collections::HashMap;
use validator::Validate;

use crate::dto::employee_dto::{MarkPaidRequest, SalaryCalculationRequest, SalarySummaryResponse};
use crate::models::employee::{Employee, EmployeeStatus};
use crate::models::salary::SalarySummary;
use crate::repositories::advance_repository::AdvanceRepository;
use crate::repositories::employee_repository::EmployeeRepository;
use crate::repositories::salary_repository::SalaryRepository;
use crate::repositories::trip_repository::TripRepository;
use crate::services::payroll::{compute_payroll, group_by_employee, month_range, PayrollBreakdown};
use crate::utils::errors::{not_found_error, AppError};

pub struct SalaryController {
    salaries: SalaryRepository,
    employees: EmployeeRepository,
    trips: TripRepository,
    advances: AdvanceRepository,
}

/// Embebe el empleado en cada nómina, conservando el orden
fn attach_employees(
    summaries: Vec<SalarySummary>,
    employees: &HashMap<i32, Employee>,
) -> Vec<SalarySummaryResponse> {
    summaries
        .into_iter()
        .filter_map(|summary| {
            let employee = employees.get(&summary.employee_id)?.clone();
            Some(SalarySummaryResponse { summary, employee })
        })
        .collect()
}

impl SalaryController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            salaries: SalaryRepository::new(pool.clone()),
            employees: EmployeeRepository::new(pool.clone()),
            trips: TripRepository::new(pool.clone()),
            advances: AdvanceRepository::new(pool),
        }
    }

    pub async fn calculate(
        &self,
        request: SalaryCalculationRequest,
    ) -> Result<Vec<SalarySummaryResponse>, AppError> {
        request.validate()?;

        let range = month_range(request.month, request.year)?;
        let employees = self.employees.find_all(Some(EmployeeStatus::Active)).await?;

        let trip_rates = group_by_employee(self.trips.rates_in_range(range).await?);
        let advance_amounts = group_by_employee(self.advances.amounts_in_range(range).await?);

        let rows: Vec<(i32, PayrollBreakdown)> = employees
            .iter()
            .map(|employee| {
                let rates = trip_rates.get(&employee.id).map(Vec::as_slice).unwrap_or(&[]);
                let amounts = advance_amounts
                    .get(&employee.id)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                (employee.id, compute_payroll(employee.base_salary, rates, amounts))
            })
            .collect();

        let summaries = self
            .salaries
            .upsert_month(request.month, request.year, &rows)
            .await?;

        tracing::info!(
            "💰 Nómina {}/{} calculada para {} empleados",
            request.month,
            request.year,
            summaries.len()
        );

        let by_id: HashMap<i32, Employee> = employees.into_iter().map(|e| (e.id, e)).collect();
        Ok(attach_employees(summaries, &by_id))
    }

    pub async fn list(
        &self,
        month: Option<i32>,
        year: Option<i32>,
        employee_id: Option<i32>,
    ) -> Result<Vec<SalarySummaryResponse>, AppError> {
        let summaries = self.salaries.find_filtered(month, year, employee_id).await?;

        let ids: Vec<i32> = summaries.iter().map(|s| s.employee_id).collect();
        let employees = self.employees.find_by_ids(&ids).await?;

        Ok(attach_employees(summaries, &employees))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<SalarySummaryResponse, AppError> {
        let summary = self
            .salaries
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Nómina", id))?;

        let employee = self
            .employees
            .find_by_id(summary.employee_id)
            .await?
            .ok_or_else(|| not_found_error("Empleado", summary.employee_id))?;

        Ok(SalarySummaryResponse { summary, employee })
    }

    pub async fn mark_paid(&self, request: MarkPaidRequest) -> Result<SalarySummaryResponse, AppError> {
        self.salaries
            .set_paid(request.id, request.is_paid)
            .await?
            .ok_or_else(|| not_found_error("Nómina", request.id))?;

        tracing::info!(
            "✅ Nómina {} marcada como {}",
            request.id,
            if request.is_paid { "pagada" } else { "impaga" }
        );
        self.get_by_id(request.id).await
    }
}
