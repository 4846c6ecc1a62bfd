//! Repositorio de empleados

use sqlx::PgPool;
use std::collections::HashMap;

use crate::dto::employee_dto::EmployeeRequest;
use crate::models::employee::{Employee, EmployeeReferences, EmployeeStatus};
use crate::utils::errors::{foreign_key_violation_as, AppError};

pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Listado por nombre, opcionalmente filtrado por estado
    pub async fn find_all(&self, status: Option<EmployeeStatus>) -> Result<Vec<Employee>, AppError> {
        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT * FROM employees
            WHERE ($1::employee_status IS NULL OR status = $1)
            ORDER BY name ASC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(employee)
    }

    pub async fn find_by_ids(&self, ids: &[i32]) -> Result<HashMap<i32, Employee>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let employees = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(employees.into_iter().map(|e| (e.id, e)).collect())
    }

    pub async fn create(&self, request: &EmployeeRequest) -> Result<Employee, AppError> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (name, truck_license, base_salary, rate_per_trip, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(&request.truck_license)
        .bind(request.base_salary)
        .bind(request.rate_per_trip)
        .bind(request.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(employee)
    }

    pub async fn update(&self, id: i32, request: &EmployeeRequest) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees
            SET name = $2, truck_license = $3, base_salary = $4, rate_per_trip = $5,
                status = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(&request.truck_license)
        .bind(request.base_salary)
        .bind(request.rate_per_trip)
        .bind(request.status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    pub async fn count_references(&self, id: i32) -> Result<EmployeeReferences, AppError> {
        let references = sqlx::query_as::<_, EmployeeReferences>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM trips WHERE employee_id = $1) AS trips,
                (SELECT COUNT(*) FROM advances WHERE employee_id = $1) AS advances,
                (SELECT COUNT(*) FROM salary_summaries WHERE employee_id = $1) AS salary_summaries
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(references)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                foreign_key_violation_as(e, || {
                    AppError::InUse("No se puede eliminar: el empleado tiene viajes, adelantos o nóminas registradas".to_string())
                })
            })?;

        Ok(result.rows_affected() > 0)
    }
}
