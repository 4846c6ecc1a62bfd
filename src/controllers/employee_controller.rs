use sqlx::PgPool;
use validator::Validate;

use crate::dto::common_dto::MessageResponse;
use crate::dto::employee_dto::EmployeeRequest;
use crate::models::employee::{Employee, EmployeeStatus};
use crate::repositories::employee_repository::EmployeeRepository;
use crate::utils::errors::{not_found_error, AppError};

pub struct EmployeeController {
    repository: EmployeeRepository,
}

impl EmployeeController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: EmployeeRepository::new(pool),
        }
    }

    pub async fn list(&self, status: Option<EmployeeStatus>) -> Result<Vec<Employee>, AppError> {
        self.repository.find_all(status).await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Employee, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Empleado", id))
    }

    pub async fn create(&self, mut request: EmployeeRequest) -> Result<Employee, AppError> {
        request.name = request.name.trim().to_string();
        request.validate()?;

        let employee = self.repository.create(&request).await?;

        tracing::info!("👷 Empleado creado: {} (id {})", employee.name, employee.id);
        Ok(employee)
    }

    pub async fn update(&self, id: i32, mut request: EmployeeRequest) -> Result<Employee, AppError> {
        request.name = request.name.trim().to_string();
        request.validate()?;

        self.repository
            .update(id, &request)
            .await?
            .ok_or_else(|| not_found_error("Empleado", id))
    }

    pub async fn delete(&self, id: i32) -> Result<MessageResponse, AppError> {
        let employee = self.get_by_id(id).await?;

        let references = self.repository.count_references(id).await?;
        if references.is_referenced() {
            return Err(AppError::InUse(format!(
                "No se puede eliminar a '{}': tiene {} viajes, {} adelantos y {} nóminas registradas",
                employee.name, references.trips, references.advances, references.salary_summaries
            )));
        }

        if !self.repository.delete(id).await? {
            return Err(not_found_error("Empleado", id));
        }

        tracing::info!("🗑️ Empleado eliminado: {} (id {})", employee.name, id);
        Ok(MessageResponse::new("Empleado eliminado exitosamente"))
    }
}
