//! Controller de viajes y adelantos
//!
//! Ambos registros pertenecen a un empleado existente y se listan con el
//! mismo filtro de período.

use sqlx::PgPool;
use validator::Validate;

use crate::dto::employee_dto::{AdvanceRequest, AdvanceResponse, TripRequest, TripResponse};
use crate::repositories::advance_repository::AdvanceRepository;
use crate::repositories::employee_repository::EmployeeRepository;
use crate::repositories::material_repository::MaterialRepository;
use crate::repositories::trip_repository::TripRepository;
use crate::services::payroll::DateRange;
use crate::utils::errors::{not_found_error, AppError};

pub struct TripController {
    trips: TripRepository,
    advances: AdvanceRepository,
    employees: EmployeeRepository,
    materials: MaterialRepository,
}

impl TripController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            trips: TripRepository::new(pool.clone()),
            advances: AdvanceRepository::new(pool.clone()),
            employees: EmployeeRepository::new(pool.clone()),
            materials: MaterialRepository::new(pool),
        }
    }

    pub async fn create_trip(&self, request: TripRequest) -> Result<TripResponse, AppError> {
        request.validate()?;

        let employee = self
            .employees
            .find_by_id(request.employee_id)
            .await?
            .ok_or_else(|| not_found_error("Empleado", request.employee_id))?;

        let material = match request.material_id {
            Some(material_id) => Some(
                self.materials
                    .find_by_id(material_id)
                    .await?
                    .ok_or_else(|| not_found_error("Material", material_id))?,
            ),
            None => None,
        };

        let trip = self.trips.create(&request).await?;

        tracing::info!("🚚 Viaje registrado para {} ({})", employee.name, trip.rate);
        Ok(TripResponse {
            trip,
            employee,
            material,
        })
    }

    pub async fn list_trips(
        &self,
        employee_id: Option<i32>,
        range: DateRange,
    ) -> Result<Vec<TripResponse>, AppError> {
        let trips = self.trips.find_filtered(employee_id, range).await?;

        let employee_ids: Vec<i32> = trips.iter().map(|t| t.employee_id).collect();
        let material_ids: Vec<i32> = trips.iter().filter_map(|t| t.material_id).collect();
        let employees = self.employees.find_by_ids(&employee_ids).await?;
        let materials = self.materials.find_by_ids(&material_ids).await?;

        Ok(trips
            .into_iter()
            .filter_map(|trip| {
                let employee = employees.get(&trip.employee_id)?.clone();
                let material = trip.material_id.and_then(|id| materials.get(&id).cloned());
                Some(TripResponse {
                    trip,
                    employee,
                    material,
                })
            })
            .collect())
    }

    pub async fn create_advance(&self, request: AdvanceRequest) -> Result<AdvanceResponse, AppError> {
        request.validate()?;

        let employee = self
            .employees
            .find_by_id(request.employee_id)
            .await?
            .ok_or_else(|| not_found_error("Empleado", request.employee_id))?;

        let advance = self.advances.create(&request).await?;

        tracing::info!("💵 Adelanto de {} para {}", advance.amount, employee.name);
        Ok(AdvanceResponse { advance, employee })
    }

    pub async fn list_advances(
        &self,
        employee_id: Option<i32>,
        range: DateRange,
    ) -> Result<Vec<AdvanceResponse>, AppError> {
        let advances = self.advances.find_filtered(employee_id, range).await?;

        let employee_ids: Vec<i32> = advances.iter().map(|a| a.employee_id).collect();
        let employees = self.employees.find_by_ids(&employee_ids).await?;

        Ok(advances
            .into_iter()
            .filter_map(|advance| {
                let employee = employees.get(&advance.employee_id)?.clone();
                Some(AdvanceResponse { advance, employee })
            })
            .collect())
    }
}
