//! Datos iniciales
//!
//! Crea el usuario administrador y algunos materiales de partida. Es
//! idempotente: las filas existentes no se tocan.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

use crate::repositories::material_repository::MaterialRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::password::hash_password;
use crate::utils::errors::AppError;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// (nombre, unidad, stock inicial, umbral de alerta)
const STARTER_MATERIALS: [(&str, &str, i64, i64); 3] = [
    ("Crushed stone", "ton", 100, 20),
    ("Coarse sand", "ton", 80, 15),
    ("Fill soil", "m3", 150, 30),
];

/// Resumen de lo que insertó el seed
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub admin_created: bool,
    pub materials_created: usize,
}

pub async fn run_seed(pool: &PgPool, admin_password: &str) -> Result<SeedReport, AppError> {
    let users = UserRepository::new(pool.clone());
    let materials = MaterialRepository::new(pool.clone());
    let mut report = SeedReport::default();

    let password_hash = hash_password(admin_password)?;
    report.admin_created = users
        .create_if_missing(ADMIN_EMAIL, &password_hash, "Administrator", "admin")
        .await?;

    if report.admin_created {
        info!("👤 Usuario admin creado: {}", ADMIN_EMAIL);
    } else {
        info!("👤 Usuario admin ya existía: {}", ADMIN_EMAIL);
    }

    for (name, unit, stock, alert) in STARTER_MATERIALS {
        let created = materials
            .create_if_missing(name, unit, Decimal::from(stock), Some(Decimal::from(alert)))
            .await?;
        if created {
            report.materials_created += 1;
        }
    }

    info!("🌱 Seed completo: {} materiales nuevos", report.materials_created);
    Ok(report)
}
