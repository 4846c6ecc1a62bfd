//! Tests contra PostgreSQL
//!
//! Requieren `DATABASE_URL`; `sqlx::test` crea una base aislada por test y
//! aplica las migraciones de `./migrations`.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::PgPool;

use materials_backoffice::{
    controllers::{
        employee_controller::EmployeeController, material_controller::MaterialController,
        salary_controller::SalaryController, stock_controller::StockController,
    },
    dto::{
        employee_dto::{
            AdvanceRequest, EmployeeRequest, MarkPaidRequest, SalaryCalculationRequest, TripRequest,
        },
        stock_dto::{StockInRequest, StockOutRequest},
    },
    models::{employee::EmployeeStatus, material::Material, stock::MovementKind},
    repositories::{
        advance_repository::AdvanceRepository, employee_repository::EmployeeRepository,
        material_repository::MaterialRepository, stock_repository::StockRepository,
        trip_repository::TripRepository,
    },
    services::payroll::DateRange,
    utils::errors::AppError,
};

fn at(year: i32, month: u32, day: u32, h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, h, m, s).unwrap()
}

async fn material(pool: &PgPool, name: &str, stock: Decimal) -> Material {
    MaterialRepository::new(pool.clone())
        .create(name, "ton", stock, None)
        .await
        .unwrap()
}

async fn employee(pool: &PgPool, name: &str, base: Decimal, rate: Decimal) -> i32 {
    EmployeeRepository::new(pool.clone())
        .create(&EmployeeRequest {
            name: name.to_string(),
            truck_license: None,
            base_salary: base,
            rate_per_trip: rate,
            status: EmployeeStatus::Active,
        })
        .await
        .unwrap()
        .id
}

async fn trip(pool: &PgPool, employee_id: i32, when: DateTime<Utc>, rate: Decimal) {
    TripRepository::new(pool.clone())
        .create(&TripRequest {
            employee_id,
            trip_date: when,
            route: None,
            material_id: None,
            quantity: None,
            rate,
            note: None,
        })
        .await
        .unwrap();
}

async fn advance(pool: &PgPool, employee_id: i32, when: DateTime<Utc>, amount: Decimal) {
    AdvanceRepository::new(pool.clone())
        .create(&AdvanceRequest {
            employee_id,
            amount,
            advance_date: when,
            note: None,
        })
        .await
        .unwrap();
}

fn stock_in(material_id: i32, quantity: Decimal) -> StockInRequest {
    StockInRequest {
        material_id,
        quantity,
        unit_price: None,
        supplier: Some("Quarry".to_string()),
        note: None,
        transaction_date: at(2025, 3, 10, 8, 0, 0),
    }
}

fn stock_out(material_id: i32, quantity: Decimal) -> StockOutRequest {
    StockOutRequest {
        material_id,
        quantity,
        customer_name: Some("Site A".to_string()),
        project_name: None,
        note: None,
        transaction_date: at(2025, 3, 11, 8, 0, 0),
    }
}

async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_stock_movements_change_balance_exactly(pool: PgPool) {
    let sand = material(&pool, "Sand", dec!(10)).await;
    let controller = StockController::new(pool.clone());

    let entry = controller.stock_in(stock_in(sand.id, dec!(2.25))).await.unwrap();
    assert_eq!(entry.stock_in.quantity, dec!(2.25));
    assert_eq!(entry.material.current_stock, dec!(12.25));

    let exit = controller.stock_out(stock_out(sand.id, dec!(5.5))).await.unwrap();
    assert_eq!(exit.stock_out.quantity, dec!(5.5));
    assert_eq!(exit.material.current_stock, dec!(6.75));

    let stored = MaterialRepository::new(pool.clone())
        .find_by_id(sand.id)
        .await
        .unwrap()
        .unwrap();
    let history = StockRepository::new(pool.clone())
        .find_history(Some(sand.id), DateRange::default())
        .await
        .unwrap();
    let logged_in: Decimal = history
        .iter()
        .filter(|m| m.kind == MovementKind::In)
        .map(|m| m.quantity)
        .sum();
    let logged_out: Decimal = history
        .iter()
        .filter(|m| m.kind == MovementKind::Out)
        .map(|m| m.quantity)
        .sum();
    assert_eq!(stored.current_stock, dec!(10) + logged_in - logged_out);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_stock_out_over_balance_leaves_everything_untouched(pool: PgPool) {
    let gravel = material(&pool, "Gravel", dec!(3)).await;
    let controller = StockController::new(pool.clone());

    let result = controller.stock_out(stock_out(gravel.id, dec!(5))).await;
    assert!(matches!(result, Err(AppError::InsufficientStock { .. })));

    let stored = MaterialRepository::new(pool.clone())
        .find_by_id(gravel.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.current_stock, dec!(3));
    assert_eq!(count(&pool, "stock_outs").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_sub_cent_quantities_never_reach_the_database(pool: PgPool) {
    let sand = material(&pool, "Sand", dec!(1)).await;
    let controller = StockController::new(pool.clone());

    let result = controller.stock_out(stock_out(sand.id, dec!(0.005))).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    let result = controller.stock_in(stock_in(sand.id, dec!(0.004))).await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let stored = MaterialRepository::new(pool.clone())
        .find_by_id(sand.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.current_stock, dec!(1));
    assert_eq!(count(&pool, "stock_ins").await, 0);
    assert_eq!(count(&pool, "stock_outs").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_referenced_material_cannot_be_deleted(pool: PgPool) {
    let sand = material(&pool, "Sand", dec!(0)).await;
    StockController::new(pool.clone())
        .stock_in(stock_in(sand.id, dec!(4)))
        .await
        .unwrap();

    let result = MaterialController::new(pool.clone()).delete(sand.id).await;
    assert!(matches!(result, Err(AppError::InUse(_))));

    // el borrado directo también choca con la foreign key
    let result = MaterialRepository::new(pool.clone()).delete(sand.id).await;
    assert!(matches!(result, Err(AppError::InUse(_))));
    assert_eq!(count(&pool, "materials").await, 1);

    let unused = material(&pool, "Fill soil", dec!(0)).await;
    MaterialController::new(pool.clone())
        .delete(unused.id)
        .await
        .unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn test_referenced_employee_cannot_be_deleted(pool: PgPool) {
    let driver = employee(&pool, "Somchai", dec!(1000), dec!(100)).await;
    advance(&pool, driver, at(2025, 3, 5, 9, 0, 0), dec!(50)).await;

    let result = EmployeeController::new(pool.clone()).delete(driver).await;
    assert!(matches!(result, Err(AppError::InUse(_))));

    let result = EmployeeRepository::new(pool.clone()).delete(driver).await;
    assert!(matches!(result, Err(AppError::InUse(_))));
    assert_eq!(count(&pool, "employees").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_records_for_missing_employee_are_not_found(pool: PgPool) {
    let result = TripRepository::new(pool.clone())
        .create(&TripRequest {
            employee_id: 999,
            trip_date: at(2025, 3, 5, 9, 0, 0),
            route: None,
            material_id: None,
            quantity: None,
            rate: dec!(100),
            note: None,
        })
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    let result = AdvanceRepository::new(pool.clone())
        .create(&AdvanceRequest {
            employee_id: 999,
            amount: dec!(10),
            advance_date: at(2025, 3, 5, 9, 0, 0),
            note: None,
        })
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_payroll_window_is_the_whole_month(pool: PgPool) {
    let driver = employee(&pool, "Somchai", dec!(1000), dec!(100)).await;

    trip(&pool, driver, at(2025, 3, 1, 0, 0, 0), dec!(100)).await;
    trip(
        &pool,
        driver,
        at(2025, 3, 31, 23, 59, 59) + Duration::milliseconds(999),
        dec!(100),
    )
    .await;
    trip(&pool, driver, at(2025, 2, 28, 23, 59, 59), dec!(100)).await;
    trip(&pool, driver, at(2025, 4, 1, 0, 0, 0), dec!(100)).await;
    advance(&pool, driver, at(2025, 3, 15, 12, 0, 0), dec!(30)).await;
    advance(&pool, driver, at(2025, 4, 1, 0, 0, 0), dec!(70)).await;

    let summaries = SalaryController::new(pool.clone())
        .calculate(SalaryCalculationRequest {
            month: 3,
            year: 2025,
        })
        .await
        .unwrap();

    assert_eq!(summaries.len(), 1);
    let summary = &summaries[0].summary;
    assert_eq!(summary.total_trips, 2);
    assert_eq!(summary.total_trip_income, dec!(200));
    assert_eq!(summary.total_advances, dec!(30));
    assert_eq!(summary.net_salary, dec!(1170));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_recompute_keeps_paid_flag(pool: PgPool) {
    let driver = employee(&pool, "Anan", dec!(1000), dec!(100)).await;
    trip(&pool, driver, at(2025, 3, 3, 10, 0, 0), dec!(100)).await;

    let controller = SalaryController::new(pool.clone());
    let request = || SalaryCalculationRequest {
        month: 3,
        year: 2025,
    };

    let first = controller.calculate(request()).await.unwrap();
    let id = first[0].summary.id;
    let paid = controller
        .mark_paid(MarkPaidRequest { id, is_paid: true })
        .await
        .unwrap();
    assert!(paid.summary.paid_date.is_some());

    trip(&pool, driver, at(2025, 3, 20, 10, 0, 0), dec!(100)).await;
    let second = controller.calculate(request()).await.unwrap();

    let summary = &second[0].summary;
    assert_eq!(summary.id, id);
    assert_eq!(summary.total_trips, 2);
    assert_eq!(summary.net_salary, dec!(1200));
    assert!(summary.is_paid);
    assert_eq!(summary.paid_date, paid.summary.paid_date);
    assert_eq!(count(&pool, "salary_summaries").await, 1);
}
