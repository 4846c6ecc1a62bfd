//! Reglas de inventario
//!
//! El saldo de un material nunca puede quedar negativo; un material está en
//! stock bajo cuando `current_stock <= min_stock_alert`.

use rust_decimal::Decimal;

use crate::models::material::Material;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::money_limit;

/// Un material sin umbral nunca está en stock bajo
pub fn is_low_stock(current_stock: Decimal, min_stock_alert: Option<Decimal>) -> bool {
    min_stock_alert.is_some_and(|threshold| current_stock <= threshold)
}

/// Filtro lineal sobre todos los materiales, conservando el orden de entrada
pub fn filter_low_stock(materials: Vec<Material>) -> Vec<Material> {
    materials
        .into_iter()
        .filter(|m| is_low_stock(m.current_stock, m.min_stock_alert))
        .collect()
}

/// Saldo resultante de una entrada; rechaza si no cabe en la columna del saldo
pub fn apply_stock_in(material: &Material, quantity: Decimal) -> AppResult<Decimal> {
    let balance = material.current_stock + quantity;
    if balance >= money_limit() {
        return Err(AppError::BadRequest(format!(
            "El saldo de '{}' superaría el máximo permitido ({} {})",
            material.name, balance, material.unit
        )));
    }
    Ok(balance)
}

/// Saldo resultante de una salida; rechaza si la cantidad supera el saldo
pub fn apply_stock_out(material: &Material, quantity: Decimal) -> AppResult<Decimal> {
    if quantity > material.current_stock {
        return Err(AppError::InsufficientStock {
            requested: quantity,
            available: material.current_stock,
            unit: material.unit.clone(),
        });
    }
    Ok(material.current_stock - quantity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn material(name: &str, stock: Decimal, alert: Option<Decimal>) -> Material {
        Material {
            id: 1,
            name: name.to_string(),
            unit: "ton".to_string(),
            current_stock: stock,
            min_stock_alert: alert,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_low_stock_boundaries() {
        assert!(is_low_stock(dec!(10), Some(dec!(10))));
        assert!(is_low_stock(dec!(9.99), Some(dec!(10))));
        assert!(!is_low_stock(dec!(10.01), Some(dec!(10))));
        assert!(!is_low_stock(dec!(0), None));
    }

    #[test]
    fn test_filter_low_stock() {
        let low = filter_low_stock(vec![
            material("Crushed stone", dec!(5), Some(dec!(10))),
            material("Coarse sand", dec!(50), Some(dec!(5))),
            material("Fill soil", dec!(0), None),
            material("Gravel", dec!(8), Some(dec!(8))),
        ]);

        let names: Vec<&str> = low.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Crushed stone", "Gravel"]);
    }

    #[test]
    fn test_stock_in_increments_exactly() {
        let m = material("Sand", dec!(30), None);
        assert_eq!(apply_stock_in(&m, dec!(12.25)).unwrap(), dec!(42.25));
    }

    #[test]
    fn test_stock_in_rejected_over_column_limit() {
        let m = material("Sand", dec!(9999999000), None);
        assert!(apply_stock_in(&m, dec!(999.99)).is_ok());
        assert!(matches!(
            apply_stock_in(&m, dec!(1000)),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_stock_out_decrements_exactly() {
        let m = material("Sand", dec!(30), None);
        assert_eq!(apply_stock_out(&m, dec!(30)).unwrap(), dec!(0));
        assert_eq!(apply_stock_out(&m, dec!(0.5)).unwrap(), dec!(29.5));
    }

    #[test]
    fn test_stock_out_rejected_over_balance() {
        let m = material("Sand", dec!(30), None);
        match apply_stock_out(&m, dec!(35)) {
            Err(AppError::InsufficientStock {
                requested,
                available,
                unit,
            }) => {
                assert_eq!(requested, dec!(35));
                assert_eq!(available, dec!(30));
                assert_eq!(unit, "ton");
            }
            other => panic!("se esperaba InsufficientStock, obtuvo {:?}", other),
        }
    }

    #[test]
    fn test_sequence_never_goes_negative() {
        let mut m = material("Sand", dec!(0), None);
        let ops: [(bool, Decimal); 6] = [
            (true, dec!(30)),
            (false, dec!(10)),
            (false, dec!(25)),
            (true, dec!(5)),
            (false, dec!(25)),
            (false, dec!(0.01)),
        ];

        for (is_in, qty) in ops {
            if is_in {
                m.current_stock = apply_stock_in(&m, qty).unwrap();
            } else if let Ok(balance) = apply_stock_out(&m, qty) {
                m.current_stock = balance;
            }
            assert!(m.current_stock >= Decimal::ZERO);
        }
        assert_eq!(m.current_stock, dec!(0));
    }
}
