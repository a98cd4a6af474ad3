//! Pre-built sample datasets for common feature-extraction scenarios.

use serde::{Deserialize, Serialize};

/// Sample e-commerce order, exercising numeric scalers, one-hot category
/// encoding, and crosses between two one-hot blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcommerceOrder {
    pub order_id: u64,
    pub price: f64,
    pub quantity: u32,
    pub category: String,
    pub region: String,
}

/// Generate sample e-commerce orders for testing.
///
/// # Example
///
/// ```
/// use vecloom::testing::sample_ecommerce_records;
///
/// let orders = sample_ecommerce_records();
/// assert!(!orders.is_empty());
/// ```
#[must_use]
pub fn sample_ecommerce_records() -> Vec<EcommerceOrder> {
    vec![
        EcommerceOrder {
            order_id: 1,
            price: 19.99,
            quantity: 2,
            category: "books".to_string(),
            region: "west".to_string(),
        },
        EcommerceOrder {
            order_id: 2,
            price: 249.50,
            quantity: 1,
            category: "electronics".to_string(),
            region: "east".to_string(),
        },
        EcommerceOrder {
            order_id: 3,
            price: 8.25,
            quantity: 5,
            category: "books".to_string(),
            region: "east".to_string(),
        },
        EcommerceOrder {
            order_id: 4,
            price: 64.00,
            quantity: 3,
            category: "home".to_string(),
            region: "west".to_string(),
        },
        EcommerceOrder {
            order_id: 5,
            price: 129.99,
            quantity: 1,
            category: "electronics".to_string(),
            region: "south".to_string(),
        },
        EcommerceOrder {
            order_id: 6,
            price: 15.49,
            quantity: 4,
            category: "home".to_string(),
            region: "west".to_string(),
        },
    ]
}

/// Sample sensor reading, with an optional field to exercise missing-value
/// handling (a scenario with optional/default fields).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub sensor_id: String,
    pub timestamp: u64,
    pub temperature_celsius: f64,
    pub humidity_percent: Option<f64>,
}

/// Generate sample sensor readings for testing.
///
/// # Example
///
/// ```
/// use vecloom::testing::sample_sensor_readings;
///
/// let readings = sample_sensor_readings();
/// assert!(readings.iter().any(|r| r.humidity_percent.is_none()));
/// ```
#[must_use]
pub fn sample_sensor_readings() -> Vec<SensorReading> {
    vec![
        SensorReading {
            sensor_id: "sensor-a".to_string(),
            timestamp: 1_700_000_000,
            temperature_celsius: 21.4,
            humidity_percent: Some(48.0),
        },
        SensorReading {
            sensor_id: "sensor-b".to_string(),
            timestamp: 1_700_000_060,
            temperature_celsius: 22.1,
            humidity_percent: Some(51.5),
        },
        SensorReading {
            sensor_id: "sensor-a".to_string(),
            timestamp: 1_700_000_120,
            temperature_celsius: 20.9,
            humidity_percent: None,
        },
        SensorReading {
            sensor_id: "sensor-c".to_string(),
            timestamp: 1_700_000_180,
            temperature_celsius: 35.7,
            humidity_percent: Some(12.0),
        },
        SensorReading {
            sensor_id: "sensor-b".to_string(),
            timestamp: 1_700_000_240,
            temperature_celsius: 19.8,
            humidity_percent: Some(60.2),
        },
        SensorReading {
            sensor_id: "sensor-c".to_string(),
            timestamp: 1_700_000_300,
            temperature_celsius: -3.2,
            humidity_percent: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ecommerce_fixture_covers_more_than_one_category_and_region() {
        let orders = sample_ecommerce_records();
        let categories: std::collections::HashSet<_> = orders.iter().map(|o| &o.category).collect();
        let regions: std::collections::HashSet<_> = orders.iter().map(|o| &o.region).collect();
        assert!(categories.len() > 1);
        assert!(regions.len() > 1);
    }

    #[test]
    fn sensor_fixture_includes_a_missing_humidity_reading() {
        let readings = sample_sensor_readings();
        assert!(readings.iter().any(|r| r.humidity_percent.is_none()));
    }
}
