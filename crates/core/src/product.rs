//! Vehicle product lines and their per-product defaults.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Fuel types offered when defining a vehicle.
pub const FUEL_TYPES: [&str; 5] = ["Petrol", "Diesel", "Electric", "CNG", "Hybrid"];

const TWO_WHEELER_BODY_TYPES: [&str; 3] = ["Scooter", "Motorcycle", "Moped"];

const FOUR_WHEELER_BODY_TYPES: [&str; 9] = [
    "Sedan",
    "SUV",
    "Hatchback",
    "MUV",
    "Van",
    "Coupe",
    "Convertible",
    "Station Wagon",
    "Pickup",
];

/// A vehicle product line. Stored as `product_id` on `mmv_master`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum Product {
    TwoWheeler,
    FourWheeler,
}

impl Product {
    /// Numeric id persisted in `mmv_master.product_id`.
    pub fn id(self) -> i32 {
        match self {
            Self::TwoWheeler => 1,
            Self::FourWheeler => 2,
        }
    }

    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(Self::TwoWheeler),
            2 => Some(Self::FourWheeler),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TwoWheeler => "2W",
            Self::FourWheeler => "4W",
        }
    }

    pub fn default_seating_capacity(self) -> i32 {
        match self {
            Self::TwoWheeler => 2,
            Self::FourWheeler => 5,
        }
    }

    pub fn default_carrying_capacity(self) -> i32 {
        match self {
            Self::TwoWheeler => 1,
            Self::FourWheeler => 4,
        }
    }

    pub fn body_types(self) -> &'static [&'static str] {
        match self {
            Self::TwoWheeler => &TWO_WHEELER_BODY_TYPES,
            Self::FourWheeler => &FOUR_WHEELER_BODY_TYPES,
        }
    }

    /// First make id handed out for this product. Make ids of a product
    /// all share the leading digit of this value.
    pub fn first_make_id(self) -> u32 {
        match self {
            Self::TwoWheeler => 101,
            Self::FourWheeler => 401,
        }
    }

    /// Leading digit shared by every ensuredit id of this product.
    pub fn id_prefix(self) -> char {
        match self {
            Self::TwoWheeler => '1',
            Self::FourWheeler => '4',
        }
    }
}

impl From<Product> for i32 {
    fn from(product: Product) -> Self {
        product.id()
    }
}

impl TryFrom<i32> for Product {
    type Error = CoreError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        Product::from_id(id)
            .ok_or_else(|| CoreError::Validation(format!("Unknown product id {id}")))
    }
}

/// Fuel and body type choices offered for a product.
#[derive(Debug, Clone, Serialize)]
pub struct VehicleOptions {
    pub product_id: i32,
    pub fuel_types: Vec<&'static str>,
    pub body_types: Vec<&'static str>,
    pub default_seating_capacity: i32,
    pub default_carrying_capacity: i32,
}

impl VehicleOptions {
    pub fn for_product(product: Product) -> Self {
        Self {
            product_id: product.id(),
            fuel_types: FUEL_TYPES.to_vec(),
            body_types: product.body_types().to_vec(),
            default_seating_capacity: product.default_seating_capacity(),
            default_carrying_capacity: product.default_carrying_capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        assert_eq!(Product::from_id(1), Some(Product::TwoWheeler));
        assert_eq!(Product::from_id(2), Some(Product::FourWheeler));
        assert_eq!(Product::from_id(3), None);
        assert!(Product::try_from(0).is_err());
    }

    #[test]
    fn defaults_differ_per_product() {
        assert_eq!(Product::TwoWheeler.default_seating_capacity(), 2);
        assert_eq!(Product::FourWheeler.default_carrying_capacity(), 4);
        assert!(Product::TwoWheeler.body_types().contains(&"Scooter"));
        assert!(!Product::FourWheeler.body_types().contains(&"Scooter"));
    }

    #[test]
    fn make_ids_start_with_product_prefix() {
        for product in [Product::TwoWheeler, Product::FourWheeler] {
            let first = product.first_make_id().to_string();
            assert!(first.starts_with(product.id_prefix()));
        }
    }

    #[test]
    fn deserializes_from_number() {
        let product: Product = serde_json::from_str("2").unwrap();
        assert_eq!(product, Product::FourWheeler);
        assert!(serde_json::from_str::<Product>("9").is_err());
    }
}
