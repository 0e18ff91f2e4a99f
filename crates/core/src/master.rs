//! Descriptors for the three master tables.
//!
//! The tables are independent and un-normalized. Each row is addressed by a
//! business key and carries a fixed set of insurer mapping columns.

use serde::Serialize;

use crate::insurer::Insurer;

/// Insurer columns of `mmv_master`.
pub const VEHICLE_INSURERS: [Insurer; 16] = [
    Insurer::Digit,
    Insurer::Icici,
    Insurer::Hdfc,
    Insurer::Reliance,
    Insurer::Bajaj,
    Insurer::Tata,
    Insurer::Sbi,
    Insurer::Future,
    Insurer::Iffco,
    Insurer::Chola,
    Insurer::RoyalSundaram,
    Insurer::Zuno,
    Insurer::Kotak,
    Insurer::Acko,
    Insurer::Magma,
    Insurer::United,
];

/// Insurer columns of `rto_master`.
pub const RTO_INSURERS: [Insurer; 17] = [
    Insurer::Chola,
    Insurer::Tata,
    Insurer::Iffco,
    Insurer::Icici,
    Insurer::Sbi,
    Insurer::Bajaj,
    Insurer::Reliance,
    Insurer::Hdfc,
    Insurer::Future,
    Insurer::Zuno,
    Insurer::Kotak,
    Insurer::Magma,
    Insurer::United,
    Insurer::RoyalSundaram,
    Insurer::Shriram,
    Insurer::Digit,
    Insurer::Acko,
];

/// Vehicle mappings for these insurers are stored as bare codes rather than
/// JSON documents.
pub const VEHICLE_PLAIN_CODE_INSURERS: [Insurer; 3] =
    [Insurer::Digit, Insurer::Zuno, Insurer::RoyalSundaram];

/// One of the master tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MasterTable {
    Vehicle,
    Rto,
    Pincode,
}

impl MasterTable {
    /// SQL table name.
    pub fn table_name(self) -> &'static str {
        match self {
            Self::Vehicle => "mmv_master",
            Self::Rto => "rto_master",
            Self::Pincode => "pincode_master",
        }
    }

    /// Column holding the business key used for import conflict resolution.
    pub fn key_column(self) -> &'static str {
        match self {
            Self::Vehicle => "ensuredit_id",
            Self::Rto => "id",
            Self::Pincode => "pincode",
        }
    }

    /// Column addressed by the single-row endpoints (`/vehicles/{id}` etc).
    pub fn row_id_column(self) -> &'static str {
        match self {
            Self::Vehicle | Self::Rto => "id",
            Self::Pincode => "pincode",
        }
    }

    /// Human-readable entity name used in errors.
    pub fn entity(self) -> &'static str {
        match self {
            Self::Vehicle => "Vehicle",
            Self::Rto => "RTO",
            Self::Pincode => "Pincode",
        }
    }

    /// Insurer columns carried by this table.
    pub fn insurers(self) -> &'static [Insurer] {
        match self {
            Self::Vehicle => &VEHICLE_INSURERS,
            Self::Rto => &RTO_INSURERS,
            Self::Pincode => &Insurer::ALL,
        }
    }

    /// Whether this table has a column for `insurer`.
    pub fn has_insurer(self, insurer: Insurer) -> bool {
        self.insurers().contains(&insurer)
    }

    /// Comma-separated insurer column list, for building SQL.
    pub fn insurer_columns(self) -> String {
        self.insurers()
            .iter()
            .map(|i| i.column())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
