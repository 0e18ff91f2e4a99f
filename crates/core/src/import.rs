//! Mapping of CSV rows onto master-table records, and import bookkeeping.
//!
//! Row mappers are pure: they read a [`CsvRow`], clean every cell and
//! produce a record ready for the repository upsert. A row without its
//! business key is rejected rather than inserted under a generated key, so
//! importing the same file twice never duplicates rows.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::clean::{clean_int, clean_text};
use crate::csv::{CsvRow, CsvTable};
use crate::error::CoreError;
use crate::insurer::Insurer;
use crate::master::MasterTable;
use crate::product::Product;

/// Insurer mapping values keyed by insurer. Every insurer column of the
/// owning table is present; `None` means the column is empty.
pub type InsurerCodes = BTreeMap<Insurer, Option<String>>;

/// Log import progress every this many rows.
pub const PROGRESS_EVERY: usize = 1000;

/// Cap on row errors kept in an [`ImportSummary`]; the `failed` counter
/// keeps counting past it.
pub const MAX_REPORTED_ERRORS: usize = 500;

/// Header names accepted for the business key of each table.
pub const VEHICLE_KEY_ALIASES: [&str; 2] = ["ensureditId", "ensuredit_id"];
pub const RTO_KEY_ALIASES: [&str; 1] = ["id"];
pub const PINCODE_KEY_ALIASES: [&str; 2] = ["pincode", "pin_code"];

/// A vehicle (MMV) row, keyed by `ensuredit_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleRecord {
    pub ensuredit_id: String,
    pub product_id: i32,
    pub make: Option<String>,
    pub model: Option<String>,
    pub variant: Option<String>,
    pub cc: i32,
    pub fuel_type: Option<String>,
    pub body_type: Option<String>,
    pub seating_capacity: i32,
    pub carrying_capacity: i32,
    pub insurers: InsurerCodes,
}

/// An RTO row, keyed by `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct RtoRecord {
    pub id: String,
    pub search_string: Option<String>,
    pub display_string: Option<String>,
    pub rto: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub insurers: InsurerCodes,
}

/// A pincode row, keyed by `pincode`.
#[derive(Debug, Clone, PartialEq)]
pub struct PincodeRecord {
    pub pincode: String,
    pub district: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub insurers: InsurerCodes,
}

/// Whether an upsert created a new row or overwrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// A row that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    /// Source line of the row (the header is line 1).
    pub line: usize,
    pub message: String,
}

/// Outcome counters of one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub total_rows: usize,
    pub inserted: usize,
    pub updated: usize,
    pub failed: usize,
    pub errors: Vec<RowError>,
}

impl ImportSummary {
    pub fn record(&mut self, outcome: UpsertOutcome) {
        self.total_rows += 1;
        match outcome {
            UpsertOutcome::Inserted => self.inserted += 1,
            UpsertOutcome::Updated => self.updated += 1,
        }
    }

    pub fn record_failure(&mut self, line: usize, message: impl Into<String>) {
        self.total_rows += 1;
        self.failed += 1;
        if self.errors.len() < MAX_REPORTED_ERRORS {
            self.errors.push(RowError {
                line,
                message: message.into(),
            });
        }
    }
}

/// Reject a file that has no column for the table's business key.
pub fn ensure_key_column(csv: &CsvTable, aliases: &[&str]) -> Result<(), CoreError> {
    if csv.has_column(aliases) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "CSV has no '{}' column. Found: {:?}",
            aliases[0],
            csv.headers()
        )))
    }
}

/// Read every insurer column of `table` from a row.
pub fn read_insurers(row: &CsvRow<'_>, table: MasterTable) -> InsurerCodes {
    table
        .insurers()
        .iter()
        .map(|insurer| (*insurer, clean_text(row.get(&insurer.header_aliases()))))
        .collect()
}

fn require_key(row: &CsvRow<'_>, aliases: &[&str], name: &str) -> Result<String, String> {
    clean_text(row.get(aliases)).ok_or_else(|| format!("missing {name}"))
}

/// Map a row of a vehicle import file.
///
/// `product` forces the product line for the whole file; otherwise the row's
/// `productId` column decides, defaulting to two-wheeler.
pub fn vehicle_from_row(row: &CsvRow<'_>, product: Option<Product>) -> Result<VehicleRecord, String> {
    let ensuredit_id = require_key(row, &VEHICLE_KEY_ALIASES, "ensuredit_id")?;

    let product = match product {
        Some(p) => p,
        None => {
            let id = clean_int(row.get(&["productId", "product_id"]), Product::TwoWheeler.id());
            Product::from_id(id).ok_or_else(|| format!("unknown product id {id}"))?
        }
    };

    Ok(VehicleRecord {
        ensuredit_id,
        product_id: product.id(),
        make: clean_text(row.get(&["make"])),
        model: clean_text(row.get(&["model"])),
        variant: clean_text(row.get(&["variant"])),
        cc: clean_int(row.get(&["cc"]), 0),
        fuel_type: clean_text(row.get(&["fuelType", "fuel"])),
        body_type: clean_text(row.get(&["bodyType", "body_type"])),
        seating_capacity: clean_int(
            row.get(&["seating", "seating_capacity"]),
            product.default_seating_capacity(),
        ),
        carrying_capacity: clean_int(
            row.get(&["carrying", "carrying_capacity"]),
            product.default_carrying_capacity(),
        ),
        insurers: read_insurers(row, MasterTable::Vehicle),
    })
}

/// Map a row of an RTO import file.
pub fn rto_from_row(row: &CsvRow<'_>) -> Result<RtoRecord, String> {
    Ok(RtoRecord {
        id: require_key(row, &RTO_KEY_ALIASES, "id")?,
        search_string: clean_text(row.get(&["searchString"])),
        display_string: clean_text(row.get(&["displayString"])),
        rto: clean_text(row.get(&["rto"])),
        city: clean_text(row.get(&["city"])),
        state: clean_text(row.get(&["state"])),
        insurers: read_insurers(row, MasterTable::Rto),
    })
}

/// Map a row of a pincode import file.
pub fn pincode_from_row(row: &CsvRow<'_>) -> Result<PincodeRecord, String> {
    Ok(PincodeRecord {
        pincode: require_key(row, &PINCODE_KEY_ALIASES, "pincode")?,
        district: clean_text(row.get(&["district"])),
        city: clean_text(row.get(&["city"])),
        state: clean_text(row.get(&["state"])),
        insurers: read_insurers(row, MasterTable::Pincode),
    })
}
