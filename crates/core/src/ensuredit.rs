//! Ensuredit vehicle identifiers.
//!
//! An ensuredit id is eight digits, `MMMmmmVV`: a three-digit make id, a
//! three-digit model id and a two-digit variant id. Make ids of a product
//! share a leading digit (`1` for two-wheelers, `4` for four-wheelers).
//! Model ids start at 101 within a make; variant ids start at 01 within a
//! model. When defining a new vehicle, existing segments are reused and the
//! missing ones are allocated as "highest in use + 1".

use crate::error::CoreError;
use crate::product::Product;

/// Total length of a well-formed ensuredit id.
pub const ID_LEN: usize = 8;

/// First model id handed out under a make.
pub const FIRST_MODEL_ID: u32 = 101;

/// First variant id handed out under a model.
pub const FIRST_VARIANT_ID: u32 = 1;

/// SQL regex matching well-formed ids; rows with free-form ids are ignored
/// when allocating.
pub const SQL_ID_PATTERN: &str = "^[0-9]{8}$";

/// The three numeric segments of an ensuredit id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnsureditId {
    pub make_id: u32,
    pub model_id: u32,
    pub variant_id: u32,
}

impl EnsureditId {
    /// Split a well-formed id into its segments.
    pub fn parse(id: &str) -> Option<Self> {
        if id.len() != ID_LEN || !id.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self {
            make_id: id[0..3].parse().ok()?,
            model_id: id[3..6].parse().ok()?,
            variant_id: id[6..8].parse().ok()?,
        })
    }

    /// Make and model prefix shared by all variants of a model.
    pub fn model_prefix(make_id: u32, model_id: u32) -> String {
        format!("{make_id:03}{model_id:03}")
    }
}

impl std::fmt::Display for EnsureditId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:03}{:03}{:02}", self.make_id, self.model_id, self.variant_id)
    }
}

/// Make id for a make not yet present in `product`.
pub fn next_make_id(product: Product, highest_in_use: Option<u32>) -> Result<u32, CoreError> {
    let next = highest_in_use.map_or(product.first_make_id(), |m| m + 1);
    let fits = next.to_string().starts_with(product.id_prefix()) && next <= 999;
    if !fits {
        return Err(CoreError::Conflict(format!(
            "No make ids left for product {}",
            product.label()
        )));
    }
    Ok(next)
}

/// Model id for a model not yet present under a make.
pub fn next_model_id(highest_in_use: Option<u32>) -> Result<u32, CoreError> {
    let next = highest_in_use.map_or(FIRST_MODEL_ID, |m| m.max(FIRST_MODEL_ID - 1) + 1);
    if next > 999 {
        return Err(CoreError::Conflict("No model ids left for this make".into()));
    }
    Ok(next)
}

/// Variant id for a variant not yet present under a model.
pub fn next_variant_id(highest_in_use: Option<u32>) -> Result<u32, CoreError> {
    let next = highest_in_use.map_or(FIRST_VARIANT_ID, |v| v + 1);
    if next > 99 {
        return Err(CoreError::Conflict("No variant ids left for this model".into()));
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parses_and_formats() {
        let id = EnsureditId::parse("40110203").unwrap();
        assert_eq!(
            id,
            EnsureditId {
                make_id: 401,
                model_id: 102,
                variant_id: 3
            }
        );
        assert_eq!(id.to_string(), "40110203");
        assert_eq!(EnsureditId::model_prefix(401, 102), "401102");
    }

    #[test]
    fn rejects_malformed_ids() {
        assert_eq!(EnsureditId::parse("4011020"), None);
        assert_eq!(EnsureditId::parse("40110A03"), None);
        assert_eq!(EnsureditId::parse("401102031"), None);
    }

    #[test]
    fn first_ids_per_product() {
        assert_eq!(next_make_id(Product::TwoWheeler, None).unwrap(), 101);
        assert_eq!(next_make_id(Product::FourWheeler, None).unwrap(), 401);
        assert_eq!(next_model_id(None).unwrap(), 101);
        assert_eq!(next_variant_id(None).unwrap(), 1);
    }

    #[test]
    fn increments_highest_in_use() {
        assert_eq!(next_make_id(Product::FourWheeler, Some(417)).unwrap(), 418);
        assert_eq!(next_model_id(Some(105)).unwrap(), 106);
        assert_eq!(next_variant_id(Some(9)).unwrap(), 10);
    }

    #[test]
    fn exhausted_segments_conflict() {
        assert_matches!(
            next_make_id(Product::TwoWheeler, Some(199)),
            Err(CoreError::Conflict(_))
        );
        assert_matches!(next_model_id(Some(999)), Err(CoreError::Conflict(_)));
        assert_matches!(next_variant_id(Some(99)), Err(CoreError::Conflict(_)));
    }
}
