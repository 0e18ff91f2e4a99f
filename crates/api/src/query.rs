//! Shared query parameter types for API handlers.

use mdm_core::error::CoreError;
use mdm_core::insurer::Insurer;
use mdm_core::product::Product;
use serde::Deserialize;

use crate::error::AppResult;

/// `?product_id=` on the product-scoped vehicle endpoints.
#[derive(Debug, Deserialize)]
pub struct ProductParams {
    pub product_id: i32,
}

impl ProductParams {
    pub fn product(&self) -> AppResult<Product> {
        Ok(Product::try_from(self.product_id)?)
    }
}

/// `?product_id=&make=&model=` for the make/model/variant drill-down.
#[derive(Debug, Deserialize)]
pub struct HierarchyParams {
    pub product_id: i32,
    pub make: Option<String>,
    pub model: Option<String>,
}

impl HierarchyParams {
    pub fn product(&self) -> AppResult<Product> {
        Ok(Product::try_from(self.product_id)?)
    }

    /// The `make` parameter, required by the model and variant lookups.
    pub fn require_make(&self) -> AppResult<&str> {
        require_param(self.make.as_deref(), "make")
    }

    pub fn require_model(&self) -> AppResult<&str> {
        require_param(self.model.as_deref(), "model")
    }
}

/// `?product_id=` on table imports; forces the product for the whole file.
#[derive(Debug, Default, Deserialize)]
pub struct ImportParams {
    pub product_id: Option<i32>,
}

impl ImportParams {
    pub fn product(&self) -> AppResult<Option<Product>> {
        Ok(self.product_id.map(Product::try_from).transpose()?)
    }
}

/// `?insurer=&overwrite=` on mapping uploads.
#[derive(Debug, Deserialize)]
pub struct MappingImportParams {
    pub insurer: String,
    #[serde(default)]
    pub overwrite: bool,
}

/// Resolve an insurer name taken from a path or query parameter.
pub fn parse_insurer(name: &str) -> AppResult<Insurer> {
    Ok(Insurer::parse(name)
        .ok_or_else(|| CoreError::Validation(format!("Unknown insurer '{name}'")))?)
}

fn require_param<'a>(value: Option<&'a str>, name: &str) -> AppResult<&'a str> {
    Ok(value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CoreError::Validation(format!("Query parameter '{name}' is required")))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    use crate::error::AppError;

    #[test]
    fn unknown_product_is_a_validation_error() {
        let params = ImportParams { product_id: Some(9) };
        assert_matches!(params.product(), Err(AppError::Core(CoreError::Validation(_))));
        assert_eq!(ImportParams::default().product().unwrap(), None);
    }

    #[test]
    fn insurer_names_are_lenient() {
        assert_eq!(parse_insurer("royal").unwrap(), Insurer::RoyalSundaram);
        assert!(parse_insurer("nobody").is_err());
    }

    #[test]
    fn hierarchy_requires_non_blank_make() {
        let params = HierarchyParams {
            product_id: 2,
            make: Some("  ".into()),
            model: None,
        };
        assert!(params.require_make().is_err());
        assert_eq!(params.product().unwrap(), Product::FourWheeler);
    }
}
