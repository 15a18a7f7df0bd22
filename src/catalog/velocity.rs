//! Velocity column reconciliation.
//!
//! Depending on version and settings SoFiA-2 writes the source velocity as
//! `v_app`, `v_rad` or `v_opt`. Callers ask for `v_app`; this module swaps in
//! whichever variant the catalogue actually declares.

use super::columns::ColumnSchema;
use crate::constants::VELOCITY_PLACEHOLDER;
use crate::error::{ConvertError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// The physical velocity quantity found in a catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VelocityVariant {
    /// Apparent velocity (`v_app`)
    Apparent,
    /// Radio-convention velocity (`v_rad`)
    Radio,
    /// Optical-convention velocity (`v_opt`)
    Optical,
}

impl VelocityVariant {
    /// Variants in the order they are preferred
    pub const PRIORITY: [VelocityVariant; 3] = [
        VelocityVariant::Apparent,
        VelocityVariant::Radio,
        VelocityVariant::Optical,
    ];

    /// Column label of this variant in a SoFiA catalogue
    pub fn column(&self) -> &'static str {
        match self {
            VelocityVariant::Apparent => "v_app",
            VelocityVariant::Radio => "v_rad",
            VelocityVariant::Optical => "v_opt",
        }
    }

    pub fn from_column(label: &str) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|variant| variant.column() == label)
    }

    /// First variant the schema declares, by priority
    pub fn detect(schema: &ColumnSchema) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|variant| schema.contains(variant.column()))
    }
}

impl fmt::Display for VelocityVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Check the requested fields against the declared columns.
///
/// The `v_app` placeholder is replaced in place by the best available
/// velocity variant. Any other field missing from the schema, or a catalogue
/// without any velocity column, is a schema error naming the field. Returns
/// the velocity variant present in the final field list, if any.
pub fn reconcile_fields(
    fields: &mut [String],
    schema: &ColumnSchema,
) -> Result<Option<VelocityVariant>> {
    for field in fields.iter_mut() {
        if schema.contains(field.as_str()) {
            continue;
        }

        if field.as_str() != VELOCITY_PLACEHOLDER {
            return Err(ConvertError::schema(field.as_str()));
        }

        let variant = VelocityVariant::detect(schema)
            .ok_or_else(|| ConvertError::schema(VELOCITY_PLACEHOLDER))?;
        debug!(
            "Catalogue has no {} column, using {} instead",
            VELOCITY_PLACEHOLDER,
            variant.column()
        );
        *field = variant.column().to_string();
    }

    Ok(fields
        .iter()
        .find_map(|field| VelocityVariant::from_column(field)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_v_app_preferred_when_declared() {
        let schema = ColumnSchema::from_header_line("# name v_app v_rad v_opt").unwrap();
        let mut requested = fields(&["name", "v_app"]);

        let variant = reconcile_fields(&mut requested, &schema).unwrap();

        assert_eq!(variant, Some(VelocityVariant::Apparent));
        assert_eq!(requested, fields(&["name", "v_app"]));
    }

    #[test]
    fn test_v_rad_substituted_before_v_opt() {
        let schema = ColumnSchema::from_header_line("# name v_opt v_rad").unwrap();
        let mut requested = fields(&["name", "v_app", "name"]);

        let variant = reconcile_fields(&mut requested, &schema).unwrap();

        assert_eq!(variant, Some(VelocityVariant::Radio));
        assert_eq!(requested, fields(&["name", "v_rad", "name"]));
    }

    #[test]
    fn test_v_opt_used_as_last_resort() {
        let schema = ColumnSchema::from_header_line("# id name v_opt").unwrap();
        let mut requested = fields(&["id", "v_app"]);

        let variant = reconcile_fields(&mut requested, &schema).unwrap();

        assert_eq!(variant, Some(VelocityVariant::Optical));
        assert_eq!(requested[1], "v_opt");
    }

    #[test]
    fn test_missing_velocity_is_schema_error() {
        let schema = ColumnSchema::from_header_line("# name f_sum").unwrap();
        let mut requested = fields(&["name", "v_app", "f_sum"]);

        match reconcile_fields(&mut requested, &schema).unwrap_err() {
            ConvertError::Schema { field } => assert_eq!(field, "v_app"),
            other => panic!("Expected Schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_other_missing_field_is_named() {
        let schema = ColumnSchema::from_header_line("# name v_app").unwrap();
        let mut requested = fields(&["name", "v_app", "kin_pa"]);

        match reconcile_fields(&mut requested, &schema).unwrap_err() {
            ConvertError::Schema { field } => assert_eq!(field, "kin_pa"),
            other => panic!("Expected Schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_no_velocity_requested() {
        let schema = ColumnSchema::from_header_line("# name f_sum").unwrap();
        let mut requested = fields(&["name", "f_sum"]);
        assert_eq!(reconcile_fields(&mut requested, &schema).unwrap(), None);
    }
}
