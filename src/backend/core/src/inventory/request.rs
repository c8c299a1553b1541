//! Write requests against the unit registry.

use serde::{Deserialize, Deserializer, Serialize};

use super::{InkUnit, UnitStatus};
use crate::validation::{
    validate_field, validate_optional, MaxLength, Required, Validate, ValidationErrorKind,
    ValidationErrors, ValidationResult,
};

const MAX_ID_LEN: usize = 64;
const MAX_NAME_LEN: usize = 128;

/// Body of `POST /units`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateUnitRequest {
    #[serde(default)]
    pub unit_id: String,
    #[serde(default)]
    pub custom_name: Option<String>,
    #[serde(default)]
    pub ink_code: String,
    /// Defaults to `IN_STOCK`.
    #[serde(default)]
    pub status: Option<UnitStatus>,
    #[serde(default)]
    pub current_printer_id: Option<String>,
}

impl CreateUnitRequest {
    pub fn new(unit_id: impl Into<String>, ink_code: impl Into<String>) -> Self {
        Self {
            unit_id: unit_id.into(),
            ink_code: ink_code.into(),
            ..Self::default()
        }
    }

    pub fn into_unit(self) -> InkUnit {
        InkUnit {
            unit_id: self.unit_id,
            custom_name: self.custom_name.filter(|n| !n.trim().is_empty()),
            ink_code: self.ink_code,
            status: self.status.unwrap_or_default(),
            current_printer_id: self.current_printer_id,
        }
    }
}

impl Validate for CreateUnitRequest {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = ValidationErrors::new();

        validate_field("unit_id", &self.unit_id)
            .rule(Required)
            .rule(MaxLength(MAX_ID_LEN))
            .collect_into(&mut errors);
        validate_field("ink_code", &self.ink_code)
            .rule(Required)
            .rule(MaxLength(MAX_ID_LEN))
            .collect_into(&mut errors);
        validate_optional(
            "custom_name",
            self.custom_name.as_deref(),
            |f| f.rule(MaxLength(MAX_NAME_LEN)),
            &mut errors,
        );
        validate_optional(
            "current_printer_id",
            self.current_printer_id.as_deref(),
            |f| f.rule(Required).rule(MaxLength(MAX_ID_LEN)),
            &mut errors,
        );

        let status = self.status.unwrap_or_default();
        if self.current_printer_id.is_some() && status != UnitStatus::Installed {
            errors.add_error(
                "current_printer_id",
                ValidationErrorKind::Conflict {
                    with: format!("status {}", status),
                },
            );
        }

        errors.into_result()
    }
}

/// Body of `PUT /units/:id`.
///
/// Absent fields are left alone. For the nullable fields an explicit JSON
/// `null` clears the value, which is why they are double options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitPatch {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_name: Option<Option<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ink_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UnitStatus>,

    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub current_printer_id: Option<Option<String>>,
}

/// Marks a field as present, keeping `null` distinguishable from absent.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl UnitPatch {
    pub fn is_empty(&self) -> bool {
        self.custom_name.is_none()
            && self.ink_code.is_none()
            && self.status.is_none()
            && self.current_printer_id.is_none()
    }

    /// Apply to a copy of `unit`.
    ///
    /// Moving a unit out of `INSTALLED` without naming a printer drops the
    /// printer it held. Setting a printer on a unit that will not be
    /// installed is rejected.
    pub fn apply_to(&self, unit: &InkUnit) -> ValidationResult<InkUnit> {
        self.validate()?;

        let mut next = unit.clone();
        if let Some(name) = &self.custom_name {
            next.custom_name = name.clone().filter(|n| !n.trim().is_empty());
        }
        if let Some(code) = &self.ink_code {
            next.ink_code = code.clone();
        }
        if let Some(status) = self.status {
            next.status = status;
        }

        match &self.current_printer_id {
            Some(Some(printer_id)) => {
                if next.status != UnitStatus::Installed {
                    let mut errors = ValidationErrors::new();
                    errors.add_error(
                        "current_printer_id",
                        ValidationErrorKind::Conflict {
                            with: format!("status {}", next.status),
                        },
                    );
                    return Err(errors);
                }
                next.current_printer_id = Some(printer_id.clone());
            }
            Some(None) => next.current_printer_id = None,
            None => {
                if next.status != UnitStatus::Installed {
                    next.current_printer_id = None;
                }
            }
        }

        Ok(next)
    }
}

impl Validate for UnitPatch {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = ValidationErrors::new();

        validate_optional(
            "ink_code",
            self.ink_code.as_deref(),
            |f| f.rule(Required).rule(MaxLength(MAX_ID_LEN)),
            &mut errors,
        );
        validate_optional(
            "custom_name",
            self.custom_name.as_ref().and_then(|n| n.as_deref()),
            |f| f.rule(MaxLength(MAX_NAME_LEN)),
            &mut errors,
        );
        validate_optional(
            "current_printer_id",
            self.current_printer_id.as_ref().and_then(|p| p.as_deref()),
            |f| f.rule(Required).rule(MaxLength(MAX_ID_LEN)),
            &mut errors,
        );

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn installed() -> InkUnit {
        InkUnit::new("HP80A-INSTALLED-001", "TNR-HP80A")
            .with_custom_name("Front desk toner")
            .installed_in("VP-HANOI-01")
    }

    #[test]
    fn test_create_defaults_to_in_stock() {
        let request: CreateUnitRequest =
            serde_json::from_str(r#"{"unit_id":"U-9","ink_code":"INK-C746"}"#).unwrap();
        assert!(request.validate().is_ok());

        let unit = request.into_unit();
        assert_eq!(unit.status, UnitStatus::InStock);
        assert!(unit.current_printer_id.is_none());
    }

    #[test]
    fn test_create_requires_ids() {
        let errors = CreateUnitRequest::default().validate().unwrap_err();
        assert!(errors.has_field("unit_id"));
        assert!(errors.has_field("ink_code"));
    }

    #[test]
    fn test_create_rejects_printer_without_install() {
        let request = CreateUnitRequest {
            current_printer_id: Some("VP-HCM-03".into()),
            ..CreateUnitRequest::new("U-1", "TNR-HP80A")
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.has_field("current_printer_id"));

        let request = CreateUnitRequest {
            status: Some(UnitStatus::Installed),
            current_printer_id: Some("VP-HCM-03".into()),
            ..CreateUnitRequest::new("U-1", "TNR-HP80A")
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_patch_distinguishes_null_from_absent() {
        let absent: UnitPatch = serde_json::from_str(r#"{}"#).unwrap();
        assert!(absent.current_printer_id.is_none());
        assert!(absent.is_empty());

        let null: UnitPatch = serde_json::from_str(r#"{"current_printer_id":null}"#).unwrap();
        assert_eq!(null.current_printer_id, Some(None));

        let set: UnitPatch =
            serde_json::from_str(r#"{"current_printer_id":"VP-HCM-03"}"#).unwrap();
        assert_eq!(set.current_printer_id, Some(Some("VP-HCM-03".to_string())));
    }

    #[test]
    fn test_patch_ignores_absent_fields() {
        let patch: UnitPatch = serde_json::from_str(r#"{"ink_code":"TNR-HP80X"}"#).unwrap();
        let next = patch.apply_to(&installed()).unwrap();

        assert_eq!(next.ink_code, "TNR-HP80X");
        assert_eq!(next.status, UnitStatus::Installed);
        assert_eq!(next.current_printer_id.as_deref(), Some("VP-HANOI-01"));
        assert_eq!(next.custom_name.as_deref(), Some("Front desk toner"));
    }

    #[test]
    fn test_patch_null_clears() {
        let patch: UnitPatch =
            serde_json::from_str(r#"{"custom_name":null,"current_printer_id":null}"#).unwrap();
        let next = patch.apply_to(&installed()).unwrap();

        assert!(next.custom_name.is_none());
        assert!(next.current_printer_id.is_none());
        assert_eq!(next.status, UnitStatus::Installed);
    }

    #[test]
    fn test_patch_leaving_installed_drops_printer() {
        let patch = UnitPatch {
            status: Some(UnitStatus::InStock),
            ..UnitPatch::default()
        };
        let next = patch.apply_to(&installed()).unwrap();

        assert_eq!(next.status, UnitStatus::InStock);
        assert!(next.current_printer_id.is_none());
        assert!(next.is_consistent());
    }

    #[test]
    fn test_patch_rejects_printer_on_stocked_unit() {
        let patch = UnitPatch {
            current_printer_id: Some(Some("VP-HCM-03".into())),
            ..UnitPatch::default()
        };
        let stocked = InkUnit::new("U-1", "TNR-HP80A");

        let errors = patch.apply_to(&stocked).unwrap_err();
        assert!(errors.has_field("current_printer_id"));
    }

    #[test]
    fn test_patch_rejects_blank_ink_code() {
        let patch = UnitPatch {
            ink_code: Some("  ".into()),
            ..UnitPatch::default()
        };
        assert!(patch.apply_to(&installed()).is_err());
    }
}
