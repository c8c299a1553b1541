//! Inventory records: the ink catalog, printers and tracked ink units.

mod request;

pub use request::{CreateUnitRequest, UnitPatch};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::InkError;
use crate::validation::{validate_field, OneOf, ValidationErrors};

// ═══════════════════════════════════════════════════════════════════════════════
// Reference Data
// ═══════════════════════════════════════════════════════════════════════════════

/// Physical form of a catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InkType {
    Toner,
    Cartridge,
}

impl InkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InkType::Toner => "Toner",
            InkType::Cartridge => "Cartridge",
        }
    }
}

impl FromStr for InkType {
    type Err = InkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Toner" => Ok(InkType::Toner),
            "Cartridge" => Ok(InkType::Cartridge),
            other => Err(InkError::validation(format!("Unknown ink type: {}", other))),
        }
    }
}

/// A catalog entry: the model a unit instantiates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InkCatalogEntry {
    pub code: String,
    pub name: String,
    pub ink_type: InkType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl InkCatalogEntry {
    pub fn new(code: impl Into<String>, name: impl Into<String>, ink_type: InkType) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            ink_type,
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// A printer that units can be installed into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Printer {
    pub printer_id: String,
    pub name: String,
}

impl Printer {
    pub fn new(printer_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            printer_id: printer_id.into(),
            name: name.into(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Ink Units
// ═══════════════════════════════════════════════════════════════════════════════

/// Where a unit is in its life.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitStatus {
    #[default]
    InStock,
    Installed,
    Disposed,
}

impl UnitStatus {
    pub const ALL: [UnitStatus; 3] = [UnitStatus::InStock, UnitStatus::Installed, UnitStatus::Disposed];

    /// Wire names, in the same order as [`ALL`](Self::ALL).
    pub const NAMES: [&'static str; 3] = ["IN_STOCK", "INSTALLED", "DISPOSED"];

    /// Statuses shown on the dashboard and listed by default.
    pub const ACTIVE: [UnitStatus; 2] = [UnitStatus::InStock, UnitStatus::Installed];

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitStatus::InStock => "IN_STOCK",
            UnitStatus::Installed => "INSTALLED",
            UnitStatus::Disposed => "DISPOSED",
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, UnitStatus::Disposed)
    }

    /// Parse a comma-separated status list such as `IN_STOCK,INSTALLED`.
    ///
    /// Every unknown entry is reported, not just the first.
    pub fn parse_list(raw: &str) -> Result<Vec<UnitStatus>, InkError> {
        let parts: Vec<&str> = raw.split(',').map(str::trim).filter(|p| !p.is_empty()).collect();

        let mut errors = ValidationErrors::new();
        for &part in &parts {
            validate_field("status", part)
                .rule(OneOf(&Self::NAMES))
                .collect_into(&mut errors);
        }
        errors.into_result()?;

        let mut statuses = Vec::new();
        for part in parts {
            let status: UnitStatus = part.parse()?;
            if !statuses.contains(&status) {
                statuses.push(status);
            }
        }
        Ok(statuses)
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitStatus {
    type Err = InkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                InkError::validation(format!("Unknown unit status: {}", s))
                    .with_context("allowed", UnitStatus::NAMES)
            })
    }
}

/// A single physical cartridge or toner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InkUnit {
    pub unit_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
    pub ink_code: String,
    #[serde(default)]
    pub status: UnitStatus,
    #[serde(default)]
    pub current_printer_id: Option<String>,
}

impl InkUnit {
    /// A new in-stock unit with no printer.
    pub fn new(unit_id: impl Into<String>, ink_code: impl Into<String>) -> Self {
        Self {
            unit_id: unit_id.into(),
            custom_name: None,
            ink_code: ink_code.into(),
            status: UnitStatus::InStock,
            current_printer_id: None,
        }
    }

    pub fn with_custom_name(mut self, name: impl Into<String>) -> Self {
        self.custom_name = Some(name.into());
        self
    }

    pub fn installed_in(mut self, printer_id: impl Into<String>) -> Self {
        self.status = UnitStatus::Installed;
        self.current_printer_id = Some(printer_id.into());
        self
    }

    /// A printer may only be held while installed.
    pub fn is_consistent(&self) -> bool {
        self.status == UnitStatus::Installed || self.current_printer_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&UnitStatus::InStock).unwrap(),
            "\"IN_STOCK\""
        );
        let status: UnitStatus = serde_json::from_str("\"DISPOSED\"").unwrap();
        assert_eq!(status, UnitStatus::Disposed);
        assert_eq!("INSTALLED".parse::<UnitStatus>().unwrap(), UnitStatus::Installed);
        assert!("installed".parse::<UnitStatus>().is_err());
    }

    #[test]
    fn test_parse_status_list() {
        let statuses = UnitStatus::parse_list("IN_STOCK, INSTALLED,IN_STOCK").unwrap();
        assert_eq!(statuses, vec![UnitStatus::InStock, UnitStatus::Installed]);
        assert!(UnitStatus::parse_list("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_status_list_reports_every_unknown_entry() {
        let err = UnitStatus::parse_list("IN_STOCK,LOST,BROKEN").unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert_eq!(err.http_status(), axum::http::StatusCode::UNPROCESSABLE_ENTITY);

        let reported = &err.details().context["status"];
        assert_eq!(reported.as_array().map(Vec::len), Some(2));
        assert!(err
            .user_message()
            .contains("must be one of: IN_STOCK, INSTALLED, DISPOSED"));
    }

    #[test]
    fn test_status_names_match_wire_format() {
        for (status, name) in UnitStatus::ALL.iter().zip(UnitStatus::NAMES) {
            assert_eq!(status.as_str(), name);
        }
    }

    #[test]
    fn test_unit_defaults_to_in_stock() {
        let unit: InkUnit =
            serde_json::from_str(r#"{"unit_id":"U-1","ink_code":"TNR-HP80A"}"#).unwrap();
        assert_eq!(unit.status, UnitStatus::InStock);
        assert!(unit.current_printer_id.is_none());
        assert!(unit.is_consistent());
    }

    #[test]
    fn test_consistency() {
        let unit = InkUnit::new("U-1", "TNR-HP80A").installed_in("VP-HANOI-01");
        assert!(unit.is_consistent());

        let mut broken = unit.clone();
        broken.status = UnitStatus::Disposed;
        assert!(!broken.is_consistent());
    }

    #[test]
    fn test_ink_type_round_trip_names() {
        assert_eq!("Toner".parse::<InkType>().unwrap(), InkType::Toner);
        assert_eq!(InkType::Cartridge.as_str(), "Cartridge");
        assert!("Ribbon".parse::<InkType>().is_err());
    }
}
