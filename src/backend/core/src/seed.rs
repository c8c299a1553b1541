//! Demo reference data loaded by `POST /init`.

use serde::{Deserialize, Serialize};

use crate::inventory::{InkCatalogEntry, InkType, InkUnit, Printer};

/// A full replacement data set for the inventory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    pub inks: Vec<InkCatalogEntry>,
    pub printers: Vec<Printer>,
    pub units: Vec<InkUnit>,
}

impl SeedData {
    /// Two ink models, two printers, three stocked units and one installed.
    pub fn demo() -> Self {
        Self {
            inks: vec![
                InkCatalogEntry::new("TNR-HP80A", "HP Black Toner 80A", InkType::Toner)
                    .with_color("Black"),
                InkCatalogEntry::new("INK-C746", "Canon Color Cartridge 746", InkType::Cartridge)
                    .with_color("Multi"),
            ],
            printers: vec![
                Printer::new("VP-HANOI-01", "Laser P2055dn (Hanoi)"),
                Printer::new("VP-HCM-03", "Inkjet IP2870S (HCMC)"),
            ],
            units: vec![
                InkUnit::new("HP80A-STOCK-001", "TNR-HP80A").with_custom_name("New HP 80A toner 1"),
                InkUnit::new("HP80A-STOCK-002", "TNR-HP80A").with_custom_name("New HP 80A toner 2"),
                InkUnit::new("C746-STOCK-001", "INK-C746").with_custom_name("New Canon C746 cartridge 1"),
                InkUnit::new("HP80A-INSTALLED-001", "TNR-HP80A")
                    .with_custom_name("In use at Hanoi")
                    .installed_in("VP-HANOI-01"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::UnitStatus;

    #[test]
    fn test_demo_units_reference_seeded_records() {
        let seed = SeedData::demo();
        assert_eq!(seed.inks.len(), 2);
        assert_eq!(seed.printers.len(), 2);
        assert_eq!(seed.units.len(), 4);

        for unit in &seed.units {
            assert!(unit.is_consistent());
            assert!(seed.inks.iter().any(|i| i.code == unit.ink_code));
            if let Some(printer) = &unit.current_printer_id {
                assert!(seed.printers.iter().any(|p| &p.printer_id == printer));
            }
        }

        let installed = seed
            .units
            .iter()
            .filter(|u| u.status == UnitStatus::Installed)
            .count();
        assert_eq!(installed, 1);
    }
}
