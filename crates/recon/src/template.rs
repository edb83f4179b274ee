//! Cell coordinates of every semantic field of a control sheet.
//!
//! A control sheet has a classification block (labels over values, columns A-F),
//! followed by description, evidence and test-description rows, each with an
//! "updates" row underneath that the tested copy fills in. Everything is
//! positioned relative to `n`, the 1-based row of the classification update
//! values: 5 in the canonical layout, 6 when an extra header row sits on top.

use ctrlsync_engine::{CellAddr, RangeAddr};

pub const TITLE: &str = "DOCUMENTACIÓN DEL CONTROL";
pub const CONTROL_TYPE_LABELS: [&str; 2] = ["Tipo de Control", "Clase"];
pub const DESCRIPTION_LABEL: &str = "Descripción";
pub const EVIDENCE_LABEL: &str = "Evidencia";
pub const EVIDENCE_UPDATES_LABEL: &str = "Evidencia. Actualizaciones";
pub const TEST_TITLE: &str = "DESCRIPCIÓN DE LA PRUEBA A EJECUTAR";
pub const TEST_LABEL: &str = "Prueba a realizar";
pub const SAMPLE_LABEL: &str = "Tamaño Muestra";

const CLASSIFICATION_COLS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutVariant {
    FiveRowHeader,
    SixRowHeader,
    Unrecognized,
}

impl LayoutVariant {
    pub fn offset(self) -> Option<usize> {
        match self {
            Self::FiveRowHeader => Some(5),
            Self::SixRowHeader => Some(6),
            Self::Unrecognized => None,
        }
    }
}

impl std::fmt::Display for LayoutVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FiveRowHeader => write!(f, "5-row header"),
            Self::SixRowHeader => write!(f, "6-row header"),
            Self::Unrecognized => write!(f, "unrecognized"),
        }
    }
}

/// A field's label cell and its value range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldCoords {
    pub label: CellAddr,
    pub range: RangeAddr,
}

/// One source field copied onto one destination field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldCopySpec {
    pub source: FieldCoords,
    pub dest: FieldCoords,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateMap {
    n: usize,
}

impl TemplateMap {
    pub fn for_variant(variant: LayoutVariant) -> Option<Self> {
        variant.offset().map(|n| Self { n })
    }

    pub fn canonical() -> Self {
        Self { n: 5 }
    }

    pub fn offset(&self) -> usize {
        self.n
    }

    /// Row count of a sheet in this layout.
    pub fn canonical_rows(&self) -> usize {
        self.n + 9
    }

    /// Fields as filled in on the tested copy: the "updates" rows.
    pub fn update_fields(&self) -> Vec<FieldCoords> {
        let n = self.n;
        let mut fields: Vec<FieldCoords> = CLASSIFICATION_COLS
            .iter()
            .map(|&c| FieldCoords {
                label: CellAddr::at(n - 1, c),
                range: RangeAddr::cell(CellAddr::at(n, c)),
            })
            .collect();
        fields.extend([n + 2, n + 4, n + 8].map(text_field));
        fields
    }

    /// Fields as documented: the rows the updates are merged into.
    pub fn documented_fields(&self) -> Vec<FieldCoords> {
        let n = self.n;
        let mut fields: Vec<FieldCoords> = CLASSIFICATION_COLS
            .iter()
            .map(|&c| FieldCoords {
                label: CellAddr::at(n - 3, c),
                range: RangeAddr::cell(CellAddr::at(n - 2, c)),
            })
            .collect();
        fields.extend([n + 1, n + 3, n + 7].map(text_field));
        fields
    }

    pub fn sample_label(&self) -> CellAddr {
        CellAddr::at(self.n + 9, 'E')
    }

    pub fn sample_value(&self) -> CellAddr {
        CellAddr::at(self.n + 9, 'F')
    }

    /// Documented control frequency (column D of the classification values).
    pub fn frequency(&self) -> CellAddr {
        CellAddr::at(self.n - 2, 'D')
    }

    /// Label cell of the test description; holds `TEST_LABEL` before testing.
    pub fn test_label(&self) -> CellAddr {
        CellAddr::at(self.n + 7, 'A')
    }

    /// Ranges that must be blank on a documented sheet still in pre-test state.
    pub fn must_be_blank(&self) -> Vec<RangeAddr> {
        let n = self.n;
        let mut ranges = vec![
            RangeAddr::row_span(n + 8, 'B', 'F'),
            RangeAddr::row_span(n + 4, 'B', 'F'),
            RangeAddr::row_span(n + 2, 'B', 'F'),
        ];
        ranges.extend(
            CLASSIFICATION_COLS
                .iter()
                .map(|&c| RangeAddr::cell(CellAddr::at(n, c))),
        );
        ranges
    }

    /// Ranges that must be filled on a documented sheet still in pre-test state.
    pub fn must_be_filled(&self) -> Vec<RangeAddr> {
        let n = self.n;
        vec![
            RangeAddr::row_span(n + 1, 'B', 'F'),
            RangeAddr::row_span(n + 3, 'B', 'F'),
            RangeAddr::row_span(n + 7, 'B', 'F'),
            RangeAddr::cell(self.sample_label()),
            RangeAddr::cell(self.sample_value()),
        ]
    }
}

fn text_field(row: usize) -> FieldCoords {
    FieldCoords {
        label: CellAddr::at(row, 'A'),
        range: RangeAddr::row_span(row, 'B', 'F'),
    }
}

/// Pair the source sheet's update fields with the destination's documented fields.
pub fn field_copies(source: &TemplateMap, dest: &TemplateMap) -> Vec<FieldCopySpec> {
    source
        .update_fields()
        .into_iter()
        .zip(dest.documented_fields())
        .map(|(source, dest)| FieldCopySpec { source, dest })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a1(s: &str) -> CellAddr {
        CellAddr::parse(s).unwrap()
    }

    #[test]
    fn unrecognized_has_no_map() {
        assert!(TemplateMap::for_variant(LayoutVariant::Unrecognized).is_none());
        assert_eq!(
            TemplateMap::for_variant(LayoutVariant::SixRowHeader).map(|m| m.offset()),
            Some(6)
        );
    }

    #[test]
    fn canonical_copy_table() {
        let map = TemplateMap::canonical();
        let copies = field_copies(&map, &map);
        let rendered: Vec<String> = copies
            .iter()
            .map(|c| format!("{}:{}->{}:{}", c.source.label, c.source.range, c.dest.label, c.dest.range))
            .collect();
        assert_eq!(
            rendered,
            vec![
                "A4:A5->A2:A3",
                "B4:B5->B2:B3",
                "C4:C5->C2:C3",
                "D4:D5->D2:D3",
                "E4:E5->E2:E3",
                "F4:F5->F2:F3",
                "A7:B7:F7->A6:B6:F6",
                "A9:B9:F9->A8:B8:F8",
                "A13:B13:F13->A12:B12:F12",
            ]
        );
    }

    #[test]
    fn six_row_layout_shifts_everything_by_one() {
        let map = TemplateMap::for_variant(LayoutVariant::SixRowHeader).unwrap();
        assert_eq!(map.sample_label(), a1("E15"));
        assert_eq!(map.sample_value(), a1("F15"));
        assert_eq!(map.frequency(), a1("D4"));
        assert_eq!(map.test_label(), a1("A13"));
        assert_eq!(map.canonical_rows(), 15);
        assert_eq!(map.update_fields()[6].range, RangeAddr::parse("B8:F8").unwrap());
    }

    #[test]
    fn verification_lists_canonical() {
        let map = TemplateMap::canonical();
        let blank: Vec<String> = map.must_be_blank().iter().map(ToString::to_string).collect();
        assert_eq!(
            blank,
            vec!["B13:F13", "B9:F9", "B7:F7", "A5", "B5", "C5", "D5", "E5", "F5"]
        );
        let filled: Vec<String> = map.must_be_filled().iter().map(ToString::to_string).collect();
        assert_eq!(filled, vec!["B6:F6", "B8:F8", "B12:F12", "E14", "F14"]);
        assert_eq!(map.frequency(), a1("D3"));
    }
}
