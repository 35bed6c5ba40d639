use serde::{Deserialize, Serialize};
use std::fmt;

/// Millimetres per metre, squared and cubed for area/volume conversions.
const MM_PER_M: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceUnit {
    #[serde(rename = "m²", alias = "m2")]
    SquareMeter,
    #[serde(rename = "m³", alias = "m3")]
    CubicMeter,
    #[serde(rename = "m")]
    LinearMeter,
    #[serde(rename = "piece")]
    Piece,
}

impl fmt::Display for PriceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PriceUnit::SquareMeter => "m²",
            PriceUnit::CubicMeter => "m³",
            PriceUnit::LinearMeter => "m",
            PriceUnit::Piece => "piece",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for PriceUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "m²" | "m2" => Ok(PriceUnit::SquareMeter),
            "m³" | "m3" => Ok(PriceUnit::CubicMeter),
            "m" => Ok(PriceUnit::LinearMeter),
            "piece" | "pc" => Ok(PriceUnit::Piece),
            other => Err(format!("unknown price unit '{}' (expected m2, m3, m or piece)", other)),
        }
    }
}

/// Stock sheet (or board) dimensions in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SheetSize {
    pub width: f64,
    pub height: f64,
}

impl SheetSize {
    pub const DEFAULT: SheetSize = SheetSize {
        width: 2750.0,
        height: 1830.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn area_m2(&self) -> f64 {
        self.width * self.height / (MM_PER_M * MM_PER_M)
    }
}

impl fmt::Display for SheetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}mm", self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: u32,
    pub name: String,
    pub thickness: f64,
    pub price_per_unit: f64,
    pub price_unit: PriceUnit,
    pub density: f64,
    pub standard_sizes: Vec<SheetSize>,
    #[serde(default)]
    pub description: String,
}

impl Material {
    /// The sheet the optimizer cuts from: the first listed standard size.
    pub fn primary_sheet(&self) -> SheetSize {
        self.standard_sizes
            .first()
            .copied()
            .unwrap_or(SheetSize::DEFAULT)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub length: f64,
    pub width: f64,
    pub thickness: f64,
    pub quantity: u32,
    pub material_id: u32,
}

impl Component {
    /// Area of a single piece.
    pub fn area_m2(&self) -> f64 {
        self.length * self.width / (MM_PER_M * MM_PER_M)
    }

    pub fn volume_m3(&self) -> f64 {
        self.area_m2() * self.thickness / MM_PER_M
    }

    pub fn length_m(&self) -> f64 {
        self.length / MM_PER_M
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProjectStatus {
    #[default]
    InDevelopment,
    Imported,
    Planned,
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProjectStatus::InDevelopment => "In development",
            ProjectStatus::Imported => "Imported",
            ProjectStatus::Planned => "Planned",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedPiece {
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotated: bool,
    pub color: String,
}

impl PlacedPiece {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    pub fn overlaps(&self, other: &PlacedPiece) -> bool {
        self.x < other.right() && other.x < self.right() && self.y < other.top() && other.y < self.top()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuttingDiagram {
    pub sheet_width: f64,
    pub sheet_height: f64,
    pub pieces: Vec<PlacedPiece>,
    pub utilization: f64,
    pub waste: f64,
    pub total_area_pieces: f64,
    pub sheet_area: f64,
}

impl CuttingDiagram {
    pub fn new(sheet: SheetSize, pieces: Vec<PlacedPiece>) -> Self {
        let total_area_pieces = pieces.iter().map(|p| p.width * p.height).sum::<f64>()
            / (MM_PER_M * MM_PER_M);
        let sheet_area = sheet.area_m2();
        let utilization = if sheet_area > 0.0 {
            total_area_pieces / sheet_area * 100.0
        } else {
            0.0
        };

        Self {
            sheet_width: sheet.width,
            sheet_height: sheet.height,
            pieces,
            utilization,
            waste: 100.0 - utilization,
            total_area_pieces,
            sheet_area,
        }
    }

    pub fn sheet(&self) -> SheetSize {
        SheetSize::new(self.sheet_width, self.sheet_height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub cutting_diagrams: Vec<CuttingDiagram>,
}

impl Project {
    pub fn piece_count(&self) -> u32 {
        self.components.iter().map(|c| c.quantity).sum()
    }
}

/// What the cutting pipeline produces for a single material of a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuttingPlan {
    pub material_id: u32,
    pub material_name: String,
    pub algorithm: String,
    pub sheets: Vec<CuttingDiagram>,
    pub unplaced: Vec<String>,
}

impl CuttingPlan {
    /// Utilization over all sheets of this material.
    pub fn overall_utilization(&self) -> f64 {
        let sheet_area: f64 = self.sheets.iter().map(|s| s.sheet_area).sum();
        if sheet_area <= 0.0 {
            return 0.0;
        }
        let used: f64 = self.sheets.iter().map(|s| s.total_area_pieces).sum();
        used / sheet_area * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialCost {
    pub material_id: u32,
    pub material_name: String,
    pub area_m2: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostEstimate {
    pub material_cost: f64,
    pub waste_cost: f64,
    pub labor_cost: f64,
    pub overhead_cost: f64,
    pub profit_margin: f64,
    pub total_cost: f64,
    pub breakdown: Vec<MaterialCost>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub projects: usize,
    pub components: usize,
    pub materials: usize,
    pub estimated_savings: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(x: f64, y: f64, w: f64, h: f64) -> PlacedPiece {
        PlacedPiece {
            id: "p_1".into(),
            name: "p".into(),
            x,
            y,
            width: w,
            height: h,
            rotated: false,
            color: "hsl(0, 70%, 80%)".into(),
        }
    }

    #[test]
    fn test_diagram_statistics() {
        let diagram = CuttingDiagram::new(
            SheetSize::new(1000.0, 1000.0),
            vec![piece(0.0, 0.0, 500.0, 500.0), piece(500.0, 0.0, 500.0, 500.0)],
        );
        assert!((diagram.total_area_pieces - 0.5).abs() < 1e-9);
        assert!((diagram.utilization - 50.0).abs() < 1e-9);
        assert!((diagram.utilization + diagram.waste - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_touching_pieces_do_not_overlap() {
        let a = piece(0.0, 0.0, 100.0, 100.0);
        let b = piece(100.0, 0.0, 100.0, 100.0);
        let c = piece(50.0, 50.0, 100.0, 100.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_price_unit_serde_names() {
        let json = serde_json::to_string(&PriceUnit::SquareMeter).unwrap();
        assert_eq!(json, "\"m²\"");
        let parsed: PriceUnit = serde_json::from_str("\"m2\"").unwrap();
        assert_eq!(parsed, PriceUnit::SquareMeter);
        assert_eq!("piece".parse::<PriceUnit>().unwrap(), PriceUnit::Piece);
    }

    #[test]
    fn test_primary_sheet_falls_back_to_default() {
        let material = Material {
            id: 9,
            name: "Sem tamanho".into(),
            thickness: 15.0,
            price_per_unit: 10.0,
            price_unit: PriceUnit::SquareMeter,
            density: 700.0,
            standard_sizes: vec![],
            description: String::new(),
        };
        assert_eq!(material.primary_sheet(), SheetSize::DEFAULT);
    }
}
