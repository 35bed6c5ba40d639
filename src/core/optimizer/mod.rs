//! Sheet cutting optimizer.
//!
//! Components are expanded into individual pieces (one per unit of quantity)
//! and packed onto as many stock sheets as needed. Coordinates are in
//! millimetres with the origin at the sheet's bottom-left corner; `width`
//! runs along the sheet width and maps to the component's length.

mod guillotine;
mod shelf;

use crate::domain::model::{Component, CuttingDiagram, CuttingPlan, Material, PlacedPiece, Project, SheetSize};
use crate::utils::error::{CutListError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_KERF_MM: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// Rows filled in input order; a piece that does not fit opens the next row.
    #[default]
    BottomLeftFill,
    /// Largest pieces first, each into the row it leaves the least room in.
    BestFitDecreasing,
    /// Largest pieces first into free rectangles produced by edge-to-edge cuts.
    GuillotineSplit,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::BottomLeftFill,
        Algorithm::BestFitDecreasing,
        Algorithm::GuillotineSplit,
    ];
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Algorithm::BottomLeftFill => "bottom-left-fill",
            Algorithm::BestFitDecreasing => "best-fit-decreasing",
            Algorithm::GuillotineSplit => "guillotine-split",
        };
        f.write_str(s)
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "bottom-left-fill" | "blf" => Ok(Algorithm::BottomLeftFill),
            "best-fit-decreasing" | "bfd" => Ok(Algorithm::BestFitDecreasing),
            "guillotine-split" | "guillotine" => Ok(Algorithm::GuillotineSplit),
            _ => Err(format!(
                "unknown algorithm '{}' (expected one of: {})",
                s,
                Algorithm::ALL
                    .iter()
                    .map(|a| a.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizerSettings {
    pub algorithm: Algorithm,
    /// Saw blade width kept between neighbouring pieces.
    pub kerf: f64,
    /// Whether pieces may be turned 90 degrees (ignores grain direction).
    pub allow_rotation: bool,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            kerf: DEFAULT_KERF_MM,
            allow_rotation: false,
        }
    }
}

/// A single unit of a component, waiting to be placed.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub id: String,
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub color: String,
}

impl Piece {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Orientations worth trying, natural first.
    fn orientations(&self, allow_rotation: bool) -> Vec<(f64, f64, bool)> {
        let mut options = vec![(self.width, self.height, false)];
        if allow_rotation && self.width != self.height {
            options.push((self.height, self.width, true));
        }
        options
    }

    fn fits_empty_sheet(&self, sheet: SheetSize, allow_rotation: bool) -> bool {
        self.orientations(allow_rotation)
            .iter()
            .any(|&(w, h, _)| w <= sheet.width && h <= sheet.height)
    }

    fn place(&self, x: f64, y: f64, width: f64, height: f64, rotated: bool) -> PlacedPiece {
        PlacedPiece {
            id: self.id.clone(),
            name: self.name.clone(),
            x,
            y,
            width,
            height,
            rotated,
            color: self.color.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CuttingLayout {
    pub sheets: Vec<CuttingDiagram>,
    /// Names of pieces that fit no sheet in any allowed orientation.
    pub unplaced: Vec<String>,
}

impl CuttingLayout {
    pub fn placed_count(&self) -> usize {
        self.sheets.iter().map(|s| s.pieces.len()).sum()
    }
}

/// Expands quantities into pieces, keeping the component order.
pub fn expand_pieces(components: &[Component]) -> Vec<Piece> {
    let mut pieces = Vec::new();
    for (index, component) in components.iter().enumerate() {
        let color = format!("hsl({}, 70%, 80%)", (index * 60) % 360);
        for n in 1..=component.quantity {
            let name = if component.quantity > 1 {
                format!("{} {}", component.name, n)
            } else {
                component.name.clone()
            };
            pieces.push(Piece {
                id: format!("{}_{}", component.name, n),
                name,
                width: component.length,
                height: component.width,
                color: color.clone(),
            });
        }
    }
    pieces
}

/// Largest area first; ties keep their input order.
fn sort_decreasing(pieces: &mut [Piece]) {
    pieces.sort_by(|a, b| b.area().total_cmp(&a.area()));
}

pub struct CuttingOptimizer {
    settings: OptimizerSettings,
}

impl CuttingOptimizer {
    pub fn new(settings: OptimizerSettings) -> Self {
        Self { settings }
    }

    pub fn optimize(&self, components: &[Component], sheet: SheetSize) -> Result<CuttingLayout> {
        self.check_inputs(sheet)?;

        let mut pieces = expand_pieces(components);
        let mut unplaced = Vec::new();
        pieces.retain(|piece| {
            let fits = piece.fits_empty_sheet(sheet, self.settings.allow_rotation);
            if !fits {
                tracing::warn!(
                    "Piece '{}' ({}x{}mm) does not fit a {} sheet",
                    piece.name,
                    piece.width,
                    piece.height,
                    sheet
                );
                unplaced.push(piece.name.clone());
            }
            fits
        });

        let kerf = self.settings.kerf;
        let rotate = self.settings.allow_rotation;
        let sheets = match self.settings.algorithm {
            Algorithm::BottomLeftFill => shelf::next_fit(&pieces, sheet, kerf, rotate),
            Algorithm::BestFitDecreasing => {
                sort_decreasing(&mut pieces);
                shelf::best_fit(&pieces, sheet, kerf, rotate)
            }
            Algorithm::GuillotineSplit => {
                sort_decreasing(&mut pieces);
                guillotine::pack(&pieces, sheet, kerf, rotate)
            }
        };

        let layout = CuttingLayout {
            sheets: sheets
                .into_iter()
                .map(|placed| CuttingDiagram::new(sheet, placed))
                .collect(),
            unplaced,
        };
        tracing::debug!(
            "{}: {} pieces on {} sheet(s), {} unplaced",
            self.settings.algorithm,
            layout.placed_count(),
            layout.sheets.len(),
            layout.unplaced.len()
        );
        Ok(layout)
    }

    /// One plan per material used by the project, in order of first use.
    pub fn plan_project(&self, project: &Project, materials: &[Material]) -> Result<Vec<CuttingPlan>> {
        let mut groups: Vec<(u32, Vec<Component>)> = Vec::new();
        for component in &project.components {
            match groups.iter_mut().find(|(id, _)| *id == component.material_id) {
                Some((_, group)) => group.push(component.clone()),
                None => groups.push((component.material_id, vec![component.clone()])),
            }
        }

        let mut plans = Vec::with_capacity(groups.len());
        for (material_id, components) in groups {
            let Some(material) = materials.iter().find(|m| m.id == material_id) else {
                tracing::warn!(
                    "Project '{}' references unknown material {}; its components are skipped",
                    project.name,
                    material_id
                );
                continue;
            };

            let layout = self.optimize(&components, material.primary_sheet())?;
            plans.push(CuttingPlan {
                material_id,
                material_name: material.name.clone(),
                algorithm: self.settings.algorithm.to_string(),
                sheets: layout.sheets,
                unplaced: layout.unplaced,
            });
        }
        Ok(plans)
    }

    fn check_inputs(&self, sheet: SheetSize) -> Result<()> {
        if !(sheet.width > 0.0 && sheet.height > 0.0) {
            return Err(CutListError::OptimizationError {
                message: format!("sheet size must be positive, got {}", sheet),
            });
        }
        if !(self.settings.kerf >= 0.0) {
            return Err(CutListError::OptimizationError {
                message: format!("kerf must not be negative, got {}", self.settings.kerf),
            });
        }
        Ok(())
    }
}
