use crate::domain::model::{Component, CostEstimate, Material, MaterialCost, PriceUnit, Project};
use serde::{Deserialize, Serialize};

/// Surcharges applied on top of the raw material cost, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostFactors {
    pub waste_percent: f64,
    pub labor_percent: f64,
    pub overhead_percent: f64,
    /// Applied to material + waste + labor + overhead.
    pub profit_percent: f64,
}

impl Default for CostFactors {
    fn default() -> Self {
        Self {
            waste_percent: 15.0,
            labor_percent: 30.0,
            overhead_percent: 10.0,
            profit_percent: 20.0,
        }
    }
}

/// Price of a single piece of `component` cut from `material`.
pub fn unit_cost(component: &Component, material: &Material) -> f64 {
    let quantity_in_price_unit = match material.price_unit {
        PriceUnit::SquareMeter => component.area_m2(),
        PriceUnit::CubicMeter => component.volume_m3(),
        PriceUnit::LinearMeter => component.length_m(),
        PriceUnit::Piece => 1.0,
    };
    quantity_in_price_unit * material.price_per_unit
}

pub fn component_cost(component: &Component, material: &Material) -> f64 {
    unit_cost(component, material) * component.quantity as f64
}

pub struct CostCalculator {
    factors: CostFactors,
}

impl CostCalculator {
    pub fn new(factors: CostFactors) -> Self {
        Self { factors }
    }

    pub fn estimate(&self, project: &Project, materials: &[Material]) -> CostEstimate {
        let mut breakdown: Vec<MaterialCost> = Vec::new();
        let mut material_cost = 0.0;

        for component in &project.components {
            let Some(material) = materials.iter().find(|m| m.id == component.material_id) else {
                tracing::warn!(
                    "Component '{}' references unknown material {}; left out of the estimate",
                    component.name,
                    component.material_id
                );
                continue;
            };

            let cost = component_cost(component, material);
            let area = component.area_m2() * component.quantity as f64;
            material_cost += cost;

            match breakdown.iter_mut().find(|b| b.material_id == material.id) {
                Some(entry) => {
                    entry.area_m2 += area;
                    entry.cost += cost;
                }
                None => breakdown.push(MaterialCost {
                    material_id: material.id,
                    material_name: material.name.clone(),
                    area_m2: area,
                    cost,
                }),
            }
        }

        let percent = |value: f64, pct: f64| value * pct / 100.0;
        let waste_cost = percent(material_cost, self.factors.waste_percent);
        let labor_cost = percent(material_cost, self.factors.labor_percent);
        let overhead_cost = percent(material_cost, self.factors.overhead_percent);
        let subtotal = material_cost + waste_cost + labor_cost + overhead_cost;
        let profit_margin = percent(subtotal, self.factors.profit_percent);

        CostEstimate {
            material_cost,
            waste_cost,
            labor_cost,
            overhead_cost,
            profit_margin,
            total_cost: subtotal + profit_margin,
            breakdown,
        }
    }
}
