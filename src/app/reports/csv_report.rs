use crate::core::cost::{component_cost, CostFactors};
use crate::domain::model::{CostEstimate, Material, Project};
use crate::utils::error::{CutListError, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct PartsRow<'a> {
    name: &'a str,
    material_name: &'a str,
    length: f64,
    width: f64,
    thickness: f64,
    quantity: u32,
    area_m2: String,
    cost: String,
}

#[derive(Debug, Serialize)]
struct CostRow<'a> {
    item: &'a str,
    value: String,
    percentage: String,
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| CutListError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| CutListError::validation(format!("report is not UTF-8: {}", e)))
}

/// One row per component. Area and cost cover the whole quantity; components
/// whose material is missing get an empty cost.
pub fn parts_list_csv(project: &Project, materials: &[Material]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for component in &project.components {
        let material = materials.iter().find(|m| m.id == component.material_id);
        writer.serialize(PartsRow {
            name: &component.name,
            material_name: material.map(|m| m.name.as_str()).unwrap_or(""),
            length: component.length,
            width: component.width,
            thickness: component.thickness,
            quantity: component.quantity,
            area_m2: format!("{:.3}", component.area_m2() * component.quantity as f64),
            cost: material
                .map(|m| format!("{:.2}", component_cost(component, m)))
                .unwrap_or_default(),
        })?;
    }

    // keep the header even for projects without components
    if project.components.is_empty() {
        writer.write_record([
            "name", "material_name", "length", "width", "thickness", "quantity", "area_m2", "cost",
        ])?;
    }

    finish(writer)
}

pub fn cost_estimate_csv(estimate: &CostEstimate, factors: &CostFactors, include_breakdown: bool) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let pct = |value: f64| format!("{}%", value);
    let rows = [
        ("Material", estimate.material_cost, "Base".to_string()),
        ("Waste", estimate.waste_cost, pct(factors.waste_percent)),
        ("Labor", estimate.labor_cost, pct(factors.labor_percent)),
        ("Overhead", estimate.overhead_cost, pct(factors.overhead_percent)),
        ("Profit margin", estimate.profit_margin, pct(factors.profit_percent)),
        ("TOTAL", estimate.total_cost, "100%".to_string()),
    ];
    for (item, value, percentage) in rows {
        writer.serialize(CostRow {
            item,
            value: format!("{:.2}", value),
            percentage,
        })?;
    }

    if include_breakdown && !estimate.breakdown.is_empty() {
        writer.write_record(["material", "area_m2", "cost"])?;
        for entry in &estimate.breakdown {
            writer.write_record([
                entry.material_name.clone(),
                format!("{:.3}", entry.area_m2),
                format!("{:.2}", entry.cost),
            ])?;
        }
    }

    finish(writer)
}
