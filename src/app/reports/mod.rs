pub mod backup;
pub mod csv_report;
pub mod svg_diagram;

use crate::utils::format::slugify;

pub fn parts_list_file(project_name: &str) -> String {
    format!("parts_list_{}.csv", slugify(project_name))
}

pub fn cost_estimate_file(project_name: &str) -> String {
    format!("cost_estimate_{}.csv", slugify(project_name))
}

/// `sheet` is 1-based.
pub fn diagram_file(project_name: &str, material_name: &str, sheet: usize) -> String {
    format!(
        "diagram_{}_{}_{}.svg",
        slugify(project_name),
        slugify(material_name),
        sheet
    )
}

pub fn bundle_file(project_name: &str) -> String {
    format!("{}_cutlist.zip", slugify(project_name))
}
