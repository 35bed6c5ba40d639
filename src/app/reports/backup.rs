use crate::domain::workspace::Workspace;
use crate::utils::error::Result;
use chrono::{DateTime, Local};

pub fn backup_file_name(at: DateTime<Local>) -> String {
    format!("cutlist_pro_backup_{}.json", at.format("%Y%m%d_%H%M%S"))
}

/// Pretty-printed `{ "projects": [...], "materials": [...] }`.
pub fn backup_json(workspace: &Workspace) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(workspace)?)
}
