use crate::domain::model::Component;
use crate::utils::error::{CutListError, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ComponentRow {
    name: String,
    length: f64,
    width: f64,
    thickness: f64,
    #[serde(default = "default_quantity")]
    quantity: u32,
    material_id: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Reads a component list with the header
/// `name,length,width,thickness,quantity,material_id`.
pub fn components_from_csv(data: &[u8]) -> Result<Vec<Component>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let mut components = Vec::new();
    for (index, row) in reader.deserialize::<ComponentRow>().enumerate() {
        let row = row?;
        if row.name.is_empty() {
            // +2: header line and 1-based numbering
            return Err(CutListError::validation(format!(
                "component on line {} has no name",
                index + 2
            )));
        }
        components.push(Component {
            name: row.name,
            length: row.length,
            width: row.width,
            thickness: row.thickness,
            quantity: row.quantity,
            material_id: row.material_id,
        });
    }

    tracing::debug!("Parsed {} component(s) from CSV", components.len());
    Ok(components)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_components() {
        let data = b"name,length,width,thickness,quantity,material_id\n\
Lateral Esquerda, 600, 300, 15, 1, 1\n\
Prateleira,570,270,15,2,1\n";
        let components = components_from_csv(data).unwrap();
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].name, "Lateral Esquerda");
        assert_eq!(components[1].quantity, 2);
    }

    #[test]
    fn test_rejects_bad_numbers() {
        let data = b"name,length,width,thickness,quantity,material_id\nFundo,abc,270,15,1,1\n";
        assert!(matches!(
            components_from_csv(data),
            Err(CutListError::CsvError(_))
        ));
    }

    #[test]
    fn test_rejects_missing_name() {
        let data = b"name,length,width,thickness,quantity,material_id\n,570,270,15,1,1\n";
        assert!(components_from_csv(data).is_err());
    }
}
