use crate::domain::model::{
    Component, DashboardStats, Material, PriceUnit, Project, ProjectStatus, SheetSize,
};
use crate::domain::ports::Storage;
use crate::utils::error::{CutListError, Result};
use crate::utils::validation::{
    validate_min, validate_non_empty_string, validate_range, Validate,
};
use chrono::Local;
use serde::{Deserialize, Serialize};

/// Rough saving attributed to each optimized project on the dashboard.
const SAVINGS_PER_PROJECT: f64 = 150.0;
const RECENT_PROJECTS: usize = 3;
const CREATED_AT_FORMAT: &str = "%d/%m/%Y %H:%M";
/// Each unit becomes its own piece in the optimizer.
pub const MAX_COMPONENT_QUANTITY: u32 = 10_000;

/// Everything the tool persists: the materials library and the projects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub materials: Vec<Material>,
}

#[derive(Debug, Clone)]
pub struct NewMaterial {
    pub name: String,
    pub thickness: f64,
    pub price_per_unit: f64,
    pub price_unit: PriceUnit,
    pub density: f64,
    pub standard_size: SheetSize,
    pub description: String,
}

impl Validate for NewMaterial {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("material.name", &self.name)?;
        validate_min("material.thickness", self.thickness, 0.1)?;
        validate_min("material.price_per_unit", self.price_per_unit, 0.01)?;
        validate_min("material.density", self.density, 1.0)?;
        validate_min("material.width", self.standard_size.width, 1.0)?;
        validate_min("material.height", self.standard_size.height, 1.0)?;
        Ok(())
    }
}

impl Validate for Component {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("component.name", &self.name)?;
        validate_min("component.length", self.length, 0.1)?;
        validate_min("component.width", self.width, 0.1)?;
        validate_min("component.thickness", self.thickness, 0.1)?;
        validate_range("component.quantity", self.quantity, 1, MAX_COMPONENT_QUANTITY)?;
        Ok(())
    }
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the workspace document, or starts an empty one when it does not exist yet.
    pub async fn load<S: Storage>(storage: &S, path: &str) -> Result<Self> {
        match storage.read_file(path).await {
            Ok(data) => {
                let workspace: Workspace = serde_json::from_slice(&data)?;
                tracing::debug!(
                    "Loaded workspace '{}' ({} projects, {} materials)",
                    path,
                    workspace.projects.len(),
                    workspace.materials.len()
                );
                Ok(workspace)
            }
            Err(CutListError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No workspace at '{}', starting a new one", path);
                Ok(Self::new())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn save<S: Storage>(&self, storage: &S, path: &str) -> Result<()> {
        let json = serde_json::to_vec_pretty(self)?;
        storage.write_file(path, &json).await?;
        tracing::debug!("Workspace saved to '{}'", path);
        Ok(())
    }

    pub fn seed_default_materials(&mut self) {
        if self.materials.is_empty() {
            self.materials = default_materials();
            tracing::debug!("Seeded {} default materials", self.materials.len());
        }
    }

    pub fn material(&self, id: u32) -> Option<&Material> {
        self.materials.iter().find(|m| m.id == id)
    }

    pub fn add_material(&mut self, new_material: NewMaterial) -> Result<&Material> {
        new_material.validate()?;

        let material = Material {
            id: self.materials.len() as u32 + 1,
            name: new_material.name.trim().to_string(),
            thickness: new_material.thickness,
            price_per_unit: new_material.price_per_unit,
            price_unit: new_material.price_unit,
            density: new_material.density,
            standard_sizes: vec![new_material.standard_size],
            description: new_material.description,
        };
        tracing::info!("Material '{}' added with id {}", material.name, material.id);
        self.materials.push(material);
        Ok(&self.materials[self.materials.len() - 1])
    }

    pub fn create_project(&mut self, name: &str, description: &str) -> Result<&mut Project> {
        self.push_project(name, description, ProjectStatus::InDevelopment, Vec::new())
    }

    /// Creates a project from an imported component list. The project takes the
    /// file stem as its name.
    pub fn import_project(&mut self, file_name: &str, components: Vec<Component>) -> Result<&mut Project> {
        let stem = std::path::Path::new(file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file_name)
            .to_string();

        for component in &components {
            self.check_component(component)?;
        }

        let description = format!("Projeto importado do arquivo {}", file_name);
        self.push_project(&stem, &description, ProjectStatus::Imported, components)
    }

    fn push_project(
        &mut self,
        name: &str,
        description: &str,
        status: ProjectStatus,
        components: Vec<Component>,
    ) -> Result<&mut Project> {
        validate_non_empty_string("project.name", name)?;

        let project = Project {
            id: self.projects.len() as u32 + 1,
            name: name.trim().to_string(),
            description: description.to_string(),
            created_at: Local::now().format(CREATED_AT_FORMAT).to_string(),
            status,
            components,
            cutting_diagrams: Vec::new(),
        };
        tracing::info!("Project '{}' created with id {}", project.name, project.id);
        self.projects.push(project);
        let last = self.projects.len() - 1;
        Ok(&mut self.projects[last])
    }

    fn check_component(&self, component: &Component) -> Result<()> {
        component.validate()?;
        if self.material(component.material_id).is_none() {
            return Err(CutListError::not_found("Material", component.material_id));
        }
        Ok(())
    }

    pub fn add_component(&mut self, project_key: &str, component: Component) -> Result<&Project> {
        self.check_component(&component)?;
        let project = self.project_mut(project_key)?;
        tracing::debug!(
            "Adding component '{}' x{} to project '{}'",
            component.name,
            component.quantity,
            project.name
        );
        project.components.push(component);
        Ok(&*project)
    }

    /// Resolves a project by numeric id first, then by case-insensitive name.
    pub fn project(&self, key: &str) -> Result<&Project> {
        let index = self.project_index(key)?;
        Ok(&self.projects[index])
    }

    pub fn project_mut(&mut self, key: &str) -> Result<&mut Project> {
        let index = self.project_index(key)?;
        Ok(&mut self.projects[index])
    }

    fn project_index(&self, key: &str) -> Result<usize> {
        let key = key.trim();
        if let Ok(id) = key.parse::<u32>() {
            if let Some(index) = self.projects.iter().position(|p| p.id == id) {
                return Ok(index);
            }
        }
        self.projects
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(key))
            .ok_or_else(|| CutListError::not_found("Project", key))
    }

    /// The most recently created projects, oldest first.
    pub fn recent_projects(&self) -> &[Project] {
        let start = self.projects.len().saturating_sub(RECENT_PROJECTS);
        &self.projects[start..]
    }

    pub fn dashboard(&self) -> DashboardStats {
        DashboardStats {
            projects: self.projects.len(),
            components: self.projects.iter().map(|p| p.components.len()).sum(),
            materials: self.materials.len(),
            estimated_savings: self.projects.len() as f64 * SAVINGS_PER_PROJECT,
        }
    }
}

pub fn default_materials() -> Vec<Material> {
    vec![
        Material {
            id: 1,
            name: "MDF 15mm".to_string(),
            thickness: 15.0,
            price_per_unit: 80.00,
            price_unit: PriceUnit::SquareMeter,
            density: 750.0,
            standard_sizes: vec![SheetSize::new(2750.0, 1830.0), SheetSize::new(2440.0, 1220.0)],
            description: "MDF de média densidade, ideal para móveis".to_string(),
        },
        Material {
            id: 2,
            name: "Compensado 18mm".to_string(),
            thickness: 18.0,
            price_per_unit: 120.00,
            price_unit: PriceUnit::SquareMeter,
            density: 600.0,
            standard_sizes: vec![SheetSize::new(2200.0, 1600.0)],
            description: "Compensado multilaminado de alta qualidade".to_string(),
        },
        Material {
            id: 3,
            name: "Fita de Borda PVC".to_string(),
            thickness: 0.5,
            price_per_unit: 2.50,
            price_unit: PriceUnit::LinearMeter,
            density: 1400.0,
            standard_sizes: vec![SheetSize::new(50000.0, 22.0)],
            description: "Fita de borda PVC para acabamento".to_string(),
        },
        Material {
            id: 4,
            name: "Pinus 2x4".to_string(),
            thickness: 38.0,
            price_per_unit: 15.00,
            price_unit: PriceUnit::LinearMeter,
            density: 500.0,
            standard_sizes: vec![SheetSize::new(3000.0, 89.0)],
            description: "Madeira de pinus para estruturas".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shelf_component(name: &str, quantity: u32) -> Component {
        Component {
            name: name.to_string(),
            length: 570.0,
            width: 270.0,
            thickness: 15.0,
            quantity,
            material_id: 1,
        }
    }

    fn seeded() -> Workspace {
        let mut workspace = Workspace::new();
        workspace.seed_default_materials();
        workspace
    }

    #[test]
    fn test_seed_only_when_empty() {
        let mut workspace = seeded();
        assert_eq!(workspace.materials.len(), 4);
        workspace.materials.truncate(1);
        workspace.seed_default_materials();
        assert_eq!(workspace.materials.len(), 1);
    }

    #[test]
    fn test_project_ids_follow_insertion() {
        let mut workspace = seeded();
        let first = workspace.create_project("Estante", "Livros").unwrap().id;
        let second = workspace.create_project("Armário", "").unwrap().id;
        assert_eq!((first, second), (1, 2));
        assert_eq!(workspace.projects[0].status, ProjectStatus::InDevelopment);
    }

    #[test]
    fn test_empty_project_name_rejected() {
        let mut workspace = seeded();
        assert!(workspace.create_project("   ", "").is_err());
        assert!(workspace.projects.is_empty());
    }

    #[test]
    fn test_project_lookup_by_id_and_name() {
        let mut workspace = seeded();
        workspace.create_project("Estante de Livros", "").unwrap();
        assert_eq!(workspace.project("1").unwrap().name, "Estante de Livros");
        assert_eq!(workspace.project("estante de livros").unwrap().id, 1);
        assert!(matches!(
            workspace.project("Mesa"),
            Err(CutListError::NotFound { .. })
        ));
    }

    #[test]
    fn test_add_component_requires_known_material() {
        let mut workspace = seeded();
        workspace.create_project("Estante", "").unwrap();

        let mut component = shelf_component("Prateleira", 2);
        component.material_id = 42;
        assert!(workspace.add_component("Estante", component).is_err());

        let project = workspace
            .add_component("Estante", shelf_component("Prateleira", 2))
            .unwrap();
        assert_eq!(project.piece_count(), 2);
    }

    #[test]
    fn test_add_component_rejects_zero_quantity() {
        let mut workspace = seeded();
        workspace.create_project("Estante", "").unwrap();
        assert!(workspace
            .add_component("Estante", shelf_component("Fundo", 0))
            .is_err());
    }

    #[test]
    fn test_quantity_is_capped() {
        let mut workspace = seeded();
        workspace.create_project("Estante", "").unwrap();
        assert!(workspace
            .add_component("Estante", shelf_component("Cavilha", MAX_COMPONENT_QUANTITY))
            .is_ok());
        assert!(matches!(
            workspace.add_component("Estante", shelf_component("Cavilha", 4_000_000_000)),
            Err(CutListError::InvalidConfigValueError { .. })
        ));
        assert!(workspace
            .import_project("parafusos.csv", vec![shelf_component("Parafuso", MAX_COMPONENT_QUANTITY + 1)])
            .is_err());
        assert_eq!(workspace.project("Estante").unwrap().components.len(), 1);
    }

    #[test]
    fn test_import_uses_file_stem() {
        let mut workspace = seeded();
        let project = workspace
            .import_project("cozinha.csv", vec![shelf_component("Fundo", 1)])
            .unwrap();
        assert_eq!(project.name, "cozinha");
        assert_eq!(project.status, ProjectStatus::Imported);
        assert_eq!(project.description, "Projeto importado do arquivo cozinha.csv");
    }

    #[test]
    fn test_add_material_validates_and_assigns_id() {
        let mut workspace = seeded();
        let new_material = NewMaterial {
            name: "MDP 18mm".to_string(),
            thickness: 18.0,
            price_per_unit: 65.0,
            price_unit: PriceUnit::SquareMeter,
            density: 650.0,
            standard_size: SheetSize::new(2750.0, 1840.0),
            description: String::new(),
        };
        assert_eq!(workspace.add_material(new_material.clone()).unwrap().id, 5);

        let invalid = NewMaterial {
            price_per_unit: 0.0,
            ..new_material
        };
        assert!(workspace.add_material(invalid).is_err());
        assert_eq!(workspace.materials.len(), 5);
    }

    #[test]
    fn test_dashboard_and_recent_projects() {
        let mut workspace = seeded();
        for name in ["A", "B", "C", "D"] {
            workspace.create_project(name, "").unwrap();
        }
        workspace
            .add_component("A", shelf_component("Fundo", 3))
            .unwrap();

        let stats = workspace.dashboard();
        assert_eq!(stats.projects, 4);
        assert_eq!(stats.components, 1);
        assert_eq!(stats.materials, 4);
        assert_eq!(stats.estimated_savings, 600.0);

        let recent: Vec<&str> = workspace
            .recent_projects()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(recent, vec!["B", "C", "D"]);
    }
}
