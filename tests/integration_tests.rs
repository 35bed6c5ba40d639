use anyhow::Result;
use cutlist_pro::app::import::components_from_csv;
use cutlist_pro::core::optimizer::Algorithm;
use cutlist_pro::core::{ConfigProvider, PlanInput, ReportFormat};
use cutlist_pro::domain::model::{Component, ProjectStatus};
use cutlist_pro::{CutListEngine, CuttingPipeline, LocalStorage, Settings, Workspace};
use std::io::Read;
use tempfile::TempDir;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/estante.csv");

fn component(name: &str, length: f64, width: f64, quantity: u32, material_id: u32) -> Component {
    Component {
        name: name.to_string(),
        length,
        width,
        thickness: 15.0,
        quantity,
        material_id,
    }
}

#[tokio::test]
async fn test_workspace_round_trip() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = LocalStorage::new(temp_dir.path());

    let mut workspace = Workspace::load(&storage, "cutlist.json").await?;
    assert!(workspace.projects.is_empty());
    workspace.seed_default_materials();

    workspace.create_project("Mesa de Centro", "Sala")?;
    workspace.add_component("mesa de centro", component("Tampo", 900.0, 500.0, 1, 1))?;
    workspace.add_component("1", component("Perna", 400.0, 60.0, 4, 2))?;
    workspace.save(&storage, "cutlist.json").await?;

    let reloaded = Workspace::load(&storage, "cutlist.json").await?;
    assert_eq!(reloaded, workspace);
    assert_eq!(reloaded.project("Mesa de Centro")?.piece_count(), 5);
    assert_eq!(reloaded.dashboard().components, 2);
    Ok(())
}

#[tokio::test]
async fn test_import_and_plan_end_to_end() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output = LocalStorage::new(temp_dir.path().join("output"));

    let mut workspace = Workspace::new();
    workspace.seed_default_materials();
    let components = components_from_csv(&std::fs::read(FIXTURE)?)?;
    let project = workspace.import_project("estante.csv", components)?.clone();
    assert_eq!(project.name, "estante");
    assert_eq!(project.status, ProjectStatus::Imported);

    let settings = Settings::from_toml_str(
        r#"
[cutting]
algorithm = "guillotine-split"
allow_rotation = true
"#,
    )?;
    let input = PlanInput {
        project,
        materials: workspace.materials.clone(),
    };
    let engine = CutListEngine::new(CuttingPipeline::new(output, settings, input));
    let (result, output_path) = engine.run().await?;

    assert!(output_path.ends_with("estante_cutlist.zip"));
    assert_eq!(result.project.status, ProjectStatus::Planned);
    assert_eq!(result.plans.len(), 2);
    for plan in &result.plans {
        assert_eq!(plan.algorithm, Algorithm::GuillotineSplit.to_string());
        assert!(plan.unplaced.is_empty());
        for sheet in &plan.sheets {
            assert!((sheet.utilization + sheet.waste - 100.0).abs() < 1e-6);
        }
    }
    let placed: usize = result
        .plans
        .iter()
        .flat_map(|p| &p.sheets)
        .map(|s| s.pieces.len())
        .sum();
    assert_eq!(placed, 8);
    assert!(result.estimate.total_cost > result.estimate.material_cost);

    let zip_data = std::fs::read(temp_dir.path().join("output/estante_cutlist.zip"))?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data))?;
    let file_names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).map(|f| f.name().to_string()))
        .collect::<std::result::Result<_, _>>()?;
    assert!(file_names.contains(&"parts_list_estante.csv".to_string()));
    assert!(file_names.contains(&"diagram_estante_mdf_15mm_1.svg".to_string()));
    assert!(file_names.contains(&"diagram_estante_compensado_18mm_1.svg".to_string()));

    let mut parts = String::new();
    archive.by_name("parts_list_estante.csv")?.read_to_string(&mut parts)?;
    assert!(parts.starts_with("name,material_name,length,width,thickness,quantity,area_m2,cost"));
    assert!(parts.contains("Prateleira,MDF 15mm"));
    Ok(())
}

#[tokio::test]
async fn test_plan_writes_loose_files_from_settings_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let settings_path = temp_dir.path().join("cutlist.toml");
    std::fs::write(
        &settings_path,
        "[reports]\ndefault_format = \"files\"\ninclude_diagrams = false\n",
    )?;
    let settings = Settings::from_file(&settings_path)?;
    assert_eq!(settings.report_format(), ReportFormat::Files);

    let mut workspace = Workspace::new();
    workspace.seed_default_materials();
    workspace.create_project("Nicho", "")?;
    workspace.add_component("Nicho", component("Lateral", 400.0, 250.0, 2, 1))?;

    let input = PlanInput {
        project: workspace.project("Nicho")?.clone(),
        materials: workspace.materials.clone(),
    };
    let output = LocalStorage::new(temp_dir.path());
    let (_, output_path) = CutListEngine::new(CuttingPipeline::new(output, settings, input))
        .run()
        .await?;

    assert!(output_path.ends_with("nicho"));
    let dir = temp_dir.path().join("nicho");
    assert!(dir.join("parts_list_nicho.csv").exists());
    assert!(dir.join("cost_estimate_nicho.csv").exists());
    assert!(dir.join("plan_summary.json").exists());
    assert!(!temp_dir.path().join("nicho_cutlist.zip").exists());
    Ok(())
}
