use chrono::Local;
use clap::Parser;
use cutlist_pro::app::import::components_from_csv;
use cutlist_pro::app::reports::{self, backup, csv_report, svg_diagram};
use cutlist_pro::config::{Command, MaterialCommand, ProjectCommand, ReportCommand, SettingsCommand};
use cutlist_pro::core::cost::CostCalculator;
use cutlist_pro::core::manifest;
use cutlist_pro::core::optimizer::CuttingOptimizer;
use cutlist_pro::core::{ConfigProvider, PlanInput, Storage};
use cutlist_pro::domain::model::{Component, SheetSize};
use cutlist_pro::domain::workspace::NewMaterial;
use cutlist_pro::utils::error::ErrorSeverity;
use cutlist_pro::utils::{logger, validation::Validate};
use cutlist_pro::{
    CliConfig, CutListEngine, CutListError, CuttingPipeline, LocalStorage, Result, Settings,
    Workspace,
};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if config.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    if let Err(e) = run(config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(config: CliConfig) -> Result<()> {
    // commands that never touch the workspace
    match &config.command {
        Command::LintManifest { path } => return lint_manifest(path, config.verbose),
        Command::Settings(command) => return settings_command(&config.settings, command),
        _ => {}
    }

    let settings = Settings::from_file(&config.settings)?;
    settings.validate()?;

    let (workspace_storage, workspace_key) = LocalStorage::for_file(&config.workspace);
    let mut workspace = Workspace::load(&workspace_storage, &workspace_key).await?;
    workspace.seed_default_materials();

    let output = LocalStorage::new(&config.output);

    let changed = match config.command {
        Command::Dashboard => {
            print_dashboard(&workspace, &settings);
            false
        }
        Command::Material(command) => material_command(&mut workspace, &settings, command)?,
        Command::Project(command) => project_command(&mut workspace, &settings, command).await?,
        Command::Plan {
            project,
            algorithm,
            kerf,
            allow_rotation,
        } => {
            let mut settings = settings;
            if let Some(algorithm) = algorithm {
                settings.cutting.algorithm = algorithm;
            }
            if let Some(kerf) = kerf {
                settings.cutting.kerf_mm = kerf;
            }
            settings.cutting.allow_rotation |= allow_rotation;
            plan(&mut workspace, settings, output, &project, config.monitor).await?;
            true
        }
        Command::Report(command) => {
            report_command(&workspace, &settings, &output, command).await?;
            false
        }
        Command::Export => {
            let name = backup::backup_file_name(Local::now());
            output.write_file(&name, &backup::backup_json(&workspace)?).await?;
            println!("✅ Backup written to {}", output.location(&name));
            false
        }
        Command::LintManifest { .. } | Command::Settings(_) => false,
    };

    if changed {
        workspace.save(&workspace_storage, &workspace_key).await?;
    }
    Ok(())
}

fn print_dashboard(workspace: &Workspace, settings: &Settings) {
    let stats = workspace.dashboard();
    println!("📊 CutList Pro");
    println!("   Projects:          {}", stats.projects);
    println!("   Components:        {}", stats.components);
    println!("   Materials:         {}", stats.materials);
    println!(
        "   Estimated savings: {}",
        settings.currency().format(stats.estimated_savings)
    );

    let recent = workspace.recent_projects();
    if recent.is_empty() {
        println!("\nNo projects yet. Create one with `cutlist project new <name>`.");
        return;
    }
    println!("\nRecent projects:");
    for project in recent {
        println!(
            "   #{} {} [{}] {} component(s), created {}",
            project.id,
            project.name,
            project.status,
            project.components.len(),
            project.created_at
        );
    }
}

fn material_command(
    workspace: &mut Workspace,
    settings: &Settings,
    command: MaterialCommand,
) -> Result<bool> {
    match command {
        MaterialCommand::List => {
            for material in &workspace.materials {
                println!(
                    "#{} {} ({}mm) {}/{} sheet {}",
                    material.id,
                    material.name,
                    material.thickness,
                    settings.currency().format(material.price_per_unit),
                    material.price_unit,
                    material.primary_sheet()
                );
            }
            Ok(false)
        }
        MaterialCommand::Add {
            name,
            thickness,
            price,
            price_unit,
            density,
            width,
            height,
            description,
        } => {
            let material = workspace.add_material(NewMaterial {
                name,
                thickness,
                price_per_unit: price,
                price_unit,
                density,
                standard_size: SheetSize::new(width, height),
                description,
            })?;
            println!("✅ Material '{}' added with id {}", material.name, material.id);
            Ok(true)
        }
    }
}

async fn project_command(
    workspace: &mut Workspace,
    settings: &Settings,
    command: ProjectCommand,
) -> Result<bool> {
    match command {
        ProjectCommand::New { name, description } => {
            let project = workspace.create_project(&name, &description)?;
            println!("✅ Project '{}' created with id {}", project.name, project.id);
            Ok(true)
        }
        ProjectCommand::List => {
            if workspace.projects.is_empty() {
                println!("No projects yet.");
            }
            for project in &workspace.projects {
                println!(
                    "#{} {} [{}] {} component(s), {} piece(s), created {}",
                    project.id,
                    project.name,
                    project.status,
                    project.components.len(),
                    project.piece_count(),
                    project.created_at
                );
            }
            Ok(false)
        }
        ProjectCommand::Show { project } => {
            show_project(workspace, settings, &project)?;
            Ok(false)
        }
        ProjectCommand::AddComponent {
            project,
            name,
            length,
            width,
            thickness,
            quantity,
            material,
        } => {
            let updated = workspace.add_component(
                &project,
                Component {
                    name,
                    length,
                    width,
                    thickness,
                    quantity,
                    material_id: material,
                },
            )?;
            println!(
                "✅ Component added, '{}' now has {} component(s)",
                updated.name,
                updated.components.len()
            );
            Ok(true)
        }
        ProjectCommand::Import { file } => {
            let (storage, key) = LocalStorage::for_file(&file);
            let components = components_from_csv(&storage.read_file(&key).await?)?;
            let project = workspace.import_project(&key, components)?;
            println!(
                "✅ Imported '{}' with {} component(s), id {}",
                project.name,
                project.components.len(),
                project.id
            );
            Ok(true)
        }
    }
}

fn show_project(workspace: &Workspace, settings: &Settings, key: &str) -> Result<()> {
    let project = workspace.project(key)?;
    let unit = settings.length_unit();

    println!("#{} {} [{}]", project.id, project.name, project.status);
    if !project.description.is_empty() {
        println!("{}", project.description);
    }
    println!("Created {}\n", project.created_at);

    for component in &project.components {
        let material = workspace
            .material(component.material_id)
            .map(|m| m.name.as_str())
            .unwrap_or("?");
        println!(
            "   {} x{}: {} x {} x {} ({})",
            component.name,
            component.quantity,
            unit.format(component.length),
            unit.format(component.width),
            unit.format(component.thickness),
            material
        );
    }

    let estimate = CostCalculator::new(settings.cost_factors()).estimate(project, &workspace.materials);
    println!("\nEstimated total: {}", settings.currency().format(estimate.total_cost));

    for (index, diagram) in project.cutting_diagrams.iter().enumerate() {
        println!(
            "   Sheet {} ({}): {} piece(s), {:.1}% used",
            index + 1,
            diagram.sheet(),
            diagram.pieces.len(),
            diagram.utilization
        );
    }
    Ok(())
}

async fn plan(
    workspace: &mut Workspace,
    settings: Settings,
    output: LocalStorage,
    key: &str,
    monitor: bool,
) -> Result<()> {
    let currency = settings.currency();
    let input = PlanInput {
        project: workspace.project(key)?.clone(),
        materials: workspace.materials.clone(),
    };

    let pipeline = CuttingPipeline::new(output, settings, input);
    let engine = CutListEngine::new_with_monitoring(pipeline, monitor);
    let (result, output_path) = engine.run().await?;

    for plan in &result.plans {
        println!(
            "   {}: {} sheet(s), {:.1}% used ({})",
            plan.material_name,
            plan.sheets.len(),
            plan.overall_utilization(),
            plan.algorithm
        );
        if !plan.unplaced.is_empty() {
            println!("   ⚠️  Not placed: {}", plan.unplaced.join(", "));
        }
    }
    println!("   Estimated total: {}", currency.format(result.estimate.total_cost));
    println!("✅ Cutting plan completed!");
    println!("📁 Output saved to: {}", output_path);

    *workspace.project_mut(key)? = result.project;
    Ok(())
}

async fn report_command(
    workspace: &Workspace,
    settings: &Settings,
    output: &LocalStorage,
    command: ReportCommand,
) -> Result<()> {
    let mut files = Vec::new();

    match command {
        ReportCommand::Parts { project } => {
            let project = workspace.project(&project)?;
            let csv = csv_report::parts_list_csv(project, &workspace.materials)?;
            files.push((reports::parts_list_file(&project.name), csv));
        }
        ReportCommand::Cost { project } => {
            let project = workspace.project(&project)?;
            let factors = settings.cost_factors();
            let estimate = CostCalculator::new(factors).estimate(project, &workspace.materials);
            let csv = csv_report::cost_estimate_csv(
                &estimate,
                &factors,
                settings.include_cost_breakdown(),
            )?;
            println!("Estimated total: {}", settings.currency().format(estimate.total_cost));
            files.push((reports::cost_estimate_file(&project.name), csv));
        }
        ReportCommand::Diagram { project } => {
            let project = workspace.project(&project)?;
            let optimizer = CuttingOptimizer::new(settings.optimizer_settings());
            for plan in optimizer.plan_project(project, &workspace.materials)? {
                for (index, sheet) in plan.sheets.iter().enumerate() {
                    files.push((
                        reports::diagram_file(&project.name, &plan.material_name, index + 1),
                        svg_diagram::render_svg(sheet),
                    ));
                }
            }
            if files.is_empty() {
                return Err(CutListError::validation(format!(
                    "project '{}' has nothing to draw",
                    project.name
                )));
            }
        }
    }

    for (name, content) in files {
        output.write_file(&name, content.as_bytes()).await?;
        println!("📁 {}", output.location(&name));
    }
    Ok(())
}

fn settings_command(path: &str, command: &SettingsCommand) -> Result<()> {
    match command {
        SettingsCommand::Show => {
            let settings = Settings::from_file(path)?;
            settings.validate()?;
            print!("{}", settings.to_toml_string()?);
        }
        SettingsCommand::Init { force } => {
            if std::path::Path::new(path).exists() && !force {
                return Err(CutListError::ConfigError {
                    message: format!("{} already exists, pass --force to overwrite it", path),
                });
            }
            std::fs::write(path, Settings::default().to_toml_string()?)?;
            println!("✅ Default settings written to {}", path);
        }
    }
    Ok(())
}

fn lint_manifest(path: &str, verbose: bool) -> Result<()> {
    let report = manifest::lint(&manifest::load_manifest(path)?);

    for finding in &report.findings {
        if verbose || finding.level > manifest::LintLevel::Info {
            println!("{}", finding);
        }
    }
    println!(
        "{} requirement(s) in {} section(s): {} error(s), {} warning(s)",
        report.requirement_count,
        report.section_count,
        report.count(manifest::LintLevel::Error),
        report.count(manifest::LintLevel::Warning)
    );

    if report.passed() {
        Ok(())
    } else {
        Err(CutListError::ManifestError {
            message: format!("{} has invalid requirement lines", path),
        })
    }
}
