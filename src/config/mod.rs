pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use self::args::{CliConfig, Command, MaterialCommand, ProjectCommand, ReportCommand, SettingsCommand};

#[cfg(feature = "cli")]
mod args {
    use crate::core::optimizer::Algorithm;
    use crate::domain::model::PriceUnit;
    use crate::utils::error::Result;
    use crate::utils::validation::{validate_file_extension, validate_min, validate_path, Validate};
    use clap::{Parser, Subcommand};

    #[derive(Debug, Clone, Parser)]
    #[command(name = "cutlist")]
    #[command(version, about = "Cut-list optimization and cost estimates for woodworking panels")]
    pub struct CliConfig {
        /// Workspace document holding projects and materials
        #[arg(long, global = true, default_value = "cutlist.json")]
        pub workspace: String,

        #[arg(long, global = true, default_value = "cutlist.toml")]
        pub settings: String,

        /// Directory for generated reports
        #[arg(long, global = true, default_value = "./output")]
        pub output: String,

        #[arg(short, long, global = true, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, global = true, help = "Log CPU and memory usage per phase")]
        pub monitor: bool,

        #[arg(long, global = true, help = "Emit logs as JSON lines on stderr")]
        pub log_json: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Totals and the most recent projects
        Dashboard,
        #[command(subcommand)]
        Material(MaterialCommand),
        #[command(subcommand)]
        Project(ProjectCommand),
        /// Optimize a project's cuts and write its report bundle
        Plan {
            project: String,
            #[arg(long)]
            algorithm: Option<Algorithm>,
            /// Saw kerf in millimetres
            #[arg(long)]
            kerf: Option<f64>,
            #[arg(long)]
            allow_rotation: bool,
        },
        #[command(subcommand)]
        Report(ReportCommand),
        /// Write a JSON backup of the whole workspace
        Export,
        #[command(subcommand)]
        Settings(SettingsCommand),
        /// Check a requirements manifest
        LintManifest { path: String },
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum MaterialCommand {
        List,
        Add {
            #[arg(long)]
            name: String,
            #[arg(long)]
            thickness: f64,
            #[arg(long)]
            price: f64,
            /// m2, m3, m or piece
            #[arg(long, default_value = "m2")]
            price_unit: PriceUnit,
            /// kg/m³
            #[arg(long)]
            density: f64,
            #[arg(long, default_value_t = 2750.0)]
            width: f64,
            #[arg(long, default_value_t = 1830.0)]
            height: f64,
            #[arg(long, default_value = "")]
            description: String,
        },
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum ProjectCommand {
        New {
            name: String,
            #[arg(long, default_value = "")]
            description: String,
        },
        List,
        Show {
            project: String,
        },
        AddComponent {
            project: String,
            #[arg(long)]
            name: String,
            #[arg(long)]
            length: f64,
            #[arg(long)]
            width: f64,
            #[arg(long)]
            thickness: f64,
            #[arg(long, default_value_t = 1)]
            quantity: u32,
            /// Material id, see `material list`
            #[arg(long)]
            material: u32,
        },
        /// Create a project from a component CSV
        Import {
            file: String,
        },
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum ReportCommand {
        Parts { project: String },
        Cost { project: String },
        Diagram { project: String },
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum SettingsCommand {
        Show,
        /// Write the default settings file
        Init {
            #[arg(long)]
            force: bool,
        },
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_path("workspace", &self.workspace)?;
            validate_file_extension("workspace", &self.workspace, &["json"])?;
            validate_path("settings", &self.settings)?;
            validate_file_extension("settings", &self.settings, &["toml"])?;
            validate_path("output", &self.output)?;

            match &self.command {
                Command::Plan {
                    kerf: Some(kerf), ..
                } => validate_min("kerf", *kerf, 0.0)?,
                Command::Project(ProjectCommand::Import { file }) => {
                    validate_file_extension("file", file, &["csv"])?
                }
                _ => {}
            }
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_plan_command() {
            let config = CliConfig::parse_from([
                "cutlist",
                "plan",
                "Estante",
                "--algorithm",
                "guillotine",
                "--kerf",
                "4",
                "-v",
            ]);
            assert!(config.verbose);
            assert_eq!(config.workspace, "cutlist.json");
            match config.command {
                Command::Plan {
                    project,
                    algorithm,
                    kerf,
                    allow_rotation,
                } => {
                    assert_eq!(project, "Estante");
                    assert_eq!(algorithm, Some(Algorithm::GuillotineSplit));
                    assert_eq!(kerf, Some(4.0));
                    assert!(!allow_rotation);
                }
                other => panic!("unexpected command: {:?}", other),
            }
        }

        #[test]
        fn test_parse_material_add() {
            let config = CliConfig::parse_from([
                "cutlist",
                "material",
                "add",
                "--name",
                "OSB 12mm",
                "--thickness",
                "12",
                "--price",
                "32.5",
                "--price-unit",
                "m2",
                "--density",
                "620",
            ]);
            match config.command {
                Command::Material(MaterialCommand::Add {
                    price_unit, width, ..
                }) => {
                    assert_eq!(price_unit, PriceUnit::SquareMeter);
                    assert_eq!(width, 2750.0);
                }
                other => panic!("unexpected command: {:?}", other),
            }
        }

        #[test]
        fn test_validate_rejects_bad_paths() {
            let config = CliConfig::parse_from(["cutlist", "--workspace", "shop.yaml", "dashboard"]);
            assert!(config.validate().is_err());

            let config = CliConfig::parse_from(["cutlist", "project", "import", "parts.xlsx"]);
            assert!(config.validate().is_err());

            let config = CliConfig::parse_from(["cutlist", "plan", "Mesa", "--kerf=-1"]);
            assert!(config.validate().is_err());

            let config = CliConfig::parse_from(["cutlist", "project", "list"]);
            assert!(config.validate().is_ok());
        }
    }
}
