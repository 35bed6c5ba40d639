use crate::core::cost::CostFactors;
use crate::core::optimizer::{Algorithm, OptimizerSettings, DEFAULT_KERF_MM};
use crate::core::{ConfigProvider, ReportFormat};
use crate::utils::error::{CutListError, Result};
use crate::utils::format::{Currency, LengthUnit};
use crate::utils::validation::{
    validate_min, validate_non_empty_string, validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Contents of `cutlist.toml`. Every section and key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub cutting: CuttingSettings,
    pub costs: CostSettings,
    pub reports: ReportSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    pub language: String,
    pub currency: Currency,
    pub unit: LengthUnit,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            language: "pt-BR".to_string(),
            currency: Currency::default(),
            unit: LengthUnit::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CuttingSettings {
    pub kerf_mm: f64,
    pub algorithm: Algorithm,
    pub allow_rotation: bool,
    /// 0 favours speed, 100 favours sheet utilization.
    pub optimization_priority: u8,
}

impl Default for CuttingSettings {
    fn default() -> Self {
        Self {
            kerf_mm: DEFAULT_KERF_MM,
            algorithm: Algorithm::default(),
            allow_rotation: false,
            optimization_priority: 85,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostSettings {
    pub waste_percent: f64,
    pub labor_percent: f64,
    pub overhead_percent: f64,
    pub profit_percent: f64,
}

impl Default for CostSettings {
    fn default() -> Self {
        let factors = CostFactors::default();
        Self {
            waste_percent: factors.waste_percent,
            labor_percent: factors.labor_percent,
            overhead_percent: factors.overhead_percent,
            profit_percent: factors.profit_percent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub default_format: ReportFormat,
    pub include_diagrams: bool,
    pub include_cost_breakdown: bool,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            default_format: ReportFormat::default(),
            include_diagrams: true,
            include_cost_breakdown: true,
        }
    }
}

impl Settings {
    /// Loads settings from a TOML file. A missing file yields the defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(CutListError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        toml::from_str(&processed_content).map_err(CutListError::TomlError)
    }

    /// Replaces `${VAR}` with the value of the environment variable, leaving
    /// unknown variables untouched.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CutListError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CutListError::ConfigError {
            message: format!("cannot serialize settings: {}", e),
        })
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("general.language", &self.general.language)?;
        validate_min("cutting.kerf_mm", self.cutting.kerf_mm, 0.0)?;
        validate_range(
            "cutting.optimization_priority",
            self.cutting.optimization_priority,
            0,
            100,
        )?;
        validate_range("costs.waste_percent", self.costs.waste_percent, 0.0, 50.0)?;
        validate_range("costs.labor_percent", self.costs.labor_percent, 0.0, 100.0)?;
        validate_range("costs.overhead_percent", self.costs.overhead_percent, 0.0, 100.0)?;
        validate_range("costs.profit_percent", self.costs.profit_percent, 0.0, 100.0)?;
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn optimizer_settings(&self) -> OptimizerSettings {
        OptimizerSettings {
            algorithm: self.cutting.algorithm,
            kerf: self.cutting.kerf_mm,
            allow_rotation: self.cutting.allow_rotation,
        }
    }

    fn cost_factors(&self) -> CostFactors {
        CostFactors {
            waste_percent: self.costs.waste_percent,
            labor_percent: self.costs.labor_percent,
            overhead_percent: self.costs.overhead_percent,
            profit_percent: self.costs.profit_percent,
        }
    }

    fn currency(&self) -> Currency {
        self.general.currency
    }

    fn length_unit(&self) -> LengthUnit {
        self.general.unit
    }

    fn report_format(&self) -> ReportFormat {
        self.reports.default_format
    }

    fn include_diagrams(&self) -> bool {
        self.reports.include_diagrams
    }

    fn include_cost_breakdown(&self) -> bool {
        self.reports.include_cost_breakdown
    }
}
