//! Chart configuration loaded from JSON

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{boxplot, config::CONFIG_FILE, layout};
use crate::error::{ChartError, Result};
use crate::spc::SpcDomainConfig;
use crate::state::{Margin, ZoomLimits};

/// Tunable chart settings. Every field falls back to its default when
/// missing from the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Inset between the axis lines and the outermost data points
    pub data_margin: f64,

    /// IQR multiplier for box-plot whiskers
    pub outlier_multiplier: f64,

    /// Band padding of the variability view
    pub band_padding: f64,

    pub spc: SpcDomainConfig,

    /// Zoom-level bounds; `None` lets wheel zoom run unbounded
    pub zoom_limits: Option<ZoomLimits>,

    pub timeline_margin: Margin,
    pub variability_margin: Margin,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            data_margin: layout::DATA_MARGIN,
            outlier_multiplier: boxplot::DEFAULT_OUTLIER_MULTIPLIER,
            band_padding: boxplot::BAND_PADDING,
            spc: SpcDomainConfig::default(),
            zoom_limits: Some(ZoomLimits::default()),
            timeline_margin: Margin::timeline(),
            variability_margin: Margin::variability(),
        }
    }
}

impl ChartConfig {
    /// Read and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: ChartConfig = serde_json::from_str(&content)
            .map_err(|e| ChartError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate();
        tracing::debug!(path = %path.display(), "loaded chart config");
        Ok(config)
    }

    /// Load `path` if given, else `spc-oxide.json` in the working directory
    /// when present, else the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(CONFIG_FILE).exists() => Self::load(Path::new(CONFIG_FILE)),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Validate and clamp configuration values
    pub fn validate(&mut self) {
        self.data_margin = self.data_margin.clamp(0.0, 200.0);
        self.outlier_multiplier = self.outlier_multiplier.clamp(0.5, 5.0);
        self.band_padding = self.band_padding.clamp(0.0, 0.9);

        self.spc.limit_multiplier = self.spc.limit_multiplier.clamp(1.0, 10.0);
        self.spc.std_dev_multiplier = self.spc.std_dev_multiplier.clamp(1.0, 10.0);

        if let Some(limits) = self.zoom_limits.as_mut() {
            limits.min = limits.min.clamp(0.01, 1.0);
            limits.max = limits.max.clamp(1.0, 1000.0);
        }

        for margin in [&mut self.timeline_margin, &mut self.variability_margin] {
            margin.top = margin.top.max(0.0);
            margin.right = margin.right.max(0.0);
            margin.bottom = margin.bottom.max(0.0);
            margin.left = margin.left.max(0.0);
        }
    }
}
