//! Chart-wide constants and default values
//!
//! These numbers are part of the contract with the rendering host: a chart
//! drawn with different values will not line up with one drawn by another
//! host. Everything tunable is mirrored in [`crate::config::ChartConfig`].

/// Statistical Process Control (SPC) defaults
pub mod spc {
    /// Multiplier applied to the |UCL - CL| and |LCL - CL| distances
    pub const LIMIT_MULTIPLIER: f64 = 2.0;

    /// Multiplier applied to the cross-entity standard deviation when a limit is missing
    pub const STD_DEV_MULTIPLIER: f64 = 4.0;

    /// Relative padding used when repairing a collapsed domain
    pub const REPAIR_PADDING_RATIO: f64 = 0.1;

    /// Minimum absolute padding used when repairing a collapsed domain
    pub const REPAIR_MIN_PADDING: f64 = 1.0;

    /// Domain returned when a computed domain is not finite
    pub const FALLBACK_DOMAIN: [f64; 2] = [0.0, 1.0];
}

/// Box plot defaults
pub mod boxplot {
    /// IQR multiplier for whisker bounds and outlier classification
    pub const DEFAULT_OUTLIER_MULTIPLIER: f64 = 1.5;

    /// Inner padding of the categorical band scale
    pub const BAND_PADDING: f64 = 0.2;
}

/// Zoom interaction defaults
pub mod zoom {
    /// Domain scale factor per wheel notch
    pub const WHEEL_FACTOR: f64 = 1.2;

    /// Smallest zoom level a host policy accepts (zoomed out 10x)
    pub const MIN_ZOOM: f64 = 0.1;

    /// Largest zoom level a host policy accepts
    pub const MAX_ZOOM: f64 = 50.0;
}

/// Plot area layout defaults
pub mod layout {
    /// Inner margin between the axis lines and the first/last data point
    pub const DATA_MARGIN: f64 = 30.0;

    /// Width of the wheel-zoom strip to the right of the plot (secondary Y axis)
    pub const Y2_ZOOM_WIDTH: f64 = 85.0;

    /// Default outer margins of the timeline chart
    pub const TIMELINE_MARGIN_TOP: f64 = 60.0;
    pub const TIMELINE_MARGIN_RIGHT: f64 = 200.0;
    pub const TIMELINE_MARGIN_BOTTOM: f64 = 60.0;
    pub const TIMELINE_MARGIN_LEFT: f64 = 70.0;

    /// Default outer margins of the variability chart
    pub const VARIABILITY_MARGIN_TOP: f64 = 20.0;
    pub const VARIABILITY_MARGIN_RIGHT: f64 = 50.0;
    pub const VARIABILITY_MARGIN_BOTTOM: f64 = 80.0;
    pub const VARIABILITY_MARGIN_LEFT: f64 = 80.0;
}

/// Scale construction defaults
pub mod scale {
    /// Target tick count used when rounding a domain to nice values
    pub const DEFAULT_TICK_COUNT: usize = 10;

    /// Upper bound on nice-rounding iterations
    pub const MAX_NICE_ITERATIONS: usize = 10;

    /// Relative padding applied to a degenerate numeric domain
    pub const DEGENERATE_PADDING_RATIO: f64 = 0.1;

    /// Minimum absolute padding applied to a degenerate numeric domain
    pub const DEGENERATE_MIN_PADDING: f64 = 1.0;

    /// Padding applied on each side of a degenerate time domain, in milliseconds
    pub const DEGENERATE_TIME_PADDING_MS: i64 = 3_600_000;

    /// Domain used when there is no data to measure
    pub const EMPTY_EXTENT: [f64; 2] = [0.0, 1.0];
}

/// Calendar durations in milliseconds, as used to pick a time interval
pub mod duration {
    pub const SECOND: f64 = 1_000.0;
    pub const MINUTE: f64 = SECOND * 60.0;
    pub const HOUR: f64 = MINUTE * 60.0;
    pub const DAY: f64 = HOUR * 24.0;
    pub const WEEK: f64 = DAY * 7.0;
    pub const MONTH: f64 = DAY * 30.0;
    pub const YEAR: f64 = DAY * 365.0;
}

/// Configuration file paths
pub mod config {
    /// Configuration file name looked up by the CLI
    pub const CONFIG_FILE: &str = "spc-oxide.json";
}
