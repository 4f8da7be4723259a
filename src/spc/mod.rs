//! Statistical process control: limits and Y-domain derivation

pub mod domain;
pub mod limits;

pub use domain::{SpcDomainConfig, population_std_dev, spc_domain, validate_domain};
pub use limits::{SpcLimitRecord, SpcLimits, latest_for_chart, load_limits};
