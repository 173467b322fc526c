use mitma_core::RegionId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IndicatorError {
    /// The region's population rows sum to zero, so `q` is undefined.
    #[error("region {region} has no sampled population")]
    DegenerateRegion { region: RegionId },
}

pub type IndicatorResult<T> = Result<T, IndicatorError>;
