//! Area data module - geo-indexed value rows.

mod area_data_model;
mod area_data_traits;

pub use area_data_model::{normalize_area_values, AreaDataRow, BoundaryType};
pub use area_data_traits::AreaDataRepositoryTrait;
