//! Statistics module - domain models, services, and traits.

mod statistics_model;
mod statistics_service;
mod statistics_traits;


pub use statistics_model::{
    CascadeDeleteResult, NewStatistic, Statistic, StatisticUpdate, Visibility,
};
pub use statistics_service::StatisticService;
pub use statistics_traits::{StatisticRepositoryTrait, StatisticServiceTrait};
