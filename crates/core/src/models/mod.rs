pub mod asset;
pub mod chart;
pub mod history;
pub mod overview;
pub mod query;
pub mod settings;
