pub mod report;
pub mod view_models;
