// Feature layouts, scalers and fit metrics shared by both models
pub mod feature_registry;
pub mod metrics;
pub mod scaler;

pub use metrics::InSampleFit;
pub use scaler::{MinMaxScaler, StandardScaler};
