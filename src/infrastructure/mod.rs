pub mod artifact_store;
pub mod core;
pub mod csv_bars;
pub mod mock;
pub mod yahoo;

pub use artifact_store::FileArtifactStore;
pub use csv_bars::CsvBarProvider;
pub use mock::{InMemoryArtifactStore, MockMarketDataProvider};
pub use yahoo::YahooMarketDataProvider;
