// Market data adapters
pub mod alpha_vantage;
pub mod csv_parser;
pub mod market_data;

pub use alpha_vantage::AlphaVantageClient;
pub use csv_parser::CsvBarSource;
pub use market_data::MarketDataProvider;
