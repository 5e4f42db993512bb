pub mod data_input_client;
pub mod http_fetcher;

pub use data_input_client::DataInputApiClient;
pub use http_fetcher::HttpPreviewFetcher;
