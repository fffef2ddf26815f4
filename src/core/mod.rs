pub mod fetcher;
pub mod lookup;
pub mod normalizer;
pub mod race;

pub use crate::domain::model::{Address, Cep, LookupOutcome, Provider, RawProviderResponse};
pub use crate::domain::ports::{ConfigProvider, HttpTransport};
pub use crate::utils::error::Result;
