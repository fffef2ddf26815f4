pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::http::ReqwestTransport;
pub use crate::core::{lookup::CepLookup, race::RaceCoordinator};
pub use domain::model::{Address, Arbitration, Cep, LookupResult, Provider};
pub use utils::error::{CepError, Result};
