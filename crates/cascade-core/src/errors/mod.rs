//! Error handling for Cascade.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod cascade_error;
pub mod config_error;
pub mod data_error;
pub mod graph_error;
pub mod model_error;
pub mod persist_error;

pub use cascade_error::{CascadeError, CascadeResult};
pub use config_error::ConfigError;
pub use data_error::DataError;
pub use graph_error::GraphError;
pub use model_error::ModelError;
pub use persist_error::PersistError;
