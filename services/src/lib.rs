pub mod cli;
pub mod config;
pub mod error;
pub mod geoparquet;
pub mod logging;
pub mod output;
pub mod points;
pub mod validator;

pub use vectorgrid_datatypes::test_data;
