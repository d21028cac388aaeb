//! OpsFlow Rust Library
//!
//! Capa de aplicación sobre `ops-core` y `ops-adapters`:
//! - `config`: `AppConfig` desde variables de entorno / `.env`.
//! - `errors`: error de nivel superior con su código de salida.
//! - `runner`: lectura del request, cableado HTTP y ejecución de playbooks.
//!
//! El binario `opsflow` es un envoltorio fino sobre `runner`.

pub mod config;
pub mod errors;
pub mod runner;

pub use config::AppConfig;
pub use errors::AppError;
