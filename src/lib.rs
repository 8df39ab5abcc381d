// src/lib.rs
pub mod clock;
pub mod config;
pub mod ctl;
pub mod settings;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::AppConfig;
pub use settings::{Dict, MigrationReport, Scalar, SettingsError, SettingsStore, Value};
