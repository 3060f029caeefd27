pub mod constants;
pub mod profile;

pub use profile::{ColumnMapping, Config, EmailSettings, Profile};
