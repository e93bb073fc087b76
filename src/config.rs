use std::env;
use std::path::{Path, PathBuf};

pub const DATABASE_VAR: &str = "ROSTER_DATABASE";
pub const IMPORT_FILE_VAR: &str = "ROSTER_IMPORT_FILE";

const DEFAULT_DATABASE: &str = "employees.db";
const DEFAULT_IMPORT_FILE: &str = "employees.csv";

/// Locations the roster works against.  Built once at startup and handed to the
/// `Roster` and `BulkLoader` constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub storage_location: PathBuf,
    pub import_path: PathBuf,
}

impl Config {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(storage_location: P, import_path: Q) -> Self {
        Config {
            storage_location: storage_location.as_ref().to_path_buf(),
            import_path: import_path.as_ref().to_path_buf(),
        }
    }

    /// Read locations from `ROSTER_DATABASE` and `ROSTER_IMPORT_FILE`, falling back to
    /// `employees.db` and `employees.csv` in the working directory.  Call `dotenv()` first if
    /// a `.env` file should be honoured.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let pick = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| String::from(default))
        };

        Config::new(
            pick(DATABASE_VAR, DEFAULT_DATABASE),
            pick(IMPORT_FILE_VAR, DEFAULT_IMPORT_FILE),
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(DEFAULT_DATABASE, DEFAULT_IMPORT_FILE)
    }
}
