use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::config::Config;

pub type Result<T> = std::result::Result<T, LoadError>;

/// One line of the import file, split into fields but otherwise untouched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RawRow {
    fields: Vec<String>,
}

impl RawRow {
    pub fn new<S: Into<String>>(fields: Vec<S>) -> Self {
        RawRow {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Reads employee rows from the configured import file.
#[derive(Debug, Clone)]
pub struct BulkLoader {
    path: PathBuf,
}

impl BulkLoader {
    pub fn new(config: &Config) -> Self {
        BulkLoader {
            path: config.import_path.clone(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<RawRow>> {
        load(&self.path)
    }
}

/// Read every row after the header from the comma delimited file at `path`.  Field counts are
/// not checked here; a short or long row is returned as is.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<RawRow>> {
    let path = path.as_ref();

    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let rows = load_from_reader(file)?;
    debug!("loaded {} rows from {}", rows.len(), path.display());

    Ok(rows)
}

pub fn load_from_reader<R: Read>(reader: R) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let rows = reader
        .deserialize::<RawRow>()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("import file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("could not read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not parse import file: {0}")]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
FIRST_NAME,LAST_NAME,ADDRESS,EMAIL,PHONE1,TEL_no,JOB_NAME,SALARY
Ana,Lee,1 Rd,a@x.com,555-0001,,Engineer,90000
Bo,Park,\"2 Ave, Apt 3\",b@x.com,555-0002,555-0003,Analyst,70000
";

    #[test]
    fn skips_header_and_keeps_order() {
        let rows = load_from_reader(SAMPLE.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].fields()[0], "Ana");
        assert_eq!(rows[0].fields()[5], "");
        assert_eq!(rows[1].fields()[2], "2 Ave, Apt 3");
        assert_eq!(rows[1].len(), 8);
    }

    #[test]
    fn header_only_is_empty() {
        let rows = load_from_reader("a,b,c\n".as_bytes()).unwrap();
        assert!(rows.is_empty());

        let rows = load_from_reader("".as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn malformed_rows_pass_through() {
        let input = "h1,h2\nonly,three,fields\nx\n";
        let rows = load_from_reader(input.as_bytes()).unwrap();

        assert_eq!(rows, vec![RawRow::new(vec!["only", "three", "fields"]), RawRow::new(vec!["x"])]);
    }

    #[test]
    fn missing_file_is_not_found() {
        let path = std::env::temp_dir().join("employee_roster_definitely_missing.csv");

        match load(&path) {
            Err(LoadError::NotFound(p)) => assert_eq!(p, path),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn loader_uses_configured_path() {
        let config = Config::new("unused.db", "staff.csv");
        let loader = BulkLoader::new(&config);
        assert_eq!(loader.path(), Path::new("staff.csv"));
    }
}
