use std::borrow::Borrow;
use std::path::PathBuf;

use log::{debug, info};
use rusqlite::{params, Connection, Row, Transaction};
use thiserror::Error;

use crate::config::Config;
use crate::employee::{Column, Employee, EmployeeRow, RecordError};
use crate::loader::RawRow;

pub type Result<T> = std::result::Result<T, DataError>;

const CREATE_EMPLOYEES_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS employees (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        last_name  TEXT NOT NULL,
        address    TEXT NOT NULL,
        email      TEXT NOT NULL,
        phone1     TEXT NOT NULL,
        tel_no     TEXT,
        job_name   TEXT NOT NULL,
        salary     INTEGER NOT NULL
    );
";

const INSERT_EMPLOYEE: &str = "
    INSERT INTO employees
        (first_name, last_name, address, email, phone1, tel_no, job_name, salary)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);
";

const SELECT_EMPLOYEES: &str = "
    SELECT id, first_name, last_name, address, email, phone1, tel_no, job_name, salary
    FROM employees;
";

/// Roster and its methods are the API for reading and writing employee records.  It owns the
/// database connection for the life of the program.
pub struct Roster {
    conn: Connection,
}

impl Roster {
    /// Open the database file named by `config.storage_location`, creating it if needed.
    pub fn open(config: &Config) -> Result<Self> {
        let path = &config.storage_location;

        let conn = Connection::open(path).map_err(|source| DataError::Connection {
            path: path.clone(),
            source,
        })?;

        info!("opened employee database at {}", path.display());
        Ok(Roster { conn })
    }

    /// A private in-memory database, gone when the Roster is dropped.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| DataError::Connection {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        Ok(Roster { conn })
    }

    /// Create the employees table unless it already exists.
    pub fn ensure_schema(&self) -> Result<()> {
        self.conn.execute_batch(CREATE_EMPLOYEES_TABLE)?;
        info!("employees table ready");
        Ok(())
    }

    /// Insert all rows in a single transaction.  Returns the number of rows written.
    pub fn insert_many(&mut self, rows: &[EmployeeRow]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let count = insert_rows(&tx, rows.iter().map(Ok))?;
        tx.commit()?;

        info!("inserted {} employee records", count);
        Ok(count)
    }

    /// Insert one row and return the identifier it was given.
    pub fn insert_one(&mut self, row: &EmployeeRow) -> Result<i64> {
        self.insert_many(std::slice::from_ref(row))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Coerce and insert rows read by the bulk loader.  The first row that does not convert
    /// aborts the batch and nothing is written.
    pub fn import_rows(&mut self, rows: &[RawRow]) -> Result<usize> {
        let converted = rows.iter().enumerate().map(|(index, raw)| {
            EmployeeRow::from_fields(raw.fields()).map_err(|source| DataError::MalformedRow {
                row: index + 1,
                source,
            })
        });

        let tx = self.conn.transaction()?;
        let count = insert_rows(&tx, converted)?;
        tx.commit()?;

        info!("imported {} employee records", count);
        Ok(count)
    }

    /// Every stored record, in whatever order the storage engine returns them.
    pub fn select_all(&self) -> Result<Vec<Employee>> {
        let mut stmt = self.conn.prepare(SELECT_EMPLOYEES)?;
        let employees = stmt
            .query_map([], employee_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!("selected {} employee records", employees.len());
        Ok(employees)
    }

    /// Set one column of the record with the given id.  Returns the number of rows changed,
    /// which is zero when no such record exists.
    pub fn update_field(&self, column: Column, id: i64, value: &str) -> Result<usize> {
        let value = column.coerce(value)?;
        let sql = format!("UPDATE employees SET {} = ?1 WHERE id = ?2;", column.name());
        debug!("{}", sql.trim());

        let changed = self.conn.execute(&sql, params![value, id])?;
        info!("updated {} of employee {} ({} rows)", column, id, changed);
        Ok(changed)
    }

    pub fn delete_by_id(&self, id: i64) -> Result<usize> {
        let deleted = self
            .conn
            .execute("DELETE FROM employees WHERE id = ?1;", params![id])?;
        info!("deleted employee {} ({} rows)", id, deleted);
        Ok(deleted)
    }

    pub fn delete_all(&self) -> Result<usize> {
        let deleted = self.conn.execute("DELETE FROM employees;", [])?;
        info!("deleted all {} employee records", deleted);
        Ok(deleted)
    }
}

fn insert_rows<I, R>(tx: &Transaction, rows: I) -> Result<usize>
where
    I: IntoIterator<Item = Result<R>>,
    R: Borrow<EmployeeRow>,
{
    let mut stmt = tx.prepare(INSERT_EMPLOYEE)?;
    let mut count = 0;

    for row in rows {
        let row = row?;
        let row = row.borrow();
        stmt.execute(params![
            row.first_name,
            row.last_name,
            row.address,
            row.email,
            row.phone1,
            row.tel_no,
            row.job_name,
            row.salary
        ])?;
        count += 1;
    }

    Ok(count)
}

fn employee_from_row(row: &Row) -> rusqlite::Result<Employee> {
    Ok(Employee::new(
        row.get(0)?,
        EmployeeRow {
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            address: row.get(3)?,
            email: row.get(4)?,
            phone1: row.get(5)?,
            tel_no: row.get(6)?,
            job_name: row.get(7)?,
            salary: row.get(8)?,
        },
    ))
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("could not open database {}: {}", .path.display(), .source)]
    Connection {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("database error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("row {row} of the import is malformed: {source}")]
    MalformedRow {
        row: usize,
        #[source]
        source: RecordError,
    },
    #[error(transparent)]
    Record(#[from] RecordError),
}
