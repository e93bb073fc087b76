use std::fmt;
use std::str::FromStr;

use rusqlite::types::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecordError>;

/// The columns of the `employees` table that can be written.  `id` is assigned by the storage
/// engine and is not listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    FirstName,
    LastName,
    Address,
    Email,
    Phone1,
    TelNo,
    JobName,
    Salary,
}

impl Column {
    /// Every writable column, in table order.
    pub const ALL: [Column; 8] = [
        Column::FirstName,
        Column::LastName,
        Column::Address,
        Column::Email,
        Column::Phone1,
        Column::TelNo,
        Column::JobName,
        Column::Salary,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::FirstName => "first_name",
            Column::LastName => "last_name",
            Column::Address => "address",
            Column::Email => "email",
            Column::Phone1 => "phone1",
            Column::TelNo => "tel_no",
            Column::JobName => "job_name",
            Column::Salary => "salary",
        }
    }

    pub fn is_optional(self) -> bool {
        self == Column::TelNo
    }

    /// Turn raw user or file text into the value stored for this column.
    pub fn coerce(self, raw: &str) -> Result<Value> {
        match self {
            Column::Salary => parse_salary(raw).map(Value::Integer),
            Column::TelNo if raw.is_empty() => Ok(Value::Null),
            _ => Ok(Value::Text(String::from(raw))),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Column {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();

        Column::ALL
            .iter()
            .copied()
            .find(|column| column.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| RecordError::InvalidColumn(String::from(wanted)))
    }
}

fn parse_salary(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| RecordError::InvalidSalary(String::from(raw)))
}

/// The attributes of one employee in column order, without the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRow {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub email: String,
    pub phone1: String,
    pub tel_no: Option<String>,
    pub job_name: String,
    pub salary: i64,
}

impl EmployeeRow {
    pub fn builder() -> EmployeeBuilder {
        EmployeeBuilder::new()
    }

    /// Build a row from raw string fields given in column order.  Fails unless there are
    /// exactly eight fields and the salary is an integer.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self> {
        if fields.len() != Column::ALL.len() {
            return Err(RecordError::FieldCount {
                expected: Column::ALL.len(),
                found: fields.len(),
            });
        }

        let mut builder = EmployeeRow::builder();
        for (column, field) in Column::ALL.iter().zip(fields) {
            builder.set(*column, field.as_ref())?;
        }

        builder.build()
    }
}

/// A stored employee record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    id: i64,
    details: EmployeeRow,
}

impl Employee {
    pub fn new(id: i64, details: EmployeeRow) -> Self {
        Employee { id, details }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn details(&self) -> &EmployeeRow {
        &self.details
    }

    pub fn into_details(self) -> EmployeeRow {
        self.details
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let d = &self.details;
        write!(
            f,
            "#{}: {}, {} | {} | {} | {} | {} | {} | {}",
            self.id,
            d.last_name,
            d.first_name,
            d.address,
            d.email,
            d.phone1,
            d.tel_no.as_deref().unwrap_or("-"),
            d.job_name,
            d.salary,
        )
    }
}

#[derive(Debug, Default)]
pub struct EmployeeBuilder {
    first_name: Option<String>,
    last_name: Option<String>,
    address: Option<String>,
    email: Option<String>,
    phone1: Option<String>,
    tel_no: Option<String>,
    job_name: Option<String>,
    salary: Option<i64>,
}

impl EmployeeBuilder {
    fn new() -> Self {
        EmployeeBuilder::default()
    }

    pub fn first_name(&mut self, first_name: &str) -> &mut Self {
        self.first_name = Some(String::from(first_name));
        self
    }

    pub fn last_name(&mut self, last_name: &str) -> &mut Self {
        self.last_name = Some(String::from(last_name));
        self
    }

    pub fn address(&mut self, address: &str) -> &mut Self {
        self.address = Some(String::from(address));
        self
    }

    pub fn email(&mut self, email: &str) -> &mut Self {
        self.email = Some(String::from(email));
        self
    }

    pub fn phone1(&mut self, phone1: &str) -> &mut Self {
        self.phone1 = Some(String::from(phone1));
        self
    }

    /// An empty string clears the secondary phone.
    pub fn tel_no(&mut self, tel_no: &str) -> &mut Self {
        self.tel_no = if tel_no.is_empty() {
            None
        } else {
            Some(String::from(tel_no))
        };
        self
    }

    pub fn job_name(&mut self, job_name: &str) -> &mut Self {
        self.job_name = Some(String::from(job_name));
        self
    }

    pub fn salary(&mut self, salary: i64) -> &mut Self {
        self.salary = Some(salary);
        self
    }

    /// Set a column from raw text, coercing the salary.
    pub fn set(&mut self, column: Column, raw: &str) -> Result<&mut Self> {
        let builder = match column {
            Column::FirstName => self.first_name(raw),
            Column::LastName => self.last_name(raw),
            Column::Address => self.address(raw),
            Column::Email => self.email(raw),
            Column::Phone1 => self.phone1(raw),
            Column::TelNo => self.tel_no(raw),
            Column::JobName => self.job_name(raw),
            Column::Salary => self.salary(parse_salary(raw)?),
        };
        Ok(builder)
    }

    /// Construct the row.  Every column except `tel_no` must have been set.
    pub fn build(self) -> Result<EmployeeRow> {
        fn required<T>(value: Option<T>, column: Column) -> Result<T> {
            value.ok_or(RecordError::MissingField(column))
        }

        Ok(EmployeeRow {
            first_name: required(self.first_name, Column::FirstName)?,
            last_name: required(self.last_name, Column::LastName)?,
            address: required(self.address, Column::Address)?,
            email: required(self.email, Column::Email)?,
            phone1: required(self.phone1, Column::Phone1)?,
            tel_no: self.tel_no,
            job_name: required(self.job_name, Column::JobName)?,
            salary: required(self.salary, Column::Salary)?,
        })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("salary must be a whole number, got {0:?}")]
    InvalidSalary(String),
    #[error("unknown column {0:?}")]
    InvalidColumn(String),
    #[error("missing value for {0}")]
    MissingField(Column),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ana_fields() -> Vec<&'static str> {
        vec!["Ana", "Lee", "1 Rd", "a@x.com", "555-0001", "", "Engineer", "90000"]
    }

    #[test]
    fn column_parse_is_case_insensitive() {
        assert_eq!("SALARY".parse::<Column>(), Ok(Column::Salary));
        assert_eq!(" TEL_no ".parse::<Column>(), Ok(Column::TelNo));
        assert_eq!("first_name".parse::<Column>(), Ok(Column::FirstName));
    }

    #[test]
    fn column_parse_rejects_everything_else() {
        assert_eq!(
            "id".parse::<Column>(),
            Err(RecordError::InvalidColumn(String::from("id")))
        );
        assert!("salary = 0; DROP TABLE employees; --".parse::<Column>().is_err());
        assert!("".parse::<Column>().is_err());
    }

    #[test]
    fn coerce_values() {
        assert_eq!(Column::Salary.coerce(" 95000 "), Ok(Value::Integer(95000)));
        assert_eq!(
            Column::Salary.coerce("lots"),
            Err(RecordError::InvalidSalary(String::from("lots")))
        );
        assert_eq!(Column::TelNo.coerce(""), Ok(Value::Null));
        assert_eq!(Column::Email.coerce(""), Ok(Value::Text(String::new())));
    }

    #[test]
    fn row_from_fields() {
        let row = EmployeeRow::from_fields(&ana_fields()).unwrap();

        assert_eq!(row.first_name, "Ana");
        assert_eq!(row.last_name, "Lee");
        assert_eq!(row.tel_no, None);
        assert_eq!(row.job_name, "Engineer");
        assert_eq!(row.salary, 90000);
    }

    #[test]
    fn row_from_fields_checks_arity_and_salary() {
        let mut fields = ana_fields();
        fields.pop();
        assert_eq!(
            EmployeeRow::from_fields(&fields),
            Err(RecordError::FieldCount { expected: 8, found: 7 })
        );

        let mut fields = ana_fields();
        fields[7] = "ninety";
        assert!(matches!(
            EmployeeRow::from_fields(&fields),
            Err(RecordError::InvalidSalary(_))
        ));
    }

    #[test]
    fn builder_requires_mandatory_columns() {
        let mut builder = EmployeeRow::builder();
        builder.first_name("Ana").last_name("Lee");

        assert_eq!(
            builder.build(),
            Err(RecordError::MissingField(Column::Address))
        );
    }

    #[test]
    fn display_marks_missing_phone() {
        let employee = Employee::new(3, EmployeeRow::from_fields(&ana_fields()).unwrap());
        assert_eq!(
            employee.to_string(),
            "#3: Lee, Ana | 1 Rd | a@x.com | 555-0001 | - | Engineer | 90000"
        );
    }
}
