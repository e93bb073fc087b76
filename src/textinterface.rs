use std::io::{self, BufRead, Write};

use log::warn;
use thiserror::Error;

use crate::data_handling::{DataError, Roster};
use crate::employee::{Column, EmployeeRow};
use crate::loader::{BulkLoader, LoadError};

pub type Result<T> = std::result::Result<T, TextInterfaceError>;

struct Command<R, W> {
    key: &'static str,
    short_desc: &'static str,
    operation: fn(&mut TextInterface<R, W>) -> Result<()>,
}

/// The numbered menu.  Reads choices from `R` and writes prompts and results to `W`; any
/// choice that is not on the menu ends the session.
pub struct TextInterface<R, W> {
    io: TextIO<R, W>,
    roster: Roster,
    loader: BulkLoader,
    commands: Vec<Command<R, W>>,
}

impl TextInterface<io::StdinLock<'static>, io::Stdout> {
    pub fn init(roster: Roster, loader: BulkLoader) -> Self {
        TextInterface::with_io(roster, loader, io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TextInterface<R, W> {
    pub fn with_io(roster: Roster, loader: BulkLoader, input: R, output: W) -> Self {
        let commands = vec![
            Command {
                key: "1",
                short_desc: "Create the employee table.",
                operation: TextInterface::create_table,
            },
            Command {
                key: "2",
                short_desc: "Import data from the csv file.",
                operation: TextInterface::import,
            },
            Command {
                key: "3",
                short_desc: "Add a new record to the database.",
                operation: TextInterface::add_employee,
            },
            Command {
                key: "4",
                short_desc: "Delete a record by employee id.",
                operation: TextInterface::delete_employee,
            },
            Command {
                key: "5",
                short_desc: "Delete all records from the employee table.",
                operation: TextInterface::delete_all,
            },
            Command {
                key: "6",
                short_desc: "List all records in the employee table.",
                operation: TextInterface::list,
            },
            Command {
                key: "7",
                short_desc: "Update a record by employee id.",
                operation: TextInterface::update_employee,
            },
        ];

        TextInterface {
            io: TextIO { input, output },
            roster,
            loader,
            commands,
        }
    }

    /// Run the menu until the user picks something that is not on it or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.print_menu()?;

            let choice = match self.io.read_line()? {
                Some(line) => line,
                None => return Ok(()),
            };

            let op = self
                .commands
                .iter()
                .find(|command| command.key == choice)
                .map(|command| command.operation);

            match op {
                Some(op) => op(self)?,
                None => {
                    writeln!(self.io.output, "Goodbye.")?;
                    return Ok(());
                }
            }
        }
    }

    /// Give back the roster once the session is over.
    pub fn into_roster(self) -> Roster {
        self.roster
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.io.output)?;
        writeln!(self.io.output, "Enter the option:")?;
        for command in &self.commands {
            writeln!(self.io.output, "    {}. {}", command.key, command.short_desc)?;
        }
        writeln!(self.io.output, "    8. Press any other key to exit.")?;
        self.io.prompt("?> ")
    }

    fn create_table(&mut self) -> Result<()> {
        self.roster.ensure_schema()?;
        writeln!(self.io.output, "Employee table was successfully created.")?;
        Ok(())
    }

    fn import(&mut self) -> Result<()> {
        let rows = self.loader.load()?;
        let count = self.roster.import_rows(&rows)?;
        writeln!(
            self.io.output,
            "Successfully inserted {} records into employee table.",
            count
        )?;
        Ok(())
    }

    fn add_employee(&mut self) -> Result<()> {
        let mut builder = EmployeeRow::builder();

        for column in Column::ALL.iter().copied() {
            let prompt = if column.is_optional() {
                format!("Enter {} (optional): ", column)
            } else {
                format!("Enter {}: ", column)
            };
            let value = self.io.get_string(&prompt)?;

            if let Err(e) = builder.set(column, &value) {
                warn!("rejected new employee: {}", e);
                writeln!(self.io.output, "Could not add employee: {}", e)?;
                return Ok(());
            }
        }

        match builder.build() {
            Ok(row) => {
                let id = self.roster.insert_one(&row)?;
                writeln!(self.io.output, "Successfully added employee {}.", id)?;
            }
            Err(e) => writeln!(self.io.output, "Could not add employee: {}", e)?,
        }
        Ok(())
    }

    fn delete_employee(&mut self) -> Result<()> {
        if let Some(id) = self.read_id("Enter id of employee: ")? {
            self.roster.delete_by_id(id)?;
            writeln!(self.io.output, "Successfully deleted record from employee table.")?;
        }
        Ok(())
    }

    fn delete_all(&mut self) -> Result<()> {
        let confirmation = self.io.get_string(
            "Are you sure? Press Y or Yes to continue, or N or No to skip: ",
        )?;

        if is_yes(&confirmation) {
            self.roster.delete_all()?;
            writeln!(
                self.io.output,
                "Successfully deleted all records from employee table."
            )?;
        }
        Ok(())
    }

    fn list(&mut self) -> Result<()> {
        for employee in self.roster.select_all()? {
            writeln!(self.io.output, "{}", employee)?;
        }
        Ok(())
    }

    fn update_employee(&mut self) -> Result<()> {
        let id = match self.read_id("Enter id of employee: ")? {
            Some(id) => id,
            None => return Ok(()),
        };

        let names: Vec<&str> = Column::ALL.iter().map(|c| c.name()).collect();
        let column_name = self.io.get_string(&format!(
            "Which column would you like to update? ({}): ",
            names.join(", ")
        ))?;

        let column = match column_name.parse::<Column>() {
            Ok(column) => column,
            Err(e) => {
                warn!("rejected update: {}", e);
                writeln!(self.io.output, "Could not update employee: {}", e)?;
                return Ok(());
            }
        };

        let value = self.io.get_string(&format!("Enter value of {}: ", column))?;

        match self.roster.update_field(column, id, &value) {
            Ok(_) => writeln!(
                self.io.output,
                "Successfully updated {} of employee {}.",
                column, id
            )?,
            Err(DataError::Record(e)) => {
                warn!("rejected update: {}", e);
                writeln!(self.io.output, "Could not update employee: {}", e)?;
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    /// Ask for an employee id.  Anything that is not a plain number is ignored.
    fn read_id(&mut self, prompt: &str) -> Result<Option<i64>> {
        let entry = self.io.get_string(prompt)?;

        if entry.is_empty() || !entry.chars().all(|c| c.is_ascii_digit()) {
            return Ok(None);
        }
        Ok(entry.parse().ok())
    }
}

fn is_yes(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer == "y" || answer == "yes"
}

struct TextIO<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TextIO<R, W> {
    fn prompt(&mut self, text: &str) -> Result<()> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()?;
        Ok(())
    }

    /// One trimmed line of input, or `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut io_buffer = String::new();
        if self.input.read_line(&mut io_buffer)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from(io_buffer.trim())))
    }

    /// Prompt and read a line; end of input reads as an empty string.
    fn get_string(&mut self, prnt: &str) -> Result<String> {
        self.prompt(prnt)?;
        Ok(self.read_line()?.unwrap_or_default())
    }
}

#[derive(Debug, Error)]
pub enum TextInterfaceError {
    #[error("IO Error({0})")]
    IOError(#[from] io::Error),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Load(#[from] LoadError),
}
