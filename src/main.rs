// Keep an employee roster in a SQLite table: create the table, import rows from a csv file, and
// add, list, update or delete records through a numbered menu.
use std::process;

use dotenv::dotenv;
use log::error;

use employee_roster::config::Config;
use employee_roster::data_handling::Roster;
use employee_roster::loader::BulkLoader;
use employee_roster::textinterface::TextInterface;

fn main() {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    let roster = match Roster::open(&config) {
        Ok(roster) => roster,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let mut interface = TextInterface::init(roster, BulkLoader::new(&config));

    if let Err(e) = interface.run() {
        error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
