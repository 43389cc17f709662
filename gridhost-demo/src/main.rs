use std::error::Error;
use std::fs::File;
use std::sync::Arc;

use gridcore::{Column, ColumnFilterChange, Row, SelectionChange, page_count};
use gridhost::plugins::names;
use gridhost::prelude::{
    FilteringState, GridCore, HostConfig, LocalFiltering, LocalPaging, PagingState, PluginHost,
    SelectionState, Value,
};
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};

fn sample_rows() -> Vec<Row> {
    [
        ("Ada", "London"),
        ("Alan", "Wilmslow"),
        ("Grace", "New York"),
        ("Edsger", "Rotterdam"),
        ("Barbara", "New York"),
        ("Donald", "Milwaukee"),
        ("Margaret", "Paoli"),
    ]
    .into_iter()
    .zip(1..)
    .map(|((name, city), id)| Row::new(id).with("name", name).with("city", city))
    .collect()
}

/// Rows from the JSON file given as first argument, or the built-in sample.
fn load_rows() -> Result<Vec<Row>, Box<dyn Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let file = File::open(&path)?;
            let rows: Vec<Row> = serde_json::from_reader(file)?;
            info!("loaded {} rows from {}", rows.len(), path);
            Ok(rows)
        }
        None => Ok(sample_rows()),
    }
}

fn print_rows(host: &mut PluginHost, title: &str) -> Result<(), Box<dyn Error>> {
    let rows = host.require(names::ROWS)?;
    let rows = rows.expect::<Vec<Row>>(names::ROWS)?;
    println!("{}:", title);
    for row in rows {
        println!(
            "  #{:<3} {:<10} {}",
            row.id,
            row.cell("name").unwrap_or("-"),
            row.cell("city").unwrap_or("-")
        );
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn Error>> {
    let rows = load_rows()?;
    let total = rows.len();
    let columns = vec![Column::new("name", "Name"), Column::new("city", "City")];

    let mut host = PluginHost::new(HostConfig::new("demo"));
    host.mount(&GridCore::new(rows, columns))?;
    host.mount(&FilteringState::new().on_filters_change(|filters| {
        info!("filters changed: {:?}", filters);
    }))?;
    host.mount(&SelectionState::new())?;
    host.mount(&PagingState::new().default_page_size(3))?;
    host.mount(&LocalFiltering)?;
    host.mount(&LocalPaging)?;

    for lint in host.lint() {
        println!("lint: {}", lint);
    }

    println!("{} rows in {} pages", total, page_count(total, 3));
    print_rows(&mut host, "First page")?;

    let report = host.batch(|tx| {
        tx.dispatch(
            names::SET_COLUMN_FILTER,
            Value::new(ColumnFilterChange::set("city", "new")),
        )?;
        tx.dispatch(
            names::TOGGLE_SELECTION,
            Value::new(SelectionChange::toggle(vec![3, 5])),
        )
    })?;
    for change in report.iter() {
        println!("changed {}.{}", change.plugin_name, change.field);
    }
    print_rows(&mut host, "Filtered by city")?;

    host.dispatch(names::SET_COLUMN_FILTER, Value::new(ColumnFilterChange::clear("city")))?;
    host.dispatch(names::SET_CURRENT_PAGE, Value::new(1usize))?;
    print_rows(&mut host, "Second page")?;

    let selection: Option<Arc<Vec<u64>>> = host.resolve_as(names::SELECTION)?;
    println!("selected: {:?}", selection.as_deref().cloned().unwrap_or_default());

    Ok(())
}

fn main() {
    match File::create("gridhost-demo.log") {
        Ok(log_file) => {
            if let Err(e) = WriteLogger::init(LevelFilter::Debug, Config::default(), log_file) {
                eprintln!("Failed to initialize logger: {}", e);
            }
        }
        Err(e) => eprintln!("Failed to create log file: {}", e),
    }

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
