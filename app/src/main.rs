//! FILENAME: app/src/main.rs
//! TradeScope - interactive trade-in drilldown dashboard.
//!
//! Loads a trade-in CSV (local path or URL, passed as the first
//! argument or via `load`), then runs a small command loop over the
//! drilldown: open a row to expand the next level, go back, filter by
//! processed date, and export the filtered set.

mod logging;
mod render;
mod session;

use std::io::{BufRead, Write};

use session::Session;

const HELP: &str = "\
commands:
  open <row>        expand row <row> of the deepest view (bare number works too)
  back | b          collapse the deepest view
  filter <from> <to>  processed-date window, YYYY-MM-DD or - for open
  reset             clear the date filter
  summary           totals for the filtered dataset
  export <path>     write the filtered rows as CSV
  load <url|path>   replace the dataset
  show              reprint every visible view
  help | ?          this text
  quit | q          exit
";

#[tokio::main]
async fn main() {
    logging::init();

    let location = std::env::args().nth(1);
    let mut session = Session::start(location.as_deref()).await;

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        let _ = std::io::stdout().flush();
        let Some(Ok(line)) = lines.next() else {
            break;
        };
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };
        match command {
            "open" => match parts.next().and_then(|raw| raw.parse::<usize>().ok()) {
                Some(row) => session.open(row),
                None => println!("usage: open <row>"),
            },
            "back" | "b" => session.back(),
            "filter" => match (parts.next(), parts.next()) {
                (Some(from), Some(to)) => session.filter(from, to),
                _ => println!("usage: filter <from> <to> (YYYY-MM-DD or -)"),
            },
            "reset" => session.reset_filter(),
            "summary" => session.print_summary(),
            "export" => match parts.next() {
                Some(path) => session.export(path),
                None => println!("usage: export <path>"),
            },
            "load" => match parts.next() {
                Some(location) => session.load(location).await,
                None => println!("usage: load <url|path>"),
            },
            "show" => session.redraw(),
            "help" | "?" => print!("{}", HELP),
            "quit" | "q" | "exit" => break,
            other => match other.parse::<usize>() {
                Ok(row) => session.open(row),
                Err(_) => println!("unknown command {:?}; try help", other),
            },
        }
    }
}
