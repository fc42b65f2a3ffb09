use std::io::{self, BufRead, Write};

use minisql::{Database, Error, ExecutionResult, ParseError, ResultSet};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut db = Database::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("Welcome to minisql");

    loop {
        print!("# ");
        if stdout.flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        match db.execute(line.trim()) {
            Ok(results) => {
                for result in results {
                    match result {
                        ExecutionResult::Created { .. } | ExecutionResult::Inserted { .. } => {
                            println!("OK")
                        }
                        ExecutionResult::Rows(rows) => print!("{}", render(&rows)),
                    }
                }
            }
            Err(err) => report(&err),
        }
    }
}

fn report(err: &Error) {
    eprintln!("Error: {err}");
    if let Error::Parse(ParseError::Unexpected { diagnostics, .. }) = err {
        for diagnostic in diagnostics {
            eprintln!("  {diagnostic}");
        }
    }
}

/// Renders a result set as a bordered text table.
fn render(result: &ResultSet) -> String {
    let cells: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .zip(&result.columns)
                .map(|(cell, column)| {
                    cell.decode(column.data_type)
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "?".into())
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = result
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain([column.name.chars().count()])
                .max()
                .unwrap_or(0)
        })
        .collect();

    let border: String = widths
        .iter()
        .map(|w| format!("+{}", "-".repeat(w + 2)))
        .collect::<String>()
        + "+\n";

    let line = |values: Vec<&str>| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(v, &w)| format!("| {v:<w$} "))
            .collect::<String>()
            + "|\n"
    };

    let mut out = border.clone();
    out += &line(result.columns.iter().map(|c| c.name.as_str()).collect());
    out += &border;
    for row in &cells {
        out += &line(row.iter().map(String::as_str).collect());
    }
    out += &border;
    out += &format!("({} rows)\n", cells.len());
    out
}
