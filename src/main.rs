//! # Bordure CLI
//!
//! Usage:
//!   bordure table.json
//!   echo '{ ... }' | bordure
//!   bordure --example > table.json
//!
//! Reads a table description, collapses its borders, and prints the
//! resolved width of every horizontal and vertical edge.

use std::env;
use std::fs;
use std::io::{self, Read};

use bordure::model::Border;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--example") {
        print!("{}", example_table_json());
        return;
    }

    let input = if args.len() > 1 && !args[1].starts_with('-') {
        fs::read_to_string(&args[1]).expect("Failed to read input file")
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).expect("Failed to read stdin");
        buf
    };

    match bordure::collapse_json(&input) {
        Ok((cells, engine)) => {
            println!("columns: {}", engine.num_columns());
            println!("rows:    {}", cells.num_rows());
            for boundary in 0..engine.grid().horizontal_count() {
                let edge = engine
                    .horizontal_edge_for_page_row(&cells, boundary)
                    .expect("boundary within grid");
                println!("h{:<3} {}", boundary, format_edge(&edge));
            }
            for boundary in 0..engine.grid().vertical_count() {
                let edge = engine.vertical_edge(boundary).expect("boundary within grid");
                println!("v{:<3} {}", boundary, format_edge(edge));
            }
        }
        Err(e) => {
            eprintln!("✗ Failed to collapse table: {}", e);
            std::process::exit(1);
        }
    }
}

fn format_edge(edge: &[Option<Border>]) -> String {
    edge.iter()
        .map(|slot| match slot {
            Some(b) => format!("{:.2}", b.width),
            None => "·".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn example_table_json() -> &'static str {
    r##"{
  "numColumns": 3,
  "frame": {
    "top": { "width": 1.0 },
    "right": { "width": 1.0 },
    "bottom": { "width": 1.0 },
    "left": { "width": 1.0 }
  },
  "cells": [
    { "row": 0, "col": 0, "colSpan": 2, "bottom": { "width": 2.0 } },
    { "row": 0, "col": 2, "rowSpan": 2, "left": { "width": 2.0, "kind": "Dashed" } },
    { "row": 1, "col": 0 },
    { "row": 1, "col": 1, "right": { "width": 3.0 } },
    { "row": 2, "col": 0, "top": { "width": 0.5 } },
    { "row": 2, "col": 1 },
    { "row": 2, "col": 2 }
  ]
}
"##
}
