//! Dijkstra over an edge list, printing the distance to every vertex
//!
//! ```sh
//! cargo run --example shortest_path -- graph.txt s
//! RUST_LOG=fibonacci=trace cargo run --example shortest_path
//! ```
//!
//! The edge list has one `from to weight` edge per line; `#` starts a comment.
//! Without a file a small built-in graph is used.

use rust_fibonacci_heap::shortest_path::{dijkstra, Graph};
use std::error::Error;
use std::fs;
use tracing_subscriber::EnvFilter;

const BUILTIN: &str = "\
s t 10
s y 5
t x 1
t y 2
y t 3
y x 9
y z 2
z s 7
z x 6
";

fn parse_edges(text: &str) -> Result<Vec<(String, String, i64)>, Box<dyn Error>> {
    let mut edges = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let &[from, to, weight] = fields.as_slice() else {
            return Err(format!("line {}: expected `from to weight`", lineno + 1).into());
        };
        let weight = weight
            .parse()
            .map_err(|e| format!("line {}: bad weight {weight:?}: {e}", lineno + 1))?;
        edges.push((from.to_owned(), to.to_owned(), weight));
    }
    Ok(edges)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let text = match args.next() {
        Some(path) => fs::read_to_string(&path).map_err(|e| format!("{path}: {e}"))?,
        None => BUILTIN.to_owned(),
    };

    let edges = parse_edges(&text)?;
    let source = match args.next() {
        Some(source) => source,
        None => edges
            .first()
            .map(|(from, _, _)| from.clone())
            .ok_or("edge list is empty")?,
    };

    let graph: Graph<String, i64> = edges.into_iter().collect();
    let paths = dijkstra(&graph, &source)?;

    println!("shortest distances from {source}:");
    let mut rows: Vec<_> = paths.iter().collect();
    rows.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
    for (vertex, distance) in rows {
        match paths.path_to(vertex) {
            Some(path) => println!("  {vertex:>8}  {distance:>6}  via {}", path.join(" -> ")),
            None => println!("  {vertex:>8}  {distance:>6}"),
        }
    }

    Ok(())
}
