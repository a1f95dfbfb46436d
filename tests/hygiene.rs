//! Hygiene: scans the editor sources for patterns that crash the page or
//! swallow errors. Budgets only ever go down.
#![allow(clippy::absurd_extreme_comparisons)]

use std::fs;
use std::path::{Path, PathBuf};

struct SourceFile {
    path: String,
    content: String,
}

/// Production `.rs` files under `src/`; sibling `*_test.rs` files are exempt.
fn source_files() -> Vec<SourceFile> {
    let mut paths = Vec::new();
    collect(Path::new("src"), &mut paths);
    paths
        .into_iter()
        .filter(|p| !p.to_string_lossy().ends_with("_test.rs"))
        .filter_map(|p| {
            let content = fs::read_to_string(&p).ok()?;
            Some(SourceFile { path: p.to_string_lossy().into_owned(), content })
        })
        .collect()
}

fn collect(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs") {
            out.push(path);
        }
    }
}

/// Count lines containing `pattern` and fail if the total exceeds `budget`.
fn enforce(pattern: &str, budget: usize) {
    let files = source_files();
    assert!(!files.is_empty(), "no sources found; run from the crate root");
    let hits: Vec<(String, usize)> = files
        .iter()
        .map(|f| (f.path.clone(), f.content.lines().filter(|l| l.contains(pattern)).count()))
        .filter(|(_, n)| *n > 0)
        .collect();
    let total: usize = hits.iter().map(|(_, n)| n).sum();
    let listing = hits.iter().map(|(p, n)| format!("  {p}: {n}")).collect::<Vec<_>>().join("\n");
    assert!(total <= budget, "`{pattern}` budget exceeded: found {total}, max {budget}.\n{listing}");
}

// Panics: a panic in wasm takes the whole editor down.

#[test]
fn unwrap_budget() {
    enforce(".unwrap()", 0);
}

#[test]
fn expect_budget() {
    enforce(".expect(", 0);
}

#[test]
fn panic_budget() {
    enforce("panic!(", 0);
}

#[test]
fn unreachable_budget() {
    enforce("unreachable!(", 0);
}

#[test]
fn todo_budget() {
    enforce("todo!(", 0);
}

#[test]
fn unimplemented_budget() {
    enforce("unimplemented!(", 0);
}

// Silent loss: errors dropped without a log line.

#[test]
fn silent_discard_budget() {
    enforce("let _ =", 0);
}

#[test]
fn dot_ok_budget() {
    enforce(".ok()", 0);
}

// Structure.

#[test]
fn allow_dead_code_budget() {
    enforce("#[allow(dead_code)]", 0);
}

#[test]
fn console_log_budget() {
    enforce("web_sys::console::", 0);
}
