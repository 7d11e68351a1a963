//! Source checks for wall-canvas.
//!
//! Every scene change repaints from scratch, and in the browser a panic
//! inside a paint pass takes the whole page with it. These tests read the
//! production sources under `src/` and fail on constructs that can abort a
//! pass, swallow an error unseen, or leak the browser context out of the
//! surface layer.

use std::fs;
use std::path::Path;

/// Banned outside `*_test.rs`, with what to do instead.
const FORBIDDEN: &[(&str, &str)] = &[
    (".unwrap()", "propagate with `?` or match"),
    (".expect(", "propagate with `?` or match"),
    ("panic!(", "return an error or an Outcome"),
    ("unreachable!(", "make the state unrepresentable"),
    ("todo!(", "finish it"),
    ("unimplemented!(", "finish it"),
    ("let _ =", "inspect the result"),
    (".ok()", "log the error before dropping it"),
    ("println!(", "log through tracing"),
    ("dbg!(", "log through tracing"),
];

/// The only files allowed to name the browser 2D context.
const CONTEXT_OWNERS: &[&str] = &["browser.rs"];

/// Files on the per-repaint path. Slices there go through iterators or
/// `get`, never `x[i]`.
const PAINT_PATH: &[&str] = &["mapper.rs", "render.rs", "surface.rs"];

struct Source {
    name: String,
    text: String,
}

impl Source {
    /// Non-comment lines with 1-based line numbers.
    fn code_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim_start().starts_with("//"))
            .map(|(i, line)| (i + 1, line))
    }
}

fn production_sources() -> Vec<Source> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
    let entries = fs::read_dir(&dir).unwrap_or_else(|e| panic!("cannot list {}: {e}", dir.display()));
    let mut sources: Vec<Source> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "rs"))
        .filter_map(|path| {
            let name = path.file_name()?.to_string_lossy().into_owned();
            if name.ends_with("_test.rs") {
                return None;
            }
            let text = fs::read_to_string(&path).unwrap_or_else(|e| panic!("cannot read {name}: {e}"));
            Some(Source { name, text })
        })
        .collect();
    sources.sort_by(|a, b| a.name.cmp(&b.name));
    sources
}

/// Byte offsets of `[` used as an index operator: directly after an
/// identifier, a call, or another index.
fn index_positions(line: &str) -> Vec<usize> {
    let bytes = line.as_bytes();
    (1..bytes.len())
        .filter(|&i| bytes[i] == b'[')
        .filter(|&i| {
            let prev = bytes[i - 1];
            prev.is_ascii_alphanumeric() || prev == b'_' || prev == b')' || prev == b']'
        })
        .collect()
}

fn report(violations: &[String]) -> String {
    violations.iter().map(|v| format!("  {v}")).collect::<Vec<_>>().join("\n")
}

#[test]
fn sources_are_scanned() {
    let names: Vec<String> = production_sources().into_iter().map(|s| s.name).collect();
    for expected in ["engine.rs", "render.rs", "browser.rs"] {
        assert!(names.iter().any(|n| n == expected), "{expected} not found in {names:?}");
    }
}

#[test]
fn no_panicking_or_silent_constructs() {
    let mut violations = Vec::new();
    for source in production_sources() {
        for (line_no, line) in source.code_lines() {
            for (pattern, instead) in FORBIDDEN {
                if line.contains(pattern) {
                    violations.push(format!("{}:{line_no}: `{pattern}`; {instead}", source.name));
                }
            }
        }
    }
    assert!(violations.is_empty(), "forbidden constructs:\n{}", report(&violations));
}

#[test]
fn canvas_context_stays_in_browser_surface() {
    let mut violations = Vec::new();
    for source in production_sources() {
        if CONTEXT_OWNERS.contains(&source.name.as_str()) {
            continue;
        }
        for (line_no, line) in source.code_lines() {
            if line.contains("CanvasRenderingContext2d") {
                violations.push(format!("{}:{line_no}", source.name));
            }
        }
    }
    assert!(violations.is_empty(), "2D context named outside the browser surface:\n{}", report(&violations));
}

#[test]
fn paint_path_does_not_index_slices() {
    let mut violations = Vec::new();
    for source in production_sources() {
        if !PAINT_PATH.contains(&source.name.as_str()) {
            continue;
        }
        for (line_no, line) in source.code_lines() {
            if !index_positions(line).is_empty() {
                violations.push(format!("{}:{line_no}: {}", source.name, line.trim()));
            }
        }
    }
    assert!(violations.is_empty(), "direct indexing on the paint path:\n{}", report(&violations));
}

#[test]
fn index_detection() {
    assert_eq!(index_positions("let p = points[0];"), vec![14]);
    assert_eq!(index_positions("f(x)[1]"), vec![4]);
    assert!(index_positions("#[must_use]").is_empty());
    assert!(index_positions("surface.polygon(&[tip, left, right], &STYLE)").is_empty());
    assert!(index_positions(".map(|&[x, y]| mapper.to_pixel(x, y))").is_empty());
    assert!(index_positions("let v: Vec<[f64; 2]> = vec![];").is_empty());
}
