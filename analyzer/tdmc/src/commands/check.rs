//! The `check` command: load a project and summarize what it holds.

use std::fmt::Write as _;

use tdm_constructs::ProjectStats;

use super::load_file;

/// Load a file and print its construct counts, as text or JSON.
pub fn check_file(path: &str, json: bool) {
    let project = load_file(path);
    let stats = project.stats();

    if json {
        match serde_json::to_string_pretty(&stats) {
            Ok(text) => println!("{text}"),
            Err(err) => {
                eprintln!("error: cannot serialize stats: {err}");
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", summary(path, &stats));
    }
}

fn summary(path: &str, stats: &ProjectStats) -> String {
    let mut out = String::new();
    let language: &str = if stats.language.is_empty() {
        "unknown language"
    } else {
        &stats.language
    };
    let _ = writeln!(
        out,
        "OK: {path} ({} constructs, {language})",
        stats.constructs
    );
    for (kind, count) in &stats.kinds {
        let _ = writeln!(out, "  {:<14} {count}", kind.name());
    }
    out
}
