//! Command handlers for the tdmc CLI.
//!
//! Each submodule implements one command. Shared utilities (reading the
//! input document, logging setup) live here in the module root.

use std::sync::Once;

use tdm_constructs::Project;

mod check;
mod stub;

pub use check::check_file;
pub use stub::{parse_stub_args, stub_file, STUB_USAGE};

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber. Only active when `RUST_LOG` is set;
/// `TDM_LOG_TREE` switches to indented span-tree output.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let filter = EnvFilter::from_default_env();
        if std::env::var_os("TDM_LOG_TREE").is_some() {
            let tree = tracing_tree::HierarchicalLayer::default()
                .with_writer(std::io::stderr)
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_targets(true);
            tracing_subscriber::registry().with(filter).with(tree).init();
        } else {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}

/// Read a file from disk, exiting with a user-friendly error message on failure.
pub(super) fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}

/// Read and load a project, exiting with the load error on failure.
pub(super) fn load_file(path: &str) -> Project {
    let text = read_file(path);
    match Project::from_json_str(&text) {
        Ok(project) => project,
        Err(err) => {
            tracing::debug!(path, ?err, "load failed");
            eprintln!("error: {path}: {err}");
            std::process::exit(1);
        }
    }
}
