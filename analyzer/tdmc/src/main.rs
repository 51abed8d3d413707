//! tdm command-line front end.
//!
//! Loads a serialized project document and prints stubs or a summary.

mod commands;

use commands::{check_file, init_tracing, parse_stub_args, stub_file, STUB_USAGE};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "stub" => {
            let options = match parse_stub_args(&args[2..]) {
                Ok(options) => options,
                Err(message) => {
                    eprintln!("error: {message}");
                    eprintln!("{STUB_USAGE}");
                    std::process::exit(1);
                }
            };
            stub_file(&options);
        }
        "check" => {
            let mut json = false;
            let mut file_path = None;

            for arg in args.iter().skip(2) {
                if arg == "--json" {
                    json = true;
                } else if !arg.starts_with('-') && file_path.is_none() {
                    file_path = Some(arg.as_str());
                } else {
                    eprintln!("error: unexpected argument '{arg}'");
                    std::process::exit(1);
                }
            }

            let Some(path) = file_path else {
                eprintln!("error: missing file path");
                eprintln!("Usage: tdmc check <file.json> [--json]");
                std::process::exit(1);
            };
            check_file(path, json);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("tdmc {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("tdm project loader");
    println!();
    println!("Usage: tdmc <command> [options]");
    println!();
    println!("Commands:");
    println!("  stub <file.json>     Print the stub of a project or one construct");
    println!("  check <file.json>    Load a project and print its construct counts");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Stub options:");
    println!("  --short             Identities only");
    println!("  --long              Full bodies (default)");
    println!("  --mark-cycles       Mark recursive references instead of failing");
    println!("  --max-depth=<n>     Nesting limit (default: 256)");
    println!("  --type <n>          Stub the n-th entry of the types table (1-based)");
    println!("  --package <n>       Stub the n-th package (1-based)");
    println!();
    println!("Check options:");
    println!("  --json              Print the counts as JSON");
    println!();
    println!("Environment:");
    println!("  RUST_LOG            Log filter, e.g. tdm_constructs=debug");
    println!("  TDM_LOG_TREE        Render logs as an indented span tree");
    println!();
    println!("Examples:");
    println!("  tdmc stub project.json");
    println!("  tdmc stub project.json --package 2");
    println!("  tdmc stub project.json --type 14 --short");
    println!("  tdmc check project.json --json");
}
