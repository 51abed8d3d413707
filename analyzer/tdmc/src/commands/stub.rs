//! The `stub` command: print the stub of a whole project or of one entry.

use tdm_constructs::handle::{PackageId, TypeRef};
use tdm_constructs::{ConstructId, CyclePolicy, Mode, Project, StubOptions, Table};

use super::load_file;

pub const STUB_USAGE: &str = "Usage: tdmc stub <file.json> [--short | --long] [--mark-cycles] \
     [--max-depth=N] [--type N | --package N]";

/// Which part of the project to print.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    /// Every package, in table order.
    #[default]
    All,
    /// A 1-based index into the types table.
    Type(i64),
    /// A 1-based index into the packages table.
    Package(i64),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StubArgs {
    pub path: String,
    pub selection: Selection,
    pub options: StubOptions,
}

/// Parse the arguments following `tdmc stub`.
pub fn parse_stub_args(args: &[String]) -> Result<StubArgs, String> {
    let mut path = None;
    let mut selection = Selection::All;
    let mut options = StubOptions::default();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--short" => options = options.with_mode(Mode::Short),
            "--long" => options = options.with_mode(Mode::Long),
            "--mark-cycles" => options = options.with_cycle_policy(CyclePolicy::Mark),
            "--type" | "--package" => {
                let value = iter
                    .next()
                    .ok_or_else(|| format!("{arg} requires an index"))?;
                selection = select(selection, arg, value)?;
            }
            _ => {
                if let Some(depth) = arg.strip_prefix("--max-depth=") {
                    let depth = depth
                        .parse()
                        .map_err(|_| format!("invalid --max-depth '{depth}'"))?;
                    options = options.with_max_depth(depth);
                } else if let Some(value) = arg.strip_prefix("--type=") {
                    selection = select(selection, "--type", value)?;
                } else if let Some(value) = arg.strip_prefix("--package=") {
                    selection = select(selection, "--package", value)?;
                } else if arg.starts_with('-') {
                    return Err(format!("unknown option '{arg}'"));
                } else if path.is_none() {
                    path = Some(arg.clone());
                } else {
                    return Err(format!("unexpected argument '{arg}'"));
                }
            }
        }
    }

    let path = path.ok_or_else(|| "missing file path".to_owned())?;
    Ok(StubArgs {
        path,
        selection,
        options,
    })
}

fn select(current: Selection, flag: &str, value: &str) -> Result<Selection, String> {
    if current != Selection::All {
        return Err("--type and --package select one entry; pass only one".to_owned());
    }
    let index: i64 = value
        .parse()
        .map_err(|_| format!("invalid index '{value}' for {flag}"))?;
    Ok(if flag == "--type" {
        Selection::Type(index)
    } else {
        Selection::Package(index)
    })
}

/// Resolve a selection to the construct it names.
fn resolve(project: &Project, selection: Selection) -> Result<Option<ConstructId>, String> {
    match selection {
        Selection::All => Ok(None),
        Selection::Type(index) => project
            .lookup::<TypeRef>(index)
            .map(|ty| Some(ty.into()))
            .ok_or_else(|| {
                format!(
                    "no type at index {index} (the project has {} types)",
                    project.table(Table::Types).len()
                )
            }),
        Selection::Package(index) => project
            .lookup::<PackageId>(index)
            .map(|package| Some(package.into()))
            .ok_or_else(|| {
                format!(
                    "no package at index {index} (the project has {} packages)",
                    project.table(Table::Packages).len()
                )
            }),
    }
}

/// Render the selected stub text.
fn render(project: &Project, args: &StubArgs) -> Result<String, String> {
    let stub = match resolve(project, args.selection)? {
        Some(id) => project.to_stub_with(id, args.options).map(|mut text| {
            text.push('\n');
            text
        }),
        None => project.stub_with(args.options),
    };
    stub.map_err(|err| err.to_string())
}

pub fn stub_file(args: &StubArgs) {
    let project = load_file(&args.path);
    match render(&project, args) {
        Ok(text) => print!("{text}"),
        Err(message) => {
            eprintln!("error: {}: {message}", args.path);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests;
