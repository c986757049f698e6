//! Command-line interface for ldmode
//! This binary runs the highlighting and indentation services over linker script files.
//!
//! Usage:
//!   ldmode indent `<path>` --line `<n>`                - Print the computed column of a line
//!   ldmode reindent `<path>` [--write]                 - Reindent a whole file
//!   ldmode highlight `<path>` [--format `<format>`]    - Print classified spans
//!   ldmode process `<path>` --format `<stage-format>`  - Run a processing specification
//!   ldmode list-formats                              - List processing specifications

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use ldmode::config::{LdModeConfig, Loader};
use ldmode::ldscript::indentation::{BraceDetection, IndentSettings};
use ldmode::ldscript::processor::{
    available_formats, indent_at, process_file, read_source, ProcessingSpec,
};

fn main() {
    let matches = Command::new("ldmode")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Highlighting and indentation for GNU ld linker scripts")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("unit")
                .long("unit")
                .global(true)
                .value_parser(value_parser!(u32).range(1..))
                .help("Columns per nesting level (overrides the configuration)"),
        )
        .arg(
            Arg::new("comment-aware")
                .long("comment-aware")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Ignore braces inside comments"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log indentation decisions to stderr"),
        )
        .subcommand(
            Command::new("indent")
                .about("Print the computed indentation column of one line")
                .arg(path_arg())
                .arg(
                    Arg::new("line")
                        .long("line")
                        .short('l')
                        .required(true)
                        .value_parser(value_parser!(usize))
                        .help("Line number, starting at 1"),
                ),
        )
        .subcommand(
            Command::new("reindent")
                .about("Reindent every line of a file")
                .arg(path_arg())
                .arg(
                    Arg::new("write")
                        .long("write")
                        .short('w')
                        .action(ArgAction::SetTrue)
                        .help("Write the result back instead of printing it"),
                ),
        )
        .subcommand(
            Command::new("highlight")
                .about("Print the highlight spans of a file")
                .arg(path_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .value_parser(["simple", "json"])
                        .default_value("simple"),
                ),
        )
        .subcommand(
            Command::new("process")
                .about("Run a processing specification")
                .arg(path_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .required(true)
                        .help("Processing specification (e.g., 'indent-json', 'highlight-simple')"),
                ),
        )
        .subcommand(Command::new("list-formats").about("List available processing specifications"))
        .get_matches();

    setup_tracing(matches.get_flag("verbose"));
    let settings = load_settings(&matches);

    match matches.subcommand() {
        Some(("indent", indent_matches)) => {
            let path = required_string(indent_matches, "path");
            let line = indent_matches.get_one::<usize>("line").copied().unwrap_or(1);
            handle_indent_command(path, line, &settings);
        }
        Some(("reindent", reindent_matches)) => {
            let path = required_string(reindent_matches, "path");
            handle_reindent_command(path, reindent_matches.get_flag("write"), &settings);
        }
        Some(("highlight", highlight_matches)) => {
            let path = required_string(highlight_matches, "path");
            let format = required_string(highlight_matches, "format");
            handle_process_command(path, &format!("highlight-{}", format), &settings);
        }
        Some(("process", process_matches)) => {
            let path = required_string(process_matches, "path");
            let format = required_string(process_matches, "format");
            handle_process_command(path, format, &settings);
        }
        Some(("list-formats", _)) => {
            handle_list_formats_command();
        }
        _ => unreachable!(),
    }
}

fn path_arg() -> Arg {
    Arg::new("path")
        .help("Path to the linker script")
        .required(true)
        .index(1)
}

fn required_string<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_else(|| fail(format!("missing argument '{}'", name)))
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("LDMODE_LOG").unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("ldmode=debug")
        } else {
            EnvFilter::new("ldmode=warn")
        }
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Build indentation settings from the configuration layers and command-line overrides
fn load_settings(matches: &ArgMatches) -> IndentSettings {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }

    let config: LdModeConfig = loader
        .build()
        .unwrap_or_else(|e| fail(format!("invalid configuration: {}", e)));

    let mut settings = config.indent_settings();
    if let Some(unit) = matches.get_one::<u32>("unit") {
        settings.unit = *unit as usize;
    }
    if matches.get_flag("comment-aware") {
        settings.brace_detection = BraceDetection::CommentAware;
    }
    tracing::debug!(unit = settings.unit, brace_detection = ?settings.brace_detection, "settings");
    settings
}

/// Handle the indent command
fn handle_indent_command(path: &str, line: usize, settings: &IndentSettings) {
    let source = read_source(path).unwrap_or_else(|e| fail(e));
    let decision = indent_at(&source, line, settings).unwrap_or_else(|e| fail(e));
    println!("{}", decision.column);
}

/// Handle the reindent command
fn handle_reindent_command(path: &str, write: bool, settings: &IndentSettings) {
    let spec = ProcessingSpec::from_string("reindent-simple").unwrap_or_else(|e| fail(e));
    let output = process_file(path, &spec, settings).unwrap_or_else(|e| fail(e));

    if write {
        std::fs::write(path, output).unwrap_or_else(|e| fail(format!("writing {}: {}", path, e)));
    } else {
        print!("{}", output);
    }
}

/// Handle the process and highlight commands
fn handle_process_command(path: &str, format: &str, settings: &IndentSettings) {
    let spec = ProcessingSpec::from_string(format).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!("\nAvailable formats:");
        for format in available_formats() {
            eprintln!("  {}", format);
        }
        std::process::exit(1);
    });

    let output = process_file(path, &spec, settings).unwrap_or_else(|e| fail(e));
    print!("{}", output);
    if !output.is_empty() && !output.ends_with('\n') {
        println!();
    }
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Available processing specifications:\n");
    for format in available_formats() {
        println!("  {}", format);
    }
}
