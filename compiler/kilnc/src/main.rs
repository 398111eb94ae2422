//! Kiln CLI
//!
//! Incremental per-file builds driven by an external compiler.

use kilnc::{build, init_tracing, parse_build_args, LOG_ENV};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "build" => {
            let options = match parse_build_args(&args[2..]) {
                Ok(options) => options,
                Err(err) => {
                    eprintln!("error: {err}");
                    eprintln!("Run `kiln help` for the list of options.");
                    std::process::exit(1);
                }
            };
            init_tracing(options.verbose);

            match build(&options) {
                Ok(summary) => println!("{}", summary.summary_line()),
                // Job failures only name the file; its diagnostics are already out.
                Err(err) => {
                    eprintln!("error: {err}");
                    std::process::exit(1);
                }
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("Kiln {}", env!("CARGO_PKG_VERSION"));
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
    println!("Kiln (incremental per-file builds)");
    println!();
    println!("Usage: kiln <command> [options]");
    println!();
    println!("Commands:");
    println!("  build [options] [-- <command>...]  Compile every stale source file");
    println!("  help                               Show this help message");
    println!("  version                            Show version information");
    println!();
    println!("Build options:");
    println!("  --config <file>          Project file (default: ./kiln.toml if present)");
    println!("  --src <dir>              Source directory");
    println!("  --ext <ext>              Source extension, e.g. .erl");
    println!("  --out <dir>              Target directory (default: the source directory)");
    println!("  --out-ext <ext>          Target extension, e.g. .beam");
    println!("  --priority <file>        Compile this file first (repeatable)");
    println!("  --no-recursive           Only scan the top of the source directory");
    println!("  --force                  Compile even when targets are up to date");
    println!("  --warnings-as-errors     Print warnings of failed files without a prefix");
    println!("  --source-format=<mode>   Paths in diagnostics: absolute, relative, build");
    println!("  -v, --verbose            Log every compiled and skipped file");
    println!();
    println!("The compile command may use {{src}}, {{out}} and {{out_dir}}; without {{src}}");
    println!("the source path is appended. Set {LOG_ENV} to control log output.");
    println!();
    println!("Examples:");
    println!("  kiln build --src src --ext .erl --out ebin --out-ext .beam -- erlc -o {{out_dir}} {{src}}");
    println!("  kiln build --force");
    println!("  kiln build --priority src/behaviour.erl --source-format=absolute");
}
