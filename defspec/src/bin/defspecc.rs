#![deny(clippy::expect_used)]
//! defspec compiler command-line interface
//!
//! Usage:
//!   defspecc file.defspec                        # Print emitted declarations
//!   defspecc file.defspec --json                 # Print declarations as JSON
//!   defspecc file.defspec --config defspec.toml  # Read [compiler] and [modules.*]
//!   defspecc file.defspec --call Mod.fun 1 :ok   # Compile, then call a function
//!
//! Without `--config`, a `defspec.toml` next to the source file is used when
//! present. Environment variables `DEFSPEC_DEFAULT_MODULE` and
//! `DEFSPEC_MAX_CALL_DEPTH` override the configuration file.

use std::env;
use std::path::{Path, PathBuf};

use defspec::api::{compile_file, parse_value, program_to_json, render_program};
use defspec::config::{ConfigError, ProjectConfig};
use defspec::{Value, Vm};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Default)]
struct Options {
    input: Option<PathBuf>,
    json: bool,
    config: Option<PathBuf>,
    call: Option<(String, Vec<String>)>,
}

fn print_usage() {
    println!("defspecc {}", VERSION);
    println!();
    println!("Usage: defspecc <file> [--json] [--config <defspec.toml>] [--call Module.fun args...]");
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => options.json = true,
            "--config" => {
                let path = iter.next().ok_or("--config requires a path")?;
                options.config = Some(PathBuf::from(path));
            }
            "--call" => {
                let target = iter.next().ok_or("--call requires Module.function")?;
                // everything after the target is a call argument
                options.call = Some((target.clone(), iter.by_ref().cloned().collect()));
            }
            flag if flag.starts_with("--") => return Err(format!("unknown option {}", flag)),
            file => {
                if options.input.is_some() {
                    return Err(format!("unexpected argument {}", file));
                }
                options.input = Some(PathBuf::from(file));
            }
        }
    }
    Ok(options)
}

fn load_project(options: &Options, input: &Path) -> Result<ProjectConfig, ConfigError> {
    let mut project = match &options.config {
        Some(path) => ProjectConfig::from_toml_file(path)?,
        None => {
            let sibling = input
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join("defspec.toml");
            if sibling.is_file() {
                ProjectConfig::from_toml_file(&sibling)?
            } else {
                ProjectConfig::default()
            }
        }
    };
    project.compiler = project.compiler.with_env_overrides()?;
    Ok(project)
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() || args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        return;
    }
    if args[0] == "--version" {
        println!("defspecc {}", VERSION);
        return;
    }

    let options = parse_args(&args).unwrap_or_else(|e| fail(e));
    let Some(input) = options.input.clone() else {
        fail("missing input file");
    };
    let project = load_project(&options, &input).unwrap_or_else(|e| fail(e));
    let program = compile_file(&input, &project.compiler).unwrap_or_else(|e| fail(e));

    let Some((target, raw_args)) = &options.call else {
        if options.json || project.compiler.emit_json {
            println!("{}", program_to_json(&program).unwrap_or_else(|e| fail(e)));
        } else {
            print!("{}", render_program(&program));
            println!();
        }
        return;
    };

    let call_args: Vec<Value> = raw_args
        .iter()
        .map(|raw| parse_value(raw).map_err(|e| format!("argument {}: {}", raw, e)))
        .collect::<Result<_, _>>()
        .unwrap_or_else(|e| fail(e));
    let registry = project.registry().unwrap_or_else(|e| fail(e));
    let vm = Vm::with_config(program, registry, &project.compiler)
        .unwrap_or_else(|e| fail(format!("runtime error: {}", e)));
    match vm.call_qualified(target, call_args) {
        Ok(value) => println!("{}", value),
        Err(e) => fail(format!("runtime error: {}", e)),
    }
}
