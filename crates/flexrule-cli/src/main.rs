// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context as _, Result, anyhow, bail};
use config::Config;
use flexrule_app::{Context, START_SCREEN};
use flexrule_engine::RenderRequest;
use runtime::Runtime;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_TARGETS: [&str; 4] = [
    "flexrule",
    "flexrule_app",
    "flexrule_engine",
    "flexrule_catalog",
];

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `flexrule --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;
    init_logging(options.verbose, config.log_level());

    let runtime = Runtime::from_config(&config, options.defaults_file.as_deref())?;
    let context = match &options.context_path {
        Some(path) => runtime::load_context(path)?,
        None => Context::new(),
    };
    let rules = match &options.rules_path {
        Some(path) => runtime::load_rules(path)?,
        None if options.check_only => Vec::new(),
        None => bail!("--rules <path> is required; run with --help to see supported options"),
    };
    if options.check_only {
        return Ok(());
    }

    let language = options.language.as_deref().unwrap_or(config.language());
    let request = RenderRequest::new(&options.screen)
        .include_defaults(!options.no_defaults && config.include_defaults())
        .defaults_version(
            options
                .defaults_version
                .as_deref()
                .or(config.defaults_version()),
        )
        .language(language);

    let report = runtime.render(&rules, &context, &request);
    let output = if options.explain {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string_pretty(&report.state)
    }
    .context("serialize render output")?;
    println!("{output}");
    Ok(())
}

/// `--verbose` wins, then `RUST_LOG`, then `[logging].level`. Logs go to
/// stderr so stdout stays valid JSON.
fn init_logging(verbose: bool, configured_level: &str) {
    let filter = if verbose {
        EnvFilter::new(log_directives("debug"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(log_directives(configured_level)))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn log_directives(level: &str) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    rules_path: Option<PathBuf>,
    context_path: Option<PathBuf>,
    defaults_file: Option<PathBuf>,
    screen: String,
    language: Option<String>,
    defaults_version: Option<String>,
    no_defaults: bool,
    explain: bool,
    verbose: bool,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        rules_path: None,
        context_path: None,
        defaults_file: None,
        screen: START_SCREEN.to_owned(),
        language: None,
        defaults_version: None,
        no_defaults: false,
        explain: false,
        verbose: false,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                options.config_path =
                    PathBuf::from(flag_value(&mut iter, "--config", "a file path")?);
            }
            "--rules" => {
                options.rules_path =
                    Some(PathBuf::from(flag_value(&mut iter, "--rules", "a file path")?));
            }
            "--context" => {
                options.context_path =
                    Some(PathBuf::from(flag_value(&mut iter, "--context", "a file path")?));
            }
            "--defaults-file" => {
                options.defaults_file = Some(PathBuf::from(flag_value(
                    &mut iter,
                    "--defaults-file",
                    "a file path",
                )?));
            }
            "--screen" => {
                options.screen = flag_value(&mut iter, "--screen", "a screen name")?;
            }
            "--language" => {
                options.language =
                    Some(flag_value(&mut iter, "--language", "a language code")?);
            }
            "--defaults-version" => {
                options.defaults_version =
                    Some(flag_value(&mut iter, "--defaults-version", "a version id")?);
            }
            "--no-defaults" => {
                options.no_defaults = true;
            }
            "--explain" => {
                options.explain = true;
            }
            "--verbose" | "-v" => {
                options.verbose = true;
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn flag_value<S: AsRef<str>>(
    iter: &mut impl Iterator<Item = S>,
    flag: &str,
    what: &str,
) -> Result<String> {
    let value = iter
        .next()
        .ok_or_else(|| anyhow!("{flag} requires {what}"))?;
    let value = value.as_ref();
    if value.is_empty() {
        bail!("{flag} requires {what}");
    }
    Ok(value.to_owned())
}

fn print_help() {
    println!("flexrule: resolve a screen's UI state from rules and a context");
    println!("  --rules <path>             Rules JSON (array or {{\"rules\": [...]}})");
    println!("  --context <path>           Context JSON object of sections");
    println!("  --screen <name>            Screen to render (default: start)");
    println!("  --language <code>          Label language (default: [engine].language)");
    println!("  --no-defaults              Skip default effects");
    println!("  --defaults-version <id>    Pin a default effects version");
    println!("  --defaults-file <path>     Read default effects from a file instead of the catalog");
    println!("  --explain                  Print matched rules and counts with the state");
    println!("  --verbose, -v              Debug logging on stderr");
    println!("  --config <path>            Use a specific config path");
    println!("  --print-config-path        Print resolved config path");
    println!("  --print-example-config     Print a v1 config template");
    println!("  --check                    Validate config and input files");
    println!("  --help                     Show this help");
}
