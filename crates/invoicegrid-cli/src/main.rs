// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;

use anyhow::{Context, Result};
use config::Config;
use invoicegrid_app::{GridState, RowStore, demo_store};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

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
            "load config {}; run `invoicegrid --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let source = DataSource::resolve(&options, &config);
    let store = source.load()?;
    let sort = config.initial_sort()?;
    if options.check_only {
        println!("{}: {} invoices", source.describe(), store.len());
        return Ok(());
    }

    logging::init(&config.log_path()?, config.log_level())?;
    info!(source = source.describe().as_str(), rows = store.len(), "dataset loaded");

    let mut state = GridState::new(store).with_sort(sort);
    invoicegrid_tui::run_app(&mut state)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DataSource {
    File(PathBuf),
    Demo { rows: usize, seed: u64 },
}

impl DataSource {
    /// `--demo` beats any path; `--data` beats `[data].path`; no path means demo rows.
    fn resolve(options: &CliOptions, config: &Config) -> Self {
        let demo = Self::Demo {
            rows: config.demo_rows(),
            seed: config.demo_seed(),
        };
        if options.demo {
            return demo;
        }
        match options.data_path.clone().or_else(|| config.data_path()) {
            Some(path) => Self::File(path),
            None => demo,
        }
    }

    fn load(&self) -> Result<RowStore> {
        match self {
            Self::File(path) => load_data_file(path),
            Self::Demo { rows, seed } => Ok(demo_store(*rows, *seed)),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Demo { rows, seed } => format!("demo ({rows} rows, seed {seed})"),
        }
    }
}

fn load_data_file(path: &Path) -> Result<RowStore> {
    let raw = fs::read_to_string(path).with_context(|| {
        format!(
            "read data file {} -- if this path is wrong, pass --data or set [data].path",
            path.display()
        )
    })?;
    RowStore::from_json(&raw).with_context(|| format!("load invoices from {}", path.display()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    data_path: Option<PathBuf>,
    print_config_path: bool,
    demo: bool,
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
        data_path: None,
        print_config_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--data" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--data requires a JSON file path"))?;
                options.data_path = Some(PathBuf::from(value.as_ref()));
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("invoicegrid");
    println!("  --config <path>          Use a specific config path");
    println!("  --data <path>            Load invoices from a JSON file");
    println!("  --demo                   Launch with generated demo invoices");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --check                  Validate config and data, then exit");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, DataSource, load_data_file, parse_cli_args};
    use crate::config::Config;
    use anyhow::Result;
    use invoicegrid_testkit::{sample_rows, temp_data_path};
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/invoicegrid-config.toml")
    }

    fn config_from(content: &str) -> Result<(tempfile::TempDir, Config)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        let config = Config::load(&path)?;
        Ok((temp, config))
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                data_path: None,
                print_config_path: false,
                demo: false,
                print_example: false,
                check_only: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_and_data_paths() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml", "--data", "/srv/invoices.json"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        assert_eq!(options.data_path, Some(PathBuf::from("/srv/invoices.json")));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_values() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));

        let error = parse_cli_args(vec!["--data"], default_options_path())
            .expect_err("missing data value should fail");
        assert!(error.to_string().contains("--data requires"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_sets_print_and_check_flags() -> Result<()> {
        let options = parse_cli_args(
            vec!["--print-config-path", "--print-example-config", "--check"],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(!options.demo);
        assert!(options.print_example);
        assert!(options.check_only);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], default_options_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(short.show_help);
        Ok(())
    }

    #[test]
    fn data_flag_beats_config_path() -> Result<()> {
        let (_temp, config) = config_from("version = 1\n[data]\npath = \"/from/config.json\"\n")?;
        let options = parse_cli_args(vec!["--data", "/from/flag.json"], default_options_path())?;
        assert_eq!(
            DataSource::resolve(&options, &config),
            DataSource::File(PathBuf::from("/from/flag.json"))
        );

        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            DataSource::resolve(&options, &config),
            DataSource::File(PathBuf::from("/from/config.json"))
        );
        Ok(())
    }

    #[test]
    fn demo_flag_beats_any_path() -> Result<()> {
        let (_temp, config) = config_from(
            "version = 1\n[data]\npath = \"/from/config.json\"\ndemo_rows = 12\ndemo_seed = 3\n",
        )?;
        let options = parse_cli_args(
            vec!["--demo", "--data", "/from/flag.json"],
            default_options_path(),
        )?;
        let source = DataSource::resolve(&options, &config);
        assert_eq!(source, DataSource::Demo { rows: 12, seed: 3 });
        assert_eq!(source.load()?.len(), 12);
        Ok(())
    }

    #[test]
    fn no_path_falls_back_to_demo_rows() -> Result<()> {
        let (_temp, config) = config_from("version = 1\n")?;
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        let source = DataSource::resolve(&options, &config);
        assert_eq!(source, DataSource::Demo { rows: 500, seed: 42 });
        assert_eq!(source.load()?.len(), 500);
        Ok(())
    }

    #[test]
    fn data_file_loads_rows() -> Result<()> {
        let rows = sample_rows();
        let (_dir, path) = temp_data_path(&rows)?;
        let store = load_data_file(&path)?;
        assert_eq!(store.rows(), rows.as_slice());
        Ok(())
    }

    #[test]
    fn missing_data_file_names_the_fix() {
        let error = load_data_file(&PathBuf::from("/definitely/missing/invoices.json"))
            .expect_err("missing file should fail");
        let message = error.to_string();
        assert!(message.contains("read data file"));
        assert!(message.contains("--data"));
    }

    #[test]
    fn invalid_data_file_reports_path() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("invoices.json");
        std::fs::write(&path, "{\"not\": \"an array\"}")?;
        let error = load_data_file(&path).expect_err("object payload should fail");
        let message = format!("{error:#}");
        assert!(message.contains("load invoices from"));
        assert!(message.contains("JSON array"));
        Ok(())
    }
}
