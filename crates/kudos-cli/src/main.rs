//! `kudos`: runs the synthesis pipeline over declaration files and prints
//! every synthesized member.

mod logger;

use clap::{ArgAction, Parser};
use kudos::{
    Error,
    config::KudosConfig,
    frontend::load_path,
    runtime::{interp::Interpreter, value::Instance},
};
use std::{path::PathBuf, process::ExitCode};

///
/// Cli
///

#[derive(Debug, Parser)]
#[command(name = "kudos", version, about = "Synthesize constructors, validators and JSON readers")]
struct Cli {
    /// Declaration files: `.json` descriptors or `.rs` sources.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Configuration file; defaults to `kudos.toml` in the working directory.
    #[arg(long, env = "KUDOS_CONFIG")]
    config: Option<PathBuf>,

    /// Make the reflective JSON library available to the class model.
    #[arg(long)]
    gson_library: bool,

    /// Force the streaming reader on for every marked class.
    #[arg(long)]
    streaming_reader: bool,

    /// Force the reflective adapter on for every marked class.
    #[arg(long)]
    reflective_adapter: bool,

    #[arg(long)]
    disable_validator: bool,

    /// Deserialize a JSON document into this class after synthesis.
    #[arg(long, requires = "json")]
    read: Option<String>,

    /// JSON document for `--read`.
    #[arg(long)]
    json: Option<PathBuf>,

    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Error> {
    let config = match &cli.config {
        Some(path) => KudosConfig::load(path)?,
        None => KudosConfig::load_from_dir(".")?,
    };
    let options = config
        .options()
        .with_streaming_reader(config.options().streaming_reader || cli.streaming_reader)
        .with_reflective_adapter(config.options().reflective_adapter || cli.reflective_adapter)
        .with_validator_disabled(config.options().disable_validator || cli.disable_validator);

    let mut classes = Vec::new();
    for input in &cli.inputs {
        let loaded = load_path(input)?;
        log::info!(target: "kudos", "{}: {} declarations", input.display(), loaded.len());
        classes.extend(loaded);
    }

    let mut table = kudos::class_table(classes, cli.gson_library)?;
    let report = kudos::synthesize(&mut table, options)?;

    if report.is_empty() {
        eprintln!("nothing to synthesize");
    } else {
        println!("{report}");
    }

    if let (Some(class), Some(json)) = (&cli.read, &cli.json) {
        let text = std::fs::read_to_string(json).map_err(|err| {
            Error::new(
                kudos::ErrorKind::Runtime,
                format!("cannot read '{}': {err}", json.display()),
            )
        })?;
        let class = kudos::core::model::ClassId::from(class.as_str());
        let instance = Interpreter::new(&table).deserialize_json(&class, &text)?;
        print_instance(&instance, 0);
    }

    Ok(())
}

fn print_instance(instance: &Instance, depth: usize) {
    let pad = "  ".repeat(depth);

    println!("{pad}{} {{", instance.class);
    for (name, value) in instance.fields() {
        match value {
            kudos::runtime::value::Value::Object(nested) => {
                println!("{pad}  {name}:");
                print_instance(nested, depth + 2);
            }
            other => println!("{pad}  {name}: {other:?}"),
        }
    }
    println!("{pad}}}");
}
