//! hdkey CLI - assign some attributes, print others.
//!
//!   hdkey --bip39-words "<words>" --address-index 0 derived-key-base58
//!   hdkey --key-request <crypto-request:...> --seed <hex> key-response
//!   hdkey --describe
//!
//! Every `--<attribute> <value>` pair is an assignment; every bare word
//! names an attribute to print. Unassigned attributes are derived on
//! demand from the ones given.
//!
//! Output format:
//!   (default)  one value per line, in request order
//!   --json     a single JSON object keyed by attribute name

use anyhow::{anyhow, Context};
use hdkey_model::logging::init_logging;
use hdkey_model::{Config, Model};
use serde_json::{json, Map, Value};
use std::env;
use std::io::{self, IsTerminal};
use tracing::debug;

const DEFAULT_OUTPUT: &str = "key-request";

fn main() {
    let args: Vec<String> = env::args().collect();
    let opts = ParsedArgs::parse(&args[1..]);

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => fail(&opts, &anyhow!(e).context("reading HDKEY_* environment")),
    };
    init_logging(&config);

    if opts.help {
        print_usage();
        return;
    }
    if opts.version {
        println!("hdkey {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    match run(&opts, &config) {
        Ok(output) => print_output(&opts, output),
        Err(e) => fail(&opts, &e),
    }
}

#[derive(Default)]
struct ParsedArgs {
    assignments: Vec<(String, String)>,
    outputs: Vec<String>,
    /// Trailing `--<attribute>` with no value.
    dangling: Option<String>,
    json: bool,
    describe: bool,
    help: bool,
    version: bool,
}

impl ParsedArgs {
    fn parse(args: &[String]) -> Self {
        // Load .env file if present
        if let Ok(contents) = std::fs::read_to_string(".env") {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let value = value.trim().trim_matches('"');
                    if !value.is_empty() && env::var(key.trim()).is_err() {
                        env::set_var(key.trim(), value);
                    }
                }
            }
        }

        let mut opts = ParsedArgs::default();
        let mut i = 0;

        while i < args.len() {
            let arg = &args[i];
            match arg.as_str() {
                "--help" | "-h" => opts.help = true,
                "--version" | "-V" => opts.version = true,
                "--json" => opts.json = true,
                "--describe" => opts.describe = true,
                flag if flag.starts_with("--") => {
                    let name = flag.trim_start_matches("--").to_string();
                    if i + 1 < args.len() {
                        opts.assignments.push((name, args[i + 1].clone()));
                        i += 1;
                    } else {
                        opts.dangling = Some(name);
                    }
                }
                _ => opts.outputs.push(arg.clone()),
            }
            i += 1;
        }
        opts
    }
}

enum Output {
    Values(Vec<(String, String)>),
    Describe(Value),
}

fn run(opts: &ParsedArgs, config: &Config) -> anyhow::Result<Output> {
    let model = Model::new();

    if opts.describe {
        return Ok(Output::Describe(json!({
            "attributes": model.describe(),
            "derivations": model.derivations(),
        })));
    }

    if let Some(name) = &opts.dangling {
        return Err(anyhow!("--{name} expects a value"));
    }
    for (name, value) in &opts.assignments {
        debug!("assign {} = {}", name, value);
        model.assign(name, value).with_context(|| format!("--{name}"))?;
    }
    model.apply_config(config);

    let outputs = if opts.outputs.is_empty() { vec![DEFAULT_OUTPUT.to_string()] } else { opts.outputs.clone() };
    let mut values = Vec::with_capacity(outputs.len());
    for name in outputs {
        let value = model
            .value_string(&name)
            .with_context(|| format!("computing '{name}'"))?
            .ok_or_else(|| anyhow!("no value for '{name}': supply more inputs"))?;
        values.push((name, value));
    }
    Ok(Output::Values(values))
}

fn print_output(opts: &ParsedArgs, output: Output) {
    match output {
        Output::Describe(table) if opts.json => println!("{}", to_json(&table)),
        Output::Describe(table) => {
            for row in table["attributes"].as_array().into_iter().flatten() {
                println!("{:<30} {:<26} {}", row["name"].as_str().unwrap_or_default(), row["type"].as_str().unwrap_or_default(), row["help"].as_str().unwrap_or_default());
            }
            println!();
            for line in table["derivations"].as_array().into_iter().flatten() {
                println!("{}", line.as_str().unwrap_or_default());
            }
        }
        Output::Values(values) if opts.json => {
            let map: Map<String, Value> = values.into_iter().map(|(k, v)| (k, Value::String(v))).collect();
            println!("{}", to_json(&Value::Object(map)));
        }
        Output::Values(values) => {
            for (_, value) in values {
                println!("{value}");
            }
        }
    }
}

fn to_json(value: &Value) -> String {
    let rendered = if io::stdout().is_terminal() { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) };
    rendered.unwrap_or_else(|_| value.to_string())
}

fn fail(opts: &ParsedArgs, err: &anyhow::Error) -> ! {
    if opts.json {
        eprintln!("{}", json!({ "error": format!("{err:#}") }));
    } else {
        eprintln!("error: {err:#}");
    }
    std::process::exit(1);
}

fn print_usage() {
    println!(
        r#"hdkey - BIP-32 key request / response model

USAGE:
    hdkey [--<attribute> <value>]... [<attribute>]...

    Each --<attribute> <value> assigns an input; each bare <attribute>
    is printed. With no attribute named, prints {DEFAULT_OUTPUT}.

OPTIONS:
    --json                  Print a JSON object instead of lines
    --describe              List attributes and their derivations
    --help, -h              Print this message
    --version, -V           Print version

ENVIRONMENT:
    HDKEY_NETWORK           Default network (mainnet | testnet)
    HDKEY_ASSET             Default asset (btc | eth)
    HDKEY_LOG_JSON          1 for JSON log lines on stderr
    RUST_LOG                Log filter (default: warn)

EXAMPLES:
    hdkey --bip39-words "<12 words>" --address-index 0 key-request
    hdkey --key-request <request> --bip39-words "<12 words>" derived-key-base58
    hdkey --seed-request <request> --seed <hex> seed-response"#
    );
}
