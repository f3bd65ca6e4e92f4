//! Collage CLI
//!
//! Batch: `collage [PATH]` writes the collage and prints its path.
//! CGI: when `GATEWAY_INTERFACE` is set, the `name` query parameter picks
//! the output path and the image is also returned as the response body.
//! Returns non-zero on any failure.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing::Level;

use collage::{CgiResponse, CollageBuilder, CollageConfig, CollageError, Invocation};

#[derive(Parser, Debug)]
#[command(name = "collage", version)]
#[command(about = "Collage Builder - ten tiles, one 5x2 grid")]
struct Cli {
    /// Output path with file name and extension, e.g. ./folder/image.png
    paths: Vec<String>,

    /// Application root: default output directory and parent of `assets/`
    #[arg(long, env = "COLLAGE_ROOT", default_value = ".")]
    root: PathBuf,

    /// Print the build report as JSON instead of the file path
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    if std::env::var_os("GATEWAY_INTERFACE").is_some() {
        // argv carries nothing meaningful under CGI; flags come from the environment.
        let cli = Cli::parse_from(["collage"]);
        init_tracing(cli.verbose);
        return serve_cgi(&cli);
    }

    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run_batch(&cli)
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    // stdout is the response body under CGI.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn builder(cli: &Cli) -> Result<CollageBuilder, CollageError> {
    tracing::debug!(version = collage::ENGINE_VERSION, root = %cli.root.display(), "starting");
    CollageBuilder::detect(CollageConfig::new(&cli.root))
}

/// At most one positional argument: the output path.
fn output_arg(paths: &[String]) -> Result<Option<&str>, &'static str> {
    match paths {
        [] => Ok(None),
        [path] => Ok(Some(path.as_str())),
        _ => Err("Too many arguments"),
    }
}

fn run_batch(cli: &Cli) -> ExitCode {
    let requested = match output_arg(&cli.paths) {
        Ok(requested) => requested,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = builder(cli).and_then(|b| b.build(requested, Invocation::Batch));

    match result {
        Ok(report) => {
            if cli.json {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        eprintln!("Error: {e}");
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                println!("File generated: {}", report.output.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn serve_cgi(cli: &Cli) -> ExitCode {
    let query = std::env::var("QUERY_STRING").unwrap_or_default();
    let name = query_param(&query, "name");

    let stdout = io::stdout();
    let mut response = CgiResponse::new(stdout.lock());
    let result = builder(cli).and_then(|b| {
        b.build(name.as_deref(), Invocation::Interactive(&mut response))
    });

    match result {
        Ok(report) => {
            tracing::info!(path = %report.output.display(), "served collage");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "build failed");
            // Once the image headers are out the error can only be logged.
            if !response.started() {
                let mut out = response.into_inner();
                let _ = write!(
                    out,
                    "Status: 500 Internal Server Error\r\nContent-Type: text/plain\r\n\r\nError: {e}\n"
                );
                let _ = out.flush();
            }
            ExitCode::FAILURE
        }
    }
}

/// Last value of `key` in an `application/x-www-form-urlencoded` query.
fn query_param(query: &str, key: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (percent_decode(k) == key).then(|| percent_decode(v))
        })
        .last()
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() && hex_pair(bytes[i + 1], bytes[i + 2]).is_some() => {
                out.extend(hex_pair(bytes[i + 1], bytes[i + 2]));
                i += 2;
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_pair(hi: u8, lo: u8) -> Option<u8> {
    let hi = (hi as char).to_digit(16)?;
    let lo = (lo as char).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}
