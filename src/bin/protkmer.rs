use std::io;

use clap::{load_yaml, value_t, App, ArgMatches};
use log::error;

use protkmer::cmd::{close, closest, stats, vote, CommandOptions};
use protkmer::config::{IndexConfig, LoadConfig};
use protkmer::errors::ProtKmerErrorCode;
use protkmer::Result;

fn delimiter(value: &str) -> u8 {
    match value {
        "\\t" | "tab" => b'\t',
        v => v.as_bytes().first().copied().unwrap_or(b'\t'),
    }
}

fn options(cmd: &ArgMatches, threshold: f64) -> CommandOptions {
    let ksize = value_t!(cmd, "ksize", usize).unwrap_or_else(|e| e.exit());
    let delimiter = delimiter(cmd.value_of("delimiter").unwrap_or("\t"));

    let column = |name: &str, default: &str| cmd.value_of(name).unwrap_or(default).to_string();

    CommandOptions::builder()
        .index(
            IndexConfig::builder()
                .ksize(ksize)
                .min_similarity(threshold)
                .build(),
        )
        .reference(
            LoadConfig::builder()
                .sequence_column(column("seq-col", "sequence").as_str())
                .payload_column(column("payload-col", "annotation").as_str())
                .delimiter(delimiter)
                .build(),
        )
        .queries(
            LoadConfig::builder()
                .sequence_column(column("query-seq-col", "sequence").as_str())
                .payload_column(column("name-col", "name").as_str())
                .delimiter(delimiter)
                .build(),
        )
        .json(cmd.is_present("json"))
        .build()
}

fn threshold(cmd: &ArgMatches) -> f64 {
    value_t!(cmd, "threshold", f64).unwrap_or_else(|e| e.exit())
}

fn run(m: &ArgMatches) -> Result<()> {
    let stdout = io::stdout();
    let out = stdout.lock();

    match m.subcommand() {
        ("closest", Some(cmd)) => {
            let opts = options(cmd, 0.0);
            closest(
                cmd.value_of("refs").unwrap(),
                cmd.value_of("queries").unwrap(),
                &opts,
                out,
            )
        }
        ("close", Some(cmd)) => {
            let threshold = threshold(cmd);
            let opts = options(cmd, threshold);
            close(
                cmd.value_of("refs").unwrap(),
                cmd.value_of("queries").unwrap(),
                threshold,
                &opts,
                out,
            )
        }
        ("vote", Some(cmd)) => {
            let opts = options(cmd, threshold(cmd));
            vote(
                cmd.value_of("refs").unwrap(),
                cmd.value_of("proposals").unwrap(),
                &opts,
                out,
            )
        }
        ("stats", Some(cmd)) => {
            let opts = options(cmd, 0.0);
            stats(cmd.value_of("refs").unwrap(), &opts, out)
        }
        _ => {
            println!("{}", m.usage());
            Ok(())
        }
    }
}

fn main() {
    let yml = load_yaml!("protkmer.yml");
    let m = App::from_yaml(yml).get_matches();

    let quiet = m.is_present("quiet")
        || m
            .subcommand()
            .1
            .map_or(false, |cmd| cmd.is_present("quiet"));
    let level = if quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(&m) {
        error!("{}", e);
        std::process::exit(ProtKmerErrorCode::from_error(&e).exit_status());
    }
}
