use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{value_t, App, Arg, ArgMatches, ErrorKind};
use gml2csv::community::CommunityKind;
use gml2csv::input::InputFormat;
use gml2csv::layout::LayoutKind;
use gml2csv::Config;
use log::info;
use simplelog::{LevelFilter, TermLogger, WriteLogger};

fn app() -> App<'static, 'static> {
    App::new("gml2csv")
        .version(env!("CARGO_PKG_VERSION"))
        .about(
            "Converts a graph into a headerless CSV with one row per edge of its largest \
             connected component: x1,y1,x2,y2,source_cluster,target_cluster",
        )
        .arg(
            Arg::with_name("debug")
                .short("d")
                .long("debug")
                .help("Enables debug output")
                .takes_value(false),
        )
        .arg(
            Arg::with_name("layout")
                .long("layout")
                .help("Layout algorithm (kamada-kawai, fruchterman-reingold)")
                .takes_value(true)
                .default_value("kamada-kawai"),
        )
        .arg(
            Arg::with_name("communities")
                .long("communities")
                .help("Community detection algorithm (spinglass, label-propagation)")
                .takes_value(true)
                .default_value("spinglass"),
        )
        .arg(
            Arg::with_name("spins")
                .long("spins")
                .help("Upper bound for the number of spinglass communities")
                .takes_value(true)
                .default_value("16"),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .help("Seed for the randomized algorithms, makes the output reproducible")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("format")
                .long("format")
                .help("Input format (auto, gml, csv), auto decides by file extension")
                .takes_value(true)
                .default_value("auto"),
        )
        .arg(
            Arg::with_name("INPUT")
                .help("graph file to read")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("OUTPUT")
                .help("CSV file to write")
                .required(true)
                .index(2),
        )
}

fn config_from(matches: &ArgMatches) -> std::result::Result<Config, clap::Error> {
    let seed = if matches.is_present("seed") {
        Some(value_t!(matches, "seed", u64)?)
    } else {
        None
    };
    Ok(Config {
        input_format: value_t!(matches, "format", InputFormat)?,
        layout: value_t!(matches, "layout", LayoutKind)?,
        communities: value_t!(matches, "communities", CommunityKind)?,
        spins: value_t!(matches, "spins", usize)?,
        seed,
    })
}

fn init_logging(debug: bool) {
    let log_filter = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let log_config = simplelog::ConfigBuilder::new().build();

    if let Err(e) = TermLogger::init(
        log_filter,
        log_config.clone(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    ) {
        eprintln!("Error, can't initialize the terminal log output: {}.\nWill degrade to a more simple logger", e);
        if let Err(e_simple) = WriteLogger::init(log_filter, log_config, std::io::stderr()) {
            eprintln!("Simple logging failed too: {}", e_simple);
        }
    }
}

fn run(matches: &ArgMatches, config: &Config) -> Result<()> {
    let input = PathBuf::from(matches.value_of_os("INPUT").unwrap_or_default());
    let output = PathBuf::from(matches.value_of_os("OUTPUT").unwrap_or_default());

    let summary = gml2csv::run(&input, &output, config).with_context(|| {
        format!(
            "could not convert {} to {}",
            input.display(),
            output.display()
        )
    })?;
    info!(
        "kept {} of {} nodes and {} of {} edges in {} communities",
        summary.nodes, summary.input_nodes, summary.edges, summary.input_edges, summary.communities
    );
    Ok(())
}

fn main() {
    let matches = match app().get_matches_safe() {
        Ok(matches) => matches,
        Err(e) if e.kind == ErrorKind::HelpDisplayed || e.kind == ErrorKind::VersionDisplayed => {
            e.exit()
        }
        Err(e) => {
            eprintln!("{}", e.message);
            process::exit(1);
        }
    };
    let config = match config_from(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}\n\n{}", e.message, matches.usage());
            process::exit(1);
        }
    };

    init_logging(matches.is_present("debug"));

    if let Err(e) = run(&matches, &config) {
        eprintln!("Error: {:?}", e);
        process::exit(1);
    }
}
