extern crate clap;
#[macro_use] extern crate log;
extern crate fern;
extern crate chrono;
extern crate term_grid;

pub mod compiler;

use clap::{Arg, ArgMatches, App};
use term_grid::{Grid, GridOptions, Direction, Filling, Cell};

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use compiler::lexer::Token;
use compiler::parser::{Skip, SkipReason};

const DEFAULT_INPUT: &str = "program.hlx";

fn main() {
    let args = process_arguments();
    initialize_logging(args.occurrences_of("verbose"));

    debug!("Arguments:\n\tVerbosity: {}\n\tLex Only: {}\n\tOutfile: {}\n\tInfile: {}",
        verbosity_filter(args.occurrences_of("verbose")),
        args.is_present("lex-only"),
        args.value_of("output").unwrap_or("None"),
        args.value_of("INPUT").unwrap_or(DEFAULT_INPUT)
    );

    let ipath = Path::new(args.value_of("INPUT").unwrap_or(DEFAULT_INPUT));

    let source = match fs::read_to_string(&ipath) {
        Err(err) => {
            error!("fatal: unable to read input file `{}`: {}", ipath.display(), err);
            std::process::exit(1);
        },
        Ok(source) => source,
    };

    let compilation = compiler::compile(&source);

    if args.is_present("lex-only") {
        println!("{}", token_table(&compilation.tokens));
        return;
    }

    if args.is_present("print-debug") {
        println!("{}", token_table(&compilation.tokens));
        println!("{}", skip_table(&compilation.skipped));
    }

    let opath = match args.value_of("output") {
        Some(filename) => Path::new(filename).to_path_buf(),
        None => ipath.with_extension("asm"),
    };

    if opath.as_path() == ipath {
        error!("fatal: output file `{}` would overwrite the input", opath.display());
        std::process::exit(1);
    }

    let mut ofile = match File::create(&opath) {
        Err(err) => {
            error!("fatal: unable to open output file `{}`: {}", opath.display(), err);
            std::process::exit(1);
        },
        Ok(file) => file,
    };

    if let Err(err) = writeln!(ofile, "{}", compilation.output()) {
        error!("fatal: unable to write to output file `{}`: {}", opath.display(), err);
        std::process::exit(1);
    }

    info!("compiled `{}` to `{}` ({} line(s), {} skipped token(s), {} dropped character(s))",
        ipath.display(),
        opath.display(),
        compilation.listing.len(),
        compilation.skipped.iter().filter(|s| s.reason != SkipReason::BlankLine).count(),
        compilation.dropped.len()
    );
}

fn token_table(tokens: &[Token]) -> String {
    let mut grid = Grid::new(GridOptions {
        filling:     Filling::Spaces(1),
        direction:   Direction::LeftToRight,
    });

    for (idx, tok) in tokens.iter().enumerate() {
        grid.add(Cell::from(format!("0x{:04X}:", idx)));
        grid.add(Cell::from(format!("{}:{}", tok.line, tok.column)));
        grid.add(Cell::from(format!("{}", tok.kind)));
        grid.add(Cell::from(format!("{}", tok.value.escape_debug())));
    }

    grid.fit_into_columns(4).to_string()
}

fn skip_table(skipped: &[Skip]) -> String {
    let mut grid = Grid::new(GridOptions {
        filling:     Filling::Spaces(1),
        direction:   Direction::LeftToRight,
    });

    for skip in skipped.iter().filter(|s| s.reason != SkipReason::BlankLine) {
        grid.add(Cell::from("skipped".to_string()));
        grid.add(Cell::from(format!("{}", skip)));
    }

    grid.fit_into_columns(2).to_string()
}

fn process_arguments() -> ArgMatches<'static> {
    App::new(option_env!("CARGO_PKG_NAME").unwrap_or("hlxc"))
        .version(option_env!("CARGO_PKG_VERSION").unwrap_or("0.0.0"))
        .author(option_env!("CARGO_PKG_AUTHORS").unwrap_or(""))
        .about(option_env!("CARGO_PKG_DESCRIPTION").unwrap_or(""))
        .arg(Arg::with_name("INPUT")
            .help("Sets the input file to use")
            .default_value(DEFAULT_INPUT)
            .multiple(false)
            .index(1))
        .arg(Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .takes_value(false)
            .help("Sets the level of verbosity"))
        .arg(Arg::with_name("output")
            .short("o")
            .takes_value(true)
            .help("write output to an outfile (defaults to the input with an .asm extension)"))
        .arg(Arg::with_name("lex-only")
            .short("e")
            .takes_value(false)
            .help("lex only; print the token stream and write nothing"))
        .arg(Arg::with_name("print-debug")
            .short("d")
            .alias("show")
            .alias("s")
            .takes_value(false)
            .help("prints the tokens and skipped statements to STDOUT alongside the listing"))
        .get_matches()
}

fn verbosity_filter(verbosity: u64) -> log::LevelFilter {
    match verbosity {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

fn initialize_logging(verbosity: u64) {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(verbosity_filter(verbosity))
        .chain(std::io::stdout())
        .apply().ok();
}
