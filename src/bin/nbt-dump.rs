use std::fs::File;
use std::io::{self, BufReader, Read};
use std::process;

use clap::{App, Arg};
use env_logger::Env;
use log::error;
use nbtx::stream::{Compression, Encoding};
use nbtx::Nbt;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let matches = App::new("nbt-dump")
        .about("print the tag tree of an NBT file")
        .arg(
            Arg::with_name("file")
                .help("file to read, stdin if omitted")
                .required(false),
        )
        .arg(
            Arg::with_name("compression")
                .long("compression")
                .short("c")
                .takes_value(true)
                .default_value("gzip")
                .possible_values(&["gzip", "deflate", "none"])
                .help("how the file is compressed"),
        )
        .arg(
            Arg::with_name("encoding")
                .long("encoding")
                .short("e")
                .takes_value(true)
                .default_value("modified-utf-8")
                .help("character encoding of names and strings, eg utf-8, latin-1, utf-16"),
        )
        .arg(
            Arg::with_name("original")
                .long("original")
                .help("only understand the tag ids of the original format"),
        )
        .get_matches();

    let compression = parse_or_exit::<Compression>(matches.value_of("compression"));
    let encoding = parse_or_exit::<Encoding>(matches.value_of("encoding"));

    let nbt = if matches.is_present("original") {
        Nbt::original()
    } else {
        Nbt::extended()
    }
    .with_compression(compression)
    .with_encoding(encoding);

    let input: Box<dyn Read> = match matches.value_of_os("file") {
        Some(path) => match File::open(path) {
            Ok(f) => Box::new(BufReader::new(f)),
            Err(e) => {
                error!("could not open {:?}: {}", path, e);
                process::exit(1);
            }
        },
        None => Box::new(io::stdin()),
    };

    match nbt.read_root(input) {
        Ok(root) => print!("{}", root),
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}

fn parse_or_exit<T>(value: Option<&str>) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    // Both arguments have defaults, so clap always supplies a value.
    match value.unwrap_or_default().parse() {
        Ok(v) => v,
        Err(e) => {
            error!("{}", e);
            process::exit(2);
        }
    }
}
