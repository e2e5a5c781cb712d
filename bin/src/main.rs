use std::{error::Error, path::PathBuf, process::exit, time::Instant};

use log::{error, info};
use persistance::{get_config_location, read_config, write_config};

mod analysis;

#[tokio::main]
async fn main() {
    logging::init();
    let args = std::env::args().skip(1).collect::<Vec<String>>();
    let mut config_path: Option<PathBuf> = None;
    let mut show_report = false;
    let mut args = args.iter();
    while let Some(arg) = args.next() {
        match arg.as_ref() {
            "-v" | "--version" => return print_version(),
            "-h" | "--help" => return print_help(),
            "-i" | "--init" => return init(),
            "-r" | "--report" => show_report = true,
            "-c" | "--config" => match args.next() {
                Some(path) => config_path = Some(PathBuf::from(path)),
                None => {
                    eprintln!("{} needs a path", arg);
                    exit(1);
                }
            },
            _ => {
                eprintln!("unknown option: {}", arg);
                exit(1);
            }
        }
    }
    let config_path = match config_path.or_else(|| get_config_location().map(|(_, file)| file)) {
        Some(path) => path,
        None => {
            error!("No config file given and no config directory available, use -c <path>");
            exit(1);
        }
    };
    let config = match read_config(&config_path) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };
    let now = Instant::now();
    if let Err(e) = analysis::analyze(&config, show_report).await {
        fail(&e);
    }
    info!("Scored corpus in {}ms", now.elapsed().as_millis());
}

fn fail(err: &dyn Error) -> ! {
    error!("{}", err);
    let mut source = err.source();
    while let Some(cause) = source {
        error!("  caused by: {}", cause);
        source = cause.source();
    }
    exit(1);
}

fn init() {
    match write_config() {
        Ok(file) => println!("Config file written to {:?}", file),
        Err(e) => fail(&e),
    }
}

fn print_version() {
    println!("slant v{}", env!("CARGO_PKG_VERSION"),);
}

fn print_help() {
    if let Some((_, file)) = get_config_location() {
        println!("\nDefault config file: \x1b[38;5;47m{:#?}\x1b[0m\n", file);
    }
    print!(
        "Usage: slant [options]
        Options:
        -i, --init                   Write the default config file
        -c, --config <path>          Use config at <path>
        -r, --report                 Print mean bias per outlet with bootstrapped intervals
        -v, --version                Print version.
        -h, --help                   Show this message.
        ",
    );
}
