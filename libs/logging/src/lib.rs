use log::LevelFilter;

pub fn purple(msg: &str) {
    println!("\x1b[48;5;57m{}\x1b[0m", msg);
}

pub fn pink(msg: &str) {
    println!("\x1b[48;5;132m{}\x1b[0m", msg);
}

/// Starts the logger. `RUST_LOG` overrides the default `info` level.
/// Calling this more than once is harmless.
pub fn init() {
    let mut builder = pretty_env_logger::formatted_builder();
    match std::env::var("RUST_LOG") {
        Ok(filters) => {
            builder.parse_filters(&filters);
        }
        Err(_) => {
            builder.filter_level(LevelFilter::Info);
        }
    }
    // a logger may already be installed, e.g. by a test harness
    let _ = builder.try_init();
}
