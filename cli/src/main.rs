mod cli;
mod config;
mod logging;
mod transport;

fn main() {
    logging::init_logging();

    if let Err(err) = cli::run_from_args() {
        eprintln!("hal-form error: {:#}", err);
        std::process::exit(1);
    }
}
