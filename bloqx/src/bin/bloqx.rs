use clap::Parser;

use bloqx::cli::Cli;

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = cli.run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
