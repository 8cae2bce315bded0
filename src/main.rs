use clap::Parser;
use stockchart::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    dotenv::dotenv().ok();
    run(Cli::parse())
}
