use clap::Parser;
use tgl::cli::{self, Args};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();

    let args = Args::parse();
    std::process::exit(cli::run(args));
}
