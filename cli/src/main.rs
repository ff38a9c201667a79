use clap::Parser;
use infra::cli::{run, Cli};

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    if let Err(error) = run(Cli::parse()) {
        eprintln!("\n{}\n{error}", console::style("Error").red().bold());
        std::process::exit(1);
    }

    Ok(())
}
