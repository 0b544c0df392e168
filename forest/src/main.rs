use clap::Parser;
use colored::Colorize;

#[derive(clap::Parser)]
#[command(version, about = "Crown hulls for forest stands")]
struct Cli {
	/// Log every tree that is built.
	#[arg(long, short, global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: forest::Command,
}

fn main() {
	let cli = Cli::parse();

	let level = if cli.verbose {
		log::LevelFilter::Debug
	} else {
		log::LevelFilter::Warn
	};
	if let Err(err) = simple_logger::SimpleLogger::new().with_level(level).init() {
		eprintln!("{} {}", "Logger:".yellow(), err);
	}

	if let Err(err) = forest::run(cli.command) {
		eprintln!("{} {}", "Error:".red().bold(), err);
		std::process::exit(1);
	}
}
