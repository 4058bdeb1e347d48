use std::path::PathBuf;
use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser};
use log::{info, warn, LevelFilter};
use tinymap::tree::version::Version;
use crate::config::ProviderConfig;
use crate::convert::ConvertRequest;
use crate::provider::NamespaceProvider;

mod config;
mod convert;
mod download;
mod package;
mod provider;

/// Converts MCP mappings into a tiny mappings jar, using the intermediary names of yarn.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
	/// The version to convert the mappings of, like `1.16.3`.
	#[arg(value_name = "VERSION")]
	minecraft_version: Version,

	/// The MCP snapshot to use, in the form of a date, like `20200916`.
	#[arg(value_name = "SNAPSHOT", value_parser = parse_snapshot)]
	snapshot: String,

	/// Where to write the mappings jar to.
	#[arg(short = 'o', long = "output", default_value = "output.jar")]
	output: PathBuf,

	/// Where to cache downloaded files. Overrides the one from the config file.
	#[arg(long = "cache-dir")]
	cache_dir: Option<PathBuf>,

	/// A json file configuring the namespaces.
	#[arg(long = "config")]
	config: Option<PathBuf>,

	/// The namespace providing the names.
	#[arg(long = "target", default_value = "mcp")]
	target: String,

	/// The namespace providing the intermediary names.
	#[arg(long = "reference", default_value = "yarn")]
	reference: String,

	/// Replace names of the target with the names of the reference, instead of only filling in missing ones.
	#[arg(long = "prefer-reference-names")]
	prefer_reference_names: bool,

	/// Be verbose. Given twice, be even more verbose.
	#[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
	verbose: u8,

	/// Only print warnings and errors.
	#[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
	quiet: bool,
}

fn parse_snapshot(snapshot: &str) -> Result<String, String> {
	if !snapshot.is_empty() && snapshot.bytes().all(|b| b.is_ascii_digit()) {
		Ok(snapshot.to_owned())
	} else {
		Err(format!("{snapshot:?} is not a valid mcp snapshot (it should be in a form of date, example: 20200916)"))
	}
}

fn setup_logger(level: LevelFilter) -> Result<()> {
	fern::Dispatch::new()
		.format(|out, message, record| {
			out.finish(format_args!("[{} {}] {}", record.level(), record.target(), message))
		})
		.level(level)
		.chain(std::io::stderr())
		.apply()
		.context("failed to set up logging")
}

const BANNER: &str = "\
==================================================
Please DO NOT redistribute the mappings converted.
It may be a violation of MCP's license!
==================================================";

fn main() -> Result<()> {
	let cli = Cli::parse();

	let level = match (cli.quiet, cli.verbose) {
		(true, _) => LevelFilter::Warn,
		(false, 0) => LevelFilter::Info,
		(false, 1) => LevelFilter::Debug,
		(false, _) => LevelFilter::Trace,
	};
	setup_logger(level)?;

	for line in BANNER.lines() {
		warn!("{line}");
	}

	let mut config = match &cli.config {
		Some(path) => ProviderConfig::read(path, &cli.snapshot)?,
		None => {
			let cache_dir = cli.cache_dir.clone().unwrap_or_else(|| PathBuf::from("linkie-cache"));
			ProviderConfig::default_for(&cache_dir, &cli.snapshot)
		},
	};
	if let Some(cache_dir) = cli.cache_dir {
		config.cache_dir = cache_dir;
	}

	info!("loading in namespaces...");

	let provider = NamespaceProvider::start(config)?;

	let request = ConvertRequest {
		version: cli.minecraft_version,
		target: cli.target,
		reference: cli.reference,
		prefer_target_names: !cli.prefer_reference_names,
		output: cli.output,
	};

	convert::convert(&provider, &request)
		.with_context(|| anyhow!("failed to convert mappings for {}", request.version))?;

	info!("done!");

	Ok(())
}

#[cfg(test)]
mod testing {
	use clap::Parser;
	use pretty_assertions::assert_eq;
	use crate::Cli;

	#[test]
	fn parse_arguments() {
		let cli = Cli::try_parse_from(["mcp-tiny", "1.16.3", "20200916"]).unwrap();
		assert_eq!(cli.minecraft_version.to_string(), "1.16.3");
		assert_eq!(cli.snapshot, "20200916");
		assert_eq!(cli.output.to_str(), Some("output.jar"));
		assert!(!cli.prefer_reference_names);

		let cli = Cli::try_parse_from(["mcp-tiny", "-vv", "--prefer-reference-names", "1.16.3", "20200916"]).unwrap();
		assert_eq!(cli.verbose, 2);
		assert!(cli.prefer_reference_names);

		assert!(Cli::try_parse_from(["mcp-tiny", "1.16.3"]).is_err());
		assert!(Cli::try_parse_from(["mcp-tiny", "1.16.3", "2020-09-16"]).is_err());
		assert!(Cli::try_parse_from(["mcp-tiny", "1.16.x", "20200916"]).is_err());
		assert!(Cli::try_parse_from(["mcp-tiny", "-q", "-v", "1.16.3", "20200916"]).is_err());
	}
}
