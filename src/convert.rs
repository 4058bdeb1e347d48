use std::path::PathBuf;
use std::time::Instant;
use anyhow::{anyhow, Context, Result};
use log::info;
use tinymap::tree::version::Version;
use crate::package;
use crate::provider::NamespaceProvider;

/// The header names of the two columns written.
const COLUMNS: (&str, &str) = ("intermediary", "named");

#[derive(Debug)]
pub(crate) struct ConvertRequest {
	pub(crate) version: Version,
	/// The namespace whose names end up in the output, like `mcp`.
	pub(crate) target: String,
	/// The namespace whose intermediary names end up in the output, like `yarn`.
	pub(crate) reference: String,
	pub(crate) prefer_target_names: bool,
	pub(crate) output: PathBuf,
}

/// Fuses the target mappings with the reference mappings, and writes them to a mappings jar.
pub(crate) fn convert(provider: &NamespaceProvider, request: &ConvertRequest) -> Result<()> {
	let start = Instant::now();
	let version = &request.version;

	for namespace in [&request.reference, &request.target] {
		if !provider.is_ready(namespace) {
			info!("waiting for the versions of {namespace} to load...");
		}
	}

	// check this before loading anything, missing versions of the reference are the common error
	let versions = provider.versions(&request.reference)?;
	if !versions.contains(version) {
		return Err(tinymap::Error::not_found(format!("{version} is not a version of {}, the latest one is {}",
			request.reference,
			versions.last().map_or_else(|| "unknown".to_owned(), |x| x.to_string()),
		)).into());
	}

	let reference = provider.get(version, &request.reference)
		.with_context(|| anyhow!("failed to get {} mappings for {version}", request.reference))?;

	let mut target = provider.get(version, &request.target)
		.with_context(|| anyhow!("failed to get {} mappings for {version}", request.target))?;

	target.fill_mapped_class_names_from_intermediary();

	let fused = tinymap::rewire::rewire(&target, &reference, request.prefer_target_names)
		.with_context(|| anyhow!("failed to rewire {} mappings with {} mappings", request.target, request.reference))?;

	let tiny = tinymap::tiny_v1::export(&fused, COLUMNS.0, COLUMNS.1)?;

	info!("outputting to {:?} (overriding if it exists)", request.output);

	package::package(&tiny, &request.output)?;

	info!("converting took {:?}", start.elapsed());

	Ok(())
}
