//! Loading the version index and the mappings of a single namespace.

use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use anyhow::{anyhow, bail, Context, Result};
use bytes::Bytes;
use indexmap::IndexMap;
use indexmap::map::Entry;
use log::{debug, trace};
use walkdir::WalkDir;
use zip::ZipArchive;
use tinymap::tree::columns::Columns;
use tinymap::tree::mappings::MappingsContainer;
use tinymap::tree::version::Version;
use crate::config::NamespaceSource;
use crate::download::Downloader;
use crate::package::MAPPINGS_PATH;

/// Where the mappings for one version of a namespace are found.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Artifact {
	/// The version of the maven artifact, like `1.16.3+build.47`.
	Maven(String),
	File(PathBuf),
}

pub(crate) type VersionIndex = IndexMap<Version, Artifact>;

pub(crate) async fn load_index(downloader: &Downloader, source: &NamespaceSource) -> Result<VersionIndex> {
	match source {
		NamespaceSource::Maven { repository, group, artifact, .. } => {
			let url = format!("{}/maven-metadata.xml", artifact_base_url(repository, group, artifact));

			let metadata = downloader.get_maven_metadata_xml(&url).await?;

			Ok(metadata.latest_builds().into_iter()
				.map(|(version, artifact)| (version, Artifact::Maven(artifact)))
				.collect())
		},
		NamespaceSource::Directory { path, .. } => {
			let path = path.clone();
			tokio::task::spawn_blocking(move || directory_index(&path)).await?
		},
	}
}

fn artifact_base_url(repository: &str, group: &str, artifact: &str) -> String {
	format!("{}/{}/{artifact}", repository.trim_end_matches('/'), group.replace('.', "/"))
}

/// Lists the `<version>.tiny` and `<version>.jar` files of a directory.
fn directory_index(path: &Path) -> Result<VersionIndex> {
	let mut index = IndexMap::new();

	for entry in WalkDir::new(path).min_depth(1).max_depth(1) {
		let entry = entry.with_context(|| anyhow!("failed to list directory {path:?}"))?;

		if !entry.file_type().is_file() {
			continue;
		}

		let file = entry.path();
		let is_mappings = file.extension()
			.is_some_and(|extension| extension == "tiny" || extension == "jar");
		let version = file.file_stem()
			.and_then(|stem| stem.to_str())
			.and_then(|stem| stem.parse::<Version>().ok());

		match version {
			Some(version) if is_mappings => {
				match index.entry(version) {
					Entry::Occupied(e) => bail!("there are two files for version {}: {:?} and {file:?}", e.key(), e.get()),
					Entry::Vacant(e) => {
						e.insert(Artifact::File(file.to_owned()));
					},
				}
			},
			_ => trace!("ignoring {file:?}, it's not named after a version"),
		}
	}

	index.sort_keys();

	Ok(index)
}

/// Gets the mappings of one version, by downloading (or reading) and parsing them.
pub(crate) async fn load(
	downloader: &Downloader,
	namespace: &str,
	source: &NamespaceSource,
	version: &Version,
	artifact: &Artifact,
) -> Result<MappingsContainer> {
	let data = match (source, artifact) {
		(NamespaceSource::Maven { repository, group, artifact: artifact_id, classifier, .. }, Artifact::Maven(artifact_version)) => {
			let file_name = match classifier {
				Some(classifier) => format!("{artifact_id}-{artifact_version}-{classifier}.jar"),
				None => format!("{artifact_id}-{artifact_version}.jar"),
			};
			let url = format!("{}/{artifact_version}/{file_name}", artifact_base_url(repository, group, artifact_id));

			downloader.get_cached(&url, &Path::new(namespace).join(file_name)).await?
		},
		(_, Artifact::File(path)) => {
			debug!("reading {path:?}");

			let data = tokio::fs::read(path).await
				.with_context(|| anyhow!("failed to read mappings file {path:?}"))?;

			Bytes::from(data)
		},
		(source, artifact) => bail!("artifact {artifact:?} doesn't fit to {source:?}"),
	};

	let columns = source.columns();
	let version = version.clone();
	let namespace = namespace.to_owned();

	tokio::task::spawn_blocking(move || parse(&data, version, &namespace, &columns)).await?
		.with_context(|| anyhow!("failed to read mappings of {:?}", artifact))
}

/// Parses mappings, either directly a tiny file, or a zip file with the tiny file at `mappings/mappings.tiny`.
///
/// The tiny format version is detected from the header.
pub(crate) fn parse(data: &[u8], version: Version, namespace: &str, columns: &Columns) -> Result<MappingsContainer> {
	const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

	if data.starts_with(ZIP_MAGIC) {
		let mut zip = ZipArchive::new(Cursor::new(data))?;

		let mut file = zip.by_name(MAPPINGS_PATH)
			.with_context(|| anyhow!("cannot find mappings at {MAPPINGS_PATH:?} in zip file"))?;

		let mut tiny = Vec::new();
		file.read_to_end(&mut tiny)?;

		parse_tiny(&tiny, version, namespace, columns)
	} else {
		parse_tiny(data, version, namespace, columns)
	}
}

fn parse_tiny(data: &[u8], version: Version, namespace: &str, columns: &Columns) -> Result<MappingsContainer> {
	if data.starts_with(b"v1\t") {
		tinymap::tiny_v1::read(data, version, namespace, columns)
	} else if data.starts_with(b"tiny\t2\t0\t") {
		tinymap::tiny_v2::read(data, version, namespace, columns)
	} else {
		let header = data.split(|b| *b == b'\n').next().unwrap_or_default();
		bail!("unknown mappings format, header is {:?}", String::from_utf8_lossy(header));
	}
}
