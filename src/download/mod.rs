use std::path::{Path, PathBuf};
use anyhow::{anyhow, bail, Context, Result};
use bytes::Bytes;
use log::{debug, trace};
use reqwest::{Client, Response};
use crate::download::maven_metadata::MavenMetadata;

pub(crate) mod maven_metadata;

/// Downloads files, caching the ones that never change below a directory.
#[derive(Debug)]
pub(crate) struct Downloader {
	client: Client,
	cache_dir: PathBuf,
}

impl Downloader {
	pub(crate) fn new(cache_dir: PathBuf) -> Downloader {
		Downloader {
			client: Client::new(),
			cache_dir,
		}
	}

	async fn get(&self, url: &str) -> Result<Response> {
		trace!("requesting {url:?}");

		let response = self.client.get(url).send().await
			.with_context(|| anyhow!("failed to request {url:?}"))?;

		if response.status().is_success() {
			Ok(response)
		} else {
			bail!("Got a \"{}\" for {url:?}", response.status());
		}
	}

	/// Downloads and parses a `maven-metadata.xml`. This is never cached, as new versions get added to it.
	pub(crate) async fn get_maven_metadata_xml(&self, url: &str) -> Result<MavenMetadata> {
		let body = self.get(url).await?.text().await?;

		serde_xml_rs::from_str(&body)
			.with_context(|| anyhow!("failed to parse maven metadata from {url:?}"))
	}

	/// Gets the contents of `url`, from the cache file at `path` (relative to the cache directory) if it exists.
	///
	/// A new cache file is first written next to its final place, and then renamed, so that an interrupted download
	/// never leaves a truncated file in the cache.
	pub(crate) async fn get_cached(&self, url: &str, path: &Path) -> Result<Bytes> {
		let path = self.cache_dir.join(path);

		if tokio::fs::try_exists(&path).await? {
			debug!("using cached {path:?} for {url:?}");

			let data = tokio::fs::read(&path).await
				.with_context(|| anyhow!("failed to read cache file {path:?}"))?;

			return Ok(Bytes::from(data));
		}

		debug!("downloading {url:?} to {path:?}");

		let data = self.get(url).await?.bytes().await
			.with_context(|| anyhow!("failed to download {url:?}"))?;

		if let Some(parent) = path.parent() {
			tokio::fs::create_dir_all(parent).await
				.with_context(|| anyhow!("failed to create cache directory {parent:?}"))?;
		}

		let mut temp = path.clone().into_os_string();
		temp.push(".tmp");
		let temp = PathBuf::from(temp);

		tokio::fs::write(&temp, &data).await
			.with_context(|| anyhow!("failed to write cache file {temp:?}"))?;
		tokio::fs::rename(&temp, &path).await
			.with_context(|| anyhow!("failed to move cache file {temp:?} to {path:?}"))?;

		Ok(data)
	}
}
