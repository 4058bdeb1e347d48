use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use anyhow::{anyhow, bail, Context, Result};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tinymap::tree::columns::Columns;

/// Placeholder in directory paths of the configuration, replaced by the snapshot given on the command line.
const SNAPSHOT_PLACEHOLDER: &str = "{snapshot}";

/// The configuration the [`NamespaceProvider`][crate::provider::NamespaceProvider] is started with.
///
/// Namespaces keep the order they're given in.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct ProviderConfig {
	pub(crate) cache_dir: PathBuf,
	pub(crate) namespaces: Vec<NamespaceConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct NamespaceConfig {
	pub(crate) name: String,
	pub(crate) source: NamespaceSource,
}

/// Where the mappings of a namespace come from.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum NamespaceSource {
	/// A maven repository, listing the versions in a `maven-metadata.xml`.
	///
	/// Artifact versions look like `1.16.3+build.47`, the highest build of each version is used.
	Maven {
		repository: String,
		group: String,
		artifact: String,
		#[serde(default)]
		classifier: Option<String>,
		columns: ColumnsConfig,
	},
	/// A local directory with files named after the version, like `1.16.3.tiny` or `1.16.3.jar`.
	Directory {
		path: PathBuf,
		columns: ColumnsConfig,
	},
}

impl NamespaceSource {
	pub(crate) fn columns(&self) -> Columns {
		match self {
			NamespaceSource::Maven { columns, .. } => columns.into(),
			NamespaceSource::Directory { columns, .. } => columns.into(),
		}
	}
}

/// Names of the columns in the mapping files, see [`Columns`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct ColumnsConfig {
	pub(crate) obfuscated: String,
	pub(crate) intermediary: String,
	#[serde(default)]
	pub(crate) named: Option<String>,
}

impl From<&ColumnsConfig> for Columns {
	fn from(value: &ColumnsConfig) -> Columns {
		Columns::new(value.obfuscated.as_str(), value.intermediary.as_str(), value.named.as_deref())
	}
}

impl ProviderConfig {
	/// The configuration used when none is given: yarn from the fabric maven, and mcp from pre-converted tiny files
	/// in `<cache_dir>/mcp/<snapshot>`.
	pub(crate) fn default_for(cache_dir: &Path, snapshot: &str) -> ProviderConfig {
		ProviderConfig {
			cache_dir: cache_dir.to_owned(),
			namespaces: vec![
				NamespaceConfig {
					name: "yarn".to_owned(),
					source: NamespaceSource::Maven {
						repository: "https://maven.fabricmc.net/".to_owned(),
						group: "net.fabricmc".to_owned(),
						artifact: "yarn".to_owned(),
						classifier: Some("v2".to_owned()),
						columns: ColumnsConfig {
							obfuscated: "official".to_owned(),
							intermediary: "intermediary".to_owned(),
							named: Some("named".to_owned()),
						},
					},
				},
				NamespaceConfig {
					name: "mcp".to_owned(),
					source: NamespaceSource::Directory {
						path: cache_dir.join("mcp").join(snapshot),
						columns: ColumnsConfig {
							obfuscated: "obf".to_owned(),
							intermediary: "srg".to_owned(),
							named: Some("mcp".to_owned()),
						},
					},
				},
			],
		}
	}

	/// Reads the configuration from a json file, replacing `{snapshot}` in directory paths.
	pub(crate) fn read(path: &Path, snapshot: &str) -> Result<ProviderConfig> {
		let file = File::open(path)
			.with_context(|| anyhow!("failed to open config file {path:?}"))?;

		let mut config: ProviderConfig = serde_json::from_reader(BufReader::new(file))
			.with_context(|| anyhow!("failed to parse config file {path:?}"))?;

		for namespace in &mut config.namespaces {
			if let NamespaceSource::Directory { path, .. } = &mut namespace.source {
				if let Some(string) = path.to_str() {
					if string.contains(SNAPSHOT_PLACEHOLDER) {
						*path = PathBuf::from(string.replace(SNAPSHOT_PLACEHOLDER, snapshot));
					}
				}
			}
		}

		config.validate()
			.with_context(|| anyhow!("invalid config file {path:?}"))?;

		Ok(config)
	}

	pub(crate) fn validate(&self) -> Result<()> {
		let mut seen = IndexSet::new();
		for namespace in &self.namespaces {
			if namespace.name.is_empty() {
				bail!("namespace names must not be empty");
			}
			if !seen.insert(namespace.name.as_str()) {
				bail!("namespace {:?} is configured more than once", namespace.name);
			}
		}
		Ok(())
	}
}
