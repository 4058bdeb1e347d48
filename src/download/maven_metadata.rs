use indexmap::IndexMap;
use log::trace;
use serde::{Deserialize, Serialize};
use tinymap::tree::version::Version;

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct MavenMetadata {
	#[serde(rename = "groupId")]
	pub(crate) group_id: String,
	#[serde(rename = "artifactId")]
	pub(crate) artifact_id: String,
	pub(crate) versioning: Versioning,
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct Versioning {
	#[serde(default)]
	pub(crate) latest: Option<String>,
	#[serde(default)]
	pub(crate) release: Option<String>,
	pub(crate) versions: Versions,
	#[serde(rename = "lastUpdated", default)]
	pub(crate) last_updated: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct Versions {
	#[serde(rename = "version", default)]
	pub(crate) versions: Vec<String>,
}

impl MavenMetadata {
	/// Groups the artifact versions by the version they're for, picking the highest build number for each.
	///
	/// Artifact versions without a `+build.` suffix stand for themselves. Versions that don't parse are skipped.
	/// The result is sorted by version.
	pub(crate) fn latest_builds(&self) -> IndexMap<Version, String> {
		let mut builds: IndexMap<Version, (u32, String)> = IndexMap::new();

		for artifact_version in &self.versioning.versions.versions {
			let (version, build) = match artifact_version.split_once("+build.") {
				Some((version, build)) => match build.parse::<u32>() {
					Ok(build) => (version, build),
					Err(_) => {
						trace!("skipping artifact version {artifact_version:?} with invalid build number");
						continue;
					},
				},
				None => (artifact_version.as_str(), 0),
			};

			let Ok(version) = version.parse::<Version>() else {
				trace!("skipping artifact version {artifact_version:?} of {:?}", self.artifact_id);
				continue;
			};

			match builds.get_mut(&version) {
				Some((highest, artifact)) => {
					if build > *highest {
						*highest = build;
						artifact.clone_from(artifact_version);
					}
				},
				None => {
					builds.insert(version, (build, artifact_version.clone()));
				},
			}
		}

		builds.sort_keys();

		builds.into_iter()
			.map(|(version, (_, artifact))| (version, artifact))
			.collect()
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use crate::download::maven_metadata::MavenMetadata;

	#[test]
	fn latest_builds() {
		let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata>
  <groupId>net.fabricmc</groupId>
  <artifactId>yarn</artifactId>
  <versioning>
    <latest>1.16.3+build.47</latest>
    <release>1.16.3+build.47</release>
    <versions>
      <version>1.16.2+build.1</version>
      <version>1.16.3+build.2</version>
      <version>1.16.3+build.47</version>
      <version>1.16.3+build.9</version>
      <version>20w14a+build.1</version>
      <version>1.16-pre1+build.3</version>
    </versions>
    <lastUpdated>20201020120000</lastUpdated>
  </versioning>
</metadata>"#;

		let metadata: MavenMetadata = serde_xml_rs::from_str(xml).unwrap();
		assert_eq!(metadata.group_id, "net.fabricmc");

		let builds: Vec<_> = metadata.latest_builds().into_iter()
			.map(|(version, artifact)| (version.to_string(), artifact))
			.collect();

		assert_eq!(builds, vec![
			("1.16-pre1".to_owned(), "1.16-pre1+build.3".to_owned()),
			("1.16.2".to_owned(), "1.16.2+build.1".to_owned()),
			("1.16.3".to_owned(), "1.16.3+build.47".to_owned()),
		]);
	}
}
