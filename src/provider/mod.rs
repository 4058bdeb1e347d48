use std::sync::Arc;
use anyhow::{anyhow, bail, Context, Result};
use indexmap::IndexMap;
use log::{debug, info, warn};
use tokio::runtime::Runtime;
use tokio::sync::watch;
use tinymap::tree::mappings::MappingsContainer;
use tinymap::tree::version::Version;
use crate::config::{NamespaceSource, ProviderConfig};
use crate::download::Downloader;
use crate::provider::source::VersionIndex;

pub(crate) mod source;

#[derive(Debug, Clone)]
enum IndexState {
	Loading,
	Ready(Arc<VersionIndex>),
	Failed(String),
}

#[derive(Debug)]
struct Namespace {
	source: NamespaceSource,
	state: watch::Receiver<IndexState>,
}

/// Supplies the mappings of configured namespaces.
///
/// The version index of each namespace is loaded in the background, starting with [`NamespaceProvider::start`].
/// All other methods block until the index they need is loaded. They must not be called from within an async context.
#[derive(Debug)]
pub(crate) struct NamespaceProvider {
	runtime: Runtime,
	downloader: Arc<Downloader>,
	namespaces: IndexMap<String, Namespace>,
}

impl NamespaceProvider {
	pub(crate) fn start(config: ProviderConfig) -> Result<NamespaceProvider> {
		config.validate()?;

		let runtime = tokio::runtime::Builder::new_multi_thread()
			.enable_all()
			.build()
			.context("failed to start the runtime for loading namespaces")?;

		let downloader = Arc::new(Downloader::new(config.cache_dir));

		let mut namespaces = IndexMap::new();

		for namespace in config.namespaces {
			let (sender, receiver) = watch::channel(IndexState::Loading);

			let name = namespace.name.clone();
			let source = namespace.source.clone();
			let downloader = downloader.clone();

			runtime.spawn(async move {
				let state = match source::load_index(&downloader, &source).await {
					Ok(index) => {
						info!("loaded {} versions of namespace {name:?}", index.len());
						IndexState::Ready(Arc::new(index))
					},
					Err(e) => {
						warn!("failed to load versions of namespace {name:?}: {e:#}");
						IndexState::Failed(format!("{e:#}"))
					},
				};
				// fails only if the provider is gone already
				if sender.send(state).is_err() {
					debug!("nobody is waiting for the versions of namespace {name:?}");
				}
			});

			namespaces.insert(namespace.name, Namespace {
				source: namespace.source,
				state: receiver,
			});
		}

		Ok(NamespaceProvider { runtime, downloader, namespaces })
	}

	fn namespace(&self, namespace: &str) -> Result<&Namespace> {
		self.namespaces.get(namespace)
			.ok_or_else(|| tinymap::Error::not_found(format!("namespace {namespace:?} is not configured")).into())
	}

	/// Whether the version index of the namespace has finished loading, successfully or not.
	pub(crate) fn is_ready(&self, namespace: &str) -> bool {
		self.namespaces.get(namespace)
			.is_some_and(|namespace| !matches!(*namespace.state.borrow(), IndexState::Loading))
	}

	async fn index(&self, name: &str, namespace: &Namespace) -> Result<Arc<VersionIndex>> {
		let mut receiver = namespace.state.clone();

		let state = receiver.wait_for(|state| !matches!(state, IndexState::Loading)).await
			.with_context(|| anyhow!("loading the versions of namespace {name:?} stopped"))?
			.clone();

		match state {
			IndexState::Ready(index) => Ok(index),
			IndexState::Failed(message) => bail!("failed to load versions of namespace {name:?}: {message}"),
			IndexState::Loading => bail!("versions of namespace {name:?} are still loading"),
		}
	}

	/// All versions of the namespace, in ascending order.
	pub(crate) fn versions(&self, namespace: &str) -> Result<Vec<Version>> {
		let entry = self.namespace(namespace)?;

		let index = self.runtime.block_on(self.index(namespace, entry))?;

		Ok(index.keys().cloned().collect())
	}

	/// Gets the mappings of the namespace for the version.
	///
	/// Fails with [`tinymap::Error::NotFound`] if the namespace isn't configured or doesn't have that version.
	pub(crate) fn get(&self, version: &Version, namespace: &str) -> Result<MappingsContainer> {
		let entry = self.namespace(namespace)?;

		self.runtime.block_on(self.load(version, namespace, entry))
	}

	async fn load(&self, version: &Version, name: &str, namespace: &Namespace) -> Result<MappingsContainer> {
		let index = self.index(name, namespace).await?;

		let artifact = index.get(version)
			.ok_or_else(|| tinymap::Error::not_found(format!("{version} is not a version of namespace {name:?}")))?;

		info!("loading {name} mappings for {version}");

		let mappings = source::load(&self.downloader, name, &namespace.source, version, artifact).await?;

		debug!("{name} {version}: {} classes, {} methods, {} fields",
			mappings.class_count(), mappings.method_count(), mappings.field_count());

		Ok(mappings)
	}
}

#[cfg(test)]
mod testing {
	use std::path::PathBuf;
	use pretty_assertions::assert_eq;
	use crate::config::{ColumnsConfig, NamespaceConfig, NamespaceSource, ProviderConfig};
	use crate::provider::NamespaceProvider;

	fn directory(name: &str, path: PathBuf) -> NamespaceConfig {
		NamespaceConfig {
			name: name.to_owned(),
			source: NamespaceSource::Directory {
				path,
				columns: ColumnsConfig {
					obfuscated: "official".to_owned(),
					intermediary: "intermediary".to_owned(),
					named: Some("named".to_owned()),
				},
			},
		}
	}

	#[test]
	fn get_from_directory() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::write(dir.path().join("1.16.3.tiny"), "tiny\t2\t0\tofficial\tintermediary\tnamed\nc\ta\tnet/x\tFoo\n").unwrap();
		std::fs::write(dir.path().join("1.16.2.tiny"), "v1\tofficial\tintermediary\nCLASS\ta\tnet/x\n").unwrap();

		let provider = NamespaceProvider::start(ProviderConfig {
			cache_dir: dir.path().join("cache"),
			namespaces: vec![
				directory("test", dir.path().to_owned()),
				directory("missing", dir.path().join("does-not-exist")),
			],
		}).unwrap();

		let versions: Vec<_> = provider.versions("test").unwrap().iter().map(|x| x.to_string()).collect();
		assert_eq!(versions, vec!["1.16.2", "1.16.3"]);
		assert!(provider.is_ready("test"));

		let mappings = provider.get(&"1.16.3".parse().unwrap(), "test").unwrap();
		assert_eq!(mappings.name(), "test");
		assert_eq!(mappings.class("a").unwrap().names().mapped().unwrap(), "Foo");

		let not_found = |e: anyhow::Error| matches!(e.downcast_ref::<tinymap::Error>(), Some(tinymap::Error::NotFound(_)));

		assert!(not_found(provider.get(&"1.12.2".parse().unwrap(), "test").unwrap_err()));
		assert!(not_found(provider.get(&"1.16.3".parse().unwrap(), "other").unwrap_err()));
		assert!(!provider.is_ready("other"));

		// the error of loading the index isn't a missing version
		let error = provider.get(&"1.16.3".parse().unwrap(), "missing").unwrap_err();
		assert!(!not_found(error));
	}
}
