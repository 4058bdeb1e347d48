use std::ffi::OsString;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// The path of the mappings inside a mappings jar.
pub(crate) const MAPPINGS_PATH: &str = "mappings/mappings.tiny";

/// Creates a zip file with the given tiny file as its only entry, at [`MAPPINGS_PATH`].
pub(crate) fn write_zip_file(tiny: &[u8]) -> Result<Vec<u8>> {
	let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

	let options = SimpleFileOptions::default()
		.compression_method(CompressionMethod::Deflated);

	zip.start_file(MAPPINGS_PATH, options)?;
	zip.write_all(tiny)?;

	Ok(zip.finish()?.into_inner())
}

/// Writes the tiny file as a mappings jar to `output`, replacing any file that's already there.
///
/// The jar is first written to `<output>.tmp` and then moved over `output`. If that fails, the temporary file
/// is removed again, and `output` is left as it was.
pub(crate) fn package(tiny: &[u8], output: &Path) -> Result<()> {
	let data = write_zip_file(tiny)?;

	let temp = temp_path(output);

	debug!("writing {} bytes to {temp:?}", data.len());

	let result = std::fs::write(&temp, &data)
		.with_context(|| anyhow!("failed to write {temp:?}"))
		.and_then(|()| {
			std::fs::rename(&temp, output)
				.with_context(|| anyhow!("failed to move {temp:?} to {output:?}"))
		});

	if result.is_err() && temp.exists() {
		if let Err(e) = std::fs::remove_file(&temp) {
			debug!("failed to remove {temp:?}: {e}");
		}
	}
	result?;

	info!("wrote mappings to {output:?}");

	Ok(())
}

fn temp_path(output: &Path) -> PathBuf {
	let mut temp = OsString::from(output.as_os_str());
	temp.push(".tmp");
	PathBuf::from(temp)
}

#[cfg(test)]
mod testing {
	use std::io::{Cursor, Read};
	use pretty_assertions::assert_eq;
	use zip::ZipArchive;
	use crate::package::{package, MAPPINGS_PATH};

	#[test]
	fn package_replaces_output() {
		let dir = tempfile::tempdir().unwrap();
		let output = dir.path().join("output.jar");
		std::fs::write(&output, b"old contents").unwrap();

		let tiny = "v1\tintermediary\tnamed\nCLASS\tnet/x\tFoo\n";
		package(tiny.as_bytes(), &output).unwrap();

		let data = std::fs::read(&output).unwrap();
		let mut zip = ZipArchive::new(Cursor::new(data)).unwrap();
		assert_eq!(zip.len(), 1);

		let mut actual = String::new();
		zip.by_name(MAPPINGS_PATH).unwrap().read_to_string(&mut actual).unwrap();
		assert_eq!(actual, tiny);

		assert!(!dir.path().join("output.jar.tmp").exists());
	}

	#[test]
	fn package_into_missing_directory_fails() {
		let dir = tempfile::tempdir().unwrap();
		let output = dir.path().join("missing").join("output.jar");

		assert!(package(b"v1\tintermediary\tnamed\n", &output).is_err());
		assert!(!output.exists());
	}
}
