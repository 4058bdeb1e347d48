use anyhow::Result;
use pretty_assertions::assert_eq;
use tinymap::tree::columns::Columns;
use tinymap::tree::mappings::{MappingSource, MappingsContainer};

fn read(input: &str, name: &str) -> Result<MappingsContainer> {
	let columns = Columns::new("official", "intermediary", Some("named"));
	tinymap::tiny_v2::read(input.as_bytes(), "1.16.3".parse()?, name, &columns)
}

#[test]
fn rewire_prefer_target() -> Result<()> {
	let target = include_str!("rewire_target.tiny");
	let reference = include_str!("rewire_reference.tiny");
	let expected = include_str!("rewire_output_prefer_target.tiny");

	let mut target = read(target, "mcp")?;
	let reference = read(reference, "yarn")?;

	target.fill_mapped_class_names_from_intermediary();

	let output = tinymap::rewire::rewire(&target, &reference, true)?;
	assert_eq!(output.mapping_source(), MappingSource::Rewired);
	assert_eq!(output.class_count(), target.class_count());

	let actual = tinymap::tiny_v1::export_string(&output, "intermediary", "named")?;

	assert_eq!(actual, expected, "left: actual, right: expected");

	Ok(())
}

#[test]
fn rewire_prefer_reference() -> Result<()> {
	let target = include_str!("rewire_target.tiny");
	let reference = include_str!("rewire_reference.tiny");
	let expected = include_str!("rewire_output_prefer_reference.tiny");

	let target = read(target, "mcp")?;
	let reference = read(reference, "yarn")?;

	let output = tinymap::rewire::rewire(&target, &reference, false)?;

	let actual = tinymap::tiny_v1::export_string(&output, "intermediary", "named")?;

	assert_eq!(actual, expected, "left: actual, right: expected");

	Ok(())
}

#[test]
fn rewire_rejects_ambiguous_reference() -> Result<()> {
	let target = read(include_str!("rewire_target.tiny"), "mcp")?;
	let reference = read("tiny\t2\t0\tofficial\tintermediary\tnamed\nc\ta\tnet/minecraft/class_1\tFoo\nc\tb\tnet/minecraft/class_1\tBar\n", "yarn")?;

	let error = tinymap::rewire::rewire(&target, &reference, false).unwrap_err();
	assert!(matches!(error, tinymap::Error::Validation(_)), "{error:?}");

	Ok(())
}
