use anyhow::Result;
use pretty_assertions::assert_eq;
use tinymap::tree::columns::Columns;

#[test]
fn export_is_deterministic() -> Result<()> {
	let columns = Columns::new("official", "intermediary", Some("named"));
	let mappings = tinymap::tiny_v2::read(include_str!("rewire_reference.tiny").as_bytes(), "1.16.3".parse()?, "yarn", &columns)?;

	let first = tinymap::tiny_v1::export(&mappings, "intermediary", "named")?;
	let second = tinymap::tiny_v1::export(&mappings, "intermediary", "named")?;

	assert_eq!(first, second);

	Ok(())
}

#[test]
fn export_row_counts() -> Result<()> {
	let columns = Columns::new("official", "intermediary", Some("named"));
	let mappings = tinymap::tiny_v2::read(include_str!("rewire_target.tiny").as_bytes(), "1.16.3".parse()?, "mcp", &columns)?;

	let actual = tinymap::tiny_v1::export_string(&mappings, "intermediary", "named")?;

	let count = |kind: &str| actual.lines().filter(|line| line.split('\t').next() == Some(kind)).count();
	assert_eq!(count("CLASS"), mappings.class_count());
	assert_eq!(count("METHOD"), mappings.method_count());
	assert_eq!(count("FIELD"), mappings.field_count());

	// reading it back, the first column is now the key
	let columns = Columns::new("intermediary", "intermediary", Some("named"));
	let read_back = tinymap::tiny_v1::read(actual.as_bytes(), "1.16.3".parse()?, "mcp", &columns)?;
	assert_eq!(read_back.class_count(), mappings.class_count());
	assert_eq!(read_back.method_count(), mappings.method_count());
	assert_eq!(read_back.field_count(), mappings.field_count());

	Ok(())
}

#[test]
fn export_falls_back_to_obfuscated() -> Result<()> {
	let columns = Columns::new("official", "intermediary", Some("named"));
	let input = "tiny\t2\t0\tofficial\tintermediary\tnamed\nc\ta\t\t\n\tf\tI\tb\t\t\nc\tc\tnet/x\t\n";
	let mappings = tinymap::tiny_v2::read(input.as_bytes(), "1.16.3".parse()?, "test", &columns)?;

	let actual = tinymap::tiny_v1::export_string(&mappings, "intermediary", "named")?;

	assert_eq!(actual, "v1\tintermediary\tnamed\nCLASS\ta\ta\nFIELD\ta\tI\tb\tb\nCLASS\tnet/x\tnet/x\n");

	Ok(())
}
