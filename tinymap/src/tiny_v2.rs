//! Reading mappings in the "Tiny v2" format.
//!
//! Only classes, fields and methods are read. Parameters and comments are skipped, since the
//! [`MappingsContainer`] has no place for them.

use std::io::{BufRead, BufReader, Read};
use anyhow::{anyhow, bail, Context, Result};
use crate::lines::tiny_line::TinyLine;
use crate::lines::{Level, Line};
use crate::tree::columns::Columns;
use crate::tree::mappings::{ClassMapping, FieldMapping, MappingSource, MappingsContainer, MethodMapping};
use crate::tree::names::{FieldDescriptor, MethodDescriptor};
use crate::tree::version::Version;

#[allow(clippy::tabs_in_doc_comments)]
/// Reads the tiny v2 format, from the given reader.
///
/// The `columns` select which namespaces of the file are read into which name slot.
///
/// ```
/// use tinymap::tree::columns::Columns;
///
/// let string = "\
/// tiny	2	0	official	intermediary	named
/// c	a	net/minecraft/class_1	net/minecraft/Foo
/// 	f	I	b	field_1	bar
/// 	m	(La;)V	c	method_1	baz
/// 		p	1		other
/// ";
///
/// let columns = Columns::new("official", "intermediary", Some("named"));
/// let mappings = tinymap::tiny_v2::read(string.as_bytes(), "1.16.3".parse()?, "yarn", &columns)?;
///
/// assert_eq!(mappings.class_count(), 1);
/// assert_eq!(mappings.method_count(), 1);
/// assert_eq!(mappings.field_count(), 1);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn read(reader: impl Read, version: Version, name: &str, columns: &Columns) -> Result<MappingsContainer> {
	let mut lines = BufReader::new(reader)
		.lines()
		.enumerate()
		.map(|(line_number, line)| -> Result<TinyLine> {
			TinyLine::new(line_number + 1, &line?)
		})
		.peekable();

	let mut header = lines.next().context("no header line")??;
	let header_line_number = header.line_number();

	if header.first_field != "tiny" || header.next()? != "2" || header.next()? != "0" {
		bail!("header version isn't tiny v2.0, in line {header:?}");
	}

	let namespaces = header.list();
	let indices = columns.resolve(&namespaces)
		.with_context(|| anyhow!("on line {header_line_number}"))?;

	// properties of the file, given as indented lines after the header
	while let Some(Ok(line)) = lines.peek() {
		if line.indentation() == 0 {
			break;
		}
		if line.first_field == "escaped-names" {
			bail!("escaped names are not supported, in line {}", line.line_number());
		}
		lines.next();
	}

	let mut mappings = MappingsContainer::new(version, name, MappingSource::TinyV2);

	Level::top(&mut lines).for_each_line(|level, line| {
		if line.first_field == "c" {
			let names = indices.names(line.list())?;
			let class = mappings.add_class(ClassMapping::new(names))?;

			level.children().for_each_line(|level, mut line| {
				if line.first_field == "f" {
					let desc = FieldDescriptor::try_from(line.next()?)?;
					let names = indices.names(line.list())?;
					class.add_field(FieldMapping::new(desc, names))?;
				} else if line.first_field == "m" {
					let desc = MethodDescriptor::try_from(line.next()?)?;
					let names = indices.names(line.list())?;
					class.add_method(MethodMapping::new(desc, names))?;
				}
				// parameters and comments
				level.skip_children()
			}).context("reading class sub-sections")
		} else {
			level.skip_children()
		}
	}).context("reading lines")?;

	if let Some(line) = lines.next() {
		bail!("expected end of input, got: {line:?}");
	}

	Ok(mappings)
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use crate::tree::columns::Columns;
	use crate::tree::mappings::{MethodKey, MappingSource};

	fn columns() -> Columns {
		Columns::new("official", "intermediary", Some("named"))
	}

	#[test]
	fn read_with_properties_and_comments() {
		let input = "tiny\t2\t0\tofficial\tintermediary\tnamed\n\
			\tsorted-by\tofficial\n\
			c\ta\tclass_1\tFoo\n\
			\tc\tA class comment.\n\
			\tm\t()V\tb\tmethod_1\t\n\
			\t\tp\t1\t\tx\n\
			\t\t\tc\tA parameter comment.\n\
			\tf\tLa;\tc\tfield_1\tself\n\
			c\td\tclass_2\t\n";

		let mappings = super::read(input.as_bytes(), "1.16.3".parse().unwrap(), "yarn", &columns()).unwrap();

		assert_eq!(mappings.mapping_source(), MappingSource::TinyV2);
		assert_eq!(mappings.name(), "yarn");
		assert_eq!(mappings.class_count(), 2);

		let a = mappings.class("a").unwrap();
		assert_eq!(a.names().mapped().unwrap(), "Foo");
		let key = MethodKey { name: "b".try_into().unwrap(), desc: "()V".try_into().unwrap() };
		let b = a.method(&key).unwrap();
		assert_eq!(b.names().intermediary().unwrap(), "method_1");
		assert_eq!(b.names().mapped(), None);
		assert_eq!(a.fields().next().unwrap().names().mapped().unwrap(), "self");

		let d = mappings.class("d").unwrap();
		assert_eq!(d.names().mapped(), None);
	}

	#[test]
	fn rejects_bad_input() {
		let read = |input: &str| super::read(input.as_bytes(), "1.16.3".parse().unwrap(), "yarn", &columns());

		assert!(read("").is_err());
		assert!(read("tiny\t1\t0\tofficial\tintermediary\tnamed\n").is_err());
		assert!(read("tiny\t2\t0\tintermediary\tofficial\tnamed\n").is_err());
		// duplicate class
		assert!(read("tiny\t2\t0\tofficial\tintermediary\tnamed\nc\ta\tb\tc\nc\ta\td\te\n").is_err());
		// too deep indentation
		assert!(read("tiny\t2\t0\tofficial\tintermediary\tnamed\nc\ta\tb\tc\n\t\tp\t1\tx\n").is_err());
		assert!(read("tiny\t2\t0\tofficial\tintermediary\tnamed\n\tescaped-names\nc\ta\tb\tc\n").is_err());
	}
}
