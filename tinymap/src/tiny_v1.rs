//! Functions to read and write mappings in the "Tiny v1" format.
//!
//! # Writing
//! The [`export`] function writes a container with exactly two columns: the intermediary names and the mapped
//! names. The output is deterministic: classes come in the order they are stored in, and within a class all methods
//! come before all fields, again in stored order.
//!
//! Names are never escaped. A name containing a tab or a line break makes the export fail before anything is
//! written.
//!
//! # Reading
//! The [`read`] function reads any number of columns, picking the ones given in the [`Columns`].

use std::collections::HashSet;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use anyhow::{anyhow, bail, Context};
use log::trace;
use crate::error::{Error, Result};
use crate::lines::tiny_line::TinyLine;
use crate::lines::Line;
use crate::tree::columns::Columns;
use crate::tree::mappings::{ClassMapping, FieldMapping, MappingSource, MappingsContainer, MethodMapping};
use crate::tree::names::{ClassName, FieldDescriptor, MethodDescriptor, NameTier, Names};
use crate::tree::version::Version;

#[allow(clippy::tabs_in_doc_comments)]
/// Writes the given mappings into a `Vec<u8>`, in the tiny v1 format, with the header naming the two columns.
///
/// The first column holds the intermediary names (falling back to the obfuscated ones), the second column holds
/// the mapped names (falling back to the intermediary, and then the obfuscated ones).
///
/// ```
/// use tinymap::tree::mappings::{ClassMapping, MappingSource, MappingsContainer};
/// use tinymap::tree::names::Names;
///
/// let mut mappings = MappingsContainer::new("1.16.3".parse()?, "yarn", MappingSource::TinyV2);
/// mappings.add_class(ClassMapping::new(Names::new(
/// 	"a".try_into()?,
/// 	Some("net/x".try_into()?),
/// 	Some("Foo".try_into()?),
/// )))?;
/// mappings.add_class(ClassMapping::new(Names::from_obfuscated("b".try_into()?)))?;
///
/// let bytes = tinymap::tiny_v1::export(&mappings, "intermediary", "named")?;
///
/// assert_eq!(bytes, b"v1\tintermediary\tnamed\nCLASS\tnet/x\tFoo\nCLASS\tb\tb\n");
/// # Ok::<(), tinymap::Error>(())
/// ```
pub fn export(mappings: &MappingsContainer, first_column: &str, second_column: &str) -> Result<Vec<u8>> {
	let mut vec = Vec::new();
	write(mappings, first_column, second_column, &mut vec)?;
	Ok(vec)
}

/// Like [`export`], but converts the result into a `String`.
///
/// This is of most use in test cases, where you also use the `pretty_assertions` crate for viewing string diffs.
pub fn export_string(mappings: &MappingsContainer, first_column: &str, second_column: &str) -> Result<String> {
	let vec = export(mappings, first_column, second_column)?;
	String::from_utf8(vec)
		.map_err(|e| Error::serialization(format!("written mappings aren't utf8: {e}")))
}

/// Writes the given mappings to the given writer, in the tiny v1 format.
///
/// All names are checked before the first byte is written. See [`export`] for the columns written.
pub fn write(mappings: &MappingsContainer, first_column: &str, second_column: &str, w: &mut impl Write) -> Result<()> {
	check_header_name(first_column)?;
	check_header_name(second_column)?;
	check_names(mappings)?;

	// the buffering makes it much faster
	let mut w = BufWriter::new(w);
	let w = &mut w;

	writeln!(w, "v1\t{first_column}\t{second_column}")?;

	for class in mappings.classes() {
		let owner = class.names().resolve(NameTier::Intermediary);
		writeln!(w, "CLASS\t{owner}\t{}", class.names().resolve(NameTier::Mapped))?;

		for method in class.methods() {
			let names = method.names();
			writeln!(w, "METHOD\t{owner}\t{}\t{}\t{}", method.desc(), names.resolve(NameTier::Intermediary), names.resolve(NameTier::Mapped))?;
		}

		for field in class.fields() {
			let names = field.names();
			writeln!(w, "FIELD\t{owner}\t{}\t{}\t{}", field.desc(), names.resolve(NameTier::Intermediary), names.resolve(NameTier::Mapped))?;
		}
	}

	w.flush()?;

	Ok(())
}

fn check_header_name(name: &str) -> Result<()> {
	if name.is_empty() {
		return Err(Error::serialization("column names must not be empty"));
	}
	check_cell(name, "column name")
}

fn check_cell(cell: &str, what: &str) -> Result<()> {
	if cell.contains(|c| matches!(c, '\t' | '\n' | '\r')) {
		return Err(Error::serialization(format!("{what} {cell:?} contains a tab or line break")));
	}
	Ok(())
}

fn check_all<T: AsRef<str>>(names: &Names<T>, what: &str) -> Result<()> {
	for tier in [NameTier::Obfuscated, NameTier::Intermediary, NameTier::Mapped] {
		if let Some(name) = names.get(tier) {
			check_cell(name.as_ref(), what)?;
		}
	}
	Ok(())
}

fn check_names(mappings: &MappingsContainer) -> Result<()> {
	for class in mappings.classes() {
		check_all(class.names(), "class name")?;

		for method in class.methods() {
			check_cell(method.desc().as_str(), "method descriptor")?;
			check_all(method.names(), "method name")?;
		}
		for field in class.fields() {
			check_cell(field.desc().as_str(), "field descriptor")?;
			check_all(field.names(), "field name")?;
		}
	}
	Ok(())
}

#[allow(clippy::tabs_in_doc_comments)]
/// Reads the tiny v1 format, from the given reader.
///
/// Members refer to their owner by the name in the first column. If a member comes before the `CLASS` line of its
/// owner (or there's no such line), the owner is created with only its obfuscated name. Lines starting with `#` are
/// skipped.
///
/// ```
/// use tinymap::tree::columns::Columns;
///
/// let string = "\
/// v1	official	intermediary
/// CLASS	a	net/minecraft/class_1
/// METHOD	a	()V	b	method_1
/// FIELD	c	I	d	field_2
/// ";
///
/// let columns = Columns::new("official", "intermediary", None);
/// let mappings = tinymap::tiny_v1::read(string.as_bytes(), "1.14".parse()?, "intermediary", &columns)?;
///
/// assert_eq!(mappings.class_count(), 2);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn read(reader: impl Read, version: Version, name: &str, columns: &Columns) -> anyhow::Result<MappingsContainer> {
	let mut lines = BufReader::new(reader)
		.lines()
		.enumerate()
		.map(|(line_number, line)| -> anyhow::Result<TinyLine> {
			TinyLine::new(line_number + 1, &line?)
		});

	let header = lines.next().context("no header line")??;
	if header.first_field != "v1" {
		bail!("header version isn't tiny v1, in line {header:?}");
	}
	let namespaces = header.list();
	let indices = columns.resolve(&namespaces).context("on line 1")?;

	let mut mappings = MappingsContainer::new(version, name, MappingSource::TinyV1);
	// classes only created because a member referenced them
	let mut implicit: HashSet<ClassName> = HashSet::new();

	for line in lines {
		let mut line = line?;
		let line_number = line.line_number();
		let kind = std::mem::take(&mut line.first_field);

		match kind.as_str() {
			"CLASS" => {
				let names: Names<ClassName> = indices.names(line.list())
					.with_context(|| anyhow!("in line {line_number}"))?;

				if implicit.remove(names.obfuscated()) {
					let class = mappings.class_mut(names.obfuscated().as_str())
						.with_context(|| anyhow!("implicitly created class {:?} is gone", names.obfuscated()))?;
					class.replace_names(names)?;
				} else {
					mappings.add_class(ClassMapping::new(names))
						.with_context(|| anyhow!("in line {line_number}"))?;
				}
			},
			"METHOD" => {
				let owner = owner_class(&mut mappings, &mut implicit, line.next()?, line_number)?;
				let desc = MethodDescriptor::try_from(line.next()?)?;
				let names = indices.names(line.list())
					.with_context(|| anyhow!("in line {line_number}"))?;

				if let Some(class) = mappings.class_mut(owner.as_str()) {
					class.add_method(MethodMapping::new(desc, names))
						.with_context(|| anyhow!("in line {line_number}"))?;
				}
			},
			"FIELD" => {
				let owner = owner_class(&mut mappings, &mut implicit, line.next()?, line_number)?;
				let desc = FieldDescriptor::try_from(line.next()?)?;
				let names = indices.names(line.list())
					.with_context(|| anyhow!("in line {line_number}"))?;

				if let Some(class) = mappings.class_mut(owner.as_str()) {
					class.add_field(FieldMapping::new(desc, names))
						.with_context(|| anyhow!("in line {line_number}"))?;
				}
			},
			first if first.is_empty() || first.starts_with('#') => {},
			first => bail!("unknown line kind {first:?} in line {line_number}"),
		}
	}

	Ok(mappings)
}

fn owner_class(
	mappings: &mut MappingsContainer,
	implicit: &mut HashSet<ClassName>,
	owner: String,
	line_number: usize,
) -> anyhow::Result<ClassName> {
	let owner = ClassName::try_from(owner)?;
	if mappings.class(owner.as_str()).is_none() {
		trace!("class {owner} created by a member in line {line_number}");
		mappings.add_class(ClassMapping::new(Names::from_obfuscated(owner.clone())))?;
		implicit.insert(owner.clone());
	}
	Ok(owner)
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use crate::Error;
	use crate::tree::columns::Columns;
	use crate::tree::mappings::{ClassMapping, MappingSource, MappingsContainer, MethodMapping};
	use crate::tree::names::Names;

	#[test]
	fn read_member_before_class() {
		let input = "v1\tofficial\tintermediary\tnamed\n\
			# a comment\n\
			FIELD\ta\tI\tb\tfield_1\tcount\n\
			CLASS\ta\tclass_1\tFoo\n\
			\n\
			METHOD\ta\t()V\tc\tmethod_1\n";

		let columns = Columns::new("official", "intermediary", Some("named"));
		let mappings = super::read(input.as_bytes(), "1.14".parse().unwrap(), "test", &columns).unwrap();

		assert_eq!(mappings.mapping_source(), MappingSource::TinyV1);
		assert_eq!(mappings.class_count(), 1);
		let a = mappings.class("a").unwrap();
		assert_eq!(a.names().intermediary().unwrap(), "class_1");
		assert_eq!(a.names().mapped().unwrap(), "Foo");
		assert_eq!(a.fields().count(), 1);
		assert_eq!(a.methods().next().unwrap().names().mapped(), None);
	}

	#[test]
	fn read_rejects_duplicates() {
		let columns = Columns::new("official", "intermediary", None);
		let input = "v1\tofficial\tintermediary\nCLASS\ta\tb\nCLASS\ta\tc\n";
		assert!(super::read(input.as_bytes(), "1.14".parse().unwrap(), "test", &columns).is_err());

		let input = "v1\tofficial\tintermediary\nMETHOD\ta\t()V\tb\tc\nMETHOD\ta\t()V\tb\td\n";
		assert!(super::read(input.as_bytes(), "1.14".parse().unwrap(), "test", &columns).is_err());
	}

	#[test]
	fn export_rejects_separators() {
		let mut mappings = MappingsContainer::new("1.16.3".parse().unwrap(), "test", MappingSource::TinyV2);
		let mut class = ClassMapping::new(Names::from_obfuscated("a".try_into().unwrap()));
		class.add_method(MethodMapping::new("()V".try_into().unwrap(), Names::new(
			"m".try_into().unwrap(),
			None,
			Some("bad\tname".try_into().unwrap()),
		))).unwrap();
		mappings.add_class(class).unwrap();

		let mut out = Vec::new();
		let result = super::write(&mappings, "intermediary", "named", &mut out);
		assert!(matches!(result, Err(Error::Serialization(_))));
		assert!(out.is_empty());

		let empty = MappingsContainer::new("1.16.3".parse().unwrap(), "test", MappingSource::TinyV2);
		assert!(matches!(super::export(&empty, "inter\nmediary", "named"), Err(Error::Serialization(_))));
		assert!(matches!(super::export(&empty, "", "named"), Err(Error::Serialization(_))));
		assert_eq!(super::export_string(&empty, "intermediary", "named").unwrap(), "v1\tintermediary\tnamed\n");
	}
}
