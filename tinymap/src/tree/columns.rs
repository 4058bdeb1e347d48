use anyhow::{anyhow, bail, Context, Result};
use crate::tree::names::Names;

/// Selects which namespaces of a mapping file end up in which name slot.
///
/// The obfuscated namespace must be the first namespace of the file, since members refer to their owner class
/// and carry their descriptor in that namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
	pub obfuscated: String,
	pub intermediary: String,
	pub mapped: Option<String>,
}

impl Columns {
	pub fn new(obfuscated: impl Into<String>, intermediary: impl Into<String>, mapped: Option<&str>) -> Columns {
		Columns {
			obfuscated: obfuscated.into(),
			intermediary: intermediary.into(),
			mapped: mapped.map(String::from),
		}
	}

	pub(crate) fn resolve(&self, namespaces: &[String]) -> Result<ColumnIndices> {
		let find = |name: &str| namespaces.iter()
			.position(|namespace| namespace == name)
			.with_context(|| anyhow!("cannot find namespace {name:?}, only got {namespaces:?}"));

		let obfuscated = find(self.obfuscated.as_str())?;
		if obfuscated != 0 {
			bail!("the obfuscated namespace {:?} must be the first one, got {namespaces:?}", self.obfuscated);
		}

		Ok(ColumnIndices {
			count: namespaces.len(),
			intermediary: find(self.intermediary.as_str())?,
			mapped: self.mapped.as_deref().map(find).transpose()?,
		})
	}
}

/// The positions of the selected namespaces in one concrete file.
#[derive(Debug)]
pub(crate) struct ColumnIndices {
	count: usize,
	intermediary: usize,
	mapped: Option<usize>,
}

impl ColumnIndices {
	/// Picks the names out of the name cells of a line. Empty cells become `None`.
	///
	/// Lines may leave out trailing empty cells.
	pub(crate) fn names<T>(&self, cells: Vec<String>) -> Result<Names<T>>
	where
		T: TryFrom<String, Error=crate::Error>,
	{
		if cells.len() > self.count {
			bail!("line contained more names ({}) than there are namespaces ({}): {cells:?}", cells.len(), self.count);
		}

		let pick = |index: usize| -> Result<Option<T>> {
			cells.get(index)
				.filter(|cell| !cell.is_empty())
				.map(|cell| T::try_from(cell.clone()))
				.transpose()
				.map_err(anyhow::Error::from)
		};

		let obfuscated = pick(0)?
			.with_context(|| anyhow!("no obfuscated name in {cells:?}"))?;
		let intermediary = pick(self.intermediary)?;
		let mapped = self.mapped.map(pick).transpose()?.flatten();

		Ok(Names::new(obfuscated, intermediary, mapped))
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use crate::tree::columns::Columns;
	use crate::tree::names::{ClassName, Names};

	fn namespaces(names: &[&str]) -> Vec<String> {
		names.iter().map(|x| x.to_string()).collect()
	}

	#[test]
	fn resolve() {
		let columns = Columns::new("official", "intermediary", Some("named"));

		let indices = columns.resolve(&namespaces(&["official", "named", "intermediary"])).unwrap();
		let names: Names<ClassName> = indices.names(namespaces(&["a", "Foo", "class_1"])).unwrap();
		assert_eq!(names.obfuscated(), "a");
		assert_eq!(names.intermediary().unwrap(), "class_1");
		assert_eq!(names.mapped().unwrap(), "Foo");

		let names: Names<ClassName> = indices.names(namespaces(&["a", "", "class_1"])).unwrap();
		assert_eq!(names.mapped(), None);

		let names: Names<ClassName> = indices.names(namespaces(&["a"])).unwrap();
		assert_eq!(names.intermediary(), None);

		assert!(indices.names::<ClassName>(namespaces(&["", "Foo", "class_1"])).is_err());
		assert!(indices.names::<ClassName>(namespaces(&["a", "b", "c", "d"])).is_err());
	}

	#[test]
	fn obfuscated_must_be_first() {
		let columns = Columns::new("official", "intermediary", None);

		assert!(columns.resolve(&namespaces(&["intermediary", "official"])).is_err());
		assert!(columns.resolve(&namespaces(&["official", "named"])).is_err());
		assert!(columns.resolve(&namespaces(&["official", "intermediary"])).is_ok());
	}
}
