use indexmap::IndexMap;
use indexmap::map::Entry;
use crate::error::{Error, Result};
use crate::tree::names::{ClassName, FieldDescriptor, FieldName, MethodDescriptor, MethodName, Names};
use crate::tree::version::Version;
use crate::tree::ToKey;

/// Which format a container was read from. Only informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingSource {
	TinyV1,
	TinyV2,
	/// The container is the output of [`rewire`][crate::rewire::rewire].
	Rewired,
}

/// A set of class, method and field mappings for one version, from one namespace.
///
/// Classes are keyed by their obfuscated name and keep their insertion order.
#[derive(Debug, Clone)]
pub struct MappingsContainer {
	version: Version,
	name: String,
	mapping_source: MappingSource,
	classes: IndexMap<ClassName, ClassMapping>,
}

impl MappingsContainer {
	pub fn new(version: Version, name: impl Into<String>, mapping_source: MappingSource) -> MappingsContainer {
		MappingsContainer {
			version,
			name: name.into(),
			mapping_source,
			classes: IndexMap::new(),
		}
	}

	pub fn version(&self) -> &Version {
		&self.version
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn mapping_source(&self) -> MappingSource {
		self.mapping_source
	}

	pub(crate) fn set_mapping_source(&mut self, mapping_source: MappingSource) {
		self.mapping_source = mapping_source;
	}

	/// The classes, in the order they were added.
	pub fn classes(&self) -> indexmap::map::Values<'_, ClassName, ClassMapping> {
		self.classes.values()
	}

	pub fn class(&self, obfuscated: &str) -> Option<&ClassMapping> {
		self.classes.get(obfuscated)
	}

	pub(crate) fn class_mut(&mut self, obfuscated: &str) -> Option<&mut ClassMapping> {
		self.classes.get_mut(obfuscated)
	}

	pub fn class_count(&self) -> usize {
		self.classes.len()
	}

	pub fn method_count(&self) -> usize {
		self.classes.values().map(|class| class.methods.len()).sum()
	}

	pub fn field_count(&self) -> usize {
		self.classes.values().map(|class| class.fields.len()).sum()
	}

	/// Adds a class, failing if there's already one with the same obfuscated name.
	pub fn add_class(&mut self, child: ClassMapping) -> Result<&mut ClassMapping> {
		match self.classes.entry(child.get_key()) {
			Entry::Occupied(e) => {
				Err(Error::validation(format!("cannot add class {:?}, as there's already one: {:?}", e.key(), e.get().names)))
			},
			Entry::Vacant(e) => {
				Ok(e.insert(child))
			},
		}
	}

	/// Checks that no two classes share the same intermediary name.
	///
	/// Classes without an intermediary name are ignored.
	pub fn validate_unique_intermediary(&self) -> Result<()> {
		let mut seen: IndexMap<&ClassName, &ClassName> = IndexMap::new();
		for class in self.classes.values() {
			if let Some(intermediary) = class.names.intermediary() {
				if let Some(other) = seen.insert(intermediary, class.names.obfuscated()) {
					return Err(Error::validation(format!(
						"intermediary name {intermediary:?} of container {:?} is used by both {other:?} and {:?}",
						self.name, class.names.obfuscated(),
					)));
				}
			}
		}
		Ok(())
	}

	/// Sets the mapped name of every class that doesn't have one to its intermediary name.
	pub fn fill_mapped_class_names_from_intermediary(&mut self) {
		for class in self.classes.values_mut() {
			if class.names.mapped().is_none() {
				let intermediary = class.names.intermediary().cloned();
				class.names.set_mapped(intermediary);
			}
		}
	}

	/// Replaces the intermediary and mapped names of classes and their members in bulk.
	///
	/// Every class and member referenced is looked up first: if any of them doesn't exist, an error is returned and
	/// nothing is changed.
	pub fn apply_renames(&mut self, renames: impl IntoIterator<Item=ClassRenames>) -> Result<()> {
		let renames: Vec<ClassRenames> = renames.into_iter().collect();

		for rename in &renames {
			let class = self.classes.get(&rename.class)
				.ok_or_else(|| Error::validation(format!("cannot rename class {:?}: no such class in {:?}", rename.class, self.name)))?;

			for (key, _) in &rename.methods {
				if !class.methods.contains_key(key) {
					return Err(Error::validation(format!("cannot rename method {key:?}: no such method in class {:?}", rename.class)));
				}
			}
			for (key, _) in &rename.fields {
				if !class.fields.contains_key(key) {
					return Err(Error::validation(format!("cannot rename field {key:?}: no such field in class {:?}", rename.class)));
				}
			}
		}

		for rename in renames {
			// all keys exist, checked above
			let Some(class) = self.classes.get_mut(&rename.class) else { continue };

			rename.names.apply_to(&mut class.names);

			for (key, names) in rename.methods {
				if let Some(method) = class.methods.get_mut(&key) {
					names.apply_to(&mut method.names);
				}
			}
			for (key, names) in rename.fields {
				if let Some(field) = class.fields.get_mut(&key) {
					names.apply_to(&mut field.names);
				}
			}
		}

		Ok(())
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassMapping {
	names: Names<ClassName>,
	methods: IndexMap<MethodKey, MethodMapping>,
	fields: IndexMap<FieldName, FieldMapping>,
}

impl ClassMapping {
	pub fn new(names: Names<ClassName>) -> ClassMapping {
		ClassMapping {
			names,
			methods: IndexMap::new(),
			fields: IndexMap::new(),
		}
	}

	pub fn names(&self) -> &Names<ClassName> {
		&self.names
	}

	/// Replaces all names, as long as the obfuscated name (the key) stays the same.
	pub(crate) fn replace_names(&mut self, names: Names<ClassName>) -> Result<()> {
		if names.obfuscated() != self.names.obfuscated() {
			return Err(Error::validation(format!("cannot change the obfuscated name of {:?} to {:?}", self.names, names)));
		}
		self.names = names;
		Ok(())
	}

	pub fn methods(&self) -> indexmap::map::Values<'_, MethodKey, MethodMapping> {
		self.methods.values()
	}

	pub fn fields(&self) -> indexmap::map::Values<'_, FieldName, FieldMapping> {
		self.fields.values()
	}

	pub fn method(&self, key: &MethodKey) -> Option<&MethodMapping> {
		self.methods.get(key)
	}

	/// Fields are only found by their obfuscated name, as that's unique within a class.
	pub fn field(&self, obfuscated: &str) -> Option<&FieldMapping> {
		self.fields.get(obfuscated)
	}

	pub fn add_method(&mut self, child: MethodMapping) -> Result<&mut MethodMapping> {
		match self.methods.entry(child.get_key()) {
			Entry::Occupied(e) => {
				Err(Error::validation(format!("cannot add method {:?} to class {:?}, as there's already one", e.key(), self.names.obfuscated())))
			},
			Entry::Vacant(e) => {
				Ok(e.insert(child))
			},
		}
	}

	pub fn add_field(&mut self, child: FieldMapping) -> Result<&mut FieldMapping> {
		match self.fields.entry(child.get_key()) {
			Entry::Occupied(e) => {
				Err(Error::validation(format!("cannot add field {:?} with descriptor {:?} to class {:?}, as there's already one with descriptor {:?}",
					e.key(), child.desc, self.names.obfuscated(), e.get().desc)))
			},
			Entry::Vacant(e) => {
				Ok(e.insert(child))
			},
		}
	}
}

impl ToKey<ClassName> for ClassMapping {
	fn get_key(&self) -> ClassName {
		self.names.obfuscated().clone()
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodKey {
	pub name: MethodName,
	pub desc: MethodDescriptor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodMapping {
	desc: MethodDescriptor,
	names: Names<MethodName>,
}

impl MethodMapping {
	pub fn new(desc: MethodDescriptor, names: Names<MethodName>) -> MethodMapping {
		MethodMapping { desc, names }
	}

	pub fn desc(&self) -> &MethodDescriptor {
		&self.desc
	}

	pub fn names(&self) -> &Names<MethodName> {
		&self.names
	}
}

impl ToKey<MethodKey> for MethodMapping {
	fn get_key(&self) -> MethodKey {
		MethodKey {
			name: self.names.obfuscated().clone(),
			desc: self.desc.clone(),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapping {
	desc: FieldDescriptor,
	names: Names<FieldName>,
}

impl FieldMapping {
	pub fn new(desc: FieldDescriptor, names: Names<FieldName>) -> FieldMapping {
		FieldMapping { desc, names }
	}

	pub fn desc(&self) -> &FieldDescriptor {
		&self.desc
	}

	pub fn names(&self) -> &Names<FieldName> {
		&self.names
	}
}

impl ToKey<FieldName> for FieldMapping {
	fn get_key(&self) -> FieldName {
		self.names.obfuscated().clone()
	}
}

/// New intermediary and mapped names, replacing the old ones (including replacing them with nothing).
#[derive(Debug, Clone, PartialEq)]
pub struct Renames<T> {
	pub intermediary: Option<T>,
	pub mapped: Option<T>,
}

impl<T> Renames<T> {
	fn apply_to(self, names: &mut Names<T>) {
		names.set_intermediary(self.intermediary);
		names.set_mapped(self.mapped);
	}
}

/// All renames for one class, found by the obfuscated name of the class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassRenames {
	pub class: ClassName,
	pub names: Renames<ClassName>,
	pub methods: Vec<(MethodKey, Renames<MethodName>)>,
	pub fields: Vec<(FieldName, Renames<FieldName>)>,
}
