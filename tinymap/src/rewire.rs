//! Fusing two mapping containers of the same version, joined on their intermediary names.
//!
//! The `target` container keeps all of its classes and members. Wherever the `reference` container has an entry with
//! the same intermediary name (and, for members, the same descriptor), that entry's intermediary name is adopted,
//! and the mapped name is taken from one of the two sides. Nothing is ever guessed: an entry without an exact match
//! stays as it is.

use std::fmt::Debug;
use std::hash::Hash;
use indexmap::IndexMap;
use log::{debug, warn};
use crate::error::{Error, Result};
use crate::tree::mappings::{ClassMapping, ClassRenames, FieldMapping, MappingSource, MappingsContainer, MethodKey, MethodMapping, Renames};
use crate::tree::names::{ClassName, FieldName, MethodName, Names};
use crate::tree::ToKey;

/// Fuses `reference` into `target`, returning the fused container. Neither input is changed.
///
/// Classes of `target` are looked up in `reference` by their intermediary name. On a match, the members are looked up
/// by their intermediary name (or obfuscated name if they don't have one) together with their descriptor.
///
/// For matched entries, the mapped name is chosen like this:
/// - if `prefer_target_names` is `true`, the mapped name of `target` is kept if it has one, otherwise the one of
///   `reference` is used,
/// - if it's `false`, the mapped name of `reference` is used if it has one, otherwise the one of `target` is kept.
///
/// Fails with [`Error::Validation`] if two classes of `reference` share one intermediary name, or two members of one
/// class of `reference` share a name and descriptor, as matching against these would be ambiguous.
pub fn rewire(target: &MappingsContainer, reference: &MappingsContainer, prefer_target_names: bool) -> Result<MappingsContainer> {
	reference.validate_unique_intermediary()?;

	if target.version() != reference.version() {
		warn!("rewiring {:?} of version {} with {:?} of different version {}",
			target.name(), target.version(), reference.name(), reference.version());
	}

	let plan = plan(target, reference, prefer_target_names)?;

	debug!("bridged {} of {} classes, {} methods and {} fields of {:?} with {:?}",
		plan.len(),
		target.class_count(),
		plan.iter().map(|class| class.methods.len()).sum::<usize>(),
		plan.iter().map(|class| class.fields.len()).sum::<usize>(),
		target.name(),
		reference.name(),
	);

	let mut fused = target.clone();
	fused.apply_renames(plan)?;
	fused.set_mapping_source(MappingSource::Rewired);

	Ok(fused)
}

fn plan(target: &MappingsContainer, reference: &MappingsContainer, prefer_target_names: bool) -> Result<Vec<ClassRenames>> {
	// classes without an intermediary name can't be bridged
	let index: IndexMap<&ClassName, &ClassMapping> = reference.classes()
		.filter_map(|class| class.names().intermediary().map(|intermediary| (intermediary, class)))
		.collect();

	let mut plan = Vec::new();

	for class in target.classes() {
		let Some(other) = class.names().intermediary().and_then(|intermediary| index.get(intermediary)) else {
			continue;
		};

		plan.push(ClassRenames {
			class: class.get_key(),
			names: bridge_names(class.names(), other.names(), prefer_target_names),
			methods: bridge_members(other.names().obfuscated(), class.methods(), other.methods(), prefer_target_names)?,
			fields: bridge_members(other.names().obfuscated(), class.fields(), other.fields(), prefer_target_names)?,
		});
	}

	Ok(plan)
}

fn bridge_names<T: Clone>(target: &Names<T>, reference: &Names<T>, prefer_target_names: bool) -> Renames<T> {
	let mapped = if prefer_target_names {
		target.mapped().or(reference.mapped())
	} else {
		reference.mapped().or(target.mapped())
	};

	Renames {
		intermediary: reference.intermediary().or(target.intermediary()).cloned(),
		mapped: mapped.cloned(),
	}
}

/// A method or a field, as seen by the rewiring.
trait Member {
	type Key;
	type Name: Clone + Debug + Hash + Eq;

	fn key(&self) -> Self::Key;
	fn member_names(&self) -> &Names<Self::Name>;
	fn descriptor(&self) -> &str;
}

impl Member for MethodMapping {
	type Key = MethodKey;
	type Name = MethodName;

	fn key(&self) -> MethodKey {
		self.get_key()
	}

	fn member_names(&self) -> &Names<MethodName> {
		self.names()
	}

	fn descriptor(&self) -> &str {
		self.desc().as_str()
	}
}

impl Member for FieldMapping {
	type Key = FieldName;
	type Name = FieldName;

	fn key(&self) -> FieldName {
		self.get_key()
	}

	fn member_names(&self) -> &Names<FieldName> {
		self.names()
	}

	fn descriptor(&self) -> &str {
		self.desc().as_str()
	}
}

fn bridge_members<'a, M: Member + 'a>(
	owner: &ClassName,
	target: impl Iterator<Item=&'a M>,
	reference: impl Iterator<Item=&'a M>,
	prefer_target_names: bool,
) -> Result<Vec<(M::Key, Renames<M::Name>)>> {
	let mut index: IndexMap<(&M::Name, &str), &M> = IndexMap::new();
	for member in reference {
		let key = (member.member_names().bridge(), member.descriptor());
		if let Some(other) = index.insert(key, member) {
			return Err(Error::validation(format!(
				"members {:?} and {:?} of class {owner:?} share the name {:?} with descriptor {:?}",
				other.member_names(), member.member_names(), key.0, key.1,
			)));
		}
	}

	Ok(target
		.filter_map(|member| {
			let other = index.get(&(member.member_names().bridge(), member.descriptor()))?;
			Some((member.key(), bridge_names(member.member_names(), other.member_names(), prefer_target_names)))
		})
		.collect())
}
