pub mod columns;
pub mod mappings;
pub mod version;

pub trait ToKey<K> {
	fn get_key(&self) -> K;
}

pub mod names {
	use std::borrow::Borrow;
	use std::fmt::{Display, Formatter};
	use crate::error::{Error, Result};

	/// Creates a non-empty [String] wrapper type, for names and descriptors.
	macro_rules! make_name {
		(
			$(
				$( #[$doc:meta] )*
				$name:ident;
			)*
		) => {
			$(
				$( #[$doc] )*
				#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
				pub struct $name(String);

				impl $name {
					pub fn as_str(&self) -> &str {
						&self.0
					}

					pub fn into_inner(self) -> String {
						self.0
					}
				}

				impl TryFrom<String> for $name {
					type Error = Error;

					fn try_from(value: String) -> Result<$name> {
						if value.is_empty() {
							return Err(Error::validation(concat!("a ", stringify!($name), " must not be empty")));
						}
						Ok($name(value))
					}
				}

				impl TryFrom<&str> for $name {
					type Error = Error;

					fn try_from(value: &str) -> Result<$name> {
						$name::try_from(value.to_owned())
					}
				}

				impl AsRef<str> for $name {
					fn as_ref(&self) -> &str {
						&self.0
					}
				}

				impl Borrow<str> for $name {
					fn borrow(&self) -> &str {
						&self.0
					}
				}

				impl Display for $name {
					fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
						f.write_str(&self.0)
					}
				}

				impl PartialEq<str> for $name {
					fn eq(&self, other: &str) -> bool {
						self.0 == other
					}
				}

				impl PartialEq<&str> for $name {
					fn eq(&self, other: &&str) -> bool {
						self.0 == *other
					}
				}
			)*
		}
	}

	make_name! {
		/// The name of a class, like `net/minecraft/client/Minecraft`.
		ClassName;
		MethodName;
		FieldName;
		/// A method descriptor, like `(ILjava/lang/String;)V`.
		MethodDescriptor;
		FieldDescriptor;
	}

	/// One of the three name slots every mapping has.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
	pub enum NameTier {
		Obfuscated,
		Intermediary,
		Mapped,
	}

	/// The names of a class, method or field.
	///
	/// The obfuscated name is always there, and can't be changed, as it's used as the key.
	#[derive(Debug, Clone, PartialEq, Eq)]
	pub struct Names<T> {
		obfuscated: T,
		intermediary: Option<T>,
		mapped: Option<T>,
	}

	impl<T> Names<T> {
		pub fn new(obfuscated: T, intermediary: Option<T>, mapped: Option<T>) -> Names<T> {
			Names { obfuscated, intermediary, mapped }
		}

		pub fn from_obfuscated(obfuscated: T) -> Names<T> {
			Names { obfuscated, intermediary: None, mapped: None }
		}

		pub fn obfuscated(&self) -> &T {
			&self.obfuscated
		}

		pub fn intermediary(&self) -> Option<&T> {
			self.intermediary.as_ref()
		}

		pub fn mapped(&self) -> Option<&T> {
			self.mapped.as_ref()
		}

		pub fn set_intermediary(&mut self, intermediary: Option<T>) -> Option<T> {
			std::mem::replace(&mut self.intermediary, intermediary)
		}

		pub fn set_mapped(&mut self, mapped: Option<T>) -> Option<T> {
			std::mem::replace(&mut self.mapped, mapped)
		}

		/// The name stored in exactly that slot, without any fallback.
		pub fn get(&self, tier: NameTier) -> Option<&T> {
			match tier {
				NameTier::Obfuscated => Some(&self.obfuscated),
				NameTier::Intermediary => self.intermediary.as_ref(),
				NameTier::Mapped => self.mapped.as_ref(),
			}
		}

		/// The name for that slot, falling back to the next lower slot if it isn't set.
		///
		/// The order is mapped, then intermediary, then obfuscated.
		pub fn resolve(&self, tier: NameTier) -> &T {
			match tier {
				NameTier::Obfuscated => &self.obfuscated,
				NameTier::Intermediary => self.intermediary.as_ref()
					.unwrap_or(&self.obfuscated),
				NameTier::Mapped => self.mapped.as_ref()
					.or(self.intermediary.as_ref())
					.unwrap_or(&self.obfuscated),
			}
		}

		/// The name used to join two containers: the intermediary name, or the obfuscated one if there's none.
		pub fn bridge(&self) -> &T {
			self.resolve(NameTier::Intermediary)
		}
	}
}
