use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use crate::error::Error;

/// A release of the artifact the mappings are for, like `1.16.3` or `1.16-rc1`.
///
/// Versions are ordered by their numbers first. A version with a suffix (a pre-release) comes before
/// the same version without one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
	numbers: Vec<u32>,
	suffix: Option<String>,
}

impl Version {
	pub fn numbers(&self) -> &[u32] {
		&self.numbers
	}

	pub fn suffix(&self) -> Option<&str> {
		self.suffix.as_deref()
	}
}

impl FromStr for Version {
	type Err = Error;

	fn from_str(s: &str) -> Result<Version, Error> {
		let invalid = || Error::validation(format!("{s:?} is not a valid version"));

		let (numbers, suffix) = match s.split_once('-') {
			Some((_, "")) => return Err(invalid()),
			Some((numbers, suffix)) => (numbers, Some(suffix.to_owned())),
			None => (s, None),
		};

		let numbers = numbers.split('.')
			.map(|number| {
				if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
					return Err(invalid());
				}
				number.parse().map_err(|_| invalid())
			})
			.collect::<Result<Vec<u32>, Error>>()?;

		Ok(Version { numbers, suffix })
	}
}

impl Display for Version {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let mut first = true;
		for number in &self.numbers {
			if !first {
				f.write_str(".")?;
			}
			first = false;
			write!(f, "{number}")?;
		}
		if let Some(suffix) = &self.suffix {
			write!(f, "-{suffix}")?;
		}
		Ok(())
	}
}

impl Ord for Version {
	fn cmp(&self, other: &Version) -> Ordering {
		self.numbers.cmp(&other.numbers)
			.then_with(|| match (&self.suffix, &other.suffix) {
				(None, None) => Ordering::Equal,
				(None, Some(_)) => Ordering::Greater,
				(Some(_), None) => Ordering::Less,
				(Some(a), Some(b)) => a.cmp(b),
			})
	}
}

impl PartialOrd for Version {
	fn partial_cmp(&self, other: &Version) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use super::Version;

	fn v(s: &str) -> Version {
		s.parse().unwrap()
	}

	#[test]
	fn parse_and_display() {
		for s in ["1.16.3", "1.8", "1.16-rc1", "20", "1.14.4-pre7"] {
			assert_eq!(v(s).to_string(), s);
		}
	}

	#[test]
	fn invalid() {
		for s in ["", "1..2", "1.a", "1.16-", ".1", "1.16.3 ", "-pre1"] {
			assert!(s.parse::<Version>().is_err(), "{s:?} should be rejected");
		}
	}

	#[test]
	fn ordering() {
		assert!(v("1.2") < v("1.10"));
		assert!(v("1.16") < v("1.16.1"));
		assert!(v("1.16-pre1") < v("1.16"));
		assert!(v("1.16-pre1") < v("1.16-pre2"));
		assert!(v("1.15.2") < v("1.16-rc1"));

		let mut versions = vec![v("1.16.3"), v("1.8.9"), v("1.16-rc1"), v("1.16")];
		versions.sort();
		assert_eq!(versions, vec![v("1.8.9"), v("1.16-rc1"), v("1.16"), v("1.16.3")]);
	}
}
