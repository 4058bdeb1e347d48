use std::fmt::Debug;
use std::iter::Peekable;
use anyhow::{anyhow, Context, Result};

/// A line of an indented file.
pub(crate) trait Line: Debug {
	/// How many tabs the line starts with.
	fn indentation(&self) -> usize;
	fn line_number(&self) -> usize;
}

/// The lines of one indentation level of an indented file, like the members of a class.
///
/// Iterating stops at the first line that is indented less, which belongs to an outer level. A line that is
/// indented more than the level is an error, unless it was consumed by [`Level::children`] or
/// [`Level::skip_children`] of the line before.
pub(crate) struct Level<'a, I: Iterator> {
	indentation: usize,
	lines: &'a mut Peekable<I>,
}

impl<'a, I, L> Level<'a, I>
where
	I: Iterator<Item=Result<L>>,
	L: Line,
{
	/// The top level, with lines that aren't indented.
	pub(crate) fn top(lines: &'a mut Peekable<I>) -> Level<'a, I> {
		Level { indentation: 0, lines }
	}

	/// The level below the line just taken.
	pub(crate) fn children(&mut self) -> Level<'_, I> {
		Level {
			indentation: self.indentation + 1,
			lines: self.lines,
		}
	}

	/// Calls `f` for every line of this level, adding the line number to errors.
	pub(crate) fn for_each_line(mut self, mut f: impl FnMut(&mut Self, L) -> Result<()>) -> Result<()> {
		while let Some(line) = self.next() {
			let line = line?;
			let line_number = line.line_number();

			f(&mut self, line)
				.with_context(|| anyhow!("in line {line_number}"))?;
		}
		Ok(())
	}

	/// Consumes everything below the line just taken, at any depth.
	pub(crate) fn skip_children(&mut self) -> Result<()> {
		self.children().for_each_line(|level, _| level.skip_children())
	}
}

impl<I, L> Iterator for Level<'_, I>
where
	I: Iterator<Item=Result<L>>,
	L: Line,
{
	type Item = Result<L>;

	fn next(&mut self) -> Option<Result<L>> {
		let line = match self.lines.peek()? {
			Ok(line) => line,
			// hand out the error, so the caller sees it
			Err(_) => return self.lines.next(),
		};

		let indentation = line.indentation();
		if indentation < self.indentation {
			None
		} else if indentation == self.indentation {
			self.lines.next()
		} else {
			Some(Err(anyhow!("line {} is indented by {indentation}, expected {}: {line:?}", line.line_number(), self.indentation)))
		}
	}
}

pub(crate) mod tiny_line {
	use anyhow::{anyhow, Context, Result};
	use crate::lines::Line;

	/// One line of a tiny file, split at the tabs.
	#[derive(Debug)]
	pub(crate) struct TinyLine {
		line_number: usize,
		indentation: usize,
		pub(crate) first_field: String,
		fields: std::vec::IntoIter<String>,
	}

	impl TinyLine {
		pub(crate) fn new(line_number: usize, line: &str) -> Result<TinyLine> {
			// a tab is always one byte, so this is a valid index
			let indentation = line.bytes().take_while(|x| *x == b'\t').count();
			let line = line[indentation..].trim_end_matches('\r');

			let mut fields = line.split('\t').map(|x| x.to_owned());

			let first_field = fields.next()
				.with_context(|| anyhow!("no first field in line {line_number}"))?;

			let vec: Vec<String> = fields.collect();

			Ok(TinyLine {
				line_number,
				indentation,
				first_field,
				fields: vec.into_iter(),
			})
		}

		pub(crate) fn next(&mut self) -> Result<String> {
			self.fields.next()
				.with_context(|| anyhow!("expected another field in line {}: {self:?}", self.line_number))
		}

		/// All fields that weren't taken yet.
		pub(crate) fn list(self) -> Vec<String> {
			self.fields.collect()
		}
	}

	impl Line for TinyLine {
		fn indentation(&self) -> usize {
			self.indentation
		}
		fn line_number(&self) -> usize {
			self.line_number
		}
	}
}
