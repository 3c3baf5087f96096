/// A whitespace-free slice of the input line.
pub type Token<'a> = &'a [u8];

pub const PIPE: &[u8] = b"|";
pub const REDIRECT_INPUT: &[u8] = b"<";
pub const REDIRECT_OUTPUT: &[u8] = b">";
pub const REDIRECT_APPEND: &[u8] = b">>";

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RedirectType { Input, Output, Append }

impl RedirectType {
	pub fn from_token(token: Token) -> Option<RedirectType> {
		match token {
			REDIRECT_INPUT => Some(RedirectType::Input),
			REDIRECT_OUTPUT => Some(RedirectType::Output),
			REDIRECT_APPEND => Some(RedirectType::Append),
			_ => None,
		}
	}

	pub fn is_input(self) -> bool {
		self == RedirectType::Input
	}
}

pub fn is_operator(token: Token) -> bool {
	token == PIPE || RedirectType::from_token(token).is_some()
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Redirect<'a> {
	pub target: &'a [u8],
	pub typ: RedirectType,
}

/// One command of a pipeline. `argv` is never empty and never holds operators.
#[derive(Debug, PartialEq, Eq)]
pub struct Stage<'a> {
	pub argv: Vec<&'a [u8]>,
	pub input: Option<Redirect<'a>>,
	pub output: Option<Redirect<'a>>,
}

impl<'a> Stage<'a> {
	pub fn name(&self) -> &'a [u8] {
		self.argv[0]
	}
}

#[derive(Debug, PartialEq, Eq)]
pub struct Pipeline<'a> {
	pub stages: Vec<Stage<'a>>,
}

impl<'a> Pipeline<'a> {
	pub fn len(&self) -> usize {
		self.stages.len()
	}

	pub fn is_empty(&self) -> bool {
		self.stages.is_empty()
	}

	/// Number of pipe connections needed to chain the stages.
	pub fn connections(&self) -> usize {
		self.stages.len().saturating_sub(1)
	}

	pub fn reads_input_file(&self) -> bool {
		self.stages.first().map_or(false, |s| s.input.is_some())
	}

	pub fn writes_output_file(&self) -> bool {
		self.stages.last().map_or(false, |s| s.output.is_some())
	}
}

/// What the interactive loop does after a line was evaluated.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Flow { Continue, Exit }
