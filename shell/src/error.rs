use std::{fmt,io};

use thiserror::Error;

/// Why a line was rejected before anything ran.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
	#[error("pipeline starts with '|'")]
	LeadingPipe,
	#[error("'|' not followed by a command")]
	EmptyPipeSegment,
	#[error("redirection '{0}' has no target")]
	MissingRedirectTarget(String),
	#[error("redirection '{0}' target is an operator")]
	OperatorAsRedirectTarget(String),
	#[error("more than one input redirection in a stage")]
	DuplicateInput,
	#[error("more than one output redirection in a stage")]
	DuplicateOutput,
	#[error("stage {0} has no command")]
	EmptyCommand(usize),
	#[error("pipeline has more than {0} stages")]
	TooManyStages(usize),
	#[error("stage {stage} has more than {limit} arguments")]
	TooManyArguments { stage: usize, limit: usize },
	#[error("{0}: wrong number of arguments")]
	BuiltinArity(&'static str),
	#[error("argument contains a NUL byte")]
	NulByte,
}

/// The four kinds of failure a user ever sees.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Diagnostic { InvalidCommand, InvalidFile, InvalidProgram, InvalidDirectory }

impl Diagnostic {
	/// The full diagnostic line. Static so a forked child can write it without allocating.
	pub fn line(self) -> &'static [u8] {
		match self {
			Diagnostic::InvalidCommand => b"Error: invalid command\n",
			Diagnostic::InvalidFile => b"Error: invalid file\n",
			Diagnostic::InvalidProgram => b"Error: invalid program\n",
			Diagnostic::InvalidDirectory => b"Error: invalid directory\n",
		}
	}
}

impl fmt::Display for Diagnostic {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let line = self.line();
		f.write_str(&String::from_utf8_lossy(&line[.. line.len() - 1]))
	}
}

#[derive(Debug, Error)]
pub enum ShellError {
	#[error("invalid command")]
	InvalidCommand(#[from] ParseError),
	#[error("invalid directory")]
	InvalidDirectory(#[source] nix::Error),
	#[error("Error: cannot create pipe: {0}")]
	Pipe(#[source] nix::Error),
	#[error("Error: cannot fork: {0}")]
	Fork(#[source] nix::Error),
	#[error("Error: cannot wait for child: {0}")]
	Wait(#[source] nix::Error),
	#[error("Error: cannot get directory")]
	CurrentDir(#[source] io::Error),
}

impl ShellError {
	pub fn diagnostic(&self) -> Option<Diagnostic> {
		match *self {
			ShellError::InvalidCommand(_) => Some(Diagnostic::InvalidCommand),
			ShellError::InvalidDirectory(_) => Some(Diagnostic::InvalidDirectory),
			_ => None,
		}
	}

	/// The single line reported on stderr.
	pub fn report(&self) -> String {
		match self.diagnostic() {
			Some(d) => d.to_string(),
			None => self.to_string(),
		}
	}
}

pub type ShellResult<T> = Result<T, ShellError>;
