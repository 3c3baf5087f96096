use crate::config::Limits;
use crate::error::ParseError;
use crate::types::*;

type ParseResult<T> = Result<T, ParseError>;

/// Lazily splits a line on runs of whitespace. No quoting, no escapes.
#[derive(Debug)]
pub struct Tokens<'a> {
	line: &'a [u8],
	i: usize,
}

impl<'a> Tokens<'a> {
	fn proceed_while<F>(&mut self, f: F) where F: Fn(u8) -> bool {
		while let Some(c) = self.line.get(self.i) {
			if !f(*c) { break; }
			self.i += 1;
		}
	}

	fn is_whitespace(c: u8) -> bool {
		match c {
			b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c => true,
			_ => false,
		}
	}

	fn is_letter(c: u8) -> bool {
		!Tokens::is_whitespace(c)
	}
}

impl<'a> Iterator for Tokens<'a> {
	type Item = Token<'a>;

	fn next(&mut self) -> Option<Token<'a>> {
		self.proceed_while(Tokens::is_whitespace);
		let orig = self.i;
		self.proceed_while(Tokens::is_letter);
		if orig == self.i {
			None
		} else {
			Some(&self.line[orig .. self.i])
		}
	}
}

pub fn tokenize<'a>(line: &'a [u8]) -> Tokens<'a> {
	Tokens { line: line, i: 0 }
}

fn display(token: Token) -> String {
	String::from_utf8_lossy(token).into_owned()
}

/// Checks pipe and redirection placement for the whole line in one pass.
/// Nothing is opened or spawned before this returns `Ok`.
pub fn validate(tokens: &[Token]) -> ParseResult<()> {
	if tokens.first() == Some(&PIPE) {
		return Err(ParseError::LeadingPipe);
	}

	let mut input_redirected = false;
	let mut output_redirected = false;
	let mut i = 0;
	while i < tokens.len() {
		let token = tokens[i];
		if token == PIPE {
			match tokens.get(i + 1) {
				None => { return Err(ParseError::EmptyPipeSegment); },
				Some(&next) if next == PIPE => { return Err(ParseError::EmptyPipeSegment); },
				_ => {},
			}
			input_redirected = false;
			output_redirected = false;
		} else if let Some(typ) = RedirectType::from_token(token) {
			let seen = if typ.is_input() { &mut input_redirected } else { &mut output_redirected };
			if *seen {
				return Err(if typ.is_input() { ParseError::DuplicateInput } else { ParseError::DuplicateOutput });
			}
			match tokens.get(i + 1) {
				None => { return Err(ParseError::MissingRedirectTarget(display(token))); },
				Some(&target) if is_operator(target) => {
					return Err(ParseError::OperatorAsRedirectTarget(display(token)));
				},
				_ => {},
			}
			*seen = true;
			// the target is consumed along with the operator
			i += 1;
		}
		i += 1;
	}
	Ok(())
}

/// Strips redirections out of one stage's span, leaving the argv to exec.
pub fn resolve_stage<'a>(index: usize, raw: &[Token<'a>], limits: &Limits) -> ParseResult<Stage<'a>> {
	let mut argv: Vec<&'a [u8]> = Vec::with_capacity(raw.len());
	let mut input: Option<Redirect<'a>> = None;
	let mut output: Option<Redirect<'a>> = None;

	let mut iter = raw.iter();
	while let Some(&token) = iter.next() {
		let typ = match RedirectType::from_token(token) {
			Some(typ) => typ,
			None => {
				if argv.len() == limits.max_args {
					return Err(ParseError::TooManyArguments { stage: index, limit: limits.max_args });
				}
				argv.push(token);
				continue;
			},
		};
		let target = match iter.next() {
			Some(&target) if !is_operator(target) => target,
			Some(_) => { return Err(ParseError::OperatorAsRedirectTarget(display(token))); },
			None => { return Err(ParseError::MissingRedirectTarget(display(token))); },
		};
		let slot = if typ.is_input() { &mut input } else { &mut output };
		if slot.is_some() {
			return Err(if typ.is_input() { ParseError::DuplicateInput } else { ParseError::DuplicateOutput });
		}
		*slot = Some(Redirect { target: target, typ: typ });
	}

	if argv.is_empty() {
		return Err(ParseError::EmptyCommand(index));
	}
	Ok(Stage { argv: argv, input: input, output: output })
}

/// Partitions validated tokens on `|` and resolves each stage.
pub fn split_stages<'a>(tokens: &[Token<'a>], limits: &Limits) -> ParseResult<Pipeline<'a>> {
	let mut stages: Vec<Stage<'a>> = vec![];
	for (index, raw) in tokens.split(|&t| t == PIPE).enumerate() {
		if index == limits.max_stages {
			return Err(ParseError::TooManyStages(limits.max_stages));
		}
		stages.push(resolve_stage(index, raw, limits)?);
	}
	Ok(Pipeline { stages: stages })
}

/// Tokenizes, validates and splits a line. `Ok(None)` for a blank line.
pub fn parse<'a>(line: &'a [u8], limits: &Limits) -> ParseResult<Option<Pipeline<'a>>> {
	let tokens: Vec<Token<'a>> = tokenize(line).collect();
	if tokens.is_empty() {
		return Ok(None);
	}
	validate(&tokens)?;
	split_stages(&tokens, limits).map(Some)
}
