use nix::unistd;

use crate::error::{ParseError,ShellError,ShellResult};
use crate::global;
use crate::types::*;

pub type Builtin = fn(&mut global::State, &[Token]) -> ShellResult<Flow>;

pub fn builtin_exit(_: &mut global::State, args: &[Token]) -> ShellResult<Flow> {
	if !args.is_empty() {
		return Err(ParseError::BuiltinArity("exit").into());
	}
	Ok(Flow::Exit)
}

pub fn builtin_cd(_: &mut global::State, args: &[Token]) -> ShellResult<Flow> {
	if args.len() != 1 {
		return Err(ParseError::BuiltinArity("cd").into());
	}
	if args[0].contains(&0) {
		return Err(ParseError::NulByte.into());
	}
	unistd::chdir(args[0]).map_err(ShellError::InvalidDirectory)?;
	Ok(Flow::Continue)
}

pub fn match_builtin(name: &[u8]) -> Option<Builtin> {
	match name {
		b"cd" => Some(builtin_cd),
		b"exit" => Some(builtin_exit),
		_ => None,
	}
}

/// Runs a builtin when the line is a lone builtin invocation. Every token after
/// the name counts as an argument, redirection operators included.
pub fn dispatch(state: &mut global::State, tokens: &[Token]) -> Option<ShellResult<Flow>> {
	let (&name, args) = tokens.split_first()?;
	if tokens.contains(&PIPE) {
		return None;
	}
	let builtin = match_builtin(name)?;
	log::debug!("builtin {}", String::from_utf8_lossy(name));
	Some(builtin(state, args))
}
