use std::env;
use std::io::Write;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use crate::error::{ShellError,ShellResult};

const SHELL_NAME: &[u8] = b"pipesh";
const ROOT_MARKER: &[u8] = b"/";

/// `[pipesh <dir>]$ ` where `<dir>` is the last path segment, or `/` at the root.
pub fn prompt_for(cwd: &Path) -> Vec<u8> {
	let dir = match cwd.file_name() {
		Some(name) => name.as_bytes(),
		None => ROOT_MARKER,
	};
	let mut prompt: Vec<u8> = Vec::with_capacity(SHELL_NAME.len() + dir.len() + 5);
	prompt.push(b'[');
	prompt.extend_from_slice(SHELL_NAME);
	prompt.push(b' ');
	prompt.extend_from_slice(dir);
	prompt.extend_from_slice(b"]$ ");
	prompt
}

pub fn write_prompt<W: Write>(out: &mut W) -> ShellResult<()> {
	let cwd = env::current_dir().map_err(ShellError::CurrentDir)?;
	if let Err(e) = out.write_all(&prompt_for(&cwd)).and_then(|_| out.flush()) {
		log::warn!("cannot write prompt: {}", e);
	}
	Ok(())
}
