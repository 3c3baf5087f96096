use std::ffi::{CStr,CString};
use std::os::fd::RawFd;

use nix::fcntl::{self,OFlag};
use nix::sys::stat::Mode;
use nix::unistd;

use crate::builtin;
use crate::error::{Diagnostic,ParseError,ShellError,ShellResult};
use crate::global;
use crate::job;
use crate::parser;
use crate::pipe::PipeChain;
use crate::signals;
use crate::types::*;

const EXIT_INVALID_FILE: i32 = 1;
const EXIT_INVALID_PROGRAM: i32 = 127;
const EXIT_WIRING_FAILED: i32 = 126;

/// A stage converted to C strings before forking, so a NUL byte is caught
/// while nothing has been spawned yet.
#[derive(Debug)]
struct PreparedStage {
	argv: Vec<CString>,
	input: Option<CString>,
	output: Option<(CString, RedirectType)>,
}

fn c_string(bytes: &[u8]) -> Result<CString, ParseError> {
	CString::new(bytes).map_err(|_| ParseError::NulByte)
}

impl PreparedStage {
	fn new(stage: &Stage) -> Result<PreparedStage, ParseError> {
		let argv: Result<Vec<CString>, ParseError> = stage.argv.iter().map(|&a| c_string(a)).collect();
		let input = match stage.input {
			Some(ref r) => Some(c_string(r.target)?),
			None => None,
		};
		let output = match stage.output {
			Some(ref r) => Some((c_string(r.target)?, r.typ)),
			None => None,
		};
		Ok(PreparedStage { argv: argv?, input: input, output: output })
	}
}

fn output_flags(typ: RedirectType) -> OFlag {
	let mode = if typ == RedirectType::Append { OFlag::O_APPEND } else { OFlag::O_TRUNC };
	OFlag::O_WRONLY | OFlag::O_CREAT | mode
}

fn file_mode() -> Mode {
	Mode::S_IRUSR | Mode::S_IWUSR | Mode::S_IRGRP | Mode::S_IROTH
}

fn write_diagnostic(d: Diagnostic) {
	let line = d.line();
	unsafe { libc::write(libc::STDERR_FILENO, line.as_ptr() as *const libc::c_void, line.len()); }
}

fn child_exit(code: i32) -> ! {
	unsafe { libc::_exit(code) }
}

fn child_fail(d: Diagnostic, code: i32) -> ! {
	write_diagnostic(d);
	child_exit(code)
}

fn redirect_onto(path: &CStr, flags: OFlag, target: RawFd) -> nix::Result<()> {
	let fd = fcntl::open(path, flags, file_mode())?;
	if fd != target {
		let r = unistd::dup2(fd, target);
		let _ = unistd::close(fd);
		r?;
	}
	Ok(())
}

/// Runs in the forked child: wires stdin/stdout, drops every pipe end,
/// applies file redirections and execs. Never returns.
fn exec_stage(stage: &PreparedStage, index: usize, pipes: PipeChain) -> ! {
	if let Some(fd) = pipes.stdin_for(index) {
		if unistd::dup2(fd, libc::STDIN_FILENO).is_err() { child_exit(EXIT_WIRING_FAILED); }
	}
	if let Some(fd) = pipes.stdout_for(index) {
		if unistd::dup2(fd, libc::STDOUT_FILENO).is_err() { child_exit(EXIT_WIRING_FAILED); }
	}
	pipes.close();

	if let Some(ref path) = stage.input {
		if redirect_onto(path, OFlag::O_RDONLY, libc::STDIN_FILENO).is_err() {
			child_fail(Diagnostic::InvalidFile, EXIT_INVALID_FILE);
		}
	}
	if let Some((ref path, typ)) = stage.output {
		if redirect_onto(path, output_flags(typ), libc::STDOUT_FILENO).is_err() {
			child_fail(Diagnostic::InvalidFile, EXIT_INVALID_FILE);
		}
	}

	let _ = signals::INTERACTIVE.apply_in_child();
	let _ = unistd::execvp(&stage.argv[0], stage.argv.as_slice());
	child_fail(Diagnostic::InvalidProgram, EXIT_INVALID_PROGRAM)
}

/// Spawns one process per stage, chained by pipes, and waits for all of them.
pub fn run_pipeline(pipeline: &Pipeline) -> ShellResult<job::Job> {
	let prepared: Result<Vec<PreparedStage>, ParseError> = pipeline.stages.iter().map(PreparedStage::new).collect();
	let prepared = prepared?;

	let pipes = PipeChain::new(pipeline.connections()).map_err(ShellError::Pipe)?;
	log::debug!("{} stages over pipes {:?}", prepared.len(), pipes.raw_fds());

	let mut job_builder = job::JobBuilder::new(prepared.len());
	let mut spawn_error = None;
	for (i, stage) in prepared.iter().enumerate() {
		match unsafe { job_builder.push_fork() } {
			Ok(unistd::ForkResult::Parent{..}) => {},
			Ok(unistd::ForkResult::Child) => exec_stage(stage, i, pipes),
			Err(e) => {
				log::warn!("fork failed at stage {}: {}", i, e);
				spawn_error = Some(e);
				break;
			},
		}
	}
	// readers only see end-of-stream once the parent's write ends are gone
	pipes.close();

	let mut job = job_builder.build();
	let waited = job.wait();
	if let Some(e) = spawn_error {
		return Err(ShellError::Fork(e));
	}
	waited.map_err(ShellError::Wait)?;
	log::debug!("pipeline finished: {:?}", job.statuses());
	Ok(job)
}

fn eval_line(state: &mut global::State, line: &[u8]) -> ShellResult<Flow> {
	let tokens: Vec<Token> = parser::tokenize(line).collect();
	if tokens.is_empty() {
		return Ok(Flow::Continue);
	}
	parser::validate(&tokens)?;

	if let Some(result) = builtin::dispatch(state, &tokens) {
		if result.is_ok() { state.last_status = 0; }
		return result;
	}

	let pipeline = parser::split_stages(&tokens, &state.config.limits)?;
	log::debug!("{:?}", pipeline);
	let job = run_pipeline(&pipeline)?;
	state.last_status = job.status().unwrap_or(0);
	Ok(Flow::Continue)
}

/// Evaluates one input line. Errors are left for the caller to report.
pub fn eval(state: &mut global::State, line: &[u8]) -> ShellResult<Flow> {
	let r = eval_line(state, line);
	if let Err(ref e) = r {
		log::debug!("{:?}", e);
		state.last_status = 1;
	}
	r
}
