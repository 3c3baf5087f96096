use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use nix::sys::stat::{self,Mode};
use nix::sys::wait::{self,WaitStatus};
use nix::unistd::{self,ForkResult};

use pipesh::config::Config;
use pipesh::error::Diagnostic;
use pipesh::eval::eval;
use pipesh::global::State;
use pipesh::types::Flow;

fn state() -> State {
	State::new(Config::default())
}

fn line(template: &str, dir: &Path) -> Vec<u8> {
	format!("{}\n", template.replace("{dir}", dir.to_str().unwrap())).into_bytes()
}

fn run(state: &mut State, template: &str, dir: &Path) -> Flow {
	eval(state, &line(template, dir)).unwrap()
}

fn setup() -> tempfile::TempDir {
	let dir = tempfile::tempdir().unwrap();
	fs::write(dir.path().join("in.txt"), "b\na\nc\na\n").unwrap();
	dir
}

fn read(dir: &Path, name: &str) -> String {
	fs::read_to_string(dir.join(name)).unwrap()
}

#[test]
fn single_stage_binds_both_files() {
	let dir = setup();
	let mut s = state();
	assert_eq!(run(&mut s, "sort < {dir}/in.txt > {dir}/out.txt", dir.path()), Flow::Continue);
	assert_eq!(read(dir.path(), "out.txt"), "a\na\nb\nc\n");
	assert_eq!(s.last_status, 0);
}

#[test]
fn two_stages_chain_like_unix_pipes() {
	let dir = setup();
	let mut s = state();
	run(&mut s, "cat {dir}/in.txt | sort > {dir}/out.txt", dir.path());
	assert_eq!(read(dir.path(), "out.txt"), "a\na\nb\nc\n");
}

#[test]
fn many_stages() {
	let dir = setup();
	let mut s = state();
	run(&mut s, "cat < {dir}/in.txt | sort | uniq | sort -r | head -n 2 > {dir}/out.txt", dir.path());
	assert_eq!(read(dir.path(), "out.txt"), "c\nb\n");
}

#[test]
fn redirections_on_both_ends_of_a_pipeline() {
	let dir = setup();
	let mut s = state();
	run(&mut s, "sort < {dir}/in.txt | uniq >> {dir}/out.txt", dir.path());
	run(&mut s, "sort < {dir}/in.txt | uniq >> {dir}/out.txt", dir.path());
	assert_eq!(read(dir.path(), "out.txt"), "a\nb\nc\na\nb\nc\n");
}

#[test]
fn truncate_replaces_previous_content() {
	let dir = setup();
	fs::write(dir.path().join("out.txt"), "old content that is longer\n").unwrap();
	let mut s = state();
	run(&mut s, "head -n 1 {dir}/in.txt > {dir}/out.txt", dir.path());
	assert_eq!(read(dir.path(), "out.txt"), "b\n");
}

#[test]
fn created_files_are_0644() {
	let dir = setup();
	let line = line("cat {dir}/in.txt > {dir}/out.txt", dir.path());
	// the umask is process-wide, so it is set in a child of the test process
	let status = match unsafe { unistd::fork() }.unwrap() {
		ForkResult::Child => {
			stat::umask(Mode::from_bits_truncate(0o022));
			let code = if eval(&mut state(), &line).is_ok() { 0 } else { 1 };
			unsafe { libc::_exit(code) }
		},
		ForkResult::Parent{ child } => wait::waitpid(child, None).unwrap(),
	};
	assert!(matches!(status, WaitStatus::Exited(_, 0)), "{:?}", status);
	let mode = fs::metadata(dir.path().join("out.txt")).unwrap().permissions().mode();
	assert_eq!(mode & 0o777, 0o644);
}

#[test]
fn malformed_lines_have_no_side_effects() {
	let dir = setup();
	let mut s = state();
	for template in &[
		"echo hi > {dir}/x |",
		"| echo hi > {dir}/x",
		"echo hi > {dir}/x | | cat",
		"echo hi > {dir}/x >",
		"echo hi > {dir}/x >> {dir}/y",
		"cat < {dir}/in.txt < {dir}/in.txt > {dir}/x",
	] {
		let e = eval(&mut s, &line(template, dir.path())).unwrap_err();
		assert_eq!(e.diagnostic(), Some(Diagnostic::InvalidCommand), "{}", template);
		assert!(!dir.path().join("x").exists(), "{}", template);
		assert!(!dir.path().join("y").exists(), "{}", template);
	}
}

#[test]
fn missing_input_file_fails_only_that_stage() {
	let dir = setup();
	let mut s = state();
	run(&mut s, "cat < {dir}/missing.txt > {dir}/x", dir.path());
	assert_eq!(s.last_status, 1);
	// input is opened first, so the output file is never created
	assert!(!dir.path().join("x").exists());

	run(&mut s, "cat < {dir}/missing.txt | sort {dir}/in.txt > {dir}/out.txt", dir.path());
	assert_eq!(read(dir.path(), "out.txt"), "a\na\nb\nc\n");
	assert_eq!(s.last_status, 0);
}

#[test]
fn unknown_program_fails_only_that_stage() {
	let dir = setup();
	let mut s = state();
	run(&mut s, "no-such-program-pipesh > {dir}/x", dir.path());
	assert_eq!(s.last_status, 127);

	run(&mut s, "cat {dir}/in.txt | no-such-program-pipesh | wc -l > {dir}/count.txt", dir.path());
	assert_eq!(read(dir.path(), "count.txt").trim(), "0");
	assert_eq!(s.last_status, 0);
}

#[test]
fn output_directory_is_an_invalid_file() {
	let dir = setup();
	let mut s = state();
	run(&mut s, "cat {dir}/in.txt > {dir}", dir.path());
	assert_eq!(s.last_status, 1);
}

#[test]
fn same_pipeline_twice_gives_same_output() {
	let dir = setup();
	let mut s = state();
	run(&mut s, "sort {dir}/in.txt | uniq -c > {dir}/first.txt", dir.path());
	run(&mut s, "sort {dir}/in.txt | uniq -c > {dir}/second.txt", dir.path());
	assert_eq!(read(dir.path(), "first.txt"), read(dir.path(), "second.txt"));
	assert!(!read(dir.path(), "first.txt").is_empty());
}

#[test]
fn arguments_pass_through_untouched() {
	let dir = setup();
	let mut s = state();
	run(&mut s, "echo \"a\" b\tc > {dir}/out.txt", dir.path());
	assert_eq!(read(dir.path(), "out.txt"), "\"a\" b c\n");
}
