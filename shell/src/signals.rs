use nix::sys::signal::{self,SigHandler,Signal};

/// Signal disposition of the interactive process, applied once at startup.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SignalPolicy {
	/// Ignored by the shell. The disposition is inherited by every stage.
	pub ignored: &'static [Signal],
	/// Reset to the default action in each stage before exec.
	pub child_defaults: &'static [Signal],
}

pub const INTERACTIVE: SignalPolicy = SignalPolicy {
	ignored: &[Signal::SIGINT, Signal::SIGQUIT, Signal::SIGTSTP],
	// the Rust runtime ignores SIGPIPE, stages must still die on a broken pipe
	child_defaults: &[Signal::SIGPIPE],
};

fn set_all(signals: &[Signal], handler: SigHandler) -> nix::Result<()> {
	for &sig in signals {
		unsafe { signal::signal(sig, handler) }?;
	}
	Ok(())
}

impl SignalPolicy {
	pub fn apply(&self) -> nix::Result<()> {
		set_all(self.ignored, SigHandler::SigIgn)
	}

	/// Only calls `sigaction`, so it is safe between fork and exec.
	pub fn apply_in_child(&self) -> nix::Result<()> {
		set_all(self.child_defaults, SigHandler::SigDfl)
	}
}
