use nix::errno::Errno;
use nix::sys::wait::{self,WaitStatus};
use nix::unistd::{self,Pid};

pub trait WaitStatusExt {
	fn is_terminated(self) -> bool;
	/// Shell-style status: the exit code, or 128 + signal number.
	fn code(self) -> u8;
}

impl WaitStatusExt for WaitStatus {
	fn is_terminated(self) -> bool {
		match self {
			WaitStatus::Exited(..) | WaitStatus::Signaled(..) => true,
			_ => false,
		}
	}
	fn code(self) -> u8 {
		match self {
			WaitStatus::Exited(_, code) => code as u8,
			WaitStatus::Signaled(_, signal, _) => 128u8.wrapping_add(signal as i32 as u8),
			_ => 0,
		}
	}
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Process {
	pub pid: Pid,
	pub status: WaitStatus,
}

/// The processes spawned for one pipeline, in stage order.
#[derive(Debug)]
pub struct Job {
	pub processes: Vec<Process>,
}

impl Job {
	#[cfg(test)]
	pub fn is_terminated(&self) -> bool {
		self.processes.iter().all(|pr| pr.status.is_terminated())
	}

	/// Reaps every process of this job, and only those.
	/// The first wait error is returned after the remaining processes were waited on.
	pub fn wait(&mut self) -> nix::Result<()> {
		let mut result = Ok(());
		for pr in self.processes.iter_mut() {
			while !pr.status.is_terminated() {
				match wait::waitpid(pr.pid, None) {
					Ok(status) => {
						log::debug!("reaped {}: {:?}", pr.pid, status);
						pr.status = status;
					},
					Err(Errno::EINTR) => continue,
					Err(e) => {
						log::warn!("waitpid({}) failed: {}", pr.pid, e);
						if result.is_ok() { result = Err(e); }
						break;
					},
				}
			}
		}
		result
	}

	/// Status of the pipeline: that of its last stage.
	pub fn status(&self) -> Option<u8> {
		self.processes.last().map(|pr| pr.status.code())
	}

	pub fn statuses(&self) -> Vec<u8> {
		self.processes.iter().map(|pr| pr.status.code()).collect()
	}
}

#[derive(Debug)]
pub struct JobBuilder {
	imp: Job,
}

impl JobBuilder {
	pub fn new(size_hint: usize) -> JobBuilder {
		JobBuilder {
			imp: Job { processes: Vec::with_capacity(size_hint) }
		}
	}

	/// Forks and records the child in the parent.
	///
	/// # Safety
	///
	/// The child branch may only perform async-signal-safe operations before it
	/// execs or exits.
	pub unsafe fn push_fork(&mut self) -> nix::Result<unistd::ForkResult> {
		let r = unistd::fork()?;
		if let unistd::ForkResult::Parent{ child: pid } = r {
			log::debug!("spawned stage {} as {}", self.imp.processes.len(), pid);
			self.imp.processes.push(Process { pid: pid, status: WaitStatus::StillAlive });
		}
		Ok(r)
	}

	pub fn build(self) -> Job {
		self.imp
	}
}
