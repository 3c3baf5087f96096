use std::os::fd::{AsRawFd,OwnedFd,RawFd};

use nix::fcntl::OFlag;
use nix::unistd;

#[derive(Debug)]
pub struct Connection {
	pub read: OwnedFd,
	pub write: OwnedFd,
}

/// The `k - 1` pipes joining `k` stages. Connection `i` carries stage `i`'s
/// output to stage `i + 1`. Dropping the chain closes every end it still owns.
#[derive(Debug)]
pub struct PipeChain {
	connections: Vec<Connection>,
}

impl PipeChain {
	/// Allocates all connections up front. On failure the ones already
	/// created are closed before returning.
	pub fn new(count: usize) -> nix::Result<PipeChain> {
		let mut connections = Vec::with_capacity(count);
		for _ in 0 .. count {
			// close-on-exec so a stray copy can never outlive an exec
			let (read, write) = unistd::pipe2(OFlag::O_CLOEXEC)?;
			connections.push(Connection { read: read, write: write });
		}
		Ok(PipeChain { connections: connections })
	}

	#[cfg(test)]
	pub fn len(&self) -> usize {
		self.connections.len()
	}

	#[cfg(test)]
	pub fn is_empty(&self) -> bool {
		self.connections.is_empty()
	}

	/// Descriptor stage `stage` should read from, if it is fed by a pipe.
	pub fn stdin_for(&self, stage: usize) -> Option<RawFd> {
		if stage == 0 {
			None
		} else {
			self.connections.get(stage - 1).map(|c| c.read.as_raw_fd())
		}
	}

	/// Descriptor stage `stage` should write to, if it feeds a pipe.
	pub fn stdout_for(&self, stage: usize) -> Option<RawFd> {
		self.connections.get(stage).map(|c| c.write.as_raw_fd())
	}

	pub fn raw_fds(&self) -> Vec<RawFd> {
		self.connections.iter().flat_map(|c| vec![c.read.as_raw_fd(), c.write.as_raw_fd()]).collect()
	}

	pub fn close(self) {
		drop(self)
	}
}
