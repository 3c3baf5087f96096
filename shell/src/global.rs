use crate::config::Config;

/// Everything that outlives a single line. The working directory is process state.
#[derive(Debug)]
pub struct State {
	pub config: Config,
	pub last_status: u8,
}

impl State {
	pub fn new(config: Config) -> State {
		State { config: config, last_status: 0 }
	}
}
