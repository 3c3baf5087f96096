use std::env;

pub const MAX_STAGES_KEY: &str = "PIPESH_MAX_STAGES";
pub const MAX_ARGS_KEY: &str = "PIPESH_MAX_ARGS";
pub const LOG_KEY: &str = "PIPESH_LOG";

const DEFAULT_MAX_STAGES: usize = 64;
const DEFAULT_MAX_ARGS: usize = 1024;

/// Upper bounds applied while splitting a line into stages.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Limits {
	pub max_stages: usize,
	pub max_args: usize,
}

impl Default for Limits {
	fn default() -> Limits {
		Limits { max_stages: DEFAULT_MAX_STAGES, max_args: DEFAULT_MAX_ARGS }
	}
}

#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Config {
	pub limits: Limits,
}

impl Config {
	pub fn from_env() -> Config {
		Config::from_lookup(|key| env::var(key).ok())
	}

	pub fn from_lookup<F>(lookup: F) -> Config where F: Fn(&str) -> Option<String> {
		let defaults = Limits::default();
		let limits = Limits {
			max_stages: read_limit(&lookup, MAX_STAGES_KEY, defaults.max_stages),
			max_args: read_limit(&lookup, MAX_ARGS_KEY, defaults.max_args),
		};
		Config { limits: limits }
	}
}

fn read_limit<F>(lookup: &F, key: &str, default: usize) -> usize where F: Fn(&str) -> Option<String> {
	let raw = match lookup(key) {
		Some(raw) => raw,
		None => { return default; },
	};
	match raw.trim().parse::<usize>() {
		Ok(n) if n > 0 => n,
		_ => {
			log::warn!("ignoring {}={:?}, using {}", key, raw, default);
			default
		},
	}
}
