use std::io;
use io::BufRead;

use pipesh::{config,eval,global,prompt,signals};
use pipesh::types::Flow;

fn main() {
	env_logger::Builder::from_env(env_logger::Env::new().filter_or(config::LOG_KEY, "off")).init();
	if let Err(e) = signals::INTERACTIVE.apply() {
		log::warn!("cannot ignore terminal signals: {}", e);
	}

	let mut state = global::State::new(config::Config::from_env());
	let mut stdout = io::stdout();
	let stdin = io::stdin();
	let mut stdin_locked = stdin.lock();
	loop {
		if let Err(e) = prompt::write_prompt(&mut stdout) {
			eprintln!("{}", e.report());
		}
		let mut line: Vec<u8> = vec![];
		match stdin_locked.read_until(b'\n', &mut line) {
			Ok(0) => { break; },
			Ok(_) => {},
			Err(e) => {
				log::warn!("cannot read input: {}", e);
				break;
			},
		}
		match eval::eval(&mut state, &line) {
			Ok(Flow::Continue) => {},
			Ok(Flow::Exit) => { break; },
			Err(e) => eprintln!("{}", e.report()),
		}
	}
	log::debug!("leaving, last status {}", state.last_status);
}
