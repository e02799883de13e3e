//! Builds the balanced-parentheses DPDA and simulates a string from the
//! command line.
//!
//! ```text
//! cargo run --example simulate_dpda -- "(())"
//! ```

use clap::{App, Arg};
use log::{debug, info};

use automata_simulator::{
    AutomatonError, DeterministicPushdownAutomaton, DEFAULT_SIMULATION_DEPTH,
};

fn balanced_parens() -> DeterministicPushdownAutomaton {
    let symbols = |list: &[&str]| -> Vec<String> { list.iter().map(|s| s.to_string()).collect() };

    let mut pda = DeterministicPushdownAutomaton::new();
    pda.add_input_alphabet(&symbols(&["(", ")"]));
    pda.add_stack_alphabet(&symbols(&["A", "Z"]));
    pda.add_state("q0", false).expect("fresh automaton");
    pda.add_state("q1", true).expect("fresh automaton");
    pda.set_start_state("q0").expect("state exists");
    pda.add_transition("q0", "q0", "(", "Z", "Z,A")
        .expect("valid transition");
    pda.add_transition("q0", "q0", "(", "A", "A,A")
        .expect("valid transition");
    pda.add_transition("q0", "q0", ")", "A", "")
        .expect("valid transition");
    pda.add_transition("q0", "q1", "", "Z", "Z")
        .expect("valid transition");
    pda
}

fn main() {
    let matches = App::new("simulate_dpda")
        .about("Check a parenthesis string for balance with a DPDA")
        .arg(
            Arg::with_name("input")
                .required(true)
                .index(1)
                .takes_value(true)
                .value_name("STRING")
                .help("A string of ( and ) characters"),
        )
        .arg(
            Arg::with_name("depth")
                .short("d")
                .long("depth")
                .takes_value(true)
                .value_name("STEPS")
                .help("Maximum number of transitions to simulate"),
        )
        .get_matches();

    env_logger::init();

    let raw = matches.value_of("input").unwrap();
    let depth = matches
        .value_of("depth")
        .and_then(|d| d.parse::<usize>().ok())
        .unwrap_or(DEFAULT_SIMULATION_DEPTH);

    let input: Vec<String> = raw.chars().map(|c| c.to_string()).collect();
    debug!("simulating {:?} with depth {}", input, depth);

    let pda = balanced_parens();
    let verdict = match pda.simulate(&input, depth) {
        Ok(true) => "balanced",
        Ok(false) => "not balanced",
        Err(AutomatonError::SimulationDepthExceeded(d)) => {
            info!("gave up after {} steps", d);
            "not balanced"
        }
        Err(err) => {
            info!("simulation failed: {}", err);
            "not balanced"
        }
    };
    println!("{}: {}", raw, verdict);
}
