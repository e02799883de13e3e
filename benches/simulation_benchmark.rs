use criterion::{black_box, criterion_group, criterion_main, Criterion};

use automata_simulator::{DeterministicFiniteAutomaton, NonDeterministicPushdownAutomaton};

fn symbols(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// The "ends in 01" recogniser over a long alternating input.
fn dfa_benchmark(c: &mut Criterion) {
    let mut dfa = DeterministicFiniteAutomaton::new();
    dfa.add_input_alphabet(&symbols(&["0", "1"]));
    dfa.add_state("q0", false).unwrap();
    dfa.add_state("q1", false).unwrap();
    dfa.add_state("q2", true).unwrap();
    dfa.set_start_state("q0").unwrap();
    dfa.add_transition("q0", "q1", "0").unwrap();
    dfa.add_transition("q0", "q0", "1").unwrap();
    dfa.add_transition("q1", "q1", "0").unwrap();
    dfa.add_transition("q1", "q2", "1").unwrap();
    dfa.add_transition("q2", "q1", "0").unwrap();
    dfa.add_transition("q2", "q0", "1").unwrap();

    let mut input = Vec::new();
    for index in 0..1000 {
        input.push(if index % 2 == 0 { "0" } else { "1" }.to_string());
    }

    c.bench_function("dfa_simulate_1000", |b| {
        b.iter(|| {
            let accepted = dfa.simulate(black_box(&input), 2000).unwrap();
            black_box(accepted);
        });
    });
}

/// A suffix-guessing NPDA, to exercise the frontier machinery.
fn npda_benchmark(c: &mut Criterion) {
    let mut pda = NonDeterministicPushdownAutomaton::new();
    pda.add_input_alphabet(&symbols(&["0", "1"]));
    pda.add_stack_alphabet(&symbols(&["Z"]));
    pda.add_state("scan", false).unwrap();
    pda.add_state("saw0", false).unwrap();
    pda.add_state("done", true).unwrap();
    pda.set_start_state("scan").unwrap();
    pda.add_transition("scan", "scan", "0", "Z", "Z").unwrap();
    pda.add_transition("scan", "scan", "1", "Z", "Z").unwrap();
    pda.add_transition("scan", "saw0", "0", "Z", "Z").unwrap();
    pda.add_transition("saw0", "done", "1", "Z", "Z").unwrap();

    let mut input = Vec::new();
    for index in 0..200 {
        input.push(if index % 3 == 0 { "1" } else { "0" }.to_string());
    }

    c.bench_function("npda_simulate_200", |b| {
        b.iter(|| {
            let accepted = pda.simulate(black_box(&input), 1000).unwrap();
            black_box(accepted);
        });
    });
}

criterion_group!(benches, dfa_benchmark, npda_benchmark);
criterion_main!(benches);
