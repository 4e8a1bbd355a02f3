#![no_main]

use libfuzzer_sys::fuzz_target;
use werewolf::phase::{Instruction, PhaseMachine, parse_instruction};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    // Every line either dispatches or is rejected at the boundary; the
    // machine must never leave the transition table.
    let mut machine = PhaseMachine::new();
    for line in input.lines() {
        match parse_instruction(line) {
            Ok(Instruction::Apply(command)) => {
                let before = machine.current();
                match machine.apply(command) {
                    Ok(after) => {
                        assert_eq!(werewolf::phase::next_phase(before, command), Some(after));
                    }
                    Err(_) => assert_eq!(machine.current(), before),
                }
            }
            Ok(Instruction::Quit) => break,
            Err(_) => {}
        }
    }
});
