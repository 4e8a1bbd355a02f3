#![no_main]

use libfuzzer_sys::fuzz_target;
use werewolf::phase::GameMessage;

fuzz_target!(|data: &[u8]| {
    // We don't care about the result, just that it doesn't panic
    if let Ok(line) = std::str::from_utf8(data) {
        if let Ok(msg) = GameMessage::from_json_line(line) {
            let _ = msg.instruction();
        }
    }
});
