#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Must never panic, only return errors.
    let _ = faktura_codec::read(data);
});
