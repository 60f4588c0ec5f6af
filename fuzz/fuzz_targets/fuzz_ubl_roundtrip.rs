#![no_main]

use faktura_codec::profile::{Profile, Version};
use faktura_codec::syntax::Format;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parse → serialize → parse must not panic at any step.
    if let Ok(invoice) = faktura_codec::read(data) {
        if let Ok(xml) = faktura_codec::write(&invoice, Version::V23, Profile::Extended, Format::Ubl) {
            let _ = faktura_codec::read(&xml);
        }
    }
});
