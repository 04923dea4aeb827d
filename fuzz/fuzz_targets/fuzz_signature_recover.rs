#![no_main]

use flashprobe::{RecoveryStrategy, SignatureExtractor};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    for block in SignatureExtractor::default().recover(data) {
        let _ = &data[block.range()];
    }
});
