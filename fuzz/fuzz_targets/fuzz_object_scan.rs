#![no_main]

use flashprobe::ObjectScanner;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let outcome = ObjectScanner::default().scan(data);
    for header in outcome.headers() {
        if let Some(range) = header.payload_range(data.len()) {
            let _ = &data[range];
        }
    }
});
