#![no_main]

use flashprobe::{find_filesystem_partition, parse_partition_table};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let entries = parse_partition_table(data);
    let _ = find_filesystem_partition(&entries);
});
