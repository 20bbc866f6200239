#![no_main]

use libfuzzer_sys::fuzz_target;
use tbscan::classify::classify_block;
use tbscan::extract::{read_lines, BlockExtractor};

fuzz_target!(|data: &[u8]| {
    // Logs are decoded lossily, so arbitrary bytes are valid input
    let text = String::from_utf8_lossy(data);
    let lines = read_lines(&text);

    let blocks = BlockExtractor::default().extract(&lines);
    for block in &blocks {
        let record = classify_block(block);
        assert!(!record.exception_kind.is_empty());
    }
});
