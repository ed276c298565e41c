//! COPY region fuzzer.
//!
//! Tests that arbitrary tab-separated rows become exactly one tuple each and
//! that every `\N` field is rendered as `NULL`.

use dump_subset::testing::test_copy_region;
use honggfuzz::fuzz;

fn main() {
    loop {
        fuzz!(|rows: Vec<String>| {
            test_copy_region(&rows);
        });
    }
}
