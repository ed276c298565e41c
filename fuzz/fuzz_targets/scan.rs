//! Scanner fuzzer over arbitrary dump bytes.
//!
//! Tests that every kept statement is well formed and that rendering the
//! extraction twice yields identical documents.

use dump_subset::testing::test_scan;
use honggfuzz::fuzz;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            test_scan(data);
        });
    }
}
