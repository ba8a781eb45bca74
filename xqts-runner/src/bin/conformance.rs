//! Conformance run CLI tool
//!
//! Drive XQTS test-cases against an embedded XQuery engine.

fn main() {
    println!("xqts-runner conformance tool");
    println!();
    println!("Usage:");
    println!("  conformance run --catalog <CATALOG> [--filter <PATTERN>]");
    println!("  conformance report --catalog <CATALOG> --output <FORMAT>");
    println!();
    println!("Output formats: json, markdown, csv");
    println!();
    println!("Note: requires an engine adapter crate; none is bundled.");
}
