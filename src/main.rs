//! squadlog main entrypoint.

use squadlog::run;
use squadlog::ui::messages::report;

fn main() {
    println!();
    if let Err(e) = run() {
        std::process::exit(report(&e));
    }
}
