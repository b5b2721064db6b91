//! mirrorkit CLI entry point.

use mirrorkit::cli;

fn main() {
    // Tracing may not be usable during a panic; write straight to stderr.
    #[allow(clippy::print_stderr)]
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let exit_code = mirrorkit::run(cli::parse());
    std::process::exit(exit_code);
}
