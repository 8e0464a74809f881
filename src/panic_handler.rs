use crossterm::{
    execute,
    terminal::{LeaveAlternateScreen, disable_raw_mode},
};
use std::io::{self, Write};
use std::panic;

/// Installs better-panic and wraps its hook so the terminal is restored
/// before the report prints. Without this a panic leaves the shell stuck in
/// raw mode on the alternate screen, with the backtrace invisible.
pub fn initialize_panic_handler() {
    better_panic::install();

    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();

        default_hook(panic_info);

        std::process::exit(1);
    }));
}

/// Best-effort terminal cleanup: leave raw mode and the alternate screen,
/// bring the cursor back. Errors are ignored, the terminal may already be
/// half torn down when this runs.
pub fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
    let _ = execute!(io::stderr(), crossterm::cursor::Show);
    let _ = writeln!(io::stderr());
}
