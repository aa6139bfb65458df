use classtrace::check::ClassChecker;
use classtrace::driver;
use classtrace::emitter::ClassEmitter;

use clap::{App, Arg};
use std::io::Write;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let matches = App::new("asmify")
        .version("0.1.0")
        .about("Prints Rust source that replays the built-in sample class")
        .arg(
            Arg::with_name("debug")
                .long("debug")
                .help("Include line number and local variable events"),
        )
        .get_matches();

    let debug = matches.is_present("debug");
    log::info!("emitting generator source (debug events: {})", debug);

    let emitter = ClassEmitter::new();
    let text = emitter.text();
    let mut checker = ClassChecker::new(Box::new(emitter));
    driver::sample_class(&mut checker, debug)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    out.write_all(text.render().as_bytes())?;
    out.flush()?;
    Ok(())
}
