use classtrace::check::ClassChecker;
use classtrace::driver;
use classtrace::trace::ClassTracer;

use clap::{App, Arg};
use std::io::Write;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let matches = App::new("textify")
        .version("0.1.0")
        .about("Prints a disassembled view of the built-in sample class")
        .arg(
            Arg::with_name("debug")
                .long("debug")
                .help("Include line number and local variable events"),
        )
        .get_matches();

    let debug = matches.is_present("debug");
    log::info!("disassembling the sample class (debug events: {})", debug);

    let tracer = ClassTracer::new(None);
    let text = tracer.text();
    let mut checker = ClassChecker::new(Box::new(tracer));
    driver::sample_class(&mut checker, debug)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    out.write_all(text.render().as_bytes())?;
    out.flush()?;
    Ok(())
}
