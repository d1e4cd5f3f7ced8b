use dice_trace::{roll::Recorders, Grammar, Limits};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let grammar = Grammar::dice();
    let mut recorders = Recorders::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    print!("> ");
    io::stdout().flush()?;
    while let Some(Ok(line)) = lines.next() {
        let line = line.trim();
        if !line.is_empty() {
            let trace = recorders.route(None);
            trace.clear();
            match dice_trace::roll_with(&grammar, line, rand::thread_rng(), Limits::default(), trace) {
                Ok(value) => {
                    for l in trace.lines() {
                        println!("{}", l);
                    }
                    println!("= {}", value);
                }
                Err(why) => eprintln!("Error: {}", why),
            }
        }
        print!("> ");
        io::stdout().flush()?;
    }
    Ok(())
}
