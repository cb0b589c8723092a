use std::io::{BufRead, Write, stdin, stdout};

use miette::{IntoDiagnostic, Result};

use rowboat_db::{Database, Outcome};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(false)
                .context_lines(3)
                .tab_width(4)
                .break_words(true)
                .build(),
        )
    }))
    .into_diagnostic()?;
    miette::set_panic_hook();

    let mut db = Database::new();

    let stdin = stdin().lock();
    let mut stdout = stdout().lock();

    writeln!(stdout, "Enter queries below:").into_diagnostic()?;

    for line in stdin.lines() {
        let line = line.into_diagnostic()?;

        match db.execute(&line) {
            Ok(Outcome::Empty) => {}
            Ok(outcome) => writeln!(stdout, "{outcome}").into_diagnostic()?,
            Err(err) => {
                let (replayed, err) = err.into_load_parts();
                for outcome in &replayed {
                    writeln!(stdout, "{outcome}").into_diagnostic()?;
                }

                let report = miette::Report::new(err);
                log::debug!("{report:?}");
                writeln!(stdout, "Error: {report}").into_diagnostic()?;
            }
        }

        stdout.flush().into_diagnostic()?;
    }

    Ok(())
}
