//! Terminal mortgage calculator.
//!
//! Four required fields (home price, down payment, interest rate, loan term)
//! produce the monthly payment, total payable amount and total interest.
//!
//! ```bash
//! # interactive form
//! mortgage-calc
//!
//! # pre-filled form, computed once and printed as JSON
//! mortgage-calc --home-price 300000 --down-payment 60000 --interest-rate 6 --loan-term 30 --json
//! ```

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;
mod calculator;
mod form;
mod ui;

use app::{handle_key, App};
use form::FieldId;

#[derive(Parser, Debug)]
#[command(name = "mortgage-calc", version)]
#[command(about = "Monthly payment, total payable and total interest for a fixed-rate mortgage")]
struct Args {
    /// Home price ($)
    #[arg(long, allow_hyphen_values = true)]
    home_price: Option<String>,

    /// Down payment ($)
    #[arg(long, allow_hyphen_values = true)]
    down_payment: Option<String>,

    /// Annual interest rate (%)
    #[arg(long, allow_hyphen_values = true)]
    interest_rate: Option<String>,

    /// Loan term (years)
    #[arg(long, allow_hyphen_values = true)]
    loan_term: Option<String>,

    /// Submit the pre-filled form once and print the result as JSON
    #[arg(long, default_value = "false")]
    json: bool,

    /// Write logs to logs/mortgage-calc.log
    #[arg(long, default_value = "false")]
    log: bool,
}

impl Args {
    fn prefill(&self, app: &mut App) {
        let values = [
            (FieldId::HomePrice, &self.home_price),
            (FieldId::DownPayment, &self.down_payment),
            (FieldId::InterestRate, &self.interest_rate),
            (FieldId::LoanTerm, &self.loan_term),
        ];
        for (field, value) in values {
            if let Some(value) = value {
                app.form.set_value(field, value.as_str());
            }
        }
    }
}

fn init_logging(args: &Args) -> Result<Option<WorkerGuard>> {
    if args.log {
        std::fs::create_dir_all("logs")?;
        let file_appender = tracing_appender::rolling::daily("logs", "mortgage-calc.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(non_blocking)
                    .with_ansi(false),
            )
            .init();
        return Ok(Some(guard));
    }

    // The interactive form owns the terminal, so console logging is headless only.
    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_writer(io::stderr)
            .init();
    }
    Ok(None)
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    // Dropped on return so the file writer flushes on every exit path.
    let _guard = init_logging(&args)?;

    let mut app = App::default();
    args.prefill(&mut app);

    if args.json {
        let submitted = run_headless(&mut app, &mut io::stdout(), &mut io::stderr())?;
        return Ok(if submitted {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(2)
        });
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("{:?}", err);
    }

    Ok(ExitCode::SUCCESS)
}

/// Submits the pre-filled form once. Returns `false` when a required field
/// is missing, after writing one message per missing field to `err`.
fn run_headless(app: &mut App, out: &mut impl Write, err: &mut impl Write) -> Result<bool> {
    match app.submit() {
        Ok(result) => {
            writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
            Ok(true)
        }
        Err(errors) => {
            for error in errors.iter() {
                writeln!(err, "{}", error)?;
            }
            Ok(false)
        }
    }
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::ui(f, &app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if handle_key(&mut app, key) {
                return Ok(());
            }
        }
    }
}
