use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use formfill_core::fill::{FieldOutcome, FillMethod};
use formfill_core::{smart_fill, FillConfig, FillReport, Page, Profile};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "formfill", about = "Auto-fill web forms from a profile")]
struct Cli {
    /// Log every decision, not just filled fields
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a browser and fill forms on demand
    #[cfg(feature = "webdriver")]
    Run {
        /// WebDriver server address (chromedriver, geckodriver)
        #[arg(long, default_value = "http://localhost:9515")]
        webdriver: String,

        /// Browser to launch: chrome or firefox
        #[arg(long, default_value = "chrome")]
        browser: String,

        /// Run without a visible window
        #[arg(long)]
        headless: bool,

        /// Page to open before the first command
        #[arg(long)]
        url: Option<String>,

        #[command(flatten)]
        fill: FillArgs,
    },
    /// Fill a saved or fetched page in memory and show the result
    Preview {
        /// HTML file, URL, or - for stdin
        source: String,

        #[command(flatten)]
        fill: FillArgs,
    },
}

#[derive(clap::Args)]
struct FillArgs {
    /// JSON profile with values and aliases (default: built-in sample data)
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Minimum similarity for picking a dropdown option
    #[arg(long, default_value_t = formfill_core::dropdown::DEFAULT_THRESHOLD)]
    threshold: f64,

    /// Print reports as JSON
    #[arg(long)]
    json: bool,
}

impl FillArgs {
    fn load(&self) -> anyhow::Result<(Profile, FillConfig)> {
        if !(0.0..=1.0).contains(&self.threshold) {
            bail!("threshold must be between 0 and 1, got {}", self.threshold);
        }
        let profile = match &self.profile {
            Some(path) => Profile::load(path)?,
            None => Profile::sample(),
        };
        Ok((profile, FillConfig { threshold: self.threshold }))
    }
}

/// A line typed at the prompt.
#[derive(Debug, PartialEq)]
enum Command {
    Fill,
    Exit,
    Ignore,
}

fn parse_command(line: &str) -> Command {
    match line.trim().to_lowercase().as_str() {
        "fill" => Command::Fill,
        "exit" => Command::Exit,
        _ => Command::Ignore,
    }
}

/// Prompt until `exit` or end of input, running `on_fill` for every `fill`.
/// Returns how many fill passes ran.
fn command_loop<R: BufRead, W: Write>(
    mut input: R,
    out: &mut W,
    mut on_fill: impl FnMut(&mut W) -> io::Result<()>,
) -> io::Result<usize> {
    let mut passes = 0;
    let mut line = String::new();
    loop {
        write!(out, "Command (fill / exit): ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }
        match parse_command(&line) {
            Command::Fill => {
                on_fill(out)?;
                passes += 1;
            }
            Command::Exit => break,
            Command::Ignore => {}
        }
    }
    Ok(passes)
}

const BANNER: &str = "
=================================================
MANUAL MODE ENABLED
-------------------------------------------------
1. Browser is open
2. Navigate to any form page
3. Login / solve CAPTCHA manually
4. When the form is ready, type:
   -> fill
5. Type 'exit' to close
=================================================
";

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        #[cfg(feature = "webdriver")]
        Commands::Run {
            webdriver,
            browser,
            headless,
            url,
            fill,
        } => run(&webdriver, &browser, headless, url.as_deref(), &fill),
        Commands::Preview { source, fill } => preview(&source, &fill),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "formfill=debug,formfill_core=debug"
    } else {
        "formfill=info,formfill_core=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[cfg(feature = "webdriver")]
fn run(
    webdriver: &str,
    browser: &str,
    headless: bool,
    url: Option<&str>,
    args: &FillArgs,
) -> anyhow::Result<()> {
    use formfill_core::webdriver::{WebDriverConfig, WebDriverSession};

    let (profile, config) = args.load()?;
    let driver_config = WebDriverConfig {
        url: webdriver.to_string(),
        browser: browser.parse()?,
        headless,
        ..Default::default()
    };

    let mut session = WebDriverSession::launch(&driver_config).context("failed to launch browser")?;
    if let Some(url) = url {
        session.goto(url).with_context(|| format!("failed to open {}", url))?;
    }

    println!("{}", BANNER);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let result = command_loop(stdin.lock(), &mut stdout, |out| {
        if let Ok(current) = session.current_url() {
            tracing::info!(url = %current, "filling page");
        }
        match smart_fill(&mut session, &profile, &config) {
            Ok(report) => print_report(out, &report, args.json),
            Err(e) => writeln!(out, "[ERROR] could not read the page: {}", e),
        }
    });

    let passes = close_after(result, || Ok(session.quit()?))?;
    tracing::debug!(passes, "left manual mode");
    Ok(())
}

/// Run `close` whatever `result` holds, then hand back `result`. An error
/// from `close` only surfaces when `result` itself succeeded.
#[cfg(feature = "webdriver")]
fn close_after<T>(
    result: io::Result<T>,
    close: impl FnOnce() -> anyhow::Result<()>,
) -> anyhow::Result<T> {
    let closed = close();
    match result {
        Ok(value) => closed.map(|_| value),
        Err(e) => {
            if let Err(close_err) = closed {
                tracing::warn!(error = %close_err, "failed to close browser");
            }
            Err(e.into())
        }
    }
}

fn preview(source: &str, args: &FillArgs) -> anyhow::Result<()> {
    let (profile, config) = args.load()?;
    let mut page = load_page(source)?;

    let report = smart_fill(&mut page, &profile, &config)?;
    let mut stdout = io::stdout();

    if args.json {
        let out = serde_json::json!({
            "url": page.url(),
            "report": report,
            "values": page.values(),
        });
        writeln!(stdout, "{}", serde_json::to_string_pretty(&out)?)?;
    } else {
        print_report(&mut stdout, &report, false)?;
        writeln!(stdout, "---")?;
        for control in page.values() {
            writeln!(
                stdout,
                "{} {} = {}",
                control.tag,
                control.name.as_deref().unwrap_or("-"),
                control.value.as_deref().unwrap_or("")
            )?;
        }
    }
    Ok(())
}

fn load_page(source: &str) -> anyhow::Result<Page> {
    if source.starts_with("http://") || source.starts_with("https://") {
        #[cfg(feature = "fetch")]
        {
            let config = formfill_core::fetch::FetchConfig::default();
            return Ok(formfill_core::fetch::fetch(source, &config)?);
        }
        #[cfg(not(feature = "fetch"))]
        bail!("fetching URLs requires the \"fetch\" feature");
    }

    let html = if source == "-" {
        use std::io::Read;
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(source).with_context(|| format!("failed to read {}", source))?
    };
    Ok(Page::from_html(&html, source))
}

fn print_report<W: Write>(out: &mut W, report: &FillReport, as_json: bool) -> io::Result<()> {
    if as_json {
        let json = serde_json::to_string_pretty(report).map_err(io::Error::other)?;
        return writeln!(out, "{}", json);
    }

    for field in &report.fields {
        match &field.outcome {
            FieldOutcome::Filled { key, method } => match method {
                FillMethod::Select { option } => {
                    writeln!(out, "[FILLED] Dropdown -> {} ({})", key, option)?
                }
                FillMethod::Assigned => writeln!(out, "[FILLED] {} (password)", key)?,
                FillMethod::Typed => writeln!(out, "[FILLED] {}", key)?,
            },
            FieldOutcome::Failed { key, error } => {
                let name = key.as_deref().unwrap_or(&field.metadata);
                writeln!(out, "[SKIPPED] {}: {}", name, error)?
            }
            FieldOutcome::NoOption { key } => {
                writeln!(out, "[SKIPPED] Dropdown -> {}: no close option", key)?
            }
            FieldOutcome::NoValue { .. } | FieldOutcome::Unmatched => {}
        }
    }
    writeln!(
        out,
        "[INFO] Smart Fill Completed: {} filled, {} failed, {} skipped",
        report.filled(),
        report.failed(),
        report.skipped()
    )
}
