use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use varlog_logger::{attr, Attr, Logger, Severity};

/// Logger families with a shared runtime level.
#[derive(Parser, Debug)]
#[command(name = "varlog")]
#[command(version)]
#[command(about = "Demonstrates logger families that share one runtime level", long_about = None)]
struct Cli
{
    /// Increase verbosity (-v warn, -vv info, -vvv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Set the level by name (error, warn, info, debug); overrides -v
    #[arg(long, global = true)]
    level: Option<String>,

    /// Output handler (console, text, json); unknown values fall back to json
    #[arg(long, default_value = "console", global = true)]
    handler: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands
{
    /// Emit one record per severity from the root and two subsystem loggers
    Emit,
    /// Emit heartbeats until interrupted
    ///
    /// On unix, SIGUSR1 raises verbosity by one step and SIGUSR2 lowers it.
    Watch
    {
        /// Seconds between heartbeats
        #[arg(short, long, default_value_t = 1)]
        interval: u64,
    },
}

fn main()
{
    let cli = Cli::parse();

    let root = Logger::from_handler_name(std::io::stdout(), &cli.handler);
    if let Some(name) = &cli.level {
        if let Err(e) = root.set_level_by_name(name) {
            eprintln!("Error: {e}");
            process::exit(2);
        }
    } else {
        root.set_level_by_counter(i64::from(cli.verbose));
    }

    let result = match cli.command {
        Commands::Emit => {
            emit(&root);
            Ok(())
        }
        Commands::Watch { interval } => watch(&root, Duration::from_secs(interval.max(1))),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn subsystems(root: &Logger) -> [Logger; 2]
{
    [
        root.with([attr("subsystem", "storage"), attr("pid", process::id())]),
        root.with([attr("subsystem", "http")]).with_group("listener").with([attr("port", 8080)]),
    ]
}

fn emit(root: &Logger)
{
    for logger in std::iter::once(root.clone()).chain(subsystems(root)) {
        for severity in Severity::ALL {
            logger.log(severity, &format!("{severity} record"), &[attr("level_now", root.level().as_str())]);
        }
    }
}

fn watch(root: &Logger, interval: Duration) -> std::io::Result<()>
{
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_watch(root.clone(), interval))
}

async fn run_watch(root: Logger, interval: Duration) -> std::io::Result<()>
{
    let loggers = subsystems(&root);
    let mut ticker = tokio::time::interval(interval);
    let mut beat: u64 = 0;
    let mut signals = LevelSignals::new()?;

    root.info("watching; send SIGUSR1/SIGUSR2 to change verbosity, ctrl-c to stop");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                beat += 1;
                for logger in &loggers {
                    let attrs: [Attr; 1] = [attr("beat", beat)];
                    logger.log(Severity::Debug, "heartbeat", &attrs);
                    if beat % 5 == 0 {
                        logger.log(Severity::Info, "still alive", &attrs);
                    }
                }
            }
            step = signals.recv() => {
                let next = match step {
                    Step::Louder => root.level().more_verbose(),
                    Step::Quieter => root.level().less_verbose(),
                };
                root.set_level(next);
                root.log(Severity::Warn, "level changed", &[attr("level", next.as_str())]);
            }
            result = tokio::signal::ctrl_c() => {
                result?;
                root.info("stopping");
                return Ok(());
            }
        }
    }
}

enum Step
{
    Louder,
    Quieter,
}

#[cfg(unix)]
struct LevelSignals
{
    louder: tokio::signal::unix::Signal,
    quieter: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl LevelSignals
{
    fn new() -> std::io::Result<Self>
    {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self { louder: signal(SignalKind::user_defined1())?, quieter: signal(SignalKind::user_defined2())? })
    }

    async fn recv(&mut self) -> Step
    {
        tokio::select! {
            _ = self.louder.recv() => Step::Louder,
            _ = self.quieter.recv() => Step::Quieter,
        }
    }
}

#[cfg(not(unix))]
struct LevelSignals;

#[cfg(not(unix))]
impl LevelSignals
{
    #[allow(clippy::unnecessary_wraps)]
    fn new() -> std::io::Result<Self>
    {
        Ok(Self)
    }

    async fn recv(&mut self) -> Step
    {
        std::future::pending().await
    }
}

#[cfg(test)]
mod tests
{
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_is_well_formed()
    {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbose_flags_are_counted()
    {
        let cli = Cli::parse_from(["varlog", "-vvv", "emit"]);
        assert_eq!(cli.verbose, 3);
        assert_eq!(cli.handler, "console");
        assert!(cli.level.is_none());
    }

    #[test]
    fn test_global_options_after_subcommand()
    {
        let cli = Cli::parse_from(["varlog", "watch", "--interval", "2", "--handler", "json", "--level", "debug"]);
        assert!(matches!(cli.command, Commands::Watch { interval: 2 }));
        assert_eq!(cli.handler, "json");
        assert_eq!(cli.level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_subsystems_share_root_level()
    {
        let root = Logger::new(std::io::sink(), varlog_logger::HandlerKind::Text);
        for logger in subsystems(&root) {
            assert!(logger.level_cell().same_cell(root.level_cell()));
        }
    }
}
