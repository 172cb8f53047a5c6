use anyhow::Result;
use blitzortung::{ClientHandle, FeedClient, FeedError, Strike};
use blitzortung_watch::bin_common::{
    init_tracing, load_config_from_env, parse_args, spawn_signal_handler, BinaryRunner, CliArgs,
    ConfigType, MonitorConfig, RunConfig,
};
use crossbeam_channel::{select, Receiver};
use std::io::Write;
use std::thread::JoinHandle;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Streams strikes from the feed to stdout
struct StrikeMonitor {
    run_config: RunConfig,
    config: MonitorConfig,
}

impl StrikeMonitor {
    fn new(config: MonitorConfig) -> Self {
        let run_config = RunConfig::new("Strike monitor")
            .with_verbose(config.verbose)
            .with_limit(config.limit);
        Self { run_config, config }
    }

    /// Print strikes on a dedicated thread so the read task never waits on stdout
    fn spawn_printer(
        &self,
        strikes: Receiver<Strike>,
        done: Receiver<()>,
        handle: ClientHandle,
    ) -> JoinHandle<u64> {
        let verbose = self.run_config.verbose;
        let limit = self.run_config.limit;

        std::thread::spawn(move || {
            let mut events = 0u64;
            let stdout = std::io::stdout();

            loop {
                select! {
                    recv(strikes) -> msg => {
                        let Ok(mut strike) = msg else { break };
                        events += 1;

                        let mut out = stdout.lock();
                        if verbose {
                            strike.signals.clear();
                            let _ = writeln!(out, "#{} {} delay={}ms {:#?}",
                                events, strike.time(), strike.delay().num_milliseconds(), strike);
                        } else {
                            let _ = write!(out, ".");
                            let _ = out.flush();
                        }

                        if limit.is_some_and(|limit| events >= limit) {
                            handle.shutdown();
                            break;
                        }
                    }
                    recv(done) -> _ => break,
                }
            }

            events
        })
    }
}

impl BinaryRunner for StrikeMonitor {
    async fn run(&mut self) -> Result<()> {
        let (strike_tx, strike_rx) = crossbeam_channel::unbounded();
        let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(0);

        let mut builder = FeedClient::builder()
            .handler(move |strike: Strike| {
                let _ = strike_tx.send(strike);
            })
            .error_hook(|err: &FeedError| println!("error detected: {}", err))
            .backoff(self.config.backoff.policy());
        if !self.config.endpoints.is_empty() {
            builder = builder.endpoints(self.config.endpoints.clone());
        }
        if let Some(secs) = self.config.pong_wait_secs {
            builder = builder.pong_wait(Duration::from_secs(secs));
        }
        let mut client = builder.build()?;

        let printer = self.spawn_printer(strike_rx, done_rx, client.handle());

        let cancel = CancellationToken::new();
        spawn_signal_handler(cancel.clone());

        let result = client.run(cancel).await;

        drop(done_tx);
        let events = printer.join().unwrap_or(0);
        if !self.run_config.verbose {
            println!();
        }
        info!("Received {} strikes", events);

        match result {
            Ok(()) => Ok(()),
            Err(FeedError::Cancelled) => {
                info!("Interrupted");
                Ok(())
            }
            Err(e) => {
                error!("Feed client failed: {}", e);
                println!("error: {}", e);
                Err(e.into())
            }
        }
    }

    fn config(&self) -> &RunConfig {
        &self.run_config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Load config first (before logging is initialized)
    let args = CliArgs::parse(&parse_args())?;
    let config_path = load_config_from_env(ConfigType::Monitor);
    let mut config = MonitorConfig::load(&config_path)?;
    config.apply_args(&args);

    init_tracing(&config.log_level);
    config.log();

    let mut monitor = StrikeMonitor::new(config);
    monitor.execute().await
}
