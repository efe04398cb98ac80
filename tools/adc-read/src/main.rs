//! Read voltages from an ADS1115 attached to a Linux I2C bus.

use std::io::IsTerminal;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tokio::signal::unix::{self, Signal, SignalKind};
use tracing::{debug, info, warn};

use i2c_adc::config::{self, AdcConfig};
use i2c_adc::hw_trait::{Adc, AdcChannel, HwError, I2cBus};
use i2c_adc::peripheral::Ads1115;
use i2c_adc::transport::I2cDev;

/// Sample ADS1115 input channels over i2c-dev
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// I2C bus device node [env: I2C_ADC_DEVICE, default: /dev/i2c-1]
    #[arg(short = 'D', long)]
    device: Option<String>,

    /// Converter address, e.g. 0x48 [env: I2C_ADC_ADDRESS]
    #[arg(short, long, value_parser = config::parse_address)]
    address: Option<u8>,

    /// Channel to sample (0-3); repeat for several [env: I2C_ADC_CHANNELS]
    #[arg(short, long = "channel", value_parser = config::parse_channel)]
    channels: Vec<AdcChannel>,

    /// Poll every N milliseconds instead of sampling once [env: I2C_ADC_INTERVAL_MS]
    #[arg(short, long = "interval-ms", value_parser = config::parse_interval_ms)]
    interval: Option<Duration>,

    /// Stop after this many rounds when polling
    #[arg(short = 'n', long)]
    count: Option<u64>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    /// Merge flags over the environment configuration.
    fn into_config(self) -> Result<AdcConfig> {
        let mut config = AdcConfig::from_env().context("Invalid environment configuration")?;

        if let Some(device) = self.device {
            config.device = device;
        }
        if let Some(address) = self.address {
            config.address = address;
        }
        if !self.channels.is_empty() {
            config.channels = self.channels;
        }
        if let Some(interval) = self.interval {
            config.interval = Some(interval);
        }
        Ok(config)
    }
}

type Reader = Ads1115<I2cDev>;
type Round = Vec<(AdcChannel, Result<f64, HwError>)>;

/// One sample per channel; a failed channel does not stop the others.
fn sample_round(adc: &mut Reader, channels: &[AdcChannel]) -> Round {
    channels
        .iter()
        .map(|&channel| (channel, adc.voltage(channel)))
        .collect()
}

fn print_round(round: &Round, use_color: bool) {
    for (channel, result) in round {
        let label = channel.to_string();
        let label = if use_color { label.cyan().to_string() } else { label };
        match result {
            Ok(volts) => println!("{}: {:.4} V", label, volts),
            Err(e) => {
                let msg = format!("error: {}", e);
                let msg = if use_color { msg.red().to_string() } else { msg };
                println!("{}: {}", label, msg);
            }
        }
    }
}

/// Run `work` on the blocking pool, handing `state` back with its result.
///
/// The settle wait sleeps the thread it runs on, so it must stay off the
/// runtime's worker threads.
async fn run_blocking<T, R, F>(mut state: T, work: F) -> Result<(T, R)>
where
    T: Send + 'static,
    R: Send + 'static,
    F: FnOnce(&mut T) -> R + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let result = work(&mut state);
        (state, result)
    })
    .await
    .context("Sampling task failed")
}

/// Run `round` on every tick until `count` rounds are done or SIGINT
/// arrives, then return the state.
///
/// `sigint` stays registered across rounds, so an interrupt raised while a
/// round is blocking is still pending when it finishes and ends the loop
/// before the next tick.
async fn poll<T, R, F>(
    mut state: T,
    interval: Duration,
    count: Option<u64>,
    sigint: &mut Signal,
    round: F,
    mut report: impl FnMut(&R),
) -> Result<T>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(&mut T) -> R + Clone + Send + 'static,
{
    let mut ticker = tokio::time::interval(interval);
    let mut rounds = 0u64;

    loop {
        tokio::select! {
            biased;
            _ = sigint.recv() => {
                info!("Interrupted, stopping");
                break;
            }
            _ = ticker.tick() => {}
        }

        let (returned, result) = run_blocking(state, round.clone()).await?;
        state = returned;
        report(&result);

        rounds += 1;
        if count.is_some_and(|n| rounds >= n) {
            break;
        }
    }

    Ok(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    i2c_adc::tracing::init_with_verbosity(args.debug);

    let use_color = !args.no_color && std::io::stdout().is_terminal();
    let count = args.count;
    let config = args.into_config()?;
    debug!(?config, "Resolved configuration");

    let mut bus = I2cDev::new(config.device.clone());
    bus.open()
        .with_context(|| format!("Failed to open I2C bus {}", config.device))?;
    let adc = Ads1115::new_with_address(bus, config.address);
    let channels = config.channels.clone();

    let Some(interval) = config.interval else {
        let (adc, round) = run_blocking(adc, move |adc| sample_round(adc, &channels)).await?;
        print_round(&round, use_color);
        adc.release().close().context("Failed to close I2C bus")?;
        return Ok(());
    };

    let mut sigint =
        unix::signal(SignalKind::interrupt()).context("Failed to install SIGINT handler")?;

    info!(
        device = %config.device,
        address = %format!("{:#04x}", config.address),
        interval_ms = interval.as_millis() as u64,
        "Polling ADS1115"
    );

    let adc = poll(
        adc,
        interval,
        count,
        &mut sigint,
        move |adc: &mut Reader| sample_round(adc, &channels),
        |round: &Round| {
            print_round(round, use_color);
            if round.iter().all(|(_, r)| r.is_err()) {
                warn!("No channel could be read this round");
            }
        },
    )
    .await?;

    adc.release().close().context("Failed to close I2C bus")?;
    Ok(())
}
