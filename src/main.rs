use anyhow::Context;
use clap::Parser;
use gearbridge::logger::LoggingHost;
use gearbridge::{ActionHandle, ActionHost, ActionKind, Bridge, BridgeConfig};
use log::{info, warn};
use std::collections::HashMap;
use std::path::PathBuf;

/// gearbridge - drive simulator commands from serial cockpit hardware
#[derive(Parser, Debug)]
#[command(name = "gearbridge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Device configuration (.toml or .json)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: PathBuf,

    /// Debug verbosity level (0=warn, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "1")]
    debug: u8,

    /// Stop after this many ticks (runs until killed otherwise)
    #[arg(short = 'n', long = "ticks", value_name = "N")]
    ticks: Option<u64>,

    /// Open the devices, print the resolved mappings and exit
    #[arg(long = "check")]
    check: bool,
}

/// Stand-in simulator: every slash-separated name is a command.
#[derive(Default)]
struct ConsoleHost {
    handles: HashMap<String, ActionHandle>,
}

impl ActionHost for ConsoleHost {
    fn resolve(&mut self, name: &str) -> Option<ActionHandle> {
        if !name.contains('/') || name.starts_with('/') || name.ends_with('/') {
            return None;
        }
        let next = ActionHandle::from_raw(self.handles.len() as u64 + 1);
        Some(*self.handles.entry(name.to_string()).or_insert(next))
    }

    fn invoke(&mut self, kind: ActionKind, handle: ActionHandle) {
        println!("{kind:>5} {handle}");
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = BridgeConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    let mut host = LoggingHost::new(ConsoleHost::default());
    let mut bridge = Bridge::start(&config, &mut host).context("starting bridge")?;

    if bridge.open_count() == 0 {
        warn!("None of the {} configured device(s) could be opened", bridge.device_count());
    }

    if cli.check {
        for device in bridge.devices().devices() {
            println!("{device}");
            let mut inputs: Vec<_> = device.mapping().iter().collect();
            inputs.sort();
            for (input, handle) in inputs {
                println!("  {input} -> {}", host.name_of(handle).unwrap_or("?"));
            }
        }
        bridge.stop();
        return Ok(());
    }

    info!("Polling every {:?}", bridge.interval());
    let mut ticks = 0u64;
    while cli.ticks.map_or(true, |limit| ticks < limit) {
        let next = bridge.tick(&mut host);
        ticks += 1;
        std::thread::sleep(next);
    }

    bridge.stop();
    Ok(())
}
