//! Startup diagnostics go through the `log` facade, one line per problem.

use gearbridge::backends::virtual_input::VirtualOpener;
use gearbridge::{ActionHandle, ActionHost, ActionKind, Bridge, BridgeConfig, ConfigureStep};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::{Mutex, Once};

struct Capture;

static LINES: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());
static INIT: Once = Once::new();

impl Log for Capture {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        LINES
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

fn captured(needle: &str) -> Vec<(Level, String)> {
    LINES
        .lock()
        .unwrap()
        .iter()
        .filter(|(_, line)| line.contains(needle))
        .cloned()
        .collect()
}

fn install() {
    INIT.call_once(|| {
        log::set_logger(&Capture).unwrap();
        log::set_max_level(LevelFilter::Trace);
    });
}

struct OnlyFlaps;

impl ActionHost for OnlyFlaps {
    fn resolve(&mut self, name: &str) -> Option<ActionHandle> {
        (name == "sim/flaps").then(|| ActionHandle::from_raw(1))
    }

    fn invoke(&mut self, _kind: ActionKind, _handle: ActionHandle) {}
}

#[test]
fn test_startup_diagnostics() {
    install();

    let config = BridgeConfig::from_str_toml(
        r#"
        [[devices]]
        device = "/dev/diag-missing"

        [[devices]]
        device = "/dev/diag-badbaud"

        [[devices]]
        device = "/dev/diag-ok"
        [devices.mapping]
        FLAPS = "sim/flaps"
        WARP = "sim/diag-warp-drive"
        COUNT = 12

        [[devices]]
        device = 7
        "#,
    )
    .unwrap();

    let mut opener = VirtualOpener::new();
    opener.add("/dev/diag-ok");
    opener.add("/dev/diag-badbaud");
    opener.fail_at("/dev/diag-badbaud", ConfigureStep::BaudRate);

    let mut bridge = Bridge::start_with(&config, &mut opener, &mut OnlyFlaps).unwrap();
    assert_eq!(bridge.open_count(), 1);

    let missing = captured("/dev/diag-missing");
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].0, Level::Warn);
    assert!(missing[0].1.starts_with("Device 1:"));
    assert!(missing[0].1.contains("unable to open"));

    let baud = captured("/dev/diag-badbaud");
    assert_eq!(baud.len(), 1);
    assert!(baud[0].1.starts_with("Device 2:"));
    assert!(baud[0].1.contains("set baud rate"));

    let warp = captured("sim/diag-warp-drive");
    assert_eq!(warp.len(), 1);
    assert_eq!(warp[0].1, "Device 3: Unknown command: sim/diag-warp-drive");

    let slot = captured("Device 4:");
    assert_eq!(slot.len(), 1);
    assert!(slot[0].1.contains("read device path"));

    // the non-string mapping entry is skipped without a word
    assert!(captured("COUNT").is_empty());

    bridge.stop();
    assert_eq!(captured("Bridge stopped").len(), 1);
}
