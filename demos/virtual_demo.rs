use gearbridge::backends::virtual_input::VirtualOpener;
use gearbridge::{ActionHandle, ActionHost, ActionKind, Bridge, BridgeConfig, DeviceConfig};

/// Knows three cockpit commands and prints every call.
struct PrintHost;

const COMMANDS: [&str; 3] = [
    "sim/flight_controls/flaps_up",
    "sim/flight_controls/flaps_down",
    "sim/flight_controls/landing_gear_toggle",
];

impl ActionHost for PrintHost {
    fn resolve(&mut self, name: &str) -> Option<ActionHandle> {
        COMMANDS
            .iter()
            .position(|c| *c == name)
            .map(|i| ActionHandle::from_raw(i as u64))
    }

    fn invoke(&mut self, kind: ActionKind, handle: ActionHandle) {
        let name = COMMANDS[handle.into_raw() as usize];
        println!("(Virtual) {kind:>5} {name}");
    }
}

fn main() {
    // Register a virtual device node instead of real hardware
    let mut opener = VirtualOpener::new();
    let panel = opener.add("virtual:panel");

    let config = BridgeConfig::new([DeviceConfig::new("virtual:panel")
        .map("FLAP_UP", COMMANDS[0])
        .map("FLAP_DN", COMMANDS[1])
        .map("GEAR", COMMANDS[2])]);

    let mut host = PrintHost;
    let mut bridge = match Bridge::start_with(&config, &mut opener, &mut host) {
        Ok(bridge) => bridge,
        Err(e) => {
            eprintln!("Failed to start: {e}");
            return;
        }
    };

    // Inject what the panel would send: a press, a release, a one-shot,
    // a heartbeat and some boot chatter
    panel.feed_line("FLAP_UP=1");
    panel.feed_line("FLAP_UP=0");
    panel.feed_line("GEAR");
    panel.feed_line("");
    panel.feed_line("# panel v2 ready");

    // One tick drains everything that is queued
    let report = bridge.poll(&mut host);
    println!(
        "(Virtual) {} line(s) read, {} dispatched, {} skipped",
        report.lines_read, report.dispatched, report.skipped
    );

    bridge.stop();
}
