use numerica::tracker::ValleyTracker;

use tracing::{info, subscriber};
use tracing_subscriber::FmtSubscriber;

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::new();
    subscriber::set_global_default(subscriber)?;

    let mut landscape = Vec::new();
    for arg in std::env::args().skip(1) {
        landscape.push(arg.parse::<i64>()?);
    }
    if landscape.is_empty() {
        landscape = vec![5, 2, 6, 1, 8];
    }

    let mut tracker = ValleyTracker::new(&landscape)?;
    info!(?landscape, "charted landscape");

    while !tracker.is_empty() {
        let treasure = tracker.excavate()?;
        info!(treasure, remaining = tracker.len(), "excavated first valley");
    }
    info!(total = tracker.total_treasure(), "landscape fully excavated");

    Ok(())
}
