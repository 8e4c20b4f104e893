use turtle_bt::{LogObserver, Outcome, RunReport, TickObserver, TickSnapshot};

/// Prints the tree to stdout as it runs; logging is delegated to [`LogObserver`].
pub struct ConsoleObserver {
    quiet: bool,
    log: LogObserver,
}

impl ConsoleObserver {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            log: LogObserver::default(),
        }
    }
}

impl TickObserver for ConsoleObserver {
    fn on_start(&mut self, rendered: &str) {
        println!("Initial tree structure:");
        print!("{rendered}");
    }

    fn on_tick(&mut self, snapshot: &TickSnapshot) {
        self.log.on_tick(snapshot);
        if self.quiet {
            return;
        }
        println!("--- Tick {} ---", snapshot.tick);
        print!("{}", snapshot.rendered);
        if !snapshot.running().is_empty() {
            println!("running: {}", snapshot.running().join(" -> "));
        }
    }

    fn on_finish(&mut self, report: &RunReport, rendered: &str) {
        self.log.on_finish(report, rendered);
        println!();
        println!("Final tree state:");
        print!("{rendered}");
        let summary = match report.outcome {
            Outcome::Success => "completed successfully",
            Outcome::Failure => "failed",
            Outcome::Timeout => "timed out before completing",
            Outcome::Interrupted => "was interrupted",
        };
        println!(
            "Behavior tree {summary} after {} ticks ({:.1}s)",
            report.ticks,
            report.elapsed.as_secs_f64()
        );
    }
}
