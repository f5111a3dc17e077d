//! Demonstrates a two-stage pipeline that runs for a short while and then shuts down via an
//! external `terminate()` call.

use std::time::Duration;

use pipeline::{Bundle, CanonicalMessage, Pipeline, Stage, TypeKeyedAccessor};

#[derive(Debug, Clone)]
struct Tick {
    n: u64,
}

impl CanonicalMessage for Tick {
    const MESSAGE_TYPE: &'static str = "demo::Tick";
}

struct Producer {
    next: u64,
}

impl Stage for Producer {
    fn process_data(&mut self, bundle: &mut Bundle) {
        self.next += 1;
        TypeKeyedAccessor::<Tick>::new().attach(bundle, Tick { n: self.next });
    }
}

struct Printer;

impl Stage for Printer {
    fn process_data(&mut self, bundle: &mut Bundle) {
        if let Ok(Some(tick)) = TypeKeyedAccessor::<Tick>::new().read(bundle) {
            println!("tick {}", tick.n);
        }
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let mut producer = Producer { next: 0 };
    let mut printer = Printer;

    let mut pipeline = Pipeline::new();
    pipeline.connect(&mut producer).connect(&mut printer);

    let handle = pipeline.terminate_handle();
    std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(200));
        handle.terminate();
    });

    pipeline.run(true);
    println!("pipeline shut down cleanly");
}
