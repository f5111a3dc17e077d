//! End-to-end pipeline scenarios.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use pipeline::{
    Bundle, CanonicalMessage, Interrupt, NameKeyedAccessor, Pipeline, Stage, TypeKeyedAccessor,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Num {
    value: i32,
}

impl CanonicalMessage for Num {
    const MESSAGE_TYPE: &'static str = "test::Num";
}

/// S1 - pass-through identity: one stage reads a canonical-keyed payload and re-attaches it
/// unchanged. Observes the payloads the head injects, in order, then shuts down.
#[test]
fn pass_through_preserves_payload_order() {
    struct PassThrough {
        seen: Arc<Mutex<Vec<i32>>>,
    }

    impl Stage for PassThrough {
        fn process_data(&mut self, bundle: &mut Bundle) {
            let accessor = TypeKeyedAccessor::<Num>::new();
            if let Ok(Some(num)) = accessor.read(bundle) {
                self.seen.lock().unwrap().push(num.value);
            }
        }
    }

    // The head only ever produces empty bundles; to exercise payload flow we drive the
    // injection from within a stage that stands in for the head's first few cycles by writing
    // into the bundle it is handed and then, once done, emitting a FINISHED interrupt.
    struct Source {
        next: i32,
        limit: i32,
    }

    impl Stage for Source {
        fn process_data(&mut self, bundle: &mut Bundle) {
            self.next += 1;
            TypeKeyedAccessor::<Num>::new().attach(bundle, Num { value: self.next });
            if self.next >= self.limit {
                TypeKeyedAccessor::<Interrupt>::new().attach(bundle, Interrupt::finished());
            }
        }
    }

    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut source = Source { next: 0, limit: 3 };
    let mut sink = PassThrough {
        seen: Arc::clone(&seen),
    };

    let mut pipeline = Pipeline::new();
    pipeline.connect(&mut source).connect(&mut sink);
    pipeline.run(true);

    // The bundle that carries the FINISHED interrupt still completes its cycle through every
    // downstream stage before shutdown takes effect, so one extra (shutdown-carrying) bundle may
    // follow; what must hold is that 1, 2, 3 arrived in that order as a prefix.
    let seen = seen.lock().unwrap();
    assert!(seen.starts_with(&[1, 2, 3]));
}

/// S2 - soft reset: a break-point interrupt causes every stage's reset hook to fire exactly once
/// before the next cycle, and the pipeline keeps running afterward.
#[test]
fn break_point_triggers_reset_on_every_stage_then_continues() {
    struct Countdown {
        resets: Arc<Mutex<usize>>,
        cycles_after_reset: Arc<Mutex<usize>>,
        cycle: usize,
        break_at: usize,
    }

    impl Stage for Countdown {
        fn process_data(&mut self, bundle: &mut Bundle) {
            self.cycle += 1;
            if self.cycle == self.break_at {
                TypeKeyedAccessor::<Interrupt>::new().attach(bundle, Interrupt::break_point());
            }
        }

        fn reset(&mut self) {
            *self.resets.lock().unwrap() += 1;
        }
    }

    struct Counter {
        cycles: Arc<Mutex<usize>>,
    }

    impl Stage for Counter {
        fn process_data(&mut self, _bundle: &mut Bundle) {
            *self.cycles.lock().unwrap() += 1;
        }
    }

    let resets_a = Arc::new(Mutex::new(0usize));
    let total_cycles = Arc::new(Mutex::new(0usize));

    let mut stage_a = Countdown {
        resets: Arc::clone(&resets_a),
        cycles_after_reset: Arc::new(Mutex::new(0)),
        cycle: 0,
        break_at: 5,
    };
    let mut stage_b = Counter {
        cycles: Arc::clone(&total_cycles),
    };

    let mut pipeline = Pipeline::new();
    pipeline.connect(&mut stage_a).connect(&mut stage_b);

    let handle = pipeline.terminate_handle();
    std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(60));
        handle.terminate();
    });

    pipeline.run(true);

    assert!(*resets_a.lock().unwrap() >= 1);
    assert!(*total_cycles.lock().unwrap() >= 5);
}

/// S3 - FINISHED interrupt shuts the whole pipeline down after a bounded number of bundles.
#[test]
fn finished_interrupt_shuts_down_after_fixed_count() {
    struct StopAfter {
        seen: Arc<Mutex<usize>>,
        stop_at: usize,
    }

    impl Stage for StopAfter {
        fn process_data(&mut self, bundle: &mut Bundle) {
            let mut seen = self.seen.lock().unwrap();
            *seen += 1;
            if *seen == self.stop_at {
                TypeKeyedAccessor::<Interrupt>::new().attach(bundle, Interrupt::finished());
            }
        }
    }

    let seen_a = Arc::new(Mutex::new(0usize));
    let seen_b = Arc::new(Mutex::new(0usize));

    let mut stage_a = StopAfter {
        seen: Arc::clone(&seen_a),
        stop_at: usize::MAX,
    };
    let mut stage_b = StopAfter {
        seen: Arc::clone(&seen_b),
        stop_at: 10,
    };

    let mut pipeline = Pipeline::new();
    pipeline.connect(&mut stage_a).connect(&mut stage_b);
    pipeline.run(true);

    // Stage B emits FINISHED on its 10th bundle; the shutdown that interrupt triggers doesn't
    // take effect until the bundle has made a full lap back through the head, so stage B
    // completes exactly one further (shutdown-carrying) cycle before exiting: 11 total.
    let seen = *seen_b.lock().unwrap();
    assert_eq!(seen, 11);
}

/// S4 - external terminate stops a pipeline with no interrupts in flight.
#[test]
fn external_terminate_stops_pipeline_without_interrupts() {
    struct Idle;
    impl Stage for Idle {
        fn process_data(&mut self, _bundle: &mut Bundle) {}
    }

    let mut a = Idle;
    let mut b = Idle;
    let mut pipeline = Pipeline::new();
    pipeline.connect(&mut a).connect(&mut b);

    let handle = pipeline.terminate_handle();
    std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(30));
        handle.terminate();
    });

    pipeline.run(true);
}

/// S5 - attach collision: a second attach of the same canonical message fails and the first
/// value is preserved.
#[test]
fn attach_collision_preserves_first_value() {
    let accessor = TypeKeyedAccessor::<Num>::new();
    let mut bundle = Bundle::new();

    assert!(accessor.attach(&mut bundle, Num { value: 1 }));
    assert!(!accessor.attach(&mut bundle, Num { value: 2 }));
    assert_eq!(accessor.read(&bundle).unwrap(), Some(Num { value: 1 }));
}

/// S6 - zero-stage pipeline: run returns immediately, terminate afterward is a no-op.
#[test]
fn zero_stage_pipeline_is_a_no_op() {
    let mut pipeline = Pipeline::<'static>::new();
    pipeline.run(true);
    pipeline.terminate();
}

/// Name-keyed accessors work the same way as type-keyed ones, just parameterized by a string.
#[test]
fn name_keyed_accessor_is_independent_of_type_keyed() {
    let mut bundle = Bundle::new();
    let by_name = NameKeyedAccessor::<i32>::new("custom-count");
    assert!(by_name.attach(&mut bundle, 42));
    assert_eq!(by_name.read(&bundle).unwrap(), Some(42));
}
