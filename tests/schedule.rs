//! End-to-end scheduling behaviour on the host.
//!
//! `SimTimer` stands in for SysTick and WFI: every sleep is one base
//! interval, after which the timer fires.

use std::cell::{Cell, RefCell};

use rios::blink::{Sequence, Toggle};
use rios::config::{ConfigError, BASE_INTERVAL_MS, SEQUENCE_PERIOD_MS, TOGGLE_PERIOD_MS};
use rios::diag::DiagnosticSink;
use rios::scheduler::Scheduler;
use rios::task::Task;
use rios::tick::{Fire, Idle, TickFlag, TickSource};

#[derive(Default)]
struct SimTimer {
    interval: Option<u32>,
    interrupts_on: bool,
    fired: u32,
}

impl TickSource for SimTimer {
    fn configure(&mut self, base_interval_ms: u32) -> Result<(), ConfigError> {
        self.interval = Some(base_interval_ms);
        Ok(())
    }

    fn enable_interrupts(&mut self) {
        self.interrupts_on = true;
    }
}

impl Idle for SimTimer {
    fn sleep(&mut self, tick: &TickFlag) {
        assert!(self.interrupts_on, "slept with interrupts disabled");
        self.fired += 1;
        tick.on_fire(&());
    }
}

/// Wakes on every sleep but only fires the tick on every `every`-th one,
/// as if other interrupts woke the core in between.
struct NoisyWakeups {
    every: u32,
    wakes: u32,
}

impl Idle for NoisyWakeups {
    fn sleep(&mut self, tick: &TickFlag) {
        self.wakes += 1;
        if self.wakes % self.every == 0 {
            tick.on_fire(&());
        }
    }
}

#[derive(Default)]
struct CountingSink {
    overruns: Cell<u32>,
}

impl DiagnosticSink for CountingSink {
    fn overrun(&self, _tick: u32, _total: u32) {
        self.overruns.set(self.overruns.get() + 1);
    }
}

/// Run `passes` cycles and return the (pass, slot) dispatch log.
fn run_log(periods: &[u32], base: u32, passes: u32) -> Vec<(u32, usize)> {
    let log = RefCell::new(Vec::new());
    let pass = Cell::new(0u32);

    let mut bodies: Vec<_> = (0..periods.len())
        .map(|slot| {
            let log = &log;
            let pass = &pass;
            move || log.borrow_mut().push((pass.get(), slot))
        })
        .collect();

    {
        let mut iter = periods.iter().zip(bodies.iter_mut());
        let tasks: [Task<'_>; 3] = core::array::from_fn(|_| {
            let (period, body) = iter.next().expect("three periods");
            Task::new(*period, body)
        });
        let mut scheduler = Scheduler::new(base, tasks).unwrap();

        let tick = TickFlag::new();
        let mut timer = SimTimer::default();
        scheduler.start(&tick, &mut timer).unwrap();

        for p in 0..passes {
            pass.set(p);
            scheduler.cycle(&tick, &mut timer);
        }
        assert_eq!(tick.overruns(), 0);
    }

    log.take()
}

#[test]
fn two_task_scenario_over_ten_ticks() {
    let a_runs = RefCell::new(Vec::new());
    let b_runs = RefCell::new(Vec::new());
    let pass = Cell::new(0u32);
    let mut a = || a_runs.borrow_mut().push(pass.get());
    let mut b = || b_runs.borrow_mut().push(pass.get());

    let mut scheduler =
        Scheduler::new(200, [Task::new(200, &mut a), Task::new(1000, &mut b)]).unwrap();
    let tick = TickFlag::new();
    let mut timer = SimTimer::default();
    scheduler.start(&tick, &mut timer).unwrap();
    assert_eq!(timer.interval, Some(200));

    for p in 0..10 {
        pass.set(p);
        scheduler.cycle(&tick, &mut timer);
    }

    assert_eq!(scheduler.tasks()[0].dispatches(), 10);
    assert_eq!(scheduler.tasks()[1].dispatches(), 2);
    assert_eq!(scheduler.passes(), 10);
    assert_eq!(timer.fired, 10);
    drop(scheduler);

    assert_eq!(*a_runs.borrow(), (0..10).collect::<Vec<_>>());
    assert_eq!(*b_runs.borrow(), vec![0, 5]);
}

/// Every task is forced due on pass 0, so over `n` passes a task with a
/// period of `k` base intervals runs on passes 0, k, 2k, ... : `ceil(n / k)`
/// times. This equals `floor(n * B / P)` whenever `n` is a multiple of `k`.
#[test]
fn dispatch_count_matches_period_multiple() {
    for k in 1..=6u32 {
        for n in 1..=20u32 {
            let mut body = || {};
            let mut scheduler = Scheduler::new(50, [Task::new(50 * k, &mut body)]).unwrap();
            for _ in 0..n {
                scheduler.dispatch_pass();
            }
            // Due on pass 0, then every k-th pass.
            assert_eq!(
                scheduler.tasks()[0].dispatches(),
                (n + k - 1) / k,
                "period {}x base over {} passes",
                k,
                n
            );
        }
    }
}

#[test]
fn simultaneous_tasks_run_in_table_order() {
    let first = run_log(&[400, 400, 400], 200, 6);
    let second = run_log(&[400, 400, 400], 200, 6);

    assert_eq!(
        first,
        vec![
            (0, 0),
            (0, 1),
            (0, 2),
            (2, 0),
            (2, 1),
            (2, 2),
            (4, 0),
            (4, 1),
            (4, 2),
        ]
    );
    assert_eq!(first, second);
}

#[test]
fn gap_between_dispatches_is_exactly_the_period() {
    let log = run_log(&[200, 600, 1000], 200, 40);

    for (slot, k) in [(0usize, 1u32), (1, 3), (2, 5)] {
        let passes: Vec<u32> = log.iter().filter(|(_, s)| *s == slot).map(|(p, _)| *p).collect();
        assert_eq!(passes[0], 0);
        for pair in passes.windows(2) {
            assert_eq!(pair[1] - pair[0], k, "slot {}", slot);
        }
    }
}

#[test]
fn foreign_wakeups_do_not_advance_time() {
    let runs = Cell::new(0u32);
    let mut body = || runs.set(runs.get() + 1);
    let mut scheduler = Scheduler::new(200, [Task::new(400, &mut body)]).unwrap();
    let tick = TickFlag::new();
    let mut idle = NoisyWakeups { every: 3, wakes: 0 };

    for _ in 0..4 {
        scheduler.cycle(&tick, &mut idle);
    }

    // Two of every three wakes find no tick and go back to sleep.
    assert_eq!(idle.wakes, 12);
    assert_eq!(tick.fired(), 4);
    assert_eq!(scheduler.passes(), 4);
    assert_eq!(scheduler.tasks()[0].dispatches(), 2);
    assert_eq!(tick.overruns(), 0);
    drop(scheduler);
    assert_eq!(runs.get(), 2);
}

#[test]
fn elapsed_is_one_base_interval_after_dispatch() {
    let mut body = || {};
    let mut scheduler = Scheduler::new(200, [Task::new(600, &mut body)]).unwrap();

    scheduler.dispatch_pass();
    assert_eq!(scheduler.tasks()[0].dispatches(), 1);
    assert_eq!(scheduler.tasks()[0].elapsed(), 200);
}

#[test]
fn slow_pass_reports_one_overrun() {
    let tick = TickFlag::new();
    let sink = CountingSink::default();
    let slow = Cell::new(false);
    let outcomes = RefCell::new(Vec::new());

    // When `slow` is set, the timer fires while the task is still running.
    let mut body = || {
        if slow.get() {
            outcomes.borrow_mut().push(tick.on_fire(&sink));
            assert!(tick.is_pending());
        }
    };
    let mut scheduler = Scheduler::new(200, [Task::new(200, &mut body)]).unwrap();
    let mut timer = SimTimer::default();
    scheduler.start(&tick, &mut timer).unwrap();

    scheduler.cycle(&tick, &mut timer);
    assert!(tick.is_pending());

    slow.set(true);
    scheduler.cycle(&tick, &mut timer);
    slow.set(false);

    assert_eq!(sink.overruns.get(), 1);
    assert_eq!(tick.overruns(), 1);
    assert_eq!(*outcomes.borrow(), vec![Fire::Overrun]);

    // The schedule carries on: the next pass runs normally.
    assert_eq!(scheduler.cycle(&tick, &mut timer), 1);
    assert_eq!(sink.overruns.get(), 1);
    assert_eq!(scheduler.tasks()[0].dispatches(), 3);
}

#[test]
fn tick_during_first_pass_is_not_an_overrun() {
    let tick = TickFlag::new();
    let sink = CountingSink::default();
    let mut body = || {
        tick.on_fire(&sink);
    };
    let mut scheduler = Scheduler::new(200, [Task::new(200, &mut body)]).unwrap();
    let mut timer = SimTimer::default();
    scheduler.start(&tick, &mut timer).unwrap();

    scheduler.dispatch_pass();
    assert_eq!(sink.overruns.get(), 0);
    assert!(tick.is_pending());
}

#[test]
fn firmware_table_drives_leds() {
    let mut sequence = Sequence::new();
    let mut toggle = Toggle::new();
    {
        let mut scheduler = Scheduler::new(
            BASE_INTERVAL_MS,
            [
                Task::new(SEQUENCE_PERIOD_MS, &mut sequence),
                Task::new(TOGGLE_PERIOD_MS, &mut toggle),
            ],
        )
        .unwrap();
        let tick = TickFlag::new();
        let mut timer = SimTimer::default();
        scheduler.start(&tick, &mut timer).unwrap();
        for _ in 0..11 {
            scheduler.cycle(&tick, &mut timer);
        }
    }

    // 11 sequence steps: initialise, then 10 rotations (10 % 3 == 1).
    assert_eq!(sequence.outputs(), [false, true, false]);
    // Toggle ran on passes 0, 5 and 10: initialise low, then two flips.
    assert!(!toggle.level());
}
