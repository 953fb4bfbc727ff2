//! Control cycle driver: ingest → control law → aggregate → publish.
//!
//! One `tick` per fixed-rate invocation, strictly sequential, no
//! blocking I/O. The fixed-rate loop itself lives here too: with the
//! `rt` feature it runs the RT setup sequence (mlockall, stack
//! prefault, core affinity, SCHED_FIFO) and paces on
//! `clock_nanosleep(TIMER_ABSTIME)`; without it, a `std::thread::sleep`
//! simulation loop approximates the rate.
//!
//! Safety-stage triggers are corrected in place and logged; they never
//! abort a cycle. Overruns are counted and logged, never fatal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::{info, warn};

use torc_common::config::TranslatorConfig;
use torc_common::joints::JointKind;

use crate::aggregate::SnapshotSet;
use crate::bus::{CommandSource, SnapshotSink};
use crate::directory::JointDirectory;
use crate::error::TranslatorError;
use crate::hardware::JointBank;
use crate::ingest::CommandTable;
use crate::law::{self, ClampFlags};
use crate::state::{Lifecycle, LifecycleEvent, LifecycleMachine, TransitionResult};

// ─── Cycle Statistics ───────────────────────────────────────────────

/// O(1) per-cycle timing statistics, updated without allocation.
#[derive(Debug, Clone)]
pub struct CycleStats {
    /// Total cycles executed.
    pub cycle_count: u64,
    /// Last cycle duration [ns].
    pub last_cycle_ns: i64,
    /// Minimum cycle duration [ns].
    pub min_cycle_ns: i64,
    /// Maximum cycle duration [ns].
    pub max_cycle_ns: i64,
    /// Running sum for average computation.
    pub sum_cycle_ns: i64,
    /// Number of budget overruns detected by the loop.
    pub overruns: u64,
}

impl CycleStats {
    /// Zeroed stats.
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            last_cycle_ns: 0,
            min_cycle_ns: i64::MAX,
            max_cycle_ns: 0,
            sum_cycle_ns: 0,
            overruns: 0,
        }
    }

    /// Record one cycle duration. O(1), no allocation.
    #[inline]
    pub fn record(&mut self, duration_ns: i64) {
        self.cycle_count += 1;
        self.last_cycle_ns = duration_ns;
        if duration_ns < self.min_cycle_ns {
            self.min_cycle_ns = duration_ns;
        }
        if duration_ns > self.max_cycle_ns {
            self.max_cycle_ns = duration_ns;
        }
        self.sum_cycle_ns += duration_ns;
    }

    /// Average cycle time [ns] (0 before the first cycle).
    #[inline]
    pub fn avg_cycle_ns(&self) -> i64 {
        if self.cycle_count == 0 {
            0
        } else {
            self.sum_cycle_ns / self.cycle_count as i64
        }
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

// ─── RT Setup ───────────────────────────────────────────────────────

/// Lock all current and future memory pages.
///
/// No-op when the `rt` feature is not enabled.
#[cfg(feature = "rt")]
fn rt_mlockall() -> Result<(), TranslatorError> {
    use nix::sys::mman::{MlockallFlags, mlockall};
    mlockall(MlockallFlags::MCL_CURRENT | MlockallFlags::MCL_FUTURE)
        .map_err(|e| TranslatorError::RtSetup(format!("mlockall failed: {e}")))?;
    Ok(())
}

#[cfg(not(feature = "rt"))]
fn rt_mlockall() -> Result<(), TranslatorError> {
    Ok(()) // No-op in simulation mode
}

/// Prefault stack pages so the loop never page-faults.
fn prefault_stack() {
    let mut buf = [0u8; 1024 * 1024];
    // Volatile writes so the allocation is not optimized away.
    for byte in buf.iter_mut() {
        unsafe { core::ptr::write_volatile(byte, 0xFF) };
    }
    core::hint::black_box(&buf);
}

/// Pin the current thread to a specific CPU core.
///
/// No-op when the `rt` feature is not enabled.
#[cfg(feature = "rt")]
fn rt_set_affinity(cpu: usize) -> Result<(), TranslatorError> {
    use nix::sched::{CpuSet, sched_setaffinity};
    use nix::unistd::Pid;

    let mut cpuset = CpuSet::new();
    cpuset
        .set(cpu)
        .map_err(|e| TranslatorError::RtSetup(format!("CpuSet::set({cpu}) failed: {e}")))?;
    sched_setaffinity(Pid::from_raw(0), &cpuset)
        .map_err(|e| TranslatorError::RtSetup(format!("sched_setaffinity failed: {e}")))?;
    Ok(())
}

#[cfg(not(feature = "rt"))]
fn rt_set_affinity(_cpu: usize) -> Result<(), TranslatorError> {
    Ok(()) // No-op in simulation mode
}

/// Set SCHED_FIFO with the given RT priority.
///
/// No-op when the `rt` feature is not enabled.
#[cfg(feature = "rt")]
fn rt_set_scheduler(priority: i32) -> Result<(), TranslatorError> {
    let param = libc::sched_param {
        sched_priority: priority,
    };
    let ret = unsafe { libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) };
    if ret != 0 {
        let err = std::io::Error::last_os_error();
        return Err(TranslatorError::RtSetup(format!(
            "sched_setscheduler(SCHED_FIFO, {priority}) failed: {err}"
        )));
    }
    Ok(())
}

#[cfg(not(feature = "rt"))]
fn rt_set_scheduler(_priority: i32) -> Result<(), TranslatorError> {
    Ok(()) // No-op in simulation mode
}

/// Full RT setup sequence; call before entering the loop.
///
/// In simulation mode (no `rt` feature) every RT call is a no-op.
pub fn rt_setup(cpu_core: usize, rt_priority: i32) -> Result<(), TranslatorError> {
    rt_mlockall()?;
    prefault_stack();
    rt_set_affinity(cpu_core)?;
    rt_set_scheduler(rt_priority)?;
    Ok(())
}

// ─── Translator ─────────────────────────────────────────────────────

/// The per-cycle translation and safety-clamping unit.
///
/// Owns the joint directory, command table, hardware bank, and the bus
/// endpoints. Lifecycle: `new` (Constructed) → [`Translator::initialize`]
/// (claims joints, freezes the directory) → [`Translator::start`] →
/// [`Translator::tick`] per fixed-rate invocation → [`Translator::stop`].
pub struct Translator<B: JointBank> {
    config: TranslatorConfig,
    lifecycle: LifecycleMachine,
    directory: JointDirectory,
    table: CommandTable,
    bank: B,
    source: Box<dyn CommandSource>,
    sink: Box<dyn SnapshotSink>,
    last_utime: Option<i64>,
    stats: CycleStats,
}

impl<B: JointBank> Translator<B> {
    /// Construct with an unclaimed bank and connected bus endpoints.
    pub fn new(
        config: TranslatorConfig,
        bank: B,
        source: Box<dyn CommandSource>,
        sink: Box<dyn SnapshotSink>,
    ) -> Self {
        Self {
            config,
            lifecycle: LifecycleMachine::new(),
            directory: JointDirectory::default(),
            table: CommandTable::default(),
            bank,
            source,
            sink,
            last_utime: None,
            stats: CycleStats::new(),
        }
    }

    /// Claim joints, freeze the directory, and populate the command
    /// table. Valid only in the Constructed state.
    pub fn initialize(&mut self) -> Result<(), TranslatorError> {
        self.guard(Lifecycle::Constructed, "initialize")?;
        self.directory = JointDirectory::build(&mut self.bank, &self.config)?;
        self.table = CommandTable::for_directory(&self.directory);
        self.transition(LifecycleEvent::Initialize, "initialize")?;
        if !self.config.apply_commands {
            info!("apply_commands disabled: running dry, no hardware writes");
        }
        Ok(())
    }

    /// Begin accepting ticks. Valid only in the Initialized state.
    pub fn start(&mut self) -> Result<(), TranslatorError> {
        self.transition(LifecycleEvent::Start, "start")?;
        info!(
            "translator running: {} joints at {}µs cycle time",
            self.directory.len(),
            self.config.cycle_time_us
        );
        Ok(())
    }

    /// Shut down. Valid only in the Running state; terminal.
    pub fn stop(&mut self) -> Result<(), TranslatorError> {
        self.transition(LifecycleEvent::Stop, "stop")?;
        info!(
            "translator stopped after {} cycles ({} overruns, avg {}ns)",
            self.stats.cycle_count,
            self.stats.overruns,
            self.stats.avg_cycle_ns()
        );
        Ok(())
    }

    /// One control cycle: drain ingest, run the law per joint, assemble
    /// and publish the snapshots. Valid only while Running.
    ///
    /// `now_us` is the cycle timestamp; `dt` is derived from the
    /// previous tick's timestamp (first tick: the configured cycle
    /// time). A tick always runs to completion even with no inbound
    /// commands.
    pub fn tick(&mut self, now_us: i64) -> Result<(), TranslatorError> {
        if !self.lifecycle.is_running() {
            return Err(TranslatorError::InvalidTransition {
                state: self.lifecycle.state(),
                op: "tick",
                reason: "not running",
            });
        }
        let started = Instant::now();

        // Drain everything that arrived since the previous tick; in-order
        // application gives last-write-wins per joint.
        for batch in self.source.poll() {
            self.table.apply_batch(&batch);
        }

        let dt = match self.last_utime {
            Some(prev) if now_us > prev => (now_us - prev) as f64 * 1e-6,
            _ => f64::from(self.config.cycle_time_us) * 1e-6,
        };
        self.last_utime = Some(now_us);

        let mut snapshots = SnapshotSet::new(
            &self.config.robot_name,
            now_us,
            self.directory.len(),
            self.directory.effort_count(),
        );

        for joint in self.directory.ordered_joints() {
            let sample = self.bank.sample(&joint.name);
            let target = self.table.command_of(&joint.name);

            match joint.kind {
                JointKind::EffortControlled => {
                    let out = law::effort_command(&target, &sample, &joint.limits, dt);
                    log_fired_stages(&joint.name, out.flags);
                    if self.config.apply_commands {
                        self.bank.apply_effort(&joint.name, out.effort);
                    }
                    // Fresh reading after the (optional) write.
                    let post_write_effort = self.bank.sample(&joint.name).effort;
                    snapshots.push_effort_joint(
                        &joint.name,
                        &sample,
                        &target,
                        out.effort,
                        post_write_effort,
                    );
                }
                JointKind::PositionControlled => {
                    let out = law::position_command(&target, &joint.limits);
                    log_fired_stages(&joint.name, out.flags);
                    if self.config.apply_commands {
                        self.bank.apply_position(&joint.name, out.position);
                    }
                    snapshots.push_position_joint(&joint.name, &sample, &target);
                }
            }
        }

        if self.config.publish_core_robot_state {
            self.sink.publish_measured(&snapshots.measured);
        }
        self.sink.publish_command_echo(&snapshots.echo);
        self.sink.publish_torque(&snapshots.torque);
        if self.config.publish_est_robot_state {
            self.sink.publish_robot_state(&snapshots.robot_state);
        }

        self.stats.record(started.elapsed().as_nanos() as i64);
        Ok(())
    }

    /// Fixed-rate loop until `running` is cleared. Valid only while
    /// Running; ticks pace at the configured cycle time.
    pub fn run(&mut self, running: &AtomicBool) -> Result<(), TranslatorError> {
        if !self.lifecycle.is_running() {
            return Err(TranslatorError::InvalidTransition {
                state: self.lifecycle.state(),
                op: "run",
                reason: "not running",
            });
        }

        #[cfg(feature = "rt")]
        {
            self.run_rt_loop(running)
        }

        #[cfg(not(feature = "rt"))]
        {
            self.run_sim_loop(running)
        }
    }

    /// RT loop: absolute-time sleep on CLOCK_MONOTONIC, drift-free.
    #[cfg(feature = "rt")]
    fn run_rt_loop(&mut self, running: &AtomicBool) -> Result<(), TranslatorError> {
        use nix::time::{ClockId, ClockNanosleepFlags, clock_gettime, clock_nanosleep};

        let clock = ClockId::CLOCK_MONOTONIC;
        let cycle_time_ns = i64::from(self.config.cycle_time_us) * 1000;
        let mut next_wake = clock_gettime(clock)
            .map_err(|e| TranslatorError::RtSetup(format!("clock_gettime: {e}")))?;

        while running.load(Ordering::SeqCst) {
            next_wake = timespec_add_ns(next_wake, cycle_time_ns);

            let now = clock_gettime(clock)
                .map_err(|e| TranslatorError::RtSetup(format!("clock_gettime: {e}")))?;
            let now_us = now.tv_sec() * 1_000_000 + now.tv_nsec() / 1000;

            self.tick(now_us)?;

            if self.stats.last_cycle_ns > cycle_time_ns {
                self.stats.overruns += 1;
                warn!(
                    "cycle overrun: {}ns > {}ns budget",
                    self.stats.last_cycle_ns, cycle_time_ns
                );
            }

            let _ = clock_nanosleep(clock, ClockNanosleepFlags::TIMER_ABSTIME, &next_wake);
        }
        Ok(())
    }

    /// Simulation loop: relative sleeps, approximate pacing.
    #[cfg(not(feature = "rt"))]
    fn run_sim_loop(&mut self, running: &AtomicBool) -> Result<(), TranslatorError> {
        let cycle_duration = std::time::Duration::from_micros(u64::from(self.config.cycle_time_us));
        let epoch = Instant::now();

        while running.load(Ordering::SeqCst) {
            let cycle_start = Instant::now();
            let now_us = epoch.elapsed().as_micros() as i64;

            self.tick(now_us)?;

            let elapsed = cycle_start.elapsed();
            if let Some(remaining) = cycle_duration.checked_sub(elapsed) {
                std::thread::sleep(remaining);
            } else {
                self.stats.overruns += 1;
                warn!(
                    "cycle overrun: {}µs > {}µs budget",
                    elapsed.as_micros(),
                    self.config.cycle_time_us
                );
            }
        }
        Ok(())
    }

    fn guard(&self, expected: Lifecycle, op: &'static str) -> Result<(), TranslatorError> {
        if self.lifecycle.state() != expected {
            return Err(TranslatorError::InvalidTransition {
                state: self.lifecycle.state(),
                op,
                reason: "wrong lifecycle state",
            });
        }
        Ok(())
    }

    fn transition(&mut self, event: LifecycleEvent, op: &'static str) -> Result<(), TranslatorError> {
        match self.lifecycle.handle_event(event) {
            TransitionResult::Ok(_) => Ok(()),
            TransitionResult::Rejected(reason) => Err(TranslatorError::InvalidTransition {
                state: self.lifecycle.state(),
                op,
                reason,
            }),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> Lifecycle {
        self.lifecycle.state()
    }

    /// The frozen joint directory (empty before initialization).
    pub fn directory(&self) -> &JointDirectory {
        &self.directory
    }

    /// The command table holding the latest accepted targets.
    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    /// Cycle timing statistics.
    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// The hardware bank (tests inject samples through this).
    pub fn bank_mut(&mut self) -> &mut B {
        &mut self.bank
    }
}

/// Warn once per fired safety stage, naming the joint.
fn log_fired_stages(name: &str, flags: ClampFlags) {
    if flags.contains(ClampFlags::RAMP_ZEROED) {
        warn!("joint {name}: past position limit, effort zeroed");
    } else if flags.contains(ClampFlags::RAMP_SCALED) {
        warn!("joint {name}: inside limit taper zone, effort scaled");
    }
    if flags.contains(ClampFlags::RATE_LIMITED) {
        warn!("joint {name}: effort rate-limited toward measured value");
    }
    if flags.contains(ClampFlags::SANITY_ZEROED) {
        warn!("joint {name}: implausible effort command, forced to zero");
    }
    if flags.contains(ClampFlags::POSITION_CLAMPED) {
        warn!("joint {name}: position target outside limits, clamped");
    }
}

// ─── Time Helpers ───────────────────────────────────────────────────

/// Add nanoseconds to a TimeSpec.
#[cfg(feature = "rt")]
fn timespec_add_ns(ts: nix::sys::time::TimeSpec, ns: i64) -> nix::sys::time::TimeSpec {
    use nix::sys::time::TimeSpec;
    let mut secs = ts.tv_sec();
    let mut nanos = ts.tv_nsec() + ns;
    while nanos >= 1_000_000_000 {
        secs += 1;
        nanos -= 1_000_000_000;
    }
    while nanos < 0 {
        secs -= 1;
        nanos += 1_000_000_000;
    }
    TimeSpec::new(secs, nanos)
}

// ─── Tests ──────────────────────────────────────────────────────────
