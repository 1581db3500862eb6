//! Per-tick controller
//!
//! Owns every subsystem and runs the fixed evaluation order once per poll
//! tick: input sampling, then timer and alarm evaluation, then state
//! dispatch, then actuator and display rendering. All wall-clock and
//! monotonic inputs are passed in, so the whole controller runs on the
//! host under test.

use core::fmt::Write as _;

use heapless::String;

use crate::alarm::{Alarm, AlarmRegistry, RegistryError};
use crate::alert::{AlertController, AlertRequest};
use crate::clock::ClockReading;
use crate::config::{DeviceConfig, HardwareStatus, DISPLAY_COLS, FIRMWARE_VERSION};
use crate::countdown::{CountdownTimer, TimerError};
use crate::input::{ButtonEvent, Debouncer, StopFlag};
use crate::persist::LoadedState;
use crate::state::{Event, FaultKind, State, ALARM_TIMEOUT_MS, MENU_TIMEOUT_MS};
use crate::status::Status;
use crate::traits::{AlertSink, DisplaySink};

/// What the caller must do after a poll tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollOutcome {
    Idle,
    /// Wipe persistent state and restart; nothing else should run
    FactoryReset,
}

/// Top-level application controller
pub struct Controller {
    state: State,
    state_entered_ms: u32,
    registry: AlarmRegistry,
    timer: CountdownTimer,
    alert: AlertController,
    debouncer: Debouncer,
    config: DeviceConfig,
    hw: HardwareStatus,
    active_alarm: Option<usize>,
    temperature_x10: Option<i16>,
    network_ok: bool,
}

impl Controller {
    pub fn new() -> Self {
        Self {
            state: State::Boot,
            state_entered_ms: 0,
            registry: AlarmRegistry::new(),
            timer: CountdownTimer::new(),
            alert: AlertController::new(),
            debouncer: Debouncer::new(),
            config: DeviceConfig::default(),
            hw: HardwareStatus::default(),
            active_alarm: None,
            temperature_x10: None,
            network_ok: false,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn registry(&self) -> &AlarmRegistry {
        &self.registry
    }

    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Restore persisted state before the first tick
    pub fn restore(&mut self, loaded: LoadedState) {
        self.config = loaded.config;
        self.registry.load(loaded.alarms);
        self.timer = loaded.timer;
    }

    /// Record hardware bring-up results and leave the boot state
    pub fn boot_complete(&mut self, hw: HardwareStatus, now_ms: u32) {
        self.hw = hw;
        // Without the clock nothing can be scheduled; a dead display is
        // reported but does not block operation
        let event = if hw.clock_ok {
            Event::BootComplete
        } else {
            Event::FaultDetected(FaultKind::Clock)
        };
        self.apply(event, now_ms);
    }

    /// Latch a runtime hardware fault
    pub fn fault(&mut self, kind: FaultKind, now_ms: u32) {
        self.apply(Event::FaultDetected(kind), now_ms);
    }

    pub fn update_temperature(&mut self, temperature_x10: Option<i16>) {
        self.temperature_x10 = temperature_x10;
    }

    pub fn set_network_ok(&mut self, network_ok: bool) {
        self.network_ok = network_ok;
    }

    pub fn add_alarm(&mut self, alarm: Alarm) -> Result<usize, RegistryError> {
        self.registry.add(alarm)
    }

    pub fn delete_alarm(&mut self, index: usize) -> Result<Alarm, RegistryError> {
        self.registry.remove(index)
    }

    /// Start a countdown; moves to the countdown state when idle
    pub fn start_timer(
        &mut self,
        duration_s: u32,
        label: &str,
        now_ms: u32,
    ) -> Result<(), TimerError> {
        self.timer.start(duration_s, label, now_ms)?;
        self.apply(Event::TimerStarted, now_ms);
        Ok(())
    }

    pub fn stop_timer(&mut self, now_ms: u32) {
        self.timer.stop();
        if self.state == State::Countdown {
            self.apply(Event::TimerIdle, now_ms);
        }
    }

    /// Stop whatever is sounding; outputs go low on the next render
    pub fn stop_alert(&mut self, now_ms: u32) {
        self.handle_stop(now_ms);
    }

    pub fn enter_menu(&mut self, now_ms: u32) {
        self.apply(Event::MenuEntered, now_ms);
    }

    /// Wipe in-memory state back to factory defaults
    pub fn reset_to_defaults(&mut self) {
        self.registry = AlarmRegistry::new();
        self.timer = CountdownTimer::new();
        self.config = DeviceConfig::default();
        self.active_alarm = None;
    }

    pub fn status(&self, now_ms: u32) -> Status {
        Status {
            state: self.state,
            alarm_count: self.registry.len(),
            timer_active: self.timer.is_active(),
            timer_remaining_s: self.timer.remaining_s(now_ms),
            sounding: self.alert.is_active(),
        }
    }

    /// Run one tick of the fixed evaluation order
    pub fn poll(
        &mut self,
        now: ClockReading,
        now_ms: u32,
        raw_button: bool,
        stop_flag: &StopFlag,
        outputs: &mut impl AlertSink,
        display: &mut impl DisplaySink,
    ) -> PollOutcome {
        // 1. Input sampling. The fast lane may have forced the outputs low
        // since the last tick; reconcile before acting on anything else.
        // The press that raised the flag is consumed so its release does
        // not get classified a second time.
        if stop_flag.take() {
            self.alert.note_outputs_forced_low();
            self.debouncer.consume_press();
            self.handle_stop(now_ms);
        }

        match self.debouncer.sample(raw_button, now_ms) {
            Some(ButtonEvent::FactoryReset) => return PollOutcome::FactoryReset,
            Some(ButtonEvent::ShortPress) => self.handle_short_press(now_ms),
            None => {}
        }

        // 2. Timer and alarm evaluation. The countdown state follows the
        // timer's active flag; the post-expiry alert rings from Normal.
        self.timer.tick(now_ms);
        if self.timer.alert_expired(now_ms) {
            self.timer.clear_alert();
        }
        if self.state == State::Countdown && !self.timer.is_active() {
            self.apply(Event::TimerIdle, now_ms);
        } else if self.state == State::Normal && self.timer.is_active() {
            self.apply(Event::TimerStarted, now_ms);
        }

        if self.state.alarms_checkable() {
            if let Some(index) = self.registry.check_due(&now) {
                self.active_alarm = Some(index);
                self.apply(Event::AlarmFired, now_ms);
            }
        }

        // 3. State dispatch (timeouts measured from state entry)
        let in_state_ms = now_ms.wrapping_sub(self.state_entered_ms);
        match self.state {
            State::Alarm if in_state_ms >= ALARM_TIMEOUT_MS => {
                self.active_alarm = None;
                self.apply(Event::AlarmTimeout, now_ms);
            }
            State::Menu if in_state_ms >= MENU_TIMEOUT_MS => {
                self.apply(Event::MenuTimeout, now_ms);
            }
            _ => {}
        }

        // 4. Actuator and display rendering
        let request = self.alert_request();
        self.alert.drive(&request, now_ms, outputs, display);
        if request == AlertRequest::Silent {
            self.render_page(&now, now_ms, display);
        }

        PollOutcome::Idle
    }

    fn apply(&mut self, event: Event, now_ms: u32) {
        let next = self.state.transition(event);
        if next != self.state {
            self.state = next;
            self.state_entered_ms = now_ms;
        }
    }

    fn handle_stop(&mut self, now_ms: u32) {
        match self.state {
            State::Alarm => {
                self.active_alarm = None;
                self.apply(Event::StopRequested, now_ms);
            }
            State::Countdown => {
                self.timer.stop();
                self.apply(Event::StopRequested, now_ms);
            }
            State::Normal if self.timer.alert_active() => self.timer.clear_alert(),
            State::Info | State::Menu => self.apply(Event::StopRequested, now_ms),
            _ => {}
        }
    }

    fn handle_short_press(&mut self, now_ms: u32) {
        match self.state {
            State::Normal => {
                if self.timer.alert_active() {
                    self.timer.clear_alert();
                } else {
                    self.apply(Event::InfoRequested, now_ms);
                }
            }
            State::Info => self.apply(Event::StopRequested, now_ms),
            State::Menu => {
                // Any press counts as menu activity
                self.state_entered_ms = now_ms;
            }
            State::Alarm => self.handle_stop(now_ms),
            // A press while merely counting down (no alert yet) is ignored;
            // cancelling needs an explicit stop request
            State::Countdown | State::Boot | State::Error(_) => {}
        }
    }

    fn alert_request(&self) -> AlertRequest {
        if self.state == State::Alarm {
            let label = self
                .active_alarm
                .and_then(|i| self.registry.get(i))
                .map(|a| a.label.clone())
                .unwrap_or_default();
            AlertRequest::Alarm { label }
        } else if self.timer.alert_active() {
            AlertRequest::TimerFinished {
                label: self.timer.label.clone(),
            }
        } else {
            AlertRequest::Silent
        }
    }

    fn render_page(&self, now: &ClockReading, now_ms: u32, display: &mut impl DisplaySink) {
        let mut line1: String<DISPLAY_COLS> = String::new();
        let mut line2: String<DISPLAY_COLS> = String::new();

        match self.state {
            State::Boot => {
                let _ = line1.push_str("Reveille");
                let _ = line2.push_str(FIRMWARE_VERSION);
            }
            State::Normal => {
                let _ = write!(line1, "{:02}:{:02}:{:02}", now.hour, now.minute, now.second);
                let _ = line2.push_str(if self.network_ok { "WIFI" } else { "DISC" });
                if !self.registry.is_empty() {
                    let _ = write!(line2, " A{}", self.registry.len());
                }
                if let Some(t) = self.temperature_x10 {
                    let _ = write!(line2, " {}{}.{}C", if t < 0 { "-" } else { "" },
                        (t / 10).unsigned_abs(), (t % 10).unsigned_abs());
                }
            }
            State::Countdown => {
                let remaining = self.timer.remaining_s(now_ms);
                let _ = write!(line1, "TIMER: {:02}:{:02}", remaining / 60, remaining % 60);
                let _ = line2.push_str(self.timer.label.as_str());
            }
            State::Info => {
                let name = self.config.device_name.as_str();
                let _ = line1.push_str(&name[..name.len().min(DISPLAY_COLS)]);
                let _ = line2.push_str(FIRMWARE_VERSION);
            }
            State::Menu => {
                let _ = line1.push_str("MENU");
                let _ = line2.push_str("press: stay");
            }
            State::Error(kind) => {
                let _ = line1.push_str("ERROR");
                let _ = line2.push_str(match kind {
                    FaultKind::Clock => "clock fault",
                    FaultKind::Display => "display fault",
                });
            }
            // Rendered by the alert controller
            State::Alarm => return,
        }

        display.render(line1.as_str(), line2.as_str());
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Weekday;
    use std::string::String as StdString;
    use std::vec::Vec;

    struct FakeOutputs {
        buzzer: bool,
        led: bool,
        calls: usize,
    }

    impl FakeOutputs {
        fn new() -> Self {
            Self {
                buzzer: false,
                led: false,
                calls: 0,
            }
        }
    }

    impl AlertSink for FakeOutputs {
        fn set_outputs(&mut self, buzzer: bool, led: bool) {
            self.buzzer = buzzer;
            self.led = led;
            self.calls += 1;
        }
    }

    struct FakeDisplay {
        line1: StdString,
        line2: StdString,
        frames: Vec<(StdString, StdString)>,
    }

    impl FakeDisplay {
        fn new() -> Self {
            Self {
                line1: StdString::new(),
                line2: StdString::new(),
                frames: Vec::new(),
            }
        }
    }

    impl DisplaySink for FakeDisplay {
        fn render(&mut self, line1: &str, line2: &str) {
            if self.line1 != line1 || self.line2 != line2 {
                self.line1 = line1.into();
                self.line2 = line2.into();
                self.frames.push((line1.into(), line2.into()));
            }
        }

        fn clear(&mut self) {
            self.line1.clear();
            self.line2.clear();
        }
    }

    struct Bench {
        ctrl: Controller,
        flag: StopFlag,
        outputs: FakeOutputs,
        display: FakeDisplay,
    }

    impl Bench {
        fn booted() -> Self {
            let mut ctrl = Controller::new();
            ctrl.boot_complete(
                HardwareStatus {
                    clock_ok: true,
                    display_ok: true,
                    network_ok: false,
                },
                0,
            );
            Self {
                ctrl,
                flag: StopFlag::new(),
                outputs: FakeOutputs::new(),
                display: FakeDisplay::new(),
            }
        }

        fn poll(&mut self, now: ClockReading, now_ms: u32) -> PollOutcome {
            self.ctrl
                .poll(now, now_ms, false, &self.flag, &mut self.outputs, &mut self.display)
        }

        /// Run the 100 ms loop from `from_ms` to `to_ms` at a fixed reading
        fn run(&mut self, now: ClockReading, from_ms: u32, to_ms: u32) {
            let mut t = from_ms;
            while t <= to_ms {
                self.poll(now, t);
                t += 100;
            }
        }
    }

    fn at(hour: u8, minute: u8, second: u8) -> ClockReading {
        ClockReading::new(hour, minute, second, Weekday::Monday)
    }

    #[test]
    fn test_boot_to_normal() {
        let mut bench = Bench::booted();
        assert_eq!(bench.ctrl.state(), State::Normal);
        bench.poll(at(12, 0, 0), 100);
        assert_eq!(bench.display.line1, "12:00:00");
        assert_eq!(bench.display.line2, "DISC");
    }

    #[test]
    fn test_clock_fault_blocks_boot() {
        let mut ctrl = Controller::new();
        ctrl.boot_complete(
            HardwareStatus {
                clock_ok: false,
                display_ok: true,
                network_ok: false,
            },
            0,
        );
        assert_eq!(ctrl.state(), State::Error(FaultKind::Clock));
    }

    #[test]
    fn test_alarm_fires_inside_window() {
        let mut bench = Bench::booted();
        bench.ctrl.add_alarm(Alarm::daily(7, 30, "wake")).unwrap();

        // 07:29:59 does not fire
        bench.poll(at(7, 29, 59), 1000);
        assert_eq!(bench.ctrl.state(), State::Normal);

        // 07:30:03 is inside the five-second window
        bench.poll(at(7, 30, 3), 2000);
        assert_eq!(bench.ctrl.state(), State::Alarm);
        assert!(bench.outputs.buzzer);
        assert_eq!(bench.display.line1, "*** ALARM ***");
        assert_eq!(bench.display.line2, "wake");
    }

    #[test]
    fn test_alarm_does_not_fire_at_second_five() {
        let mut bench = Bench::booted();
        bench.ctrl.add_alarm(Alarm::daily(7, 30, "wake")).unwrap();
        bench.poll(at(7, 30, 5), 1000);
        assert_eq!(bench.ctrl.state(), State::Normal);
    }

    #[test]
    fn test_alarm_respects_weekday_mask() {
        let mut bench = Bench::booted();
        let mut alarm = Alarm::daily(7, 30, "weekdays");
        alarm.days[Weekday::Monday.index()] = false;
        bench.ctrl.add_alarm(alarm).unwrap();

        bench.poll(at(7, 30, 0), 1000);
        assert_eq!(bench.ctrl.state(), State::Normal);
    }

    #[test]
    fn test_alarm_auto_stops_after_five_minutes() {
        let mut bench = Bench::booted();
        bench.ctrl.add_alarm(Alarm::daily(7, 30, "wake")).unwrap();
        bench.poll(at(7, 30, 0), 1000);
        assert_eq!(bench.ctrl.state(), State::Alarm);

        // One tick short of the timeout: still sounding
        bench.poll(at(7, 34, 59), 1000 + ALARM_TIMEOUT_MS - 100);
        assert_eq!(bench.ctrl.state(), State::Alarm);

        bench.poll(at(7, 35, 0), 1000 + ALARM_TIMEOUT_MS);
        assert_eq!(bench.ctrl.state(), State::Normal);
        assert!(!bench.outputs.buzzer);
        assert!(!bench.outputs.led);
    }

    #[test]
    fn test_interrupt_silence_then_reconcile() {
        let mut bench = Bench::booted();
        bench.ctrl.add_alarm(Alarm::daily(7, 30, "wake")).unwrap();
        bench.poll(at(7, 30, 0), 1000);
        assert!(bench.outputs.buzzer);

        // Interrupt context: outputs already forced low, flag raised
        bench.flag.request();

        // Next tick reconciles without re-driving the outputs high.
        // The reading is past the match window so the alarm cannot refire.
        bench.poll(at(7, 30, 6), 1100);
        assert_eq!(bench.ctrl.state(), State::Normal);
        assert!(!bench.ctrl.status(1100).sounding);
        assert!(!bench.outputs.buzzer);
    }

    #[test]
    fn test_fast_lane_press_is_absorbed() {
        let mut bench = Bench::booted();
        bench.ctrl.add_alarm(Alarm::daily(7, 30, "wake")).unwrap();
        bench.poll(at(7, 30, 0), 1000);
        assert_eq!(bench.ctrl.state(), State::Alarm);

        // The press edge forced the outputs low and raised the flag; the
        // button is still held when the poll loop next samples it
        bench.flag.request();
        bench.ctrl.poll(at(7, 30, 10), 11_000, true, &bench.flag,
            &mut bench.outputs, &mut bench.display);
        assert_eq!(bench.ctrl.state(), State::Normal);
        bench.ctrl.poll(at(7, 30, 10), 11_100, true, &bench.flag,
            &mut bench.outputs, &mut bench.display);
        bench.ctrl.poll(at(7, 30, 10), 11_200, false, &bench.flag,
            &mut bench.outputs, &mut bench.display);
        bench.ctrl.poll(at(7, 30, 10), 11_300, false, &bench.flag,
            &mut bench.outputs, &mut bench.display);

        // The release of that same press stops the alarm, nothing more:
        // it must not also open the info page
        assert_eq!(bench.ctrl.state(), State::Normal);
        assert!(!bench.outputs.buzzer);

        // A fresh press afterwards is handled normally
        bench.ctrl.poll(at(7, 30, 12), 12_000, true, &bench.flag,
            &mut bench.outputs, &mut bench.display);
        bench.ctrl.poll(at(7, 30, 12), 12_100, true, &bench.flag,
            &mut bench.outputs, &mut bench.display);
        bench.ctrl.poll(at(7, 30, 12), 12_200, false, &bench.flag,
            &mut bench.outputs, &mut bench.display);
        bench.ctrl.poll(at(7, 30, 12), 12_300, false, &bench.flag,
            &mut bench.outputs, &mut bench.display);
        assert_eq!(bench.ctrl.state(), State::Info);
    }

    #[test]
    fn test_countdown_timeline() {
        let mut bench = Bench::booted();
        bench.ctrl.start_timer(120, "pasta", 0).unwrap();
        assert_eq!(bench.ctrl.state(), State::Countdown);

        bench.poll(at(12, 1, 59), 119_000);
        assert_eq!(bench.ctrl.state(), State::Countdown);
        assert_eq!(bench.display.line1, "TIMER: 00:01");
        assert_eq!(bench.display.line2, "pasta");
        assert!(!bench.outputs.buzzer);

        // Expiry: back to normal mode with the post-expiry alert sounding
        bench.poll(at(12, 2, 0), 120_000);
        assert_eq!(bench.ctrl.state(), State::Normal);
        assert!(bench.outputs.buzzer);
        assert_eq!(bench.display.line1, "*** TIMER ***");

        // Five seconds later the alert self-silences and we are back
        bench.run(at(12, 2, 5), 120_100, 125_000);
        assert_eq!(bench.ctrl.state(), State::Normal);
        assert!(!bench.outputs.buzzer);
    }

    #[test]
    fn test_second_timer_rejected_while_active() {
        let mut bench = Bench::booted();
        bench.ctrl.start_timer(60, "first", 0).unwrap();
        assert_eq!(
            bench.ctrl.start_timer(30, "second", 1000),
            Err(TimerError::AlreadyActive)
        );
    }

    #[test]
    fn test_alarm_deferred_while_countdown_active() {
        let mut bench = Bench::booted();
        bench.ctrl.add_alarm(Alarm::daily(7, 30, "wake")).unwrap();
        bench.ctrl.start_timer(600, "laundry", 0).unwrap();

        // The alarm window passes while the countdown runs
        bench.poll(at(7, 30, 2), 10_000);
        assert_eq!(bench.ctrl.state(), State::Countdown);
        assert!(!bench.outputs.buzzer);
    }

    #[test]
    fn test_short_press_stops_alarm() {
        let mut bench = Bench::booted();
        bench.ctrl.add_alarm(Alarm::daily(7, 30, "wake")).unwrap();
        bench.poll(at(7, 30, 0), 1000);
        assert_eq!(bench.ctrl.state(), State::Alarm);

        // Debounced press and release, past the match window
        bench.ctrl.poll(at(7, 30, 10), 11_000, true, &bench.flag,
            &mut bench.outputs, &mut bench.display);
        bench.ctrl.poll(at(7, 30, 10), 11_100, true, &bench.flag,
            &mut bench.outputs, &mut bench.display);
        bench.ctrl.poll(at(7, 30, 10), 11_200, false, &bench.flag,
            &mut bench.outputs, &mut bench.display);
        bench.ctrl.poll(at(7, 30, 10), 11_300, false, &bench.flag,
            &mut bench.outputs, &mut bench.display);

        assert_eq!(bench.ctrl.state(), State::Normal);
        assert!(!bench.outputs.buzzer);
    }

    #[test]
    fn test_short_press_ignored_while_counting_down() {
        let mut bench = Bench::booted();
        bench.ctrl.start_timer(600, "laundry", 0).unwrap();

        bench.ctrl.handle_short_press(5000);
        assert_eq!(bench.ctrl.state(), State::Countdown);
        assert!(bench.ctrl.timer().is_active());
    }

    #[test]
    fn test_short_press_clears_timer_alert() {
        let mut bench = Bench::booted();
        bench.ctrl.start_timer(10, "tea", 0).unwrap();

        bench.poll(at(12, 0, 10), 10_000);
        assert_eq!(bench.ctrl.state(), State::Normal);
        assert!(bench.outputs.buzzer);

        bench.ctrl.handle_short_press(10_500);
        bench.poll(at(12, 0, 10), 10_600);
        assert!(!bench.outputs.buzzer);
        assert_eq!(bench.ctrl.state(), State::Normal);
        // The press consumed the alert, it did not open the info page
        assert!(bench.display.line1.starts_with("12:"));
    }

    #[test]
    fn test_long_press_requests_factory_reset() {
        let mut bench = Bench::booted();

        // Button held for six seconds of 100 ms ticks
        let mut t = 1000;
        while t <= 7000 {
            let outcome = bench.ctrl.poll(at(12, 0, 0), t, true, &bench.flag,
                &mut bench.outputs, &mut bench.display);
            assert_eq!(outcome, PollOutcome::Idle);
            t += 100;
        }

        // Release: the first sample starts the hold-off, the second accepts
        let outcome = bench.ctrl.poll(at(12, 0, 7), 7100, false, &bench.flag,
            &mut bench.outputs, &mut bench.display);
        assert_eq!(outcome, PollOutcome::Idle);
        let outcome = bench.ctrl.poll(at(12, 0, 7), 7200, false, &bench.flag,
            &mut bench.outputs, &mut bench.display);
        assert_eq!(outcome, PollOutcome::FactoryReset);
    }

    #[test]
    fn test_info_page_toggle() {
        let mut bench = Bench::booted();

        bench.ctrl.handle_short_press(1000);
        bench.poll(at(12, 0, 0), 1100);
        assert_eq!(bench.ctrl.state(), State::Info);
        assert_eq!(bench.display.line1, "Reveille Clock");
        assert_eq!(bench.display.line2, FIRMWARE_VERSION);

        bench.ctrl.handle_short_press(2000);
        assert_eq!(bench.ctrl.state(), State::Normal);
    }

    #[test]
    fn test_menu_times_out() {
        let mut bench = Bench::booted();
        bench.ctrl.enter_menu(1000);
        assert_eq!(bench.ctrl.state(), State::Menu);

        bench.poll(at(12, 0, 0), 1000 + MENU_TIMEOUT_MS - 100);
        assert_eq!(bench.ctrl.state(), State::Menu);

        bench.poll(at(12, 0, 10), 1000 + MENU_TIMEOUT_MS);
        assert_eq!(bench.ctrl.state(), State::Normal);
    }

    #[test]
    fn test_menu_press_extends_timeout() {
        let mut bench = Bench::booted();
        bench.ctrl.enter_menu(1000);

        bench.ctrl.handle_short_press(9000);
        bench.poll(at(12, 0, 0), 1000 + MENU_TIMEOUT_MS);
        assert_eq!(bench.ctrl.state(), State::Menu);

        bench.poll(at(12, 0, 19), 9000 + MENU_TIMEOUT_MS);
        assert_eq!(bench.ctrl.state(), State::Normal);
    }

    #[test]
    fn test_status_snapshot() {
        let mut bench = Bench::booted();
        bench.ctrl.add_alarm(Alarm::daily(7, 30, "wake")).unwrap();
        bench.ctrl.start_timer(90, "tea", 0).unwrap();
        bench.poll(at(12, 0, 30), 30_000);

        let status = bench.ctrl.status(30_000);
        assert_eq!(status.state, State::Countdown);
        assert_eq!(status.alarm_count, 1);
        assert!(status.timer_active);
        assert_eq!(status.timer_remaining_s, 60);
    }

    #[test]
    fn test_status_sounding_spans_blink_phases() {
        let mut bench = Bench::booted();
        bench.ctrl.add_alarm(Alarm::daily(7, 30, "wake")).unwrap();
        bench.poll(at(7, 30, 0), 1000);
        assert!(bench.ctrl.status(1000).sounding);

        // Off half-period: the outputs are low but the alert is still on
        bench.poll(at(7, 30, 0), 1500);
        assert!(!bench.outputs.buzzer);
        assert!(bench.ctrl.status(1500).sounding);
    }

    #[test]
    fn test_reset_to_defaults_clears_everything() {
        let mut bench = Bench::booted();
        bench.ctrl.add_alarm(Alarm::daily(7, 30, "wake")).unwrap();
        bench.ctrl.start_timer(90, "tea", 0).unwrap();

        bench.ctrl.reset_to_defaults();
        assert!(bench.ctrl.registry().is_empty());
        assert!(!bench.ctrl.timer().is_active());
        assert!(!bench.ctrl.config().config_valid);
    }

    #[test]
    fn test_temperature_on_clock_page() {
        let mut bench = Bench::booted();
        bench.ctrl.set_network_ok(true);
        bench.ctrl.update_temperature(Some(235));
        bench.poll(at(12, 0, 0), 1000);
        assert_eq!(bench.display.line2, "WIFI 23.5C");

        bench.ctrl.update_temperature(Some(-5));
        bench.poll(at(12, 0, 1), 2000);
        assert_eq!(bench.display.line2, "WIFI -0.5C");
    }
}
