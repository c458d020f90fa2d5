//! End-to-end tests of the dispatch loop against [`MockHardware`].
//!
//! Interrupts are simulated by raising completions through the notifier
//! handles between passes, the same way the drivers do on target.

use core::sync::atomic::{AtomicU8, Ordering};

use tempsampler::app::events::AppEvent;
use tempsampler::app::service::Dispatcher;
use tempsampler::config::SamplerConfig;
use tempsampler::error::{BusError, Error, TransferError};
use tempsampler::events::{
    EventFlags, Flag, Notification, NotificationQueue, TransferEvent, TIMER_CAUSE_COMPARE0,
    TIMER_CAUSE_OVERFLOW,
};
use tempsampler::sampling::SamplingRate;

use crate::mock_hw::{HwCall, MockHardware, RecordingSink};

fn quiet_config() -> SamplerConfig {
    SamplerConfig {
        announce_start: false,
        ..SamplerConfig::default()
    }
}

/// One full sample: compare match, request, bus completion, publish.
fn sample(
    d: &mut Dispatcher<'_>,
    flags: &EventFlags,
    hw: &mut MockHardware,
    sink: &mut RecordingSink,
) {
    flags.timer_notifier().on_interrupt(TIMER_CAUSE_COMPARE0);
    d.poll_once(hw, sink);
    flags.bus_notifier().on_complete(Ok(()));
    d.poll_once(hw, sink);
}

fn link_done(flags: &EventFlags) {
    flags.transfer_notifier().on_event(TransferEvent::Complete);
}

// ── Start-up ──────────────────────────────────────────────────

#[test]
fn start_programs_500ms_and_starts_timer() {
    let flags = EventFlags::new();
    let probe = AtomicU8::new(0);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::default();
    let mut d = Dispatcher::new(&quiet_config(), &flags, &probe);

    d.start(&mut hw, &mut sink);

    assert_eq!(hw.calls, vec![HwCall::SetCompare(512), HwCall::Start]);
    assert_eq!(d.rate(), SamplingRate::Ms500);
    assert_eq!(
        sink.events,
        vec![AppEvent::Started {
            rate: SamplingRate::Ms500,
            compare: 512
        }]
    );
}

#[test]
fn banner_is_sent_first_and_holds_the_link() {
    let flags = EventFlags::new();
    let probe = AtomicU8::new(0);
    let mut hw = MockHardware::with_reading([0x19, 0x00]);
    let mut sink = RecordingSink::default();
    let config = SamplerConfig {
        announce_start: true,
        ..SamplerConfig::default()
    };
    let mut d = Dispatcher::new(&config, &flags, &probe);

    d.start(&mut hw, &mut sink);
    assert_eq!(hw.transfers(), ["Start Of Program \r\n"]);
    assert!(d.link_busy());

    // Banner not yet acknowledged: the sample waits.
    sample(&mut d, &flags, &mut hw, &mut sink);
    assert_eq!(hw.transfers().len(), 1);
    assert_eq!(d.pending_line(), Some("Temperature = 25 C\r\n"));

    link_done(&flags);
    d.poll_once(&mut hw, &mut sink);
    assert_eq!(
        hw.transfers(),
        ["Start Of Program \r\n", "Temperature = 25 C\r\n"]
    );
}

// ── Sampling ──────────────────────────────────────────────────

#[test]
fn timer_expiry_requests_one_register_read() {
    let flags = EventFlags::new();
    let probe = AtomicU8::new(0);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::default();
    let mut d = Dispatcher::new(&quiet_config(), &flags, &probe);
    d.start(&mut hw, &mut sink);
    hw.clear();

    flags.timer_notifier().on_interrupt(TIMER_CAUSE_COMPARE0);
    d.poll_once(&mut hw, &mut sink);

    assert_eq!(
        hw.calls,
        vec![HwCall::Request {
            address: 0x4F,
            write: vec![0x00],
            read_len: 2
        }]
    );
    assert!(!flags.is_raised(Flag::TimerExpired));
}

#[test]
fn completed_read_publishes_temperature_line() {
    let flags = EventFlags::new();
    let probe = AtomicU8::new(0);
    let mut hw = MockHardware::with_reading([0x19, 0x00]);
    let mut sink = RecordingSink::default();
    let mut d = Dispatcher::new(&quiet_config(), &flags, &probe);
    d.start(&mut hw, &mut sink);

    sample(&mut d, &flags, &mut hw, &mut sink);

    let sent = hw.transfers();
    assert_eq!(sent, ["Temperature = 25 C\r\n"]);
    assert_eq!(sent[0].len(), 20);
    assert_eq!(hw.toggles(), 1);
    assert_eq!(probe.load(Ordering::Relaxed), 25);
    assert!(sink.events.contains(&AppEvent::Sample { celsius: 25 }));
    assert!(sink.events.contains(&AppEvent::Transmitted { len: 20 }));
}

#[test]
fn negative_reading_reaches_probe_as_twos_complement() {
    let flags = EventFlags::new();
    let probe = AtomicU8::new(0);
    let mut hw = MockHardware::with_reading([0xE7, 0x00]);
    let mut sink = RecordingSink::default();
    let mut d = Dispatcher::new(&quiet_config(), &flags, &probe);
    d.start(&mut hw, &mut sink);

    sample(&mut d, &flags, &mut hw, &mut sink);

    assert_eq!(probe.load(Ordering::Relaxed) as i8, -25);
    assert_eq!(hw.transfers(), ["Temperature = -25 C\r\n"]);
}

#[test]
fn overflow_only_interrupt_does_not_sample() {
    let flags = EventFlags::new();
    let probe = AtomicU8::new(0);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::default();
    let mut d = Dispatcher::new(&quiet_config(), &flags, &probe);
    d.start(&mut hw, &mut sink);

    flags.timer_notifier().on_interrupt(TIMER_CAUSE_OVERFLOW);
    d.poll_once(&mut hw, &mut sink);

    assert_eq!(hw.requests(), 0);
}

#[test]
fn bus_error_drops_the_sample_silently() {
    let flags = EventFlags::new();
    let probe = AtomicU8::new(7);
    let mut hw = MockHardware::with_reading([0x19, 0x00]);
    let mut sink = RecordingSink::default();
    let mut d = Dispatcher::new(&quiet_config(), &flags, &probe);
    d.start(&mut hw, &mut sink);

    flags.timer_notifier().on_interrupt(TIMER_CAUSE_COMPARE0);
    d.poll_once(&mut hw, &mut sink);
    flags
        .bus_notifier()
        .on_complete(Err(BusError::NoAcknowledge));
    d.poll_once(&mut hw, &mut sink);

    assert!(hw.transfers().is_empty());
    assert_eq!(hw.toggles(), 0);
    assert_eq!(probe.load(Ordering::Relaxed), 7);

    // The next period samples normally.
    sample(&mut d, &flags, &mut hw, &mut sink);
    assert_eq!(hw.transfers(), ["Temperature = 25 C\r\n"]);
}

#[test]
fn refused_request_skips_the_cycle() {
    let flags = EventFlags::new();
    let probe = AtomicU8::new(0);
    let mut hw = MockHardware::new();
    hw.refuse_requests = true;
    let mut sink = RecordingSink::default();
    let mut d = Dispatcher::new(&quiet_config(), &flags, &probe);
    d.start(&mut hw, &mut sink);

    flags.timer_notifier().on_interrupt(TIMER_CAUSE_COMPARE0);
    d.poll_once(&mut hw, &mut sink);

    assert_eq!(hw.requests(), 0);
    assert!(!flags.is_raised(Flag::TimerExpired));
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::RequestRejected(Error::Bus(BusError::Busy)))
    );
}

#[test]
fn timer_and_earlier_read_are_both_handled_in_one_pass() {
    let flags = EventFlags::new();
    let probe = AtomicU8::new(0);
    let mut hw = MockHardware::with_reading([0x19, 0x00]);
    let mut sink = RecordingSink::default();
    let mut d = Dispatcher::new(&quiet_config(), &flags, &probe);
    d.start(&mut hw, &mut sink);
    hw.clear();

    flags.bus_notifier().on_complete(Ok(()));
    flags.timer_notifier().on_interrupt(TIMER_CAUSE_COMPARE0);
    d.poll_once(&mut hw, &mut sink);

    assert_eq!(
        hw.calls,
        vec![
            HwCall::Request {
                address: 0x4F,
                write: vec![0x00],
                read_len: 2
            },
            HwCall::Toggle,
            HwCall::Transfer("Temperature = 25 C\r\n".into()),
        ]
    );
    assert!(!flags.is_raised(Flag::TimerExpired));
    assert!(!flags.is_raised(Flag::ReadComplete));
}

// ── Rate changes ──────────────────────────────────────────────

#[test]
fn trigger_advances_period_on_next_read() {
    let flags = EventFlags::new();
    let probe = AtomicU8::new(0);
    let mut hw = MockHardware::with_reading([0x19, 0x00]);
    let mut sink = RecordingSink::default();
    let mut d = Dispatcher::new(&quiet_config(), &flags, &probe);
    d.start(&mut hw, &mut sink);
    hw.clear();

    flags.trigger_notifier().on_edge();
    sample(&mut d, &flags, &mut hw, &mut sink);

    assert_eq!(d.rate(), SamplingRate::S1);
    assert_eq!(hw.last_compare(), Some(1024));
    assert_eq!(hw.transfers(), ["Sampling Temperature every 1 second \r\n"]);
    assert_eq!(hw.toggles(), 0, "the rate change consumes the reading");
    assert!(!flags.is_raised(Flag::RateChangeRequested));
    assert!(sink.events.contains(&AppEvent::RateChanged {
        from: SamplingRate::Ms500,
        to: SamplingRate::S1,
        compare: 1024
    }));
}

#[test]
fn rate_index_is_published_for_the_debug_probe() {
    let flags = EventFlags::new();
    let probe = AtomicU8::new(0);
    let rate_probe = AtomicU8::new(0xFF);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::default();
    let mut d = Dispatcher::new(&quiet_config(), &flags, &probe).with_rate_probe(&rate_probe);

    d.start(&mut hw, &mut sink);
    assert_eq!(rate_probe.load(Ordering::Relaxed), 0);

    flags.trigger_notifier().on_edge();
    sample(&mut d, &flags, &mut hw, &mut sink);
    assert_eq!(rate_probe.load(Ordering::Relaxed), 1);

    for expected in [2, 3, 0] {
        link_done(&flags);
        flags.trigger_notifier().on_edge();
        sample(&mut d, &flags, &mut hw, &mut sink);
        assert_eq!(rate_probe.load(Ordering::Relaxed), expected);
    }
}

#[test]
fn four_triggers_cycle_back_to_500ms() {
    let flags = EventFlags::new();
    let probe = AtomicU8::new(0);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::default();
    let mut d = Dispatcher::new(&quiet_config(), &flags, &probe);
    d.start(&mut hw, &mut sink);
    hw.clear();

    for _ in 0..4 {
        flags.trigger_notifier().on_edge();
        sample(&mut d, &flags, &mut hw, &mut sink);
        link_done(&flags);
    }

    let compares: Vec<u32> = hw
        .calls
        .iter()
        .filter_map(|c| match c {
            HwCall::SetCompare(v) => Some(*v),
            _ => None,
        })
        .collect();
    assert_eq!(compares, vec![1024, 2048, 4096, 512]);
    assert_eq!(d.rate(), SamplingRate::Ms500);
    assert_eq!(
        hw.transfers(),
        [
            "Sampling Temperature every 1 second \r\n",
            "Sampling Temperature every 2 seconds \r\n",
            "Sampling Temperature every 4 seconds \r\n",
            "Sampling Temperature every 500 ms \r\n",
        ]
    );
}

#[test]
fn trigger_without_read_changes_nothing() {
    let flags = EventFlags::new();
    let probe = AtomicU8::new(0);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::default();
    let mut d = Dispatcher::new(&quiet_config(), &flags, &probe);
    d.start(&mut hw, &mut sink);
    hw.clear();

    flags.trigger_notifier().on_edge();
    d.poll_once(&mut hw, &mut sink);
    d.poll_once(&mut hw, &mut sink);

    assert!(hw.calls.is_empty());
    assert_eq!(d.rate(), SamplingRate::Ms500);
    assert!(flags.is_raised(Flag::RateChangeRequested));
}

// ── Link gating ───────────────────────────────────────────────

#[test]
fn no_second_transfer_until_link_reports_ready() {
    let flags = EventFlags::new();
    let probe = AtomicU8::new(0);
    let mut hw = MockHardware::with_reading([0x19, 0x00]);
    let mut sink = RecordingSink::default();
    let mut d = Dispatcher::new(&quiet_config(), &flags, &probe);
    d.start(&mut hw, &mut sink);

    sample(&mut d, &flags, &mut hw, &mut sink);
    hw.reading = [0x1A, 0x00];
    sample(&mut d, &flags, &mut hw, &mut sink);
    hw.reading = [0x1B, 0x00];
    sample(&mut d, &flags, &mut hw, &mut sink);

    assert_eq!(hw.transfers(), ["Temperature = 25 C\r\n"]);
    assert!(sink.events.contains(&AppEvent::LineSuperseded { len: 20 }));

    link_done(&flags);
    d.poll_once(&mut hw, &mut sink);
    assert_eq!(
        hw.transfers(),
        ["Temperature = 25 C\r\n", "Temperature = 27 C\r\n"]
    );
}

#[test]
fn failed_transfer_frees_the_link_and_output_continues() {
    let flags = EventFlags::new();
    let probe = AtomicU8::new(0);
    let mut hw = MockHardware::with_reading([0x19, 0x00]);
    let mut sink = RecordingSink::default();
    let mut d = Dispatcher::new(&quiet_config(), &flags, &probe);
    d.start(&mut hw, &mut sink);

    sample(&mut d, &flags, &mut hw, &mut sink);
    flags.transfer_notifier().on_event(TransferEvent::Error);
    sample(&mut d, &flags, &mut hw, &mut sink);

    assert_eq!(hw.transfers().len(), 2);
    assert!(sink.events.contains(&AppEvent::RequestRejected(Error::Transfer(
        TransferError::WriteFailed
    ))));

    for _ in 0..10 {
        link_done(&flags);
        sample(&mut d, &flags, &mut hw, &mut sink);
    }
    assert_eq!(hw.transfers().len(), 12);
}

#[test]
fn refused_transfer_drops_line_and_leaves_link_idle() {
    let flags = EventFlags::new();
    let probe = AtomicU8::new(0);
    let mut hw = MockHardware::with_reading([0x19, 0x00]);
    hw.refuse_transfers = true;
    let mut sink = RecordingSink::default();
    let mut d = Dispatcher::new(&quiet_config(), &flags, &probe);
    d.start(&mut hw, &mut sink);

    sample(&mut d, &flags, &mut hw, &mut sink);
    assert!(hw.transfers().is_empty());
    assert_eq!(d.pending_line(), None);
    assert!(!d.link_busy());

    hw.refuse_transfers = false;
    sample(&mut d, &flags, &mut hw, &mut sink);
    assert_eq!(hw.transfers(), ["Temperature = 25 C\r\n"]);
}

// ── Loop housekeeping ─────────────────────────────────────────

#[test]
fn every_pass_steps_the_telemetry_link() {
    let flags = EventFlags::new();
    let probe = AtomicU8::new(0);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::default();
    let mut d = Dispatcher::new(&quiet_config(), &flags, &probe);
    d.start(&mut hw, &mut sink);

    for _ in 0..5 {
        d.poll_once(&mut hw, &mut sink);
    }
    assert_eq!(hw.communicate_count, 5);
    assert_eq!(d.passes(), 5);
}

#[test]
fn attached_queue_is_drained_every_pass() {
    static QUEUE: NotificationQueue<8> = NotificationQueue::new();

    let flags = EventFlags::new();
    let probe = AtomicU8::new(0);
    let mut hw = MockHardware::with_reading([0x19, 0x00]);
    let mut sink = RecordingSink::default();
    let mut d = Dispatcher::new(&quiet_config(), &flags, &probe).with_queue(&QUEUE);
    d.start(&mut hw, &mut sink);

    assert!(QUEUE.post(Notification::TimerInterrupt(TIMER_CAUSE_COMPARE0)));
    d.poll_once(&mut hw, &mut sink);
    assert!(QUEUE.is_empty());
    assert_eq!(hw.requests(), 1);

    assert!(QUEUE.post(Notification::BusComplete(Ok(()))));
    d.poll_once(&mut hw, &mut sink);
    assert_eq!(hw.transfers(), ["Temperature = 25 C\r\n"]);

    // Nothing queued: further passes issue nothing new.
    for _ in 0..10 {
        d.poll_once(&mut hw, &mut sink);
    }
    assert_eq!(hw.requests(), 1);
}
