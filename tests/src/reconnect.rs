use std::time::Duration;

use hmdlink_common::error::HmdError;
use hmdlink_core::device::DeviceManager;
use hmdlink_core::supervisor::{ReconnectSupervisor, Recovery};
use tokio::time::Instant;

use crate::support::{addr, config, Call, FakeBridge};

const STOP: &str = "am force-stop";

#[tokio::test(start_paused = true)]
async fn session_that_survives_needs_no_reconnect() {
    let cfg = config();
    let bridge = FakeBridge::new().with_session(addr(42));

    let recovery = DeviceManager::new(bridge.clone(), &cfg).restart().await.unwrap();

    assert_eq!(recovery, Recovery::Survived);
    assert!(bridge.connects().is_empty());
    assert!(bridge.disconnects().is_empty());
}

#[tokio::test(start_paused = true)]
async fn restored_on_third_attempt_after_twelve_seconds_of_backoff() {
    let cfg = config();
    let bridge = FakeBridge::new()
        .with_session(addr(42))
        .dropping_on(STOP)
        .failing_connects(2);

    let start = Instant::now();
    let recovery = DeviceManager::new(bridge.clone(), &cfg).restart().await.unwrap();

    assert_eq!(
        recovery,
        Recovery::Restored {
            address: addr(42),
            attempts: 3,
            waited: Duration::from_secs(12),
        }
    );
    // Backoff plus the stop and launch settle windows.
    assert_eq!(start.elapsed(), Duration::from_secs(16));
    assert_eq!(bridge.connects(), vec![addr(42); 3]);
    assert_eq!(bridge.disconnects(), vec![addr(42)]);
}

#[tokio::test(start_paused = true)]
async fn gives_up_after_five_attempts() {
    let cfg = config();
    let bridge = FakeBridge::new()
        .with_session(addr(42))
        .dropping_on(STOP)
        .failing_connects(u32::MAX);

    let start = Instant::now();
    let result = DeviceManager::new(bridge.clone(), &cfg).restart().await;

    match result {
        Err(HmdError::ReconnectExhausted { address, attempts }) => {
            assert_eq!(address, Some(addr(42)));
            assert_eq!(attempts, 5);
        }
        other => panic!("expected ReconnectExhausted, got {other:?}"),
    }
    assert_eq!(start.elapsed(), Duration::from_secs(4 + 30));
    assert_eq!(bridge.connects().len(), 5);
    assert_eq!(bridge.disconnects().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn unreachable_headset_exhausts_the_plan() {
    let cfg = config();
    let bridge = FakeBridge::new().with_session(addr(42));

    let supervisor = ReconnectSupervisor::new(bridge.clone(), &cfg);
    let headset = bridge.clone();
    let result = supervisor
        .supervise(move || async move {
            headset.unplug(addr(42));
            Ok(())
        })
        .await;

    assert!(matches!(result, Err(HmdError::ReconnectExhausted { attempts: 5, .. })));
}

#[tokio::test(start_paused = true)]
async fn nothing_to_reconnect_to_without_a_captured_address() {
    let cfg = config();
    let bridge = FakeBridge::new();

    let supervisor = ReconnectSupervisor::new(bridge.clone(), &cfg);
    let result = supervisor.supervise(|| async { Ok(()) }).await;

    assert!(matches!(
        result,
        Err(HmdError::ReconnectExhausted {
            address: None,
            attempts: 0
        })
    ));
    assert!(bridge.calls().iter().all(|call| *call == Call::Devices));
}

#[tokio::test(start_paused = true)]
async fn fine_polling_returns_as_soon_as_the_session_is_back() {
    let cfg = hmdlink_common::config::Config {
        poll_interval: Duration::from_millis(500),
        ..config()
    };
    let bridge = FakeBridge::new().with_session(addr(42)).dropping_on(STOP);

    let recovery = DeviceManager::new(bridge.clone(), &cfg).restart().await.unwrap();

    assert_eq!(
        recovery,
        Recovery::Restored {
            address: addr(42),
            attempts: 1,
            waited: Duration::from_millis(500),
        }
    );
}

#[tokio::test(start_paused = true)]
async fn launch_after_the_session_dropped_still_restores() {
    let cfg = config();
    let bridge = FakeBridge::new().with_session(addr(42)).dropping_on(STOP);

    let start = Instant::now();
    let recovery = DeviceManager::new(bridge.clone(), &cfg).restart().await.unwrap();

    assert_eq!(
        recovery,
        Recovery::Restored {
            address: addr(42),
            attempts: 1,
            waited: Duration::from_secs(2),
        }
    );
    // The launch went out against a dropped session and was refused.
    let commands = bridge.shell_commands();
    assert_eq!(commands.len(), 2);
    assert!(commands[1].starts_with("monkey -p "));
    assert_eq!(start.elapsed(), Duration::from_secs(1 + 3 + 2));
    assert_eq!(bridge.connects(), vec![addr(42)]);
}

#[tokio::test(start_paused = true)]
async fn retry_count_follows_configuration() {
    let mut cfg = config();
    cfg.retry.max_attempts = 2;
    let bridge = FakeBridge::new()
        .with_session(addr(42))
        .dropping_on(STOP)
        .failing_connects(u32::MAX);

    let start = Instant::now();
    let result = DeviceManager::new(bridge.clone(), &cfg).restart().await;

    assert!(matches!(result, Err(HmdError::ReconnectExhausted { attempts: 2, .. })));
    assert_eq!(start.elapsed(), Duration::from_secs(4 + 2 + 4));
}
