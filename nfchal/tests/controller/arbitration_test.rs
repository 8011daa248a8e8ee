#[path = "../common/mod.rs"]
mod common;

use std::sync::mpsc;
use std::time::{Duration, Instant};

use nfchal::platform::BusLock;
use nfchal::test_support::{mock_hal_with_config, ready_mock_hal};
use nfchal::{Error, HalConfig};
use serial_test::serial;

#[test]
#[serial]
fn second_thread_gets_busy_after_timeout() {
    let (hal, handles) = mock_hal_with_config(HalConfig::default().with_acquire_timeout_ms(30));
    let hal = hal.init().unwrap();
    hal.acquire().unwrap();

    std::thread::scope(|s| {
        let res = s
            .spawn(|| {
                let t0 = Instant::now();
                let res = hal.acquire();
                (res, t0.elapsed())
            })
            .join()
            .unwrap();
        assert_eq!(res.0, Err(Error::Busy));
        assert!(res.1 >= Duration::from_millis(30));
    });

    // The loser never took the bus
    hal.release();
    assert_eq!(handles.bus_lock.locks(), handles.bus_lock.unlocks());
    assert!(!handles.bus_lock.is_held());
}

#[test]
#[serial]
fn contended_acquire_returns_within_its_timeout() {
    let (hal, _handles) = mock_hal_with_config(HalConfig::default().with_acquire_timeout_ms(30));
    let hal = hal.init().unwrap();
    hal.acquire().unwrap();

    let (tx, rx) = mpsc::channel();
    let contender = &hal;
    std::thread::scope(|s| {
        s.spawn(move || {
            let _ = tx.send(contender.acquire());
        });
        // A blocked acquire would leave the channel empty
        assert_eq!(rx.recv_timeout(Duration::from_millis(500)), Ok(Err(Error::Busy)));
    });
    hal.release();
}

#[test]
#[serial]
fn bus_held_by_another_device_is_busy() {
    let (hal, handles) = mock_hal_with_config(HalConfig::default().with_acquire_timeout_ms(20));
    let hal = hal.init().unwrap();
    assert!(handles.bus_lock.try_lock(Duration::ZERO));

    let t0 = Instant::now();
    assert_eq!(hal.acquire(), Err(Error::Busy));
    assert!(t0.elapsed() >= Duration::from_millis(20));

    handles.bus_lock.unlock();
    hal.acquire().unwrap();
    assert!(handles.bus_lock.is_held());
    hal.release();
    assert!(!handles.bus_lock.is_held());
}

#[test]
#[serial]
fn waiter_gets_the_lock_once_released() {
    let (hal, _handles) = ready_mock_hal().unwrap();
    hal.acquire().unwrap();

    std::thread::scope(|s| {
        let waiter = s.spawn(|| {
            hal.acquire()?;
            hal.release();
            Ok::<_, Error>(())
        });
        std::thread::sleep(Duration::from_millis(10));
        hal.release();
        assert_eq!(waiter.join().unwrap(), Ok(()));
    });
}

#[test]
fn guard_releases_on_drop() {
    let (hal, handles) = ready_mock_hal().unwrap();
    {
        let g = hal.guard().unwrap();
        g.low_power_mode_stop().unwrap();
        g.low_power_mode_start().unwrap();
    }
    assert_eq!(handles.bus_lock.locks(), handles.bus_lock.unlocks());
    // Free again for the same thread
    hal.acquire().unwrap();
    hal.release();
}

#[test]
fn lock_is_not_recursive() {
    let (hal, _handles) =
        mock_hal_with_config(HalConfig::default().with_acquire_timeout_ms(5));
    let hal = hal.init().unwrap();
    hal.acquire().unwrap();
    assert_eq!(hal.acquire(), Err(Error::Busy));
    hal.release();
}

#[test]
#[should_panic(expected = "does not hold the lock")]
fn release_by_non_owner_is_a_contract_violation() {
    let (hal, _handles) = ready_mock_hal().unwrap();
    hal.release();
}

#[test]
#[should_panic(expected = "without holding the lock")]
fn hardware_call_without_lock_is_a_contract_violation() {
    let (hal, _handles) = ready_mock_hal().unwrap();
    let _ = hal.poller_field_on();
}

#[test]
fn abort_needs_no_lock() {
    let (hal, _handles) = ready_mock_hal().unwrap();
    hal.abort();
}
