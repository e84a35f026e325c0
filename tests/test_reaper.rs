use std::time::Duration;

use conduit::error::WorkerError;
use conduit::server::{Reaper, UnitExit};
use tokio::sync::watch;

fn exit(id: u64, result: Result<(), WorkerError>) -> UnitExit {
    UnitExit {
        id,
        peer: "127.0.0.1:9".parse().unwrap(),
        result,
    }
}

#[tokio::test]
async fn test_single_notification_reaps_all_simultaneous_exits() {
    const UNITS: u64 = 16;

    let mut reaper = Reaper::new();
    let (release, gate) = watch::channel(false);

    for id in 0..UNITS {
        let mut gate = gate.clone();
        reaper.adopt(async move {
            let _ = gate.wait_for(|open| *open).await;
            exit(id, Ok(()))
        });
    }
    assert_eq!(reaper.live(), UNITS as usize);

    release.send(true).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let collected = reaper.collect().await;

    assert_eq!(collected, UNITS as usize);
    assert_eq!(reaper.live(), 0);
    assert_eq!(reaper.reaped(), UNITS);
}

#[tokio::test]
async fn test_failed_and_panicked_units_are_reaped() {
    let mut reaper = Reaper::new();

    reaper.adopt(async { exit(1, Err(WorkerError::Panicked("handler".to_string()))) });
    reaper.adopt(async { exit(2, Ok(())) });
    reaper.adopt(async {
        if true {
            panic!("unit blew up");
        }
        exit(3, Ok(()))
    });

    let mut total = 0;
    while reaper.live() > 0 {
        total += reaper.collect().await;
    }

    assert_eq!(total, 3);
    assert_eq!(reaper.reaped(), 3);
}

#[tokio::test]
async fn test_reap_returns_without_blocking() {
    let mut reaper = Reaper::new();
    let (_release, gate) = watch::channel(false);

    let mut held = gate.clone();
    reaper.adopt(async move {
        let _ = held.wait_for(|open| *open).await;
        exit(7, Ok(()))
    });
    reaper.adopt(async { exit(8, Ok(())) });

    tokio::time::sleep(Duration::from_millis(50)).await;

    let reaped = tokio::time::timeout(Duration::from_millis(100), async { reaper.reap() })
        .await
        .expect("reap blocked");

    assert_eq!(reaped, 1);
    assert_eq!(reaper.live(), 1);
}
