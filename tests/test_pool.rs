use bench_report::{
    pool::{block_on_batch, run_batch, run_blocking_batch},
    ReportError,
};
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_job_yields_one_outcome() {
    let jobs: Vec<u32> = (0..20).collect();
    let report = run_batch(jobs, 4, |n| async move { Ok::<_, ReportError>(n * 2) }).await;

    assert!(report.is_success());
    assert_eq!(report.len(), 20);
    let mut doubled: Vec<u32> = report.succeeded.iter().map(|(_, v)| *v).collect();
    doubled.sort();
    assert_eq!(doubled, (0..20).map(|n| n * 2).collect::<Vec<_>>());
    assert!(report.succeeded.iter().all(|(j, v)| *v == j * 2));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_failures_are_isolated() {
    let jobs: Vec<u32> = (0..10).collect();
    let report = run_batch(jobs, 3, |n| async move {
        if n % 3 == 0 {
            Err(ReportError::Config(format!("job {n}")))
        } else {
            Ok(n)
        }
    })
    .await;

    assert!(!report.is_success());
    assert_eq!(report.len(), 10);
    let mut failed: Vec<u32> = report.failed.iter().map(|(j, _)| *j).collect();
    failed.sort();
    assert_eq!(failed, vec![0, 3, 6, 9]);
    assert_eq!(report.succeeded.len(), 6);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_removing_a_job_leaves_the_others_unchanged() {
    let square = |n: u64| async move { Ok::<_, ReportError>(n * n) };
    let sorted = |mut v: Vec<(u64, u64)>| {
        v.sort();
        v
    };

    let all = run_batch((1..=6).collect(), 3, square).await;
    let fewer = run_batch(vec![1, 2, 4, 5, 6], 3, square).await;

    let expected: Vec<(u64, u64)> = sorted(all.succeeded)
        .into_iter()
        .filter(|(j, _)| *j != 3)
        .collect();
    assert_eq!(sorted(fewer.succeeded), expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_panic_is_recorded_as_worker_failure() {
    let report = run_batch(vec![1u32, 2, 3], 2, |n| async move {
        if n == 2 {
            panic!("job {n} panicked");
        }
        Ok::<_, ReportError>(n)
    })
    .await;

    assert_eq!(report.succeeded.len(), 2);
    assert_eq!(report.failed.len(), 1);
    let (job, err) = &report.failed[0];
    assert_eq!(*job, 2);
    assert!(matches!(err, ReportError::Worker(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_is_bounded() {
    let running = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let (r, p) = (running.clone(), peak.clone());
    let report = run_batch((0..12).collect::<Vec<u32>>(), 2, move |_| {
        let (running, peak) = (r.clone(), p.clone());
        async move {
            let now = running.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            running.fetch_sub(1, Ordering::SeqCst);
            Ok::<_, ReportError>(())
        }
    })
    .await;

    assert_eq!(report.succeeded.len(), 12);
    assert!(peak.load(Ordering::SeqCst) <= 2);
    assert!(peak.load(Ordering::SeqCst) >= 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_blocking_batch() {
    let report = run_blocking_batch(vec!["a", "bb", "ccc"], 2, |s: &str| {
        std::thread::sleep(Duration::from_millis(5));
        if s.len() == 2 {
            return Err(ReportError::Render(s.to_owned()));
        }
        Ok(s.len())
    })
    .await;

    assert_eq!(report.succeeded.len(), 2);
    assert_eq!(report.failed[0].0, "bb");
}

#[test]
fn test_block_on_empty_batch() {
    let report = block_on_batch(Vec::<u32>::new(), 4, |n| async move { Ok::<_, ReportError>(n) }).unwrap();
    assert!(report.is_empty());
    assert!(report.is_success());
}

#[test]
fn test_zero_concurrency_still_runs() {
    let report = block_on_batch(vec![1u32, 2], 0, |n| async move { Ok::<_, ReportError>(n) }).unwrap();
    assert_eq!(report.succeeded.len(), 2);
}
