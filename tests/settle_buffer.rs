// tests/settle_buffer.rs

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use pugwatch::types::ChangeKind;
use pugwatch::watch::SettleBuffer;

const THRESHOLD: Duration = Duration::from_millis(1000);

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn path_is_held_until_quiet() {
    let mut buffer = SettleBuffer::new(THRESHOLD);
    let t0 = Instant::now();

    buffer.note(Path::new("/a.pug"), ChangeKind::Changed, t0);
    assert!(buffer.drain_settled(t0 + ms(999)).is_empty());
    assert_eq!(buffer.len(), 1);

    let settled = buffer.drain_settled(t0 + ms(1000));
    assert_eq!(settled, vec![(PathBuf::from("/a.pug"), ChangeKind::Changed)]);
    assert!(buffer.is_empty());
}

#[test]
fn burst_of_writes_collapses_to_one_release() {
    let mut buffer = SettleBuffer::new(THRESHOLD);
    let t0 = Instant::now();

    for step in 0..5 {
        buffer.note(Path::new("/a.pug"), ChangeKind::Changed, t0 + ms(step * 300));
    }

    // Last write was at 1200ms; not yet quiet at 2000ms.
    assert!(buffer.drain_settled(t0 + ms(2000)).is_empty());
    assert_eq!(buffer.drain_settled(t0 + ms(2200)).len(), 1);
    assert!(buffer.drain_settled(t0 + ms(5000)).is_empty());
}

#[test]
fn released_in_first_seen_order() {
    let mut buffer = SettleBuffer::new(THRESHOLD);
    let t0 = Instant::now();

    buffer.note(Path::new("/z.pug"), ChangeKind::Changed, t0);
    buffer.note(Path::new("/a.pug"), ChangeKind::Changed, t0 + ms(10));
    buffer.note(Path::new("/z.pug"), ChangeKind::Changed, t0 + ms(20));

    let order: Vec<PathBuf> = buffer
        .drain_settled(t0 + ms(5000))
        .into_iter()
        .map(|(p, _)| p)
        .collect();
    assert_eq!(order, vec![PathBuf::from("/z.pug"), PathBuf::from("/a.pug")]);
}

#[test]
fn kinds_merge_across_a_burst() {
    let mut buffer = SettleBuffer::new(THRESHOLD);
    let t0 = Instant::now();

    buffer.note(Path::new("/new.pug"), ChangeKind::Added, t0);
    buffer.note(Path::new("/new.pug"), ChangeKind::Changed, t0);

    buffer.note(Path::new("/swap.pug"), ChangeKind::Removed, t0);
    buffer.note(Path::new("/swap.pug"), ChangeKind::Added, t0);

    buffer.note(Path::new("/gone.pug"), ChangeKind::Changed, t0);
    buffer.note(Path::new("/gone.pug"), ChangeKind::Removed, t0);

    let mut settled = buffer.drain_settled(t0 + THRESHOLD);
    settled.sort_by(|a, b| a.0.cmp(&b.0));
    assert_eq!(
        settled,
        vec![
            (PathBuf::from("/gone.pug"), ChangeKind::Removed),
            (PathBuf::from("/new.pug"), ChangeKind::Added),
            (PathBuf::from("/swap.pug"), ChangeKind::Changed),
        ]
    );
}
