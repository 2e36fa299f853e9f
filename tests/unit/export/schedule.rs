use super::*;

#[test]
fn zero_resolves_to_at_least_one_worker() {
    assert!(resolve_worker_count(0) >= 1);
    assert_eq!(resolve_worker_count(3), 3);
}

#[test]
fn interleaved_assignment() {
    let got: Vec<u64> = worker_indices(1, 3, 10).collect();
    assert_eq!(got, vec![1, 4, 7]);
    assert_eq!(worker_indices(5, 8, 3).count(), 0);
}

#[test]
fn partition_covers_every_index_exactly_once() {
    for total in [1u64, 2, 7, 30, 61] {
        for workers in 1..=total as usize {
            let mut seen = vec![0u32; total as usize];
            for w in 0..workers {
                let mine: Vec<u64> = worker_indices(w, workers, total).collect();
                assert_eq!(mine.len() as u64, worker_share(w, workers, total));
                for i in mine {
                    seen[i as usize] += 1;
                }
            }
            assert!(
                seen.iter().all(|&n| n == 1),
                "total={total} workers={workers}: {seen:?}"
            );
        }
    }
}

#[test]
fn share_is_zero_for_idle_workers() {
    assert_eq!(worker_share(4, 8, 4), 0);
    assert_eq!(worker_share(0, 8, 4), 1);
    assert_eq!(worker_share(0, 1, 4), 4);
}

#[test]
fn worker_count_is_clamped_to_frames_and_pool_limit() {
    assert_eq!(clamp_worker_count(8, 3), 3);
    assert_eq!(clamp_worker_count(2, 100), 2);
    assert_eq!(clamp_worker_count(1, 0), 1);
    assert_eq!(
        clamp_worker_count(usize::MAX, u64::MAX),
        rayon::max_num_threads()
    );
}
