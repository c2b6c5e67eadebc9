use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use workbench_core::{IdPool, IdPoolError};

fn smallest_not_in(lent: &BTreeSet<usize>) -> usize {
    (0..).find(|id| !lent.contains(id)).unwrap_or_default()
}

#[test]
fn test_allocation_sequence() {
    let mut pool = IdPool::new();
    assert_eq!((pool.get(), pool.get(), pool.get()), (0, 1, 2));

    pool.release(1).unwrap();
    assert_eq!(pool.missing_values(), vec![0, 2]);
    assert_eq!(pool.get(), 1);
}

#[test]
fn test_release_of_unlent_ids_fails() {
    let mut pool = IdPool::new();
    assert_eq!(
        pool.release(0),
        Err(IdPoolError::OutOfRange {
            value: 0,
            watermark: 0
        })
    );

    pool.take(2);
    assert_eq!(pool.release(1), Err(IdPoolError::NotLent(1)));
    assert!(pool.release(2).is_ok());
    assert_eq!(pool.missing_values(), Vec::<usize>::new());
}

#[test]
fn test_random_operations_match_model() {
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut pool = IdPool::new();
        let mut lent = BTreeSet::new();

        for _ in 0..400 {
            match rng.gen_range(0..3) {
                0 => {
                    let id = pool.get();
                    assert_eq!(id, smallest_not_in(&lent), "seed {seed}");
                    lent.insert(id);
                }
                1 => {
                    let value = rng.gen_range(0..24);
                    pool.take(value);
                    lent.insert(value);
                }
                _ => {
                    let value = rng.gen_range(0..24);
                    let result = pool.release(value);
                    assert_eq!(result.is_ok(), lent.remove(&value), "seed {seed}");
                }
            }

            assert_eq!(
                pool.missing_values(),
                lent.iter().copied().collect::<Vec<_>>(),
                "seed {seed}"
            );
            assert!(lent.iter().all(|id| pool.is_lent(*id)));
            assert!(lent.last().is_none_or(|max| *max < pool.watermark()));
        }
    }
}
