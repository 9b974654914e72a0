//! Each thread allocates from its own pools; nothing is shared or locked.

use std::thread;

use crossbeam_channel::unbounded;
use pricer_pool::{PoolAllocator, PoolConfig, PoolRegistry, PoolVec};

const CONFIG: PoolConfig = PoolConfig::new(128, 8, 16);

#[test]
fn workers_fill_their_own_pools() {
    let (jobs_tx, jobs_rx) = unbounded::<usize>();
    let (done_tx, done_rx) = unbounded::<(usize, f64, usize)>();

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let jobs = jobs_rx.clone();
            let done = done_tx.clone();
            thread::spawn(move || {
                let alloc = PoolAllocator::<f64>::for_current_thread(CONFIG).unwrap();
                for job in jobs {
                    // 128 doubles fill the whole 1 KiB pool.
                    let vec = PoolVec::from_elem_in(job as f64, 128, alloc.clone()).unwrap();
                    let used = alloc.stats().unwrap().used_blocks;
                    let sum: f64 = vec.iter().sum();
                    done.send((job, sum, used)).unwrap();
                }
            })
        })
        .collect();
    drop(done_tx);

    for job in 0..32 {
        jobs_tx.send(job).unwrap();
    }
    drop(jobs_tx);

    let mut results: Vec<_> = done_rx.iter().collect();
    for worker in workers {
        worker.join().unwrap();
    }

    results.sort_by_key(|(job, _, _)| *job);
    assert_eq!(results.len(), 32);
    for (job, sum, used) in results {
        assert_eq!(sum, job as f64 * 128.0);
        // A full pool per thread: no other thread's vector lives in it.
        assert_eq!(used, 8);
    }
}

#[test]
fn pools_built_on_a_worker_stay_on_that_worker() {
    let (tx, rx) = unbounded();
    thread::spawn(move || {
        let registry = PoolRegistry::current();
        let alloc = PoolAllocator::<f64>::new(registry.clone(), CONFIG).unwrap();
        let _vec = PoolVec::from_elem_in(1.0, 16, alloc).unwrap();
        tx.send(registry.pool_count()).unwrap();
    })
    .join()
    .unwrap();

    assert_eq!(rx.recv().unwrap(), 1);
    // The main thread's registry never saw that pool.
    assert!(!PoolRegistry::current().is_active(&CONFIG));
}
