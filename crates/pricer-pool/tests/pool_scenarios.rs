//! Allocation scenarios exercised through the public pool API.

use std::rc::Rc;

use pricer_pool::{AllocError, Pool, PoolAllocator, PoolConfig, PoolError, PoolRegistry, PoolVec};

const FOUR_BLOCKS: PoolConfig = PoolConfig::new(64, 4, 16);

#[test]
fn fragmented_pool_refuses_a_run_it_cannot_place() {
    let mut pool = Pool::new(FOUR_BLOCKS).unwrap();
    let first = pool.allocate(128).unwrap(); // blocks 0-1
    let second = pool.allocate(64).unwrap(); // block 2
    assert_eq!(pool.block_index(first), Some(0));
    assert_eq!(pool.block_index(second), Some(2));

    unsafe { pool.deallocate(first, 128) };
    assert_eq!(pool.free_blocks(), 3);
    assert_eq!(pool.stats().largest_free_run, 2);
    assert!(pool.allocate(192).is_none());

    // The two-block hole is still usable.
    let refill = pool.allocate(128).unwrap();
    assert_eq!(pool.block_index(refill), Some(0));
}

#[test]
fn exhausted_pool_recovers_after_free() {
    let mut pool = Pool::new(FOUR_BLOCKS).unwrap();
    let all = pool.allocate(256).unwrap();
    assert!(pool.allocate(1).is_none());

    unsafe { pool.deallocate(all, 256) };
    let again = pool.allocate(256).unwrap();
    assert_eq!(pool.block_index(again), Some(0));
}

#[test]
fn handle_round_trip_restores_the_ledger() {
    let registry = Rc::new(PoolRegistry::new());
    let alloc = PoolAllocator::<f64>::new(Rc::clone(&registry), PoolConfig::new(64, 16, 16))
        .unwrap();
    let _held = alloc.allocate(20).unwrap();

    let before = registry
        .with_pool(alloc.config(), |pool| pool.ledger().to_vec())
        .unwrap();
    let p = alloc.allocate(13).unwrap();
    unsafe { alloc.deallocate(p, 13) };
    let after = registry
        .with_pool(alloc.config(), |pool| pool.ledger().to_vec())
        .unwrap();
    assert_eq!(before, after);
}

#[test]
fn containers_report_exhaustion_as_errors() {
    let registry = Rc::new(PoolRegistry::new());
    let alloc = PoolAllocator::<f64>::new(registry, FOUR_BLOCKS).unwrap();
    let full = PoolVec::from_elem_in(0.0, 32, alloc.clone()).unwrap();
    assert_eq!(alloc.stats().unwrap().free_blocks, 0);

    let err = PoolVec::from_elem_in(0.0, 1, alloc.clone()).unwrap_err();
    assert_eq!(
        err,
        AllocError::Exhausted {
            requested_blocks: 1,
            free_blocks: 0
        }
    );

    drop(full);
    assert!(PoolVec::from_elem_in(0.0, 32, alloc).is_ok());
}

#[test]
fn pools_of_one_registry_are_independent() {
    let registry = Rc::new(PoolRegistry::new());
    let narrow = PoolAllocator::<f64>::new(Rc::clone(&registry), FOUR_BLOCKS).unwrap();
    let wide = PoolAllocator::<f64>::new(Rc::clone(&registry), PoolConfig::new(64, 4, 64))
        .unwrap();

    let _a = PoolVec::from_elem_in(1.0, 32, narrow.clone()).unwrap();
    let b = PoolVec::from_elem_in(2.0, 32, wide.clone()).unwrap();
    assert_eq!(b.as_ptr() as usize % 64, 0);
    assert_eq!(registry.pool_count(), 2);
    assert!(narrow.allocate(1).is_err());
    assert!(wide.allocate(1).is_err());
}

#[test]
fn unobtainable_arena_is_a_fatal_error() {
    // Valid layout (just under 4 EiB), but no allocator can supply it.
    let huge = PoolConfig::new(1 << 20, isize::MAX as usize >> 21, 8);
    assert!(huge.validate().is_ok());

    let err = Pool::new(huge).unwrap_err();
    assert!(matches!(
        err,
        PoolError::ArenaUnavailable { alignment: 8, .. }
    ));

    let registry = Rc::new(PoolRegistry::new());
    let alloc = PoolAllocator::<f64>::new(Rc::clone(&registry), huge).unwrap();
    let err = alloc.allocate(1).unwrap_err();
    assert!(matches!(
        err,
        AllocError::Pool(PoolError::ArenaUnavailable { .. })
    ));
    assert_eq!(registry.pool_count(), 0);
    assert!(!registry.is_active(&huge));

    // Construction is retried, and fails the same way, on the next request.
    assert!(alloc.allocate(1).is_err());
    assert_eq!(registry.pool_count(), 0);
}
