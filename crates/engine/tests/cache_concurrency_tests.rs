//! Multi-threaded type cache tests
//!
//! Validates that concurrent first requests for one key synthesize exactly
//! once and that every caller observes the same type.

mod common;

use common::*;
use dtoforge_core::contract::{AccessorShape, Contract};
use dtoforge_engine::{BaseType, TypeCache};
use std::sync::{Arc, Barrier};
use std::thread;

const THREADS: usize = 16;

// ============================================================================
// Single synthesis
// ============================================================================

#[test]
fn test_concurrent_first_requests_synthesize_once() {
    let cache = TypeCache::new();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let cache = cache.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                cache.get::<DetailProduct>().unwrap()
            })
        })
        .collect();

    let types: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for ty in &types[1..] {
        assert!(Arc::ptr_eq(&types[0], ty));
    }
    assert_eq!(cache.synthesis_count(), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_concurrent_distinct_keys() {
    let cache = TypeCache::new();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let cache = cache.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                match i % 4 {
                    0 => cache.get::<Product>().unwrap(),
                    1 => cache.get::<Customer>().unwrap(),
                    2 => cache.get_with_base::<Product>(&BaseType::of::<EntityBase>()).unwrap(),
                    _ => cache.get::<ListProduct>().unwrap(),
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(cache.synthesis_count(), 4);
    assert_eq!(cache.len(), 4);
}

#[test]
fn test_concurrent_dynamic_contract() {
    let contract = Contract::builder("Telemetry")
        .property::<i64>("sequence", AccessorShape::GET)
        .property::<f64>("reading", AccessorShape::GET_SET)
        .build();
    let cache = TypeCache::new();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let cache = cache.clone();
            let contract = Arc::clone(&contract);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                cache.get_or_synthesize(&contract, None).unwrap()
            })
        })
        .collect();

    let first = cache.get_or_synthesize(&contract, None).unwrap();
    for h in handles {
        assert!(Arc::ptr_eq(&first, &h.join().unwrap()));
    }
    assert_eq!(cache.synthesis_count(), 1);
}

// ============================================================================
// Failure does not poison
// ============================================================================

#[test]
fn test_concurrent_failures_leave_key_retryable() {
    let contract = Contract::builder("Broken")
        .operation("explode")
        .build();
    let cache = TypeCache::new();
    let barrier = Arc::new(Barrier::new(4));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let cache = cache.clone();
            let contract = Arc::clone(&contract);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                cache.get_or_synthesize(&contract, None).is_err()
            })
        })
        .collect();

    for h in handles {
        assert!(h.join().unwrap());
    }
    assert_eq!(cache.synthesis_count(), 0);
    assert!(cache.is_empty());
}

// ============================================================================
// Global cache
// ============================================================================

#[test]
fn test_global_cache_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|_| thread::spawn(|| dtoforge_engine::api::get_type::<Name>().unwrap()))
        .collect();
    let types: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for ty in &types {
        assert!(Arc::ptr_eq(&types[0], ty));
    }
}
