//! Extreme stress tests that really push the heap to its limits
//!
//! These tests perform large numbers of operations in various patterns
//! to catch edge cases and verify correctness under load.

use rust_fibonacci_heap::fibonacci::FibonacciHeap;
use rust_fibonacci_heap::{DecreaseKeyHeap, Heap, HeapError};

/// Test massive numbers of inserts and pops
fn test_massive_operations<H: Heap<i32, i32>>() {
    let mut heap = H::new();

    // Insert in reverse so every insert becomes the new minimum
    for i in (0..10_000).rev() {
        heap.push(i, i);
    }

    assert_eq!(heap.len(), 10_000);

    for i in 0..10_000 {
        assert_eq!(heap.pop(), Some((i, i)));
    }

    assert!(heap.is_empty());
}

/// Test many decrease_key operations
fn test_many_decrease_keys<H: DecreaseKeyHeap<i32, i32>>() {
    let mut heap = H::new();
    let mut handles = Vec::new();

    for i in 0..2000 {
        handles.push(heap.push_with_handle(10_000 + i, i));
    }

    // Build some trees first so the decreases have something to cut
    let (first, _) = heap.pop().unwrap();
    assert_eq!(first, 10_000);

    for (i, handle) in handles.iter().enumerate().skip(1) {
        assert!(heap.decrease_key(handle, i as i32).is_ok());
    }

    for i in 1..2000 {
        assert_eq!(heap.pop(), Some((i, i)));
    }
    assert!(heap.is_empty());
}

/// Test alternating insert and pop
fn test_alternating_ops<H: Heap<i32, i32>>() {
    let mut heap = H::new();

    for i in 0..500 {
        heap.push(i * 2, i);
        heap.push(i * 2 + 1, i + 1000);

        let popped = heap.pop();
        assert_eq!(popped.map(|(k, _)| k), Some(i));
    }

    let mut last = i32::MIN;
    while let Some((priority, _)) = heap.pop() {
        assert!(priority >= last);
        last = priority;
    }
    assert!(heap.is_empty());
}

/// Test merge with large heaps
fn test_large_merge<H: Heap<i32, i32>>() {
    let mut heap1 = H::new();
    let mut heap2 = H::new();

    for i in 0..2000 {
        heap1.push(i * 2, i);
        heap2.push(i * 2 + 1, i + 1000);
    }

    // Give both heaps non-trivial tree shapes before merging
    assert_eq!(heap1.pop(), Some((0, 0)));
    assert_eq!(heap2.pop(), Some((1, 1000)));

    heap1.merge(heap2);

    assert_eq!(heap1.len(), 3998);

    let mut expected = 2;
    while let Some((priority, _)) = heap1.pop() {
        assert_eq!(priority, expected);
        expected += 1;
    }
    assert_eq!(expected, 4000);
}

/// Test decrease_key after many elements were popped
fn test_decrease_on_many_operations<H: DecreaseKeyHeap<i32, i32>>() {
    let mut heap = H::new();
    let mut handles = Vec::new();

    for i in 0..3000 {
        handles.push(heap.push_with_handle(i * 10, i));
    }

    for _ in 0..1000 {
        heap.pop();
    }

    // Every remaining handle is driven below the current minimum in turn
    for handle in handles.iter().skip(1000) {
        let current = heap.peek().map(|(k, _)| *k).unwrap();
        assert!(heap.decrease_key(handle, current - 1).is_ok());
    }

    // The last handle decreased is now the minimum
    assert_eq!(heap.peek().map(|(_, v)| *v), Some(2999));
    assert_eq!(heap.len(), 2000);

    let mut expected = 2999;
    while let Some((_, value)) = heap.pop() {
        assert_eq!(value, expected);
        expected -= 1;
    }
}

/// Test with very large priorities
fn test_large_priorities<H: Heap<i64, i64>>() {
    let mut heap = H::new();

    heap.push(1_000_000_000_000, 1);
    heap.push(-1_000_000_000_000, 2);
    heap.push(i64::MAX, 3);
    heap.push(i64::MIN, 4);

    assert_eq!(heap.pop(), Some((i64::MIN, 4)));
    assert_eq!(heap.pop(), Some((-1_000_000_000_000, 2)));
    assert_eq!(heap.pop(), Some((1_000_000_000_000, 1)));
    assert_eq!(heap.pop(), Some((i64::MAX, 3)));
    assert_eq!(heap.pop(), None);
}

/// Test rapid-fire operations
fn test_rapid_fire<H: DecreaseKeyHeap<i32, i32>>() {
    let mut heap = H::new();
    let mut handles = Vec::new();

    for i in 0..1000 {
        handles.push(heap.push_with_handle(i, i));
    }

    // After one pop, even handles are decreased and odd handles deleted
    heap.pop();
    for (i, handle) in handles.iter().enumerate().skip(1) {
        if i % 2 == 0 {
            assert!(heap.decrease_key(handle, i as i32 - 10_000).is_ok());
        } else {
            assert_eq!(heap.delete(handle).map(|(_, v)| v), Ok(i as i32));
        }
    }

    assert_eq!(heap.len(), 499);

    for i in 1000..1100 {
        heap.push(i, i);
    }

    let mut last = i32::MIN;
    let mut count = 0;
    while let Some((priority, _)) = heap.pop() {
        assert!(priority >= last);
        last = priority;
        count += 1;
    }
    assert_eq!(count, 599);
}

#[test]
fn test_fibonacci_massive() {
    test_massive_operations::<FibonacciHeap<i32, i32>>();
}

#[test]
fn test_fibonacci_many_decrease_keys() {
    test_many_decrease_keys::<FibonacciHeap<i32, i32>>();
}

#[test]
fn test_fibonacci_alternating() {
    test_alternating_ops::<FibonacciHeap<i32, i32>>();
}

#[test]
fn test_fibonacci_large_merge() {
    test_large_merge::<FibonacciHeap<i32, i32>>();
}

#[test]
fn test_fibonacci_decrease_on_many() {
    test_decrease_on_many_operations::<FibonacciHeap<i32, i32>>();
}

#[test]
fn test_fibonacci_large_priorities() {
    test_large_priorities::<FibonacciHeap<i64, i64>>();
}

#[test]
fn test_fibonacci_rapid_fire() {
    test_rapid_fire::<FibonacciHeap<i32, i32>>();
}

#[test]
fn test_fibonacci_cascading_cuts_under_load() {
    let mut heap = FibonacciHeap::new();
    let handles: Vec<_> = (0..4096).map(|i| heap.insert(i, i)).collect();

    // One extraction builds binomial-shaped trees over the whole heap
    assert_eq!(heap.extract_min(), Ok((0, 0)));
    assert!(heap.verify_invariants());

    // Decreasing from the back hits deep nodes and marks their parents
    for (round, handle) in handles.iter().skip(1).rev().enumerate() {
        heap.decrease_key(handle, -(round as i32) - 1).unwrap();
        if round % 256 == 0 {
            assert!(heap.verify_invariants());
        }
    }
    assert!(heap.verify_invariants());

    // The handle decreased last holds the smallest key
    for expected in 1..4096 {
        let (_, value) = heap.extract_min().unwrap();
        assert_eq!(value, expected);
    }
    assert_eq!(heap.extract_min(), Err(HeapError::Empty));
}

#[test]
fn test_fibonacci_interleaved_unions() {
    let mut total = FibonacciHeap::new();
    let mut expected = Vec::new();

    for batch in 0..50 {
        let mut part = FibonacciHeap::new();
        for i in 0..40 {
            let key = (i * 37 + batch * 11) % 500;
            part.insert(key, ());
            expected.push(key);
        }
        if batch % 3 == 0 {
            let (popped, _) = part.pop().unwrap();
            let pos = expected.iter().position(|&k| k == popped).unwrap();
            expected.swap_remove(pos);
        }
        total.union(part);
        assert!(total.verify_invariants());
    }

    expected.sort_unstable();
    let drained: Vec<_> = std::iter::from_fn(|| total.pop()).map(|(k, _)| k).collect();
    assert_eq!(drained, expected);
}
