//! Tests for delivering notifications from worker threads to a UI queue.

use std::sync::Arc;
use std::thread;

use horizon_loglist_core::{DispatchError, Dispatcher, Latest, ObservableProperty, ParallelFilter, Signal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Message {
    Request(u32),
    SizeChanged,
}

#[test]
fn test_requests_keep_order_across_threads() {
    let dispatcher = Dispatcher::new();
    let requests = Arc::new(Signal::<u32>::new());

    let handle = dispatcher.handle();
    requests.connect(move |&n| {
        let _ = handle.post(Message::Request(n));
    });

    let producer = {
        let requests = requests.clone();
        thread::spawn(move || {
            for n in 0..100 {
                requests.emit(n);
            }
        })
    };
    assert!(producer.join().is_ok());

    let mut received = Vec::new();
    dispatcher.process_pending(|message| received.push(message));
    let expected: Vec<Message> = (0..100).map(Message::Request).collect();
    assert_eq!(received, expected);
}

#[test]
fn test_sizes_are_coalesced() {
    let dispatcher = Dispatcher::new();
    let size = Arc::new(ObservableProperty::new(0usize));
    let latest = Latest::new();

    let handle = dispatcher.handle();
    let slot = latest.clone();
    size.changed().connect(move |&len| {
        if slot.offer(len) {
            let _ = handle.post(Message::SizeChanged);
        }
    });

    let producer = {
        let size = size.clone();
        thread::spawn(move || {
            for len in 1..=50 {
                size.set(len);
            }
        })
    };
    assert!(producer.join().is_ok());

    let mut delivered = Vec::new();
    let processed = dispatcher.process_pending(|_| delivered.extend(latest.take()));
    assert_eq!(processed, 1);
    assert_eq!(delivered, vec![50]);
}

#[test]
fn test_post_after_dispatcher_dropped() {
    let dispatcher = Dispatcher::<Message>::new();
    let handle = dispatcher.handle();
    drop(dispatcher);
    assert_eq!(handle.post(Message::SizeChanged), Err(DispatchError::Disconnected));
}

#[test]
fn test_dedicated_filter_pool() {
    let filter = match ParallelFilter::with_threads(8, 2) {
        Ok(filter) => filter,
        Err(err) => panic!("pool creation failed: {err}"),
    };
    let items: Vec<u32> = (0..1000).collect();
    let odd = filter.filter(&items, |n| n % 2 == 1);
    assert_eq!(odd.len(), 500);
    assert!(odd.windows(2).all(|w| w[0] < w[1]));
}
