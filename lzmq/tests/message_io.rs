//! Message I/O tests

mod common;

use std::thread;
use std::time::Duration;

use bytes::Bytes;
use lzmq::{LzmqError, Mode};

#[test]
fn test_req_rep_ping_pong() {
    let ctx = common::context();
    let endpoint = common::inproc("test");
    let rep = ctx.socket("rep").unwrap();
    rep.bind(&endpoint).unwrap();
    let req = ctx.socket("req").unwrap();
    req.connect(&endpoint).unwrap();

    req.send_one("ping", Mode::Blocking).unwrap();
    let request = rep.recv_one(Mode::Blocking).unwrap();
    assert_eq!(request.data(), b"ping");
    assert!(!request.more);

    rep.send_one("pong", Mode::Blocking).unwrap();
    let reply = req.recv_one(Mode::Blocking).unwrap();
    assert_eq!(reply.data(), b"pong");
    assert!(!reply.more);
}

#[test]
fn test_multipart_preserves_order_and_flags() {
    let ctx = common::context();
    let endpoint = common::inproc("multipart");
    let pull = ctx.socket("pull").unwrap();
    pull.bind(&endpoint).unwrap();
    let push = ctx.socket("push").unwrap();
    push.connect(&endpoint).unwrap();

    let message: Vec<&[u8]> = vec![&b"header"[..], &b""[..], &b"body"[..]];
    assert_eq!(push.send_multipart(&message, Mode::Blocking).unwrap(), 3);

    let parts = pull.recv_multipart_parts(Mode::Blocking).unwrap();
    let data: Vec<&[u8]> = parts.iter().map(|p| p.data()).collect();
    assert_eq!(data, message);
    let flags: Vec<bool> = parts.iter().map(|p| p.more).collect();
    assert_eq!(flags, vec![true, true, false]);
}

#[test]
fn test_recv_multipart_collects_whole_message() {
    let ctx = common::context();
    let endpoint = common::inproc("collect");
    let pull = ctx.socket("pull").unwrap();
    pull.bind(&endpoint).unwrap();
    let push = ctx.socket("push").unwrap();
    push.connect(&endpoint).unwrap();

    push.send_multipart(["a", "b"], Mode::Blocking).unwrap();
    push.send_one("next", Mode::Blocking).unwrap();

    assert_eq!(
        pull.recv_multipart(Mode::Blocking).unwrap(),
        vec![Bytes::from_static(b"a"), Bytes::from_static(b"b")]
    );
    assert_eq!(
        pull.recv_multipart(Mode::Blocking).unwrap(),
        vec![Bytes::from_static(b"next")]
    );
}

#[test]
fn test_iter_parts_stops_at_message_end() {
    let ctx = common::context();
    let endpoint = common::inproc("iter");
    let mut pull = ctx.socket("pull").unwrap();
    pull.bind(&endpoint).unwrap();
    let push = ctx.socket("push").unwrap();
    push.connect(&endpoint).unwrap();

    push.send_multipart(["one", "two", "three"], Mode::Blocking).unwrap();
    push.send_one("second message", Mode::Blocking).unwrap();

    let first: Vec<Bytes> = pull
        .iter_parts(Mode::Blocking)
        .collect::<lzmq::Result<_>>()
        .unwrap();
    assert_eq!(first, vec!["one", "two", "three"]);

    let mut parts = pull.iter_parts(Mode::Blocking);
    assert_eq!(parts.next().unwrap().unwrap(), "second message");
    assert!(parts.next().is_none());
    assert!(parts.next().is_none());
}

#[test]
fn test_iter_parts_ends_after_error() {
    let ctx = common::context();
    let mut pull = ctx.socket("pull").unwrap();
    pull.bind(&common::inproc("iter-empty")).unwrap();

    let mut parts = pull.iter_parts(Mode::NonBlocking);
    assert!(matches!(parts.next(), Some(Err(LzmqError::WouldBlock))));
    assert!(parts.next().is_none());
}

#[test]
fn test_nonblocking_would_block() {
    let ctx = common::context();
    let pull = ctx.socket("pull").unwrap();
    pull.bind(&common::inproc("idle")).unwrap();
    let err = pull.recv_one(Mode::NonBlocking).unwrap_err();
    assert!(err.is_would_block());
    assert!(matches!(
        pull.recv_multipart(Mode::NonBlocking),
        Err(LzmqError::WouldBlock)
    ));

    // No peer: a push socket cannot queue anything
    let push = ctx.socket("push").unwrap();
    assert!(matches!(
        push.send_one("x", Mode::NonBlocking),
        Err(LzmqError::WouldBlock)
    ));
}

#[test]
fn test_multipart_failure_on_first_part_is_raw() {
    let ctx = common::context();
    let push = ctx.socket("push").unwrap();
    let err = push
        .send_multipart(["a", "b", "c"], Mode::NonBlocking)
        .unwrap_err();
    assert!(matches!(err, LzmqError::WouldBlock));
    assert_eq!(err.parts_sent(), 0);
}

#[test]
fn test_multipart_failure_after_first_part_is_incomplete() {
    let ctx = common::context();
    let endpoint = common::inproc("incomplete");
    let pull = ctx.socket("pull").unwrap();
    pull.bind(&endpoint).unwrap();
    let mut push = ctx.socket("push").unwrap();
    push.connect(&endpoint).unwrap();

    let receiver = thread::spawn(move || {
        let mut pull = pull;
        let result = pull.recv_multipart(Mode::Blocking);
        pull.close();
        result
    });

    // The send loop looks one part ahead, so pulling the third part happens
    // after the first was accepted and before the second is sent.
    let mut terminator = None;
    let parts = (0..3).map(|i| {
        if i == 2 {
            let handle = ctx.clone();
            terminator = Some(thread::spawn(move || handle.term()));
            while !ctx.is_terminated() {
                thread::yield_now();
            }
            thread::sleep(Duration::from_millis(50));
        }
        format!("part-{i}")
    });

    let err = push.send_multipart(parts, Mode::Blocking).unwrap_err();
    assert!(matches!(
        err,
        LzmqError::Incomplete { sent: 1, ref source }
            if matches!(**source, LzmqError::ContextTerminated)
    ));
    assert_eq!(err.parts_sent(), 1);
    assert!(err.is_handle_error());

    push.close();
    // An unfinished message is never delivered
    let received = receiver.join().unwrap();
    assert!(matches!(received, Err(LzmqError::ContextTerminated)));
    let terminated = terminator.take().unwrap().join().unwrap();
    assert!(terminated.is_ok());
}

#[test]
fn test_empty_multipart_is_rejected() {
    let ctx = common::context();
    let push = ctx.socket("push").unwrap();
    let err = push
        .send_multipart(Vec::<Vec<u8>>::new(), Mode::Blocking)
        .unwrap_err();
    assert!(matches!(err, LzmqError::EmptyMessage));
}

#[test]
fn test_zero_length_message_is_valid() {
    let ctx = common::context();
    let endpoint = common::inproc("empty");
    let pair_a = ctx.socket("pair").unwrap();
    pair_a.bind(&endpoint).unwrap();
    let pair_b = ctx.socket("pair").unwrap();
    pair_b.connect(&endpoint).unwrap();

    pair_b.send_one(b"", Mode::Blocking).unwrap();
    let part = pair_a.recv_one(Mode::Blocking).unwrap();
    assert!(part.data.is_empty());
    assert!(!part.has_more());
}

#[test]
fn test_pub_sub_filtering() {
    let ctx = common::context();
    let endpoint = common::inproc("pubsub");
    let publisher = ctx.socket("pub").unwrap();
    publisher.bind(&endpoint).unwrap();
    let subscriber = ctx.socket("sub").unwrap();
    subscriber.set_option("subscribe", "weather").unwrap();
    subscriber.connect(&endpoint).unwrap();

    // Subscriptions propagate asynchronously; publish until one arrives.
    let received = loop {
        publisher.send_multipart(["sports", "0-0"], Mode::Blocking).unwrap();
        publisher.send_multipart(["weather", "sunny"], Mode::Blocking).unwrap();
        match subscriber.recv_multipart(Mode::NonBlocking) {
            Ok(parts) => break parts,
            Err(LzmqError::WouldBlock) => thread::sleep(Duration::from_millis(5)),
            Err(e) => panic!("unexpected error: {e}"),
        }
    };
    assert_eq!(received, vec!["weather", "sunny"]);
}
