//! Socket option dispatch tests

mod common;

use lzmq::{LzmqError, Mode, OptionKind, OptionValue};

#[test]
fn test_not_applicable_leaves_socket_unchanged() {
    let ctx = common::context();
    let req = ctx.socket("req").unwrap();
    req.set_option("linger", 100).unwrap();
    assert_eq!(req.get_option("linger").unwrap(), OptionValue::Int(100));

    let err = req.set_option("subscribe", "topic").unwrap_err();
    assert!(matches!(
        err,
        LzmqError::NotApplicable {
            option: "subscribe",
            ..
        }
    ));
    assert!(err.is_configuration_error());
    assert_eq!(req.get_option("linger").unwrap(), OptionValue::Int(100));

    let publisher = ctx.socket("pub").unwrap();
    assert!(matches!(
        publisher.get_option("routing-id"),
        Err(LzmqError::NotApplicable { .. })
    ));
}

#[test]
fn test_direction_is_checked() {
    let ctx = common::context();
    let sub = ctx.socket("sub").unwrap();
    assert!(matches!(
        sub.get_option("subscribe"),
        Err(LzmqError::NotReadable("subscribe"))
    ));
    assert!(matches!(
        sub.set_option("fd", 3),
        Err(LzmqError::NotWritable("fd"))
    ));
    assert!(matches!(
        sub.set_option("endpoint", "tcp://x"),
        Err(LzmqError::NotWritable("endpoint"))
    ));

    let fd = sub.get_option("fd").unwrap();
    assert!(fd.as_int().unwrap() >= 0);
}

#[test]
fn test_unknown_option() {
    let ctx = common::context();
    let socket = ctx.socket("dealer").unwrap();
    assert!(matches!(
        socket.get_option("threads"),
        Err(LzmqError::UnknownOption(ref n)) if n == "threads"
    ));
    assert!(matches!(
        socket.set_option("no-such-option", 1),
        Err(LzmqError::UnknownOption(_))
    ));
}

#[test]
fn test_wrong_value_kind_is_rejected() {
    let ctx = common::context();
    let socket = ctx.socket("dealer").unwrap();
    socket.set_option("linger", 5).unwrap();

    let err = socket.set_option("linger", "five").unwrap_err();
    assert!(matches!(
        err,
        LzmqError::InvalidValue {
            option: "linger",
            expected: OptionKind::Integer
        }
    ));
    assert!(matches!(
        socket.set_option("immediate", 1),
        Err(LzmqError::InvalidValue { .. })
    ));
    assert_eq!(socket.get_option("linger").unwrap(), OptionValue::Int(5));
}

#[test]
fn test_typed_round_trips() {
    let ctx = common::context();
    let dealer = ctx.socket("dealer").unwrap();

    dealer.set_option("routing-id", "worker-1").unwrap();
    assert_eq!(
        dealer.get_option("routing-id").unwrap().as_str(),
        Some("worker-1")
    );

    dealer.set_option("immediate", true).unwrap();
    assert_eq!(dealer.get_option("immediate").unwrap(), OptionValue::Bool(true));

    dealer.set_option("maxmsgsize", 1_i64 << 20).unwrap();
    assert_eq!(
        dealer.get_option("maxmsgsize").unwrap(),
        OptionValue::Int(1 << 20)
    );

    dealer.set_option("affinity", 3_i64).unwrap();
    assert_eq!(dealer.get_option("affinity").unwrap(), OptionValue::Int(3));

    dealer.set_option("send-hwm", 50).unwrap();
    assert_eq!(dealer.get_option("send-hwm").unwrap(), OptionValue::Int(50));

    assert_eq!(dealer.get_option("safe").unwrap(), OptionValue::Bool(false));
    assert_eq!(dealer.get_option("more").unwrap(), OptionValue::Bool(false));
}

#[test]
fn test_endpoint_reports_chosen_port() {
    let ctx = common::context();
    let rep = ctx.socket("rep").unwrap();
    rep.bind(common::TCP_ANY).unwrap();

    let endpoint = rep.last_endpoint().unwrap();
    let port = endpoint
        .strip_prefix("tcp://127.0.0.1:")
        .expect("loopback endpoint")
        .parse::<u16>()
        .unwrap();
    assert!(port > 0);
    assert_eq!(
        rep.get_option("endpoint").unwrap().as_str(),
        Some(endpoint.as_str())
    );
}

#[test]
fn test_recv_timeout_reports_would_block() {
    let ctx = common::context();
    let pull = ctx.socket("pull").unwrap();
    pull.bind(&common::inproc("timeo")).unwrap();
    pull.set_option("recv-timeo", 10).unwrap();

    assert!(matches!(
        pull.recv_one(Mode::Blocking),
        Err(LzmqError::WouldBlock)
    ));
}

#[test]
fn test_mandatory_routing_surfaces_engine_error() {
    let ctx = common::context();
    let router = ctx.socket("router").unwrap();
    router.bind(&common::inproc("mandatory")).unwrap();
    router.set_option("mandatory", true).unwrap();

    let err = router
        .send_multipart(["nobody", "hello"], Mode::Blocking)
        .unwrap_err();
    assert!(matches!(err, LzmqError::Engine(_)));
    assert_eq!(err.parts_sent(), 0);
}
