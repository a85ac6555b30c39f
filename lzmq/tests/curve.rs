//! CURVE key management tests

mod common;

use lzmq::curve::{
    configure_client, configure_server, has_curve, z85_decode, z85_encode, KEY_SIZE,
    KEY_TEXT_SIZE,
};
use lzmq::{KeyPair, LzmqError, Mode, OptionValue};

/// ZMQ_CURVE security mechanism
const MECHANISM_CURVE: i64 = 2;

fn sample_key(seed: u8) -> [u8; KEY_SIZE] {
    let mut key = [0u8; KEY_SIZE];
    for (i, byte) in key.iter_mut().enumerate() {
        *byte = seed.wrapping_add(i as u8).wrapping_mul(31);
    }
    key
}

#[test]
fn test_import_round_trips_text() {
    let public_text = z85_encode(&sample_key(1)).unwrap();
    let secret_text = z85_encode(&sample_key(2)).unwrap();
    assert_eq!(public_text.len(), KEY_TEXT_SIZE);

    let pair = KeyPair::import(&public_text, &secret_text).unwrap();
    assert_eq!(pair.public_key(), &sample_key(1));
    assert_eq!(pair.secret_key(), &sample_key(2));
    assert_eq!(pair.public_text(), public_text);
    assert_eq!(z85_encode(&z85_decode(&public_text).unwrap()).unwrap(), public_text);
}

#[test]
fn test_import_rejects_oversized_text() {
    let valid = z85_encode(&sample_key(3)).unwrap();
    let oversized = format!("{valid}0");

    let err = KeyPair::import(&oversized, &valid).unwrap_err();
    assert!(matches!(err, LzmqError::KeySize { expected: 40, actual: 41 }));
    let err = KeyPair::import(&valid, &oversized).unwrap_err();
    assert!(matches!(err, LzmqError::KeySize { expected: 40, actual: 41 }));
}

#[test]
fn test_import_rejects_undecodable_text() {
    let valid = z85_encode(&sample_key(4)).unwrap();
    // Z85 text length must be a multiple of 5
    assert!(matches!(
        KeyPair::import("abc", &valid),
        Err(LzmqError::InvalidKey(_))
    ));
    assert!(matches!(
        KeyPair::import(&valid, &valid[..35]),
        Err(LzmqError::InvalidKey(_))
    ));
}

#[test]
fn test_import_rejects_text_outside_alphabet() {
    // Right length, but '~' is not a Z85 character
    let bogus = "~".repeat(KEY_TEXT_SIZE);
    assert!(matches!(
        KeyPair::import(&bogus, &bogus),
        Err(LzmqError::InvalidKey(_))
    ));
    assert!(matches!(z85_decode(&bogus), Err(LzmqError::InvalidKey(_))));
}

#[test]
fn test_role_configuration_rejects_undecodable_keys() {
    let ctx = common::context();
    let socket = ctx.socket("req").unwrap();

    let bogus = "~".repeat(KEY_TEXT_SIZE);
    assert!(matches!(
        configure_client(&socket, &bogus),
        Err(LzmqError::InvalidKey(_))
    ));
    assert!(matches!(
        configure_server(&socket, &bogus),
        Err(LzmqError::InvalidKey(_))
    ));
    // Valid Z85 that decodes to 8 bytes
    assert!(matches!(
        configure_server(&socket, "HelloWorld"),
        Err(LzmqError::InvalidKey(_))
    ));
}

#[test]
fn test_role_configuration_validates_key_length() {
    let ctx = common::context();
    let socket = ctx.socket("req").unwrap();

    let short = "x".repeat(KEY_TEXT_SIZE - 1);
    assert!(matches!(
        configure_client(&socket, &short),
        Err(LzmqError::KeySize {
            expected: 40,
            actual: 39
        })
    ));

    let long = "x".repeat(KEY_TEXT_SIZE + 1);
    assert!(matches!(
        configure_server(&socket, &long),
        Err(LzmqError::KeySize {
            expected: 40,
            actual: 41
        })
    ));
}

#[test]
fn test_generated_pairs_are_unique() {
    if !has_curve() {
        println!("Skipping CURVE test - engine built without curve");
        return;
    }
    let a = KeyPair::generate().unwrap();
    let b = KeyPair::generate().unwrap();
    assert_ne!(a.public_key(), b.public_key());
    assert_eq!(a.public_text().len(), KEY_TEXT_SIZE);
    assert_eq!(a.secret_text().len(), KEY_TEXT_SIZE);

    let imported = KeyPair::import(a.public_text(), a.secret_text()).unwrap();
    assert_eq!(imported, a);
}

#[test]
fn test_encrypted_req_rep() {
    if !has_curve() {
        println!("Skipping CURVE test - engine built without curve");
        return;
    }
    let ctx = common::context();
    let server_keys = KeyPair::generate().unwrap();

    let server = ctx.socket("rep").unwrap();
    configure_server(&server, server_keys.secret_text()).unwrap();
    server.bind(common::TCP_ANY).unwrap();
    let endpoint = server.last_endpoint().unwrap();
    assert_eq!(
        server.get_option("curve-server").unwrap(),
        OptionValue::Bool(true)
    );

    let client = ctx.socket("req").unwrap();
    let client_keys = configure_client(&client, server_keys.public_text()).unwrap();
    assert_ne!(client_keys.public_key(), server_keys.public_key());
    client.connect(&endpoint).unwrap();

    assert_eq!(
        client.get_option("mechanism").unwrap(),
        OptionValue::Int(MECHANISM_CURVE)
    );

    client.send_one("secret ping", Mode::Blocking).unwrap();
    assert_eq!(server.recv_one(Mode::Blocking).unwrap().data(), b"secret ping");
    server.send_one("secret pong", Mode::Blocking).unwrap();
    assert_eq!(client.recv_one(Mode::Blocking).unwrap().data(), b"secret pong");
}
