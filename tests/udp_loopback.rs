use std::net::SocketAddr;
use std::time::{Duration, Instant};

use oscwire::{Bundle, Client, Message, Server, ServerConfig, Timestamp, Value};

fn loopback_server() -> Server {
    let config = ServerConfig {
        poll_interval: Duration::from_millis(20),
        ..ServerConfig::with_bind_addr(SocketAddr::from(([127, 0, 0, 1], 0)))
    };
    Server::bind(config).unwrap()
}

fn wait_for(server: &Server, count: usize) -> Vec<Message> {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut received = Vec::new();
    while received.len() < count && Instant::now() < deadline {
        match server.dequeue() {
            Some(msg) => received.push(msg),
            None => std::thread::sleep(Duration::from_millis(5)),
        }
    }
    received
}

#[test]
fn message_and_bundle_round_trip_over_udp() {
    let server = loopback_server();
    let client = Client::connect(server.local_addr()).unwrap();

    client
        .send_message("/VMC/Ext/OK", vec![Value::Int(1)])
        .unwrap();
    client
        .send_bundle(
            &Bundle::new(Timestamp::new(77))
                .with(Message::new("/VMC/Ext/Blend/Val", vec![Value::from("A"), Value::Float(0.5)]))
                .with(Message::new("/VMC/Ext/Blend/Apply", Vec::new())),
        )
        .unwrap();

    let received = wait_for(&server, 3);
    assert_eq!(received.len(), 3);
    assert_eq!(received[0].address(), "/VMC/Ext/OK");
    assert!(received[0].timestamp().is_immediate());
    assert_eq!(
        received[1].values(),
        &[Some(Value::from("A")), Some(Value::Float(0.5))]
    );
    assert_eq!(received[2].timestamp(), Timestamp::new(77));
    assert_eq!(server.diagnostics().messages_decoded, 3);

    server.shutdown().unwrap();
}

#[test]
fn garbage_datagram_keeps_receiver_alive() {
    let server = loopback_server();
    let raw = oscwire::transport::SocketBinding::bind(SocketAddr::from(([127, 0, 0, 1], 0))).unwrap();

    // Same socket for both, so the garbage is decoded first.
    raw.send_to(b"/x\0", server.local_addr()).unwrap();
    raw.send_to(&Message::new("/after", Vec::new()).encode(), server.local_addr())
        .unwrap();

    let received = wait_for(&server, 1);
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].address(), "/after");
    assert!(server.is_running());
    assert_eq!(server.diagnostics().decode_failures, 1);
}

#[test]
fn small_buffer_setting_does_not_truncate_datagrams() {
    let config = ServerConfig {
        buffer_size: 16,
        poll_interval: Duration::from_millis(20),
        ..ServerConfig::with_bind_addr(SocketAddr::from(([127, 0, 0, 1], 0)))
    };
    let server = Server::bind(config).unwrap();
    let client = Client::connect(server.local_addr()).unwrap();

    let bundle = Bundle::new(Timestamp::new(5))
        .with(Message::new("/first", vec![Value::Int(1)]))
        .with(Message::new("/second", vec![Value::from(vec![9u8; 40])]));
    client.send_bundle(&bundle).unwrap();

    let received = wait_for(&server, 2);
    assert_eq!(received.len(), 2);
    assert_eq!(received[1].value(0).and_then(Value::as_blob).map(|b| b.len()), Some(40));
    assert_eq!(server.diagnostics().decode_failures, 0);
}

#[test]
fn oversized_packet_is_refused_before_sending() {
    let client = Client::connect(SocketAddr::from(([127, 0, 0, 1], 9))).unwrap();
    let blob = vec![0u8; oscwire::transport::MAX_DATAGRAM_SIZE];
    let err = client
        .send_message("/big", vec![Value::from(blob)])
        .unwrap_err();
    assert!(matches!(err, oscwire::TransportError::PacketTooLarge { .. }));
}
