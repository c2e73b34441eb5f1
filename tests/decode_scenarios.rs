use std::sync::Arc;
use std::thread;

use oscwire::{Bundle, Message, MessageQueue, Packet, Parser, Timestamp, Value};

/// Hand-assemble a bundle so individual element sizes can be falsified.
fn raw_bundle(ticks: u64, elements: &[(i32, &[u8])]) -> Vec<u8> {
    let mut out = Bundle::new(Timestamp::new(ticks)).encode();
    for (size, body) in elements {
        out.extend_from_slice(&size.to_be_bytes());
        out.extend_from_slice(body);
    }
    out
}

fn element(message: &Message) -> (i32, Vec<u8>) {
    let bytes = message.encode();
    (bytes.len() as i32, bytes)
}

#[test]
fn vmc_ok_decodes_to_single_int() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"/VMC/Ext/OK\0");
    bytes.extend_from_slice(b",i\0\0");
    bytes.extend_from_slice(&1i32.to_be_bytes());

    let parser = Parser::new(MessageQueue::new());
    let mut pos = 0;
    parser
        .parse(&bytes, &mut pos, bytes.len(), Timestamp::IMMEDIATE)
        .unwrap();

    assert_eq!(pos, bytes.len());
    let msg = parser.queue().dequeue().unwrap();
    assert_eq!(msg.address(), "/VMC/Ext/OK");
    assert_eq!(msg.values(), &[Some(Value::Int(1))]);
}

#[test]
fn bone_pose_bundle_delivers_in_order() {
    let ts = Timestamp::new(0xE6A1_0000_8000_0000);
    let bundle = Bundle::new(ts)
        .with(Message::new(
            "/VMC/Ext/Root/Pos",
            vec![
                Value::from("root"),
                Value::Float(0.0),
                Value::Float(1.2),
                Value::Float(0.0),
                Value::Float(0.0),
                Value::Float(0.0),
                Value::Float(0.0),
                Value::Float(1.0),
            ],
        ))
        .with(Message::new(
            "/VMC/Ext/Bone/Pos",
            vec![Value::from("Hips"), Value::Float(0.5)],
        ));

    let parser = Parser::new(MessageQueue::new());
    parser.parse_packet(&bundle.encode()).unwrap();

    let first = parser.queue().dequeue().unwrap();
    let second = parser.queue().dequeue().unwrap();
    assert!(parser.queue().dequeue().is_none());

    assert_eq!(first.address(), "/VMC/Ext/Root/Pos");
    assert_eq!(first.values().len(), 8);
    assert_eq!(second.value(0).and_then(Value::as_str), Some("Hips"));
    assert_eq!(first.timestamp(), ts);
    assert_eq!(second.timestamp(), ts);
}

#[test]
fn nested_bundle_message_gets_inner_tag() {
    let inner = Bundle::new(Timestamp::new(200)).with(Message::new("/leaf", vec![Value::Int(3)]));
    let outer = Bundle::new(Timestamp::new(100)).with(inner);

    let parser = Parser::new(MessageQueue::new());
    parser.parse_packet(&Packet::from(outer).encode()).unwrap();

    let msg = parser.queue().dequeue().unwrap();
    assert_eq!(msg.address(), "/leaf");
    assert_eq!(msg.timestamp(), Timestamp::new(200));
}

#[test]
fn malformed_element_does_not_hide_sibling() {
    let (size, good) = element(&Message::new("/good", vec![Value::from("still here")]));
    let junk = [0x41u8; 6];
    let bytes = raw_bundle(9, &[(6, &junk[..]), (size, good.as_slice())]);

    let parser = Parser::new(MessageQueue::new());
    parser.parse_packet(&bytes).unwrap();

    let msg = parser.queue().dequeue().unwrap();
    assert_eq!(msg.address(), "/good");
    assert_eq!(msg.value(0).and_then(Value::as_str), Some("still here"));
    assert!(parser.queue().is_empty());
    assert_eq!(parser.snapshot().consistency_violations(), 1);
}

#[test]
fn overlong_declared_size_is_reported_once() {
    let (size, mut padded) = element(&Message::new("/a", vec![Value::Int(1)]));
    let (tail_size, tail) = element(&Message::new("/b", Vec::new()));
    padded.extend_from_slice(&[0; 8]);
    let bytes = raw_bundle(1, &[(size + 8, padded.as_slice()), (tail_size, tail.as_slice())]);

    let parser = Parser::new(MessageQueue::new());
    parser.parse_packet(&bytes).unwrap();

    let addresses: Vec<_> = parser
        .queue()
        .drain()
        .into_iter()
        .map(|m| m.address().to_owned())
        .collect();
    assert_eq!(addresses, ["/a", "/b"]);
    assert_eq!(parser.snapshot().size_mismatches, 1);
}

#[test]
fn empty_type_tags_are_not_the_none_sentinel() {
    let parser = Parser::new(MessageQueue::new());
    assert!(parser.queue().dequeue().is_none());

    parser.parse_packet(b"/foo\0\0\0\0,\0\0\0").unwrap();
    let msg = parser.queue().dequeue().expect("message, not none");
    assert_eq!(msg.address(), "/foo");
    assert!(msg.values().is_empty());
}

#[test]
fn truncated_packet_is_rejected_without_panicking() {
    let bytes = Message::new("/blob", vec![Value::from(vec![7u8; 32])]).encode();
    let parser = Parser::new(MessageQueue::new());

    for cut in 0..bytes.len() {
        assert!(parser.parse_packet(&bytes[..cut]).is_err(), "cut at {cut}");
    }
    assert!(parser.queue().is_empty());
    assert_eq!(parser.snapshot().decode_failures, bytes.len() as u64);
}

#[test]
fn concurrent_decoders_lose_nothing() {
    const PRODUCERS: usize = 8;
    const PER_PRODUCER: usize = 200;

    let parser = Arc::new(Parser::new(MessageQueue::new()));
    let handles: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let parser = Arc::clone(&parser);
            thread::spawn(move || {
                for i in 0..PER_PRODUCER {
                    let bytes =
                        Message::new(format!("/producer/{p}"), vec![Value::Int(i as i32)]).encode();
                    parser.parse_packet(&bytes).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let queue = parser.queue();
    assert_eq!(queue.len(), PRODUCERS * PER_PRODUCER);

    let mut seen = vec![Vec::new(); PRODUCERS];
    while let Some(msg) = queue.dequeue() {
        let p: usize = msg.address()["/producer/".len()..].parse().unwrap();
        seen[p].push(msg.value(0).and_then(Value::as_int).unwrap());
    }
    for values in seen {
        let expected: Vec<i32> = (0..PER_PRODUCER as i32).collect();
        assert_eq!(values, expected);
    }
    assert_eq!(parser.snapshot().messages_decoded, (PRODUCERS * PER_PRODUCER) as u64);
}
