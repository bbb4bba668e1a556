//! End-to-end pipeline tests: outbound split/encode through a simulated
//! server relay, back through inbound classification and reassembly.

use bytes::Bytes;
use peerlink_client::{InboundEvent, Pipeline};
use peerlink_core::{codec, Envelope, MessageKind, PeerConfig, ServerMessageKind, Value};

fn patterned_payload(len: usize) -> Bytes {
    Bytes::from((0..len).map(|i| (i % 251) as u8).collect::<Vec<u8>>())
}

/// The signaling server re-tags relayed room data from ROOM_SEND_DATA
/// to ROOM_DATA before fanning it out; do the same here.
fn relay(frame: &[u8]) -> Vec<u8> {
    let mut envelope = codec::decode(frame).expect("outbound frame decodes");
    envelope.kind = MessageKind::Server(ServerMessageKind::RoomData);
    codec::encode(&envelope).expect("relay re-encode").to_vec()
}

#[tokio::test]
async fn test_small_payload_roundtrip() {
    let config = PeerConfig::default();
    let (pipeline, mut deliveries) = Pipeline::new(&config);

    let payload = patterned_payload(128);
    let frames = pipeline.encode_outbound(payload.clone()).unwrap();
    assert_eq!(frames.len(), 1);

    pipeline.ingest(&relay(&frames[0])).unwrap();

    match deliveries.recv().await.expect("delivery arrives") {
        InboundEvent::Data(data) => assert_eq!(data, payload),
        other => panic!("expected data delivery, got {other:?}"),
    }
}

#[tokio::test]
async fn test_oversized_payload_chunked_roundtrip() {
    let config = PeerConfig::default();
    let (pipeline, mut deliveries) = Pipeline::new(&config);

    let payload = patterned_payload(40_000);
    let frames = pipeline.encode_outbound(payload.clone()).unwrap();
    assert_eq!(frames.len(), 3);

    // every frame fits under the transport ceiling, envelope included
    for frame in &frames {
        assert!(frame.len() <= peerlink_core::MAX_FRAME_SIZE);
    }

    // deliver out of order
    for i in [2usize, 0, 1] {
        pipeline.ingest(&relay(&frames[i])).unwrap();
    }

    match deliveries.recv().await.expect("delivery arrives") {
        InboundEvent::Data(data) => assert_eq!(data, payload),
        other => panic!("expected data delivery, got {other:?}"),
    }
    assert_eq!(pipeline.pending_reassemblies(), 0);
}

#[tokio::test]
async fn test_signaling_frames_pass_through() {
    let config = PeerConfig::default();
    let (pipeline, mut deliveries) = Pipeline::new(&config);

    let envelope = Envelope::new(
        MessageKind::Server(ServerMessageKind::Offer),
        Value::String("v=0...".to_string()),
    );
    let frame = codec::encode(&envelope).unwrap();

    pipeline.ingest(&frame).unwrap();

    match deliveries.recv().await.expect("delivery arrives") {
        InboundEvent::Signal(signal) => {
            assert_eq!(signal.kind.name(), "OFFER");
            assert_eq!(signal.payload.as_str(), Some("v=0..."));
        }
        other => panic!("expected signal delivery, got {other:?}"),
    }
}

#[tokio::test]
async fn test_garbage_frames_are_dropped_not_fatal() {
    let config = PeerConfig::default();
    let (pipeline, mut deliveries) = Pipeline::new(&config);

    pipeline.ingest(&[0xC1, 0xFF, 0x00]).unwrap();
    pipeline.ingest(&[]).unwrap();

    // pipeline still works afterwards
    let payload = patterned_payload(64);
    let frames = pipeline.encode_outbound(payload.clone()).unwrap();
    pipeline.ingest(&relay(&frames[0])).unwrap();

    match deliveries.recv().await.expect("delivery arrives") {
        InboundEvent::Data(data) => assert_eq!(data, payload),
        other => panic!("expected data delivery, got {other:?}"),
    }
}

#[tokio::test]
async fn test_encode_signal_from_json() {
    let config = PeerConfig::default();
    let (pipeline, _deliveries) = Pipeline::new(&config);

    let frame = pipeline
        .encode_signal(
            peerlink_core::ClientMessageKind::SendOffer,
            serde_json::json!({"sdp": "v=0...", "trickle": true, "seq": 1}),
        )
        .unwrap();

    let envelope = codec::decode(&frame).unwrap();
    assert_eq!(envelope.kind.name(), "SEND_OFFER");
    let Value::Map(map) = envelope.payload else {
        panic!("expected map payload");
    };
    assert_eq!(map["sdp"], Value::String("v=0...".to_string()));
    assert_eq!(map["trickle"], Value::Bool(true));
    assert_eq!(map["seq"], Value::Int(1));
}

#[tokio::test]
async fn test_closed_channel_surfaces_error() {
    let config = PeerConfig::default();
    let (pipeline, deliveries) = Pipeline::new(&config);
    drop(deliveries);

    let frames = pipeline.encode_outbound(patterned_payload(16)).unwrap();
    let result = pipeline.ingest(&relay(&frames[0]));
    assert!(result.is_err());
}

#[tokio::test]
async fn test_duplicate_chunks_do_not_duplicate_delivery() {
    let config = PeerConfig::default();
    let (pipeline, mut deliveries) = Pipeline::new(&config);

    let payload = patterned_payload(40_000);
    let frames = pipeline.encode_outbound(payload.clone()).unwrap();

    pipeline.ingest(&relay(&frames[0])).unwrap();
    pipeline.ingest(&relay(&frames[0])).unwrap(); // duplicate
    pipeline.ingest(&relay(&frames[1])).unwrap();
    pipeline.ingest(&relay(&frames[2])).unwrap();

    match deliveries.recv().await.expect("delivery arrives") {
        InboundEvent::Data(data) => assert_eq!(data, payload),
        other => panic!("expected data delivery, got {other:?}"),
    }

    // exactly one delivery
    assert!(deliveries.try_recv().is_err());
}
