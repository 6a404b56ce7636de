//! Microbenchmarks for the hot protocol paths: key derivation, the cipher
//! transform, and the frame codec.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use drift_plc::{cipher, inbound_key, outbound_key, Frame, KeyFragment};

fn bench_key_derivation(c: &mut Criterion) {
    let own = KeyFragment::new(*b"ABCDEFGH");
    let peer = KeyFragment::new(*b"12345678");

    c.bench_function("outbound_key", |b| {
        b.iter(|| outbound_key(black_box(&own)))
    });

    c.bench_function("inbound_key", |b| {
        b.iter(|| inbound_key(black_box(&own), black_box(&peer)))
    });
}

fn bench_cipher(c: &mut Criterion) {
    let key = outbound_key(&KeyFragment::new(*b"ABCDEFGH"));
    let command = [0x05u8, 0x10, 0x00, 0x00, 0x00, 0x01];
    let ciphertext = cipher::encrypt(&key, &command);

    c.bench_function("encrypt_command", |b| {
        b.iter(|| cipher::encrypt(black_box(&key), black_box(&command)))
    });

    c.bench_function("decrypt_response", |b| {
        b.iter(|| cipher::decrypt(black_box(&key), black_box(&ciphertext)).unwrap())
    });
}

fn bench_frame_codec(c: &mut Criterion) {
    let fragment = KeyFragment::new(*b"ABCDEFGH");
    let frame = Frame::new(fragment, vec![0x5A; 16]);
    let bytes = frame.to_bytes().unwrap();

    c.bench_function("frame_encode", |b| {
        b.iter(|| black_box(&frame).to_bytes().unwrap())
    });

    c.bench_function("frame_decode", |b| {
        b.iter(|| Frame::from_bytes(black_box(&bytes)).unwrap())
    });
}

criterion_group!(benches, bench_key_derivation, bench_cipher, bench_frame_codec);
criterion_main!(benches);
