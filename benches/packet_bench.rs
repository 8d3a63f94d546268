use bytes::BytesMut;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use robot_protocol::core::codec::PacketCodec;
use robot_protocol::core::packet::{self, Command, Packet};
use tokio_util::codec::{Decoder, Encoder};

#[allow(clippy::unwrap_used)]
fn bench_packet_encode_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("packet_encode_decode");
    let body_sizes = [0usize, 3, 9, 64, 255];

    for &size in &body_sizes {
        group.throughput(Throughput::Bytes((size + 5) as u64));
        group.bench_function(format!("encode_{size}b"), |b| {
            b.iter_batched(
                || {
                    let mut pkt = Packet::new();
                    pkt.set_sequence(1);
                    pkt.set_command(Command::Drive);
                    pkt.set_body(&vec![0x5A; size]).unwrap();
                    pkt
                },
                |pkt| {
                    let mut buf = BytesMut::with_capacity(size + 16);
                    let mut codec = PacketCodec;
                    codec.encode(pkt, &mut buf).unwrap();
                },
                BatchSize::SmallInput,
            )
        });

        let mut pkt = Packet::new();
        pkt.set_sequence(1);
        pkt.set_command(Command::Drive);
        pkt.set_body(&vec![0x5A; size]).unwrap();
        let bytes = pkt.serialize();

        group.bench_function(format!("decode_{size}b"), |b| {
            b.iter_batched(
                || BytesMut::from(&bytes[..]),
                |mut buf| {
                    let mut codec = PacketCodec;
                    let decoded = codec.decode(&mut buf);
                    assert!(decoded.is_ok());
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

#[allow(clippy::unwrap_used)]
fn bench_checksum(c: &mut Criterion) {
    let mut group = c.benchmark_group("checksum");

    for &size in &[8usize, 64, 260] {
        let buf = vec![0xA5u8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_function(format!("popcount_{size}b"), |b| {
            b.iter(|| packet::checksum(&buf))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_packet_encode_decode, bench_checksum);
criterion_main!(benches);
