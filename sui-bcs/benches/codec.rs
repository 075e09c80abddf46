//! Encoding and decoding throughput for BCS primitives and Sui transactions.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sui_bcs::{
    ByteReader, ByteWriter, Deserializable, Deserializer, Serializable, Serializer,
    sui::{
        Argument, ObjectArg, ObjectDigest, ObjectRef, ProgrammableTransaction,
        ProgrammableTransactionBuilder, SequenceNumber, SuiAddress,
    },
};

const SEQUENCE_SIZES: [usize; 3] = [16, 256, 4096];

fn uleb128(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::from_seed([0u8; 32]);
    let values: Vec<u64> =
        (0..1024).map(|_| rng.next_u64() >> rng.random_range(0..64u32)).collect();

    let mut serializer = Serializer::new();
    for value in &values {
        serializer.write_uleb128(*value);
    }
    let encoded = serializer.into_bytes();

    let mut group = c.benchmark_group("uleb128");
    group.throughput(Throughput::Elements(values.len() as u64));
    group.bench_function("encode", |b| {
        b.iter(|| {
            let mut serializer = Serializer::with_capacity(encoded.len());
            for value in &values {
                serializer.write_uleb128(black_box(*value));
            }
            serializer
        })
    });
    group.bench_function("decode", |b| {
        b.iter(|| {
            let mut deserializer = Deserializer::new(black_box(&encoded));
            for _ in 0..values.len() {
                black_box(deserializer.read_uleb128_u64().unwrap());
            }
        })
    });
    group.finish();
}

fn arguments(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::from_seed([1u8; 32]);
    let mut group = c.benchmark_group("argument sequence");

    for size in SEQUENCE_SIZES {
        let args: Vec<Argument> = (0..size).map(|_| random_argument(&mut rng)).collect();
        let bytes = args.to_bytes().unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(BenchmarkId::new("encode", size), &args, |b, args| {
            b.iter(|| black_box(args).to_bytes().unwrap())
        });
        group.bench_with_input(BenchmarkId::new("decode", size), &bytes, |b, bytes| {
            b.iter(|| Vec::<Argument>::read_from_bytes(black_box(bytes)).unwrap())
        });
    }
    group.finish();
}

fn transactions(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::from_seed([2u8; 32]);
    let mut group = c.benchmark_group("programmable transaction");

    for size in SEQUENCE_SIZES {
        let transaction = random_transaction(&mut rng, size);
        let bytes = transaction.to_bytes().unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(BenchmarkId::new("encode", size), &transaction, |b, tx| {
            b.iter(|| black_box(tx).to_bytes().unwrap())
        });
        group.bench_with_input(BenchmarkId::new("decode", size), &bytes, |b, bytes| {
            b.iter(|| ProgrammableTransaction::read_from_bytes(black_box(bytes)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(codec_group, uleb128, arguments, transactions);
criterion_main!(codec_group);

// HELPER FUNCTIONS
// --------------------------------------------------------------------------------------------

fn random_argument<R: Rng>(rng: &mut R) -> Argument {
    match rng.random_range(0..4) {
        0 => Argument::GasCoin,
        1 => Argument::Input(rng.random()),
        2 => Argument::Result(rng.random()),
        _ => Argument::NestedResult(rng.random(), rng.random()),
    }
}

fn random_owned_object<R: Rng>(rng: &mut R) -> ObjectArg {
    ObjectArg::ImmOrOwnedObject(ObjectRef {
        object_id: SuiAddress::new(rng.random()),
        version: SequenceNumber(rng.random()),
        digest: ObjectDigest::new(rng.random()),
    })
}

/// Builds a transaction that splits `size` owned coins and merges the parts into one.
fn random_transaction<R: Rng>(rng: &mut R, size: usize) -> ProgrammableTransaction {
    let mut builder = ProgrammableTransactionBuilder::new();
    let target = builder.obj(random_owned_object(rng)).unwrap();

    for _ in 0..size {
        let coin = builder.obj(random_owned_object(rng)).unwrap();
        let Argument::Result(split) = builder.split_coins(coin, &[rng.random()]).unwrap() else {
            unreachable!("commands produce results");
        };
        builder.merge_coins(target, vec![Argument::NestedResult(split, 0)]).unwrap();
    }
    builder.transfer_objects(SuiAddress::new(rng.random()), vec![target]).unwrap();
    builder.finish()
}
