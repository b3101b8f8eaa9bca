use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use aes_core::{cbc_decrypt, cbc_encrypt, encrypt_block, expand_key_bytes};

fn bench_block(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::from_seed([3u8; 32]);
    let mut group = c.benchmark_group("block");
    for key_len in [16usize, 24, 32] {
        let mut key = vec![0u8; key_len];
        rng.fill_bytes(&mut key);
        let round_keys = expand_key_bytes(&key).expect("valid key length");
        let mut block = [0u8; 16];
        rng.fill_bytes(&mut block);

        group.bench_with_input(
            BenchmarkId::new("encrypt_block", key_len * 8),
            &block,
            |b, block| b.iter(|| encrypt_block(block, &round_keys)),
        );
        group.bench_with_input(
            BenchmarkId::new("expand_key", key_len * 8),
            &key,
            |b, key| b.iter(|| expand_key_bytes(key)),
        );
    }
    group.finish();
}

fn bench_cbc(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::from_seed([4u8; 32]);
    let round_keys = expand_key_bytes(&[7u8; 32]).expect("valid key length");
    let iv = [1u8; 16];
    let mut data = vec![0u8; 64 * 1024];
    rng.fill_bytes(&mut data);
    let ciphertext = cbc_encrypt(&data, &iv, &round_keys).expect("aligned input");

    let mut group = c.benchmark_group("cbc");
    group.sample_size(20);
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("encrypt_64k", |b| {
        b.iter(|| cbc_encrypt(&data, &iv, &round_keys));
    });
    group.bench_function("decrypt_64k", |b| {
        b.iter(|| cbc_decrypt(&ciphertext, &iv, &round_keys));
    });
    group.finish();
}

criterion_group!(benches, bench_block, bench_cbc);
criterion_main!(benches);
