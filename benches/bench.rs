use criterion::{BenchmarkGroup, Criterion, criterion_group, criterion_main, measurement::Measurement};

use prime_sieve::{first_primes, hazmat::estimate_upper_bound, primes_up_to};

fn bench_sieve<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.bench_function("Primes up to 10^6", |b| {
        b.iter(|| primes_up_to(1_000_000).unwrap().for_each(drop))
    });

    group.bench_function("Primes up to 10^7", |b| {
        b.iter(|| primes_up_to(10_000_000).unwrap().for_each(drop))
    });

    group.bench_function("First 10^5 primes", |b| {
        b.iter(|| first_primes(100_000).unwrap().for_each(drop))
    });

    // The production phase stops early, so this is dominated by allocation and marking.
    group.bench_function("First 10 primes of a 10^7 sieve", |b| {
        b.iter(|| prime_sieve::hazmat::sieve(10_000_000, Some(10)).unwrap().for_each(drop))
    });
}

fn bench_bound<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.bench_function("Upper bound estimate", |b| {
        b.iter(|| estimate_upper_bound(std::hint::black_box(1_000_000)).unwrap())
    });
}

#[cfg(feature = "multicore")]
fn bench_multicore<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    let threadcount = num_cpus::get();
    group.bench_function(format!("Primes up to 10^7, {threadcount} threads"), |b| {
        b.iter(|| {
            prime_sieve::multicore::sieve(10_000_000, None, threadcount)
                .unwrap()
                .for_each(drop)
        })
    });
}

#[cfg(not(feature = "multicore"))]
fn bench_multicore<M: Measurement>(_group: &mut BenchmarkGroup<'_, M>) {}

fn bench_prime_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("prime generation");
    group.sample_size(20);
    bench_sieve(&mut group);
    bench_bound(&mut group);
    bench_multicore(&mut group);
    group.finish();
}

criterion_group!(benches, bench_prime_generation);
criterion_main!(benches);
