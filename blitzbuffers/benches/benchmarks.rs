use {
    blitzbuffers::{
        deserialize, record, scalar_enum, serialize, serialize_into, BufferBuilder,
        ChunkedBufferBuilder, FixedBufferBuilder,
    },
    criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput},
    rand::{rngs::StdRng, Rng, SeedableRng},
};

scalar_enum! {
    enum Color: u8 {
        None = 0,
        Red = 1,
        Green = 2,
        Blue = 3,
    }
}

record! {
    struct Vec3 {
        x: scalar<f32>,
        y: scalar<f32>,
        z: scalar<f32>,
    }
}

record! {
    struct Weapon {
        name: string,
        damage: scalar<i16>,
    }
}

record! {
    struct Monster {
        pos: inline<Vec3>,
        mana: scalar<i16>,
        hp: scalar<i16>,
        name: string,
        inventory: primitive_array<u8>,
        color: scalar<Color>,
        weapons: array<Weapon>,
        equipped: inline<Weapon>,
        path: array<Vec3>,
    }
}

record! {
    struct MonstersList {
        data: array<Monster>,
    }
}

fn random_name(rng: &mut StdRng) -> String {
    let len = rng.random_range(4..16);
    (0..len).map(|_| rng.random_range(b'a'..=b'z') as char).collect()
}

fn random_vec3(rng: &mut StdRng) -> Vec3 {
    Vec3 {
        x: rng.random(),
        y: rng.random(),
        z: rng.random(),
    }
}

fn random_weapon(rng: &mut StdRng) -> Weapon {
    Weapon {
        name: random_name(rng),
        damage: rng.random(),
    }
}

fn monsters(count: usize) -> MonstersList {
    let mut rng = StdRng::seed_from_u64(42);
    let data = (0..count)
        .map(|_| Monster {
            pos: random_vec3(&mut rng),
            mana: rng.random(),
            hp: rng.random(),
            name: random_name(&mut rng),
            inventory: (0..rng.random_range(0..10)).map(|_| rng.random()).collect(),
            color: match rng.random_range(0..4) {
                0 => Color::None,
                1 => Color::Red,
                2 => Color::Green,
                _ => Color::Blue,
            },
            weapons: (0..rng.random_range(0..4))
                .map(|_| random_weapon(&mut rng))
                .collect(),
            equipped: random_weapon(&mut rng),
            path: (0..rng.random_range(0..10))
                .map(|_| random_vec3(&mut rng))
                .collect(),
        })
        .collect();
    MonstersList { data }
}

fn bench_builders(c: &mut Criterion) {
    let mut group = c.benchmark_group("Builders");

    for count in [10, 100, 1000] {
        let list = monsters(count);
        let expected = serialize(&list).unwrap();
        group.throughput(Throughput::Bytes(expected.len() as u64));

        group.bench_with_input(BenchmarkId::new("fixed", count), &list, |b, list| {
            let mut builder = FixedBufferBuilder::new(expected.len()).unwrap();
            assert_eq!(serialize_into(&mut builder, list).unwrap(), &expected[..]);
            b.iter(|| serialize_into(black_box(&mut builder), black_box(list)).unwrap().len());
        });

        group.bench_with_input(BenchmarkId::new("chunked", count), &list, |b, list| {
            let mut builder = ChunkedBufferBuilder::default();
            assert_eq!(serialize_into(&mut builder, list).unwrap(), &expected[..]);
            b.iter(|| serialize_into(black_box(&mut builder), black_box(list)).unwrap().len());
        });

        group.bench_with_input(
            BenchmarkId::new("chunked/in_place", count),
            &list,
            |b, list| {
                let mut builder = ChunkedBufferBuilder::default();
                b.iter(|| {
                    builder.clear();
                    let mut root = MonstersList::new_on(&mut builder).unwrap();
                    let mut data = root.insert_data(list.data.len()).unwrap();
                    for (i, monster) in list.data.iter().enumerate() {
                        data.get(i).unwrap().set(black_box(monster)).unwrap();
                    }
                    builder.finalize().unwrap().len()
                });
            },
        );
    }

    group.finish();
}

fn bench_views(c: &mut Criterion) {
    let mut group = c.benchmark_group("Views");

    for count in [10, 100, 1000] {
        let bytes = serialize(&monsters(count)).unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(BenchmarkId::new("visit", count), &bytes, |b, bytes| {
            b.iter(|| {
                let list = MonstersList::view(black_box(bytes));
                list.data()
                    .iter()
                    .map(|m| {
                        m.hp() as i64
                            + m.name().len() as i64
                            + m.inventory().iter().map(i64::from).sum::<i64>()
                            + m.weapons().iter().map(|w| w.damage() as i64).sum::<i64>()
                    })
                    .sum::<i64>()
            });
        });

        group.bench_with_input(BenchmarkId::new("deserialize", count), &bytes, |b, bytes| {
            b.iter(|| deserialize::<MonstersList>(black_box(bytes)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_builders, bench_views);
criterion_main!(benches);
