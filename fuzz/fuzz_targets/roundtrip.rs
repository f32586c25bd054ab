#![no_main]

use {
    arbitrary::Arbitrary,
    blitzbuffers::{
        deserialize, record, scalar_enum, serialize, serialize_into, ChunkedBufferBuilder, Error,
        FixedBufferBuilder,
    },
    libfuzzer_sys::fuzz_target,
};

scalar_enum! {
    #[derive(Arbitrary)]
    enum Color: u8 {
        None = 0,
        Red = 1,
        Green = 2,
        Blue = 3,
    }
}

record! {
    #[derive(Arbitrary)]
    struct Vec3 {
        x: scalar<f32>,
        y: scalar<f32>,
        z: scalar<f32>,
    }
}

record! {
    #[derive(Arbitrary)]
    struct Weapon {
        name: string,
        damage: scalar<i16>,
    }
}

record! {
    #[derive(Arbitrary)]
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
        alive: scalar<bool>,
    }
}

record! {
    #[derive(Arbitrary)]
    struct MonstersList {
        data: array<Monster>,
    }
}

#[derive(Debug, Arbitrary)]
struct Input {
    list: MonstersList,
    chunk_size: u8,
}

fuzz_target!(|input: Input| {
    let expected = match serialize(&input.list) {
        Ok(bytes) => bytes,
        Err(Error::InteriorTerminator { .. }) => return,
        Err(error) => panic!("serialize failed: {error}"),
    };

    let mut chunked = ChunkedBufferBuilder::new(usize::from(input.chunk_size));
    let bytes = serialize_into(&mut chunked, &input.list).expect("chunked serialize");
    assert_eq!(bytes, &expected[..], "chunked output differs");

    let mut fixed = FixedBufferBuilder::new(expected.len()).expect("allocate");
    let bytes = serialize_into(&mut fixed, &input.list).expect("fixed serialize");
    assert_eq!(bytes, &expected[..], "fixed output differs");

    // Floats may be NaN, so compare the re-encoding rather than the values.
    let value: MonstersList = deserialize(&expected).expect("deserialize");
    assert_eq!(serialize(&value).expect("reserialize"), expected);
});
