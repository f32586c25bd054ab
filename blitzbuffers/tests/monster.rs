use {
    blitzbuffers::{
        deserialize, offset::read_scalar, record, scalar_enum, serialize, serialize_into,
        BufferBuilder, ChunkedBufferBuilder, Error, FixedBufferBuilder, Record,
    },
    proptest::{prelude::*, test_runner::Config},
};

scalar_enum! {
    pub enum Color: u8 {
        None = 0,
        Red = 1,
        Green = 2,
        Blue = 3,
    }
}

record! {
    pub struct Vec3 {
        x: scalar<f32>,
        y: scalar<f32>,
        z: scalar<f32>,
    }
}

record! {
    pub struct Weapon {
        name: string,
        damage: scalar<i16>,
    }
}

record! {
    pub struct Monster {
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
    pub struct MonstersList {
        data: array<Monster>,
    }
}

record! {
    pub struct Hero {
        pos: inline<Vec3>,
        name: string,
        inventory: primitive_array<u8>,
        weapons: array<Weapon>,
    }
}

fn proptest_cfg() -> Config {
    Config {
        failure_persistence: None,
        ..Config::with_cases(64)
    }
}

fn vec3(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3 { x, y, z }
}

fn orc() -> Monster {
    Monster {
        pos: vec3(1.0, 2.0, 3.0),
        mana: 150,
        hp: 80,
        name: "Orc".into(),
        inventory: vec![0, 1, 2, 3, 4],
        color: Color::Red,
        weapons: vec![
            Weapon {
                name: "Sword".into(),
                damage: 3,
            },
            Weapon {
                name: "Axe".into(),
                damage: 5,
            },
        ],
        equipped: Weapon {
            name: "Axe".into(),
            damage: 5,
        },
        path: vec![vec3(1.0, 2.0, 3.0), vec3(4.0, 5.0, 6.0)],
    }
}

/// Builds a list field by field, in the order the benchmark harness does.
fn build_in_place<B: BufferBuilder>(builder: &mut B, data: &[Monster]) -> blitzbuffers::Result<()> {
    builder.clear();
    let mut list = MonstersList::new_on(builder)?;
    let mut monsters = list.insert_data(data.len())?;
    for (i, org) in data.iter().enumerate() {
        let mut enc = monsters.get(i).expect("index in range");
        enc.insert_name(&org.name)?;
        enc.set_color(org.color);
        enc.set_pos(&org.pos)?;
        enc.set_hp(org.hp);
        enc.set_mana(org.mana);

        enc.equipped().insert_name(&org.equipped.name)?;
        enc.equipped().set_damage(org.equipped.damage);

        let mut weapons = enc.insert_weapons(org.weapons.len())?;
        for (j, org_w) in org.weapons.iter().enumerate() {
            let mut enc_w = weapons.get(j).expect("index in range");
            enc_w.set_damage(org_w.damage);
            enc_w.insert_name(&org_w.name)?;
        }

        let mut items = enc.insert_inventory(org.inventory.len())?;
        for (j, &item) in org.inventory.iter().enumerate() {
            items.set(j, item)?;
        }

        let mut path = enc.insert_path(org.path.len())?;
        for (j, pos) in org.path.iter().enumerate() {
            let mut p = path.get(j).expect("index in range");
            p.set_x(pos.x);
            p.set_y(pos.y);
            p.set_z(pos.z);
        }
    }
    Ok(())
}

#[test]
fn layout_matches_reference_schema() {
    assert_eq!(Vec3::SIZE, 12);
    assert_eq!(Weapon::SIZE, 6);
    assert_eq!(Weapon::DAMAGE_OFFSET, 4);
    assert_eq!(Monster::SIZE, 39);
    assert_eq!(MonstersList::SIZE, 4);
    assert_eq!(
        [
            Monster::POS_OFFSET,
            Monster::MANA_OFFSET,
            Monster::HP_OFFSET,
            Monster::NAME_OFFSET,
            Monster::INVENTORY_OFFSET,
            Monster::COLOR_OFFSET,
            Monster::WEAPONS_OFFSET,
            Monster::EQUIPPED_OFFSET,
            Monster::PATH_OFFSET,
        ],
        [0, 12, 14, 16, 20, 24, 25, 29, 35]
    );
}

#[test]
fn excalibur() {
    let hero = Hero {
        pos: vec3(1.0, 2.0, 3.0),
        name: "Excalibur".into(),
        inventory: vec![1, 2, 3],
        weapons: vec![Weapon::default(), Weapon::default()],
    };
    let size = Hero::SIZE + 10 + 7 + 16;

    let check = |bytes: &[u8]| {
        assert_eq!(bytes.len(), size);
        let view = Hero::view(bytes);
        assert_eq!(view.pos().y(), 2.0);
        assert_eq!(view.name(), "Excalibur");
        assert_eq!(view.inventory().iter().sum::<u8>(), 6);
        assert_eq!(view.weapons().len(), 2);
        assert!(view.weapons().iter().all(|w| w.name().is_empty() && w.damage() == 0));
        assert_eq!(view.to_value().unwrap(), hero);
    };

    let mut chunked = ChunkedBufferBuilder::default();
    let from_chunked = serialize_into(&mut chunked, &hero).unwrap().to_vec();
    check(&from_chunked);

    let mut fixed = FixedBufferBuilder::new(size).unwrap();
    let from_fixed = serialize_into(&mut fixed, &hero).unwrap();
    check(from_fixed);
    assert_eq!(from_fixed, from_chunked);
    assert_eq!(fixed.remaining(), 0);
}

#[test]
fn absent_members_are_zero_slots() {
    let mut builder = FixedBufferBuilder::new(Monster::SIZE).unwrap();
    Monster::new_on(&mut builder).unwrap();
    let bytes = builder.finalize().unwrap();
    assert_eq!(bytes, [0; 39]);
    let view = Monster::view(bytes);
    assert!(view.name().is_empty());
    assert!(view.inventory().is_empty());
    assert!(view.weapons().is_empty());
    assert!(view.path().is_empty());
    assert_eq!(view.color(), Color::None);
    assert_eq!(view.to_value().unwrap(), Monster::default());
}

#[test]
fn capacity_boundary() {
    let list = MonstersList {
        data: vec![orc(), orc()],
    };
    let exact = serialize(&list).unwrap().len();

    let mut fits = FixedBufferBuilder::new(exact).unwrap();
    assert_eq!(serialize_into(&mut fits, &list).unwrap().len(), exact);
    assert_eq!(fits.remaining(), 0);

    let mut short = FixedBufferBuilder::new(exact - 1).unwrap();
    assert!(matches!(
        serialize_into(&mut short, &list),
        Err(Error::CapacityExceeded { .. })
    ));
    assert!(!short.is_empty());

    short.clear();
    assert!(short.is_empty());
    let smaller = MonstersList { data: vec![orc()] };
    assert_eq!(
        serialize_into(&mut short, &smaller).unwrap(),
        serialize(&smaller).unwrap()
    );
}

#[test]
fn builders_recover_after_a_failed_write() {
    let mut broken = orc();
    broken.weapons[1].name = "Ax\0e".into();
    let data = vec![orc(), broken];
    let good = MonstersList {
        data: vec![Monster::default(), orc()],
    };
    let expected = serialize(&good).unwrap();

    let mut chunked = ChunkedBufferBuilder::new(48);
    assert!(matches!(
        build_in_place(&mut chunked, &data),
        Err(Error::InteriorTerminator { position: 2 })
    ));
    assert!(chunked.chunk_count() > 1);
    chunked.clear();
    assert!(chunked.is_empty());
    assert_eq!(serialize_into(&mut chunked, &good).unwrap(), expected);

    let mut fixed = FixedBufferBuilder::new(expected.len()).unwrap();
    assert!(matches!(
        build_in_place(&mut fixed, &[orc(), orc()]),
        Err(Error::CapacityExceeded { .. })
    ));
    fixed.clear();
    assert!(fixed.is_empty());
    assert_eq!(serialize_into(&mut fixed, &good).unwrap(), expected);
}

#[test]
fn caller_supplied_storage() {
    let mut storage = [0xaau8; 512];
    let mut builder = FixedBufferBuilder::from_buffer(&mut storage[..]);
    let len = serialize_into(&mut builder, &orc()).unwrap().len();
    assert_eq!(deserialize::<Monster>(&storage[..len]).unwrap(), orc());
    assert!(storage[len..].iter().all(|&b| b == 0));
}

#[test]
fn in_place_build_reads_back() {
    let data = vec![orc(), Monster::default(), orc()];
    let mut builder = ChunkedBufferBuilder::new(64);
    build_in_place(&mut builder, &data).unwrap();
    assert!(builder.chunk_count() > 1);

    let list = MonstersList::view(builder.finalize().unwrap());
    assert_eq!(list.data().len(), 3);
    let first = list.data().get(0).unwrap();
    assert_eq!(first.name(), "Orc");
    assert_eq!(first.equipped().name(), "Axe");
    assert_eq!(first.path().get(1).unwrap().z(), 6.0);
    assert_eq!(list.to_value().unwrap().data, data);
}

#[test]
fn clear_is_idempotent() {
    let first = MonstersList {
        data: vec![orc(); 4],
    };
    let second = MonstersList {
        data: vec![Monster::default(), orc()],
    };
    let fresh = serialize(&second).unwrap();

    let mut chunked = ChunkedBufferBuilder::new(32);
    serialize_into(&mut chunked, &first).unwrap();
    assert_eq!(serialize_into(&mut chunked, &second).unwrap(), fresh);

    let mut fixed = FixedBufferBuilder::new(4096).unwrap();
    serialize_into(&mut fixed, &first).unwrap();
    assert_eq!(serialize_into(&mut fixed, &second).unwrap(), fresh);
}

fn weapon() -> impl Strategy<Value = Weapon> {
    ("[a-zA-Z ]{0,12}", any::<i16>()).prop_map(|(name, damage)| Weapon { name, damage })
}

fn point() -> impl Strategy<Value = Vec3> {
    (-1e3f32..1e3, -1e3f32..1e3, -1e3f32..1e3).prop_map(|(x, y, z)| vec3(x, y, z))
}

fn monster() -> impl Strategy<Value = Monster> {
    (
        point(),
        any::<i16>(),
        any::<i16>(),
        "[a-zA-Z0-9]{0,20}",
        proptest::collection::vec(any::<u8>(), 0..16),
        prop_oneof![
            Just(Color::None),
            Just(Color::Red),
            Just(Color::Green),
            Just(Color::Blue)
        ],
        proptest::collection::vec(weapon(), 0..4),
        weapon(),
        proptest::collection::vec(point(), 0..6),
    )
        .prop_map(
            |(pos, mana, hp, name, inventory, color, weapons, equipped, path)| Monster {
                pos,
                mana,
                hp,
                name,
                inventory,
                color,
                weapons,
                equipped,
                path,
            },
        )
}

proptest! {
    #![proptest_config(proptest_cfg())]

    #[test]
    fn growth_is_transparent(data in proptest::collection::vec(monster(), 0..8), chunk in 1usize..96) {
        let list = MonstersList { data };
        let expected = serialize(&list).unwrap();

        let mut chunked = ChunkedBufferBuilder::new(chunk);
        prop_assert_eq!(serialize_into(&mut chunked, &list).unwrap(), &expected[..]);

        let mut fixed = FixedBufferBuilder::new(expected.len()).unwrap();
        prop_assert_eq!(serialize_into(&mut fixed, &list).unwrap(), &expected[..]);

        prop_assert_eq!(deserialize::<MonstersList>(&expected).unwrap(), list);
    }

    #[test]
    fn offsets_survive_concatenation(data in proptest::collection::vec(monster(), 1..6)) {
        let mut builder = ChunkedBufferBuilder::new(16);
        build_in_place(&mut builder, &data).unwrap();
        let bytes = builder.finalize().unwrap();
        let view = MonstersList::view(bytes);
        for (enc, org) in view.data().iter().zip(&data) {
            prop_assert_eq!(enc.name(), org.name.as_str());
            prop_assert_eq!(enc.inventory().as_raw_bytes(), &org.inventory[..]);
            prop_assert_eq!(enc.weapons().len(), org.weapons.len());
            prop_assert_eq!(enc.to_value().unwrap(), org.clone());
        }
        // Every present offset resolves forward and inside the buffer.
        for monster in view.data() {
            let base = monster.offset();
            for field in [Monster::NAME_OFFSET, Monster::INVENTORY_OFFSET, Monster::WEAPONS_OFFSET, Monster::PATH_OFFSET] {
                let raw = read_scalar::<u32>(bytes, base + field) as usize;
                prop_assert!(raw == 0 || base + field + raw < bytes.len());
            }
        }
    }
}
