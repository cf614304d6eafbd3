use cm17a_proto::{encode, parse, Command, Error, Frame, HouseCode, UnitCode, FOOTER, HEADER};

const HOUSE_BITS: [(char, u16); 16] = [
    ('A', 0x6000),
    ('B', 0x7000),
    ('C', 0x4000),
    ('D', 0x5000),
    ('E', 0x8000),
    ('F', 0x9000),
    ('G', 0xA000),
    ('H', 0xB000),
    ('I', 0xE000),
    ('J', 0xF000),
    ('K', 0xC000),
    ('L', 0xD000),
    ('M', 0x0000),
    ('N', 0x1000),
    ('O', 0x2000),
    ('P', 0x3000),
];

const UNIT_BITS: [u16; 16] = [
    0x0000, 0x0010, 0x0008, 0x0018, 0x0040, 0x0050, 0x0048, 0x0058, 0x0400, 0x0410, 0x0408,
    0x0400, 0x0440, 0x0450, 0x0448, 0x0458,
];

#[test]
fn every_house_letter() {
    for (letter, bits) in HOUSE_BITS.iter() {
        let token = format!("{}1ON", letter);
        let command = parse(&token).unwrap();
        assert_eq!(command.house().letter(), *letter);
        assert_eq!(encode(&command), *bits, "{}", token);

        let lower = token.to_lowercase();
        assert_eq!(parse(&lower), Ok(command));
    }
    for token in ["Q1ON", "Z1ON", "@1ON", "[1ON", "q1on"].iter() {
        assert_eq!(parse(token), Err(Error::InvalidHouseCode), "{}", token);
    }
}

#[test]
fn every_unit_number() {
    for (n, bits) in UNIT_BITS.iter().enumerate() {
        let token = format!("M{}", n + 1);
        let command = parse(&token).unwrap();
        assert_eq!(command.unit(), Some(UnitCode::new(n + 1).unwrap()));
        // house M and function ON contribute no bits
        assert_eq!(encode(&command), *bits, "{}", token);
    }
}

#[test]
fn units_9_and_12_encode_the_same() {
    let u9 = parse("B9").unwrap();
    let u12 = parse("B12").unwrap();
    assert_ne!(u9, u12);
    assert_eq!(encode(&u9), encode(&u12));
    assert_eq!(encode(&u9), 0x7400);
}

#[test]
fn on_is_the_default_function() {
    assert_eq!(encode(&parse("D5").unwrap()), encode(&parse("D5ON").unwrap()));
    assert_eq!(encode(&parse("D5off").unwrap()), 0x5000 | 0x0040 | 0x0020);
}

#[test]
fn dim_and_bright_have_no_unit_bits() {
    let dim = parse("CDIM").unwrap();
    let bright = parse("ABRIGHT").unwrap();
    assert_eq!(dim.unit(), None);
    assert_eq!(bright.unit(), None);
    assert_eq!(encode(&dim), HouseCode::C.bits() | 0x00B8);
    assert_eq!(encode(&bright), HouseCode::A.bits() | 0x00A8);
}

#[test]
fn out_of_range_units_are_invalid() {
    for token in ["A17ON", "A0OFF", "A100", "A17DIM", "A"].iter() {
        assert_eq!(parse(token), Err(Error::InvalidCommand), "{}", token);
    }
}

#[test]
fn end_to_end_vectors() {
    let vectors = [
        ("A1ON", 0x6000),
        ("P16OFF", 0x3478),
        ("CDIM", 0x40B8),
        ("ABRIGHT", 0x60A8),
    ];
    for (token, word) in vectors.iter() {
        let command: Command = token.parse().unwrap();
        assert_eq!(command.encode(), *word, "{}", token);
        assert_eq!(command.to_string(), *token);
    }

    let frame = Frame::new(parse("A1ON").unwrap().encode());
    let values: Vec<(u16, u8)> = frame
        .fields()
        .iter()
        .map(|field| (field.value(), field.width()))
        .collect();
    assert_eq!(values, [(HEADER, 16), (0x6000, 16), (FOOTER as u16, 8)]);
    assert_eq!((HEADER, FOOTER), (0xD5AA, 0xAD));
}
