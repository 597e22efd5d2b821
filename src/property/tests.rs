use crate::test::{FakeConnection, FakeDevice, ne_bytes};

use super::*;

const FLOAT_ATOM: u32 = 118;
const MATRIX_PROP: u32 = 300;
const ENABLED_PROP: u32 = 301;
const BOGUS_PROP: u32 = 302;

fn conn() -> FakeConnection {
    FakeConnection::new()
        .with_atom(FLOAT_ATOM, FLOAT_TYPE_NAME)
        .with_atom(MATRIX_PROP, "Coordinate Transformation Matrix")
        .with_atom(ENABLED_PROP, "Device Enabled")
        .with_atom(BOGUS_PROP, "Bogus")
}

fn decode_with(
    ty: PropertyType,
    format: u8,
    items: usize,
    data: &[u8],
) -> Result<PropertyValue, DecodeError> {
    decode(ty, format, items, data, &conn())
}

#[test]
fn integers() {
    let ints = [-128_i8, -1, 0, 1, 127];
    let v = decode_with(PropertyType::Integer, 8, 5, &ne_bytes(&ints, i8::to_ne_bytes)).unwrap();
    assert_eq!(v, PropertyValue::Int8(ints.to_vec()));

    let ints = [i16::MIN, -300, 0, 300, i16::MAX];
    let v = decode_with(PropertyType::Integer, 16, 5, &ne_bytes(&ints, i16::to_ne_bytes)).unwrap();
    assert_eq!(v, PropertyValue::Int16(ints.to_vec()));

    let ints = [i32::MIN, -70_000, 0, 70_000, i32::MAX];
    let v = decode_with(PropertyType::Integer, 32, 5, &ne_bytes(&ints, i32::to_ne_bytes)).unwrap();
    assert_eq!(v, PropertyValue::Int32(ints.to_vec()));
}

#[test]
fn cardinals() {
    let cards = [0_u8, 1, 255];
    let v = decode_with(PropertyType::Cardinal, 8, 3, &cards).unwrap();
    assert_eq!(v, PropertyValue::Card8(cards.to_vec()));

    let cards = [0_u16, 1, u16::MAX];
    let data = ne_bytes(&cards, u16::to_ne_bytes);
    let v = decode_with(PropertyType::Cardinal, 16, 3, &data).unwrap();
    assert_eq!(v, PropertyValue::Card16(cards.to_vec()));

    let cards = [0_u32, 1, u32::MAX];
    let data = ne_bytes(&cards, u32::to_ne_bytes);
    let v = decode_with(PropertyType::Cardinal, 32, 3, &data).unwrap();
    assert_eq!(v, PropertyValue::Card32(cards.to_vec()));
}

#[test]
fn same_bytes_differ_by_signedness() {
    let data = [0xff, 0xff];
    assert_eq!(
        decode_with(PropertyType::Integer, 16, 1, &data).unwrap(),
        PropertyValue::Int16(vec![-1]),
    );
    assert_eq!(
        decode_with(PropertyType::Cardinal, 16, 1, &data).unwrap(),
        PropertyValue::Card16(vec![u16::MAX]),
    );
}

#[test]
fn trailing_padding_is_ignored() {
    let mut data = ne_bytes(&[7_u16], u16::to_ne_bytes);
    data.extend_from_slice(&[0xaa, 0xbb]);
    let v = decode_with(PropertyType::Cardinal, 16, 1, &data).unwrap();
    assert_eq!(v, PropertyValue::Card16(vec![7]));
}

#[test]
fn empty_sequences() {
    for format in [8, 16, 32] {
        let v = decode_with(PropertyType::Integer, format, 0, &[]).unwrap();
        assert!(v.is_empty(), "{v:?}");
        let v = decode_with(PropertyType::Cardinal, format, 0, &[]).unwrap();
        assert!(v.is_empty(), "{v:?}");
        let v = decode_with(PropertyType::Atom, format, 0, &[]).unwrap();
        assert_eq!(v, PropertyValue::Atoms(Vec::new()));
    }
    let v = decode_with(PropertyType::String, 8, 0, &[]).unwrap();
    assert_eq!(v, PropertyValue::Strings(Vec::new()));
}

#[test]
fn unsupported_widths() {
    for ty in [PropertyType::Integer, PropertyType::Cardinal, PropertyType::Atom] {
        for format in [0, 1, 24, 64] {
            let err = decode_with(ty, format, 1, &[0; 8]).unwrap_err();
            match err {
                DecodeError::UnsupportedWidth { ty: t, format: f } => {
                    assert_eq!(t, ty);
                    assert_eq!(f, format);
                }
                e => panic!("unexpected error: {e}"),
            }
        }
    }

    let err = decode_with(PropertyType::Integer, 24, 1, &[0; 3]).unwrap_err();
    assert_eq!(err.to_string(), "unsupported INTEGER width: 24 bits");
}

#[test]
fn truncated() {
    let err = decode_with(PropertyType::Integer, 32, 2, &[0; 7]).unwrap_err();
    assert!(
        matches!(
            err,
            DecodeError::Truncated {
                ty: PropertyType::Integer,
                items: 2,
                len: 7
            }
        ),
        "{err:?}"
    );

    // element count large enough to overflow the byte length
    let err = decode_with(PropertyType::Cardinal, 32, usize::MAX, &[0; 4]).unwrap_err();
    assert!(matches!(err, DecodeError::Truncated { .. }), "{err:?}");

    let err = io::Error::from(err);
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
}

#[test]
fn strings() {
    let v = decode_with(PropertyType::String, 8, 3, b"usb\0\0evdev\0").unwrap();
    assert_eq!(
        v,
        PropertyValue::Strings(vec!["usb".into(), "".into(), "evdev".into()])
    );

    // the format is ignored for strings
    let v = decode_with(PropertyType::String, 32, 1, b"/dev/input/event4\0").unwrap();
    assert_eq!(v, PropertyValue::Strings(vec!["/dev/input/event4".into()]));

    // only the first `items` strings are returned
    let v = decode_with(PropertyType::String, 8, 1, b"first\0second\0").unwrap();
    assert_eq!(v, PropertyValue::Strings(vec!["first".into()]));
}

#[test]
fn string_without_final_terminator() {
    let v = decode_with(PropertyType::String, 8, 2, b"a\0bc").unwrap();
    assert_eq!(v, PropertyValue::Strings(vec!["a".into(), "bc".into()]));
}

#[test]
fn string_latin1() {
    let v = decode_with(PropertyType::String, 8, 1, b"Caf\xe9\0").unwrap();
    assert_eq!(v, PropertyValue::Strings(vec!["Café".into()]));
}

#[test]
fn too_few_strings() {
    let err = decode_with(PropertyType::String, 8, 3, b"a\0b\0").unwrap_err();
    assert!(
        matches!(
            err,
            DecodeError::Truncated {
                ty: PropertyType::String,
                items: 3,
                ..
            }
        ),
        "{err:?}"
    );
}

#[test]
fn atoms() -> io::Result<()> {
    let ids = [MATRIX_PROP, ENABLED_PROP];
    let v = decode_with(PropertyType::Atom, 32, 2, &ne_bytes(&ids, u32::to_ne_bytes))?;
    let PropertyValue::Atoms(atoms) = v else {
        panic!("expected atoms, got {v:?}");
    };
    let names: Vec<_> = atoms.iter().map(|a| a.name()).collect();
    assert_eq!(names, ["Coordinate Transformation Matrix", "Device Enabled"]);
    assert_eq!(atoms[1].id(), AtomId::from_raw(ENABLED_PROP));

    let v = decode_with(
        PropertyType::Atom,
        16,
        1,
        &ne_bytes(&[ENABLED_PROP as u16], u16::to_ne_bytes),
    )?;
    assert!(matches!(&v, PropertyValue::Atoms(a) if a[0].name() == "Device Enabled"));

    let v = decode_with(PropertyType::Atom, 8, 1, &[FLOAT_ATOM as u8])?;
    assert!(matches!(&v, PropertyValue::Atoms(a) if a[0].name() == FLOAT_TYPE_NAME));
    Ok(())
}

#[test]
fn unresolvable_atom_fails_whole_value() {
    let ids = [MATRIX_PROP, 999];
    let data = ne_bytes(&ids, u32::to_ne_bytes);
    let err = decode_with(PropertyType::Atom, 32, 2, &data).unwrap_err();
    match &err {
        DecodeError::Resolve { atom, source } => {
            assert_eq!(*atom, AtomId::from_raw(999));
            assert_eq!(source.kind(), io::ErrorKind::NotFound);
        }
        e => panic!("unexpected error: {e}"),
    }
    assert!(err.source().is_some());

    let err = io::Error::from(err);
    assert_eq!(err.kind(), io::ErrorKind::NotFound);
}

#[test]
fn float() {
    let data = ne_bytes(&[0.5_f32, 0.0, 0.0], f32::to_ne_bytes);
    let v = decode_with(PropertyType::Float, 32, 3, &data).unwrap();
    assert_eq!(v, PropertyValue::Float(0.5));
    assert_eq!(v.len(), 1);

    let err = decode_with(PropertyType::Float, 32, 1, &[0; 3]).unwrap_err();
    assert!(
        matches!(
            err,
            DecodeError::Truncated {
                ty: PropertyType::Float,
                ..
            }
        ),
        "{err:?}"
    );
}

#[test]
fn classify() -> io::Result<()> {
    let conn = conn();
    assert_eq!(PropertyType::classify(AtomId::INTEGER, &conn)?, PropertyType::Integer);
    assert_eq!(PropertyType::classify(AtomId::CARDINAL, &conn)?, PropertyType::Cardinal);
    assert_eq!(PropertyType::classify(AtomId::STRING, &conn)?, PropertyType::String);
    assert_eq!(PropertyType::classify(AtomId::ATOM, &conn)?, PropertyType::Atom);
    assert_eq!(
        PropertyType::classify(AtomId::from_raw(FLOAT_ATOM), &conn)?,
        PropertyType::Float
    );
    assert_eq!(
        PropertyType::classify(AtomId::from_raw(MATRIX_PROP), &conn)?,
        PropertyType::Unknown(AtomId::from_raw(MATRIX_PROP))
    );
    Ok(())
}

#[test]
fn float_requires_interned_atom() -> io::Result<()> {
    // A server where nobody has interned "FLOAT" yet.
    let conn = FakeConnection::new();
    let ty = PropertyType::classify(AtomId::from_raw(FLOAT_ATOM), &conn)?;
    assert_eq!(ty, PropertyType::Unknown(AtomId::from_raw(FLOAT_ATOM)));

    let err = decode(ty, 32, 1, &1.0_f32.to_ne_bytes(), &conn).unwrap_err();
    assert!(matches!(err, DecodeError::UnrecognizedType(a) if a.raw() == FLOAT_ATOM));
    assert_eq!(err.to_string(), format!("unrecognized property type {FLOAT_ATOM}"));
    Ok(())
}

#[test]
fn read_device_properties() -> io::Result<()> {
    let matrix = [0.5_f32, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
    let device = FakeDevice::tablet("UGTABLET DECO 01 Pen (0)")
        .with_property(
            MATRIX_PROP,
            RawProperty::new(
                AtomId::from_raw(FLOAT_ATOM),
                32,
                9,
                ne_bytes(&matrix, f32::to_ne_bytes),
            ),
        )
        .with_property(
            ENABLED_PROP,
            RawProperty::new(AtomId::INTEGER, 8, 1, vec![1]),
        )
        .with_property(
            BOGUS_PROP,
            RawProperty::new(AtomId::INTEGER, 24, 1, vec![1, 0, 0]),
        );
    let conn = conn();

    let value = read_property(&device, &conn, AtomId::from_raw(ENABLED_PROP))?;
    assert_eq!(value, PropertyValue::Int8(vec![1]));

    let props = read_properties(&device, &conn)?;
    assert_eq!(props.len(), 3);
    assert_eq!(props[0].0.name(), "Coordinate Transformation Matrix");
    assert_eq!(*props[0].1.as_ref().unwrap(), PropertyValue::Float(0.5));
    assert_eq!(props[1].0.name(), "Device Enabled");
    assert_eq!(*props[1].1.as_ref().unwrap(), PropertyValue::Int8(vec![1]));
    assert_eq!(props[2].0.name(), "Bogus");
    let err = props[2].1.as_ref().unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    Ok(())
}

#[test]
fn read_properties_on_lost_connection() {
    let device = FakeDevice::tablet("pen").with_property(
        ENABLED_PROP,
        RawProperty::new(AtomId::INTEGER, 8, 1, vec![1]),
    );
    let conn = conn().disconnected();
    let err = read_properties(&device, &conn).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::NotConnected);
}
