use crate::adapter::ByteAdapter;
use crate::converter::ByteConverter;
use crate::error::ErrorKind;
use crate::{Nbt, TagKind, ValueKind};

#[allow(clippy::float_cmp)]
mod engine;

macro_rules! check_ids {
    {$($kind:ident = $id:literal),* $(,)?} => {
        $(
            assert_eq!(TagKind::$kind.standard_id(), Some($id));
            assert_eq!(TagKind::from_standard_id($id), Some(TagKind::$kind));
        )*
    };
}

#[test]
fn exhaustive_id_check() {
    check_ids! {
        End = 0,
        Byte = 1,
        Short = 2,
        Int = 3,
        Long = 4,
        Float = 5,
        Double = 6,
        ByteArray = 7,
        String = 8,
        List = 9,
        Compound = 10,
        IntArray = 11,
        Boolean = 80,
        DoubleArray = 81,
        FloatArray = 82,
        LongArray = 83,
        ShortArray = 84,
        StringArray = 85,
    }

    for id in (12..80).chain(86..=u8::MAX) {
        assert!(TagKind::from_standard_id(id).is_none());
    }
    assert_eq!(TagKind::Custom("TAG_Uuid").standard_id(), None);
}

#[test]
fn extension_kinds() {
    assert!(!TagKind::IntArray.is_extension());
    assert!(TagKind::Boolean.is_extension());
    assert!(TagKind::StringArray.is_extension());
    assert!(TagKind::Custom("TAG_Uuid").is_extension());
    assert!(TagKind::List.is_container());
    assert!(!TagKind::ByteArray.is_container());
}

#[test]
fn kind_display() {
    assert_eq!(TagKind::ByteArray.to_string(), "TAG_Byte_Array");
    assert_eq!(TagKind::Compound.to_string(), "TAG_Compound");
    assert_eq!(TagKind::Custom("TAG_Uuid").to_string(), "TAG_Uuid");
}

#[test]
fn registry_queries_are_inverse() {
    for nbt in [Nbt::extended(), Nbt::original()] {
        for (id, kind) in nbt.adapters().iter() {
            assert_eq!(nbt.id_for(nbt.kind_for(id).unwrap()).unwrap(), id);
            assert_eq!(nbt.kind_for(nbt.id_for(kind).unwrap()).unwrap(), kind);
        }
        assert_eq!(nbt.kind_for(0).unwrap(), TagKind::End);
        assert_eq!(nbt.id_for(TagKind::End).unwrap(), 0);
    }
}

#[test]
fn extended_registers_every_standard_kind() {
    let nbt = Nbt::extended();
    assert_eq!(nbt.adapters().len(), 17);
    assert_eq!(nbt.converters().len(), 17);
    for kind in TagKind::STANDARD.iter().skip(1) {
        assert_eq!(Some(nbt.id_for(*kind).unwrap()), kind.standard_id());
        assert!(nbt.converters().has_converter_for_tag(*kind));
    }
    assert_eq!(nbt.name_for(9).unwrap(), "TAG_List");
}

#[test]
fn original_lacks_extension_ids() {
    let nbt = Nbt::original();
    assert_eq!(nbt.adapters().len(), 11);
    for id in 80..=85 {
        assert_eq!(nbt.kind_for(id).unwrap_err().kind(), ErrorKind::Registration);
    }
    assert!(nbt.id_for(TagKind::Boolean).unwrap_err().is_registration());
    assert!(!nbt.converters().has_converter_for_value(ValueKind::Boolean));
}

#[test]
fn empty_knows_only_end() {
    let nbt = Nbt::empty();
    assert!(nbt.adapters().is_empty());
    assert!(nbt.converters().is_empty());
    assert_eq!(nbt.kind_for(0).unwrap(), TagKind::End);
    assert!(nbt.kind_for(1).unwrap_err().is_registration());
    assert!(nbt.adapter_for_kind(TagKind::Byte).is_err());
}

#[test]
fn registration_never_overwrites() {
    let mut nbt = Nbt::extended();

    // id taken
    let err = nbt
        .register_adapter(1, TagKind::Custom("TAG_Other"), ByteAdapter)
        .unwrap_err();
    assert!(err.is_registration());

    // kind taken
    let err = nbt.register_adapter(200, TagKind::Byte, ByteAdapter).unwrap_err();
    assert!(err.is_registration());
    assert!(nbt.kind_for(200).is_err());

    // End is intrinsic
    assert!(nbt
        .register_adapter(0, TagKind::Custom("TAG_Zero"), ByteAdapter)
        .unwrap_err()
        .is_registration());
    assert!(nbt
        .register_adapter(201, TagKind::End, ByteAdapter)
        .unwrap_err()
        .is_registration());

    assert!(nbt
        .register_converter(TagKind::Byte, ValueKind::Custom("other"), ByteConverter)
        .unwrap_err()
        .is_registration());
    assert!(nbt
        .register_converter(TagKind::Custom("TAG_Other"), ValueKind::Byte, ByteConverter)
        .unwrap_err()
        .is_registration());
    assert!(nbt
        .register_converter(TagKind::End, ValueKind::Custom("end"), ByteConverter)
        .unwrap_err()
        .is_registration());

    assert_eq!(nbt.adapters().len(), 17);
    assert_eq!(nbt.converters().len(), 17);
}

#[test]
fn register_new_id_for_new_kind() {
    let mut nbt = Nbt::original();
    nbt.register_adapter(80, TagKind::Boolean, crate::adapter::BooleanAdapter)
        .unwrap();
    assert_eq!(nbt.kind_for(80).unwrap(), TagKind::Boolean);
    assert_eq!(nbt.id_for(TagKind::Boolean).unwrap(), 80);
}
