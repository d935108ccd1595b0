use std::io::Cursor;
use std::sync::Arc;
use std::thread;

use super::builder::Builder;
use crate::adapter::{Adapter, BooleanAdapter, CompoundAdapter};
use crate::converter::{CompoundConverter, Converter, CustomConverter};
use crate::error::{Error, ErrorKind, Result};
use crate::stream::Compression;
use crate::{
    AdapterRegistry, ContainerKind, ConverterRegistry, CustomKind, CustomTag, Decoder, Encoder,
    Nbt, Payload, Tag, TagCompound, TagKind, TagList, Value, ValueKind, DEFAULT_MAX_DEPTH,
};

fn plain() -> Nbt {
    Nbt::extended().with_compression(Compression::Uncompressed)
}

fn encode(nbt: &Nbt, root: &TagCompound) -> Vec<u8> {
    let mut buf = Vec::new();
    nbt.encode(root, &mut buf).unwrap();
    buf
}

fn decode(nbt: &Nbt, bytes: &[u8]) -> Result<TagCompound> {
    nbt.decode(&mut Cursor::new(bytes))
}

fn level() -> TagCompound {
    let mut longs = TagList::new();
    for n in 11..=15i64 {
        longs.push(n).unwrap();
    }

    let mut ham = TagCompound::new();
    ham.put("name", "Hampus").unwrap();
    ham.put("value", 0.75f32).unwrap();

    let mut nested = TagCompound::new();
    nested.put("ham", ham).unwrap();

    let mut root = TagCompound::new();
    root.put("shortTest", 32767i16).unwrap();
    root.put("longTest", 9223372036854775807i64).unwrap();
    root.put("listTest", longs).unwrap();
    root.put("nested", nested).unwrap();
    root
}

#[test]
fn level_round_trip() {
    let nbt = Nbt::extended();
    let root = level();

    let bytes = nbt.to_bytes(&root).unwrap();
    let back = nbt.from_bytes(&bytes).unwrap();

    assert_eq!(back, root);
    let list = back.get_list("listTest").unwrap();
    assert_eq!(list.element_kind(), Some(TagKind::Long));
    assert_eq!(nbt.id_for(list.element_kind().unwrap()).unwrap(), 4);
    assert_eq!(
        back.get_compound("nested")
            .and_then(|n| n.get_compound("ham"))
            .and_then(|h| h.get_str("name")),
        Some("Hampus")
    );
}

#[test]
fn encodes_expected_bytes() {
    let nbt = plain();
    let expected = Builder::new()
        .start_compound("")
        .short("shortTest", 32767)
        .long("longTest", i64::MAX)
        .start_list("listTest", TagKind::Long, 5)
        .long_payload(11)
        .long_payload(12)
        .long_payload(13)
        .long_payload(14)
        .long_payload(15)
        .start_compound("nested")
        .start_compound("ham")
        .string("name", "Hampus")
        .float("value", 0.75)
        .end_compound()
        .end_compound()
        .end_compound()
        .build();

    assert_eq!(encode(&nbt, &level()), expected);
    assert_eq!(decode(&nbt, &expected).unwrap(), level());
}

#[test]
fn every_kind_round_trips() {
    let nbt = plain();

    let mut strings = TagList::new();
    strings.push("").unwrap();
    strings.push("two").unwrap();

    let mut compounds = TagList::new();
    let mut element = TagCompound::new();
    element.put("x", 1i8).unwrap();
    compounds.push(element).unwrap();
    compounds.push(TagCompound::new()).unwrap();

    let mut root = TagCompound::new();
    root.put("byte", i8::MIN).unwrap();
    root.put("short", i16::MIN).unwrap();
    root.put("int_min", i32::MIN).unwrap();
    root.put("int_max", i32::MAX).unwrap();
    root.put("long", i64::MIN).unwrap();
    root.put("float", f32::MAX).unwrap();
    root.put("double", f64::MIN_POSITIVE).unwrap();
    root.put("nan", f64::NAN).unwrap();
    root.put("string", "").unwrap();
    root.put("unicode", "héllo \u{0} 😀").unwrap();
    root.put("bytes", vec![i8::MIN, 0, i8::MAX]).unwrap();
    root.put("no_bytes", Vec::<i8>::new()).unwrap();
    root.put("ints", vec![i32::MIN, i32::MAX]).unwrap();
    root.put("bool", true).unwrap();
    root.put("doubles", vec![1.5f64, -0.0]).unwrap();
    root.put("floats", vec![f32::MIN]).unwrap();
    root.put("longs", vec![i64::MAX]).unwrap();
    root.put("shorts", Vec::<i16>::new()).unwrap();
    root.put("string_array", vec!["a".to_owned(), String::new()])
        .unwrap();
    root.put("strings", strings).unwrap();
    root.put("compounds", compounds).unwrap();
    root.put("empty_list", TagList::new()).unwrap();
    root.put("empty_ints", TagList::of(TagKind::Int).unwrap())
        .unwrap();
    root.put("empty_compound", TagCompound::new()).unwrap();

    let back = decode(&nbt, &encode(&nbt, &root)).unwrap();
    assert_eq!(back, root);
    assert_eq!(
        back.get_list("empty_ints").unwrap().element_kind(),
        Some(TagKind::Int)
    );
    assert_eq!(back.get_list("empty_list").unwrap().element_kind(), None);
}

#[test]
fn untyped_empty_list_is_list_of_end() {
    let nbt = plain();
    let mut root = TagCompound::new();
    root.put("l", TagList::new()).unwrap();

    let expected = Builder::new()
        .start_compound("")
        .start_list("l", TagKind::End, 0)
        .end_compound()
        .build();
    assert_eq!(encode(&nbt, &root), expected);
}

#[test]
fn list_of_end_with_elements_fails() {
    let bytes = Builder::new()
        .start_compound("")
        .start_list("l", TagKind::End, 2)
        .end_compound()
        .build();
    assert!(decode(&plain(), &bytes).unwrap_err().is_format());
}

#[test]
fn list_elements_have_no_framing() {
    let nbt = plain();
    let mut element = TagCompound::new();
    element.put("x", 1i8).unwrap();
    let mut list = TagList::new();
    list.push(element).unwrap();
    let mut root = TagCompound::new();
    root.put("l", list).unwrap();

    let expected = Builder::new()
        .start_compound("")
        .start_list("l", TagKind::Compound, 1)
        .start_anon_compound()
        .byte("x", 1)
        .end_compound()
        .end_compound()
        .build();
    assert_eq!(encode(&nbt, &root), expected);
    assert_eq!(decode(&nbt, &expected).unwrap(), root);
}

#[test]
fn compound_needs_terminator() {
    let nbt = plain();
    let unterminated = Builder::new().start_compound("").int("a", 1).build();
    assert!(decode(&nbt, &unterminated).unwrap_err().is_format());

    let empty = Builder::new().start_compound("").end_compound().build();
    assert!(decode(&nbt, &empty).unwrap().is_empty());

    let full = Builder::new()
        .start_compound("")
        .int("a", 1)
        .end_compound()
        .build();
    assert_eq!(decode(&nbt, &full).unwrap().get_i32("a"), Some(1));
}

#[test]
fn unknown_id_consumes_only_id() {
    let nbt = plain();
    let bytes = Builder::new().raw_bytes(&[99]).name("x").build();
    let mut cursor = Cursor::new(&bytes[..]);

    let err = nbt.decode_tag(None, &mut cursor).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Registration);
    assert_eq!(cursor.position(), 1);

    let inside = Builder::new()
        .start_compound("")
        .raw_bytes(&[99])
        .name("x")
        .end_compound()
        .build();
    assert!(decode(&nbt, &inside).unwrap_err().is_registration());
}

#[test]
fn end_decodes_as_no_tag() {
    let nbt = plain();
    let mut cursor = Cursor::new(&[0u8][..]);
    assert!(nbt.decode_tag(None, &mut cursor).unwrap().is_none());
}

#[test]
fn list_element_decodes_without_name() {
    let nbt = plain();
    let bytes = Builder::new().tag(TagKind::Int).int_payload(5).build();
    let tag = nbt
        .decode_tag(Some(ContainerKind::List), &mut Cursor::new(&bytes[..]))
        .unwrap()
        .unwrap();
    assert_eq!(tag, Tag::unnamed(5i32));
}

#[test]
fn root_must_be_compound() {
    let nbt = plain();

    let int_root = Builder::new().int("root", 1).build();
    assert!(decode(&nbt, &int_root).unwrap_err().is_format());

    assert!(decode(&nbt, &[0]).unwrap_err().is_format());
    assert!(decode(&nbt, &[]).unwrap_err().is_format());

    let mut out = Vec::new();
    let err = nbt.encode_root(&Tag::new("x", 1i32), &mut out).unwrap_err();
    assert!(err.is_format());
}

#[test]
fn named_root() {
    let nbt = Nbt::extended();
    let root = level().into_tag("Level");

    let mut buf = Vec::new();
    nbt.write_root(&root, &mut buf).unwrap();
    let back = nbt.read_root(&buf[..]).unwrap();

    assert_eq!(back.name(), "Level");
    assert_eq!(back, root);
    assert_eq!(nbt.read(&buf[..]).unwrap(), level());
}

#[test]
fn negative_lengths_fail() {
    let nbt = plain();

    let list = Builder::new()
        .start_compound("")
        .start_list("l", TagKind::Int, -1)
        .end_compound()
        .build();
    let err = decode(&nbt, &list).unwrap_err();
    assert!(err.is_format());

    let array = Builder::new()
        .start_compound("")
        .tag(TagKind::IntArray)
        .name("a")
        .int_payload(-5)
        .end_compound()
        .build();
    assert!(decode(&nbt, &array).unwrap_err().is_format());
}

#[test]
fn truncated_array_fails() {
    let bytes = Builder::new()
        .start_compound("")
        .tag(TagKind::ByteArray)
        .name("a")
        .int_payload(10)
        .byte_array_payload(&[1, 2, 3])
        .build();
    assert!(decode(&plain(), &bytes).unwrap_err().is_format());
}

#[test]
fn max_seq_len_bounds_arrays() {
    let nbt = plain().with_max_seq_len(4);
    let within = Builder::new()
        .start_compound("")
        .int_array("a", &[1, 2, 3, 4])
        .end_compound()
        .build();
    assert!(decode(&nbt, &within).is_ok());

    let beyond = Builder::new()
        .start_compound("")
        .long_array("a", &[1, 2, 3, 4, 5])
        .end_compound()
        .build();
    assert!(decode(&nbt, &beyond).unwrap_err().is_format());

    // A huge count must fail cleanly once input runs out.
    let lying = Builder::new()
        .start_compound("")
        .start_list("l", TagKind::Long, i32::MAX)
        .long_payload(1)
        .build();
    assert!(decode(&plain(), &lying).unwrap_err().is_format());
}

#[test]
fn duplicate_key_fails() {
    let bytes = Builder::new()
        .start_compound("")
        .int("a", 1)
        .int("a", 2)
        .end_compound()
        .build();
    assert!(decode(&plain(), &bytes).unwrap_err().is_format());
}

fn nested_compounds(depth: usize) -> TagCompound {
    let mut root = TagCompound::new();
    for _ in 1..depth {
        let mut parent = TagCompound::new();
        parent.put("c", root).unwrap();
        root = parent;
    }
    root
}

#[test]
fn depth_is_bounded() {
    let nbt = plain().with_max_depth(3);

    let ok = nested_compounds(3);
    let bytes = encode(&nbt, &ok);
    assert_eq!(decode(&nbt, &bytes).unwrap(), ok);

    let deep = nested_compounds(4);
    let mut out = Vec::new();
    assert!(nbt.encode(&deep, &mut out).unwrap_err().is_format());

    let bytes = encode(&plain(), &deep);
    assert!(decode(&nbt, &bytes).unwrap_err().is_format());
}

#[test]
fn very_deep_input_fails_cleanly() {
    let mut bytes = Builder::new()
        .start_compound("")
        .start_list("l", TagKind::List, 1)
        .build();
    // Every further list holds exactly one list.
    for _ in 0..1_000 {
        bytes = Builder::new()
            .raw_bytes(&bytes)
            .start_anon_list(TagKind::List, 1)
            .build();
    }
    let nbt = plain().with_max_depth(128);
    assert!(decode(&nbt, &bytes).unwrap_err().is_format());
}

fn nested_compound_bytes(depth: usize) -> Vec<u8> {
    let mut builder = Builder::new().start_compound("");
    for _ in 1..depth {
        builder = builder.start_compound("c");
    }
    for _ in 0..depth {
        builder = builder.end_compound();
    }
    builder.build()
}

#[test]
fn default_depth_limit_fits_the_stack() {
    let nbt = plain();
    assert_eq!(nbt.max_depth(), DEFAULT_MAX_DEPTH);

    let bytes = nested_compound_bytes(DEFAULT_MAX_DEPTH - 1);
    let root = decode(&nbt, &bytes).unwrap();
    assert_eq!(root, nested_compounds(DEFAULT_MAX_DEPTH - 1));
    assert_eq!(encode(&nbt, &root), bytes);

    let bytes = nested_compound_bytes(DEFAULT_MAX_DEPTH);
    assert!(decode(&nbt, &bytes).is_ok());

    let bytes = nested_compound_bytes(DEFAULT_MAX_DEPTH + 1);
    assert!(decode(&nbt, &bytes).unwrap_err().is_format());
}

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn instance_is_shared_across_threads() {
    assert_send_sync::<Nbt>();
    assert_send_sync::<AdapterRegistry>();
    assert_send_sync::<ConverterRegistry>();
    assert_send_sync::<TagCompound>();

    let nbt = Arc::new(plain());
    let bytes = encode(&nbt, &level());

    thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let nbt = Arc::clone(&nbt);
                let bytes = bytes.clone();
                s.spawn(move || decode(&nbt, &bytes))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), level());
        }
    });
}

#[test]
fn swapped_children_fail_to_encode() {
    let nbt = plain();

    let mut root = TagCompound::new();
    root.put("a", 1i32).unwrap();
    let _ = std::mem::replace(root.get_mut("a").unwrap(), Tag::new("a", 2i32));
    let mut out = Vec::new();
    assert!(nbt.encode(&root, &mut out).unwrap_err().is_ownership());

    let mut list = TagList::new();
    list.push(1i32).unwrap();
    let mut other = TagList::new();
    other.push(2i64).unwrap();
    std::mem::swap(list.get_mut(0).unwrap(), other.get_mut(0).unwrap());
    let mut root = TagCompound::new();
    root.put("l", list).unwrap();
    let mut out = Vec::new();
    assert!(nbt.encode(&root, &mut out).unwrap_err().is_ownership());
}

#[test]
fn extension_ids_on_the_wire() {
    let nbt = plain();
    let mut root = TagCompound::new();
    root.put("flag", true).unwrap();
    root.put("shorts", vec![1i16, -1]).unwrap();

    let expected = Builder::new()
        .start_compound("")
        .boolean("flag", true)
        .raw_bytes(&[84])
        .name("shorts")
        .int_payload(2)
        .short_payload(1)
        .short_payload(-1)
        .end_compound()
        .build();
    assert_eq!(encode(&nbt, &root), expected);

    let original = Nbt::original().with_compression(Compression::Uncompressed);
    let mut out = Vec::new();
    assert!(original.encode(&root, &mut out).unwrap_err().is_registration());
    assert!(decode(&original, &expected).unwrap_err().is_registration());
}

#[test]
fn any_nonzero_byte_is_true() {
    let bytes = Builder::new()
        .start_compound("")
        .tag(TagKind::Boolean)
        .name("b")
        .byte_payload(2)
        .end_compound()
        .build();
    assert_eq!(decode(&plain(), &bytes).unwrap().get_bool("b"), Some(true));
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Uuid(u128);

impl CustomKind for Uuid {
    const KIND: &'static str = "TAG_Uuid";
}

struct UuidAdapter;

impl Adapter for UuidAdapter {
    fn read(&self, name: String, input: &mut Decoder<'_>) -> Result<Tag> {
        let hi = input.consume_i64()? as u64;
        let lo = input.consume_i64()? as u64;
        let uuid: Box<dyn CustomTag> = Box::new(Uuid(((hi as u128) << 64) | lo as u128));
        input.nbt().to_tag(name, uuid)
    }

    fn write(&self, tag: &Tag, output: &mut Encoder<'_>) -> Result<()> {
        let uuid = tag
            .as_custom()
            .and_then(|c| c.downcast_ref::<Uuid>())
            .ok_or_else(|| Error::conversion("not a uuid"))?;
        output.write_i64((uuid.0 >> 64) as i64)?;
        output.write_i64(uuid.0 as i64)
    }
}

#[test]
fn custom_kind_round_trip() {
    let kind = TagKind::Custom(Uuid::KIND);
    let mut nbt = plain();
    nbt.register_adapter(100, kind, UuidAdapter).unwrap();
    nbt.register_converter(kind, ValueKind::Custom(Uuid::KIND), CustomConverter::of::<Uuid>())
        .unwrap();

    let id = Uuid(0x0123_4567_89ab_cdef_fedc_ba98_7654_3210);
    let mut root = TagCompound::new();
    root.put("id", Box::new(id.clone()) as Box<dyn CustomTag>)
        .unwrap();

    let bytes = encode(&nbt, &root);
    assert_eq!(bytes[3], 100);
    let back = decode(&nbt, &bytes).unwrap();
    assert_eq!(back, root);
    assert_eq!(
        back.get("id")
            .and_then(Tag::as_custom)
            .and_then(|c| c.downcast_ref::<Uuid>()),
        Some(&id)
    );

    match nbt.to_value(back.get("id").unwrap()).unwrap() {
        Value::Custom(c) => assert_eq!(c.downcast_ref::<Uuid>(), Some(&id)),
        other => panic!("expected custom value, got {:?}", other),
    }

    // Without the registration the id is unknown.
    assert!(decode(&plain(), &bytes).unwrap_err().is_registration());
}

/// Reads booleans inverted, to show decoding builds tags through the
/// converter registry.
struct InvertedBoolean;

impl Converter for InvertedBoolean {
    fn to_value(&self, tag: &Tag, _: &Nbt) -> Result<Value> {
        match tag.payload() {
            Payload::Boolean(b) => Ok(Value::Boolean(!b)),
            _ => Err(Error::conversion("not a boolean")),
        }
    }

    fn to_tag(&self, name: String, value: Value, _: &Nbt) -> Result<Tag> {
        match value {
            Value::Boolean(b) => Ok(Tag::new(name, !b)),
            _ => Err(Error::conversion("not a boolean")),
        }
    }
}

#[test]
fn decoding_goes_through_converters() {
    let mut nbt = Nbt::empty().with_compression(Compression::Uncompressed);
    nbt.register_adapter(10, TagKind::Compound, CompoundAdapter)
        .unwrap();
    nbt.register_converter(TagKind::Compound, ValueKind::Compound, CompoundConverter)
        .unwrap();
    nbt.register_adapter(80, TagKind::Boolean, BooleanAdapter)
        .unwrap();
    nbt.register_converter(TagKind::Boolean, ValueKind::Boolean, InvertedBoolean)
        .unwrap();

    let bytes = Builder::new()
        .start_compound("")
        .boolean("b", true)
        .end_compound()
        .build();
    assert_eq!(decode(&nbt, &bytes).unwrap().get_bool("b"), Some(false));

    // Bytes are not registered at all here.
    let bytes = Builder::new()
        .start_compound("")
        .byte("b", 1)
        .end_compound()
        .build();
    assert!(decode(&nbt, &bytes).unwrap_err().is_registration());
}

#[test]
fn values_of_a_tree() {
    let nbt = Nbt::extended();
    let root = level().into_tag("Level");

    let value = nbt.to_value(&root).unwrap();
    let map = match &value {
        Value::Compound(map) => map,
        other => panic!("expected compound, got {:?}", other),
    };
    assert_eq!(map["shortTest"], Value::Short(32767));
    assert_eq!(
        map["listTest"],
        Value::List((11..=15).map(Value::Long).collect())
    );

    let tag = nbt.to_tag("Level", value).unwrap();
    assert_eq!(tag, root);

    let json = serde_json::to_string(&nbt.to_value(&root).unwrap()).unwrap();
    let parsed: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(nbt.to_tag("Level", parsed).unwrap(), root);
}

#[test]
fn mixed_value_list_fails() {
    let nbt = Nbt::extended();
    let value = Value::List(vec![Value::Int(1), Value::Long(2)]);
    assert!(nbt.to_tag("l", value).unwrap_err().is_ownership());
}

#[test]
fn string_helpers() {
    let nbt = Nbt::extended();
    let mut buf = Vec::new();
    nbt.write_string(&mut buf, "\u{0}").unwrap();
    assert_eq!(buf, [0, 2, 0xC0, 0x80]);
    assert_eq!(nbt.read_string(&mut &buf[..]).unwrap(), "\u{0}");
}
