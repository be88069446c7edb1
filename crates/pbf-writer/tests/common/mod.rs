// crates/pbf-writer/tests/common/mod.rs
//
// Test support: a small wire-format reader, a message-tree model, and a
// reference encoder that builds each sub-message in its own Vec.
#![allow(dead_code)]

use pbf_core::{tag, varint, zigzag, MAX_FIELD_NUMBER};
use pbf_writer::{Frame, Writer, WriterError};
use proptest::prelude::*;
use tracing_subscriber::EnvFilter;

/// Route the writer's `trace!`/`debug!` output to the test harness.
/// Silent unless `RUST_LOG` is set; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// -----------------------------------------------------------------------------
// Reader
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Varint(u64),
    Fixed64(u64),
    Fixed32(u32),
    Len(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub number: u64,
    pub value: Value,
    /// Bytes used by the length prefix of a `Len` field, 0 otherwise.
    pub len_prefix: usize,
}

pub fn decode_varint(bytes: &[u8]) -> Option<(u64, usize)> {
    let mut value = 0u64;
    for (i, &b) in bytes.iter().enumerate().take(varint::MAX_VARINT_LEN) {
        value |= u64::from(b & 0x7f) << (7 * i);
        if b & 0x80 == 0 {
            return Some((value, i + 1));
        }
    }
    None
}

/// Parse one message level. Fails on truncation or unknown wire types.
pub fn parse(bytes: &[u8]) -> Result<Vec<Field>, String> {
    let mut fields = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        let (key, n) = decode_varint(&bytes[pos..]).ok_or("bad tag varint")?;
        pos += n;
        let (number, wire) = tag::split(key);
        let mut len_prefix = 0;
        let value = match wire {
            0 => {
                let (v, n) = decode_varint(&bytes[pos..]).ok_or("bad varint")?;
                pos += n;
                Value::Varint(v)
            }
            1 => {
                let raw = bytes.get(pos..pos + 8).ok_or("truncated fixed64")?;
                pos += 8;
                Value::Fixed64(u64::from_le_bytes(raw.try_into().unwrap()))
            }
            2 => {
                let (len, n) = decode_varint(&bytes[pos..]).ok_or("bad length varint")?;
                pos += n;
                len_prefix = n;
                let end = pos + len as usize;
                let raw = bytes.get(pos..end).ok_or("truncated payload")?;
                pos = end;
                Value::Len(raw.to_vec())
            }
            5 => {
                let raw = bytes.get(pos..pos + 4).ok_or("truncated fixed32")?;
                pos += 4;
                Value::Fixed32(u32::from_le_bytes(raw.try_into().unwrap()))
            }
            other => return Err(format!("unsupported wire type {}", other)),
        };
        fields.push(Field {
            number,
            value,
            len_prefix,
        });
    }
    Ok(fields)
}

// -----------------------------------------------------------------------------
// Message tree model
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Varint(u32, u64),
    Zigzag(u32, i64),
    Fixed32(u32, u32),
    Fixed64(u32, u64),
    SFixed32(u32, i32),
    SFixed64(u32, i64),
    Bytes(u32, Vec<u8>),
    Message(u32, Vec<Node>),
}

/// Write `nodes` into `frame` through the writer under test.
pub fn write_tree(w: &mut Writer<'_>, frame: Frame, nodes: &[Node]) -> Result<(), WriterError> {
    for node in nodes {
        match node {
            Node::Varint(f, v) => w.add_varint_field(frame, *f, *v)?,
            Node::Zigzag(f, v) => w.add_zigzag_field(frame, *f, *v)?,
            Node::Fixed32(f, v) => w.add_fixed32_field(frame, *f, *v)?,
            Node::Fixed64(f, v) => w.add_fixed64_field(frame, *f, *v)?,
            Node::SFixed32(f, v) => w.add_sfixed32_field(frame, *f, *v)?,
            Node::SFixed64(f, v) => w.add_sfixed64_field(frame, *f, *v)?,
            Node::Bytes(f, data) => w.add_bytes_field(frame, *f, data)?,
            Node::Message(f, children) => {
                let child = w.open_submessage(frame, *f)?;
                write_tree(w, child, children)?;
                w.close(child)?;
            }
        }
    }
    Ok(())
}

fn put_tag(out: &mut Vec<u8>, field: u32, wire: u64) {
    varint::encode((u64::from(field) << 3) | wire, out);
}

/// Canonical encoding: every sub-message is built in its own buffer and
/// copied in behind its minimal length.
pub fn reference_encode(nodes: &[Node]) -> Vec<u8> {
    let mut out = Vec::new();
    for node in nodes {
        match node {
            Node::Varint(f, v) => {
                put_tag(&mut out, *f, 0);
                varint::encode(*v, &mut out);
            }
            Node::Zigzag(f, v) => {
                put_tag(&mut out, *f, 0);
                varint::encode(zigzag::encode(*v), &mut out);
            }
            Node::Fixed32(f, v) => {
                put_tag(&mut out, *f, 5);
                out.extend_from_slice(&v.to_le_bytes());
            }
            Node::Fixed64(f, v) => {
                put_tag(&mut out, *f, 1);
                out.extend_from_slice(&v.to_le_bytes());
            }
            Node::SFixed32(f, v) => {
                put_tag(&mut out, *f, 5);
                out.extend_from_slice(&v.to_le_bytes());
            }
            Node::SFixed64(f, v) => {
                put_tag(&mut out, *f, 1);
                out.extend_from_slice(&v.to_le_bytes());
            }
            Node::Bytes(f, data) => {
                put_tag(&mut out, *f, 2);
                varint::encode(data.len() as u64, &mut out);
                out.extend_from_slice(data);
            }
            Node::Message(f, children) => {
                let inner = reference_encode(children);
                put_tag(&mut out, *f, 2);
                varint::encode(inner.len() as u64, &mut out);
                out.extend_from_slice(&inner);
            }
        }
    }
    out
}

/// Decode `bytes` and compare with `nodes`, recursing into sub-messages.
///
/// When `len_prefix` is `Some(n)`, every sub-message length prefix must be
/// exactly `n` bytes.
pub fn assert_tree(bytes: &[u8], nodes: &[Node], len_prefix: Option<usize>) {
    let fields = parse(bytes).expect("output must parse");
    assert_eq!(fields.len(), nodes.len(), "field count");
    for (field, node) in fields.iter().zip(nodes) {
        match node {
            Node::Varint(f, v) => {
                assert_eq!(field.number, u64::from(*f));
                assert_eq!(field.value, Value::Varint(*v));
            }
            Node::Zigzag(f, v) => {
                assert_eq!(field.number, u64::from(*f));
                match field.value {
                    Value::Varint(raw) => assert_eq!(zigzag::decode(raw), *v),
                    ref other => panic!("expected varint, got {:?}", other),
                }
            }
            Node::Fixed32(f, v) => {
                assert_eq!(field.number, u64::from(*f));
                assert_eq!(field.value, Value::Fixed32(*v));
            }
            Node::Fixed64(f, v) => {
                assert_eq!(field.number, u64::from(*f));
                assert_eq!(field.value, Value::Fixed64(*v));
            }
            Node::SFixed32(f, v) => {
                assert_eq!(field.number, u64::from(*f));
                assert_eq!(field.value, Value::Fixed32(*v as u32));
            }
            Node::SFixed64(f, v) => {
                assert_eq!(field.number, u64::from(*f));
                assert_eq!(field.value, Value::Fixed64(*v as u64));
            }
            Node::Bytes(f, data) => {
                assert_eq!(field.number, u64::from(*f));
                assert_eq!(field.value, Value::Len(data.clone()));
            }
            Node::Message(f, children) => {
                assert_eq!(field.number, u64::from(*f));
                if let Some(width) = len_prefix {
                    assert_eq!(field.len_prefix, width, "sub-message length prefix width");
                }
                match &field.value {
                    Value::Len(content) => assert_tree(content, children, len_prefix),
                    other => panic!("expected sub-message, got {:?}", other),
                }
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Strategies
// -----------------------------------------------------------------------------

pub fn field_number() -> impl Strategy<Value = u32> {
    prop_oneof![1u32..19_000, 20_000u32..=MAX_FIELD_NUMBER]
}

pub fn leaf() -> impl Strategy<Value = Node> {
    prop_oneof![
        (field_number(), any::<u64>()).prop_map(|(f, v)| Node::Varint(f, v)),
        (field_number(), any::<i64>()).prop_map(|(f, v)| Node::Zigzag(f, v)),
        (field_number(), any::<u32>()).prop_map(|(f, v)| Node::Fixed32(f, v)),
        (field_number(), any::<u64>()).prop_map(|(f, v)| Node::Fixed64(f, v)),
        (field_number(), any::<i32>()).prop_map(|(f, v)| Node::SFixed32(f, v)),
        (field_number(), any::<i64>()).prop_map(|(f, v)| Node::SFixed64(f, v)),
        (field_number(), proptest::collection::vec(any::<u8>(), 0..300))
            .prop_map(|(f, v)| Node::Bytes(f, v)),
    ]
}

pub fn tree() -> impl Strategy<Value = Vec<Node>> {
    let node = leaf().prop_recursive(5, 96, 8, |inner| {
        (field_number(), proptest::collection::vec(inner, 0..8))
            .prop_map(|(f, children)| Node::Message(f, children))
    });
    proptest::collection::vec(node, 0..8)
}
