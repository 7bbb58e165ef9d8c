use super::{Value, MAGIC, VERSION};

/// Encodes `value` as a `bplist00` file with `value` as the top object.
///
/// Objects are numbered depth-first, containers before their members, and are never
/// shared: a value that appears twice is written twice.
pub fn to_bytes(value: &Value) -> Vec<u8> {
    let count = count_objects(value);
    let mut writer = Writer {
        out: [&MAGIC[..], &VERSION[..]].concat(),
        offsets: Vec::with_capacity(count),
        ref_size: min_width(count as u64 - 1),
    };
    writer.write(value, 0);

    let Writer {
        mut out,
        offsets,
        ref_size,
    } = writer;
    let table_offset = out.len() as u64;
    let offset_size = min_width(offsets.last().copied().unwrap_or(0) as u64);
    for offset in &offsets {
        push_sized(&mut out, *offset as u64, offset_size);
    }

    out.extend_from_slice(&[0; 6]);
    out.push(offset_size as u8);
    out.push(ref_size as u8);
    out.extend_from_slice(&(offsets.len() as u64).to_be_bytes());
    out.extend_from_slice(&0u64.to_be_bytes());
    out.extend_from_slice(&table_offset.to_be_bytes());
    out
}

struct Writer {
    out: Vec<u8>,
    offsets: Vec<usize>,
    ref_size: usize,
}

impl Writer {
    fn write(&mut self, value: &Value, index: usize) {
        debug_assert_eq!(index, self.offsets.len());
        self.offsets.push(self.out.len());

        match value {
            Value::Null => self.out.push(0x00),
            Value::Boolean(false) => self.out.push(0x08),
            Value::Boolean(true) => self.out.push(0x09),
            Value::Integer(n) => self.integer(*n),
            Value::Real(r) => {
                self.out.push(0x23);
                self.out.extend_from_slice(&r.to_be_bytes());
            }
            Value::Date(d) => {
                self.out.push(0x33);
                self.out.extend_from_slice(&d.to_be_bytes());
            }
            Value::Data(bytes) => {
                self.header(0x4, bytes.len());
                self.out.extend_from_slice(bytes);
            }
            Value::String(s) if s.is_ascii() => {
                self.header(0x5, s.len());
                self.out.extend_from_slice(s.as_bytes());
            }
            Value::String(s) => {
                let units: Vec<u16> = s.encode_utf16().collect();
                self.header(0x6, units.len());
                for unit in units {
                    self.out.extend_from_slice(&unit.to_be_bytes());
                }
            }
            Value::Uid(uid) => {
                let width = min_width(*uid);
                self.out.push(0x80 | (width - 1) as u8);
                push_sized(&mut self.out, *uid, width);
            }
            Value::Array(items) => {
                self.header(0xa, items.len());
                let mut next = index + 1;
                for item in items {
                    self.reference(next);
                    next += count_objects(item);
                }
                let mut next = index + 1;
                for item in items {
                    self.write(item, next);
                    next += count_objects(item);
                }
            }
            Value::Dictionary(map) => {
                self.header(0xd, map.len());
                let first_value = index + 1 + map.len();
                for i in 0..map.len() {
                    self.reference(index + 1 + i);
                }
                let mut next = first_value;
                for value in map.values() {
                    self.reference(next);
                    next += count_objects(value);
                }
                for (i, key) in map.keys().enumerate() {
                    self.write(&Value::String(key.clone()), index + 1 + i);
                }
                let mut next = first_value;
                for value in map.values() {
                    self.write(value, next);
                    next += count_objects(value);
                }
            }
        }
    }

    fn integer(&mut self, n: i64) {
        match n {
            0..=0xff => {
                self.out.push(0x10);
                push_sized(&mut self.out, n as u64, 1);
            }
            0x100..=0xffff => {
                self.out.push(0x11);
                push_sized(&mut self.out, n as u64, 2);
            }
            0x1_0000..=0xffff_ffff => {
                self.out.push(0x12);
                push_sized(&mut self.out, n as u64, 4);
            }
            _ => {
                self.out.push(0x13);
                self.out.extend_from_slice(&n.to_be_bytes());
            }
        }
    }

    fn header(&mut self, kind: u8, len: usize) {
        if len < 0x0f {
            self.out.push((kind << 4) | len as u8);
        } else {
            self.out.push((kind << 4) | 0x0f);
            self.integer(len as i64);
        }
    }

    fn reference(&mut self, index: usize) {
        push_sized(&mut self.out, index as u64, self.ref_size);
    }
}

fn count_objects(value: &Value) -> usize {
    match value {
        Value::Array(items) => 1 + items.iter().map(count_objects).sum::<usize>(),
        Value::Dictionary(map) => 1 + map.len() + map.values().map(count_objects).sum::<usize>(),
        _ => 1,
    }
}

fn min_width(n: u64) -> usize {
    match n {
        0..=0xff => 1,
        0x100..=0xffff => 2,
        0x1_0000..=0xffff_ffff => 4,
        _ => 8,
    }
}

fn push_sized(out: &mut Vec<u8>, n: u64, width: usize) {
    out.extend_from_slice(&n.to_be_bytes()[8 - width..]);
}
