use super::{Value, HEADER_LEN, MAGIC, TRAILER_LEN, VERSION};
use crate::error::DecodeError;
use std::collections::BTreeMap;

type Result<T> = std::result::Result<T, DecodeError>;

const MAX_DEPTH: usize = 512;
const MAX_VALUES: usize = 1 << 20;

/// Decodes a complete `bplist00` file into its top object.
pub fn from_bytes(data: &[u8]) -> Result<Value> {
    let trailer = Trailer::parse(data)?;
    let offsets = trailer.offset_table(data)?;
    let mut parser = Parser {
        data: &data[..trailer.table_offset],
        ref_size: trailer.ref_size,
        active: vec![false; offsets.len()],
        offsets,
        depth: 0,
        decoded: 0,
    };
    parser.object(trailer.top_object)
}

#[derive(Debug)]
struct Trailer {
    offset_size: usize,
    ref_size: usize,
    num_objects: usize,
    top_object: u64,
    table_offset: usize,
}

impl Trailer {
    fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LEN + TRAILER_LEN {
            return Err(DecodeError::TooShort(data.len()));
        }
        if &data[..MAGIC.len()] != MAGIC {
            return Err(DecodeError::BadMagic);
        }
        let version = &data[MAGIC.len()..HEADER_LEN];
        if version != VERSION {
            return Err(DecodeError::UnsupportedVersion(
                String::from_utf8_lossy(version).into_owned(),
            ));
        }

        let t = &data[data.len() - TRAILER_LEN..];
        let offset_size = t[6] as usize;
        let ref_size = t[7] as usize;
        let num_objects = be_uint(&t[8..16]);
        let top_object = be_uint(&t[16..24]);
        let table_offset = be_uint(&t[24..32]);

        if !(1..=8).contains(&offset_size) {
            return Err(DecodeError::InvalidTrailer("offset size must be 1 to 8 bytes"));
        }
        if !(1..=8).contains(&ref_size) {
            return Err(DecodeError::InvalidTrailer("reference size must be 1 to 8 bytes"));
        }
        if num_objects == 0 {
            return Err(DecodeError::InvalidTrailer("no objects"));
        }
        if top_object >= num_objects {
            return Err(DecodeError::InvalidTrailer("top object out of range"));
        }

        let table_limit = (data.len() - TRAILER_LEN) as u64;
        let table_end = num_objects
            .checked_mul(offset_size as u64)
            .and_then(|len| len.checked_add(table_offset));
        match table_end {
            Some(end) if table_offset >= HEADER_LEN as u64 && end <= table_limit => {}
            _ => return Err(DecodeError::InvalidTrailer("offset table out of bounds")),
        }

        // Both values are bounded by the buffer length at this point.
        Ok(Self {
            offset_size,
            ref_size,
            num_objects: num_objects as usize,
            top_object,
            table_offset: table_offset as usize,
        })
    }

    fn offset_table(&self, data: &[u8]) -> Result<Vec<usize>> {
        let start = self.table_offset;
        let table = &data[start..start + self.num_objects * self.offset_size];
        table
            .chunks_exact(self.offset_size)
            .map(|chunk| {
                let offset = be_uint(chunk);
                if offset < HEADER_LEN as u64 || offset >= self.table_offset as u64 {
                    Err(DecodeError::OffsetOutOfBounds { offset })
                } else {
                    Ok(offset as usize)
                }
            })
            .collect()
    }
}

struct Parser<'a> {
    /// Everything before the offset table; objects never extend past it.
    data: &'a [u8],
    ref_size: usize,
    offsets: Vec<usize>,
    /// Objects currently being decoded, for cycle detection.
    active: Vec<bool>,
    depth: usize,
    decoded: usize,
}

impl<'a> Parser<'a> {
    fn object(&mut self, index: u64) -> Result<Value> {
        let count = self.offsets.len() as u64;
        if index >= count {
            return Err(DecodeError::RefOutOfRange { index, count });
        }
        let slot = index as usize;
        if self.active[slot] {
            return Err(DecodeError::Cycle(index));
        }
        if self.depth >= MAX_DEPTH {
            return Err(DecodeError::TooDeep(MAX_DEPTH));
        }
        self.decoded += 1;
        if self.decoded > MAX_VALUES {
            return Err(DecodeError::ExpansionLimit(MAX_VALUES));
        }

        self.active[slot] = true;
        self.depth += 1;
        let value = self.parse_at(self.offsets[slot]);
        self.depth -= 1;
        self.active[slot] = false;
        value
    }

    fn parse_at(&mut self, offset: usize) -> Result<Value> {
        let mut cur = Cursor::new(self.data, offset);
        let marker = cur.u8()?;
        let info = marker & 0x0f;
        let unknown = DecodeError::UnknownMarker { marker, offset };

        match marker >> 4 {
            0x0 => match info {
                0x0 | 0xf => Ok(Value::Null),
                0x8 => Ok(Value::Boolean(false)),
                0x9 => Ok(Value::Boolean(true)),
                _ => Err(unknown),
            },
            0x1 => cur.integer(info).map(Value::Integer),
            0x2 => match info {
                2 => {
                    let bytes = cur.array::<4>()?;
                    Ok(Value::Real(f32::from_be_bytes(bytes) as f64))
                }
                3 => Ok(Value::Real(f64::from_be_bytes(cur.array::<8>()?))),
                _ => Err(unknown),
            },
            0x3 if info == 3 => Ok(Value::Date(f64::from_be_bytes(cur.array::<8>()?))),
            0x4 => {
                let len = cur.length(info)?;
                Ok(Value::Data(cur.take(len)?.to_vec()))
            }
            0x5 => {
                let len = cur.length(info)?;
                let bytes = cur.take(len)?;
                if !bytes.is_ascii() {
                    return Err(DecodeError::InvalidString(offset));
                }
                String::from_utf8(bytes.to_vec())
                    .map(Value::String)
                    .map_err(|_| DecodeError::InvalidString(offset))
            }
            0x6 => {
                let units = cur.length(info)?;
                let byte_len = units
                    .checked_mul(2)
                    .ok_or(DecodeError::UnexpectedEof(cur.pos))?;
                let units: Vec<u16> = cur
                    .take(byte_len)?
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16(&units)
                    .map(Value::String)
                    .map_err(|_| DecodeError::InvalidString(offset))
            }
            0x8 => {
                let bytes = cur.take(info as usize + 1)?;
                let (high, low) = bytes.split_at(bytes.len().saturating_sub(8));
                if high.iter().any(|&b| b != 0) {
                    return Err(DecodeError::IntegerOverflow(offset));
                }
                Ok(Value::Uid(be_uint(low)))
            }
            0xa => {
                let len = cur.length(info)?;
                let refs = cur.refs(len, self.ref_size)?;
                let mut items = Vec::with_capacity(refs.len());
                for r in refs {
                    items.push(self.object(r)?);
                }
                Ok(Value::Array(items))
            }
            0xd => {
                let len = cur.length(info)?;
                let key_refs = cur.refs(len, self.ref_size)?;
                let value_refs = cur.refs(len, self.ref_size)?;
                let mut map = BTreeMap::new();
                for (k, v) in key_refs.into_iter().zip(value_refs) {
                    let key = match self.object(k)? {
                        Value::String(key) => key,
                        _ => return Err(DecodeError::NonStringKey(offset)),
                    };
                    map.insert(key, self.object(v)?);
                }
                Ok(Value::Dictionary(map))
            }
            _ => Err(unknown),
        }
    }
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    fn u8(&mut self) -> Result<u8> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or(DecodeError::UnexpectedEof(self.pos))?;
        self.pos += 1;
        Ok(byte)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(DecodeError::UnexpectedEof(self.pos))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Integer payload following a `0x1n` marker.
    fn integer(&mut self, info: u8) -> Result<i64> {
        let start = self.pos;
        match info {
            0..=2 => Ok(be_uint(self.take(1 << info)?) as i64),
            3 => Ok(i64::from_be_bytes(self.array::<8>()?)),
            4 => {
                let wide = i128::from_be_bytes(self.array::<16>()?);
                i64::try_from(wide).map_err(|_| DecodeError::IntegerOverflow(start))
            }
            _ => Err(DecodeError::UnknownMarker {
                marker: 0x10 | info,
                offset: start.saturating_sub(1),
            }),
        }
    }

    /// Object length: the low nibble, or a following integer object when it is `0xf`.
    fn length(&mut self, info: u8) -> Result<usize> {
        if info != 0x0f {
            return Ok(info as usize);
        }
        let offset = self.pos;
        let marker = self.u8()?;
        if marker >> 4 != 0x1 {
            return Err(DecodeError::UnknownMarker { marker, offset });
        }
        let len = self.integer(marker & 0x0f)?;
        usize::try_from(len).map_err(|_| DecodeError::IntegerOverflow(offset))
    }

    fn refs(&mut self, count: usize, ref_size: usize) -> Result<Vec<u64>> {
        let len = count
            .checked_mul(ref_size)
            .ok_or(DecodeError::UnexpectedEof(self.pos))?;
        Ok(self.take(len)?.chunks_exact(ref_size).map(be_uint).collect())
    }
}

fn be_uint(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64)
}
