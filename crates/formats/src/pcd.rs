//! Point Cloud Data (`.pcd`) decoding, positions only.
//!
//! Supports the three data layouts found in the wild: `ascii`, `binary`
//! (row-major records) and `binary_compressed` (LZF-compressed, field-major).
//! Other fields (rgb, intensity, normals) are parsed past and ignored.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PcdError {
    #[error("missing DATA line in header")]
    MissingDataLine,
    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },
    #[error("unsupported DATA mode: {mode}")]
    UnsupportedDataMode { mode: String },
    #[error("unexpected end of data")]
    UnexpectedEof,
    #[error("LZF decompression failed: {reason}")]
    Decompression { reason: String },
    #[error("no position attribute found")]
    NoPositions,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DataMode {
    Ascii,
    Binary,
    BinaryCompressed,
}

impl DataMode {
    fn parse(raw: &str) -> Result<Self, PcdError> {
        match raw.to_ascii_lowercase().as_str() {
            "ascii" => Ok(Self::Ascii),
            "binary" => Ok(Self::Binary),
            "binary_compressed" => Ok(Self::BinaryCompressed),
            _ => Err(PcdError::UnsupportedDataMode {
                mode: raw.to_string(),
            }),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum ScalarType {
    Float,
    Signed,
    Unsigned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    scalar: ScalarType,
    pub size: usize,
    pub count: usize,
}

impl Field {
    fn stride(&self) -> usize {
        self.size * self.count
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PcdHeader {
    pub version: Option<String>,
    pub fields: Vec<Field>,
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub viewpoint: Option<Vec<f64>>,
    pub points: Option<usize>,
    pub data: DataMode,
    /// Byte offset of the first payload byte.
    pub header_len: usize,
}

impl PcdHeader {
    /// `POINTS`, or `WIDTH * HEIGHT` when `POINTS` is absent. `None` if the
    /// product overflows.
    pub fn point_count(&self) -> Option<usize> {
        self.points.or_else(|| match (self.width, self.height) {
            (Some(w), Some(h)) => w.checked_mul(h),
            _ => None,
        })
    }

    fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    fn record_size(&self) -> usize {
        self.fields.iter().map(Field::stride).sum()
    }

    /// Byte offset of `index` within a row-major record.
    fn record_offset(&self, index: usize) -> usize {
        self.fields[..index].iter().map(Field::stride).sum()
    }

    /// Token column of `index` within an ascii row.
    fn column_offset(&self, index: usize) -> usize {
        self.fields[..index].iter().map(|f| f.count).sum()
    }
}

pub fn parse_header(bytes: &[u8]) -> Result<PcdHeader, PcdError> {
    let mut version = None;
    let mut names: Vec<String> = Vec::new();
    let mut sizes: Option<Vec<usize>> = None;
    let mut types: Option<Vec<ScalarType>> = None;
    let mut counts: Option<Vec<usize>> = None;
    let mut width = None;
    let mut height = None;
    let mut viewpoint = None;
    let mut points = None;

    let mut pos = 0usize;
    while pos < bytes.len() {
        let end = bytes[pos..]
            .iter()
            .position(|&b| b == b'\n')
            .map(|i| pos + i + 1)
            .unwrap_or(bytes.len());
        let raw_line = String::from_utf8_lossy(&bytes[pos..end]);
        pos = end;

        let line = match raw_line.find('#') {
            Some(i) => &raw_line[..i],
            None => &raw_line[..],
        };
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };
        let rest: Vec<&str> = tokens.collect();

        match keyword.to_ascii_uppercase().as_str() {
            "VERSION" => version = rest.first().map(|s| s.to_string()),
            "FIELDS" => names = rest.iter().map(|s| s.to_string()).collect(),
            "SIZE" => sizes = Some(parse_list(keyword, &rest)?),
            "TYPE" => {
                types = Some(
                    rest.iter()
                        .map(|t| parse_scalar_type(t))
                        .collect::<Result<_, _>>()?,
                )
            }
            "COUNT" => counts = Some(parse_list(keyword, &rest)?),
            "WIDTH" => width = Some(parse_single(keyword, &rest)?),
            "HEIGHT" => height = Some(parse_single(keyword, &rest)?),
            "VIEWPOINT" => viewpoint = Some(parse_list(keyword, &rest)?),
            "POINTS" => points = Some(parse_single(keyword, &rest)?),
            "DATA" => {
                let mode = rest.first().ok_or(PcdError::MissingDataLine)?;
                let data = DataMode::parse(mode)?;
                let fields = build_fields(names, sizes, types, counts)?;
                fields
                    .iter()
                    .try_fold(0usize, |acc, f| acc.checked_add(f.stride()))
                    .ok_or_else(|| overflow("record size"))?;
                if let (Some(w), Some(h)) = (width, height) {
                    w.checked_mul(h).ok_or_else(|| overflow("WIDTH * HEIGHT"))?;
                }
                return Ok(PcdHeader {
                    version,
                    fields,
                    width,
                    height,
                    viewpoint,
                    points,
                    data,
                    header_len: pos,
                });
            }
            _ => {}
        }
    }
    Err(PcdError::MissingDataLine)
}

fn overflow(what: &str) -> PcdError {
    PcdError::InvalidHeader {
        reason: format!("{what} overflows"),
    }
}

fn parse_list<T: std::str::FromStr>(keyword: &str, tokens: &[&str]) -> Result<Vec<T>, PcdError> {
    tokens
        .iter()
        .map(|t| {
            t.parse().map_err(|_| PcdError::InvalidHeader {
                reason: format!("bad {keyword} value: {t}"),
            })
        })
        .collect()
}

fn parse_single(keyword: &str, tokens: &[&str]) -> Result<usize, PcdError> {
    let first = tokens.first().ok_or_else(|| PcdError::InvalidHeader {
        reason: format!("{keyword} has no value"),
    })?;
    first.parse().map_err(|_| PcdError::InvalidHeader {
        reason: format!("bad {keyword} value: {first}"),
    })
}

fn parse_scalar_type(token: &str) -> Result<ScalarType, PcdError> {
    match token.to_ascii_uppercase().as_str() {
        "F" => Ok(ScalarType::Float),
        "I" => Ok(ScalarType::Signed),
        "U" => Ok(ScalarType::Unsigned),
        _ => Err(PcdError::InvalidHeader {
            reason: format!("bad TYPE value: {token}"),
        }),
    }
}

/// Missing SIZE defaults to 4, TYPE to `F`, COUNT to 1.
fn build_fields(
    names: Vec<String>,
    sizes: Option<Vec<usize>>,
    types: Option<Vec<ScalarType>>,
    counts: Option<Vec<usize>>,
) -> Result<Vec<Field>, PcdError> {
    let n = names.len();
    let check = |keyword: &str, len: Option<usize>| match len {
        Some(len) if len != n => Err(PcdError::InvalidHeader {
            reason: format!("{keyword} lists {len} entries for {n} fields"),
        }),
        _ => Ok(()),
    };
    check("SIZE", sizes.as_ref().map(Vec::len))?;
    check("TYPE", types.as_ref().map(Vec::len))?;
    check("COUNT", counts.as_ref().map(Vec::len))?;

    names
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let size = sizes.as_ref().map_or(4, |s| s[i]);
            let scalar = types.as_ref().map_or(ScalarType::Float, |t| t[i]);
            let count = counts.as_ref().map_or(1, |c| c[i]);
            let valid_size = match scalar {
                ScalarType::Float => matches!(size, 4 | 8),
                _ => matches!(size, 1 | 2 | 4 | 8),
            };
            if !valid_size {
                return Err(PcdError::InvalidHeader {
                    reason: format!("unsupported SIZE {size} for field {name}"),
                });
            }
            if count == 0 {
                return Err(PcdError::InvalidHeader {
                    reason: format!("COUNT of field {name} is 0"),
                });
            }
            if size.checked_mul(count).is_none() {
                return Err(overflow(&format!("stride of field {name}")));
            }
            Ok(Field {
                name,
                scalar,
                size,
                count,
            })
        })
        .collect()
}

/// Decodes `x y z` triples into a flat buffer.
///
/// A missing `y` or `z` field, or an unparsable ascii token, yields NaN in
/// that channel. A missing `x` field or zero points is [`PcdError::NoPositions`].
pub fn decode_positions(bytes: &[u8]) -> Result<Vec<f64>, PcdError> {
    let header = parse_header(bytes)?;
    let x = header.field_index("x").ok_or(PcdError::NoPositions)?;
    let axes = [Some(x), header.field_index("y"), header.field_index("z")];
    let body = &bytes[header.header_len..];

    let positions = match header.data {
        DataMode::Ascii => decode_ascii(&header, body, axes),
        DataMode::Binary => decode_binary(&header, body, axes)?,
        DataMode::BinaryCompressed => decode_compressed(&header, body, axes)?,
    };
    if positions.is_empty() {
        return Err(PcdError::NoPositions);
    }
    tracing::debug!(
        points = positions.len() / 3,
        mode = ?header.data,
        "decoded PCD positions"
    );
    Ok(positions)
}

fn decode_ascii(header: &PcdHeader, body: &[u8], axes: [Option<usize>; 3]) -> Vec<f64> {
    let text = String::from_utf8_lossy(body);
    let columns = axes.map(|a| a.map(|i| header.column_offset(i)));
    let mut out = Vec::new();
    for line in text.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        for column in columns {
            let v = column
                .and_then(|c| tokens.get(c))
                .and_then(|t| t.parse::<f64>().ok())
                .unwrap_or(f64::NAN);
            out.push(v);
        }
    }
    out
}

fn required_point_count(header: &PcdHeader) -> Result<usize, PcdError> {
    header.point_count().ok_or_else(|| PcdError::InvalidHeader {
        reason: "missing POINTS".to_string(),
    })
}

fn decode_binary(
    header: &PcdHeader,
    body: &[u8],
    axes: [Option<usize>; 3],
) -> Result<Vec<f64>, PcdError> {
    let points = required_point_count(header)?;
    let record = header.record_size();
    let needed = points
        .checked_mul(record)
        .ok_or_else(|| overflow("POINTS * record size"))?;
    if needed > body.len() {
        return Err(PcdError::UnexpectedEof);
    }
    let offsets = axes.map(|a| a.map(|i| (header.record_offset(i), &header.fields[i])));

    // `points <= body.len()` here, so this is bounded by the input.
    let mut out = Vec::with_capacity(points.saturating_mul(3));
    for row in 0..points {
        for slot in offsets {
            let v = match slot {
                Some((offset, field)) => read_scalar(body, row * record + offset, field)?,
                None => f64::NAN,
            };
            out.push(v);
        }
    }
    Ok(out)
}

fn decode_compressed(
    header: &PcdHeader,
    body: &[u8],
    axes: [Option<usize>; 3],
) -> Result<Vec<f64>, PcdError> {
    let points = required_point_count(header)?;
    let expected = points
        .checked_mul(header.record_size())
        .ok_or_else(|| overflow("POINTS * record size"))?;
    let mut r = Reader::new(body);
    let compressed_size = r.read_u32()? as usize;
    let raw_size = r.read_u32()? as usize;
    if raw_size != expected {
        return Err(PcdError::InvalidHeader {
            reason: format!("uncompressed size {raw_size}, header implies {expected}"),
        });
    }
    let compressed = r.read_exact(compressed_size)?;
    let raw = lzf_decompress(compressed, raw_size)?;

    // Field-major: all values of field 0, then all of field 1, ...
    let offsets = axes.map(|a| {
        a.map(|i| {
            let start: usize = header.fields[..i].iter().map(|f| f.stride() * points).sum();
            (start, &header.fields[i])
        })
    });

    let mut out = Vec::with_capacity(points.saturating_mul(3));
    for row in 0..points {
        for slot in offsets {
            let v = match slot {
                Some((start, field)) => read_scalar(&raw, start + row * field.stride(), field)?,
                None => f64::NAN,
            };
            out.push(v);
        }
    }
    Ok(out)
}

fn read_scalar(bytes: &[u8], at: usize, field: &Field) -> Result<f64, PcdError> {
    let end = at.checked_add(field.size).ok_or(PcdError::UnexpectedEof)?;
    let b = bytes.get(at..end).ok_or(PcdError::UnexpectedEof)?;
    let v = match (field.scalar, b) {
        (ScalarType::Float, &[a0, a1, a2, a3]) => f32::from_le_bytes([a0, a1, a2, a3]) as f64,
        (ScalarType::Float, &[a0, a1, a2, a3, a4, a5, a6, a7]) => {
            f64::from_le_bytes([a0, a1, a2, a3, a4, a5, a6, a7])
        }
        (ScalarType::Signed, &[a0]) => i8::from_le_bytes([a0]) as f64,
        (ScalarType::Signed, &[a0, a1]) => i16::from_le_bytes([a0, a1]) as f64,
        (ScalarType::Signed, &[a0, a1, a2, a3]) => i32::from_le_bytes([a0, a1, a2, a3]) as f64,
        (ScalarType::Signed, &[a0, a1, a2, a3, a4, a5, a6, a7]) => {
            i64::from_le_bytes([a0, a1, a2, a3, a4, a5, a6, a7]) as f64
        }
        (ScalarType::Unsigned, &[a0]) => a0 as f64,
        (ScalarType::Unsigned, &[a0, a1]) => u16::from_le_bytes([a0, a1]) as f64,
        (ScalarType::Unsigned, &[a0, a1, a2, a3]) => u32::from_le_bytes([a0, a1, a2, a3]) as f64,
        (ScalarType::Unsigned, &[a0, a1, a2, a3, a4, a5, a6, a7]) => {
            u64::from_le_bytes([a0, a1, a2, a3, a4, a5, a6, a7]) as f64
        }
        _ => {
            return Err(PcdError::InvalidHeader {
                reason: format!("unsupported SIZE {} for field {}", field.size, field.name),
            });
        }
    };
    Ok(v)
}

/// Longest output one LZF back-reference (3 input bytes) can produce, per input byte.
const LZF_MAX_EXPANSION: usize = 88;

/// LZF (liblzf) block decompression.
pub fn lzf_decompress(input: &[u8], raw_size: usize) -> Result<Vec<u8>, PcdError> {
    if raw_size > input.len().saturating_mul(LZF_MAX_EXPANSION) {
        return Err(PcdError::Decompression {
            reason: format!("{} bytes cannot expand to {raw_size}", input.len()),
        });
    }
    let mut out: Vec<u8> = Vec::with_capacity(raw_size);
    let mut r = Reader::new(input);

    while !r.is_empty() {
        let ctrl = r.read_u8()? as usize;
        if ctrl < 32 {
            let literal = r.read_exact(ctrl + 1)?;
            if out.len() + literal.len() > raw_size {
                return Err(PcdError::Decompression {
                    reason: "output overrun".to_string(),
                });
            }
            out.extend_from_slice(literal);
        } else {
            let mut len = ctrl >> 5;
            if len == 7 {
                len += r.read_u8()? as usize;
            }
            len += 2;
            let back = ((ctrl & 0x1f) << 8) + r.read_u8()? as usize + 1;
            if back > out.len() {
                return Err(PcdError::Decompression {
                    reason: "back-reference before start of output".to_string(),
                });
            }
            if out.len() + len > raw_size {
                return Err(PcdError::Decompression {
                    reason: "output overrun".to_string(),
                });
            }
            // Byte-wise: the source range may overlap what we are writing.
            let start = out.len() - back;
            for k in 0..len {
                let b = out[start + k];
                out.push(b);
            }
        }
    }

    if out.len() != raw_size {
        return Err(PcdError::Decompression {
            reason: format!("expected {raw_size} bytes, got {}", out.len()),
        });
    }
    Ok(out)
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn read_u8(&mut self) -> Result<u8, PcdError> {
        let b = *self.bytes.get(self.pos).ok_or(PcdError::UnexpectedEof)?;
        self.pos += 1;
        Ok(b)
    }

    fn read_exact(&mut self, n: usize) -> Result<&'a [u8], PcdError> {
        let end = self.pos.checked_add(n).ok_or(PcdError::UnexpectedEof)?;
        let out = self
            .bytes
            .get(self.pos..end)
            .ok_or(PcdError::UnexpectedEof)?;
        self.pos = end;
        Ok(out)
    }

    fn read_u32(&mut self) -> Result<u32, PcdError> {
        let b = self.read_exact(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}

#[cfg(test)]
mod tests {
    use super::{DataMode, PcdError, decode_positions, lzf_decompress, parse_header};
    use pretty_assertions::assert_eq;

    fn header(fields: &str, size: &str, ty: &str, count: &str, points: usize, data: &str) -> String {
        format!(
            "# .PCD v0.7 - Point Cloud Data file format\n\
             VERSION 0.7\n\
             FIELDS {fields}\n\
             SIZE {size}\n\
             TYPE {ty}\n\
             COUNT {count}\n\
             WIDTH {points}\n\
             HEIGHT 1\n\
             VIEWPOINT 0 0 0 1 0 0 0\n\
             POINTS {points}\n\
             DATA {data}\n"
        )
    }

    #[test]
    fn parses_header_fields() {
        let text = header("x y z rgb", "4 4 4 4", "F F F U", "1 1 1 1", 2, "ascii");
        let h = parse_header(text.as_bytes()).unwrap();
        assert_eq!(h.version.as_deref(), Some("0.7"));
        assert_eq!(h.fields.len(), 4);
        assert_eq!(h.point_count(), Some(2));
        assert_eq!(h.data, DataMode::Ascii);
        assert_eq!(h.header_len, text.len());
        assert_eq!(h.viewpoint.as_ref().map(Vec::len), Some(7));
    }

    #[test]
    fn decodes_ascii() {
        let mut text = header("x y z", "4 4 4", "F F F", "1 1 1", 2, "ascii");
        text.push_str("1 2 3\n\n4.5 5 -6\n");
        assert_eq!(
            decode_positions(text.as_bytes()).unwrap(),
            vec![1.0, 2.0, 3.0, 4.5, 5.0, -6.0]
        );
    }

    #[test]
    fn ascii_columns_account_for_count() {
        let mut text = header("normal x y z", "4 4 4 4", "F F F F", "3 1 1 1", 1, "ascii");
        text.push_str("0 0 1 7 8 9\n");
        assert_eq!(decode_positions(text.as_bytes()).unwrap(), vec![7.0, 8.0, 9.0]);
    }

    #[test]
    fn missing_z_field_is_nan() {
        let mut text = header("x y", "4 4", "F F", "1 1", 1, "ascii");
        text.push_str("1 2\n");
        let out = decode_positions(text.as_bytes()).unwrap();
        assert_eq!(&out[..2], &[1.0, 2.0]);
        assert!(out[2].is_nan());
    }

    #[test]
    fn no_x_field_or_no_points_is_an_error() {
        let mut text = header("intensity", "4", "F", "1", 1, "ascii");
        text.push_str("1\n");
        assert_eq!(decode_positions(text.as_bytes()), Err(PcdError::NoPositions));

        let text = header("x y z", "4 4 4", "F F F", "1 1 1", 0, "ascii");
        assert_eq!(decode_positions(text.as_bytes()), Err(PcdError::NoPositions));
    }

    #[test]
    fn rejects_bad_headers() {
        assert_eq!(
            decode_positions(b"VERSION 0.7\nFIELDS x y z\n"),
            Err(PcdError::MissingDataLine)
        );
        let text = header("x y z", "4 4", "F F F", "1 1 1", 1, "ascii");
        assert!(matches!(
            decode_positions(text.as_bytes()),
            Err(PcdError::InvalidHeader { .. })
        ));
        let text = header("x y z", "4 4 4", "F F F", "1 1 1", 1, "lzma");
        assert!(matches!(
            decode_positions(text.as_bytes()),
            Err(PcdError::UnsupportedDataMode { .. })
        ));
    }

    #[test]
    fn decodes_binary_records_with_mixed_types() {
        let mut bytes = header("x y z intensity", "4 8 2 1", "F F I U", "1 1 1 1", 2, "binary")
            .into_bytes();
        for (x, y, z, i) in [(1.5f32, -2.0f64, 3i16, 9u8), (4.0, 5.25, -6, 1)] {
            bytes.extend_from_slice(&x.to_le_bytes());
            bytes.extend_from_slice(&y.to_le_bytes());
            bytes.extend_from_slice(&z.to_le_bytes());
            bytes.push(i);
        }
        assert_eq!(
            decode_positions(&bytes).unwrap(),
            vec![1.5, -2.0, 3.0, 4.0, 5.25, -6.0]
        );
    }

    #[test]
    fn truncated_binary_is_an_error() {
        let mut bytes = header("x y z", "4 4 4", "F F F", "1 1 1", 2, "binary").into_bytes();
        bytes.extend_from_slice(&[0u8; 12]);
        assert_eq!(decode_positions(&bytes), Err(PcdError::UnexpectedEof));
    }

    #[test]
    fn huge_point_counts_are_rejected_before_allocating() {
        let text = header("x y z", "4 4 4", "F F F", "1 1 1", 1_000_000_000_000_000, "binary");
        assert_eq!(decode_positions(text.as_bytes()), Err(PcdError::UnexpectedEof));

        let text = header("x y z", "8 8 8", "F F F", "1 1 1", usize::MAX / 2, "binary");
        assert!(matches!(
            decode_positions(text.as_bytes()),
            Err(PcdError::InvalidHeader { .. })
        ));

        let text = format!(
            "FIELDS x y z\nWIDTH {}\nHEIGHT 2\nDATA binary\n",
            usize::MAX
        );
        assert!(matches!(
            decode_positions(text.as_bytes()),
            Err(PcdError::InvalidHeader { .. })
        ));

        let text = format!("FIELDS x\nCOUNT {}\nSIZE 8\nPOINTS 1\nDATA binary\n", usize::MAX);
        assert!(matches!(
            decode_positions(text.as_bytes()),
            Err(PcdError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn compressed_sizes_must_agree_with_the_header() {
        let mut bytes =
            header("x y z", "4 4 4", "F F F", "1 1 1", 1_000_000_000, "binary_compressed")
                .into_bytes();
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        bytes.extend_from_slice(&[0x00, 0x00]);
        assert!(matches!(
            decode_positions(&bytes),
            Err(PcdError::InvalidHeader { .. })
        ));

        // Consistent with the header, but two bytes cannot inflate that far.
        assert!(matches!(
            lzf_decompress(&[0x00, 0x00], 1 << 20),
            Err(PcdError::Decompression { .. })
        ));
    }

    #[test]
    fn lzf_literal_and_back_reference() {
        // literal "ab", then copy 4 bytes from 2 back: "ababab"
        let input = [0x01, b'a', b'b', 0x40, 0x01];
        assert_eq!(lzf_decompress(&input, 6).unwrap(), b"ababab".to_vec());
        assert!(lzf_decompress(&input, 5).is_err());
        assert!(lzf_decompress(&[0x40, 0x00], 3).is_err());
    }

    #[test]
    fn decodes_binary_compressed_field_major() {
        let mut raw = Vec::new();
        for x in [1.0f32, 2.0] {
            raw.extend_from_slice(&x.to_le_bytes());
        }
        for y in [3.0f32, 4.0] {
            raw.extend_from_slice(&y.to_le_bytes());
        }
        for z in [5.0f32, 6.0] {
            raw.extend_from_slice(&z.to_le_bytes());
        }
        // A single literal run holds at most 32 bytes; 24 fits.
        let mut compressed = vec![(raw.len() - 1) as u8];
        compressed.extend_from_slice(&raw);

        let mut bytes =
            header("x y z", "4 4 4", "F F F", "1 1 1", 2, "binary_compressed").into_bytes();
        bytes.extend_from_slice(&(compressed.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&(raw.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&compressed);

        assert_eq!(
            decode_positions(&bytes).unwrap(),
            vec![1.0, 3.0, 5.0, 2.0, 4.0, 6.0]
        );
    }
}
