//! Binary tracking file codec.
//!
//! The file is a protobuf-encoded message with this layout:
//!
//! ```text
//! Tracker   { repeated Frame frame = 1; Timestamp last_updated = 2; }
//! Frame     { int32 id = 1; float rotation = 2; Box bounding_box = 3; }
//! Box       { float x1 = 1; float y1 = 2; float x2 = 3; float y2 = 4; }
//! Timestamp { int64 seconds = 1; int32 nanos = 2; }
//! ```
//!
//! Only the wire types needed by this layout are understood; unknown fields are skipped.

use std::io::{Cursor, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use chrono::{DateTime, Utc};

use crate::foundation::error::{TrackerError, TrackerResult};

const WIRE_VARINT: u8 = 0;
const WIRE_FIXED64: u8 = 1;
const WIRE_LEN: u8 = 2;
const WIRE_FIXED32: u8 = 5;

/// Decoded tracking file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackingFile {
    pub frames: Vec<TrackedFrame>,
    pub last_updated: Option<Timestamp>,
}

/// One per-frame record as stored in the file. Nothing here is validated.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TrackedFrame {
    pub id: i32,
    pub rotation: f32,
    pub bounding_box: CornerBox,
}

/// Box given by two corner points, normalized to the frame size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CornerBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

impl Timestamp {
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self {
            seconds: dt.timestamp(),
            nanos: dt.timestamp_subsec_nanos() as i32,
        }
    }

    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        let nanos = u32::try_from(self.nanos).ok()?;
        DateTime::from_timestamp(self.seconds, nanos)
    }
}

impl TrackingFile {
    pub fn decode(bytes: &[u8]) -> TrackerResult<Self> {
        let mut r = WireReader::new(bytes);
        let mut out = Self::default();
        while !r.is_eof() {
            let (field, wire) = r.read_key()?;
            match (field, wire) {
                (1, WIRE_LEN) => out.frames.push(decode_frame(r.read_len_delimited()?)?),
                (2, WIRE_LEN) => {
                    out.last_updated = Some(decode_timestamp(r.read_len_delimited()?)?)
                }
                (1 | 2, other) => return Err(unexpected_wire("Tracker", field, other)),
                (_, other) => r.skip(other)?,
            }
        }
        Ok(out)
    }

    pub fn encode(&self) -> TrackerResult<Vec<u8>> {
        let mut w = WireWriter::default();
        for frame in &self.frames {
            w.write_message(1, &encode_frame(frame)?)?;
        }
        if let Some(ts) = self.last_updated {
            let mut inner = WireWriter::default();
            inner.write_varint_field(1, ts.seconds as u64)?;
            inner.write_varint_field(2, i64::from(ts.nanos) as u64)?;
            w.write_message(2, &inner.buf)?;
        }
        Ok(w.buf)
    }
}

fn decode_frame(bytes: &[u8]) -> TrackerResult<TrackedFrame> {
    let mut r = WireReader::new(bytes);
    let mut frame = TrackedFrame::default();
    while !r.is_eof() {
        let (field, wire) = r.read_key()?;
        match (field, wire) {
            // int32 travels as a sign-extended varint; truncation restores it.
            (1, WIRE_VARINT) => frame.id = r.read_varint()? as i32,
            (2, WIRE_FIXED32) => frame.rotation = r.read_f32()?,
            (3, WIRE_LEN) => frame.bounding_box = decode_box(r.read_len_delimited()?)?,
            (1..=3, other) => return Err(unexpected_wire("Frame", field, other)),
            (_, other) => r.skip(other)?,
        }
    }
    Ok(frame)
}

fn decode_box(bytes: &[u8]) -> TrackerResult<CornerBox> {
    let mut r = WireReader::new(bytes);
    let mut b = CornerBox::default();
    while !r.is_eof() {
        let (field, wire) = r.read_key()?;
        match (field, wire) {
            (1, WIRE_FIXED32) => b.x1 = r.read_f32()?,
            (2, WIRE_FIXED32) => b.y1 = r.read_f32()?,
            (3, WIRE_FIXED32) => b.x2 = r.read_f32()?,
            (4, WIRE_FIXED32) => b.y2 = r.read_f32()?,
            (1..=4, other) => return Err(unexpected_wire("Box", field, other)),
            (_, other) => r.skip(other)?,
        }
    }
    Ok(b)
}

fn decode_timestamp(bytes: &[u8]) -> TrackerResult<Timestamp> {
    let mut r = WireReader::new(bytes);
    let mut ts = Timestamp::default();
    while !r.is_eof() {
        let (field, wire) = r.read_key()?;
        match (field, wire) {
            (1, WIRE_VARINT) => ts.seconds = r.read_varint()? as i64,
            (2, WIRE_VARINT) => ts.nanos = r.read_varint()? as i32,
            (1 | 2, other) => return Err(unexpected_wire("Timestamp", field, other)),
            (_, other) => r.skip(other)?,
        }
    }
    Ok(ts)
}

fn encode_frame(frame: &TrackedFrame) -> TrackerResult<Vec<u8>> {
    let b = &frame.bounding_box;
    let mut bw = WireWriter::default();
    for (field, v) in [(1, b.x1), (2, b.y1), (3, b.x2), (4, b.y2)] {
        bw.write_f32_field(field, v)?;
    }

    let mut w = WireWriter::default();
    w.write_varint_field(1, i64::from(frame.id) as u64)?;
    w.write_f32_field(2, frame.rotation)?;
    w.write_message(3, &bw.buf)?;
    Ok(w.buf)
}

fn unexpected_wire(message: &str, field: u64, wire: u8) -> TrackerError {
    TrackerError::tracking_data(format!(
        "{message} field {field} has unexpected wire type {wire}"
    ))
}

fn truncated(what: &str) -> TrackerError {
    TrackerError::tracking_data(format!("truncated input while reading {what}"))
}

struct WireReader<'a> {
    cur: Cursor<&'a [u8]>,
}

impl<'a> WireReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            cur: Cursor::new(bytes),
        }
    }

    fn remaining(&self) -> usize {
        let len = self.cur.get_ref().len();
        len.saturating_sub(self.cur.position() as usize)
    }

    fn is_eof(&self) -> bool {
        self.remaining() == 0
    }

    fn read_varint(&mut self) -> TrackerResult<u64> {
        let mut value = 0u64;
        for shift in (0..64).step_by(7) {
            let byte = self.cur.read_u8().map_err(|_| truncated("varint"))?;
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(TrackerError::tracking_data("varint longer than 10 bytes"))
    }

    fn read_key(&mut self) -> TrackerResult<(u64, u8)> {
        let key = self.read_varint()?;
        let field = key >> 3;
        if field == 0 {
            return Err(TrackerError::tracking_data("field number 0 is invalid"));
        }
        Ok((field, (key & 0x7) as u8))
    }

    fn read_f32(&mut self) -> TrackerResult<f32> {
        self.cur
            .read_f32::<LittleEndian>()
            .map_err(|_| truncated("fixed32"))
    }

    fn read_len_delimited(&mut self) -> TrackerResult<&'a [u8]> {
        let len = usize::try_from(self.read_varint()?)
            .map_err(|_| TrackerError::tracking_data("length prefix overflows usize"))?;
        if len > self.remaining() {
            return Err(truncated("length-delimited field"));
        }
        let start = self.cur.position() as usize;
        let bytes: &'a [u8] = *self.cur.get_ref();
        self.cur.set_position((start + len) as u64);
        Ok(&bytes[start..start + len])
    }

    fn skip(&mut self, wire: u8) -> TrackerResult<()> {
        match wire {
            WIRE_VARINT => self.read_varint().map(|_| ()),
            WIRE_FIXED64 => self
                .cur
                .read_u64::<LittleEndian>()
                .map(|_| ())
                .map_err(|_| truncated("fixed64")),
            WIRE_LEN => self.read_len_delimited().map(|_| ()),
            WIRE_FIXED32 => self
                .cur
                .read_u32::<LittleEndian>()
                .map(|_| ())
                .map_err(|_| truncated("fixed32")),
            other => Err(TrackerError::tracking_data(format!(
                "unsupported wire type {other}"
            ))),
        }
    }
}

#[derive(Default)]
struct WireWriter {
    buf: Vec<u8>,
}

impl WireWriter {
    fn write_varint(&mut self, mut v: u64) -> TrackerResult<()> {
        while v >= 0x80 {
            self.put_u8((v as u8) | 0x80)?;
            v >>= 7;
        }
        self.put_u8(v as u8)
    }

    fn write_key(&mut self, field: u64, wire: u8) -> TrackerResult<()> {
        self.write_varint((field << 3) | u64::from(wire))
    }

    fn write_varint_field(&mut self, field: u64, v: u64) -> TrackerResult<()> {
        self.write_key(field, WIRE_VARINT)?;
        self.write_varint(v)
    }

    fn write_f32_field(&mut self, field: u64, v: f32) -> TrackerResult<()> {
        self.write_key(field, WIRE_FIXED32)?;
        self.buf
            .write_f32::<LittleEndian>(v)
            .map_err(|e| TrackerError::serde(format!("write fixed32: {e}")))
    }

    fn write_message(&mut self, field: u64, body: &[u8]) -> TrackerResult<()> {
        self.write_key(field, WIRE_LEN)?;
        self.write_varint(body.len() as u64)?;
        self.buf
            .write_all(body)
            .map_err(|e| TrackerError::serde(format!("write message: {e}")))
    }

    fn put_u8(&mut self, b: u8) -> TrackerResult<()> {
        self.buf
            .write_u8(b)
            .map_err(|e| TrackerError::serde(format!("write byte: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tracking/wire.rs"]
mod tests;
