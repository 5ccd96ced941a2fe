//! Input tapes: the raw key samples of a session, for deterministic replay.
//!
//! Layout (little-endian):
//!   HEADER (16 bytes): magic(u32) version(u8) reserved(3) seed(u32) frameCount(u32)
//!   BODY (2 * frameCount bytes): one raw key sample (u16) per frame
//!   FOOTER (12 bytes): finalScore(u32) highScore(u32) checksum(u32)
//!
//! The checksum is CRC-32 (IEEE) over header and body.

use alloc::vec::Vec;

use crate::input::Keys;

pub const TAPE_MAGIC: u32 = 0x5453_4148; // "HAST"
pub const TAPE_VERSION: u8 = 1;
const HEADER_SIZE: usize = 16;
const FOOTER_SIZE: usize = 12;
const FRAME_SIZE: usize = 2;
/// Key register bits above the ten buttons.
const RESERVED_KEY_BITS: u16 = 0xFC00;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapeHeader {
    pub magic: u32,
    pub version: u8,
    pub seed: u32,
    pub frame_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapeFooter {
    pub final_score: u32,
    pub high_score: u32,
    pub checksum: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    pub header: TapeHeader,
    pub inputs: Vec<u16>,
    pub footer: TapeFooter,
}

impl Tape {
    /// Per-frame key samples.
    pub fn keys(&self) -> impl Iterator<Item = Keys> + '_ {
        self.inputs.iter().map(|&raw| Keys::from_bits_truncate(raw))
    }
}

/// Why a byte buffer is not a usable tape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapeError {
    TooShort,
    InvalidMagic(u32),
    UnsupportedVersion(u8),
    Truncated { expected: usize, got: usize },
    TrailingData { expected: usize, got: usize },
    CrcMismatch { stored: u32, computed: u32 },
    ReservedBitsSet { frame: u32, keys: u16 },
}

impl core::fmt::Display for TapeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TapeError::TooShort => write!(f, "shorter than header plus footer"),
            TapeError::InvalidMagic(m) => write!(f, "not a HAST tape (magic 0x{m:08x})"),
            TapeError::UnsupportedVersion(v) => write!(f, "tape version {v} is not supported"),
            TapeError::Truncated { expected, got } => {
                write!(f, "{got} bytes, header declares {expected}")
            }
            TapeError::TrailingData { expected, got } => {
                write!(f, "{got} bytes, header declares only {expected}")
            }
            TapeError::CrcMismatch { stored, computed } => {
                write!(f, "checksum 0x{computed:08x} does not match footer 0x{stored:08x}")
            }
            TapeError::ReservedBitsSet { frame, keys } => {
                write!(f, "frame {frame} sets bits outside the key register: 0x{keys:04x}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TapeError {}

/// Little-endian cursor over a buffer whose length was already checked.
struct Words<'a> {
    rest: &'a [u8],
}

impl<'a> Words<'a> {
    fn bytes<const N: usize>(&mut self) -> [u8; N] {
        let (head, tail) = self.rest.split_at(N);
        self.rest = tail;
        let mut out = [0; N];
        out.copy_from_slice(head);
        out
    }

    fn u32(&mut self) -> u32 {
        u32::from_le_bytes(self.bytes())
    }

    fn u16(&mut self) -> u16 {
        u16::from_le_bytes(self.bytes())
    }
}

/// Check structure only: magic, version, declared length and key bits.
/// The checksum is left to [`deserialize_tape`].
pub fn parse_tape(data: &[u8]) -> Result<Tape, TapeError> {
    if data.len() < HEADER_SIZE + FOOTER_SIZE {
        return Err(TapeError::TooShort);
    }

    let mut words = Words { rest: data };
    let magic = words.u32();
    if magic != TAPE_MAGIC {
        return Err(TapeError::InvalidMagic(magic));
    }
    let [version, ..] = words.bytes::<4>();
    if version != TAPE_VERSION {
        return Err(TapeError::UnsupportedVersion(version));
    }
    let seed = words.u32();
    let frame_count = words.u32();

    let expected = (frame_count as usize)
        .checked_mul(FRAME_SIZE)
        .and_then(|body| body.checked_add(HEADER_SIZE + FOOTER_SIZE))
        .unwrap_or(usize::MAX);
    match data.len() {
        got if got < expected => return Err(TapeError::Truncated { expected, got }),
        got if got > expected => return Err(TapeError::TrailingData { expected, got }),
        _ => {}
    }

    let inputs = (0..frame_count)
        .map(|frame| match words.u16() {
            keys if keys & RESERVED_KEY_BITS != 0 => {
                Err(TapeError::ReservedBitsSet { frame, keys })
            }
            keys => Ok(keys),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Tape {
        header: TapeHeader {
            magic,
            version,
            seed,
            frame_count,
        },
        inputs,
        footer: TapeFooter {
            final_score: words.u32(),
            high_score: words.u32(),
            checksum: words.u32(),
        },
    })
}

/// [`parse_tape`], then verify the CRC-32 of header and body.
pub fn deserialize_tape(data: &[u8]) -> Result<Tape, TapeError> {
    let tape = parse_tape(data)?;
    let signed = &data[..data.len() - FOOTER_SIZE];
    let computed = crc32fast::hash(signed);
    if computed != tape.footer.checksum {
        return Err(TapeError::CrcMismatch {
            stored: tape.footer.checksum,
            computed,
        });
    }
    Ok(tape)
}

pub fn serialize_tape(seed: u32, inputs: &[u16], final_score: u32, high_score: u32) -> Vec<u8> {
    let header = [
        TAPE_MAGIC.to_le_bytes(),
        [TAPE_VERSION, 0, 0, 0],
        seed.to_le_bytes(),
        (inputs.len() as u32).to_le_bytes(),
    ];
    let mut data: Vec<u8> = header.concat();
    data.reserve(inputs.len() * FRAME_SIZE + FOOTER_SIZE);
    data.extend(inputs.iter().flat_map(|keys| keys.to_le_bytes()));

    let checksum = crc32fast::hash(&data);
    for word in [final_score, high_score, checksum] {
        data.extend_from_slice(&word.to_le_bytes());
    }
    data
}

/// Collects raw key samples while a session runs.
#[derive(Debug, Clone, Default)]
pub struct TapeRecorder {
    seed: u32,
    inputs: Vec<u16>,
}

impl TapeRecorder {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            inputs: Vec::new(),
        }
    }

    pub fn record(&mut self, keys: Keys) {
        self.inputs.push(keys.bits());
    }

    pub fn frame_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn finish(&self, final_score: u32, high_score: u32) -> Vec<u8> {
        serialize_tape(self.seed, &self.inputs, final_score, high_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_layout() {
        let data = serialize_tape(7, &[0x0001, 0x0240], 120, 900);
        assert_eq!(data.len(), HEADER_SIZE + 4 + FOOTER_SIZE);
        assert_eq!(&data[..4], b"HAST");
        assert_eq!(&data[12..16], &[2, 0, 0, 0]);
        assert_eq!(&data[16..20], &[0x01, 0x00, 0x40, 0x02]);
        assert_eq!(&data[20..24], &120u32.to_le_bytes());
        assert_eq!(&data[24..28], &900u32.to_le_bytes());
        // CRC-32 (IEEE) over the first 20 bytes
        assert_eq!(&data[28..], &crc32fast::hash(&data[..20]).to_le_bytes());
    }

    #[test]
    fn test_huge_frame_count_is_truncated_not_allocated() {
        let mut data = serialize_tape(1, &[], 0, 0);
        data[12..16].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(parse_tape(&data), Err(TapeError::Truncated { got: 28, .. })));
    }

    #[test]
    fn test_deserialize_roundtrip() {
        let inputs = vec![Keys::A.bits(), (Keys::UP | Keys::LEFT).bits(), 0];
        let data = serialize_tape(0xDEADBEEF, &inputs, 42, 1500);

        let tape = deserialize_tape(&data).expect("should parse");
        assert_eq!(tape.header.seed, 0xDEADBEEF);
        assert_eq!(tape.header.frame_count, 3);
        assert_eq!(tape.inputs, inputs);
        assert_eq!(tape.footer.final_score, 42);
        assert_eq!(tape.footer.high_score, 1500);
        assert_eq!(tape.keys().nth(1), Some(Keys::UP | Keys::LEFT));
    }

    #[test]
    fn test_bad_magic() {
        let data = vec![0; HEADER_SIZE + FOOTER_SIZE];
        assert!(matches!(
            deserialize_tape(&data),
            Err(TapeError::InvalidMagic(0))
        ));
    }

    #[test]
    fn test_length_checks() {
        assert_eq!(parse_tape(&[0; 10]), Err(TapeError::TooShort));

        let mut data = serialize_tape(1, &[0, 0], 0, 0);
        data.push(0);
        assert_eq!(
            parse_tape(&data),
            Err(TapeError::TrailingData {
                expected: 32,
                got: 33
            })
        );
        data.truncate(30);
        assert!(matches!(parse_tape(&data), Err(TapeError::Truncated { .. })));
    }

    #[test]
    fn test_reserved_bits_rejected() {
        let data = serialize_tape(1, &[0x0005, 0x0400, 0x0000], 0, 0);
        assert_eq!(
            deserialize_tape(&data),
            Err(TapeError::ReservedBitsSet {
                frame: 1,
                keys: 0x0400
            })
        );
    }

    #[test]
    fn test_corrupted_body_fails_crc() {
        let mut data = serialize_tape(1, &[0x0001, 0x0002], 0, 0);
        data[HEADER_SIZE] = 0x08;
        assert!(matches!(
            deserialize_tape(&data),
            Err(TapeError::CrcMismatch { .. })
        ));
        // structure alone is still valid
        assert!(parse_tape(&data).is_ok());
    }

    #[test]
    fn test_recorder() {
        let mut recorder = TapeRecorder::new(99);
        recorder.record(Keys::START);
        recorder.record(Keys::empty());
        assert_eq!(recorder.frame_count(), 2);
        let tape = deserialize_tape(&recorder.finish(10, 20)).unwrap();
        assert_eq!(tape.header.seed, 99);
        assert_eq!(tape.inputs, vec![Keys::START.bits(), 0]);
    }
}
