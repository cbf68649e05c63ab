//! Binary container for `BytecodeModule`.

use crate::{BytecodeModule, Constant};

pub const MAGIC: [u8; 4] = *b"TDBC";
pub const VERSION: u8 = 0x01;
const END_MARKER: u8 = 0xFF;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("bad magic {found:02x?}, expected \"TDBC\"")]
    BadMagic { found: Vec<u8> },
    #[error("unsupported bytecode version {0}")]
    UnsupportedVersion(u8),
    #[error("unknown tag {tag} for constant {index}")]
    UnknownConstantTag { tag: u8, index: u32 },
    #[error("unexpected end of buffer at byte {offset} reading {what}")]
    Truncated { offset: usize, what: &'static str },
    #[error("constant {index} is not valid UTF-8")]
    InvalidUtf8 { index: u32 },
    #[error("missing end marker after {len} code bytes")]
    MissingEndMarker { len: usize },
    #[error("{0} unexpected bytes after end marker")]
    TrailingBytes(usize),
}

impl BytecodeModule {
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(16 + self.code.len() + self.constants.len() * 9);
        out.extend_from_slice(&MAGIC);
        out.push(VERSION);
        out.extend_from_slice(&(self.constants.len() as u32).to_le_bytes());
        for c in &self.constants {
            out.push(c.tag());
            match c {
                Constant::Null => {}
                Constant::Bool(b) => out.push(u8::from(*b)),
                Constant::Number(n) => out.extend_from_slice(&n.to_le_bytes()),
                Constant::Str(s) => {
                    out.extend_from_slice(&(s.len() as u32).to_le_bytes());
                    out.extend_from_slice(s.as_bytes());
                }
            }
        }
        out.extend_from_slice(&(self.code.len() as u32).to_le_bytes());
        out.extend_from_slice(&self.code);
        out.push(END_MARKER);
        out
    }

    /// Validates the container only; instruction bytes are checked when they run.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader { bytes, pos: 0 };
        let magic = r.take(4, "magic").map_err(|_| DecodeError::BadMagic {
            found: bytes.iter().take(4).copied().collect(),
        })?;
        if magic != MAGIC {
            return Err(DecodeError::BadMagic {
                found: magic.to_vec(),
            });
        }
        let version = r.u8("version")?;
        if version != VERSION {
            return Err(DecodeError::UnsupportedVersion(version));
        }
        let count = r.u32("constant count")?;
        // Every constant takes at least one byte; bound the preallocation by what is left.
        let mut constants = Vec::with_capacity((count as usize).min(r.remaining()));
        for index in 0..count {
            let tag = r.u8("constant tag")?;
            let c = match tag {
                Constant::TAG_NULL => Constant::Null,
                Constant::TAG_BOOL => Constant::Bool(r.u8("bool constant")? != 0),
                Constant::TAG_NUMBER => {
                    let mut b = [0u8; 8];
                    b.copy_from_slice(r.take(8, "number constant")?);
                    Constant::Number(f64::from_le_bytes(b))
                }
                Constant::TAG_STR => {
                    let len = r.u32("string length")? as usize;
                    let raw = r.take(len, "string constant")?;
                    let s = std::str::from_utf8(raw)
                        .map_err(|_| DecodeError::InvalidUtf8 { index })?;
                    Constant::Str(s.to_owned())
                }
                tag => return Err(DecodeError::UnknownConstantTag { tag, index }),
            };
            constants.push(c);
        }
        let len = r.u32("code length")? as usize;
        let code = r.take(len, "code")?.to_vec();
        match r.u8("end marker") {
            Ok(END_MARKER) => {}
            _ => return Err(DecodeError::MissingEndMarker { len }),
        }
        if r.remaining() > 0 {
            return Err(DecodeError::TrailingBytes(r.remaining()));
        }
        Ok(BytecodeModule { constants, code })
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, n: usize, what: &'static str) -> Result<&'a [u8], DecodeError> {
        let end = self.pos.checked_add(n).filter(|&e| e <= self.bytes.len());
        let Some(end) = end else {
            return Err(DecodeError::Truncated {
                offset: self.pos,
                what,
            });
        };
        let s = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(s)
    }

    fn u8(&mut self, what: &'static str) -> Result<u8, DecodeError> {
        Ok(self.take(1, what)?[0])
    }

    fn u32(&mut self, what: &'static str) -> Result<u32, DecodeError> {
        let mut b = [0u8; 4];
        b.copy_from_slice(self.take(4, what)?);
        Ok(u32::from_le_bytes(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Instr;

    fn sample() -> BytecodeModule {
        let mut code = Vec::new();
        Instr::PushConst(0).encode(&mut code);
        Instr::SetCtx(1).encode(&mut code);
        Instr::End.encode(&mut code);
        BytecodeModule {
            constants: vec![
                Constant::Number(0.5),
                Constant::Str("mode".into()),
                Constant::Bool(true),
                Constant::Null,
            ],
            code,
        }
    }

    #[test]
    fn layout_is_exact() {
        let m = BytecodeModule {
            constants: vec![Constant::Str("a".into())],
            code: vec![0xFF],
        };
        assert_eq!(
            m.encode(),
            vec![
                b'T', b'D', b'B', b'C', 0x01, 1, 0, 0, 0, 3, 1, 0, 0, 0, b'a', 1, 0, 0, 0, 0xFF,
                0xFF
            ]
        );
    }

    #[test]
    fn decode_restores_module() {
        let m = sample();
        assert_eq!(BytecodeModule::decode(&m.encode()), Ok(m));
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = sample().encode();
        bytes[0] = b'X';
        assert!(matches!(
            BytecodeModule::decode(&bytes),
            Err(DecodeError::BadMagic { .. })
        ));
        assert!(matches!(
            BytecodeModule::decode(b"TD"),
            Err(DecodeError::BadMagic { .. })
        ));
    }

    #[test]
    fn rejects_other_versions() {
        let mut bytes = sample().encode();
        bytes[4] = 0x02;
        assert_eq!(
            BytecodeModule::decode(&bytes),
            Err(DecodeError::UnsupportedVersion(2))
        );
    }

    #[test]
    fn rejects_unknown_tag_and_bad_utf8() {
        let bytes = [b'T', b'D', b'B', b'C', 1, 1, 0, 0, 0, 9];
        assert_eq!(
            BytecodeModule::decode(&bytes),
            Err(DecodeError::UnknownConstantTag { tag: 9, index: 0 })
        );
        let bytes = [
            b'T', b'D', b'B', b'C', 1, 1, 0, 0, 0, 3, 1, 0, 0, 0, 0xC3, 0, 0, 0, 0, 0xFF,
        ];
        assert_eq!(
            BytecodeModule::decode(&bytes),
            Err(DecodeError::InvalidUtf8 { index: 0 })
        );
    }

    #[test]
    fn rejects_truncation_and_missing_end() {
        let bytes = sample().encode();
        for cut in 5..bytes.len() - 1 {
            assert!(
                matches!(
                    BytecodeModule::decode(&bytes[..cut]),
                    Err(DecodeError::Truncated { .. })
                ),
                "cut at {cut}"
            );
        }
        assert!(matches!(
            BytecodeModule::decode(&bytes[..bytes.len() - 1]),
            Err(DecodeError::MissingEndMarker { .. })
        ));
        let mut extra = bytes.clone();
        extra.push(0);
        assert_eq!(
            BytecodeModule::decode(&extra),
            Err(DecodeError::TrailingBytes(1))
        );
    }
}
