//! # 帧
//!
//! 读操作返回的字节流：
//!
//! ```text
//! +----------------+---------------------+
//! | hash (4B, LE)  | data (n B)          |
//! +----------------+---------------------+
//! ```
//!
//! `hash = murmur3_32(data, seed)`，`seed`取自读出时通道的种子。
//! 帧总长为`n + 4`，读操作返回的传输字节数同样包含这4字节。

use alloc::vec::Vec;

use crate::murmur3_32;

/// 帧首部（校验值）的字节数
pub const FRAME_HEADER_SIZE: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub hash: u32,
    pub data: Vec<u8>,
}

impl Frame {
    /// 以`seed`计算校验值并封装数据
    pub fn seal(data: &[u8], seed: u32) -> Self {
        Self {
            hash: murmur3_32(data, seed),
            data: data.to_vec(),
        }
    }

    /// 从线上格式解析，不足首部长度时返回空
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let (header, data) = bytes.split_first_chunk::<FRAME_HEADER_SIZE>()?;

        Some(Self {
            hash: u32::from_le_bytes(*header),
            data: data.to_vec(),
        })
    }

    #[inline]
    pub fn verify(&self, seed: u32) -> bool {
        murmur3_32(&self.data, seed) == self.hash
    }

    /// 线上格式的总长
    #[inline]
    pub fn len(&self) -> usize {
        FRAME_HEADER_SIZE + self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.len());
        bytes.extend_from_slice(&self.hash.to_le_bytes());
        bytes.extend_from_slice(&self.data);
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout() {
        let frame = Frame::seal(b"abc", 0);
        let bytes = frame.to_bytes();

        assert_eq!(bytes.len(), 7);
        assert_eq!(&bytes[..4], &0xb3dd_93fau32.to_le_bytes());
        assert_eq!(&bytes[4..], b"abc");
        assert_eq!(Frame::parse(&bytes), Some(frame));
    }

    #[test]
    fn truncated_header() {
        assert_eq!(Frame::parse(&[1, 2, 3]), None);
        assert!(Frame::parse(&[0; 4]).unwrap().is_empty());
        assert!(!Frame::seal(b"a", 0).is_empty());
    }

    #[test]
    fn detects_corruption() {
        let mut bytes = Frame::seal(b"hello world", 42).to_bytes();
        bytes[6] ^= 0x20;

        let frame = Frame::parse(&bytes).unwrap();
        assert!(!frame.verify(42));
    }

    #[test]
    fn wrong_seed() {
        let frame = Frame::seal(b"hello", 1);
        assert!(frame.verify(1));
        assert!(!frame.verify(2));
    }
}
