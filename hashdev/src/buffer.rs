//! # 用户缓冲区
//!
//! 数据在宿主与设备之间的搬运（copy-in / copy-out）可能失败，
//! 这里把两个方向抽象成特质，失败时统一报告[`Error::TransferFailed`]。

use alloc::vec::Vec;

use vfs::Error;

/// 写操作的数据源
pub trait UserBuffer {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 把全部内容复制到`dst`，`dst`的长度必须等于[`UserBuffer::len`]
    fn copy_to(&self, dst: &mut [u8]) -> Result<(), Error>;
}

/// 读操作的目的地
pub trait UserBufferMut {
    /// 容纳不下`src`时返回[`Error::TransferFailed`]
    fn copy_from(&mut self, src: &[u8]) -> Result<(), Error>;
}

fn copy_exact(src: &[u8], dst: &mut [u8]) -> Result<(), Error> {
    if src.len() != dst.len() {
        return Err(Error::TransferFailed);
    }
    dst.copy_from_slice(src);
    Ok(())
}

fn copy_prefix(src: &[u8], dst: &mut [u8]) -> Result<(), Error> {
    let Some(dst) = dst.get_mut(..src.len()) else {
        return Err(Error::TransferFailed);
    };
    dst.copy_from_slice(src);
    Ok(())
}

impl UserBuffer for &[u8] {
    #[inline]
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn copy_to(&self, dst: &mut [u8]) -> Result<(), Error> {
        copy_exact(self, dst)
    }
}

impl<const N: usize> UserBuffer for [u8; N] {
    #[inline]
    fn len(&self) -> usize {
        N
    }

    fn copy_to(&self, dst: &mut [u8]) -> Result<(), Error> {
        copy_exact(self, dst)
    }
}

impl UserBuffer for Vec<u8> {
    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn copy_to(&self, dst: &mut [u8]) -> Result<(), Error> {
        copy_exact(self, dst)
    }
}

impl UserBuffer for &str {
    #[inline]
    fn len(&self) -> usize {
        str::len(self)
    }

    fn copy_to(&self, dst: &mut [u8]) -> Result<(), Error> {
        copy_exact(self.as_bytes(), dst)
    }
}

impl UserBufferMut for &mut [u8] {
    fn copy_from(&mut self, src: &[u8]) -> Result<(), Error> {
        copy_prefix(src, self)
    }
}

impl<const N: usize> UserBufferMut for [u8; N] {
    fn copy_from(&mut self, src: &[u8]) -> Result<(), Error> {
        copy_prefix(src, self)
    }
}

/// 可增长，不会失败
impl UserBufferMut for Vec<u8> {
    fn copy_from(&mut self, src: &[u8]) -> Result<(), Error> {
        self.extend_from_slice(src);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_source_must_match() {
        let src: &[u8] = b"abc";
        let mut dst = [0u8; 3];
        src.copy_to(&mut dst).unwrap();
        assert_eq!(&dst, b"abc");

        let mut short = [0u8; 2];
        assert_eq!(src.copy_to(&mut short), Err(Error::TransferFailed));
    }

    #[test]
    fn array_destination_too_small() {
        let mut dst = [0u8; 4];
        assert_eq!(dst.copy_from(b"hello"), Err(Error::TransferFailed));
        assert_eq!(dst, [0; 4]);

        dst.copy_from(b"hi").unwrap();
        assert_eq!(&dst[..2], b"hi");
    }

    #[test]
    fn vec_destination_grows() {
        let mut dst: Vec<u8> = Vec::new();
        dst.copy_from(b"abc").unwrap();
        dst.copy_from(b"de").unwrap();
        assert_eq!(dst, b"abcde");
    }
}
