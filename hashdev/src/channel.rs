//! # 通道
//!
//! 每个次设备号对应一个通道，持有定长缓冲区与两个游标：
//!
//! ```text
//! 0            read_cursor          used                capacity
//! |----已读-----|--------可读---------|------未写入---------|
//! ```
//!
//! 写入只会追加到`used`处，读取从`read_cursor`开始且不会越过`used`。

use alloc::boxed::Box;
use alloc::vec;

use enumflags2::{bitflags, BitFlags};
use vfs::{DirEntryType, Error, Stat};

use crate::buffer::{UserBuffer, UserBufferMut};
use crate::frame::{Frame, FRAME_HEADER_SIZE};

/// 通道ID，即次设备号
pub type ChannelId = u32;

#[rustfmt::skip]
#[allow(clippy::upper_case_acronyms)]
#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    READ  = 0b01,
    WRITE = 0b10,
}

/// 打开模式，空集即关闭（或打开时两种权限都未申请）
pub type Mode = BitFlags<Access>;

#[derive(Debug)]
pub struct Channel {
    id: ChannelId,
    buffer: Box<[u8]>,
    /// 已写入的字节数，也是下次写入的位置
    used: usize,
    /// 下次读取的位置
    read_cursor: usize,
    mode: Mode,
    /// 是否被某个会话打开
    open: bool,
    seed: u32,
}

impl Channel {
    pub fn new(id: ChannelId, capacity: usize) -> Self {
        Self {
            id,
            buffer: vec![0; capacity].into_boxed_slice(),
            used: 0,
            read_cursor: 0,
            mode: Mode::empty(),
            open: false,
            seed: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> ChannelId {
        self.id
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn used(&self) -> usize {
        self.used
    }

    #[inline]
    pub fn read_cursor(&self) -> usize {
        self.read_cursor
    }

    /// 尚未读取的字节数
    #[inline]
    pub fn available(&self) -> usize {
        self.used - self.read_cursor
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[inline]
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// 标记为打开并设置模式。
    ///
    /// 若已被打开则什么都不做并返回`false`，模式保持为首个打开者的。
    pub(crate) fn attach(&mut self, mode: Mode) -> bool {
        if self.open {
            return false;
        }
        self.open = true;
        self.mode = mode;
        true
    }

    /// 关闭只清除模式，缓冲区、游标与种子都会保留到下次打开
    pub(crate) fn detach(&mut self) {
        self.open = false;
        self.mode = Mode::empty();
    }

    /// 读出至多`max_count`字节，封装成帧交给`dst`。
    ///
    /// 返回传输的字节数，包含帧首部；无读权限或无数据可读时返回0。
    ///
    /// 游标在交付之前就已推进，交付失败时已读位置会领先于调用者实际收到的数据。
    pub fn read_frame(
        &mut self,
        max_count: usize,
        dst: &mut dyn UserBufferMut,
    ) -> Result<usize, Error> {
        if !self.mode.contains(Access::READ) {
            log::warn!("channel {}: read rejected in mode {:?}", self.id, self.mode);
            return Ok(0);
        }

        let count = max_count.min(self.available());
        if count == 0 {
            return Ok(0);
        }

        let start = self.read_cursor;
        let frame = Frame::seal(&self.buffer[start..start + count], self.seed);
        self.read_cursor += count;

        dst.copy_from(&frame.to_bytes())?;
        log::trace!(
            "channel {}: read {count} bytes at {start}, hash={:#010x}",
            self.id,
            frame.hash
        );

        Ok(count + FRAME_HEADER_SIZE)
    }

    /// 把`src`追加到已写入区域之后，返回写入的字节数；无写权限时返回0
    pub fn append(&mut self, src: &dyn UserBuffer) -> Result<usize, Error> {
        if !self.mode.contains(Access::WRITE) {
            log::warn!("channel {}: write rejected in mode {:?}", self.id, self.mode);
            return Ok(0);
        }

        let len = src.len();
        if len > self.capacity() - self.used {
            return Err(Error::CapacityExceeded);
        }
        if len == 0 {
            return Err(Error::InvalidArgument);
        }

        // 搬运失败时`used`不变，写坏的只是未写入区域
        src.copy_to(&mut self.buffer[self.used..self.used + len])?;
        log::trace!("channel {}: wrote {len} bytes at {}", self.id, self.used);
        self.used += len;

        Ok(len)
    }

    /// 丢弃全部数据
    pub fn reset(&mut self) {
        self.used = 0;
        self.read_cursor = 0;
    }

    /// 回到开头重新读取，已写入的数据保留
    pub fn restart(&mut self) {
        self.read_cursor = 0;
    }

    /// 之后的读操作都以新的种子计算校验值
    pub fn set_seed(&mut self, seed: u32) {
        self.seed = seed;
    }

    pub fn stat(&self) -> Stat {
        Stat {
            mode: DirEntryType::Char,
            block_size: self.capacity() as u64,
            blocks: 1,
            size: self.used as u64,
        }
    }
}
