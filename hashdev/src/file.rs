//! # 文件层
//!
//! 一次`open`产生一个[`ChannelFile`]，它只记住通道ID和一个弱引用，
//! 通道本身归注册表所有。同一通道被多次打开时，模式以第一个打开者为准。

use alloc::sync::{Arc, Weak};
use core::fmt::Debug;

use enumflags2::{bitflags, BitFlags};
use spin::Mutex;
use vfs::{DirEntryType, Error, Stat};

use crate::buffer::{UserBuffer, UserBufferMut};
use crate::channel::{Access, Channel, ChannelId, Mode};
use crate::ioctl::Command;

/// 宿主与设备之间的数据交换通道
pub trait File: Debug + Send + Sync {
    fn readable(&self) -> bool {
        false
    }

    fn writable(&self) -> bool {
        false
    }

    #[allow(unused_variables)]
    fn read(&self, max_count: usize, buf: &mut dyn UserBufferMut) -> Result<usize, Error> {
        Ok(0)
    }

    #[allow(unused_variables)]
    fn write(&self, buf: &dyn UserBuffer) -> Result<usize, Error> {
        Ok(0)
    }

    #[allow(unused_variables)]
    fn ioctl(&self, cmd: u32, arg: usize) -> Result<(), Error> {
        Err(Error::Unsupported)
    }

    fn stat(&self) -> Result<Stat, Error> {
        Ok(Stat {
            mode: DirEntryType::Regular,
            block_size: 0,
            blocks: 0,
            size: 0,
        })
    }

    /// 最后一次关闭时调用
    fn release(&self) {}
}

#[derive(Debug)]
pub struct ChannelFile {
    id: ChannelId,
    /// 本次打开所申请的权限
    access: Mode,
    channel: Weak<Mutex<Channel>>,
}

impl ChannelFile {
    pub fn open(channel: &Arc<Mutex<Channel>>, access: Mode) -> Self {
        let mut inner = channel.lock();
        let id = inner.id();

        if inner.attach(access) {
            log::debug!("channel {id}: open {access:?}");
        } else {
            log::debug!(
                "channel {id}: already open {:?}, requested {access:?} ignored",
                inner.mode()
            );
        }

        Self {
            id,
            access,
            channel: Arc::downgrade(channel),
        }
    }

    #[inline]
    pub fn id(&self) -> ChannelId {
        self.id
    }

    #[inline]
    pub fn access(&self) -> Mode {
        self.access
    }

    /// 通道被移除后会话即失效
    #[inline]
    fn channel(&self) -> Option<Arc<Mutex<Channel>>> {
        self.channel.upgrade()
    }

    fn mode(&self) -> Mode {
        self.channel()
            .map(|channel| channel.lock().mode())
            .unwrap_or_default()
    }
}

impl File for ChannelFile {
    /// 通道当前的模式，而非本次申请的权限
    #[inline]
    fn readable(&self) -> bool {
        self.mode().contains(Access::READ)
    }

    #[inline]
    fn writable(&self) -> bool {
        self.mode().contains(Access::WRITE)
    }

    fn read(&self, max_count: usize, buf: &mut dyn UserBufferMut) -> Result<usize, Error> {
        let channel = self.channel().ok_or(Error::BadDescriptor)?;
        let mut channel = channel.lock();
        channel.read_frame(max_count, buf)
    }

    fn write(&self, buf: &dyn UserBuffer) -> Result<usize, Error> {
        let channel = self.channel().ok_or(Error::BadDescriptor)?;
        let mut channel = channel.lock();
        channel.append(buf)
    }

    fn ioctl(&self, cmd: u32, arg: usize) -> Result<(), Error> {
        let command = Command::decode(cmd, arg)?;
        let Some(channel) = self.channel() else {
            return Ok(());
        };

        log::debug!("channel {}: {command:?}", self.id);
        let mut channel = channel.lock();
        match command {
            Command::Reset => channel.reset(),
            Command::Restart => channel.restart(),
            Command::SetSeed(seed) => channel.set_seed(seed),
        }

        Ok(())
    }

    fn stat(&self) -> Result<Stat, Error> {
        let channel = self.channel().ok_or(Error::BadDescriptor)?;
        let stat = channel.lock().stat();
        Ok(stat)
    }

    /// 只清除打开标记与模式，数据留给下一次打开
    fn release(&self) {
        if let Some(channel) = self.channel() {
            channel.lock().detach();
            log::debug!("channel {}: close", self.id);
        }
    }
}

#[rustfmt::skip]
#[allow(clippy::upper_case_acronyms)]
#[bitflags]
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenFlag {
    /// 只写
    WRONLY = 0b0000_0000_0001,
    /// 读写兼备
    RDWR   = 0b0000_0000_0010,
}

impl OpenFlag {
    // enumflags2拒绝值为0的标志
    /// 只读
    pub const RDONLY: u32 = 0b0000_0000_0000;

    #[inline]
    pub fn read_only() -> BitFlags<OpenFlag> {
        BitFlags::from_bits_truncate(Self::RDONLY)
    }

    /// 把`open(2)`的访问方式换算成通道模式
    pub fn access(flags: BitFlags<OpenFlag>) -> Mode {
        if flags.contains(OpenFlag::RDWR) {
            Access::READ | Access::WRITE
        } else if flags.contains(OpenFlag::WRONLY) {
            Access::WRITE.into()
        } else {
            Access::READ.into()
        }
    }
}
