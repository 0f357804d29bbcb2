//! # 设备层
//!
//! 宿主内核把`open`/`close`/`read`/`write`/`ioctl`转发到这里。
//! 设备维护文件描述符表，描述符到通道的解析都经由[`ChannelFile`]。

use alloc::sync::Arc;
use alloc::vec::Vec;

use enumflags2::BitFlags;
use spin::Mutex;
use vfs::{Error, Stat};

use crate::buffer::{UserBuffer, UserBufferMut};
use crate::channel::{ChannelId, Mode};
use crate::collections::SlotVec;
use crate::config::BUFF_SIZE;
use crate::file::{ChannelFile, File, OpenFlag};
use crate::frame::Frame;
use crate::registry::Registry;

/// 文件描述符
pub type Fd = usize;

#[derive(Debug)]
pub struct Device {
    registry: Registry,
    fd_table: Mutex<SlotVec<Arc<dyn File>>>,
}

impl Default for Device {
    fn default() -> Self {
        Self::new()
    }
}

impl Device {
    pub const fn new() -> Self {
        Self::with_capacity(BUFF_SIZE)
    }

    /// 每个通道的缓冲区容量为`capacity`
    pub const fn with_capacity(capacity: usize) -> Self {
        Self {
            registry: Registry::new(capacity),
            fd_table: Mutex::new(SlotVec::new()),
        }
    }

    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// 打开次设备号为`minor`的通道，通道不存在时创建。
    ///
    /// 通道已被打开时模式保持不变，但仍会分配新的描述符。
    pub fn open(&self, minor: ChannelId, access: Mode) -> Fd {
        let file = self
            .registry
            .open(minor, |channel| Arc::new(ChannelFile::open(channel, access)));
        self.fd_table.lock().insert(file)
    }

    /// 以`open(2)`的访问方式打开
    #[inline]
    pub fn open_with(&self, minor: ChannelId, flags: BitFlags<OpenFlag>) -> Fd {
        self.open(minor, OpenFlag::access(flags))
    }

    /// 关闭描述符，未知描述符什么都不做
    pub fn close(&self, fd: Fd) {
        let Some(file) = self.fd_table.lock().remove(fd) else {
            log::warn!("close: fd {fd} not open");
            return;
        };
        file.release();
    }

    fn file(&self, fd: Fd) -> Option<Arc<dyn File>> {
        self.fd_table.lock().get(fd).cloned()
    }

    /// 读出至多`max_count`字节的数据，以帧的形式写入`dst`。
    ///
    /// 返回值包含4字节的帧首部；无读权限或没有可读数据时返回0。
    pub fn read(
        &self,
        fd: Fd,
        max_count: usize,
        dst: &mut dyn UserBufferMut,
    ) -> Result<usize, Error> {
        let file = self.file(fd).ok_or(Error::BadDescriptor)?;
        file.read(max_count, dst)
    }

    /// 同[`Device::read`]，并解析出帧；传输0字节时返回空
    pub fn read_frame(&self, fd: Fd, max_count: usize) -> Result<Option<Frame>, Error> {
        let mut bytes: Vec<u8> = Vec::new();
        if self.read(fd, max_count, &mut bytes)? == 0 {
            return Ok(None);
        }
        Ok(Frame::parse(&bytes))
    }

    pub fn write(&self, fd: Fd, src: &dyn UserBuffer) -> Result<usize, Error> {
        let file = self.file(fd).ok_or(Error::BadDescriptor)?;
        file.write(src)
    }

    /// 未知描述符上的已知命令什么都不做
    pub fn ioctl(&self, fd: Fd, cmd: u32, arg: usize) -> Result<(), Error> {
        match self.file(fd) {
            Some(file) => file.ioctl(cmd, arg),
            None => crate::ioctl::Command::decode(cmd, arg).map(|_| ()),
        }
    }

    pub fn stat(&self, fd: Fd) -> Result<Stat, Error> {
        let file = self.file(fd).ok_or(Error::BadDescriptor)?;
        file.stat()
    }

    /// 移除未被打开的通道，返回是否真的移除了
    pub fn remove(&self, minor: ChannelId) -> bool {
        let removed = self
            .registry
            .remove_if(minor, |channel| !channel.is_open())
            .is_some();
        if !removed && self.registry.find(minor).is_some() {
            log::warn!("remove: channel {minor} is busy");
        }
        removed
    }

    /// 当前打开的描述符数量
    pub fn open_files(&self) -> usize {
        self.fd_table.lock().occupied()
    }

    /// 关闭所有描述符并释放所有通道，返回释放的通道数
    pub fn drain_all(&self) -> usize {
        let files: Vec<_> = self.fd_table.lock().drain().collect();
        for file in files {
            file.release();
        }
        self.registry.drain_all()
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        let drained = self.drain_all();
        log::debug!("device: teardown, {drained} channels released");
    }
}
