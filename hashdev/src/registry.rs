//! # 通道注册表
//!
//! 注册表独占所有通道，其他地方只能通过ID查找或持有弱引用。
//! 结构上的增删由表锁保护，每个通道的状态另有一把锁。

use alloc::sync::Arc;
use alloc::vec::Vec;

use spin::Mutex;

use crate::channel::{Channel, ChannelId};

#[derive(Debug)]
pub struct Registry {
    /// 新建通道的缓冲区容量
    capacity: usize,
    /// 按插入顺序倒序排列，新通道在最前
    channels: Mutex<Vec<(ChannelId, Arc<Mutex<Channel>>)>>,
}

impl Registry {
    pub const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            channels: Mutex::new(Vec::new()),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn find(&self, id: ChannelId) -> Option<Arc<Mutex<Channel>>> {
        self.channels
            .lock()
            .iter()
            .find(|(cid, _)| *cid == id)
            .map(|(_, channel)| channel.clone())
    }

    /// 查找通道，不存在则新建一个空通道
    #[inline]
    pub fn get_or_create(&self, id: ChannelId) -> Arc<Mutex<Channel>> {
        self.open(id, Arc::clone)
    }

    /// 查找或新建通道，并在持有表锁期间对其调用`f`。
    ///
    /// `f`返回之前[`Registry::remove_if`]无法插手，打开者在这里完成
    /// 标记打开，就不会拿到一个刚被移除的通道。
    pub fn open<F, R>(&self, id: ChannelId, f: F) -> R
    where
        F: FnOnce(&Arc<Mutex<Channel>>) -> R,
    {
        let mut channels = self.channels.lock();

        if let Some((_, channel)) = channels.iter().find(|(cid, _)| *cid == id) {
            return f(channel);
        }

        log::debug!("registry: create channel {id} (capacity={})", self.capacity);
        let channel = Arc::new(Mutex::new(Channel::new(id, self.capacity)));
        let ret = f(&channel);
        channels.insert(0, (id, channel));
        ret
    }

    /// 移除通道，ID不存在时什么都不做
    #[inline]
    pub fn remove(&self, id: ChannelId) -> Option<Arc<Mutex<Channel>>> {
        self.remove_if(id, |_| true)
    }

    /// 仅当`pred`成立时移除通道。
    ///
    /// 判断期间持有表锁，与[`Registry::open`]互斥。
    pub fn remove_if<F>(&self, id: ChannelId, pred: F) -> Option<Arc<Mutex<Channel>>>
    where
        F: FnOnce(&Channel) -> bool,
    {
        let mut channels = self.channels.lock();
        let index = channels.iter().position(|(cid, _)| *cid == id)?;

        if !pred(&*channels[index].1.lock()) {
            return None;
        }

        log::debug!("registry: remove channel {id}");
        Some(channels.remove(index).1)
    }

    /// 释放所有通道，返回释放的数量
    pub fn drain_all(&self) -> usize {
        let drained = core::mem::take(&mut *self.channels.lock());
        if !drained.is_empty() {
            log::debug!("registry: drain {} channels", drained.len());
        }
        drained.len()
    }

    pub fn len(&self) -> usize {
        self.channels.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.lock().is_empty()
    }

    /// 当前所有通道的ID，新通道在前
    pub fn ids(&self) -> Vec<ChannelId> {
        self.channels.lock().iter().map(|(id, _)| *id).collect()
    }
}
