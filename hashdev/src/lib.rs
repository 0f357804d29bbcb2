#![cfg_attr(not(test), no_std)]

extern crate alloc;

/* hashdev 的整体架构，自上而下 */

// 设备层：文件描述符表，面向宿主内核的入口
mod device;

// 文件层：一次打开对应的会话，按ID引用通道
mod file;

// 控制命令的编码与解析
pub mod ioctl;

// 通道注册表：通道ID到通道的映射
mod registry;

// 通道层：定长缓冲区、读写游标与打开模式
mod channel;

// 读操作输出的帧格式
mod frame;

// 与用户空间之间的数据搬运
mod buffer;

mod collections;
pub mod config;
mod hash;

pub use self::{
    buffer::{UserBuffer, UserBufferMut},
    channel::{Access, Channel, ChannelId, Mode},
    device::{Device, Fd},
    file::{ChannelFile, File, OpenFlag},
    frame::{Frame, FRAME_HEADER_SIZE},
    hash::murmur3_32,
    registry::Registry,
};
pub use vfs::{Error, Stat};
