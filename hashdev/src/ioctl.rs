//! # 控制命令
//!
//! 命令号沿用 Linux `_IOC` 的编码：
//!
//! ```text
//!  31 30 29          16 15        8 7          0
//! +-----+--------------+-----------+------------+
//! | dir |     size     |   type    |     nr     |
//! +-----+--------------+-----------+------------+
//! ```

use core::mem;

use vfs::Error;

use crate::config::IOCTL_MAGIC;

const NR_BITS: u32 = 8;
const TYPE_BITS: u32 = 8;
const SIZE_BITS: u32 = 14;

const NR_SHIFT: u32 = 0;
const TYPE_SHIFT: u32 = NR_SHIFT + NR_BITS;
const SIZE_SHIFT: u32 = TYPE_SHIFT + TYPE_BITS;
const DIR_SHIFT: u32 = SIZE_SHIFT + SIZE_BITS;

pub const DIR_NONE: u32 = 0;
pub const DIR_WRITE: u32 = 1;
pub const DIR_READ: u32 = 2;

pub const fn ioc(dir: u32, ty: u8, nr: u8, size: u32) -> u32 {
    (dir << DIR_SHIFT)
        | ((ty as u32) << TYPE_SHIFT)
        | ((nr as u32) << NR_SHIFT)
        | (size << SIZE_SHIFT)
}

/// 不带参数的命令
pub const fn io(ty: u8, nr: u8) -> u32 {
    ioc(DIR_NONE, ty, nr, 0)
}

/// 由用户向设备传入参数的命令
pub const fn iow(ty: u8, nr: u8, size: u32) -> u32 {
    ioc(DIR_WRITE, ty, nr, size)
}

/// 清空通道
pub const RESET: u32 = io(IOCTL_MAGIC, 0);
/// 读游标回到开头
pub const RESTART: u32 = io(IOCTL_MAGIC, 1);
/// 设置校验种子，参数即种子
pub const SET_SEED: u32 = iow(IOCTL_MAGIC, 2, mem::size_of::<i32>() as u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Reset,
    Restart,
    SetSeed(u32),
}

impl Command {
    /// 未知的命令号返回[`Error::Unsupported`]
    pub fn decode(cmd: u32, arg: usize) -> Result<Self, Error> {
        match cmd {
            RESET => Ok(Self::Reset),
            RESTART => Ok(Self::Restart),
            // 种子只取低32位
            SET_SEED => Ok(Self::SetSeed(arg as u32)),
            _ => Err(Error::Unsupported),
        }
    }

    pub fn code(self) -> u32 {
        match self {
            Self::Reset => RESET,
            Self::Restart => RESTART,
            Self::SetSeed(_) => SET_SEED,
        }
    }

    pub fn arg(self) -> usize {
        match self {
            Self::SetSeed(seed) => seed as usize,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linux_encoding() {
        assert_eq!(RESET, 0x0000_7200);
        assert_eq!(RESTART, 0x0000_7201);
        assert_eq!(SET_SEED, 0x4004_7202);
        assert_eq!(ioc(DIR_READ, IOCTL_MAGIC, 0, 4), 0x8004_7200);
    }

    #[test]
    fn decode() {
        assert_eq!(Command::decode(RESET, 99), Ok(Command::Reset));
        assert_eq!(Command::decode(RESTART, 0), Ok(Command::Restart));
        assert_eq!(Command::decode(SET_SEED, 7), Ok(Command::SetSeed(7)));
    }

    #[test]
    fn unknown_command() {
        assert_eq!(Command::decode(0, 0), Err(Error::Unsupported));
        assert_eq!(Command::decode(io(b'q', 0), 0), Err(Error::Unsupported));
        assert_eq!(Command::decode(io(IOCTL_MAGIC, 3), 0), Err(Error::Unsupported));
    }

    #[test]
    fn code_and_arg() {
        let cmd = Command::SetSeed(42);
        assert_eq!(Command::decode(cmd.code(), cmd.arg()), Ok(cmd));
        assert_eq!(Command::Restart.arg(), 0);
    }
}
