use core::fmt;

/// 设备操作的错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// 打开模式不允许该操作
    PermissionDenied,
    /// 写入会越过缓冲区容量
    CapacityExceeded,
    /// 参数非法，例如写入零字节
    InvalidArgument,
    /// 与调用者之间的数据搬运未能完成
    TransferFailed,
    /// 不支持的控制命令
    Unsupported,
    /// 文件描述符未绑定任何通道
    BadDescriptor,
}

impl Error {
    /// 内核惯例下的返回值：负的errno
    pub const fn errno(self) -> isize {
        match self {
            Self::PermissionDenied => -1,  // EPERM
            Self::CapacityExceeded => -28, // ENOSPC
            Self::InvalidArgument => -22,  // EINVAL
            Self::TransferFailed => -14,   // EFAULT
            Self::Unsupported => -25,      // ENOTTY
            Self::BadDescriptor => -9,     // EBADF
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::PermissionDenied => "operation not permitted by open mode",
            Self::CapacityExceeded => "no space left in channel buffer",
            Self::InvalidArgument => "invalid argument",
            Self::TransferFailed => "bad address",
            Self::Unsupported => "inappropriate ioctl for device",
            Self::BadDescriptor => "bad file descriptor",
        };
        f.write_str(msg)
    }
}
