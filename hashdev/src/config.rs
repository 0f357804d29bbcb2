//! 设备的编译期常量

/// 向宿主内核注册时使用的设备名
pub const DEVICE_NAME: &str = "s19_device";

/// 每个通道缓冲区的默认容量
pub const BUFF_SIZE: usize = 4096;

/// ioctl 命令的类型字段
pub const IOCTL_MAGIC: u8 = b'r';
