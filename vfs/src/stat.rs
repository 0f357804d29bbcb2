/// 文件的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum DirEntryType {
    /// 字符设备，逐字节读写、不可寻址
    Char,
    #[default]
    Regular,
}

/// `fstat`交换的文件信息
#[derive(Debug, Clone, PartialEq, Eq)]
#[repr(C, align(32))]
pub struct Stat {
    pub mode: DirEntryType,
    /// Optimal I/O block size
    pub block_size: u64,
    /// Occupying blocks
    pub blocks: u64,
    /// File size
    pub size: u64,
}
