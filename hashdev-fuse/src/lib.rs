//! 在宿主上驱动设备：按脚本依次执行操作，并校验读出的每一帧。

#[cfg(test)]
mod tests;

use std::fmt;
use std::io;
use std::io::Write;
use std::str::FromStr;

use hashdev::ioctl::Command;
use hashdev::{Access, ChannelId, Device, Fd, Mode};
use vfs::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Open(Mode),
    Close,
    Write(String),
    Read(usize),
    Reset,
    Restart,
    Seed(u32),
}

impl FromStr for Op {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };

        let op = match (name, arg) {
            ("open", Some(mode)) => Self::Open(parse_mode(mode)?),
            ("close", None) => Self::Close,
            ("write", Some(text)) => Self::Write(text.to_owned()),
            ("read", Some(n)) => Self::Read(n.parse().map_err(|e| format!("read:{n}: {e}"))?),
            ("reset", None) => Self::Reset,
            ("restart", None) => Self::Restart,
            ("seed", Some(n)) => Self::Seed(n.parse().map_err(|e| format!("seed:{n}: {e}"))?),
            _ => return Err(format!("unknown operation `{s}`")),
        };

        Ok(op)
    }
}

fn parse_mode(s: &str) -> Result<Mode, String> {
    match s {
        "r" => Ok(Access::READ.into()),
        "w" => Ok(Access::WRITE.into()),
        "rw" => Ok(Access::READ | Access::WRITE),
        "none" => Ok(Mode::empty()),
        _ => Err(format!("unknown open mode `{s}`, expect r|w|rw|none")),
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(mode) => {
                let mode = match (mode.contains(Access::READ), mode.contains(Access::WRITE)) {
                    (true, true) => "rw",
                    (true, false) => "r",
                    (false, true) => "w",
                    (false, false) => "none",
                };
                write!(f, "open:{mode}")
            }
            Self::Close => f.write_str("close"),
            Self::Write(text) => write!(f, "write:{text:?}"),
            Self::Read(n) => write!(f, "read:{n}"),
            Self::Reset => f.write_str("reset"),
            Self::Restart => f.write_str("restart"),
            Self::Seed(seed) => write!(f, "seed:{seed}"),
        }
    }
}

/// 不给出操作时执行的脚本：
/// 打开、交错读写，关闭后重新打开读出剩余数据
pub fn default_script() -> Vec<Op> {
    let rw = Access::READ | Access::WRITE;
    vec![
        Op::Open(rw),
        Op::Write("hello world whahtttata".to_owned()),
        Op::Read(10),
        Op::Read(5),
        Op::Write("hell of world whahtttata".to_owned()),
        Op::Read(5),
        Op::Close,
        Op::Open(rw),
        Op::Read(90),
        Op::Close,
    ]
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    /// 成功读出的帧数
    pub frames: usize,
    /// 校验失败的帧数
    pub mismatches: usize,
    /// 返回错误的操作数
    pub errors: usize,
}

pub struct Driver<'a> {
    dev: &'a Device,
    minor: ChannelId,
    /// 本驱动打开的描述符，操作总是作用于最后一个
    fds: Vec<Fd>,
    report: Report,
}

impl<'a> Driver<'a> {
    pub fn new(dev: &'a Device, minor: ChannelId) -> Self {
        Self {
            dev,
            minor,
            fds: Vec::new(),
            report: Report::default(),
        }
    }

    /// 在脚本开始前设置通道的种子
    pub fn install_seed(&self, seed: u32) -> Result<(), Error> {
        let fd = self.dev.open(self.minor, Mode::empty());
        let cmd = Command::SetSeed(seed);
        let result = self.dev.ioctl(fd, cmd.code(), cmd.arg());
        self.dev.close(fd);
        result
    }

    /// 依次执行所有操作，出错的操作不会中断脚本
    pub fn run<W: Write>(&mut self, ops: &[Op], out: &mut W) -> io::Result<Report> {
        for op in ops {
            self.step(op, out)?;
        }
        Ok(self.report)
    }

    pub fn step<W: Write>(&mut self, op: &Op, out: &mut W) -> io::Result<()> {
        match self.apply(op) {
            Ok(msg) => writeln!(out, "{op} -> {msg}"),
            Err(err) => {
                self.report.errors += 1;
                log::warn!("{op}: {err}");
                writeln!(out, "{op} -> error: {err} ({})", err.errno())
            }
        }
    }

    fn apply(&mut self, op: &Op) -> Result<String, Error> {
        match op {
            Op::Open(mode) => {
                let fd = self.dev.open(self.minor, *mode);
                self.fds.push(fd);
                Ok(format!("fd {fd}"))
            }
            Op::Close => {
                let fd = self.fds.pop().ok_or(Error::BadDescriptor)?;
                self.dev.close(fd);
                Ok(String::from("closed"))
            }
            Op::Write(text) => {
                let written = self.dev.write(self.current()?, &text.as_str())?;
                Ok(format!("{written} bytes"))
            }
            Op::Read(n) => self.read(self.current()?, *n),
            Op::Reset => self.ioctl(Command::Reset),
            Op::Restart => self.ioctl(Command::Restart),
            Op::Seed(seed) => self.ioctl(Command::SetSeed(*seed)),
        }
    }

    #[inline]
    fn current(&self) -> Result<Fd, Error> {
        self.fds.last().copied().ok_or(Error::BadDescriptor)
    }

    fn read(&mut self, fd: Fd, max_count: usize) -> Result<String, Error> {
        let mut bytes: Vec<u8> = Vec::new();
        let transferred = self.dev.read(fd, max_count, &mut bytes)?;
        if transferred == 0 {
            return Ok(String::from("0 bytes"));
        }

        let Some(frame) = hashdev::Frame::parse(&bytes) else {
            return Err(Error::TransferFailed);
        };
        self.report.frames += 1;

        let seed = self.seed();
        let verdict = if frame.verify(seed) {
            "ok"
        } else {
            self.report.mismatches += 1;
            "MISMATCH"
        };

        Ok(format!(
            "{transferred} bytes, hash={:#010x} {verdict}, data={:?}",
            frame.hash,
            String::from_utf8_lossy(&frame.data)
        ))
    }

    fn ioctl(&self, cmd: Command) -> Result<String, Error> {
        self.dev.ioctl(self.current()?, cmd.code(), cmd.arg())?;
        Ok(String::from("ok"))
    }

    fn seed(&self) -> u32 {
        self.dev
            .registry()
            .find(self.minor)
            .map(|channel| channel.lock().seed())
            .unwrap_or_default()
    }
}
