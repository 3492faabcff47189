//! RenderWare 库版本号（library id）
//!
//! Chunk 头中的版本字段是一个打包的 32 位整数，
//! 解包后得到 `rw.major.minor.binary` 四个分量。

use std::fmt;
use std::str::FromStr;

use crate::config::DEFAULT_CHUNK_VERSION;
use crate::DmaError;

/// 解包后的库版本
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LibraryVersion {
    /// 3 位
    pub rw_version: u8,
    /// 4 位
    pub major_rev: u8,
    /// 4 位
    pub minor_rev: u8,
    /// 6 位
    pub bin_version: u8,
}

impl LibraryVersion {
    /// 旧版导出器使用的版本 3.7.0.2
    pub const DEFAULT: LibraryVersion = LibraryVersion::unpack(DEFAULT_CHUNK_VERSION);

    pub const fn new(rw_version: u8, major_rev: u8, minor_rev: u8, bin_version: u8) -> Self {
        Self {
            rw_version,
            major_rev,
            minor_rev,
            bin_version,
        }
    }

    /// 解包 library id，任意 u32 都能解出（非法输入得到无意义的分量）
    pub const fn unpack(id: u32) -> Self {
        let v = (((id >> 14) & 0x3ff00) + 0x30000) | ((id >> 16) & 0x3f);
        Self {
            rw_version: ((v >> 16) & 0x7) as u8,
            major_rev: ((v >> 12) & 0xf) as u8,
            minor_rev: ((v >> 8) & 0xf) as u8,
            bin_version: (v & 0x3f) as u8,
        }
    }

    /// 打包为 library id，各分量先按位宽截断
    ///
    /// 只保留 `rw_version - 3` 的低 2 位，因此只有 rw 3..=6 能完整往返。
    pub const fn pack(&self) -> u32 {
        pack_library_version(
            self.rw_version,
            self.major_rev,
            self.minor_rev,
            self.bin_version,
        )
    }
}

/// 打包 library id
pub const fn pack_library_version(rw_version: u8, major_rev: u8, minor_rev: u8, bin_version: u8) -> u32 {
    let ver = ((rw_version as u32 & 0x7) << 16)
        | ((major_rev as u32 & 0xf) << 12)
        | ((minor_rev as u32 & 0xf) << 8)
        | (bin_version as u32 & 0x3f);
    let ver = ver.wrapping_sub(0x30000);

    let b = ver & 0xff;
    let n = (ver >> 8) & 0xf;
    let j = (ver >> 12) & 0xf;
    let v = (ver >> 16) & 0xf;

    0xffff | (b << 16) | (n << 22) | (j << 26) | (v << 30)
}

/// 解包 library id，返回 (rw, major, minor, binary)
pub const fn unpack_library_version(id: u32) -> (u8, u8, u8, u8) {
    let v = LibraryVersion::unpack(id);
    (v.rw_version, v.major_rev, v.minor_rev, v.bin_version)
}

impl From<u32> for LibraryVersion {
    fn from(id: u32) -> Self {
        Self::unpack(id)
    }
}

impl From<LibraryVersion> for u32 {
    fn from(version: LibraryVersion) -> Self {
        version.pack()
    }
}

/// 各分量以十六进制输出。`bin_version` 大于 9 时不是十进制数字，
/// 大于 15 时输出两位，这两种结果都不能被 `FromStr` 读回。
impl fmt::Display for LibraryVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:x}.{:x}.{:x}.{:x}",
            self.rw_version, self.major_rev, self.minor_rev, self.bin_version
        )
    }
}

impl FromStr for LibraryVersion {
    type Err = DmaError;

    /// 只接受 `D.D.D.D` 形式的 7 字符串，D 为单个十进制数字
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DmaError::InvalidVersionString(s.to_string());

        let bytes = s.as_bytes();
        if bytes.len() != 7 {
            return Err(invalid());
        }

        let mut digits = [0u8; 4];
        for (i, &b) in bytes.iter().enumerate() {
            if i % 2 == 1 {
                if b != b'.' {
                    return Err(invalid());
                }
                continue;
            }
            digits[i / 2] = (b as char).to_digit(10).ok_or_else(invalid)? as u8;
        }

        Ok(Self::new(digits[0], digits[1], digits[2], digits[3]))
    }
}
