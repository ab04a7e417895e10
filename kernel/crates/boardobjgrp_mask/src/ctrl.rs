//! 与 PMU 固件交换的掩码格式
//!
//! 第 `i` 个元素保存逻辑位 `[32 * i, 32 * i + 32)`，低位在前。该格式不记录位数，
//! 导入/导出时由调用者给出期望的位数。

use system_error::SystemError;

use crate::MASK_ARRAY_MAX_SIZE;

/// 序列化后的字节数
pub const CTRL_BOARDOBJGRP_MASK_BYTES: usize = MASK_ARRAY_MAX_SIZE * core::mem::size_of::<u32>();

/// 固件可见的掩码，按最大的 E255 组分配空间
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CtrlBoardObjGrpMask {
    pub data: [u32; MASK_ARRAY_MAX_SIZE],
}

impl CtrlBoardObjGrpMask {
    pub const fn new() -> Self {
        Self {
            data: [0; MASK_ARRAY_MAX_SIZE],
        }
    }

    /// 按小端序写出全部元素，用于填充 PMU 命令负载
    pub fn to_bytes(&self) -> [u8; CTRL_BOARDOBJGRP_MASK_BYTES] {
        let mut buf = [0u8; CTRL_BOARDOBJGRP_MASK_BYTES];
        for (chunk, word) in buf.chunks_exact_mut(4).zip(self.data.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        buf
    }

    /// 从小端序字节解析掩码
    ///
    /// ## 返回
    ///
    /// - `Err(SystemError::EINVAL)` - `bytes` 不足 [`CTRL_BOARDOBJGRP_MASK_BYTES`] 字节
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SystemError> {
        let bytes = bytes
            .get(..CTRL_BOARDOBJGRP_MASK_BYTES)
            .ok_or(SystemError::EINVAL)?;

        let mut mask = Self::new();
        for (word, chunk) in mask.data.iter_mut().zip(bytes.chunks_exact(4)) {
            *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Ok(mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_layout() {
        let mut mask = CtrlBoardObjGrpMask::new();
        mask.data[0] = 0x8000_0021;
        mask.data[7] = 0x7fff_ffff;

        let bytes = mask.to_bytes();
        assert_eq!(&bytes[0..4], &[0x21, 0x00, 0x00, 0x80]);
        assert_eq!(&bytes[4..28], &[0u8; 24]);
        assert_eq!(&bytes[28..32], &[0xff, 0xff, 0xff, 0x7f]);

        assert_eq!(CtrlBoardObjGrpMask::from_bytes(&bytes), Ok(mask));
    }

    #[test]
    fn test_from_short_buffer() {
        assert_eq!(
            CtrlBoardObjGrpMask::from_bytes(&[0u8; CTRL_BOARDOBJGRP_MASK_BYTES - 1]),
            Err(SystemError::EINVAL)
        );
    }

    #[test]
    fn test_from_longer_buffer_ignores_trailer() {
        let mut bytes = [0u8; CTRL_BOARDOBJGRP_MASK_BYTES + 4];
        bytes[0] = 1;
        bytes[CTRL_BOARDOBJGRP_MASK_BYTES] = 0xff;
        let mask = CtrlBoardObjGrpMask::from_bytes(&bytes).unwrap();
        assert_eq!(mask.data[0], 1);
        assert!(mask.data[1..].iter().all(|w| *w == 0));
    }
}
