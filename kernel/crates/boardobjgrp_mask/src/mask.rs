use core::fmt;
use core::ops::Deref;

use system_error::SystemError;

use crate::{
    ctrl::CtrlBoardObjGrpMask, mask_core, mask_data_size, BOARDOBJ_IDX_INVALID,
    E255_MAX_OBJECTS, E32_MAX_OBJECTS, MASK_ARRAY_MAX_SIZE, MASK_ELEMENT_BIT_SIZE,
};

/// 板级对象组掩码
///
/// 记录哪些板级对象属于某个组。位数只能是 [`E32_MAX_OBJECTS`] 或
/// [`E255_MAX_OBJECTS`]，存储空间按 E255 固定分配在结构体内部，只有前
/// `data_count` 个元素有意义。
///
/// 每次修改之后，最后一个元素中超出位数的位都会被清零，
/// 因此计数、查找和比较不会看到这些位。
#[derive(Clone)]
pub struct BoardObjGrpMask {
    bitcount: u8,
    data_count: u8,
    last_mask_filter: u32,
    data: [u32; MASK_ARRAY_MAX_SIZE],
}

impl BoardObjGrpMask {
    /// 创建一个掩码
    ///
    /// ## 参数
    ///
    /// - `bitsize`：掩码位数，必须是 32 或 255
    /// - `extmask`：可选的初始内容，等价于创建后调用 [`Self::import`]
    ///
    /// ## 返回
    ///
    /// - `Err(SystemError::EINVAL)` - 位数不受支持
    pub fn new(bitsize: u8, extmask: Option<&CtrlBoardObjGrpMask>) -> Result<Self, SystemError> {
        if bitsize != E32_MAX_OBJECTS && bitsize != E255_MAX_OBJECTS {
            return Err(SystemError::EINVAL);
        }

        let mut mask = Self::empty(bitsize);
        if let Some(extmask) = extmask {
            mask.import(bitsize, extmask)?;
        }
        Ok(mask)
    }

    /// 调用者保证 `bitsize` 合法
    const fn empty(bitsize: u8) -> Self {
        Self {
            bitcount: bitsize,
            data_count: mask_data_size(bitsize as usize) as u8,
            last_mask_filter: mask_core::tail_filter(bitsize as usize),
            data: [0; MASK_ARRAY_MAX_SIZE],
        }
    }

    /// 掩码位数
    #[inline]
    pub fn bit_count(&self) -> u8 {
        self.bitcount
    }

    /// 有意义的 32 位元素个数
    #[inline]
    pub fn data_count(&self) -> usize {
        self.data_count as usize
    }

    /// 最后一个元素中有效位的掩码
    #[inline]
    pub fn last_mask_filter(&self) -> u32 {
        self.last_mask_filter
    }

    /// 有意义的元素，下标0对应最低的32位
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.data[..self.data_count()]
    }

    #[inline]
    fn data_mut(&mut self) -> &mut [u32] {
        let count = self.data_count();
        &mut self.data[..count]
    }

    #[inline]
    fn n(&self) -> usize {
        self.bitcount as usize
    }

    fn normalize(&mut self) {
        let filter = self.last_mask_filter;
        mask_core::normalize(self.data_mut(), filter);
    }

    /// 复制 `extmask` 的前 `data_count` 个元素并规格化
    fn load(&mut self, extmask: &CtrlBoardObjGrpMask) {
        let count = self.data_count();
        self.data_mut().copy_from_slice(&extmask.data[..count]);
        self.normalize();
    }

    fn check_index(&self, bitidx: u8) -> Result<(usize, usize), SystemError> {
        if bitidx >= self.bitcount {
            return Err(SystemError::EINVAL);
        }
        let bitidx = bitidx as usize;
        Ok((bitidx / MASK_ELEMENT_BIT_SIZE, bitidx % MASK_ELEMENT_BIT_SIZE))
    }

    /// 清空所有位
    pub fn clear(&mut self) {
        let filter = self.last_mask_filter;
        mask_core::set_all(self.data_mut(), filter, false);
    }

    /// 置位 `[0, bit_count)` 中的所有位
    pub fn fill(&mut self) {
        let filter = self.last_mask_filter;
        mask_core::set_all(self.data_mut(), filter, true);
    }

    /// 按位取反
    pub fn invert(&mut self) {
        let filter = self.last_mask_filter;
        mask_core::invert(self.data_mut(), filter);
    }

    pub fn is_zero(&self) -> bool {
        mask_core::is_empty(self.data())
    }

    /// `[0, bit_count)` 中的所有位都被置位
    pub fn is_full(&self) -> bool {
        mask_core::is_full(self.data(), self.last_mask_filter)
    }

    /// 被置位的位数
    pub fn count_set_bits(&self) -> u8 {
        // 最多 255 位，不会溢出
        mask_core::count(self.data()) as u8
    }

    /// 最低的被置位的位
    pub fn lowest_index(&self) -> Option<u8> {
        mask_core::first_index(self.data()).map(|idx| idx as u8)
    }

    /// 最高的被置位的位
    pub fn highest_index(&self) -> Option<u8> {
        mask_core::last_index(self.n(), self.data()).map(|idx| idx as u8)
    }

    /// 同 [`Self::lowest_index`]，没有置位时返回 [`BOARDOBJ_IDX_INVALID`]
    pub fn lowest_set_index(&self) -> u8 {
        self.lowest_index().unwrap_or(BOARDOBJ_IDX_INVALID)
    }

    /// 同 [`Self::highest_index`]，没有置位时返回 [`BOARDOBJ_IDX_INVALID`]
    pub fn highest_set_index(&self) -> u8 {
        self.highest_index().unwrap_or(BOARDOBJ_IDX_INVALID)
    }

    /// 获取 `bitidx` 之后（不含）第一个被置位的位
    pub fn next_set_index(&self, bitidx: u8) -> Option<u8> {
        mask_core::next_index(self.n(), self.data(), bitidx as usize).map(|idx| idx as u8)
    }

    /// 获取某一位，越界时返回 false
    pub fn get_bit(&self, bitidx: u8) -> bool {
        mask_core::get(self.n(), self.data(), bitidx as usize).unwrap_or(false)
    }

    pub fn set_bit(&mut self, bitidx: u8) -> Result<(), SystemError> {
        self.assign_bit(bitidx, true)
    }

    pub fn clear_bit(&mut self, bitidx: u8) -> Result<(), SystemError> {
        self.assign_bit(bitidx, false)
    }

    fn assign_bit(&mut self, bitidx: u8, value: bool) -> Result<(), SystemError> {
        let n = self.n();
        mask_core::set(n, self.data_mut(), bitidx as usize, value).ok_or(SystemError::EINVAL)?;
        Ok(())
    }

    /// 翻转 `bitidx` 这一位，其他位不变
    pub fn toggle_bit(&mut self, bitidx: u8) -> Result<(), SystemError> {
        let (index, offset) = self.check_index(bitidx)?;
        self.data[index] ^= 1u32 << offset;
        Ok(())
    }

    /// 与旧版驱动一致的翻转：`data[index] ^= !BIT(offset)`
    ///
    /// 目标位保持不变，同一元素中的其余位全部翻转。只在需要与依赖该行为的
    /// 固件数据保持一致时使用，结果仍会被规格化。
    pub fn toggle_bit_word_compat(&mut self, bitidx: u8) -> Result<(), SystemError> {
        let (index, offset) = self.check_index(bitidx)?;
        self.data[index] ^= !(1u32 << offset);
        self.normalize();
        Ok(())
    }

    /// 两个掩码的位数相同
    pub fn sizes_equal(op1: &Self, op2: &Self) -> bool {
        op1.bitcount == op2.bitcount
    }

    /// `op1` 是否是 `op2` 的子集，位数不同时返回 false
    pub fn is_subset(op1: &Self, op2: &Self) -> bool {
        if !Self::sizes_equal(op2, op1) {
            return false;
        }

        mask_core::is_subset(op1.data(), op2.data())
    }

    fn check_operands(dst: &Self, op1: &Self, op2: &Self) -> Result<(), SystemError> {
        if !Self::sizes_equal(dst, op1) || !Self::sizes_equal(dst, op2) {
            return Err(SystemError::EINVAL);
        }
        Ok(())
    }

    fn combine(
        dst: &mut Self,
        op1: &Self,
        op2: &Self,
        f: impl Fn(u32, u32) -> u32,
    ) -> Result<(), SystemError> {
        Self::check_operands(dst, op1, op2)?;
        mask_core::combine(dst.data_mut(), op1.data(), op2.data(), f);
        Ok(())
    }

    /// `dst = op1 & op2`
    pub fn and(dst: &mut Self, op1: &Self, op2: &Self) -> Result<(), SystemError> {
        Self::combine(dst, op1, op2, |a, b| a & b)
    }

    /// `dst = op1 | op2`
    pub fn or(dst: &mut Self, op1: &Self, op2: &Self) -> Result<(), SystemError> {
        Self::combine(dst, op1, op2, |a, b| a | b)
    }

    /// `dst = op1 ^ op2`
    pub fn xor(dst: &mut Self, op1: &Self, op2: &Self) -> Result<(), SystemError> {
        Self::combine(dst, op1, op2, |a, b| a ^ b)
    }

    pub fn copy(dst: &mut Self, src: &Self) -> Result<(), SystemError> {
        if !Self::sizes_equal(dst, src) {
            return Err(SystemError::EINVAL);
        }
        dst.data_mut().copy_from_slice(src.data());
        Ok(())
    }

    /// 从固件格式导入
    ///
    /// ## 参数
    ///
    /// - `bitsize`：`extmask` 所代表的位数，必须与本掩码相同
    /// - `extmask`：固件格式的掩码
    pub fn import(&mut self, bitsize: u8, extmask: &CtrlBoardObjGrpMask) -> Result<(), SystemError> {
        if self.bitcount != bitsize {
            return Err(SystemError::EINVAL);
        }

        self.load(extmask);
        Ok(())
    }

    /// 导出为固件格式
    ///
    /// 只写入前 `data_count` 个元素，`extmask` 中其余元素保持原值。
    pub fn export(&self, bitsize: u8, extmask: &mut CtrlBoardObjGrpMask) -> Result<(), SystemError> {
        if self.bitcount != bitsize {
            return Err(SystemError::EINVAL);
        }

        extmask.data[..self.data_count()].copy_from_slice(self.data());
        Ok(())
    }

    /// 按升序迭代所有被置位的位
    pub fn iter(&self) -> BoardObjGrpMaskIter<'_> {
        BoardObjGrpMaskIter {
            mask: self,
            next: self.lowest_index(),
        }
    }
}

impl PartialEq for BoardObjGrpMask {
    fn eq(&self, other: &Self) -> bool {
        self.bitcount == other.bitcount && self.data() == other.data()
    }
}

impl Eq for BoardObjGrpMask {}

impl fmt::Debug for BoardObjGrpMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardObjGrpMask")
            .field("bitcount", &self.bitcount)
            .field("data", &format_args!("{:08x?}", self.data()))
            .finish()
    }
}

impl<'a> IntoIterator for &'a BoardObjGrpMask {
    type Item = u8;
    type IntoIter = BoardObjGrpMaskIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct BoardObjGrpMaskIter<'a> {
    mask: &'a BoardObjGrpMask,
    next: Option<u8>,
}

impl Iterator for BoardObjGrpMaskIter<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let current = self.next?;
        self.next = self.mask.next_set_index(current);
        Some(current)
    }
}

macro_rules! sized_mask {
    ($(#[$attr:meta])* $name:ident, $bits:expr) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq)]
        pub struct $name(BoardObjGrpMask);

        impl $name {
            pub const BITS: u8 = $bits;

            /// 创建一个空掩码
            pub const fn new() -> Self {
                Self(BoardObjGrpMask::empty($bits))
            }

            /// 以固件格式的掩码为初始内容创建
            pub fn from_ctrl(extmask: &CtrlBoardObjGrpMask) -> Self {
                let mut mask = Self::new();
                mask.import(extmask);
                mask
            }

            pub fn into_inner(self) -> BoardObjGrpMask {
                self.0
            }

            pub fn clear(&mut self) {
                self.0.clear();
            }

            pub fn fill(&mut self) {
                self.0.fill();
            }

            pub fn invert(&mut self) {
                self.0.invert();
            }

            pub fn set_bit(&mut self, bitidx: u8) -> Result<(), SystemError> {
                self.0.set_bit(bitidx)
            }

            pub fn clear_bit(&mut self, bitidx: u8) -> Result<(), SystemError> {
                self.0.clear_bit(bitidx)
            }

            pub fn toggle_bit(&mut self, bitidx: u8) -> Result<(), SystemError> {
                self.0.toggle_bit(bitidx)
            }

            pub fn toggle_bit_word_compat(&mut self, bitidx: u8) -> Result<(), SystemError> {
                self.0.toggle_bit_word_compat(bitidx)
            }

            /// 位数由类型决定，因此不会失败
            pub fn import(&mut self, extmask: &CtrlBoardObjGrpMask) {
                self.0.load(extmask);
            }

            /// `dst = op1 & op2`
            pub fn and(dst: &mut Self, op1: &Self, op2: &Self) {
                mask_core::combine(dst.0.data_mut(), op1.0.data(), op2.0.data(), |a, b| a & b);
            }

            /// `dst = op1 | op2`
            pub fn or(dst: &mut Self, op1: &Self, op2: &Self) {
                mask_core::combine(dst.0.data_mut(), op1.0.data(), op2.0.data(), |a, b| a | b);
            }

            /// `dst = op1 ^ op2`
            pub fn xor(dst: &mut Self, op1: &Self, op2: &Self) {
                mask_core::combine(dst.0.data_mut(), op1.0.data(), op2.0.data(), |a, b| a ^ b);
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Deref for $name {
            type Target = BoardObjGrpMask;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl From<$name> for BoardObjGrpMask {
            fn from(mask: $name) -> Self {
                mask.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(&self.0, f)
            }
        }
    };
}

sized_mask!(
    /// 最多容纳32个对象的组掩码
    BoardObjGrpMaskE32,
    E32_MAX_OBJECTS
);

sized_mask!(
    /// 最多容纳255个对象的组掩码
    BoardObjGrpMaskE255,
    E255_MAX_OBJECTS
);
