//! PMU 板级对象组（board object group）的位掩码
//!
//! 掩码记录某个组包含哪些板级对象（时钟域、电压轨、温度传感器等），
//! 并提供构建固件可见对象表时需要的集合运算。
//!
//! 掩码只支持两种位数：
//!  * E32：最多32个对象，占用1个32位元素；
//!  * E255：最多255个对象，占用8个32位元素。
//!
//! 掩码本身不加锁，由拥有它的对象组负责串行化访问。

#![no_std]
#![allow(clippy::needless_return)]

#[cfg(test)]
#[macro_use]
extern crate std;

mod ctrl;
mod mask;
mod mask_core;

#[cfg(test)]
mod prop_tests;

pub use ctrl::{CtrlBoardObjGrpMask, CTRL_BOARDOBJGRP_MASK_BYTES};
pub use mask::{BoardObjGrpMask, BoardObjGrpMaskE255, BoardObjGrpMaskE32, BoardObjGrpMaskIter};

/// E32 组最多容纳的对象数
pub const E32_MAX_OBJECTS: u8 = 32;
/// E255 组最多容纳的对象数
pub const E255_MAX_OBJECTS: u8 = 255;
/// 无效的对象下标
pub const BOARDOBJ_IDX_INVALID: u8 = 255;

/// 掩码元素的位宽
pub const MASK_ELEMENT_BIT_SIZE: usize = u32::BITS as usize;
/// 最大的掩码所需的元素个数
pub const MASK_ARRAY_MAX_SIZE: usize = mask_data_size(E255_MAX_OBJECTS as usize);

/// 容纳 `bits` 位所需的掩码元素个数
pub const fn mask_data_size(bits: usize) -> usize {
    bits.div_ceil(MASK_ELEMENT_BIT_SIZE)
}
