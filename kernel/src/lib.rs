//! nvgpu PMU 板级对象层
//!
//! 板级对象组（board object group）用 [`boardobjgrp_mask::BoardObjGrpMask`]
//! 记录成员，并据此生成下发给 PMU 固件的对象表。

#![no_std]
#![allow(clippy::needless_return)]

extern crate alloc;

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod pmu;

pub use boardobjgrp_mask;
pub use system_error::SystemError;
