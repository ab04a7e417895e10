use alloc::vec::Vec;

use system_error::SystemError;

pub mod boardobjgrp;

pub use boardobjgrp::{BoardObjGrp, BoardObjGrpFlags, BoardObjGrpSetPayload};

/// 板级对象
///
/// 由 PMU 固件管理的一个硬件控制实体，例如时钟域、电压轨或温度区。
pub trait BoardObj: Send {
    /// 对象类型，写入固件对象头
    fn obj_type(&self) -> u8;

    /// 把对象中固件可见的部分追加到 `buf`
    fn pmu_data(&self, buf: &mut Vec<u8>) -> Result<(), SystemError>;
}
