use alloc::vec::Vec;

use boardobjgrp_mask::E32_MAX_OBJECTS;
use log::{debug, error};
use spin::Mutex;
use system_error::SystemError;

use crate::pmu::boardobj::{BoardObj, BoardObjGrp, BoardObjGrpSetPayload};

/// 3.x 版本的时钟频率域对象
pub const CTRL_CLK_CLK_FREQ_DOMAIN_TYPE_3X: u8 = 0x01;

/// 时钟频率域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClkFreqDomain {
    clk_domain: u32,
}

impl ClkFreqDomain {
    pub const fn new(clk_domain: u32) -> Self {
        Self { clk_domain }
    }

    #[inline]
    pub fn clk_domain(&self) -> u32 {
        self.clk_domain
    }
}

impl BoardObj for ClkFreqDomain {
    fn obj_type(&self) -> u8 {
        CTRL_CLK_CLK_FREQ_DOMAIN_TYPE_3X
    }

    fn pmu_data(&self, buf: &mut Vec<u8>) -> Result<(), SystemError> {
        buf.extend_from_slice(&self.clk_domain.to_le_bytes());
        Ok(())
    }
}

/// 时钟频率域组，最多32个频率域
pub struct ClkFreqDomainGrp {
    super_: BoardObjGrp<ClkFreqDomain>,
    init_flags: u32,
}

impl ClkFreqDomainGrp {
    fn new() -> Self {
        Self {
            super_: BoardObjGrp::new_e32(),
            init_flags: 0,
        }
    }

    #[inline]
    pub fn grp(&self) -> &BoardObjGrp<ClkFreqDomain> {
        &self.super_
    }

    #[inline]
    pub fn init_flags(&self) -> u32 {
        self.init_flags
    }
}

/// 每个 GPU 的时钟 PMU 状态
///
/// 频率域组由锁保护，所有对组的修改都在持锁期间完成。
pub struct ClkPmupstate {
    freq_domain_grp: Mutex<Option<ClkFreqDomainGrp>>,
}

impl Default for ClkPmupstate {
    fn default() -> Self {
        Self::new()
    }
}

impl ClkPmupstate {
    pub const fn new() -> Self {
        Self {
            freq_domain_grp: Mutex::new(None),
        }
    }

    /// 分配空的频率域组
    ///
    /// ## 返回
    ///
    /// - `Err(SystemError::EBUSY)` - 已经分配过
    pub fn init_pmupstate(&self) -> Result<(), SystemError> {
        let mut guard = self.freq_domain_grp.lock();
        if guard.is_some() {
            return Err(SystemError::EBUSY);
        }

        *guard = Some(ClkFreqDomainGrp::new());
        Ok(())
    }

    /// 释放频率域组，可重复调用
    pub fn free_pmupstate(&self) {
        self.freq_domain_grp.lock().take();
    }

    /// 按给出的时钟域构造频率域对象，第 `i` 个时钟域放入下标 `i`
    ///
    /// ## 返回
    ///
    /// - `Err(SystemError::ENODEV)` - 尚未调用 [`Self::init_pmupstate`]
    /// - `Err(SystemError::EBUSY)` - 组中已经有对象
    /// - `Err(SystemError::EINVAL)` - 时钟域超过32个
    pub fn sw_setup(&self, init_flags: u32, clk_domains: &[u32]) -> Result<(), SystemError> {
        let mut guard = self.freq_domain_grp.lock();
        let grp = guard.as_mut().ok_or(SystemError::ENODEV)?;

        if !grp.super_.is_empty() {
            return Err(SystemError::EBUSY);
        }
        if clk_domains.len() > E32_MAX_OBJECTS as usize {
            error!(
                "clk_freq_domain: {} clock domains exceed group capacity",
                clk_domains.len()
            );
            return Err(SystemError::EINVAL);
        }

        for (idx, clk_domain) in clk_domains.iter().enumerate() {
            grp.super_
                .insert(idx as u8, ClkFreqDomain::new(*clk_domain))
                .map_err(|e| {
                    error!("clk_freq_domain: insert {} failed: {:?}", idx, e);
                    e
                })?;
        }
        grp.init_flags = init_flags;

        debug!(
            "clk_freq_domain: sw setup done, {} domains",
            grp.super_.len()
        );
        Ok(())
    }

    /// 生成下发给 PMU 的频率域对象表
    ///
    /// ## 返回
    ///
    /// - `Err(SystemError::ENODEV)` - 尚未调用 [`Self::init_pmupstate`]
    pub fn pmu_setup(&self) -> Result<BoardObjGrpSetPayload, SystemError> {
        let mut guard = self.freq_domain_grp.lock();
        let grp = guard.as_mut().ok_or(SystemError::ENODEV)?;
        grp.super_.pmu_setup()
    }

    /// 在持锁状态下访问频率域组
    pub fn with_grp<R>(&self, f: impl FnOnce(&ClkFreqDomainGrp) -> R) -> Result<R, SystemError> {
        let guard = self.freq_domain_grp.lock();
        let grp = guard.as_ref().ok_or(SystemError::ENODEV)?;
        Ok(f(grp))
    }
}
